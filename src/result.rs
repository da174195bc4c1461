use std::fmt::Display;
use log::warn;

pub trait ResultExtension {
    type Output;

    /// Logs the error as a denial of `request` and turns the result into an option.
    fn denied_or_some(self, request: impl Display) -> Option<Self::Output>;
}

impl<T, E: Display> ResultExtension for Result<T, E> {
    type Output = T;

    fn denied_or_some(self, request: impl Display) -> Option<Self::Output> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("{} denied: {}", request, e);

                None
            }
        }
    }
}
