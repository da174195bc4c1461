use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::kerberos::ticket::{FormatError, FIELD_DELIMITER};

fn check_field(value: &str) -> Result<(), FormatError> {
    if value.is_empty() {
        return Err(FormatError::EmptyField);
    }

    if value.contains(FIELD_DELIMITER) {
        return Err(FormatError::ForbiddenDelimiter(value.to_owned()));
    }

    Ok(())
}

macro_rules! ticket_field {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Box<str>);

        impl $name {
            pub fn new(value: &str) -> Result<Self, FormatError> {
                check_field(value)?;

                Ok(Self(value.into()))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = FormatError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = FormatError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

ticket_field!(
    Principal
);

ticket_field!(
    /// The ticket-granting service itself is addressed with [`ServiceName::ticket_granting`].
    ServiceName
);

impl ServiceName {
    pub const TICKET_GRANTING: &'static str = "TGS";

    pub fn ticket_granting() -> Self {
        Self(Self::TICKET_GRANTING.into())
    }

    pub fn is_ticket_granting(&self) -> bool {
        &*self.0 == Self::TICKET_GRANTING
    }
}
