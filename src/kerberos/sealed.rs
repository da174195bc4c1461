use std::fmt::{Debug, Formatter};

/// Bytes of a sealed ticket as they are handed to and carried by a client.
macro_rules! sealed_ticket {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(Box<[u8]>);

        impl $name {
            pub(crate) fn new(data: Box<[u8]>) -> Self {
                Self(data)
            }

            /// Wraps bytes received from somewhere else. Nothing is checked until an
            /// authority tries to open them.
            pub fn from_bytes(data: impl Into<Box<[u8]>>) -> Self {
                Self(data.into())
            }

            #[inline]
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn into_bytes(self) -> Box<[u8]> {
                self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                let preview = &self.0[..self.0.len().min(8)];

                write!(f, "{}({} bytes, {}..)", stringify!($name), self.0.len(), hex::encode(preview))
            }
        }
    };
}

sealed_ticket!(
    SealedTgt
);

sealed_ticket!(
    SealedServiceTicket
);
