//! Declares the error enum for a storage port.
//!
//! The record table and the undo history fail the same two ways: the data
//! directory cannot be reached, or a file in it cannot be read, decoded or
//! written. Each port gets an enum with those two variants, constructors that
//! take any message, and the conversion into [`crate::domain::DomainError`]
//! used by the record services. An unreachable store maps to
//! `service_unavailable` and anything else to `internal`.

macro_rules! define_store_error {
    (
        $(#[$outer:meta])*
        $vis:vis enum $name:ident for $store:literal;
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        $vis enum $name {
            #[doc = concat!("The ", $store, " could not be reached or opened.")]
            #[error("{store} unavailable: {message}", store = $store)]
            Connection {
                /// Underlying failure.
                message: String,
            },
            #[doc = concat!("Reading, decoding or writing the ", $store, " failed.")]
            #[error("{store} failed: {message}", store = $store)]
            Query {
                /// Underlying failure.
                message: String,
            },
        }

        impl $name {
            #[doc = concat!("Build [`", stringify!($name), "::Connection`].")]
            pub fn connection(message: impl Into<String>) -> Self {
                Self::Connection {
                    message: message.into(),
                }
            }

            #[doc = concat!("Build [`", stringify!($name), "::Query`].")]
            pub fn query(message: impl Into<String>) -> Self {
                Self::Query {
                    message: message.into(),
                }
            }

            /// Whether the store was unreachable rather than broken.
            #[must_use]
            pub const fn is_unavailable(&self) -> bool {
                matches!(self, Self::Connection { .. })
            }
        }

        impl From<$name> for $crate::domain::DomainError {
            fn from(error: $name) -> Self {
                if error.is_unavailable() {
                    Self::service_unavailable(error.to_string())
                } else {
                    Self::internal(error.to_string())
                }
            }
        }
    };
}

pub(crate) use define_store_error;
