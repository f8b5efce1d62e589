//! Error types for CNAB encoding and decoding.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Boxed error returned by capability hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error raised while encoding or decoding CNAB data.
///
/// Range and value problems are reported wrapped in [`Error::Field`] (encode
/// side, and tag problems on decode) or [`Error::Unmarshal`] (decode side,
/// carrying the raw field bytes). Use [`Error::cause`] to reach the innermost
/// kind.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cnab: unsupported type")]
    UnsupportedType,

    // === Range declaration ===
    #[error("invalid field tag format")]
    InvalidTagFormat,

    #[error("invalid begin range in cnab tag")]
    InvalidBeginRange,

    #[error("invalid end range in cnab tag")]
    InvalidEndRange,

    #[error("invalid range in cnab tag")]
    InvalidRange,

    // === Field values ===
    #[error(transparent)]
    ParseInt(#[from] ParseIntError),

    #[error(transparent)]
    ParseFloat(#[from] ParseFloatError),

    #[error("value {value} does not fit in {target}")]
    Overflow { value: String, target: &'static str },

    #[error("field content is not valid UTF-8")]
    InvalidUtf8,

    #[error("{0}")]
    Hook(#[source] BoxError),

    // === Wrappers ===
    #[error("cnab: error in field {field}. details: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error(
        "cnab: error unmarshaling in field {field} with data \"{}\". details: {source}",
        String::from_utf8_lossy(.data)
    )]
    Unmarshal {
        field: &'static str,
        data: Vec<u8>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps `self` as an encode-scoped error for `field`.
    pub fn in_field(self, field: &'static str) -> Error {
        Error::Field {
            field,
            source: Box::new(self),
        }
    }

    /// Wraps `self` as a decode-scoped error for `field` holding `data`.
    pub fn in_unmarshal(self, field: &'static str, data: &[u8]) -> Error {
        Error::Unmarshal {
            field,
            data: data.to_vec(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field wrappers.
    pub fn cause(&self) -> &Error {
        match self {
            Error::Field { source, .. } | Error::Unmarshal { source, .. } => source.cause(),
            other => other,
        }
    }

    /// Returns the name of the field this error was raised in, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::Field { field, .. } | Error::Unmarshal { field, .. } => Some(*field),
            _ => None,
        }
    }
}
