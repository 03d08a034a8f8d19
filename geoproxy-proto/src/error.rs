//! Error type used by the crate.

use geoproxy_types::GeoProxyTypesError;
use prost::DecodeError;
use thiserror::Error;

/// Error converting between wire messages and domain values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoProxyProtoError {
    /// Message bytes could not be decoded.
    #[error("proto error: {0}")]
    Proto(String),
    /// Required field is not set.
    #[error("missing field: {0}")]
    MissingField(&'static str),
    /// Enumeration field holds a value unknown to this version of the schema.
    #[error("unknown value {value} of {field}")]
    UnknownEnumValue {
        /// Field name.
        field: &'static str,
        /// Raw value.
        value: i32,
    },
    /// Domain value could not be built.
    #[error(transparent)]
    Types(#[from] GeoProxyTypesError),
}

impl From<DecodeError> for GeoProxyProtoError {
    fn from(value: DecodeError) -> Self {
        Self::Proto(value.to_string())
    }
}
