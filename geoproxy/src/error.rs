//! Error types used by the crate.

use geoproxy_proto::error::GeoProxyProtoError;
use geoproxy_types::{GeoProxyTypesError, SpatialReference};
use thiserror::Error;

/// Geoproxy error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoProxyError {
    /// Invalid geometry, spatial reference or missing local capability.
    #[error(transparent)]
    Types(#[from] GeoProxyTypesError),
    /// Malformed wire message.
    #[error(transparent)]
    Proto(#[from] GeoProxyProtoError),
    /// Operands have different spatial references, one of them local, and no operation
    /// spatial reference was given.
    #[error("either both spatial references are local or neither ({left} and {right}); set an operation spatial reference")]
    MixedLocality {
        /// Spatial reference of the left operand.
        left: SpatialReference,
        /// Spatial reference of the right operand.
        right: SpatialReference,
    },
    /// Request cannot be built for the given operator and operands.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Geometry service rejected the request. Contains the service message as is.
    #[error("{0}")]
    Service(String),
    /// Deadline of the call was exceeded.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Connection to the service failed.
    #[error("transport error: {0}")]
    Transport(String),
    /// Response does not have the shape the operator declares.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    /// Union of an empty sequence of geometries was requested.
    #[error("no geometries to union")]
    EmptyInput,
}
