//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoProxyTypesError {
    /// Geometry was created or decoded without any spatial reference.
    #[error("must define a spatial reference for geometry on creation")]
    MissingSpatialReference,
    /// Operation requires a non-empty geometry.
    #[error("{0} is not supported for empty geometries")]
    EmptyGeometry(String),
    /// Payload could not be decoded into a geometry.
    #[error("failed to decode geometry: {0}")]
    Decode(String),
    /// Geometry could not be encoded into the requested payload.
    #[error("failed to encode geometry: {0}")]
    Encode(String),
    /// Spatial reference cannot be used for coordinate transformation.
    #[error("unsupported spatial reference: {0}")]
    UnsupportedSpatialReference(String),
    /// Coordinate transformation failed.
    #[error("projection failed: {0}")]
    Projection(String),
    /// Capability is not available in the kernel or in this implementation.
    #[error("not implemented: {0}")]
    NotImplemented(String),
    /// Operation arguments are invalid for the given geometry.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operands do not share the spatial reference a local operation requires.
    #[error("all geometries must have the same spatial reference: {0}")]
    SpatialReferenceMismatch(String),
}
