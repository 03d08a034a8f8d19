//! Geometry values and spatial references shared by the `geoproxy` crates.
//!
//! * [`SpatialReference`] identifies the coordinate system of a geometry.
//! * [`GeometryValue`] pairs a WKB or WKT payload with its spatial reference and decoded
//!   [`Shape`].
//! * [`Kernel`] is the table of planar operations that can be computed without the geometry
//!   service, exposed on values through [`GeometryValue::local`].
//! * [`Projector`] transforms coordinates between spatial references.

#![warn(missing_docs)]

pub mod algorithm;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod local;
pub mod projection;
pub mod spatial_reference;

pub use error::GeoProxyTypesError;
pub use geometry::{Dimension, Encoding, GeometryKind, GeometryValue, Payload, Shape};
pub use kernel::{BufferParams, CapStyle, JoinStyle, Kernel};
pub use local::LocalOps;
pub use projection::Projector;
pub use spatial_reference::SpatialReference;

pub use geo;
