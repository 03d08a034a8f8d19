//! Geoproxy is a client for a remote geometry operator service. Spatial operations (buffers,
//! projections, set operations, simplification, generalization, geodetic measurements) are sent
//! to the service as requests, and planar operations can also be computed in-process.
//!
//! # Quick start
//!
//! ```no_run
//! use geoproxy::{ClientConfig, GeometryClient};
//! use geoproxy::geoproxy_types::{GeometryValue, SpatialReference};
//!
//! let client = GeometryClient::connect(ClientConfig::from_env())?;
//! let square = GeometryValue::from_wkt(
//!     "POLYGON((9 45,9.1 45,9.1 45.1,9 45.1,9 45))",
//!     SpatialReference::WGS84,
//! )?;
//!
//! let area_m2 = client.area(&square)?;
//! let buffered = client.buffer(&square, 500.0)?;
//! let utm = client.project(&buffered, &SpatialReference::Code(32632))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Main components
//!
//! * [`GeometryClient`] offers one method per operation and owns the [`channel`] to the service.
//!   The channel can be a gRPC connection or the in-process [`LocalService`](service::LocalService).
//! * [`OperatorRequest`] composes requests. Any built request can be used as an operand of another
//!   one, and the service evaluates the inner request first, so a chain of operations costs one
//!   round trip.
//! * [`reconcile`](reconcile::reconcile) decides which spatial reference an operation runs in when
//!   the operands disagree.
//! * [`BatchingUnion`] unions any number of geometries through bounded streaming calls.
//!
//! Geometry values, spatial references and the local kernel live in [`geoproxy_types`], wire
//! messages in [`geoproxy_proto`].

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod batch;
pub mod channel;
mod client;
pub mod config;
pub mod error;
pub mod operator;
pub mod reconcile;
pub mod request;
pub mod response;
pub mod service;

pub use batch::BatchingUnion;
pub use channel::GeometryChannel;
pub use client::GeometryClient;
pub use config::ClientConfig;
pub use error::GeoProxyError;
pub use operator::{Arity, Operator, ResultShape};
pub use request::{Operand, OperatorRequest, RequestBuilder};
pub use response::OperatorResponse;
pub use {geoproxy_proto, geoproxy_types};
