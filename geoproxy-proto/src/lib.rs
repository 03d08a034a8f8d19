//! Wire messages of the geometry operator service and their conversions to `geoproxy-types`
//! values.
//!
//! The message types in [`messages`] are generated from `geometry.proto`. Run the build with the
//! `generate_proto` feature to regenerate them after changing the schema.

mod convert;
pub mod error;

/// Generated message types.
#[allow(missing_docs, clippy::all)]
pub mod messages {
    include!("generated/geoproxy.v1.rs");
}

pub use convert::geometry_data;
pub use messages::*;
pub use prost::Message;

/// Fully qualified name of the geometry service.
pub const SERVICE_NAME: &str = "geoproxy.v1.GeometryService";
/// Path of the unary `Operate` method.
pub const OPERATE_PATH: &str = "/geoproxy.v1.GeometryService/Operate";
/// Path of the client-streaming `OperateClientStream` method.
pub const OPERATE_CLIENT_STREAM_PATH: &str = "/geoproxy.v1.GeometryService/OperateClientStream";
