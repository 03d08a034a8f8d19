//! Channels carrying wire messages to a geometry service.

use std::time::Duration;

use geoproxy_proto::{GeometryRequest, GeometryResponse};

use crate::error::GeoProxyError;

#[cfg(feature = "grpc")]
mod grpc;
mod local;

#[cfg(feature = "grpc")]
pub use grpc::GrpcChannel;
pub use local::LocalChannel;

/// Transport offering the two calls of the geometry service.
///
/// Calls block the caller thread until the response arrives or the timeout elapses.
pub trait GeometryChannel: Send + Sync {
    /// Sends one request and waits for its response.
    fn operate(
        &self,
        request: GeometryRequest,
        timeout: Duration,
    ) -> Result<GeometryResponse, GeoProxyError>;

    /// Streams a sequence of requests and waits for the single aggregated response.
    fn operate_client_stream(
        &self,
        requests: Vec<GeometryRequest>,
        timeout: Duration,
    ) -> Result<GeometryResponse, GeoProxyError>;
}
