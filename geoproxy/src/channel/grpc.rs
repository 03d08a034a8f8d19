use std::time::Duration;

use geoproxy_proto::{GeometryRequest, GeometryResponse, OPERATE_CLIENT_STREAM_PATH, OPERATE_PATH};
use http::uri::PathAndQuery;
use tokio::runtime::{Builder, Runtime};
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};

use super::GeometryChannel;
use crate::error::GeoProxyError;

/// Channel to a remote geometry service over gRPC.
///
/// Calls block the caller thread on a private single-threaded runtime, so they must not be made
/// from inside another async runtime.
pub struct GrpcChannel {
    runtime: Runtime,
    channel: Channel,
    address: String,
}

impl std::fmt::Debug for GrpcChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcChannel")
            .field("address", &self.address)
            .finish()
    }
}

impl GrpcChannel {
    /// Connects to the service at `host:port` (or a full `http://` URI).
    pub fn connect(address: &str, timeout: Duration) -> Result<Self, GeoProxyError> {
        let uri = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| GeoProxyError::Transport(err.to_string()))?;
        let endpoint = Endpoint::from_shared(uri)
            .map_err(|err| GeoProxyError::Transport(err.to_string()))?
            .connect_timeout(timeout)
            .timeout(timeout);
        let channel = runtime
            .block_on(endpoint.connect())
            .map_err(|err| GeoProxyError::Transport(format!("cannot connect to {address}: {err}")))?;

        log::info!("Connected to geometry service at {address}");

        Ok(Self {
            runtime,
            channel,
            address: address.to_string(),
        })
    }

    /// Address the channel is connected to.
    pub fn address(&self) -> &str {
        &self.address
    }

    async fn client(&self) -> Result<Grpc<Channel>, GeoProxyError> {
        let mut client = Grpc::new(self.channel.clone());
        client
            .ready()
            .await
            .map_err(|err| GeoProxyError::Transport(err.to_string()))?;
        Ok(client)
    }
}

impl GeometryChannel for GrpcChannel {
    fn operate(
        &self,
        request: GeometryRequest,
        timeout: Duration,
    ) -> Result<GeometryResponse, GeoProxyError> {
        self.runtime.block_on(async {
            let mut client = self.client().await?;
            let mut request = tonic::Request::new(request);
            request.set_timeout(timeout);

            let codec: ProstCodec<GeometryRequest, GeometryResponse> = ProstCodec::default();
            let response = client
                .unary(request, PathAndQuery::from_static(OPERATE_PATH), codec)
                .await
                .map_err(status_error)?;
            Ok(response.into_inner())
        })
    }

    fn operate_client_stream(
        &self,
        requests: Vec<GeometryRequest>,
        timeout: Duration,
    ) -> Result<GeometryResponse, GeoProxyError> {
        self.runtime.block_on(async {
            let mut client = self.client().await?;
            let mut request = tonic::Request::new(futures::stream::iter(requests));
            request.set_timeout(timeout);

            let codec: ProstCodec<GeometryRequest, GeometryResponse> = ProstCodec::default();
            let response = client
                .client_streaming(
                    request,
                    PathAndQuery::from_static(OPERATE_CLIENT_STREAM_PATH),
                    codec,
                )
                .await
                .map_err(status_error)?;
            Ok(response.into_inner())
        })
    }
}

fn status_error(status: Status) -> GeoProxyError {
    match status.code() {
        Code::DeadlineExceeded | Code::Cancelled => {
            GeoProxyError::Timeout(status.message().to_string())
        }
        Code::InvalidArgument
        | Code::Internal
        | Code::Unknown
        | Code::FailedPrecondition
        | Code::Unimplemented
        | Code::OutOfRange => GeoProxyError::Service(status.message().to_string()),
        _ => GeoProxyError::Transport(status.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            status_error(Status::invalid_argument("buffer_params missing")),
            GeoProxyError::Service("buffer_params missing".into())
        );
        assert!(matches!(
            status_error(Status::deadline_exceeded("too slow")),
            GeoProxyError::Timeout(_)
        ));
        assert!(matches!(
            status_error(Status::unavailable("down")),
            GeoProxyError::Transport(_)
        ));
    }
}
