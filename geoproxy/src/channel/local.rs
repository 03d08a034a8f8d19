use std::time::{Duration, Instant};

use geoproxy_proto::{GeometryRequest, GeometryResponse};

use super::GeometryChannel;
use crate::error::GeoProxyError;
use crate::service::LocalService;

/// Channel evaluating requests with an in-process [`LocalService`].
#[derive(Debug, Default)]
pub struct LocalChannel {
    service: LocalService,
}

impl LocalChannel {
    /// Creates a channel to a service using the full kernel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a channel to the given service.
    pub fn with_service(service: LocalService) -> Self {
        Self { service }
    }

    fn check_deadline(started: Instant, timeout: Duration) -> Result<(), GeoProxyError> {
        let elapsed = started.elapsed();
        if elapsed > timeout {
            return Err(GeoProxyError::Timeout(format!(
                "call took {elapsed:?}, deadline was {timeout:?}"
            )));
        }

        Ok(())
    }
}

impl GeometryChannel for LocalChannel {
    fn operate(
        &self,
        request: GeometryRequest,
        timeout: Duration,
    ) -> Result<GeometryResponse, GeoProxyError> {
        let started = Instant::now();
        let response = self
            .service
            .operate(&request)
            .map_err(|err| GeoProxyError::Service(err.message))?;
        Self::check_deadline(started, timeout)?;

        Ok(response)
    }

    fn operate_client_stream(
        &self,
        requests: Vec<GeometryRequest>,
        timeout: Duration,
    ) -> Result<GeometryResponse, GeoProxyError> {
        let started = Instant::now();
        let response = self
            .service
            .operate_client_stream(&requests)
            .map_err(|err| GeoProxyError::Service(err.message))?;
        Self::check_deadline(started, timeout)?;

        Ok(response)
    }
}
