//! Union of arbitrarily long geometry sequences in bounded streaming calls.

use std::time::Duration;

use geoproxy_proto::{geometry_data, geometry_request, GeometryRequest, OperatorType};
use geoproxy_types::{Encoding, GeometryValue};

use crate::channel::GeometryChannel;
use crate::error::GeoProxyError;
use crate::operator::ResultShape;
use crate::reconcile::reconcile;
use crate::response::OperatorResponse;

/// Unions geometries by streaming them to the service in batches.
///
/// Each batch is sent as one client-streaming call. The union of a batch becomes the first item of
/// the next one, so every call carries at most `batch_size` geometries no matter how long the
/// input is. Batches are sent one after another in input order and the first failure aborts the
/// whole union.
pub struct BatchingUnion<'a> {
    channel: &'a dyn GeometryChannel,
    batch_size: usize,
    timeout: Duration,
    result_encoding: Encoding,
}

impl<'a> BatchingUnion<'a> {
    /// Creates a driver. Batch sizes below 2 are treated as 2 since a batch must hold the folded
    /// result and at least one new geometry.
    pub fn new(channel: &'a dyn GeometryChannel, batch_size: usize, timeout: Duration) -> Self {
        Self {
            channel,
            batch_size: batch_size.max(2),
            timeout,
            result_encoding: Encoding::default(),
        }
    }

    /// Sets the encoding of the intermediate and final results.
    pub fn with_result_encoding(mut self, encoding: Encoding) -> Self {
        self.result_encoding = encoding;
        self
    }

    /// Number of geometries in one streaming call.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Unions all geometries. The input is consumed lazily.
    ///
    /// The result is in the spatial reference of the first geometry. A single geometry is
    /// returned as is, without a call.
    pub fn run(
        &self,
        geometries: impl IntoIterator<Item = GeometryValue>,
    ) -> Result<GeometryValue, GeoProxyError> {
        let mut pending: Vec<GeometryValue> = Vec::with_capacity(self.batch_size);
        let mut batches = 0usize;

        for value in geometries {
            value.ensure_not_empty("union")?;
            pending.push(value);

            if pending.len() == self.batch_size {
                batches += 1;
                let union = self.union_batch(&pending, batches)?;
                pending.clear();
                pending.push(union);
            }
        }

        match pending.len() {
            0 => Err(GeoProxyError::EmptyInput),
            1 => pending.pop().ok_or(GeoProxyError::EmptyInput),
            _ => self.union_batch(&pending, batches + 1),
        }
    }

    fn union_batch(
        &self,
        batch: &[GeometryValue],
        number: usize,
    ) -> Result<GeometryValue, GeoProxyError> {
        let Some(first) = batch.first() else {
            return Err(GeoProxyError::EmptyInput);
        };

        let mut defaulted = false;
        for value in &batch[1..] {
            defaulted |= reconcile(
                first.spatial_reference(),
                Some(value.spatial_reference()),
                None,
                None,
            )?
            .defaulted;
        }

        let requests = batch
            .iter()
            .enumerate()
            .map(|(index, value)| {
                Ok(GeometryRequest {
                    operator: OperatorType::Union as i32,
                    left: Some(geometry_request::Left::Geometry(geometry_data(
                        value,
                        value.payload().encoding(),
                    )?)),
                    operation_spatial_reference: (index == 0 && defaulted)
                        .then(|| first.spatial_reference().into()),
                    result_encoding: geoproxy_proto::Encoding::from(self.result_encoding) as i32,
                    ..Default::default()
                })
            })
            .collect::<Result<Vec<_>, GeoProxyError>>()?;

        log::debug!("Sending union batch {number} of {} geometries", batch.len());
        let response = self.channel.operate_client_stream(requests, self.timeout)?;
        OperatorResponse::from_proto(&response, ResultShape::Geometry)?.into_geometry()
    }
}
