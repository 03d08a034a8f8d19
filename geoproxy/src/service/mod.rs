//! In-process implementation of the geometry service.
//!
//! [`LocalService`] evaluates wire requests the same way the remote service does: nested requests
//! are evaluated first, operands are reconciled and projected into the operation spatial
//! reference, the result is projected into the result spatial reference and encoded as the
//! request asks. It backs [`LocalChannel`](crate::channel::LocalChannel).

use geoproxy_proto::error::GeoProxyProtoError;
use geoproxy_proto::{geometry_request, GeometryData, GeometryRequest, GeometryResponse, OperatorType};
use geoproxy_types::{GeoProxyTypesError, GeometryValue, Kernel, Projector, SpatialReference};
use thiserror::Error;

use crate::error::GeoProxyError;
use crate::operator::Arity;
use crate::reconcile::reconcile;
use crate::response::OperatorResponse;

mod evaluate;

/// Category of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorCode {
    /// Request is malformed or cannot be applied to its operands.
    InvalidArgument,
    /// Operation or spatial reference is not supported.
    Unimplemented,
    /// Computation failed.
    Internal,
}

/// Failure of a request, with the message reported to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ServiceError {
    #[allow(missing_docs)]
    pub code: ServiceErrorCode,
    #[allow(missing_docs)]
    pub message: String,
}

impl ServiceError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: ServiceErrorCode::InvalidArgument,
            message: message.into(),
        }
    }

    pub(crate) fn unimplemented(message: impl Into<String>) -> Self {
        Self {
            code: ServiceErrorCode::Unimplemented,
            message: message.into(),
        }
    }
}

impl From<GeoProxyTypesError> for ServiceError {
    fn from(value: GeoProxyTypesError) -> Self {
        let code = match value {
            GeoProxyTypesError::NotImplemented(_)
            | GeoProxyTypesError::UnsupportedSpatialReference(_) => ServiceErrorCode::Unimplemented,
            GeoProxyTypesError::Projection(_) | GeoProxyTypesError::Encode(_) => {
                ServiceErrorCode::Internal
            }
            _ => ServiceErrorCode::InvalidArgument,
        };

        Self {
            code,
            message: value.to_string(),
        }
    }
}

impl From<GeoProxyProtoError> for ServiceError {
    fn from(value: GeoProxyProtoError) -> Self {
        match value {
            GeoProxyProtoError::Types(err) => err.into(),
            other => Self::invalid(other.to_string()),
        }
    }
}

impl From<GeoProxyError> for ServiceError {
    fn from(value: GeoProxyError) -> Self {
        match value {
            GeoProxyError::Types(err) => err.into(),
            GeoProxyError::Proto(err) => err.into(),
            other => Self::invalid(other.to_string()),
        }
    }
}

/// Geometry service evaluating requests in the current process.
#[derive(Default)]
pub struct LocalService {
    kernel: Kernel,
}

impl std::fmt::Debug for LocalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalService")
            .field("kernel", &self.kernel.names())
            .finish()
    }
}

impl LocalService {
    /// Creates a service using the full kernel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service using the given kernel.
    pub fn with_kernel(kernel: Kernel) -> Self {
        Self { kernel }
    }

    /// Evaluates a single request with all its nested requests.
    pub fn operate(&self, request: &GeometryRequest) -> Result<GeometryResponse, ServiceError> {
        let response = self.evaluate(request)?;
        encode_response(response, request.result_encoding())
    }

    /// Unions the geometries of a stream of UNION requests.
    ///
    /// Geometries are brought into the operation spatial reference of the first request, or the
    /// spatial reference of its geometry if it has none. The first request also decides the
    /// result spatial reference and encoding.
    pub fn operate_client_stream(
        &self,
        requests: &[GeometryRequest],
    ) -> Result<GeometryResponse, ServiceError> {
        let Some(first) = requests.first() else {
            return Err(ServiceError::invalid("no geometries in the request stream"));
        };

        let mut geometries = Vec::with_capacity(requests.len());
        let mut target: Option<SpatialReference> = decode_sr(&first.operation_spatial_reference)?;
        for request in requests {
            if request.operator() != OperatorType::Union {
                return Err(ServiceError::unimplemented(format!(
                    "{} is not supported in a request stream, only UNION",
                    request.operator().as_str_name()
                )));
            }
            if request.right.is_some() {
                return Err(ServiceError::invalid(
                    "streamed UNION requests must carry a single geometry",
                ));
            }

            let value = self.left_operand(request)?;
            let sr = target.get_or_insert_with(|| value.spatial_reference().clone());
            geometries.push(project(&value, sr)?);
        }

        let Some(operation_sr) = target else {
            return Err(ServiceError::invalid("no geometries in the request stream"));
        };
        let result_sr = decode_sr(&first.result_spatial_reference)?.unwrap_or(operation_sr.clone());

        log::debug!(
            "Union of {} streamed geometries in {operation_sr}",
            geometries.len()
        );
        let union = self.kernel.aggregate("unary_union", &geometries)?;
        let union = Projector::new(&operation_sr, &result_sr)?.project(&union)?;

        encode_response(
            OperatorResponse::Geometry(GeometryValue::from_geo(union, result_sr)?),
            first.result_encoding(),
        )
    }

    fn evaluate(&self, request: &GeometryRequest) -> Result<OperatorResponse, ServiceError> {
        let operator = OperatorType::try_from(request.operator)
            .map_err(|_| ServiceError::invalid(format!("unknown operator {}", request.operator)))?;
        let Some(arity) = Arity::of(operator) else {
            return Err(ServiceError::invalid("operator is not set"));
        };
        let name = operator.as_str_name();

        let left = self.left_operand(request)?;
        let right = match &request.right {
            None => None,
            Some(geometry_request::Right::RightGeometry(data)) => Some(decode_geometry(data)?),
            Some(geometry_request::Right::RightGeometryRequest(inner)) => {
                Some(self.evaluate_geometry(inner)?)
            }
        };

        match (arity, &right) {
            (Arity::Binary, None) => {
                return Err(ServiceError::invalid(format!(
                    "{name} requires a right geometry"
                )))
            }
            (Arity::Unary, Some(_)) => {
                return Err(ServiceError::invalid(format!(
                    "{name} does not take a right geometry"
                )))
            }
            _ => {}
        }

        left.ensure_not_empty(name)?;
        if let Some(right) = &right {
            right.ensure_not_empty(name)?;
        }

        let operation_sr = decode_sr(&request.operation_spatial_reference)?;
        let result_sr = decode_sr(&request.result_spatial_reference)?;
        if operator == OperatorType::Project && result_sr.is_none() {
            return Err(ServiceError::invalid(
                "result_spatial_reference missing for PROJECT",
            ));
        }

        let reconciliation = reconcile(
            left.spatial_reference(),
            right.as_ref().map(GeometryValue::spatial_reference),
            operation_sr.as_ref(),
            result_sr.as_ref(),
        )?;

        log::debug!(
            "Evaluating {name} in {} with result in {}",
            reconciliation.operation,
            reconciliation.result
        );

        evaluate::Evaluation {
            kernel: &self.kernel,
            operator,
            request,
            operation_sr: &reconciliation.operation,
            result_sr: &reconciliation.result,
        }
        .run(&left, right.as_ref())
    }

    fn left_operand(&self, request: &GeometryRequest) -> Result<GeometryValue, ServiceError> {
        match &request.left {
            Some(geometry_request::Left::Geometry(data))
            | Some(geometry_request::Left::LeftGeometry(data)) => decode_geometry(data),
            Some(geometry_request::Left::LeftGeometryRequest(inner)) => self.evaluate_geometry(inner),
            None => Err(ServiceError::invalid("left geometry missing")),
        }
    }

    fn evaluate_geometry(&self, request: &GeometryRequest) -> Result<GeometryValue, ServiceError> {
        match self.evaluate(request)? {
            OperatorResponse::Geometry(value) => Ok(value),
            _ => Err(ServiceError::invalid(format!(
                "nested {} request does not produce a geometry",
                request.operator().as_str_name()
            ))),
        }
    }
}

fn decode_geometry(data: &GeometryData) -> Result<GeometryValue, ServiceError> {
    Ok(GeometryValue::try_from(data)?)
}

fn decode_sr(
    data: &Option<geoproxy_proto::SpatialReferenceData>,
) -> Result<Option<SpatialReference>, ServiceError> {
    data.as_ref()
        .map(SpatialReference::try_from)
        .transpose()
        .map_err(ServiceError::from)
}

/// Geometry of the value in the given spatial reference.
fn project(
    value: &GeometryValue,
    to: &SpatialReference,
) -> Result<geoproxy_types::geo::Geometry, ServiceError> {
    if value.spatial_reference() == to {
        return Ok(value.geometry());
    }

    Ok(Projector::new(value.spatial_reference(), to)?.project(&value.geometry())?)
}

fn encode_response(
    response: OperatorResponse,
    encoding: geoproxy_proto::Encoding,
) -> Result<GeometryResponse, ServiceError> {
    let mut message = GeometryResponse::default();
    match response {
        OperatorResponse::Geometry(value) => {
            message.geometry = Some(geoproxy_proto::geometry_data(&value, encoding.into())?);
        }
        OperatorResponse::Measure(value) => message.measure = Some(value),
        OperatorResponse::Relationship(value) => message.spatial_relationship = Some(value),
        OperatorResponse::RelateMatrix(value) => message.relate_string = Some(value),
        OperatorResponse::GeodeticInverse(value) => {
            message.geodetic_inverse = Some(geoproxy_proto::GeodeticInverseData {
                az12: value.az12,
                az21: value.az21,
                distance: value.distance,
            })
        }
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geoproxy_proto::{geometry_data, BufferParams, Encoding};

    use super::*;

    fn data(wkt: &str, sr: SpatialReference) -> GeometryData {
        GeometryData::try_from(&GeometryValue::from_wkt(wkt, sr).unwrap()).unwrap()
    }

    fn unary(operator: OperatorType, geometry: GeometryData) -> GeometryRequest {
        GeometryRequest {
            operator: operator as i32,
            left: Some(geometry_request::Left::Geometry(geometry)),
            ..Default::default()
        }
    }

    fn stream_union(wkt: &str, sr: SpatialReference) -> GeometryRequest {
        unary(OperatorType::Union, data(wkt, sr))
    }

    #[test]
    fn project_requires_result_reference() {
        let request = unary(
            OperatorType::Project,
            data("POINT(500000 0)", SpatialReference::Code(32632)),
        );
        let err = LocalService::new().operate(&request).unwrap_err();
        assert_eq!(err.code, ServiceErrorCode::InvalidArgument);
        assert!(err.message.contains("result_spatial_reference"));
    }

    #[test]
    fn project_utm() {
        let mut request = unary(
            OperatorType::Project,
            data("POINT(600000 -100000)", SpatialReference::Code(32632)),
        );
        request.result_spatial_reference = Some((&SpatialReference::WGS84).into());
        let response = LocalService::new().operate(&request).unwrap();
        let value = GeometryValue::try_from(&response.geometry.unwrap()).unwrap();
        let geoproxy_types::Shape::Point(point) = value.shape() else {
            panic!("point expected");
        };
        assert_abs_diff_eq!(point.x(), 9.898748937075354, epsilon = 1e-7);
        assert_abs_diff_eq!(point.y(), -0.904618578893133, epsilon = 1e-7);
    }

    #[test]
    fn result_encoding() {
        let mut request = unary(
            OperatorType::ConvexHull,
            data("MULTIPOINT(0 0,1 0,0 1)", SpatialReference::WEB_MERCATOR),
        );
        request.result_encoding = Encoding::Wkt as i32;
        let response = LocalService::new().operate(&request).unwrap();
        assert_matches!(
            response.geometry.and_then(|g| g.data),
            Some(geometry_data::Data::Wkt(_))
        );
    }

    #[test]
    fn missing_params_block() {
        let request = unary(
            OperatorType::Simplify,
            data("LINESTRING(0 0,1 1)", SpatialReference::WGS84),
        );
        let err = LocalService::new().operate(&request).unwrap_err();
        assert_eq!(err.message, "simplify_params missing");
    }

    #[test]
    fn arity_mismatch() {
        let request = unary(
            OperatorType::Intersects,
            data("POINT(0 0)", SpatialReference::WGS84),
        );
        let err = LocalService::new().operate(&request).unwrap_err();
        assert!(err.message.contains("requires a right geometry"));
    }

    #[test]
    fn nested_request() {
        let mut inner = unary(
            OperatorType::Buffer,
            data("POINT(0 0)", SpatialReference::WEB_MERCATOR),
        );
        inner.params = Some(geometry_request::Params::BufferParams(BufferParams {
            distance: 10.0,
        }));
        let outer = GeometryRequest {
            operator: OperatorType::Contains as i32,
            left: Some(geometry_request::Left::LeftGeometryRequest(Box::new(inner))),
            right: Some(geometry_request::Right::RightGeometry(data(
                "POINT(5 5)",
                SpatialReference::WEB_MERCATOR,
            ))),
            ..Default::default()
        };

        let response = LocalService::new().operate(&outer).unwrap();
        assert_eq!(response.spatial_relationship, Some(true));
    }

    #[test]
    fn mixed_locality_rejected() {
        let request = GeometryRequest {
            operator: OperatorType::Intersects as i32,
            left: Some(geometry_request::Left::LeftGeometry(data(
                "POINT(0 0)",
                SpatialReference::custom(9.0, 45.0),
            ))),
            right: Some(geometry_request::Right::RightGeometry(data(
                "POINT(9 45)",
                SpatialReference::WGS84,
            ))),
            ..Default::default()
        };
        let err = LocalService::new().operate(&request).unwrap_err();
        assert!(err.message.contains("local or neither"));
    }

    #[test]
    fn stream_union_in_first_reference() {
        let requests = vec![
            stream_union("POLYGON((0 0,2 0,2 2,0 2,0 0))", SpatialReference::WEB_MERCATOR),
            stream_union("POLYGON((1 0,3 0,3 2,1 2,1 0))", SpatialReference::WEB_MERCATOR),
        ];
        let response = LocalService::new().operate_client_stream(&requests).unwrap();
        let value = GeometryValue::try_from(&response.geometry.unwrap()).unwrap();
        assert_eq!(value.spatial_reference(), &SpatialReference::WEB_MERCATOR);
        assert_abs_diff_eq!(value.local().area().unwrap(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn stream_rejects_other_operators() {
        let requests = vec![unary(
            OperatorType::ConvexHull,
            data("POINT(0 0)", SpatialReference::WGS84),
        )];
        let err = LocalService::new()
            .operate_client_stream(&requests)
            .unwrap_err();
        assert_eq!(err.code, ServiceErrorCode::Unimplemented);

        let err = LocalService::new().operate_client_stream(&[]).unwrap_err();
        assert_eq!(err.code, ServiceErrorCode::InvalidArgument);
    }

    #[test]
    fn restricted_kernel_reports_missing_capability() {
        let service = LocalService::with_kernel(Kernel::global().without(&["convex_hull"]));
        let request = unary(
            OperatorType::ConvexHull,
            data("MULTIPOINT(0 0,1 0,0 1)", SpatialReference::WGS84),
        );
        let err = service.operate(&request).unwrap_err();
        assert_eq!(err.code, ServiceErrorCode::Unimplemented);
    }
}
