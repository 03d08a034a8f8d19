//! Composition of operator requests.

use geoproxy_proto::{geometry_request, GeometryData, GeometryRequest};
use geoproxy_types::{Encoding, GeometryValue, SpatialReference};

use crate::error::GeoProxyError;
use crate::operator::{Arity, Operator};
use crate::reconcile::{reconcile, Reconciliation};

/// Operand of a request: a literal geometry or the result of another request.
#[derive(Debug, Clone)]
pub enum Operand {
    #[allow(missing_docs)]
    Geometry(GeometryValue),
    /// Nested request, evaluated by the service before the outer one.
    Request(Box<OperatorRequest>),
}

impl Operand {
    /// Spatial reference the operand has when the outer request is evaluated.
    pub fn spatial_reference(&self) -> &SpatialReference {
        match self {
            Operand::Geometry(value) => value.spatial_reference(),
            Operand::Request(request) => request.output_spatial_reference(),
        }
    }

    fn ensure_not_empty(&self, operation: &str) -> Result<(), GeoProxyError> {
        match self {
            Operand::Geometry(value) => Ok(value.ensure_not_empty(operation)?),
            Operand::Request(_) => Ok(()),
        }
    }

    fn geometry_data(&self) -> Result<Option<GeometryData>, GeoProxyError> {
        match self {
            Operand::Geometry(value) => Ok(Some(GeometryData::try_from(value)?)),
            Operand::Request(_) => Ok(None),
        }
    }
}

impl From<GeometryValue> for Operand {
    fn from(value: GeometryValue) -> Self {
        Self::Geometry(value)
    }
}

impl From<&GeometryValue> for Operand {
    fn from(value: &GeometryValue) -> Self {
        Self::Geometry(value.clone())
    }
}

impl From<OperatorRequest> for Operand {
    fn from(value: OperatorRequest) -> Self {
        Self::Request(Box::new(value))
    }
}

/// Request built and reconciled on the client, ready to be dispatched or nested.
///
/// ```ignore
/// let request = OperatorRequest::unary(Operator::Project { to: SpatialReference::WGS84 }, utm)
///     .build()?
///     .then(Operator::GeodeticArea)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct OperatorRequest {
    operator: Operator,
    left: Operand,
    right: Option<Operand>,
    result_spatial_reference: Option<SpatialReference>,
    result_encoding: Encoding,
    reconciliation: Reconciliation,
}

impl OperatorRequest {
    /// Starts a request with a single operand.
    pub fn unary(operator: Operator, operand: impl Into<Operand>) -> RequestBuilder {
        RequestBuilder::new(operator, operand.into(), None)
    }

    /// Starts a request with two operands.
    pub fn binary(
        operator: Operator,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
    ) -> RequestBuilder {
        RequestBuilder::new(operator, left.into(), Some(right.into()))
    }

    /// Starts a unary request taking the result of this one as its operand.
    pub fn then(self, operator: Operator) -> RequestBuilder {
        Self::unary(operator, self)
    }

    #[allow(missing_docs)]
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    #[allow(missing_docs)]
    pub fn left(&self) -> &Operand {
        &self.left
    }

    #[allow(missing_docs)]
    pub fn right(&self) -> Option<&Operand> {
        self.right.as_ref()
    }

    /// Spatial references the request runs in and produces.
    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }

    /// Spatial reference of the result of the request.
    pub fn output_spatial_reference(&self) -> &SpatialReference {
        &self.reconciliation.result
    }

    #[allow(missing_docs)]
    pub fn result_encoding(&self) -> Encoding {
        self.result_encoding
    }

    /// Wire message of the request with all nested requests.
    pub fn to_proto(&self) -> Result<GeometryRequest, GeoProxyError> {
        use geometry_request::{Left, Right};

        let left = match (&self.left, self.operator.arity()) {
            (Operand::Request(inner), _) => Left::LeftGeometryRequest(Box::new(inner.to_proto()?)),
            (literal, Arity::Unary) => Left::Geometry(required(literal.geometry_data()?)?),
            (literal, Arity::Binary) => Left::LeftGeometry(required(literal.geometry_data()?)?),
        };

        let right = match &self.right {
            None => None,
            Some(Operand::Request(inner)) => {
                Some(Right::RightGeometryRequest(Box::new(inner.to_proto()?)))
            }
            Some(literal) => Some(Right::RightGeometry(required(literal.geometry_data()?)?)),
        };

        let operation_spatial_reference = self
            .reconciliation
            .sends_operation()
            .then(|| (&self.reconciliation.operation).into());

        Ok(GeometryRequest {
            operator: self.operator.operator_type() as i32,
            left: Some(left),
            right,
            operation_spatial_reference,
            result_spatial_reference: self.result_spatial_reference.as_ref().map(Into::into),
            result_encoding: geoproxy_proto::Encoding::from(self.result_encoding) as i32,
            params: self.operator.params(),
        })
    }
}

fn required(data: Option<GeometryData>) -> Result<GeometryData, GeoProxyError> {
    data.ok_or_else(|| GeoProxyError::InvalidRequest("literal operand expected".into()))
}

/// Builder of an [`OperatorRequest`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    operator: Operator,
    left: Operand,
    right: Option<Operand>,
    operation_spatial_reference: Option<SpatialReference>,
    result_spatial_reference: Option<SpatialReference>,
    result_encoding: Encoding,
}

impl RequestBuilder {
    fn new(operator: Operator, left: Operand, right: Option<Operand>) -> Self {
        Self {
            operator,
            left,
            right,
            operation_spatial_reference: None,
            result_spatial_reference: None,
            result_encoding: Encoding::default(),
        }
    }

    /// Spatial reference both operands are projected into before the operation.
    pub fn operation_spatial_reference(mut self, sr: impl Into<Option<SpatialReference>>) -> Self {
        self.operation_spatial_reference = sr.into();
        self
    }

    /// Spatial reference the result is projected into.
    pub fn result_spatial_reference(mut self, sr: impl Into<Option<SpatialReference>>) -> Self {
        self.result_spatial_reference = sr.into();
        self
    }

    /// Encoding of the result geometry. Defaults to WKB.
    pub fn result_encoding(mut self, encoding: Encoding) -> Self {
        self.result_encoding = encoding;
        self
    }

    /// Checks the operands and reconciles their spatial references.
    ///
    /// Fails without sending anything if the operand count does not match the operator, if a
    /// literal operand is empty, or if the spatial references cannot be reconciled.
    pub fn build(self) -> Result<OperatorRequest, GeoProxyError> {
        let name = self.operator.name();
        match (self.operator.arity(), &self.right) {
            (Arity::Binary, None) => {
                return Err(GeoProxyError::InvalidRequest(format!(
                    "{name} requires a right operand"
                )))
            }
            (Arity::Unary, Some(_)) => {
                return Err(GeoProxyError::InvalidRequest(format!(
                    "{name} does not take a right operand"
                )))
            }
            _ => {}
        }

        self.left.ensure_not_empty(name)?;
        if let Some(right) = &self.right {
            right.ensure_not_empty(name)?;
        }

        let mut result_spatial_reference = self.result_spatial_reference;
        if let Operator::Project { to } = &self.operator {
            match &result_spatial_reference {
                Some(result) if result != to => {
                    return Err(GeoProxyError::InvalidRequest(format!(
                        "projection to {to} cannot produce a result in {result}"
                    )))
                }
                _ => result_spatial_reference = Some(to.clone()),
            }
        }

        let reconciliation = reconcile(
            self.left.spatial_reference(),
            self.right.as_ref().map(Operand::spatial_reference),
            self.operation_spatial_reference.as_ref(),
            result_spatial_reference.as_ref(),
        )?;

        Ok(OperatorRequest {
            operator: self.operator,
            left: self.left,
            right: self.right,
            result_spatial_reference,
            result_encoding: self.result_encoding,
            reconciliation,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geoproxy_proto::OperatorType;

    use super::*;

    fn point(wkt: &str, sr: SpatialReference) -> GeometryValue {
        GeometryValue::from_wkt(wkt, sr).unwrap()
    }

    #[test]
    fn arity_is_checked() {
        let a = point("POINT(1 2)", SpatialReference::WGS84);
        assert_matches!(
            OperatorRequest::unary(Operator::Union, &a).build(),
            Err(GeoProxyError::InvalidRequest(_))
        );
        assert_matches!(
            OperatorRequest::binary(Operator::ConvexHull, &a, &a).build(),
            Err(GeoProxyError::InvalidRequest(_))
        );
        assert!(OperatorRequest::binary(Operator::Union, &a, &a)
            .build()
            .is_ok());
    }

    #[test]
    fn empty_literal_is_rejected() {
        let empty = point("POLYGON EMPTY", SpatialReference::WGS84);
        assert_matches!(
            OperatorRequest::unary(Operator::ConvexHull, empty).build(),
            Err(GeoProxyError::Types(
                geoproxy_types::GeoProxyTypesError::EmptyGeometry(_)
            ))
        );
    }

    #[test]
    fn literal_operand_fields() {
        let a = point("POINT(1 2)", SpatialReference::WGS84);
        let unary = OperatorRequest::unary(Operator::ConvexHull, &a)
            .build()
            .unwrap()
            .to_proto()
            .unwrap();
        assert_matches!(unary.left, Some(geometry_request::Left::Geometry(_)));
        assert_eq!(unary.right, None);
        assert_eq!(unary.operation_spatial_reference, None);

        let binary = OperatorRequest::binary(Operator::Intersects, &a, &a)
            .build()
            .unwrap()
            .to_proto()
            .unwrap();
        assert_matches!(binary.left, Some(geometry_request::Left::LeftGeometry(_)));
        assert_matches!(
            binary.right,
            Some(geometry_request::Right::RightGeometry(_))
        );
        assert_eq!(binary.operator(), OperatorType::Intersects);
    }

    #[test]
    fn nested_output_reference() {
        let utm = point("POINT(500000 0)", SpatialReference::Code(32632));
        let projected = OperatorRequest::unary(
            Operator::Project {
                to: SpatialReference::WGS84,
            },
            &utm,
        )
        .build()
        .unwrap();
        assert_eq!(
            projected.output_spatial_reference(),
            &SpatialReference::WGS84
        );

        let wgs = point("POINT(9 1)", SpatialReference::WGS84);
        let distance = OperatorRequest::binary(Operator::Distance, projected, &wgs)
            .build()
            .unwrap();
        assert!(!distance.reconciliation().defaulted);

        let message = distance.to_proto().unwrap();
        let Some(geometry_request::Left::LeftGeometryRequest(inner)) = message.left else {
            panic!("nested left operand expected");
        };
        assert_eq!(inner.operator(), OperatorType::Project);
        assert_eq!(
            inner.result_spatial_reference.map(|sr| sr.code),
            Some(4326)
        );
    }

    #[test]
    fn defaulted_reference_is_sent() {
        let a = point("POINT(9 1)", SpatialReference::WGS84);
        let b = point("POINT(500000 0)", SpatialReference::Code(32632));
        let request = OperatorRequest::binary(Operator::Union, &a, &b)
            .build()
            .unwrap();
        assert!(request.reconciliation().defaulted);
        assert_eq!(request.output_spatial_reference(), &SpatialReference::WGS84);
        assert_eq!(
            request
                .to_proto()
                .unwrap()
                .operation_spatial_reference
                .map(|sr| sr.code),
            Some(4326)
        );
    }

    #[test]
    fn nested_mixed_locality_fails_on_build() {
        let local = point("POINT(0 0)", SpatialReference::custom(9.0, 45.0));
        let utm = point("POINT(500000 0)", SpatialReference::Code(32632));
        let buffered = OperatorRequest::unary(Operator::Buffer { distance: 1.0 }, &local)
            .build()
            .unwrap();
        assert_matches!(
            OperatorRequest::binary(Operator::Union, buffered, &utm).build(),
            Err(GeoProxyError::MixedLocality { .. })
        );
    }

    #[test]
    fn project_result_conflict() {
        let a = point("POINT(9 1)", SpatialReference::WGS84);
        assert_matches!(
            OperatorRequest::unary(
                Operator::Project {
                    to: SpatialReference::Code(32632)
                },
                &a
            )
            .result_spatial_reference(SpatialReference::WEB_MERCATOR)
            .build(),
            Err(GeoProxyError::InvalidRequest(_))
        );
    }
}
