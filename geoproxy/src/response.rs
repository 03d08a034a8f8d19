//! Decoding of service responses.

use geoproxy_proto::GeometryResponse;
use geoproxy_types::algorithm::GeodeticInverse;
use geoproxy_types::GeometryValue;

use crate::error::GeoProxyError;
use crate::operator::ResultShape;

/// Decoded result of an operator.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorResponse {
    #[allow(missing_docs)]
    Geometry(GeometryValue),
    /// Length, area or distance.
    Measure(f64),
    /// Outcome of a spatial predicate.
    Relationship(bool),
    /// DE-9IM matrix.
    RelateMatrix(String),
    #[allow(missing_docs)]
    GeodeticInverse(GeodeticInverse),
}

impl OperatorResponse {
    /// Reads the field the result shape expects.
    pub fn from_proto(
        response: &GeometryResponse,
        shape: ResultShape,
    ) -> Result<Self, GeoProxyError> {
        let missing = |field: &str| {
            GeoProxyError::UnexpectedResponse(format!("{field} expected in the response"))
        };

        Ok(match shape {
            ResultShape::Geometry => {
                let data = response.geometry.as_ref().ok_or_else(|| missing("geometry"))?;
                Self::Geometry(GeometryValue::try_from(data)?)
            }
            ResultShape::Measure => Self::Measure(response.measure.ok_or_else(|| missing("measure"))?),
            ResultShape::Relationship => Self::Relationship(
                response
                    .spatial_relationship
                    .ok_or_else(|| missing("spatial_relationship"))?,
            ),
            ResultShape::RelateMatrix => Self::RelateMatrix(
                response
                    .relate_string
                    .clone()
                    .ok_or_else(|| missing("relate_string"))?,
            ),
            ResultShape::GeodeticInverse => {
                let data = response
                    .geodetic_inverse
                    .ok_or_else(|| missing("geodetic_inverse"))?;
                Self::GeodeticInverse(GeodeticInverse {
                    az12: data.az12,
                    az21: data.az21,
                    distance: data.distance,
                })
            }
        })
    }

    #[allow(missing_docs)]
    pub fn into_geometry(self) -> Result<GeometryValue, GeoProxyError> {
        match self {
            Self::Geometry(value) => Ok(value),
            other => Err(other.mismatch("geometry")),
        }
    }

    #[allow(missing_docs)]
    pub fn into_measure(self) -> Result<f64, GeoProxyError> {
        match self {
            Self::Measure(value) => Ok(value),
            other => Err(other.mismatch("measure")),
        }
    }

    #[allow(missing_docs)]
    pub fn into_relationship(self) -> Result<bool, GeoProxyError> {
        match self {
            Self::Relationship(value) => Ok(value),
            other => Err(other.mismatch("relationship")),
        }
    }

    #[allow(missing_docs)]
    pub fn into_relate_matrix(self) -> Result<String, GeoProxyError> {
        match self {
            Self::RelateMatrix(value) => Ok(value),
            other => Err(other.mismatch("relate matrix")),
        }
    }

    #[allow(missing_docs)]
    pub fn into_geodetic_inverse(self) -> Result<GeodeticInverse, GeoProxyError> {
        match self {
            Self::GeodeticInverse(value) => Ok(value),
            other => Err(other.mismatch("geodetic inverse")),
        }
    }

    fn mismatch(&self, expected: &str) -> GeoProxyError {
        GeoProxyError::UnexpectedResponse(format!("{expected} expected, got {self:?}"))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn reads_declared_field() {
        let response = GeometryResponse {
            measure: Some(12.5),
            spatial_relationship: Some(true),
            ..Default::default()
        };
        assert_eq!(
            OperatorResponse::from_proto(&response, ResultShape::Measure).unwrap(),
            OperatorResponse::Measure(12.5)
        );
        assert_eq!(
            OperatorResponse::from_proto(&response, ResultShape::Relationship)
                .unwrap()
                .into_relationship(),
            Ok(true)
        );
        assert_matches!(
            OperatorResponse::from_proto(&response, ResultShape::RelateMatrix),
            Err(GeoProxyError::UnexpectedResponse(_))
        );
    }

    #[test]
    fn wrong_accessor() {
        assert_matches!(
            OperatorResponse::Measure(1.0).into_geometry(),
            Err(GeoProxyError::UnexpectedResponse(_))
        );
    }
}
