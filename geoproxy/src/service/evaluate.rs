use geoproxy_proto::{geometry_request::Params, GeometryRequest, OperatorType};
use geoproxy_types::algorithm::{
    densify, generalize_by_area, geodetic_area, geodetic_densify, geodetic_inverse,
    geodetic_length, random_points, GeneralizeParams, MAX_RANDOM_POINTS,
};
use geoproxy_types::geo::{Geometry, MultiPolygon, Point, Translate};
use geoproxy_types::{BufferParams, GeometryValue, Kernel, Projector, Shape, SpatialReference};

use super::{project, ServiceError};
use crate::response::OperatorResponse;

const SQUARE_METERS_PER_SQUARE_KM: f64 = 1_000_000.0;

/// Evaluation of one request whose operands are already decoded and reconciled.
pub(super) struct Evaluation<'a> {
    pub kernel: &'a Kernel,
    pub operator: OperatorType,
    pub request: &'a GeometryRequest,
    pub operation_sr: &'a SpatialReference,
    pub result_sr: &'a SpatialReference,
}

macro_rules! params {
    ($self:ident, $variant:ident, $name:literal) => {
        match &$self.request.params {
            Some(Params::$variant(params)) => params,
            _ => return Err(ServiceError::invalid(concat!($name, " missing"))),
        }
    };
}

impl Evaluation<'_> {
    pub fn run(
        &self,
        left: &GeometryValue,
        right: Option<&GeometryValue>,
    ) -> Result<OperatorResponse, ServiceError> {
        use OperatorType::*;

        match self.operator {
            UnknownOperator => Err(ServiceError::invalid("operator is not set")),
            Project => {
                let geometry = project(left, self.result_sr)?;
                self.geometry(geometry, self.result_sr)
            }
            Buffer => {
                let params = params!(self, BufferParams, "buffer_params");
                let buffered = self.kernel.buffer(
                    &self.planar(left)?,
                    &BufferParams::new(params.distance),
                )?;
                self.planar_result(buffered)
            }
            GeodesicBuffer => {
                let params = params!(self, BufferParams, "buffer_params");
                let distance = params.distance;
                self.on_equal_area_plane(left, |kernel, geometry| {
                    Ok(kernel.buffer(geometry, &BufferParams::new(distance))?)
                })
            }
            Simplify => {
                let params = params!(self, SimplifyParams, "simplify_params");
                let name = if params.preserve_topology {
                    "topology_preserve_simplify"
                } else {
                    "simplify"
                };
                let simplified =
                    self.kernel
                        .parametrized(name, &self.planar(left)?, params.tolerance)?;
                self.planar_result(simplified)
            }
            ConvexHull => {
                let hull = self.kernel.transform("convex_hull", &self.planar(left)?)?;
                self.planar_result(hull)
            }
            GeneralizeByArea => {
                let params = params!(self, GeneralizeByAreaParams, "generalize_by_area_params");
                let params = GeneralizeParams {
                    percent_reduction: params.percent_reduction,
                    max_point_count: (params.max_point_count > 0)
                        .then_some(params.max_point_count as usize),
                    remove_degenerates: params.remove_degenerates,
                };
                let generalized = generalize_by_area(&self.planar(left)?, &params)?;
                self.planar_result(generalized)
            }
            DensifyByLength => {
                let params = params!(self, DensifyParams, "densify_params");
                let densified = densify(&self.planar(left)?, params.max_length)?;
                self.planar_result(densified)
            }
            GeodeticDensifyByLength => {
                let params = params!(self, DensifyParams, "densify_params");
                let densified = geodetic_densify(&self.geographic(left)?, params.max_length)?;
                self.geographic_result(densified)
            }
            RandomPoints => self.random_points(left),
            GeodeticArea => Ok(OperatorResponse::Measure(geodetic_area(
                &self.geographic(left)?,
            ))),
            GeodeticLength => Ok(OperatorResponse::Measure(geodetic_length(
                &self.geographic(left)?,
            ))),
            Union | Intersection | Difference | SymmetricDifference => {
                let name = match self.operator {
                    Union => "union",
                    Intersection => "intersection",
                    Difference => "difference",
                    _ => "symmetric_difference",
                };
                let (a, b) = self.planar_pair(left, right)?;
                let result = self.kernel.binary_transform(name, &a, &b)?;
                self.planar_result(result)
            }
            Distance => {
                let (a, b) = self.planar_pair(left, right)?;
                Ok(OperatorResponse::Measure(
                    self.kernel.binary_measure("distance", &a, &b)?,
                ))
            }
            Equals | Contains | Within | Touches | Overlaps | Crosses | Disjoint | Intersects => {
                let name = self.operator.as_str_name().to_lowercase();
                let (a, b) = self.planar_pair(left, right)?;
                Ok(OperatorResponse::Relationship(
                    self.kernel.binary_predicate(&name, &a, &b)?,
                ))
            }
            Relate => {
                let (a, b) = self.planar_pair(left, right)?;
                match &self.request.params {
                    Some(Params::RelateParams(params)) if !params.de9im.is_empty() => {
                        Ok(OperatorResponse::Relationship(self.kernel.relate_pattern(
                            &a,
                            &b,
                            &params.de9im,
                        )?))
                    }
                    _ => Ok(OperatorResponse::RelateMatrix(self.kernel.relate(&a, &b)?)),
                }
            }
            GeodeticInverse => {
                let right = self.right(right)?;
                let (Shape::Point(_), Shape::Point(_)) = (left.shape(), right.shape()) else {
                    return Err(ServiceError::invalid(
                        "geodetic inverse is supported only for points",
                    ));
                };
                let (Geometry::Point(from), Geometry::Point(to)) =
                    (self.geographic(left)?, self.geographic(right)?)
                else {
                    return Err(ServiceError::invalid(
                        "geodetic inverse is supported only for points",
                    ));
                };
                Ok(OperatorResponse::GeodeticInverse(geodetic_inverse(
                    from, to,
                )))
            }
            AffineTransform => {
                let params = params!(self, AffineTransformParams, "affine_transform_params");
                let translated = self
                    .planar(left)?
                    .translate(params.x_offset, params.y_offset);
                self.planar_result(translated)
            }
        }
    }

    fn right<'v>(&self, right: Option<&'v GeometryValue>) -> Result<&'v GeometryValue, ServiceError> {
        right.ok_or_else(|| {
            ServiceError::invalid(format!(
                "{} requires a right geometry",
                self.operator.as_str_name()
            ))
        })
    }

    fn planar(&self, value: &GeometryValue) -> Result<Geometry, ServiceError> {
        project(value, self.operation_sr)
    }

    fn planar_pair(
        &self,
        left: &GeometryValue,
        right: Option<&GeometryValue>,
    ) -> Result<(Geometry, Geometry), ServiceError> {
        Ok((self.planar(left)?, self.planar(self.right(right)?)?))
    }

    fn geographic(&self, value: &GeometryValue) -> Result<Geometry, ServiceError> {
        project(value, &SpatialReference::WGS84)
    }

    fn planar_result(&self, geometry: Geometry) -> Result<OperatorResponse, ServiceError> {
        self.reprojected(geometry, self.operation_sr)
    }

    fn geographic_result(&self, geometry: Geometry) -> Result<OperatorResponse, ServiceError> {
        self.reprojected(geometry, &SpatialReference::WGS84)
    }

    fn reprojected(
        &self,
        geometry: Geometry,
        from: &SpatialReference,
    ) -> Result<OperatorResponse, ServiceError> {
        let geometry = if from == self.result_sr {
            geometry
        } else {
            Projector::new(from, self.result_sr)?.project(&geometry)?
        };
        self.geometry(geometry, self.result_sr)
    }

    fn geometry(
        &self,
        geometry: Geometry,
        sr: &SpatialReference,
    ) -> Result<OperatorResponse, ServiceError> {
        Ok(OperatorResponse::Geometry(GeometryValue::from_geo(
            geometry,
            sr.clone(),
        )?))
    }

    /// Runs `f` on the geometry projected into an equal-area plane centred at its centroid, so
    /// that coordinate units are meters.
    fn on_equal_area_plane(
        &self,
        value: &GeometryValue,
        f: impl FnOnce(&Kernel, &Geometry) -> Result<Geometry, ServiceError>,
    ) -> Result<OperatorResponse, ServiceError> {
        let plane = self.equal_area_plane(value)?;
        let geometry = project(value, &plane)?;
        let result = f(self.kernel, &geometry)?;
        self.reprojected(result, &plane)
    }

    fn equal_area_plane(&self, value: &GeometryValue) -> Result<SpatialReference, ServiceError> {
        let geographic = self.geographic(value)?;
        match self.kernel.transform("centroid", &geographic)? {
            Geometry::Point(Point(center)) => Ok(SpatialReference::custom(center.x, center.y)),
            _ => Err(ServiceError::invalid(format!(
                "cannot find the centre of {}",
                value.kind()
            ))),
        }
    }

    fn random_points(&self, value: &GeometryValue) -> Result<OperatorResponse, ServiceError> {
        let params = params!(self, RandomPointsParams, "random_points_params");
        if !matches!(value.shape(), Shape::Polygon(_) | Shape::MultiPolygon(_)) {
            return Err(ServiceError::invalid(format!(
                "random points are supported only for polygons or multipolygons, got {}",
                value.kind()
            )));
        }

        let density = params.points_per_square_km;
        if density.is_nan() || density <= 0.0 {
            return Err(ServiceError::invalid(
                "points_per_square_km must be positive",
            ));
        }
        let seed = params.seed.unwrap_or_else(rand::random);

        self.on_equal_area_plane(value, |kernel, geometry| {
            let area = match geometry {
                Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon.clone()]),
                Geometry::MultiPolygon(polygons) => polygons.clone(),
                _ => {
                    return Err(ServiceError::invalid(
                        "random points are supported only for polygons or multipolygons",
                    ))
                }
            };

            let square_km = kernel.measure("area", geometry)? / SQUARE_METERS_PER_SQUARE_KM;
            let expected = (square_km * density).round();
            if !expected.is_finite() || expected > MAX_RANDOM_POINTS as f64 {
                return Err(ServiceError::invalid(format!(
                    "{expected} random points over {square_km:.3} km2 exceed the limit of \
                     {MAX_RANDOM_POINTS}"
                )));
            }
            let count = expected as usize;
            log::debug!("Sampling {count} random points over {square_km:.3} km2");

            Ok(random_points(&area, count, seed)?.into())
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geoproxy_proto::{
        geometry_request, AffineTransformParams, DensifyParams, GeometryData,
        RandomPointsParams, RelateParams,
    };
    use geoproxy_types::geo::CoordsIter;

    use super::*;
    use crate::service::LocalService;

    fn request(
        operator: OperatorType,
        wkt: &str,
        sr: SpatialReference,
        params: Option<Params>,
    ) -> GeometryRequest {
        let value = GeometryValue::from_wkt(wkt, sr).unwrap();
        GeometryRequest {
            operator: operator as i32,
            left: Some(geometry_request::Left::Geometry(
                GeometryData::try_from(&value).unwrap(),
            )),
            params,
            ..Default::default()
        }
    }

    fn geometry(request: &GeometryRequest) -> GeometryValue {
        let response = LocalService::new().operate(request).unwrap();
        GeometryValue::try_from(&response.geometry.unwrap()).unwrap()
    }

    #[test]
    fn geodesic_buffer_keeps_reference() {
        let request = request(
            OperatorType::GeodesicBuffer,
            "POINT(10 50)",
            SpatialReference::WGS84,
            Some(Params::BufferParams(geoproxy_proto::BufferParams {
                distance: 1000.0,
            })),
        );
        let value = geometry(&request);
        assert_eq!(value.spatial_reference(), &SpatialReference::WGS84);
        let area = geodetic_area(&value.geometry());
        assert_relative_eq!(area, std::f64::consts::PI * 1e6, max_relative = 0.005);
    }

    #[test]
    fn random_points_are_seeded() {
        let polygon = "POLYGON((10 50,10.1 50,10.1 50.1,10 50.1,10 50))";
        let params = Some(Params::RandomPointsParams(RandomPointsParams {
            points_per_square_km: 0.5,
            seed: Some(7),
        }));
        let request = request(
            OperatorType::RandomPoints,
            polygon,
            SpatialReference::WGS84,
            params,
        );
        let a = geometry(&request);
        let b = geometry(&request);
        assert_eq!(a, b);
        assert_eq!(a.kind(), geoproxy_types::GeometryKind::MultiPoint);
        // about 79 km2
        let count = a.geometry().coords_count();
        assert!((35..=45).contains(&count), "{count}");
    }

    #[test]
    fn random_points_density_is_limited() {
        let request = request(
            OperatorType::RandomPoints,
            "POLYGON((10 50,10.1 50,10.1 50.1,10 50.1,10 50))",
            SpatialReference::WGS84,
            Some(Params::RandomPointsParams(RandomPointsParams {
                points_per_square_km: 1e18,
                seed: Some(1),
            })),
        );
        let err = LocalService::new().operate(&request).unwrap_err();
        assert_eq!(err.code, crate::service::ServiceErrorCode::InvalidArgument);
        assert!(err.message.contains("exceed the limit"), "{}", err.message);
    }

    #[test]
    fn random_points_need_polygons() {
        let request = request(
            OperatorType::RandomPoints,
            "LINESTRING(0 0,1 1)",
            SpatialReference::WGS84,
            Some(Params::RandomPointsParams(RandomPointsParams {
                points_per_square_km: 1.0,
                seed: None,
            })),
        );
        let err = LocalService::new().operate(&request).unwrap_err();
        assert!(err.message.contains("polygons"));
    }

    #[test]
    fn densify_needs_lines_or_polygons() {
        let request = request(
            OperatorType::DensifyByLength,
            "POINT(0 0)",
            SpatialReference::WEB_MERCATOR,
            Some(Params::DensifyParams(DensifyParams { max_length: 1.0 })),
        );
        let err = LocalService::new().operate(&request).unwrap_err();
        assert!(err.message.contains("densify"));
    }

    #[test]
    fn affine_transform() {
        let request = request(
            OperatorType::AffineTransform,
            "POINT(1 2)",
            SpatialReference::WEB_MERCATOR,
            Some(Params::AffineTransformParams(AffineTransformParams {
                x_offset: 10.0,
                y_offset: -2.0,
            })),
        );
        let value = geometry(&request);
        assert_eq!(value.to_wkt().unwrap(), "POINT(11 0)");
    }

    #[test]
    fn relate_with_and_without_pattern() {
        let polygon = GeometryValue::from_wkt(
            "POLYGON((0 0,4 0,4 4,0 4,0 0))",
            SpatialReference::WEB_MERCATOR,
        )
        .unwrap();
        let point =
            GeometryValue::from_wkt("POINT(1 1)", SpatialReference::WEB_MERCATOR).unwrap();
        let mut request = GeometryRequest {
            operator: OperatorType::Relate as i32,
            left: Some(geometry_request::Left::LeftGeometry(
                GeometryData::try_from(&polygon).unwrap(),
            )),
            right: Some(geometry_request::Right::RightGeometry(
                GeometryData::try_from(&point).unwrap(),
            )),
            ..Default::default()
        };

        let response = LocalService::new().operate(&request).unwrap();
        assert_eq!(response.relate_string.as_deref(), Some("0F2FF1FF2"));

        request.params = Some(Params::RelateParams(RelateParams {
            de9im: "T*****FF*".into(),
        }));
        let response = LocalService::new().operate(&request).unwrap();
        assert_eq!(response.spatial_relationship, Some(true));
    }
}
