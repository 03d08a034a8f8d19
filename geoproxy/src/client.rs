//! Client of the geometry service.

use std::borrow::Cow;

use geoproxy_types::algorithm::{GeneralizeParams, GeodeticInverse};
use geoproxy_types::geo::{Geometry, GeometryCollection, Point};
use geoproxy_types::{GeometryKind, GeometryValue, Shape, SpatialReference};

use crate::batch::BatchingUnion;
use crate::channel::{GeometryChannel, LocalChannel};
use crate::config::ClientConfig;
use crate::error::GeoProxyError;
use crate::operator::Operator;
use crate::request::{OperatorRequest, RequestBuilder};
use crate::response::OperatorResponse;

/// Handle to a geometry service.
///
/// Every operation is a blocking call on the caller thread. Measurements and buffers default to
/// their geodetic variants; the `planar_*` methods work in the units of the operation spatial
/// reference.
pub struct GeometryClient {
    channel: Box<dyn GeometryChannel>,
    config: ClientConfig,
}

impl std::fmt::Debug for GeometryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryClient")
            .field("config", &self.config)
            .finish()
    }
}

impl GeometryClient {
    /// Connects to the service at the configured address.
    #[cfg(feature = "grpc")]
    pub fn connect(config: ClientConfig) -> Result<Self, GeoProxyError> {
        let channel = crate::channel::GrpcChannel::connect(&config.address, config.timeout)?;
        Ok(Self::with_channel(channel, config))
    }

    /// Connects to the service at `GEOMETRY_SERVICE_HOST`, or `localhost:8980`.
    #[cfg(feature = "grpc")]
    pub fn from_env() -> Result<Self, GeoProxyError> {
        Self::connect(ClientConfig::from_env())
    }

    /// Creates a client using the given channel.
    pub fn with_channel(channel: impl GeometryChannel + 'static, config: ClientConfig) -> Self {
        Self {
            channel: Box::new(channel),
            config,
        }
    }

    /// Creates a client evaluating everything in the current process.
    pub fn local() -> Self {
        Self::with_channel(LocalChannel::new(), ClientConfig::default())
    }

    /// Replaces the channel, returning the previous one.
    pub fn replace_channel(
        &mut self,
        channel: Box<dyn GeometryChannel>,
    ) -> Box<dyn GeometryChannel> {
        std::mem::replace(&mut self.channel, channel)
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a request and decodes the response into the operator's result shape.
    pub fn execute(&self, request: &OperatorRequest) -> Result<OperatorResponse, GeoProxyError> {
        let message = request.to_proto()?;
        log::debug!(
            "Dispatching {} with result in {}",
            request.operator().name(),
            request.output_spatial_reference()
        );

        let response = self.channel.operate(message, self.config.timeout)?;
        OperatorResponse::from_proto(&response, request.operator().result_shape())
    }

    fn run(&self, builder: RequestBuilder) -> Result<OperatorResponse, GeoProxyError> {
        self.execute(&builder.build()?)
    }

    fn run_geometry(&self, builder: RequestBuilder) -> Result<GeometryValue, GeoProxyError> {
        self.run(builder)?.into_geometry()
    }

    /// Buffer by a distance in meters, measured on the ellipsoid.
    pub fn buffer(
        &self,
        value: &GeometryValue,
        distance_m: f64,
    ) -> Result<GeometryValue, GeoProxyError> {
        self.run_geometry(OperatorRequest::unary(
            Operator::GeodesicBuffer { distance_m },
            value,
        ))
    }

    /// Buffer by a distance in units of the operation spatial reference (the value's own if not
    /// given).
    pub fn planar_buffer(
        &self,
        value: &GeometryValue,
        distance: f64,
        operation_sr: Option<SpatialReference>,
    ) -> Result<GeometryValue, GeoProxyError> {
        self.run_geometry(
            OperatorRequest::unary(Operator::Buffer { distance }, value)
                .operation_spatial_reference(operation_sr),
        )
    }

    /// Reprojects the value. Returns the value itself if it is already in the target spatial
    /// reference.
    pub fn project<'a>(
        &self,
        value: &'a GeometryValue,
        to: &SpatialReference,
    ) -> Result<Cow<'a, GeometryValue>, GeoProxyError> {
        if value.spatial_reference() == to {
            return Ok(Cow::Borrowed(value));
        }

        let projected = self.run_geometry(OperatorRequest::unary(
            Operator::Project { to: to.clone() },
            value,
        ))?;
        Ok(Cow::Owned(projected))
    }

    #[allow(missing_docs)]
    pub fn simplify(
        &self,
        value: &GeometryValue,
        tolerance: f64,
        preserve_topology: bool,
    ) -> Result<GeometryValue, GeoProxyError> {
        self.run_geometry(OperatorRequest::unary(
            Operator::Simplify {
                tolerance,
                preserve_topology,
            },
            value,
        ))
    }

    #[allow(missing_docs)]
    pub fn convex_hull(&self, value: &GeometryValue) -> Result<GeometryValue, GeoProxyError> {
        self.run_geometry(OperatorRequest::unary(Operator::ConvexHull, value))
    }

    /// Removes the vertices contributing the least area.
    pub fn generalize(
        &self,
        value: &GeometryValue,
        params: GeneralizeParams,
    ) -> Result<GeometryValue, GeoProxyError> {
        self.run_geometry(OperatorRequest::unary(
            Operator::GeneralizeByArea(params),
            value,
        ))
    }

    /// Inserts vertices so no segment is longer than `max_length`. The geodetic variant measures
    /// in meters along geodesics.
    pub fn densify(
        &self,
        value: &GeometryValue,
        max_length: f64,
        geodetic: bool,
    ) -> Result<GeometryValue, GeoProxyError> {
        if !matches!(value.kind(), GeometryKind::Polygon | GeometryKind::LineString) {
            return Err(GeoProxyError::InvalidRequest(format!(
                "densify is supported only for polygons or line strings, got {}",
                value.kind()
            )));
        }

        let operator = if geodetic {
            Operator::GeodeticDensifyByLength {
                max_length_m: max_length,
            }
        } else {
            Operator::DensifyByLength { max_length }
        };
        self.run_geometry(OperatorRequest::unary(operator, value))
    }

    /// Random points inside a polygon.
    pub fn random_points(
        &self,
        value: &GeometryValue,
        points_per_square_km: f64,
        seed: Option<u64>,
    ) -> Result<GeometryValue, GeoProxyError> {
        if !matches!(
            value.kind(),
            GeometryKind::Polygon | GeometryKind::MultiPolygon
        ) {
            return Err(GeoProxyError::InvalidRequest(format!(
                "random points are supported only for polygons or multipolygons, got {}",
                value.kind()
            )));
        }

        self.run_geometry(OperatorRequest::unary(
            Operator::RandomPoints {
                points_per_square_km,
                seed,
            },
            value,
        ))
    }

    /// Area on the ellipsoid in square meters.
    pub fn area(&self, value: &GeometryValue) -> Result<f64, GeoProxyError> {
        self.run(OperatorRequest::unary(Operator::GeodeticArea, value))?
            .into_measure()
    }

    /// Area in units of the value's spatial reference, computed locally.
    pub fn planar_area(&self, value: &GeometryValue) -> Result<f64, GeoProxyError> {
        Ok(value.local().area()?)
    }

    /// Length on the ellipsoid in meters.
    pub fn length(&self, value: &GeometryValue) -> Result<f64, GeoProxyError> {
        self.run(OperatorRequest::unary(Operator::GeodeticLength, value))?
            .into_measure()
    }

    /// Length in units of the value's spatial reference, computed locally.
    pub fn planar_length(&self, value: &GeometryValue) -> Result<f64, GeoProxyError> {
        Ok(value.local().length()?)
    }

    /// Distance in meters, measured on an equal-area plane centred between the geometries.
    pub fn distance(&self, a: &GeometryValue, b: &GeometryValue) -> Result<f64, GeoProxyError> {
        let a_geographic = self.project(a, &SpatialReference::WGS84)?;
        let b_geographic = self.project(b, &SpatialReference::WGS84)?;
        let both = GeometryCollection::new_from(vec![
            a_geographic.geometry(),
            b_geographic.geometry(),
        ]);
        let centre = GeometryValue::from_geo(
            Geometry::GeometryCollection(both),
            SpatialReference::WGS84,
        )?
        .local()
        .centroid()?;
        let Shape::Point(Point(centre)) = centre.shape() else {
            return Err(GeoProxyError::InvalidRequest(
                "cannot find the centre of the operands".into(),
            ));
        };

        self.planar_distance(a, b, Some(SpatialReference::custom(centre.x, centre.y)))
    }

    /// Distance in units of the operation spatial reference.
    pub fn planar_distance(
        &self,
        a: &GeometryValue,
        b: &GeometryValue,
        operation_sr: Option<SpatialReference>,
    ) -> Result<f64, GeoProxyError> {
        self.run(
            OperatorRequest::binary(Operator::Distance, a, b)
                .operation_spatial_reference(operation_sr),
        )?
        .into_measure()
    }

    /// Union of one or two geometries.
    ///
    /// Without a right operand the left one is returned as is, or reprojected into the result
    /// spatial reference if one is given.
    pub fn union<'a>(
        &self,
        a: &'a GeometryValue,
        b: Option<&GeometryValue>,
        operation_sr: Option<SpatialReference>,
        result_sr: Option<SpatialReference>,
    ) -> Result<Cow<'a, GeometryValue>, GeoProxyError> {
        let Some(b) = b else {
            return match result_sr {
                Some(result_sr) => self.project(a, &result_sr),
                None => Ok(Cow::Borrowed(a)),
            };
        };

        let union = self.run_geometry(
            OperatorRequest::binary(Operator::Union, a, b)
                .operation_spatial_reference(operation_sr)
                .result_spatial_reference(result_sr),
        )?;
        Ok(Cow::Owned(union))
    }

    #[allow(missing_docs)]
    pub fn intersection(
        &self,
        a: &GeometryValue,
        b: &GeometryValue,
        operation_sr: Option<SpatialReference>,
    ) -> Result<GeometryValue, GeoProxyError> {
        self.set_operation(Operator::Intersection, a, b, operation_sr)
    }

    #[allow(missing_docs)]
    pub fn difference(
        &self,
        a: &GeometryValue,
        b: &GeometryValue,
        operation_sr: Option<SpatialReference>,
    ) -> Result<GeometryValue, GeoProxyError> {
        self.set_operation(Operator::Difference, a, b, operation_sr)
    }

    #[allow(missing_docs)]
    pub fn symmetric_difference(
        &self,
        a: &GeometryValue,
        b: &GeometryValue,
        operation_sr: Option<SpatialReference>,
    ) -> Result<GeometryValue, GeoProxyError> {
        self.set_operation(Operator::SymmetricDifference, a, b, operation_sr)
    }

    fn set_operation(
        &self,
        operator: Operator,
        a: &GeometryValue,
        b: &GeometryValue,
        operation_sr: Option<SpatialReference>,
    ) -> Result<GeometryValue, GeoProxyError> {
        self.run_geometry(
            OperatorRequest::binary(operator, a, b).operation_spatial_reference(operation_sr),
        )
    }

    /// Evaluates a boolean spatial predicate such as [`Operator::Touches`].
    pub fn relationship(
        &self,
        operator: Operator,
        a: &GeometryValue,
        b: &GeometryValue,
        operation_sr: Option<SpatialReference>,
    ) -> Result<bool, GeoProxyError> {
        self.run(OperatorRequest::binary(operator, a, b).operation_spatial_reference(operation_sr))?
            .into_relationship()
    }

    #[allow(missing_docs)]
    pub fn equals(&self, a: &GeometryValue, b: &GeometryValue) -> Result<bool, GeoProxyError> {
        self.relationship(Operator::Equals, a, b, None)
    }

    #[allow(missing_docs)]
    pub fn contains(&self, a: &GeometryValue, b: &GeometryValue) -> Result<bool, GeoProxyError> {
        self.relationship(Operator::Contains, a, b, None)
    }

    #[allow(missing_docs)]
    pub fn within(&self, a: &GeometryValue, b: &GeometryValue) -> Result<bool, GeoProxyError> {
        self.relationship(Operator::Within, a, b, None)
    }

    #[allow(missing_docs)]
    pub fn touches(&self, a: &GeometryValue, b: &GeometryValue) -> Result<bool, GeoProxyError> {
        self.relationship(Operator::Touches, a, b, None)
    }

    #[allow(missing_docs)]
    pub fn overlaps(&self, a: &GeometryValue, b: &GeometryValue) -> Result<bool, GeoProxyError> {
        self.relationship(Operator::Overlaps, a, b, None)
    }

    #[allow(missing_docs)]
    pub fn crosses(&self, a: &GeometryValue, b: &GeometryValue) -> Result<bool, GeoProxyError> {
        self.relationship(Operator::Crosses, a, b, None)
    }

    #[allow(missing_docs)]
    pub fn disjoint(&self, a: &GeometryValue, b: &GeometryValue) -> Result<bool, GeoProxyError> {
        self.relationship(Operator::Disjoint, a, b, None)
    }

    #[allow(missing_docs)]
    pub fn intersects(&self, a: &GeometryValue, b: &GeometryValue) -> Result<bool, GeoProxyError> {
        self.relationship(Operator::Intersects, a, b, None)
    }

    /// DE-9IM matrix of two geometries.
    pub fn relate(&self, a: &GeometryValue, b: &GeometryValue) -> Result<String, GeoProxyError> {
        self.run(OperatorRequest::binary(
            Operator::Relate { pattern: None },
            a,
            b,
        ))?
        .into_relate_matrix()
    }

    /// Checks the DE-9IM matrix of two geometries against a pattern.
    pub fn relate_pattern(
        &self,
        a: &GeometryValue,
        b: &GeometryValue,
        pattern: &str,
    ) -> Result<bool, GeoProxyError> {
        if pattern.is_empty() {
            return Err(GeoProxyError::InvalidRequest(
                "relate pattern must not be empty".into(),
            ));
        }

        self.run(OperatorRequest::binary(
            Operator::Relate {
                pattern: Some(pattern.to_string()),
            },
            a,
            b,
        ))?
        .into_relationship()
    }

    /// Azimuths and distance between two points on the ellipsoid.
    pub fn geodetic_inverse(
        &self,
        a: &GeometryValue,
        b: &GeometryValue,
    ) -> Result<GeodeticInverse, GeoProxyError> {
        if a.kind() != GeometryKind::Point || b.kind() != GeometryKind::Point {
            return Err(GeoProxyError::InvalidRequest(
                "geodetic inverse is supported only for points".into(),
            ));
        }

        self.run(OperatorRequest::binary(Operator::GeodeticInverse, a, b))?
            .into_geodetic_inverse()
    }

    /// Shifts the geometry. The geodetic variant takes offsets in meters on an equal-area plane
    /// centred at the geometry.
    pub fn translate(
        &self,
        value: &GeometryValue,
        x_offset: f64,
        y_offset: f64,
        geodetic: bool,
    ) -> Result<GeometryValue, GeoProxyError> {
        let mut builder =
            OperatorRequest::unary(Operator::AffineTransform { x_offset, y_offset }, value);
        if geodetic {
            let centre = self
                .project(value, &SpatialReference::WGS84)?
                .local()
                .centroid()?;
            let Geometry::Point(Point(centre)) = centre.geometry() else {
                return Err(GeoProxyError::InvalidRequest(format!(
                    "cannot find the centre of {}",
                    value.kind()
                )));
            };
            builder = builder
                .operation_spatial_reference(SpatialReference::custom(centre.x, centre.y))
                .result_spatial_reference(value.spatial_reference().clone());
        }

        self.run_geometry(builder)
    }

    /// Unions any number of geometries in batches of the configured size.
    pub fn union_all(
        &self,
        geometries: impl IntoIterator<Item = GeometryValue>,
    ) -> Result<GeometryValue, GeoProxyError> {
        BatchingUnion::new(
            self.channel.as_ref(),
            self.config.batch_size,
            self.config.timeout,
        )
        .run(geometries)
    }

    /// Unions geometries and generalizes the result.
    pub fn union_all_generalized(
        &self,
        geometries: impl IntoIterator<Item = GeometryValue>,
        params: GeneralizeParams,
    ) -> Result<GeometryValue, GeoProxyError> {
        let union = self.union_all(geometries)?;
        self.generalize(&union, params)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;
    use geoproxy_proto::{GeometryRequest, GeometryResponse};
    use geoproxy_types::geo::CoordsIter;

    use super::*;

    struct CountingChannel {
        inner: LocalChannel,
        calls: Arc<AtomicUsize>,
    }

    impl GeometryChannel for CountingChannel {
        fn operate(
            &self,
            request: GeometryRequest,
            timeout: Duration,
        ) -> Result<GeometryResponse, GeoProxyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.operate(request, timeout)
        }

        fn operate_client_stream(
            &self,
            requests: Vec<GeometryRequest>,
            timeout: Duration,
        ) -> Result<GeometryResponse, GeoProxyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.operate_client_stream(requests, timeout)
        }
    }

    struct FailingChannel;

    impl GeometryChannel for FailingChannel {
        fn operate(
            &self,
            _request: GeometryRequest,
            _timeout: Duration,
        ) -> Result<GeometryResponse, GeoProxyError> {
            Err(GeoProxyError::Service(
                "geometry engine failure: self-intersection at (1, 1)".into(),
            ))
        }

        fn operate_client_stream(
            &self,
            _requests: Vec<GeometryRequest>,
            _timeout: Duration,
        ) -> Result<GeometryResponse, GeoProxyError> {
            Err(GeoProxyError::Transport("connection refused".into()))
        }
    }

    fn counting_client() -> (GeometryClient, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = GeometryClient::with_channel(
            CountingChannel {
                inner: LocalChannel::new(),
                calls: calls.clone(),
            },
            ClientConfig::default(),
        );
        (client, calls)
    }

    fn wkt(text: &str, sr: SpatialReference) -> GeometryValue {
        GeometryValue::from_wkt(text, sr).unwrap()
    }

    fn coords(value: &GeometryValue) -> Vec<(f64, f64)> {
        value
            .geometry()
            .coords_iter()
            .map(|c| (c.x, c.y))
            .collect()
    }

    #[test]
    fn project_utm_to_wgs84() {
        let client = GeometryClient::local();
        let utm = wkt(
            "MULTIPOINT(500000 0,400000 100000,600000 -100000)",
            SpatialReference::Code(32632),
        );
        let projected = client.project(&utm, &SpatialReference::WGS84).unwrap();
        assert_eq!(projected.spatial_reference(), &SpatialReference::WGS84);

        let expected = [
            (9.0, 0.0),
            (8.101251062924646, 0.904618578893133),
            (9.898748937075354, -0.904618578893133),
        ];
        for ((x, y), (ex, ey)) in coords(&projected).into_iter().zip(expected) {
            assert_abs_diff_eq!(x, ex, epsilon = 1e-7);
            assert_abs_diff_eq!(y, ey, epsilon = 1e-7);
        }
    }

    #[test]
    fn project_utm_line_to_wgs84() {
        let client = GeometryClient::local();
        let expected = [
            (9.0, 0.0),
            (8.101251062924646, 0.904618578893133),
            (9.898748937075354, -0.904618578893133),
        ];

        let line = wkt(
            "LINESTRING(500000 0,400000 100000,600000 -100000)",
            SpatialReference::Code(32632),
        );
        let projected = client.project(&line, &SpatialReference::WGS84).unwrap();
        assert_eq!(projected.kind(), GeometryKind::LineString);
        for ((x, y), (ex, ey)) in coords(&projected).into_iter().zip(expected) {
            assert_abs_diff_eq!(x, ex, epsilon = 1e-9);
            assert_abs_diff_eq!(y, ey, epsilon = 1e-9);
        }

        let multi = wkt(
            "MULTILINESTRING((500000 0,400000 100000,600000 -100000))",
            SpatialReference::Code(32632),
        );
        let projected = client.project(&multi, &SpatialReference::WGS84).unwrap();
        assert_eq!(projected.kind(), GeometryKind::MultiLineString);
        assert_eq!(coords(&projected).len(), 3);
        for ((x, y), (ex, ey)) in coords(&projected).into_iter().zip(expected) {
            assert_abs_diff_eq!(x, ex, epsilon = 1e-9);
            assert_abs_diff_eq!(y, ey, epsilon = 1e-9);
        }
    }

    #[test]
    fn project_to_same_reference_is_identity() {
        let (client, calls) = counting_client();
        let value = wkt("POINT(1 2)", SpatialReference::WGS84);
        let projected = client.project(&value, &SpatialReference::WGS84).unwrap();
        assert_matches!(projected, Cow::Borrowed(v) if std::ptr::eq(v, &value));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn nested_projection_round_trip() {
        let client = GeometryClient::local();
        let original = wkt(
            "LINESTRING(9.1 45.2,9.4 45.5,10.2 44.9)",
            SpatialReference::WGS84,
        );
        let request = OperatorRequest::unary(
            Operator::Project {
                to: SpatialReference::Code(32632),
            },
            &original,
        )
        .build()
        .unwrap()
        .then(Operator::Project {
            to: SpatialReference::WGS84,
        })
        .build()
        .unwrap();

        let result = client.execute(&request).unwrap().into_geometry().unwrap();
        for ((x, y), (ox, oy)) in coords(&result).into_iter().zip(coords(&original)) {
            assert_abs_diff_eq!(x, ox, epsilon = 1e-7);
            assert_abs_diff_eq!(y, oy, epsilon = 1e-7);
        }
    }

    #[test]
    fn differing_references_default_to_left() {
        let _ = env_logger::builder().is_test(true).try_init();
        let client = GeometryClient::local();
        let a = wkt(
            "POLYGON((9 0,9.01 0,9.01 0.01,9 0.01,9 0))",
            SpatialReference::WGS84,
        );
        let b = wkt(
            "POLYGON((500000 0,501000 0,501000 1000,500000 1000,500000 0))",
            SpatialReference::Code(32632),
        );
        let union = client.union(&a, Some(&b), None, None).unwrap();
        assert_eq!(union.spatial_reference(), &SpatialReference::WGS84);
    }

    #[test]
    fn mixed_locality_fails_before_dispatch() {
        let (client, calls) = counting_client();
        let a = wkt("POINT(0 0)", SpatialReference::custom(9.0, 45.0));
        let b = wkt("POINT(9 45)", SpatialReference::WGS84);

        let err = client.intersection(&a, &b, None).unwrap_err();
        assert!(err.to_string().contains("local or neither"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // explicit operation reference resolves it
        let area = wkt(
            "POLYGON((8 44,10 44,10 46,8 46,8 44))",
            SpatialReference::WGS84,
        );
        assert!(client
            .relationship(
                Operator::Intersects,
                &a,
                &area,
                Some(SpatialReference::WGS84)
            )
            .unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn union_without_right_operand() {
        let (client, calls) = counting_client();
        let value = wkt("POINT(9 0)", SpatialReference::WGS84);

        let same = client.union(&value, None, None, None).unwrap();
        assert_matches!(same, Cow::Borrowed(_));

        let projected = client
            .union(&value, None, None, Some(SpatialReference::Code(32632)))
            .unwrap();
        assert_eq!(projected.spatial_reference(), &SpatialReference::Code(32632));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn buffer_of_triangle() {
        let client = GeometryClient::local();
        let triangle = wkt(
            "POLYGON((0 0,1 1,1 0,0 0))",
            SpatialReference::WEB_MERCATOR,
        );
        let buffered = client.planar_buffer(&triangle, 1.2, None).unwrap();
        assert!(buffered.local().contains(&triangle).unwrap());

        let expected = 0.5 + 1.2 * (2.0 + 2f64.sqrt()) + std::f64::consts::PI * 1.2 * 1.2;
        assert_abs_diff_eq!(
            client.planar_area(&buffered).unwrap(),
            expected,
            epsilon = 0.01
        );
    }

    #[test]
    fn geodetic_measures() {
        let client = GeometryClient::local();
        let meridian = wkt("LINESTRING(0 0,0 1)", SpatialReference::WGS84);
        assert_relative_eq!(client.length(&meridian).unwrap(), 110_574.4, epsilon = 1.0);

        let a = wkt("POINT(0 0)", SpatialReference::WGS84);
        let b = wkt("POINT(0.01 0)", SpatialReference::WGS84);
        assert_abs_diff_eq!(client.distance(&a, &b).unwrap(), 1113.19, epsilon = 0.5);

        let north = wkt("POINT(10 50)", SpatialReference::WGS84);
        let north_east = wkt("POINT(10.01 50)", SpatialReference::WGS84);
        assert_abs_diff_eq!(
            client.distance(&north, &north_east).unwrap(),
            client.geodetic_inverse(&north, &north_east).unwrap().distance,
            epsilon = 0.5
        );

        let inverse = client.geodetic_inverse(&a, &b).unwrap();
        assert_relative_eq!(inverse.az12, 90.0, epsilon = 1e-6);
        assert_relative_eq!(inverse.distance, 1113.2, max_relative = 0.01);
    }

    #[test]
    fn set_operations_on_lines() {
        let client = GeometryClient::local();
        let road = wkt("LINESTRING(-1 1,3 1)", SpatialReference::WEB_MERCATOR);
        let parcel = wkt("POLYGON((0 0,2 0,2 2,0 2,0 0))", SpatialReference::WEB_MERCATOR);

        let inside = client.intersection(&road, &parcel, None).unwrap();
        assert_eq!(inside.kind(), GeometryKind::LineString);
        assert_abs_diff_eq!(client.planar_length(&inside).unwrap(), 2.0, epsilon = 1e-6);

        let lanes = (0..4).map(|i| {
            wkt(
                &format!("LINESTRING(0 {i},10 {i})"),
                SpatialReference::WEB_MERCATOR,
            )
        });
        let union = client.union_all(lanes).unwrap();
        assert_eq!(union.kind(), GeometryKind::MultiLineString);
        assert_abs_diff_eq!(client.planar_length(&union).unwrap(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_relate_pattern_asks_for_matrix() {
        let (client, calls) = counting_client();
        let a = wkt("POLYGON((0 0,4 0,4 4,0 4,0 0))", SpatialReference::WEB_MERCATOR);
        let b = wkt("POINT(1 1)", SpatialReference::WEB_MERCATOR);

        let request = OperatorRequest::binary(
            Operator::Relate {
                pattern: Some(String::new()),
            },
            &a,
            &b,
        )
        .build()
        .unwrap();
        let matrix = client.execute(&request).unwrap().into_relate_matrix().unwrap();
        assert_eq!(matrix, "0F2FF1FF2");

        assert_matches!(
            client.relate_pattern(&a, &b, ""),
            Err(GeoProxyError::InvalidRequest(_))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn service_message_is_verbatim() {
        let client = GeometryClient::with_channel(FailingChannel, ClientConfig::default());
        let value = wkt("POINT(1 1)", SpatialReference::WGS84);
        let err = client.convex_hull(&value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "geometry engine failure: self-intersection at (1, 1)"
        );

        assert_matches!(
            client.union_all(vec![value.clone(), value]),
            Err(GeoProxyError::Transport(_))
        );
    }

    #[test]
    fn type_restrictions_are_checked_locally() {
        let (client, calls) = counting_client();
        let point = wkt("POINT(1 1)", SpatialReference::WGS84);
        assert_matches!(
            client.densify(&point, 1.0, false),
            Err(GeoProxyError::InvalidRequest(_))
        );
        assert_matches!(
            client.random_points(&point, 1.0, Some(1)),
            Err(GeoProxyError::InvalidRequest(_))
        );
        assert_matches!(
            client.geodetic_inverse(&point, &wkt("LINESTRING(0 0,1 1)", SpatialReference::WGS84)),
            Err(GeoProxyError::InvalidRequest(_))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn densify_line() {
        let client = GeometryClient::local();
        let line = wkt("LINESTRING(0 0,10 0)", SpatialReference::WEB_MERCATOR);
        let dense = client.densify(&line, 2.5, false).unwrap();
        assert_eq!(dense.geometry().coords_count(), 5);
    }

    #[test]
    fn geodetic_translate_keeps_reference() {
        let client = GeometryClient::local();
        let point = wkt("POINT(10 50)", SpatialReference::WGS84);
        let moved = client.translate(&point, 0.0, 1000.0, true).unwrap();
        assert_eq!(moved.spatial_reference(), &SpatialReference::WGS84);
        let inverse = client.geodetic_inverse(&point, &moved).unwrap();
        assert_relative_eq!(inverse.distance, 1000.0, max_relative = 1e-3);
    }

    #[test]
    fn union_all_generalized() {
        let client = GeometryClient::local();
        let squares = (0..5).map(|i| {
            let x = i as f64;
            wkt(
                &format!("POLYGON(({x} 0,{} 0,{} 1,{x} 1,{x} 0))", x + 1.0, x + 1.0),
                SpatialReference::WEB_MERCATOR,
            )
        });
        let union = client
            .union_all_generalized(squares, GeneralizeParams::percent(0.0))
            .unwrap();
        assert_relative_eq!(client.planar_area(&union).unwrap(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn replace_channel() {
        let mut client = GeometryClient::local();
        let previous = client.replace_channel(Box::new(FailingChannel));
        let value = wkt("MULTIPOINT(0 0,1 0,0 1)", SpatialReference::WGS84);
        assert!(client.convex_hull(&value).is_err());

        client.replace_channel(previous);
        assert_eq!(
            client.convex_hull(&value).unwrap().kind(),
            GeometryKind::Polygon
        );
    }

    #[test]
    fn geodetic_midpoint_is_not_implemented() {
        let a = wkt("POINT(0 0)", SpatialReference::WGS84);
        let b = wkt("POINT(2 2)", SpatialReference::WGS84);
        assert_matches!(
            a.local().midpoint(&b, true),
            Err(geoproxy_types::GeoProxyTypesError::NotImplemented(_))
        );
        assert_eq!(
            a.local().midpoint(&b, false).unwrap().to_wkt().unwrap(),
            "POINT(1 1)"
        );
    }
}
