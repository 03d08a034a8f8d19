//! Geometry values: an encoded payload paired with its spatial reference and decoded shape.

use std::fmt::{Display, Formatter};

use bytes::Bytes;
use geo::{BoundingRect, Geometry, HasDimensions, Rect};
use geo_types::{
    GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use geozero::wkb::{Wkb, WkbDialect, WkbWriter};
use geozero::wkt::Wkt;
use geozero::{CoordDimensions, GeomProcessor, GeozeroGeometry, ToGeo, ToWkb, ToWkt};
use serde::{Deserialize, Serialize};

use crate::error::GeoProxyTypesError;
use crate::spatial_reference::SpatialReference;

/// Serialized form of a geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Well-known binary.
    Wkb(Bytes),
    /// Well-known text.
    Wkt(String),
}

impl Payload {
    /// Encoding of the payload.
    pub fn encoding(&self) -> Encoding {
        match self {
            Payload::Wkb(_) => Encoding::Wkb,
            Payload::Wkt(_) => Encoding::Wkt,
        }
    }
}

/// Requested serialization of a geometry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// Well-known binary.
    #[default]
    Wkb,
    /// Well-known text.
    Wkt,
}

/// Coordinate dimensionality of a geometry payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// X and Y.
    #[default]
    Xy,
    /// X, Y and Z.
    Xyz,
}

impl Dimension {
    fn coord_dimensions(&self) -> CoordDimensions {
        match self {
            Dimension::Xy => CoordDimensions::xy(),
            Dimension::Xyz => CoordDimensions::xyz(),
        }
    }
}

/// Name of a geometry variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    #[allow(missing_docs)]
    Point,
    #[allow(missing_docs)]
    LineString,
    #[allow(missing_docs)]
    LinearRing,
    #[allow(missing_docs)]
    Polygon,
    #[allow(missing_docs)]
    MultiPoint,
    #[allow(missing_docs)]
    MultiLineString,
    #[allow(missing_docs)]
    MultiPolygon,
    #[allow(missing_docs)]
    GeometryCollection,
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::LinearRing => "LinearRing",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        };
        write!(f, "{name}")
    }
}

/// Decoded geometry.
///
/// This is a closed set of variants. Every payload is decoded into one of them by
/// [`Shape::from_geo`], so the rest of the crate never needs to inspect type tags.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    #[allow(missing_docs)]
    Point(Point<f64>),
    #[allow(missing_docs)]
    LineString(LineString<f64>),
    /// Closed line string. Encoded on the wire as a line string.
    LinearRing(LineString<f64>),
    #[allow(missing_docs)]
    Polygon(Polygon<f64>),
    #[allow(missing_docs)]
    MultiPoint(MultiPoint<f64>),
    #[allow(missing_docs)]
    MultiLineString(MultiLineString<f64>),
    #[allow(missing_docs)]
    MultiPolygon(MultiPolygon<f64>),
    #[allow(missing_docs)]
    GeometryCollection(GeometryCollection<f64>),
}

impl Shape {
    /// Converts a `geo` geometry into a shape. Lines, rectangles and triangles become line
    /// strings and polygons.
    pub fn from_geo(geometry: Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(v) => Shape::Point(v),
            Geometry::Line(v) => Shape::LineString(v.into()),
            Geometry::LineString(v) => Shape::LineString(v),
            Geometry::Polygon(v) => Shape::Polygon(v),
            Geometry::MultiPoint(v) => Shape::MultiPoint(v),
            Geometry::MultiLineString(v) => Shape::MultiLineString(v),
            Geometry::MultiPolygon(v) => Shape::MultiPolygon(v),
            Geometry::GeometryCollection(v) => Shape::GeometryCollection(v),
            Geometry::Rect(v) => Shape::Polygon(v.to_polygon()),
            Geometry::Triangle(v) => Shape::Polygon(v.to_polygon()),
        }
    }

    /// Creates a linear ring. The line string must be closed and have at least 4 points.
    pub fn linear_ring(line: LineString<f64>) -> Result<Self, GeoProxyTypesError> {
        if !line.is_closed() || line.0.len() < 4 {
            return Err(GeoProxyTypesError::InvalidInput(
                "linear ring must be closed and have at least 4 points".into(),
            ));
        }

        Ok(Shape::LinearRing(line))
    }

    /// Returns the shape as a `geo` geometry.
    pub fn to_geo(&self) -> Geometry<f64> {
        self.clone().into_geo()
    }

    /// Converts the shape into a `geo` geometry.
    pub fn into_geo(self) -> Geometry<f64> {
        match self {
            Shape::Point(v) => v.into(),
            Shape::LineString(v) | Shape::LinearRing(v) => v.into(),
            Shape::Polygon(v) => v.into(),
            Shape::MultiPoint(v) => v.into(),
            Shape::MultiLineString(v) => v.into(),
            Shape::MultiPolygon(v) => v.into(),
            Shape::GeometryCollection(v) => Geometry::GeometryCollection(v),
        }
    }

    /// Variant name.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Shape::Point(_) => GeometryKind::Point,
            Shape::LineString(_) => GeometryKind::LineString,
            Shape::LinearRing(_) => GeometryKind::LinearRing,
            Shape::Polygon(_) => GeometryKind::Polygon,
            Shape::MultiPoint(_) => GeometryKind::MultiPoint,
            Shape::MultiLineString(_) => GeometryKind::MultiLineString,
            Shape::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Shape::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Ordered parts of a multi-part shape. Single-part shapes have no parts.
    pub fn parts(&self) -> Vec<Shape> {
        match self {
            Shape::MultiPoint(v) => v.iter().copied().map(Shape::Point).collect(),
            Shape::MultiLineString(v) => v.iter().cloned().map(Shape::LineString).collect(),
            Shape::MultiPolygon(v) => v.iter().cloned().map(Shape::Polygon).collect(),
            Shape::GeometryCollection(v) => v.iter().cloned().map(Shape::from_geo).collect(),
            _ => vec![],
        }
    }
}

/// Immutable geometry with a spatial reference.
///
/// Keeps the payload it was created from, so exporting in the same encoding returns the exact
/// original bytes (including Z values, which the decoded [`Shape`] does not carry).
#[derive(Debug, Clone)]
pub struct GeometryValue {
    payload: Payload,
    spatial_reference: SpatialReference,
    shape: Shape,
    dimension: Dimension,
    first_z: Option<f64>,
}

impl GeometryValue {
    /// Decodes a well-known binary payload.
    pub fn from_wkb(
        wkb: impl Into<Bytes>,
        spatial_reference: SpatialReference,
    ) -> Result<Self, GeoProxyTypesError> {
        Self::from_payload(Payload::Wkb(wkb.into()), spatial_reference)
    }

    /// Decodes a well-known text payload.
    pub fn from_wkt(
        wkt: impl Into<String>,
        spatial_reference: SpatialReference,
    ) -> Result<Self, GeoProxyTypesError> {
        Self::from_payload(Payload::Wkt(wkt.into()), spatial_reference)
    }

    /// Decodes a payload.
    pub fn from_payload(
        payload: Payload,
        spatial_reference: SpatialReference,
    ) -> Result<Self, GeoProxyTypesError> {
        let mut scan = DimensionScan::default();
        let geometry = match &payload {
            Payload::Wkb(bytes) => {
                let wkb = Wkb(bytes.to_vec());
                wkb.process_geom(&mut scan).map_err(decode_error)?;
                wkb.to_geo().map_err(decode_error)?
            }
            Payload::Wkt(text) => {
                let wkt = Wkt(text.clone());
                wkt.process_geom(&mut scan).map_err(decode_error)?;
                wkt.to_geo().map_err(decode_error)?
            }
        };

        Ok(Self {
            payload,
            spatial_reference,
            shape: Shape::from_geo(geometry),
            dimension: if scan.has_z {
                Dimension::Xyz
            } else {
                Dimension::Xy
            },
            first_z: scan.first_z,
        })
    }

    /// Creates a 2D value from a `geo` geometry, encoded as WKB.
    pub fn from_geo(
        geometry: impl Into<Geometry<f64>>,
        spatial_reference: SpatialReference,
    ) -> Result<Self, GeoProxyTypesError> {
        Self::from_shape(Shape::from_geo(geometry.into()), spatial_reference)
    }

    /// Creates a 2D value from a shape, encoded as WKB.
    pub fn from_shape(
        shape: Shape,
        spatial_reference: SpatialReference,
    ) -> Result<Self, GeoProxyTypesError> {
        let wkb = shape
            .to_geo()
            .to_wkb(CoordDimensions::xy())
            .map_err(|err| GeoProxyTypesError::Encode(err.to_string()))?;

        Ok(Self {
            payload: Payload::Wkb(wkb.into()),
            spatial_reference,
            shape,
            dimension: Dimension::Xy,
            first_z: None,
        })
    }

    /// Creates a 3D point.
    pub fn point_z(
        x: f64,
        y: f64,
        z: f64,
        spatial_reference: SpatialReference,
    ) -> Result<Self, GeoProxyTypesError> {
        let mut wkb = Vec::with_capacity(29);
        {
            let mut writer = WkbWriter::with_opts(
                &mut wkb,
                WkbDialect::Wkb,
                CoordDimensions::xyz(),
                None,
                vec![],
            );
            writer
                .point_begin(0)
                .and_then(|_| writer.coordinate(x, y, Some(z), None, None, None, 0))
                .and_then(|_| writer.point_end(0))
                .map_err(|err| GeoProxyTypesError::Encode(err.to_string()))?;
        }

        Self::from_wkb(wkb, spatial_reference)
    }

    /// Payload the value was created from.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Spatial reference of the coordinates.
    pub fn spatial_reference(&self) -> &SpatialReference {
        &self.spatial_reference
    }

    /// Decoded shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Decoded shape as a `geo` geometry.
    pub fn geometry(&self) -> Geometry<f64> {
        self.shape.to_geo()
    }

    /// Variant name.
    pub fn kind(&self) -> GeometryKind {
        self.shape.kind()
    }

    /// Coordinate dimensionality of the payload.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Z value of a 3D point.
    pub fn z(&self) -> Option<f64> {
        match (&self.shape, self.dimension) {
            (Shape::Point(_), Dimension::Xyz) => self.first_z,
            _ => None,
        }
    }

    /// Returns true if the geometry has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.shape.to_geo().is_empty()
    }

    /// Fails with [`GeoProxyTypesError::EmptyGeometry`] if the geometry is empty.
    pub fn ensure_not_empty(&self, operation: &str) -> Result<(), GeoProxyTypesError> {
        if self.is_empty() {
            return Err(GeoProxyTypesError::EmptyGeometry(operation.to_string()));
        }

        Ok(())
    }

    /// Bounding rectangle of the geometry.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.shape.to_geo().bounding_rect()
    }

    /// Ordered parts of a multi-part geometry, each carrying this value's spatial reference.
    pub fn parts(&self) -> Result<Vec<GeometryValue>, GeoProxyTypesError> {
        self.shape
            .parts()
            .into_iter()
            .map(|part| GeometryValue::from_shape(part, self.spatial_reference.clone()))
            .collect()
    }

    /// Serializes the geometry in the given encoding.
    ///
    /// When the requested encoding matches the original payload, the payload is returned as is.
    pub fn encode(&self, encoding: Encoding) -> Result<Payload, GeoProxyTypesError> {
        if self.payload.encoding() == encoding {
            return Ok(self.payload.clone());
        }

        let dims = self.dimension.coord_dimensions();
        let encoded = match (&self.payload, encoding) {
            (Payload::Wkt(text), Encoding::Wkb) => Wkt(text.clone())
                .to_wkb(dims)
                .map(|wkb| Payload::Wkb(wkb.into())),
            (Payload::Wkb(bytes), Encoding::Wkt) => Wkb(bytes.to_vec())
                .to_wkt_ndim(dims)
                .map(Payload::Wkt),
            _ => return Ok(self.payload.clone()),
        };

        encoded.map_err(|err| GeoProxyTypesError::Encode(err.to_string()))
    }

    /// Well-known binary representation.
    pub fn to_wkb(&self) -> Result<Bytes, GeoProxyTypesError> {
        match self.encode(Encoding::Wkb)? {
            Payload::Wkb(bytes) => Ok(bytes),
            Payload::Wkt(_) => Err(GeoProxyTypesError::Encode("expected WKB output".into())),
        }
    }

    /// Well-known text representation.
    pub fn to_wkt(&self) -> Result<String, GeoProxyTypesError> {
        match self.encode(Encoding::Wkt)? {
            Payload::Wkt(text) => Ok(text),
            Payload::Wkb(_) => Err(GeoProxyTypesError::Encode("expected WKT output".into())),
        }
    }
}

impl PartialEq for GeometryValue {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.spatial_reference == other.spatial_reference
            && self.dimension == other.dimension
    }
}

impl Display for GeometryValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.shape.to_geo().to_wkt() {
            Ok(wkt) => write!(f, "{wkt} ({})", self.spatial_reference),
            Err(_) => write!(f, "{} ({})", self.kind(), self.spatial_reference),
        }
    }
}

fn decode_error(err: geozero::error::GeozeroError) -> GeoProxyTypesError {
    GeoProxyTypesError::Decode(err.to_string())
}

/// Reads coordinate dimensions of a payload without building a geometry.
#[derive(Default)]
struct DimensionScan {
    has_z: bool,
    first_z: Option<f64>,
}

impl GeomProcessor for DimensionScan {
    fn dimensions(&self) -> CoordDimensions {
        CoordDimensions::xyz()
    }

    fn coordinate(
        &mut self,
        _x: f64,
        _y: f64,
        z: Option<f64>,
        _m: Option<f64>,
        _t: Option<f64>,
        _tm: Option<u64>,
        _idx: usize,
    ) -> geozero::error::Result<()> {
        if let Some(z) = z {
            self.has_z = true;
            self.first_z.get_or_insert(z);
        }
        Ok(())
    }
}
