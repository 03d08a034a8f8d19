//! Algorithms the geometry service offers beyond the kernel table.

use geo::{Geometry, LineString};

mod densify;
mod generalize;
mod geodetic;
mod random;

pub use densify::{densify, geodetic_densify};
pub use generalize::{generalize_by_area, GeneralizeParams};
pub use geodetic::{geodetic_area, geodetic_inverse, geodetic_length, GeodeticInverse};
pub use random::{random_points, MAX_RANDOM_POINTS};

/// All line strings of a geometry: lines themselves and polygon rings.
pub(crate) fn line_strings(geometry: &Geometry) -> Vec<LineString> {
    match geometry {
        Geometry::Line(v) => vec![(*v).into()],
        Geometry::LineString(v) => vec![v.clone()],
        Geometry::MultiLineString(v) => v.0.clone(),
        Geometry::Polygon(v) => std::iter::once(v.exterior().clone())
            .chain(v.interiors().iter().cloned())
            .collect(),
        Geometry::MultiPolygon(v) => v
            .iter()
            .flat_map(|polygon| {
                std::iter::once(polygon.exterior().clone()).chain(polygon.interiors().iter().cloned())
            })
            .collect(),
        Geometry::Rect(v) => vec![v.to_polygon().exterior().clone()],
        Geometry::Triangle(v) => vec![v.to_polygon().exterior().clone()],
        Geometry::GeometryCollection(v) => v.iter().flat_map(line_strings).collect(),
        Geometry::Point(_) | Geometry::MultiPoint(_) => vec![],
    }
}
