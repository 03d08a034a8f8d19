use geo::orient::{Direction, Orient};
use geo::{Bearing, Distance, Geodesic, GeodesicArea, Geometry, MultiPolygon, Point, Polygon};

use super::line_strings;

/// Result of the inverse geodetic problem between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticInverse {
    /// Azimuth from the first point to the second, degrees clockwise from north.
    pub az12: f64,
    /// Azimuth from the second point to the first, degrees clockwise from north.
    pub az21: f64,
    /// Distance on the WGS84 ellipsoid in meters.
    pub distance: f64,
}

/// Area on the WGS84 ellipsoid in square meters. Coordinates are longitude/latitude degrees.
///
/// Rings are reoriented first, since an unsigned area of a clockwise exterior ring is the area
/// of the rest of the ellipsoid.
pub fn geodetic_area(geometry: &Geometry) -> f64 {
    MultiPolygon::new(polygons(geometry))
        .orient(Direction::Default)
        .geodesic_area_unsigned()
}

fn polygons(geometry: &Geometry) -> Vec<Polygon> {
    match geometry {
        Geometry::Polygon(v) => vec![v.clone()],
        Geometry::MultiPolygon(v) => v.0.clone(),
        Geometry::Rect(v) => vec![v.to_polygon()],
        Geometry::Triangle(v) => vec![v.to_polygon()],
        Geometry::GeometryCollection(v) => v.iter().flat_map(polygons).collect(),
        _ => vec![],
    }
}

/// Length (or perimeter) on the WGS84 ellipsoid in meters.
pub fn geodetic_length(geometry: &Geometry) -> f64 {
    line_strings(geometry)
        .iter()
        .flat_map(|line| line.lines())
        .map(|segment| Geodesic.distance(Point(segment.start), Point(segment.end)))
        .sum()
}

/// Solves the inverse geodetic problem.
pub fn geodetic_inverse(from: Point, to: Point) -> GeodeticInverse {
    GeodeticInverse {
        az12: Geodesic.bearing(from, to).rem_euclid(360.0),
        az21: Geodesic.bearing(to, from).rem_euclid(360.0),
        distance: Geodesic.distance(from, to),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{line_string, point, polygon};

    use super::*;

    #[test]
    fn meridian_degree() {
        let line: Geometry = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0)].into();
        assert_relative_eq!(geodetic_length(&line), 110_574.4, epsilon = 1.0);
    }

    #[test]
    fn inverse_along_equator() {
        let result = geodetic_inverse(point!(x: 0.0, y: 0.0), point!(x: 1.0, y: 0.0));
        assert_relative_eq!(result.az12, 90.0, epsilon = 1e-9);
        assert_relative_eq!(result.az21, 270.0, epsilon = 1e-9);
        assert_relative_eq!(result.distance, 111_319.49, epsilon = 0.01);
    }

    #[test]
    fn area_is_positive() {
        let square: Geometry =
            polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0)]
                .into();
        let area = geodetic_area(&square);
        assert!(area > 1.2e10 && area < 1.24e10);
    }

    #[test]
    fn area_ignores_winding() {
        let clockwise: Geometry =
            polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0)]
                .into();
        let counter_clockwise: Geometry =
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)]
                .into();
        assert_relative_eq!(
            geodetic_area(&clockwise),
            geodetic_area(&counter_clockwise),
            max_relative = 1e-9
        );
        assert_relative_eq!(geodetic_area(&clockwise), 12_308_778_361.47, max_relative = 1e-6);

        let with_hole: Geometry = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 0.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0)],
            interiors: [[(x: 0.5, y: 0.5), (x: 1.5, y: 0.5), (x: 1.5, y: 1.5), (x: 0.5, y: 1.5)]],
        )
        .into();
        let outer: Geometry =
            polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)]
                .into();
        assert!(geodetic_area(&with_hole) < geodetic_area(&outer));
        assert_eq!(geodetic_area(&line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into()), 0.0);
    }
}
