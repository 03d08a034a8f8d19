use geo::{Coord, Distance, Geodesic, Geometry, InterpolatePoint, LineString, Point, Polygon};

use crate::error::GeoProxyTypesError;

/// Inserts vertices so that no segment is longer than `max_length` coordinate units.
///
/// Only line strings and polygons can be densified.
pub fn densify(geometry: &Geometry, max_length: f64) -> Result<Geometry, GeoProxyTypesError> {
    apply(geometry, max_length, &move |a: Coord, b: Coord| {
        let length = (b.x - a.x).hypot(b.y - a.y);
        let count = segment_count(length, max_length);
        (1..count)
            .map(|i| {
                let ratio = i as f64 / count as f64;
                Coord {
                    x: a.x + (b.x - a.x) * ratio,
                    y: a.y + (b.y - a.y) * ratio,
                }
            })
            .collect()
    })
}

/// Inserts points along geodesics so that no segment is longer than `max_length` meters.
/// Coordinates are longitude/latitude degrees.
pub fn geodetic_densify(
    geometry: &Geometry,
    max_length: f64,
) -> Result<Geometry, GeoProxyTypesError> {
    apply(geometry, max_length, &move |a: Coord, b: Coord| {
        let (start, end) = (Point(a), Point(b));
        let count = segment_count(Geodesic.distance(start, end), max_length);
        (1..count)
            .map(|i| {
                Geodesic
                    .point_at_ratio_between(start, end, i as f64 / count as f64)
                    .0
            })
            .collect()
    })
}

type Interpolate = dyn Fn(Coord, Coord) -> Vec<Coord>;

fn apply(
    geometry: &Geometry,
    max_length: f64,
    interpolate: &Interpolate,
) -> Result<Geometry, GeoProxyTypesError> {
    if max_length.is_nan() || max_length <= 0.0 {
        return Err(GeoProxyTypesError::InvalidInput(
            "densify max length must be positive".into(),
        ));
    }

    match geometry {
        Geometry::LineString(line) => Ok(densify_line(line, interpolate).into()),
        Geometry::Polygon(polygon) => Ok(Polygon::new(
            densify_line(polygon.exterior(), interpolate),
            polygon
                .interiors()
                .iter()
                .map(|ring| densify_line(ring, interpolate))
                .collect(),
        )
        .into()),
        _ => Err(GeoProxyTypesError::InvalidInput(
            "densify is supported only for polygons or line strings".into(),
        )),
    }
}

fn segment_count(length: f64, max_length: f64) -> usize {
    (length / max_length).ceil().max(1.0) as usize
}

fn densify_line(line: &LineString, interpolate: &Interpolate) -> LineString {
    let mut coords = Vec::with_capacity(line.0.len());
    for segment in line.lines() {
        coords.push(segment.start);
        coords.extend(interpolate(segment.start, segment.end));
    }
    if let Some(last) = line.0.last() {
        coords.push(*last);
    }

    LineString::new(coords)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geo::{line_string, point, polygon};

    use super::*;

    #[test]
    fn splits_long_segments() {
        let line: Geometry = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)].into();
        let Geometry::LineString(result) = densify(&line, 3.0).unwrap() else {
            panic!("line string expected");
        };
        assert_eq!(result.0.len(), 5);
        assert_eq!(result.0[1], Coord { x: 2.5, y: 0.0 });
        assert_eq!(result.0[4], Coord { x: 10.0, y: 0.0 });
    }

    #[test]
    fn keeps_polygon_closed() {
        let square: Geometry =
            polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)]
                .into();
        let Geometry::Polygon(result) = densify(&square, 1.0).unwrap() else {
            panic!("polygon expected");
        };
        assert_eq!(result.exterior().0.len(), 17);
        assert!(result.exterior().is_closed());
    }

    #[test]
    fn geodetic_segments() {
        let line: Geometry = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)].into();
        let Geometry::LineString(result) = geodetic_densify(&line, 50_000.0).unwrap() else {
            panic!("line string expected");
        };
        assert_eq!(result.0.len(), 4);
    }

    #[test]
    fn rejects_other_types() {
        let point: Geometry = point!(x: 0.0, y: 0.0).into();
        assert_matches!(
            densify(&point, 1.0),
            Err(GeoProxyTypesError::InvalidInput(_))
        );
        let line: Geometry = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)].into();
        assert_matches!(
            densify(&line, 0.0),
            Err(GeoProxyTypesError::InvalidInput(_))
        );
    }
}
