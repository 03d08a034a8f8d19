//! Coordinate transformation between spatial references, backed by the `geodesy` crate.

use geo::{Coord, Geometry, MapCoords};
use geodesy::prelude::*;

use crate::error::GeoProxyTypesError;
use crate::spatial_reference::SpatialReference;

/// How one side of a transformation relates to geographic coordinates.
#[derive(Debug, Clone, Copy)]
enum Side {
    /// Longitude/latitude in degrees.
    Geographic,
    /// Projected coordinates produced by the operation from geographic radians.
    Projected(OpHandle),
}

/// Transforms coordinates from one spatial reference into another.
///
/// Every transformation goes through WGS84 geographic coordinates: the source side is
/// unprojected (if it is projected), then the target projection is applied.
#[derive(Debug)]
pub struct Projector {
    context: Minimal,
    source: Side,
    target: Side,
    identity: bool,
}

impl Projector {
    /// Creates a projector between two spatial references.
    ///
    /// Fails with [`GeoProxyTypesError::UnsupportedSpatialReference`] if either of them cannot be
    /// expressed as a `geodesy` operation.
    pub fn new(from: &SpatialReference, to: &SpatialReference) -> Result<Self, GeoProxyTypesError> {
        let mut context = Minimal::new();
        let identity = from == to;
        let source = side(&mut context, from)?;
        let target = side(&mut context, to)?;

        Ok(Self {
            context,
            source,
            target,
            identity,
        })
    }

    /// Returns true if source and target references are equal and coordinates pass unchanged.
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Transforms a single coordinate.
    pub fn project_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, GeoProxyTypesError> {
        if self.identity {
            return Ok(coord);
        }

        let mut data = [match self.source {
            Side::Geographic => Coor2D::geo(coord.y, coord.x),
            Side::Projected(op) => {
                let mut data = [Coor2D([coord.x, coord.y])];
                self.context
                    .apply(op, Inv, &mut data)
                    .map_err(|err| GeoProxyTypesError::Projection(err.to_string()))?;
                data[0]
            }
        }];

        let (x, y) = match self.target {
            Side::Geographic => (data[0].0[0].to_degrees(), data[0].0[1].to_degrees()),
            Side::Projected(op) => {
                self.context
                    .apply(op, Fwd, &mut data)
                    .map_err(|err| GeoProxyTypesError::Projection(err.to_string()))?;
                (data[0].0[0], data[0].0[1])
            }
        };

        if !x.is_finite() || !y.is_finite() {
            return Err(GeoProxyTypesError::Projection(format!(
                "coordinate ({}, {}) is outside of the projection domain",
                coord.x, coord.y
            )));
        }

        Ok(Coord { x, y })
    }

    /// Transforms every coordinate of the geometry.
    pub fn project(&self, geometry: &Geometry<f64>) -> Result<Geometry<f64>, GeoProxyTypesError> {
        if self.identity {
            return Ok(geometry.clone());
        }

        geometry.try_map_coords(|coord| self.project_coord(coord))
    }
}

fn side(context: &mut Minimal, sr: &SpatialReference) -> Result<Side, GeoProxyTypesError> {
    match geodesy_definition(sr)? {
        None => Ok(Side::Geographic),
        Some(definition) => context
            .op(&definition)
            .map(Side::Projected)
            .map_err(|err| {
                GeoProxyTypesError::UnsupportedSpatialReference(format!("{sr}: {err}"))
            }),
    }
}

/// Returns the `geodesy` operation definition for the spatial reference, or `None` for WGS84
/// geographic coordinates.
pub fn geodesy_definition(sr: &SpatialReference) -> Result<Option<String>, GeoProxyTypesError> {
    match sr {
        SpatialReference::Code(code) => code_definition(*code)
            .ok_or_else(|| GeoProxyTypesError::UnsupportedSpatialReference(sr.to_string())),
        SpatialReference::Proj4(definition) => proj4_definition(definition),
        SpatialReference::Wkt(_) => Err(GeoProxyTypesError::UnsupportedSpatialReference(
            "WKT spatial references cannot be used for local projection".into(),
        )),
        SpatialReference::Custom { lon_0, lat_0 } => Ok(Some(format!(
            "laea lon_0={lon_0} lat_0={} ellps=WGS84",
            oblique_latitude(*lat_0)
        ))),
    }
}

/// Smallest distance in degrees of a custom plane centre from the equator and the poles.
const MIN_ASPECT_OFFSET: f64 = 1e-6;

/// `geodesy` switches `laea` to its equatorial and polar branches within 1e-10 radians of those
/// latitudes, and only the oblique branch is consistent between forward and inverse. Centres in
/// that band are shifted by a negligible amount into the oblique range.
fn oblique_latitude(lat_0: f64) -> f64 {
    lat_0
        .abs()
        .clamp(MIN_ASPECT_OFFSET, 90.0 - MIN_ASPECT_OFFSET)
        .copysign(lat_0)
}

fn code_definition(code: i32) -> Option<Option<String>> {
    match code {
        4326 => Some(None),
        3857 | 3785 | 900913 => Some(Some("webmerc".into())),
        32601..=32660 => Some(Some(format!("utm zone={} ellps=WGS84", code - 32600))),
        32701..=32760 => Some(Some(format!("utm zone={} south ellps=WGS84", code - 32700))),
        _ => None,
    }
}

const IGNORED_PROJ4_KEYS: &[&str] = &["no_defs", "units", "type", "wktext", "towgs84"];

fn proj4_definition(definition: &str) -> Result<Option<String>, GeoProxyTypesError> {
    let mut name = None;
    let mut params = vec![];

    for token in definition.split_whitespace() {
        let token = token.trim_start_matches('+');
        let (key, value) = match token.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (token, None),
        };

        match (key, value) {
            ("proj", Some(value)) => name = Some(value),
            ("datum", Some("WGS84")) => params.push("ellps=WGS84".to_string()),
            ("datum", Some(other)) => {
                return Err(GeoProxyTypesError::UnsupportedSpatialReference(format!(
                    "datum {other} is not supported"
                )))
            }
            _ if IGNORED_PROJ4_KEYS.contains(&key) => {}
            (key, Some(value)) => params.push(format!("{key}={value}")),
            (flag, None) if !flag.is_empty() => params.push(flag.to_string()),
            _ => {}
        }
    }

    match name {
        None => Err(GeoProxyTypesError::UnsupportedSpatialReference(format!(
            "proj-string without projection name: {definition}"
        ))),
        Some("longlat" | "latlong" | "lonlat" | "latlon") => Ok(None),
        Some(name) => {
            let mut op = name.to_string();
            for param in params {
                op.push(' ');
                op.push_str(&param);
            }
            Ok(Some(op))
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geo::{line_string, point};

    use super::*;

    #[test]
    fn utm_to_wgs84() {
        let projector =
            Projector::new(&SpatialReference::Code(32632), &SpatialReference::WGS84).unwrap();
        let line: Geometry = line_string![
            (x: 500000.0, y: 0.0),
            (x: 400000.0, y: 100000.0),
            (x: 600000.0, y: -100000.0),
        ]
        .into();

        let Geometry::LineString(projected) = projector.project(&line).unwrap() else {
            panic!("line string expected");
        };

        let expected = [
            (9.0, 0.0),
            (8.101251062924646, 0.904618578893133),
            (9.898748937075354, -0.904618578893133),
        ];
        for (actual, (x, y)) in projected.coords().zip(expected) {
            assert_abs_diff_eq!(actual.x, x, epsilon = 1e-9);
            assert_abs_diff_eq!(actual.y, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn custom_projection_is_centred() {
        let sr = SpatialReference::custom(10.0, 52.0);
        let forward = Projector::new(&SpatialReference::WGS84, &sr).unwrap();
        let centre = forward.project_coord(Coord { x: 10.0, y: 52.0 }).unwrap();
        assert_abs_diff_eq!(centre.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(centre.y, 0.0, epsilon = 1e-6);

        let backward = Projector::new(&sr, &SpatialReference::WGS84).unwrap();
        let point: Geometry = point!(x: 10.5, y: 52.3).into();
        let there = forward.project(&point).unwrap();
        let back = backward.project(&there).unwrap();
        let Geometry::Point(back) = back else {
            panic!("point expected");
        };
        assert_abs_diff_eq!(back.x(), 10.5, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y(), 52.3, epsilon = 1e-9);
    }

    #[test]
    fn custom_projection_on_equator() {
        let sr = SpatialReference::custom(0.005, 0.0);
        let forward = Projector::new(&SpatialReference::WGS84, &sr).unwrap();
        let west = forward.project_coord(Coord { x: 0.0, y: 0.0 }).unwrap();
        let east = forward.project_coord(Coord { x: 0.01, y: 0.0 }).unwrap();
        assert_abs_diff_eq!(east.x - west.x, 1113.19, epsilon = 0.1);
        assert_abs_diff_eq!(west.y, east.y, epsilon = 1e-6);

        let backward = Projector::new(&sr, &SpatialReference::WGS84).unwrap();
        let back = backward.project_coord(east).unwrap();
        assert_abs_diff_eq!(back.x, 0.01, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn custom_projection_near_pole() {
        let sr = SpatialReference::custom(0.0, 90.0);
        let forward = Projector::new(&SpatialReference::WGS84, &sr).unwrap();
        let backward = Projector::new(&sr, &SpatialReference::WGS84).unwrap();
        let there = forward.project_coord(Coord { x: 45.0, y: 89.9 }).unwrap();
        let back = backward.project_coord(there).unwrap();
        assert_abs_diff_eq!(back.x, 45.0, epsilon = 1e-6);
        assert_abs_diff_eq!(back.y, 89.9, epsilon = 1e-9);
        assert_eq!(oblique_latitude(-0.0), -MIN_ASPECT_OFFSET);
        assert_eq!(oblique_latitude(-90.0), -90.0 + MIN_ASPECT_OFFSET);
    }

    #[test]
    fn identity_keeps_coordinates() {
        let projector =
            Projector::new(&SpatialReference::Code(32632), &SpatialReference::Code(32632)).unwrap();
        assert!(projector.is_identity());
        let coord = Coord { x: 1.0, y: 2.0 };
        assert_eq!(projector.project_coord(coord).unwrap(), coord);
    }

    #[test]
    fn proj4_translation() {
        assert_eq!(
            proj4_definition("+proj=utm +zone=32 +datum=WGS84 +units=m +no_defs").unwrap(),
            Some("utm zone=32 ellps=WGS84".to_string())
        );
        assert_eq!(
            proj4_definition("+proj=longlat +datum=WGS84 +no_defs").unwrap(),
            None
        );
        assert_eq!(
            proj4_definition("+proj=utm +zone=33 +south").unwrap(),
            Some("utm zone=33 south".to_string())
        );
    }

    #[test]
    fn unsupported_references() {
        assert_matches!(
            Projector::new(&SpatialReference::Code(2154), &SpatialReference::WGS84),
            Err(GeoProxyTypesError::UnsupportedSpatialReference(_))
        );
        assert_matches!(
            Projector::new(&SpatialReference::Wkt("GEOGCS[]".into()), &SpatialReference::WGS84),
            Err(GeoProxyTypesError::UnsupportedSpatialReference(_))
        );
    }
}
