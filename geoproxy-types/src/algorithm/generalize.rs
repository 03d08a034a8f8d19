use geo::{Coord, CoordsIter, Geometry, LineString, MultiLineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::GeoProxyTypesError;

/// Parameters of generalization by area.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneralizeParams {
    /// Share of vertices to remove from every path, in percent.
    pub percent_reduction: f64,
    /// Target total vertex count. When set, it takes precedence over `percent_reduction`.
    pub max_point_count: Option<usize>,
    /// Drop paths that would have too few vertices left instead of keeping them at the minimum.
    pub remove_degenerates: bool,
}

impl GeneralizeParams {
    /// Removes the given share of vertices.
    pub fn percent(percent_reduction: f64) -> Self {
        Self {
            percent_reduction,
            ..Default::default()
        }
    }

    /// Reduces the geometry to at most the given number of vertices.
    pub fn max_points(max_point_count: usize) -> Self {
        Self {
            max_point_count: Some(max_point_count),
            ..Default::default()
        }
    }

    /// Sets degenerate path removal.
    pub fn with_remove_degenerates(mut self, remove_degenerates: bool) -> Self {
        self.remove_degenerates = remove_degenerates;
        self
    }

    fn effective_percent(&self, geometry: &Geometry) -> f64 {
        match self.max_point_count {
            Some(max) => {
                let count = geometry.coords_count();
                if count <= max || count == 0 {
                    0.0
                } else {
                    100.0 - 100.0 * max as f64 / count as f64
                }
            }
            None => self.percent_reduction,
        }
    }
}

/// Removes vertices that contribute the smallest triangle areas to their paths.
///
/// From every path `ceil(n * percent / 100)` vertices are removed, one at a time, each time the
/// vertex forming the smallest triangle with its current neighbours. Line ends are never removed
/// and rings keep at least three distinct vertices.
pub fn generalize_by_area(
    geometry: &Geometry,
    params: &GeneralizeParams,
) -> Result<Geometry, GeoProxyTypesError> {
    let percent = params.effective_percent(geometry);
    if !(0.0..=100.0).contains(&percent) {
        return Err(GeoProxyTypesError::InvalidInput(format!(
            "percent reduction must be between 0 and 100, got {percent}"
        )));
    }

    let degenerates = params.remove_degenerates;
    let line = |line: &LineString| generalize_path(line, percent, false, degenerates);
    let polygon = |polygon: &Polygon| {
        let exterior = generalize_path(polygon.exterior(), percent, true, degenerates)?;
        let interiors = polygon
            .interiors()
            .iter()
            .filter_map(|ring| generalize_path(ring, percent, true, degenerates))
            .collect();
        Some(Polygon::new(exterior, interiors))
    };

    Ok(match geometry {
        Geometry::LineString(v) => match line(v) {
            Some(result) => result.into(),
            None => MultiLineString::<f64>::new(vec![]).into(),
        },
        Geometry::MultiLineString(v) => {
            MultiLineString::new(v.iter().filter_map(line).collect()).into()
        }
        Geometry::Polygon(v) => match polygon(v) {
            Some(result) => result.into(),
            None => MultiPolygon::<f64>::new(vec![]).into(),
        },
        Geometry::MultiPolygon(v) => MultiPolygon::new(v.iter().filter_map(polygon).collect()).into(),
        Geometry::GeometryCollection(v) => Geometry::GeometryCollection(
            v.iter()
                .map(|part| generalize_by_area(part, params))
                .collect::<Result<Vec<_>, _>>()?
                .into(),
        ),
        other => other.clone(),
    })
}

fn generalize_path(
    path: &LineString,
    percent: f64,
    is_ring: bool,
    remove_degenerates: bool,
) -> Option<LineString> {
    let mut coords: Vec<Coord> = path.0.clone();
    if is_ring && coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }

    let n = coords.len();
    let to_remove = (n as f64 * percent / 100.0).ceil() as usize;
    let min_count = if is_ring { 3 } else { 2 };
    let available = n.saturating_sub(min_count);

    if to_remove > available && remove_degenerates {
        return None;
    }

    for _ in 0..to_remove.min(available) {
        let len = coords.len();
        let candidates = if is_ring { 0..len } else { 1..len - 1 };
        let smallest = candidates
            .map(|i| {
                let prev = coords[(i + len - 1) % len];
                let next = coords[(i + 1) % len];
                (i, triangle_area(prev, coords[i], next))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match smallest {
            Some((index, _)) => {
                coords.remove(index);
            }
            None => break,
        }
    }

    if is_ring {
        if let Some(first) = coords.first().copied() {
            coords.push(first);
        }
    }

    Some(LineString::new(coords))
}

fn triangle_area(a: Coord, b: Coord, c: Coord) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
}
