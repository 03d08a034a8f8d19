use geo::{BoundingRect, Contains, MultiPoint, MultiPolygon, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::GeoProxyTypesError;

const MAX_ATTEMPTS_PER_POINT: usize = 1000;

/// Largest number of points a single call can generate.
pub const MAX_RANDOM_POINTS: usize = 1_000_000;

/// Samples `count` points uniformly inside the polygons.
///
/// The sequence is fully determined by the seed. Sampling is done by rejection inside the
/// bounding rectangle, so very thin polygons may yield fewer points than requested.
pub fn random_points(
    area: &MultiPolygon,
    count: usize,
    seed: u64,
) -> Result<MultiPoint, GeoProxyTypesError> {
    if count > MAX_RANDOM_POINTS {
        return Err(GeoProxyTypesError::InvalidInput(format!(
            "{count} random points requested, at most {MAX_RANDOM_POINTS} are supported"
        )));
    }

    let Some(bounds) = area.bounding_rect() else {
        return Ok(MultiPoint::new(vec![]));
    };
    let (min, max) = (bounds.min(), bounds.max());
    if min.x >= max.x || min.y >= max.y {
        return Ok(MultiPoint::new(vec![]));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(count);
    let max_attempts = count.saturating_mul(MAX_ATTEMPTS_PER_POINT);
    let mut attempts = 0;
    while points.len() < count && attempts < max_attempts {
        attempts += 1;
        let candidate = Point::new(rng.gen_range(min.x..max.x), rng.gen_range(min.y..max.y));
        if area.contains(&candidate) {
            points.push(candidate);
        }
    }

    if points.len() < count {
        log::warn!(
            "Generated only {} of {count} random points inside the polygon",
            points.len()
        );
    }

    Ok(MultiPoint::new(points))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geo::polygon;

    use super::*;

    fn square() -> MultiPolygon {
        MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ]])
    }

    #[test]
    fn points_are_inside() {
        let area = square();
        let points = random_points(&area, 50, 7).unwrap();
        assert_eq!(points.0.len(), 50);
        assert!(points.iter().all(|p| area.contains(p)));
    }

    #[test]
    fn seed_is_deterministic() {
        let area = square();
        assert_eq!(
            random_points(&area, 10, 42).unwrap(),
            random_points(&area, 10, 42).unwrap()
        );
        assert_ne!(
            random_points(&area, 10, 42).unwrap(),
            random_points(&area, 10, 43).unwrap()
        );
    }

    #[test]
    fn count_is_limited() {
        assert_matches!(
            random_points(&square(), usize::MAX, 1),
            Err(GeoProxyTypesError::InvalidInput(_))
        );
        assert_matches!(
            random_points(&square(), MAX_RANDOM_POINTS + 1, 1),
            Err(GeoProxyTypesError::InvalidInput(_))
        );
    }
}
