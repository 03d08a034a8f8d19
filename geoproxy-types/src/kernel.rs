//! Name-indexed table of planar operations backed by the `geo` crate.
//!
//! Every operation the library can compute without the geometry service is registered here
//! under a stable name. Looking up a name that is not registered, or using an entry with a
//! different signature than it has, is reported as [`GeoProxyTypesError::NotImplemented`].

use std::collections::HashMap;

use geo::algorithm::buffer::{BufferStyle, LineCap, LineJoin};
use geo::coordinate_position::CoordPos;
use geo::dimensions::Dimensions;
use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{
    Area, BooleanOps, BoundingRect, Buffer, Centroid, ConvexHull, Coord, Distance, Euclidean,
    Geometry, GeometryCollection, HasDimensions, HausdorffDistance, Intersects, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, Relate, Simplify,
    SimplifyVwPreserve, Validation,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::GeoProxyTypesError;

type KernelResult<T> = Result<T, GeoProxyTypesError>;

/// Signature of a kernel entry.
#[derive(Clone, Copy)]
#[allow(missing_docs)]
pub enum KernelFn {
    Measure(fn(&Geometry) -> KernelResult<f64>),
    Predicate(fn(&Geometry) -> KernelResult<bool>),
    Transform(fn(&Geometry) -> KernelResult<Geometry>),
    Parametrized(fn(&Geometry, f64) -> KernelResult<Geometry>),
    Styled(fn(&Geometry, &BufferParams) -> KernelResult<Geometry>),
    BinaryMeasure(fn(&Geometry, &Geometry) -> KernelResult<f64>),
    BinaryPredicate(fn(&Geometry, &Geometry) -> KernelResult<bool>),
    BinaryTransform(fn(&Geometry, &Geometry) -> KernelResult<Geometry>),
    Matrix(fn(&Geometry, &Geometry) -> KernelResult<String>),
    Pattern(fn(&Geometry, &Geometry, &str) -> KernelResult<bool>),
    Aggregate(fn(&[Geometry]) -> KernelResult<Geometry>),
}

/// Shape of the end caps of a buffered line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapStyle {
    #[default]
    #[allow(missing_docs)]
    Round,
    #[allow(missing_docs)]
    Flat,
    #[allow(missing_docs)]
    Square,
}

/// Shape of the corners of a buffered geometry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinStyle {
    #[default]
    #[allow(missing_docs)]
    Round,
    #[allow(missing_docs)]
    Mitre,
    #[allow(missing_docs)]
    Bevel,
}

/// Parameters of a styled buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferParams {
    /// Buffer distance in coordinate units.
    pub distance: f64,
    /// End cap style.
    pub cap: CapStyle,
    /// Corner style.
    pub join: JoinStyle,
    /// Limit of the mitre ratio, used only with [`JoinStyle::Mitre`].
    pub mitre_limit: f64,
}

impl BufferParams {
    /// Round buffer with the given distance.
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            cap: CapStyle::Round,
            join: JoinStyle::Round,
            mitre_limit: 5.0,
        }
    }

    /// Sets the cap style.
    pub fn with_cap(mut self, cap: CapStyle) -> Self {
        self.cap = cap;
        self
    }

    /// Sets the join style.
    pub fn with_join(mut self, join: JoinStyle) -> Self {
        self.join = join;
        self
    }

    /// Sets the mitre limit.
    pub fn with_mitre_limit(mut self, mitre_limit: f64) -> Self {
        self.mitre_limit = mitre_limit;
        self
    }

    /// Returns true if both caps and joins are round, so a plain buffer produces the same result.
    pub fn is_round(&self) -> bool {
        self.cap == CapStyle::Round && self.join == JoinStyle::Round
    }
}

lazy_static! {
    static ref GLOBAL: Kernel = Kernel {
        table: default_table(),
    };
}

/// Operation table of the bundled geometry kernel.
#[derive(Clone)]
pub struct Kernel {
    table: HashMap<&'static str, KernelFn>,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::global().clone()
    }
}

impl Kernel {
    /// Kernel with every operation this crate supports.
    pub fn global() -> &'static Kernel {
        &GLOBAL
    }

    /// Returns a copy of this kernel without the given entries.
    ///
    /// Used to describe older or restricted kernels that lack some capabilities.
    pub fn without(&self, names: &[&str]) -> Kernel {
        let mut table = self.table.clone();
        table.retain(|name, _| !names.contains(name));
        Kernel { table }
    }

    /// Returns true if the kernel has an entry with the given name.
    pub fn supports(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Names of all registered entries, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.table.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Looks up an entry.
    pub fn get(&self, name: &str) -> KernelResult<KernelFn> {
        self.table
            .get(name)
            .copied()
            .ok_or_else(|| GeoProxyTypesError::NotImplemented(format!("kernel operation `{name}`")))
    }

    #[allow(missing_docs)]
    pub fn measure(&self, name: &str, geometry: &Geometry) -> KernelResult<f64> {
        match self.get(name)? {
            KernelFn::Measure(f) => f(geometry),
            _ => Err(signature_mismatch(name)),
        }
    }

    #[allow(missing_docs)]
    pub fn predicate(&self, name: &str, geometry: &Geometry) -> KernelResult<bool> {
        match self.get(name)? {
            KernelFn::Predicate(f) => f(geometry),
            _ => Err(signature_mismatch(name)),
        }
    }

    #[allow(missing_docs)]
    pub fn transform(&self, name: &str, geometry: &Geometry) -> KernelResult<Geometry> {
        match self.get(name)? {
            KernelFn::Transform(f) => f(geometry),
            _ => Err(signature_mismatch(name)),
        }
    }

    #[allow(missing_docs)]
    pub fn parametrized(
        &self,
        name: &str,
        geometry: &Geometry,
        value: f64,
    ) -> KernelResult<Geometry> {
        match self.get(name)? {
            KernelFn::Parametrized(f) => f(geometry, value),
            _ => Err(signature_mismatch(name)),
        }
    }

    /// Buffers the geometry. Non-round styles need the `buffer_with_style` entry.
    pub fn buffer(&self, geometry: &Geometry, params: &BufferParams) -> KernelResult<Geometry> {
        if params.is_round() {
            return self.parametrized("buffer", geometry, params.distance);
        }

        match self.table.get("buffer_with_style") {
            Some(KernelFn::Styled(f)) => f(geometry, params),
            Some(_) => Err(signature_mismatch("buffer_with_style")),
            None => Err(GeoProxyTypesError::NotImplemented(
                "styled buffering is not available in this kernel".into(),
            )),
        }
    }

    #[allow(missing_docs)]
    pub fn binary_measure(&self, name: &str, a: &Geometry, b: &Geometry) -> KernelResult<f64> {
        match self.get(name)? {
            KernelFn::BinaryMeasure(f) => f(a, b),
            _ => Err(signature_mismatch(name)),
        }
    }

    #[allow(missing_docs)]
    pub fn binary_predicate(&self, name: &str, a: &Geometry, b: &Geometry) -> KernelResult<bool> {
        match self.get(name)? {
            KernelFn::BinaryPredicate(f) => f(a, b),
            _ => Err(signature_mismatch(name)),
        }
    }

    #[allow(missing_docs)]
    pub fn binary_transform(
        &self,
        name: &str,
        a: &Geometry,
        b: &Geometry,
    ) -> KernelResult<Geometry> {
        match self.get(name)? {
            KernelFn::BinaryTransform(f) => f(a, b),
            _ => Err(signature_mismatch(name)),
        }
    }

    /// DE-9IM intersection matrix of two geometries as a 9-character string.
    pub fn relate(&self, a: &Geometry, b: &Geometry) -> KernelResult<String> {
        match self.get("relate")? {
            KernelFn::Matrix(f) => f(a, b),
            _ => Err(signature_mismatch("relate")),
        }
    }

    /// Checks the DE-9IM matrix of two geometries against a pattern like `T*F**F***`.
    pub fn relate_pattern(&self, a: &Geometry, b: &Geometry, pattern: &str) -> KernelResult<bool> {
        match self.get("relate_pattern")? {
            KernelFn::Pattern(f) => f(a, b, pattern),
            _ => Err(signature_mismatch("relate_pattern")),
        }
    }

    #[allow(missing_docs)]
    pub fn aggregate(&self, name: &str, geometries: &[Geometry]) -> KernelResult<Geometry> {
        match self.get(name)? {
            KernelFn::Aggregate(f) => f(geometries),
            _ => Err(signature_mismatch(name)),
        }
    }
}

fn signature_mismatch(name: &str) -> GeoProxyTypesError {
    GeoProxyTypesError::NotImplemented(format!(
        "kernel operation `{name}` has a different signature"
    ))
}

fn default_table() -> HashMap<&'static str, KernelFn> {
    use KernelFn::*;

    HashMap::from([
        ("area", Measure(area)),
        ("length", Measure(length)),
        ("is_empty", Predicate(is_empty)),
        ("is_valid", Predicate(is_valid)),
        ("is_ring", Predicate(is_ring)),
        ("centroid", Transform(centroid)),
        ("envelope", Transform(envelope)),
        ("convex_hull", Transform(convex_hull)),
        ("buffer", Parametrized(buffer)),
        ("buffer_with_style", Styled(buffer_with_style)),
        ("simplify", Parametrized(simplify)),
        ("topology_preserve_simplify", Parametrized(topology_preserve_simplify)),
        ("distance", BinaryMeasure(distance)),
        ("hausdorff_distance", BinaryMeasure(hausdorff_distance)),
        ("union", BinaryTransform(union)),
        ("intersection", BinaryTransform(intersection)),
        ("difference", BinaryTransform(difference)),
        ("symmetric_difference", BinaryTransform(symmetric_difference)),
        ("unary_union", Aggregate(unary_union)),
        ("relate", Matrix(relate)),
        ("relate_pattern", Pattern(relate_pattern)),
        ("equals", BinaryPredicate(|a, b| Ok(a.relate(b).is_equal_topo()))),
        ("contains", BinaryPredicate(|a, b| Ok(a.relate(b).is_contains()))),
        ("covers", BinaryPredicate(|a, b| Ok(a.relate(b).is_covers()))),
        ("within", BinaryPredicate(|a, b| Ok(a.relate(b).is_within()))),
        ("touches", BinaryPredicate(|a, b| Ok(a.relate(b).is_touches()))),
        ("overlaps", BinaryPredicate(|a, b| Ok(a.relate(b).is_overlaps()))),
        ("crosses", BinaryPredicate(|a, b| Ok(a.relate(b).is_crosses()))),
        ("disjoint", BinaryPredicate(|a, b| Ok(a.relate(b).is_disjoint()))),
        ("intersects", BinaryPredicate(|a, b| Ok(a.relate(b).is_intersects()))),
    ])
}

fn area(geometry: &Geometry) -> KernelResult<f64> {
    Ok(geometry.unsigned_area())
}

/// Planar length of lines and perimeter of polygons.
fn length(geometry: &Geometry) -> KernelResult<f64> {
    Ok(crate::algorithm::line_strings(geometry)
        .iter()
        .flat_map(|line| line.lines())
        .map(|segment| segment.dx().hypot(segment.dy()))
        .sum())
}

fn is_empty(geometry: &Geometry) -> KernelResult<bool> {
    Ok(geometry.is_empty())
}

fn is_valid(geometry: &Geometry) -> KernelResult<bool> {
    Ok(geometry.is_valid())
}

fn is_ring(geometry: &Geometry) -> KernelResult<bool> {
    Ok(match geometry {
        Geometry::LineString(line) => line.is_closed() && line.0.len() >= 4 && line.is_valid(),
        _ => false,
    })
}

fn centroid(geometry: &Geometry) -> KernelResult<Geometry> {
    geometry
        .centroid()
        .map(Geometry::Point)
        .ok_or_else(|| GeoProxyTypesError::EmptyGeometry("centroid".into()))
}

fn envelope(geometry: &Geometry) -> KernelResult<Geometry> {
    geometry
        .bounding_rect()
        .map(|rect| Geometry::Polygon(rect.to_polygon()))
        .ok_or_else(|| GeoProxyTypesError::EmptyGeometry("envelope".into()))
}

fn convex_hull(geometry: &Geometry) -> KernelResult<Geometry> {
    Ok(Geometry::Polygon(geometry.convex_hull()))
}

/// Angle in radians subtended by one segment of a round join or cap.
const ROUND_SEGMENT_ANGLE: f64 = 0.05;

fn buffer(geometry: &Geometry, distance: f64) -> KernelResult<Geometry> {
    let style = BufferStyle::new(distance)
        .line_cap(LineCap::Round(ROUND_SEGMENT_ANGLE))
        .line_join(LineJoin::Round(ROUND_SEGMENT_ANGLE));
    Ok(normalize(geometry.buffer_with_style(style)))
}

fn buffer_with_style(geometry: &Geometry, params: &BufferParams) -> KernelResult<Geometry> {
    let mut style = BufferStyle::new(params.distance);
    style = match params.cap {
        CapStyle::Round => style.line_cap(LineCap::Round(ROUND_SEGMENT_ANGLE)),
        CapStyle::Flat => style.line_cap(LineCap::Butt),
        CapStyle::Square => style.line_cap(LineCap::Square),
    };
    style = match params.join {
        JoinStyle::Round => style.line_join(LineJoin::Round(ROUND_SEGMENT_ANGLE)),
        JoinStyle::Bevel => style.line_join(LineJoin::Bevel),
        JoinStyle::Mitre => {
            if params.mitre_limit.is_nan() || params.mitre_limit <= 0.0 {
                return Err(GeoProxyTypesError::InvalidInput(
                    "mitre limit must be positive".into(),
                ));
            }
            // the limit is a length ratio, geo takes the sharpest corner angle still mitred
            let min_angle = 2.0 * params.mitre_limit.recip().min(1.0).asin();
            style.line_join(LineJoin::Miter(min_angle))
        }
    };

    Ok(normalize(geometry.buffer_with_style(style)))
}

fn simplify(geometry: &Geometry, tolerance: f64) -> KernelResult<Geometry> {
    Ok(match geometry {
        Geometry::LineString(v) => v.simplify(tolerance).into(),
        Geometry::MultiLineString(v) => v.simplify(tolerance).into(),
        Geometry::Polygon(v) => v.simplify(tolerance).into(),
        Geometry::MultiPolygon(v) => v.simplify(tolerance).into(),
        Geometry::GeometryCollection(v) => Geometry::GeometryCollection(
            v.iter()
                .map(|g| simplify(g, tolerance))
                .collect::<KernelResult<Vec<_>>>()?
                .into(),
        ),
        other => other.clone(),
    })
}

/// Visvalingam-Whyatt simplification that keeps rings valid. The tolerance is a distance, the
/// triangle area threshold is its square.
fn topology_preserve_simplify(geometry: &Geometry, tolerance: f64) -> KernelResult<Geometry> {
    let epsilon = tolerance * tolerance;
    Ok(match geometry {
        Geometry::LineString(v) => v.simplify_vw_preserve(epsilon).into(),
        Geometry::MultiLineString(v) => v.simplify_vw_preserve(epsilon).into(),
        Geometry::Polygon(v) => v.simplify_vw_preserve(epsilon).into(),
        Geometry::MultiPolygon(v) => v.simplify_vw_preserve(epsilon).into(),
        Geometry::GeometryCollection(v) => Geometry::GeometryCollection(
            v.iter()
                .map(|g| topology_preserve_simplify(g, tolerance))
                .collect::<KernelResult<Vec<_>>>()?
                .into(),
        ),
        other => other.clone(),
    })
}

fn distance(a: &Geometry, b: &Geometry) -> KernelResult<f64> {
    Ok(Euclidean.distance(a, b))
}

fn hausdorff_distance(a: &Geometry, b: &Geometry) -> KernelResult<f64> {
    Ok(a.hausdorff_distance(b))
}

#[derive(Clone, Copy)]
enum SetOp {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

fn union(a: &Geometry, b: &Geometry) -> KernelResult<Geometry> {
    set_operation(a, b, SetOp::Union)
}

fn intersection(a: &Geometry, b: &Geometry) -> KernelResult<Geometry> {
    set_operation(a, b, SetOp::Intersection)
}

fn difference(a: &Geometry, b: &Geometry) -> KernelResult<Geometry> {
    set_operation(a, b, SetOp::Difference)
}

fn symmetric_difference(a: &Geometry, b: &Geometry) -> KernelResult<Geometry> {
    set_operation(a, b, SetOp::SymmetricDifference)
}

fn set_operation(a: &Geometry, b: &Geometry, op: SetOp) -> KernelResult<Geometry> {
    if let (Some(a), Some(b)) = (areal(a), areal(b)) {
        let result = match op {
            SetOp::Union => a.union(&b),
            SetOp::Intersection => a.intersection(&b),
            SetOp::Difference => a.difference(&b),
            SetOp::SymmetricDifference => a.xor(&b),
        };
        return Ok(normalize(result));
    }

    if let (Some(a), Some(b)) = (puntal(a), puntal(b)) {
        let in_b = |p: &Point| b.contains(p);
        let in_a = |p: &Point| a.contains(p);
        let points: Vec<Point> = match op {
            SetOp::Union => a.iter().chain(b.iter()).copied().collect(),
            SetOp::Intersection => a.iter().copied().filter(in_b).collect(),
            SetOp::Difference => a.iter().copied().filter(|p| !in_b(p)).collect(),
            SetOp::SymmetricDifference => a
                .iter()
                .copied()
                .filter(|p| !in_b(p))
                .chain(b.iter().copied().filter(|p| !in_a(p)))
                .collect(),
        };
        return Ok(Geometry::MultiPoint(MultiPoint::new(dedup(points))));
    }

    let (a_parts, b_parts) = (Components::of(a), Components::of(b));
    let result = match op {
        SetOp::Union => a_parts.union(b_parts),
        SetOp::Intersection => a_parts.intersection(&b_parts, a, b),
        SetOp::Difference => a_parts.difference(&b_parts, b)?,
        SetOp::SymmetricDifference => {
            let forward = a_parts.difference(&b_parts, b)?;
            let backward = b_parts.difference(&a_parts, a)?;
            forward.union(backward)
        }
    };

    Ok(result.assemble())
}

/// Parts of a geometry grouped by dimension, used by set operations on mixed or linear operands.
#[derive(Default)]
struct Components {
    points: Vec<Point>,
    lines: Vec<LineString>,
    polygons: Vec<Polygon>,
}

impl Components {
    fn of(geometry: &Geometry) -> Self {
        let mut components = Components::default();
        components.add(geometry);
        components
    }

    fn add(&mut self, geometry: &Geometry) {
        match geometry {
            Geometry::Point(v) => self.points.push(*v),
            Geometry::MultiPoint(v) => self.points.extend(v.iter().copied()),
            Geometry::Line(v) => self.lines.push((*v).into()),
            Geometry::LineString(v) => self.lines.push(v.clone()),
            Geometry::MultiLineString(v) => self.lines.extend(v.iter().cloned()),
            Geometry::Polygon(v) => self.polygons.push(v.clone()),
            Geometry::MultiPolygon(v) => self.polygons.extend(v.iter().cloned()),
            Geometry::Rect(v) => self.polygons.push(v.to_polygon()),
            Geometry::Triangle(v) => self.polygons.push(v.to_polygon()),
            Geometry::GeometryCollection(v) => v.iter().for_each(|part| self.add(part)),
        }
    }

    fn area(&self) -> MultiPolygon {
        MultiPolygon::new(self.polygons.clone())
    }

    /// Lines clipped to the inside (or the outside, when `outside` is set) of the polygons.
    fn clip_lines(&self, lines: &[LineString], outside: bool) -> Vec<LineString> {
        if lines.is_empty() || self.polygons.is_empty() {
            return if outside { lines.to_vec() } else { vec![] };
        }

        self.area()
            .clip(&MultiLineString::new(lines.to_vec()), outside)
            .0
    }

    /// Points not covered by any line or polygon of this geometry.
    fn uncovered_points(&self, points: &[Point]) -> Vec<Point> {
        let lines = MultiLineString::new(self.lines.clone());
        let area = self.area();
        points
            .iter()
            .copied()
            .filter(|p| !lines.intersects(p) && !area.intersects(p))
            .collect()
    }

    fn union(self, other: Components) -> Components {
        let polygons = match (self.polygons.is_empty(), other.polygons.is_empty()) {
            (true, _) => other.polygons,
            (_, true) => self.polygons,
            _ => MultiPolygon::new(self.polygons)
                .union(&MultiPolygon::new(other.polygons))
                .0,
        };
        let area = Components {
            polygons,
            ..Default::default()
        };

        let mut lines = self.lines;
        for line in other.lines {
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
        let lines = area.clip_lines(&lines, true);

        let cover = Components {
            lines,
            polygons: area.polygons,
            ..Default::default()
        };
        let points = self.points.into_iter().chain(other.points).collect::<Vec<_>>();
        let points = dedup(cover.uncovered_points(&points));

        Components { points, ..cover }
    }

    fn intersection(&self, other: &Components, a: &Geometry, b: &Geometry) -> Components {
        let polygons = if self.polygons.is_empty() || other.polygons.is_empty() {
            vec![]
        } else {
            self.area().intersection(&other.area()).0
        };

        let mut lines = other.clip_lines(&self.lines, false);
        lines.extend(self.clip_lines(&other.lines, false));
        let mut points: Vec<Point> = self
            .points
            .iter()
            .copied()
            .filter(|p| b.intersects(p))
            .collect();
        points.extend(other.points.iter().copied().filter(|p| a.intersects(p)));

        for first in self.lines.iter().flat_map(LineString::lines) {
            for second in other.lines.iter().flat_map(LineString::lines) {
                match line_intersection(first, second) {
                    Some(LineIntersection::SinglePoint { intersection, .. }) => {
                        points.push(Point(intersection))
                    }
                    Some(LineIntersection::Collinear { intersection }) => {
                        lines.push(intersection.into())
                    }
                    None => {}
                }
            }
        }

        let cover = Components {
            lines,
            polygons,
            ..Default::default()
        };
        let points = dedup(cover.uncovered_points(&points));
        Components { points, ..cover }
    }

    /// Parts of `self` not covered by `other`. Lower-dimensional parts of `other` remove
    /// nothing from polygons.
    fn difference(&self, other: &Components, b: &Geometry) -> KernelResult<Components> {
        if !self.lines.is_empty() && !other.lines.is_empty() {
            return Err(GeoProxyTypesError::NotImplemented(
                "difference between two linear geometries".into(),
            ));
        }

        let polygons = if other.polygons.is_empty() {
            self.polygons.clone()
        } else {
            self.area().difference(&other.area()).0
        };

        Ok(Components {
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| !b.intersects(p))
                .collect(),
            lines: other.clip_lines(&self.lines, true),
            polygons,
        })
    }

    /// Single geometry of the lowest variant able to hold all parts.
    fn assemble(self) -> Geometry {
        let mut parts: Vec<Geometry> = vec![];
        if !self.polygons.is_empty() {
            parts.push(normalize(MultiPolygon::new(self.polygons)));
        }
        match self.lines.len() {
            0 => {}
            1 => parts.extend(self.lines.into_iter().map(Geometry::LineString)),
            _ => parts.push(Geometry::MultiLineString(MultiLineString::new(self.lines))),
        }
        match self.points.len() {
            0 => {}
            1 => parts.extend(self.points.into_iter().map(Geometry::Point)),
            _ => parts.push(Geometry::MultiPoint(MultiPoint::new(self.points))),
        }

        match parts.len() {
            0 => Geometry::GeometryCollection(GeometryCollection::default()),
            1 => parts.remove(0),
            _ => Geometry::GeometryCollection(GeometryCollection::new_from(parts)),
        }
    }
}

fn unary_union(geometries: &[Geometry]) -> KernelResult<Geometry> {
    let Some((first, rest)) = geometries.split_first() else {
        return Ok(Geometry::MultiPolygon(MultiPolygon::new(vec![])));
    };

    rest.iter()
        .try_fold(first.clone(), |acc, next| union(&acc, next))
}

fn relate(a: &Geometry, b: &Geometry) -> KernelResult<String> {
    const POSITIONS: [CoordPos; 3] = [CoordPos::Inside, CoordPos::OnBoundary, CoordPos::Outside];

    let matrix = a.relate(b);
    let mut result = String::with_capacity(9);
    for lhs in POSITIONS {
        for rhs in POSITIONS {
            result.push(match matrix.get(lhs, rhs) {
                Dimensions::Empty => 'F',
                Dimensions::ZeroDimensional => '0',
                Dimensions::OneDimensional => '1',
                Dimensions::TwoDimensional => '2',
            });
        }
    }

    Ok(result)
}

fn relate_pattern(a: &Geometry, b: &Geometry, pattern: &str) -> KernelResult<bool> {
    a.relate(b)
        .matches(pattern)
        .map_err(|err| GeoProxyTypesError::InvalidInput(format!("relate pattern: {err}")))
}

fn areal(geometry: &Geometry) -> Option<MultiPolygon> {
    match geometry {
        Geometry::Polygon(v) => Some(MultiPolygon::new(vec![v.clone()])),
        Geometry::MultiPolygon(v) => Some(v.clone()),
        Geometry::Rect(v) => Some(MultiPolygon::new(vec![v.to_polygon()])),
        Geometry::Triangle(v) => Some(MultiPolygon::new(vec![v.to_polygon()])),
        Geometry::GeometryCollection(v) => {
            let mut polygons: Vec<Polygon> = vec![];
            for part in v.iter() {
                polygons.extend(areal(part)?.0);
            }
            Some(MultiPolygon::new(polygons))
        }
        _ => None,
    }
}

fn puntal(geometry: &Geometry) -> Option<Vec<Point>> {
    match geometry {
        Geometry::Point(v) => Some(vec![*v]),
        Geometry::MultiPoint(v) => Some(v.0.clone()),
        _ => None,
    }
}

fn dedup(points: Vec<Point>) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len());
    for point in points {
        if !result.contains(&point) {
            result.push(point);
        }
    }
    result
}

/// Unwraps single-polygon results.
fn normalize(multi_polygon: MultiPolygon) -> Geometry {
    if multi_polygon.0.len() == 1 {
        let mut polygons = multi_polygon.0;
        if let Some(polygon) = polygons.pop() {
            return Geometry::Polygon(polygon);
        }
        return Geometry::MultiPolygon(MultiPolygon::new(polygons));
    }

    Geometry::MultiPolygon(multi_polygon)
}

/// Returns the coordinate halfway between two coordinates.
pub fn planar_midpoint(a: Coord, b: Coord) -> Coord {
    Coord {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}
