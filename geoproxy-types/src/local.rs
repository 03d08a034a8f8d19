//! Planar operations on geometry values computed in-process by the kernel.

use geo::{CoordsIter, Geometry, Point};

use crate::error::GeoProxyTypesError;
use crate::geometry::{Dimension, GeometryValue, Shape};
use crate::kernel::{planar_midpoint, BufferParams, Kernel};

/// Local operations on a [`GeometryValue`], see [`GeometryValue::local`].
///
/// Results carry the spatial reference of the value. Binary operations require both operands to
/// share one spatial reference since nothing is reprojected locally.
pub struct LocalOps<'a> {
    value: &'a GeometryValue,
    kernel: &'a Kernel,
}

impl GeometryValue {
    /// Local operations using the full kernel.
    pub fn local(&self) -> LocalOps<'_> {
        self.local_with(Kernel::global())
    }

    /// Local operations using the given kernel.
    pub fn local_with<'a>(&'a self, kernel: &'a Kernel) -> LocalOps<'a> {
        LocalOps {
            value: self,
            kernel,
        }
    }

    /// Unions all values locally. All of them must share the same spatial reference.
    pub fn unary_union(values: &[GeometryValue]) -> Result<GeometryValue, GeoProxyTypesError> {
        let first = values
            .first()
            .ok_or_else(|| GeoProxyTypesError::InvalidInput("no geometries to union".into()))?;
        let sr = first.spatial_reference();
        if let Some(other) = values.iter().find(|v| v.spatial_reference() != sr) {
            return Err(GeoProxyTypesError::SpatialReferenceMismatch(format!(
                "{sr} and {}",
                other.spatial_reference()
            )));
        }

        let geometries: Vec<Geometry> = values.iter().map(GeometryValue::geometry).collect();
        let union = Kernel::global().aggregate("unary_union", &geometries)?;
        GeometryValue::from_geo(union, sr.clone())
    }
}

impl LocalOps<'_> {
    fn geometry(&self, operation: &str) -> Result<Geometry, GeoProxyTypesError> {
        self.value.ensure_not_empty(operation)?;
        Ok(self.value.geometry())
    }

    fn other_geometry(
        &self,
        other: &GeometryValue,
        operation: &str,
    ) -> Result<Geometry, GeoProxyTypesError> {
        if self.value.spatial_reference() != other.spatial_reference() {
            return Err(GeoProxyTypesError::SpatialReferenceMismatch(format!(
                "{} and {}",
                self.value.spatial_reference(),
                other.spatial_reference()
            )));
        }
        other.ensure_not_empty(operation)?;
        Ok(other.geometry())
    }

    fn wrap(&self, geometry: Geometry) -> Result<GeometryValue, GeoProxyTypesError> {
        GeometryValue::from_geo(geometry, self.value.spatial_reference().clone())
    }

    /// Planar area.
    pub fn area(&self) -> Result<f64, GeoProxyTypesError> {
        self.kernel.measure("area", &self.geometry("area")?)
    }

    /// Planar length of lines, perimeter of polygons.
    pub fn length(&self) -> Result<f64, GeoProxyTypesError> {
        self.kernel.measure("length", &self.geometry("length")?)
    }

    /// Returns true if the geometry is valid according to OGC rules.
    pub fn is_valid(&self) -> Result<bool, GeoProxyTypesError> {
        self.kernel.predicate("is_valid", &self.value.geometry())
    }

    /// Returns true if the geometry is a closed simple line string.
    pub fn is_ring(&self) -> Result<bool, GeoProxyTypesError> {
        self.kernel.predicate("is_ring", &self.value.geometry())
    }

    #[allow(missing_docs)]
    pub fn centroid(&self) -> Result<GeometryValue, GeoProxyTypesError> {
        self.wrap(self.kernel.transform("centroid", &self.geometry("centroid")?)?)
    }

    /// Bounding rectangle as a polygon.
    pub fn envelope(&self) -> Result<GeometryValue, GeoProxyTypesError> {
        self.wrap(self.kernel.transform("envelope", &self.geometry("envelope")?)?)
    }

    #[allow(missing_docs)]
    pub fn convex_hull(&self) -> Result<GeometryValue, GeoProxyTypesError> {
        self.wrap(
            self.kernel
                .transform("convex_hull", &self.geometry("convex_hull")?)?,
        )
    }

    /// Round buffer.
    pub fn buffer(&self, distance: f64) -> Result<GeometryValue, GeoProxyTypesError> {
        self.buffer_with_style(&BufferParams::new(distance))
    }

    /// Buffer with cap and join styles. Non-round styles fail with
    /// [`GeoProxyTypesError::NotImplemented`] if the kernel has no styled buffer.
    pub fn buffer_with_style(
        &self,
        params: &BufferParams,
    ) -> Result<GeometryValue, GeoProxyTypesError> {
        self.wrap(self.kernel.buffer(&self.geometry("buffer")?, params)?)
    }

    /// Douglas-Peucker simplification, or topology preserving simplification if requested.
    pub fn simplify(
        &self,
        tolerance: f64,
        preserve_topology: bool,
    ) -> Result<GeometryValue, GeoProxyTypesError> {
        let name = if preserve_topology {
            "topology_preserve_simplify"
        } else {
            "simplify"
        };
        self.wrap(
            self.kernel
                .parametrized(name, &self.geometry("simplify")?, tolerance)?,
        )
    }

    /// Planar distance.
    pub fn distance(&self, other: &GeometryValue) -> Result<f64, GeoProxyTypesError> {
        let b = self.other_geometry(other, "distance")?;
        self.kernel
            .binary_measure("distance", &self.geometry("distance")?, &b)
    }

    #[allow(missing_docs)]
    pub fn hausdorff_distance(&self, other: &GeometryValue) -> Result<f64, GeoProxyTypesError> {
        let b = self.other_geometry(other, "hausdorff_distance")?;
        self.kernel.binary_measure(
            "hausdorff_distance",
            &self.geometry("hausdorff_distance")?,
            &b,
        )
    }

    fn set_operation(
        &self,
        name: &str,
        other: &GeometryValue,
    ) -> Result<GeometryValue, GeoProxyTypesError> {
        let b = self.other_geometry(other, name)?;
        self.wrap(
            self.kernel
                .binary_transform(name, &self.value.geometry(), &b)?,
        )
    }

    #[allow(missing_docs)]
    pub fn union(&self, other: &GeometryValue) -> Result<GeometryValue, GeoProxyTypesError> {
        self.set_operation("union", other)
    }

    #[allow(missing_docs)]
    pub fn intersection(&self, other: &GeometryValue) -> Result<GeometryValue, GeoProxyTypesError> {
        self.set_operation("intersection", other)
    }

    #[allow(missing_docs)]
    pub fn difference(&self, other: &GeometryValue) -> Result<GeometryValue, GeoProxyTypesError> {
        self.set_operation("difference", other)
    }

    #[allow(missing_docs)]
    pub fn symmetric_difference(
        &self,
        other: &GeometryValue,
    ) -> Result<GeometryValue, GeoProxyTypesError> {
        self.set_operation("symmetric_difference", other)
    }

    /// Evaluates a named binary predicate such as `contains` or `touches`.
    pub fn predicate(&self, name: &str, other: &GeometryValue) -> Result<bool, GeoProxyTypesError> {
        let b = self.other_geometry(other, name)?;
        self.kernel
            .binary_predicate(name, &self.value.geometry(), &b)
    }

    #[allow(missing_docs)]
    pub fn contains(&self, other: &GeometryValue) -> Result<bool, GeoProxyTypesError> {
        self.predicate("contains", other)
    }

    #[allow(missing_docs)]
    pub fn intersects(&self, other: &GeometryValue) -> Result<bool, GeoProxyTypesError> {
        self.predicate("intersects", other)
    }

    /// DE-9IM intersection matrix.
    pub fn relate(&self, other: &GeometryValue) -> Result<String, GeoProxyTypesError> {
        let b = self.other_geometry(other, "relate")?;
        self.kernel.relate(&self.value.geometry(), &b)
    }

    /// Checks the DE-9IM matrix against a pattern.
    pub fn relate_pattern(
        &self,
        other: &GeometryValue,
        pattern: &str,
    ) -> Result<bool, GeoProxyTypesError> {
        let b = self.other_geometry(other, "relate")?;
        self.kernel
            .relate_pattern(&self.value.geometry(), &b, pattern)
    }

    /// Same variant, same spatial reference and every coordinate within the tolerance.
    pub fn equals_exact(&self, other: &GeometryValue, tolerance: f64) -> bool {
        let (a, b) = (self.value.geometry(), other.geometry());
        self.value.kind() == other.kind()
            && self.value.spatial_reference() == other.spatial_reference()
            && a.coords_count() == b.coords_count()
            && a.coords_iter()
                .zip(b.coords_iter())
                .all(|(p, q)| (p.x - q.x).abs() <= tolerance && (p.y - q.y).abs() <= tolerance)
    }

    /// Point halfway between this point and another one.
    ///
    /// Both must be points of the same dimensionality. Z is averaged for 3D points. The
    /// geodetic variant is not available.
    pub fn midpoint(
        &self,
        other: &GeometryValue,
        geodetic: bool,
    ) -> Result<GeometryValue, GeoProxyTypesError> {
        if geodetic {
            return Err(GeoProxyTypesError::NotImplemented(
                "geodetic midpoint".into(),
            ));
        }

        let (Shape::Point(a), Shape::Point(b)) = (self.value.shape(), other.shape()) else {
            return Err(GeoProxyTypesError::InvalidInput(
                "midpoint requires two points".into(),
            ));
        };
        if self.value.dimension() != other.dimension() {
            return Err(GeoProxyTypesError::InvalidInput(
                "midpoint requires points of the same dimension".into(),
            ));
        }
        self.other_geometry(other, "midpoint")?;

        let mid = planar_midpoint(a.0, b.0);
        match (self.value.dimension(), self.value.z(), other.z()) {
            (Dimension::Xyz, Some(za), Some(zb)) => GeometryValue::point_z(
                mid.x,
                mid.y,
                (za + zb) / 2.0,
                self.value.spatial_reference().clone(),
            ),
            _ => self.wrap(Point(mid).into()),
        }
    }
}
