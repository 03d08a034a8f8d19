//! Spatial reference values attached to every geometry.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::GeoProxyTypesError;

/// EPSG code of the WGS84 geographic coordinate system.
pub const WGS84_CODE: i32 = 4326;

/// Identifies the coordinate system of a geometry.
///
/// Exactly one representation is authoritative. Equality is exact within a representation: two
/// spatial references describing the same coordinate system in different representations (for
/// example `Code(4326)` and the matching proj-string) are **not** equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialReference {
    /// Registry (EPSG) code.
    Code(i32),
    /// Proj-string definition, e.g. `+proj=utm +zone=32 +datum=WGS84`.
    Proj4(String),
    /// Well-known-text definition.
    Wkt(String),
    /// Local Lambert azimuthal equal-area projection centred at the given point (degrees).
    Custom {
        /// Central longitude.
        lon_0: f64,
        /// Central latitude.
        lat_0: f64,
    },
}

impl SpatialReference {
    /// WGS84 geographic coordinates.
    pub const WGS84: Self = Self::Code(WGS84_CODE);

    /// Web Mercator projection.
    pub const WEB_MERCATOR: Self = Self::Code(3857);

    /// Creates a local projection centred at the given point.
    pub fn custom(lon_0: f64, lat_0: f64) -> Self {
        Self::Custom { lon_0, lat_0 }
    }

    /// Selects the authoritative representation from a set of optional ones.
    ///
    /// Precedence is code > proj-string > WKT > custom parameters. Zero codes and empty strings
    /// are treated as absent. Returns [`GeoProxyTypesError::MissingSpatialReference`] if nothing
    /// is set.
    pub fn from_parts(
        code: Option<i32>,
        proj4: Option<&str>,
        wkt: Option<&str>,
        custom: Option<(f64, f64)>,
    ) -> Result<Self, GeoProxyTypesError> {
        if let Some(code) = code.filter(|c| *c != 0) {
            return Ok(Self::Code(code));
        }
        if let Some(proj4) = proj4.filter(|s| !s.is_empty()) {
            return Ok(Self::Proj4(proj4.to_string()));
        }
        if let Some(wkt) = wkt.filter(|s| !s.is_empty()) {
            return Ok(Self::Wkt(wkt.to_string()));
        }
        if let Some((lon_0, lat_0)) = custom {
            return Ok(Self::Custom { lon_0, lat_0 });
        }

        Err(GeoProxyTypesError::MissingSpatialReference)
    }

    /// Returns true for locally defined projections that are not part of any registry.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    /// Returns the registry code, if this is a code reference.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Code(code) => Some(*code),
            _ => None,
        }
    }

    /// Returns true if this reference is WGS84 geographic coordinates given by code.
    pub fn is_wgs84(&self) -> bool {
        self.code() == Some(WGS84_CODE)
    }
}

impl Display for SpatialReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => write!(f, "EPSG:{code}"),
            Self::Proj4(definition) => write!(f, "{definition}"),
            Self::Wkt(wkt) => write!(f, "{wkt}"),
            Self::Custom { lon_0, lat_0 } => write!(f, "custom(lon_0={lon_0}, lat_0={lat_0})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn equality_is_per_representation() {
        assert_eq!(SpatialReference::Code(4326), SpatialReference::WGS84);
        assert_ne!(SpatialReference::Code(4326), SpatialReference::Code(3857));
        assert_ne!(
            SpatialReference::Code(4326),
            SpatialReference::Proj4("+proj=longlat +datum=WGS84 +no_defs".into())
        );
        assert_eq!(
            SpatialReference::custom(10.0, 52.0),
            SpatialReference::custom(10.0, 52.0)
        );
        assert_ne!(
            SpatialReference::custom(10.0, 52.0),
            SpatialReference::custom(10.0, 52.5)
        );
    }

    #[test]
    fn from_parts_precedence() {
        let sr = SpatialReference::from_parts(
            Some(32632),
            Some("+proj=utm +zone=32"),
            Some("PROJCS[...]"),
            Some((1.0, 2.0)),
        );
        assert_eq!(sr, Ok(SpatialReference::Code(32632)));

        let sr = SpatialReference::from_parts(Some(0), Some(""), Some("PROJCS[...]"), None);
        assert_eq!(sr, Ok(SpatialReference::Wkt("PROJCS[...]".into())));

        let sr = SpatialReference::from_parts(None, None, None, Some((1.0, 2.0)));
        assert_eq!(sr, Ok(SpatialReference::custom(1.0, 2.0)));
    }

    #[test]
    fn from_parts_requires_something() {
        assert_matches!(
            SpatialReference::from_parts(Some(0), Some(""), None, None),
            Err(GeoProxyTypesError::MissingSpatialReference)
        );
    }

    #[test]
    fn locality() {
        assert!(SpatialReference::custom(0.0, 0.0).is_local());
        assert!(!SpatialReference::WEB_MERCATOR.is_local());
        assert!(!SpatialReference::Proj4("+proj=merc".into()).is_local());
    }

    #[test]
    fn serde_representation() {
        let json = serde_json::to_string(&SpatialReference::custom(10.0, 52.0)).unwrap();
        assert_eq!(json, r#"{"custom":{"lon_0":10.0,"lat_0":52.0}}"#);
        let back: SpatialReference = serde_json::from_str(r#"{"code":32632}"#).unwrap();
        assert_eq!(back, SpatialReference::Code(32632));
    }
}
