use geoproxy_types::{GeometryValue, Payload, SpatialReference};

use crate::error::GeoProxyProtoError;
use crate::messages::{
    geometry_data, spatial_reference_data, EnvelopeData, GeometryData, SpatialReferenceData,
};

impl From<&SpatialReference> for SpatialReferenceData {
    fn from(value: &SpatialReference) -> Self {
        let mut data = SpatialReferenceData::default();
        match value {
            SpatialReference::Code(code) => data.code = *code,
            SpatialReference::Proj4(definition) => data.proj4 = definition.clone(),
            SpatialReference::Wkt(wkt) => data.wkt = wkt.clone(),
            SpatialReference::Custom { lon_0, lat_0 } => {
                data.custom = Some(spatial_reference_data::Custom {
                    lon_0: *lon_0,
                    lat_0: *lat_0,
                })
            }
        }
        data
    }
}

impl TryFrom<&SpatialReferenceData> for SpatialReference {
    type Error = GeoProxyProtoError;

    fn try_from(value: &SpatialReferenceData) -> Result<Self, Self::Error> {
        let populated = [
            value.code != 0,
            !value.proj4.is_empty(),
            !value.wkt.is_empty(),
            value.custom.is_some(),
        ];
        if populated.iter().filter(|set| **set).count() > 1 {
            log::debug!("Spatial reference has several representations set, using the first of code, proj4, wkt, custom");
        }

        Ok(SpatialReference::from_parts(
            Some(value.code),
            Some(&value.proj4),
            Some(&value.wkt),
            value.custom.map(|c| (c.lon_0, c.lat_0)),
        )?)
    }
}

impl From<geoproxy_types::Encoding> for crate::messages::Encoding {
    fn from(value: geoproxy_types::Encoding) -> Self {
        match value {
            geoproxy_types::Encoding::Wkb => Self::Wkb,
            geoproxy_types::Encoding::Wkt => Self::Wkt,
        }
    }
}

impl From<crate::messages::Encoding> for geoproxy_types::Encoding {
    fn from(value: crate::messages::Encoding) -> Self {
        match value {
            crate::messages::Encoding::Wkb => Self::Wkb,
            crate::messages::Encoding::Wkt => Self::Wkt,
        }
    }
}

/// Exports a geometry value in the given encoding.
pub fn geometry_data(
    value: &GeometryValue,
    encoding: geoproxy_types::Encoding,
) -> Result<GeometryData, GeoProxyProtoError> {
    let data = match value.encode(encoding)? {
        Payload::Wkb(bytes) => geometry_data::Data::Wkb(bytes),
        Payload::Wkt(text) => geometry_data::Data::Wkt(text),
    };

    Ok(GeometryData {
        spatial_reference: Some(value.spatial_reference().into()),
        data: Some(data),
    })
}

impl TryFrom<&GeometryValue> for GeometryData {
    type Error = GeoProxyProtoError;

    /// Exports the value keeping its original encoding.
    fn try_from(value: &GeometryValue) -> Result<Self, Self::Error> {
        geometry_data(value, value.payload().encoding())
    }
}

impl TryFrom<&GeometryData> for GeometryValue {
    type Error = GeoProxyProtoError;

    fn try_from(value: &GeometryData) -> Result<Self, Self::Error> {
        let sr = value
            .spatial_reference
            .as_ref()
            .ok_or(geoproxy_types::GeoProxyTypesError::MissingSpatialReference)?;
        let sr = SpatialReference::try_from(sr)?;

        let payload = match &value.data {
            Some(geometry_data::Data::Wkb(bytes)) => Payload::Wkb(bytes.clone()),
            Some(geometry_data::Data::Wkt(text)) => Payload::Wkt(text.clone()),
            None => return Err(GeoProxyProtoError::MissingField("geometry_data.data")),
        };

        Ok(GeometryValue::from_payload(payload, sr)?)
    }
}

impl TryFrom<&GeometryValue> for EnvelopeData {
    type Error = GeoProxyProtoError;

    fn try_from(value: &GeometryValue) -> Result<Self, Self::Error> {
        value.ensure_not_empty("envelope")?;
        let bounds = value
            .bounds()
            .ok_or_else(|| geoproxy_types::GeoProxyTypesError::EmptyGeometry("envelope".into()))?;

        Ok(EnvelopeData {
            xmin: bounds.min().x,
            ymin: bounds.min().y,
            xmax: bounds.max().x,
            ymax: bounds.max().y,
            spatial_reference: Some(value.spatial_reference().into()),
        })
    }
}
