//! Spatial reference helpers on top of [`gdal::spatial_ref::SpatialRef`].

use std::ptr;

use gdal::spatial_ref::{CoordTransform, SpatialRef};
use gdal_sys::{OGRSpatialReferenceH, OSRAxisMappingStrategy};

use crate::errors::{GazarError, Result};
use crate::utils::_string;

/// EPSG code of WGS 84 geographic coordinates.
pub const WGS84_EPSG: u32 = 4326;

/// Returns the UTM zone number (1 - 60) containing longitude `lon`.
pub fn utm_zone(lon: f64) -> u8 {
    let zone = ((lon + 180.0) / 6.0).floor() as i64 + 1;
    zone.clamp(1, 60) as u8
}

/// Returns the PROJ4 definition of the WGS 84 UTM zone containing the point.
///
/// ```rust
/// use gazar::utm_proj_from_latlon;
///
/// assert_eq!(
///     utm_proj_from_latlon(-25.2744, 133.7751),
///     "+proj=utm +zone=53 +south +datum=WGS84 +units=m +no_defs"
/// );
/// ```
pub fn utm_proj_from_latlon(lat: f64, lon: f64) -> String {
    let south = if lat < 0.0 { " +south" } else { "" };
    format!(
        "+proj=utm +zone={}{} +datum=WGS84 +units=m +no_defs",
        utm_zone(lon),
        south
    )
}

/// Forces longitude/easting first axis order on `srs`.
///
/// GDAL 3 honours the authority axis order (latitude first for EPSG:4326);
/// all coordinate pairs handled by this crate are `(x, y)`.
pub fn traditional_order(srs: SpatialRef) -> SpatialRef {
    unsafe {
        gdal_sys::OSRSetAxisMappingStrategy(
            srs.to_c_hsrs(),
            OSRAxisMappingStrategy::OAMS_TRADITIONAL_GIS_ORDER,
        )
    };
    srs
}

/// WGS 84 geographic coordinates, longitude first.
pub fn wgs84() -> Result<SpatialRef> {
    Ok(traditional_order(SpatialRef::from_epsg(WGS84_EPSG)?))
}

/// UTM projection for a latitude/longitude, longitude first.
pub fn utm_from_latlon(lat: f64, lon: f64) -> Result<SpatialRef> {
    let proj4 = utm_proj_from_latlon(lat, lon);
    log::debug!("Using UTM projection '{proj4}'");
    Ok(traditional_order(SpatialRef::from_proj4(&proj4)?))
}

/// Parses a projection given as WKT, ESRI WKT, PROJ4 or `EPSG:<code>`.
pub fn from_user_input(definition: &str) -> Result<SpatialRef> {
    let definition = definition.trim();
    if definition.is_empty() {
        return Err(GazarError::BadArgument(
            "empty projection definition".to_string(),
        ));
    }
    let srs = SpatialRef::from_definition(definition)
        .or_else(|_| SpatialRef::from_esri(definition))?;
    Ok(traditional_order(srs))
}

fn epsg_authority_code(c_srs: OGRSpatialReferenceH) -> Option<u32> {
    let name = _string(unsafe { gdal_sys::OSRGetAuthorityName(c_srs, ptr::null()) });
    if name != "EPSG" {
        return None;
    }
    _string(unsafe { gdal_sys::OSRGetAuthorityCode(c_srs, ptr::null()) })
        .parse()
        .ok()
}

/// EPSG code of `srs`, identifying it from its definition when no authority
/// is attached.
pub fn epsg_code(srs: &SpatialRef) -> Option<u32> {
    let srs = srs.clone();
    let c_srs = unsafe { srs.to_c_hsrs() };
    epsg_authority_code(c_srs).or_else(|| {
        // OGRERR_UNSUPPORTED_SRS just means there is no matching code
        unsafe { gdal_sys::OSRAutoIdentifyEPSG(c_srs) };
        epsg_authority_code(c_srs)
    })
}

/// Transforms a single `(x, y)` point between two spatial references.
pub(crate) fn transform_point(transform: &CoordTransform, x: f64, y: f64) -> Result<(f64, f64)> {
    let mut xs = [x];
    let mut ys = [y];
    transform.transform_coords(&mut xs, &mut ys, &mut [])?;
    Ok((xs[0], ys[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_near;

    #[test]
    fn test_utm_from_latlon() {
        assert_eq!(
            utm_proj_from_latlon(-25.2744, 133.7751),
            "+proj=utm +zone=53 +south +datum=WGS84 +units=m +no_defs"
        );
        assert_eq!(
            utm_proj_from_latlon(15.5, 121.5),
            "+proj=utm +zone=51 +datum=WGS84 +units=m +no_defs"
        );
    }

    #[test]
    fn test_utm_zone_edges() {
        assert_eq!(utm_zone(-180.0), 1);
        assert_eq!(utm_zone(-177.0), 1);
        assert_eq!(utm_zone(0.0), 31);
        assert_eq!(utm_zone(179.99), 60);
        assert_eq!(utm_zone(180.0), 60);
    }

    #[test]
    fn test_epsg_code() {
        let srs = wgs84().unwrap();
        assert_eq!(epsg_code(&srs), Some(4326));

        let utm = SpatialRef::from_epsg(32651).unwrap();
        assert_eq!(epsg_code(&utm), Some(32651));

        // no authority in a PROJ4 definition, the code is identified
        let utm = utm_from_latlon(15.5, 121.5).unwrap();
        assert_eq!(epsg_code(&utm), Some(32651));
    }

    #[test]
    fn test_from_user_input() {
        let wkt = wgs84().unwrap().to_wkt().unwrap();
        let srs = from_user_input(&wkt).unwrap();
        assert_eq!(epsg_code(&srs), Some(4326));

        let srs = from_user_input("EPSG:32651").unwrap();
        assert_eq!(epsg_code(&srs), Some(32651));

        assert!(from_user_input("  ").is_err());
    }

    #[test]
    fn test_transform_point_keeps_lon_lat_order() {
        let utm = utm_from_latlon(15.5, 121.5).unwrap();
        let transform = CoordTransform::new(&wgs84().unwrap(), &utm).unwrap();
        let (x, y) = transform_point(&transform, 123.0, 0.0).unwrap();
        // the central meridian of zone 51 maps to the false easting
        assert_near!(x, 500_000.0, epsilon = 1e-3);
        assert_near!(y, 0.0, epsilon = 1e-3);
    }
}
