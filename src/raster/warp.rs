use std::ffi::{c_double, c_int, CString};
use std::mem::size_of;
use std::ptr::{null, null_mut};

use gdal::spatial_ref::SpatialRef;
use gdal::Dataset;
use gdal_sys::GDALResampleAlg;

use crate::errors::*;
use crate::raster::driver::{create_copy, MEM_DRIVER};
use crate::raster::rasterband::{band_count, no_data_value};
use crate::utils::{_check_cpl, _last_null_pointer_err};

/// Resampling algorithms understood by the GDAL warper.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResampleMethod {
    NearestNeighbour,
    Bilinear,
    Cubic,
    CubicSpline,
    Lanczos,
    /// Weighted average of all non-nodata contributing cells.
    Average,
    Mode,
    Max,
    Min,
    Med,
}

impl ResampleMethod {
    pub fn to_gdal(&self) -> GDALResampleAlg::Type {
        match self {
            ResampleMethod::NearestNeighbour => GDALResampleAlg::GRA_NearestNeighbour,
            ResampleMethod::Bilinear => GDALResampleAlg::GRA_Bilinear,
            ResampleMethod::Cubic => GDALResampleAlg::GRA_Cubic,
            ResampleMethod::CubicSpline => GDALResampleAlg::GRA_CubicSpline,
            ResampleMethod::Lanczos => GDALResampleAlg::GRA_Lanczos,
            ResampleMethod::Average => GDALResampleAlg::GRA_Average,
            ResampleMethod::Mode => GDALResampleAlg::GRA_Mode,
            ResampleMethod::Max => GDALResampleAlg::GRA_Max,
            ResampleMethod::Min => GDALResampleAlg::GRA_Min,
            ResampleMethod::Med => GDALResampleAlg::GRA_Med,
        }
    }
}

impl Default for ResampleMethod {
    fn default() -> Self {
        ResampleMethod::Average
    }
}

/// Allocates a GDAL-owned array holding `values`, freed by
/// `GDALDestroyWarpOptions`.
unsafe fn cpl_array<T: Copy>(values: &[T]) -> *mut T {
    let array = gdal_sys::CPLMalloc(size_of::<T>() * values.len()).cast::<T>();
    for (i, value) in values.iter().enumerate() {
        array.add(i).write(*value);
    }
    array
}

/// Warps every band of `src` into `dst`.
///
/// `dst` must already carry its size, geotransform and projection. Nodata
/// values set on the bands of either dataset are honoured by the warper.
pub fn reproject_image(src: &Dataset, dst: &Dataset, method: ResampleMethod) -> Result<()> {
    let num_bands = band_count(src).min(band_count(dst));
    if num_bands == 0 {
        return Err(GazarError::BadArgument(
            "reprojection needs at least one band in both datasets".to_string(),
        ));
    }
    let src_wkt = CString::new(src.projection())?;
    let dst_wkt = CString::new(dst.projection())?;

    let bands: Vec<c_int> = (1..=num_bands as c_int).collect();
    let src_nodata = (1..=num_bands)
        .map(|band| no_data_value(src, band))
        .collect::<Result<Vec<_>>>()?;
    let dst_nodata = (1..=num_bands)
        .map(|band| no_data_value(dst, band))
        .collect::<Result<Vec<_>>>()?;
    log::debug!(
        "Reprojecting {num_bands} band(s) with {method:?}, source nodata {src_nodata:?}"
    );

    let rv = unsafe {
        let options = gdal_sys::GDALCreateWarpOptions();
        (*options).nBandCount = num_bands as c_int;
        (*options).panSrcBands = cpl_array(&bands);
        (*options).panDstBands = cpl_array(&bands);
        if src_nodata.iter().all(Option::is_some) {
            let values: Vec<c_double> = src_nodata.iter().flatten().copied().collect();
            (*options).padfSrcNoDataReal = cpl_array(&values);
        }
        if dst_nodata.iter().all(Option::is_some) {
            let values: Vec<c_double> = dst_nodata.iter().flatten().copied().collect();
            (*options).padfDstNoDataReal = cpl_array(&values);
        }

        let rv = gdal_sys::GDALReprojectImage(
            src.c_dataset(),
            if src_wkt.as_bytes().is_empty() {
                null()
            } else {
                src_wkt.as_ptr()
            },
            dst.c_dataset(),
            if dst_wkt.as_bytes().is_empty() {
                null()
            } else {
                dst_wkt.as_ptr()
            },
            method.to_gdal(),
            0.0,
            0.0,
            None,
            null_mut(),
            options,
        );
        gdal_sys::GDALDestroyWarpOptions(options);
        rv
    };
    _check_cpl(rv)
}

/// Reprojects `src` into `dst_srs`, letting GDAL choose the output size and
/// geotransform. The result is materialized in memory.
pub fn auto_warp(src: &Dataset, dst_srs: &SpatialRef, method: ResampleMethod) -> Result<Dataset> {
    let dst_wkt = CString::new(dst_srs.to_wkt()?)?;
    log::debug!("Warping dataset to new projection with {method:?}");

    let c_vrt = unsafe {
        gdal_sys::GDALAutoCreateWarpedVRT(
            src.c_dataset(),
            null(),
            dst_wkt.as_ptr(),
            method.to_gdal(),
            0.0,
            null(),
        )
    };
    if c_vrt.is_null() {
        return Err(_last_null_pointer_err("GDALAutoCreateWarpedVRT"));
    }
    // the warped VRT reads lazily from `src`, copy it out while `src` lives
    let vrt = unsafe { Dataset::from_c_dataset(c_vrt) };
    create_copy(&vrt, MEM_DRIVER, "", &[])
}
