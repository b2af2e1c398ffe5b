use std::ffi::c_int;
use std::path::Path;
use std::ptr;

use gdal::cpl::CslStringList;
use gdal::{Dataset, DriverManager};

use crate::errors::*;
use crate::raster::DataType;
use crate::utils::{_last_null_pointer_err, _path_to_c_string};

/// Driver for in-memory datasets.
pub const MEM_DRIVER: &str = "MEM";
/// Driver for GeoTIFF files.
pub const GTIFF_DRIVER: &str = "GTiff";

fn to_c_int(value: usize, what: &str) -> Result<c_int> {
    c_int::try_from(value).map_err(|_| {
        GazarError::BadArgument(format!("{what} of {value} exceeds the GDAL limit of {}", c_int::MAX))
    })
}

fn creation_options(options: &[(&str, &str)]) -> Result<CslStringList> {
    let mut list = CslStringList::new();
    for (name, value) in options {
        list.set_name_value(name, value)?;
    }
    Ok(list)
}

/// Creates a raster dataset of `x_size` by `y_size` cells with `bands` bands
/// of `data_type` using the driver named `driver_name`.
///
/// `MEM` datasets ignore `path`.
pub fn create_dataset<P: AsRef<Path>>(
    driver_name: &str,
    path: P,
    size: (usize, usize),
    bands: usize,
    data_type: DataType,
) -> Result<Dataset> {
    if size.0 == 0 || size.1 == 0 || bands == 0 {
        return Err(GazarError::BadArgument(format!(
            "cannot create a {}x{} raster with {} band(s)",
            size.0, size.1, bands
        )));
    }
    let x_size = to_c_int(size.0, "raster width")?;
    let y_size = to_c_int(size.1, "raster height")?;
    let band_count = to_c_int(bands, "band count")?;
    let driver = DriverManager::get_driver_by_name(driver_name)?;
    let c_filename = _path_to_c_string(path.as_ref())?;
    log::trace!(
        "Creating {driver_name} dataset {:?} ({}x{}, bands={bands}, type={data_type})",
        path.as_ref(),
        size.0,
        size.1
    );

    let c_dataset = unsafe {
        gdal_sys::GDALCreate(
            driver.c_driver(),
            c_filename.as_ptr(),
            x_size,
            y_size,
            band_count,
            data_type.gdal_ordinal(),
            ptr::null_mut(),
        )
    };
    if c_dataset.is_null() {
        return Err(_last_null_pointer_err("GDALCreate"));
    }
    Ok(unsafe { Dataset::from_c_dataset(c_dataset) })
}

/// Copies `source` into a new dataset written by the driver named
/// `driver_name`, passing `options` as creation options.
pub fn create_copy<P: AsRef<Path>>(
    source: &Dataset,
    driver_name: &str,
    path: P,
    options: &[(&str, &str)],
) -> Result<Dataset> {
    let driver = DriverManager::get_driver_by_name(driver_name)?;
    let c_options = creation_options(options)?;
    log::debug!("Writing {driver_name} copy to {:?}", path.as_ref());
    Ok(source.create_copy(&driver, path, &c_options)?)
}
