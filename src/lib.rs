#![crate_name = "gazar"]
#![crate_type = "lib"]

//! Grid tools on top of [GDAL](https://gdal.org/).
//!
//! This crate wraps the [`gdal`] bindings with the operations raster
//! preprocessing keeps needing:
//!
//! * [`GdalGrid`] opens a raster and converts between cells, projected
//!   coordinates and longitude/latitude, reports its extent in any projection,
//!   warps it and writes GeoTIFF, GRASS ASCII or ARC/INFO ASCII grids.
//! * [`ArrayGrid`] builds a grid from [`ndarray`] arrays.
//! * [`resample_grid`] warps one grid onto the cells of another.
//! * [`shape::rasterize_shapefile`] burns a vector layer into a new grid.
//!
//! ## Use
//!
//! ```rust, no_run
//! # fn main() -> gazar::errors::Result<()> {
//! use gazar::{resample_grid, GdalGrid, ResampleOptions};
//!
//! let elevation = GdalGrid::open("gmted_elevation.tif")?;
//! println!("UTM extent: {:?}", elevation.utm_bounds()?);
//!
//! let (lon, lat) = elevation.pixel2lonlat(5, 10)?;
//! assert_eq!(elevation.lonlat2pixel(lon, lat)?, (5, 10));
//!
//! let resampled = resample_grid(&elevation, "mask.tif", ResampleOptions::default())?;
//! resampled.to_arc_ascii("resampled.asc", 1, true)?;
//! # Ok(())
//! # }
//! ```
//!
//! Log records go through the [`log`] facade; [`log_to_console`] and
//! [`log_to_file`] provide a ready-made logger.

pub mod errors;
pub mod geo_transform;
pub mod grid;
pub mod logging;
pub mod raster;
pub mod shape;
pub mod spatial_ref;
mod utils;
pub mod version;

pub use geo_transform::{Bounds, GeoTransform, GeoTransformEx, GeoTransformExt};
pub use grid::{
    resample_grid, ArrayGrid, ArrayGridOptions, GdalGrid, GridSource, MaskedBand,
    ResampleOptions,
};
pub use logging::{log_to_console, log_to_file};
pub use raster::{DataType, ResampleMethod};
pub use shape::rasterize_shapefile;
pub use spatial_ref::utm_proj_from_latlon;
pub use version::{gdal_version, version, VERSION};

#[cfg(test)]
mod test_utils;
