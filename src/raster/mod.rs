//! GDAL raster plumbing shared by the grid and shape tools.

mod driver;
mod rasterband;
mod types;
mod warp;

pub use driver::{create_copy, create_dataset, GTIFF_DRIVER, MEM_DRIVER};
pub use rasterband::{
    band_data_type, fill, no_data_value, read_band, set_no_data_value, write_band,
};
pub(crate) use rasterband::band_count;
pub use types::DataType;
pub use warp::{auto_warp, reproject_image, ResampleMethod};
