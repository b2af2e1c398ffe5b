use gdal::raster::{Buffer, RasterBand};
use gdal::Dataset;
use ndarray::{Array2, ArrayView2};

use crate::errors::*;
use crate::raster::DataType;

pub(crate) fn band_count(dataset: &Dataset) -> usize {
    dataset.raster_count()
}

/// Fetches the 1-based `band` of `dataset`.
fn raster_band(dataset: &Dataset, band: usize) -> Result<RasterBand<'_>> {
    let num_bands = band_count(dataset);
    if band == 0 || band > num_bands {
        return Err(GazarError::BandOutOfRange { band, num_bands });
    }
    Ok(dataset.rasterband(band)?)
}

/// Reads the whole of `band` as `f64`, shaped `(rows, cols)`.
pub fn read_band(dataset: &Dataset, band: usize) -> Result<Array2<f64>> {
    let raster_band = raster_band(dataset, band)?;
    Ok(raster_band.read_band_as::<f64>()?.to_array()?)
}

/// Writes `values` over the whole of `band`; the array must match the
/// raster size.
pub fn write_band(dataset: &Dataset, band: usize, values: ArrayView2<f64>) -> Result<()> {
    let mut raster_band = raster_band(dataset, band)?;
    let (cols, rows) = dataset.raster_size();
    if values.dim() != (rows, cols) {
        return Err(GazarError::BadArgument(format!(
            "array of shape {:?} does not fit a {}x{} band",
            values.dim(),
            cols,
            rows
        )));
    }
    let mut buffer = Buffer::from(values.to_owned());
    raster_band.write((0, 0), (cols, rows), &mut buffer)?;
    Ok(())
}

pub fn no_data_value(dataset: &Dataset, band: usize) -> Result<Option<f64>> {
    Ok(raster_band(dataset, band)?.no_data_value())
}

pub fn set_no_data_value(dataset: &Dataset, band: usize, value: f64) -> Result<()> {
    let mut raster_band = raster_band(dataset, band)?;
    Ok(raster_band.set_no_data_value(Some(value))?)
}

pub fn fill(dataset: &Dataset, band: usize, value: f64) -> Result<()> {
    let mut raster_band = raster_band(dataset, band)?;
    Ok(raster_band.fill(value, None)?)
}

pub fn band_data_type(dataset: &Dataset, band: usize) -> Result<DataType> {
    Ok(raster_band(dataset, band)?.band_type().into())
}
