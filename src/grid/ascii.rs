//! GRASS ASCII and ARC/INFO ASCII grid writers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use crate::errors::*;
use crate::geo_transform::GeoTransformExt;
use crate::grid::GdalGrid;
use crate::raster::band_data_type;

/// Null token of GRASS ASCII grids without a finite nodata value.
const GRASS_NULL: &str = "*";
/// Null token of ARC/INFO ASCII grids without a finite nodata value.
const ARC_NULL: &str = "-9999";

/// Band values and the header fields shared by both formats.
struct AsciiBand {
    values: Array2<f64>,
    nodata: Option<f64>,
    /// Written for nodata and NaN cells.
    null: String,
    integer: bool,
}

fn ascii_band(
    grid: &GdalGrid,
    band: usize,
    format: &'static str,
    default_null: &str,
) -> Result<AsciiBand> {
    if !grid.geotransform().is_north_up() {
        return Err(GazarError::RotatedGeoTransform(format));
    }
    let nodata = grid.nodata(band)?;
    let integer = band_data_type(grid.dataset(), band)?.is_integer();
    let null = match nodata {
        Some(value) if value.is_finite() => format_value(value, integer),
        _ => default_null.to_string(),
    };
    Ok(AsciiBand {
        values: grid.read_band(band)?,
        nodata,
        null,
        integer,
    })
}

impl AsciiBand {
    fn is_null(&self, value: f64) -> bool {
        value.is_nan() || self.nodata == Some(value)
    }
}

fn format_value(value: f64, integer: bool) -> String {
    if integer && value.is_finite() {
        format!("{}", value.round() as i64)
    } else {
        format!("{value}")
    }
}

fn write_values<W: Write>(out: &mut W, band: &AsciiBand) -> Result<()> {
    for row in band.values.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|&value| {
                if band.is_null(value) {
                    band.null.clone()
                } else {
                    format_value(value, band.integer)
                }
            })
            .collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

pub(super) fn write_grass_ascii(
    grid: &GdalGrid,
    path: &Path,
    band: usize,
    print_nodata: bool,
) -> Result<()> {
    let ascii = ascii_band(grid, band, "GRASS ASCII", GRASS_NULL)?;
    let bounds = grid.bounds();
    log::debug!("Writing GRASS ASCII grid {:?}", path);

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "north: {}", bounds.y_max)?;
    writeln!(out, "south: {}", bounds.y_min)?;
    writeln!(out, "east: {}", bounds.x_max)?;
    writeln!(out, "west: {}", bounds.x_min)?;
    writeln!(out, "rows: {}", grid.y_size())?;
    writeln!(out, "cols: {}", grid.x_size())?;
    if print_nodata && ascii.nodata.is_some() {
        writeln!(out, "null: {}", ascii.null)?;
    }
    write_values(&mut out, &ascii)?;
    out.flush()?;
    Ok(())
}

pub(super) fn write_arc_ascii(
    grid: &GdalGrid,
    path: &Path,
    band: usize,
    print_nodata: bool,
) -> Result<()> {
    let ascii = ascii_band(grid, band, "ARC/INFO ASCII", ARC_NULL)?;
    let bounds = grid.bounds();
    let gt = grid.geotransform();
    let (dx, dy) = (gt[1].abs(), gt[5].abs());
    log::debug!("Writing ARC/INFO ASCII grid {:?}", path);

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "ncols {}", grid.x_size())?;
    writeln!(out, "nrows {}", grid.y_size())?;
    writeln!(out, "xllcorner {}", bounds.x_min)?;
    writeln!(out, "yllcorner {}", bounds.y_min)?;
    if dx == dy {
        writeln!(out, "cellsize {dx}")?;
    } else {
        writeln!(out, "dx {dx}")?;
        writeln!(out, "dy {dy}")?;
    }
    if print_nodata && ascii.nodata.is_some() {
        writeln!(out, "NODATA_value {}", ascii.null)?;
    }
    write_values(&mut out, &ascii)?;
    out.flush()?;
    Ok(())
}
