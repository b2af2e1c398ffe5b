use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::errors::*;
use crate::grid::GdalGrid;
use crate::raster::{
    create_dataset, fill, reproject_image, set_no_data_value, DataType, ResampleMethod,
    GTIFF_DRIVER, MEM_DRIVER,
};

/// A grid given either as a file to open or as an already open grid.
#[derive(Debug, Clone, Copy)]
pub enum GridSource<'a> {
    Path(&'a Path),
    Grid(&'a GdalGrid),
}

impl<'a> From<&'a Path> for GridSource<'a> {
    fn from(path: &'a Path) -> Self {
        GridSource::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for GridSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        GridSource::Path(path.as_path())
    }
}

impl<'a> From<&'a str> for GridSource<'a> {
    fn from(path: &'a str) -> Self {
        GridSource::Path(Path::new(path))
    }
}

impl<'a> From<&'a GdalGrid> for GridSource<'a> {
    fn from(grid: &'a GdalGrid) -> Self {
        GridSource::Grid(grid)
    }
}

enum Resolved<'a> {
    Owned(GdalGrid),
    Borrowed(&'a GdalGrid),
}

impl<'a> GridSource<'a> {
    fn resolve(self) -> Result<Resolved<'a>> {
        Ok(match self {
            GridSource::Path(path) => Resolved::Owned(GdalGrid::open(path)?),
            GridSource::Grid(grid) => Resolved::Borrowed(grid),
        })
    }
}

impl Deref for Resolved<'_> {
    type Target = GdalGrid;

    fn deref(&self) -> &GdalGrid {
        match self {
            Resolved::Owned(grid) => grid,
            Resolved::Borrowed(grid) => grid,
        }
    }
}

/// Options for [`resample_grid`].
#[derive(Debug, Clone, Default)]
pub struct ResampleOptions {
    /// Writes the result as a GeoTIFF at this path. The result stays in
    /// memory when `None`.
    pub to_file: Option<PathBuf>,
    /// Band type of the result. Defaults to the type of the source grid.
    pub data_type: Option<DataType>,
    /// Defaults to [`ResampleMethod::Average`].
    pub method: ResampleMethod,
}

/// Warps `original` onto the size, geotransform and projection of
/// `match_grid`.
///
/// Every band of `original` is resampled. The source nodata value, when
/// there is one, is set on the result and fills the cells the source does
/// not cover.
///
/// ```rust, no_run
/// # fn main() -> gazar::errors::Result<()> {
/// use gazar::{resample_grid, ResampleOptions};
///
/// let resampled = resample_grid(
///     "era_raw.tif",
///     "v_mask.tif",
///     ResampleOptions {
///         to_file: Some("resampled.tif".into()),
///         ..Default::default()
///     },
/// )?;
/// assert_eq!(resampled.epsg(), Some(32651));
/// # Ok(())
/// # }
/// ```
pub fn resample_grid<'a, 'b>(
    original: impl Into<GridSource<'a>>,
    match_grid: impl Into<GridSource<'b>>,
    options: ResampleOptions,
) -> Result<GdalGrid> {
    let original = original.into().resolve()?;
    let match_grid = match_grid.into().resolve()?;

    let data_type = match options.data_type {
        Some(data_type) => data_type,
        None => original.data_type()?,
    };
    let (driver_name, path) = match &options.to_file {
        Some(path) => (GTIFF_DRIVER, path.clone()),
        None => (MEM_DRIVER, PathBuf::new()),
    };
    log::info!(
        "Resampling {}x{} grid onto {}x{} grid",
        original.x_size(),
        original.y_size(),
        match_grid.x_size(),
        match_grid.y_size()
    );

    let num_bands = original.num_bands();
    let mut dst = create_dataset(
        driver_name,
        &path,
        (match_grid.x_size(), match_grid.y_size()),
        num_bands,
        data_type,
    )?;
    dst.set_geo_transform(&match_grid.geotransform())?;
    dst.set_spatial_ref(match_grid.spatial_ref())?;
    for band in 1..=num_bands {
        if let Some(nodata) = original.nodata(band)? {
            set_no_data_value(&dst, band, nodata)?;
            fill(&dst, band, nodata)?;
        }
    }

    reproject_image(original.dataset(), &dst, options.method)?;
    dst.flush_cache()?;
    GdalGrid::from_dataset(dst)
}
