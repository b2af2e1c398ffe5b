use std::ops::Deref;

use gdal::spatial_ref::SpatialRef;
use ndarray::{Array2, Array3, Axis};

use crate::errors::*;
use crate::geo_transform::GeoTransform;
use crate::grid::GdalGrid;
use crate::raster::{create_dataset, set_no_data_value, write_band, DataType, MEM_DRIVER};

/// A band of values paired with a mask of the nodata cells.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedBand {
    pub data: Array2<f64>,
    /// `true` where the cell holds no data.
    pub mask: Array2<bool>,
    pub nodata: Option<f64>,
}

impl MaskedBand {
    /// Masks the cells of `data` equal to `nodata`. NaN cells are masked
    /// when `nodata` is NaN.
    pub fn new(data: Array2<f64>, nodata: Option<f64>) -> Self {
        let mask = match nodata {
            Some(nd) if nd.is_nan() => data.mapv(f64::is_nan),
            Some(nd) => data.mapv(|v| v == nd),
            None => Array2::from_elem(data.dim(), false),
        };
        MaskedBand { data, mask, nodata }
    }

    /// Values with every masked cell replaced by `value`.
    pub fn filled(&self, value: f64) -> Array2<f64> {
        let mut data = self.data.clone();
        data.zip_mut_with(&self.mask, |v, &masked| {
            if masked {
                *v = value;
            }
        });
        data
    }

    pub fn count_masked(&self) -> usize {
        self.mask.iter().filter(|&&masked| masked).count()
    }
}

/// Options for building an [`ArrayGrid`].
#[derive(Debug, Clone, Copy)]
pub struct ArrayGridOptions {
    /// Nodata value set on every band.
    pub nodata_value: Option<f64>,
    /// Band type of the in-memory raster. Defaults to `Float64`.
    pub data_type: DataType,
}

impl Default for ArrayGridOptions {
    fn default() -> Self {
        ArrayGridOptions {
            nodata_value: None,
            data_type: DataType::Float64,
        }
    }
}

/// A [`GdalGrid`] built from in-memory arrays.
///
/// The arrays are copied into a `MEM` dataset, so everything a `GdalGrid`
/// does is available through `Deref`.
///
/// ```rust, no_run
/// # fn main() -> gazar::errors::Result<()> {
/// use gazar::{ArrayGrid, ArrayGridOptions};
/// use ndarray::arr2;
///
/// let grid = ArrayGrid::from_band(
///     arr2(&[[1.0, 2.0], [3.0, -9999.0]]),
///     "EPSG:4326",
///     [120.0, 0.5, 0.0, 16.0, 0.0, -0.5],
///     ArrayGridOptions {
///         nodata_value: Some(-9999.0),
///         ..Default::default()
///     },
/// )?;
/// assert_eq!(grid.x_size(), 2);
/// grid.to_tif("from_array.tif")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ArrayGrid {
    grid: GdalGrid,
}

impl ArrayGrid {
    /// Builds a grid from values shaped `(bands, rows, cols)`, a projection
    /// in any form [`crate::spatial_ref::from_user_input`] accepts and a
    /// geotransform.
    pub fn new(
        values: Array3<f64>,
        projection: &str,
        geotransform: GeoTransform,
        options: ArrayGridOptions,
    ) -> Result<Self> {
        let projection = crate::spatial_ref::from_user_input(projection)?;
        Self::with_spatial_ref(values, &projection, geotransform, options)
    }

    /// Same as [`ArrayGrid::new`] with an already parsed projection.
    pub fn with_spatial_ref(
        values: Array3<f64>,
        projection: &SpatialRef,
        geotransform: GeoTransform,
        options: ArrayGridOptions,
    ) -> Result<Self> {
        let (bands, rows, cols) = values.dim();
        let mut dataset = create_dataset(
            MEM_DRIVER,
            "",
            (cols, rows),
            bands,
            options.data_type,
        )?;
        dataset.set_geo_transform(&geotransform)?;
        dataset.set_spatial_ref(projection)?;
        for (index, band) in values.axis_iter(Axis(0)).enumerate() {
            if let Some(nodata) = options.nodata_value {
                set_no_data_value(&dataset, index + 1, nodata)?;
            }
            write_band(&dataset, index + 1, band)?;
        }
        Ok(ArrayGrid {
            grid: GdalGrid::from_dataset(dataset)?,
        })
    }

    /// Builds a single band grid from values shaped `(rows, cols)`.
    pub fn from_band(
        values: Array2<f64>,
        projection: &str,
        geotransform: GeoTransform,
        options: ArrayGridOptions,
    ) -> Result<Self> {
        Self::new(values.insert_axis(Axis(0)), projection, geotransform, options)
    }

    /// Builds a single band grid from a masked band.
    ///
    /// Masked cells are written as `options.nodata_value`, falling back to
    /// the band's own nodata value.
    pub fn from_masked(
        band: &MaskedBand,
        projection: &str,
        geotransform: GeoTransform,
        options: ArrayGridOptions,
    ) -> Result<Self> {
        let nodata = options.nodata_value.or(band.nodata);
        let values = match nodata {
            Some(nodata) => band.filled(nodata),
            None if band.count_masked() > 0 => {
                return Err(GazarError::BadArgument(
                    "masked cells need a nodata value".to_string(),
                ))
            }
            None => band.data.clone(),
        };
        Self::from_band(
            values,
            projection,
            geotransform,
            ArrayGridOptions {
                nodata_value: nodata,
                ..options
            },
        )
    }

    pub fn into_grid(self) -> GdalGrid {
        self.grid
    }
}

impl Deref for ArrayGrid {
    type Target = GdalGrid;

    fn deref(&self) -> &GdalGrid {
        &self.grid
    }
}

impl From<ArrayGrid> for GdalGrid {
    fn from(grid: ArrayGrid) -> Self {
        grid.grid
    }
}
