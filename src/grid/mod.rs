//! Georeferenced grids backed by GDAL datasets.
//!
//! [`GdalGrid`] wraps any raster GDAL can open, [`ArrayGrid`] builds one from
//! in-memory arrays. Both convert between cell indices and coordinates, report
//! their extent in any projection and write GeoTIFF, GRASS ASCII and ARC/INFO
//! ASCII grids.
//!
//! ```rust, no_run
//! # fn main() -> gazar::errors::Result<()> {
//! use gazar::GdalGrid;
//!
//! let grid = GdalGrid::open("elevation.tif")?;
//! let (x, y) = grid.pixel2coord(5, 10)?;
//! assert_eq!(grid.coord2pixel(x, y)?, (5, 10));
//! grid.to_grass_ascii("elevation.asc", 1, true)?;
//! # Ok(())
//! # }
//! ```

mod array;
mod ascii;
mod resample;

pub use array::{ArrayGrid, ArrayGridOptions, MaskedBand};
pub use resample::{resample_grid, GridSource, ResampleOptions};

use std::fmt::{Debug, Formatter};
use std::path::Path;

use gdal::spatial_ref::{CoordTransform, SpatialRef};
use gdal::Dataset;
use ndarray::{Array2, Array3, Axis};

use crate::errors::*;
use crate::geo_transform::{Bounds, GeoTransform, GeoTransformEx, GeoTransformExt};
use crate::raster::{
    self, auto_warp, band_count, create_copy, DataType, ResampleMethod, GTIFF_DRIVER, MEM_DRIVER,
};
use crate::spatial_ref::{self as srs, transform_point, traditional_order};

/// A raster dataset together with its geotransform and projection.
pub struct GdalGrid {
    dataset: Dataset,
    geotransform: GeoTransform,
    spatial_ref: SpatialRef,
}

impl GdalGrid {
    /// Opens the raster at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::debug!("Opening grid {:?}", path.as_ref());
        Self::from_dataset(Dataset::open(path.as_ref())?)
    }

    /// Opens the raster at `path`, replacing its projection by the one
    /// stored in `prj_file`.
    ///
    /// The raster is copied into memory so the source file is left untouched.
    pub fn open_with_prj<P: AsRef<Path>, Q: AsRef<Path>>(path: P, prj_file: Q) -> Result<Self> {
        log::debug!(
            "Opening grid {:?} with projection file {:?}",
            path.as_ref(),
            prj_file.as_ref()
        );
        let projection = srs::from_user_input(&std::fs::read_to_string(prj_file)?)?;
        let source = Dataset::open(path.as_ref())?;
        let mut dataset = create_copy(&source, MEM_DRIVER, "", &[])?;
        dataset.set_spatial_ref(&projection)?;
        Self::from_dataset(dataset)
    }

    /// Wraps an open raster dataset. The dataset needs at least one band, a
    /// geotransform and a projection.
    pub fn from_dataset(dataset: Dataset) -> Result<Self> {
        if band_count(&dataset) == 0 {
            return Err(GazarError::BadArgument(
                "dataset has no raster bands".to_string(),
            ));
        }
        let geotransform = dataset.geo_transform()?;
        let spatial_ref = traditional_order(dataset.spatial_ref()?);
        Ok(GdalGrid {
            dataset,
            geotransform,
            spatial_ref,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    pub fn geotransform(&self) -> GeoTransform {
        self.geotransform
    }

    /// Number of columns.
    pub fn x_size(&self) -> usize {
        self.dataset.raster_size().0
    }

    /// Number of rows.
    pub fn y_size(&self) -> usize {
        self.dataset.raster_size().1
    }

    pub fn num_bands(&self) -> usize {
        band_count(&self.dataset)
    }

    pub fn spatial_ref(&self) -> &SpatialRef {
        &self.spatial_ref
    }

    /// Projection as WKT.
    pub fn wkt(&self) -> Result<String> {
        Ok(self.spatial_ref.to_wkt()?)
    }

    /// Projection as a PROJ4 string.
    pub fn proj4(&self) -> Result<String> {
        Ok(self.spatial_ref.to_proj4()?)
    }

    /// EPSG code of the projection, when one can be identified.
    pub fn epsg(&self) -> Option<u32> {
        srs::epsg_code(&self.spatial_ref)
    }

    /// Data type of the first band.
    pub fn data_type(&self) -> Result<DataType> {
        raster::band_data_type(&self.dataset, 1)
    }

    pub fn nodata(&self, band: usize) -> Result<Option<f64>> {
        raster::no_data_value(&self.dataset, band)
    }

    /// Extent in the grid's own projection.
    pub fn bounds(&self) -> Bounds {
        self.geotransform.extent(self.x_size(), self.y_size())
    }

    /// Extent of the grid once warped into `projection`.
    pub fn bounds_in(&self, projection: &SpatialRef) -> Result<Bounds> {
        if *projection == self.spatial_ref {
            return Ok(self.bounds());
        }
        Ok(self
            .to_projection(projection, ResampleMethod::NearestNeighbour)?
            .bounds())
    }

    /// Extent in WGS 84 longitude/latitude.
    pub fn geographic_bounds(&self) -> Result<Bounds> {
        self.bounds_in(&srs::wgs84()?)
    }

    /// Extent in the UTM zone containing the grid centre.
    pub fn utm_bounds(&self) -> Result<Bounds> {
        self.bounds_in(&self.utm_spatial_ref()?)
    }

    /// UTM projection of the zone containing the grid centre.
    pub fn utm_spatial_ref(&self) -> Result<SpatialRef> {
        let (lon, lat) = self.geographic_bounds()?.center();
        srs::utm_from_latlon(lat, lon)
    }

    fn check_pixel(&self, col: usize, row: usize) -> Result<()> {
        let (x_size, y_size) = (self.x_size(), self.y_size());
        if col >= x_size || row >= y_size {
            return Err(GazarError::PixelOutOfBounds {
                col,
                row,
                x_size,
                y_size,
            });
        }
        Ok(())
    }

    /// Coordinate of the centre of cell `(col, row)`.
    pub fn pixel2coord(&self, col: usize, row: usize) -> Result<(f64, f64)> {
        self.check_pixel(col, row)?;
        Ok(self.geotransform.pixel_center(col, row))
    }

    /// Cell `(col, row)` containing the coordinate.
    pub fn coord2pixel(&self, x: f64, y: f64) -> Result<(usize, usize)> {
        let inverse = self
            .geotransform
            .invert()
            .map_err(|_| GazarError::UninvertibleGeoTransform)?;
        let (pixel, line) = inverse.apply(x, y);
        let inside = pixel >= 0.0
            && line >= 0.0
            && pixel < self.x_size() as f64
            && line < self.y_size() as f64;
        if !inside {
            return Err(GazarError::CoordinateOutOfBounds { x, y });
        }
        Ok((pixel.floor() as usize, line.floor() as usize))
    }

    /// Longitude/latitude of the centre of cell `(col, row)`.
    pub fn pixel2lonlat(&self, col: usize, row: usize) -> Result<(f64, f64)> {
        let (x, y) = self.pixel2coord(col, row)?;
        let transform = CoordTransform::new(&self.spatial_ref, &srs::wgs84()?)?;
        transform_point(&transform, x, y)
    }

    /// Cell `(col, row)` containing a longitude/latitude.
    pub fn lonlat2pixel(&self, lon: f64, lat: f64) -> Result<(usize, usize)> {
        let transform = CoordTransform::new(&srs::wgs84()?, &self.spatial_ref)?;
        let (x, y) = transform_point(&transform, lon, lat)?;
        self.coord2pixel(x, y)
    }

    /// Cell centre coordinates as `(y, x)` arrays shaped `(rows, cols)`.
    pub fn coords(&self) -> (Array2<f64>, Array2<f64>) {
        let shape = (self.y_size(), self.x_size());
        let gt = self.geotransform;
        let x = Array2::from_shape_fn(shape, |(row, col)| gt.pixel_center(col, row).0);
        let y = Array2::from_shape_fn(shape, |(row, col)| gt.pixel_center(col, row).1);
        (y, x)
    }

    /// Cell centre latitudes and longitudes as `(lat, lon)` arrays shaped
    /// `(rows, cols)`.
    pub fn latlon(&self) -> Result<(Array2<f64>, Array2<f64>)> {
        let (y, x) = self.coords();
        let shape = y.dim();
        let mut lon: Vec<f64> = x.into_iter().collect();
        let mut lat: Vec<f64> = y.into_iter().collect();
        let transform = CoordTransform::new(&self.spatial_ref, &srs::wgs84()?)?;
        transform.transform_coords(&mut lon, &mut lat, &mut [])?;
        Ok((
            Array2::from_shape_vec(shape, lat)?,
            Array2::from_shape_vec(shape, lon)?,
        ))
    }

    /// Values of the 1-based `band`, shaped `(rows, cols)`.
    pub fn read_band(&self, band: usize) -> Result<Array2<f64>> {
        raster::read_band(&self.dataset, band)
    }

    /// Values of `band` with nodata cells masked.
    pub fn read_band_masked(&self, band: usize) -> Result<MaskedBand> {
        Ok(MaskedBand::new(self.read_band(band)?, self.nodata(band)?))
    }

    /// Values of every band, shaped `(bands, rows, cols)`.
    pub fn read_all(&self) -> Result<Array3<f64>> {
        let bands = (1..=self.num_bands())
            .map(|band| self.read_band(band))
            .collect::<Result<Vec<_>>>()?;
        let views: Vec<_> = bands.iter().map(|band| band.view()).collect();
        Ok(ndarray::stack(Axis(0), &views)?)
    }

    /// Writes the projection as WKT to `path`, in the ESRI dialect when
    /// `esri` is set.
    pub fn write_prj<P: AsRef<Path>>(&self, path: P, esri: bool) -> Result<()> {
        let projection = self.spatial_ref.clone();
        if esri {
            projection.morph_to_esri()?;
        }
        log::debug!("Writing projection file {:?}", path.as_ref());
        std::fs::write(path, projection.to_wkt()?)?;
        Ok(())
    }

    /// Warps the grid into `projection`, GDAL choosing the output size.
    pub fn to_projection(&self, projection: &SpatialRef, method: ResampleMethod) -> Result<GdalGrid> {
        GdalGrid::from_dataset(auto_warp(&self.dataset, projection, method)?)
    }

    /// Writes the grid with the GDAL driver named `driver_name`.
    pub fn to_format<P: AsRef<Path>>(
        &self,
        driver_name: &str,
        path: P,
        creation_options: &[(&str, &str)],
    ) -> Result<()> {
        create_copy(&self.dataset, driver_name, path, creation_options)?.close()?;
        Ok(())
    }

    /// Writes the grid as a GeoTIFF.
    pub fn to_tif<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_format(GTIFF_DRIVER, path, &[])
    }

    /// Writes `band` as a GRASS ASCII grid.
    pub fn to_grass_ascii<P: AsRef<Path>>(&self, path: P, band: usize, print_nodata: bool) -> Result<()> {
        ascii::write_grass_ascii(self, path.as_ref(), band, print_nodata)
    }

    /// Writes `band` as an ARC/INFO ASCII grid.
    pub fn to_arc_ascii<P: AsRef<Path>>(&self, path: P, band: usize, print_nodata: bool) -> Result<()> {
        ascii::write_arc_ascii(self, path.as_ref(), band, print_nodata)
    }
}

impl Debug for GdalGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GdalGrid")
            .field("x_size", &self.x_size())
            .field("y_size", &self.y_size())
            .field("num_bands", &self.num_bands())
            .field("geotransform", &self.geotransform)
            .field("epsg", &self.epsg())
            .finish()
    }
}
