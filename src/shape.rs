//! Burning vector layers into new grids.
//!
//! ```rust, no_run
//! # fn main() -> gazar::errors::Result<()> {
//! use gazar::shape::{rasterize_shapefile, CellSpec, RasterizeShapefileOptions, TargetProjection};
//!
//! let mask = rasterize_shapefile(
//!     "watershed.shp",
//!     RasterizeShapefileOptions {
//!         raster_path: Some("watershed.msk".into()),
//!         raster_nodata: 0.0,
//!         projection: TargetProjection::Utm,
//!         ..RasterizeShapefileOptions::new(CellSpec::Size { x: 1000.0, y: 1000.0 })
//!     },
//! )?;
//! mask.to_grass_ascii("watershed_ascii.msk", 1, false)?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use gdal::errors::GdalError;
use gdal::raster::{rasterize, RasterizeOptions};
use gdal::spatial_ref::{CoordTransform, SpatialRef};
use gdal::vector::{Geometry, LayerAccess};
use gdal::Dataset;

use crate::errors::*;
use crate::geo_transform::{Bounds, GeoTransform};
use crate::grid::GdalGrid;
use crate::raster::{create_dataset, fill, set_no_data_value, DataType, GTIFF_DRIVER, MEM_DRIVER};
use crate::spatial_ref::{self as srs, traditional_order, transform_point};

/// Extents closer than this to a whole number of cells are not rounded up.
const CELL_COUNT_TOLERANCE: f64 = 1e-9;

/// Resolution of the output grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellSpec {
    /// Number of columns and rows covering the layer extent.
    Count { x: usize, y: usize },
    /// Cell width and height, in units of the output projection.
    Size { x: f64, y: f64 },
}

/// Projection of the output grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TargetProjection {
    /// Keep the projection of the layer.
    #[default]
    Source,
    /// UTM zone containing the centre of the layer.
    Utm,
    /// Any definition [`crate::spatial_ref::from_user_input`] accepts.
    Wkt(String),
}

#[derive(Debug, Clone)]
pub struct RasterizeShapefileOptions {
    pub cells: CellSpec,
    /// Writes the grid as a GeoTIFF at this path. The grid stays in memory
    /// when `None`.
    pub raster_path: Option<PathBuf>,
    /// Value of cells no geometry covers. Defaults to `-9999`.
    pub raster_nodata: f64,
    /// Value of cells the geometries cover. Defaults to `1`.
    pub burn_value: f64,
    /// Defaults to `Int32`.
    pub data_type: DataType,
    /// Burns every cell a geometry touches rather than the cells whose
    /// centre it contains.
    pub all_touched: bool,
    pub projection: TargetProjection,
}

impl RasterizeShapefileOptions {
    pub fn new(cells: CellSpec) -> Self {
        RasterizeShapefileOptions {
            cells,
            raster_path: None,
            raster_nodata: -9999.0,
            burn_value: 1.0,
            data_type: DataType::Int32,
            all_touched: false,
            projection: TargetProjection::Source,
        }
    }
}

fn cell_count(extent: f64, size: f64) -> usize {
    let cells = extent / size;
    let whole = cells.round();
    let cells = if (cells - whole).abs() < CELL_COUNT_TOLERANCE {
        whole
    } else {
        cells.ceil()
    };
    (cells as usize).max(1)
}

/// Size and north-up geotransform of a grid covering `bounds`.
pub(crate) fn grid_layout(bounds: &Bounds, cells: CellSpec) -> Result<((usize, usize), GeoTransform)> {
    if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
        return Err(GazarError::BadArgument(format!(
            "cannot grid the degenerate extent {:?}",
            bounds.as_tuple()
        )));
    }
    let (size, dx, dy) = match cells {
        CellSpec::Count { x, y } if x > 0 && y > 0 => (
            (x, y),
            bounds.width() / x as f64,
            bounds.height() / y as f64,
        ),
        CellSpec::Size { x, y } if x > 0.0 && y > 0.0 => (
            (cell_count(bounds.width(), x), cell_count(bounds.height(), y)),
            x,
            y,
        ),
        cells => {
            return Err(GazarError::BadArgument(format!(
                "cell counts and sizes must be positive, got {cells:?}"
            )))
        }
    };
    Ok((size, [bounds.x_min, dx, 0.0, bounds.y_max, 0.0, -dy]))
}

fn envelope_bounds(geometries: &[Geometry]) -> Option<Bounds> {
    geometries
        .iter()
        .map(|geometry| {
            let envelope = geometry.envelope();
            Bounds::new(envelope.MinX, envelope.MaxX, envelope.MinY, envelope.MaxY)
        })
        .reduce(|a, b| a.union(&b))
}

fn target_spatial_ref(
    projection: &TargetProjection,
    source: &SpatialRef,
    source_bounds: &Bounds,
) -> Result<SpatialRef> {
    match projection {
        TargetProjection::Source => Ok(source.clone()),
        TargetProjection::Utm => {
            let (x, y) = source_bounds.center();
            let to_wgs84 = CoordTransform::new(source, &srs::wgs84()?)?;
            let (lon, lat) = transform_point(&to_wgs84, x, y)?;
            srs::utm_from_latlon(lat, lon)
        }
        TargetProjection::Wkt(definition) => srs::from_user_input(definition),
    }
}

/// Rasterizes the geometries of the first layer of `shapefile_path`.
///
/// The geometries are reprojected in memory when the output projection
/// differs from the layer's. The grid covers their combined extent; it is
/// filled with `raster_nodata` and every cell a geometry covers is set to
/// `burn_value`.
pub fn rasterize_shapefile<P: AsRef<Path>>(
    shapefile_path: P,
    options: RasterizeShapefileOptions,
) -> Result<GdalGrid> {
    let shapefile_path = shapefile_path.as_ref();
    log::info!("Rasterizing {:?}", shapefile_path);

    let dataset = Dataset::open(shapefile_path)?;
    let mut layer = dataset.layer(0)?;
    let source = layer.spatial_ref().map(traditional_order).ok_or_else(|| {
        GazarError::BadArgument(format!("{:?} has no projection", shapefile_path))
    })?;
    let geometries: Vec<Geometry> = layer
        .features()
        .filter_map(|feature| feature.geometry().cloned())
        .filter(|geometry| !geometry.is_empty())
        .collect();
    let source_bounds = envelope_bounds(&geometries)
        .ok_or_else(|| GazarError::EmptyLayer(shapefile_path.display().to_string()))?;

    let target = target_spatial_ref(&options.projection, &source, &source_bounds)?;
    let (geometries, bounds) = if target == source {
        (geometries, source_bounds)
    } else {
        log::debug!("Reprojecting {} geometries", geometries.len());
        let transform = CoordTransform::new(&source, &target)?;
        let projected = geometries
            .iter()
            .map(|geometry| geometry.transform(&transform))
            .collect::<std::result::Result<Vec<_>, GdalError>>()?;
        let bounds = envelope_bounds(&projected)
            .ok_or_else(|| GazarError::EmptyLayer(shapefile_path.display().to_string()))?;
        (projected, bounds)
    };

    let (size, geotransform) = grid_layout(&bounds, options.cells)?;
    log::debug!("Creating {}x{} grid with geotransform {:?}", size.0, size.1, geotransform);
    let (driver_name, raster_path) = match &options.raster_path {
        Some(path) => (GTIFF_DRIVER, path.clone()),
        None => (MEM_DRIVER, PathBuf::new()),
    };
    let mut raster = create_dataset(driver_name, &raster_path, size, 1, options.data_type)?;
    raster.set_geo_transform(&geotransform)?;
    raster.set_spatial_ref(&target)?;
    set_no_data_value(&raster, 1, options.raster_nodata)?;
    fill(&raster, 1, options.raster_nodata)?;

    let burn_values = vec![options.burn_value; geometries.len()];
    rasterize(
        &mut raster,
        &[1],
        &geometries,
        &burn_values,
        Some(RasterizeOptions {
            all_touched: options.all_touched,
            ..Default::default()
        }),
    )?;
    raster.flush_cache()?;
    GdalGrid::from_dataset(raster)
}
