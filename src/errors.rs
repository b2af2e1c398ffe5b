use std::ffi::{c_int, NulError};

use gdal::errors::GdalError;
use gdal_sys::CPLErr;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GazarError>;

#[derive(Debug, Error)]
pub enum GazarError {
    #[error(transparent)]
    Gdal(#[from] GdalError),
    #[error("CPL error class: '{class:?}', error number: '{number}', error msg: '{msg}'")]
    CplError {
        class: CPLErr::Type,
        number: c_int,
        msg: String,
    },
    #[error("GDAL method '{method_name}' returned a NULL pointer. Error msg: '{msg}'")]
    NullPointer {
        method_name: &'static str,
        msg: String,
    },
    #[error("FfiNulError")]
    FfiNulError(#[from] NulError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("Pixel ({col}, {row}) is outside of the {x_size}x{y_size} grid")]
    PixelOutOfBounds {
        col: usize,
        row: usize,
        x_size: usize,
        y_size: usize,
    },
    #[error("Coordinate ({x}, {y}) is outside of the grid extent")]
    CoordinateOutOfBounds { x: f64, y: f64 },
    #[error("Band {band} does not exist, the grid has {num_bands} band(s)")]
    BandOutOfRange { band: usize, num_bands: usize },
    #[error("Geo transform is uninvertible")]
    UninvertibleGeoTransform,
    #[error("{0} requires a north-up geo transform without rotation")]
    RotatedGeoTransform(&'static str),
    #[error("Bad argument: '{0}'")]
    BadArgument(String),
    #[error("Vector dataset '{0}' has no layer with geometries")]
    EmptyLayer(String),
    #[error("Unable to install logger: {0}")]
    Logger(String),
}
