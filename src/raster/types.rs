use std::fmt::{Display, Formatter};

use gdal::raster::GdalDataType;
use gdal_sys::GDALDataType;

/// Cell data types a grid can be created with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Byte,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    Float64,
}

impl DataType {
    pub fn gdal_ordinal(&self) -> GDALDataType::Type {
        match self {
            DataType::Byte => GDALDataType::GDT_Byte,
            DataType::UInt16 => GDALDataType::GDT_UInt16,
            DataType::Int16 => GDALDataType::GDT_Int16,
            DataType::UInt32 => GDALDataType::GDT_UInt32,
            DataType::Int32 => GDALDataType::GDT_Int32,
            DataType::Float32 => GDALDataType::GDT_Float32,
            DataType::Float64 => GDALDataType::GDT_Float64,
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, DataType::Float32 | DataType::Float64)
    }
}

/// Maps a band type onto the closest supported one.
///
/// Complex and 64 bit integer types widen to `Float64`.
impl From<GdalDataType> for DataType {
    fn from(band_type: GdalDataType) -> Self {
        match band_type {
            GdalDataType::UInt8 => DataType::Byte,
            GdalDataType::UInt16 => DataType::UInt16,
            GdalDataType::Int16 => DataType::Int16,
            GdalDataType::UInt32 => DataType::UInt32,
            GdalDataType::Int32 => DataType::Int32,
            GdalDataType::Float32 => DataType::Float32,
            _ => DataType::Float64,
        }
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Float64
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Byte => "Byte",
            DataType::UInt16 => "UInt16",
            DataType::Int16 => "Int16",
            DataType::UInt32 => "UInt32",
            DataType::Int32 => "Int32",
            DataType::Float32 => "Float32",
            DataType::Float64 => "Float64",
        };
        f.write_str(name)
    }
}
