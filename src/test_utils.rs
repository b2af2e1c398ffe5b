use std::path::{Path, PathBuf};

use gdal::vector::LayerAccess;
use gdal::Dataset;
use ndarray::Array2;

use crate::geo_transform::GeoTransform;
use crate::grid::{ArrayGrid, ArrayGridOptions, GdalGrid};
use crate::raster::DataType;

/// A struct that contains a temporary directory and a path to a file in that directory.
pub struct TempFixture {
    _temp_dir: tempfile::TempDir,
    temp_path: PathBuf,
}

impl TempFixture {
    /// Creates a copy of the test file in a temporary directory.
    /// Returns the struct `TempFixture` that contains the temp dir (for clean-up on `drop`) as well as the path to the file.
    pub fn fixture(name: &str) -> Self {
        let staging = Self::empty(name);
        std::fs::copy(fixture(name), &staging.temp_path).unwrap();
        staging
    }

    /// Creates a temporary directory and path to a non-existent file with given `name`.
    /// Useful for writing results to during testing
    pub fn empty(name: &str) -> Self {
        let _temp_dir = tempfile::tempdir().unwrap();
        let temp_path = _temp_dir.path().join(name);
        Self {
            _temp_dir,
            temp_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.temp_path
    }
}

impl AsRef<Path> for TempFixture {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

/// Returns the fully qualified path to `filename` in `${CARGO_MANIFEST_DIR}/fixtures`.
pub fn fixture(filename: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(filename)
}

/// Geotransform of a 30 arc-second elevation tile over northern Luzon.
pub const GMTED_GEOTRANSFORM: GeoTransform = [
    120.99986111111112,
    0.008333333333333333,
    0.0,
    16.008194444444445,
    0.0,
    -0.008333333333333333,
];

/// A 120x120 WGS 84 grid on [`GMTED_GEOTRANSFORM`] whose values rise by one
/// per column and by a thousand per row.
pub fn gmted_grid() -> ArrayGrid {
    let values = Array2::from_shape_fn((120, 120), |(row, col)| (row * 1000 + col) as f64);
    ArrayGrid::from_band(
        values,
        "EPSG:4326",
        GMTED_GEOTRANSFORM,
        ArrayGridOptions {
            nodata_value: Some(-32768.0),
            data_type: DataType::Int32,
        },
    )
    .unwrap()
}

/// Assert numerical difference between two expressions is less than
/// 64-bit machine epsilon or a specified epsilon.
///
/// # Examples:
/// ```rust, ignore
/// use crate::assert_near;
/// use std::f64::consts::{PI, E};
/// assert_near!(PI / E, 1.1557273497909217);
/// // with specified epsilon
/// assert_near!(PI / E, 1.15572734, epsilon = 1e-8);
/// ```
#[macro_export]
macro_rules! assert_near {
    ($left:expr, $right:expr) => {
        $crate::assert_near!($left, $right, epsilon = f64::EPSILON)
    };
    ($left:expr, $right:expr, epsilon = $ep:expr) => {
        assert!(
            ($left - $right).abs() < $ep,
            "|{} - {}| = {} is greater than epsilon {:.4e}",
            $left,
            $right,
            ($left - $right).abs(),
            $ep
        )
    };
    ($left:expr, $right:expr, epsilon = $ep:expr, field = $field:expr) => {
        assert!(
            ($left - $right).abs() < $ep,
            "field {}: |{} - {}| = {} is greater than epsilon {:.4e}",
            $field,
            $left,
            $right,
            ($left - $right).abs(),
            $ep
        )
    };
    // Pseudo-specialization
    (Bounds, $left:expr, $right:expr, epsilon = $ep:expr) => {
        $crate::assert_near!($left.x_min, $right.x_min, epsilon = $ep, field = "x_min");
        $crate::assert_near!($left.x_max, $right.x_max, epsilon = $ep, field = "x_max");
        $crate::assert_near!($left.y_min, $right.y_min, epsilon = $ep, field = "y_min");
        $crate::assert_near!($left.y_max, $right.y_max, epsilon = $ep, field = "y_max");
    };
}

/// Asserts two grids hold the same data within `precision`, the same
/// geotransform within `1e-9`, the same number of bands and the same nodata
/// values.
pub fn assert_rasters_eq(left: &GdalGrid, right: &GdalGrid, precision: f64) {
    assert_eq!(left.num_bands(), right.num_bands(), "band count");
    assert_eq!(
        (left.x_size(), left.y_size()),
        (right.x_size(), right.y_size()),
        "raster size"
    );
    for (i, (l, r)) in left
        .geotransform()
        .iter()
        .zip(right.geotransform().iter())
        .enumerate()
    {
        crate::assert_near!(l, r, epsilon = 1e-9, field = format!("geotransform[{i}]"));
    }
    for band in 1..=left.num_bands() {
        assert_eq!(
            left.nodata(band).unwrap(),
            right.nodata(band).unwrap(),
            "nodata of band {band}"
        );
        let l = left.read_band(band).unwrap();
        let r = right.read_band(band).unwrap();
        for ((index, a), b) in l.indexed_iter().zip(r.iter()) {
            if a.is_nan() && b.is_nan() {
                continue;
            }
            assert!(
                (a - b).abs() <= precision,
                "band {band} cell {index:?}: {a} != {b}"
            );
        }
    }
}

/// [`assert_rasters_eq`] on two raster files.
pub fn assert_raster_files_eq<P: AsRef<Path>, Q: AsRef<Path>>(left: P, right: Q, precision: f64) {
    assert_rasters_eq(
        &GdalGrid::open(left).unwrap(),
        &GdalGrid::open(right).unwrap(),
        precision,
    );
}

/// Asserts the first layers of two vector files hold the same number of
/// features and the same geometries, cover the same extent within `precision`
/// and share a projection.
pub fn assert_vectors_eq<P: AsRef<Path>, Q: AsRef<Path>>(left: P, right: Q, precision: f64) {
    let left = Dataset::open(left.as_ref()).unwrap();
    let right = Dataset::open(right.as_ref()).unwrap();
    let mut left = left.layer(0).unwrap();
    let mut right = right.layer(0).unwrap();

    assert_eq!(left.feature_count(), right.feature_count(), "feature count");

    let l_extent = left.get_extent().unwrap();
    let r_extent = right.get_extent().unwrap();
    crate::assert_near!(l_extent.MinX, r_extent.MinX, epsilon = precision, field = "MinX");
    crate::assert_near!(l_extent.MaxX, r_extent.MaxX, epsilon = precision, field = "MaxX");
    crate::assert_near!(l_extent.MinY, r_extent.MinY, epsilon = precision, field = "MinY");
    crate::assert_near!(l_extent.MaxY, r_extent.MaxY, epsilon = precision, field = "MaxY");

    assert_eq!(
        left.spatial_ref().map(|srs| srs.to_proj4().unwrap()),
        right.spatial_ref().map(|srs| srs.to_proj4().unwrap()),
        "projection"
    );

    let l_geometries: Vec<_> = left
        .features()
        .map(|feature| feature.geometry().map(|g| g.wkt().unwrap()))
        .collect();
    let r_geometries: Vec<_> = right
        .features()
        .map(|feature| feature.geometry().map(|g| g.wkt().unwrap()))
        .collect();
    assert_eq!(l_geometries, r_geometries, "geometries");
}

/// Asserts two text files hold the same whitespace separated tokens, numbers
/// being compared within `precision`.
pub fn assert_text_files_eq<P: AsRef<Path>, Q: AsRef<Path>>(left: P, right: Q, precision: f64) {
    let left = std::fs::read_to_string(left).unwrap();
    let right = std::fs::read_to_string(right).unwrap();
    let l_tokens: Vec<&str> = left.split_whitespace().collect();
    let r_tokens: Vec<&str> = right.split_whitespace().collect();
    assert_eq!(l_tokens.len(), r_tokens.len(), "token count");

    for (i, (l, r)) in l_tokens.iter().zip(r_tokens.iter()).enumerate() {
        match (l.parse::<f64>(), r.parse::<f64>()) {
            (Ok(a), Ok(b)) => assert!(
                (a - b).abs() <= precision || (a.is_nan() && b.is_nan()),
                "token {i}: {a} != {b}"
            ),
            _ => assert_eq!(l, r, "token {i}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_comparison_tolerates_number_formatting() {
        let left = TempFixture::empty("left.txt");
        let right = TempFixture::empty("right.txt");
        std::fs::write(left.path(), "north: 50\n1 2.0000000001\n").unwrap();
        std::fs::write(right.path(), "north:   50.0\n1.0   2\n").unwrap();
        assert_text_files_eq(left.path(), right.path(), 1e-7);
    }

    #[test]
    #[should_panic(expected = "token 0")]
    fn test_text_comparison_detects_words() {
        let left = TempFixture::empty("left.txt");
        let right = TempFixture::empty("right.txt");
        std::fs::write(left.path(), "north: 50").unwrap();
        std::fs::write(right.path(), "south: 50").unwrap();
        assert_text_files_eq(left.path(), right.path(), 1e-7);
    }

    #[test]
    fn test_vector_comparison_of_a_copy() {
        let copy = TempFixture::fixture("mask_polygons.geojson");
        assert_vectors_eq(fixture("mask_polygons.geojson"), copy.path(), 1e-7);
    }
}
