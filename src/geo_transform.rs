//! Affine arithmetic on GDAL geotransforms.
//!
//! A [`GeoTransform`] stores the coefficients mapping pixel/line `(P, L)`
//! space to georeferenced `(Xp, Yp)` space:
//!
//! ```text
//! Xp = gt[0] + P * gt[1] + L * gt[2]
//! Yp = gt[3] + P * gt[4] + L * gt[5]
//! ```
//!
//! [`GeoTransformEx`] applies and inverts the transform; [`GeoTransformExt`]
//! adds the cell-centre and extent arithmetic grids need on top of it.
//!
//! # Example
//!
//! ```rust
//! use gazar::{GeoTransform, GeoTransformEx, GeoTransformExt};
//!
//! let gt: GeoTransform = [100.0, 0.5, 0.0, 50.0, 0.0, -0.5];
//! assert_eq!(gt.pixel_center(0, 0), (100.25, 49.75));
//!
//! let inverse = gt.invert().unwrap();
//! assert_eq!(inverse.apply(100.25, 49.75), (0.5, 0.5));
//! ```

pub use gdal::{GeoTransform, GeoTransformEx};

/// Extent of a grid, in the order `(x_min, x_max, y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Centre point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Smallest extent covering both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.x_min, self.x_max, self.y_min, self.y_max)
    }
}

impl From<Bounds> for geo_types::Rect<f64> {
    fn from(bounds: Bounds) -> Self {
        geo_types::Rect::new(
            geo_types::coord! { x: bounds.x_min, y: bounds.y_min },
            geo_types::coord! { x: bounds.x_max, y: bounds.y_max },
        )
    }
}

impl From<geo_types::Rect<f64>> for Bounds {
    fn from(rect: geo_types::Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Bounds::new(min.x, max.x, min.y, max.y)
    }
}

/// Grid arithmetic on [`GeoTransform`].
pub trait GeoTransformExt {
    /// Georeferenced coordinates of the centre of cell `(col, row)`.
    fn pixel_center(&self, col: usize, row: usize) -> (f64, f64);

    /// `true` when both rotation terms are zero.
    fn is_north_up(&self) -> bool;

    /// Extent covered by an `x_size` by `y_size` grid.
    fn extent(&self, x_size: usize, y_size: usize) -> Bounds;
}

impl GeoTransformExt for GeoTransform {
    fn pixel_center(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    fn is_north_up(&self) -> bool {
        self[2] == 0.0 && self[4] == 0.0
    }

    fn extent(&self, x_size: usize, y_size: usize) -> Bounds {
        let (w, h) = (x_size as f64, y_size as f64);
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(w, 0.0),
            self.apply(0.0, h),
            self.apply(w, h),
        ];
        corners.iter().fold(
            Bounds::new(f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |acc, &(x, y)| Bounds::new(acc.x_min.min(x), acc.x_max.max(x), acc.y_min.min(y), acc.y_max.max(y)),
        )
    }
}
