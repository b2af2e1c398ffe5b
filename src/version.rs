//! Version information for this crate and the GDAL it is linked against.
//!
//! ```rust, no_run
//! println!("gazar {} on GDAL {}", gazar::version(), gazar::gdal_version());
//! ```

use gdal::version::VersionInfo;

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of this crate, e.g. `"0.0.1"`.
pub fn version() -> &'static str {
    VERSION
}

/// Release name of the linked GDAL library, e.g. `"3.8.4"`.
pub fn gdal_version() -> String {
    VersionInfo::release_name()
}
