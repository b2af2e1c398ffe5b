use std::path::Path;

use gazar::shape::{rasterize_shapefile, CellSpec, RasterizeShapefileOptions, TargetProjection};
use gazar::{log_to_console, log_to_file};
use log::LevelFilter;

fn rasterize_fixture() {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("mask_polygons.geojson");
    rasterize_shapefile(
        fixture,
        RasterizeShapefileOptions {
            raster_nodata: 0.0,
            projection: TargetProjection::Utm,
            ..RasterizeShapefileOptions::new(CellSpec::Size { x: 1000.0, y: 1000.0 })
        },
    )
    .unwrap();
}

#[test]
fn test_log_to_file() {
    // The logger is process wide, so the scenarios run in sequence.
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("gazar.log");

    log_to_console(false, LevelFilter::Off).unwrap();
    log_to_file(true, Some(&log_file), LevelFilter::Debug).unwrap();
    rasterize_fixture();
    log::info!(target: "other_crate", "not ours");
    log_to_file(false, None, LevelFilter::Off).unwrap();

    let written = std::fs::read_to_string(&log_file).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert!(lines.iter().any(|line| line.contains(" - gazar - INFO - Rasterizing ")));
    assert!(lines.iter().any(|line| line.contains(" - gazar - DEBUG - Using UTM projection")));
    assert!(lines.iter().all(|line| line.split(" - ").nth(1) == Some("gazar")));
    assert!(!written.contains("not ours"));

    // turned off: nothing more is appended
    rasterize_fixture();
    assert_eq!(std::fs::read_to_string(&log_file).unwrap(), written);

    // a coarser level drops the debug records
    log_to_file(true, Some(&log_file), LevelFilter::Info).unwrap();
    rasterize_fixture();
    log_to_file(false, None, LevelFilter::Off).unwrap();
    let appended = std::fs::read_to_string(&log_file).unwrap();
    let new_lines = &appended[written.len()..];
    assert!(new_lines.contains(" - INFO - Rasterizing "));
    assert!(!new_lines.contains(" - DEBUG - "));

    log_to_console(true, LevelFilter::Warn).unwrap();
    assert_eq!(log::max_level(), LevelFilter::Warn);
    log_to_console(false, LevelFilter::Off).unwrap();
    assert_eq!(log::max_level(), LevelFilter::Off);
}
