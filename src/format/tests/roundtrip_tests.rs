//! Export-then-import round trips through the filesystem.

use image::{Rgb, RgbImage};

use crate::adjust::{Channel, ChannelMode, apply_adjustments};
use crate::format::{
    CoordinateJson, ExportOptions, FormatError, coordinate_file_for, export_all,
};
use crate::model::Point;
use crate::session::Session;
use crate::session::test_support::*;

fn marker_tuples(session: &Session) -> Vec<(String, f64, f64, Option<String>)> {
    let mut tuples: Vec<_> = session
        .markers()
        .iter()
        .map(|m| {
            (
                m.cell_type.clone(),
                m.position.x,
                m.position.y,
                m.roi_name.clone(),
            )
        })
        .collect();
    tuples.sort_by(|a, b| a.partial_cmp(b).unwrap());
    tuples
}

fn annotated() -> Session {
    let mut session = Session::new();
    session.load_image("slice_04.tif", 120, 80);
    square(&mut session, "Cortex", 0.0, 0.0, 40.0);
    session.start_roi("Striatum").unwrap();
    for p in [(60.0, 10.0), (110.0, 10.0), (85.0, 70.0)] {
        session.add_roi_point(Point::from(p)).unwrap();
    }
    session.close_roi().unwrap();

    mark(&mut session, "Type 1", 10.5, 12.25);
    mark(&mut session, "Type 2", 85.0, 30.0);
    mark(&mut session, "Type 1", 20.0, 33.75);
    mark(&mut session, "Type 2", 70.0, 15.5);
    session.adjustments_mut().set_contrast(Channel::Red, 1.5);
    session
}

#[test]
fn test_roundtrip_preserves_geometry_and_markers() {
    let dir = tempfile::tempdir().unwrap();
    let source = annotated();
    let options = ExportOptions::new().overlay(false);
    let result = export_all(&source, None, dir.path(), "slice_04", &options).unwrap();
    assert_eq!(result.files_created.len(), 2);
    assert!(!result.has_warnings());

    let mut target = Session::new();
    let path = dir.path().join("slice_04_coordinates.json");
    let report = CoordinateJson::import_file(&mut target, &path).unwrap();
    assert_eq!(report.markers_imported, 4);
    assert!(!report.has_warnings());

    assert_eq!(target.rois().len(), source.rois().len());
    for (a, b) in target.rois().iter().zip(source.rois()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.points, b.points);
        assert_eq!(a.color, b.color);
        assert_eq!(a.line_width, b.line_width);
        assert!(a.closed);
    }
    assert_eq!(marker_tuples(&target), marker_tuples(&source));
    assert_eq!(target.adjustments(), source.adjustments());
    assert_eq!(target.image_name(), "slice_04.tif");
    assert_eq!(target.summary(), source.summary());
}

#[test]
fn test_roundtrip_closes_number_gaps() {
    let mut source = Session::new();
    square(&mut source, "R", 0.0, 0.0, 50.0);
    mark(&mut source, "Type 1", 5.0, 5.0);
    mark(&mut source, "Type 1", 500.0, 500.0);
    mark(&mut source, "Type 1", 10.0, 10.0);
    assert_eq!(numbers(&source, "Type 1"), vec![1, 2, 3]);

    let json = CoordinateJson::export_string(&source).unwrap();
    let mut target = Session::new();
    CoordinateJson::import_document(&mut target, CoordinateJson::parse(&json).unwrap()).unwrap();
    assert_eq!(numbers(&target, "Type 1"), vec![1, 2]);
}

#[test]
fn test_export_refused_without_rois() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new();
    mark(&mut session, "Type 1", 1.0, 1.0);
    session.start_roi("Open").unwrap();

    let result = export_all(&session, None, dir.path(), "x", &ExportOptions::new());
    assert!(matches!(result, Err(FormatError::NothingToExport { .. })));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_overlay_skipped_without_image() {
    let dir = tempfile::tempdir().unwrap();
    let result =
        export_all(&annotated(), None, dir.path(), "s", &ExportOptions::new()).unwrap();
    assert_eq!(result.files_created.len(), 2);
    assert!(result.has_warnings());
    assert!(!dir.path().join("s_overlay.png").exists());
}

#[test]
fn test_overlay_written_with_image() {
    let dir = tempfile::tempdir().unwrap();
    let raw = RgbImage::from_pixel(120, 80, Rgb([20, 40, 60]));
    let options = ExportOptions::new().coordinates(false).results(false);
    let result = export_all(&annotated(), Some(&raw), dir.path(), "s", &options).unwrap();

    let path = dir.path().join("s_overlay.png");
    assert_eq!(result.files_created, vec![path.clone()]);
    let written = image::open(&path).unwrap().to_rgb8();
    assert_eq!(written.dimensions(), (120, 80));
    assert_ne!(written, raw);
}

#[test]
fn test_coordinate_file_discovery() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("slice_04.tif");
    assert_eq!(coordinate_file_for(&image_path), None);

    export_all(
        &annotated(),
        None,
        dir.path(),
        "slice_04",
        &ExportOptions::new().results(false).overlay(false),
    )
    .unwrap();
    assert_eq!(
        coordinate_file_for(&image_path),
        Some(dir.path().join("slice_04_coordinates.json"))
    );
}

#[test]
fn test_overlay_ignores_display_channel_mode() {
    let dir = tempfile::tempdir().unwrap();
    let raw = RgbImage::from_pixel(120, 80, Rgb([200, 100, 50]));
    let mut session = annotated();
    session.set_channel_mode(ChannelMode::Green);
    session.start_roi("Unfinished").unwrap();
    session.add_roi_point(Point::new(100.0, 60.0)).unwrap();
    session.add_roi_point(Point::new(118.0, 78.0)).unwrap();

    let options = ExportOptions::new().coordinates(false).results(false);
    export_all(&session, Some(&raw), dir.path(), "s", &options).unwrap();

    let written = image::open(dir.path().join("s_overlay.png")).unwrap().to_rgb8();
    let expected = apply_adjustments(&raw, session.adjustments());
    assert_eq!(written.get_pixel(115, 75), expected.get_pixel(115, 75));
    assert_eq!(written.get_pixel(110, 70), expected.get_pixel(110, 70));
    assert_ne!(written.get_pixel(115, 75).0[0], 0);
}
