//! Tests for the results CSV.

use crate::format::ExportFormat;
use crate::format::results_csv::ResultsCsv;
use crate::session::Session;
use crate::session::test_support::*;

#[test]
fn test_exact_layout() {
    let mut session = Session::new();
    session.load_image("slice.tif", 100, 100);
    square(&mut session, "Cortex", 0.0, 0.0, 50.0);
    square(&mut session, "Hippo", 60.0, 0.0, 30.0);
    mark(&mut session, "Type 1", 10.5, 20.0);
    mark(&mut session, "Type 2", 70.0, 10.0);
    mark(&mut session, "Type 1", 95.0, 95.0);
    mark(&mut session, "Type 1", 20.256, 30.0);

    let bytes = ResultsCsv::to_bytes(&session).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let expected = "\
=== Marker Details ===
Image,Cell Type,Marker #,X,Y,ROI
slice.tif,Type 1,1,10.50,20.00,Cortex
slice.tif,Type 2,1,70.00,10.00,Hippo
slice.tif,Type 1,3,20.26,30.00,Cortex

=== Summary (per ROI) ===
Image,ROI,Cell Type,Count
slice.tif,Cortex,Type 1,2
slice.tif,Cortex,Type 2,0
slice.tif,Hippo,Type 1,0
slice.tif,Hippo,Type 2,1
";
    assert_eq!(text, expected);
}

#[test]
fn test_fields_with_commas_are_quoted() {
    let mut session = Session::new();
    square(&mut session, "Layer 2,3", 0.0, 0.0, 10.0);
    mark(&mut session, "Type 1", 5.0, 5.0);

    let text = String::from_utf8(ResultsCsv::to_bytes(&session).unwrap()).unwrap();
    assert!(text.contains("Unknown,Type 1,1,5.00,5.00,\"Layer 2,3\"\n"));
    assert!(text.contains("Unknown,\"Layer 2,3\",Type 2,0\n"));
}

#[test]
fn test_export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a_results.csv");
    let mut session = Session::new();
    square(&mut session, "R", 0.0, 0.0, 10.0);
    mark(&mut session, "Type 1", 5.0, 5.0);
    mark(&mut session, "Type 1", 50.0, 50.0);

    let result = ResultsCsv.export(&session, None, &path).unwrap();
    assert_eq!(result.markers_exported, 1);
    assert_eq!(result.files_created, vec![path.clone()]);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("=== Marker Details ===\n"));
}
