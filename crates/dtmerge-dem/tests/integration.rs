//! Integration tests for dtmerge-dem using tiles written to a temporary directory.

use dtmerge_dem::{
    merge_directory, AscFormat, AscTile, DemError, HeaderConvention, MergeOptions, DEFAULT_OUTPUT_FILE_NAME,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_tile(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("Failed to write tile");
}

fn dirs() -> (TempDir, TempDir) {
    (
        TempDir::new().expect("Failed to create input dir"),
        TempDir::new().expect("Failed to create output dir"),
    )
}

#[test]
fn test_merge_two_tiles_side_by_side() {
    let (input, output) = dirs();
    write_tile(
        input.path(),
        "a.asc",
        "ncols 2\nnrows 2\nxllcenter 0\nyllcenter 0\ncellsize 1\nnodata_value -9999\n1 2\n3 4\n",
    );
    write_tile(
        input.path(),
        "b.asc",
        "ncols 2\nnrows 2\nxllcenter 2\nyllcenter 0\ncellsize 1\nnodata_value -9999\n5 6\n7 8\n",
    );

    let merged = merge_directory(input.path(), output.path(), &MergeOptions::default())
        .expect("Merge should succeed");

    assert_eq!(merged.output_path, output.path().join(DEFAULT_OUTPUT_FILE_NAME));
    assert_eq!(merged.report.datasets, 2);

    let text = fs::read_to_string(&merged.output_path).unwrap();
    assert_eq!(
        text,
        "ncols 4\nnrows 2\nxllcenter 0\nyllcenter 0\ncellsize 1\nnodata_value -9999\n1 2 5 6\n3 4 7 8\n"
    );
}

#[test]
fn test_merge_single_tile_is_identity() {
    let (input, output) = dirs();
    let tile = "ncols 3\nnrows 2\nxllcenter 100\nyllcenter 200\ncellsize 10\nnodata_value -1\n1 2 3\n4 5.5 6\n";
    write_tile(input.path(), "only.asc", tile);

    let merged = merge_directory(input.path(), output.path(), &MergeOptions::default()).unwrap();
    assert_eq!(fs::read_to_string(&merged.output_path).unwrap(), tile);
    assert_eq!(merged.report.layout.tiles_x, 1);
    assert_eq!(merged.report.layout.tiles_y, 1);
}

#[test]
fn test_merge_2x2_mosaic() {
    let (input, output) = dirs();
    let header = |x: u32, y: u32| {
        format!("ncols 2\nnrows 2\nxllcenter {x}\nyllcenter {y}\ncellsize 1\nnodata_value -9999\n")
    };
    write_tile(input.path(), "nw.asc", &format!("{}1 2\n5 6\n", header(0, 2)));
    write_tile(input.path(), "ne.asc", &format!("{}3 4\n7 8\n", header(2, 2)));
    write_tile(input.path(), "sw.asc", &format!("{}9 10\n13 14\n", header(0, 0)));
    write_tile(input.path(), "se.asc", &format!("{}11 12\n15 16\n", header(2, 0)));

    let merged = merge_directory(input.path(), output.path(), &MergeOptions::default()).unwrap();
    let result = AscTile::from_file(&merged.output_path, &AscFormat::default()).unwrap();

    assert_eq!(result.dimensions(), (4, 4));
    let expected: Vec<f64> = (1..=16).map(f64::from).collect();
    assert_eq!(result.grid.as_slice(), expected.as_slice());
    assert_eq!(merged.report.placement.cells_skipped, 0);
}

#[test]
fn test_merge_with_gap_keeps_no_data() {
    let (input, output) = dirs();
    write_tile(
        input.path(),
        "sw.asc",
        "ncols 1\nnrows 1\nxllcenter 0\nyllcenter 0\ncellsize 1\nnodata_value -9999\n1\n",
    );
    write_tile(
        input.path(),
        "ne.asc",
        "ncols 1\nnrows 1\nxllcenter 2\nyllcenter 2\ncellsize 1\nnodata_value -9999\n2\n",
    );

    let merged = merge_directory(input.path(), output.path(), &MergeOptions::default()).unwrap();
    let result = AscTile::from_file(&merged.output_path, &AscFormat::default()).unwrap();

    assert_eq!(result.dimensions(), (3, 3));
    assert_eq!(
        result.grid.as_slice(),
        &[-9999.0, -9999.0, 2.0, -9999.0, -9999.0, -9999.0, 1.0, -9999.0, -9999.0]
    );
}

#[test]
fn test_merge_corner_convention_with_custom_separator() {
    let (input, output) = dirs();
    write_tile(
        input.path(),
        "left.asc",
        "ncols;1\nnrows;2\nxllcorner;10\nyllcorner;20\ncellsize;1\nNODATA_value;-1\n1.5\n2.5\n",
    );
    write_tile(
        input.path(),
        "right.asc",
        "ncols;1\nnrows;2\nxllcorner;11\nyllcorner;20\ncellsize;1\nNODATA_value;-1\n3.5\n4.5\n",
    );

    let options = MergeOptions {
        format: AscFormat {
            convention: HeaderConvention::Corner,
            separator: ';',
        },
        output_file_name: "mosaic.asc".to_string(),
        ..MergeOptions::default()
    };
    let merged = merge_directory(input.path(), output.path(), &options).unwrap();

    assert_eq!(merged.output_path, output.path().join("mosaic.asc"));
    assert_eq!(
        fs::read_to_string(&merged.output_path).unwrap(),
        "ncols;2\nnrows;2\nxllcorner;10\nyllcorner;20\ncellsize;1\nNODATA_value;-1\n1.5;3.5\n2.5;4.5\n"
    );
}

#[test]
fn test_empty_input_directory() {
    let (input, output) = dirs();
    write_tile(input.path(), "readme.txt", "not a tile");

    let err = merge_directory(input.path(), output.path(), &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, DemError::EmptyInput(_)));
    assert!(!output.path().join(DEFAULT_OUTPUT_FILE_NAME).exists());
}

#[test]
fn test_malformed_header_writes_nothing() {
    let (input, output) = dirs();
    write_tile(
        input.path(),
        "good.asc",
        "ncols 1\nnrows 1\nxllcenter 0\nyllcenter 0\ncellsize 1\nnodata_value -9999\n1\n",
    );
    write_tile(
        input.path(),
        "bad.asc",
        "ncols 1\nnrows 1\nxllcenter zero\nyllcenter 0\ncellsize 1\nnodata_value -9999\n1\n",
    );

    let err = merge_directory(input.path(), output.path(), &MergeOptions::default()).unwrap_err();
    match err {
        DemError::HeaderFieldMissingOrMalformed { field, source_name, .. } => {
            assert_eq!(field, "xllcenter");
            assert!(source_name.ends_with("bad.asc"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn test_overflowing_coordinate_is_rejected() {
    let (input, output) = dirs();
    write_tile(
        input.path(),
        "a.asc",
        "ncols 1\nnrows 1\nxllcenter 0\nyllcenter 0\ncellsize 1\nnodata_value -9999\n1\n",
    );
    write_tile(
        input.path(),
        "b.asc",
        "ncols 1\nnrows 1\nxllcenter 1e400\nyllcenter 0\ncellsize 1\nnodata_value -9999\n2\n",
    );

    let err = merge_directory(input.path(), output.path(), &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, DemError::HeaderFieldMissingOrMalformed { ref field, .. } if field == "xllcenter"));
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn test_inconsistent_cell_size_is_reported() {
    let (input, output) = dirs();
    write_tile(
        input.path(),
        "a.asc",
        "ncols 1\nnrows 1\nxllcenter 0\nyllcenter 0\ncellsize 1\nnodata_value -9999\n1\n",
    );
    write_tile(
        input.path(),
        "b.asc",
        "ncols 1\nnrows 1\nxllcenter 1\nyllcenter 0\ncellsize 2\nnodata_value -9999\n1\n",
    );

    let err = merge_directory(input.path(), output.path(), &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, DemError::InconsistentCellSize { .. }));
}
