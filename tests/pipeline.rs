//! End-to-end conversions through files on disk.

use std::path::PathBuf;

use carpmesh::config::PurkinjeConfig;
use carpmesh::error::ConvertError;
use carpmesh::io::{self, carp, output_path, pkje, Format};
use carpmesh::network::{reconstruct, ReconstructOptions, MAX_SONS};

const FAN: &str = "# vtk DataFile Version 3.0
three sons at one junction
ASCII
DATASET POLYDATA
POINTS 6 double
0 0 0
5 0 0
10 0 0
20 5 0
20 -5 0
20 0 5
LINES 4 13
3 0 1 2
2 2 3
2 2 4
2 2 5
";

const TETS: &str = "# vtk DataFile Version 2.0
two tets
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 5 float
0 0 0
1 0 0
0 1 0
0 0 1
1 1 1
CELLS 3 12
4 0 1 2 3
4 1 2 3 4
1 4
CELL_TYPES 3
10
10
1
CELL_DATA 3
SCALARS regions int 1
LOOKUP_TABLE default
7 8 9
";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("carpmesh-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_purkinje_conversion() {
    let dir = scratch_dir("purkinje");
    let input = dir.join("fan.vtk");
    std::fs::write(&input, FAN).unwrap();

    let store = io::load(&input).unwrap();
    let (network, report) = reconstruct(&store, &ReconstructOptions::default()).unwrap();
    assert_eq!(report.repairs, 1);
    assert_eq!(network.num_cables(), 5);
    assert_eq!(network.num_points(), 7);

    let config = PurkinjeConfig::load_or_create(dir.join("config.cfg")).unwrap();
    let out = output_path(&input, Format::Pkje);
    pkje::save(&network, &config, &out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(bytes.last(), Some(&0u8));
    let text = String::from_utf8(bytes[..bytes.len() - 1].to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("5"));
    assert_eq!(lines.next(), Some(pkje::SEPARATOR));

    // The parent now ends at the split point (9.5, 0, 0) and feeds the
    // stub (4) and the moved branch (3).
    assert!(text.contains("Cable 0\n-1 -1\n3 4\n3\n75\n100\n0.0006\n0 0 0 \n5 0 0 \n9.5 0 0 \n"));
    assert!(text.contains("Cable 4\n0 -1\n1 2\n2\n"));
    assert!(text.contains("Cable 3\n0 -1\n-1 -1\n2\n"));

    for id in network.cable_ids() {
        assert!(network.relations(id).unwrap().sons.len() <= MAX_SONS);
    }

    // Converting again gives identical bytes.
    let (again, _) = reconstruct(&store, &ReconstructOptions::default()).unwrap();
    let mut buf = Vec::new();
    pkje::write(&again, &config, &mut buf).unwrap();
    assert_eq!(buf, std::fs::read(&out).unwrap());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_heart_conversion() {
    let dir = scratch_dir("heart");
    let input = dir.join("tets.vtk");
    std::fs::write(&input, TETS).unwrap();

    let store = io::load(&input).unwrap();
    let elem = output_path(&input, Format::Elem);
    let pts = output_path(&input, Format::Pts);

    // The vertex cell has no CARP tag and is dropped.
    assert_eq!(carp::save_elements(&store, &elem).unwrap(), 2);
    carp::save_points(&store, &pts).unwrap();

    assert_eq!(
        std::fs::read_to_string(&elem).unwrap(),
        "2\nTt 0 1 2 3 7\nTt 1 2 3 4 8\n"
    );
    assert_eq!(
        std::fs::read_to_string(&pts).unwrap(),
        "5\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n1 1 1\n"
    );

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_empty_mesh_skips_points_file() {
    let dir = scratch_dir("empty");
    let input = dir.join("empty.vtk");
    std::fs::write(&input, "# vtk DataFile Version 3.0\nempty\nASCII\nDATASET POLYDATA\n").unwrap();

    let store = io::load(&input).unwrap();
    let pts = output_path(&input, Format::Pts);
    let err = carp::save_points(&store, &pts).unwrap_err();
    assert!(matches!(err, ConvertError::EmptyDataset(_)));
    assert_eq!(err.exit_code(), 8);
    assert!(!pts.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_parent_aborts() {
    let dir = scratch_dir("orphans");
    let input = dir.join("star.vtk");
    std::fs::write(
        &input,
        "# vtk DataFile Version 3.0
star
ASCII
DATASET POLYDATA
POINTS 4 double
0 0 0 1 0 0 0 1 0 0 0 1
LINES 3 9
2 0 1
2 0 2
2 0 3
",
    )
    .unwrap();

    let store = io::load(&input).unwrap();
    let err = reconstruct(&store, &ReconstructOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::MissingParent { .. }));
    assert_eq!(err.exit_code(), 6);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file_is_io_error() {
    let err = io::load("/nonexistent/carpmesh/input.vtk").unwrap_err();
    assert!(matches!(err, ConvertError::Io(_)));
    assert_eq!(err.exit_code(), 3);
}
