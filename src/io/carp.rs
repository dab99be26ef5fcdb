//! CARP bulk tissue files.
//!
//! - `.pts`: the point count, then one line of coordinates per point.
//! - `.elem`: the element count, then one line per element: a two-letter
//!   CARP tag, the point indices, and the region tag when the store has a
//!   `regions` dataset.
//!
//! ```text
//! 2
//! Tt 0 1 2 3 1
//! Tr 1 2 4 2
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::vtk::cell_type;
use crate::dataset::{self, DatasetStore};
use crate::error::{ConvertError, Result};

/// CARP element tag of a VTK cell type, if CARP has one.
pub fn carp_tag(vtk_type: u16) -> Option<&'static str> {
    match vtk_type {
        cell_type::LINE => Some("Ln"),
        cell_type::TRIANGLE | cell_type::POLYGON => Some("Tr"),
        cell_type::QUAD => Some("Qd"),
        cell_type::TETRA => Some("Tt"),
        cell_type::PYRAMID => Some("Py"),
        cell_type::WEDGE => Some("Pr"),
        cell_type::HEXAHEDRON => Some("Hx"),
        _ => None,
    }
}

/// Write the store's points in `.pts` layout.
///
/// Returns [`ConvertError::EmptyDataset`] without writing anything if the
/// store has no points.
pub fn write_points<W: Write>(store: &DatasetStore, writer: &mut W) -> Result<()> {
    let points = store.get(dataset::POINTS)?;
    if points.is_empty() {
        return Err(ConvertError::EmptyDataset(dataset::POINTS.to_string()));
    }

    writeln!(writer, "{}", points.count())?;
    for row in points.rows() {
        write_joined(writer, row)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Save the store's points to a `.pts` file.
///
/// The file is not created when there are no points.
///
/// # Example
///
/// ```no_run
/// use carpmesh::io::carp;
///
/// let store = carpmesh::io::load("heart.vtk").unwrap();
/// carp::save_points(&store, "heart.pts").unwrap();
/// ```
pub fn save_points<P: AsRef<Path>>(store: &DatasetStore, path: P) -> Result<()> {
    if store.get(dataset::POINTS)?.is_empty() {
        return Err(ConvertError::EmptyDataset(dataset::POINTS.to_string()));
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_points(store, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the store's elements in `.elem` layout.
///
/// Elements whose cell type has no CARP tag are skipped with a warning.
/// Returns the number of elements written.
pub fn write_elements<W: Write>(store: &DatasetStore, writer: &mut W) -> Result<usize> {
    let elements = store.get(dataset::ELEMENTS)?;
    let primitives = store.get(dataset::PRIMITIVES)?;
    let regions = store.try_get(dataset::REGIONS);

    let mut tags = Vec::with_capacity(elements.count());
    for row in 0..elements.count() {
        let vtk_type = primitives.get(row)?.first().copied().unwrap_or(0.0);
        let tag = carp_tag(vtk_type as u16);
        if tag.is_none() {
            log::warn!(
                "element {}: VTK cell type {} has no CARP equivalent, skipped",
                row,
                vtk_type
            );
        }
        tags.push(tag);
    }

    let written = tags.iter().filter(|t| t.is_some()).count();
    writeln!(writer, "{}", written)?;
    for (row, tag) in tags.iter().enumerate() {
        let Some(tag) = tag else { continue };
        write!(writer, "{}", tag)?;
        for index in elements.get(row)? {
            write!(writer, " {}", index)?;
        }
        if let Some(regions) = regions {
            if let Some(region) = regions.get(row)?.first() {
                write!(writer, " {}", region)?;
            }
        }
        writeln!(writer)?;
    }
    Ok(written)
}

/// Save the store's elements to an `.elem` file.
pub fn save_elements<P: AsRef<Path>>(store: &DatasetStore, path: P) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_elements(store, &mut writer)?;
    writer.flush()?;
    Ok(written)
}

fn write_joined<W: Write>(writer: &mut W, values: &[f64]) -> Result<()> {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(writer, " ")?;
        }
        write!(writer, "{}", v)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, ScalarType};

    fn store(with_regions: bool) -> DatasetStore {
        let mut points = Dataset::new(dataset::POINTS, ScalarType::F64);
        points.append(&[0.0, 0.0, 0.0]);
        points.append(&[1.5, -2.0, 0.25]);

        let mut elements = Dataset::new(dataset::ELEMENTS, ScalarType::U32);
        let mut primitives = Dataset::new(dataset::PRIMITIVES, ScalarType::U16);
        let mut regions = Dataset::new(dataset::REGIONS, ScalarType::I32);
        for (cell, kind, region) in [
            (vec![0.0, 1.0, 2.0, 3.0], cell_type::TETRA, 1.0),
            (vec![0.0, 1.0, 2.0, 3.0, 4.0], cell_type::POLY_LINE, 2.0),
            (vec![1.0, 2.0, 4.0], cell_type::TRIANGLE, 3.0),
        ] {
            elements.append(&cell);
            primitives.append(&[f64::from(kind)]);
            regions.append(&[region]);
        }

        let mut store = DatasetStore::new();
        store.insert(points);
        store.insert(elements);
        store.insert(primitives);
        if with_regions {
            store.insert(regions);
        }
        store
    }

    fn to_string(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_carp_tags() {
        assert_eq!(carp_tag(cell_type::LINE), Some("Ln"));
        assert_eq!(carp_tag(cell_type::POLYGON), Some("Tr"));
        assert_eq!(carp_tag(cell_type::QUAD), Some("Qd"));
        assert_eq!(carp_tag(cell_type::PYRAMID), Some("Py"));
        assert_eq!(carp_tag(cell_type::WEDGE), Some("Pr"));
        assert_eq!(carp_tag(cell_type::HEXAHEDRON), Some("Hx"));
        assert_eq!(carp_tag(cell_type::VERTEX), None);
        assert_eq!(carp_tag(cell_type::POLY_LINE), None);
    }

    #[test]
    fn test_write_points() {
        let text = to_string(|buf| write_points(&store(false), buf).unwrap());
        assert_eq!(text, "2\n0 0 0\n1.5 -2 0.25\n");
    }

    #[test]
    fn test_empty_points_write_nothing() {
        let mut store = DatasetStore::new();
        store.insert(Dataset::new(dataset::POINTS, ScalarType::F64));

        let mut buf = Vec::new();
        assert!(matches!(
            write_points(&store, &mut buf),
            Err(ConvertError::EmptyDataset(_))
        ));
        assert!(buf.is_empty());

        let path = std::env::temp_dir().join(format!("carpmesh-empty-{}.pts", std::process::id()));
        assert!(save_points(&store, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_elements_with_regions() {
        let mut count = 0;
        let text = to_string(|buf| count = write_elements(&store(true), buf).unwrap());
        assert_eq!(count, 2);
        assert_eq!(text, "2\nTt 0 1 2 3 1\nTr 1 2 4 3\n");
    }

    #[test]
    fn test_write_elements_without_regions() {
        let text = to_string(|buf| {
            write_elements(&store(false), buf).unwrap();
        });
        assert_eq!(text, "2\nTt 0 1 2 3\nTr 1 2 4\n");
    }

    #[test]
    fn test_elements_require_primitives() {
        let mut store = DatasetStore::new();
        store.insert(Dataset::new(dataset::ELEMENTS, ScalarType::U32));
        let mut buf = Vec::new();
        assert!(matches!(
            write_elements(&store, &mut buf),
            Err(ConvertError::MissingDataset(_))
        ));
    }
}
