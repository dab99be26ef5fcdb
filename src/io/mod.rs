//! Mesh file I/O.
//!
//! This module reads input meshes into a [`DatasetStore`] and writes the
//! CARP simulator files.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Legacy VTK | `.vtk` | ✓ | ✗ | ASCII only |
//! | CARP points | `.pts` | ✗ | ✓ | Bulk tissue |
//! | CARP elements | `.elem` | ✗ | ✓ | Bulk tissue |
//! | CARP Purkinje | `.pkje` | ✗ | ✓ | Fibre network |
//!
//! # Usage
//!
//! ```no_run
//! use carpmesh::io::{self, carp};
//!
//! // Load with automatic format detection
//! let store = io::load("heart.vtk").unwrap();
//!
//! carp::save_points(&store, "heart.pts").unwrap();
//! carp::save_elements(&store, "heart.elem").unwrap();
//! ```

pub mod carp;
pub mod pkje;
pub mod vtk;

use std::path::{Path, PathBuf};

use crate::dataset::DatasetStore;
use crate::error::{ConvertError, Result};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Legacy VTK format.
    Vtk,
    /// CARP points.
    Pts,
    /// CARP elements.
    Elem,
    /// CARP Purkinje network.
    Pkje,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "vtk" => Some(Format::Vtk),
            "pts" => Some(Format::Pts),
            "elem" => Some(Format::Elem),
            "pkje" => Some(Format::Pkje),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Vtk => "vtk",
            Format::Pts => "pts",
            Format::Elem => "elem",
            Format::Pkje => "pkje",
        }
    }
}

/// `path` with its extension replaced by the one of `format`.
///
/// ```
/// use std::path::Path;
/// use carpmesh::io::{output_path, Format};
///
/// assert_eq!(output_path("out/heart.vtk", Format::Pts), Path::new("out/heart.pts"));
/// assert_eq!(output_path("heart", Format::Elem), Path::new("heart.elem"));
/// ```
pub fn output_path<P: AsRef<Path>>(path: P, format: Format) -> PathBuf {
    path.as_ref().with_extension(format.extension())
}

/// Load a mesh into a dataset store with automatic format detection.
///
/// The format is determined by the file extension.
///
/// # Example
///
/// ```no_run
/// use carpmesh::io::load;
///
/// let store = load("heart.vtk").unwrap();
/// println!("{} datasets", store.len());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<DatasetStore> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("(none)")
        .to_string();

    match Format::from_path(path) {
        Some(Format::Vtk) => vtk::load(path),
        Some(format) => Err(ConvertError::UnsupportedFormat(format!(
            "{} files cannot be read",
            format.extension()
        ))),
        None => Err(ConvertError::UnsupportedFormat(extension)),
    }
}
