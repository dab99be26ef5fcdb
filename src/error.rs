//! Error types for carpmesh.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while reading, reconstructing, or writing a mesh.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input file could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported input file format or encoding.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// A required dataset is not present in the store.
    #[error("dataset '{0}' not found")]
    MissingDataset(String),

    /// A row index past the end of a dataset.
    #[error("row {row} out of range for dataset '{dataset}' ({count} rows)")]
    RowOutOfRange {
        /// The dataset name.
        dataset: String,
        /// The requested row.
        row: usize,
        /// Number of rows in the dataset.
        count: usize,
    },

    /// A cable references a point that does not exist.
    #[error("cable {cable} references point {point}, but only {count} points exist")]
    PointIndexOutOfRange {
        /// The cable index.
        cable: usize,
        /// The invalid point index.
        point: usize,
        /// Number of points.
        count: usize,
    },

    /// A cable stores a value that is not a valid point index.
    #[error("cable {cable} holds {value}, which is not a point index")]
    InvalidPointIndex {
        /// The cable index.
        cable: usize,
        /// The offending value.
        value: f64,
    },

    /// A cable has fewer than two points.
    #[error("cable {cable} has {nodes} point(s); at least 2 are required")]
    CableTooShort {
        /// The cable index.
        cable: usize,
        /// Number of points in the cable.
        nodes: usize,
    },

    /// A point row does not carry three coordinates.
    #[error("point {point} has {dimension} component(s); 3 are required")]
    PointDimension {
        /// The point index.
        point: usize,
        /// Number of components found.
        dimension: usize,
    },

    /// An over-connected junction has no parent cable to split.
    #[error("cable {cable} is an extra branch at ({x}, {y}, {z}) but no cable ends there")]
    MissingParent {
        /// The excess son cable.
        cable: usize,
        /// Junction x coordinate.
        x: f64,
        /// Junction y coordinate.
        y: f64,
        /// Junction z coordinate.
        z: f64,
    },

    /// Bifurcation repair kept creating new violations.
    #[error("bifurcation repair did not converge after {repairs} splits")]
    RepairDiverged {
        /// Number of splits performed before giving up.
        repairs: usize,
    },

    /// A dataset that must not be empty has no rows.
    #[error("dataset '{0}' is empty")]
    EmptyDataset(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl ConvertError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        ConvertError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a parse error for `path`.
    pub fn parse<P: Into<PathBuf>, M: Into<String>>(path: P, message: M) -> Self {
        ConvertError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error kind.
    ///
    /// Codes are grouped by kind so scripts can tell a missing file from a
    /// broken fiber network. They start at 3, above clap's usage error (2).
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::Io(_) => 3,
            ConvertError::Parse { .. } | ConvertError::UnsupportedFormat(_) => 4,
            ConvertError::MissingDataset(_)
            | ConvertError::RowOutOfRange { .. }
            | ConvertError::PointIndexOutOfRange { .. }
            | ConvertError::InvalidPointIndex { .. }
            | ConvertError::CableTooShort { .. }
            | ConvertError::PointDimension { .. } => 5,
            ConvertError::MissingParent { .. } | ConvertError::RepairDiverged { .. } => 6,
            ConvertError::InvalidParameter { .. } => 7,
            ConvertError::EmptyDataset(_) => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let io = ConvertError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        let corrupt = ConvertError::CableTooShort { cable: 0, nodes: 1 };
        let topology = ConvertError::RepairDiverged { repairs: 3 };
        let param = ConvertError::invalid_param("cell", -1.0, "must be positive");
        let empty = ConvertError::EmptyDataset("points".to_string());

        let codes = [
            io.exit_code(),
            corrupt.exit_code(),
            topology.exit_code(),
            param.exit_code(),
            empty.exit_code(),
        ];
        assert!(codes.iter().all(|&c| c > 2));
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_messages() {
        let e = ConvertError::invalid_param("split_fraction", 1.5, "must lie in (0, 1)");
        assert_eq!(
            e.to_string(),
            "invalid parameter: split_fraction = 1.5 (must lie in (0, 1))"
        );

        let e = ConvertError::RowOutOfRange {
            dataset: "points".to_string(),
            row: 7,
            count: 3,
        };
        assert_eq!(e.to_string(), "row 7 out of range for dataset 'points' (3 rows)");
    }
}
