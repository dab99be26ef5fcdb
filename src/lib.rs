//! # carpmesh
//!
//! Converts meshes into input files for the CARP cardiac electrophysiology
//! simulator.
//!
//! A conversion reads a mesh into a [`DatasetStore`](dataset::DatasetStore)
//! and writes one of two output families:
//!
//! - **Heart** (bulk tissue): `.pts` points and `.elem` elements, see
//!   [`io::carp`].
//! - **Purkinje** (conduction fibres): a `.pkje` network, see [`io::pkje`].
//!   The cables are first joined into a network by their endpoints and every
//!   junction with more than two branches is split, see [`network`].
//!
//! ## Features
//!
//! - **Legacy VTK input**: unstructured grids and polydata, with point, cell
//!   and field attributes
//! - **Typed datasets**: named columns with per-dataset scalar types
//! - **Deterministic repair**: identical inputs give byte-identical output
//! - **Exact or quantized endpoint matching**
//!
//! ## Quick Start
//!
//! ```no_run
//! use carpmesh::prelude::*;
//!
//! let store = carpmesh::io::load("fibres.vtk").unwrap();
//!
//! let (network, report) = reconstruct(&store, &ReconstructOptions::default()).unwrap();
//! println!("{} splits, {} cables", report.repairs, network.num_cables());
//!
//! let config = PurkinjeConfig::load_or_create("config.cfg").unwrap();
//! carpmesh::io::pkje::save(&network, &config, "fibres.pkje").unwrap();
//! ```
//!
//! ## Building Networks Programmatically
//!
//! ```
//! use carpmesh::prelude::*;
//! use carpmesh::dataset::{self, ScalarType};
//!
//! let mut points = Dataset::new(dataset::POINTS, ScalarType::F64);
//! for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 1.0, 0.0], [2.0, -1.0, 0.0]] {
//!     points.append(&p);
//! }
//!
//! let mut cables = Dataset::new(dataset::ELEMENTS, ScalarType::U32);
//! cables.append(&[0.0, 1.0]);
//! cables.append(&[1.0, 2.0]);
//! cables.append(&[1.0, 3.0]);
//!
//! let network = PurkinjeNetwork::new(points, cables).unwrap();
//! let trunk = network.relations(CableId::new(0)).unwrap();
//! assert_eq!(trunk.sons.to_string(), "1 2");
//! assert_eq!(trunk.parents.to_string(), "-1 -1");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod network;
pub mod progress;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use carpmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::PurkinjeConfig;
    pub use crate::dataset::{Dataset, DatasetStore};
    pub use crate::error::{ConvertError, Result};
    pub use crate::network::{
        reconstruct, CableId, KeyMode, PointId, PurkinjeNetwork, ReconstructOptions,
        RepairReport,
    };
    pub use crate::progress::Progress;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
