//! Purkinje fiber network reconstruction.
//!
//! A fiber network is a set of cables (polylines over a shared point set).
//! Cables are related through their endpoints: the *parents* of a cable are
//! the cables ending where it starts, its *sons* are the cables starting where
//! it ends. The simulator accepts at most [`MAX_SONS`] sons and
//! [`MAX_PARENTS`] parents per junction.
//!
//! Reconstruction indexes every cable by its endpoints, then repairs each
//! junction with too many sons by splitting the parent cable (see
//! [`PurkinjeNetwork::repair_bifurcations`]). Junctions with too many parents
//! are reported but left as they are.
//!
//! # Example
//!
//! ```no_run
//! use carpmesh::network::{reconstruct, ReconstructOptions};
//!
//! let store = carpmesh::io::load("fibers.vtk").unwrap();
//! let (network, report) = reconstruct(&store, &ReconstructOptions::default()).unwrap();
//!
//! println!("{} cables after {} splits", network.num_cables(), report.repairs);
//! ```

mod index;
mod key;
mod relations;
mod repair;
mod topology;

pub use index::{CableId, PointId};
pub use key::{CoordKey, KeyMode};
pub use relations::RelationIndex;
pub use repair::RepairReport;
pub use topology::{CableRelations, ParentOverflow, PurkinjeNetwork, RelationPair};

use crate::dataset::DatasetStore;
use crate::error::{ConvertError, Result};
use crate::progress::Progress;

/// Maximum number of cables that may start at one junction.
pub const MAX_SONS: usize = 2;

/// Maximum number of cables that may end at one junction.
pub const MAX_PARENTS: usize = 2;

/// Default position of a split point along the parent's last edge.
pub const DEFAULT_SPLIT_FRACTION: f64 = 0.9;

/// Options for network reconstruction.
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// How endpoint positions are matched.
    pub key_mode: KeyMode,

    /// Where the split point lands on the parent's last edge, as a fraction
    /// from its second-to-last point (0.0) to the junction (1.0).
    pub split_fraction: f64,

    /// Upper bound on the number of splits.
    /// If None, the initial cable count plus one.
    pub max_repairs: Option<usize>,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            key_mode: KeyMode::Exact,
            split_fraction: DEFAULT_SPLIT_FRACTION,
            max_repairs: None,
        }
    }
}

impl ReconstructOptions {
    /// Set the endpoint matching mode.
    pub fn with_key_mode(mut self, key_mode: KeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    /// Set the split fraction.
    pub fn with_split_fraction(mut self, fraction: f64) -> Self {
        self.split_fraction = fraction;
        self
    }

    /// Set the maximum number of splits before giving up.
    pub fn with_max_repairs(mut self, max_repairs: usize) -> Self {
        self.max_repairs = Some(max_repairs);
        self
    }

    /// Check that the options describe a valid repair.
    pub fn validate(&self) -> Result<()> {
        let f = self.split_fraction;
        if !f.is_finite() || f <= 0.0 || f >= 1.0 {
            return Err(ConvertError::invalid_param(
                "split_fraction",
                f,
                "must lie strictly between 0 and 1",
            ));
        }
        Ok(())
    }
}

/// Build a network from the store's `points` and `elements` and repair its
/// bifurcations.
///
/// The store is left untouched; the returned network owns repaired copies.
pub fn reconstruct(
    store: &DatasetStore,
    options: &ReconstructOptions,
) -> Result<(PurkinjeNetwork, RepairReport)> {
    reconstruct_with_progress(store, options, &Progress::none())
}

/// Network reconstruction with progress reporting.
pub fn reconstruct_with_progress(
    store: &DatasetStore,
    options: &ReconstructOptions,
    progress: &Progress,
) -> Result<(PurkinjeNetwork, RepairReport)> {
    options.validate()?;
    let mut network = PurkinjeNetwork::from_store(store, options.key_mode)?;
    log::info!(
        "network: {} points, {} cables, {} over-connected junctions",
        network.num_points(),
        network.num_cables(),
        network.son_overflow_count()
    );
    let report = network.repair_bifurcations_with_progress(options, progress)?;
    Ok((network, report))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::dataset::{self, Dataset, ScalarType};

    /// `points` and `elements` datasets from literal rows.
    pub(crate) fn datasets(points: &[[f64; 3]], cables: &[&[usize]]) -> (Dataset, Dataset) {
        let mut pts = Dataset::new(dataset::POINTS, ScalarType::F64);
        for p in points {
            pts.append(p);
        }
        let mut els = Dataset::new(dataset::ELEMENTS, ScalarType::U32);
        for cable in cables {
            let row: Vec<f64> = cable.iter().map(|&i| i as f64).collect();
            els.append(&row);
        }
        (pts, els)
    }
}
