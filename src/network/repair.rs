//! Bifurcation repair.
//!
//! The simulator accepts at most two sons per junction. Where more cables
//! start at one position, the first two stay and each extra one is moved to a
//! new point placed slightly upstream on the parent cable:
//!
//! ```text
//!   before                         after
//!
//!   parent ──────────● P           parent ───────● N ── stub ──● P
//!                   /|\                           \            / \
//!                  a b s                           s          a   b
//! ```
//!
//! `N` lies on the parent's last edge at `split_fraction` of the way from its
//! second-to-last point to `P`. The parent now ends at `N`, the stub runs from
//! `N` to `P`, and `s` starts at `N`. `P` keeps two sons, `N` has two (stub and
//! `s`). The scan then restarts, since the split may have shifted other
//! buckets, until no junction has more than two sons.

use super::index::{CableId, PointId};
use super::key::CoordKey;
use super::topology::{ParentOverflow, PurkinjeNetwork};
use super::{ReconstructOptions, MAX_SONS};
use crate::error::{ConvertError, Result};
use crate::progress::Progress;

/// What a repair pass did.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairReport {
    /// Number of splits performed.
    pub repairs: usize,
    /// Points appended to the network.
    pub points_added: usize,
    /// Cables appended to the network.
    pub cables_added: usize,
    /// Junctions still holding more than two parents.
    pub parent_overflows: Vec<ParentOverflow>,
}

impl PurkinjeNetwork {
    /// Split cables until no junction has more than [`MAX_SONS`] sons.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::MissingParent`] if an over-connected junction has no
    ///   cable ending there.
    /// - [`ConvertError::RepairDiverged`] if the number of splits exceeds the
    ///   configured bound, which happens when new points keep landing on
    ///   existing junctions.
    pub fn repair_bifurcations(&mut self, options: &ReconstructOptions) -> Result<RepairReport> {
        self.repair_bifurcations_with_progress(options, &Progress::none())
    }

    /// Bifurcation repair with progress reporting.
    pub fn repair_bifurcations_with_progress(
        &mut self,
        options: &ReconstructOptions,
        progress: &Progress,
    ) -> Result<RepairReport> {
        options.validate()?;

        let initial_points = self.num_points();
        let initial_cables = self.num_cables();
        let max_repairs = options.max_repairs.unwrap_or(initial_cables + 1);
        let total = self.sons.excess(MAX_SONS);

        let mut repairs = 0;
        while let Some((junction, son)) = self.sons.first_overflow(MAX_SONS) {
            if repairs >= max_repairs {
                return Err(ConvertError::RepairDiverged { repairs });
            }
            self.split_excess_son(junction, son, options.split_fraction)?;
            repairs += 1;
            progress.report(repairs.min(total), total, "Repairing bifurcations");
        }
        progress.report(total, total, "Repairing bifurcations");

        let parent_overflows = self.parent_overflows()?;
        for overflow in &parent_overflows {
            log::warn!(
                "junction ({}, {}, {}) has {} parents: {:?}",
                overflow.position.x,
                overflow.position.y,
                overflow.position.z,
                overflow.cables.len(),
                overflow.cables
            );
        }

        let report = RepairReport {
            repairs,
            points_added: self.num_points() - initial_points,
            cables_added: self.num_cables() - initial_cables,
            parent_overflows,
        };
        log::info!(
            "bifurcation repair: {} splits, {} points and {} cables added",
            report.repairs,
            report.points_added,
            report.cables_added
        );
        Ok(report)
    }

    /// Move `son` off `junction` onto a new point on the parent cable.
    fn split_excess_son(&mut self, junction: CoordKey, son: CableId, fraction: f64) -> Result<()> {
        let mut son_nodes = self.cable_nodes(son)?;
        let junction_point = son_nodes[0];
        let tip = self.position(junction_point)?;

        let parent = self
            .parents
            .get(&junction)
            .iter()
            .copied()
            .find(|&c| c != son)
            .ok_or(ConvertError::MissingParent {
                cable: son.index(),
                x: tip.x,
                y: tip.y,
                z: tip.z,
            })?;

        let mut parent_nodes = self.cable_nodes(parent)?;
        let last = parent_nodes.len() - 1;
        let origin = self.position(parent_nodes[last - 1])?;
        let parent_end = self.key_of(parent_nodes[last])?;

        let split = origin + (tip - origin) * fraction;
        let new_point = self.push_point(&[split.x, split.y, split.z]);
        let stub = self.push_cable(&[new_point, junction_point]);

        parent_nodes[last] = new_point;
        son_nodes[0] = new_point;
        self.write_cable(parent, &parent_nodes)?;
        self.write_cable(son, &son_nodes)?;

        let split_key = self.key_of(new_point)?;
        self.parents.remove(parent_end, parent);
        self.sons.remove(junction, son);
        self.parents.insert(split_key, parent);
        self.parents.insert(junction, stub);
        self.sons.insert(split_key, stub);
        self.sons.insert(split_key, son);

        log::debug!(
            "split {}: {} now starts at new point {} ({}, {}, {}), stub {}",
            parent,
            son,
            new_point,
            split.x,
            split.y,
            split.z,
            stub
        );
        Ok(())
    }

    fn push_point(&mut self, coords: &[f64; 3]) -> PointId {
        PointId::new(self.points.append(coords))
    }

    fn push_cable(&mut self, nodes: &[PointId]) -> CableId {
        let row: Vec<f64> = nodes.iter().map(|p| p.index() as f64).collect();
        CableId::new(self.cables.append(&row))
    }

    fn write_cable(&mut self, cable: CableId, nodes: &[PointId]) -> Result<()> {
        let row: Vec<f64> = nodes.iter().map(|p| p.index() as f64).collect();
        self.cables.replace(cable.index(), &row)
    }
}
