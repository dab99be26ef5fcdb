//! The fiber network and its relation queries.

use std::fmt;

use nalgebra::Point3;

use super::index::{CableId, PointId};
use super::key::{CoordKey, KeyMode};
use super::relations::RelationIndex;
use super::{MAX_PARENTS, MAX_SONS};
use crate::dataset::{self, Dataset, DatasetStore};
use crate::error::{ConvertError, Result};

/// A Purkinje fiber network: points, cables, and the endpoint relations
/// between cables.
///
/// The network owns its `points` and `elements` datasets for the duration of
/// a conversion. Bifurcation repair appends to them and rewrites cable
/// endpoints in place; nothing is ever removed.
#[derive(Debug, Clone)]
pub struct PurkinjeNetwork {
    pub(super) points: Dataset,
    pub(super) cables: Dataset,
    pub(super) key_mode: KeyMode,
    /// Cables by the key of their start point.
    pub(super) sons: RelationIndex,
    /// Cables by the key of their end point.
    pub(super) parents: RelationIndex,
}

/// Up to two related cables, in output order.
///
/// When both are present the smaller id comes first; a single relation comes
/// first and is followed by the invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelationPair([CableId; 2]);

impl RelationPair {
    /// Build a pair from the first two cables of a bucket.
    pub fn from_bucket(cables: &[CableId]) -> Self {
        match *cables {
            [] => Self([CableId::invalid(), CableId::invalid()]),
            [only] => Self([only, CableId::invalid()]),
            [a, b, ..] => Self([a.min(b), a.max(b)]),
        }
    }

    /// First relation, if any.
    pub fn first(&self) -> Option<CableId> {
        Some(self.0[0]).filter(|c| c.is_valid())
    }

    /// Second relation, if any.
    pub fn second(&self) -> Option<CableId> {
        Some(self.0[1]).filter(|c| c.is_valid())
    }

    /// Both slots, sentinels included.
    pub fn as_array(&self) -> [CableId; 2] {
        self.0
    }

    /// Number of valid relations.
    pub fn len(&self) -> usize {
        self.0.iter().filter(|c| c.is_valid()).count()
    }

    /// Whether neither slot holds a relation.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for RelationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0[0], self.0[1])
    }
}

/// Parents and sons of one cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CableRelations {
    /// Cables ending where this one starts.
    pub parents: RelationPair,
    /// Cables starting where this one ends.
    pub sons: RelationPair,
}

/// A junction with more parents than the simulator accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentOverflow {
    /// Position of the junction.
    pub position: Point3<f64>,
    /// All cables ending there.
    pub cables: Vec<CableId>,
}

impl PurkinjeNetwork {
    /// Build a network with exact endpoint matching.
    pub fn new(points: Dataset, cables: Dataset) -> Result<Self> {
        Self::with_key_mode(points, cables, KeyMode::Exact)
    }

    /// Build a network, validating every cable and indexing its endpoints.
    ///
    /// Fails on corrupt input: cables with fewer than two points, point
    /// indices that are negative, fractional, or out of range, and point rows
    /// with fewer than three coordinates.
    pub fn with_key_mode(points: Dataset, cables: Dataset, key_mode: KeyMode) -> Result<Self> {
        let mut network = Self {
            points,
            cables,
            key_mode,
            sons: RelationIndex::new(),
            parents: RelationIndex::new(),
        };
        network.validate()?;
        network.index_relations()?;
        Ok(network)
    }

    /// Build a network from copies of the store's `points` and `elements`.
    pub fn from_store(store: &DatasetStore, key_mode: KeyMode) -> Result<Self> {
        let points = store.get(dataset::POINTS)?.clone();
        let cables = store.get(dataset::ELEMENTS)?.clone();
        Self::with_key_mode(points, cables, key_mode)
    }

    fn validate(&self) -> Result<()> {
        for (p, row) in self.points.rows().enumerate() {
            if row.len() < 3 {
                return Err(ConvertError::PointDimension {
                    point: p,
                    dimension: row.len(),
                });
            }
        }

        for (c, row) in self.cables.rows().enumerate() {
            if row.len() < 2 {
                return Err(ConvertError::CableTooShort {
                    cable: c,
                    nodes: row.len(),
                });
            }
            for &value in row {
                self.to_point_id(CableId::new(c), value)?;
            }
        }
        Ok(())
    }

    fn index_relations(&mut self) -> Result<()> {
        for cable in self.cable_ids() {
            let start = self.key_of(self.start_point(cable)?)?;
            let end = self.key_of(self.end_point(cable)?)?;
            self.sons.insert(start, cable);
            self.parents.insert(end, cable);
        }
        log::debug!(
            "indexed {} cables: {} start keys, {} end keys",
            self.num_cables(),
            self.sons.num_keys(),
            self.parents.num_keys()
        );
        Ok(())
    }

    fn to_point_id(&self, cable: CableId, value: f64) -> Result<PointId> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(ConvertError::InvalidPointIndex {
                cable: cable.index(),
                value,
            });
        }
        let point = value as usize;
        if point >= self.points.count() {
            return Err(ConvertError::PointIndexOutOfRange {
                cable: cable.index(),
                point,
                count: self.points.count(),
            });
        }
        Ok(PointId::new(point))
    }

    /// Number of points, including those added by repair.
    pub fn num_points(&self) -> usize {
        self.points.count()
    }

    /// Number of cables, including those added by repair.
    pub fn num_cables(&self) -> usize {
        self.cables.count()
    }

    /// The point dataset.
    pub fn points(&self) -> &Dataset {
        &self.points
    }

    /// The cable dataset.
    pub fn cables(&self) -> &Dataset {
        &self.cables
    }

    /// Iterate over all cable ids in index order.
    pub fn cable_ids(&self) -> impl Iterator<Item = CableId> {
        (0..self.num_cables()).map(CableId::new)
    }

    /// Points of a cable, in order.
    pub fn cable_nodes(&self, cable: CableId) -> Result<Vec<PointId>> {
        self.cables
            .get(cable.index())?
            .iter()
            .map(|&value| self.to_point_id(cable, value))
            .collect()
    }

    /// First point of a cable.
    pub fn start_point(&self, cable: CableId) -> Result<PointId> {
        let row = self.cables.get(cable.index())?;
        self.to_point_id(cable, row[0])
    }

    /// Last point of a cable.
    pub fn end_point(&self, cable: CableId) -> Result<PointId> {
        let row = self.cables.get(cable.index())?;
        self.to_point_id(cable, row[row.len() - 1])
    }

    /// Position of a point.
    pub fn position(&self, point: PointId) -> Result<Point3<f64>> {
        let row = self.points.get(point.index())?;
        if row.len() < 3 {
            return Err(ConvertError::PointDimension {
                point: point.index(),
                dimension: row.len(),
            });
        }
        Ok(Point3::new(row[0], row[1], row[2]))
    }

    /// Junction key of a point.
    pub fn key_of(&self, point: PointId) -> Result<CoordKey> {
        Ok(self.key_mode.key(&self.position(point)?))
    }

    /// Cables starting at `key`, in insertion order.
    pub fn sons_at(&self, key: &CoordKey) -> &[CableId] {
        self.sons.get(key)
    }

    /// Cables ending at `key`, in insertion order.
    pub fn parents_at(&self, key: &CoordKey) -> &[CableId] {
        self.parents.get(key)
    }

    /// Parents and sons of `cable`.
    ///
    /// Parents are the cables ending at its start point; sons are the cables
    /// starting at its end point. At most two of each are reported.
    pub fn relations(&self, cable: CableId) -> Result<CableRelations> {
        let start = self.key_of(self.start_point(cable)?)?;
        let end = self.key_of(self.end_point(cable)?)?;

        let parents = self.parents.get(&start);
        if parents.len() > MAX_PARENTS {
            log::warn!(
                "cable {} has {} parents; only {:?} are written",
                cable,
                parents.len(),
                &parents[..MAX_PARENTS]
            );
        }
        let sons = self.sons.get(&end);
        if sons.len() > MAX_SONS {
            log::warn!(
                "cable {} has {} sons; only {:?} are written",
                cable,
                sons.len(),
                &sons[..MAX_SONS]
            );
        }

        Ok(CableRelations {
            parents: RelationPair::from_bucket(parents),
            sons: RelationPair::from_bucket(sons),
        })
    }

    /// Number of junctions with more than [`MAX_SONS`] sons.
    pub fn son_overflow_count(&self) -> usize {
        self.sons.overflowing(MAX_SONS).count()
    }

    /// Junctions with more than [`MAX_PARENTS`] parents.
    ///
    /// These are reported but never repaired.
    pub fn parent_overflows(&self) -> Result<Vec<ParentOverflow>> {
        self.parents
            .overflowing(MAX_PARENTS)
            .map(|(_, cables)| {
                let position = self.position(self.end_point(cables[0])?)?;
                Ok(ParentOverflow {
                    position,
                    cables: cables.to_vec(),
                })
            })
            .collect()
    }
}
