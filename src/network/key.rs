//! Coordinate keys for endpoint matching.
//!
//! Cables are joined when the end point of one and the start point of another
//! land on the same [`CoordKey`]. How a position becomes a key is chosen by
//! [`KeyMode`]:
//!
//! - [`KeyMode::Exact`] (default): coordinates must be equal as `f64`
//!   values. No tolerance, so reader noise in the last bit breaks a junction.
//! - [`KeyMode::Quantized`]: coordinates are snapped to a uniform grid of the
//!   given cell size. Positions in the same cell match; positions straddling
//!   a cell boundary do not, however close they are.

use nalgebra::Point3;

use crate::error::{ConvertError, Result};

/// Hashable identity of a junction position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey([u64; 3]);

/// How positions are turned into [`CoordKey`]s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum KeyMode {
    /// Bit-exact coordinates (`-0.0` and `0.0` are the same position).
    #[default]
    Exact,
    /// Integer grid cell `floor(coord / cell)` on each axis.
    Quantized {
        /// Edge length of a grid cell.
        cell: f64,
    },
}

impl KeyMode {
    /// Quantized keys with the given cell size.
    ///
    /// The cell size must be finite and positive.
    pub fn quantized(cell: f64) -> Result<Self> {
        if !cell.is_finite() || cell <= 0.0 {
            return Err(ConvertError::invalid_param(
                "cell",
                cell,
                "must be finite and positive",
            ));
        }
        Ok(KeyMode::Quantized { cell })
    }

    /// Key of a position.
    #[inline]
    pub fn key(&self, p: &Point3<f64>) -> CoordKey {
        match *self {
            KeyMode::Exact => CoordKey([exact_bits(p.x), exact_bits(p.y), exact_bits(p.z)]),
            KeyMode::Quantized { cell } => CoordKey([
                floor_sat_i64(p.x / cell) as u64,
                floor_sat_i64(p.y / cell) as u64,
                floor_sat_i64(p.z / cell) as u64,
            ]),
        }
    }
}

// Adding +0.0 folds -0.0 into 0.0.
#[inline(always)]
fn exact_bits(v: f64) -> u64 {
    (v + 0.0).to_bits()
}

#[inline(always)]
fn floor_sat_i64(x: f64) -> i64 {
    if !x.is_finite() {
        return if x.is_sign_positive() { i64::MAX } else { i64::MIN };
    }
    let i = x as i64;
    i - ((i as f64 > x) as i64)
}
