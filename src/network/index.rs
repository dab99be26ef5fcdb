//! Index types for network elements.
//!
//! Type-safe wrappers for point and cable rows, so a point index can never be
//! passed where a cable index is expected. The invalid value doubles as the
//! "no relation" sentinel of the `.pkje` format and prints as `-1`.

use std::fmt::{self, Debug, Display};

const INVALID: u32 = u32::MAX;

/// A type-safe point index (row of the `points` dataset).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PointId(u32);

/// A type-safe cable index (row of the `elements` dataset).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CableId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}", self.index())
                } else {
                    f.write_str("-1")
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(PointId, "P");
impl_index_type!(CableId, "C");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cable_id() {
        let c = CableId::new(42);
        assert_eq!(c.index(), 42);
        assert!(c.is_valid());

        let invalid = CableId::invalid();
        assert!(!invalid.is_valid());
        assert_eq!(CableId::default(), invalid);
    }

    #[test]
    fn test_display_sentinel() {
        assert_eq!(CableId::new(7).to_string(), "7");
        assert_eq!(CableId::invalid().to_string(), "-1");
    }

    #[test]
    fn test_debug_format() {
        let p = PointId::new(3);
        assert_eq!(format!("{:?}", p), "P(3)");
        assert_eq!(format!("{:?}", CableId::invalid()), "C(INVALID)");
    }

    #[test]
    fn test_invalid_sorts_last() {
        assert!(CableId::new(0) < CableId::invalid());
    }
}
