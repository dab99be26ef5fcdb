//! Named columns of numeric tuples.
//!
//! A conversion run reads the input mesh into a [`DatasetStore`]: one
//! [`Dataset`] per array, addressed by name and row. Every consumer (the fiber
//! network, the bulk writers) receives the store by reference; its lifetime is
//! one conversion.
//!
//! Rows may have different lengths (cells of mixed type share the `elements`
//! dataset). Each dataset has a [`ScalarType`]; values are coerced to that type
//! when written and read back as `f64`.
//!
//! ```
//! use carpmesh::dataset::{Dataset, DatasetStore, ScalarType};
//!
//! let mut points = Dataset::new("points", ScalarType::F64);
//! points.append(&[0.0, 0.0, 0.0]);
//! points.append(&[1.0, 0.0, 0.0]);
//!
//! let mut store = DatasetStore::new();
//! store.insert(points);
//!
//! let points = store.get("points").unwrap();
//! assert_eq!(points.count(), 2);
//! assert_eq!(points.get(1).unwrap(), &[1.0, 0.0, 0.0]);
//! ```

mod column;
mod scalar;
mod store;

pub use column::Dataset;
pub use scalar::ScalarType;
pub use store::DatasetStore;

/// Point coordinates, three components per row.
pub const POINTS: &str = "points";

/// Point indices of each cell.
pub const ELEMENTS: &str = "elements";

/// VTK cell type of each cell.
pub const PRIMITIVES: &str = "primitives";

/// Optional per-cell region tag used by the `.elem` writer.
pub const REGIONS: &str = "regions";
