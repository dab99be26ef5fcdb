//! A single named dataset.

use crate::error::{ConvertError, Result};

use super::ScalarType;

/// A named, typed column of variable-length numeric tuples.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    scalar: ScalarType,
    rows: Vec<Vec<f64>>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new<S: Into<String>>(name: S, scalar: ScalarType) -> Self {
        Self::with_capacity(name, scalar, 0)
    }

    /// Create an empty dataset with room for `rows` tuples.
    pub fn with_capacity<S: Into<String>>(name: S, scalar: ScalarType, rows: usize) -> Self {
        Self {
            name: name.into(),
            scalar,
            rows: Vec::with_capacity(rows),
        }
    }

    /// The dataset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element type.
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar
    }

    /// Append a tuple and return its row index.
    pub fn append(&mut self, tuple: &[f64]) -> usize {
        let scalar = self.scalar;
        self.rows.push(tuple.iter().map(|&v| scalar.coerce(v)).collect());
        self.rows.len() - 1
    }

    /// Get the tuple at `row`.
    pub fn get(&self, row: usize) -> Result<&[f64]> {
        self.rows
            .get(row)
            .map(Vec::as_slice)
            .ok_or_else(|| self.out_of_range(row))
    }

    /// Overwrite the tuple at `row`. The new tuple may have a different length.
    pub fn replace(&mut self, row: usize, tuple: &[f64]) -> Result<()> {
        let scalar = self.scalar;
        if row >= self.rows.len() {
            return Err(self.out_of_range(row));
        }
        let slot = &mut self.rows[row];
        slot.clear();
        slot.extend(tuple.iter().map(|&v| scalar.coerce(v)));
        Ok(())
    }

    /// Number of rows.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of components in the tuple at `row`.
    pub fn dimension(&self, row: usize) -> Result<usize> {
        self.get(row).map(<[f64]>::len)
    }

    /// Iterate over all tuples in row order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    fn out_of_range(&self, row: usize) -> ConvertError {
        ConvertError::RowOutOfRange {
            dataset: self.name.clone(),
            row,
            count: self.rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_get() {
        let mut ds = Dataset::new("elements", ScalarType::U32);
        assert!(ds.is_empty());

        assert_eq!(ds.append(&[0.0, 1.0]), 0);
        assert_eq!(ds.append(&[1.0, 2.0, 3.0]), 1);

        assert_eq!(ds.count(), 2);
        assert_eq!(ds.get(1).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(ds.dimension(0).unwrap(), 2);
        assert_eq!(ds.dimension(1).unwrap(), 3);
    }

    #[test]
    fn test_append_coerces() {
        let mut ds = Dataset::new("primitives", ScalarType::U16);
        ds.append(&[3.9]);
        assert_eq!(ds.get(0).unwrap(), &[3.0]);
    }

    #[test]
    fn test_replace_changes_length() {
        let mut ds = Dataset::new("elements", ScalarType::U32);
        ds.append(&[0.0, 1.0, 2.0]);
        ds.replace(0, &[5.0, 6.0]).unwrap();
        assert_eq!(ds.get(0).unwrap(), &[5.0, 6.0]);
        assert_eq!(ds.count(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let mut ds = Dataset::new("points", ScalarType::F64);
        ds.append(&[0.0, 0.0, 0.0]);

        assert!(matches!(
            ds.get(1),
            Err(ConvertError::RowOutOfRange { row: 1, count: 1, .. })
        ));
        assert!(ds.replace(4, &[1.0]).is_err());
        assert!(ds.dimension(2).is_err());
    }

    #[test]
    fn test_rows_iter() {
        let mut ds = Dataset::new("regions", ScalarType::I32);
        ds.append(&[1.0]);
        ds.append(&[2.0]);
        let firsts: Vec<f64> = ds.rows().map(|r| r[0]).collect();
        assert_eq!(firsts, vec![1.0, 2.0]);
    }
}
