//! The per-run collection of datasets.

use std::collections::HashMap;

use crate::error::{ConvertError, Result};

use super::Dataset;

/// Datasets of one conversion run, addressed by name.
///
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    datasets: Vec<Dataset>,
    by_name: HashMap<String, usize>,
}

impl DatasetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset.
    ///
    /// If a dataset with the same name already exists, the existing one is
    /// kept, a warning is logged, and `false` is returned.
    pub fn insert(&mut self, dataset: Dataset) -> bool {
        if self.by_name.contains_key(dataset.name()) {
            log::warn!(
                "dataset '{}' already exists; keeping the first one",
                dataset.name()
            );
            return false;
        }
        self.by_name
            .insert(dataset.name().to_string(), self.datasets.len());
        self.datasets.push(dataset);
        true
    }

    /// Look up a dataset by name.
    pub fn get(&self, name: &str) -> Result<&Dataset> {
        self.try_get(name)
            .ok_or_else(|| ConvertError::MissingDataset(name.to_string()))
    }

    /// Look up a dataset that may legitimately be absent.
    pub fn try_get(&self, name: &str) -> Option<&Dataset> {
        self.by_name.get(name).map(|&slot| &self.datasets[slot])
    }

    /// Whether a dataset with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether the store holds no datasets.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Iterate over datasets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Dataset> + '_ {
        self.datasets.iter()
    }

    /// Dataset names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.datasets.iter().map(Dataset::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ScalarType;

    #[test]
    fn test_insert_and_lookup() {
        let mut store = DatasetStore::new();
        assert!(store.is_empty());

        assert!(store.insert(Dataset::new("points", ScalarType::F64)));
        assert!(store.insert(Dataset::new("elements", ScalarType::U32)));

        assert_eq!(store.len(), 2);
        assert!(store.contains("points"));
        assert_eq!(store.get("elements").unwrap().scalar_type(), ScalarType::U32);
        assert!(store.try_get("regions").is_none());
        assert!(matches!(
            store.get("regions"),
            Err(ConvertError::MissingDataset(name)) if name == "regions"
        ));
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut store = DatasetStore::new();
        let mut first = Dataset::new("pressure", ScalarType::F64);
        first.append(&[1.0]);
        store.insert(first);

        assert!(!store.insert(Dataset::new("pressure", ScalarType::F32)));
        let kept = store.get("pressure").unwrap();
        assert_eq!(kept.scalar_type(), ScalarType::F64);
        assert_eq!(kept.count(), 1);
    }

    #[test]
    fn test_names_in_insertion_order() {
        let mut store = DatasetStore::new();
        for name in ["points", "elements", "primitives", "regions"] {
            store.insert(Dataset::new(name, ScalarType::F64));
        }
        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, vec!["points", "elements", "primitives", "regions"]);
    }
}
