//! Sparse feature vectors
//!
//! A sparse vector stores only the non-zero features of an instance as
//! `(index, value)` pairs sorted by strictly increasing index. Feature
//! indices start at 1.

use crate::error::{LinealError, Result};
use serde::{Deserialize, Serialize};

/// A single feature and its value. The index uniquely identifies the
/// feature and must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureValue {
    pub index: i32,
    pub value: f64,
}

impl FeatureValue {
    pub fn new(index: i32, value: f64) -> Self {
        Self { index, value }
    }
}

/// A sparse feature vector: non-zero features sorted by strictly
/// increasing index.
///
/// The sequence carries its own length; no sentinel entry is stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<FeatureValue>,
}

impl SparseVector {
    /// Create an empty vector (an instance with no non-zero features).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from `(index, value)` pairs. The pairs are sorted
    /// by index; indices below 1 and duplicate indices are rejected.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i32, f64)>) -> Result<Self> {
        let mut entries: Vec<FeatureValue> = pairs
            .into_iter()
            .map(|(index, value)| FeatureValue { index, value })
            .collect();

        for fv in &entries {
            if fv.index < 1 {
                return Err(LinealError::InvalidInput(format!(
                    "feature index should be at least one: {}:{}",
                    fv.index, fv.value
                )));
            }
        }

        entries.sort_by_key(|fv| fv.index);

        for pair in entries.windows(2) {
            if pair[0].index == pair[1].index {
                return Err(LinealError::InvalidInput(format!(
                    "duplicate feature index: {}",
                    pair[0].index
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Convert a dense feature vector to the sparse representation.
    /// The features are numbered `1..=len`. The following vectors are
    /// equal:
    ///
    /// ```
    /// use lineal::sparse::SparseVector;
    ///
    /// let dense = SparseVector::from_dense(&[0.2, 0.1, 0.3, 0.6]);
    /// let pairs = SparseVector::from_pairs([(1, 0.2), (2, 0.1), (3, 0.3), (4, 0.6)]).unwrap();
    /// assert_eq!(dense, pairs);
    /// ```
    pub fn from_dense(dense: &[f64]) -> Self {
        let entries = dense
            .iter()
            .enumerate()
            .map(|(idx, &value)| FeatureValue {
                index: idx as i32 + 1,
                value,
            })
            .collect();
        Self { entries }
    }

    /// The highest feature index, or 0 for an empty vector.
    pub fn max_index(&self) -> i32 {
        self.entries.last().map_or(0, |fv| fv.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureValue> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[FeatureValue] {
        &self.entries
    }

    /// Dot product against a dense weight slice indexed from feature 1.
    /// Features beyond the slice are ignored, mirroring prediction on
    /// instances with features unseen during training.
    pub(crate) fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter(|fv| (fv.index as usize) <= weights.len())
            .map(|fv| weights[fv.index as usize - 1] * fv.value)
            .sum()
    }

    /// Expand into a dense row of `n_features` slots.
    pub(crate) fn fill_dense(&self, row: &mut [f64]) {
        for fv in &self.entries {
            let idx = fv.index as usize - 1;
            if idx < row.len() {
                row[idx] = fv.value;
            }
        }
    }
}

impl<'a> IntoIterator for &'a SparseVector {
    type Item = &'a FeatureValue;
    type IntoIter = std::slice::Iter<'a, FeatureValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fixed-capacity builder for a sparse vector.
///
/// The builder allocates storage for exactly `n` feature slots and lets
/// the caller write each slot at a chosen offset. Ordering and
/// uniqueness are not checked at write time; `finish` sorts the entries
/// and rejects invalid or duplicate indices.
#[derive(Debug, Clone)]
pub struct SparseVectorBuilder {
    slots: Vec<FeatureValue>,
}

impl SparseVectorBuilder {
    /// Allocate a builder with exactly `n` feature slots. The capacity
    /// is fixed; there is no implicit resizing.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            slots: vec![FeatureValue { index: 0, value: 0.0 }; n],
        }
    }

    /// Write a feature at the given slot.
    ///
    /// # Panics
    ///
    /// Panics if `position` is outside the fixed capacity.
    pub fn put(&mut self, position: usize, index: i32, value: f64) {
        self.slots[position] = FeatureValue { index, value };
    }

    /// Read back the feature stored at the given slot.
    ///
    /// # Panics
    ///
    /// Panics if `position` is outside the fixed capacity.
    pub fn get(&self, position: usize) -> FeatureValue {
        self.slots[position]
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Finalize the builder into a vector, sorting by index and
    /// rejecting unfilled slots, indices below 1, and duplicates.
    pub fn finish(self) -> Result<SparseVector> {
        SparseVector::from_pairs(self.slots.into_iter().map(|fv| (fv.index, fv.value)))
    }
}
