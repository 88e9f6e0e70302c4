//! Training sets
//!
//! A [`Problem`] is a growable collection of labeled sparse vectors
//! submitted for training. It tracks the highest feature index seen and
//! an optional bias term injected as a synthetic feature at training
//! time.

use crate::sparse::SparseVector;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Bias sentinel: a negative bias disables the synthetic bias feature.
pub const NO_BIAS: f64 = -1.0;

/// A training instance: a class label (or regression target) and its
/// feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingInstance {
    pub label: f64,
    pub features: SparseVector,
}

impl TrainingInstance {
    pub fn new(label: f64, features: SparseVector) -> Self {
        Self { label, features }
    }
}

/// A set of training instances and corresponding labels.
///
/// Instances are appended one at a time; the problem owns every vector
/// handed to it. `max_feature_index` grows monotonically as instances
/// are added and is never recomputed downward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Problem {
    vectors: Vec<SparseVector>,
    labels: Vec<f64>,
    max_feature_index: i32,
    bias: f64,
}

impl Problem {
    /// Create an empty problem with bias disabled.
    pub fn new() -> Self {
        Self {
            vectors: Vec::new(),
            labels: Vec::new(),
            max_feature_index: 0,
            bias: NO_BIAS,
        }
    }

    /// Append a training instance. The problem takes ownership of the
    /// feature vector.
    ///
    /// The vector is scanned once to update the running maximum feature
    /// index, so constructing a problem costs O(total feature entries).
    pub fn add_instance(&mut self, features: SparseVector, label: f64) {
        self.max_feature_index = self.max_feature_index.max(features.max_index());
        self.vectors.push(features);
        self.labels.push(label);
    }

    /// Append a training instance.
    pub fn add(&mut self, instance: TrainingInstance) {
        self.add_instance(instance.features, instance.label);
    }

    /// Number of training instances.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The highest feature index seen across all appended instances.
    pub fn max_feature_index(&self) -> i32 {
        self.max_feature_index
    }

    /// The bias term. [`NO_BIAS`] (any negative value) means disabled.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Set the bias term. Setting a non-negative value amounts to adding
    /// an extra feature with the bias as its value to each instance.
    ///
    /// The bias is injected at train/predict time, not at append time:
    /// changing it here affects every subsequent solver invocation using
    /// this problem, including instances appended earlier.
    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub fn has_bias(&self) -> bool {
        self.bias >= 0.0
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn instance(&self, i: usize) -> Option<(&SparseVector, f64)> {
        Some((self.vectors.get(i)?, *self.labels.get(i)?))
    }

    /// Iterate over `(label, features)` in append order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &SparseVector)> {
        self.labels.iter().copied().zip(self.vectors.iter())
    }

    /// Materialize the design matrix and target vector for the solver
    /// boundary. When bias is enabled, a synthetic column holding the
    /// bias value is appended at `max_feature_index + 1`.
    pub(crate) fn to_dense(&self) -> (Array2<f64>, Array1<f64>) {
        let n_features = self.max_feature_index as usize;
        let n_cols = n_features + usize::from(self.has_bias());
        let mut x = Array2::zeros((self.len(), n_cols));

        for (i, vector) in self.vectors.iter().enumerate() {
            let mut row = x.row_mut(i);
            vector.fill_dense(row.as_slice_mut().expect("row is contiguous"));
            if self.has_bias() {
                row[n_cols - 1] = self.bias;
            }
        }

        let y = Array1::from_vec(self.labels.clone());
        (x, y)
    }

    /// Build a sub-problem from the given instance indices, preserving
    /// the bias and the full feature dimensionality.
    pub(crate) fn subset(&self, indices: &[usize]) -> Problem {
        let mut sub = Problem::new();
        sub.bias = self.bias;
        sub.max_feature_index = self.max_feature_index;
        for &i in indices {
            sub.vectors.push(self.vectors[i].clone());
            sub.labels.push(self.labels[i]);
        }
        sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::SparseVector;

    fn vector(pairs: &[(i32, f64)]) -> SparseVector {
        SparseVector::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_new_problem() {
        let problem = Problem::new();
        assert_eq!(problem.len(), 0);
        assert_eq!(problem.max_feature_index(), 0);
        assert_eq!(problem.bias(), NO_BIAS);
        assert!(!problem.has_bias());
    }

    #[test]
    fn test_max_feature_index_monotonic() {
        let mut problem = Problem::new();

        problem.add_instance(vector(&[(1, 1.0), (7, 2.0)]), 1.0);
        assert_eq!(problem.max_feature_index(), 7);

        problem.add_instance(vector(&[(2, 1.0), (3, 2.0)]), -1.0);
        assert_eq!(problem.max_feature_index(), 7);

        problem.add_instance(vector(&[(9, 0.5)]), 1.0);
        assert_eq!(problem.max_feature_index(), 9);

        problem.add_instance(SparseVector::new(), 1.0);
        assert_eq!(problem.max_feature_index(), 9);
    }

    #[test]
    fn test_labels_align_with_vectors() {
        let mut problem = Problem::new();
        problem.add_instance(vector(&[(1, 1.0)]), 1.0);
        problem.add_instance(vector(&[(2, 1.0)]), -1.0);

        assert_eq!(problem.len(), 2);
        assert_eq!(problem.labels(), &[1.0, -1.0]);

        let (features, label) = problem.instance(1).unwrap();
        assert_eq!(label, -1.0);
        assert_eq!(features.max_index(), 2);
    }

    #[test]
    fn test_iterate() {
        let mut problem = Problem::new();
        problem.add(TrainingInstance::new(0.0, vector(&[(1, 1.0)])));
        problem.add(TrainingInstance::new(1.0, vector(&[(2, 1.0)])));

        let collected: Vec<f64> = problem.iter().map(|(label, _)| label).collect();
        assert_eq!(collected, vec![0.0, 1.0]);
    }

    #[test]
    fn test_bias_getter_is_idempotent() {
        let mut problem = Problem::new();
        problem.add_instance(vector(&[(1, 1.0)]), 1.0);

        for _ in 0..3 {
            assert_eq!(problem.bias(), NO_BIAS);
        }

        problem.set_bias(1.0);
        assert!(problem.has_bias());
        assert_eq!(problem.bias(), 1.0);
    }

    #[test]
    fn test_to_dense_with_bias() {
        let mut problem = Problem::new();
        problem.add_instance(vector(&[(1, 2.0), (3, 4.0)]), 1.0);
        problem.set_bias(1.0);

        let (x, y) = problem.to_dense();
        assert_eq!(x.shape(), &[1, 4]); // 3 features + bias column
        assert_eq!(x[[0, 0]], 2.0);
        assert_eq!(x[[0, 1]], 0.0);
        assert_eq!(x[[0, 2]], 4.0);
        assert_eq!(x[[0, 3]], 1.0);
        assert_eq!(y[0], 1.0);
    }

    #[test]
    fn test_subset_preserves_bias_and_width() {
        let mut problem = Problem::new();
        problem.add_instance(vector(&[(1, 1.0)]), 0.0);
        problem.add_instance(vector(&[(5, 1.0)]), 1.0);
        problem.set_bias(2.0);

        let sub = problem.subset(&[0]);
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.bias(), 2.0);
        assert_eq!(sub.max_feature_index(), 5);
    }
}
