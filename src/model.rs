//! Trained models
//!
//! A [`Model`] is produced by a solver from a (problem, parameters)
//! pair and used to predict the class (or regression target) of seen or
//! unseen instances. Models can be saved to and loaded from disk to
//! avoid the potentially costly training process.

use crate::error::{LinealError, Result};
use crate::parameter::{Parameters, SolverKind};
use crate::problem::Problem;
use crate::solver::{DenseSolver, Solver};
use crate::sparse::SparseVector;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A trained linear model. Immutable after creation; owns no reference
/// back to the problem that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    solver: SolverKind,
    /// Number of input features, excluding the synthetic bias feature.
    n_features: usize,
    /// Bias value captured from the problem at training time; negative
    /// means no bias feature.
    bias: f64,
    /// Class labels in solver order. Empty for regression models.
    labels: Vec<i32>,
    /// One weight vector for two-class models, one per class otherwise.
    /// Each row holds `n_features` weights plus one bias weight when
    /// bias is enabled.
    weights: Array2<f64>,
}

impl Model {
    /// Train a model with the bundled solver. The validation gate runs
    /// first; a pair it rejects is never trained.
    pub fn train(problem: &Problem, params: &Parameters) -> Result<Model> {
        DenseSolver.train(problem, params)
    }

    pub(crate) fn from_parts(
        solver: SolverKind,
        n_features: usize,
        bias: f64,
        labels: Vec<i32>,
        weights: Array2<f64>,
    ) -> Self {
        Self {
            solver,
            n_features,
            bias,
            labels,
            weights,
        }
    }

    /// The solver kind this model was trained with.
    pub fn solver(&self) -> SolverKind {
        self.solver
    }

    /// Number of classes. Zero for regression models.
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// Class labels in solver order. The order is preserved verbatim
    /// across save and load.
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Decision value for one weight row: sparse dot product plus the
    /// bias contribution. Features unseen during training are ignored.
    fn decision(&self, row: usize, features: &SparseVector) -> f64 {
        let weights = self.weights.row(row);
        let weights = weights.as_slice().expect("weight row is contiguous");
        let mut dec = features.dot(&weights[..self.n_features.min(weights.len())]);
        if self.bias >= 0.0 {
            dec += weights[self.n_features] * self.bias;
        }
        dec
    }

    /// Predict the label of an instance, or the target value for a
    /// regression model.
    pub fn predict(&self, features: &SparseVector) -> f64 {
        self.predict_values(features).0
    }

    /// Predict the label of an instance together with the per-class
    /// decision values, ordered like [`Model::labels`]. Regression
    /// models yield a single decision value that is also the prediction.
    pub fn predict_values(&self, features: &SparseVector) -> (f64, Vec<f64>) {
        if self.labels.is_empty() {
            let dec = self.decision(0, features);
            return (dec, vec![dec]);
        }

        if self.labels.len() == 1 {
            return (self.labels[0] as f64, vec![0.0]);
        }

        if self.labels.len() == 2 {
            // One oriented weight vector; a positive decision value
            // picks the first label.
            let dec = self.decision(0, features);
            let label = if dec > 0.0 { self.labels[0] } else { self.labels[1] };
            return (label as f64, vec![dec, -dec]);
        }

        let values: Vec<f64> = (0..self.labels.len())
            .map(|i| self.decision(i, features))
            .collect();
        let best = values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        (self.labels[best] as f64, values)
    }

    /// Predict the label of an instance together with per-class
    /// probability estimates, ordered like [`Model::labels`].
    ///
    /// Probability estimates are defined for the logistic regression
    /// solvers only; other kinds yield a validation error.
    pub fn predict_probability(&self, features: &SparseVector) -> Result<(f64, Vec<f64>)> {
        if !self.solver.supports_probabilities() || self.labels.is_empty() {
            return Err(LinealError::ValidationError(format!(
                "solver kind {:?} does not produce probability estimates",
                self.solver
            )));
        }

        let sigmoid = |v: f64| 1.0 / (1.0 + (-v).exp());

        if self.labels.len() == 2 {
            let p = sigmoid(self.decision(0, features));
            let label = if p > 0.5 { self.labels[0] } else { self.labels[1] };
            return Ok((label as f64, vec![p, 1.0 - p]));
        }

        // One-vs-rest estimates, normalized to sum to one.
        let mut probs: Vec<f64> = (0..self.labels.len())
            .map(|i| sigmoid(self.decision(i, features)))
            .collect();
        let total: f64 = probs.iter().sum();
        if total > 0.0 {
            for p in &mut probs {
                *p /= total;
            }
        }
        let best = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        Ok((self.labels[best] as f64, probs))
    }

    /// The feature weights of a two-class model, excluding the bias
    /// weight.
    pub fn weights(&self) -> Result<Vec<f64>> {
        if self.labels.len() != 2 {
            return Err(LinealError::InvalidInput(format!(
                "not exactly two classes: {}",
                self.labels.len()
            )));
        }
        let row = self.weights.row(0);
        Ok(row.iter().take(self.n_features).copied().collect())
    }

    /// The trained weight of the synthetic bias feature of a two-class
    /// model.
    pub fn bias_weight(&self) -> Result<f64> {
        if self.labels.len() != 2 {
            return Err(LinealError::InvalidInput(format!(
                "not exactly two classes: {}",
                self.labels.len()
            )));
        }
        if self.bias < 0.0 {
            return Err(LinealError::InvalidInput(
                "model was trained without a bias feature".to_string(),
            ));
        }
        Ok(self.weights[[0, self.n_features]])
    }

    /// Save the model to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously saved model. A missing or malformed file
    /// yields an error, never a partially constructed model.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Model> {
        let json = std::fs::read_to_string(path)?;
        let model: Model = serde_json::from_str(&json)?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use crate::sparse::SparseVector;

    fn simple_problem() -> Problem {
        // Two-class word corpus over five boolean features.
        let mut problem = Problem::new();
        problem.add_instance(SparseVector::from_dense(&[1.0, 1.0, 1.0, 0.0, 0.0]), 0.0);
        problem.add_instance(SparseVector::from_dense(&[0.0, 1.0, 0.0, 0.0, 0.0]), 0.0);
        problem.add_instance(SparseVector::from_dense(&[1.0, 0.0, 1.0, 1.0, 1.0]), 1.0);
        problem.add_instance(SparseVector::from_dense(&[0.0, 0.0, 0.0, 1.0, 1.0]), 1.0);
        problem
    }

    #[test]
    fn test_predict() {
        let problem = simple_problem();
        let model = Model::train(&problem, &Parameters::default()).unwrap();

        let check1 = model.predict(&SparseVector::from_dense(&[1.0, 1.0, 0.0, 0.0, 0.0]));
        assert_eq!(check1, 0.0);

        let check2 = model.predict(&SparseVector::from_dense(&[0.0, 0.0, 0.0, 1.0, 1.0]));
        assert_eq!(check2, 1.0);
    }

    #[test]
    fn test_predict_probability() {
        let problem = simple_problem();
        let params = Parameters::new().with_solver(SolverKind::L2rLr);
        let model = Model::train(&problem, &params).unwrap();

        let (check1, probs1) = model
            .predict_probability(&SparseVector::from_dense(&[1.0, 1.0, 0.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(check1, 0.0);
        assert!(probs1[0] > probs1[1], "p(l0) <= p(l1), want p(l0) > p(l1)");

        let (check2, probs2) = model
            .predict_probability(&SparseVector::from_dense(&[0.0, 0.0, 0.0, 1.0, 1.0]))
            .unwrap();
        assert_eq!(check2, 1.0);
        assert!(probs2[1] > probs2[0], "p(l1) <= p(l0), want p(l1) > p(l0)");
    }

    #[test]
    fn test_probability_unsupported_kind() {
        let problem = simple_problem();
        let model = Model::train(&problem, &Parameters::default()).unwrap();

        let result = model.predict_probability(&SparseVector::from_dense(&[1.0, 0.0, 0.0, 0.0, 0.0]));
        assert!(result.is_err());
    }

    #[test]
    fn test_labels_first_occurrence_order() {
        let problem = simple_problem();
        let model = Model::train(&problem, &Parameters::default()).unwrap();
        assert_eq!(model.labels(), &[0, 1]);
        assert_eq!(model.num_classes(), 2);
    }

    #[test]
    fn test_two_class_weight_accessors() {
        let mut problem = simple_problem();
        problem.set_bias(1.0);
        let model = Model::train(&problem, &Parameters::default()).unwrap();

        let weights = model.weights().unwrap();
        assert_eq!(weights.len(), 5);
        model.bias_weight().unwrap();
    }

    #[test]
    fn test_bias_weight_requires_bias() {
        let problem = simple_problem();
        let model = Model::train(&problem, &Parameters::default()).unwrap();
        assert!(model.bias_weight().is_err());
    }

    #[test]
    fn test_validation_precedes_training() {
        let problem = simple_problem();
        let params = Parameters::new().with_class_weight(42, 2.0);

        assert!(crate::validate::check_parameters(&problem, &params).is_err());
        assert!(Model::train(&problem, &params).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Model::load("/nonexistent/path/model.json");
        assert!(matches!(result, Err(LinealError::IoError(_))));
    }
}
