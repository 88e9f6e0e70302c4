//! Solver configuration
//!
//! [`Parameters`] describes which solver to run and how: solver kind,
//! stopping tolerance, constraint-violation cost, optional per-class
//! cost overrides, and a thread-count hint forwarded to the solver.

use serde::{Deserialize, Serialize};

/// The kind of linear solver to train with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverKind {
    /// L2-regularized logistic regression (primal)
    L2rLr,
    /// L2-regularized L2-loss support vector classification (dual)
    L2rL2lossSvcDual,
    /// L2-regularized L2-loss support vector classification (primal)
    L2rL2lossSvc,
    /// L2-regularized L1-loss support vector classification (dual)
    L2rL1lossSvcDual,
    /// Multi-class support vector classification (Crammer and Singer)
    McsvmCs,
    /// L1-regularized L2-loss support vector classification
    L1rL2lossSvc,
    /// L1-regularized logistic regression
    L1rLr,
    /// L2-regularized logistic regression (dual)
    L2rLrDual,
    /// L2-regularized L2-loss support vector regression (primal)
    L2rL2lossSvr,
    /// L2-regularized L2-loss support vector regression (dual)
    L2rL2lossSvrDual,
    /// L2-regularized L1-loss support vector regression (dual)
    L2rL1lossSvrDual,
}

impl SolverKind {
    /// The conventional default stopping tolerance for this solver kind.
    pub fn default_epsilon(self) -> f64 {
        match self {
            SolverKind::L2rLr | SolverKind::L2rL2lossSvc => 0.01,
            SolverKind::L1rL2lossSvc | SolverKind::L1rLr => 0.01,
            SolverKind::L2rL2lossSvr => 0.001,
            SolverKind::L2rL2lossSvcDual
            | SolverKind::L2rL1lossSvcDual
            | SolverKind::McsvmCs
            | SolverKind::L2rLrDual
            | SolverKind::L2rL2lossSvrDual
            | SolverKind::L2rL1lossSvrDual => 0.1,
        }
    }

    /// Whether this kind produces probability estimates. Probability
    /// output is defined for the logistic regression solvers only.
    pub fn supports_probabilities(self) -> bool {
        matches!(
            self,
            SolverKind::L2rLr | SolverKind::L1rLr | SolverKind::L2rLrDual
        )
    }

    /// Whether this kind trains a regression model rather than a
    /// classifier.
    pub fn is_regression(self) -> bool {
        matches!(
            self,
            SolverKind::L2rL2lossSvr | SolverKind::L2rL2lossSvrDual | SolverKind::L2rL1lossSvrDual
        )
    }
}

impl Default for SolverKind {
    fn default() -> Self {
        SolverKind::L2rL2lossSvcDual
    }
}

/// Scales the constraint-violation cost of one class label. Classes
/// without an override use a multiplier of 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassWeight {
    pub label: i32,
    pub weight: f64,
}

/// Parameters for training a linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// The type of solver.
    pub solver: SolverKind,
    /// Stopping tolerance.
    pub epsilon: f64,
    /// The cost of constraint violation.
    pub cost: f64,
    /// The relative cost multiplier for each class.
    pub class_weights: Vec<ClassWeight>,
    /// Resolved thread count for solver-internal parallelism.
    n_threads: usize,
}

impl Parameters {
    /// Zero-configuration constructor: defaults to an L2-regularized
    /// L2-loss support vector classifier (dual) with cost 1, no class
    /// weight overrides, and all processing units.
    pub fn new() -> Self {
        let solver = SolverKind::default();
        Self {
            solver,
            epsilon: solver.default_epsilon(),
            cost: 1.0,
            class_weights: Vec::new(),
            n_threads: rayon::current_num_threads(),
        }
    }

    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self.epsilon = solver.default_epsilon();
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_class_weight(mut self, label: i32, weight: f64) -> Self {
        self.class_weights.push(ClassWeight { label, weight });
        self
    }

    pub fn with_threads(mut self, n: isize) -> Self {
        self.set_thread_hint(n);
        self
    }

    /// Set the thread-count hint. Zero or a negative value resolves to
    /// all available processing units at configuration time.
    pub fn set_thread_hint(&mut self, n: isize) {
        self.n_threads = if n <= 0 {
            rayon::current_num_threads()
        } else {
            n as usize
        };
    }

    /// The effective thread count the solver will be asked to use.
    pub fn resolved_threads(&self) -> usize {
        self.n_threads
    }

    /// The cost multiplier for a class label, 1.0 when unlisted.
    pub fn weight_for(&self, label: i32) -> f64 {
        self.class_weights
            .iter()
            .find(|cw| cw.label == label)
            .map_or(1.0, |cw| cw.weight)
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = Parameters::default();
        assert_eq!(params.solver, SolverKind::L2rL2lossSvcDual);
        assert_eq!(params.epsilon, 0.1);
        assert_eq!(params.cost, 1.0);
        assert!(params.class_weights.is_empty());
        assert!(params.resolved_threads() >= 1);
    }

    #[test]
    fn test_solver_switch_updates_epsilon() {
        let params = Parameters::new().with_solver(SolverKind::L2rLr);
        assert_eq!(params.epsilon, 0.01);

        let params = params.with_solver(SolverKind::L2rL2lossSvr);
        assert_eq!(params.epsilon, 0.001);
    }

    #[test]
    fn test_thread_hint_resolution() {
        let mut params = Parameters::new();

        params.set_thread_hint(4);
        assert_eq!(params.resolved_threads(), 4);

        params.set_thread_hint(0);
        assert!(params.resolved_threads() >= 1);

        params.set_thread_hint(-2);
        assert!(params.resolved_threads() >= 1);
    }

    #[test]
    fn test_class_weight_lookup() {
        let params = Parameters::new()
            .with_class_weight(1, 2.0)
            .with_class_weight(-1, 0.5);

        assert_eq!(params.weight_for(1), 2.0);
        assert_eq!(params.weight_for(-1), 0.5);
        assert_eq!(params.weight_for(7), 1.0);
    }

    #[test]
    fn test_probability_capability() {
        assert!(SolverKind::L2rLr.supports_probabilities());
        assert!(SolverKind::L1rLr.supports_probabilities());
        assert!(!SolverKind::L2rL2lossSvcDual.supports_probabilities());
        assert!(!SolverKind::L2rL2lossSvr.supports_probabilities());
    }

    #[test]
    fn test_regression_kinds() {
        assert!(SolverKind::L2rL2lossSvr.is_regression());
        assert!(SolverKind::L2rL1lossSvrDual.is_regression());
        assert!(!SolverKind::L2rLr.is_regression());
    }
}
