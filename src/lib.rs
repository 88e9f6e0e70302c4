//! lineal - sparse linear-classifier training core
//!
//! This crate builds sparse training problems, configures linear
//! solvers, trains and applies linear models, and manages model
//! lifecycle. Trained models can be saved to and loaded from disk, to
//! avoid the (potentially) costly training process.
//!
//! A model is trained from a problem. A problem consists of training
//! instances, where each instance has a class label and a sparse
//! feature vector. The training procedure finds one or more functions
//! that separate the instances of the classes; the resulting model can
//! then predict the class of unseen instances.
//!
//! ```
//! use lineal::prelude::*;
//!
//! let mut problem = Problem::new();
//! problem.add_instance(SparseVector::from_dense(&[1.0, 1.0, 1.0, 0.0, 0.0]), 0.0);
//! problem.add_instance(SparseVector::from_dense(&[1.0, 0.0, 1.0, 1.0, 1.0]), 1.0);
//! problem.add_instance(SparseVector::from_dense(&[0.0, 1.0, 1.0, 0.0, 0.0]), 0.0);
//! problem.add_instance(SparseVector::from_dense(&[0.0, 0.0, 1.0, 1.0, 0.0]), 1.0);
//!
//! let params = Parameters::default();
//! let model = Model::train(&problem, &params).unwrap();
//!
//! let label = model.predict(&SparseVector::from_dense(&[1.0, 1.0, 0.0, 0.0, 0.0]));
//! assert_eq!(label, 0.0);
//! ```
//!
//! # Modules
//!
//! - [`sparse`] - Sparse feature vectors and the fixed-capacity builder
//! - [`problem`] - Growable labeled training sets
//! - [`parameter`] - Solver kinds and training configuration
//! - [`validate`] - The validation gate for (problem, parameters) pairs
//! - [`solver`] - The solver contract and the bundled dense solver
//! - [`model`] - Trained models: prediction and persistence
//! - [`cross_validation`] - K-fold cross-validation over a problem

// Core error handling
pub mod error;

// Data model
pub mod parameter;
pub mod problem;
pub mod sparse;

// Training and prediction
pub mod cross_validation;
pub mod model;
pub mod solver;
pub mod validate;

pub use error::{LinealError, Result};

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::cross_validation::{cross_validate, cross_validate_seeded};
    pub use crate::error::{LinealError, Result};
    pub use crate::model::Model;
    pub use crate::parameter::{ClassWeight, Parameters, SolverKind};
    pub use crate::problem::{Problem, TrainingInstance, NO_BIAS};
    pub use crate::solver::{DenseSolver, Solver};
    pub use crate::sparse::{FeatureValue, SparseVector, SparseVectorBuilder};
    pub use crate::validate::check_parameters;
}
