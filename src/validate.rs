//! Validation gate for (problem, parameters) pairs
//!
//! [`check_parameters`] reports whether a training set and a solver
//! configuration can be trained together. Training and cross-validation
//! re-derive the same checks internally, so a pair this gate rejects is
//! never handed to the solver.

use crate::error::{LinealError, Result};
use crate::parameter::Parameters;
use crate::problem::Problem;

/// Check that a (problem, parameters) pair satisfies the solver
/// preconditions.
///
/// Returns `Ok(())` when the pair is valid; otherwise an error whose
/// message names the single violated precondition.
pub fn check_parameters(problem: &Problem, params: &Parameters) -> Result<()> {
    if !(params.epsilon > 0.0) {
        return Err(LinealError::InvalidParameter {
            name: "epsilon".to_string(),
            value: params.epsilon.to_string(),
            reason: "stopping tolerance must be positive".to_string(),
        });
    }

    if !(params.cost > 0.0) {
        return Err(LinealError::InvalidParameter {
            name: "cost".to_string(),
            value: params.cost.to_string(),
            reason: "constraint violation cost must be positive".to_string(),
        });
    }

    if problem.is_empty() {
        return Err(LinealError::ValidationError(
            "training set is empty".to_string(),
        ));
    }

    if !params.solver.is_regression() {
        for cw in &params.class_weights {
            let seen = problem
                .labels()
                .iter()
                .any(|&label| label as i32 == cw.label);
            if !seen {
                return Err(LinealError::ValidationError(format!(
                    "class weight for label {} matches no class in the training set",
                    cw.label
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::Parameters;
    use crate::sparse::SparseVector;

    fn two_class_problem() -> Problem {
        let mut problem = Problem::new();
        problem.add_instance(SparseVector::from_dense(&[1.0, 0.0]), 1.0);
        problem.add_instance(SparseVector::from_dense(&[0.0, 1.0]), -1.0);
        problem
    }

    #[test]
    fn test_valid_pair() {
        let problem = two_class_problem();
        assert!(check_parameters(&problem, &Parameters::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_epsilon() {
        let problem = two_class_problem();
        let params = Parameters::new().with_epsilon(0.0);
        let err = check_parameters(&problem, &params).unwrap_err();
        assert!(err.to_string().contains("epsilon"));
    }

    #[test]
    fn test_rejects_non_positive_cost() {
        let problem = two_class_problem();
        let params = Parameters::new().with_cost(-1.0);
        let err = check_parameters(&problem, &params).unwrap_err();
        assert!(err.to_string().contains("cost"));
    }

    #[test]
    fn test_rejects_empty_problem() {
        let problem = Problem::new();
        let err = check_parameters(&problem, &Parameters::default()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_rejects_dangling_class_weight() {
        let problem = two_class_problem();
        let params = Parameters::new().with_class_weight(42, 2.0);
        let err = check_parameters(&problem, &params).unwrap_err();
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_nan_epsilon_rejected() {
        let problem = two_class_problem();
        let params = Parameters::new().with_epsilon(f64::NAN);
        assert!(check_parameters(&problem, &params).is_err());
    }
}
