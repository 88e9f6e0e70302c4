//! Cross-validation
//!
//! Separates a problem into folds; each fold is evaluated in turn with
//! a model trained on the remaining folds. Only the held-out
//! predictions survive the call; no model is retained.

use crate::error::{LinealError, Result};
use crate::parameter::Parameters;
use crate::problem::Problem;
use crate::solver::{DenseSolver, Solver};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Cross-validate with entropy-seeded fold assignment.
///
/// Returns one predicted label per training instance, index-aligned
/// with the problem: slot `i` holds the prediction for the instance
/// originally at position `i`.
pub fn cross_validate(problem: &Problem, params: &Parameters, n_folds: usize) -> Result<Vec<f64>> {
    run(problem, params, n_folds, ChaCha8Rng::from_entropy())
}

/// Cross-validate with a fixed seed for reproducible fold assignment.
pub fn cross_validate_seeded(
    problem: &Problem,
    params: &Parameters,
    n_folds: usize,
    seed: u64,
) -> Result<Vec<f64>> {
    run(problem, params, n_folds, ChaCha8Rng::seed_from_u64(seed))
}

fn run(
    problem: &Problem,
    params: &Parameters,
    n_folds: usize,
    mut rng: ChaCha8Rng,
) -> Result<Vec<f64>> {
    let solver = DenseSolver;
    solver.check(problem, params)?;

    let n = problem.len();
    if n_folds < 2 {
        return Err(LinealError::ValidationError(
            "cross-validation requires at least 2 folds".to_string(),
        ));
    }
    if n_folds > n {
        return Err(LinealError::ValidationError(format!(
            "cannot split {} instances into {} folds",
            n, n_folds
        )));
    }

    debug!(instances = n, folds = n_folds, "cross-validating");

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let mut target = vec![0.0; n];

    for fold in 0..n_folds {
        let start = fold * n / n_folds;
        let end = (fold + 1) * n / n_folds;
        let held_out = &indices[start..end];

        let train_indices: Vec<usize> = indices[..start]
            .iter()
            .chain(indices[end..].iter())
            .copied()
            .collect();

        let model = solver.train(&problem.subset(&train_indices), params)?;

        for &i in held_out {
            let (features, _) = problem
                .instance(i)
                .expect("fold indices lie within the problem");
            target[i] = model.predict(features);
        }
    }

    Ok(target)
}
