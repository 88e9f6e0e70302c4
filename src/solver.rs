//! Solver contract and the bundled dense solver
//!
//! The crate talks to its optimizer through the narrow [`Solver`] trait:
//! validate a (problem, parameters) pair, or train it into a [`Model`].
//! Prediction lives on the model itself, which keeps trained artifacts
//! fully decoupled from the problem that produced them.
//!
//! [`DenseSolver`] is the bundled collaborator. It materializes the
//! sparse problem into a dense design matrix (injecting the bias column
//! when the problem enables one) and runs gradient descent for the
//! classification kinds or a Cholesky normal-equation solve for the
//! regression kinds.

use crate::error::{LinealError, Result};
use crate::model::Model;
use crate::parameter::{Parameters, SolverKind};
use crate::problem::Problem;
use crate::validate::check_parameters;
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::debug;

const MAX_ITER: usize = 5000;

/// The functional contract between this crate and a linear optimizer.
pub trait Solver {
    /// Check that the pair satisfies the solver's preconditions.
    fn check(&self, problem: &Problem, params: &Parameters) -> Result<()> {
        check_parameters(problem, params)
    }

    /// Train a model. Implementations must reject any pair that
    /// [`Solver::check`] would reject.
    fn train(&self, problem: &Problem, params: &Parameters) -> Result<Model>;
}

/// The bundled dense linear solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseSolver;

impl Solver for DenseSolver {
    fn train(&self, problem: &Problem, params: &Parameters) -> Result<Model> {
        self.check(problem, params)?;

        debug!(
            solver = ?params.solver,
            instances = problem.len(),
            features = problem.max_feature_index(),
            bias = problem.bias(),
            "training linear model"
        );

        let (x, y) = problem.to_dense();

        if params.solver.is_regression() {
            let weights = train_regression(&x, &y, params)?;
            return Ok(Model::from_parts(
                params.solver,
                problem.max_feature_index() as usize,
                problem.bias(),
                Vec::new(),
                into_matrix(vec![weights]),
            ));
        }

        let classes = group_classes(&y)?;

        let weights = if classes.len() == 1 {
            // Degenerate but valid: a fold or caller-supplied set with a
            // single class yields a model that always predicts it.
            vec![Array1::zeros(x.ncols())]
        } else if classes.len() == 2 {
            // A two-class model keeps a single weight vector oriented
            // towards the first label.
            let signed = signed_targets(&y, classes[0]);
            let sample_weights = sample_weights(&y, params);
            vec![train_binary(&x, &signed, &sample_weights, params)?]
        } else {
            train_one_vs_rest(&x, &y, &classes, params)?
        };

        Ok(Model::from_parts(
            params.solver,
            problem.max_feature_index() as usize,
            problem.bias(),
            classes,
            into_matrix(weights),
        ))
    }
}

/// Collect distinct class labels in order of first occurrence, the
/// order the model reports and persists.
fn group_classes(y: &Array1<f64>) -> Result<Vec<i32>> {
    let mut classes: Vec<i32> = Vec::new();
    for (i, &label) in y.iter().enumerate() {
        if (label - label.round()).abs() > 1e-9 {
            return Err(LinealError::InvalidInput(format!(
                "classification requires integer class labels, but instance {} has label {}",
                i, label
            )));
        }
        let label = label.round() as i32;
        if !classes.contains(&label) {
            classes.push(label);
        }
    }

    Ok(classes)
}

fn signed_targets(y: &Array1<f64>, positive: i32) -> Array1<f64> {
    y.mapv(|label| if label.round() as i32 == positive { 1.0 } else { -1.0 })
}

fn sample_weights(y: &Array1<f64>, params: &Parameters) -> Array1<f64> {
    y.mapv(|label| params.weight_for(label.round() as i32))
}

fn into_matrix(rows: Vec<Array1<f64>>) -> Array2<f64> {
    let n_cols = rows.first().map_or(0, |r| r.len());
    let mut matrix = Array2::zeros((rows.len(), n_cols));
    for (i, row) in rows.into_iter().enumerate() {
        matrix.row_mut(i).assign(&row);
    }
    matrix
}

/// Train one weight vector per class against the rest, on a thread pool
/// sized from the configuration's resolved thread hint.
fn train_one_vs_rest(
    x: &Array2<f64>,
    y: &Array1<f64>,
    classes: &[i32],
    params: &Parameters,
) -> Result<Vec<Array1<f64>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.resolved_threads())
        .build()
        .map_err(|e| LinealError::ThreadPoolError(e.to_string()))?;

    let sample_weights = sample_weights(y, params);

    pool.install(|| {
        classes
            .par_iter()
            .map(|&class| {
                let signed = signed_targets(y, class);
                train_binary(x, &signed, &sample_weights, params)
            })
            .collect()
    })
}

/// Gradient descent on a binary margin loss with L1 or L2 regularization.
///
/// Minimizes `reg(w) + (1/n) sum_i s_i * loss(y_i * w.x_i)` where the
/// regularization strength is `1 / (cost * n)`, so a larger cost weighs
/// the data more heavily. Stops when the gradient norm drops below the
/// configured tolerance.
fn train_binary(
    x: &Array2<f64>,
    y: &Array1<f64>,
    sample_weights: &Array1<f64>,
    params: &Parameters,
) -> Result<Array1<f64>> {
    let n = x.nrows();
    let d = x.ncols();
    let n_f = n as f64;
    let lambda = 1.0 / (params.cost * n_f);

    // Step size from a Lipschitz bound over the squared row norms.
    let max_sq_norm = x
        .rows()
        .into_iter()
        .map(|row| row.dot(&row))
        .fold(0.0_f64, f64::max);
    let lr = 1.0 / (1.0 + 2.0 * max_sq_norm);

    let l1 = matches!(params.solver, SolverKind::L1rL2lossSvc | SolverKind::L1rLr);

    let mut w: Array1<f64> = Array1::zeros(d);

    for _iter in 0..MAX_ITER {
        let margins = x.dot(&w) * y;

        // d loss / d f, per instance, scaled by the class weight.
        let residuals: Array1<f64> = match params.solver {
            SolverKind::L2rLr | SolverKind::L1rLr | SolverKind::L2rLrDual => margins
                .iter()
                .zip(y.iter().zip(sample_weights.iter()))
                .map(|(&m, (&yi, &si))| -yi * si / (1.0 + m.exp()))
                .collect(),
            SolverKind::L2rL1lossSvcDual => margins
                .iter()
                .zip(y.iter().zip(sample_weights.iter()))
                .map(|(&m, (&yi, &si))| if m < 1.0 { -yi * si } else { 0.0 })
                .collect(),
            // Squared hinge for the remaining classification kinds.
            _ => margins
                .iter()
                .zip(y.iter().zip(sample_weights.iter()))
                .map(|(&m, (&yi, &si))| -2.0 * yi * si * (1.0 - m).max(0.0))
                .collect(),
        };

        let mut grad = x.t().dot(&residuals) / n_f;
        if l1 {
            grad = grad + lambda * w.mapv(f64::signum);
        } else {
            grad = grad + lambda * &w;
        }

        let grad_norm = grad.dot(&grad).sqrt();
        if grad_norm < params.epsilon {
            break;
        }

        w = w - lr * grad;
    }

    Ok(w)
}

/// Ridge-style normal-equation solve for the support vector regression
/// kinds: `(X^T X + alpha I) w = X^T y` via Cholesky.
fn train_regression(x: &Array2<f64>, y: &Array1<f64>, params: &Parameters) -> Result<Array1<f64>> {
    let d = x.ncols();
    let alpha = 1.0 / (2.0 * params.cost);

    let mut xtx = x.t().dot(x);
    for i in 0..d {
        xtx[[i, i]] += alpha;
    }
    let xty = x.t().dot(y);

    cholesky_solve(&xtx, &xty).ok_or_else(|| {
        LinealError::ComputationError("normal equations are singular".to_string())
    })
}

/// Solve a symmetric positive-definite system via Cholesky, retrying
/// once with a small ridge when the matrix is near-singular.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    if let Some(x) = cholesky_solve_inner(a, b) {
        return Some(x);
    }

    let n = a.nrows();
    let ridge = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n as f64;
    let mut a_reg = a.clone();
    for i in 0..n {
        a_reg[[i, i]] += ridge.max(1e-12);
    }
    cholesky_solve_inner(&a_reg, b)
}

fn cholesky_solve_inner(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    // Cholesky decomposition: A = L * L^T
    let mut l = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * z = b
    let mut z = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = z
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Some(x)
}
