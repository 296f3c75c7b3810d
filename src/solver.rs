use nalgebra::{DMatrix, DVector};
use log::warn;
use std::str::FromStr;
use std::time::Instant;

use crate::error::{CircuitError, Result};

/// Solver configuration
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub method: SolverMethod,
    /// Residual norm above `tolerance * 1000` is reported as a warning
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            method: SolverMethod::Lu,
            tolerance: 1e-12,
        }
    }
}

/// Available solver methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverMethod {
    /// Direct LU decomposition with partial pivoting
    Lu,
    /// QR decomposition
    Qr,
}

impl FromStr for SolverMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lu" => Ok(SolverMethod::Lu),
            "qr" => Ok(SolverMethod::Qr),
            other => Err(format!("unknown solver method '{}'", other)),
        }
    }
}

/// Solver statistics
#[derive(Debug, Clone)]
pub struct SolverStats {
    pub method_used: SolverMethod,
    pub residual_norm: f64,
    pub solve_time: f64,
    pub success: bool,
}

/// Dense linear system solver
#[derive(Debug, Clone, Default)]
pub struct LinearSolver {
    config: SolverConfig,
}

impl LinearSolver {
    /// Create a new solver with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new solver with custom configuration
    pub fn with_config(config: SolverConfig) -> Self {
        LinearSolver { config }
    }

    /// Solve the linear system Ax = b.
    ///
    /// A singular or numerically singular matrix, or a solution with
    /// non-finite entries, is reported as [`CircuitError::NoSolution`].
    pub fn solve_dense(&self, matrix: &DMatrix<f64>, rhs: &DVector<f64>) -> Result<(DVector<f64>, SolverStats)> {
        let start_time = Instant::now();

        if matrix.nrows() != matrix.ncols() {
            return Err(CircuitError::DimensionMismatch {
                expected: matrix.nrows(),
                actual: matrix.ncols(),
            });
        }
        if matrix.nrows() != rhs.len() {
            return Err(CircuitError::DimensionMismatch {
                expected: matrix.nrows(),
                actual: rhs.len(),
            });
        }

        let solution = match self.config.method {
            SolverMethod::Lu => {
                let lu = matrix.clone().lu();
                if has_negligible_pivot(matrix, &lu.u().diagonal()) {
                    return Err(CircuitError::NoSolution);
                }
                lu.solve(rhs)
            }
            SolverMethod::Qr => {
                let qr = matrix.clone().qr();
                if has_negligible_pivot(matrix, &qr.r().diagonal()) {
                    return Err(CircuitError::NoSolution);
                }
                qr.solve(rhs)
            }
        }
        .ok_or(CircuitError::NoSolution)?;

        if solution.iter().any(|x| !x.is_finite()) {
            return Err(CircuitError::NoSolution);
        }

        let residual_norm = (matrix * &solution - rhs).norm();
        let success = residual_norm < self.config.tolerance * 1000.0;
        if !success {
            warn!("Large residual after {:?} solve: {:.2e}", self.config.method, residual_norm);
        }

        Ok((solution, SolverStats {
            method_used: self.config.method,
            residual_norm,
            solve_time: start_time.elapsed().as_secs_f64(),
            success,
        }))
    }
}

/// True if some pivot of the factorisation is rounding noise.
///
/// Neither factorisation permutes columns, so pivot `i` is compared against
/// the largest entry of column `i` of the original matrix. Elimination on a
/// singular matrix leaves a residue of a few ulps of that magnitude.
fn has_negligible_pivot(matrix: &DMatrix<f64>, pivots: &DVector<f64>) -> bool {
    let rtol = matrix.nrows() as f64 * 16.0 * f64::EPSILON;
    pivots
        .iter()
        .zip(matrix.column_iter())
        .any(|(pivot, column)| pivot.abs() <= rtol * column.amax())
}
