// src/error.rs

use thiserror::Error;

use crate::solver::SolverError;

/// Failure classes for experiment setup and sweep execution.
///
/// Configuration and resource problems are detected before any run starts;
/// solver failures are fatal and abort the whole sweep (no retries).
#[derive(Debug, Error)]
pub enum ExperimentError {
    /// Invalid grid/cell dimensions, incompatible mask resolution,
    /// non-positive polynomial order, smoothing factor out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// The external engine rejected a setup call or failed outside a run.
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),

    /// The engine failed while a sweep point was in flight. Carries the
    /// point so an operator can resume by re-running with narrowed bounds.
    #[error("sweep aborted at (phi = {phi_deg} deg, f_RF = {f_ghz} GHz): {source}")]
    Sweep {
        phi_deg: f64,
        f_ghz: f64,
        source: SolverError,
    },

    /// Missing or unreadable input (e.g. the geometry raster).
    #[error("resource error: {0}")]
    Resource(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExperimentError>;
