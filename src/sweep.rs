// src/sweep.rs
//
// Nested (phi, f) parameter sweep: outer loop over the bias-field angle,
// inner loop over the RF drive frequency. One blocking solver run per
// point, strictly sequential; the first failure aborts the whole sweep and
// reports the point that was in flight.

use crate::error::{ExperimentError, Result};
use crate::field::DriveField;
use crate::solver::SolverHandle;

/// Inclusive linear scan: start, start+step, …, stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scan {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Scan {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    pub fn validate(&self, what: &str) -> Result<()> {
        if self.step <= 0.0 || self.stop < self.start {
            return Err(ExperimentError::Config(format!(
                "{what} scan needs stop >= start and a positive step, \
                 got [{}, {}] step {}",
                self.start, self.stop, self.step
            )));
        }
        Ok(())
    }

    /// Number of scan values, endpoints inclusive.
    pub fn len(&self) -> usize {
        (((self.stop - self.start) / self.step) + 1e-9).floor() as usize + 1
    }

    /// k-th scan value. Values are derived from the index, not accumulated,
    /// so the endpoint is hit without floating-point drift.
    #[inline]
    pub fn value(&self, k: usize) -> f64 {
        self.start + k as f64 * self.step
    }
}

/// One (phi, f) combination; drives exactly one solver run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub phi_deg: f64,
    pub f_hz: f64,
}

/// The full 2D sweep: scan bounds, per-run duration and drive amplitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSpec {
    /// Bias-field angle scan (degree). Outer loop.
    pub phi_deg: Scan,
    /// RF frequency scan (Hz). Inner loop.
    pub f_hz: Scan,
    /// Physical duration integrated per point (s).
    pub duration_s: f64,
    /// Static bias magnitude (T).
    pub field_mag: f64,
    /// RF drive amplitude (T).
    pub h_amp: f64,
}

impl SweepSpec {
    pub fn validate(&self) -> Result<()> {
        self.phi_deg.validate("phi")?;
        self.f_hz.validate("f_RF")?;
        if self.duration_s <= 0.0 {
            return Err(ExperimentError::Config(format!(
                "run duration must be positive, got {:e} s",
                self.duration_s
            )));
        }
        Ok(())
    }

    /// Total number of sweep points.
    pub fn n_points(&self) -> usize {
        self.phi_deg.len() * self.f_hz.len()
    }

    /// Enumerate the sweep in order: all f values for the first phi precede
    /// any value for the next phi.
    pub fn points(&self) -> SweepState {
        SweepState {
            phi: self.phi_deg,
            f: self.f_hz,
            phi_idx: 0,
            f_idx: 0,
        }
    }

    /// Drive field for one point.
    pub fn drive(&self, point: SweepPoint) -> DriveField {
        DriveField {
            field_mag: self.field_mag,
            phi_deg: point.phi_deg,
            h_amp: self.h_amp,
            f_hz: point.f_hz,
        }
    }
}

/// Explicit iteration state of the nested scan. The inner (f) counter
/// advances each step; on overflow it resets and the outer (phi) counter
/// advances.
#[derive(Debug, Clone)]
pub struct SweepState {
    phi: Scan,
    f: Scan,
    phi_idx: usize,
    f_idx: usize,
}

impl Iterator for SweepState {
    type Item = SweepPoint;

    fn next(&mut self) -> Option<SweepPoint> {
        if self.phi_idx >= self.phi.len() {
            return None;
        }
        let point = SweepPoint {
            phi_deg: self.phi.value(self.phi_idx),
            f_hz: self.f.value(self.f_idx),
        };
        self.f_idx += 1;
        if self.f_idx >= self.f.len() {
            self.f_idx = 0;
            self.phi_idx += 1;
        }
        Some(point)
    }
}

/// Run every sweep point, in order, against the solver.
///
/// Returns the number of completed runs. A solver failure is fatal: the
/// error carries the (phi, f) that was in flight so an operator can resume
/// by re-running with narrowed scan bounds.
pub fn run_sweep<S: SolverHandle>(spec: &SweepSpec, solver: &mut S) -> Result<usize> {
    spec.validate()?;

    let n_f = spec.f_hz.len();
    let total = spec.n_points();
    let mut done = 0usize;

    for point in spec.points() {
        let field = spec.drive(point);
        solver
            .advance(spec.duration_s, &field)
            .map_err(|e| ExperimentError::Sweep {
                phi_deg: point.phi_deg,
                f_ghz: point.f_hz * 1e-9,
                source: e,
            })?;
        done += 1;

        if done % n_f == 0 {
            println!(
                "phi = {:6.1} deg complete ({done}/{total} runs)",
                point.phi_deg
            );
        }
    }
    Ok(done)
}
