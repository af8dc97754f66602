// src/diagnostics.rs
//
// Scalar diagnostics declared with the engine: one solver-sourced channel
// (maximum precession angle over the mesh) plus echoes of the two sweep
// parameters, autosaved on a fixed cadence of simulated time. The cadence
// is independent of sweep stepping: every run contributes rows on the same
// clock, regardless of sweep boundaries.

use crate::error::{ExperimentError, Result};
use crate::solver::{SolverError, SolverHandle, TableColumn};

pub const MAX_ANGLE_COLUMN: &str = "maxAngle";
pub const PHI_COLUMN: &str = "phi";
pub const PHI_UNIT: &str = "degree";
pub const F_RF_COLUMN: &str = "f_RF";
pub const F_RF_UNIT: &str = "GHz";

/// Channel declarations and autosave cadence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticsSpec {
    /// Simulated time between table rows (s).
    pub autosave_interval_s: f64,
}

impl DiagnosticsSpec {
    pub fn validate(&self) -> Result<()> {
        if self.autosave_interval_s <= 0.0 {
            return Err(ExperimentError::Config(format!(
                "autosave interval must be positive, got {:e} s",
                self.autosave_interval_s
            )));
        }
        Ok(())
    }

    /// Declared columns, in table order.
    pub fn columns() -> [TableColumn; 3] {
        [
            TableColumn::MaxAngle,
            TableColumn::Parameter {
                name: PHI_COLUMN,
                unit: PHI_UNIT,
            },
            TableColumn::Parameter {
                name: F_RF_COLUMN,
                unit: F_RF_UNIT,
            },
        ]
    }

    /// Declare all channels and the autosave cadence with the engine.
    pub fn declare<S: SolverHandle>(&self, solver: &mut S) -> std::result::Result<(), SolverError> {
        for column in Self::columns() {
            solver.add_table_column(column)?;
        }
        solver.autosave(self.autosave_interval_s)
    }

    /// Autosave rows produced by one run of the given duration.
    pub fn rows_per_run(&self, duration_s: f64) -> usize {
        ((duration_s / self.autosave_interval_s) + 1e-9).floor() as usize
    }
}

/// One autosaved scalar record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticsRow {
    /// Simulated time (s).
    pub t_s: f64,
    /// Maximum precession angle over the mesh (rad).
    pub max_angle: f64,
    /// Bias-field angle echo (degree).
    pub phi_deg: f64,
    /// RF frequency echo (GHz).
    pub f_ghz: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_ns_at_five_ps_gives_600_rows() {
        let spec = DiagnosticsSpec {
            autosave_interval_s: 5e-12,
        };
        assert_eq!(spec.rows_per_run(3e-9), 600);
    }

    #[test]
    fn parameter_echoes_follow_the_engine_channel() {
        let cols = DiagnosticsSpec::columns();
        assert_eq!(cols[0], TableColumn::MaxAngle);
        assert_eq!(
            cols[1],
            TableColumn::Parameter {
                name: "phi",
                unit: "degree"
            }
        );
        assert_eq!(
            cols[2],
            TableColumn::Parameter {
                name: "f_RF",
                unit: "GHz"
            }
        );
    }

    #[test]
    fn non_positive_cadence_is_rejected() {
        let spec = DiagnosticsSpec {
            autosave_interval_s: 0.0,
        };
        assert!(spec.validate().is_err());
    }
}
