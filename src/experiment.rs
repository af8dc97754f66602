// src/experiment.rs
//
// The complete experiment definition: every parameter of the
// nanoconstriction FMR sweep is a fixed constant here. Setup is write-once
// (grid, geometry, boundary layer, material, diagnostics), then the sweep
// issues one blocking run per (phi, f) point. To resume an aborted sweep,
// narrow the scan bounds to the last incomplete point and re-run.

use std::path::PathBuf;

use crate::abl::{self, AblShell, AblSpec};
use crate::diagnostics::DiagnosticsSpec;
use crate::error::Result;
use crate::field::DriveField;
use crate::geometry_mask::DeviceMask;
use crate::grid::GridSpec;
use crate::material::Material;
use crate::solver::SolverHandle;
use crate::sweep::{self, Scan, SweepSpec};

/// Default location of the device footprint raster.
pub const DEFAULT_RASTER: &str = "geometries/nanoconstriction.png";

/// Static configuration of one sweep experiment.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub grid: GridSpec,
    pub raster: PathBuf,
    pub edge_smooth: u32,
    pub material: Material,
    pub abl: AblSpec,
    /// Initial magnetisation direction.
    pub m0: [f64; 3],
    pub sweep: SweepSpec,
    pub diagnostics: DiagnosticsSpec,
}

/// Inputs derived during setup, kept for snapshots and the region map.
pub struct SetupReport {
    pub mask: DeviceMask,
    pub shells: Vec<AblShell>,
}

impl Experiment {
    /// The 2 µm nanoconstriction FMR experiment.
    ///
    /// 512×512 cells of 6 nm × 6 nm × 5 nm permalloy; a 30-shell absorbing
    /// boundary graded quadratically from the interior damping 0.02 to 1;
    /// bias field 30 mT swept over the full circle in 5° steps, RF drive
    /// 0.5 mT from 3 to 7 GHz in 0.5 GHz steps, 3 ns per point.
    pub fn nanoconstriction() -> Self {
        Self {
            grid: GridSpec::new(512, 512, 6e-9, 6e-9, 5e-9),
            raster: PathBuf::from(DEFAULT_RASTER),
            edge_smooth: 8,
            material: Material::permalloy(),
            abl: AblSpec {
                nb: 30,
                al_start: 0.02,
                al_stop: 1.0,
                order: 2,
            },
            m0: [1.0, 0.0, 0.0],
            sweep: SweepSpec {
                phi_deg: Scan::new(0.0, 360.0, 5.0),
                f_hz: Scan::new(3.0e9, 7.0e9, 0.5e9),
                duration_s: 3e-9,
                field_mag: 0.03,
                h_amp: 0.0005,
            },
            diagnostics: DiagnosticsSpec {
                autosave_interval_s: 5e-12,
            },
        }
    }

    /// Check every fixed constant before touching the engine.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.abl.validate(&self.grid)?;
        self.sweep.validate()?;
        self.diagnostics.validate()
    }

    /// Load inputs and push the full static configuration to the engine:
    /// grid, footprint + region 1, material, boundary shells, initial
    /// state, geometry snapshot, diagnostics channels.
    pub fn setup<S: SolverHandle>(&self, solver: &mut S) -> Result<SetupReport> {
        self.validate()?;

        solver.set_grid(&self.grid)?;

        let mask = DeviceMask::from_raster(&self.raster, &self.grid)?;
        mask.register(solver, self.edge_smooth)?;

        self.material.apply(solver)?;

        let shells = self.abl.build(&self.grid)?;
        abl::register_shells(&shells, solver)?;

        solver.init_magnetization(self.m0)?;
        solver.save_geometry()?;

        self.diagnostics.declare(solver)?;

        Ok(SetupReport { mask, shells })
    }

    /// Run the full sweep, then snapshot the final magnetisation state.
    /// Returns the number of completed runs.
    pub fn run<S: SolverHandle>(&self, solver: &mut S) -> Result<usize> {
        let n = sweep::run_sweep(&self.sweep, solver)?;
        solver.save_magnetization()?;
        Ok(n)
    }

    /// Drive field of the very first sweep point (useful in reports).
    pub fn first_drive(&self) -> DriveField {
        DriveField {
            field_mag: self.sweep.field_mag,
            phi_deg: self.sweep.phi_deg.start,
            h_amp: self.sweep.h_amp,
            f_hz: self.sweep.f_hz.start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanoconstriction_constants_are_the_published_ones() {
        let exp = Experiment::nanoconstriction();
        assert_eq!(exp.grid.nx, 512);
        assert_eq!(exp.grid.ny, 512);
        assert_eq!(exp.grid.dx, 6e-9);
        assert_eq!(exp.material.msat, 600e3);
        assert_eq!(exp.abl.nb, 30);
        assert_eq!(exp.sweep.n_points(), 657);
        assert_eq!(exp.diagnostics.rows_per_run(exp.sweep.duration_s), 600);
        assert!(exp.validate().is_ok());
    }

    #[test]
    fn first_drive_is_pure_bias_at_t0() {
        let exp = Experiment::nanoconstriction();
        let b0 = exp.first_drive().eval(0.0);
        assert!((b0[0] - 0.03).abs() < 1e-15);
        assert!(b0[1].abs() < 1e-15);
        assert_eq!(b0[2], 0.0);
    }
}
