use serde::Serialize;
use serde_json;
use std::fs::File;
use std::path::Path;

use crate::diagnostics::DiagnosticsSpec;
use crate::experiment::Experiment;

#[derive(Serialize)]
pub struct RunConfig {
    pub geometry: GeometryConfig,
    pub material: MaterialConfig,
    pub boundary: BoundaryConfig,
    pub sweep: SweepConfig,
    pub output: OutputConfig,
    pub run: RunInfo,
}

#[derive(Serialize)]
pub struct GeometryConfig {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub raster: String,
    pub edge_smooth: u32,
}

#[derive(Serialize)]
pub struct MaterialConfig {
    pub msat: f64,
    pub aex: f64,
    pub alpha: f64,
    pub gamma_ll: f64,
}

#[derive(Serialize)]
pub struct BoundaryConfig {
    pub nb: i32,
    pub al_start: f64,
    pub al_stop: f64,
    pub order: i32,
}

#[derive(Serialize)]
pub struct SweepConfig {
    pub phi_start_deg: f64,
    pub phi_stop_deg: f64,
    pub phi_step_deg: f64,
    pub f_start_hz: f64,
    pub f_stop_hz: f64,
    pub f_step_hz: f64,
    pub duration_s: f64,
    pub field_mag_t: f64,
    pub h_amp_t: f64,
    pub n_points: usize,
}

#[derive(Serialize)]
pub struct OutputConfig {
    pub autosave_interval_s: f64,
    pub rows_per_run: usize,
    pub columns: Vec<String>,
}

#[derive(Serialize)]
pub struct RunInfo {
    pub binary: String,
    pub run_id: String,
}

impl RunConfig {
    /// Snapshot of every fixed constant of the experiment.
    pub fn from_experiment(exp: &Experiment, run_id: &str) -> Self {
        Self {
            geometry: GeometryConfig {
                nx: exp.grid.nx,
                ny: exp.grid.ny,
                nz: 1,
                dx: exp.grid.dx,
                dy: exp.grid.dy,
                dz: exp.grid.dz,
                raster: exp.raster.display().to_string(),
                edge_smooth: exp.edge_smooth,
            },
            material: MaterialConfig {
                msat: exp.material.msat,
                aex: exp.material.a_ex,
                alpha: exp.material.alpha,
                gamma_ll: exp.material.gamma_ll,
            },
            boundary: BoundaryConfig {
                nb: exp.abl.nb,
                al_start: exp.abl.al_start,
                al_stop: exp.abl.al_stop,
                order: exp.abl.order,
            },
            sweep: SweepConfig {
                phi_start_deg: exp.sweep.phi_deg.start,
                phi_stop_deg: exp.sweep.phi_deg.stop,
                phi_step_deg: exp.sweep.phi_deg.step,
                f_start_hz: exp.sweep.f_hz.start,
                f_stop_hz: exp.sweep.f_hz.stop,
                f_step_hz: exp.sweep.f_hz.step,
                duration_s: exp.sweep.duration_s,
                field_mag_t: exp.sweep.field_mag,
                h_amp_t: exp.sweep.h_amp,
                n_points: exp.sweep.n_points(),
            },
            output: OutputConfig {
                autosave_interval_s: exp.diagnostics.autosave_interval_s,
                rows_per_run: exp.diagnostics.rows_per_run(exp.sweep.duration_s),
                columns: DiagnosticsSpec::columns()
                    .iter()
                    .map(|c| c.header())
                    .collect(),
            },
            run: RunInfo {
                binary: "fmr-sweep".to_string(),
                run_id: run_id.to_string(),
            },
        }
    }

    pub fn write_to_dir(&self, out_dir: &Path) -> std::io::Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serialises_the_fixed_constants() {
        let exp = Experiment::nanoconstriction();
        let cfg = RunConfig::from_experiment(&exp, "test");
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"nx\":512"));
        assert!(json.contains("\"n_points\":657"));
        assert!(json.contains("\"rows_per_run\":600"));
        assert!(json.contains("f_RF (GHz)"));
    }
}
