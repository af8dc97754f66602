// src/mumax.rs
//
// Script-emitting solver backend.
//
// Each `SolverHandle` call appends the equivalent engine statement; the
// accumulated script is written next to the run outputs and handed to one
// blocking engine invocation. The engine integrates the recorded run(...)
// statements strictly in order, so the per-point sequencing of the sweep
// is preserved even though execution is deferred to a single process.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::Command;

use crate::diagnostics::{F_RF_COLUMN, PHI_COLUMN};
use crate::field::DriveField;
use crate::geometry_mask::DeviceMask;
use crate::grid::GridSpec;
use crate::solver::{Param, RegionId, RegionShape, SolverError, SolverHandle, TableColumn};

/// Engine binary looked up on PATH.
pub const DEFAULT_ENGINE: &str = "mumax3";

/// Numeric literal in engine syntax.
fn sci(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{v:e}")
    }
}

/// Accumulates an engine script for one experiment.
#[derive(Debug)]
pub struct MumaxScript {
    lines: Vec<String>,
    geom_var: Option<String>,
    parameter_columns: Vec<&'static str>,
    n_runs: usize,
}

impl MumaxScript {
    pub fn new() -> Self {
        Self {
            lines: vec!["// Generated by fmr-sweep.".to_string(), String::new()],
            geom_var: None,
            parameter_columns: Vec::new(),
            n_runs: 0,
        }
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Number of run(...) statements recorded so far.
    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    /// The full script text.
    pub fn script(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Persist the script so an operator can re-run or narrow it by hand.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        w.write_all(self.script().as_bytes())
    }

    fn shape_expr(mask: &DeviceMask) -> String {
        let base = format!("imageShape(\"{}\")", mask.source().display());
        if mask.inverted() {
            format!("{base}.inverse()")
        } else {
            base
        }
    }
}

impl SolverHandle for MumaxScript {
    fn set_grid(&mut self, grid: &GridSpec) -> Result<(), SolverError> {
        self.push(format!("setGridSize({}, {}, 1)", grid.nx, grid.ny));
        self.push(format!(
            "setCellSize({}, {}, {})",
            sci(grid.dx),
            sci(grid.dy),
            sci(grid.dz)
        ));
        Ok(())
    }

    fn set_geometry(&mut self, mask: &DeviceMask) -> Result<(), SolverError> {
        self.push(format!("device := {}", Self::shape_expr(mask)));
        self.push("setGeom(device)".to_string());
        self.geom_var = Some("device".to_string());
        Ok(())
    }

    fn set_edge_smooth(&mut self, factor: u32) -> Result<(), SolverError> {
        self.push(format!("edgeSmooth = {factor}"));
        Ok(())
    }

    fn def_region(&mut self, id: RegionId, shape: RegionShape<'_>) -> Result<(), SolverError> {
        let expr = match shape {
            RegionShape::Raster(mask) => match &self.geom_var {
                Some(var) => var.clone(),
                None => Self::shape_expr(mask),
            },
            RegionShape::Annulus(ring) => format!(
                "rect({}, {}).sub(rect({}, {}))",
                sci(ring.outer.len_x),
                sci(ring.outer.len_y),
                sci(ring.inner.len_x),
                sci(ring.inner.len_y)
            ),
        };
        self.push(format!("defRegion({id}, {expr})"));
        Ok(())
    }

    fn set_param(&mut self, param: Param, value: f64) -> Result<(), SolverError> {
        self.push(format!("{} = {}", param.name(), sci(value)));
        Ok(())
    }

    fn set_region_param(
        &mut self,
        id: RegionId,
        param: Param,
        value: f64,
    ) -> Result<(), SolverError> {
        self.push(format!("{}.setRegion({id}, {})", param.name(), sci(value)));
        Ok(())
    }

    fn init_magnetization(&mut self, m0: [f64; 3]) -> Result<(), SolverError> {
        self.push(format!(
            "m = uniform({}, {}, {})",
            sci(m0[0]),
            sci(m0[1]),
            sci(m0[2])
        ));
        Ok(())
    }

    fn save_geometry(&mut self) -> Result<(), SolverError> {
        self.push("save(geom)".to_string());
        Ok(())
    }

    fn save_magnetization(&mut self) -> Result<(), SolverError> {
        self.push("save(m)".to_string());
        Ok(())
    }

    fn add_table_column(&mut self, column: TableColumn) -> Result<(), SolverError> {
        match column {
            TableColumn::MaxAngle => self.push("tableAdd(maxAngle)".to_string()),
            TableColumn::Parameter { name, unit } => {
                self.push(format!("{name} := 0.0"));
                self.push(format!("tableAddVar({name}, \"{name}\", \"{unit}\")"));
                self.parameter_columns.push(name);
            }
        }
        Ok(())
    }

    fn autosave(&mut self, interval_s: f64) -> Result<(), SolverError> {
        self.push(format!("tableAutosave({})", sci(interval_s)));
        Ok(())
    }

    fn advance(&mut self, duration_s: f64, field: &DriveField) -> Result<(), SolverError> {
        self.push(String::new());
        let columns = self.parameter_columns.clone();
        for name in columns {
            match name {
                PHI_COLUMN => self.push(format!("{name} = {}", sci(field.phi_deg))),
                F_RF_COLUMN => self.push(format!("{name} = {}", sci(field.f_ghz()))),
                _ => {}
            }
        }
        // Constant terms are folded; the RF term keeps its dependence on the
        // engine's simulation-time variable t.
        let phi = field.phi_deg.to_radians();
        self.push(format!(
            "B_ext = vector({}, {} + {}*sin(2*pi*{}*t), 0)",
            sci(field.field_mag * phi.cos()),
            sci(field.field_mag * phi.sin()),
            sci(field.h_amp),
            sci(field.f_hz)
        ));
        self.push(format!("run({})", sci(duration_s)));
        self.n_runs += 1;
        Ok(())
    }
}

/// Launch the engine on a written script, blocking until it exits.
pub fn execute_engine(engine: &str, script: &Path) -> Result<(), SolverError> {
    let status = Command::new(engine)
        .arg(script)
        .status()
        .map_err(|e| SolverError(format!("could not launch '{engine}': {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(SolverError(format!("'{engine}' exited with {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::{run_sweep, Scan, SweepSpec};

    fn nc_sweep() -> SweepSpec {
        SweepSpec {
            phi_deg: Scan::new(0.0, 360.0, 5.0),
            f_hz: Scan::new(3.0e9, 7.0e9, 0.5e9),
            duration_s: 3e-9,
            field_mag: 0.03,
            h_amp: 0.0005,
        }
    }

    #[test]
    fn grid_statements_match_engine_syntax() {
        let mut script = MumaxScript::new();
        let grid = GridSpec::new(512, 512, 6e-9, 6e-9, 5e-9);
        script.set_grid(&grid).unwrap();
        let text = script.script();
        assert!(text.contains("setGridSize(512, 512, 1)"));
        assert!(text.contains("setCellSize(6e-9, 6e-9, 5e-9)"));
    }

    #[test]
    fn sweep_records_one_run_per_point() {
        let mut script = MumaxScript::new();
        let n = run_sweep(&nc_sweep(), &mut script).unwrap();
        assert_eq!(n, 657);
        assert_eq!(script.n_runs(), 657);
        assert_eq!(script.script().matches("run(3e-9)").count(), 657);
    }

    #[test]
    fn first_point_field_expression_is_exact() {
        // phi = 0, f = 3 GHz: bias entirely on x, RF term symbolic in t.
        let mut script = MumaxScript::new();
        run_sweep(&nc_sweep(), &mut script).unwrap();
        assert!(script
            .script()
            .contains("B_ext = vector(3e-2, 0 + 5e-4*sin(2*pi*3e9*t), 0)"));
    }

    #[test]
    fn parameter_echoes_are_updated_per_point() {
        let mut script = MumaxScript::new();
        script
            .add_table_column(TableColumn::Parameter {
                name: "phi",
                unit: "degree",
            })
            .unwrap();
        script
            .add_table_column(TableColumn::Parameter {
                name: "f_RF",
                unit: "GHz",
            })
            .unwrap();
        run_sweep(&nc_sweep(), &mut script).unwrap();
        let text = script.script();
        assert!(text.contains("tableAddVar(phi, \"phi\", \"degree\")"));
        assert!(text.contains("tableAddVar(f_RF, \"f_RF\", \"GHz\")"));
        // Echo is written in GHz, matching the declared unit.
        assert!(text.contains("f_RF = 3.5e0"));
        assert!(text.contains("phi = 3.55e2"));
    }
}
