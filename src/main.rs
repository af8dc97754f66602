// src/main.rs
//
// Driver for the nanoconstriction FMR sweep experiment.
//
// There are no CLI flags: every parameter is a fixed constant in
// `experiment::Experiment::nanoconstriction()`. To resume an aborted
// sweep, narrow the scan bounds there to the last incomplete point.
//
// Outputs (per run directory under `runs/`):
//   runs/<run_id>/
//     ├── config.json               (snapshot of all constants)
//     ├── regions.png               (device footprint + boundary shells)
//     ├── fmr_nanoconstriction.mx3  (generated engine script)
//     └── engine outputs            (table.txt, geometry/state snapshots)

use std::fs::create_dir_all;
use std::path::PathBuf;

use fmr_sweep::config::RunConfig;
use fmr_sweep::error::Result;
use fmr_sweep::experiment::Experiment;
use fmr_sweep::mumax::{execute_engine, MumaxScript, DEFAULT_ENGINE};
use fmr_sweep::visualisation::save_region_map;

const RUN_ID: &str = "fmr_nanoconstriction";

fn unique_run_dir(out_root: &str, run_id: &str) -> PathBuf {
    let base = PathBuf::from(out_root);
    let mut dir = base.join(run_id);
    if !dir.exists() {
        return dir;
    }
    for k in 1..1000 {
        let cand = base.join(format!("{}_{}", run_id, k));
        if !cand.exists() {
            dir = cand;
            break;
        }
    }
    dir
}

fn run() -> Result<()> {
    let experiment = Experiment::nanoconstriction();

    let run_dir = unique_run_dir("runs", RUN_ID);
    create_dir_all(&run_dir)?;

    println!("--- fmr-sweep run config ---");
    println!("run_dir: {}", run_dir.display());
    println!(
        "grid:   nx={} ny={} dx={:.3e} dy={:.3e} dz={:.3e} (Lx={:.3e}, Ly={:.3e})",
        experiment.grid.nx,
        experiment.grid.ny,
        experiment.grid.dx,
        experiment.grid.dy,
        experiment.grid.dz,
        experiment.grid.lx(),
        experiment.grid.ly(),
    );
    println!(
        "mat:    Msat={:.3e} A={:.3e} alpha={:.3} gammaLL={:.4e}",
        experiment.material.msat,
        experiment.material.a_ex,
        experiment.material.alpha,
        experiment.material.gamma_ll
    );
    println!(
        "ABL:    NB={} alpha=[{}, {}] order={}",
        experiment.abl.nb, experiment.abl.al_start, experiment.abl.al_stop, experiment.abl.order
    );
    println!(
        "sweep:  phi=[{}, {}] step {} deg, f=[{:.1e}, {:.1e}] step {:.1e} Hz, {} points, {:.0e} s each",
        experiment.sweep.phi_deg.start,
        experiment.sweep.phi_deg.stop,
        experiment.sweep.phi_deg.step,
        experiment.sweep.f_hz.start,
        experiment.sweep.f_hz.stop,
        experiment.sweep.f_hz.step,
        experiment.sweep.n_points(),
        experiment.sweep.duration_s,
    );
    println!(
        "table:  autosave {:.0e} s (~{} rows per run), B(0) = {:?}",
        experiment.diagnostics.autosave_interval_s,
        experiment
            .diagnostics
            .rows_per_run(experiment.sweep.duration_s),
        experiment.first_drive().eval(0.0),
    );
    println!("----------------------------");

    let mut script = MumaxScript::new();
    let report = experiment.setup(&mut script)?;
    println!(
        "geometry: {} material cells ({:.1}% fill), {} boundary shells",
        report.mask.count(),
        100.0 * report.mask.fraction(),
        report.shells.len(),
    );

    let region_png = run_dir.join("regions.png");
    if let Err(e) = save_region_map(
        &experiment.grid,
        &report.mask,
        &report.shells,
        region_png.to_str().unwrap(),
    ) {
        eprintln!("Could not save region map: {e}");
    }

    let n_runs = experiment.run(&mut script)?;

    RunConfig::from_experiment(&experiment, RUN_ID).write_to_dir(&run_dir)?;
    let script_path = run_dir.join(format!("{RUN_ID}.mx3"));
    script.write_to(&script_path)?;
    println!("Recorded {} runs into {}", n_runs, script_path.display());

    println!("Launching '{}' (blocks until the sweep completes)...", DEFAULT_ENGINE);
    execute_engine(DEFAULT_ENGINE, &script_path)?;
    println!("Done. Outputs in {}", run_dir.display());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
