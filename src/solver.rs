// src/solver.rs
//
// Interface to the external field-driven LLG engine.
//
// The experiment core (mask, ABL, sweep driver, diagnostics) depends only
// on this trait. Tests substitute a recording fake; the production backend
// emits a mumax-compatible script and launches the engine (src/mumax.rs).
// The integrator and demag solver live entirely behind this seam.

use thiserror::Error;

use crate::abl::Annulus;
use crate::field::DriveField;
use crate::geometry_mask::DeviceMask;
use crate::grid::GridSpec;

/// Region identifier in the engine's region table.
pub type RegionId = u32;

/// Failure reported by a solver backend.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SolverError(pub String);

/// Scalar material parameter, settable globally or per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Saturation magnetisation Msat (A/m).
    Msat,
    /// Exchange stiffness Aex (J/m).
    Aex,
    /// Gilbert damping constant (dimensionless).
    Alpha,
    /// Gyromagnetic ratio (rad/(s·T)).
    GammaLL,
}

impl Param {
    pub fn name(&self) -> &'static str {
        match self {
            Param::Msat => "Msat",
            Param::Aex => "Aex",
            Param::Alpha => "alpha",
            Param::GammaLL => "gammaLL",
        }
    }
}

/// Scalar table column declared with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    /// Engine-sourced maximum precession angle over the mesh.
    MaxAngle,
    /// Echo of a driver parameter into every autosaved row.
    Parameter {
        name: &'static str,
        unit: &'static str,
    },
}

impl TableColumn {
    /// Column header as it appears in the output table.
    pub fn header(&self) -> String {
        match self {
            TableColumn::MaxAngle => "maxAngle ()".to_string(),
            TableColumn::Parameter { name, unit } => format!("{name} ({unit})"),
        }
    }
}

/// Region geometry passed to `def_region`.
#[derive(Debug)]
pub enum RegionShape<'a> {
    /// Device footprint from the geometry raster.
    Raster(&'a DeviceMask),
    /// Rectangular boundary-layer annulus.
    Annulus(Annulus),
}

/// The engine surface the experiment consumes.
///
/// Setup calls (everything except `advance`) happen once, before the sweep;
/// `advance` is issued once per sweep point and returns only after the
/// requested physical duration has been integrated.
pub trait SolverHandle {
    /// Configure grid size and cell size.
    fn set_grid(&mut self, grid: &GridSpec) -> Result<(), SolverError>;

    /// Restrict the magnetic volume to the device footprint.
    fn set_geometry(&mut self, mask: &DeviceMask) -> Result<(), SolverError>;

    /// Smoothing factor for raster-derived edges (engine max 8).
    fn set_edge_smooth(&mut self, factor: u32) -> Result<(), SolverError>;

    /// Register a region with the engine's region table.
    fn def_region(&mut self, id: RegionId, shape: RegionShape<'_>) -> Result<(), SolverError>;

    /// Set a material parameter uniformly over the whole geometry.
    fn set_param(&mut self, param: Param, value: f64) -> Result<(), SolverError>;

    /// Override a material parameter inside one region.
    fn set_region_param(
        &mut self,
        id: RegionId,
        param: Param,
        value: f64,
    ) -> Result<(), SolverError>;

    /// Set the initial magnetisation to a uniform direction.
    fn init_magnetization(&mut self, m0: [f64; 3]) -> Result<(), SolverError>;

    /// Persist a snapshot of the assembled geometry.
    fn save_geometry(&mut self) -> Result<(), SolverError>;

    /// Persist a snapshot of the current magnetisation state.
    fn save_magnetization(&mut self) -> Result<(), SolverError>;

    /// Declare a scalar output column.
    fn add_table_column(&mut self, column: TableColumn) -> Result<(), SolverError>;

    /// Append one table row every `interval_s` of simulated time.
    fn autosave(&mut self, interval_s: f64) -> Result<(), SolverError>;

    /// Integrate for `duration_s` under the given drive field, blocking
    /// until that much physical time has elapsed.
    fn advance(&mut self, duration_s: f64, field: &DriveField) -> Result<(), SolverError>;
}
