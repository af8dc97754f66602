// src/abl.rs
//
// Absorbing boundary layer (ABL): concentric rectangular shells with
// polynomially graded damping, registered as engine regions.
//
// Only a central portion of the real device is simulated; spin waves that
// reach the domain edge would reflect back and contaminate the results.
// The ABL grades the damping constant from the interior value up to ~1
// across NB one-cell-thick shells so outgoing waves are attenuated instead.
//
// Coordinates are centred: (0,0) is the grid centre, extents in metres
// (same convention as src/grid.rs cell centres).

use crate::error::{ExperimentError, Result};
use crate::grid::GridSpec;
use crate::solver::{Param, RegionId, RegionShape, SolverError, SolverHandle};

/// Grading-law length scale: metres → nanometres.
const UNIT_SCALE_PER_M: f64 = 1e9;

/// First region id available to boundary shells. Ids 0 (vacuum) and 1
/// (device) are taken; id 2 is left unassigned, matching the original
/// region layout.
pub const FIRST_SHELL_REGION: RegionId = 3;

/// Axis-aligned rectangle centred on the grid origin, full side lengths in
/// metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenteredRect {
    pub len_x: f64,
    pub len_y: f64,
}

impl CenteredRect {
    pub fn new(len_x: f64, len_y: f64) -> Self {
        Self { len_x, len_y }
    }

    /// True if (x, y) lies inside the rectangle (inclusive edges).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.abs() <= 0.5 * self.len_x && y.abs() <= 0.5 * self.len_y
    }

    /// True if `other` fits strictly inside this rectangle.
    pub fn strictly_contains(&self, other: &CenteredRect) -> bool {
        self.len_x > other.len_x && self.len_y > other.len_y
    }
}

/// Rectangular ring: outer rectangle minus inner rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annulus {
    pub inner: CenteredRect,
    pub outer: CenteredRect,
}

impl Annulus {
    /// True if (x, y) lies in the ring (inside outer, outside inner).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.outer.contains(x, y) && !self.inner.contains(x, y)
    }
}

/// One boundary shell: ring geometry, assigned region, damping override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AblShell {
    /// Shell index, 1-based, growing toward the outer boundary.
    pub index: u32,
    /// Region id in the engine's region table (index + 2).
    pub region: RegionId,
    pub annulus: Annulus,
    /// Damping constant inside this shell.
    pub alpha: f64,
}

/// Grading parameters for the absorbing layer.
///
/// `nb` shells, each one cell thick per axis, graded from `al_start` at the
/// innermost shell toward `al_stop` at the domain edge with polynomial
/// order `order`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AblSpec {
    pub nb: i32,
    pub al_start: f64,
    pub al_stop: f64,
    pub order: i32,
}

impl AblSpec {
    /// nb <= 0 disables the layer; the grading bounds and order are checked
    /// before any region is derived.
    pub fn validate(&self, grid: &GridSpec) -> Result<()> {
        if self.nb <= 0 {
            return Ok(());
        }
        if self.order <= 0 {
            return Err(ExperimentError::Config(format!(
                "ABL polynomial order must be positive, got {}",
                self.order
            )));
        }
        if self.al_start < 0.0 || self.al_stop < self.al_start {
            return Err(ExperimentError::Config(format!(
                "ABL grading bounds must satisfy 0 <= alStart <= alStop, got [{}, {}]",
                self.al_start, self.al_stop
            )));
        }
        let depth_x = self.nb as f64 * grid.dx;
        let depth_y = self.nb as f64 * grid.dy;
        if depth_x >= grid.half_extent_x() || depth_y >= grid.half_extent_y() {
            return Err(ExperimentError::Config(format!(
                "ABL of {} shells is at least as deep as the half-domain \
                 ({:e} m of {:e} m)",
                self.nb,
                depth_x,
                grid.half_extent_x()
            )));
        }
        Ok(())
    }

    /// Coefficient `a` of the grading law, solved so the outermost shell
    /// lands exactly on `al_stop`:
    ///
    ///   a = (alStop − alStart) / ((xEnd − xStart)·k)^n
    pub fn grading_coefficient(&self, grid: &GridSpec) -> f64 {
        let x_end = grid.half_extent_x();
        let x_start = x_end - self.nb as f64 * grid.dx;
        (self.al_stop - self.al_start) / ((x_end - x_start) * UNIT_SCALE_PER_M).powi(self.order)
    }

    /// Damping constant of shell i (1-based):
    ///
    ///   α_i = alStart + a·(i·(dx+dy)/2·k)^n
    pub fn shell_alpha(&self, grid: &GridSpec, i: u32) -> f64 {
        let a = self.grading_coefficient(grid);
        let depth = i as f64 * 0.5 * (grid.dx + grid.dy) * UNIT_SCALE_PER_M;
        self.al_start + a * depth.powi(self.order)
    }

    /// Derive the full shell set, innermost first.
    ///
    /// Shell i spans the ring between the rectangles of half-extents
    /// (xStart + (i−1)·dx, …) and (xStart + i·dx, …), where
    /// xStart = xEnd − nb·dx; region ids run from `FIRST_SHELL_REGION`.
    pub fn build(&self, grid: &GridSpec) -> Result<Vec<AblShell>> {
        self.validate(grid)?;
        if self.nb <= 0 {
            return Ok(Vec::new());
        }

        let x_start = grid.half_extent_x() - self.nb as f64 * grid.dx;
        let y_start = grid.half_extent_y() - self.nb as f64 * grid.dy;

        let mut shells = Vec::with_capacity(self.nb as usize);
        let mut inner = CenteredRect::new(2.0 * x_start, 2.0 * y_start);
        for i in 1..=self.nb as u32 {
            let outer = CenteredRect::new(
                inner.len_x + 2.0 * grid.dx,
                inner.len_y + 2.0 * grid.dy,
            );
            shells.push(AblShell {
                index: i,
                region: i + FIRST_SHELL_REGION - 1,
                annulus: Annulus { inner, outer },
                alpha: self.shell_alpha(grid, i),
            });
            inner = outer;
        }
        Ok(shells)
    }
}

/// Push the shell set into the engine's region table, innermost first:
/// one region definition plus one damping override per shell.
pub fn register_shells<S: SolverHandle>(
    shells: &[AblShell],
    solver: &mut S,
) -> std::result::Result<(), SolverError> {
    for shell in shells {
        solver.def_region(shell.region, RegionShape::Annulus(shell.annulus))?;
        solver.set_region_param(shell.region, Param::Alpha, shell.alpha)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nc_grid() -> GridSpec {
        GridSpec::new(512, 512, 6e-9, 6e-9, 5e-9)
    }

    fn nc_abl() -> AblSpec {
        AblSpec {
            nb: 30,
            al_start: 0.02,
            al_stop: 1.0,
            order: 2,
        }
    }

    #[test]
    fn annulus_excludes_its_inner_rectangle() {
        let ring = Annulus {
            inner: CenteredRect::new(2.0, 2.0),
            outer: CenteredRect::new(4.0, 4.0),
        };
        assert!(!ring.contains(0.0, 0.0));
        assert!(ring.contains(1.5, 0.0));
        assert!(ring.contains(-1.5, 1.8));
        assert!(!ring.contains(2.5, 0.0));
    }

    #[test]
    fn non_positive_order_is_rejected_before_building() {
        let spec = AblSpec { order: 0, ..nc_abl() };
        assert!(matches!(
            spec.build(&nc_grid()),
            Err(ExperimentError::Config(_))
        ));
        let spec = AblSpec { order: -2, ..nc_abl() };
        assert!(spec.build(&nc_grid()).is_err());
    }

    #[test]
    fn non_positive_shell_count_disables_the_layer() {
        let spec = AblSpec { nb: 0, ..nc_abl() };
        assert!(spec.build(&nc_grid()).unwrap().is_empty());
        let spec = AblSpec { nb: -5, ..nc_abl() };
        assert!(spec.build(&nc_grid()).unwrap().is_empty());
    }

    #[test]
    fn layer_deeper_than_half_domain_is_rejected() {
        // 300 shells of 6 nm = 1.8 µm > 1.536 µm half-extent.
        let spec = AblSpec { nb: 300, ..nc_abl() };
        assert!(spec.build(&nc_grid()).is_err());
    }

    #[test]
    fn inner_extent_matches_nanoconstriction_numbers() {
        // xStart = 1.536 µm − 30·6 nm = 1.356 µm
        let shells = nc_abl().build(&nc_grid()).unwrap();
        let first = &shells[0];
        assert!((first.annulus.inner.len_x - 2.0 * 1.356e-6).abs() < 1e-15);
        assert!((first.annulus.inner.len_y - 2.0 * 1.356e-6).abs() < 1e-15);
    }

    #[test]
    fn grading_hits_both_endpoints() {
        let grid = nc_grid();
        let spec = nc_abl();
        let shells = spec.build(&grid).unwrap();
        assert_eq!(shells.len(), 30);
        assert!(shells[0].alpha >= spec.al_start);
        assert!((shells[29].alpha - spec.al_stop).abs() < 1e-12);

        // The solved coefficient reproduces alpha at the outermost shell.
        let a = spec.grading_coefficient(&grid);
        let depth = 30.0 * 6.0; // nm
        assert!((spec.al_start + a * depth * depth - 1.0).abs() < 1e-12);
    }
}
