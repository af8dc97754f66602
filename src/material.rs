// src/material.rs

use crate::solver::{Param, SolverError, SolverHandle};

/// Uniform magnetic parameters of the film interior.
///
/// The interior damping constant is overridden per shell inside the
/// absorbing boundary layer (src/abl.rs).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Saturation magnetisation (A/m).
    pub msat: f64,
    /// Exchange stiffness (J/m).
    pub a_ex: f64,
    /// Gilbert damping constant.
    pub alpha: f64,
    /// Gyromagnetic ratio (rad/(s·T)).
    pub gamma_ll: f64,
}

impl Material {
    /// Ni–Fe permalloy, after Dvornik et al., Phys. Rev. Applied 9, 014017.
    pub fn permalloy() -> Self {
        Self {
            msat: 600e3,
            a_ex: 10e-12,
            alpha: 0.02,
            gamma_ll: 1.855e11,
        }
    }

    /// Set all parameters uniformly over the geometry.
    pub fn apply<S: SolverHandle>(&self, solver: &mut S) -> Result<(), SolverError> {
        solver.set_param(Param::Msat, self.msat)?;
        solver.set_param(Param::Aex, self.a_ex)?;
        solver.set_param(Param::Alpha, self.alpha)?;
        solver.set_param(Param::GammaLL, self.gamma_ll)?;
        Ok(())
    }
}
