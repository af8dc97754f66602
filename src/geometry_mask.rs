// src/geometry_mask.rs
//
// Device footprint loaded from a raster image.
//
// The raster paints the complement of the device (engine convention:
// non-white pixels are inside the painted shape), so the mask is inverted
// on load: material sits where the image is white. The mask is immutable
// after load and occupies region 1 in the engine's region table.

use std::path::{Path, PathBuf};

use crate::error::{ExperimentError, Result};
use crate::grid::GridSpec;
use crate::solver::{RegionId, RegionShape, SolverHandle};

/// Region id of the device footprint.
pub const DEVICE_REGION: RegionId = 1;

/// Largest edge-smoothing factor the engine accepts.
pub const MAX_EDGE_SMOOTH: u32 = 8;

/// Boolean footprint over the grid (true = magnetic material).
#[derive(Debug, Clone)]
pub struct DeviceMask {
    nx: usize,
    ny: usize,
    cells: Vec<bool>,
    source: PathBuf,
    inverted: bool,
}

impl DeviceMask {
    /// Load the footprint raster and invert it.
    ///
    /// The raster resolution must equal the grid resolution exactly; a
    /// mismatch is a configuration error, never resampled.
    pub fn from_raster(path: &Path, grid: &GridSpec) -> Result<Self> {
        if !path.exists() {
            return Err(ExperimentError::Resource(format!(
                "geometry raster not found: {}",
                path.display()
            )));
        }
        let img = image::open(path)
            .map_err(|e| {
                ExperimentError::Resource(format!(
                    "could not decode geometry raster {}: {e}",
                    path.display()
                ))
            })?
            .to_luma8();

        let (w, h) = (img.width() as usize, img.height() as usize);
        if w != grid.nx || h != grid.ny {
            return Err(ExperimentError::Config(format!(
                "geometry raster is {w}x{h} but the grid is {}x{}; \
                 the mask is never resampled",
                grid.nx, grid.ny
            )));
        }

        // Painted (non-white) pixels are the shape; material is the inverse.
        let cells = img.pixels().map(|p| p.0[0] >= 128).collect();

        Ok(Self {
            nx: w,
            ny: h,
            cells,
            source: path.to_path_buf(),
            inverted: true,
        })
    }

    /// Push geometry, region 1 and the edge-smoothing request to the engine.
    pub fn register<S: SolverHandle>(&self, solver: &mut S, edge_smooth: u32) -> Result<()> {
        if edge_smooth > MAX_EDGE_SMOOTH {
            return Err(ExperimentError::Config(format!(
                "edge smoothing factor {edge_smooth} exceeds the engine maximum {MAX_EDGE_SMOOTH}"
            )));
        }
        solver.set_geometry(self)?;
        solver.def_region(DEVICE_REGION, RegionShape::Raster(self))?;
        solver.set_edge_smooth(edge_smooth)?;
        Ok(())
    }

    #[inline]
    pub fn is_filled(&self, i: usize, j: usize) -> bool {
        debug_assert!(i < self.nx && j < self.ny);
        self.cells[j * self.nx + i]
    }

    /// Number of material cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }

    /// Material fill fraction over the whole grid.
    pub fn fraction(&self) -> f64 {
        self.count() as f64 / self.cells.len() as f64
    }

    /// Path the mask was loaded from (for script backends and snapshots).
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// True if the raster was inverted on load.
    pub fn inverted(&self) -> bool {
        self.inverted
    }
}
