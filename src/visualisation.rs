// src/visualisation.rs

use plotters::prelude::*;

use crate::abl::AblShell;
use crate::geometry_mask::DeviceMask;
use crate::grid::GridSpec;

/// Map a shell damping constant to a blue–red colour over [lo, hi].
fn alpha_to_color(alpha: f64, lo: f64, hi: f64) -> RGBColor {
    let mut lo = lo;
    let mut hi = hi;
    if !lo.is_finite() || !hi.is_finite() || (hi - lo).abs() < 1e-12 {
        lo = 0.0;
        hi = 1.0;
    }
    let x = ((alpha - lo) / (hi - lo)).clamp(0.0, 1.0);
    RGBColor((255.0 * x) as u8, 64, (255.0 * (1.0 - x)) as u8)
}

/// Save the assembled region layout as a PNG: device footprint in grey,
/// boundary shells coloured by their damping constant (blue = innermost,
/// red = outermost), vacuum in white.
pub fn save_region_map(
    grid: &GridSpec,
    mask: &DeviceMask,
    shells: &[AblShell],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let nx = grid.nx as i32;
    let ny = grid.ny as i32;

    let lo = shells.first().map(|s| s.alpha).unwrap_or(0.0);
    let hi = shells.last().map(|s| s.alpha).unwrap_or(1.0);

    let root = BitMapBackend::new(filename, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(40)
        .caption(
            "regions (grey = device, blue\u{2192}red = boundary damping)",
            ("sans-serif", 20),
        )
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..nx, 0..ny)?;

    chart
        .configure_mesh()
        .x_desc("x (cell index)")
        .y_desc("y (cell index)")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    // One coloured rectangle per cell
    chart.draw_series((0..nx).flat_map(|i| {
        (0..ny).map(move |j| {
            let (x, y) = grid.cell_center_xy(i as usize, j as usize);
            let color = match shells.iter().find(|s| s.annulus.contains(x, y)) {
                Some(shell) => alpha_to_color(shell.alpha, lo, hi),
                None if mask.is_filled(i as usize, j as usize) => RGBColor(120, 120, 120),
                None => WHITE,
            };
            Rectangle::new([(i, j), (i + 1, j + 1)], color.filled())
        })
    }))?;

    Ok(())
}
