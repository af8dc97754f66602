// tests/abl_validation.rs
//
// Geometry and grading properties of the absorbing boundary layer,
// checked with the nanoconstriction experiment numbers.
// Run with: cargo test --test abl_validation

use std::collections::HashSet;

use fmr_sweep::abl::{AblSpec, FIRST_SHELL_REGION};
use fmr_sweep::grid::GridSpec;

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
fn shells_are_strictly_nested() {
    let shells = nc_abl().build(&nc_grid()).unwrap();
    assert_eq!(shells.len(), 30);

    for pair in shells.windows(2) {
        // Each outer rectangle strictly contains the previous one, and the
        // rings tile the border: inner of shell i+1 is outer of shell i.
        assert!(pair[1]
            .annulus
            .outer
            .strictly_contains(&pair[0].annulus.outer));
        assert_eq!(pair[1].annulus.inner, pair[0].annulus.outer);
    }
}

#[test]
fn shells_are_pairwise_disjoint() {
    let shells = nc_abl().build(&nc_grid()).unwrap();

    // The radial midpoint of each ring lies in that ring and no other.
    for probe in &shells {
        let x = 0.25 * (probe.annulus.inner.len_x + probe.annulus.outer.len_x);
        for shell in &shells {
            assert_eq!(
                shell.annulus.contains(x, 0.0),
                shell.index == probe.index,
                "probe of shell {} against shell {}",
                probe.index,
                shell.index
            );
        }
    }
}

#[test]
fn shells_are_one_cell_thick() {
    let grid = nc_grid();
    let shells = nc_abl().build(&grid).unwrap();
    for shell in &shells {
        let dx = shell.annulus.outer.len_x - shell.annulus.inner.len_x;
        let dy = shell.annulus.outer.len_y - shell.annulus.inner.len_y;
        assert!((dx - 2.0 * grid.dx).abs() < 1e-15);
        assert!((dy - 2.0 * grid.dy).abs() < 1e-15);
    }
}

#[test]
fn outermost_shell_reaches_the_domain_edge() {
    let grid = nc_grid();
    let shells = nc_abl().build(&grid).unwrap();
    let last = shells.last().unwrap();
    assert!((last.annulus.outer.len_x - grid.lx()).abs() < 1e-15);
    assert!((last.annulus.outer.len_y - grid.ly()).abs() < 1e-15);
}

#[test]
fn region_ids_are_unique_and_sequential_from_three() {
    let shells = nc_abl().build(&nc_grid()).unwrap();
    let ids: HashSet<u32> = shells.iter().map(|s| s.region).collect();
    assert_eq!(ids.len(), shells.len());

    for shell in &shells {
        assert_eq!(shell.region, shell.index + 2);
    }
    assert_eq!(shells[0].region, FIRST_SHELL_REGION);
    assert_eq!(shells[29].region, 32);
}

#[test]
fn damping_is_monotone_and_hits_the_grading_bounds() {
    let spec = nc_abl();
    let shells = spec.build(&nc_grid()).unwrap();

    for pair in shells.windows(2) {
        assert!(pair[1].alpha >= pair[0].alpha);
    }
    assert!(shells[0].alpha >= spec.al_start);
    assert!((shells[29].alpha - spec.al_stop).abs() < 1e-12);
}

#[test]
fn grading_coefficient_reproduces_the_outer_shell() {
    // xEnd = 1.536 µm, xStart = 1.356 µm: the solved coefficient must give
    // alpha = 1.0 at the 30th shell.
    let grid = nc_grid();
    let spec = nc_abl();

    let x_end = grid.half_extent_x();
    let x_start = x_end - 30.0 * grid.dx;
    assert!((x_start - 1.356e-6).abs() < 1e-15);

    let a = spec.grading_coefficient(&grid);
    let alpha_30 = spec.al_start + a * ((x_end - x_start) * 1e9).powi(2);
    assert!((alpha_30 - 1.0).abs() < 1e-12);
}
