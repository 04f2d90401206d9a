// Copyright 2025 the potgrid authors
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! End-to-end pipeline tests on a small synthetic tabulation.

use approx::assert_relative_eq;
use ndarray::{Array1, Array2};
use ndarray_npy::read_npy;
use potgrid::{process, save_potential, Error, NpyWriter, PipelineConfig};
use std::f64::consts::PI;
use std::path::PathBuf;

/// Five angle blocks over the full [0°, 180°] range, radii 1.0..2.0 in
/// steps of 0.25, values halving per radial step.
const SURFACE: &str = "\
# synthetic test surface
# theta = 0.0
1.00  600.0
1.25  300.0
1.50  150.0
1.75  75.0
2.00  37.5
# theta = 45.0
1.00  500.0
1.25  250.0
1.50  125.0
1.75  62.5
2.00  31.25
# theta = 90.0
1.00  400.0
1.25  200.0
1.50  100.0
1.75  50.0
2.00  25.0
# theta = 135.0
1.00  500.0
1.25  250.0
1.50  125.0
1.75  62.5
2.00  31.25
# theta = 180.0
1.00  600.0
1.25  300.0
1.50  150.0
1.75  75.0
2.00  37.5
";

fn config() -> PipelineConfig {
    PipelineConfig::new(0.5, 10.0, 39, 8)
}

fn scratch_dir(tag: &str) -> PathBuf {
    let directory = std::env::temp_dir().join(format!("potgrid-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&directory).unwrap();
    directory
}

#[test]
fn test_process_shapes_and_metadata() {
    let grid = process(SURFACE.as_bytes(), &config()).unwrap();

    assert_eq!(grid.values.dim(), (39, 8));
    assert!(grid.values.iter().all(|v| v.is_finite()));

    let metadata = grid.metadata;
    assert_relative_eq!(metadata.r_start, 0.5);
    assert_relative_eq!(metadata.r_end, 10.0);
    assert_eq!(metadata.r_count, 39);
    assert_eq!(metadata.theta_count, 8);
    assert!(metadata.theta_start > 0.0);
    assert!(metadata.theta_end < PI);
    assert!(metadata.theta_start < metadata.theta_end);
}

#[test]
fn test_process_vanishes_at_long_range() {
    let grid = process(SURFACE.as_bytes(), &config()).unwrap();

    // The last target radii sit deep inside the zero tail of every slice.
    for j in 0..8 {
        assert!(
            grid.values[[38, j]].abs() < 1e-6,
            "tail value {} should vanish",
            grid.values[[38, j]]
        );
    }
}

#[test]
fn test_process_repulsive_toward_small_radii() {
    let grid = process(SURFACE.as_bytes(), &config()).unwrap();

    // Radius 0.5 is inside the synthesized wall; radius 2.0 is the outer
    // tabulated edge. The wall must dominate at every angle.
    for j in 0..8 {
        assert!(grid.values[[0, j]] > grid.values[[6, j]]);
    }
}

#[test]
fn test_gamma_mode_runs_and_stays_finite() {
    let grid = process(SURFACE.as_bytes(), &config().with_gamma(true)).unwrap();
    assert_eq!(grid.values.dim(), (39, 8));
    assert!(grid.values.iter().all(|v| v.is_finite()));
    // Squaring the fitted square root can never produce a negative value.
    assert!(grid.values.iter().all(|&v| v >= 0.0));
}

#[test]
fn test_target_below_extended_domain_is_rejected() {
    // The innermost synthesized radius is 0.25, so a target grid starting
    // at 0.1 falls outside the fitted support.
    let config = PipelineConfig::new(0.1, 10.0, 39, 8);
    let err = process(SURFACE.as_bytes(), &config).unwrap_err();
    assert!(matches!(err, Error::OutOfDomain { .. }));
}

#[test]
fn test_save_potential_writes_both_artifacts() {
    let directory = scratch_dir("save");
    let input = directory.join("surface.dat");
    std::fs::write(&input, SURFACE).unwrap();

    let writer = NpyWriter::new(&directory);
    save_potential(&input, "surface", &writer, &config()).unwrap();

    let values: Array2<f64> = read_npy(directory.join("surface.npy")).unwrap();
    let record: Array1<f64> = read_npy(directory.join("surface_grid.npy")).unwrap();
    assert_eq!(values.dim(), (39, 8));
    assert_eq!(record.len(), 6);
    assert_relative_eq!(record[0], 0.5);
    assert_relative_eq!(record[1], 10.0);
    assert_relative_eq!(record[2], 39.0);
    assert_relative_eq!(record[5], 8.0);
    assert!(record[3] > 0.0 && record[3] < record[4] && record[4] < PI);

    std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_malformed_input_writes_nothing() {
    let directory = scratch_dir("malformed");
    let input = directory.join("broken.dat");
    // A data line before any angle marker is structurally invalid.
    std::fs::write(&input, "1.0 500.0\n# theta = 0.0\n").unwrap();

    let writer = NpyWriter::new(&directory);
    let err = save_potential(&input, "broken", &writer, &config()).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { line: 1, .. }));
    assert!(!directory.join("broken.npy").exists());
    assert!(!directory.join("broken_grid.npy").exists());

    std::fs::remove_dir_all(&directory).unwrap();
}
