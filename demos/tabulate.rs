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

//! Resample a small inline tabulation and write the npy artifacts.
//!
//! Run with: `cargo run --example tabulate`

use anyhow::Result;
use potgrid::{process, ArtifactWriter, NpyWriter, PipelineConfig};

/// Toy surface: five polar cuts, values halving per radial step.
const SURFACE: &str = "\
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

fn main() -> Result<()> {
    let config = PipelineConfig::new(0.5, 10.0, 128, 32);
    let grid = process(SURFACE.as_bytes(), &config)?;
    println!(
        "resampled grid: {} radii x {} angles over r = [{}, {}]",
        grid.metadata.r_count, grid.metadata.theta_count, grid.metadata.r_start, grid.metadata.r_end,
    );

    let directory = std::env::temp_dir().join("potgrid-demo");
    std::fs::create_dir_all(&directory)?;
    NpyWriter::new(&directory).write("surface", &grid)?;
    println!("artifacts written to {}", directory.display());
    Ok(())
}
