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

//! Finished grids and their persistence.
//!
//! The pipeline hands a finished [`OutputGrid`] to an [`ArtifactWriter`];
//! the bundled [`NpyWriter`] stores the value tensor and a six-element
//! axis record as two `.npy` arrays, enough to reconstruct both target
//! axes without re-storing them.

use crate::error::Result;
use ndarray::{arr1, Array1, Array2};
use ndarray_npy::write_npy;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Compact description of the two output axes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct GridMetadata {
    pub r_start: f64,
    pub r_end: f64,
    pub r_count: usize,
    /// Smallest polar angle, radians.
    pub theta_start: f64,
    /// Largest polar angle, radians.
    pub theta_end: f64,
    pub theta_count: usize,
}

impl GridMetadata {
    /// Flat persisted layout:
    /// `[r_start, r_end, r_count, θ_start, θ_end, θ_count]`.
    pub fn to_vector(&self) -> Array1<f64> {
        arr1(&[
            self.r_start,
            self.r_end,
            self.r_count as f64,
            self.theta_start,
            self.theta_end,
            self.theta_count as f64,
        ])
    }
}

/// The interpolated surface on the target grid, radius as leading axis.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputGrid {
    /// Values indexed by (radius, angle).
    pub values: Array2<f64>,
    /// Axis record describing the value tensor.
    pub metadata: GridMetadata,
}

/// Sink for a finished grid; the core hands over the tensor and the axis
/// record and nothing else.
pub trait ArtifactWriter {
    /// Persist `grid` under the artifact name `stem`.
    fn write(&self, stem: &str, grid: &OutputGrid) -> Result<()>;
}

/// Writes `<stem>.npy` (value tensor) and `<stem>_grid.npy` (axis record)
/// into a directory.
#[derive(Clone, Debug)]
pub struct NpyWriter {
    directory: PathBuf,
}

impl NpyWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl ArtifactWriter for NpyWriter {
    fn write(&self, stem: &str, grid: &OutputGrid) -> Result<()> {
        write_npy(self.directory.join(format!("{stem}.npy")), &grid.values)?;
        write_npy(
            self.directory.join(format!("{stem}_grid.npy")),
            &grid.metadata.to_vector(),
        )?;
        Ok(())
    }
}
