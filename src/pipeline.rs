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

//! End-to-end orchestration.
//!
//! A run is a strict sequential chain: parse the tabulation, extend every
//! angular slice, stack the slices into a tensor, apply the forward
//! transform, fit the spline, evaluate it on the target grids, apply the
//! inverse transform, and hand the finished grid to a writer. Any failure
//! aborts the run; nothing is written on error.

use crate::error::{Error, Result};
use crate::extrapolate::{extend_slice, WALL_CEILING};
use crate::grid::{AngularGrid, RadialGrid};
use crate::output::{ArtifactWriter, GridMetadata, OutputGrid};
use crate::spline::BivariateSpline;
use crate::surface::TabulatedSurface;
use crate::transform::ValueTransform;
use ndarray::Array2;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings for one resampling run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct PipelineConfig {
    /// First radius of the target grid.
    pub r_start: f64,
    /// Last radius of the target grid; also the distance the long-range
    /// extension must reach, so the whole target range is fittable.
    pub r_end: f64,
    /// Number of target radii.
    pub r_count: usize,
    /// Number of Gauss-Legendre polar nodes.
    pub polar_count: usize,
    /// Spline degree along the radial axis (default 3).
    pub radial_degree: usize,
    /// Spline degree along the angular axis (default 3).
    pub angular_degree: usize,
    /// Fit the square root of the surface and square the result
    /// (the gamma case).
    pub gamma: bool,
    /// Repulsive-wall ceiling for the short-range extension.
    pub wall_ceiling: f64,
}

impl PipelineConfig {
    /// Target grid bounds and counts with the conventional defaults:
    /// cubic spline in both axes, gamma off, wall ceiling 1000.
    pub fn new(r_start: f64, r_end: f64, r_count: usize, polar_count: usize) -> Self {
        Self {
            r_start,
            r_end,
            r_count,
            polar_count,
            radial_degree: 3,
            angular_degree: 3,
            gamma: false,
            wall_ceiling: WALL_CEILING,
        }
    }

    /// Set the spline degree per axis.
    pub fn with_degrees(mut self, radial: usize, angular: usize) -> Self {
        self.radial_degree = radial;
        self.angular_degree = angular;
        self
    }

    /// Enable or disable the gamma variable transform.
    pub fn with_gamma(mut self, gamma: bool) -> Self {
        self.gamma = gamma;
        self
    }

    /// Override the repulsive-wall ceiling.
    pub fn with_wall_ceiling(mut self, ceiling: f64) -> Self {
        self.wall_ceiling = ceiling;
        self
    }

    fn transform(&self) -> ValueTransform {
        if self.gamma {
            ValueTransform::gamma()
        } else {
            ValueTransform::Identity
        }
    }
}

/// Run the full pipeline on an already-open tabulation source.
pub fn process<R: BufRead>(source: R, config: &PipelineConfig) -> Result<OutputGrid> {
    if config.polar_count == 0 {
        return Err(Error::InvalidGrid(
            "angular grid needs at least one node".to_string(),
        ));
    }
    let radial = RadialGrid::new(config.r_start, config.r_end, config.r_count)?;
    let angular = AngularGrid::gauss_legendre(config.polar_count);
    let surface = TabulatedSurface::from_reader(source)?;

    // Extend every slice; the synthesized radii depend only on the shared
    // tabulated axis, so all extended axes agree.
    let extended = surface
        .slices()
        .iter()
        .map(|slice| {
            extend_slice(
                surface.radii(),
                &slice.values,
                config.wall_ceiling,
                radial.end(),
            )
        })
        .collect::<Result<Vec<_>>>()?;
    let (first, rest) = extended.split_first().ok_or_else(|| Error::InvalidGrid(
        "tabulation holds no angle blocks".to_string(),
    ))?;
    let full_radii = &first.radii;
    for slice in rest {
        if slice.radii != *full_radii {
            return Err(Error::InvalidGrid(
                "extended radius axes diverge across angle blocks".to_string(),
            ));
        }
    }

    // Stack the slices with radius as the leading axis.
    let mut tensor = Array2::from_shape_fn((full_radii.len(), extended.len()), |(i, j)| {
        extended[j].values[i]
    });

    let transform = config.transform();
    transform.forward_tensor(&mut tensor);

    let spline = BivariateSpline::fit(
        full_radii,
        &surface.angles(),
        &tensor,
        config.radial_degree,
        config.angular_degree,
    )?;
    let mut values = spline.evaluate(radial.nodes(), angular.nodes())?;
    transform.inverse_tensor(&mut values);

    let metadata = GridMetadata {
        r_start: radial.start(),
        r_end: radial.end(),
        r_count: radial.len(),
        theta_start: angular.nodes()[0],
        theta_end: angular.nodes()[angular.len() - 1],
        theta_count: angular.len(),
    };
    Ok(OutputGrid { values, metadata })
}

/// Read a tabulation from `input`, resample it, and persist the result
/// under `stem` through `writer`.
///
/// The writer is only invoked once the whole pipeline has succeeded, so a
/// failed run leaves no partial artifacts.
pub fn save_potential(
    input: impl AsRef<Path>,
    stem: &str,
    writer: &dyn ArtifactWriter,
    config: &PipelineConfig,
) -> Result<()> {
    let file = File::open(input)?;
    let grid = process(BufReader::new(file), config)?;
    writer.write(stem, &grid)
}
