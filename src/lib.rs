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

//! # Potgrid
//!
//! A library for resampling sparsely tabulated potential-energy surfaces
//! onto dense, regular (radius × angle) grids for downstream simulation.
//!
//! The input is a plain-text tabulation with one block of
//! (radius, potential) samples per polar angle. Each angular slice is
//! extrapolated toward zero distance (repulsive wall) and toward infinite
//! distance (vanishing tail), the extended tensor is fitted with an exact
//! tensor-product B-spline, and the fit is evaluated at a uniform radial
//! grid crossed with Gauss–Legendre derived polar angles.
//!
//! Examples:
//! ```
//! use potgrid::{AngularGrid, RadialGrid};
//!
//! let radial = RadialGrid::new(0.5, 10.0, 20)?;
//! assert_eq!(radial.step(), 0.5);
//!
//! let angular = AngularGrid::gauss_legendre(16);
//! assert!(angular.nodes().windows(2).all(|pair| pair[0] < pair[1]));
//! # Ok::<(), potgrid::Error>(())
//! ```

#[cfg(test)]
extern crate approx;

mod error;
pub mod extrapolate;
pub mod grid;
pub mod output;
pub mod pipeline;
pub mod spline;
pub mod surface;
pub mod transform;

pub use error::{Error, Result};
pub use grid::{AngularGrid, RadialGrid};
pub use output::{ArtifactWriter, GridMetadata, NpyWriter, OutputGrid};
pub use pipeline::{process, save_potential, PipelineConfig};
pub use spline::BivariateSpline;
pub use surface::{AngleSlice, TabulatedSurface};
pub use transform::ValueTransform;
