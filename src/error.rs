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

//! Crate-wide error type. All failures are fatal to a pipeline run;
//! data-quality problems surface immediately instead of producing a
//! silently corrupted surface.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while resampling a tabulated surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Grid or spline parameters that cannot produce a valid axis.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Structurally invalid or unparsable tabulated source data.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// Degenerate seed data for the short-range extrapolation.
    #[error("degenerate extrapolation seed: {0}")]
    DivisionByZero(String),

    /// A variable transform supplied without its counterpart.
    #[error("transform configuration: {0}")]
    Configuration(String),

    /// Evaluation point outside the fitted interpolant's support.
    #[error("point {point} lies outside the fitted domain [{min}, {max}]")]
    OutOfDomain { point: f64, min: f64, max: f64 },

    /// Reading the tabulated source failed.
    #[error("failed to read surface tabulation")]
    Io(#[from] std::io::Error),

    /// Writing an output artifact failed.
    #[error("failed to write output artifact")]
    Artifact(#[from] ndarray_npy::WriteNpyError),
}
