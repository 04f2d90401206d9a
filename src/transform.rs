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

//! Variable transform applied around the spline fit.
//!
//! Some surfaces vary as the square of a smoother underlying quantity
//! near a symmetric geometry (the "gamma" case). Fitting the square root
//! and squaring the evaluated grid afterwards gives the spline a better
//! conditioned target. The transform is a tagged pair so that a forward
//! map without its inverse is unrepresentable once constructed.

use crate::error::{Error, Result};
use ndarray::Array2;

/// Unary numeric map applied elementwise around the fit.
pub type ValueMap = fn(f64) -> f64;

/// Optional forward/inverse pair bracketing the interpolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValueTransform {
    /// Values are fitted and returned as-is.
    Identity,
    /// `forward` is applied before fitting, `inverse` after evaluation.
    Custom { forward: ValueMap, inverse: ValueMap },
}

impl Default for ValueTransform {
    fn default() -> Self {
        Self::Identity
    }
}

fn square(x: f64) -> f64 {
    x * x
}

impl ValueTransform {
    /// The sqrt/square pair used for gamma-type surfaces.
    pub fn gamma() -> Self {
        Self::Custom {
            forward: f64::sqrt,
            inverse: square,
        }
    }

    /// Build a transform from an optional pair of maps.
    ///
    /// A half-specified pair is a configuration fault and is rejected
    /// before any fitting work begins.
    pub fn from_parts(forward: Option<ValueMap>, inverse: Option<ValueMap>) -> Result<Self> {
        match (forward, inverse) {
            (None, None) => Ok(Self::Identity),
            (Some(forward), Some(inverse)) => Ok(Self::Custom { forward, inverse }),
            (Some(_), None) => Err(Error::Configuration(
                "forward transform supplied without an inverse".to_string(),
            )),
            (None, Some(_)) => Err(Error::Configuration(
                "inverse transform supplied without a forward".to_string(),
            )),
        }
    }

    /// Apply the forward map to one value.
    pub fn forward(&self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Custom { forward, .. } => forward(x),
        }
    }

    /// Apply the inverse map to one value.
    pub fn inverse(&self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Custom { inverse, .. } => inverse(x),
        }
    }

    /// Apply the forward map over a tensor in place.
    pub fn forward_tensor(&self, tensor: &mut Array2<f64>) {
        if let Self::Custom { forward, .. } = self {
            tensor.mapv_inplace(forward);
        }
    }

    /// Apply the inverse map over a tensor in place.
    pub fn inverse_tensor(&self, tensor: &mut Array2<f64>) {
        if let Self::Custom { inverse, .. } = self {
            tensor.mapv_inplace(inverse);
        }
    }
}
