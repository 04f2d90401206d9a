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

//! Target sampling grids: a uniform radial axis and a Gauss–Legendre
//! derived polar axis.

use crate::error::{Error, Result};
use gauss_quad::GaussLegendre;

/// Uniformly spaced radial axis defined by its bounds and node count.
///
/// Nodes are strictly increasing with constant step
/// `(end - start) / (count - 1)`; the first node equals `start` and the
/// last equals `end`.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGrid {
    nodes: Vec<f64>,
    start: f64,
    end: f64,
    step: f64,
}

impl RadialGrid {
    /// Create a uniform radial grid over `[start, end]` with `count` nodes.
    pub fn new(start: f64, end: f64, count: usize) -> Result<Self> {
        if count < 2 {
            return Err(Error::InvalidGrid(format!(
                "radial grid needs at least two nodes, got {count}"
            )));
        }
        if end <= start {
            return Err(Error::InvalidGrid(format!(
                "radial grid end ({end}) must exceed start ({start})"
            )));
        }
        let step = (end - start) / (count as f64 - 1.0);
        let nodes = (0..count).map(|i| start + step * i as f64).collect();
        Ok(Self {
            nodes,
            start,
            end,
            step,
        })
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Constant spacing between neighbouring nodes.
    pub fn step(&self) -> f64 {
        self.step
    }
}

/// Polar angles derived from a Gauss–Legendre quadrature rule.
///
/// The quadrature samples the angular coordinate optimally for later
/// Legendre expansion; here the rule is used purely as a non-uniform
/// angular sampling scheme.
#[derive(Clone, Debug, PartialEq)]
pub struct AngularGrid {
    nodes: Vec<f64>,
}

impl AngularGrid {
    /// Angles of the `count`-point Gauss–Legendre rule.
    ///
    /// Each node `x` on [-1, 1] maps to `arccos(x)`, and the sequence is
    /// reversed so the angles ascend over [0, π]. `count` must be positive.
    pub fn gauss_legendre(count: usize) -> Self {
        let rule = GaussLegendre::init(count);
        let mut nodes = rule.nodes;
        nodes.sort_by(f64::total_cmp);
        let mut angles: Vec<f64> = nodes.into_iter().map(f64::acos).collect();
        angles.reverse();
        Self { nodes: angles }
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
