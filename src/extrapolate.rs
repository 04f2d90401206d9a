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

//! Boundary extrapolation of angular slices.
//!
//! Tabulated surfaces rarely cover the full radial range a simulation
//! needs. Each angular slice is therefore extended on both ends: inward
//! with an accelerating exponential wall capped by a damped plateau, and
//! outward with a vanishing tail. The synthesized radii depend only on
//! the shared tabulated axis, so every slice ends up on the same extended
//! axis and the slices can be stacked into a tensor.

use crate::error::{Error, Result};

/// Multiplicative growth applied to the wall ratio once per inward step.
///
/// Empirical constant; changing it changes the extrapolated surface
/// shape materially.
pub const WALL_GROWTH: f64 = 1.005;

/// Default ceiling for the repulsive wall before clamping sets in.
pub const WALL_CEILING: f64 = 1000.0;

/// Scale of the sub-linear excursion above the ceiling on clamped steps.
pub const PLATEAU_SCALE: f64 = 1000.0;

/// An angle slice on the radius axis extended toward zero and infinity.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtendedSlice {
    /// Strictly increasing extended radius axis.
    pub radii: Vec<f64>,
    /// Potential values, one per extended radius.
    pub values: Vec<f64>,
}

/// Synthesize wall samples below the smallest tabulated radius.
///
/// Walks inward in steps of the innermost tabulated spacing. The seed
/// growth ratio is the one observed between the two innermost samples,
/// inflated by [`WALL_GROWTH`], and itself grows by the same factor each
/// step. Once the running value reaches `ceiling` it is pinned to
/// `ceiling + PLATEAU_SCALE·sqrt(damping)` with the ratio frozen at 1 for
/// that step; the damping counter increments per clamped step and never
/// resets, so the plateau rises sub-linearly. The walk stops before the
/// candidate radius would drop to zero or below, and the result is
/// returned in ascending radius order, ready to prepend.
///
/// Fails with [`Error::DivisionByZero`] when the second innermost value
/// is zero (no growth ratio can be seeded) and with
/// [`Error::InvalidGrid`] when fewer than two samples are tabulated.
pub fn extend_to_zero(
    radii: &[f64],
    values: &[f64],
    ceiling: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if radii.len() < 2 || values.len() < 2 {
        return Err(Error::InvalidGrid(
            "short-range extension needs at least two tabulated samples".to_string(),
        ));
    }
    if values[1] == 0.0 {
        return Err(Error::DivisionByZero(
            "second innermost tabulated value is zero".to_string(),
        ));
    }

    let dr = radii[1] - radii[0];
    let mut ratio = values[0] / values[1] * WALL_GROWTH;
    let mut radius = radii[0] - dr;
    let mut value = values[0] * ratio;
    let mut damping = 0u32;

    let mut wall_radii = Vec::new();
    let mut wall_values = Vec::new();
    while radius > 0.0 {
        if value >= ceiling {
            value = ceiling + PLATEAU_SCALE * f64::from(damping).sqrt();
            damping += 1;
            ratio = 1.0;
        } else {
            ratio *= WALL_GROWTH;
        }
        wall_radii.push(radius);
        wall_values.push(value);
        radius -= dr;
        value *= ratio;
    }

    wall_radii.reverse();
    wall_values.reverse();
    Ok((wall_radii, wall_values))
}

/// Synthesize vanishing tail samples above the largest tabulated radius.
///
/// Walks outward in steps of the outermost tabulated spacing, appending
/// the value `0.0` at each new radius until the axis reaches or exceeds
/// `max_distance`. At least one sample is always produced.
pub fn extend_to_infinity(radii: &[f64], max_distance: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    let (&last, rest) = radii.split_last().ok_or_else(|| {
        Error::InvalidGrid("long-range extension needs at least two tabulated samples".to_string())
    })?;
    let &second_last = rest.last().ok_or_else(|| {
        Error::InvalidGrid("long-range extension needs at least two tabulated samples".to_string())
    })?;

    let dr = last - second_last;
    let mut radius = last + dr;
    let mut tail_radii = vec![radius];
    while radius < max_distance {
        radius += dr;
        tail_radii.push(radius);
    }
    let tail_values = vec![0.0; tail_radii.len()];
    Ok((tail_radii, tail_values))
}

/// Extend one angular slice on both ends of its radius axis.
///
/// The extended axis comes out identical for every slice tabulated on the
/// same radii, which [`crate::pipeline::process`] relies on when stacking
/// slices into the potential tensor.
pub fn extend_slice(
    radii: &[f64],
    values: &[f64],
    ceiling: f64,
    max_distance: f64,
) -> Result<ExtendedSlice> {
    if radii.len() != values.len() {
        return Err(Error::InvalidGrid(format!(
            "slice has {} values for {} radii",
            values.len(),
            radii.len()
        )));
    }

    let (wall_radii, wall_values) = extend_to_zero(radii, values, ceiling)?;
    let (tail_radii, tail_values) = extend_to_infinity(radii, max_distance)?;

    let mut full_radii = wall_radii;
    full_radii.extend_from_slice(radii);
    full_radii.extend(tail_radii);

    let mut full_values = wall_values;
    full_values.extend_from_slice(values);
    full_values.extend(tail_values);

    Ok(ExtendedSlice {
        radii: full_radii,
        values: full_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wall_grows_geometrically_below_ceiling() {
        // Gentle slope so several steps stay below the ceiling.
        let radii = [1.0, 1.1, 1.2];
        let values = [100.0, 80.0, 64.0];
        let (wall_radii, wall_values) = extend_to_zero(&radii, &values, 1000.0).unwrap();

        assert_eq!(wall_radii.len(), wall_values.len());
        // Ascending, strictly positive, strictly below the first tabulated radius.
        for pair in wall_radii.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(wall_radii[0] > 0.0);
        assert!(*wall_radii.last().unwrap() < radii[0]);
        assert_relative_eq!(*wall_radii.last().unwrap(), 0.9, epsilon = 1e-12);

        // First synthesized value continues the observed ratio, inflated.
        let seed_ratio = 100.0 / 80.0 * WALL_GROWTH;
        assert_relative_eq!(*wall_values.last().unwrap(), 100.0 * seed_ratio);
        // Values grow toward zero radius and every one is finite.
        for pair in wall_values.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        assert!(wall_values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_wall_ratio_accelerates() {
        let radii = [1.0, 1.1, 1.2];
        let values = [100.0, 80.0, 64.0];
        let (_, wall_values) = extend_to_zero(&radii, &values, f64::INFINITY).unwrap();

        // Walking inward (reverse of the returned order), consecutive
        // ratios must themselves grow by WALL_GROWTH each step.
        let inward: Vec<f64> = wall_values.iter().rev().copied().collect();
        let mut previous_ratio = inward[0] / 100.0;
        for pair in inward.windows(2) {
            let ratio = pair[1] / pair[0];
            assert_relative_eq!(ratio, previous_ratio * WALL_GROWTH, epsilon = 1e-9);
            previous_ratio = ratio;
        }
    }

    #[test]
    fn test_wall_clamps_to_damped_plateau() {
        // Steep slope: the very first synthesized value exceeds the ceiling.
        let radii = [1.0, 1.25, 1.5];
        let values = [500.0, 50.0, 5.0];
        let (wall_radii, wall_values) = extend_to_zero(&radii, &values, 1000.0).unwrap();

        // Candidates are 0.75, 0.5, 0.25 (0.0 terminates the walk).
        assert_eq!(wall_radii.len(), 3);
        assert_relative_eq!(wall_radii[0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(wall_radii[2], 0.75, epsilon = 1e-12);

        // Inward order: first clamp pins to the bare ceiling, later clamps
        // add the sub-linear sqrt excursion.
        assert_relative_eq!(wall_values[2], 1000.0);
        assert_relative_eq!(wall_values[1], 1000.0 + 1000.0 * 1.0_f64.sqrt());
        assert_relative_eq!(wall_values[0], 1000.0 + 1000.0 * 2.0_f64.sqrt());
    }

    #[test]
    fn test_wall_empty_when_first_step_reaches_zero() {
        // dr equals the first radius, so the only candidate lands exactly
        // on zero and is not emitted.
        let radii = [1.0, 2.0, 3.0];
        let values = [500.0, 50.0, 5.0];
        let (wall_radii, wall_values) = extend_to_zero(&radii, &values, 1000.0).unwrap();
        assert!(wall_radii.is_empty());
        assert!(wall_values.is_empty());
    }

    #[test]
    fn test_wall_rejects_zero_seed() {
        let err = extend_to_zero(&[1.0, 2.0], &[5.0, 0.0], 1000.0).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero(_)));
    }

    #[test]
    fn test_wall_rejects_single_sample() {
        let err = extend_to_zero(&[1.0], &[5.0], 1000.0).unwrap_err();
        assert!(matches!(err, Error::InvalidGrid(_)));
    }

    #[test]
    fn test_tail_reaches_max_distance_with_zero_values() {
        let radii = [1.0, 2.0, 3.0];
        let (tail_radii, tail_values) = extend_to_infinity(&radii, 10.0).unwrap();

        assert!(tail_radii[0] > 3.0);
        assert_relative_eq!(tail_radii[0], 4.0);
        assert!(*tail_radii.last().unwrap() >= 10.0);
        for pair in tail_radii.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(tail_values.iter().all(|&v| v == 0.0));
        assert_eq!(tail_radii.len(), tail_values.len());
    }

    #[test]
    fn test_tail_always_produces_one_sample() {
        // max_distance already inside the tabulated range.
        let (tail_radii, tail_values) = extend_to_infinity(&[1.0, 2.0, 3.0], 2.0).unwrap();
        assert_eq!(tail_radii, vec![4.0]);
        assert_eq!(tail_values, vec![0.0]);
    }

    #[test]
    fn test_extended_slice_is_ordered_and_consistent() {
        let radii = [1.0, 1.25, 1.5];
        let values = [500.0, 50.0, 5.0];
        let slice = extend_slice(&radii, &values, 1000.0, 5.0).unwrap();

        assert_eq!(slice.radii.len(), slice.values.len());
        for pair in slice.radii.windows(2) {
            assert!(pair[0] < pair[1], "axis must stay strictly increasing");
        }
        // Original samples survive untouched in the middle.
        let offset = slice.radii.iter().position(|&r| r == 1.0).unwrap();
        assert_eq!(&slice.values[offset..offset + 3], &values);
        assert!(*slice.radii.last().unwrap() >= 5.0);
        assert_eq!(*slice.values.last().unwrap(), 0.0);
    }

    #[test]
    fn test_extended_axis_identical_across_slices() {
        let radii = [1.0, 1.25, 1.5];
        let first = extend_slice(&radii, &[500.0, 50.0, 5.0], 1000.0, 5.0).unwrap();
        let second = extend_slice(&radii, &[400.0, 40.0, 4.0], 1000.0, 5.0).unwrap();
        assert_eq!(first.radii, second.radii);
    }

    #[test]
    fn test_extend_slice_rejects_length_mismatch() {
        let err = extend_slice(&[1.0, 2.0, 3.0], &[1.0, 2.0], 1000.0, 5.0).unwrap_err();
        assert!(matches!(err, Error::InvalidGrid(_)));
    }
}
