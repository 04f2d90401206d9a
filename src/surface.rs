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

//! Parser for angle-blocked surface tabulations.
//!
//! The source is plain text: a line starting with `# theta =` opens a new
//! angle block with the angle given in degrees after the `=` sign, any
//! other line starting with `#` is a comment, and every remaining
//! non-blank line carries two whitespace-separated fields, radius and
//! potential value, belonging to the current block. The radius axis is
//! captured from the first block; every later block must tabulate the
//! same number of samples.

use crate::error::{Error, Result};
use std::io::BufRead;

/// Line prefix that opens a new angle block.
const ANGLE_MARKER: &str = "# theta =";

/// One tabulated polar cut: the angle (radians) and its potential values
/// on the shared radius axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleSlice {
    /// Polar angle in radians.
    pub angle: f64,
    /// Potential values, one per radius of [`TabulatedSurface::radii`].
    pub values: Vec<f64>,
}

/// A fully parsed tabulation: the shared radius axis plus one value slice
/// per angle, in source order.
#[derive(Clone, Debug, PartialEq)]
pub struct TabulatedSurface {
    radii: Vec<f64>,
    slices: Vec<AngleSlice>,
}

/// Accumulates one angle block until the next marker or end of input.
struct BlockBuilder {
    angle: f64,
    values: Vec<f64>,
}

impl BlockBuilder {
    fn new(angle: f64) -> Self {
        Self {
            angle,
            values: Vec::new(),
        }
    }

    fn finish(self, radii: &[f64], line: usize) -> Result<AngleSlice> {
        if self.values.len() != radii.len() {
            return Err(Error::MalformedInput {
                line,
                reason: format!(
                    "angle block has {} samples but the radius axis has {}",
                    self.values.len(),
                    radii.len()
                ),
            });
        }
        Ok(AngleSlice {
            angle: self.angle,
            values: self.values,
        })
    }
}

impl TabulatedSurface {
    /// Parse a tabulated surface from a buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut radii: Vec<f64> = Vec::new();
        let mut slices: Vec<AngleSlice> = Vec::new();
        let mut current: Option<BlockBuilder> = None;
        let mut line_no = 0;

        for line in reader.lines() {
            let line = line?;
            line_no += 1;

            if let Some(rest) = line.strip_prefix(ANGLE_MARKER) {
                if let Some(block) = current.take() {
                    slices.push(block.finish(&radii, line_no)?);
                }
                let degrees: f64 = rest.trim().parse().map_err(|_| Error::MalformedInput {
                    line: line_no,
                    reason: format!("cannot parse angle value {:?}", rest.trim()),
                })?;
                current = Some(BlockBuilder::new(degrees.to_radians()));
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let block = current.as_mut().ok_or_else(|| Error::MalformedInput {
                line: line_no,
                reason: "data line before any `# theta =` marker".to_string(),
            })?;
            let (radius, value) = parse_sample(trimmed, line_no)?;

            // The first block defines the radius axis; later blocks are
            // only length-checked when they finish.
            if slices.is_empty() {
                if let Some(&previous) = radii.last() {
                    if radius <= previous {
                        return Err(Error::MalformedInput {
                            line: line_no,
                            reason: format!(
                                "radius {radius} does not increase past {previous}"
                            ),
                        });
                    }
                }
                radii.push(radius);
            }
            block.values.push(value);
        }

        match current {
            Some(block) => slices.push(block.finish(&radii, line_no)?),
            None => {
                return Err(Error::MalformedInput {
                    line: line_no,
                    reason: "no `# theta =` angle blocks found".to_string(),
                })
            }
        }

        Ok(Self { radii, slices })
    }

    /// Parse a tabulated surface held in memory.
    pub fn parse_str(source: &str) -> Result<Self> {
        Self::from_reader(source.as_bytes())
    }

    /// Shared radius axis, as tabulated in the first angle block.
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Angle slices in source order.
    pub fn slices(&self) -> &[AngleSlice] {
        &self.slices
    }

    /// Angles in radians, in source order.
    pub fn angles(&self) -> Vec<f64> {
        self.slices.iter().map(|slice| slice.angle).collect()
    }
}

/// Split a data line into its (radius, value) fields.
fn parse_sample(line: &str, line_no: usize) -> Result<(f64, f64)> {
    let mut fields = line.split_whitespace();
    let radius = parse_field(fields.next(), line, line_no)?;
    let value = parse_field(fields.next(), line, line_no)?;
    Ok((radius, value))
}

fn parse_field(field: Option<&str>, line: &str, line_no: usize) -> Result<f64> {
    field
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| Error::MalformedInput {
            line: line_no,
            reason: format!("expected two numeric fields, got {line:?}"),
        })
}
