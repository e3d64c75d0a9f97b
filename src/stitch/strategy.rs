use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::interp::interp;
use super::overlap::OverlapSplit;
use super::sequence::SampleSequence;
use crate::error::{Result, SpectrumError};

// ---------------------------------------------------------------------------
// MergeStrategy – what happens inside the overlap
// ---------------------------------------------------------------------------

/// Rule for combining two windows inside their overlap.
///
/// Outside the overlap every strategy behaves the same: samples below the
/// overlap and samples above it are copied through unchanged, whichever
/// window they come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Interpolate the right window onto the left window's x samples and
    /// take the mean of both.
    #[default]
    LinearAverage,
    /// Pair overlap samples index by index and blend them with linear
    /// weights across the overlap width. Both sides need the same number of
    /// overlap samples. At the overlap edges one weight is zero, so the
    /// start takes the right window's value and the end the left window's.
    WeightedRamp,
    /// Drop the left window's overlap samples and keep the right window's.
    /// Leaves a visible step at the overlap edges.
    SimpleCut,
}

impl MergeStrategy {
    pub const NAMES: [&'static str; 3] = ["linear_average", "weighted_ramp", "simple_cut"];

    /// Merge two normalized windows around an already resolved overlap.
    ///
    /// Fails with [`SpectrumError::DegenerateOverlap`] if the split's
    /// interval has no positive width.
    pub fn merge(self, left: &SampleSequence, right: &SampleSequence, split: &OverlapSplit) -> Result<SampleSequence> {
        if !(split.interval.width() > 0.0) {
            return Err(SpectrumError::DegenerateOverlap {
                at: split.interval.start,
            });
        }
        let (mid_x, mid_y) = match self {
            MergeStrategy::LinearAverage => linear_average(left, right, split),
            MergeStrategy::WeightedRamp => weighted_ramp(left, right, split)?,
            MergeStrategy::SimpleCut => simple_cut(right, split),
        };

        let capacity = split.left.before.len()
            + split.right.before.len()
            + mid_x.len()
            + split.left.after.len()
            + split.right.after.len();
        let mut x = Vec::with_capacity(capacity);
        let mut y = Vec::with_capacity(capacity);

        // Only the window that starts first has samples before the overlap,
        // and only the one that ends last has samples after it.
        for (seq, range) in [(left, &split.left.before), (right, &split.right.before)] {
            x.extend_from_slice(&seq.x()[range.clone()]);
            y.extend_from_slice(&seq.y()[range.clone()]);
        }
        x.extend(mid_x);
        y.extend(mid_y);
        for (seq, range) in [(left, &split.left.after), (right, &split.right.after)] {
            x.extend_from_slice(&seq.x()[range.clone()]);
            y.extend_from_slice(&seq.y()[range.clone()]);
        }

        SampleSequence::from_parts(x, y)
    }
}

fn linear_average(left: &SampleSequence, right: &SampleSequence, split: &OverlapSplit) -> (Vec<f64>, Vec<f64>) {
    let inside = split.left.inside.clone();
    let x = left.x()[inside.clone()].to_vec();
    let y = x
        .iter()
        .zip(&left.y()[inside])
        .map(|(&xa, &ya)| (ya + interp(xa, right.x(), right.y())) / 2.0)
        .collect();
    (x, y)
}

fn weighted_ramp(left: &SampleSequence, right: &SampleSequence, split: &OverlapSplit) -> Result<(Vec<f64>, Vec<f64>)> {
    let (li, ri) = (split.left.inside.clone(), split.right.inside.clone());
    if li.len() != ri.len() {
        return Err(SpectrumError::MergeArity {
            left: li.len(),
            right: ri.len(),
        });
    }

    let start = split.interval.start;
    let end = split.interval.end;
    let width = split.interval.width();

    let x = left.x()[li.clone()].to_vec();
    let y = left
        .points()
        .skip(li.start)
        .take(li.len())
        .zip(right.points().skip(ri.start).take(ri.len()))
        .map(|((xa, ya), (xb, yb))| {
            let wa = (xa - start) / width;
            let wb = (end - xb) / width;
            let total = wa + wb;
            if total == 0.0 {
                (ya + yb) / 2.0
            } else {
                (ya * wa + yb * wb) / total
            }
        })
        .collect();
    Ok((x, y))
}

fn simple_cut(right: &SampleSequence, split: &OverlapSplit) -> (Vec<f64>, Vec<f64>) {
    let inside = split.right.inside.clone();
    (right.x()[inside.clone()].to_vec(), right.y()[inside].to_vec())
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::LinearAverage => write!(f, "linear_average"),
            MergeStrategy::WeightedRamp => write!(f, "weighted_ramp"),
            MergeStrategy::SimpleCut => write!(f, "simple_cut"),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "linear_average" | "linear" | "average" => Ok(MergeStrategy::LinearAverage),
            "weighted_ramp" | "weighted" | "ramp" => Ok(MergeStrategy::WeightedRamp),
            "simple_cut" | "cut" => Ok(MergeStrategy::SimpleCut),
            other => Err(format!(
                "unknown merge strategy '{other}' (expected one of: {})",
                Self::NAMES.join(", ")
            )),
        }
    }
}
