use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::sequence::SampleSequence;
use crate::error::{Result, SpectrumError};

// ---------------------------------------------------------------------------
// Overlap policy
// ---------------------------------------------------------------------------

/// How the shared region of two windows is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// `[max(firsts), min(lasts)]`, membership inclusive on both ends.
    #[default]
    BoundaryValue,
    /// Left window from its last sample below the right window's first x;
    /// right window up to its first sample beyond the left window's last x.
    /// Asymmetric: expects the left window to start first.
    IndexAnchored,
}

impl OverlapPolicy {
    pub const NAMES: [&'static str; 2] = ["boundary_value", "index_anchored"];
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::BoundaryValue => write!(f, "boundary_value"),
            OverlapPolicy::IndexAnchored => write!(f, "index_anchored"),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "boundary_value" | "boundary" | "r1" => Ok(OverlapPolicy::BoundaryValue),
            "index_anchored" | "anchored" | "r2" => Ok(OverlapPolicy::IndexAnchored),
            other => Err(format!(
                "unknown overlap policy '{other}' (expected one of: {})",
                Self::NAMES.join(", ")
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved overlap
// ---------------------------------------------------------------------------

/// Closed x-interval shared by two windows; `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapInterval {
    pub start: f64,
    pub end: f64,
}

impl OverlapInterval {
    fn between(start: f64, end: f64, left: &SampleSequence, right: &SampleSequence) -> Result<Self> {
        if start > end {
            return Err(no_overlap(left, right));
        }
        if start == end {
            return Err(SpectrumError::DegenerateOverlap { at: start });
        }
        Ok(Self { start, end })
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }
}

/// Index ranges of one window relative to the overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub before: Range<usize>,
    pub inside: Range<usize>,
    pub after: Range<usize>,
}

impl Partition {
    fn by_value(seq: &SampleSequence, interval: &OverlapInterval) -> Self {
        let x = seq.x();
        let lo = x.partition_point(|&v| v < interval.start);
        let hi = x.partition_point(|&v| v <= interval.end);
        Self {
            before: 0..lo,
            inside: lo..hi,
            after: hi..x.len(),
        }
    }
}

/// Output of overlap resolution: the interval plus how each window splits
/// around it.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapSplit {
    pub interval: OverlapInterval,
    pub left: Partition,
    pub right: Partition,
}

/// Locate the overlap of `left` and `right` under `policy`.
pub fn resolve(policy: OverlapPolicy, left: &SampleSequence, right: &SampleSequence) -> Result<OverlapSplit> {
    match policy {
        OverlapPolicy::BoundaryValue => resolve_boundary(left, right),
        OverlapPolicy::IndexAnchored => resolve_anchored(left, right),
    }
}

fn resolve_boundary(left: &SampleSequence, right: &SampleSequence) -> Result<OverlapSplit> {
    let start = left.first_x().max(right.first_x());
    let end = left.last_x().min(right.last_x());
    let interval = OverlapInterval::between(start, end, left, right)?;

    Ok(OverlapSplit {
        left: Partition::by_value(left, &interval),
        right: Partition::by_value(right, &interval),
        interval,
    })
}

fn resolve_anchored(left: &SampleSequence, right: &SampleSequence) -> Result<OverlapSplit> {
    let (lx, rx) = (left.x(), right.x());

    // last index in `left` with x < right.first
    let start_idx = match lx.partition_point(|&v| v < right.first_x()) {
        0 => return Err(no_overlap(left, right)),
        n => n - 1,
    };
    // first index in `right` with x > left.last
    let end_idx = rx.partition_point(|&v| v <= left.last_x());
    if end_idx == 0 || end_idx == rx.len() {
        return Err(no_overlap(left, right));
    }

    let interval = OverlapInterval::between(lx[start_idx], left.last_x(), left, right)?;

    Ok(OverlapSplit {
        interval,
        left: Partition {
            before: 0..start_idx,
            inside: start_idx..lx.len(),
            after: lx.len()..lx.len(),
        },
        right: Partition {
            before: 0..0,
            inside: 0..end_idx,
            after: end_idx..rx.len(),
        },
    })
}

fn no_overlap(left: &SampleSequence, right: &SampleSequence) -> SpectrumError {
    SpectrumError::NoOverlap {
        left_min: left.first_x(),
        left_max: left.last_x(),
        right_min: right.first_x(),
        right_max: right.last_x(),
    }
}
