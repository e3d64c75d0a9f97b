use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectrumError};

// ---------------------------------------------------------------------------
// SampleSequence – one normalized window or stitched spectrum
// ---------------------------------------------------------------------------

/// Paired x/y samples sorted ascending by x.
///
/// Only [`SampleSequence::normalize`] and the merge code build values of
/// this type, so `x` is always non-decreasing and `x.len() == y.len() >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSequence {
    x: Vec<f64>,
    y: Vec<f64>,
}

/// Raw acquisition window as delivered by the device layer: equal-length
/// x/y arrays, not necessarily sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawWindow {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl RawWindow {
    /// Build a window from `(x, y)` points.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let (x, y) = points.iter().copied().unzip();
        Self { x, y }
    }
}

impl SampleSequence {
    /// Sort raw samples by x, carrying each y along with its x.
    ///
    /// The sort is stable: samples with equal x keep their input order.
    pub fn normalize(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.is_empty() || y.is_empty() {
            return Err(SpectrumError::EmptyInput("window has no samples"));
        }
        if x.len() != y.len() {
            return Err(SpectrumError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if let Some((index, &value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SpectrumError::NonFiniteX { index, value });
        }

        let mut order: Vec<usize> = (0..x.len()).collect();
        order.sort_by(|&i, &j| x[i].total_cmp(&x[j]));

        Ok(Self {
            x: order.iter().map(|&i| x[i]).collect(),
            y: order.iter().map(|&i| y[i]).collect(),
        })
    }

    pub fn from_window(window: &RawWindow) -> Result<Self> {
        Self::normalize(&window.x, &window.y)
    }

    /// Assemble merge output. Re-sorts (stably) if concatenation left the
    /// x axis out of order.
    pub(crate) fn from_parts(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if is_ascending(&x) && x.len() == y.len() && !x.is_empty() {
            return Ok(Self { x, y });
        }
        Self::normalize(&x, &y)
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn first_x(&self) -> f64 {
        self.x[0]
    }

    pub fn last_x(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    /// Iterate `(x, y)` pairs in ascending x order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }
}

pub(crate) fn is_ascending(x: &[f64]) -> bool {
    x.windows(2).all(|w| w[0] <= w[1])
}
