use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectrumError};

// ---------------------------------------------------------------------------
// IntensityMatrix – one row per detector region of interest
// ---------------------------------------------------------------------------

/// Intensity traces, one row per ROI. Rows may differ in length from each
/// other; subtraction only requires the two operands to agree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntensityMatrix {
    rows: Vec<Vec<f64>>,
}

impl IntensityMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Row lengths, in row order.
    pub fn shape(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }
}

/// Remove the dark-count baseline from `signal`, element by element.
pub fn subtract(signal: &IntensityMatrix, dark: &IntensityMatrix) -> Result<IntensityMatrix> {
    if signal.rows.len() != dark.rows.len() {
        return Err(SpectrumError::ShapeMismatch(format!(
            "signal has {} rows, dark has {}",
            signal.rows.len(),
            dark.rows.len()
        )));
    }

    signal
        .rows
        .iter()
        .zip(&dark.rows)
        .enumerate()
        .map(|(i, (s, d))| {
            if s.len() != d.len() {
                return Err(SpectrumError::ShapeMismatch(format!(
                    "row {i}: signal has {} values, dark has {}",
                    s.len(),
                    d.len()
                )));
            }
            Ok(s.iter().zip(d).map(|(a, b)| a - b).collect::<Vec<f64>>())
        })
        .collect::<Result<Vec<Vec<f64>>>>()
        .map(IntensityMatrix::from_rows)
}
