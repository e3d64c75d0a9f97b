use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::stitch::{MergeStrategy, OverlapPolicy};

// ---------------------------------------------------------------------------
// Stitch options – what a pipeline is built with
// ---------------------------------------------------------------------------

/// Knobs for one stitching run. Every field has a default so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchOptions {
    pub strategy: MergeStrategy,
    pub overlap: OverlapPolicy,
    /// Concatenate windows that do not overlap instead of failing.
    pub allow_gaps: bool,
}

// ---------------------------------------------------------------------------
// Run configuration – options plus how to read the input file
// ---------------------------------------------------------------------------

/// Names of the sample columns in window files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub x: String,
    pub y: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            x: "x".to_string(),
            y: "y".to_string(),
        }
    }
}

/// Everything the `stitch` command needs besides the input path.
///
/// ```json
/// {
///   "stitch": { "strategy": "weighted_ramp", "overlap": "boundary_value" },
///   "columns": { "x": "wavelength", "y": "counts" },
///   "group_by": "run",
///   "order_by": "center"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub stitch: StitchOptions,
    pub columns: ColumnNames,
    /// Metadata column separating independent acquisition runs.
    pub group_by: Option<String>,
    /// Metadata column giving acquisition order within a run.
    pub order_by: Option<String>,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
