use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::config::RunConfig;
use crate::data::group::{group_by, order_by, single_group};
use crate::data::model::{MetadataValue, WindowSet};
use crate::stitch::StitchPipeline;

// ---------------------------------------------------------------------------
// Stitch run – a loaded window file through the pipeline
// ---------------------------------------------------------------------------

/// One stitched acquisition run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StitchedRun {
    /// Value of the grouping column, `null` when not grouping.
    pub group: MetadataValue,
    /// Number of windows folded into this spectrum.
    pub windows: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Stitch every run in `set` according to `config`.
///
/// Runs come back sorted by group value. The first failing window aborts
/// the whole call; the error names its group and file position.
pub fn stitch_runs(set: &WindowSet, config: &RunConfig) -> Result<Vec<StitchedRun>> {
    let groups = match config.group_by.as_deref() {
        Some(col) => {
            if !set.has_column(col) {
                warn!("grouping column '{col}' not found; all windows form one run");
            }
            group_by(set, col)
        }
        None => single_group(set),
    };
    if groups.is_empty() {
        anyhow::bail!("no windows to stitch");
    }

    let mut runs = Vec::with_capacity(groups.len());
    for (group, mut indices) in groups {
        if let Some(col) = config.order_by.as_deref() {
            if !set.has_column(col) {
                warn!("ordering column '{col}' not found; keeping file order");
            }
            order_by(set, &mut indices, col);
        }

        let mut pipeline = StitchPipeline::new(config.stitch);
        for &i in &indices {
            let window = &set.windows[i];
            window
                .to_sequence()
                .and_then(|seq| pipeline.push(seq))
                .with_context(|| format!("stitching window {i} of group {group}"))?;
        }

        let spectrum = pipeline.finish().with_context(|| format!("group {group}"))?;
        info!(
            "group {group}: {} windows → {} samples over [{}, {}]",
            indices.len(),
            spectrum.len(),
            spectrum.first_x(),
            spectrum.last_x()
        );
        let (x, y) = spectrum.into_parts();
        runs.push(StitchedRun {
            group,
            windows: indices.len(),
            x,
            y,
        });
    }
    Ok(runs)
}
