use log::{debug, warn};

use super::overlap::resolve;
use super::sequence::{RawWindow, SampleSequence};
use crate::config::StitchOptions;
use crate::error::{Result, SpectrumError};

// ---------------------------------------------------------------------------
// StitchPipeline – left-to-right fold over acquisition windows
// ---------------------------------------------------------------------------

/// Accumulates windows into one spectrum.
///
/// Each [`push`](Self::push) merges the new window into the running result.
/// A failed push returns the error and leaves the running result as it was.
#[derive(Debug, Clone)]
pub struct StitchPipeline {
    options: StitchOptions,
    current: Option<SampleSequence>,
    windows: usize,
}

impl StitchPipeline {
    pub fn new(options: StitchOptions) -> Self {
        Self {
            options,
            current: None,
            windows: 0,
        }
    }

    pub fn options(&self) -> StitchOptions {
        self.options
    }

    /// Number of windows merged so far.
    pub fn windows(&self) -> usize {
        self.windows
    }

    /// The stitched spectrum so far, if any window was pushed.
    pub fn current(&self) -> Option<&SampleSequence> {
        self.current.as_ref()
    }

    pub fn push(&mut self, window: SampleSequence) -> Result<()> {
        let next = match &self.current {
            None => window,
            Some(current) => merge_pair(&self.options, current, &window)?,
        };
        self.windows += 1;
        debug!(
            "stitched window {}: {} samples over [{}, {}]",
            self.windows,
            next.len(),
            next.first_x(),
            next.last_x()
        );
        self.current = Some(next);
        Ok(())
    }

    /// Normalize raw samples and push them.
    pub fn push_raw(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        self.push(SampleSequence::normalize(x, y)?)
    }

    /// Combine with another pipeline as if their results were two windows,
    /// `self` on the left. Keeps `self`'s options.
    pub fn merge_with(self, other: StitchPipeline) -> Result<StitchPipeline> {
        let current = match (self.current, other.current) {
            (Some(left), Some(right)) => Some(merge_pair(&self.options, &left, &right)?),
            (left, right) => left.or(right),
        };
        Ok(StitchPipeline {
            options: self.options,
            current,
            windows: self.windows + other.windows,
        })
    }

    pub fn finish(self) -> Result<SampleSequence> {
        self.current
            .ok_or(SpectrumError::EmptyInput("no windows to stitch"))
    }
}

/// Merge two normalized windows under `options`.
///
/// With `allow_gaps`, windows whose x ranges are disjoint are concatenated.
/// Windows that share x values but have no usable overlap under the chosen
/// policy still fail with [`SpectrumError::NoOverlap`].
pub fn merge_pair(options: &StitchOptions, left: &SampleSequence, right: &SampleSequence) -> Result<SampleSequence> {
    match resolve(options.overlap, left, right) {
        Ok(split) => options.strategy.merge(left, right, &split),
        Err(err @ SpectrumError::NoOverlap { .. }) if options.allow_gaps && disjoint(left, right) => {
            warn!("{err}; concatenating");
            concatenate(left, right)
        }
        Err(err) => Err(err),
    }
}

fn disjoint(left: &SampleSequence, right: &SampleSequence) -> bool {
    left.last_x() < right.first_x() || right.last_x() < left.first_x()
}

fn concatenate(left: &SampleSequence, right: &SampleSequence) -> Result<SampleSequence> {
    let x = left.x().iter().chain(right.x()).copied().collect();
    let y = left.y().iter().chain(right.y()).copied().collect();
    SampleSequence::from_parts(x, y)
}

/// Stitch raw windows in acquisition order.
///
/// A single window comes back normalized and otherwise unchanged. Stops at
/// the first failing window.
pub fn stitch<'a, I>(windows: I, options: StitchOptions) -> Result<SampleSequence>
where
    I: IntoIterator<Item = &'a RawWindow>,
{
    let mut pipeline = StitchPipeline::new(options);
    for window in windows {
        pipeline.push(SampleSequence::from_window(window)?)?;
    }
    pipeline.finish()
}
