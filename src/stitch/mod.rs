//! Stitching core: pure functions from acquisition windows to one spectrum.
//!
//! ```text
//!   RawWindow ×N
//!        │  normalize (stable sort by x)
//!        ▼
//!   SampleSequence ──┐
//!        │           │ overlap::resolve  (BoundaryValue | IndexAnchored)
//!        ▼           ▼
//!   ┌──────────┐  OverlapSplit
//!   │ pipeline │◄────┘
//!   └──────────┘  strategy::merge (LinearAverage | WeightedRamp | SimpleCut)
//!        │
//!        ▼
//!   SampleSequence (stitched)
//! ```

pub mod interp;
pub mod overlap;
pub mod pipeline;
pub mod sequence;
pub mod strategy;

pub use overlap::{OverlapInterval, OverlapPolicy, OverlapSplit, Partition};
pub use pipeline::{merge_pair, stitch, StitchPipeline};
pub use sequence::{RawWindow, SampleSequence};
pub use strategy::MergeStrategy;
