use thiserror::Error;

// ---------------------------------------------------------------------------
// SpectrumError – everything the stitching core can refuse
// ---------------------------------------------------------------------------

/// Errors raised by normalization, overlap resolution, merging and
/// dark-count subtraction.
///
/// All of them are deterministic: retrying with the same input reproduces
/// the same error, so callers should fix or drop the offending window.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectrumError {
    /// A window had no samples, or no windows were supplied at all.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// The x and y sequences of a window differ in length.
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    /// An x value is NaN or infinite and cannot be ordered.
    #[error("x[{index}] is not finite ({value})")]
    NonFiniteX { index: usize, value: f64 },

    /// Two consecutive windows share no x range under the active policy.
    #[error("windows do not overlap: [{left_min}, {left_max}] vs [{right_min}, {right_max}]")]
    NoOverlap {
        left_min: f64,
        left_max: f64,
        right_min: f64,
        right_max: f64,
    },

    /// The overlap collapsed to a single x value.
    #[error("overlap has zero width at x = {at}")]
    DegenerateOverlap { at: f64 },

    /// Weighted merging needs the same number of overlap samples per side.
    #[error("overlap sample counts differ: {left} on the left, {right} on the right")]
    MergeArity { left: usize, right: usize },

    /// Dark-count matrices differ in shape.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

pub type Result<T> = std::result::Result<T, SpectrumError>;
