//! Stitch overlapping spectral scan windows into one continuous spectrum,
//! and subtract dark counts from ROI intensity matrices.
//!
//! ```
//! use rusty_stitch::config::StitchOptions;
//! use rusty_stitch::stitch::{stitch, RawWindow};
//!
//! let windows = [
//!     RawWindow::from_points(&[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0)]),
//!     RawWindow::from_points(&[(2.0, 10.0), (3.0, 11.0), (4.0, 12.0)]),
//! ];
//! let spectrum = stitch(&windows, StitchOptions::default())?;
//! assert_eq!(spectrum.y(), &[5.0, 8.0, 9.0, 12.0]);
//! # Ok::<(), rusty_stitch::SpectrumError>(())
//! ```

pub mod config;
pub mod dark;
pub mod data;
pub mod error;
pub mod run;
pub mod stitch;

pub use error::SpectrumError;
