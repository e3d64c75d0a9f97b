//! Data layer: window files in, grouped and ordered windows out.
//!
//! ```text
//!  .parquet / .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → WindowSet
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ WindowSet │  Vec<Window>, metadata column index
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  group   │  split runs, order by scan center → index lists
//!   └──────────┘
//! ```

pub mod group;
pub mod loader;
pub mod model;
