use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::stitch::SampleSequence;

// ---------------------------------------------------------------------------
// MetadataValue – one cell of a per-window metadata column
// ---------------------------------------------------------------------------

/// Dynamically typed metadata (scan center, run id, exposure, ...).
///
/// Totally ordered so it can key `BTreeMap`s and drive sorting:
/// `Null < Bool < Integer < Float < String`, floats by `total_cmp`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl MetadataValue {
    fn rank(&self) -> u8 {
        match self {
            MetadataValue::Null => 0,
            MetadataValue::Bool(_) => 1,
            MetadataValue::Integer(_) => 2,
            MetadataValue::Float(_) => 3,
            MetadataValue::String(_) => 4,
        }
    }

    /// Numeric view, for ordering windows by a center wavelength that may
    /// be stored as either integer or float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl Eq for MetadataValue {}

impl PartialOrd for MetadataValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MetadataValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use MetadataValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Window – one acquired scan segment as read from disk
// ---------------------------------------------------------------------------

/// One acquisition window: raw samples plus whatever metadata the file
/// carried alongside them.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// Wavelength axis, in acquisition order (not necessarily sorted).
    pub x: Vec<f64>,
    /// Intensity, same length as `x`.
    pub y: Vec<f64>,
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl Window {
    pub fn to_sequence(&self) -> Result<SampleSequence> {
        SampleSequence::normalize(&self.x, &self.y)
    }

    /// Metadata value for `column`, `Null` when the window lacks it.
    pub fn meta(&self, column: &str) -> &MetadataValue {
        const NULL: &MetadataValue = &MetadataValue::Null;
        self.metadata.get(column).unwrap_or(NULL)
    }
}

// ---------------------------------------------------------------------------
// WindowSet – every window of a loaded file
// ---------------------------------------------------------------------------

/// Loaded windows in file order, with a column index over their metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSet {
    pub windows: Vec<Window>,
    /// Sorted metadata column names (x/y excluded).
    pub column_names: Vec<String>,
    /// Unique values seen per metadata column.
    pub unique_values: BTreeMap<String, BTreeSet<MetadataValue>>,
}

impl WindowSet {
    pub fn from_windows(windows: Vec<Window>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<MetadataValue>> = BTreeMap::new();
        for window in &windows {
            for (col, val) in &window.metadata {
                unique_values.entry(col.clone()).or_default().insert(val.clone());
            }
        }
        let column_names = unique_values.keys().cloned().collect();
        WindowSet {
            windows,
            column_names,
            unique_values,
        }
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.unique_values.contains_key(column)
    }
}
