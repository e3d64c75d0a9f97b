use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{MetadataValue, Window, WindowSet};
use crate::config::ColumnNames;
use crate::dark::IntensityMatrix;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load acquisition windows from a file, dispatching on extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – list columns for x and y, scalar metadata columns
/// * `.json`    – `[{ "x": [...], "y": [...], ...meta }, ...]`
/// * `.csv`     – x and y cells hold semicolon-separated floats
///
/// Windows come back in file order, which is taken as acquisition order.
pub fn load_windows(path: &Path, columns: &ColumnNames) -> Result<WindowSet> {
    let set = match extension(path).as_str() {
        "parquet" | "pq" => load_parquet(path, columns),
        "json" => load_json(path, columns),
        "csv" => load_csv(path, columns),
        other => bail!("Unsupported window file extension: .{other}"),
    }
    .with_context(|| format!("loading windows from {}", path.display()))?;

    info!(
        "loaded {} windows from {} (metadata: {:?})",
        set.len(),
        path.display(),
        set.column_names
    );
    Ok(set)
}

/// Load an intensity matrix (one row per ROI) from a JSON array of arrays.
pub fn load_matrix(path: &Path) -> Result<IntensityMatrix> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading matrix {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing matrix {}", path.display()))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn check_lengths(x: &[f64], y: &[f64], row: usize) -> Result<()> {
    if x.len() != y.len() {
        bail!("Window {row}: x has {} values but y has {}", x.len(), y.len());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, one object per window:
///
/// ```json
/// [
///   { "x": [500.0, 500.5, ...], "y": [12.0, 13.5, ...], "center": 510.0, "run": 1 },
///   ...
/// ]
/// ```
fn load_json(path: &Path, columns: &ColumnNames) -> Result<WindowSet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut windows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Window {i} is not a JSON object"))?;

        let x = json_floats(obj.get(&columns.x), i, &columns.x)?;
        let y = json_floats(obj.get(&columns.y), i, &columns.y)?;
        check_lengths(&x, &y, i)?;

        let metadata = obj
            .iter()
            .filter(|(key, _)| **key != columns.x && **key != columns.y)
            .map(|(key, val)| (key.clone(), json_to_metadata(val)))
            .collect();

        windows.push(Window { x, y, metadata });
    }

    Ok(WindowSet::from_windows(windows))
}

fn json_floats(val: Option<&JsonValue>, row: usize, col: &str) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .with_context(|| format!("Window {row}: missing or invalid '{col}' array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .with_context(|| format!("Window {row}, {col}[{j}]: not a number"))
        })
        .collect()
}

fn json_to_metadata(val: &JsonValue) -> MetadataValue {
    match val {
        JsonValue::String(s) => MetadataValue::String(s.clone()),
        JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => MetadataValue::Integer(i),
            (None, Some(f)) => MetadataValue::Float(f),
            _ => MetadataValue::String(n.to_string()),
        },
        JsonValue::Bool(b) => MetadataValue::Bool(*b),
        JsonValue::Null => MetadataValue::Null,
        other => MetadataValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One window per row after the header. The x and y cells hold
/// semicolon-separated floats (`"500.0;500.5;501.0"`); every other column
/// is metadata.
fn load_csv(path: &Path, columns: &ColumnNames) -> Result<WindowSet> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let x_idx = find(&columns.x)?;
    let y_idx = find(&columns.y)?;

    let mut windows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row}"))?;

        let x = semicolon_floats(record.get(x_idx).unwrap_or(""), row, &columns.x)?;
        let y = semicolon_floats(record.get(y_idx).unwrap_or(""), row, &columns.y)?;
        check_lengths(&x, &y, row)?;

        let metadata = record
            .iter()
            .zip(headers.iter())
            .enumerate()
            .filter(|(col, _)| *col != x_idx && *col != y_idx)
            .map(|(_, (value, name))| (name.to_string(), guess_metadata_type(value)))
            .collect();

        windows.push(Window { x, y, metadata });
    }

    Ok(WindowSet::from_windows(windows))
}

fn semicolon_floats(s: &str, row: usize, col: &str) -> Result<Vec<f64>> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(';')
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<f64>()
                .with_context(|| format!("Row {row}, {col}[{j}]: '{tok}' is not a number"))
        })
        .collect()
}

fn guess_metadata_type(s: &str) -> MetadataValue {
    if s.is_empty() {
        return MetadataValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return MetadataValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return MetadataValue::Float(f);
    }
    match s {
        "true" => MetadataValue::Bool(true),
        "false" => MetadataValue::Bool(false),
        _ => MetadataValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Parquet with one window per row:
/// - x / y: `List<Float64|Float32>` or `LargeList<..>`
/// - any other column: scalar metadata
fn load_parquet(path: &Path, columns: &ColumnNames) -> Result<WindowSet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?
        .build()
        .context("building parquet reader")?;

    let mut windows = Vec::new();
    for batch in reader {
        let batch = batch.context("reading parquet record batch")?;
        let schema = batch.schema();

        let x_idx = schema
            .index_of(&columns.x)
            .map_err(|_| anyhow!("Parquet file missing '{}' column", columns.x))?;
        let y_idx = schema
            .index_of(&columns.y)
            .map_err(|_| anyhow!("Parquet file missing '{}' column", columns.y))?;

        let meta_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != x_idx && *i != y_idx)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..batch.num_rows() {
            let n = windows.len();
            let x = float_list(batch.column(x_idx), row)
                .with_context(|| format!("Window {n}: failed to read '{}'", columns.x))?;
            let y = float_list(batch.column(y_idx), row)
                .with_context(|| format!("Window {n}: failed to read '{}'", columns.y))?;
            check_lengths(&x, &y, n)?;

            let mut metadata = BTreeMap::new();
            for (col_idx, name) in &meta_cols {
                let value = scalar_metadata(batch.column(*col_idx), row)
                    .with_context(|| format!("Window {n}: failed to read '{name}'"))?;
                metadata.insert(name.clone(), value);
            }

            windows.push(Window { x, y, metadata });
        }
    }

    Ok(WindowSet::from_windows(windows))
}

/// Read a `Vec<f64>` out of a List / LargeList column. Null list items
/// become NaN, which normalization later rejects for x.
fn float_list(col: &ArrayRef, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values = if let Some(list) = col.as_list_opt::<i32>() {
        list.value(row)
    } else if let Some(list) = col.as_list_opt::<i64>() {
        list.value(row)
    } else {
        bail!("Expected List or LargeList column, got {:?}", col.data_type());
    };

    if let Some(arr) = values.as_primitive_opt::<Float64Type>() {
        Ok(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(arr) = values.as_primitive_opt::<Float32Type>() {
        Ok(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)).collect())
    } else {
        bail!(
            "List inner type is {:?}, expected Float64 or Float32",
            values.data_type()
        )
    }
}

fn scalar_metadata(col: &ArrayRef, row: usize) -> Result<MetadataValue> {
    if col.is_null(row) {
        return Ok(MetadataValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => MetadataValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => MetadataValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => MetadataValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => MetadataValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => MetadataValue::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => MetadataValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => MetadataValue::Bool(col.as_boolean().value(row)),
        other => bail!("unsupported metadata column type {other:?}"),
    };
    Ok(value)
}
