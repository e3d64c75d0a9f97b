use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{Array, Float32Builder, Float64Array, Float64Builder, LargeListBuilder, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use rusty_stitch::config::{ColumnNames, RunConfig};
use rusty_stitch::data::loader::{load_matrix, load_windows};
use rusty_stitch::data::model::MetadataValue;
use rusty_stitch::dark;
use rusty_stitch::run::stitch_runs;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn json_windows_load_and_stitch() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "scan.json",
        r#"[
            {"x": [3, 2, 4], "y": [11, 10, 12], "center": 3.0, "run": "a"},
            {"x": [1, 2, 3], "y": [5, 6, 7], "center": 2, "run": "a"}
        ]"#,
    );

    let set = load_windows(&path, &ColumnNames::default()).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.column_names, vec!["center".to_string(), "run".to_string()]);
    assert_eq!(set.windows[1].meta("center"), &MetadataValue::Integer(2));

    let config = RunConfig {
        order_by: Some("center".into()),
        ..RunConfig::default()
    };
    let runs = stitch_runs(&set, &config).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].x, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(runs[0].y, vec![5.0, 8.0, 9.0, 12.0]);
}

#[test]
fn json_rejects_mismatched_lengths() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "bad.json", r#"[{"x": [1, 2], "y": [1]}]"#);
    let err = load_windows(&path, &ColumnNames::default()).unwrap_err();
    assert!(format!("{err:#}").contains("x has 2 values but y has 1"));
}

#[test]
fn csv_windows_with_custom_columns() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "scan.csv",
        "wavelength,counts,run,center\n\
         1;2;3,5;6;7,1,2.0\n\
         2;3;4,7;8;9,1,3.0\n\
         3;4;5,10;11;12,1,4.0\n\
         4;5;6,13;14;15,1,5.0\n",
    );
    let columns = ColumnNames {
        x: "wavelength".into(),
        y: "counts".into(),
    };

    let set = load_windows(&path, &columns).unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.windows[0].meta("run"), &MetadataValue::Integer(1));

    let config = RunConfig {
        columns,
        group_by: Some("run".into()),
        ..RunConfig::default()
    };
    let runs = stitch_runs(&set, &config).unwrap();
    assert_eq!(runs[0].group, MetadataValue::Integer(1));
    assert_eq!(runs[0].y, vec![5.0, 6.5, 8.75, 11.5, 13.0, 15.0]);
}

#[test]
fn csv_without_x_column_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "scan.csv", "lambda,y\n1;2,3;4\n");
    let err = load_windows(&path, &ColumnNames::default()).unwrap_err();
    assert!(format!("{err:#}").contains("CSV missing 'x' column"));
}

#[test]
fn unknown_extension_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "scan.txt", "");
    assert!(load_windows(&path, &ColumnNames::default()).is_err());
}

#[test]
fn parquet_windows_load_list_and_large_list_columns() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("scan.parquet");

    let mut x_builder = ListBuilder::new(Float64Builder::new());
    for row in [[1.0, 2.0, 3.0], [2.0, 3.0, 4.0]] {
        x_builder.values().append_slice(&row);
        x_builder.append(true);
    }
    let mut y_builder = LargeListBuilder::new(Float32Builder::new());
    for row in [[5.0f32, 6.0, 7.0], [10.0, 11.0, 12.0]] {
        y_builder.values().append_slice(&row);
        y_builder.append(true);
    }
    let x_array = x_builder.finish();
    let y_array = y_builder.finish();

    let schema = Arc::new(Schema::new(vec![
        Field::new("x", x_array.data_type().clone(), false),
        Field::new("y", y_array.data_type().clone(), false),
        Field::new("center", DataType::Float64, false),
        Field::new("lamp", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(x_array),
            Arc::new(y_array),
            Arc::new(Float64Array::from(vec![2.0, 3.0])),
            Arc::new(StringArray::from(vec![Some("hg-ar"), None])),
        ],
    )
    .unwrap();

    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let set = load_windows(&path, &ColumnNames::default()).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.windows[0].meta("lamp"), &MetadataValue::String("hg-ar".into()));
    assert_eq!(set.windows[1].meta("lamp"), &MetadataValue::Null);
    assert_eq!(set.windows[1].meta("center"), &MetadataValue::Float(3.0));

    let runs = stitch_runs(&set, &RunConfig::default()).unwrap();
    assert_eq!(runs[0].y, vec![5.0, 8.0, 9.0, 12.0]);
}

#[test]
fn matrices_load_and_subtract() {
    let temp = TempDir::new().unwrap();
    let signal = write(&temp, "signal.json", "[[10, 20], [30, 40]]");
    let dark_path = write(&temp, "dark.json", "[[1, 2], [3, 4]]");
    let short = write(&temp, "short.json", "[[1, 2]]");

    let signal = load_matrix(&signal).unwrap();
    let out = dark::subtract(&signal, &load_matrix(&dark_path).unwrap()).unwrap();
    assert_eq!(out.rows(), &[vec![9.0, 18.0], vec![27.0, 36.0]]);

    let err = dark::subtract(&signal, &load_matrix(&short).unwrap()).unwrap_err();
    assert!(matches!(err, rusty_stitch::SpectrumError::ShapeMismatch(_)));
}

#[test]
fn run_config_file_is_read() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "config.json",
        r#"{"stitch": {"strategy": "weighted_ramp", "overlap": "index_anchored"}, "group_by": "run"}"#,
    );
    let cfg = RunConfig::from_file(&path).unwrap();
    assert_eq!(cfg.stitch.strategy.to_string(), "weighted_ramp");
    assert_eq!(cfg.stitch.overlap.to_string(), "index_anchored");
    assert_eq!(cfg.group_by.as_deref(), Some("run"));

    let broken = write(&temp, "broken.json", "{");
    assert!(RunConfig::from_file(&broken).is_err());
}
