/// Test fixtures: representative surge config documents and fill snapshots.
///
/// Fill snapshots are built in memory with arrow's Parquet writer so the
/// decoder is exercised against real Parquet bytes, including the loosely
/// typed variants upstream producers emit (float buckets, numbers as
/// strings, nulls, timestamp columns).

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use std::sync::Arc;

/// Config covering all three tiers for both business types.
/// V002 is listed under both amber and red; amber must win.
pub(crate) fn fixture_full_config_json() -> &'static str {
    r#"{
      "rag_status": {
        "green": ["V001", "D101"],
        "amber": ["V002", "D102"],
        "red":   ["V003"]
      },
      "surge": {
        "ssd":  { "green": 5, "amber": 8, "red": 12.5 },
        "core": { "green": 3, "amber": 6, "red": 9 }
      }
    }"#
}

/// Smallest useful config: one green station, one price.
pub(crate) fn fixture_minimal_config_json() -> &'static str {
    r#"{ "rag_status": { "green": ["V001"] }, "surge": { "ssd": { "green": 5 } } }"#
}

fn write_parquet(columns: Vec<(&str, ArrayRef)>) -> Bytes {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, array)| array).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("fixture batch");

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, schema, None).expect("fixture writer");
    writer.write(&batch).expect("fixture write");
    writer.close().expect("fixture close");
    Bytes::from(buf)
}

/// One snapshot row: (Station, Block_Date_Time, Duration, Fill, rounded_block_eta).
pub(crate) type FixtureRow<'a> = (&'a str, &'a str, i64, f64, i64);

/// Builds a well-typed snapshot from rows.
pub(crate) fn fill_parquet(rows: &[FixtureRow<'_>]) -> Bytes {
    write_parquet(vec![
        ("Station", Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.0))) as ArrayRef),
        ("Block_Date_Time", Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.1))) as ArrayRef),
        ("Duration", Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.2))) as ArrayRef),
        ("Fill", Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.3))) as ArrayRef),
        ("rounded_block_eta", Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.4))) as ArrayRef),
    ])
}

/// One otherwise-valid V001 row with the given float Duration.
pub(crate) fn fixture_fill_parquet_with_duration(duration: f64) -> Bytes {
    write_parquet(vec![
        ("Station", Arc::new(StringArray::from(vec!["V001"])) as ArrayRef),
        ("Block_Date_Time", Arc::new(StringArray::from(vec!["2024-01-01T10:00"])) as ArrayRef),
        ("Duration", Arc::new(Float64Array::from(vec![duration])) as ArrayRef),
        ("Fill", Arc::new(Float64Array::from(vec![0.5])) as ArrayRef),
        ("rounded_block_eta", Arc::new(Int64Array::from(vec![60])) as ArrayRef),
    ])
}

/// One V001 row whose Duration, Fill and rounded_block_eta columns are all
/// written as strings.
pub(crate) fn fixture_fill_parquet_with_strings(values: [&str; 3]) -> Bytes {
    write_parquet(vec![
        ("Station", Arc::new(StringArray::from(vec!["V001"])) as ArrayRef),
        ("Block_Date_Time", Arc::new(StringArray::from(vec!["2024-01-01T10:00"])) as ArrayRef),
        ("Duration", Arc::new(StringArray::from(vec![values[0]])) as ArrayRef),
        ("Fill", Arc::new(StringArray::from(vec![values[1]])) as ArrayRef),
        ("rounded_block_eta", Arc::new(StringArray::from(vec![values[2]])) as ArrayRef),
    ])
}

/// Mixed SSD/core snapshot at T-60 and T-120.
///
///   V001  fill 0.5 @60  — unfilled, green
///   V002  fill 1.0 @60  — full
///   D101  fill 0.2 @60  — unfilled core station
///   V003  fill 0.9 @120 — unfilled but wrong bucket
///   V004  fill 1.2 @60  — over-booked; not < 1.0, so excluded
///   D102  fill 0.0 @60  — unfilled core station
pub(crate) fn fixture_mixed_fill_parquet() -> Bytes {
    fill_parquet(&[
        ("V001", "2024-01-01T10:00", 30, 0.5, 60),
        ("V002", "2024-01-01T10:30", 30, 1.0, 60),
        ("D101", "2024-01-01T11:00", 60, 0.2, 60),
        ("V003", "2024-01-01T12:00", 30, 0.9, 120),
        ("V004", "2024-01-01T10:00", 45, 1.2, 60),
        ("D102", "2024-01-01T11:15", 30, 0.0, 60),
    ])
}

/// Block_Date_Time as a timestamp column at 2024-01-01 09:00 UTC.
pub(crate) fn fixture_timestamp_fill_parquet(tz: Option<&str>) -> Bytes {
    let start_ms = 1_704_099_600_000; // 2024-01-01T09:00:00Z
    let mut starts = TimestampMillisecondArray::from(vec![start_ms]);
    if let Some(tz) = tz {
        starts = starts.with_timezone(tz);
    }
    write_parquet(vec![
        ("Station", Arc::new(StringArray::from(vec!["V001"])) as ArrayRef),
        ("Block_Date_Time", Arc::new(starts) as ArrayRef),
        ("Duration", Arc::new(Int64Array::from(vec![30])) as ArrayRef),
        ("Fill", Arc::new(Float64Array::from(vec![0.5])) as ArrayRef),
        ("rounded_block_eta", Arc::new(Int64Array::from(vec![60])) as ArrayRef),
    ])
}

/// Float durations and buckets, a string-typed bucket and a null fill.
pub(crate) fn fixture_loosely_typed_fill_parquet() -> Bytes {
    write_parquet(vec![
        ("Station", Arc::new(StringArray::from(vec!["V001", "V002", "V003"])) as ArrayRef),
        (
            "Block_Date_Time",
            Arc::new(StringArray::from(vec![
                "2024-01-01 10:00:00",
                "2024-01-01 10:00:00",
                "2024-01-01 10:00:00",
            ])) as ArrayRef,
        ),
        ("Duration", Arc::new(Float64Array::from(vec![45.0, 30.0, 30.0])) as ArrayRef),
        ("Fill", Arc::new(Float64Array::from(vec![Some(0.5), Some(0.5), None])) as ArrayRef),
        ("rounded_block_eta", Arc::new(StringArray::from(vec!["60", "59.5", "60"])) as ArrayRef),
    ])
}

/// Snapshot missing the rounded_block_eta column.
pub(crate) fn fixture_fill_parquet_without_eta() -> Bytes {
    write_parquet(vec![
        ("Station", Arc::new(StringArray::from(vec!["V001"])) as ArrayRef),
        ("Block_Date_Time", Arc::new(StringArray::from(vec!["2024-01-01T10:00"])) as ArrayRef),
        ("Duration", Arc::new(Int64Array::from(vec![30])) as ArrayRef),
        ("Fill", Arc::new(Float64Array::from(vec![0.5])) as ArrayRef),
    ])
}

/// Snapshot with a null station id.
pub(crate) fn fixture_fill_parquet_null_station() -> Bytes {
    write_parquet(vec![
        ("Station", Arc::new(StringArray::from(vec![Some("V001"), None])) as ArrayRef),
        (
            "Block_Date_Time",
            Arc::new(StringArray::from(vec!["2024-01-01T10:00", "2024-01-01T10:00"])) as ArrayRef,
        ),
        ("Duration", Arc::new(Int64Array::from(vec![30, 30])) as ArrayRef),
        ("Fill", Arc::new(Float64Array::from(vec![0.5, 0.5])) as ArrayRef),
        ("rounded_block_eta", Arc::new(Int64Array::from(vec![60, 60])) as ArrayRef),
    ])
}
