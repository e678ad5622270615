/// Fill snapshot decoder.
///
/// The snapshot is a Parquet file with one row per (station, scheduled
/// block). Column names are fixed by the upstream producer:
///
///   Station            — station id, business-type prefixed ("V…", "D…")
///   Block_Date_Time    — block start; ISO-8601 string or timestamp column
///   Duration           — block length in minutes
///   Fill               — booked fraction of capacity, 0.0–1.0
///   rounded_block_eta  — lead time to the block, bucketed (e.g. 60)
///
/// Producers are not strict about physical types (ints vs floats, numbers
/// written as strings), so numeric columns are coerced with arrow's cast
/// kernel rather than matched exactly.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{CastOptions, cast_with_options};
use arrow::datatypes::{DataType, Float64Type, TimeUnit, TimestampMillisecondType};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::SurgeError;
use crate::model::FillRecord;

pub const COL_STATION: &str = "Station";
pub const COL_BLOCK_START: &str = "Block_Date_Time";
pub const COL_DURATION: &str = "Duration";
pub const COL_FILL: &str = "Fill";
pub const COL_ETA: &str = "rounded_block_eta";

const FILL_SOURCE: &str = "fill snapshot";

const BLOCK_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decodes a Parquet fill snapshot into rows, preserving file order.
///
/// # Errors
/// `SurgeError::Parse` when the bytes are not Parquet, a required column is
/// missing or has an unusable type, a value cannot be converted to its
/// column's type, a row has no station, start time or duration, or a
/// duration is not finite or pushes the block end out of range. Null `Fill` / `rounded_block_eta` values are kept; such rows can
/// never pass the unfilled-station filter.
pub fn parse_fill_snapshot(data: Bytes) -> Result<Vec<FillRecord>, SurgeError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)
        .and_then(|builder| builder.build())
        .map_err(|e| SurgeError::parse(FILL_SOURCE, format!("not a readable Parquet file: {}", e)))?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|e| SurgeError::parse(FILL_SOURCE, e.to_string()))?;
        let offset = records.len();
        records.extend(records_from_batch(&batch, offset)?);
    }

    Ok(records)
}

fn records_from_batch(batch: &RecordBatch, row_offset: usize) -> Result<Vec<FillRecord>, SurgeError> {
    let stations = coerce(batch, COL_STATION, &DataType::Utf8)?;
    let stations = stations.as_string::<i32>();
    let durations = coerce(batch, COL_DURATION, &DataType::Float64)?;
    let durations = durations.as_primitive::<Float64Type>();
    let fills = coerce(batch, COL_FILL, &DataType::Float64)?;
    let fills = fills.as_primitive::<Float64Type>();
    let etas = coerce(batch, COL_ETA, &DataType::Float64)?;
    let etas = etas.as_primitive::<Float64Type>();
    let starts = block_starts(batch)?;

    let mut records = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let row = row_offset + i;

        if stations.is_null(i) {
            return Err(null_value(COL_STATION, row));
        }
        if durations.is_null(i) {
            return Err(null_value(COL_DURATION, row));
        }
        let block_start = starts[i].ok_or_else(|| null_value(COL_BLOCK_START, row))?;

        let fill = if fills.is_null(i) { f64::NAN } else { fills.value(i) };

        // Fractional buckets can't equal an integer threshold; treat as absent.
        let rounded_block_eta = if etas.is_null(i) {
            None
        } else {
            let eta = etas.value(i);
            (eta.fract() == 0.0).then_some(eta as i64)
        };

        let record = FillRecord {
            station: stations.value(i).to_string(),
            block_start,
            duration_minutes: durations.value(i),
            fill,
            rounded_block_eta,
        };
        if record.block_end().is_none() {
            return Err(SurgeError::parse(
                FILL_SOURCE,
                format!(
                    "'{}' value {} at row {} is out of range",
                    COL_DURATION, record.duration_minutes, row
                ),
            ));
        }
        records.push(record);
    }

    Ok(records)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, SurgeError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| SurgeError::parse(FILL_SOURCE, format!("missing column '{}'", name)))
}

/// Casts a column, failing on any value that does not convert rather than
/// nulling it.
fn coerce(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef, SurgeError> {
    let col = column(batch, name)?;
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    cast_with_options(col, to, &options).map_err(|e| {
        SurgeError::parse(
            FILL_SOURCE,
            format!("column '{}' ({}) cannot be read as {}: {}", name, col.data_type(), to, e),
        )
    })
}

fn null_value(name: &str, row: usize) -> SurgeError {
    SurgeError::parse(FILL_SOURCE, format!("null '{}' at row {}", name, row))
}

// ---------------------------------------------------------------------------
// Block start times
// ---------------------------------------------------------------------------

/// Reads `Block_Date_Time` as wall-clock times. Timestamp columns carrying a
/// zone are shifted into that zone so "HH:MM" matches what the producer saw.
fn block_starts(batch: &RecordBatch) -> Result<Vec<Option<NaiveDateTime>>, SurgeError> {
    let col = column(batch, COL_BLOCK_START)?;

    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let strings = coerce(batch, COL_BLOCK_START, &DataType::Utf8)?;
            strings
                .as_string::<i32>()
                .iter()
                .map(|value| value.map(parse_block_time).transpose())
                .collect()
        }
        DataType::Timestamp(_, tz) => {
            let offset = zone_offset(tz.as_deref())?;
            let millis = coerce(
                batch,
                COL_BLOCK_START,
                &DataType::Timestamp(TimeUnit::Millisecond, tz.clone()),
            )?;
            millis
                .as_primitive::<TimestampMillisecondType>()
                .iter()
                .map(|value| {
                    value
                        .map(|ms| {
                            DateTime::from_timestamp_millis(ms)
                                .map(|utc| utc.with_timezone(&offset).naive_local())
                                .ok_or_else(|| {
                                    SurgeError::parse(
                                        FILL_SOURCE,
                                        format!("timestamp {}ms out of range", ms),
                                    )
                                })
                        })
                        .transpose()
                })
                .collect()
        }
        other => Err(SurgeError::parse(
            FILL_SOURCE,
            format!("column '{}' has unsupported type {}", COL_BLOCK_START, other),
        )),
    }
}

/// Parses a block start string. Offset-qualified RFC 3339 values keep their
/// local wall-clock time.
pub fn parse_block_time(value: &str) -> Result<NaiveDateTime, SurgeError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    BLOCK_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| {
            SurgeError::parse(
                FILL_SOURCE,
                format!("unrecognised '{}' value '{}'", COL_BLOCK_START, value),
            )
        })
}

fn zone_offset(tz: Option<&str>) -> Result<FixedOffset, SurgeError> {
    match tz {
        None | Some("UTC") | Some("Z") | Some("Etc/UTC") => Ok(Utc.fix()),
        Some(other) => other.parse::<FixedOffset>().map_err(|_| {
            SurgeError::parse(
                FILL_SOURCE,
                format!("unsupported time zone '{}' on '{}'", other, COL_BLOCK_START),
            )
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
