//! CSV ingest for cleaned swim records.
//!
//! Turns a meet-history export into `SwimRecord`s the engine can grade.
//!
//! Design goals:
//! - **Strict schema** for the columns a record cannot exist without (exit code 2)
//! - **Row-level validation** (skip unidentifiable rows, but report what happened)
//! - **Lenient values**: garbled times and unknown strokes are kept and left for
//!   the engine to grade as sentinels

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::domain::{Course, Stroke, SwimRecord};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed records plus row errors.
#[derive(Debug, Clone)]
pub struct IngestedRecords {
    pub records: Vec<SwimRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load swim records from a CSV file.
pub fn load_swim_records(path: &Path) -> Result<IngestedRecords, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_swim_records(file)?;
    info!(
        path = %path.display(),
        rows = ingested.rows_read,
        records = ingested.records.len(),
        row_errors = ingested.row_errors.len(),
        "loaded swim records"
    );
    Ok(ingested)
}

/// Parse swim records from any CSV reader.
pub fn read_swim_records<R: Read>(input: R) -> Result<IngestedRecords, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&row, &header_map) {
            Ok(record) => records.push(record),
            Err(message) => {
                debug!(line, %message, "skipping row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    if !row_errors.is_empty() {
        warn!(count = row_errors.len(), "some rows were skipped");
    }

    if records.is_empty() {
        return Err(AppError::new(3, "No valid swim records found in the CSV."));
    }

    Ok(IngestedRecords {
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for name in ["date", "distance", "course"] {
        if !header_map.contains_key(name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }
    if !header_map.contains_key("finals") && !header_map.contains_key("time_seconds") {
        return Err(AppError::new(
            2,
            "Missing time columns: expected `finals` and/or `time_seconds`.",
        ));
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SwimRecord, String> {
    let date = parse_date(get_required(record, header_map, "date")?)?;

    let distance_raw = get_required(record, header_map, "distance")?;
    let distance = parse_whole(distance_raw)
        .filter(|d| *d > 0)
        .ok_or_else(|| format!("Invalid distance '{distance_raw}'."))?;

    let course_raw = get_required(record, header_map, "course")?;
    let course = Course::from_label(course_raw).ok_or_else(|| format!("Unknown course '{course_raw}'."))?;

    let stroke_raw = get_optional(record, header_map, "stroke").unwrap_or("");
    let stroke = Stroke::from_label(stroke_raw);

    // A garbled age is treated as missing; the engine can still fall back to
    // the birthdate.
    let age = get_optional(record, header_map, "age").and_then(parse_whole);

    let time_seconds = get_optional(record, header_map, "time_seconds")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite());

    Ok(SwimRecord {
        date,
        age,
        distance,
        stroke,
        stroke_label: stroke_raw.to_string(),
        course,
        course_label: course_raw.to_string(),
        round: get_optional(record, header_map, "round").map(str::to_string),
        finals: get_optional(record, header_map, "finals").unwrap_or("").to_string(),
        time_seconds,
        meet: get_optional(record, header_map, "meet").map(str::to_string),
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Accepts `"100"` as well as spreadsheet floats like `"100.0"`.
fn parse_whole(s: &str) -> Option<u32> {
    if let Ok(v) = s.parse::<u32>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64).then_some(v as u32)
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // Meet exports use US dates; cleaned files use ISO, sometimes with a
    // midnight timestamp left over from a spreadsheet.
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD."
    ))
}
