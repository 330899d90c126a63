//! Worksheet rows as JSON records
//!
//! Converts a decoded `calamine` range into an ordered list of records keyed by
//! the header row.

use calamine::{Data, DataType, Range};
use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value};
use std::collections::{HashMap, HashSet};

/// One decoded row: column name -> cell value, in worksheet column order
pub type Record = Map<String, Value>;

/// All records of one worksheet, in row order
pub type RecordCollection = Vec<Record>;

/// Largest float that still converts to an integer without loss
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Build records from a worksheet range.
///
/// The first row of the range is the header. Blank rows are skipped and short
/// rows are padded with `null`.
pub fn records_from_range(range: &Range<Data>) -> RecordCollection {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let columns = column_names(header_row);

    rows.filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let value = row.get(idx).map(cell_value).unwrap_or(Value::Null);
                    (name.clone(), value)
                })
                .collect()
        })
        .collect()
}

/// Derive unique column names from the header row.
///
/// Blank headers become `Unnamed: <index>`; repeats get `.1`, `.2`, ... suffixes.
pub fn column_names(header: &[Data]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let base = header_text(cell).unwrap_or_else(|| format!("Unnamed: {}", idx));

        let mut name = base.clone();
        if used.contains(&name) {
            let count = counts.entry(base.clone()).or_insert(0);
            loop {
                *count += 1;
                name = format!("{}.{}", base, count);
                if !used.contains(&name) {
                    break;
                }
            }
        }

        used.insert(name.clone());
        names.push(name);
    }

    names
}

fn header_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if is_integral(*f) => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}

/// Convert one cell into a JSON value
pub fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => float_value(*f),
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| Value::String(format_datetime(&dt)))
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) | Data::Empty => Value::Null,
    }
}

fn float_value(f: f64) -> Value {
    if is_integral(f) {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INT
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}
