use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DataError, DataResult};
use super::model::{infer_dtype, Column, DType, Dataset, Value};

/// Cell texts read as missing values.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "col": value, ... }, ...]`
/// * `.parquet` – any flat Parquet schema
/// * anything else is read as comma-separated text with a header row
pub fn load_file(path: &Path) -> DataResult<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(&std::fs::read(path)?),
        _ => load_csv_reader(std::fs::File::open(path)?),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse comma-separated text held in memory.
pub fn load_csv_bytes(bytes: &[u8]) -> DataResult<Dataset> {
    load_csv_reader(bytes)
}

/// Parse comma-separated text with a header row.
///
/// Rows shorter than the header are padded with missing cells; longer rows
/// are rejected.
pub fn load_csv_reader<R: Read>(rdr: R) -> DataResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DataError::NoColumns);
    }
    let names = column_names(&headers);
    let n_cols = names.len();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); n_cols];
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > n_cols {
            let line = record
                .position()
                .map_or(row_no as u64 + 2, |p| p.line());
            return Err(DataError::RaggedRow {
                line,
                expected: n_cols,
                found: record.len(),
            });
        }
        for (col_idx, cells) in raw.iter_mut().enumerate() {
            cells.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    let columns = names
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| text_column(name, cells))
        .collect();
    Ok(Dataset::from_columns(columns))
}

/// Build a column from raw cell texts. Text columns keep the cells verbatim.
fn text_column(name: String, cells: Vec<String>) -> Column {
    let parsed: Vec<Value> = cells.iter().map(|s| guess_value(s)).collect();
    let dtype = infer_dtype(&parsed);
    let values = if dtype == DType::Text {
        cells
            .into_iter()
            .zip(parsed)
            .map(|(s, p)| if p.is_null() { Value::Null } else { Value::Text(s) })
            .collect()
    } else {
        parsed
    };
    Column::with_dtype(name, dtype, values)
}

/// Unnamed headers become `Unnamed: {i}`; repeats become `name.1`, `name.2`, ...
fn column_names(headers: &csv::StringRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    let mut seen: HashSet<String> = HashSet::new();
    for (i, header) in headers.iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {i}")
        } else {
            header.to_string()
        };
        let mut name = base.clone();
        let mut k = 0;
        while seen.contains(&name) {
            k += 1;
            name = format!("{base}.{k}");
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

/// Interpret one cell of text.
pub fn guess_value(s: &str) -> Value {
    if NA_VALUES.contains(&s) {
        return Value::Null;
    }
    let t = s.trim();
    if let Ok(i) = t.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        if f.is_nan() {
            return Value::Null;
        }
        return Value::Float(f);
    }
    match t {
        "True" | "TRUE" | "true" => Value::Bool(true),
        "False" | "FALSE" | "false" => Value::Bool(false),
        _ if is_iso_datetime(t) => Value::Date(s.to_string()),
        _ => Value::Text(s.to_string()),
    }
}

/// ISO-8601 dates and timestamps, as written for datetime columns.
fn is_iso_datetime(s: &str) -> bool {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || DateTime::parse_from_rfc3339(s).is_ok()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "age": 31, "city": "Oslo" },
///   { "age": 45, "city": "Lima" }
/// ]
/// ```
///
/// Columns appear in first-seen order; keys missing from a record are
/// missing cells.
pub fn load_json(bytes: &[u8]) -> DataResult<Dataset> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataError::JsonShape("expected top-level JSON array".into()))?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::JsonShape(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    if names.is_empty() {
        return Err(DataError::NoColumns);
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|rec| rec.get(&name).map_or(Value::Null, json_to_value))
                .collect();
            Column::from_values(name, values)
        })
        .collect();
    Ok(Dataset::from_columns(columns))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file (as written by `df.to_parquet()` or
/// `df.write_parquet()`).
pub fn load_parquet(path: &Path) -> DataResult<Dataset> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    if schema.fields().is_empty() {
        return Err(DataError::NoColumns);
    }
    let reader = builder.build()?;

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); schema.fields().len()];
    for batch in reader {
        let batch = batch?;
        for (col_idx, values) in cells.iter_mut().enumerate() {
            values.extend(arrow_values(batch.column(col_idx))?);
        }
    }

    let columns = schema
        .fields()
        .iter()
        .zip(cells)
        .map(|(field, values)| Column::from_values(field.name().clone(), values))
        .collect();
    Ok(Dataset::from_columns(columns))
}

/// Convert one Arrow column into cells.
fn arrow_values(array: &ArrayRef) -> DataResult<Vec<Value>> {
    let n = array.len();
    let values = match array.data_type() {
        dt if dt.is_integer() => {
            let ints = cast(array, &DataType::Int64)?;
            let ints = ints.as_primitive::<Int64Type>();
            (0..n)
                .map(|i| {
                    if ints.is_null(i) {
                        Value::Null
                    } else {
                        Value::Integer(ints.value(i))
                    }
                })
                .collect()
        }
        dt if dt.is_floating() => {
            let floats = cast(array, &DataType::Float64)?;
            let floats = floats.as_primitive::<Float64Type>();
            (0..n)
                .map(|i| {
                    if floats.is_null(i) || floats.value(i).is_nan() {
                        Value::Null
                    } else {
                        Value::Float(floats.value(i))
                    }
                })
                .collect()
        }
        DataType::Boolean => {
            let bools = array.as_boolean();
            (0..n)
                .map(|i| {
                    if bools.is_null(i) {
                        Value::Null
                    } else {
                        Value::Bool(bools.value(i))
                    }
                })
                .collect()
        }
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let strings = cast(array, &DataType::Utf8)?;
            let strings = strings.as_string::<i32>();
            (0..n)
                .map(|i| {
                    if strings.is_null(i) {
                        Value::Null
                    } else {
                        Value::Text(strings.value(i).to_string())
                    }
                })
                .collect()
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            formatted_values(array, Value::Date)?
        }
        _ => formatted_values(array, Value::Text)?,
    };
    Ok(values)
}

fn formatted_values(array: &ArrayRef, wrap: fn(String) -> Value) -> DataResult<Vec<Value>> {
    let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
    Ok((0..array.len())
        .map(|i| {
            if array.is_null(i) {
                Value::Null
            } else {
                wrap(formatter.value(i).to_string())
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    #[test]
    fn infers_numeric_and_text_columns() {
        let ds = load_csv_bytes(b"age,city\n10,Oslo\n20,Lima\n").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.columns[0].dtype, DType::Int64);
        assert_eq!(ds.columns[1].kind(), ColumnKind::Categorical);
    }

    #[test]
    fn missing_tokens_are_null() {
        let ds = load_csv_bytes(b"x\n1\nNA\n3.5\nnan\n").unwrap();
        let col = &ds.columns[0];
        assert_eq!(col.dtype, DType::Float64);
        assert_eq!(col.non_null_count(), 2);
    }

    #[test]
    fn text_columns_keep_cells_verbatim() {
        let ds = load_csv_bytes(b"code\n1.50\nabc\n").unwrap();
        assert_eq!(ds.columns[0].values[0], Value::Text("1.50".into()));
    }

    #[test]
    fn short_rows_are_padded_long_rows_rejected() {
        let ds = load_csv_bytes(b"a,b\n1\n2,3\n").unwrap();
        assert_eq!(ds.columns[1].values, vec![Value::Null, Value::Float(3.0)]);

        let err = load_csv_bytes(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            DataError::RaggedRow {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn empty_input_has_no_columns() {
        assert!(matches!(load_csv_bytes(b""), Err(DataError::NoColumns)));
    }

    #[test]
    fn duplicate_and_blank_headers_are_renamed() {
        let ds = load_csv_bytes(b"a,a,,a\n1,2,3,4\n").unwrap();
        assert_eq!(ds.column_names(), vec!["a", "a.1", "Unnamed: 2", "a.2"]);
    }

    #[test]
    fn boolean_cells() {
        let ds = load_csv_bytes(b"flag\nTrue\nfalse\n").unwrap();
        assert_eq!(ds.columns[0].dtype, DType::Bool);
    }

    #[test]
    fn iso_dates_are_datetime_columns() {
        let ds = load_csv_bytes(b"d,t\n2024-03-01,2024-03-01T10:15:00\n,2024-03-02 08:00:00\n").unwrap();
        assert_eq!(ds.columns[0].dtype, DType::Datetime);
        assert_eq!(ds.columns[0].values[0], Value::Date("2024-03-01".into()));
        assert_eq!(ds.columns[0].values[1], Value::Null);
        assert_eq!(ds.columns[1].dtype, DType::Datetime);
        assert_eq!(ds.columns[1].kind(), ColumnKind::Other);
    }

    #[test]
    fn dates_mixed_with_text_stay_text() {
        let ds = load_csv_bytes(b"d\n2024-03-01\nsoon\n").unwrap();
        assert_eq!(ds.columns[0].dtype, DType::Text);
        assert_eq!(ds.columns[0].values[0], Value::Text("2024-03-01".into()));
    }

    #[test]
    fn json_records_fill_missing_keys() {
        let ds = load_json(br#"[{"a": 1, "b": "x"}, {"a": 2}]"#).unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b"]);
        assert_eq!(ds.columns[0].dtype, DType::Int64);
        assert_eq!(ds.columns[1].values[1], Value::Null);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(matches!(load_json(b"{}"), Err(DataError::JsonShape(_))));
        assert!(matches!(load_json(b"[1]"), Err(DataError::JsonShape(_))));
    }
}
