use std::path::Path;

use super::error::DataResult;
use super::model::{format_float, Dataset, Value};

/// File name offered for the filtered dataset download.
pub const EXPORT_FILE_NAME: &str = "filtered_data.csv";

/// Serialize a dataset as UTF-8 comma-separated text: header row, no index
/// column, missing cells as empty fields.
pub fn to_csv_bytes(dataset: &Dataset) -> DataResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(dataset.columns.iter().map(|c| c.name.as_str()))?;
    for row in 0..dataset.len() {
        writer.write_record(dataset.row(row).into_iter().map(cell_text))?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Write the CSV encoding of a dataset to `path`.
pub fn write_csv(path: &Path, dataset: &Dataset) -> DataResult<()> {
    std::fs::write(path, to_csv_bytes(dataset)?)?;
    Ok(())
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Float(f) => format_float(*f),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;
    use crate::data::model::Column;

    #[test]
    fn writes_header_without_index() {
        let ds = Dataset::from_columns(vec![
            Column::from_values("n", vec![Value::Integer(1), Value::Null]),
            Column::from_values(
                "s",
                vec![Value::Text("a,b".into()), Value::Text("c".into())],
            ),
        ])
        .take(&[1]);
        let text = String::from_utf8(to_csv_bytes(&ds).unwrap()).unwrap();
        assert_eq!(text, "n,s\n,c\n");
    }

    #[test]
    fn quotes_and_float_formatting() {
        let ds = Dataset::from_columns(vec![
            Column::from_values("x", vec![Value::Float(2.0), Value::Float(0.25)]),
            Column::from_values(
                "s",
                vec![Value::Text("a,b".into()), Value::Text("c".into())],
            ),
            Column::from_values("b", vec![Value::Bool(true), Value::Bool(false)]),
        ]);
        let text = String::from_utf8(to_csv_bytes(&ds).unwrap()).unwrap();
        assert_eq!(text, "x,s,b\n2.0,\"a,b\",True\n0.25,c,False\n");
    }

    #[test]
    fn datetime_columns_reload_as_datetime() {
        let ds = Dataset::from_columns(vec![Column::from_values(
            "d",
            vec![
                Value::Date("1970-01-01".into()),
                Value::Null,
                Value::Date("1970-01-02T06:30:00".into()),
            ],
        )]);
        let back = load_csv_bytes(&to_csv_bytes(&ds).unwrap()).unwrap();
        assert_eq!(back.columns, ds.columns);
    }
}
