use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date or timestamp kept as text.
    Date(String),
    Null,
}

// Floats never hold NaN (missing cells are `Null`), so equality is total.
impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) | Value::Date(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Null => write!(f, "<NA>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` (numeric cells only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Shortest text that parses back to the same float, always with a decimal
/// point or exponent so the column stays floating-point on re-read.
pub fn format_float(v: f64) -> String {
    format!("{v:?}")
}

// ---------------------------------------------------------------------------
// DType / ColumnKind
// ---------------------------------------------------------------------------

/// Storage type of a column, fixed when the dataset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Int64,
    Float64,
    Bool,
    Datetime,
    Text,
}

impl DType {
    /// Label shown in the dataset information table.
    pub fn label(self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::Datetime => "datetime64[ns]",
            DType::Text => "object",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            DType::Int64 | DType::Float64 => ColumnKind::Numeric,
            DType::Text => ColumnKind::Categorical,
            DType::Bool | DType::Datetime => ColumnKind::Other,
        }
    }
}

/// How downstream logic (filters, statistics, charts) treats a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Other,
}

/// Infer the dtype of a column from its parsed cells.
///
/// * no non-missing cells → `Float64`
/// * integers only → `Int64`, or `Float64` if any cell is missing
/// * integers and floats → `Float64`
/// * booleans only and nothing missing → `Bool`
/// * dates only → `Datetime`
/// * anything else → `Text`
pub fn infer_dtype(values: &[Value]) -> DType {
    let mut has_null = false;
    let (mut ints, mut floats, mut bools, mut dates, mut other) = (0, 0, 0, 0, 0);
    for v in values {
        match v {
            Value::Null => has_null = true,
            Value::Integer(_) => ints += 1,
            Value::Float(_) => floats += 1,
            Value::Bool(_) => bools += 1,
            Value::Date(_) => dates += 1,
            Value::Text(_) => other += 1,
        }
    }
    let non_null = ints + floats + bools + dates + other;

    if non_null == 0 {
        DType::Float64
    } else if ints == non_null {
        if has_null {
            DType::Float64
        } else {
            DType::Int64
        }
    } else if ints + floats == non_null {
        DType::Float64
    } else if bools == non_null && !has_null {
        DType::Bool
    } else if dates == non_null {
        DType::Datetime
    } else {
        DType::Text
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<Value>,
}

impl Column {
    /// Build a column with an inferred dtype.
    pub fn from_values(name: impl Into<String>, values: Vec<Value>) -> Self {
        let dtype = infer_dtype(&values);
        Self::with_dtype(name, dtype, values)
    }

    /// Build a column, coercing every non-missing cell to `dtype`.
    pub fn with_dtype(name: impl Into<String>, dtype: DType, values: Vec<Value>) -> Self {
        let values = values
            .into_iter()
            .map(|v| match (dtype, v) {
                (_, Value::Null) => Value::Null,
                (DType::Float64, Value::Integer(i)) => Value::Float(i as f64),
                (DType::Text, Value::Text(s)) => Value::Text(s),
                (DType::Text, other) => Value::Text(other.to_string()),
                (_, other) => other,
            })
            .collect();
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.dtype.kind()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn non_null_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_null()).count()
    }

    /// Non-missing numeric values in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    /// Actual `(min, max)` of a numeric column; `None` when it holds no values.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter_map(Value::as_f64)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An in-memory table: ordered, equally long columns plus the original row
/// position ("index label") of every row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub columns: Vec<Column>,
    pub index: Vec<usize>,
}

impl Dataset {
    /// Build a dataset with a fresh `0..n` index.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map_or(0, Column::len);
        debug_assert!(columns.iter().all(|c| c.len() == n_rows));
        Dataset {
            columns,
            index: (0..n_rows).collect(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
    }

    /// Rows at the given positions, in the given order. Columns, dtypes and
    /// index labels are carried over.
    pub fn take(&self, rows: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                dtype: c.dtype,
                values: rows.iter().map(|&r| c.values[r].clone()).collect(),
            })
            .collect();
        Dataset {
            columns,
            index: rows.iter().map(|&r| self.index[r]).collect(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        let rows: Vec<usize> = (0..self.len().min(n)).collect();
        self.take(&rows)
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[row]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_with_missing_widen_to_float() {
        let col = Column::from_values("n", vec![Value::Integer(1), Value::Null]);
        assert_eq!(col.dtype, DType::Float64);
        assert_eq!(col.values, vec![Value::Float(1.0), Value::Null]);
    }

    #[test]
    fn mixed_cells_become_text() {
        let col = Column::from_values("m", vec![Value::Integer(1), Value::Text("a".into())]);
        assert_eq!(col.dtype, DType::Text);
        assert_eq!(col.kind(), ColumnKind::Categorical);
        assert_eq!(col.values[0], Value::Text("1".into()));
    }

    #[test]
    fn booleans_are_other_kind() {
        let col = Column::from_values("b", vec![Value::Bool(true), Value::Bool(false)]);
        assert_eq!(col.dtype, DType::Bool);
        assert_eq!(col.kind(), ColumnKind::Other);

        let with_gap = Column::from_values("b", vec![Value::Bool(true), Value::Null]);
        assert_eq!(with_gap.dtype, DType::Text);
    }

    #[test]
    fn all_missing_column_is_numeric_without_range() {
        let col = Column::from_values("e", vec![Value::Null, Value::Null]);
        assert_eq!(col.kind(), ColumnKind::Numeric);
        assert_eq!(col.min_max(), None);
    }

    #[test]
    fn take_preserves_index_labels() {
        let ds = Dataset::from_columns(vec![Column::from_values(
            "a",
            (0..5).map(Value::Integer).collect(),
        )]);
        let sub = ds.take(&[1, 3]);
        assert_eq!(sub.index, vec![1, 3]);
        let again = sub.take(&[1]);
        assert_eq!(again.index, vec![3]);
        assert_eq!(again.columns[0].values, vec![Value::Integer(3)]);
    }

    #[test]
    fn float_formatting_keeps_decimal_point() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(0.1), "0.1");
    }
}
