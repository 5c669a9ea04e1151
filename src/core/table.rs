use chrono::{NaiveDate, NaiveTime};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How raw column text is turned into a scalable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnUnit {
    /// Calendar date in `YYYY-MM-DD` form, stored as UTC unix seconds.
    Date,
    /// Plain floating-point number.
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub unit: ColumnUnit,
}

impl Column {
    #[must_use]
    pub fn new(key: impl Into<String>, unit: ColumnUnit) -> Self {
        Self {
            key: key.into(),
            unit,
        }
    }

    #[must_use]
    pub fn date(key: impl Into<String>) -> Self {
        Self::new(key, ColumnUnit::Date)
    }

    #[must_use]
    pub fn number(key: impl Into<String>) -> Self {
        Self::new(key, ColumnUnit::Number)
    }
}

/// One cell: the original text plus its parsed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    raw: String,
    value: f64,
}

impl Field {
    #[must_use]
    pub fn new(raw: impl Into<String>, value: f64) -> Self {
        Self {
            raw: raw.into(),
            value,
        }
    }

    /// Builds a field whose raw text is the value's display form.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::new(value.to_string(), value)
    }

    #[must_use]
    pub fn date(date: NaiveDate) -> Self {
        Self::new(
            date.format(DATE_FORMAT).to_string(),
            date_to_unix_seconds(date),
        )
    }

    pub fn parse(column: &Column, raw: &str) -> ChartResult<Self> {
        let raw = raw.trim();
        let parse_error = |reason: String| ChartError::FieldParse {
            column: column.key.clone(),
            raw: raw.to_owned(),
            reason,
        };

        let value = match column.unit {
            ColumnUnit::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(date_to_unix_seconds)
                .map_err(|e| parse_error(e.to_string()))?,
            ColumnUnit::Number => raw
                .parse::<f64>()
                .map_err(|e| parse_error(e.to_string()))?,
        };
        Ok(Self::new(raw, value))
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}

#[must_use]
pub fn date_to_unix_seconds(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    index: Field,
    values: Vec<Field>,
}

impl Row {
    #[must_use]
    pub fn new(index: Field, values: Vec<Field>) -> Self {
        Self { index, values }
    }

    #[must_use]
    pub fn index(&self) -> &Field {
        &self.index
    }

    /// Series fields in column order.
    #[must_use]
    pub fn values(&self) -> &[Field] {
        &self.values
    }

    #[must_use]
    pub fn value(&self, series_position: usize) -> Option<&Field> {
        self.values.get(series_position)
    }
}

/// Immutable rows sorted ascending by their index field.
///
/// Construction guarantees at least one row, finite values, non-decreasing
/// index values and one field per series column in every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index_column: Column,
    series_columns: Vec<Column>,
    rows: Vec<Row>,
    index_values: Vec<f64>,
}

impl Table {
    pub fn new(
        index_column: Column,
        series_columns: Vec<Column>,
        rows: Vec<Row>,
    ) -> ChartResult<Self> {
        if rows.is_empty() {
            return Err(ChartError::EmptyTable);
        }
        if series_columns.is_empty() {
            return Err(ChartError::InvalidData(
                "table must declare at least one series column".to_owned(),
            ));
        }
        for (position, column) in series_columns.iter().enumerate() {
            let duplicate = column.key == index_column.key
                || series_columns[..position]
                    .iter()
                    .any(|other| other.key == column.key);
            if duplicate {
                return Err(ChartError::InvalidData(format!(
                    "duplicate column key `{}`",
                    column.key
                )));
            }
        }

        let mut index_values = Vec::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            let index = row.index.value;
            if !index.is_finite() {
                return Err(ChartError::InvalidData(format!(
                    "row {position}: index value must be finite"
                )));
            }
            if index_values.last().is_some_and(|previous: &f64| index < *previous) {
                return Err(ChartError::InvalidData(format!(
                    "row {position}: index values must be sorted ascending"
                )));
            }
            if row.values.len() != series_columns.len() {
                return Err(ChartError::InvalidData(format!(
                    "row {position}: expected {} series values, got {}",
                    series_columns.len(),
                    row.values.len()
                )));
            }
            if let Some((field, column)) = row
                .values
                .iter()
                .zip(&series_columns)
                .find(|(field, _)| !field.value.is_finite())
            {
                return Err(ChartError::InvalidData(format!(
                    "row {position}: value `{}` of series `{}` must be finite",
                    field.raw, column.key
                )));
            }
            index_values.push(index);
        }

        Ok(Self {
            index_column,
            series_columns,
            rows,
            index_values,
        })
    }

    /// Parses pre-split string records, one field per column, index first.
    pub fn from_records<I, R, S>(
        index_column: Column,
        series_columns: Vec<Column>,
        records: I,
    ) -> ChartResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let width = series_columns.len() + 1;
        let mut rows = Vec::new();
        for (position, record) in records.into_iter().enumerate() {
            let raw: Vec<S> = record.into_iter().collect();
            if raw.len() != width {
                return Err(ChartError::InvalidData(format!(
                    "record {position}: expected {width} fields, got {}",
                    raw.len()
                )));
            }

            let index = Field::parse(&index_column, raw[0].as_ref())?;
            let values = series_columns
                .iter()
                .zip(&raw[1..])
                .map(|(column, text)| Field::parse(column, text.as_ref()))
                .collect::<ChartResult<Vec<_>>>()?;
            rows.push(Row::new(index, values));
        }

        Self::new(index_column, series_columns, rows)
    }

    #[must_use]
    pub fn index_column(&self) -> &Column {
        &self.index_column
    }

    #[must_use]
    pub fn series_columns(&self) -> &[Column] {
        &self.series_columns
    }

    pub fn series_keys(&self) -> impl Iterator<Item = &str> {
        self.series_columns.iter().map(|column| column.key.as_str())
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn first_row(&self) -> &Row {
        &self.rows[0]
    }

    #[must_use]
    pub fn last_row(&self) -> &Row {
        &self.rows[self.rows.len() - 1]
    }

    /// Parsed index values in row order, suitable for binary search.
    #[must_use]
    pub fn index_values(&self) -> &[f64] {
        &self.index_values
    }

    #[must_use]
    pub fn index_extent(&self) -> (f64, f64) {
        // Sorted on construction.
        (
            self.index_values[0],
            self.index_values[self.index_values.len() - 1],
        )
    }

    pub fn series_position(&self, key: &str) -> ChartResult<usize> {
        self.series_columns
            .iter()
            .position(|column| column.key == key)
            .ok_or_else(|| ChartError::UnknownSeries(key.to_owned()))
    }

    pub fn series_values(&self, key: &str) -> ChartResult<impl Iterator<Item = f64> + '_> {
        let position = self.series_position(key)?;
        Ok(self.rows.iter().map(move |row| row.values[position].value))
    }

    pub fn series_extent(&self, key: &str) -> ChartResult<(f64, f64)> {
        Ok(extent(self.series_values(key)?))
    }

    /// Extent over every series value in the table.
    #[must_use]
    pub fn values_extent(&self) -> (f64, f64) {
        extent(
            self.rows
                .iter()
                .flat_map(|row| row.values.iter().map(Field::value)),
        )
    }
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold(
        (OrderedFloat(f64::INFINITY), OrderedFloat(f64::NEG_INFINITY)),
        |(min, max), value| (min.min(OrderedFloat(value)), max.max(OrderedFloat(value))),
    );
    (min.into_inner(), max.into_inner())
}
