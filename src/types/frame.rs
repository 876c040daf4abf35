//! Columnar data frames
//!
//! A [`DataFrame`] is a named set of equally long [`Field`]s. Time-series frames
//! carry a time column of epoch milliseconds, ordered ascending or descending
//! depending on the query's [`TimeOrdering`](crate::TimeOrdering).

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::constants::TIME_FIELD_NAME;

/// Type of a field's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Time,
    Number,
    String,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Time => "time",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed column values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum FieldValues {
    /// Epoch milliseconds
    Time(Vec<i64>),
    Number(Vec<Option<f64>>),
    String(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
}

impl FieldValues {
    pub fn len(&self) -> usize {
        match self {
            FieldValues::Time(values) => values.len(),
            FieldValues::Number(values) => values.len(),
            FieldValues::String(values) => values.len(),
            FieldValues::Boolean(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValues::Time(_) => FieldType::Time,
            FieldValues::Number(_) => FieldType::Number,
            FieldValues::String(_) => FieldType::String,
            FieldValues::Boolean(_) => FieldType::Boolean,
        }
    }

    /// Time values, if this is a time column
    pub fn as_time(&self) -> Option<&[i64]> {
        match self {
            FieldValues::Time(values) => Some(values),
            _ => None,
        }
    }

    /// Copy of the rows in `rows`
    ///
    /// A range that does not fit the column yields an empty column of the same type.
    pub fn slice(&self, rows: Range<usize>) -> Self {
        fn copy<T: Clone>(values: &[T], rows: Range<usize>) -> Vec<T> {
            values.get(rows).map(<[T]>::to_vec).unwrap_or_default()
        }

        match self {
            FieldValues::Time(values) => FieldValues::Time(copy(values, rows)),
            FieldValues::Number(values) => FieldValues::Number(copy(values, rows)),
            FieldValues::String(values) => FieldValues::String(copy(values, rows)),
            FieldValues::Boolean(values) => FieldValues::Boolean(copy(values, rows)),
        }
    }

    /// Append `other`'s rows; returns `false` and leaves `self` untouched on a type mismatch
    pub fn append(&mut self, other: &FieldValues) -> bool {
        match (self, other) {
            (FieldValues::Time(values), FieldValues::Time(more)) => values.extend_from_slice(more),
            (FieldValues::Number(values), FieldValues::Number(more)) => {
                values.extend_from_slice(more)
            }
            (FieldValues::String(values), FieldValues::String(more)) => {
                values.extend_from_slice(more)
            }
            (FieldValues::Boolean(values), FieldValues::Boolean(more)) => {
                values.extend_from_slice(more)
            }
            _ => return false,
        }
        true
    }
}

/// Display configuration attached to a field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub unit: Option<String>,
    pub display_name: Option<String>,
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub config: FieldConfig,
    pub values: FieldValues,
}

impl Field {
    pub fn new(name: impl Into<String>, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
            config: FieldConfig::default(),
            values,
        }
    }

    /// A time column named `time`
    pub fn time(values: Vec<i64>) -> Self {
        Self::new(TIME_FIELD_NAME, FieldValues::Time(values))
    }

    /// A numeric column without gaps
    pub fn number(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            FieldValues::Number(values.into_iter().map(Some).collect()),
        )
    }

    /// A string column without gaps
    pub fn string<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            name,
            FieldValues::String(values.into_iter().map(|v| Some(v.into())).collect()),
        )
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.config.unit = Some(unit.into());
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.values.field_type()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of this field restricted to `rows`, keeping name, labels and config
    pub fn slice(&self, rows: Range<usize>) -> Self {
        Self {
            name: self.name.clone(),
            labels: self.labels.clone(),
            config: self.config.clone(),
            values: self.values.slice(rows),
        }
    }
}

/// A named collection of equally long fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFrame {
    pub name: Option<String>,
    /// Ref id of the query that produced the frame
    pub ref_id: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl DataFrame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ref_id: None,
            fields: Vec::new(),
        }
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.fields.first().map_or(0, Field::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the time column
    ///
    /// Prefers a time-typed field named `time`, otherwise the first time-typed field.
    pub fn time_field_index(&self) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name == TIME_FIELD_NAME && f.field_type() == FieldType::Time)
            .or_else(|| {
                self.fields
                    .iter()
                    .position(|f| f.field_type() == FieldType::Time)
            })
    }

    /// Values of the time column
    pub fn time_values(&self) -> Option<&[i64]> {
        self.time_field_index()
            .and_then(|index| self.fields[index].values.as_time())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Same frame identity with no fields at all
    pub fn without_fields(&self) -> Self {
        Self {
            name: self.name.clone(),
            ref_id: self.ref_id.clone(),
            fields: Vec::new(),
        }
    }

    /// Copy of the frame with every field restricted to the same `rows`
    pub fn slice_rows(&self, rows: Range<usize>) -> Self {
        Self {
            name: self.name.clone(),
            ref_id: self.ref_id.clone(),
            fields: self
                .fields
                .iter()
                .map(|field| field.slice(rows.clone()))
                .collect(),
        }
    }
}
