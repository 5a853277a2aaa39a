//! CSV and JSON export of list rows.
//!
//! Exports cover the visible columns only. CSV is meant for spreadsheets,
//! so headers are column labels and status cells use their option labels.
//! JSON keeps column ids and raw values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::config::FilterDef;
use crate::error::{Result, SeekerError};
use crate::traits::{Record, RecordId};
use crate::value::{Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

/// A column included in an export.
#[derive(Debug, Clone, Copy)]
pub struct ExportColumn<'a> {
    pub id: &'a str,
    pub label: &'a str,
    /// Filter options of the column's field, used to label status cells.
    pub options: Option<&'a FilterDef>,
}

/// Renders rows in `format`. An empty row set is an error.
pub fn render<R: Record>(rows: &[&R], columns: &[ExportColumn<'_>], format: ExportFormat) -> Result<String> {
    if rows.is_empty() {
        return Err(SeekerError::NothingToExport);
    }
    match format {
        ExportFormat::Csv => to_csv(rows, columns),
        ExportFormat::Json => to_json(rows, columns),
    }
}

pub fn to_csv<R: Record>(rows: &[&R], columns: &[ExportColumn<'_>]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(columns.iter().map(|c| c.label))?;
    for row in rows {
        wtr.write_record(columns.iter().map(|c| csv_cell(&row.field_value(c.id), c.options)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| SeekerError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| SeekerError::CsvEncoding)
}

pub fn to_json<R: Record>(rows: &[&R], columns: &[ExportColumn<'_>]) -> Result<String> {
    let objects: Vec<Json> = rows
        .iter()
        .map(|row| {
            let mut object = Map::new();
            object.insert("id".to_string(), json_id(&row.record_id()));
            for column in columns {
                object.insert(column.id.to_string(), json_cell(&row.field_value(column.id)));
            }
            Json::Object(object)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&objects)?)
}

/// `{base}-{YYYY-MM-DD}.{ext}`, e.g. `bagislar-2024-05-03.csv`.
pub fn file_name(base: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!("{}-{}.{}", base, date.format("%Y-%m-%d"), format.extension())
}

fn csv_cell(value: &Value<'_>, options: Option<&FilterDef>) -> String {
    match (value, options) {
        (Value::Enum(key), Some(def)) => def.label_for(key).unwrap_or(*key).to_string(),
        _ => value.display(),
    }
}

fn json_id(id: &RecordId) -> Json {
    match id {
        RecordId::Number(n) => Json::from(*n),
        RecordId::Text(s) => Json::String(s.clone()),
    }
}

fn json_cell(value: &Value<'_>) -> Json {
    match value {
        Value::String(s) | Value::Enum(s) => Json::String((*s).to_string()),
        Value::Number(Number::I64(n)) => Json::from(*n),
        Value::Number(Number::U64(n)) => Json::from(*n),
        Value::Number(Number::F64(n)) => serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number),
        Value::Timestamp(t) => Json::String(t.to_string()),
        Value::Bool(b) => Json::Bool(*b),
        Value::None => Json::Null,
    }
}
