//! Dynamic records.
//!
//! [`MapRecord`] is a schemaless row: an id plus a map of owned scalars.
//! The fetch layer can coerce raw JSON rows into it with
//! [`MapRecord::from_json`], using the entity configuration to decide each
//! field's kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::config::{EntityConfig, FieldKind};
use crate::error::{Result, SeekerError};
use crate::traits::{Record, RecordId};
use crate::value::{Number, Scalar, Timestamp, Value};

/// A record stored as a field map.
///
/// ```
/// use dernek_seeker::{MapRecord, Number, Record, Scalar, Value};
///
/// let row = MapRecord::new(42u64)
///     .with("bagisci", "Ayşe Yılmaz")
///     .with("tutar", Number::I64(500))
///     .with("durum", Scalar::status("tamamlandi"));
///
/// assert_eq!(row.field_value("durum"), Value::Enum("tamamlandi"));
/// assert!(row.field_value("makbuz_no").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRecord {
    id: RecordId,
    fields: BTreeMap<String, Scalar>,
}

impl MapRecord {
    pub fn new(id: impl Into<RecordId>) -> Self {
        MapRecord {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds or replaces a field, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.set(field, value);
        self
    }

    /// Adds or replaces a field.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Scalar>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields.get(field)
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Coerces a JSON object into a record.
    ///
    /// The id comes from the `id` key (number or string). Every declared
    /// field is looked up by name; dotted names walk nested objects, so
    /// `bagisci.ad` reads `{"bagisci": {"ad": ...}}`. Missing and `null`
    /// fields are left out. A value that cannot be coerced to the field's
    /// kind is an error.
    pub fn from_json(row: &Json, config: &EntityConfig) -> Result<Self> {
        let object = row
            .as_object()
            .ok_or_else(|| SeekerError::InvalidRecord("expected a JSON object".to_string()))?;

        let id = match object.get("id") {
            Some(Json::Number(n)) => n
                .as_u64()
                .map(RecordId::Number)
                .ok_or_else(|| SeekerError::InvalidRecord(format!("unsupported id {}", n)))?,
            Some(Json::String(s)) => RecordId::Text(s.clone()),
            _ => return Err(SeekerError::InvalidRecord("missing id".to_string())),
        };

        let mut record = MapRecord::new(id);
        for def in &config.fields {
            let raw = match lookup(row, &def.name) {
                Some(Json::Null) | None => continue,
                Some(raw) => raw,
            };
            let scalar = coerce(raw, def.kind).ok_or_else(|| {
                SeekerError::InvalidRecord(format!(
                    "field '{}' of record {} is not a valid {}",
                    def.name,
                    record.id,
                    def.kind.as_str()
                ))
            })?;
            record.fields.insert(def.name.clone(), scalar);
        }
        Ok(record)
    }
}

impl Record for MapRecord {
    fn record_id(&self) -> RecordId {
        self.id.clone()
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        self.fields
            .get(field)
            .map(Scalar::as_value)
            .unwrap_or(Value::None)
    }
}

fn lookup<'a>(row: &'a Json, path: &str) -> Option<&'a Json> {
    if let Some(direct) = row.get(path) {
        return Some(direct);
    }
    path.split('.').try_fold(row, |node, part| node.get(part))
}

fn coerce(raw: &Json, kind: FieldKind) -> Option<Scalar> {
    match (kind, raw) {
        (FieldKind::Text, Json::String(s)) => Some(Scalar::String(s.clone())),
        (FieldKind::Text, Json::Number(n)) => Some(Scalar::String(n.to_string())),
        (FieldKind::Status, Json::String(s)) => Some(Scalar::Enum(s.clone())),
        (FieldKind::Number, Json::Number(n)) => json_number(n).map(Scalar::Number),
        (FieldKind::Number, Json::String(s)) => Number::parse(s).map(Scalar::Number),
        (FieldKind::Date, Json::String(s)) => Timestamp::parse(s).map(Scalar::Timestamp),
        (FieldKind::Date, Json::Number(n)) => n.as_i64().map(|ms| Scalar::Timestamp(Timestamp(ms))),
        (FieldKind::Bool, Json::Bool(b)) => Some(Scalar::Bool(*b)),
        _ => None,
    }
}

fn json_number(n: &serde_json::Number) -> Option<Number> {
    if let Some(i) = n.as_i64() {
        Some(Number::I64(i))
    } else if let Some(u) = n.as_u64() {
        Some(Number::U64(u))
    } else {
        n.as_f64().map(Number::F64)
    }
}
