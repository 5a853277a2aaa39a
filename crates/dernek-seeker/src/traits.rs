//! The [`Record`] trait and record identity.
//!
//! Any row type shown in a list view implements [`Record`]: a stable id
//! plus field access by name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Stable unique key of a record.
///
/// Numeric ids order numerically and sort before text ids, so `9 < 10`
/// rather than the string order `"10" < "9"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Number(n)
    }
}

impl From<u32> for RecordId {
    fn from(n: u32) -> Self {
        RecordId::Number(n as u64)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// A row the list-view engine can search, filter and sort.
///
/// The engine only ever reads records. A field that the record does not
/// carry must return [`Value::None`]; filters on it then fail closed.
///
/// # Example
///
/// ```
/// use dernek_seeker::{Number, Record, RecordId, Value};
///
/// struct Payment {
///     id: u64,
///     beneficiary: String,
///     amount: f64,
/// }
///
/// impl Record for Payment {
///     fn record_id(&self) -> RecordId {
///         RecordId::Number(self.id)
///     }
///
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "yararlanici" => Value::String(&self.beneficiary),
///             "tutar" => Value::Number(Number::F64(self.amount)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the record's stable id.
    ///
    /// Only consulted to break ties while sorting and to track selection,
    /// so it may allocate.
    fn record_id(&self) -> RecordId;

    /// Returns the value of a field for search, filtering and sorting.
    fn field_value(&self, field: &str) -> Value<'_>;
}

impl<R: Record + ?Sized> Record for &R {
    fn record_id(&self) -> RecordId {
        (**self).record_id()
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    struct Member {
        id: u64,
        name: String,
        dues: i64,
    }

    impl Record for Member {
        fn record_id(&self) -> RecordId {
            RecordId::Number(self.id)
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "ad_soyad" => Value::String(&self.name),
                "aidat" => Value::Number(Number::I64(self.dues)),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn manual_record_impl() {
        let m = Member {
            id: 7,
            name: "Elif Kaya".to_string(),
            dues: 150,
        };

        assert_eq!(m.record_id(), RecordId::Number(7));
        assert_eq!(m.field_value("ad_soyad"), Value::String("Elif Kaya"));
        assert_eq!(m.field_value("aidat"), Value::Number(Number::I64(150)));
        assert_eq!(m.field_value("unknown"), Value::None);
        assert_eq!((&m).field_value("aidat"), Value::Number(Number::I64(150)));
    }

    #[test]
    fn record_id_ordering() {
        assert!(RecordId::Number(9) < RecordId::Number(10));
        assert!(RecordId::Number(u64::MAX) < RecordId::from("a"));
        assert!(RecordId::from("a") < RecordId::from("b"));
        assert_eq!(RecordId::from(12u32).to_string(), "12");
    }
}
