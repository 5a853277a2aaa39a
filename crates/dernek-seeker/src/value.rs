//! Runtime value types for field comparison.
//!
//! The [`Value`] enum is the borrowed view of a record field at query time.
//! [`Scalar`] is its owned counterpart, used by dynamic records and by
//! compiled filter clauses.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Runtime value for comparison, borrowed from the source record.
///
/// # Example
///
/// ```
/// use dernek_seeker::{Number, Value};
///
/// struct Donation {
///     donor: String,
///     amount: u32,
/// }
///
/// fn field<'a>(d: &'a Donation, name: &str) -> Value<'a> {
///     match name {
///         "donor" => Value::String(&d.donor),
///         "amount" => Value::Number(Number::U64(d.amount as u64)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Free text.
    String(&'a str),
    /// Numeric value (amounts, counts).
    Number(Number),
    /// Point in time.
    Timestamp(Timestamp),
    /// Enumerated status, by its stable key (e.g. `"tamamlandi"`).
    Enum(&'a str),
    /// Boolean flag.
    Bool(bool),
    /// Field not present on this record.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the text of a `String` or `Enum` value.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Position of this variant in the cross-type sort order.
    pub(crate) fn type_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Number(_) => 1,
            Value::Timestamp(_) => 2,
            Value::Enum(_) => 3,
            Value::String(_) => 4,
            Value::None => 5,
        }
    }

    /// Formats the value for export and facet labels.
    ///
    /// Missing values render as an empty string.
    pub fn display(&self) -> String {
        match self {
            Value::String(s) | Value::Enum(s) => (*s).to_string(),
            Value::Number(n) => n.to_string(),
            Value::Timestamp(t) => t.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::None => String::new(),
        }
    }

    /// Converts the value into an owned [`Scalar`], or `None` when missing.
    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            Value::String(s) => Some(Scalar::String((*s).to_string())),
            Value::Number(n) => Some(Scalar::Number(*n)),
            Value::Timestamp(t) => Some(Scalar::Timestamp(*t)),
            Value::Enum(s) => Some(Scalar::Enum((*s).to_string())),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::None => None,
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Comparisons are exact across variants: integers compare as `i128`, and
/// a float compares against an integer by its whole part, then its
/// fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Integer variants widened to `i128`; `None` for floats.
    fn as_integer(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(i128::from(n)),
            Number::U64(n) => Some(i128::from(n)),
            Number::F64(_) => None,
        }
    }

    /// Compares two numbers, handling mixed types. `None` only for NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self.as_integer(), other.as_integer()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (Some(a), None) => float_cmp_integer(other.to_f64(), a).map(Ordering::reverse),
            (None, Some(b)) => float_cmp_integer(self.to_f64(), b),
            (None, None) => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Total ordering used for sorting.
    ///
    /// NaN follows IEEE total order: a positive NaN sorts above every
    /// number, a negative one below.
    pub fn total_cmp(self, other: Number) -> Ordering {
        if let Some(ordering) = self.compare(other) {
            return ordering;
        }
        match (self.as_integer(), other.as_integer()) {
            (Some(_), None) => nan_side(other.to_f64()).reverse(),
            (None, Some(_)) => nan_side(self.to_f64()),
            _ => self.to_f64().total_cmp(&other.to_f64()),
        }
    }

    /// Parses user input such as `"1500"`, `"-3"`, `"99.5"` or `"99,5"`.
    ///
    /// A comma is accepted as decimal separator when no dot is present.
    /// Non-finite results are rejected.
    pub fn parse(raw: &str) -> Option<Number> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(n) = s.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = s.parse::<u64>() {
            return Some(Number::U64(n));
        }
        let normalized = if s.contains(',') && !s.contains('.') {
            s.replace(',', ".")
        } else {
            s.to_string()
        };
        normalized
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::F64)
    }
}

/// Every `i64` and `u64` lies in `[-2^63, 2^64)`.
const INTEGER_MIN: f64 = -9_223_372_036_854_775_808.0;
const INTEGER_END: f64 = 18_446_744_073_709_551_616.0;

/// Exact comparison of a float with an integer. `None` for NaN.
fn float_cmp_integer(f: f64, i: i128) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= INTEGER_END {
        return Some(Ordering::Greater);
    }
    if f < INTEGER_MIN {
        return Some(Ordering::Less);
    }
    let whole = f.trunc();
    match (whole as i128).cmp(&i) {
        Ordering::Equal => (f - whole).partial_cmp(&0.0),
        ordering => Some(ordering),
    }
}

fn nan_side(nan: f64) -> Ordering {
    if nan.is_sign_negative() {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Timestamp value represented as milliseconds since Unix epoch (UTC).
///
/// ```
/// use dernek_seeker::Timestamp;
///
/// let day = Timestamp::parse("2024-03-01").unwrap();
/// assert_eq!(day, Timestamp::from_ymd(2024, 3, 1).unwrap());
/// assert_eq!(day.to_string(), "2024-03-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Midnight UTC of the given calendar day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::start_of)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Parses an RFC 3339 date-time or a date (`YYYY-MM-DD` or `DD.MM.YYYY`).
    ///
    /// A bare date resolves to midnight UTC.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::parse_bound(raw, false)
    }

    /// Like [`Timestamp::parse`], but a bare date used as an upper bound
    /// resolves to the last millisecond of that day.
    pub fn parse_bound(raw: &str, upper: bool) -> Option<Self> {
        let s = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Timestamp(dt.timestamp_millis()));
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
            .ok()?;
        if upper {
            date.and_hms_milli_opt(23, 59, 59, 999)
                .map(|dt| Timestamp(dt.and_utc().timestamp_millis()))
        } else {
            Self::start_of(date)
        }
    }

    fn start_of(date: NaiveDate) -> Option<Self> {
        date.and_hms_opt(0, 0, 0)
            .map(|dt| Timestamp(dt.and_utc().timestamp_millis()))
    }
}

impl std::fmt::Display for Timestamp {
    /// Midnight renders as a bare date, anything else as RFC 3339.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) if self.0.rem_euclid(MILLIS_PER_DAY) == 0 => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

/// Owned field value.
///
/// Unlike [`Value`], which borrows from a record, `Scalar` owns its data so
/// it can live in dynamic records and compiled filter clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    String(String),
    Number(Number),
    Timestamp(Timestamp),
    Enum(String),
    Bool(bool),
}

impl Scalar {
    /// Creates an enumerated status value.
    pub fn status(key: impl Into<String>) -> Self {
        Scalar::Enum(key.into())
    }

    /// Borrows this scalar as a [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Scalar::String(s) => Value::String(s),
            Scalar::Number(n) => Value::Number(*n),
            Scalar::Timestamp(t) => Value::Timestamp(*t),
            Scalar::Enum(s) => Value::Enum(s),
            Scalar::Bool(b) => Value::Bool(*b),
        }
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

impl From<Timestamp> for Scalar {
    fn from(t: Timestamp) -> Self {
        Scalar::Timestamp(t)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(Number::I64(n))
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        Scalar::Number(Number::U64(n))
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(Number::F64(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_extractors() {
        assert_eq!(Value::String("hello").as_str(), Some("hello"));
        assert_eq!(Value::Enum("aktif").as_str(), Some("aktif"));
        assert_eq!(
            Value::Number(Number::I64(42)).as_number(),
            Some(Number::I64(42))
        );
        assert_eq!(
            Value::Timestamp(Timestamp(1000)).as_timestamp(),
            Some(Timestamp(1000))
        );
        assert_eq!(Value::Bool(true).as_bool(), Some(true));

        assert_eq!(Value::String("test").as_number(), None);
        assert_eq!(Value::Number(Number::I64(1)).as_str(), None);
        assert!(Value::None.is_none());
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(
            Number::I64(5).compare(Number::U64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::I64(5).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    }

    #[test]
    fn number_total_cmp_orders_nan() {
        let nan = Number::F64(f64::NAN);
        assert_eq!(nan.total_cmp(nan), Ordering::Equal);
        assert_eq!(Number::F64(1.0).total_cmp(nan), Ordering::Less);
        assert_eq!(Number::U64(u64::MAX).total_cmp(nan), Ordering::Less);
        assert_eq!(Number::I64(i64::MIN).total_cmp(Number::F64(-f64::NAN)), Ordering::Greater);
    }

    #[test]
    fn number_comparisons_are_exact_above_f64_precision() {
        let big = 1u64 << 53;
        let a = Number::U64(big + 1);
        let b = Number::F64(big as f64);
        let c = Number::U64(big);
        assert_eq!(a.total_cmp(b), Ordering::Greater);
        assert_eq!(b.total_cmp(c), Ordering::Equal);
        assert_eq!(a.total_cmp(c), Ordering::Greater);

        assert_eq!(Number::U64(u64::MAX).compare(Number::I64(-1)), Some(Ordering::Greater));
        assert_eq!(Number::F64(0.5).compare(Number::I64(0)), Some(Ordering::Greater));
        assert_eq!(Number::F64(-0.5).compare(Number::I64(0)), Some(Ordering::Less));
        assert_eq!(Number::F64(1e20).compare(Number::U64(u64::MAX)), Some(Ordering::Greater));
        assert_eq!(Number::F64(f64::NEG_INFINITY).compare(Number::I64(i64::MIN)), Some(Ordering::Less));
    }

    #[test]
    fn number_parse() {
        assert_eq!(Number::parse("1500"), Some(Number::I64(1500)));
        assert_eq!(Number::parse(" -3 "), Some(Number::I64(-3)));
        assert_eq!(Number::parse("99.5"), Some(Number::F64(99.5)));
        assert_eq!(Number::parse("99,5"), Some(Number::F64(99.5)));
        assert_eq!(Number::parse("1.500,50"), None);
        assert_eq!(Number::parse("abc"), None);
        assert_eq!(Number::parse(""), None);
        assert_eq!(Number::parse("NaN"), None);
    }

    #[test]
    fn timestamp_parse_dates() {
        let day = Timestamp::from_ymd(2024, 3, 1).unwrap();
        assert_eq!(Timestamp::parse("2024-03-01"), Some(day));
        assert_eq!(Timestamp::parse("01.03.2024"), Some(day));
        assert_eq!(Timestamp::parse("2024-03-01T00:00:00Z"), Some(day));
        assert_eq!(Timestamp::parse("March 1st"), None);
    }

    #[test]
    fn timestamp_upper_bound_covers_whole_day() {
        let start = Timestamp::parse_bound("2024-03-01", false).unwrap();
        let end = Timestamp::parse_bound("2024-03-01", true).unwrap();
        assert_eq!(end.as_millis() - start.as_millis(), MILLIS_PER_DAY - 1);

        // Explicit times are taken as given.
        let exact = Timestamp::parse_bound("2024-03-01T10:00:00Z", true).unwrap();
        assert_eq!(exact.as_millis() - start.as_millis(), 10 * 3_600_000);
    }

    #[test]
    fn timestamp_display() {
        assert_eq!(
            Timestamp::from_ymd(2023, 12, 31).unwrap().to_string(),
            "2023-12-31"
        );
        assert_eq!(
            Timestamp::parse("2024-01-02T03:04:05Z").unwrap().to_string(),
            "2024-01-02T03:04:05Z"
        );
    }

    #[test]
    fn scalar_round_trips_through_value() {
        let s = Scalar::status("beklemede");
        assert_eq!(s.as_value(), Value::Enum("beklemede"));
        assert_eq!(s.as_value().to_scalar(), Some(s));
        assert_eq!(Value::None.to_scalar(), None);
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Number(Number::F64(12.5)).display(), "12.5");
        assert_eq!(Value::Bool(false).display(), "false");
        assert_eq!(Value::None.display(), "");
    }
}
