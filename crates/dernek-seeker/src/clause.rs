//! Filter specifications and compiled clauses.
//!
//! A [`FilterSpec`] is what the caller asks for: a field, an operator and
//! raw input text, exactly as a filter widget produces it. Compiling it
//! against the entity configuration validates and parses the input into a
//! [`Clause`], which is what the predicate evaluates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::collate::{contains_folded, to_lower_tr};
use crate::config::{EntityConfig, FieldKind, FilterDef};
use crate::error::{Result, SeekerError};
use crate::op::FilterOp;
use crate::ordering::compare_values;
use crate::value::{Number, Scalar, Timestamp, Value};

/// Raw filter input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// One value, for `equals` and `contains`.
    Single(String),
    /// A set of values, for `oneOf`.
    Set(Vec<String>),
    /// Inclusive bounds, for `range`. Either side may be open.
    Range {
        min: Option<String>,
        max: Option<String>,
    },
}

/// A filter on one field, as requested by the caller.
///
/// ```
/// use dernek_seeker::{FilterOp, FilterSpec, FilterValue};
///
/// let spec = FilterSpec::one_of("durum", ["beklemede", "onaylandi"]);
/// assert_eq!(spec.op, FilterOp::OneOf);
/// assert_eq!(
///     spec.value,
///     FilterValue::Set(vec!["beklemede".into(), "onaylandi".into()])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl FilterSpec {
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        FilterSpec {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterSpec::new(field, FilterOp::Equals, FilterValue::Single(value.into()))
    }

    pub fn one_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = values.into_iter().map(Into::into).collect();
        FilterSpec::new(field, FilterOp::OneOf, FilterValue::Set(set))
    }

    pub fn range(field: impl Into<String>, min: Option<&str>, max: Option<&str>) -> Self {
        FilterSpec::new(
            field,
            FilterOp::Range,
            FilterValue::Range {
                min: min.map(str::to_string),
                max: max.map(str::to_string),
            },
        )
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterSpec::new(field, FilterOp::Contains, FilterValue::Single(value.into()))
    }
}

/// Parsed comparison operand of a clause.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Exact(Scalar),
    Set(Vec<Scalar>),
    Bounds {
        min: Option<Scalar>,
        max: Option<Scalar>,
    },
    /// Lower-cased substring.
    Needle(String),
}

/// A validated filter, ready to evaluate against field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    field: String,
    operand: Operand,
}

impl Clause {
    /// Validates `spec` against the entity configuration and parses its
    /// input.
    ///
    /// Fails on an unknown field, an operator the field's kind does not
    /// support, input that does not parse as the field's kind, a value
    /// shape that does not fit the operator, an empty set or needle, a
    /// range without bounds or with `min > max`, and a status value that
    /// is not one of the configured filter options.
    pub fn compile(spec: &FilterSpec, config: &EntityConfig) -> Result<Clause> {
        let def = config.require_field(&spec.field)?;
        if !spec.op.supports(def.kind) {
            return Err(SeekerError::InvalidOperatorForType {
                op: spec.op.as_str(),
                kind: def.kind.as_str(),
            });
        }

        let parser = ScalarParser {
            field: &spec.field,
            kind: def.kind,
            options: config.filter_def(&spec.field),
        };

        let operand = match (spec.op, &spec.value) {
            (FilterOp::Equals, FilterValue::Single(raw)) => Operand::Exact(parser.parse(raw, false)?),
            (FilterOp::OneOf, FilterValue::Set(raws)) => {
                if raws.is_empty() {
                    return Err(malformed(&spec.field, "empty value set"));
                }
                let set = raws
                    .iter()
                    .map(|raw| parser.parse(raw, false))
                    .collect::<Result<Vec<_>>>()?;
                Operand::Set(set)
            }
            (FilterOp::Range, FilterValue::Range { min, max }) => {
                if min.is_none() && max.is_none() {
                    return Err(malformed(&spec.field, "range needs at least one bound"));
                }
                let lo = min.as_deref().map(|raw| parser.parse(raw, false)).transpose()?;
                let hi = max.as_deref().map(|raw| parser.parse(raw, true)).transpose()?;
                if let (Some(lo), Some(hi)) = (&lo, &hi) {
                    if compare_values(&lo.as_value(), &hi.as_value()) == Ordering::Greater {
                        return Err(SeekerError::InvertedRange {
                            field: spec.field.clone(),
                            min: min.clone().unwrap_or_default(),
                            max: max.clone().unwrap_or_default(),
                        });
                    }
                }
                Operand::Bounds { min: lo, max: hi }
            }
            (FilterOp::Contains, FilterValue::Single(raw)) => {
                if raw.is_empty() {
                    return Err(malformed(&spec.field, "empty search text"));
                }
                Operand::Needle(to_lower_tr(raw))
            }
            _ => return Err(malformed(&spec.field, "value does not fit the operator")),
        };

        Ok(Clause {
            field: spec.field.clone(),
            operand,
        })
    }

    /// The field this clause reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Evaluates this clause against a field value.
    ///
    /// A missing field or a value of the wrong type never matches.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        if value.is_none() {
            return false;
        }
        match &self.operand {
            Operand::Exact(expected) => scalar_eq(expected, value),
            Operand::Set(set) => set.iter().any(|expected| scalar_eq(expected, value)),
            Operand::Bounds { min, max } => {
                let above = min
                    .as_ref()
                    .map_or(true, |lo| matches!(bound_cmp(value, lo), Some(o) if o != Ordering::Less));
                let below = max
                    .as_ref()
                    .map_or(true, |hi| matches!(bound_cmp(value, hi), Some(o) if o != Ordering::Greater));
                above && below
            }
            Operand::Needle(needle) => value
                .as_str()
                .map_or(false, |text| contains_folded(text, needle)),
        }
    }
}

struct ScalarParser<'a> {
    field: &'a str,
    kind: FieldKind,
    options: Option<&'a FilterDef>,
}

impl ScalarParser<'_> {
    fn parse(&self, raw: &str, upper: bool) -> Result<Scalar> {
        match self.kind {
            FieldKind::Text => Ok(Scalar::String(raw.to_string())),
            FieldKind::Status => match self.options {
                Some(def) if !def.accepts(raw) => Err(SeekerError::UnknownOption {
                    field: self.field.to_string(),
                    value: raw.to_string(),
                }),
                _ => Ok(Scalar::Enum(raw.to_string())),
            },
            FieldKind::Number => Number::parse(raw)
                .map(Scalar::Number)
                .ok_or_else(|| self.invalid(raw, "a number")),
            FieldKind::Date => Timestamp::parse_bound(raw, upper)
                .map(Scalar::Timestamp)
                .ok_or_else(|| self.invalid(raw, "a date")),
            FieldKind::Bool => match raw.trim() {
                "true" | "1" => Ok(Scalar::Bool(true)),
                "false" | "0" => Ok(Scalar::Bool(false)),
                _ => Err(self.invalid(raw, "true or false")),
            },
        }
    }

    fn invalid(&self, raw: &str, expected: &'static str) -> SeekerError {
        SeekerError::InvalidFilterValue {
            field: self.field.to_string(),
            value: raw.to_string(),
            expected,
        }
    }
}

fn malformed(field: &str, reason: &'static str) -> SeekerError {
    SeekerError::MalformedFilter {
        field: field.to_string(),
        reason,
    }
}

fn scalar_eq(expected: &Scalar, value: &Value<'_>) -> bool {
    match (expected, value) {
        (Scalar::String(a) | Scalar::Enum(a), v) => v.as_str() == Some(a.as_str()),
        (Scalar::Number(a), Value::Number(b)) => b.compare(*a) == Some(Ordering::Equal),
        (Scalar::Timestamp(a), Value::Timestamp(b)) => a == b,
        (Scalar::Bool(a), Value::Bool(b)) => a == b,
        _ => false,
    }
}

fn bound_cmp(value: &Value<'_>, bound: &Scalar) -> Option<Ordering> {
    match (value, bound) {
        (Value::Number(v), Scalar::Number(b)) => v.compare(*b),
        (Value::Timestamp(v), Scalar::Timestamp(b)) => Some(v.cmp(b)),
        _ => None,
    }
}
