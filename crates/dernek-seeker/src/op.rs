//! Filter operators.
//!
//! The [`FilterOp`] enum lists the operators a list-view filter can use.
//! Not all operators are valid for all field kinds.

use serde::{Deserialize, Serialize};

use crate::config::FieldKind;

/// Operator of a filter.
///
/// - `Equals`: exact match. Valid for every kind.
/// - `OneOf`: value is in a set. Valid for text, number, status and bool.
/// - `Range`: inclusive bounds. Valid for numbers and dates.
/// - `Contains`: case-insensitive substring. Valid for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOp {
    Equals,
    OneOf,
    Range,
    Contains,
}

impl FilterOp {
    /// Returns `true` if this operator can be applied to `kind`.
    pub fn supports(self, kind: FieldKind) -> bool {
        match self {
            FilterOp::Equals => true,
            FilterOp::OneOf => !matches!(kind, FieldKind::Date),
            FilterOp::Range => matches!(kind, FieldKind::Number | FieldKind::Date),
            FilterOp::Contains => matches!(kind, FieldKind::Text),
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Equals => "equals",
            FilterOp::OneOf => "oneOf",
            FilterOp::Range => "range",
            FilterOp::Contains => "contains",
        }
    }
}

impl std::fmt::Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
