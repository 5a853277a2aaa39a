//! Error types for the seeker crate.

use thiserror::Error;

/// Errors returned when a list-view operation is rejected.
///
/// A rejected operation never changes the query state: the caller gets the
/// error and the previous state stays in effect.
#[derive(Debug, Error)]
pub enum SeekerError {
    /// The field is not declared in the entity configuration.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The column is not declared in the entity configuration.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Operator is not valid for the field's kind.
    #[error("operator '{op}' is not valid for {kind} fields")]
    InvalidOperatorForType {
        op: &'static str,
        kind: &'static str,
    },

    /// A filter value could not be parsed as the field's kind.
    #[error("invalid value '{value}' for field '{field}': expected {expected}")]
    InvalidFilterValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// The filter value shape does not fit the operator.
    #[error("filter on '{field}' is malformed: {reason}")]
    MalformedFilter { field: String, reason: &'static str },

    /// Range lower bound is greater than its upper bound.
    #[error("range on '{field}' is inverted: {min} > {max}")]
    InvertedRange {
        field: String,
        min: String,
        max: String,
    },

    /// Status value is not one of the configured filter options.
    #[error("'{value}' is not an option of filter '{field}'")]
    UnknownOption { field: String, value: String },

    /// The field cannot be used as a sort key.
    #[error("field '{0}' is not sortable")]
    NotSortable(String),

    /// Page size must be positive.
    #[error("invalid page size {0}")]
    InvalidPageSize(usize),

    /// Hiding this column would leave no visible column.
    #[error("column '{0}' is the last visible column")]
    LastVisibleColumn(String),

    /// The column is configured as always visible.
    #[error("column '{0}' cannot be hidden")]
    ColumnNotHideable(String),

    /// No record with this id is loaded.
    #[error("unknown record '{0}'")]
    UnknownRecord(String),

    /// A raw record could not be coerced into the entity's field kinds.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Entity configuration failed validation.
    #[error("invalid entity configuration: {0}")]
    InvalidConfig(String),

    /// Nothing to export (no matching or selected rows).
    #[error("no rows to export")]
    NothingToExport,

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output was not valid UTF-8")]
    CsvEncoding,
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
