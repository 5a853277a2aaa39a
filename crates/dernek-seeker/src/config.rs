//! Declarative entity configuration.
//!
//! Each entity kind (donations, members, aid applications, payments) is
//! described by one [`EntityConfig`]: its fields and their kinds, which
//! fields free-text search looks at, the table columns, the filter
//! dropdowns, the default sort and the paging options. The predicate
//! compiler, comparator builder and engine consume it uniformly, so no
//! screen needs special-cased logic.
//!
//! Configurations are built in code (see [`crate::presets`]) or loaded
//! from YAML:
//!
//! ```
//! use dernek_seeker::{EntityConfig, EntityKind};
//!
//! let yaml = r#"
//! kind: payment
//! fields:
//!   - { name: yararlanici, kind: text }
//!   - { name: tutar, kind: number }
//! searchable: [yararlanici]
//! columns:
//!   - { id: yararlanici, label: "Yararlanıcı" }
//!   - { id: tutar, label: "Tutar" }
//! "#;
//!
//! let config = EntityConfig::from_yaml(yaml).unwrap();
//! assert_eq!(config.kind, EntityKind::Payment);
//! assert_eq!(config.page_size, 10);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeekerError};
use crate::ordering::SortSpec;
use crate::pager::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

/// The kinds of list the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Donation,
    Member,
    Application,
    Payment,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Donation => "donation",
            EntityKind::Member => "member",
            EntityKind::Application => "application",
            EntityKind::Payment => "payment",
        }
    }

    /// Plural Turkish name, used as the export file name prefix.
    pub fn plural_name(self) -> &'static str {
        match self {
            EntityKind::Donation => "bagislar",
            EntityKind::Member => "uyeler",
            EntityKind::Application => "basvurular",
            EntityKind::Payment => "odemeler",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scalar kind of a field. Decides how filter input is parsed and which
/// operators apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Status,
    Bool,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Status => "status",
            FieldKind::Bool => "bool",
        }
    }
}

/// A record field known to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "default_true")]
    pub sortable: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDef {
            name: name.into(),
            kind,
            sortable: true,
        }
    }

    /// Marks the field as not usable for sorting.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
}

/// A table column. Column ids that match a field name render that field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub id: String,
    pub label: String,
    #[serde(default = "default_true")]
    pub hideable: bool,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        ColumnDef {
            id: id.into(),
            label: label.into(),
            hideable: true,
        }
    }

    /// Marks the column as always visible.
    pub fn fixed(mut self) -> Self {
        self.hideable = false;
        self
    }
}

/// One choice in a filter dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        FilterOption {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A filter dropdown offered for a field.
///
/// When options are listed, status filters only accept those values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDef {
    pub field: String,
    pub title: String,
    #[serde(default)]
    pub options: Vec<FilterOption>,
}

impl FilterDef {
    pub fn new(field: impl Into<String>, title: impl Into<String>) -> Self {
        FilterDef {
            field: field.into(),
            title: title.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(FilterOption::new(value, label));
        self
    }

    /// Returns `true` if `value` is an accepted option (or no options are
    /// configured).
    pub fn accepts(&self, value: &str) -> bool {
        self.options.is_empty() || self.options.iter().any(|o| o.value == value)
    }

    /// Label for an option value, if configured.
    pub fn label_for(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

/// Complete description of one entity kind's list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub kind: EntityKind,
    pub fields: Vec<FieldDef>,
    /// Fields the free-text search box looks at.
    pub searchable: Vec<String>,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub filters: Vec<FilterDef>,
    /// Sort applied when the view mounts and after a full reset.
    #[serde(default)]
    pub default_sort: SortSpec,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
    /// Shown when the store has no records at all.
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
}

impl EntityConfig {
    /// Starts an empty configuration for `kind`.
    pub fn new(kind: EntityKind) -> Self {
        EntityConfig {
            kind,
            fields: Vec::new(),
            searchable: Vec::new(),
            columns: Vec::new(),
            filters: Vec::new(),
            default_sort: SortSpec::default(),
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            empty_message: default_empty_message(),
        }
    }

    // ========================================================================
    // Builders
    // ========================================================================

    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn column(mut self, def: ColumnDef) -> Self {
        self.columns.push(def);
        self
    }

    pub fn filter(mut self, def: FilterDef) -> Self {
        self.filters.push(def);
        self
    }

    pub fn default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = sort;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    // ========================================================================
    // Loading and validation
    // ========================================================================

    /// Parses a YAML configuration and validates it.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let config: EntityConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(invalid("at least one column is required"));
        }

        let mut names = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(invalid(format!("duplicate field '{}'", field.name)));
            }
        }

        let mut ids = HashSet::new();
        for column in &self.columns {
            if !ids.insert(column.id.as_str()) {
                return Err(invalid(format!("duplicate column '{}'", column.id)));
            }
        }

        for name in &self.searchable {
            let field = self
                .field_def(name)
                .ok_or_else(|| invalid(format!("searchable field '{}' is not declared", name)))?;
            if !matches!(field.kind, FieldKind::Text | FieldKind::Status) {
                return Err(invalid(format!(
                    "searchable field '{}' must be text or status, not {}",
                    name,
                    field.kind.as_str()
                )));
            }
        }

        let mut filtered = HashSet::new();
        for filter in &self.filters {
            if self.field_def(&filter.field).is_none() {
                return Err(invalid(format!(
                    "filter field '{}' is not declared",
                    filter.field
                )));
            }
            if !filtered.insert(filter.field.as_str()) {
                return Err(invalid(format!("duplicate filter '{}'", filter.field)));
            }
        }

        for key in self.default_sort.keys() {
            match self.field_def(&key.field) {
                Some(f) if f.sortable => {}
                Some(_) => return Err(invalid(format!("sort field '{}' is not sortable", key.field))),
                None => return Err(invalid(format!("sort field '{}' is not declared", key.field))),
            }
        }

        if self.page_size == 0 {
            return Err(invalid("page size must be positive"));
        }
        if self.page_size_options.contains(&0) {
            return Err(invalid("page size options must be positive"));
        }

        Ok(())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Looks up a field definition by name.
    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Like [`EntityConfig::field_def`], but an unknown name is an error.
    pub fn require_field(&self, name: &str) -> Result<&FieldDef> {
        self.field_def(name)
            .ok_or_else(|| SeekerError::UnknownField(name.to_string()))
    }

    /// Looks up a column definition by id.
    pub fn column_def(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Looks up the filter dropdown configured for a field.
    pub fn filter_def(&self, field: &str) -> Option<&FilterDef> {
        self.filters.iter().find(|f| f.field == field)
    }
}

fn invalid(message: impl Into<String>) -> SeekerError {
    SeekerError::InvalidConfig(message.into())
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_options() -> Vec<usize> {
    PAGE_SIZE_OPTIONS.to_vec()
}

fn default_empty_message() -> String {
    "Veri bulunamadı".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::{Dir, SortSpec};

    fn minimal() -> EntityConfig {
        EntityConfig::new(EntityKind::Member)
            .field(FieldDef::new("ad_soyad", FieldKind::Text))
            .field(FieldDef::new("aidat", FieldKind::Number))
            .searchable(["ad_soyad"])
            .column(ColumnDef::new("ad_soyad", "Ad Soyad"))
    }

    #[test]
    fn builder_defaults() {
        let config = minimal();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.page_size_options, vec![10, 20, 30, 40, 50]);
        assert_eq!(config.empty_message, "Veri bulunamadı");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_missing_columns() {
        let mut config = minimal();
        config.columns.clear();
        assert!(matches!(config.validate(), Err(SeekerError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_unknown_searchable_field() {
        let config = minimal().searchable(["email"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_numeric_searchable_field() {
        let config = minimal().searchable(["aidat"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unsortable_default_sort() {
        let mut config = minimal().default_sort(SortSpec::single("aidat", Dir::Desc));
        assert!(config.validate().is_ok());
        config.fields[1].sortable = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_duplicates() {
        let config = minimal().column(ColumnDef::new("ad_soyad", "Tekrar"));
        assert!(config.validate().is_err());

        let config = minimal().field(FieldDef::new("aidat", FieldKind::Text));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_page_size() {
        assert!(minimal().page_size(0).validate().is_err());
    }

    #[test]
    fn yaml_with_filters_and_sort() {
        let yaml = r#"
kind: application
fields:
  - { name: basvuran, kind: text }
  - { name: durum, kind: status }
  - { name: basvuru_tarihi, kind: date }
searchable: [basvuran]
columns:
  - { id: basvuran, label: "Başvuran" }
  - { id: durum, label: "Durum", hideable: false }
filters:
  - field: durum
    title: Durum
    options:
      - { value: beklemede, label: Beklemede }
      - { value: onaylandi, label: Onaylandı }
default_sort:
  - { field: basvuru_tarihi, dir: desc }
page_size: 20
empty_message: "Başvuru bulunamadı"
"#;
        let config = EntityConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.kind, EntityKind::Application);
        assert_eq!(config.page_size, 20);
        assert!(!config.columns[1].hideable);
        assert_eq!(config.default_sort, SortSpec::single("basvuru_tarihi", Dir::Desc));
        let durum = config.filter_def("durum").unwrap();
        assert!(durum.accepts("onaylandi"));
        assert!(!durum.accepts("odendi"));
        assert_eq!(durum.label_for("beklemede"), Some("Beklemede"));
    }

    #[test]
    fn yaml_validation_errors_surface() {
        let yaml = r#"
kind: payment
fields: []
searchable: [yararlanici]
columns:
  - { id: yararlanici, label: "Yararlanıcı" }
"#;
        assert!(matches!(
            EntityConfig::from_yaml(yaml),
            Err(SeekerError::InvalidConfig(_))
        ));
        assert!(matches!(
            EntityConfig::from_yaml("kind: [unclosed"),
            Err(SeekerError::Yaml(_))
        ));
    }

    #[test]
    fn require_field_reports_unknown() {
        let config = minimal();
        assert!(config.require_field("aidat").is_ok());
        assert!(matches!(
            config.require_field("yok"),
            Err(SeekerError::UnknownField(name)) if name == "yok"
        ));
    }
}
