//! Query state of one list view.
//!
//! [`QueryState`] is the single source of truth for what the table shows:
//! search text, active filters, sort, page and column visibility. It is
//! plain data. The engine validates changes before committing them, so a
//! committed state is always one the predicate compiler accepts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clause::FilterSpec;
use crate::config::{ColumnDef, EntityConfig};
use crate::ordering::SortSpec;
use crate::pager::PageSpec;

/// Column id to visibility. Columns without an entry are visible.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnVisibility(BTreeMap<String, bool>);

impl ColumnVisibility {
    pub fn all_visible(columns: &[ColumnDef]) -> Self {
        ColumnVisibility(columns.iter().map(|c| (c.id.clone(), true)).collect())
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(true)
    }

    /// Number of configured columns currently shown.
    pub fn visible_count(&self, columns: &[ColumnDef]) -> usize {
        columns.iter().filter(|c| self.is_visible(&c.id)).count()
    }

    /// Ids with an entry in the map, shown or not.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn set(&mut self, id: &str, visible: bool) {
        self.0.insert(id.to_string(), visible);
    }
}

/// The part of the query state that decides which records match.
///
/// Fetch tickets capture it so a response for an older search or filter
/// set is recognised. Filters are kept ordered by field, so the same set
/// of filters compares equal whatever order it was built in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Criteria {
    pub search: String,
    pub filters: Vec<FilterSpec>,
}

impl Criteria {
    pub fn new(search: impl Into<String>, filters: &[FilterSpec]) -> Self {
        let mut filters = filters.to_vec();
        filters.sort_by(|a, b| a.field.cmp(&b.field));
        Criteria {
            search: search.into(),
            filters,
        }
    }
}

/// Search, filters, sort, page and columns of one list view.
///
/// ```
/// use dernek_seeker::{presets, QueryState};
///
/// let state = QueryState::for_entity(&presets::donations());
/// assert_eq!(state.search(), "");
/// assert!(state.filters().is_empty());
/// assert_eq!(state.page().index(), 0);
/// assert_eq!(state.page().size().get(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    #[serde(default)]
    pub(crate) search: String,
    #[serde(default)]
    pub(crate) filters: Vec<FilterSpec>,
    #[serde(default)]
    pub(crate) sort: SortSpec,
    #[serde(default)]
    pub(crate) page: PageSpec,
    #[serde(default)]
    pub(crate) columns: ColumnVisibility,
}

impl QueryState {
    /// Initial state when a list view mounts.
    pub fn for_entity(config: &EntityConfig) -> Self {
        let page = PageSpec::new(0, config.page_size).unwrap_or_default();
        QueryState {
            search: String::new(),
            filters: Vec::new(),
            sort: config.default_sort.clone(),
            page,
            columns: ColumnVisibility::all_visible(&config.columns),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    /// The active filter on `field`, if any.
    pub fn filter(&self, field: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|f| f.field == field)
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> PageSpec {
        self.page
    }

    pub fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    pub fn criteria(&self) -> Criteria {
        Criteria::new(self.search.clone(), &self.filters)
    }

    /// `true` when search or any filter is active, which is when the
    /// clear button is offered.
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || !self.filters.is_empty()
    }

    // ========================================================================
    // Builders (unvalidated; see `ListView::restore`)
    // ========================================================================

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, spec: FilterSpec) -> Self {
        self.filters = self.filters_with(spec);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: PageSpec) -> Self {
        self.page = page;
        self
    }

    /// The filter list with `spec` set. An existing filter on the same
    /// field is replaced in place, anything else is appended.
    pub(crate) fn filters_with(&self, spec: FilterSpec) -> Vec<FilterSpec> {
        let mut filters = self.filters.clone();
        match filters.iter_mut().find(|f| f.field == spec.field) {
            Some(slot) => *slot = spec,
            None => filters.push(spec),
        }
        filters
    }
}
