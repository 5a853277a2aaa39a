//! The list-view engine.
//!
//! [`ListView`] owns one entity kind's records, its [`QueryState`] and the
//! derived result: the indices of matching records in display order. Every
//! state change runs synchronously through the same pipeline:
//!
//! ```text
//! records → predicate (search ∧ filters) → comparator (sort) → pager → view state
//! ```
//!
//! The filtered set is memoized. A sort change re-orders it, a page or
//! column change touches neither, and only a search, filter or record
//! change re-runs the predicate.
//!
//! Changes that can be invalid (filters, sort keys, page size, column
//! visibility) are validated before anything is modified. A rejected
//! change returns an error and leaves the previous state in effect.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

use crate::clause::FilterSpec;
use crate::collate::compare_tr;
use crate::config::EntityConfig;
use crate::error::{Result, SeekerError};
use crate::export::{self, ExportColumn, ExportFormat};
use crate::fetch::{FetchError, FetchOutcome, FetchStatus, FetchTicket, RecordStore, Snapshot};
use crate::ordering::{Comparator, SortSpec};
use crate::pager::{paginate, PageSpec};
use crate::predicate::Predicate;
use crate::state::QueryState;
use crate::traits::{Record, RecordId};
use crate::view::{resolve, status_line, ColumnView, EmptyMessage, ErrorMessage, ViewModel, ViewState};

/// Callback run after every change that actually altered the query state.
pub type QueryListener = Box<dyn FnMut(&QueryState)>;

/// A filter option with the number of records it would match.
///
/// Counts honour the search text and every other active filter, but not
/// the filter on the facet's own field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub value: String,
    pub label: String,
    pub count: usize,
}

/// Query engine for one list view.
///
/// # Example
///
/// ```
/// use dernek_seeker::{presets, FilterSpec, ListView, MapRecord, Number, Scalar, ViewState};
///
/// let records: Vec<MapRecord> = (1..=26u64)
///     .map(|id| {
///         MapRecord::new(id)
///             .with("bagisci", format!("Bağışçı {}", id))
///             .with("tutar", Number::U64(id * 100))
///             .with("durum", Scalar::status(if id % 2 == 0 { "tamamlandi" } else { "beklemede" }))
///     })
///     .collect();
///
/// let mut view = ListView::with_records(presets::donations(), records).unwrap();
/// assert_eq!(view.view_model().total_pages, 3);
///
/// view.set_filter(FilterSpec::equals("durum", "tamamlandi")).unwrap();
/// let model = view.view_model();
/// assert_eq!(model.state, ViewState::Populated);
/// assert_eq!(model.total_count, 13);
/// assert_eq!(model.total_pages, 2);
/// ```
pub struct ListView<R> {
    config: EntityConfig,
    state: QueryState,
    records: Vec<R>,
    status: FetchStatus,
    generation: u64,
    /// Generation of the fetch currently in flight.
    pending: Option<u64>,
    predicate: Predicate,
    /// Indices into `records` of the matching rows, in display order.
    matched: Vec<usize>,
    selected: BTreeSet<RecordId>,
    listeners: Vec<QueryListener>,
}

impl<R: Record> ListView<R> {
    /// Creates an engine in the `Loading` state with no records.
    pub fn new(config: EntityConfig) -> Result<Self> {
        config.validate()?;
        let state = QueryState::for_entity(&config);
        let predicate = Predicate::compile(&state.search, &state.filters, &config)?;
        Ok(ListView {
            config,
            state,
            records: Vec::new(),
            status: FetchStatus::Loading,
            generation: 0,
            pending: None,
            predicate,
            matched: Vec::new(),
            selected: BTreeSet::new(),
            listeners: Vec::new(),
        })
    }

    /// Creates an engine that already holds `records`.
    pub fn with_records(config: EntityConfig, records: Vec<R>) -> Result<Self> {
        let mut view = ListView::new(config)?;
        view.replace_records(records);
        Ok(view)
    }

    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Registers a listener for query state changes.
    pub fn on_query_state_change<F>(&mut self, listener: F)
    where
        F: FnMut(&QueryState) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // ========================================================================
    // Search and filters
    // ========================================================================

    /// Sets the search text. The empty string matches everything.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search == self.state.search {
            return;
        }
        let predicate = self.predicate.with_search(&search);
        let mut next = self.state.clone();
        next.search = search;
        next.page = next.page.first();
        self.predicate = predicate;
        self.apply(next, true);
    }

    /// Sets the filter on `spec.field`, replacing any filter already on
    /// that field.
    pub fn set_filter(&mut self, spec: FilterSpec) -> Result<()> {
        let filters = self.state.filters_with(spec);
        if filters == self.state.filters {
            return Ok(());
        }
        let predicate = Predicate::compile(&self.state.search, &filters, &self.config)?;
        let mut next = self.state.clone();
        next.filters = filters;
        next.page = next.page.first();
        self.predicate = predicate;
        self.apply(next, true);
        Ok(())
    }

    /// Removes the filter on `field`. Returns `false` if there was none.
    pub fn remove_filter(&mut self, field: &str) -> bool {
        if self.state.filter(field).is_none() {
            return false;
        }
        let predicate = self.predicate.without_field(field);
        let mut next = self.state.clone();
        next.filters.retain(|f| f.field != field);
        next.page = next.page.first();
        self.predicate = predicate;
        self.apply(next, true);
        true
    }

    /// Clears search text and every filter. Sort, page size and columns
    /// stay. Works on the records already held; nothing is refetched.
    pub fn clear_criteria(&mut self) {
        if !self.state.is_filtered() {
            return;
        }
        let mut next = self.state.clone();
        next.search.clear();
        next.filters.clear();
        next.page = next.page.first();
        self.predicate = self.predicate.cleared();
        self.apply(next, true);
    }

    /// Returns to the state the view mounted with and drops the selection.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.predicate = self.predicate.cleared();
        self.apply(QueryState::for_entity(&self.config), true);
    }

    /// Validates and applies a whole query state, e.g. one read back from
    /// a URL.
    pub fn restore(&mut self, state: QueryState) -> Result<()> {
        let mut fields = BTreeSet::new();
        for spec in &state.filters {
            if !fields.insert(spec.field.as_str()) {
                return Err(SeekerError::MalformedFilter {
                    field: spec.field.clone(),
                    reason: "more than one filter on the field",
                });
            }
        }
        let predicate = Predicate::compile(&state.search, &state.filters, &self.config)?;
        self.validate_sort(&state.sort)?;

        for id in state.columns.ids() {
            let def = self
                .config
                .column_def(id)
                .ok_or_else(|| SeekerError::UnknownColumn(id.to_string()))?;
            if !def.hideable && !state.columns.is_visible(id) {
                return Err(SeekerError::ColumnNotHideable(id.to_string()));
            }
        }
        if state.columns.visible_count(&self.config.columns) == 0 {
            let first = self.config.columns.first().map(|c| c.id.clone()).unwrap_or_default();
            return Err(SeekerError::LastVisibleColumn(first));
        }

        self.predicate = predicate;
        self.apply(state, true);
        Ok(())
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    /// Header click: flips the direction of the current primary key, or
    /// makes `field` the only key, ascending.
    pub fn toggle_sort(&mut self, field: &str) -> Result<()> {
        self.validate_sort_field(field)?;
        let mut next = self.state.clone();
        next.sort = self.state.sort.toggled(field);
        next.page = next.page.first();
        self.apply(next, false);
        Ok(())
    }

    pub fn set_sort(&mut self, sort: SortSpec) -> Result<()> {
        self.validate_sort(&sort)?;
        if sort == self.state.sort {
            return Ok(());
        }
        let mut next = self.state.clone();
        next.sort = sort;
        next.page = next.page.first();
        self.apply(next, false);
        Ok(())
    }

    /// Drops every sort key, returning to store order.
    pub fn clear_sort(&mut self) {
        if self.state.sort.is_empty() {
            return;
        }
        let mut next = self.state.clone();
        next.sort = SortSpec::none();
        next.page = next.page.first();
        self.apply(next, false);
    }

    fn validate_sort(&self, sort: &SortSpec) -> Result<()> {
        sort.keys()
            .iter()
            .try_for_each(|key| self.validate_sort_field(&key.field))
    }

    fn validate_sort_field(&self, field: &str) -> Result<()> {
        let def = self.config.require_field(field)?;
        if !def.sortable {
            return Err(SeekerError::NotSortable(field.to_string()));
        }
        Ok(())
    }

    // ========================================================================
    // Paging
    // ========================================================================

    /// Jumps to `index`, clamped to the last page.
    pub fn set_page(&mut self, index: usize) {
        let total = self.matched.len();
        self.move_page(|page| page.at(index, total));
    }

    pub fn next_page(&mut self) {
        let total = self.matched.len();
        self.move_page(|page| page.next(total));
    }

    pub fn previous_page(&mut self) {
        let total = self.matched.len();
        self.move_page(|page| page.previous(total));
    }

    pub fn first_page(&mut self) {
        self.move_page(|page| page.first());
    }

    pub fn last_page(&mut self) {
        let total = self.matched.len();
        self.move_page(|page| page.last(total));
    }

    /// Changes the page size, keeping the first row of the current page
    /// visible. Zero is rejected.
    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        let size = NonZeroUsize::new(size).ok_or(SeekerError::InvalidPageSize(size))?;
        self.move_page(|page| page.resize(size));
        Ok(())
    }

    fn move_page(&mut self, step: impl FnOnce(PageSpec) -> PageSpec) {
        let mut next = self.state.clone();
        next.page = step(next.page);
        self.apply(next, false);
    }

    // ========================================================================
    // Columns
    // ========================================================================

    /// Shows or hides a column and returns its new visibility.
    pub fn toggle_column(&mut self, id: &str) -> Result<bool> {
        let visible = !self.state.columns.is_visible(id);
        self.set_column_visible(id, visible)?;
        Ok(visible)
    }

    /// Hiding a fixed column or the last visible one is rejected.
    pub fn set_column_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        let def = self
            .config
            .column_def(id)
            .ok_or_else(|| SeekerError::UnknownColumn(id.to_string()))?;
        if !visible {
            if !def.hideable {
                return Err(SeekerError::ColumnNotHideable(id.to_string()));
            }
            if self.state.columns.is_visible(id)
                && self.state.columns.visible_count(&self.config.columns) == 1
            {
                return Err(SeekerError::LastVisibleColumn(id.to_string()));
            }
        }
        let mut next = self.state.clone();
        next.columns.set(id, visible);
        self.apply(next, false);
        Ok(())
    }

    // ========================================================================
    // Fetch lifecycle
    // ========================================================================

    /// Marks a fetch as started and returns its ticket. Any earlier
    /// ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        self.status = FetchStatus::Loading;
        debug!("{}: fetch #{} started", self.config.kind, self.generation);
        FetchTicket {
            generation: self.generation,
            criteria: self.state.criteria(),
        }
    }

    /// Starts a new fetch after a failure.
    pub fn retry(&mut self) -> FetchTicket {
        debug!("{}: retrying fetch", self.config.kind);
        self.begin_fetch()
    }

    /// `true` if a result for `ticket` would be applied now.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.pending == Some(ticket.generation) && ticket.criteria == self.state.criteria()
    }

    /// Delivers the result of the fetch started with `ticket`.
    ///
    /// The result is dropped unless the ticket is the latest one issued
    /// and the search and filters are still what they were when it was
    /// issued. A dropped result leaves the view `Loading`.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: std::result::Result<Vec<R>, FetchError>,
    ) -> FetchOutcome {
        if !self.is_current(ticket) {
            warn!(
                "{}: discarding stale fetch #{} (latest #{})",
                self.config.kind, ticket.generation, self.generation
            );
            return FetchOutcome::Stale;
        }
        self.pending = None;
        match result {
            Ok(records) => {
                debug!(
                    "{}: fetch #{} returned {} records",
                    self.config.kind,
                    ticket.generation,
                    records.len()
                );
                self.load(records);
            }
            Err(error) => {
                warn!("{}: fetch #{} failed: {}", self.config.kind, ticket.generation, error);
                self.status = FetchStatus::Failed(error);
            }
        }
        FetchOutcome::Applied
    }

    /// Delivers a store snapshot for `ticket`. A snapshot that is still
    /// loading keeps the ticket pending.
    pub fn apply_snapshot(&mut self, ticket: &FetchTicket, snapshot: Snapshot<R>) -> FetchOutcome {
        match snapshot.status {
            FetchStatus::Loading if self.is_current(ticket) => FetchOutcome::Pending,
            FetchStatus::Loading => FetchOutcome::Stale,
            FetchStatus::Ready => self.complete_fetch(ticket, Ok(snapshot.records)),
            FetchStatus::Failed(error) => self.complete_fetch(ticket, Err(error)),
        }
    }

    /// Reads this view's entity kind from `store` and applies it.
    pub fn pull<S>(&mut self, store: &S, ticket: &FetchTicket) -> FetchOutcome
    where
        S: RecordStore<R> + ?Sized,
    {
        let snapshot = store.snapshot(self.config.kind);
        self.apply_snapshot(ticket, snapshot)
    }

    /// Replaces the records directly, e.g. when the owner pushes fresh
    /// data. Any fetch in flight becomes stale.
    pub fn replace_records(&mut self, records: Vec<R>) {
        self.pending = None;
        self.load(records);
    }

    fn load(&mut self, records: Vec<R>) {
        self.records = records;
        self.status = FetchStatus::Ready;
        let ids: BTreeSet<RecordId> = self.records.iter().map(Record::record_id).collect();
        self.selected.retain(|id| ids.contains(id));
        let next = self.state.clone();
        self.apply(next, true);
    }

    // ========================================================================
    // Recomputation
    // ========================================================================

    /// Commits `next`. The predicate must already match `next`'s search
    /// and filters.
    fn apply(&mut self, mut next: QueryState, refilter: bool) {
        if refilter {
            self.matched = self.predicate.select(&self.records);
            self.sort_matched(&next.sort);
        } else if next.sort != self.state.sort {
            self.sort_matched(&next.sort);
        }
        next.page = next.page.clamp(self.matched.len());

        if next == self.state {
            return;
        }
        self.state = next;
        debug!(
            "{}: {} of {} records match, page {}",
            self.config.kind,
            self.matched.len(),
            self.records.len(),
            self.state.page.index()
        );
        for listener in &mut self.listeners {
            listener(&self.state);
        }
    }

    fn sort_matched(&mut self, sort: &SortSpec) {
        if sort.is_empty() {
            self.matched.sort_unstable();
            return;
        }
        let comparator = Comparator::build(sort);
        let records = &self.records;
        self.matched
            .sort_by(|&a, &b| comparator.compare(&records[a], &records[b]));
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// All matching records in display order, across every page.
    pub fn matched(&self) -> Vec<&R> {
        self.matched.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn total_count(&self) -> usize {
        self.matched.len()
    }

    /// Everything the table renders for the current state.
    pub fn view_model(&self) -> ViewModel<'_, R> {
        let page = paginate(&self.matched, self.state.page);
        let state = resolve(&self.status, page.total_count);
        let populated = state == ViewState::Populated;
        let settled = populated || state == ViewState::Empty;

        let items = if populated {
            page.items.iter().map(|&i| &self.records[i]).collect()
        } else {
            Vec::new()
        };
        let (total_count, total_pages, page_index) = if settled {
            (page.total_count, page.total_pages, page.page_index)
        } else {
            (0, 1, 0)
        };

        let primary = self.state.sort.primary();
        let columns = self
            .config
            .columns
            .iter()
            .map(|c| ColumnView {
                id: &c.id,
                label: &c.label,
                visible: self.state.columns.is_visible(&c.id),
                hideable: c.hideable,
                sortable: self.config.field_def(&c.id).map_or(false, |f| f.sortable),
                sorted: primary.filter(|k| k.field == c.id).map(|k| k.dir),
            })
            .collect();

        let empty = (state == ViewState::Empty).then(|| {
            if self.records.is_empty() {
                EmptyMessage::no_data(self.config.empty_message.as_str())
            } else {
                EmptyMessage::no_matches()
            }
        });
        let error = match &self.status {
            FetchStatus::Failed(e) => Some(ErrorMessage::new(e.message.as_str())),
            _ => None,
        };
        let selected_count = if settled { self.selected_count() } else { 0 };

        ViewModel {
            state,
            items,
            total_count,
            total_pages,
            page_index,
            page_size: page.page_size,
            page_size_options: &self.config.page_size_options,
            can_previous: populated && self.state.page.can_previous(),
            can_next: populated && self.state.page.can_next(total_count),
            columns,
            search: &self.state.search,
            is_filtered: self.state.is_filtered(),
            can_retry: error.is_some(),
            empty,
            error,
            selected_count,
            status_line: status_line(selected_count, total_count),
        }
    }

    /// Option counts for the filter on `field`.
    ///
    /// With configured options, every option is listed in configured order,
    /// including those with a zero count. Otherwise the distinct values
    /// present in the records are listed in Turkish alphabetical order.
    pub fn facets(&self, field: &str) -> Result<Vec<Facet>> {
        self.config.require_field(field)?;
        let relaxed = self.predicate.without_field(field);
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in self.records.iter().filter(|r| relaxed.matches(*r)) {
            let value = record.field_value(field);
            if !value.is_none() {
                *counts.entry(value.display()).or_default() += 1;
            }
        }

        let facets = match self.config.filter_def(field) {
            Some(def) if !def.options.is_empty() => def
                .options
                .iter()
                .map(|o| Facet {
                    value: o.value.clone(),
                    label: o.label.clone(),
                    count: counts.get(&o.value).copied().unwrap_or(0),
                })
                .collect(),
            _ => {
                let mut facets: Vec<Facet> = counts
                    .into_iter()
                    .map(|(value, count)| Facet {
                        label: value.clone(),
                        value,
                        count,
                    })
                    .collect();
                facets.sort_by(|a, b| compare_tr(&a.value, &b.value));
                facets
            }
        };
        Ok(facets)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Toggles selection of one record and returns whether it is now
    /// selected.
    pub fn toggle_selected(&mut self, id: &RecordId) -> Result<bool> {
        if !self.records.iter().any(|r| &r.record_id() == id) {
            return Err(SeekerError::UnknownRecord(id.to_string()));
        }
        if self.selected.remove(id) {
            Ok(false)
        } else {
            self.selected.insert(id.clone());
            Ok(true)
        }
    }

    /// Selects or deselects every row on the current page.
    pub fn select_page(&mut self, selected: bool) {
        let page = paginate(&self.matched, self.state.page);
        for &i in page.items {
            let id = self.records[i].record_id();
            if selected {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected records that match the current search and filters, in
    /// display order.
    pub fn selected(&self) -> Vec<&R> {
        self.matched
            .iter()
            .map(|&i| &self.records[i])
            .filter(|r| self.selected.contains(&r.record_id()))
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected().len()
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selected.contains(id)
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Exports the visible columns of the selected rows, or of every
    /// matching row when nothing is selected.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let selected = self.selected();
        let rows = if selected.is_empty() { self.matched() } else { selected };
        let columns: Vec<ExportColumn<'_>> = self
            .config
            .columns
            .iter()
            .filter(|c| self.state.columns.is_visible(&c.id))
            .map(|c| ExportColumn {
                id: &c.id,
                label: &c.label,
                options: self.config.filter_def(&c.id),
            })
            .collect();
        debug!(
            "{}: exporting {} rows as {}",
            self.config.kind,
            rows.len(),
            format.extension()
        );
        export::render(&rows, &columns, format)
    }

    /// File name for an export made on `date`, e.g.
    /// `bagislar-2024-05-03.csv`.
    pub fn export_file_name(&self, format: ExportFormat, date: NaiveDate) -> String {
        export::file_name(self.config.kind.plural_name(), format, date)
    }
}
