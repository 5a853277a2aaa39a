//! Presentation state.
//!
//! [`resolve`] maps the fetch status and the match count to one of four
//! [`ViewState`]s. [`ViewModel`] bundles everything the table renders for
//! the current state: the visible rows, page metadata, column headers and
//! the empty or error message.

use serde::Serialize;

use crate::fetch::FetchStatus;
use crate::ordering::Dir;

pub const NO_MATCHES_TITLE: &str = "Sonuç bulunamadı";
pub const NO_MATCHES_DESCRIPTION: &str = "Arama kriterlerinize uygun sonuç bulunamadı.";
pub const NO_DATA_DESCRIPTION: &str = "Henüz görüntülenecek veri yok.";
pub const ERROR_TITLE: &str = "Veri Yüklenemedi";
pub const ERROR_DESCRIPTION: &str = "Veriler yüklenirken bir hata oluştu. Lütfen tekrar deneyin.";
pub const RETRY_LABEL: &str = "Tekrar Dene";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    Loading,
    Empty,
    Populated,
    Error,
}

/// Decides the view state.
///
/// Loading and failure win over any record count. Once records are ready,
/// zero matches is `Empty`.
pub fn resolve(status: &FetchStatus, total_count: usize) -> ViewState {
    match status {
        FetchStatus::Loading => ViewState::Loading,
        FetchStatus::Failed(_) => ViewState::Error,
        FetchStatus::Ready if total_count == 0 => ViewState::Empty,
        FetchStatus::Ready => ViewState::Populated,
    }
}

/// Why an empty view is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The store holds no records at all.
    NoData,
    /// Records exist but none match the search and filters.
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyMessage {
    pub reason: EmptyReason,
    pub title: String,
    pub description: String,
}

impl EmptyMessage {
    /// `title` is the entity-specific message, e.g. "Başvuru bulunamadı".
    pub fn no_data(title: impl Into<String>) -> Self {
        EmptyMessage {
            reason: EmptyReason::NoData,
            title: title.into(),
            description: NO_DATA_DESCRIPTION.to_string(),
        }
    }

    pub fn no_matches() -> Self {
        EmptyMessage {
            reason: EmptyReason::NoMatches,
            title: NO_MATCHES_TITLE.to_string(),
            description: NO_MATCHES_DESCRIPTION.to_string(),
        }
    }
}

/// The error panel: title, description, the underlying failure and the
/// retry button label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub title: String,
    pub description: String,
    pub detail: String,
    pub retry_label: String,
}

impl ErrorMessage {
    pub fn new(detail: impl Into<String>) -> Self {
        ErrorMessage {
            title: ERROR_TITLE.to_string(),
            description: ERROR_DESCRIPTION.to_string(),
            detail: detail.into(),
            retry_label: RETRY_LABEL.to_string(),
        }
    }
}

/// A column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub visible: bool,
    pub hideable: bool,
    pub sortable: bool,
    /// Direction when this column is the primary sort key.
    pub sorted: Option<Dir>,
}

/// Everything the table renders.
///
/// `items` is only non-empty in [`ViewState::Populated`]. Pagination
/// controls are disabled in every other state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel<'a, R> {
    pub state: ViewState,
    pub items: Vec<&'a R>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub page_size_options: &'a [usize],
    pub can_previous: bool,
    pub can_next: bool,
    pub columns: Vec<ColumnView<'a>>,
    pub search: &'a str,
    /// Offer the clear button.
    pub is_filtered: bool,
    pub empty: Option<EmptyMessage>,
    pub error: Option<ErrorMessage>,
    pub can_retry: bool,
    pub selected_count: usize,
    pub status_line: String,
}

impl<'a, R> ViewModel<'a, R> {
    /// Columns currently shown, in configured order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnView<'a>> {
        self.columns.iter().filter(|c| c.visible)
    }
}

/// Footer text: the match count, or the selection count when rows are
/// selected.
pub fn status_line(selected: usize, total: usize) -> String {
    if selected > 0 {
        format!("{} / {} satır seçildi.", selected, total)
    } else {
        format!("Toplam {} kayıt", total)
    }
}
