//! Dernek Seeker - list-view query engine for the association dashboard.
//!
//! Every collection the dashboard shows (donations, members, aid
//! applications, payments) is a table with a search box, filter
//! dropdowns, sortable headers, pagination and a column picker. This crate
//! is the engine behind those tables. It keeps the query state, derives
//! the visible page from an in-memory snapshot of records and tells the
//! caller which of four states to render:
//!
//! - **Loading**: a fetch is in flight, no rows are exposed
//! - **Empty**: no record matches, with a message telling "no data at
//!   all" apart from "nothing matches your search"
//! - **Populated**: the current page of rows
//! - **Error**: the fetch failed, with a retry affordance
//!
//! # Quick Start
//!
//! ```rust
//! use dernek_seeker::{presets, FilterSpec, ListView, MapRecord, Number, Scalar, ViewState};
//!
//! let donations = vec![
//!     MapRecord::new(1u64)
//!         .with("bagisci", "Ayşe Yılmaz")
//!         .with("tutar", Number::I64(500))
//!         .with("durum", Scalar::status("tamamlandi")),
//!     MapRecord::new(2u64)
//!         .with("bagisci", "Mehmet Kaya")
//!         .with("tutar", Number::I64(150))
//!         .with("durum", Scalar::status("beklemede")),
//! ];
//!
//! let mut view = ListView::with_records(presets::donations(), donations).unwrap();
//! view.set_search("AYŞE");
//! view.set_filter(FilterSpec::range("tutar", Some("100"), None)).unwrap();
//!
//! let model = view.view_model();
//! assert_eq!(model.state, ViewState::Populated);
//! assert_eq!(model.total_count, 1);
//! assert_eq!(model.status_line, "Toplam 1 kayıt");
//! ```
//!
//! # Match Semantics
//!
//! ```text
//! match = (search is empty ∨ any searchable field contains the search text)
//!       ∧ (every active filter matches)
//! ```
//!
//! Search and `contains` filters are case-insensitive with Turkish casing
//! (`I`/`ı`, `İ`/`i`) but never fold diacritics: `ç`, `ş`, `ğ`, `ı`, `ö`,
//! `ü` only match themselves. A filter on a field the record lacks does
//! not match.
//!
//! # Field Kinds and Operators
//!
//! | Kind | Operators |
//! |------|-----------|
//! | Text | `equals`, `oneOf`, `contains` |
//! | Number | `equals`, `oneOf`, `range` |
//! | Date | `equals`, `range` |
//! | Status | `equals`, `oneOf` |
//! | Bool | `equals`, `oneOf` |
//!
//! # Ordering
//!
//! Text sorts in Turkish alphabetical order, numbers numerically and dates
//! chronologically. Equal keys fall back to the record id, and a
//! descending sort is the exact reverse of the ascending one.
//!
//! # Stale Fetches
//!
//! [`ListView::begin_fetch`] hands out a [`FetchTicket`]. A result
//! delivered with a ticket that is no longer the latest, or whose search
//! and filters no longer match the current ones, is discarded.

mod clause;
mod collate;
mod config;
mod engine;
mod error;
mod export;
mod fetch;
mod op;
mod ordering;
mod pager;
mod predicate;
mod record;
mod state;
mod traits;
mod value;
mod view;

pub mod presets;

// Re-export public API
pub use clause::{Clause, FilterSpec, FilterValue};
pub use collate::{compare_tr, contains_folded, to_lower_tr};
pub use config::{ColumnDef, EntityConfig, EntityKind, FieldDef, FieldKind, FilterDef, FilterOption};
pub use engine::{Facet, ListView, QueryListener};
pub use error::{Result, SeekerError};
pub use export::{ExportColumn, ExportFormat};
pub use fetch::{FetchError, FetchOutcome, FetchStatus, FetchTicket, RecordStore, Snapshot};
pub use op::FilterOp;
pub use ordering::{compare_values, Comparator, Dir, SortKey, SortSpec};
pub use pager::{paginate, total_pages, Page, PageSpec, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use predicate::Predicate;
pub use record::MapRecord;
pub use state::{ColumnVisibility, Criteria, QueryState};
pub use traits::{Record, RecordId};
pub use value::{Number, Scalar, Timestamp, Value};
pub use view::{resolve, ColumnView, EmptyMessage, EmptyReason, ErrorMessage, ViewModel, ViewState};
