//! The fetch boundary.
//!
//! Loading records is the caller's job. The engine only sees the outcome:
//! a [`Snapshot`] pulled from a [`RecordStore`], or a result handed to
//! [`crate::ListView::complete_fetch`]. Every fetch carries a
//! [`FetchTicket`]; a ticket that is no longer current when its result
//! arrives is discarded.

use thiserror::Error;

use crate::config::EntityKind;
use crate::state::Criteria;

/// A failed fetch, as reported by the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        FetchError {
            message: message.into(),
        }
    }
}

/// Status signal of the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// A request is in flight.
    #[default]
    Loading,
    /// Records are available.
    Ready,
    /// The last request failed.
    Failed(FetchError),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }
}

/// Records of one entity kind plus the status they were read with.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<R> {
    pub status: FetchStatus,
    pub records: Vec<R>,
}

impl<R> Snapshot<R> {
    pub fn ready(records: Vec<R>) -> Self {
        Snapshot {
            status: FetchStatus::Ready,
            records,
        }
    }

    pub fn loading() -> Self {
        Snapshot {
            status: FetchStatus::Loading,
            records: Vec::new(),
        }
    }

    pub fn failed(error: FetchError) -> Self {
        Snapshot {
            status: FetchStatus::Failed(error),
            records: Vec::new(),
        }
    }
}

/// Pull-based source of records.
pub trait RecordStore<R> {
    fn snapshot(&self, kind: EntityKind) -> Snapshot<R>;
}

/// Tag of one in-flight fetch: a generation number plus the search and
/// filter criteria that were current when it began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub(crate) generation: u64,
    pub(crate) criteria: Criteria,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }
}

/// What happened to a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result replaced the records or set the error state.
    Applied,
    /// The store is still loading; the ticket stays current.
    Pending,
    /// The ticket was superseded and the result was dropped.
    Stale,
}
