//! Sort specifications and the comparator builder.
//!
//! [`SortSpec`] is an ordered list of [`SortKey`]s. [`Comparator::build`]
//! turns it into a deterministic total order over records: keys compare
//! type-aware (text with Turkish collation), and equal keys fall back to
//! the record id.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::collate::compare_tr;
use crate::traits::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns the opposite direction.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort key: field plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default)]
    pub dir: Dir,
}

impl SortKey {
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        SortKey {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        SortKey::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        SortKey::new(field, Dir::Desc)
    }
}

/// Ordered sequence of sort keys. Empty means natural (store) order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(Vec<SortKey>);

impl SortSpec {
    /// Natural order.
    pub fn none() -> Self {
        SortSpec(Vec::new())
    }

    /// A single-key sort.
    pub fn single(field: impl Into<String>, dir: Dir) -> Self {
        SortSpec(vec![SortKey::new(field, dir)])
    }

    /// Appends a secondary key.
    pub fn then(mut self, field: impl Into<String>, dir: Dir) -> Self {
        self.0.push(SortKey::new(field, dir));
        self
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    pub fn primary(&self) -> Option<&SortKey> {
        self.0.first()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Result of clicking the header of `field`.
    ///
    /// The current primary key flips direction and keeps any secondary
    /// keys. Any other field becomes the only key, ascending.
    pub fn toggled(&self, field: &str) -> SortSpec {
        match self.primary() {
            Some(key) if key.field == field => {
                let mut keys = self.0.clone();
                keys[0].dir = key.dir.flip();
                SortSpec(keys)
            }
            _ => SortSpec::single(field, Dir::Asc),
        }
    }
}

impl FromIterator<SortKey> for SortSpec {
    fn from_iter<I: IntoIterator<Item = SortKey>>(iter: I) -> Self {
        SortSpec(iter.into_iter().collect())
    }
}

/// Compares two field values in ascending order.
///
/// Unlike a partial comparison, this is total: missing values sort after
/// present ones, values of different types order by a fixed type rank, and
/// NaN uses IEEE total order.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => compare_tr(a, b),
        (Value::Enum(a), Value::Enum(b)) => compare_tr(a, b),
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => a.type_rank().cmp(&b.type_rank()),
    }
}

/// Record comparator built from a [`SortSpec`].
///
/// Each key's direction reverses only that key's comparison. The final id
/// tie-break follows the primary key's direction, so a descending
/// single-key sort is the exact reverse of the ascending one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    keys: Vec<SortKey>,
}

impl Comparator {
    pub fn build(sort: &SortSpec) -> Self {
        Comparator {
            keys: sort.keys().to_vec(),
        }
    }

    /// `true` when there are no keys and the caller should keep store order.
    pub fn is_natural(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        for key in &self.keys {
            let ordering = compare_values(&a.field_value(&key.field), &b.field_value(&key.field));
            if ordering != Ordering::Equal {
                return key.dir.apply(ordering);
            }
        }
        let tie_dir = self.keys.first().map(|k| k.dir).unwrap_or_default();
        tie_dir.apply(a.record_id().cmp(&b.record_id()))
    }

    /// Sorts `items` in place. Natural order leaves the slice untouched.
    pub fn sort<R: Record>(&self, items: &mut [R]) {
        if !self.is_natural() {
            items.sort_by(|a, b| self.compare(a, b));
        }
    }
}
