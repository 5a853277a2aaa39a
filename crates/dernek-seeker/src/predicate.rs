//! The combined row predicate.
//!
//! A [`Predicate`] is the compiled form of the search box plus all active
//! filters:
//!
//! ```text
//! match = (search is empty ∨ any searchable field contains the search text)
//!       ∧ (every filter clause matches)
//! ```
//!
//! Compilation validates every filter up front, so evaluating a predicate
//! never fails.

use crate::clause::{Clause, FilterSpec};
use crate::collate::{contains_folded, to_lower_tr};
use crate::config::EntityConfig;
use crate::error::Result;
use crate::traits::Record;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Predicate {
    /// Lower-cased search text. `None` when the search box is empty.
    needle: Option<String>,
    fields: Vec<String>,
    clauses: Vec<Clause>,
}

impl Predicate {
    /// Compiles search text and filters for one entity kind.
    ///
    /// ```
    /// use dernek_seeker::{presets, FilterSpec, MapRecord, Predicate, Scalar};
    ///
    /// let config = presets::donations();
    /// let filters = [FilterSpec::equals("durum", "tamamlandi")];
    /// let predicate = Predicate::compile("ayşe", &filters, &config).unwrap();
    ///
    /// let row = MapRecord::new(1u64)
    ///     .with("bagisci", "Ayşe Kaya")
    ///     .with("durum", Scalar::status("tamamlandi"));
    /// assert!(predicate.matches(&row));
    /// ```
    pub fn compile(search: &str, filters: &[FilterSpec], config: &EntityConfig) -> Result<Predicate> {
        let clauses = filters
            .iter()
            .map(|spec| Clause::compile(spec, config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Predicate {
            needle: (!search.is_empty()).then(|| to_lower_tr(search)),
            fields: config.searchable.clone(),
            clauses,
        })
    }

    /// `true` when the predicate accepts every record.
    pub fn is_trivial(&self) -> bool {
        self.needle.is_none() && self.clauses.is_empty()
    }

    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.matches_search(record) && self.clauses.iter().all(|c| c.matches(&record.field_value(c.field())))
    }

    fn matches_search<R: Record + ?Sized>(&self, record: &R) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        self.fields.iter().any(|field| {
            record
                .field_value(field)
                .as_str()
                .map_or(false, |text| contains_folded(text, needle))
        })
    }

    /// Indices of the matching records, in input order.
    pub fn select<R: Record>(&self, records: &[R]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(*record))
            .map(|(i, _)| i)
            .collect()
    }

    /// A copy with different search text and the same filters.
    pub fn with_search(&self, search: &str) -> Predicate {
        Predicate {
            needle: (!search.is_empty()).then(|| to_lower_tr(search)),
            fields: self.fields.clone(),
            clauses: self.clauses.clone(),
        }
    }

    /// A copy with no search text and no filters.
    pub fn cleared(&self) -> Predicate {
        Predicate {
            needle: None,
            fields: self.fields.clone(),
            clauses: Vec::new(),
        }
    }

    /// A copy of this predicate with the clause on `field` removed.
    pub fn without_field(&self, field: &str) -> Predicate {
        Predicate {
            needle: self.needle.clone(),
            fields: self.fields.clone(),
            clauses: self
                .clauses
                .iter()
                .filter(|c| c.field() != field)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnDef, EntityKind, FieldDef, FieldKind, FilterDef};
    use crate::record::MapRecord;
    use crate::value::{Number, Scalar};

    fn config() -> EntityConfig {
        EntityConfig::new(EntityKind::Member)
            .field(FieldDef::new("ad_soyad", FieldKind::Text))
            .field(FieldDef::new("email", FieldKind::Text))
            .field(FieldDef::new("aidat", FieldKind::Number))
            .field(FieldDef::new("aidat_durumu", FieldKind::Status))
            .searchable(["ad_soyad", "email"])
            .column(ColumnDef::new("ad_soyad", "Ad Soyad"))
            .filter(
                FilterDef::new("aidat_durumu", "Aidat")
                    .option("odendi", "Ödendi")
                    .option("gecikti", "Gecikti"),
            )
    }

    fn members() -> Vec<MapRecord> {
        vec![
            MapRecord::new(1u64)
                .with("ad_soyad", "Şule Işık")
                .with("email", "sule@ornek.org")
                .with("aidat", Number::I64(100))
                .with("aidat_durumu", Scalar::status("odendi")),
            MapRecord::new(2u64)
                .with("ad_soyad", "Ömer Demir")
                .with("email", "omer@ornek.org")
                .with("aidat", Number::I64(250))
                .with("aidat_durumu", Scalar::status("gecikti")),
            MapRecord::new(3u64)
                .with("ad_soyad", "İlker Sucu")
                .with("aidat", Number::I64(100)),
        ]
    }

    #[test]
    fn empty_search_and_no_filters_is_trivial() {
        let predicate = Predicate::compile("", &[], &config()).unwrap();
        assert!(predicate.is_trivial());
        assert_eq!(predicate.select(&members()), vec![0, 1, 2]);
    }

    #[test]
    fn search_any_searchable_field() {
        let predicate = Predicate::compile("ORNEK", &[], &config()).unwrap();
        assert_eq!(predicate.select(&members()), vec![0, 1]);
    }

    #[test]
    fn search_uses_turkish_case_rules() {
        let predicate = Predicate::compile("IŞIK", &[], &config()).unwrap();
        assert_eq!(predicate.select(&members()), vec![0]);
        let predicate = Predicate::compile("ilker", &[], &config()).unwrap();
        assert_eq!(predicate.select(&members()), vec![2]);
    }

    #[test]
    fn search_does_not_fold_diacritics() {
        let predicate = Predicate::compile("omer demir", &[], &config()).unwrap();
        assert!(predicate.select(&members()).is_empty());
    }

    #[test]
    fn filters_are_conjunctive() {
        let filters = [
            FilterSpec::equals("aidat", "100"),
            FilterSpec::equals("aidat_durumu", "odendi"),
        ];
        let predicate = Predicate::compile("", &filters, &config()).unwrap();
        assert_eq!(predicate.select(&members()), vec![0]);
    }

    #[test]
    fn missing_field_fails_closed() {
        let filters = [FilterSpec::one_of("aidat_durumu", ["odendi", "gecikti"])];
        let predicate = Predicate::compile("", &filters, &config()).unwrap();
        assert_eq!(predicate.select(&members()), vec![0, 1]);
    }

    #[test]
    fn invalid_filter_fails_compilation() {
        let filters = [FilterSpec::range("aidat", Some("az"), None)];
        assert!(Predicate::compile("", &filters, &config()).is_err());
    }

    #[test]
    fn with_search_keeps_filters() {
        let filters = [FilterSpec::equals("aidat", "100")];
        let predicate = Predicate::compile("", &filters, &config()).unwrap();
        assert_eq!(predicate.with_search("sucu").select(&members()), vec![2]);
        assert!(predicate.with_search("sucu").cleared().is_trivial());
    }

    #[test]
    fn without_field_drops_one_clause() {
        let filters = [
            FilterSpec::equals("aidat", "100"),
            FilterSpec::equals("aidat_durumu", "odendi"),
        ];
        let predicate = Predicate::compile("", &filters, &config()).unwrap();
        let relaxed = predicate.without_field("aidat_durumu");
        assert_eq!(relaxed.select(&members()), vec![0, 2]);
    }
}
