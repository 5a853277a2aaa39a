//! Property-based tests for the list-view engine using proptest.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use dernek_seeker::{
    compare_tr, compare_values, presets, Comparator, Dir, FetchOutcome, FetchStatus, FilterSpec,
    ListView, Number, Record, RecordId, SortSpec, Timestamp, Value, ViewState,
};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

const STATUSES: [&str; 4] = ["tamamlandi", "beklemede", "iptal", "iade"];
const DAY_MS: i64 = 86_400_000;

#[derive(Debug, Clone)]
struct Donation {
    id: u64,
    donor: String,
    amount: i64,
    status: &'static str,
    day: i64,
}

impl Record for Donation {
    fn record_id(&self) -> RecordId {
        RecordId::Number(self.id)
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "bagisci" => Value::String(&self.donor),
            "tutar" => Value::Number(Number::I64(self.amount)),
            "durum" => Value::Enum(self.status),
            "tarih" => Value::Timestamp(Timestamp(self.day * DAY_MS)),
            _ => Value::None,
        }
    }
}

fn donation_strategy() -> impl Strategy<Value = (String, i64, usize, i64)> {
    (
        "[a-zçğıöşüA-ZÇĞİÖŞÜ ]{1,10}",
        0i64..2_000,
        0usize..STATUSES.len(),
        0i64..60,
    )
}

fn donations_strategy(max: usize) -> impl Strategy<Value = Vec<Donation>> {
    prop::collection::vec(donation_strategy(), 0..max).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (donor, amount, status, day))| Donation {
                id: i as u64 + 1,
                donor,
                amount,
                status: STATUSES[status],
                day,
            })
            .collect()
    })
}

fn number_strategy() -> impl Strategy<Value = Number> {
    let exact = 1i64 << 53;
    let near = (exact - 4)..(exact + 4);
    prop_oneof![
        near.clone().prop_map(Number::I64),
        near.clone().prop_map(|n| Number::U64(n as u64)),
        near.prop_map(|n| Number::F64(n as f64)),
        (-4i64..4).prop_map(Number::I64),
        (-4.0f64..4.0).prop_map(Number::F64),
        any::<i64>().prop_map(Number::I64),
        any::<u64>().prop_map(Number::U64),
        any::<f64>().prop_map(Number::F64),
    ]
}

fn view(records: Vec<Donation>) -> ListView<Donation> {
    ListView::with_records(presets::donations(), records).unwrap()
}

fn id_set(rows: &[&Donation]) -> BTreeSet<u64> {
    rows.iter().map(|d| d.id).collect()
}

fn id_list(rows: &[&Donation]) -> Vec<u64> {
    rows.iter().map(|d| d.id).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Next on the last page and previous on the first page never move.
    #[test]
    fn boundary_navigation_is_idempotent(
        records in donations_strategy(60),
        size in 1usize..15,
        presses in 1usize..6,
    ) {
        let mut view = view(records);
        view.set_page_size(size).unwrap();

        view.last_page();
        let last = view.state().page();
        for _ in 0..presses {
            view.next_page();
            prop_assert_eq!(view.state().page(), last);
        }

        view.first_page();
        let first = view.state().page();
        prop_assert_eq!(first.index(), 0);
        for _ in 0..presses {
            view.previous_page();
            prop_assert_eq!(view.state().page(), first);
        }
    }

    /// Descending comparison is the exact reverse of ascending comparison.
    #[test]
    fn sort_symmetry(
        a in donation_strategy(),
        b in donation_strategy(),
        field in prop::sample::select(vec!["bagisci", "tutar", "durum", "tarih"]),
    ) {
        let make = |id: u64, (donor, amount, status, day): (String, i64, usize, i64)| Donation {
            id,
            donor,
            amount,
            status: STATUSES[status],
            day,
        };
        let a = make(1, a);
        let b = make(2, b);
        let asc = Comparator::build(&SortSpec::single(field, Dir::Asc));
        let desc = Comparator::build(&SortSpec::single(field, Dir::Desc));
        prop_assert_eq!(desc.compare(&a, &b), asc.compare(&a, &b).reverse());
        prop_assert_eq!(asc.compare(&a, &b), asc.compare(&b, &a).reverse());
    }

    /// Turkish collation is antisymmetric and only equal for equal input.
    #[test]
    fn collation_is_a_total_order(a in "[a-zçğıöşüA-ZÇĞİÖŞÜ]{0,8}", b in "[a-zçğıöşüA-ZÇĞİÖŞÜ]{0,8}") {
        prop_assert_eq!(compare_tr(&a, &b), compare_tr(&b, &a).reverse());
        prop_assert_eq!(compare_tr(&a, &b) == Ordering::Equal, a == b);
    }

    /// Numbers of every variant form one consistent order, even where
    /// `f64` cannot represent the integers exactly.
    #[test]
    fn mixed_number_order_is_transitive(
        a in number_strategy(),
        b in number_strategy(),
        c in number_strategy(),
    ) {
        let cmp = |x: Number, y: Number| compare_values(&Value::Number(x), &Value::Number(y));
        prop_assert_eq!(cmp(a, b), cmp(b, a).reverse());
        if cmp(a, b) != Ordering::Greater && cmp(b, c) != Ordering::Greater {
            prop_assert_ne!(cmp(a, c), Ordering::Greater);
        }
        if cmp(a, b) == Ordering::Equal && cmp(b, c) == Ordering::Equal {
            prop_assert_eq!(cmp(a, c), Ordering::Equal);
        }
    }

    /// Filters combine with AND: the result is the intersection of each
    /// filter's own result, and removing a filter never shrinks it.
    #[test]
    fn filter_conjunction(
        records in donations_strategy(50),
        lo in 0i64..1_000,
        span in 0i64..1_000,
        statuses in prop::sample::subsequence(STATUSES.to_vec(), 1..=STATUSES.len()),
    ) {
        let (min, max) = (lo.to_string(), (lo + span).to_string());
        let amount = FilterSpec::range("tutar", Some(min.as_str()), Some(max.as_str()));
        let status = FilterSpec::one_of("durum", statuses.iter().copied());

        let mut only_amount = view(records.clone());
        only_amount.set_filter(amount.clone()).unwrap();
        let mut only_status = view(records.clone());
        only_status.set_filter(status.clone()).unwrap();
        let mut both = view(records);
        both.set_filter(amount).unwrap();
        both.set_filter(status).unwrap();

        let a = id_set(&only_amount.matched());
        let s = id_set(&only_status.matched());
        let combined = id_set(&both.matched());
        prop_assert_eq!(&combined, &a.intersection(&s).copied().collect::<BTreeSet<_>>());

        both.remove_filter("durum");
        let relaxed = id_set(&both.matched());
        prop_assert!(combined.is_subset(&relaxed));
        prop_assert_eq!(relaxed, a);
    }

    /// Concatenating every page reproduces the full result exactly once.
    #[test]
    fn pagination_covers_everything(
        records in donations_strategy(80),
        size in 1usize..20,
        sort_field in prop::sample::select(vec!["bagisci", "tutar", "tarih"]),
    ) {
        let mut view = view(records);
        view.set_page_size(size).unwrap();
        view.toggle_sort(sort_field).unwrap();

        let expected = id_list(&view.matched());
        let pages = view.view_model().total_pages;
        prop_assert_eq!(pages, expected.len().div_ceil(size).max(1));

        let mut seen = Vec::new();
        for index in 0..pages {
            view.set_page(index);
            let model = view.view_model();
            prop_assert_eq!(model.page_index, index);
            prop_assert!(model.items.len() <= size);
            seen.extend(model.items.iter().map(|d| d.id));
        }
        prop_assert_eq!(seen, expected);
    }

    /// Only the latest ticket, with unchanged criteria, is applied.
    #[test]
    fn stale_fetches_are_discarded(
        records in donations_strategy(20),
        fetches in 1usize..6,
        pick in any::<prop::sample::Index>(),
    ) {
        let mut view: ListView<Donation> = ListView::new(presets::donations()).unwrap();
        let tickets: Vec<_> = (0..fetches).map(|_| view.begin_fetch()).collect();
        let chosen = pick.index(fetches);

        let outcome = view.complete_fetch(&tickets[chosen], Ok(records.clone()));
        if chosen + 1 == fetches {
            prop_assert_eq!(outcome, FetchOutcome::Applied);
            prop_assert_eq!(view.status(), &FetchStatus::Ready);
            prop_assert_eq!(view.records().len(), records.len());
        } else {
            prop_assert_eq!(outcome, FetchOutcome::Stale);
            prop_assert_eq!(view.view_model().state, ViewState::Loading);
            prop_assert!(view.records().is_empty());
        }
    }

    /// A fetch begun under other search text is discarded even if it is
    /// the latest.
    #[test]
    fn fetch_for_old_criteria_is_discarded(
        records in donations_strategy(20),
        search in "[a-zçğş]{1,5}",
    ) {
        let mut view: ListView<Donation> = ListView::new(presets::donations()).unwrap();
        let ticket = view.begin_fetch();
        view.set_search(search);
        prop_assert_eq!(view.complete_fetch(&ticket, Ok(records)), FetchOutcome::Stale);
        prop_assert_eq!(view.view_model().state, ViewState::Loading);
    }
}
