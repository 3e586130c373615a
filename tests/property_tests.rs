//! Property-based tests for engine ranking
//!
//! These tests verify:
//! - The default engine is always first
//! - Higher counts rank earlier; equal counts rank by key bytes
//! - Ranking is idempotent
//! - The encoder's byte order is the reverse of count order
//! - The priority store round-trips tables exactly

use proptest::prelude::*;
use std::collections::BTreeSet;

use srch::engine::{encode, key_width, rank, repair, PriorityStore, PriorityTable};

/// Engine keys: short, non-empty, no line breaks.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!_-]{1,6}"
}

/// A configured engine set with a count for each engine.
fn table_strategy() -> impl Strategy<Value = PriorityTable> {
    prop::collection::btree_map(key_strategy(), 1i64..100_000, 1..12)
}

fn keys(table: &PriorityTable) -> Vec<&str> {
    table.keys().map(String::as_str).collect()
}

proptest! {
    /// Default engine is first whenever it is configured
    #[test]
    fn default_always_first(table in table_strategy(), pick in any::<prop::sample::Index>()) {
        let keys = keys(&table);
        let default = keys[pick.index(keys.len())];
        let order = rank(keys.iter().copied(), &table, Some(default));
        prop_assert_eq!(order[0].as_str(), default);
        prop_assert_eq!(order.len(), keys.len());
    }

    /// Non-default engines are ordered by count, then by key
    #[test]
    fn non_default_ordered_by_count_then_key(
        table in table_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let keys = keys(&table);
        let default = keys[pick.index(keys.len())];
        let order = rank(keys.iter().copied(), &table, Some(default));

        for pair in order[1..].windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (ca, cb) = (table[a], table[b]);
            prop_assert!(ca > cb || (ca == cb && a.as_bytes() < b.as_bytes()),
                "{}({}) before {}({})", a, ca, b, cb);
        }
    }

    /// A default outside the engine set changes nothing
    #[test]
    fn foreign_default_is_ignored(table in table_strategy()) {
        let keys = keys(&table);
        let with_foreign = rank(keys.iter().copied(), &table, Some("\u{0}not-an-engine"));
        let without = rank(keys.iter().copied(), &table, None);
        prop_assert_eq!(with_foreign, without);
    }

    /// Ranking twice gives the same answer
    #[test]
    fn rank_is_idempotent(table in table_strategy()) {
        let keys = keys(&table);
        let first = rank(keys.iter().copied(), &table, keys.first().copied());
        let second = rank(keys.iter().copied(), &table, keys.first().copied());
        prop_assert_eq!(first, second);
    }

    /// Ranking is a permutation of the engine set
    #[test]
    fn rank_is_permutation(table in table_strategy()) {
        let keys = keys(&table);
        let order = rank(keys.iter().copied(), &table, None);
        let ranked: BTreeSet<&str> = order.iter().map(String::as_str).collect();
        let expected: BTreeSet<&str> = keys.iter().copied().collect();
        prop_assert_eq!(ranked, expected);
    }

    /// Byte order of encoded keys is reverse count order
    #[test]
    fn encode_reverses_order(a in 1i64..1_000_000, b in 1i64..1_000_000) {
        let width = key_width(a.max(b));
        prop_assert_eq!(encode(a, width).cmp(&encode(b, width)), b.cmp(&a));
    }

    /// The derived width never saturates the maximum count
    #[test]
    fn width_fits_max_count(max in 1i64..i64::MAX) {
        let width = key_width(max);
        let bits = (width * 8) as u32;
        prop_assert!(bits >= 64 || -(max as i128) >= -(1i128 << (bits - 1)));
        prop_assert!(encode(max, width) < encode(max - 1, width) || max == 1);
    }

    /// Repair leaves valid counts alone and lifts the rest to 1
    #[test]
    fn repair_floors_counts(
        table in prop::collection::btree_map(key_strategy(), -5i64..5, 0..8),
        extra in prop::collection::btree_set(key_strategy(), 0..4),
    ) {
        let mut repaired = table.clone();
        let configured: Vec<&str> = table.keys().chain(extra.iter()).map(String::as_str).collect();
        repair(&mut repaired, configured.iter().copied());

        for key in &configured {
            let before = table.get(*key).copied().unwrap_or(0);
            prop_assert_eq!(repaired[*key], before.max(1));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// save then load returns the same table
    #[test]
    fn store_roundtrip(table in prop::collection::btree_map(key_strategy(), any::<i64>(), 0..10)) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = PriorityStore::new(dir.path().join("srch.json"));
        store.save(&table).unwrap();
        prop_assert_eq!(store.load().unwrap().into_table(), table);
    }
}
