//! Engine Ranker
//!
//! Orders engine keys for the selection menu: the default engine first, then
//! the rest by descending usage count, ties broken by ascending key bytes.

use tracing::debug;

use super::encoder::{encode, key_width};
use super::store::{max_count, PriorityTable, MIN_PRIORITY};

/// Sort key for one engine.
///
/// The default engine gets the empty key, which precedes every non-empty
/// key. Everyone else gets `encode(count, width) ++ key`.
pub fn sort_key(key: &str, table: &PriorityTable, default: Option<&str>, width: usize) -> Vec<u8> {
    if default == Some(key) {
        return Vec::new();
    }
    let count = table.get(key).copied().unwrap_or(MIN_PRIORITY);
    let mut sort_key = encode(count, width);
    sort_key.extend_from_slice(key.as_bytes());
    sort_key
}

/// Rank `keys` against `table`.
///
/// The width is derived from the highest count among `keys`, so the order
/// is a pure function of its inputs and is recomputed on every call.
pub fn rank<'a, I>(keys: I, table: &PriorityTable, default: Option<&str>) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let keys = keys.into_iter();
    let width = key_width(max_count(table, keys.clone()));

    let mut keyed: Vec<(Vec<u8>, &str)> = keys
        .map(|key| (sort_key(key, table, default, width), key))
        .collect();
    keyed.sort();
    keyed.dedup_by(|a, b| a.1 == b.1);

    let order: Vec<String> = keyed.into_iter().map(|(_, key)| key.to_string()).collect();
    debug!("Engine order (width {}): {:?}", width, order);
    order
}
