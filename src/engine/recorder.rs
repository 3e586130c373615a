//! Selection Recorder

use tracing::debug;

use super::store::{PriorityTable, MIN_PRIORITY};
use crate::config::Bangs;
use crate::error::{Result, SrchError};

/// Count one selection of `selected`.
///
/// Returns `Ok(true)` when the table changed and needs saving. Picking the
/// default engine is free: it is always first, so its count never matters.
pub fn record(
    table: &mut PriorityTable,
    engines: &Bangs,
    selected: &str,
    default: Option<&str>,
) -> Result<bool> {
    if !engines.contains_key(selected) {
        return Err(SrchError::UnknownEngine(selected.to_string()));
    }
    if default == Some(selected) {
        debug!("Default engine {:?} selected, priorities unchanged", selected);
        return Ok(false);
    }

    let count = table.entry(selected.to_string()).or_insert(MIN_PRIORITY);
    *count = count.saturating_add(1);
    debug!("Engine {:?} priority is now {}", selected, count);
    Ok(true)
}
