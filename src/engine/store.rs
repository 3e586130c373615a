//! Priority Store
//!
//! Persists the engine-key → usage-count table as a flat JSON object in the
//! per-user cache directory.
//!
//! # Recovery
//!
//! A missing file and an unparseable file are both recovered here: the caller
//! receives an empty table tagged with what happened ([`LoadOutcome`]). Only
//! genuine I/O failures (permission denied, a directory in the way, ...)
//! surface as errors.
//!
//! # Atomicity
//!
//! `save` writes to a temporary sibling file and renames it over the cache,
//! so a concurrent `load` never sees a half-written document. Two racing
//! launchers still resolve as last-writer-wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::FILE_NAME;
use crate::error::{Result, SrchError};

/// Engine key → usage count.
///
/// Counts are signed so that hand-edited or stale negative values still load;
/// [`repair`] lifts them back to 1.
pub type PriorityTable = BTreeMap<String, i64>;

/// Floor applied to every configured engine by [`repair`].
pub const MIN_PRIORITY: i64 = 1;

/// Result of reading the cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file existed and parsed (an empty file counts as an empty table).
    Loaded(PriorityTable),
    /// The file was absent; an empty placeholder was created.
    Created(PriorityTable),
    /// The file existed but could not be parsed; its content is ignored.
    Recovered {
        table: PriorityTable,
        reason: String,
    },
}

impl LoadOutcome {
    pub fn table(&self) -> &PriorityTable {
        match self {
            LoadOutcome::Loaded(table)
            | LoadOutcome::Created(table)
            | LoadOutcome::Recovered { table, .. } => table,
        }
    }

    pub fn into_table(self) -> PriorityTable {
        match self {
            LoadOutcome::Loaded(table)
            | LoadOutcome::Created(table)
            | LoadOutcome::Recovered { table, .. } => table,
        }
    }

    /// Whether the persisted content was discarded.
    pub fn was_recovered(&self) -> bool {
        matches!(self, LoadOutcome::Recovered { .. })
    }
}

/// File-backed priority table.
#[derive(Debug, Clone)]
pub struct PriorityStore {
    path: PathBuf,
}

impl PriorityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CACHE_HOME/srch.json` (or the platform equivalent).
    pub fn default_path() -> Result<PathBuf> {
        dirs::cache_dir()
            .map(|dir| dir.join(FILE_NAME))
            .ok_or(SrchError::NoCacheDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table from disk.
    pub fn load(&self) -> Result<LoadOutcome> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.create_placeholder();
                return Ok(LoadOutcome::Created(PriorityTable::new()));
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!("Priority cache {:?} is empty", self.path);
            return Ok(LoadOutcome::Loaded(PriorityTable::new()));
        }

        // Only the document shape is strict; a bad value drops its own entry.
        let document = match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(other) => {
                let reason = format!("expected a JSON object, found {}", json_kind(&other));
                warn!("Ignoring priority cache {:?}: {}", self.path, reason);
                return Ok(LoadOutcome::Recovered {
                    table: PriorityTable::new(),
                    reason,
                });
            }
            Err(e) => {
                warn!("Ignoring unreadable priority cache {:?}: {}", self.path, e);
                return Ok(LoadOutcome::Recovered {
                    table: PriorityTable::new(),
                    reason: e.to_string(),
                });
            }
        };

        let mut table = PriorityTable::new();
        for (key, value) in document {
            match value.as_i64() {
                Some(count) => {
                    table.insert(key, count);
                }
                None => warn!("Skipping priority {:?} = {} in {:?}", key, value, self.path),
            }
        }
        debug!("Loaded {} priorities from {:?}", table.len(), self.path);
        Ok(LoadOutcome::Loaded(table))
    }

    /// Replace the persisted table.
    pub fn save(&self, table: &PriorityTable) -> Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer(&mut tmp, table)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Saved {} priorities to {:?}", table.len(), self.path);
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Touch the cache so later saves have a target. Failure is not fatal here;
    /// a later `save` reports it.
    fn create_placeholder(&self) {
        let created = fs::create_dir_all(self.parent_dir()).and_then(|_| {
            fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(&self.path)
        });
        match created {
            Ok(_) => info!("Created priority cache {:?}", self.path),
            Err(e) => warn!("Could not create priority cache {:?}: {}", self.path, e),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Give every configured engine a usable priority.
///
/// Keys that are missing, or whose count is below [`MIN_PRIORITY`], are set
/// to it. Entries for keys outside `keys` are left untouched. Returns the
/// number of entries changed.
pub fn repair<'a, I>(table: &mut PriorityTable, keys: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut repaired = 0;
    for key in keys {
        let count = table.entry(key.to_string()).or_insert(0);
        if *count < MIN_PRIORITY {
            *count = MIN_PRIORITY;
            repaired += 1;
        }
    }
    repaired
}

/// Highest count among `keys`, never below [`MIN_PRIORITY`].
pub fn max_count<'a, I>(table: &PriorityTable, keys: I) -> i64
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .filter_map(|key| table.get(key).copied())
        .fold(MIN_PRIORITY, i64::max)
}
