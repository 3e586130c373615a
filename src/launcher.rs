//! One launcher run, start to finish.
//!
//! load → repair → rank → query prompt → engine prompt → record + save →
//! build URL → open. Every step is blocking and runs on the calling thread.
//! Backing out of either prompt ends the run with nothing saved and nothing
//! opened.

use tracing::{debug, info};

use crate::config::Settings;
use crate::engine::{rank, record, repair, PriorityStore, PriorityTable};
use crate::error::{Result, SrchError};
use crate::menu::{Browser, Prompt};
use crate::query_url;

/// Why a run ended without opening anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The query prompt returned nothing.
    EmptyQuery,
    /// The engine prompt returned nothing.
    EmptySelection,
    /// The engine prompt returned a line that is not a configured engine.
    UnknownEngine(String),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Opened {
        engine: String,
        url: String,
        /// Whether the selection was counted and saved.
        recorded: bool,
    },
    Aborted(AbortReason),
}

/// Runs the search flow against one settings snapshot and one cache file.
pub struct Launcher<'a> {
    settings: &'a Settings,
    store: &'a PriorityStore,
}

impl<'a> Launcher<'a> {
    pub fn new(settings: &'a Settings, store: &'a PriorityStore) -> Self {
        Self { settings, store }
    }

    fn engine_keys(&self) -> impl Iterator<Item = &'a str> + Clone + use<'a> {
        self.settings.bangs.keys().map(String::as_str)
    }

    /// Load the cache, give every configured engine a priority, and rank.
    pub fn ranked_engines(&self) -> Result<(PriorityTable, Vec<String>)> {
        let outcome = self.store.load()?;
        if outcome.was_recovered() {
            debug!("Starting from an empty priority table");
        }
        let mut table = outcome.into_table();

        let repaired = repair(&mut table, self.engine_keys());
        if repaired > 0 {
            debug!("Gave {} engine(s) the minimum priority", repaired);
        }

        let order = rank(self.engine_keys(), &table, self.settings.default_key());
        Ok((table, order))
    }

    /// URL for `query` on `engine`, without prompting or recording anything.
    pub fn preview_url(&self, engine: &str, query: &str) -> Result<String> {
        let template = self
            .settings
            .template(engine)
            .ok_or_else(|| SrchError::UnknownEngine(engine.to_string()))?;
        Ok(query_url::build(template, query, &self.settings.address))
    }

    /// Run the interactive flow.
    pub fn run(
        &self,
        query_menu: &dyn Prompt,
        engine_menu: &dyn Prompt,
        browser: &dyn Browser,
    ) -> Result<Outcome> {
        let (mut table, order) = self.ranked_engines()?;

        let query = query_menu.prompt(&[])?;
        if query.is_empty() {
            info!("No query entered");
            return Ok(Outcome::Aborted(AbortReason::EmptyQuery));
        }

        let engine = engine_menu.prompt(&order)?;
        if engine.is_empty() {
            info!("No engine selected");
            return Ok(Outcome::Aborted(AbortReason::EmptySelection));
        }
        if !self.settings.bangs.contains_key(&engine) {
            info!("Ignoring unknown engine {:?}", engine);
            return Ok(Outcome::Aborted(AbortReason::UnknownEngine(engine)));
        }

        let recorded = record(
            &mut table,
            &self.settings.bangs,
            &engine,
            self.settings.default_key(),
        )?;
        if recorded {
            self.store.save(&table)?;
        }

        let url = self.preview_url(&engine, &query)?;
        debug!("Search URL: {}", url);
        browser.open(&url)?;

        Ok(Outcome::Opened {
            engine,
            url,
            recorded,
        })
    }
}
