//! srch
//!
//! A quick web search launcher: prompt for a query, prompt for a search
//! engine ("bang"), open the results. Engines are offered most-used first,
//! with the configured default always on top.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod launcher;
pub mod menu;
pub mod process_guard;
pub mod query_url;

pub use config::{Bangs, CommandLine, CommandOverrides, SearchConfig, Settings};
pub use engine::{LoadOutcome, PriorityStore, PriorityTable};
pub use error::{Result, SrchError};
pub use launcher::{AbortReason, Launcher, Outcome};
pub use menu::{Browser, CommandBrowser, CommandMenu, Prompt};
