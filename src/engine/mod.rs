//! Engine ranking: usage history in, menu order out.
//!
//! The store loads and saves counts, the encoder turns counts into byte sort
//! keys, the ranker orders engines, and the recorder counts selections.

pub mod encoder;
pub mod ranker;
pub mod recorder;
pub mod store;

pub use encoder::{encode, key_width};
pub use ranker::{rank, sort_key};
pub use recorder::record;
pub use store::{max_count, repair, LoadOutcome, PriorityStore, PriorityTable};
