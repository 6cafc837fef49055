pub mod defs;

pub use defs::{FeedItem, PublishedRecord, RunResult, RunStatus};
