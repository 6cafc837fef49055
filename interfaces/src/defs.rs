use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candidate article pulled from a feed source.
///
/// The `identifier` is the article's canonical link and doubles as the
/// dedup key. Items are consumed once per run and never persisted themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub identifier: String,
    pub title: String,
    pub summary_excerpt: String,
}

impl FeedItem {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>, summary_excerpt: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            summary_excerpt: summary_excerpt.into(),
        }
    }
}

/// Durable trace of a successful publication. At most one exists per identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRecord {
    pub identifier: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

impl PublishedRecord {
    /// Builds a record stamped with the current time, clamping the title to
    /// `max_title_chars` characters.
    pub fn new(identifier: &str, title: &str, max_title_chars: usize) -> Self {
        Self {
            identifier: identifier.to_owned(),
            title: title.chars().take(max_title_chars).collect(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Ok,
}

/// The only externally observable output of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,
    #[serde(rename = "posted")]
    pub posted_count: usize,
}

impl RunResult {
    pub fn ok(posted_count: usize) -> Self {
        Self {
            status: RunStatus::Ok,
            posted_count,
        }
    }
}

// Note on the data flow:
// A FeedItem lives only for the duration of one item-processing step. The
// rewritten caption derived from it is a plain `String` owned by that step and
// dropped if a later stage fails; only the identifier and title survive, as a
// PublishedRecord, once delivery succeeded.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_result_serializes_with_posted_key() {
        let json = serde_json::to_value(RunResult::ok(2)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok", "posted": 2 }));
    }

    #[test]
    fn published_record_truncates_title_on_char_boundaries() {
        let record = PublishedRecord::new("https://example.com/a", "Défilé à Paris", 6);
        assert_eq!(record.title, "Défilé");
        assert_eq!(record.identifier, "https://example.com/a");
    }
}
