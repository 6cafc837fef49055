use crate::rss_utils::text::{extract_text_from_html, truncate_chars};
use crate::types::{CuratorError, FeedItem, Result};
use feed_rs::parser;
use std::collections::HashSet;
use tracing::debug;

/// Turns RSS/Atom documents into [`FeedItem`]s.
pub struct FeedParser {
    excerpt_max_chars: usize,
}

impl FeedParser {
    pub fn new(excerpt_max_chars: usize) -> Self {
        Self { excerpt_max_chars }
    }

    /// Parse a feed document, keeping entry order. Entries without a link are
    /// dropped, and a link repeated inside the same document is kept once.
    pub fn parse_feed(&self, content: &str) -> Result<Vec<FeedItem>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| CuratorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let mut seen_links = HashSet::new();
        let mut items = Vec::with_capacity(feed.entries.len());

        for entry in feed.entries {
            if let Some(item) = self.parse_entry(entry) {
                if seen_links.insert(item.identifier.clone()) {
                    items.push(item);
                } else {
                    debug!("Skipping repeated entry: {}", item.identifier);
                }
            }
        }

        debug!("Parsed feed with {} entries", items.len());
        Ok(items)
    }

    fn parse_entry(&self, entry: feed_rs::model::Entry) -> Option<FeedItem> {
        // Atom entries may list replies/self/enclosure links before the article itself
        let link = entry
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| entry.links.first())?;
        let identifier = link.href.trim().to_string();
        if identifier.is_empty() {
            return None;
        }

        let title = entry
            .title
            .map(|t| extract_text_from_html(&t.content))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string());

        // Prefer the summary; fall back to the body for feeds that only ship content
        let raw_excerpt = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .unwrap_or_default();
        let summary_excerpt = truncate_chars(&extract_text_from_html(&raw_excerpt), self.excerpt_max_chars);

        Some(FeedItem {
            identifier,
            title,
            summary_excerpt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Runway Daily</title>
    <link>https://runway.example</link>
    <description>Fashion news</description>
    <item>
      <title>Milan closes with a bang</title>
      <link>https://runway.example/milan</link>
      <description><![CDATA[<p>The final day of <b>Milan</b> Fashion Week brought tailoring back.</p>]]></description>
    </item>
    <item>
      <title>Paris opens</title>
      <link>https://runway.example/paris</link>
    </item>
    <item>
      <title>Milan closes with a bang (updated)</title>
      <link>https://runway.example/milan</link>
    </item>
    <item>
      <title>No link here</title>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_in_source_order() {
        let items = FeedParser::new(500).parse_feed(RSS).unwrap();
        let links: Vec<_> = items.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(links, vec!["https://runway.example/milan", "https://runway.example/paris"]);
        assert_eq!(items[0].title, "Milan closes with a bang");
        assert_eq!(
            items[0].summary_excerpt,
            "The final day of Milan Fashion Week brought tailoring back."
        );
        assert_eq!(items[1].summary_excerpt, "");
    }

    #[test]
    fn excerpt_is_bounded() {
        let items = FeedParser::new(9).parse_feed(RSS).unwrap();
        assert_eq!(items[0].summary_excerpt, "The final");
    }

    #[test]
    fn atom_entries_are_keyed_by_their_alternate_link() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Style Blog</title>
  <id>tag:blog.example,2024:feed</id>
  <updated>2024-05-01T10:00:00Z</updated>
  <entry>
    <id>tag:blog.example,2024:post-1</id>
    <title>Capsule wardrobe basics</title>
    <updated>2024-05-01T10:00:00Z</updated>
    <link rel="replies" type="application/atom+xml" href="https://blog.example/feeds/1/comments"/>
    <link rel="self" type="application/atom+xml" href="https://blog.example/feeds/posts/1"/>
    <link rel="alternate" type="text/html" href="https://blog.example/2024/05/capsule-wardrobe.html"/>
    <summary>Ten pieces, endless outfits.</summary>
  </entry>
  <entry>
    <id>tag:blog.example,2024:post-2</id>
    <title>Only a comments link</title>
    <updated>2024-05-02T10:00:00Z</updated>
    <link rel="replies" href="https://blog.example/feeds/2/comments"/>
  </entry>
</feed>"#;

        let items = FeedParser::new(500).parse_feed(atom).unwrap();
        assert_eq!(items[0].identifier, "https://blog.example/2024/05/capsule-wardrobe.html");
        assert_eq!(items[0].summary_excerpt, "Ten pieces, endless outfits.");
        assert_eq!(items[1].identifier, "https://blog.example/feeds/2/comments");
    }

    #[test]
    fn entities_are_decoded_in_excerpts() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>t</title><link>https://x.example</link><description>d</description>
<item><title>H&amp;M x Designer</title><link>https://x.example/hm</link>
<description>&lt;p&gt;Prints&amp;nbsp;&amp;amp; pleats&lt;/p&gt;</description></item>
</channel></rss>"#;

        let items = FeedParser::new(500).parse_feed(rss).unwrap();
        assert_eq!(items[0].title, "H&M x Designer");
        assert_eq!(items[0].summary_excerpt, "Prints & pleats");
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        let err = FeedParser::new(500).parse_feed("<html>not a feed").unwrap_err();
        assert!(matches!(err, CuratorError::Parse(_)));
    }
}
