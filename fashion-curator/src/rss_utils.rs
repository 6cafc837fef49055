/// Feed and text helpers shared by the adapters

/// URL utilities
pub mod url {
    use url::Url;

    /// Check that a feed URL is absolute http(s)
    pub fn is_valid_feed_url(url_str: &str) -> bool {
        match Url::parse(url_str) {
            Ok(url) => url.scheme() == "http" || url.scheme() == "https",
            Err(_) => false,
        }
    }

    /// Strip credentials and query parameters so a URL is safe to log
    pub fn redact(url_str: &str) -> String {
        match Url::parse(url_str) {
            Ok(mut url) => {
                let _ = url.set_password(None);
                let _ = url.set_username("");
                url.set_query(None);
                url.to_string()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}

/// Text utilities
pub mod text {
    use html2text::render::text_renderer::TrivialDecorator;

    // Wide enough that the renderer never wraps an excerpt
    const RENDER_WIDTH: usize = 10_000;

    /// Extract clean text content from HTML, decoding entities and collapsing whitespace
    pub fn extract_text_from_html(html: &str) -> String {
        html2text::from_read_with_decorator(html.as_bytes(), RENDER_WIDTH, TrivialDecorator::new())
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Truncate to at most `max_chars` characters without splitting a code point
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => text[..byte_index].to_string(),
            None => text.to_string(),
        }
    }
}
