use crate::config::CaptionConfig;
use crate::rss_utils::text::truncate_chars;

const SECTION_SEPARATOR: &str = "\n\n";
const ELLIPSIS: char = '…';

/// Assemble the channel caption: rewritten body, promotional footer, hashtags.
///
/// When the result would exceed `max_chars`, the body is shortened first. If
/// the footer and hashtags alone leave no room for the body, the body is
/// dropped and the tail is cut to `max_chars`. The result never exceeds
/// `max_chars` characters.
pub fn compose_caption(body: &str, config: &CaptionConfig) -> String {
    let tail: Vec<&str> = [config.footer.trim(), config.hashtags.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    let tail = tail.join(SECTION_SEPARATOR);

    let body = body.trim();
    let tail_chars = if tail.is_empty() {
        0
    } else {
        tail.chars().count() + SECTION_SEPARATOR.len()
    };
    let body_budget = config.max_chars.saturating_sub(tail_chars);

    if body.chars().count() > body_budget && body_budget < 2 {
        return truncate_chars(&tail, config.max_chars);
    }

    let body = if body.chars().count() > body_budget {
        let mut shortened = truncate_chars(body, body_budget.saturating_sub(1)).trim_end().to_string();
        shortened.push(ELLIPSIS);
        shortened
    } else {
        body.to_string()
    };

    if tail.is_empty() {
        body
    } else {
        format!("{}{}{}", body, SECTION_SEPARATOR, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_chars: usize) -> CaptionConfig {
        CaptionConfig {
            footer: "Visit us!".to_string(),
            hashtags: "#moda".to_string(),
            max_chars,
        }
    }

    #[test]
    fn sections_are_joined_with_blank_lines() {
        let caption = compose_caption("  Nuevo look  ", &config(1024));
        assert_eq!(caption, "Nuevo look\n\nVisit us!\n\n#moda");
    }

    #[test]
    fn long_bodies_are_shortened_but_footer_kept() {
        let body = "a".repeat(100);
        let caption = compose_caption(&body, &config(40));
        assert_eq!(caption.chars().count(), 40);
        assert!(caption.ends_with("…\n\nVisit us!\n\n#moda"));
    }

    #[test]
    fn oversized_footer_never_exceeds_the_limit() {
        let config = CaptionConfig {
            footer: "Shop the full collection at our store today".to_string(),
            hashtags: "#moda #fashion".to_string(),
            max_chars: 20,
        };
        let caption = compose_caption("Nuevo look de temporada", &config);
        assert_eq!(caption, "Shop the full collec");
        assert!(caption.chars().count() <= 20);
    }

    #[test]
    fn empty_footer_and_hashtags_leave_body_alone() {
        let config = CaptionConfig {
            footer: String::new(),
            hashtags: " ".to_string(),
            max_chars: 1024,
        };
        assert_eq!(compose_caption("Solo texto", &config), "Solo texto");
    }
}
