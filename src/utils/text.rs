//! Text cleanup for feed content.

use scraper::Html;

/// Strip HTML tags and collapse non-breaking spaces to regular spaces
pub fn html_to_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.replace('\u{a0}', " ")
}

/// Drop a trailing ` - Publisher` suffix from a headline
pub fn strip_publisher_suffix(title: &str, publisher: &str) -> String {
    let publisher = publisher.trim();
    if publisher.is_empty() {
        return title.to_string();
    }

    for separator in [" - ", "  "] {
        let suffix = format!("{}{}", separator, publisher);
        if let Some(stripped) = title.strip_suffix(&suffix) {
            return stripped.trim().to_string();
        }
    }

    title.to_string()
}
