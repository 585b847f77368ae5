//! Terminal output for the command line.
//!
//! Colored status lines, article tables and JSON rendering.

use comfy_table::{presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::{Article, QueryWarning, ResolutionStatus, SearchResponse};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Search => println!("{} {}", icon.yellow(), msg),
    }
}

/// Print search results header.
pub fn print_search_header(label: &str, count: usize, duration: Duration) {
    println!();
    println!(
        "{} Results for: {}",
        status_icon(Status::Search).yellow().bold(),
        label.cyan().bold()
    );
    println!(
        "{} Found {} articles in {:.2}s",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold(),
        duration.as_secs_f64()
    );
    println!();
}

/// Print query warnings to stderr
pub fn print_warnings(warnings: &[QueryWarning]) {
    for warning in warnings {
        print_status(Status::Warning, &warning.to_string());
    }
}

/// Truncate text to `max_chars` characters, appending `...` when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if max_chars <= 3 {
        return "...".to_string();
    }
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", truncated.trim_end())
}

fn status_color(status: ResolutionStatus) -> Color {
    match status {
        ResolutionStatus::Resolved => Color::Green,
        ResolutionStatus::RedirectFollowed => Color::Cyan,
        ResolutionStatus::UnresolvedFallback => Color::Yellow,
        ResolutionStatus::Excluded => Color::DarkGrey,
    }
}

/// Build a table with one row per article
pub fn articles_table(articles: &[Article]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["Title", "Publisher", "Published", "Status", "URL"]);

    for article in articles {
        table.add_row(vec![
            Cell::new(truncate_with_ellipsis(&article.title, 60)).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&article.publisher.title, 24)),
            Cell::new(&article.published_date),
            Cell::new(article.status.name()).fg(status_color(article.status)),
            Cell::new(truncate_with_ellipsis(&article.url, 70)),
        ]);
    }
    table
}

/// Render a response as pretty-printed JSON
pub fn render_json(response: &SearchResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}

/// Render articles as plain text blocks
pub fn render_plain(articles: &[Article]) -> String {
    let mut out = String::new();
    for article in articles {
        out.push_str(&format!("{} - {}\n", article.title, article.publisher.title));
        out.push_str(&format!("  URL: {} ({})\n", article.url, article.status));
        if !article.published_date.is_empty() {
            out.push_str(&format!("  Published: {}\n", article.published_date));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Publisher;

    fn article() -> Article {
        Article {
            title: "Markets rally on rate hopes".to_string(),
            description: "Stocks rose".to_string(),
            published_date: "Mon, 04 Mar 2024 10:00:00 GMT".to_string(),
            url: "https://www.reuters.com/markets/rally".to_string(),
            publisher: Publisher::new("Reuters", "https://www.reuters.com"),
            status: ResolutionStatus::Resolved,
        }
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("a longer headline", 10), "a longe...");
        assert_eq!(truncate_with_ellipsis("anything", 2), "...");
        assert_eq!(truncate_with_ellipsis("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_articles_table() {
        let rendered = articles_table(&[article()]).to_string();
        assert!(rendered.contains("Markets rally on rate hopes"));
        assert!(rendered.contains("resolved"));
        assert!(rendered.contains("Reuters"));
    }

    #[test]
    fn test_render_json_uses_feed_keys() {
        let json = render_json(&SearchResponse::new(vec![article()])).unwrap();
        assert!(json.contains("\"published date\""));
        assert!(json.contains("\"status\": \"resolved\""));
    }

    #[test]
    fn test_render_plain() {
        let text = render_plain(&[article()]);
        assert!(text.starts_with("Markets rally on rate hopes - Reuters"));
        assert!(text.contains("(resolved)"));
    }
}
