//! Feed entry and article models.

use serde::{Deserialize, Serialize};

/// Publisher block attached to a feed item (`<source url="...">Title</source>`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    /// Publisher display name
    pub title: String,

    /// Publisher home page
    pub href: String,
}

impl Publisher {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
        }
    }
}

/// A raw item parsed from the feed, before any cleanup.
///
/// Produced per fetch and consumed by the entry processor; never handed to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,

    /// Description as HTML
    pub description: String,

    /// Published date exactly as it appeared in the feed
    pub published: String,

    /// Entry link (usually a redirect-host URL)
    pub link: String,

    pub source: Option<Publisher>,
}

/// How an article's URL was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Obfuscated identifier decoded into the canonical URL
    Resolved,
    /// Plain URL whose redirect (or final location) was followed
    RedirectFollowed,
    /// Resolution failed; the feed URL was kept
    UnresolvedFallback,
    /// Dropped by domain exclusion before resolution.
    ///
    /// Part of the status vocabulary only: excluded entries never reach a
    /// [`SearchResponse`], which counts them in [`SearchResponse::excluded`].
    Excluded,
}

impl ResolutionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ResolutionStatus::Resolved => "resolved",
            ResolutionStatus::RedirectFollowed => "redirect_followed",
            ResolutionStatus::UnresolvedFallback => "unresolved_fallback",
            ResolutionStatus::Excluded => "excluded",
        }
    }
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of resolving a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub url: String,
    pub status: ResolutionStatus,
}

impl Resolution {
    pub fn resolved(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: ResolutionStatus::Resolved,
        }
    }

    pub fn redirect_followed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: ResolutionStatus::RedirectFollowed,
        }
    }

    /// Keep the original URL
    pub fn fallback(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: ResolutionStatus::UnresolvedFallback,
        }
    }
}

/// A cleaned news article with its resolved URL.
///
/// This is the only value the engine hands back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,

    /// Plain-text description (HTML stripped, non-breaking spaces collapsed)
    pub description: String,

    /// Published date in the feed's original format
    #[serde(rename = "published date")]
    pub published_date: String,

    /// Resolved URL (or the feed URL on fallback)
    pub url: String,

    pub publisher: Publisher,

    pub status: ResolutionStatus,
}

/// Non-fatal conditions surfaced alongside results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryWarning {
    /// A period was set together with dates; the dates win
    PeriodIgnored { period: String },

    /// Date ranges only apply to keyword and site searches
    DateRangeUnsupported { mode: String },

    /// Paginated fetches over the page cap drive their own date window
    DateFilterIgnoredForPagination,

    /// More than one page was requested for a mode that cannot be paginated
    PaginationUnsupported { mode: String, max_results: usize },
}

impl std::fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryWarning::PeriodIgnored { period } => write!(
                f,
                "period ({}) will be ignored in favour of the start and end dates",
                period
            ),
            QueryWarning::DateRangeUnsupported { mode } => write!(
                f,
                "only keyword and site searches support date ranges; dates ignored for {} query",
                mode
            ),
            QueryWarning::DateFilterIgnoredForPagination => {
                write!(f, "searches for over 100 articles ignore date ranges and periods")
            }
            QueryWarning::PaginationUnsupported { mode, max_results } => write!(
                f,
                "{} queries cannot be paginated; returning at most one page of the {} requested",
                mode, max_results
            ),
        }
    }
}

/// Result of a search: articles in feed order plus any warnings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub articles: Vec<Article>,

    pub warnings: Vec<QueryWarning>,

    /// Entries dropped by domain exclusion
    pub excluded: usize,
}

impl SearchResponse {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles,
            warnings: Vec::new(),
            excluded: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Full article text produced by an external extractor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FullArticle {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub top_image: Option<String>,
    pub publish_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ResolutionStatus::UnresolvedFallback).unwrap();
        assert_eq!(json, "\"unresolved_fallback\"");
        assert_eq!(ResolutionStatus::RedirectFollowed.to_string(), "redirect_followed");
    }

    #[test]
    fn test_excluded_status_round_trips() {
        let json = serde_json::to_string(&ResolutionStatus::Excluded).unwrap();
        assert_eq!(json, "\"excluded\"");
        let parsed: ResolutionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ResolutionStatus::Excluded);
    }

    #[test]
    fn test_article_keeps_feed_date_key() {
        let article = Article {
            title: "t".to_string(),
            description: "d".to_string(),
            published_date: "Mon, 06 Jan 2025 10:00:00 GMT".to_string(),
            url: "https://example.com/a".to_string(),
            publisher: Publisher::new("Example", "https://example.com"),
            status: ResolutionStatus::Resolved,
        };
        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["published date"], "Mon, 06 Jan 2025 10:00:00 GMT");
        assert_eq!(value["status"], "resolved");
    }

    #[test]
    fn test_warning_display() {
        let warning = QueryWarning::PeriodIgnored {
            period: "7d".to_string(),
        };
        assert!(warning.to_string().contains("7d"));
    }
}
