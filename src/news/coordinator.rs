//! Fan-out of URL resolution over a page of entries.
//!
//! Every entry gets exactly one resolution task. Tasks run on the calling
//! task and only overlap while awaiting I/O; dropping the returned future
//! cancels every request still in flight.

use std::panic::AssertUnwindSafe;

use futures_util::future::join_all;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::processor::ProcessedEntry;
use super::UrlResolver;
use crate::error::ResolveError;
use crate::models::{Article, Resolution};

/// How resolution tasks are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// All tasks polled together, overlapping their network waits
    #[default]
    Concurrent,
    /// One resolution at a time, in feed order
    Sequential,
}

impl std::str::FromStr for ResolveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concurrent" => Ok(ResolveMode::Concurrent),
            "sequential" => Ok(ResolveMode::Sequential),
            other => Err(format!(
                "unknown resolve mode '{}' (expected concurrent or sequential)",
                other
            )),
        }
    }
}

/// Result of one task, at the same position as its input
#[derive(Debug)]
pub enum TaskOutcome<T> {
    Success(T),
    Failure(ResolveError),
}

impl<T> TaskOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success(_))
    }
}

/// Resolve every URL, returning one outcome per input in input order.
///
/// A task that errors or panics yields [`TaskOutcome::Failure`] without
/// affecting its siblings.
pub async fn run_tasks(
    resolver: &dyn UrlResolver,
    urls: &[String],
    mode: ResolveMode,
) -> Vec<TaskOutcome<Resolution>> {
    match mode {
        ResolveMode::Concurrent => join_all(urls.iter().map(|url| guarded(resolver, url))).await,
        ResolveMode::Sequential => {
            let mut outcomes = Vec::with_capacity(urls.len());
            for url in urls {
                outcomes.push(guarded(resolver, url).await);
            }
            outcomes
        }
    }
}

async fn guarded(resolver: &dyn UrlResolver, url: &str) -> TaskOutcome<Resolution> {
    match AssertUnwindSafe(resolver.resolve(url)).catch_unwind().await {
        Ok(Ok(resolution)) => TaskOutcome::Success(resolution),
        Ok(Err(err)) => TaskOutcome::Failure(err),
        Err(_) => TaskOutcome::Failure(ResolveError::Other(format!(
            "resolver '{}' panicked",
            resolver.id()
        ))),
    }
}

/// Resolve a page of processed entries into articles.
///
/// Output has the same length and order as `entries`; failed resolutions
/// keep the feed link and are marked as unresolved fallbacks.
pub async fn resolve_all(
    resolver: &dyn UrlResolver,
    entries: Vec<ProcessedEntry>,
    mode: ResolveMode,
) -> Vec<Article> {
    let urls: Vec<String> = entries.iter().map(|e| e.link.clone()).collect();
    let outcomes = run_tasks(resolver, &urls, mode).await;

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    debug!(
        resolver = resolver.id(),
        count = entries.len(),
        failed,
        ?mode,
        "Resolved page"
    );

    entries
        .into_iter()
        .zip(outcomes)
        .map(|(entry, outcome)| {
            let resolution = match outcome {
                TaskOutcome::Success(resolution) => resolution,
                TaskOutcome::Failure(err) => {
                    warn!(url = %entry.link, error = %err, "Resolution failed, keeping feed URL");
                    Resolution::fallback(entry.link.clone())
                }
            };

            Article {
                title: entry.title,
                description: entry.description,
                published_date: entry.published,
                url: resolution.url,
                publisher: entry.publisher,
                status: resolution.status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Publisher, ResolutionStatus};
    use crate::news::mock::MockResolver;

    fn entries(links: &[&str]) -> Vec<ProcessedEntry> {
        links
            .iter()
            .enumerate()
            .map(|(i, link)| ProcessedEntry {
                title: format!("Story {}", i),
                description: String::new(),
                published: "Mon, 04 Mar 2024 10:00:00 GMT".to_string(),
                link: link.to_string(),
                publisher: Publisher::new("Pub", "https://pub.example"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_failure_becomes_fallback_in_order() {
        let resolver = MockResolver::new()
            .with_resolution("https://a/1", Resolution::resolved("https://final/1"))
            .with_failure("https://a/2")
            .with_resolution("https://a/3", Resolution::redirect_followed("https://final/3"));

        for mode in [ResolveMode::Concurrent, ResolveMode::Sequential] {
            let articles = resolve_all(
                &resolver,
                entries(&["https://a/1", "https://a/2", "https://a/3"]),
                mode,
            )
            .await;

            assert_eq!(articles.len(), 3);
            assert_eq!(articles[0].url, "https://final/1");
            assert_eq!(articles[0].status, ResolutionStatus::Resolved);
            assert_eq!(articles[1].url, "https://a/2");
            assert_eq!(articles[1].status, ResolutionStatus::UnresolvedFallback);
            assert_eq!(articles[2].url, "https://final/3");
            assert_eq!(articles[2].title, "Story 2");
        }
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let resolver = MockResolver::new()
            .with_panic("https://a/boom")
            .with_resolution("https://a/ok", Resolution::resolved("https://final/ok"));

        let outcomes = run_tasks(
            &resolver,
            &["https://a/boom".to_string(), "https://a/ok".to_string()],
            ResolveMode::Concurrent,
        )
        .await;

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], TaskOutcome::Failure(ResolveError::Other(_))));
        assert!(outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_empty_page() {
        let resolver = MockResolver::new();
        assert!(resolve_all(&resolver, Vec::new(), ResolveMode::Concurrent)
            .await
            .is_empty());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Sequential".parse::<ResolveMode>().unwrap(), ResolveMode::Sequential);
        assert_eq!("concurrent".parse::<ResolveMode>().unwrap(), ResolveMode::Concurrent);
        assert!("parallel".parse::<ResolveMode>().is_err());
    }
}
