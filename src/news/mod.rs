//! The news retrieval pipeline.
//!
//! A search flows through these stages:
//!
//! 1. [`build_request`] turns a [`SearchQuery`](crate::models::SearchQuery) into a feed request
//! 2. [`FeedFetcher`] downloads and parses the feed into raw entries
//! 3. [`EntryProcessor`] cleans entries and drops excluded domains
//! 4. [`resolve_all`] resolves every remaining link through a [`UrlResolver`]
//! 5. [`SlidingWindowPaginator`] repeats 1-4 over shrinking date windows when
//!    more results are requested than a single feed can hold
//!
//! [`GoogleNews`] wires the stages together.
//!
//! # Extending
//!
//! URL resolution and full-article extraction sit behind the [`UrlResolver`]
//! and [`ArticleExtractor`] traits. The default resolver is
//! [`GoogleNewsResolver`]; no extractor is bundled, so
//! [`GoogleNews::get_full_article`] needs one supplied through the builder.

#[cfg(feature = "blocking")]
mod blocking;
mod client;
mod coordinator;
mod decoder;
mod fetcher;
pub mod mock;
mod paginator;
mod processor;
mod query;
mod resolver;

#[cfg(feature = "blocking")]
pub use blocking::BlockingGoogleNews;
pub use client::{Endpoints, GoogleNews, GoogleNewsBuilder};
pub use coordinator::{resolve_all, run_tasks, ResolveMode, TaskOutcome};
pub use decoder::{build_payload, parse_params, parse_rpc_response, DecodeParams, RPC_METHOD};
pub use fetcher::{parse_feed, FeedFetcher};
pub use mock::{MockExtractor, MockResolver};
pub use paginator::{
    Page, PageSource, PaginationState, SlidingWindowPaginator, PAGE_CAP, WINDOW_DAYS,
};
pub use processor::{EntryProcessor, ProcessedEntry};
pub use query::{build_request, FeedRequest};
pub use resolver::{GoogleNewsResolver, UrlKind};

use crate::error::{ExtractError, ResolveError};
use crate::models::{FullArticle, Resolution};
use async_trait::async_trait;

/// Turns a feed link into the publisher's canonical URL.
///
/// Implementations must be shareable across concurrently running tasks.
/// An `Err` is never fatal to a search: the coordinator keeps the original
/// link and marks the article as an unresolved fallback.
#[async_trait]
pub trait UrlResolver: Send + Sync + std::fmt::Debug {
    /// Short identifier used in log output
    fn id(&self) -> &str;

    async fn resolve(&self, url: &str) -> Result<Resolution, ResolveError>;
}

/// Downloads and parses a full article from its canonical URL
#[async_trait]
pub trait ArticleExtractor: Send + Sync + std::fmt::Debug {
    fn id(&self) -> &str;

    /// Extract the article at `url`, using `language` as a parsing hint
    async fn extract(&self, url: &str, language: &str) -> Result<FullArticle, ExtractError>;
}
