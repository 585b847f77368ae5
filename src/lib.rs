//! # gnews
//!
//! Google News RSS retrieval with redirect-link resolution and sliding-window
//! pagination.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Queries, feed entries, articles and locale lookup
//! - [`news`]: The retrieval pipeline (query building, fetching, link resolution, pagination)
//! - [`utils`]: HTTP session, text cleanup and validation helpers
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal output used by the `gnews` binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use gnews::{GoogleNews, SearchQuery};
//!
//! # async fn run() -> Result<(), gnews::NewsError> {
//! let news = GoogleNews::new()?;
//! let query = SearchQuery::topic("TECHNOLOGY").max_results(10).build()?;
//! let response = news.search(&query).await?;
//! for article in &response.articles {
//!     println!("{} [{}] {}", article.title, article.status, article.url);
//! }
//! news.close();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod news;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use error::{ExtractError, NewsError, ResolveError};
pub use models::{Article, FullArticle, QueryWarning, ResolutionStatus, SearchQuery, SearchResponse};
#[cfg(feature = "blocking")]
pub use news::BlockingGoogleNews;
pub use news::{ArticleExtractor, GoogleNews, ResolveMode, UrlResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
