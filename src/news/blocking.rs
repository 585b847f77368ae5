//! Fully sequential blocking facade.

use tokio::runtime::{Builder, Runtime};

use super::client::{GoogleNews, GoogleNewsBuilder};
use super::coordinator::ResolveMode;
use crate::error::NewsError;
use crate::models::{FullArticle, SearchQuery, SearchResponse};

/// Blocking wrapper around [`GoogleNews`].
///
/// Runs on a private current-thread runtime and resolves one link at a
/// time. Must not be used from inside an async runtime.
#[derive(Debug)]
pub struct BlockingGoogleNews {
    inner: GoogleNews,
    runtime: Runtime,
}

impl BlockingGoogleNews {
    pub fn new() -> Result<Self, NewsError> {
        Self::from_builder(GoogleNews::builder())
    }

    /// Build from an async builder; the resolve mode is forced to sequential
    pub fn from_builder(builder: GoogleNewsBuilder) -> Result<Self, NewsError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| NewsError::network_with("failed to start runtime", e))?;

        Ok(Self {
            inner: builder.mode(ResolveMode::Sequential).build()?,
            runtime,
        })
    }

    pub fn search(&self, query: &SearchQuery) -> Result<SearchResponse, NewsError> {
        self.runtime.block_on(self.inner.search(query))
    }

    pub fn get_full_article(&self, url: &str, language: &str) -> Result<FullArticle, NewsError> {
        self.runtime
            .block_on(self.inner.get_full_article(url, language))
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}
