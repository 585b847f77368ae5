//! Mock resolver and extractor for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ArticleExtractor, UrlResolver};
use crate::error::{ExtractError, ResolveError};
use crate::models::{FullArticle, Resolution};

#[derive(Debug, Clone)]
enum Behavior {
    Resolve(Resolution),
    Fail,
    Panic,
}

/// A resolver that answers from a fixed table and records every call.
///
/// URLs without an entry resolve as followed redirects to themselves.
#[derive(Debug, Default)]
pub struct MockResolver {
    behaviors: HashMap<String, Behavior>,
    calls: Mutex<Vec<String>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `url` to `resolution`
    pub fn with_resolution(mut self, url: &str, resolution: Resolution) -> Self {
        self.behaviors
            .insert(url.to_string(), Behavior::Resolve(resolution));
        self
    }

    /// Fail resolution of `url`
    pub fn with_failure(mut self, url: &str) -> Self {
        self.behaviors.insert(url.to_string(), Behavior::Fail);
        self
    }

    /// Panic while resolving `url`
    pub fn with_panic(mut self, url: &str) -> Self {
        self.behaviors.insert(url.to_string(), Behavior::Panic);
        self
    }

    /// URLs passed to `resolve`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl UrlResolver for MockResolver {
    fn id(&self) -> &str {
        "mock"
    }

    async fn resolve(&self, url: &str) -> Result<Resolution, ResolveError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());

        match self.behaviors.get(url) {
            Some(Behavior::Resolve(resolution)) => Ok(resolution.clone()),
            Some(Behavior::Fail) => Err(ResolveError::Other(format!("mock failure for {}", url))),
            Some(Behavior::Panic) => panic!("mock panic for {}", url),
            None => Ok(Resolution::redirect_followed(url)),
        }
    }
}

/// An extractor returning predefined articles
#[derive(Debug, Default)]
pub struct MockExtractor {
    articles: HashMap<String, FullArticle>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_article(mut self, article: FullArticle) -> Self {
        self.articles.insert(article.url.clone(), article);
        self
    }
}

#[async_trait]
impl ArticleExtractor for MockExtractor {
    fn id(&self) -> &str {
        "mock"
    }

    async fn extract(&self, url: &str, _language: &str) -> Result<FullArticle, ExtractError> {
        self.articles
            .get(url)
            .cloned()
            .ok_or_else(|| ExtractError::Download(format!("no article for {}", url)))
    }
}
