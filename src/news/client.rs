//! The engine facade that owns the HTTP session and drives the pipeline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::coordinator::{resolve_all, ResolveMode};
use super::fetcher::FeedFetcher;
use super::paginator::{Page, PageSource, SlidingWindowPaginator, PAGE_CAP};
use super::processor::EntryProcessor;
use super::query::{build_request, FeedRequest};
use super::resolver::GoogleNewsResolver;
use super::{ArticleExtractor, UrlResolver};
use crate::error::NewsError;
use crate::models::{DateWindow, FullArticle, QueryWarning, SearchQuery, SearchResponse};
use crate::utils::{validate_proxy, HttpClient, HttpSettings};

/// Remote endpoints used by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Feed base; request paths are appended to it
    pub feed_base: String,

    /// Scheme and host of redirect links and the decode endpoints
    pub redirect_base: String,

    /// Batch-execute RPC path on the redirect host
    pub rpc_path: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            feed_base: "https://news.google.com/rss".to_string(),
            redirect_base: "https://news.google.com".to_string(),
            rpc_path: "/_/DotsSplashUi/data/batchexecute".to_string(),
        }
    }
}

/// News retrieval engine.
///
/// Owns one HTTP session for its whole lifetime. [`close`](Self::close)
/// cancels every request of any search still running.
///
/// A single engine may run several searches at once; each paginated search
/// keeps its own state.
///
/// ```rust,no_run
/// use gnews::{GoogleNews, SearchQuery};
///
/// # async fn run() -> Result<(), gnews::NewsError> {
/// let news = GoogleNews::new()?;
/// let query = SearchQuery::keyword("rust language").period("7d").build()?;
/// for article in news.search(&query).await?.articles {
///     println!("{} ({})", article.title, article.url);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GoogleNews {
    http: HttpClient,
    endpoints: Endpoints,
    resolver: Option<Arc<dyn UrlResolver>>,
    extractor: Option<Arc<dyn ArticleExtractor>>,
    mode: ResolveMode,
    strip_publisher_suffix: bool,
    closed: watch::Sender<bool>,
}

impl GoogleNews {
    /// Engine with default settings
    pub fn new() -> Result<Self, NewsError> {
        Self::builder().build()
    }

    pub fn builder() -> GoogleNewsBuilder {
        GoogleNewsBuilder::default()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Run a search.
    ///
    /// Requests above the page cap are paginated for keyword and site
    /// searches. Fails with [`NewsError::RateLimited`] or a network failure
    /// when a feed fetch fails; per-entry resolution failures only degrade
    /// single articles.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, NewsError> {
        if self.is_closed() {
            return Err(closed_error());
        }

        let mut closed = self.closed.subscribe();
        tokio::select! {
            result = self.run(query) => result,
            _ = wait_closed(&mut closed) => {
                debug!("Session closed during search");
                Err(closed_error())
            }
        }
    }

    /// Download and parse the full article at `url` with the configured extractor
    pub async fn get_full_article(
        &self,
        url: &str,
        language: &str,
    ) -> Result<FullArticle, NewsError> {
        let extractor = self.extractor.as_ref().ok_or_else(|| {
            NewsError::invalid_config("no article extractor configured")
        })?;
        if self.is_closed() {
            return Err(closed_error());
        }

        extractor
            .extract(url, language)
            .await
            .map_err(|e| NewsError::network_with(format!("failed to extract {}", url), e))
    }

    /// Cancel in-flight requests and refuse new ones
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    async fn run(&self, query: &SearchQuery) -> Result<SearchResponse, NewsError> {
        let http = if query.proxy().is_empty() {
            self.http.clone()
        } else {
            self.http.with_proxies(query.proxy())?
        };
        let resolver: Arc<dyn UrlResolver> = match &self.resolver {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(GoogleNewsResolver::new(http.clone(), &self.endpoints)),
        };

        let max_results = query.max_results();
        let paginate = max_results > PAGE_CAP && query.mode().supports_date_range();
        let mut warnings = Vec::new();

        let pipeline = Pipeline {
            fetcher: FeedFetcher::new(http),
            processor: EntryProcessor::new(query.exclude_websites())
                .strip_publisher_suffix(self.strip_publisher_suffix),
            resolver,
            mode: self.mode,
            feed_base: self.endpoints.feed_base.clone(),
            query: if paginate {
                query.without_time_filter()
            } else {
                query.clone()
            },
            limit: if paginate { None } else { Some(max_results) },
        };

        let mut response = if paginate {
            if query.has_time_filter() {
                warnings.push(QueryWarning::DateFilterIgnoredForPagination);
            }
            SlidingWindowPaginator::new(max_results).run(&pipeline).await?
        } else {
            if max_results > PAGE_CAP {
                warnings.push(QueryWarning::PaginationUnsupported {
                    mode: query.mode().name().to_string(),
                    max_results,
                });
            }
            let request = build_request(&pipeline.query, None);
            warnings.extend(request.warnings.iter().cloned());
            let page = pipeline.fetch_request(&request).await?;
            let mut response = SearchResponse::new(page.articles);
            response.excluded = page.excluded;
            response
        };

        for warning in &warnings {
            warn!(%warning, "Query adjusted");
        }
        response.warnings = warnings;

        info!(
            mode = query.mode().name(),
            count = response.len(),
            excluded = response.excluded,
            "Search complete"
        );
        Ok(response)
    }
}

async fn wait_closed(closed: &mut watch::Receiver<bool>) {
    loop {
        let is_closed = *closed.borrow_and_update();
        if is_closed {
            return;
        }
        if closed.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn closed_error() -> NewsError {
    NewsError::network("session closed")
}

/// Fetch, process and resolve one feed page for a fixed query
struct Pipeline {
    fetcher: FeedFetcher,
    processor: EntryProcessor,
    resolver: Arc<dyn UrlResolver>,
    mode: ResolveMode,
    feed_base: String,
    query: SearchQuery,
    limit: Option<usize>,
}

impl Pipeline {
    async fn fetch_request(&self, request: &FeedRequest) -> Result<Page, NewsError> {
        let entries = self.fetcher.fetch(&request.url(&self.feed_base)).await?;
        let raw_count = entries.len();

        let (mut kept, excluded) = self.processor.process_all(entries);
        if let Some(limit) = self.limit {
            kept.truncate(limit);
        }

        let articles = resolve_all(self.resolver.as_ref(), kept, self.mode).await;
        Ok(Page {
            articles,
            raw_count,
            excluded,
        })
    }
}

#[async_trait]
impl PageSource for Pipeline {
    async fn fetch_page(&self, window: Option<DateWindow>) -> Result<Page, NewsError> {
        let request = build_request(&self.query, window);
        self.fetch_request(&request).await
    }
}

/// Builder for [`GoogleNews`]
#[derive(Debug, Default)]
pub struct GoogleNewsBuilder {
    settings: HttpSettings,
    proxies: Vec<(String, String)>,
    endpoints: Endpoints,
    mode: ResolveMode,
    strip_publisher_suffix: bool,
    resolver: Option<Arc<dyn UrlResolver>>,
    extractor: Option<Arc<dyn ArticleExtractor>>,
}

impl GoogleNewsBuilder {
    /// Replace all HTTP settings at once
    pub fn http_settings(mut self, settings: HttpSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    /// Total timeout applied to every request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.settings.connect_timeout = timeout;
        self
    }

    /// Session-wide proxy for `scheme` (`http` or `https`)
    pub fn proxy(mut self, scheme: impl Into<String>, proxy_url: impl Into<String>) -> Self {
        self.proxies.push((scheme.into(), proxy_url.into()));
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn feed_base(mut self, base: impl Into<String>) -> Self {
        self.endpoints.feed_base = base.into();
        self
    }

    pub fn redirect_base(mut self, base: impl Into<String>) -> Self {
        self.endpoints.redirect_base = base.into();
        self
    }

    pub fn mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Drop ` - Publisher` from article titles
    pub fn strip_publisher_suffix(mut self, enabled: bool) -> Self {
        self.strip_publisher_suffix = enabled;
        self
    }

    /// Replace the default link resolver
    pub fn resolver(mut self, resolver: impl UrlResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Shared resolver handle, for callers that keep a reference to it
    pub fn shared_resolver(mut self, resolver: Arc<dyn UrlResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn extractor(mut self, extractor: impl ArticleExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub fn build(self) -> Result<GoogleNews, NewsError> {
        let mut settings = self.settings;
        for (scheme, url) in &self.proxies {
            let (scheme, url) = validate_proxy(scheme, url)?;
            settings.proxies.insert(scheme, url);
        }

        for base in [&self.endpoints.feed_base, &self.endpoints.redirect_base] {
            url::Url::parse(base).map_err(|e| {
                NewsError::invalid_config(format!("Invalid endpoint '{}': {}", base, e))
            })?;
        }

        let http = HttpClient::with_settings(settings)?;
        let (closed, _) = watch::channel(false);

        Ok(GoogleNews {
            http,
            endpoints: self.endpoints,
            resolver: self.resolver,
            extractor: self.extractor,
            mode: self.mode,
            strip_publisher_suffix: self.strip_publisher_suffix,
            closed,
        })
    }
}
