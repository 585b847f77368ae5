//! HTTP session shared by every component.
//!
//! One [`HttpClient`] is created per engine and cloned freely; clones share
//! the same connection pools. Timeouts and proxies are fixed at construction
//! and apply uniformly to every request type.

use reqwest::{redirect, Client, Proxy, RequestBuilder};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::NewsError;
use crate::models::ProxyMap;

/// Descriptive user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (+news feed resolver)"
);

/// Session-wide HTTP settings
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub proxies: ProxyMap,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            proxies: ProxyMap::new(),
        }
    }
}

/// Shared HTTP client pair: one follows redirects, one never does
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    no_redirect: Arc<Client>,
    settings: Arc<HttpSettings>,
}

impl HttpClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self, NewsError> {
        Self::with_settings(HttpSettings::default())
    }

    /// Create a client with a custom user agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, NewsError> {
        Self::with_settings(HttpSettings {
            user_agent: user_agent.to_string(),
            ..HttpSettings::default()
        })
    }

    pub fn with_settings(settings: HttpSettings) -> Result<Self, NewsError> {
        let client = build_client(&settings, redirect::Policy::default())?;
        let no_redirect = build_client(&settings, redirect::Policy::none())?;

        Ok(Self {
            client: Arc::new(client),
            no_redirect: Arc::new(no_redirect),
            settings: Arc::new(settings),
        })
    }

    /// Derive a session with the same settings and `proxies` layered over
    /// the session's own proxies (per scheme)
    pub fn with_proxies(&self, proxies: &ProxyMap) -> Result<Self, NewsError> {
        let mut settings = (*self.settings).clone();
        settings
            .proxies
            .extend(proxies.iter().map(|(scheme, url)| (scheme.clone(), url.clone())));
        Self::with_settings(settings)
    }

    /// Client that follows redirects
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Client that returns 3xx responses as-is
    pub fn no_redirect(&self) -> &Client {
        &self.no_redirect
    }

    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }
}

fn build_client(settings: &HttpSettings, policy: redirect::Policy) -> Result<Client, NewsError> {
    let mut builder = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .connect_timeout(settings.connect_timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .redirect(policy);

    if !settings.proxies.is_empty() {
        let proxies = settings
            .proxies
            .iter()
            .map(|(scheme, proxy)| {
                url::Url::parse(proxy)
                    .map(|url| (scheme.clone(), url))
                    .map_err(|e| {
                        NewsError::invalid_config(format!("Invalid proxy URL '{}': {}", proxy, e))
                    })
            })
            .collect::<Result<BTreeMap<String, url::Url>, _>>()?;

        builder = builder.proxy(Proxy::custom(move |url| {
            proxies.get(url.scheme()).cloned()
        }));
    }

    builder
        .build()
        .map_err(|e| NewsError::network_with("failed to create HTTP client", e))
}
