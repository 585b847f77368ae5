//! Default [`UrlResolver`] for feed links.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::client::Endpoints;
use super::{decoder, UrlResolver};
use crate::error::ResolveError;
use crate::models::Resolution;
use crate::utils::HttpClient;

/// Route markers preceding the identifier in obfuscated links
const ROUTE_MARKERS: [&str; 2] = ["articles", "read"];

/// How a feed link must be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlKind {
    /// Redirect-host link carrying an opaque identifier
    Obfuscated { id: String },
    /// Anything else; resolved by following its HTTP redirect
    Direct,
}

/// Resolves obfuscated links through the decode protocol and every other
/// link by following its redirect
#[derive(Debug, Clone)]
pub struct GoogleNewsResolver {
    http: HttpClient,
    redirect_base: String,
    rpc_path: String,
    redirect_host: Option<(String, Option<u16>)>,
}

impl GoogleNewsResolver {
    pub fn new(http: HttpClient, endpoints: &Endpoints) -> Self {
        let redirect_host = url::Url::parse(&endpoints.redirect_base)
            .ok()
            .and_then(|u| {
                u.host_str()
                    .map(|h| (h.to_lowercase(), u.port_or_known_default()))
            });

        Self {
            http,
            redirect_base: endpoints.redirect_base.clone(),
            rpc_path: endpoints.rpc_path.clone(),
            redirect_host,
        }
    }

    /// Decide whether `url` needs the decode protocol
    pub fn classify(&self, url: &str) -> UrlKind {
        let Ok(parsed) = url::Url::parse(url) else {
            return UrlKind::Direct;
        };
        let Some((host, port)) = &self.redirect_host else {
            return UrlKind::Direct;
        };

        let same_host = parsed
            .host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(host));
        if !same_host || parsed.port_or_known_default() != *port {
            return UrlKind::Direct;
        }

        let segments: Vec<&str> = match parsed.path_segments() {
            Some(segments) => segments.filter(|s| !s.is_empty()).collect(),
            None => return UrlKind::Direct,
        };

        match segments.as_slice() {
            [.., marker, id] if ROUTE_MARKERS.contains(marker) => UrlKind::Obfuscated {
                id: id.to_string(),
            },
            _ => UrlKind::Direct,
        }
    }

    async fn follow_redirect(&self, url: &str) -> Result<Resolution, ResolveError> {
        let response = self.http.no_redirect().head(url).send().await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    ResolveError::MalformedResponse(format!("{} without Location header", status))
                })?;
            let target = response
                .url()
                .join(location)
                .map_err(|e| ResolveError::MalformedResponse(format!("bad Location: {}", e)))?;
            return Ok(Resolution::redirect_followed(target.to_string()));
        }

        if status.is_success() {
            return Ok(Resolution::redirect_followed(response.url().to_string()));
        }

        if status == StatusCode::METHOD_NOT_ALLOWED {
            debug!(url = %url, "HEAD not allowed, retrying with GET");
            let response = self.http.get(url).send().await?;
            if response.status().is_success() {
                return Ok(Resolution::redirect_followed(response.url().to_string()));
            }
            return Err(ResolveError::Status(response.status().as_u16()));
        }

        Err(ResolveError::Status(status.as_u16()))
    }
}

#[async_trait]
impl UrlResolver for GoogleNewsResolver {
    fn id(&self) -> &str {
        "google_news"
    }

    async fn resolve(&self, url: &str) -> Result<Resolution, ResolveError> {
        match self.classify(url) {
            UrlKind::Obfuscated { id } => {
                debug!(url = %url, id = %id, "Decoding obfuscated link");
                let decoded =
                    decoder::decode(&self.http, &self.redirect_base, &self.rpc_path, &id).await?;
                Ok(Resolution::resolved(decoded))
            }
            UrlKind::Direct => self.follow_redirect(url).await,
        }
    }
}
