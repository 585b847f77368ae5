//! Decode protocol for obfuscated redirect links.
//!
//! An obfuscated link `https://news.google.com/rss/articles/<id>` is exchanged
//! for the publisher URL in two round trips:
//!
//! 1. GET the article page and scrape the signature (`data-n-a-sg`) and
//!    timestamp (`data-n-a-ts`) off the `c-wiz > div[jscontroller]` element
//! 2. POST a `garturlreq` call to the batch-execute RPC endpoint and read the
//!    URL out of the `garturlres` reply

use scraper::{Html, Selector};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ResolveError;
use crate::utils::HttpClient;

/// RPC method identifier for URL decoding
pub const RPC_METHOD: &str = "Fbv4je";

const PARAMS_SELECTOR: &str = "c-wiz > div[jscontroller]";
const SIGNATURE_ATTR: &str = "data-n-a-sg";
const TIMESTAMP_ATTR: &str = "data-n-a-ts";

/// Parameters scraped from the article page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeParams {
    pub id: String,
    pub signature: String,
    pub timestamp: i64,
}

/// Scrape decode parameters from an article page
pub fn parse_params(html: &str, id: &str) -> Result<DecodeParams, ResolveError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(PARAMS_SELECTOR)
        .map_err(|e| ResolveError::Other(format!("invalid selector: {}", e)))?;

    let element = document
        .select(&selector)
        .next()
        .ok_or(ResolveError::SignatureNotFound)?;

    let signature = element
        .value()
        .attr(SIGNATURE_ATTR)
        .ok_or(ResolveError::SignatureNotFound)?;
    let timestamp = element
        .value()
        .attr(TIMESTAMP_ATTR)
        .ok_or(ResolveError::SignatureNotFound)?
        .trim()
        .parse::<i64>()
        .map_err(|e| ResolveError::MalformedResponse(format!("timestamp: {}", e)))?;

    Ok(DecodeParams {
        id: id.to_string(),
        signature: signature.to_string(),
        timestamp,
    })
}

/// Build the `f.req` form value for a decode call
pub fn build_payload(params: &DecodeParams) -> String {
    let request = json!([
        "garturlreq",
        [
            ["X", "X", ["X", "X"], null, null, 1, 1, "US:en", null, 1, null, null, null, null, null, 0, 1],
            "X", "X", 1, [1, 1, 1], 1, 1, null, 0, 0, null, 0
        ],
        params.id,
        params.timestamp,
        params.signature
    ]);

    json!([[[RPC_METHOD, request.to_string()]]]).to_string()
}

/// Extract the decoded URL from a batch-execute reply.
///
/// The body starts with an anti-JSON prefix line followed by a blank line;
/// the payload at `[0][2]` is itself a JSON string whose element `[1]` is
/// the URL.
pub fn parse_rpc_response(body: &str) -> Result<String, ResolveError> {
    let chunk = body
        .split("\n\n")
        .nth(1)
        .ok_or_else(|| ResolveError::MalformedResponse("missing response envelope".to_string()))?;

    let envelope: Value = serde_json::from_str(chunk.trim())?;
    let inner = envelope
        .get(0)
        .and_then(|call| call.get(2))
        .and_then(Value::as_str)
        .ok_or_else(|| ResolveError::MalformedResponse("missing call payload".to_string()))?;

    let payload: Value = serde_json::from_str(inner)?;
    payload
        .get(1)
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ResolveError::MalformedResponse("missing decoded url".to_string()))
}

/// Fetch decode parameters, trying `/articles/<id>` then `/rss/articles/<id>`
pub(crate) async fn fetch_params(
    http: &HttpClient,
    redirect_base: &str,
    id: &str,
) -> Result<DecodeParams, ResolveError> {
    let base = redirect_base.trim_end_matches('/');
    let mut last_error = ResolveError::SignatureNotFound;

    for template in ["articles", "rss/articles"] {
        let url = format!("{}/{}/{}", base, template, id);
        match fetch_params_from(http, &url, id).await {
            Ok(params) => return Ok(params),
            Err(e) => {
                debug!(url = %url, error = %e, "Decode parameter fetch failed");
                last_error = e;
            }
        }
    }

    Err(last_error)
}

async fn fetch_params_from(
    http: &HttpClient,
    url: &str,
    id: &str,
) -> Result<DecodeParams, ResolveError> {
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ResolveError::Status(response.status().as_u16()));
    }
    let html = response.text().await?;
    parse_params(&html, id)
}

/// Run the full decode protocol for `id`
pub(crate) async fn decode(
    http: &HttpClient,
    redirect_base: &str,
    rpc_path: &str,
    id: &str,
) -> Result<String, ResolveError> {
    let params = fetch_params(http, redirect_base, id).await?;

    let rpc_url = format!("{}{}", redirect_base.trim_end_matches('/'), rpc_path);
    debug!(url = %rpc_url, id = %id, "Calling decode RPC");

    let response = http
        .post(&rpc_url)
        .form(&[("f.req", build_payload(&params))])
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(ResolveError::Status(response.status().as_u16()));
    }

    let body = response.text().await?;
    parse_rpc_response(&body)
}
