//! Feed download and parsing.

use serde::Deserialize;
use tracing::debug;

use crate::error::NewsError;
use crate::models::{FeedEntry, Publisher};
use crate::utils::HttpClient;

/// Format used for published dates, matching what RSS feeds emit
pub(crate) const PUBLISHED_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
    #[serde(default)]
    description: String,
    source: Option<Source>,
}

#[derive(Debug, Deserialize)]
struct Source {
    #[serde(rename = "@url", default)]
    url: String,
    #[serde(rename = "$text", default)]
    title: String,
}

impl From<Item> for FeedEntry {
    fn from(item: Item) -> Self {
        FeedEntry {
            title: item.title.trim().to_string(),
            description: item.description,
            published: item.pub_date.trim().to_string(),
            link: item.link.trim().to_string(),
            source: item
                .source
                .map(|s| Publisher::new(s.title.trim(), s.url.trim())),
        }
    }
}

/// Downloads a feed and turns it into raw entries
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    http: HttpClient,
}

impl FeedFetcher {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// GET `url` and parse the body.
    ///
    /// HTTP 429 maps to [`NewsError::RateLimited`]; every other failure
    /// (transport, status, unparsable body) maps to a network failure.
    /// No retry is attempted.
    pub async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, NewsError> {
        debug!(url = %url, "Fetching feed");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NewsError::RateLimited);
        }
        if !status.is_success() {
            return Err(NewsError::network(format!(
                "feed endpoint returned status {}",
                status
            )));
        }

        let body = response.text().await?;
        let entries = parse_feed(&body)?;
        debug!(url = %url, count = entries.len(), "Parsed feed");
        Ok(entries)
    }
}

/// Parse an RSS 2.0 document, falling back to Atom.
///
/// A document with no items is valid and yields an empty list.
pub fn parse_feed(body: &str) -> Result<Vec<FeedEntry>, NewsError> {
    match quick_xml::de::from_str::<Rss>(body) {
        Ok(rss) => Ok(rss.channel.items.into_iter().map(FeedEntry::from).collect()),
        Err(rss_err) => match feed_rs::parser::parse(body.as_bytes()) {
            Ok(feed) => Ok(feed.entries.into_iter().map(atom_entry).collect()),
            Err(atom_err) => {
                debug!(error = %atom_err, "Atom fallback failed");
                Err(rss_err.into())
            }
        },
    }
}

fn atom_entry(entry: feed_rs::model::Entry) -> FeedEntry {
    let published = entry
        .published
        .or(entry.updated)
        .map(|date| date.format(PUBLISHED_FORMAT).to_string())
        .unwrap_or_default();

    FeedEntry {
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        description: entry.summary.map(|s| s.content).unwrap_or_default(),
        published,
        link: entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default(),
        source: None,
    }
}
