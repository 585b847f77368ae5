//! Entry cleanup and domain exclusion.

use tracing::debug;

use crate::models::FeedEntry;
use crate::utils::{html_to_text, strip_publisher_suffix};

/// A cleaned entry waiting for URL resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedEntry {
    pub title: String,
    pub description: String,
    pub published: String,
    pub link: String,
    pub publisher: crate::models::Publisher,
}

/// Cleans raw entries and drops the ones from excluded publishers
#[derive(Debug, Clone, Default)]
pub struct EntryProcessor {
    exclude: Vec<String>,
    strip_suffix: bool,
}

impl EntryProcessor {
    /// `exclude` holds normalized domains (lowercase, no scheme, no `www.`)
    pub fn new(exclude: &[String]) -> Self {
        Self {
            exclude: exclude.to_vec(),
            strip_suffix: false,
        }
    }

    /// Drop a trailing ` - Publisher` from titles
    pub fn strip_publisher_suffix(mut self, enabled: bool) -> Self {
        self.strip_suffix = enabled;
        self
    }

    /// Clean one entry. Returns `None` when the entry is excluded or has no link.
    pub fn process(&self, entry: FeedEntry) -> Option<ProcessedEntry> {
        let publisher = entry.source.unwrap_or_default();

        if self.is_excluded(&publisher.href) {
            debug!(publisher = %publisher.href, "Excluding entry");
            return None;
        }
        if entry.link.is_empty() {
            debug!(title = %entry.title, "Dropping entry without link");
            return None;
        }

        let title = if self.strip_suffix {
            strip_publisher_suffix(&entry.title, &publisher.title)
        } else {
            entry.title
        };

        Some(ProcessedEntry {
            title,
            description: html_to_text(&entry.description),
            published: entry.published,
            link: entry.link,
            publisher,
        })
    }

    /// Process a page of entries, returning the kept ones and the excluded count
    pub fn process_all(&self, entries: Vec<FeedEntry>) -> (Vec<ProcessedEntry>, usize) {
        let mut excluded = 0;
        let mut kept = Vec::with_capacity(entries.len());

        for entry in entries {
            let href = entry
                .source
                .as_ref()
                .map(|s| s.href.as_str())
                .unwrap_or_default();
            if self.is_excluded(href) {
                excluded += 1;
                continue;
            }
            if let Some(processed) = self.process(entry) {
                kept.push(processed);
            }
        }

        (kept, excluded)
    }

    /// Whether `href`'s host starts with an excluded domain, ignoring case and `www.`
    pub fn is_excluded(&self, href: &str) -> bool {
        if self.exclude.is_empty() || href.is_empty() {
            return false;
        }

        let host = source_host(href);
        self.exclude.iter().any(|domain| host.starts_with(domain.as_str()))
    }
}

fn source_host(href: &str) -> String {
    let host = match url::Url::parse(href) {
        Ok(url) => url.host_str().unwrap_or_default().to_lowercase(),
        Err(_) => {
            let lower = href.to_lowercase();
            let rest = lower
                .strip_prefix("https://")
                .or_else(|| lower.strip_prefix("http://"))
                .unwrap_or(&lower);
            rest.split(['/', '?', '#']).next().unwrap_or_default().to_string()
        }
    };

    host.strip_prefix("www.")
        .map(str::to_string)
        .unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Publisher;

    fn entry(title: &str, link: &str, publisher: &str, href: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            description: format!(
                "<a href=\"{}\">{}</a>&nbsp;&nbsp;<font>{}</font>",
                link, title, publisher
            ),
            published: "Mon, 04 Mar 2024 10:00:00 GMT".to_string(),
            link: link.to_string(),
            source: Some(Publisher::new(publisher, href)),
        }
    }

    #[test]
    fn test_process_cleans_description() {
        let processor = EntryProcessor::default();
        let processed = processor
            .process(entry(
                "Markets rally - Reuters",
                "https://example.com/a",
                "Reuters",
                "https://www.reuters.com",
            ))
            .unwrap();

        assert_eq!(processed.title, "Markets rally - Reuters");
        assert_eq!(processed.description, "Markets rally - Reuters  Reuters");
        assert_eq!(processed.publisher.title, "Reuters");
        assert_eq!(processed.link, "https://example.com/a");
    }

    #[test]
    fn test_strip_suffix_opt_in() {
        let processor = EntryProcessor::default().strip_publisher_suffix(true);
        let processed = processor
            .process(entry(
                "Markets rally - Reuters",
                "https://example.com/a",
                "Reuters",
                "https://www.reuters.com",
            ))
            .unwrap();
        assert_eq!(processed.title, "Markets rally");
    }

    #[test]
    fn test_exclusion_ignores_case_and_www() {
        let processor = EntryProcessor::new(&["cnn.com".to_string()]);
        assert!(processor.is_excluded("https://www.cnn.com"));
        assert!(processor.is_excluded("https://CNN.com/world"));
        assert!(processor.is_excluded("http://cnn.com"));
        assert!(!processor.is_excluded("https://edition.cnn.com"));
        assert!(!processor.is_excluded("https://www.reuters.com"));
        assert!(!processor.is_excluded(""));
    }

    #[test]
    fn test_process_all_counts_exclusions() {
        let processor = EntryProcessor::new(&["cnn.com".to_string()]);
        let entries = vec![
            entry("One", "https://a.example/1", "CNN", "https://www.cnn.com"),
            entry("Two", "https://b.example/2", "Reuters", "https://www.reuters.com"),
            entry("Three", "", "BBC", "https://www.bbc.co.uk"),
        ];

        let (kept, excluded) = processor.process_all(entries);
        assert_eq!(excluded, 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Two");
    }

    #[test]
    fn test_entry_without_source() {
        let processor = EntryProcessor::new(&["cnn.com".to_string()]);
        let raw = FeedEntry {
            title: "No source".to_string(),
            link: "https://example.com/x".to_string(),
            ..FeedEntry::default()
        };
        let processed = processor.process(raw).unwrap();
        assert_eq!(processed.publisher, Publisher::default());
    }
}
