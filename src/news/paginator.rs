//! Sliding-window pagination past the per-feed entry cap.
//!
//! A feed never returns more than [`PAGE_CAP`] entries. To collect more, the
//! paginator re-fetches with a 7-day window ending at the earliest published
//! date seen so far, until enough unique articles are accumulated, the feed
//! runs dry, or the earliest date stops moving backwards.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::fetcher::PUBLISHED_FORMAT;
use crate::error::NewsError;
use crate::models::{Article, DateWindow, SearchResponse};

/// Maximum entries a single feed request returns
pub const PAGE_CAP: usize = 100;

/// Width of each pagination window in days
pub const WINDOW_DAYS: i64 = 7;

/// One fetched and resolved page
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub articles: Vec<Article>,
    /// Entries in the feed before exclusion
    pub raw_count: usize,
    pub excluded: usize,
}

/// Something that can fetch one page for a given window
#[async_trait]
pub trait PageSource: Send + Sync {
    /// `None` means no date bound
    async fn fetch_page(&self, window: Option<DateWindow>) -> Result<Page, NewsError>;
}

/// Accumulated state of one paginated fetch
#[derive(Debug, Default)]
pub struct PaginationState {
    seen: HashSet<String>,
    articles: Vec<Article>,
    earliest: Option<NaiveDateTime>,
    window: Option<DateWindow>,
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add articles not seen before (by URL); returns how many were new
    pub fn absorb(&mut self, articles: Vec<Article>) -> usize {
        let mut added = 0;
        for article in articles {
            if !self.seen.insert(article.url.clone()) {
                continue;
            }
            if let Ok(published) =
                NaiveDateTime::parse_from_str(article.published_date.trim(), PUBLISHED_FORMAT)
            {
                self.earliest = Some(match self.earliest {
                    Some(current) => current.min(published),
                    None => published,
                });
            }
            self.articles.push(article);
            added += 1;
        }
        added
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Earliest published date among accumulated articles
    pub fn earliest(&self) -> Option<NaiveDateTime> {
        self.earliest
    }

    /// Window of the most recent fetch
    pub fn window(&self) -> Option<DateWindow> {
        self.window
    }

    fn into_articles(self, max: usize) -> Vec<Article> {
        let mut articles = self.articles;
        articles.truncate(max);
        articles
    }
}

/// Drives a [`PageSource`] over shrinking date windows
#[derive(Debug, Clone, Copy)]
pub struct SlidingWindowPaginator {
    max_results: usize,
}

impl SlidingWindowPaginator {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    /// Collect up to `max_results` unique articles.
    ///
    /// Terminates when enough articles are gathered, when a page comes back
    /// under the cap, or when the earliest date makes no progress.
    pub async fn run<S>(&self, source: &S) -> Result<SearchResponse, NewsError>
    where
        S: PageSource + ?Sized,
    {
        let mut state = PaginationState::new();
        let mut excluded = 0;
        let mut pages = 0;

        loop {
            let page = source.fetch_page(state.window).await?;
            pages += 1;
            excluded += page.excluded;

            let previous = state.earliest();
            let raw_count = page.raw_count;
            let added = state.absorb(page.articles);
            info!(
                page = pages,
                added,
                total = state.len(),
                raw_count,
                "Fetched page"
            );

            if state.len() >= self.max_results {
                break;
            }
            if raw_count < PAGE_CAP {
                debug!(raw_count, "Feed exhausted");
                break;
            }

            let Some(earliest) = state.earliest() else {
                debug!("No dated articles, stopping");
                break;
            };
            if previous.is_some_and(|previous| earliest >= previous) {
                debug!(%earliest, "Earliest date did not move, stopping");
                break;
            }

            state.window = Some(DateWindow::ending_at(earliest.date(), WINDOW_DAYS));
        }

        let mut response = SearchResponse::new(state.into_articles(self.max_results));
        response.excluded = excluded;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Publisher, ResolutionStatus};
    use chrono::{Duration, NaiveDate};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn article(url: &str, hours_back: i64) -> Article {
        let base = NaiveDate::from_ymd_opt(2024, 3, 30)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Article {
            title: url.to_string(),
            description: String::new(),
            published_date: (base - Duration::hours(hours_back))
                .format(PUBLISHED_FORMAT)
                .to_string(),
            url: url.to_string(),
            publisher: Publisher::default(),
            status: ResolutionStatus::RedirectFollowed,
        }
    }

    fn page(prefix: &str, count: usize, start_hours: i64) -> Page {
        Page {
            articles: (0..count)
                .map(|i| article(&format!("https://{}/{}", prefix, i), start_hours + i as i64))
                .collect(),
            raw_count: count,
            excluded: 0,
        }
    }

    /// Replays scripted pages and records requested windows.
    /// Once the script runs out, the last page repeats forever.
    struct ScriptedSource {
        pages: Mutex<VecDeque<Page>>,
        last: Mutex<Option<Page>>,
        windows: Mutex<Vec<Option<DateWindow>>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Page>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                last: Mutex::new(None),
                windows: Mutex::new(Vec::new()),
            }
        }

        fn windows(&self) -> Vec<Option<DateWindow>> {
            self.windows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn fetch_page(&self, window: Option<DateWindow>) -> Result<Page, NewsError> {
            self.windows.lock().unwrap().push(window);
            let next = self.pages.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            if let Some(page) = next {
                *last = Some(page);
            }
            Ok(last.clone().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_short_page_single_fetch() {
        let source = ScriptedSource::new(vec![page("a", 40, 0)]);
        let response = SlidingWindowPaginator::new(150).run(&source).await.unwrap();

        assert_eq!(response.len(), 40);
        assert_eq!(source.windows(), vec![None]);
    }

    #[tokio::test]
    async fn test_stops_without_progress() {
        // Feed keeps returning the same full page
        let source = ScriptedSource::new(vec![page("a", 100, 0)]);
        let response = SlidingWindowPaginator::new(500).run(&source).await.unwrap();

        assert_eq!(response.len(), 100);
        assert_eq!(source.windows().len(), 2);
    }

    #[tokio::test]
    async fn test_accumulates_and_truncates() {
        let source = ScriptedSource::new(vec![
            page("a", 100, 0),
            page("b", 100, 200),
            page("c", 100, 400),
        ]);
        let response = SlidingWindowPaginator::new(250).run(&source).await.unwrap();

        assert_eq!(response.len(), 250);
        assert_eq!(source.windows().len(), 3);

        let unique: HashSet<_> = response.articles.iter().map(|a| &a.url).collect();
        assert_eq!(unique.len(), 250);
    }

    #[tokio::test]
    async fn test_windows_move_backwards() {
        let source = ScriptedSource::new(vec![
            page("a", 100, 0),
            page("b", 100, 300),
            page("c", 100, 600),
            page("d", 10, 900),
        ]);
        let response = SlidingWindowPaginator::new(1000).run(&source).await.unwrap();
        assert_eq!(response.len(), 310);

        let windows: Vec<DateWindow> = source.windows().into_iter().flatten().collect();
        assert_eq!(windows.len(), 3);
        for pair in windows.windows(2) {
            assert!(pair[1].start <= pair[0].start);
            assert!(pair[1].end <= pair[0].end);
        }
        for window in &windows {
            assert_eq!(window.end - window.start, Duration::days(WINDOW_DAYS));
        }
    }

    #[tokio::test]
    async fn test_duplicates_only_page_stops() {
        let mut overlap = page("a", 100, 0);
        // Same URLs with older dates must not count as progress
        for (i, entry) in overlap.articles.iter_mut().enumerate() {
            entry.published_date = article("x", 1000 + i as i64).published_date;
        }
        let source = ScriptedSource::new(vec![page("a", 100, 0), overlap]);
        let response = SlidingWindowPaginator::new(300).run(&source).await.unwrap();

        assert_eq!(response.len(), 100);
        assert_eq!(source.windows().len(), 2);
    }

    #[test]
    fn test_state_tracks_earliest() {
        let mut state = PaginationState::new();
        assert_eq!(state.absorb(vec![article("u1", 5), article("u2", 10)]), 2);
        assert_eq!(state.absorb(vec![article("u1", 50)]), 0);
        assert_eq!(state.len(), 2);
        assert_eq!(
            state.earliest().unwrap(),
            NaiveDateTime::parse_from_str("Sat, 30 Mar 2024 02:00:00 GMT", PUBLISHED_FORMAT)
                .unwrap()
        );
    }
}
