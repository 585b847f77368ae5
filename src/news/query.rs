//! Feed request construction.
//!
//! Turns a [`SearchQuery`] into a request path (`/search?q=...`,
//! `/headlines/section/topic/WORLD?`, ...) followed by an optional time
//! filter and the locale fragment `&hl=<lang>&gl=<country>&ceid=<country>:<lang>`.

use crate::models::{DateWindow, QueryMode, QueryWarning, SearchQuery, TopicSelector};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A feed request ready to be appended to the feed base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub path: String,
    pub time_filter: String,
    pub locale: String,
    pub warnings: Vec<QueryWarning>,
}

impl FeedRequest {
    /// Time filter followed by the locale fragment
    pub fn suffix(&self) -> String {
        format!("{}{}", self.time_filter, self.locale)
    }

    /// Absolute request URL
    pub fn url(&self, base: &str) -> String {
        format!("{}{}{}", base.trim_end_matches('/'), self.path, self.suffix())
    }
}

/// Build the request for `query`.
///
/// When `window` is given (paginated keyword fetches) it replaces whatever
/// dates or period the caller set.
pub fn build_request(query: &SearchQuery, window: Option<DateWindow>) -> FeedRequest {
    let mut warnings = Vec::new();
    let path = request_path(query.mode());
    let time_filter = time_filter(query, window, &mut warnings);
    let locale = format!(
        "&hl={lang}&gl={country}&ceid={country}:{lang}",
        lang = urlencoding::encode(query.language()),
        country = urlencoding::encode(query.country())
    );

    FeedRequest {
        path,
        time_filter,
        locale,
        warnings,
    }
}

fn request_path(mode: &QueryMode) -> String {
    match mode {
        QueryMode::Keyword(keyword) => format!("/search?q={}", urlencoding::encode(keyword)),
        QueryMode::Site(domain) => {
            format!("/search?q={}", urlencoding::encode(&format!("site:{}", domain)))
        }
        QueryMode::TopNews => "?".to_string(),
        QueryMode::Topic(TopicSelector::Headline(topic)) => {
            format!("/headlines/section/topic/{}?", topic.as_str())
        }
        QueryMode::Topic(TopicSelector::Section { id, .. }) => format!("/topics/{}?", id),
        QueryMode::Location(location) => format!(
            "/headlines/section/geo/{}?",
            urlencoding::encode(location)
        ),
    }
}

fn time_filter(
    query: &SearchQuery,
    window: Option<DateWindow>,
    warnings: &mut Vec<QueryWarning>,
) -> String {
    if let Some(window) = window {
        return format!(
            "%20before%3A{}%20after%3A{}",
            window.end.format(DATE_FORMAT),
            window.start.format(DATE_FORMAT)
        );
    }

    if let Some(dates) = query.dates().filter(|d| !d.is_empty()) {
        if !query.mode().supports_date_range() {
            warnings.push(QueryWarning::DateRangeUnsupported {
                mode: query.mode().name().to_string(),
            });
            return String::new();
        }

        if let Some(period) = query.superseded_period() {
            warnings.push(QueryWarning::PeriodIgnored {
                period: period.to_string(),
            });
        }

        let mut filter = String::new();
        if let Some(end) = dates.end {
            filter.push_str(&format!("%20before%3A{}", end.format(DATE_FORMAT)));
        }
        if let Some(start) = dates.start {
            filter.push_str(&format!("%20after%3A{}", start.format(DATE_FORMAT)));
        }
        return filter;
    }

    match query.period() {
        Some(period) => format!("%20when%3A{}", period),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_keyword_request() {
        let query = SearchQuery::keyword("machine learning").build().unwrap();
        let request = build_request(&query, None);
        assert_eq!(request.path, "/search?q=machine%20learning");
        assert_eq!(request.suffix(), "&hl=en&gl=US&ceid=US:en");
        assert!(request.warnings.is_empty());
        assert_eq!(
            request.url("https://news.google.com/rss"),
            "https://news.google.com/rss/search?q=machine%20learning&hl=en&gl=US&ceid=US:en"
        );
    }

    #[test]
    fn test_mode_paths() {
        let top = SearchQuery::top_news().build().unwrap();
        assert_eq!(build_request(&top, None).path, "?");

        let topic = SearchQuery::topic("business").build().unwrap();
        assert_eq!(
            build_request(&topic, None).path,
            "/headlines/section/topic/BUSINESS?"
        );

        let section = SearchQuery::topic("POLITICS").build().unwrap();
        assert!(build_request(&section, None).path.starts_with("/topics/CAAq"));

        let location = SearchQuery::location("New York").build().unwrap();
        assert_eq!(
            build_request(&location, None).path,
            "/headlines/section/geo/New%20York?"
        );

        let site = SearchQuery::site("www.cnn.com").build().unwrap();
        assert_eq!(build_request(&site, None).path, "/search?q=site%3Acnn.com");
    }

    #[test]
    fn test_period_filter() {
        let query = SearchQuery::keyword("ai").period("7d").build().unwrap();
        let request = build_request(&query, None);
        assert_eq!(request.suffix(), "%20when%3A7d&hl=en&gl=US&ceid=US:en");
    }

    #[test]
    fn test_date_filter() {
        let query = SearchQuery::keyword("ai")
            .date_range(date(2024, 1, 1), date(2024, 2, 1))
            .build()
            .unwrap();
        let request = build_request(&query, None);
        assert_eq!(
            request.time_filter,
            "%20before%3A2024-02-01%20after%3A2024-01-01"
        );
        assert!(request.warnings.is_empty());
    }

    #[test]
    fn test_dates_override_period_with_warning() {
        let query = SearchQuery::keyword("ai")
            .period("7d")
            .start_date(date(2024, 1, 1))
            .build()
            .unwrap();
        let request = build_request(&query, None);
        assert_eq!(request.time_filter, "%20after%3A2024-01-01");
        assert_eq!(
            request.warnings,
            vec![QueryWarning::PeriodIgnored {
                period: "7d".to_string()
            }]
        );
    }

    #[test]
    fn test_dates_ignored_outside_keyword_mode() {
        let query = SearchQuery::topic("WORLD")
            .date_range(date(2024, 1, 1), date(2024, 2, 1))
            .build()
            .unwrap();
        let request = build_request(&query, None);
        assert_eq!(request.time_filter, "");
        assert_eq!(
            request.warnings,
            vec![QueryWarning::DateRangeUnsupported {
                mode: "topic".to_string()
            }]
        );
    }

    #[test]
    fn test_window_replaces_caller_filters() {
        let query = SearchQuery::keyword("ai").period("1d").build().unwrap();
        let window = DateWindow::ending_at(date(2024, 3, 8), 7);
        let request = build_request(&query, Some(window));
        assert_eq!(
            request.time_filter,
            "%20before%3A2024-03-08%20after%3A2024-03-01"
        );
        assert!(request.warnings.is_empty());
    }

    #[test]
    fn test_locale_fragment() {
        let query = SearchQuery::keyword("ai")
            .language("fr")
            .country("FR")
            .build()
            .unwrap();
        assert_eq!(build_request(&query, None).locale, "&hl=fr&gl=FR&ceid=FR:fr");
    }

    #[test]
    fn test_locale_fragment_is_encoded() {
        let query = SearchQuery::keyword("ai")
            .language("en&gl=XX")
            .country("U S")
            .build()
            .unwrap();
        assert_eq!(
            build_request(&query, None).locale,
            "&hl=en%26gl%3DXX&gl=U%20S&ceid=U%20S:en%26gl%3DXX"
        );
    }

    #[test]
    fn test_site_honours_dates() {
        let query = SearchQuery::site("reuters.com")
            .date_range(date(2024, 1, 1), date(2024, 2, 1))
            .build()
            .unwrap();
        let request = build_request(&query, None);
        assert_eq!(
            request.url("https://news.google.com/rss"),
            "https://news.google.com/rss/search?q=site%3Areuters.com\
             %20before%3A2024-02-01%20after%3A2024-01-01&hl=en&gl=US&ceid=US:en"
        );
        assert!(request.warnings.is_empty());
    }
}
