//! Search query model.
//!
//! A [`SearchQuery`] is built once, validated at construction and then only
//! read. Exactly one [`QueryMode`] selects which feed is requested.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::NewsError;
use crate::models::locale::{country_code, language_code};
use crate::utils::{normalize_exclude_domain, parse_period, validate_proxy};

/// Proxy URLs keyed by the scheme of the request they apply to (`http`, `https`)
pub type ProxyMap = BTreeMap<String, String>;

/// Headline sections served under `/headlines/section/topic/<TOPIC>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Topic {
    World,
    Nation,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::World,
        Topic::Nation,
        Topic::Business,
        Topic::Technology,
        Topic::Entertainment,
        Topic::Sports,
        Topic::Science,
        Topic::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::World => "WORLD",
            Topic::Nation => "NATION",
            Topic::Business => "BUSINESS",
            Topic::Technology => "TECHNOLOGY",
            Topic::Entertainment => "ENTERTAINMENT",
            Topic::Sports => "SPORTS",
            Topic::Science => "SCIENCE",
            Topic::Health => "HEALTH",
        }
    }

    pub fn from_name(name: &str) -> Option<Topic> {
        let upper = name.trim().to_uppercase();
        Topic::ALL.into_iter().find(|t| t.as_str() == upper)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finer-grained sections served under `/topics/<id>`
const SECTIONS: &[(&str, &str)] = &[
    ("POLITICS", "CAAqIQgKIhtDQkFTRGdvSUwyMHZNRFZ4ZERBU0FtVnVLQUFQAQ"),
    ("ECONOMY", "CAAqIggKIhxDQkFTRHdvSkwyMHZNR2RtY0hNekVnSmxiaWdBUAE"),
    ("CELEBRITIES", "CAAqIQgKIhtDQkFTRGdvSUwyMHZNREZ5Wm5vU0FtVnVLQUFQAQ"),
    ("MOVIES", "CAAqIQgKIhtDQkFTRGdvSUwyMHZNREoyZUc0U0FtVnVLQUFQAQ"),
    ("MUSIC", "CAAqIQgKIhtDQkFTRGdvSUwyMHZNRFJ5YkdZU0FtVnVLQUFQAQ"),
    (
        "ARTIFICIAL INTELLIGENCE",
        "CAAqIAgKIhpDQkFTRFFvSEwyMHZNRzFyZWhJQ1pXNG9BQVAB",
    ),
    ("SPACE", "CAAqIggKIhxDQkFTRHdvSkwyMHZNREU0TXpOM0VnSmxiaWdBUAE"),
    ("SOCCER", "CAAqIQgKIhtDQkFTRGdvSUwyMHZNREoyZURRU0FtVnVLQUFQAQ"),
    ("BASKETBALL", "CAAqIQgKIhtDQkFTRGdvSUwyMHZNREU0ZHpnU0FtVnVLQUFQAQ"),
    (
        "CRYPTOCURRENCY",
        "CAAqJAgKIh5DQkFTRUFvS0wyMHZNSFp3YWpSZlloSUNaVzRvQUFQAQ",
    ),
    ("CLIMATE CHANGE", "CAAqIggKIhxDQkFTRHdvSkwyMHZNR1F3TmpOMkVnSmxiaWdBUAE"),
    ("MENTAL HEALTH", "CAAqIggKIhxDQkFTRHdvSkwyMHZNRE40TmpsbkVnSmxiaWdBUAE"),
    ("CYBERSECURITY", "CAAqIggKIhxDQkFTRHdvSkwyMHZNRGQ1YURodUVnSmxiaWdBUAE"),
];

/// Names of the extended sections
pub fn section_names() -> impl Iterator<Item = &'static str> {
    SECTIONS.iter().map(|(name, _)| *name)
}

/// A headline topic or an extended section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicSelector {
    Headline(Topic),
    Section { name: String, id: String },
}

impl TopicSelector {
    /// Resolve a topic name (case-insensitive; `_` and spaces are interchangeable)
    pub fn parse(name: &str) -> Result<Self, NewsError> {
        if let Some(topic) = Topic::from_name(name) {
            return Ok(TopicSelector::Headline(topic));
        }

        let folded = name.trim().replace('_', " ").to_uppercase();
        if let Some((section, id)) = SECTIONS.iter().find(|(section, _)| *section == folded) {
            return Ok(TopicSelector::Section {
                name: (*section).to_string(),
                id: (*id).to_string(),
            });
        }

        let valid: Vec<&str> = Topic::ALL
            .iter()
            .map(|t| t.as_str())
            .chain(section_names())
            .collect();
        Err(NewsError::invalid_config(format!(
            "Invalid topic '{}'. Must be one of {}",
            name,
            valid.join(", ")
        )))
    }

    pub fn name(&self) -> &str {
        match self {
            TopicSelector::Headline(topic) => topic.as_str(),
            TopicSelector::Section { name, .. } => name,
        }
    }
}

/// Which feed a query requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    Keyword(String),
    Topic(TopicSelector),
    Location(String),
    Site(String),
    TopNews,
}

impl QueryMode {
    pub fn name(&self) -> &'static str {
        match self {
            QueryMode::Keyword(_) => "keyword",
            QueryMode::Topic(_) => "topic",
            QueryMode::Location(_) => "location",
            QueryMode::Site(_) => "site",
            QueryMode::TopNews => "top news",
        }
    }

    /// Search-backed modes (keyword and `site:`) honour `before:`/`after:`
    /// filters, and so can be paginated by date window
    pub fn supports_date_range(&self) -> bool {
        matches!(self, QueryMode::Keyword(_) | QueryMode::Site(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodUnit {
    Hour,
    Day,
    Month,
}

/// Relative time filter such as `7d`, `12h` or `6m`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub amount: u32,
    pub unit: PeriodUnit,
}

impl Period {
    pub fn parse(period: &str) -> Result<Self, NewsError> {
        let (amount, unit) = parse_period(period)?;
        let unit = match unit {
            'h' => PeriodUnit::Hour,
            'm' => PeriodUnit::Month,
            _ => PeriodUnit::Day,
        };
        Ok(Self { amount, unit })
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = match self.unit {
            PeriodUnit::Hour => 'h',
            PeriodUnit::Day => 'd',
            PeriodUnit::Month => 'm',
        };
        write!(f, "{}{}", self.amount, unit)
    }
}

/// Caller-supplied absolute date bounds (either side optional)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Fixed `[start, end]` window used by the paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window of `days` ending at `end`
    pub fn ending_at(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }
}

impl From<DateWindow> for DateRange {
    fn from(window: DateWindow) -> Self {
        DateRange {
            start: Some(window.start),
            end: Some(window.end),
        }
    }
}

/// A validated search request
#[derive(Debug, Clone)]
pub struct SearchQuery {
    mode: QueryMode,
    language: String,
    country: String,
    period: Option<Period>,
    dates: Option<DateRange>,
    superseded_period: Option<Period>,
    exclude_websites: Vec<String>,
    max_results: usize,
    proxy: ProxyMap,
}

impl SearchQuery {
    /// Search the feed for a keyword
    pub fn keyword(keyword: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder::new(RawMode::Keyword(keyword.into()))
    }

    /// Headlines for a topic or extended section
    pub fn topic(topic: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder::new(RawMode::Topic(topic.into()))
    }

    /// Headlines for a geographic location
    pub fn location(location: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder::new(RawMode::Location(location.into()))
    }

    /// Articles from a single site
    pub fn site(domain: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder::new(RawMode::Site(domain.into()))
    }

    /// Top stories
    pub fn top_news() -> SearchQueryBuilder {
        SearchQueryBuilder::new(RawMode::TopNews)
    }

    pub fn mode(&self) -> &QueryMode {
        &self.mode
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn dates(&self) -> Option<DateRange> {
        self.dates
    }

    /// A period that was replaced by dates while building
    pub fn superseded_period(&self) -> Option<Period> {
        self.superseded_period
    }

    /// Normalized excluded hosts
    pub fn exclude_websites(&self) -> &[String] {
        &self.exclude_websites
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn proxy(&self) -> &ProxyMap {
        &self.proxy
    }

    /// Whether any time filter (dates or period) was requested
    pub fn has_time_filter(&self) -> bool {
        self.period.is_some() || self.dates.is_some_and(|d| !d.is_empty())
    }

    /// Copy of this query with period and dates cleared
    pub fn without_time_filter(&self) -> SearchQuery {
        SearchQuery {
            period: None,
            dates: None,
            superseded_period: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone)]
enum RawMode {
    Keyword(String),
    Topic(String),
    Location(String),
    Site(String),
    TopNews,
}

/// Builder for [`SearchQuery`]; all validation happens in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    mode: RawMode,
    language: String,
    country: String,
    period: Option<String>,
    superseded_period: Option<String>,
    dates: DateRange,
    exclude_websites: Vec<String>,
    max_results: usize,
    proxy: Vec<(String, String)>,
}

impl SearchQueryBuilder {
    fn new(mode: RawMode) -> Self {
        Self {
            mode,
            language: "en".to_string(),
            country: "US".to_string(),
            period: None,
            superseded_period: None,
            dates: DateRange::default(),
            exclude_websites: Vec::new(),
            max_results: 100,
            proxy: Vec::new(),
        }
    }

    /// Language code or name ("en", "english")
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Country code or name ("US", "United States")
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Relative period (`7d`, `12h`, `6m`); clears any start/end date
    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self.superseded_period = None;
        self.dates = DateRange::default();
        self
    }

    /// Start date; clears any period
    pub fn start_date(mut self, start: NaiveDate) -> Self {
        self.dates.start = Some(start);
        self.supersede_period();
        self
    }

    /// End date; clears any period
    pub fn end_date(mut self, end: NaiveDate) -> Self {
        self.dates.end = Some(end);
        self.supersede_period();
        self
    }

    /// Both bounds at once; clears any period
    pub fn date_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date(start).end_date(end)
    }

    pub fn exclude_website(mut self, domain: impl Into<String>) -> Self {
        self.exclude_websites.push(domain.into());
        self
    }

    pub fn exclude_websites<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_websites
            .extend(domains.into_iter().map(Into::into));
        self
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Route requests with the given scheme through a proxy
    pub fn proxy(mut self, scheme: impl Into<String>, proxy_url: impl Into<String>) -> Self {
        self.proxy.push((scheme.into(), proxy_url.into()));
        self
    }

    fn supersede_period(&mut self) {
        if let Some(period) = self.period.take() {
            self.superseded_period = Some(period);
        }
    }

    /// Validate and produce the query
    pub fn build(self) -> Result<SearchQuery, NewsError> {
        if self.max_results == 0 {
            return Err(NewsError::invalid_config(
                "max_results must be a positive integer",
            ));
        }

        let mode = match self.mode {
            RawMode::Keyword(keyword) => {
                let keyword = keyword.trim();
                if keyword.is_empty() {
                    return Err(NewsError::invalid_config("Search key cannot be empty"));
                }
                QueryMode::Keyword(keyword.to_string())
            }
            RawMode::Topic(topic) => QueryMode::Topic(TopicSelector::parse(&topic)?),
            RawMode::Location(location) => {
                let location = location.trim();
                if location.is_empty() {
                    return Err(NewsError::invalid_config("Location cannot be empty"));
                }
                QueryMode::Location(location.to_string())
            }
            RawMode::Site(site) => {
                if site.trim().is_empty() {
                    return Err(NewsError::invalid_config("Site domain cannot be empty"));
                }
                QueryMode::Site(normalize_exclude_domain(&site)?)
            }
            RawMode::TopNews => QueryMode::TopNews,
        };

        let period = self.period.as_deref().map(Period::parse).transpose()?;
        let superseded_period = self
            .superseded_period
            .as_deref()
            .map(Period::parse)
            .transpose()?;

        if let (Some(start), Some(end)) = (self.dates.start, self.dates.end) {
            if end <= start {
                return Err(NewsError::invalid_config(format!(
                    "End date ({}) must be after start date ({})",
                    end, start
                )));
            }
        }
        let dates = (!self.dates.is_empty()).then_some(self.dates);

        let exclude_websites = self
            .exclude_websites
            .iter()
            .map(|domain| normalize_exclude_domain(domain))
            .collect::<Result<Vec<_>, _>>()?;

        let proxy = self
            .proxy
            .iter()
            .map(|(scheme, url)| validate_proxy(scheme, url))
            .collect::<Result<ProxyMap, _>>()?;

        Ok(SearchQuery {
            mode,
            language: language_code(&self.language),
            country: country_code(&self.country),
            period,
            dates,
            superseded_period,
            exclude_websites,
            max_results: self.max_results,
            proxy,
        })
    }
}
