//! Core data models for queries and articles.

mod article;
pub mod locale;
mod query;

pub use article::{
    Article, FeedEntry, FullArticle, Publisher, QueryWarning, Resolution, ResolutionStatus,
    SearchResponse,
};
pub use query::{
    section_names, DateRange, DateWindow, Period, PeriodUnit, ProxyMap, QueryMode, SearchQuery,
    SearchQueryBuilder, Topic, TopicSelector,
};
