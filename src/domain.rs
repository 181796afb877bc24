use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Count value substituted for every review field when a review fetch fails.
pub const SENTINEL: i64 = -1;

pub const ALL_LANGUAGES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppId(u32);

impl AppId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppId {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ReportError::InvalidAppId(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageScope {
    Target(String),
    All,
}

impl LanguageScope {
    pub fn token(&self) -> &str {
        match self {
            LanguageScope::Target(language) => language.as_str(),
            LanguageScope::All => ALL_LANGUAGES,
        }
    }
}

impl fmt::Display for LanguageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RatioPolicy {
    /// Divide whatever counts were obtained, sentinels included.
    #[default]
    PassThrough,
    /// Leave a ratio empty when one of its inputs is a fallback summary.
    MarkUnavailable,
}

impl fmt::Display for RatioPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioPolicy::PassThrough => write!(f, "pass-through"),
            RatioPolicy::MarkUnavailable => write!(f, "mark-unavailable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppMetadata {
    pub title: String,
    pub genres: Vec<String>,
    pub publishers: Vec<String>,
    pub supported_languages: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub total_reviews: i64,
    pub total_positive: i64,
    pub total_negative: i64,
    pub number_reviews: i64,
    pub review_score: i64,
    pub score_description: String,
}

impl ReviewSummary {
    pub fn fallback() -> Self {
        Self {
            total_reviews: SENTINEL,
            total_positive: SENTINEL,
            total_negative: SENTINEL,
            number_reviews: SENTINEL,
            review_score: SENTINEL,
            score_description: String::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ratios {
    pub all_negative: Option<f64>,
    pub target_negative: Option<f64>,
    pub target_coverage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub app_id: AppId,
    pub metadata: AppMetadata,
    pub target_reviews: ReviewSummary,
    pub all_reviews: ReviewSummary,
    pub ratios: Ratios,
}
