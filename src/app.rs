use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ResolvedConfig;
use crate::domain::{AppId, EnrichedRecord};
use crate::error::ReportError;
use crate::fetcher::{AppFetcher, FetchOutcome};
use crate::input::read_app_ids;
use crate::report::write_report;
use crate::steam::StoreClient;

/// Resolved records in input order. Apps whose metadata fetch failed are
/// simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<EnrichedRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EnrichedRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedApp {
    pub app_id: AppId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub results: ResultSet,
    pub skipped: Vec<SkippedApp>,
}

impl RunResult {
    /// Number of review summaries replaced by sentinel counts.
    pub fn review_fallbacks(&self) -> usize {
        self.results
            .records()
            .iter()
            .map(|record| {
                usize::from(record.target_reviews.is_fallback())
                    + usize::from(record.all_reviews.is_fallback())
            })
            .sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub input: String,
    pub output: String,
    pub requested: usize,
    pub resolved: usize,
    pub skipped: Vec<SkippedApp>,
    pub review_fallbacks: usize,
    pub target_language: String,
    pub ratio_policy: String,
    pub generated_at: String,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App<C: StoreClient> {
    client: C,
    config: ResolvedConfig,
}

impl<C: StoreClient> App<C> {
    pub fn new(client: C, config: ResolvedConfig) -> Self {
        Self { client, config }
    }

    /// Reads the id list, fetches every app, and writes the CSV once at the end.
    pub fn generate(&self, sink: &dyn ProgressSink) -> Result<ReportSummary, ReportError> {
        sink.event(ProgressEvent {
            message: format!("phase=Resolve; reading {}", self.config.input),
            elapsed: None,
        });
        let ids = read_app_ids(&self.config.input)?;
        info!(count = ids.len(), input = %self.config.input, "app ids loaded");

        let result = self.run(&ids, sink);
        if result.results.is_empty() && !ids.is_empty() {
            warn!(requested = ids.len(), "no app resolved, writing header-only report");
        }

        sink.event(ProgressEvent {
            message: format!("phase=Store; writing {}", self.config.output),
            elapsed: None,
        });
        write_report(
            &self.config.output,
            result.results.records(),
            &self.config.target_language,
            self.config.delimiter,
        )?;

        Ok(ReportSummary {
            input: self.config.input.to_string(),
            output: self.config.output.to_string(),
            requested: ids.len(),
            resolved: result.results.len(),
            review_fallbacks: result.review_fallbacks(),
            skipped: result.skipped,
            target_language: self.config.target_language.clone(),
            ratio_policy: self.config.ratio_policy.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Fetches each id strictly in order, one call at a time.
    pub fn run(&self, ids: &[AppId], sink: &dyn ProgressSink) -> RunResult {
        let fetcher = AppFetcher::new(
            &self.client,
            self.config.throttler(),
            &self.config.target_language,
            self.config.ratio_policy,
        );

        let mut results = ResultSet::new();
        let mut skipped = Vec::new();
        for (index, &app_id) in ids.iter().enumerate() {
            sink.event(ProgressEvent {
                message: format!("phase=Fetch; app {app_id} ({}/{})", index + 1, ids.len()),
                elapsed: None,
            });
            let start = Instant::now();
            match fetcher.fetch(app_id) {
                FetchOutcome::Resolved(record) => {
                    sink.event(ProgressEvent {
                        message: format!("resolved {app_id}: {}", record.metadata.title),
                        elapsed: Some(start.elapsed()),
                    });
                    results.push(record);
                }
                FetchOutcome::Skipped { app_id, reason } => {
                    sink.event(ProgressEvent {
                        message: format!("skipped {app_id}: {reason}"),
                        elapsed: Some(start.elapsed()),
                    });
                    skipped.push(SkippedApp { app_id, reason });
                }
            }
        }

        RunResult { results, skipped }
    }
}
