use tracing::{info, warn};

use crate::domain::{AppId, EnrichedRecord, LanguageScope, RatioPolicy, ReviewSummary};
use crate::ratio;
use crate::steam::StoreClient;
use crate::throttle::Throttler;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Resolved(EnrichedRecord),
    /// Metadata could not be fetched; the app is left out of the report.
    Skipped { app_id: AppId, reason: String },
}

/// Runs the paced call sequence for one app id at a time.
pub struct AppFetcher<'a, C: StoreClient> {
    client: &'a C,
    throttler: Throttler,
    target: LanguageScope,
    policy: RatioPolicy,
}

impl<'a, C: StoreClient> AppFetcher<'a, C> {
    pub fn new(
        client: &'a C,
        throttler: Throttler,
        target_language: &str,
        policy: RatioPolicy,
    ) -> Self {
        Self {
            client,
            throttler,
            target: LanguageScope::Target(target_language.to_string()),
            policy,
        }
    }

    pub fn fetch(&self, app_id: AppId) -> FetchOutcome {
        self.throttler.wait_turn();
        info!(%app_id, "fetching metadata");
        let metadata = match self.client.fetch_metadata(app_id) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(%app_id, error = %err, "metadata fetch failed, skipping app");
                self.throttler.cool_down();
                return FetchOutcome::Skipped {
                    app_id,
                    reason: err.to_string(),
                };
            }
        };

        self.throttler.wait_turn();
        let target_reviews = self.reviews_or_fallback(app_id, &self.target);
        info!(%app_id, title = %metadata.title, scope = %self.target, "review stage done");

        let all = LanguageScope::All;
        self.throttler.wait_turn();
        let all_reviews = self.reviews_or_fallback(app_id, &all);
        info!(%app_id, title = %metadata.title, scope = %all, "review stage done");

        let ratios = ratio::compute(&target_reviews, &all_reviews, self.policy);
        FetchOutcome::Resolved(EnrichedRecord {
            app_id,
            metadata,
            target_reviews,
            all_reviews,
            ratios,
        })
    }

    fn reviews_or_fallback(&self, app_id: AppId, scope: &LanguageScope) -> ReviewSummary {
        match self.client.fetch_review_summary(app_id, scope) {
            Ok(summary) => summary,
            Err(err) => {
                warn!(
                    %app_id,
                    %scope,
                    error = %err,
                    "review fetch failed, substituting sentinel counts"
                );
                self.throttler.cool_down();
                ReviewSummary::fallback()
            }
        }
    }
}
