use crate::domain::{RatioPolicy, Ratios, ReviewSummary};

/// Derives the three comparison ratios from a target-language and an
/// all-language summary.
///
/// Division is plain `f64` division: a zero total produces NaN or an infinity
/// and sentinel counts are divided like any other value. Under
/// [`RatioPolicy::MarkUnavailable`] a ratio that depends on a fallback summary
/// is left empty instead.
pub fn compute(target: &ReviewSummary, all: &ReviewSummary, policy: RatioPolicy) -> Ratios {
    Ratios {
        all_negative: usable(policy, &[all])
            .then(|| divide(all.total_negative, all.total_reviews)),
        target_negative: usable(policy, &[target])
            .then(|| divide(target.total_negative, target.total_reviews)),
        target_coverage: usable(policy, &[target, all])
            .then(|| divide(target.total_reviews, all.total_reviews)),
    }
}

fn usable(policy: RatioPolicy, inputs: &[&ReviewSummary]) -> bool {
    match policy {
        RatioPolicy::PassThrough => true,
        RatioPolicy::MarkUnavailable => inputs.iter().all(|summary| !summary.is_fallback()),
    }
}

fn divide(numerator: i64, denominator: i64) -> f64 {
    numerator as f64 / denominator as f64
}
