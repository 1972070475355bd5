//! SASB-weighted ESG scoring.
//!
//! Every disclosure contributes `net_score * W` to a numerator and `4 * W` to
//! a denominator, where `W` is the topic's materiality weight for the
//! company's industry. Each of E, S, G and Total is the resulting ratio as a
//! percentage rounded to one decimal place.

mod aggregator;
mod breakdown;
mod coerce;
pub mod domain;
pub mod router;
pub mod scorecard;
pub mod weights;

pub use aggregator::UnknownCategoryPolicy;
pub use breakdown::{ScoreBreakdown, TopicContribution};
pub use domain::{
    DisclosureRecord, EsgCategory, MsciFlag, RiskLevel, RiskLevels, ScoreResult, MAX_RAW_SCORE,
};
pub use router::scoring_router;
pub use scorecard::{CompanyProfile, CompanyScorecard};
pub use weights::{
    IndustryTopicWeight, SasbWeightTable, TopicWeights, WeightTableError, DEFAULT_WEIGHT,
};

use aggregator::{weigh, Accumulator};
use std::sync::Arc;

/// Pure scorer bound to a loaded weight table.
///
/// Cheap to clone and safe to share between request handlers; it never
/// mutates the table or the records it is given.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    weights: Arc<SasbWeightTable>,
    policy: UnknownCategoryPolicy,
}

impl ScoreAggregator {
    pub fn new(weights: Arc<SasbWeightTable>) -> Self {
        Self {
            weights,
            policy: UnknownCategoryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn weights(&self) -> &SasbWeightTable {
        &self.weights
    }

    pub fn policy(&self) -> UnknownCategoryPolicy {
        self.policy
    }

    /// Computes E, S, G and Total percentages for `industry`.
    ///
    /// Never fails: unknown topics or industries weigh 1.0, dirty numbers
    /// count as 0 and an empty batch scores 0 everywhere.
    pub fn compute_scores(&self, industry: &str, records: &[DisclosureRecord]) -> ScoreResult {
        let mut accumulator = Accumulator::default();
        for record in records {
            accumulator.record(&weigh(&self.weights, self.policy, industry, record));
        }
        accumulator.finish()
    }

    /// Same computation as [`Self::compute_scores`], keeping one
    /// [`TopicContribution`] per record.
    pub fn breakdown(&self, industry: &str, records: &[DisclosureRecord]) -> ScoreBreakdown {
        let mut accumulator = Accumulator::default();
        let topics = records
            .iter()
            .map(|record| {
                let weighed = weigh(&self.weights, self.policy, industry, record);
                accumulator.record(&weighed);
                TopicContribution::from_weighed(record, &weighed)
            })
            .collect();

        ScoreBreakdown {
            scores: accumulator.finish(),
            topics,
        }
    }
}
