use super::aggregator::Weighed;
use super::domain::{DisclosureRecord, EsgCategory, MsciFlag, RiskLevel, ScoreResult};
use serde::Serialize;

/// Per-record audit line explaining how a disclosure moved the scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicContribution {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EsgCategory>,
    pub counts_toward_total: bool,
    pub weight: f64,
    pub net_score: f64,
    pub weighted_score: f64,
    pub max_possible: f64,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msci_flag: Option<MsciFlag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_claim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<String>,
}

impl TopicContribution {
    pub(crate) fn from_weighed(record: &DisclosureRecord, weighed: &Weighed) -> Self {
        Self {
            topic: record.topic.clone(),
            category: weighed.category,
            counts_toward_total: weighed.counts_toward_total,
            weight: weighed.weight,
            net_score: weighed.net_score,
            weighted_score: weighed.weighted_score,
            max_possible: weighed.max_possible,
            risk_level: RiskLevel::from_net_score(weighed.net_score),
            msci_flag: record.msci_flag,
            report_claim: record.report_claim.clone(),
            page_number: record.page_number.clone(),
        }
    }

    /// Excluded from every bucket, so it has no effect on any score.
    pub fn is_ignored(&self) -> bool {
        self.category.is_none() && !self.counts_toward_total
    }
}

/// Scores together with the contributions they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub scores: ScoreResult,
    pub topics: Vec<TopicContribution>,
}

impl ScoreBreakdown {
    pub fn topics_for(&self, category: EsgCategory) -> impl Iterator<Item = &TopicContribution> {
        self.topics
            .iter()
            .filter(move |topic| topic.category == Some(category))
    }

    pub fn ignored_count(&self) -> usize {
        self.topics.iter().filter(|topic| topic.is_ignored()).count()
    }
}
