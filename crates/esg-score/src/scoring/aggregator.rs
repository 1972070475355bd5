use super::domain::{DisclosureRecord, EsgCategory, ScoreResult, MAX_RAW_SCORE};
use super::weights::SasbWeightTable;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How records whose category is not `E`, `S` or `G` are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCategoryPolicy {
    /// Contribute to neither the category buckets nor `Total`.
    #[default]
    Exclude,
    /// Historical dashboard behaviour: still counted in `Total`, and an empty
    /// category is scored as `E`. Whitespace-only values are not empty.
    Legacy,
}

impl UnknownCategoryPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exclude => "exclude",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for UnknownCategoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UnknownCategoryPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exclude" | "strict" => Ok(Self::Exclude),
            "legacy" | "include-total" => Ok(Self::Legacy),
            other => Err(format!(
                "unknown category policy '{other}' (expected 'exclude' or 'legacy')"
            )),
        }
    }
}

/// Weighted contribution of a single record before accumulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Weighed {
    pub(crate) category: Option<EsgCategory>,
    pub(crate) counts_toward_total: bool,
    pub(crate) weight: f64,
    pub(crate) net_score: f64,
    pub(crate) weighted_score: f64,
    pub(crate) max_possible: f64,
}

pub(crate) fn weigh(
    weights: &SasbWeightTable,
    policy: UnknownCategoryPolicy,
    industry: &str,
    record: &DisclosureRecord,
) -> Weighed {
    let (category, counts_toward_total) = match EsgCategory::parse(&record.category) {
        Some(category) => (Some(category), true),
        None => {
            debug!(
                category = %record.category,
                topic = %record.topic,
                %policy,
                "disclosure has an unrecognised ESG category"
            );
            match policy {
                UnknownCategoryPolicy::Exclude => (None, false),
                UnknownCategoryPolicy::Legacy if record.category.is_empty() => {
                    (Some(EsgCategory::Environmental), true)
                }
                UnknownCategoryPolicy::Legacy => (None, true),
            }
        }
    };

    let weight = weights.lookup_weight(&record.topic, industry);
    let net_score = record.net_score();

    Weighed {
        category,
        counts_toward_total,
        weight,
        net_score,
        weighted_score: net_score * weight,
        max_possible: MAX_RAW_SCORE * weight,
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    numerator: f64,
    denominator: f64,
}

impl Bucket {
    fn add(&mut self, weighed: &Weighed) {
        self.numerator += weighed.weighted_score;
        self.denominator += weighed.max_possible;
    }

    fn percentage(&self) -> f64 {
        if self.denominator > 0.0 {
            round_one_decimal(100.0 * self.numerator / self.denominator)
        } else {
            0.0
        }
    }
}

/// Running numerator/denominator pairs for E, S, G and Total.
#[derive(Debug, Default, Clone)]
pub(crate) struct Accumulator {
    environmental: Bucket,
    social: Bucket,
    governance: Bucket,
    total: Bucket,
}

impl Accumulator {
    pub(crate) fn record(&mut self, weighed: &Weighed) {
        match weighed.category {
            Some(EsgCategory::Environmental) => self.environmental.add(weighed),
            Some(EsgCategory::Social) => self.social.add(weighed),
            Some(EsgCategory::Governance) => self.governance.add(weighed),
            None => {}
        }

        if weighed.counts_toward_total {
            self.total.add(weighed);
        }
    }

    pub(crate) fn finish(&self) -> ScoreResult {
        ScoreResult {
            environmental: self.environmental.percentage(),
            social: self.social.percentage(),
            governance: self.governance.percentage(),
            total: self.total.percentage(),
        }
    }
}

/// Ties go to the even digit, so 81.25 reports as 81.2.
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
