use super::breakdown::TopicContribution;
use super::domain::{DisclosureRecord, RiskLevel, RiskLevels};
use super::ScoreAggregator;
use serde::{Deserialize, Serialize};

/// Identity of a company report being scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Report identifier, conventionally `{year}{stock_id}` (e.g. `20242330`).
    #[serde(default, alias = "ESG_id")]
    pub id: Option<String>,
    #[serde(alias = "company_name")]
    pub name: String,
    #[serde(alias = "stockId", alias = "company_code")]
    pub stock_id: String,
    pub industry: String,
    #[serde(alias = "Report_year")]
    pub year: u16,
    #[serde(default, alias = "URL")]
    pub url: Option<String>,
}

impl CompanyProfile {
    pub fn report_id(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}{}", self.year, self.stock_id))
    }
}

/// Dashboard card for one company and reporting year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyScorecard {
    pub id: String,
    pub name: String,
    pub stock_id: String,
    pub industry: String,
    pub year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub greenwashing_score: f64,
    pub e_score: f64,
    pub s_score: f64,
    pub g_score: f64,
    pub risk_level: RiskLevel,
    pub risk_levels: RiskLevels,
    pub topics: Vec<TopicContribution>,
}

impl CompanyScorecard {
    pub fn build(
        profile: CompanyProfile,
        aggregator: &ScoreAggregator,
        records: &[DisclosureRecord],
    ) -> Self {
        let breakdown = aggregator.breakdown(&profile.industry, records);
        let scores = breakdown.scores;
        let risk_levels = scores.risk_levels();
        let id = profile.report_id();

        Self {
            id,
            name: profile.name,
            stock_id: profile.stock_id,
            industry: profile.industry,
            year: profile.year,
            url: profile.url,
            greenwashing_score: scores.total,
            e_score: scores.environmental,
            s_score: scores.social,
            g_score: scores.governance,
            risk_level: risk_levels.total,
            risk_levels,
            topics: breakdown.topics,
        }
    }
}
