use super::coerce;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound of the raw disclosure quality scale.
pub const MAX_RAW_SCORE: f64 = 4.0;

/// SASB dimension a disclosure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EsgCategory {
    #[serde(rename = "E")]
    Environmental,
    #[serde(rename = "S")]
    Social,
    #[serde(rename = "G")]
    Governance,
}

impl EsgCategory {
    /// Normalizes a raw category cell (`" e "`, `"G"`) into a dimension.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "E" => Some(Self::Environmental),
            "S" => Some(Self::Social),
            "G" => Some(Self::Governance),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Environmental => "E",
            Self::Social => "S",
            Self::Governance => "G",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Environmental => "Environmental",
            Self::Social => "Social",
            Self::Governance => "Governance",
        }
    }

    pub const fn ordered() -> [Self; 3] {
        [Self::Environmental, Self::Social, Self::Governance]
    }
}

/// Controversy flag assigned during news and regulatory verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsciFlag {
    Green,
    Yellow,
    Orange,
    Red,
}

impl MsciFlag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Orange => "Orange",
            Self::Red => "Red",
        }
    }
}

impl FromStr for MsciFlag {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "orange" => Ok(Self::Orange),
            "red" => Ok(Self::Red),
            _ => Err(()),
        }
    }
}

/// One analysed disclosure for a (company, year, SASB topic) triple.
///
/// Deserialization is lenient: numeric fields accept numbers or numeric
/// strings and fall back to `0.0` for anything else, so a single dirty row
/// from the analysis pipeline never rejects a whole batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisclosureRecord {
    #[serde(
        default,
        alias = "ESG_category",
        alias = "esg_category",
        deserialize_with = "coerce::lenient_text"
    )]
    pub category: String,
    #[serde(
        default,
        alias = "SASB_topic",
        alias = "sasb_topic",
        deserialize_with = "coerce::lenient_text"
    )]
    pub topic: String,
    #[serde(default, deserialize_with = "coerce::lenient_score")]
    pub risk_score: f64,
    #[serde(default, deserialize_with = "coerce::lenient_score")]
    pub adjustment_score: f64,
    #[serde(
        default,
        alias = "disclosure_claim",
        deserialize_with = "coerce::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub report_claim: Option<String>,
    #[serde(
        default,
        deserialize_with = "coerce::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_number: Option<String>,
    #[serde(
        default,
        alias = "MSCI_flag",
        deserialize_with = "coerce::optional_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub msci_flag: Option<MsciFlag>,
    #[serde(
        default,
        deserialize_with = "coerce::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub consistency_status: Option<String>,
}

impl DisclosureRecord {
    pub fn new(
        category: impl Into<String>,
        topic: impl Into<String>,
        risk_score: f64,
        adjustment_score: f64,
    ) -> Self {
        Self {
            category: category.into(),
            topic: topic.into(),
            risk_score,
            adjustment_score,
            ..Self::default()
        }
    }

    /// `max(0, risk - adjustment)` after clamping both inputs into range.
    pub fn net_score(&self) -> f64 {
        let risk = sanitize(self.risk_score).min(MAX_RAW_SCORE);
        let adjustment = sanitize(self.adjustment_score);
        (risk - adjustment).max(0.0)
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Normalized percentage scores for one company.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(rename = "E")]
    pub environmental: f64,
    #[serde(rename = "S")]
    pub social: f64,
    #[serde(rename = "G")]
    pub governance: f64,
    #[serde(rename = "Total")]
    pub total: f64,
}

impl ScoreResult {
    pub fn category(&self, category: EsgCategory) -> f64 {
        match category {
            EsgCategory::Environmental => self.environmental,
            EsgCategory::Social => self.social,
            EsgCategory::Governance => self.governance,
        }
    }

    pub fn risk_levels(&self) -> RiskLevels {
        RiskLevels {
            environmental: RiskLevel::from_percentage(self.environmental),
            social: RiskLevel::from_percentage(self.social),
            governance: RiskLevel::from_percentage(self.governance),
            total: RiskLevel::from_percentage(self.total),
        }
    }
}

/// Dashboard banding of a score. Higher disclosure quality means lower risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Negligible,
}

impl RiskLevel {
    /// Bands a 0-100 percentage score.
    pub fn from_percentage(score: f64) -> Self {
        if score <= 25.0 {
            Self::High
        } else if score <= 50.0 {
            Self::Medium
        } else if score <= 75.0 {
            Self::Low
        } else {
            Self::Negligible
        }
    }

    /// Bands a single topic's 0-4 net score.
    pub fn from_net_score(score: f64) -> Self {
        if score >= 3.5 {
            Self::Negligible
        } else if score >= 2.5 {
            Self::Low
        } else if score >= 1.5 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Negligible => "Negligible",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskLevels {
    #[serde(rename = "E")]
    pub environmental: RiskLevel,
    #[serde(rename = "S")]
    pub social: RiskLevel,
    #[serde(rename = "G")]
    pub governance: RiskLevel,
    #[serde(rename = "Total")]
    pub total: RiskLevel,
}
