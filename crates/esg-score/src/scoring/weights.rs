use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Weight applied when a topic, or the industry within a topic, is not listed.
pub const DEFAULT_WEIGHT: f64 = 1.0;

const TOPIC_KEY: &str = "議題";
const DIMENSION_KEY: &str = "面向";

#[derive(Debug, thiserror::Error)]
pub enum WeightTableError {
    #[error("unable to read SASB weight table {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("SASB weight table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("SASB weight table defines no topics")]
    Empty,
    #[error("invalid weight {value} for topic '{topic}' in industry '{industry}'")]
    InvalidWeight {
        topic: String,
        industry: String,
        value: String,
    },
}

/// Materiality weights of one SASB topic, keyed by industry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicWeights {
    pub dimension: Option<String>,
    pub industries: BTreeMap<String, f64>,
}

/// One row of the by-industry view of the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryTopicWeight {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    pub weight: f64,
}

/// Immutable topic -> industry -> weight table.
///
/// Loaded once at startup and shared read-only (usually behind an `Arc`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SasbWeightTable {
    topics: BTreeMap<String, TopicWeights>,
}

impl SasbWeightTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WeightTableError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| WeightTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Parses the weight asset: an array of objects carrying a `議題` topic,
    /// an optional `面向` dimension and one numeric entry per industry.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, WeightTableError> {
        let rows: Vec<Map<String, Value>> = serde_json::from_reader(reader)?;
        let mut topics = BTreeMap::new();

        for row in rows {
            let Some(topic) = row
                .get(TOPIC_KEY)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|topic| !topic.is_empty())
            else {
                debug!("skipping SASB weight row without a topic");
                continue;
            };

            let weights = parse_topic_row(topic, &row)?;
            topics.insert(topic.to_string(), weights);
        }

        if topics.is_empty() {
            return Err(WeightTableError::Empty);
        }

        Ok(Self { topics })
    }

    /// Builds a table from `(topic, industry, weight)` triples.
    pub fn from_entries<I, T, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, N, f64)>,
        T: Into<String>,
        N: Into<String>,
    {
        let mut topics: BTreeMap<String, TopicWeights> = BTreeMap::new();
        for (topic, industry, weight) in entries {
            topics
                .entry(topic.into())
                .or_default()
                .industries
                .insert(industry.into(), weight);
        }
        Self { topics }
    }

    /// Two-level lookup: topic first, then industry within the topic.
    /// Either miss yields [`DEFAULT_WEIGHT`].
    pub fn lookup_weight(&self, topic: &str, industry: &str) -> f64 {
        self.topics
            .get(topic)
            .and_then(|weights| weights.industries.get(industry))
            .copied()
            .unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn topic(&self, topic: &str) -> Option<&TopicWeights> {
        self.topics.get(topic)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn industries(&self) -> BTreeSet<&str> {
        self.topics
            .values()
            .flat_map(|weights| weights.industries.keys().map(String::as_str))
            .collect()
    }

    /// Every topic weight defined for `industry`, in topic order.
    /// Empty when the industry appears under no topic.
    pub fn industry_weights(&self, industry: &str) -> Vec<IndustryTopicWeight> {
        self.topics
            .iter()
            .filter_map(|(topic, weights)| {
                weights
                    .industries
                    .get(industry)
                    .map(|weight| IndustryTopicWeight {
                        topic: topic.clone(),
                        dimension: weights.dimension.clone(),
                        weight: *weight,
                    })
            })
            .collect()
    }
}

fn parse_topic_row(topic: &str, row: &Map<String, Value>) -> Result<TopicWeights, WeightTableError> {
    let dimension = row
        .get(DIMENSION_KEY)
        .and_then(Value::as_str)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let mut industries = BTreeMap::new();
    for (key, value) in row {
        if key == TOPIC_KEY || key == DIMENSION_KEY {
            continue;
        }

        let weight = match value {
            Value::Number(_) => value.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };

        match weight {
            Some(weight) if weight.is_finite() && weight >= 0.0 => {
                industries.insert(key.clone(), weight);
            }
            Some(_) => {
                return Err(WeightTableError::InvalidWeight {
                    topic: topic.to_string(),
                    industry: key.clone(),
                    value: value.to_string(),
                });
            }
            None => {
                debug!(topic, column = %key, "ignoring non-numeric SASB weight column");
            }
        }
    }

    Ok(TopicWeights {
        dimension,
        industries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"面向": "環境", "議題": "溫室氣體排放", "半導體業": 2, "水泥工業": 2, "金融保險業": 1},
        {"面向": "社會", "議題": "員工健康與安全", "半導體業": 1, "水泥工業": "2"},
        {"面向": "治理", "議題": "商業道德", "金融保險業": 2.0, "備註": "SASB 2023"},
        {"面向": "環境"}
    ]"#;

    #[test]
    fn parses_topics_and_industries() {
        let table = SasbWeightTable::from_reader(SAMPLE.as_bytes()).expect("table loads");
        assert_eq!(table.topic_count(), 3);
        assert_eq!(table.lookup_weight("溫室氣體排放", "半導體業"), 2.0);
        assert_eq!(table.lookup_weight("員工健康與安全", "水泥工業"), 2.0);
        assert_eq!(
            table.topic("商業道德").and_then(|t| t.dimension.as_deref()),
            Some("治理")
        );
    }

    #[test]
    fn lookup_defaults_to_one_for_unknown_topic_or_industry() {
        let table = SasbWeightTable::from_reader(SAMPLE.as_bytes()).expect("table loads");
        assert_eq!(table.lookup_weight("生物多樣性", "半導體業"), DEFAULT_WEIGHT);
        assert_eq!(table.lookup_weight("商業道德", "半導體業"), DEFAULT_WEIGHT);
    }

    #[test]
    fn non_numeric_columns_are_not_industries() {
        let table = SasbWeightTable::from_reader(SAMPLE.as_bytes()).expect("table loads");
        assert!(!table.industries().contains("備註"));
        assert_eq!(
            table.industries().into_iter().collect::<Vec<_>>(),
            vec!["半導體業", "水泥工業", "金融保險業"]
        );
    }

    #[test]
    fn industry_view_lists_topic_weights() {
        let table = SasbWeightTable::from_reader(SAMPLE.as_bytes()).expect("table loads");
        let weights = table.industry_weights("金融保險業");
        assert_eq!(weights.len(), 2);
        assert!(weights
            .iter()
            .any(|entry| entry.topic == "商業道德" && entry.weight == 2.0));
        assert!(table.industry_weights("航運業").is_empty());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            SasbWeightTable::from_reader("{\"議題\": 1}".as_bytes()),
            Err(WeightTableError::Json(_))
        ));
        assert!(matches!(
            SasbWeightTable::from_reader("[{\"議題\": ".as_bytes()),
            Err(WeightTableError::Json(_))
        ));
        assert!(matches!(
            SasbWeightTable::from_reader("[]".as_bytes()),
            Err(WeightTableError::Empty)
        ));
    }

    #[test]
    fn rejects_negative_weights() {
        let error = SasbWeightTable::from_reader(
            r#"[{"議題": "能源管理", "半導體業": -1}]"#.as_bytes(),
        )
        .expect_err("negative weight rejected");
        match error {
            WeightTableError::InvalidWeight { topic, industry, .. } => {
                assert_eq!(topic, "能源管理");
                assert_eq!(industry, "半導體業");
            }
            other => panic!("expected invalid weight, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let error = SasbWeightTable::from_path("./does-not-exist.json")
            .expect_err("missing file is an error");
        match error {
            WeightTableError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("./does-not-exist.json"))
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
