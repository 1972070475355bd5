use esg_score::config::ScoringConfig;
use esg_score::error::AppError;
use esg_score::scoring::{SasbWeightTable, ScoreAggregator};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the weight table once; a missing or malformed asset is fatal.
pub(crate) fn load_aggregator(config: &ScoringConfig) -> Result<ScoreAggregator, AppError> {
    let table = SasbWeightTable::from_path(&config.weights_path)?;
    info!(
        path = %config.weights_path.display(),
        topics = table.topic_count(),
        industries = table.industries().len(),
        policy = %config.unknown_category,
        "SASB weight table loaded"
    );

    Ok(ScoreAggregator::new(Arc::new(table)).with_policy(config.unknown_category))
}
