use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::breakdown::TopicContribution;
use super::domain::{DisclosureRecord, RiskLevels, ScoreResult};
use super::scorecard::{CompanyProfile, CompanyScorecard};
use super::weights::IndustryTopicWeight;
use super::ScoreAggregator;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub industry: String,
    #[serde(default)]
    pub records: Vec<DisclosureRecord>,
    #[serde(default)]
    pub include_breakdown: bool,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub industry: String,
    pub scores: ScoreResult,
    pub risk_levels: RiskLevels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<TopicContribution>>,
}

#[derive(Debug, Deserialize)]
pub struct ScorecardRequest {
    pub company: CompanyProfile,
    #[serde(default)]
    pub records: Vec<DisclosureRecord>,
}

#[derive(Debug, Serialize)]
pub struct IndustryWeightsResponse {
    pub industry: String,
    pub weights: Vec<IndustryTopicWeight>,
}

/// Router exposing the aggregator over HTTP.
pub fn scoring_router(aggregator: Arc<ScoreAggregator>) -> Router {
    Router::new()
        .route("/api/v1/esg/scores", post(score_handler))
        .route("/api/v1/esg/scorecard", post(scorecard_handler))
        .route("/api/v1/sasb/industries", get(industries_handler))
        .route(
            "/api/v1/sasb/industries/:industry/weights",
            get(industry_weights_handler),
        )
        .with_state(aggregator)
}

pub(crate) async fn score_handler(
    State(aggregator): State<Arc<ScoreAggregator>>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, AppError> {
    let Json(request) = payload?;
    let ScoreRequest {
        industry,
        records,
        include_breakdown,
    } = request;

    debug!(%industry, records = records.len(), "scoring disclosure batch");

    let (scores, topics) = if include_breakdown {
        let breakdown = aggregator.breakdown(&industry, &records);
        (breakdown.scores, Some(breakdown.topics))
    } else {
        (aggregator.compute_scores(&industry, &records), None)
    };

    Ok(Json(ScoreResponse {
        industry,
        risk_levels: scores.risk_levels(),
        scores,
        topics,
    }))
}

pub(crate) async fn scorecard_handler(
    State(aggregator): State<Arc<ScoreAggregator>>,
    payload: Result<Json<ScorecardRequest>, JsonRejection>,
) -> Result<Json<CompanyScorecard>, AppError> {
    let Json(ScorecardRequest { company, records }) = payload?;
    Ok(Json(CompanyScorecard::build(company, &aggregator, &records)))
}

pub(crate) async fn industries_handler(
    State(aggregator): State<Arc<ScoreAggregator>>,
) -> Json<serde_json::Value> {
    let industries: Vec<&str> = aggregator.weights().industries().into_iter().collect();
    Json(json!({
        "topics": aggregator.weights().topic_count(),
        "industries": industries,
    }))
}

pub(crate) async fn industry_weights_handler(
    State(aggregator): State<Arc<ScoreAggregator>>,
    Path(industry): Path<String>,
) -> Result<Json<IndustryWeightsResponse>, AppError> {
    let weights = aggregator.weights().industry_weights(&industry);
    if weights.is_empty() {
        return Err(AppError::UnknownIndustry(industry));
    }

    Ok(Json(IndustryWeightsResponse { industry, weights }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SasbWeightTable;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::{IntoResponse, Response};
    use serde_json::Value;
    use tower::ServiceExt;

    fn aggregator() -> Arc<ScoreAggregator> {
        Arc::new(ScoreAggregator::new(Arc::new(SasbWeightTable::from_entries([
            ("溫室氣體排放", "半導體業", 2.0),
            ("商業道德", "金融保險業", 2.0),
        ]))))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn score_handler_returns_scores_without_topics_by_default() {
        let request = ScoreRequest {
            industry: "半導體業".to_string(),
            records: vec![DisclosureRecord::new("E", "溫室氣體排放", 3.0, 0.5)],
            include_breakdown: false,
        };

        let Json(body) = score_handler(State(aggregator()), Ok(Json(request)))
            .await
            .expect("scores computed");

        assert_eq!(body.scores.environmental, 62.5);
        assert_eq!(body.scores.total, 62.5);
        assert!(body.topics.is_none());
    }

    #[tokio::test]
    async fn score_route_accepts_dashboard_rows() {
        let payload = json!({
            "industry": "半導體業",
            "include_breakdown": true,
            "records": [
                {"ESG_category": "E", "SASB_topic": "溫室氣體排放", "risk_score": "3", "adjustment_score": 0.5},
                {"ESG_category": "s", "SASB_topic": "員工健康與安全", "risk_score": 4, "adjustment_score": null}
            ]
        });

        let response = scoring_router(aggregator())
            .oneshot(
                Request::post("/api/v1/esg/scores")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["scores"]["E"], 62.5);
        assert_eq!(body["scores"]["S"], 100.0);
        assert_eq!(body["scores"]["G"], 0.0);
        assert_eq!(body["scores"]["Total"], 75.0);
        assert_eq!(body["risk_levels"]["Total"], "low");
        assert_eq!(body["topics"].as_array().map(Vec::len), Some(2));
    }

    async fn post_json(uri: &str, body: String) -> Response {
        scoring_router(aggregator())
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .expect("request builds"),
            )
            .await
            .expect("router responds")
    }

    #[tokio::test]
    async fn score_route_rejects_wrongly_shaped_records_with_bad_request() {
        let payload = json!({"industry": "半導體業", "records": {"category": "E"}});

        let response = post_json("/api/v1/esg/scores", payload.to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let message = body["error"].as_str().expect("error message");
        assert!(message.starts_with("invalid request body"));
    }

    #[tokio::test]
    async fn score_route_requires_an_industry() {
        let payload = json!({"records": []});

        let response = post_json("/api/v1/esg/scores", payload.to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn scorecard_route_rejects_malformed_json() {
        let response = post_json("/api/v1/esg/scorecard", "{\"company\": ".to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn scorecard_route_builds_dashboard_card() {
        let payload = json!({
            "company": {"name": "國泰金", "stock_id": "2882", "industry": "金融保險業", "year": 2024},
            "records": [{"category": "G", "topic": "商業道德", "risk_score": 2, "adjustment_score": 1}]
        });

        let response = scoring_router(aggregator())
            .oneshot(
                Request::post("/api/v1/esg/scorecard")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], "20242882");
        assert_eq!(body["gScore"], 25.0);
        assert_eq!(body["greenwashingScore"], 25.0);
        assert_eq!(body["riskLevel"], "high");
    }

    #[tokio::test]
    async fn industry_weights_route_lists_topics() {
        let response = scoring_router(aggregator())
            .oneshot(
                // 金融保險業
                Request::get("/api/v1/sasb/industries/%E9%87%91%E8%9E%8D%E4%BF%9D%E9%9A%AA%E6%A5%AD/weights")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["weights"][0]["topic"], "商業道德");
        assert_eq!(body["weights"][0]["weight"], 2.0);
    }

    #[tokio::test]
    async fn industry_weights_handler_returns_not_found_for_unknown_industry() {
        let error = industry_weights_handler(State(aggregator()), Path("航運業".to_string()))
            .await
            .expect_err("unknown industry");
        assert!(matches!(error, AppError::UnknownIndustry(ref name) if name == "航運業"));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn industries_handler_lists_every_industry() {
        let Json(body) = industries_handler(State(aggregator())).await;
        assert_eq!(body["topics"], 2);
        assert_eq!(body["industries"], json!(["半導體業", "金融保險業"]));
    }
}
