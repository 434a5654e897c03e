use crate::infra::{AppState, DecisionDocument};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::extract::rejection::JsonRejection;
use axum::Extension;
use axum::Json;
use decision_matrix::decisions::{
    decision_router, evaluate, DecisionRepository, DecisionService, Envelope, EvaluationResult,
    WeightPolicy,
};
use decision_matrix::error::AppError;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_decision_routes<R>(service: Arc<DecisionService<R>>) -> axum::Router
where
    R: DecisionRepository + 'static,
{
    let policy = *service.policy();

    decision_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/evaluate",
            axum::routing::post(
                move |payload: Result<Json<DecisionDocument>, JsonRejection>| {
                    inline_evaluate_endpoint(policy, payload)
                },
            ),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Evaluate a posted decision document without storing it.
pub(crate) async fn inline_evaluate_endpoint(
    policy: WeightPolicy,
    payload: Result<Json<DecisionDocument>, JsonRejection>,
) -> Result<Json<Envelope<EvaluationResult>>, AppError> {
    let Json(document) = payload?;
    let decision = document.into_decision(policy)?;
    Ok(Json(Envelope::ok(evaluate(&decision))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryDecisionRepository;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn document() -> DecisionDocument {
        serde_json::from_value(json!({
            "title": "Pick a laptop",
            "criteria": [
                { "id": "c1", "name": "Cost", "weight": 0.6 },
                { "id": "c2", "name": "Quality", "weight": 0.4 }
            ],
            "options": [
                { "id": "o1", "name": "A", "scores": { "c1": 8, "c2": 5 } },
                { "id": "o2", "name": "B", "scores": { "c1": 3, "c2": 9 } }
            ]
        }))
        .expect("document parses")
    }

    #[tokio::test]
    async fn inline_evaluate_endpoint_ranks_document() {
        let Json(envelope) =
            inline_evaluate_endpoint(WeightPolicy::default(), Ok(Json(document())))
                .await
                .expect("evaluation runs");
        let result = envelope.data;

        assert!(envelope.success);
        assert_eq!(result.ranked_options.len(), 2);
        assert_eq!(result.ranked_options[0].option.name, "A");
        assert!(result.explanation.contains("It beat B by 1.40 points."));
    }

    #[tokio::test]
    async fn inline_evaluate_endpoint_rejects_out_of_range_scores() {
        let mut document = document();
        document.options[0].scores.set("c1".into(), 42.0);

        let response = inline_evaluate_endpoint(WeightPolicy::default(), Ok(Json(document)))
            .await
            .expect_err("score out of range")
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn health_route_is_mounted_next_to_decision_routes() {
        let service = Arc::new(DecisionService::new(
            Arc::new(InMemoryDecisionRepository::default()),
            WeightPolicy::default(),
        ));
        let router = with_decision_routes(service);

        let response = router
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn inline_evaluate_route_wraps_results_and_rejections() {
        let service = Arc::new(DecisionService::new(
            Arc::new(InMemoryDecisionRepository::default()),
            WeightPolicy::default(),
        ));
        let router = with_decision_routes(service);

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/evaluate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "title": "Pick a laptop",
                            "criteria": [{ "id": "c1", "name": "Cost", "weight": 1.0 }],
                            "options": [{ "id": "o1", "name": "A", "scores": { "c1": 8 } }]
                        })
                        .to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["ranked_options"][0]["name"], "A");

        let response = router
            .oneshot(
                Request::post("/api/evaluate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"title":"x"}"#))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json(response).await;
        assert_eq!(body["success"], false);
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }
}
