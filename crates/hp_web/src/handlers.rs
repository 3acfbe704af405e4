use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::Html,
    Json,
};
use std::sync::Arc;
use hp_core::{HealthResponse, PredictionResponse, Regressor, Result};
use hp_inference::FeatureMap;
use tracing::{error, info};
use crate::{error::ApiError, AppState};

const INDEX_HTML: &str = include_str!("../templates/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> std::result::Result<Json<PredictionResponse>, ApiError> {
    let body = body.map_err(|rejection| {
        error!("Error during prediction: {}", rejection.body_text().escape_debug());
        ApiError::Body(rejection)
    })?;

    match run_prediction(state.model.as_ref(), &body) {
        Ok(predicted_price) => {
            info!("Prediction successful: {}", predicted_price);
            Ok(Json(PredictionResponse { predicted_price }))
        }
        Err(e) => {
            // request-derived text is escaped so every event stays on one line
            error!(
                "Error during prediction: {} (model: {}, payload: {:?})",
                e.report().escape_debug(),
                state.model.name(),
                String::from_utf8_lossy(&body)
            );
            Err(ApiError::Prediction(e))
        }
    }
}

fn run_prediction(model: &dyn Regressor, body: &[u8]) -> Result<f64> {
    let features = match FeatureMap::from_slice(body) {
        Ok(features) => features,
        Err(e) => {
            info!("Received request data: {:?}", String::from_utf8_lossy(body));
            return Err(e);
        }
    };
    info!("Received request data: {}", features);

    let vector = features.to_vector(model)?;
    model.predict(&vector)
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let model = state.model.as_ref();
    Json(HealthResponse {
        status: "ok".to_string(),
        model: model.name().to_string(),
        n_features: model.n_features(),
        feature_names: model.feature_names().map(<[String]>::to_vec),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use chrono::NaiveDateTime;
    use hp_core::logging::{LineFormat, RotatingFileWriter, TIMESTAMP_FORMAT};
    use hp_inference::models::LinearRegressor;
    use serde_json::Value;
    use std::path::Path;
    use tower::ServiceExt;
    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::layer::SubscriberExt;
    use crate::{create_app, MAX_BODY_BYTES};

    fn schema_app() -> Router {
        let model = LinearRegressor::new(
            vec![20000.0, 1000.0],
            50000.0,
            Some(vec!["rooms".to_string(), "area".to_string()]),
        )
        .unwrap();
        create_app(AppState::new(Arc::new(model)))
    }

    fn positional_app() -> Router {
        let model = LinearRegressor::new(vec![20000.0, 1000.0], 50000.0, None).unwrap();
        create_app(AppState::new(Arc::new(model)))
    }

    async fn post_predict(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn error_message(body: &Value) -> &str {
        body["error"].as_str().unwrap()
    }

    /// Route this thread's events through the file layer used in production.
    fn log_to_file(path: &Path) -> DefaultGuard {
        let layer = tracing_subscriber::fmt::layer()
            .event_format(LineFormat)
            .with_writer(RotatingFileWriter::new(path, 0, 3).unwrap())
            .with_ansi(false);
        tracing::subscriber::set_default(tracing_subscriber::registry().with(layer))
    }

    fn assert_every_line_is_an_event(contents: &str) {
        for line in contents.lines() {
            let timestamp = line.get(..23).unwrap_or(line);
            assert!(
                NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_ok(),
                "log line without a timestamp: {:?}",
                line
            );
        }
    }

    #[tokio::test]
    async fn test_index_returns_html() {
        let response = schema_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("<form"));
    }

    #[tokio::test]
    async fn test_predict_returns_price() {
        let (status, body) = post_predict(schema_app(), r#"{"rooms": 3, "area": 85}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_price"].as_f64(), Some(195000.0));
    }

    #[tokio::test]
    async fn test_identical_requests_are_deterministic() {
        let app = positional_app();
        let (_, first) = post_predict(app.clone(), r#"{"rooms": 4, "area": 120.5}"#).await;
        let (_, second) = post_predict(app, r#"{"rooms": 4, "area": 120.5}"#).await;
        assert!(first["predicted_price"].is_number());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_body_is_bad_request() {
        let (status, body) = post_predict(schema_app(), "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "Invalid input: request body is empty");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, body) = post_predict(schema_app(), r#"{"rooms": 3,"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).starts_with("Serialization error"));
    }

    #[tokio::test]
    async fn test_wrong_feature_count_is_bad_request() {
        let (status, body) =
            post_predict(positional_app(), r#"{"rooms": 3, "area": 85, "age": 12}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "Expected 2 features, got 3");
    }

    #[tokio::test]
    async fn test_wrong_type_is_bad_request() {
        let (status, body) = post_predict(schema_app(), r#"{"rooms": "3", "area": 85}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "Feature 'rooms' is not a finite number");
    }

    #[tokio::test]
    async fn test_schema_violations_are_bad_request() {
        let (status, body) = post_predict(schema_app(), r#"{"rooms": 3}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "Missing feature: area");

        let (status, body) =
            post_predict(schema_app(), r#"{"rooms": 3, "area": 85, "garage": 1}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "Unknown feature: garage");
    }

    #[tokio::test]
    async fn test_model_failure_is_server_error() {
        let model = LinearRegressor::new(vec![f64::MAX], 0.0, None).unwrap();
        let app = create_app(AppState::new(Arc::new(model)));
        let (status, body) = post_predict(app, r#"{"size": 1e10}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error_message(&body).starts_with("Inference error"));
    }

    #[tokio::test]
    async fn test_health_describes_model() {
        let response = schema_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.model, "linear");
        assert_eq!(health.n_features, 2);
        assert_eq!(
            health.feature_names,
            Some(vec!["rooms".to_string(), "area".to_string()])
        );
    }

    #[tokio::test]
    async fn test_requests_predictions_and_errors_are_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let _guard = log_to_file(&path);

        let (status, _) = post_predict(schema_app(), r#"{"rooms": 3, "area": 85}"#).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = post_predict(schema_app(), r#"{"rooms": 3}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_every_line_is_an_event(&contents);
        assert!(contents
            .lines()
            .any(|l| l.ends_with(r#" INFO: Received request data: {"rooms":3,"area":85}"#)));
        assert!(contents
            .lines()
            .any(|l| l.ends_with(" INFO: Prediction successful: 195000")));
        assert!(contents
            .lines()
            .any(|l| l.contains(" ERROR: Error during prediction: Missing feature: area")));
    }

    #[tokio::test]
    async fn test_multi_line_bodies_cannot_forge_log_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let _guard = log_to_file(&path);

        let (status, body) = post_predict(schema_app(), "{\"rooms\": 3,\n\"area\": 85}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_price"].as_f64(), Some(195000.0));

        let forged = "{\"rooms\": 3,\n\"area\": 85}\n2099-01-01 00:00:00,000 ERROR: forged entry";
        let (status, _) = post_predict(schema_app(), forged).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_predict(schema_app(), "{\"rooms\": 3, \"area\\n2099\": 85}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_every_line_is_an_event(&contents);
        assert!(!contents.lines().any(|l| l.starts_with("2099")));
        assert!(contents.contains("forged entry"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_json_error() {
        let body = format!(r#"{{"rooms": 3, "area": 85, "note": "{}"}}"#, "x".repeat(MAX_BODY_BYTES));
        let (status, body) = post_predict(schema_app(), body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(!error_message(&body).is_empty());
    }
}
