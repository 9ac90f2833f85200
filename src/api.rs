//! Prediction service REST API routes (warp-based).

use std::convert::Infallible;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

use crate::store::ModelStore;

/// Human-readable service name reported by the capability descriptor.
pub const SERVICE_NAME: &str = "Sentra Sentiment Analysis API";

/// Maximum characters of request text echoed into the log.
const LOG_PREVIEW_CHARS: usize = 50;

/// Rejected predict requests, in validation order. The first failing check
/// decides the message returned to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictRequestError {
    /// The request did not declare a JSON body.
    #[error("Content-Type must be application/json")]
    UnsupportedContentType,
    /// The body did not parse as JSON.
    #[error("request body must be valid JSON")]
    MalformedBody,
    /// The body parsed but has no `text` key.
    #[error("'text' field is required")]
    MissingText,
    /// The `text` value is not a string, or is blank after trimming.
    #[error("text must be a non-empty string")]
    EmptyText,
}

/// Build all service routes: `GET /`, `GET /health`, `POST /api/predict`.
pub fn routes(
    store: Arc<ModelStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let home = warp::path::end().and(warp::get()).map(handle_home);

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(store.clone()))
        .map(handle_health);

    let predict = warp::path("api")
        .and(warp::path("predict"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::bytes())
        .and(with_store(store))
        .and_then(handle_predict);

    home.or(health).or(predict)
}

fn with_store(
    store: Arc<ModelStore>,
) -> impl Filter<Extract = (Arc<ModelStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn handle_home() -> warp::reply::Json {
    warp::reply::json(&serde_json::json!({
        "status": "online",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "predict": "/api/predict (POST)",
        },
    }))
}

fn handle_health(store: Arc<ModelStore>) -> warp::reply::Json {
    warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "model_loaded": store.is_ready(),
    }))
}

async fn handle_predict(
    content_type: Option<String>,
    body: Bytes,
    store: Arc<ModelStore>,
) -> Result<warp::reply::Response, Infallible> {
    let text = match validate_predict_request(content_type.as_deref(), &body) {
        Ok(text) => text,
        Err(err) => {
            return Ok(error_response(StatusCode::BAD_REQUEST, &err.to_string()));
        }
    };

    let preview: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    tracing::info!("Processing text: {preview}...");

    match store.predict(&text) {
        Ok(result) => {
            let resp = serde_json::json!({
                "success": true,
                "input": text,
                "result": result,
            });
            Ok(warp::reply::with_status(warp::reply::json(&resp), StatusCode::OK).into_response())
        }
        Err(err) => {
            tracing::error!("Prediction failed: {err}");
            let resp = serde_json::json!({
                "success": false,
                "error": err.to_string(),
            });
            Ok(warp::reply::with_status(
                warp::reply::json(&resp),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response())
        }
    }
}

/// Validate a predict request and extract its text.
///
/// Checks run in a fixed order: content type, JSON syntax, `text` presence,
/// then string/non-emptiness.
fn validate_predict_request(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<String, PredictRequestError> {
    let declares_json = content_type
        .map(|value| value.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);
    if !declares_json {
        return Err(PredictRequestError::UnsupportedContentType);
    }

    let parsed: Value =
        serde_json::from_slice(body).map_err(|_| PredictRequestError::MalformedBody)?;
    let text = match &parsed {
        Value::Object(map) => map.get("text").ok_or(PredictRequestError::MissingText)?,
        _ => return Err(PredictRequestError::MissingText),
    };
    match text.as_str() {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(PredictRequestError::EmptyText),
    }
}

fn error_response(status: StatusCode, message: &str) -> warp::reply::Response {
    let body = serde_json::json!({ "error": message });
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json");

    #[test]
    fn content_type_is_checked_first() {
        // The body is also invalid; the content type error must win.
        let err = validate_predict_request(Some("text/plain"), b"not json").unwrap_err();
        assert_eq!(err, PredictRequestError::UnsupportedContentType);
        let err = validate_predict_request(None, b"{}").unwrap_err();
        assert_eq!(err, PredictRequestError::UnsupportedContentType);
    }

    #[test]
    fn content_type_match_ignores_charset_and_case() {
        let ok = validate_predict_request(
            Some("Application/JSON; charset=utf-8"),
            br#"{"text": "hola"}"#,
        );
        assert_eq!(ok.unwrap(), "hola");
    }

    #[test]
    fn malformed_body_is_rejected() {
        let err = validate_predict_request(JSON, b"{ not json").unwrap_err();
        assert_eq!(err, PredictRequestError::MalformedBody);
    }

    #[test]
    fn missing_text_field_is_rejected() {
        let err = validate_predict_request(JSON, b"{}").unwrap_err();
        assert_eq!(err, PredictRequestError::MissingText);
        assert_eq!(err.to_string(), "'text' field is required");
        let err = validate_predict_request(JSON, b"[1, 2]").unwrap_err();
        assert_eq!(err, PredictRequestError::MissingText);
    }

    #[test]
    fn non_string_or_blank_text_is_rejected() {
        let err = validate_predict_request(JSON, br#"{"text": 42}"#).unwrap_err();
        assert_eq!(err, PredictRequestError::EmptyText);
        let err = validate_predict_request(JSON, br#"{"text": "   "}"#).unwrap_err();
        assert_eq!(err, PredictRequestError::EmptyText);
    }

    #[test]
    fn valid_request_returns_original_text() {
        let text = validate_predict_request(JSON, br#"{"text": "  con espacios  "}"#).unwrap();
        assert_eq!(text, "  con espacios  ");
    }
}
