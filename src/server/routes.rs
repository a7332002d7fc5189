use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::credentials::extractor::userinfo_from_uri;
use crate::grant::body::parse_body;
use crate::grant::processor::TokenRequest;
use crate::observability::metrics::{get_metrics, OUTCOME_ISSUED, RESULT_INVALID, RESULT_VALID};
use crate::server::server::AppState;
use crate::utils::constants::{TOKEN_PATH, VALIDATE_PATH};

/// `POST /oauth/token`
pub async fn handle_token(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let metrics = get_metrics().await;
    let start = Instant::now();
    debug!(path = %uri.path(), "token request");

    let request = TokenRequest::new(
        userinfo_from_uri(&uri),
        header_str(&headers, header::AUTHORIZATION),
        parse_body(header_str(&headers, header::CONTENT_TYPE), &body),
    );

    let response = match state.processor.handle_token_request(request) {
        Ok(token_response) => {
            metrics.token_requests.with_label_values(&[OUTCOME_ISSUED]).inc();
            (
                StatusCode::OK,
                [
                    (header::CACHE_CONTROL, "no-store"),
                    (header::PRAGMA, "no-cache"),
                ],
                Json(token_response),
            )
                .into_response()
        }
        Err(e) => {
            metrics.token_requests.with_label_values(&[e.code()]).inc();
            e.into_response()
        }
    };

    metrics
        .request_duration
        .with_label_values(&[TOKEN_PATH])
        .observe(start.elapsed().as_secs_f64());
    response
}

/// `GET /validate`
pub async fn handle_validate(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let metrics = get_metrics().await;
    let start = Instant::now();

    let validation = state
        .processor
        .handle_validation(header_str(&headers, header::AUTHORIZATION));

    let (status, result) = if validation.valid {
        (StatusCode::OK, RESULT_VALID)
    } else {
        (StatusCode::UNAUTHORIZED, RESULT_INVALID)
    };
    metrics.token_validations.with_label_values(&[result]).inc();
    metrics
        .request_duration
        .with_label_values(&[VALIDATE_PATH])
        .observe(start.elapsed().as_secs_f64());

    (status, Json(validation)).into_response()
}

/// Any other path or method.
pub async fn handle_not_found(uri: Uri) -> Response {
    info!(path = %uri.path(), "not found");
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response()
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
