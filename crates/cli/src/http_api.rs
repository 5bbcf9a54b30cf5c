use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use wordrank_ranking::{RankingService, RescoreRequest, WeightVector};

pub(crate) type SharedService = Arc<RwLock<RankingService>>;

pub(crate) fn router(service: SharedService) -> Router {
    Router::new()
        .route(
            "/data/reweight/:year/:length/:count/:pages/:books",
            get(reweight),
        )
        .route("/data/:offset/:count", get(page))
        .route("/health", get(health))
        .with_state(service)
}

pub(crate) fn error_response(status: StatusCode, message: String) -> Response {
    log::warn!("HTTP {status}: {message}");
    (status, Json(json!({ "error": message }))).into_response()
}

fn parse_segment<T: FromStr>(name: &str, raw: &str) -> Result<T, Response> {
    raw.parse().map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("invalid {name} '{raw}'"),
        )
    })
}

fn parse_rescore(
    (year, length, count, pages, books): &(String, String, String, String, String),
) -> Result<RescoreRequest, Response> {
    Ok(RescoreRequest {
        year: parse_segment("year", year)?,
        weights: WeightVector::new(
            parse_segment("length weight", length)?,
            parse_segment("count weight", count)?,
            parse_segment("pages weight", pages)?,
            parse_segment("books weight", books)?,
        ),
    })
}

pub(crate) async fn reweight(
    State(service): State<SharedService>,
    Path(segments): Path<(String, String, String, String, String)>,
) -> Response {
    let request = match parse_rescore(&segments) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let rescored =
        tokio::task::spawn_blocking(move || service.blocking_write().rescore(&request)).await;
    match rescored {
        Ok(Ok(ranked)) => Json(json!({ "ranked": ranked })).into_response(),
        Ok(Err(err)) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        Err(err) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("rescore task failed: {err}"),
        ),
    }
}

pub(crate) async fn page(
    State(service): State<SharedService>,
    Path((offset, count)): Path<(String, String)>,
) -> Response {
    let offset: usize = match parse_segment("offset", &offset) {
        Ok(offset) => offset,
        Err(response) => return response,
    };
    let count: usize = match parse_segment("count", &count) {
        Ok(count) => count,
        Err(response) => return response,
    };

    let service = service.read().await;
    Json(service.page(offset, count)).into_response()
}

pub(crate) async fn health(State(service): State<SharedService>) -> Response {
    let service = service.read().await;
    Json(json!({
        "status": "ok",
        "words": service.snapshot().len(),
        "ranked": service.ranked().len(),
        "mode": service.mode(),
    }))
    .into_response()
}
