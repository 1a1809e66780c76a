use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::fetch::NewsTopic;
use crate::pipeline::{DashboardRequest, DashboardView, PipelineContext, SectionView};

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<PipelineContext>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/dashboard", get(dashboard))
        .route("/calendar/tradingview", get(tradingview_calendar))
        .route("/calendar/forex-factory", get(forex_factory_calendar))
        .route("/news", get(news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Raw query parameters as the frontend sends them; validated into a
/// `DashboardRequest` before they reach the pipeline.
#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    date: Option<String>,
    to: Option<String>,
    countries: Option<String>,
    demo: Option<bool>,
    news: Option<String>,
}

type ApiError = (StatusCode, String);

fn parse_request(q: &DashboardQuery) -> Result<DashboardRequest, ApiError> {
    let date = match q.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let date_to = q.to.as_deref().map(parse_date).transpose()?;
    let countries = q
        .countries
        .as_deref()
        .map(split_countries)
        .unwrap_or_default();
    let news_topic = q.news.as_deref().map(parse_topic).transpose()?;

    Ok(DashboardRequest {
        date,
        date_to,
        countries,
        demo: q.demo.unwrap_or(false),
        news_topic,
    })
}

fn parse_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("invalid date '{s}', expected YYYY-MM-DD"),
        )
    })
}

fn parse_topic(s: &str) -> Result<NewsTopic, ApiError> {
    s.parse().map_err(|e| (StatusCode::BAD_REQUEST, e))
}

fn split_countries(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}

async fn dashboard(
    State(state): State<AppState>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let req = parse_request(&q)?;
    Ok(Json(state.ctx.dashboard(&req).await))
}

async fn tradingview_calendar(
    State(state): State<AppState>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<SectionView>, ApiError> {
    let req = parse_request(&q)?;
    Ok(Json(state.ctx.tradingview_section(&req).await))
}

async fn forex_factory_calendar(
    State(state): State<AppState>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<SectionView>, ApiError> {
    let req = parse_request(&q)?;
    Ok(Json(state.ctx.forex_factory_section(&req).await))
}

async fn news(
    State(state): State<AppState>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<SectionView>, ApiError> {
    let req = parse_request(&q)?;
    Ok(Json(state.ctx.news_section(&req).await))
}
