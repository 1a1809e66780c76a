// src/pipeline.rs
// Per-section orchestration: cache -> fetch -> fallback -> normalize ->
// project. One parameterized pipeline serves all dashboard variants
// (single-day, date-range, demo-toggle) instead of three copy-pasted call
// sites.

use std::sync::Arc;

use chrono::NaiveDate;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;

use crate::cache::{self, ResponseCache};
use crate::config::{DashboardConfig, DateMode};
use crate::credentials::Credential;
use crate::demo;
use crate::fallback::{self, DataOrigin, SectionData};
use crate::fetch::{MarketDataApi, NewsTopic};
use crate::normalize::{self, SourceSchema};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("dashboard_fetch_total", "Upstream fetch attempts.");
        describe_counter!(
            "dashboard_fetch_errors_total",
            "Upstream fetches failed by transport or HTTP status."
        );
        describe_counter!("dashboard_rate_limited_total", "Upstream 429 responses.");
        describe_counter!("dashboard_cache_hits_total", "Response cache hits.");
        describe_counter!("dashboard_cache_misses_total", "Response cache misses.");
        describe_counter!(
            "dashboard_demo_sections_total",
            "Sections served from demo data."
        );
        describe_counter!(
            "dashboard_rows_kept_total",
            "Rows kept after normalization + filtering."
        );
        describe_histogram!("dashboard_fetch_ms", "Upstream fetch time in milliseconds.");
        describe_gauge!(
            "dashboard_last_render_ts",
            "Unix ts when a dashboard was last assembled."
        );
    });
}

/// Everything a section request needs, passed explicitly so tests can run
/// against a mock API and a fresh cache instead of ambient globals.
pub struct PipelineContext {
    credential: Credential,
    config: DashboardConfig,
    cache: ResponseCache,
    api: Arc<dyn MarketDataApi>,
}

/// One user interaction worth of inputs, passed through unchanged from the
/// presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub date: NaiveDate,
    pub date_to: Option<NaiveDate>,
    /// Empty means "use the configured scope".
    pub countries: Vec<String>,
    pub demo: bool,
    pub news_topic: Option<NewsTopic>,
}

impl DashboardRequest {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            date_to: None,
            countries: Vec::new(),
            demo: false,
            news_topic: None,
        }
    }
}

/// A rendered table: ordered columns, row objects, provenance, and an
/// optional notice for the banner above the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub columns: Vec<String>,
    pub rows: Vec<Value>,
    pub origin: DataOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub tradingview_events: SectionView,
    pub forex_factory_events: SectionView,
    pub news: SectionView,
}

impl PipelineContext {
    pub fn new(credential: Credential, config: DashboardConfig, api: Arc<dyn MarketDataApi>) -> Self {
        ensure_metrics_described();
        Self {
            credential,
            config,
            cache: ResponseCache::new(),
            api,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn date_range(&self, req: &DashboardRequest) -> (NaiveDate, NaiveDate) {
        match self.config.date_mode {
            DateMode::Single => (req.date, req.date),
            DateMode::Range => (req.date, req.date_to.unwrap_or(req.date)),
        }
    }

    fn countries(&self, req: &DashboardRequest) -> Vec<String> {
        if req.countries.is_empty() {
            self.config.countries.clone()
        } else {
            req.countries.clone()
        }
    }

    fn demo_requested(&self, req: &DashboardRequest) -> bool {
        req.demo || self.config.demo_default
    }

    pub async fn tradingview_section(&self, req: &DashboardRequest) -> SectionView {
        let (from, to) = self.date_range(req);
        let countries = self.countries(req);
        let demo_requested = self.demo_requested(req);
        let key = cache::cache_key(&[
            "tradingview-events",
            &from.to_string(),
            &to.to_string(),
            &countries.join(","),
        ]);

        let result = if demo_requested || self.credential.is_absent() {
            // Neither case reaches the fetcher: demo mode never spends
            // quota, and a missing key is permanent for the process.
            // decide() resolves both to demo data before reading `result`.
            Ok(Value::Null)
        } else {
            self.cache
                .get_or_fetch(&key, cache::CALENDAR_TTL, || {
                    let api = Arc::clone(&self.api);
                    let credential = self.credential.clone();
                    async move {
                        api.tradingview_calendar(&credential, from, to, &countries)
                            .await
                    }
                })
                .await
        };

        let data = fallback::decide(
            demo_requested,
            &self.credential,
            result,
            demo::tradingview_events(),
        );
        event_section(data, SourceSchema::TradingView)
    }

    pub async fn forex_factory_section(&self, req: &DashboardRequest) -> SectionView {
        let demo_requested = self.demo_requested(req);
        let date = req.date;
        let key = cache::cache_key(&["forex-factory-calendar", &date.to_string(), "USD"]);

        let result = if demo_requested || self.credential.is_absent() {
            Ok(Value::Null)
        } else {
            self.cache
                .get_or_fetch(&key, cache::CALENDAR_TTL, || {
                    let api = Arc::clone(&self.api);
                    let credential = self.credential.clone();
                    async move { api.forex_factory_calendar(&credential, date, "USD").await }
                })
                .await
        };

        let data = fallback::decide(
            demo_requested,
            &self.credential,
            result,
            demo::forex_factory_events(),
        );
        event_section(data, SourceSchema::ForexFactory)
    }

    pub async fn news_section(&self, req: &DashboardRequest) -> SectionView {
        let demo_requested = self.demo_requested(req);
        let topic = req.news_topic.unwrap_or(self.config.news_topic);
        let key = cache::cache_key(&["forex-factory-news", topic.as_path()]);

        let result = if demo_requested || self.credential.is_absent() {
            Ok(Value::Null)
        } else {
            self.cache
                .get_or_fetch(&key, cache::NEWS_TTL, || {
                    let api = Arc::clone(&self.api);
                    let credential = self.credential.clone();
                    async move { api.latest_news(&credential, topic).await }
                })
                .await
        };

        let data = fallback::decide(demo_requested, &self.credential, result, demo::news_items());
        news_section_view(data)
    }

    /// Sequential on purpose: one user interaction is a handful of blocking
    /// calls, no concurrent fan-out.
    pub async fn dashboard(&self, req: &DashboardRequest) -> DashboardView {
        let tradingview_events = self.tradingview_section(req).await;
        let forex_factory_events = self.forex_factory_section(req).await;
        let news = self.news_section(req).await;

        gauge!("dashboard_last_render_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        DashboardView {
            tradingview_events,
            forex_factory_events,
            news,
        }
    }
}

fn event_section(data: SectionData, schema: SourceSchema) -> SectionView {
    let records = normalize::normalize_events(&data.rows, schema);
    counter!("dashboard_rows_kept_total").increment(records.len() as u64);
    let (columns, rows) = normalize::project_events(&records);
    SectionView {
        columns,
        rows,
        origin: data.origin,
        notice: data.notice,
    }
}

fn news_section_view(data: SectionData) -> SectionView {
    let items = normalize::normalize_news(&data.rows);
    counter!("dashboard_rows_kept_total").increment(items.len() as u64);
    let (columns, rows) = normalize::project_news(&items);
    SectionView {
        columns,
        rows,
        origin: data.origin,
        notice: data.notice,
    }
}
