// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod demo;
pub mod fallback;
pub mod fetch;
pub mod metrics;
pub mod normalize;
pub mod pipeline;

// ---- Re-exports for stable public API ----
// Router construction: `usd_impact_monitor::api::create_router` or
// `usd_impact_monitor::create_router`.
pub use crate::api::{create_router, AppState};
pub use crate::credentials::Credential;
pub use crate::fallback::{decide, DataOrigin, SectionData};
pub use crate::fetch::{FetchError, FetchResult, MarketDataApi, NewsTopic, RapidApiClient};
pub use crate::pipeline::{DashboardRequest, PipelineContext};
