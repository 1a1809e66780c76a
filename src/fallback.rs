// src/fallback.rs
// The decision core: turns a fetch outcome into something displayable.
// This is the only place error kinds become user-facing behavior; layers
// above never inspect `FetchError` again.

use metrics::counter;
use serde::Serialize;
use serde_json::Value;

use crate::credentials::Credential;
use crate::fetch::{FetchError, FetchResult};

pub const NOTICE_DEMO_MODE: &str = "Demo Mode";
pub const NOTICE_NO_KEY: &str = "No API key — using demo data";
pub const NOTICE_QUOTA: &str = "Quota exceeded — showing demo data";
pub const NOTICE_NO_DATA: &str = "No data returned";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Live,
    Demo,
    Empty,
}

/// What a section presents: raw rows (still provider-shaped, normalization
/// comes after), where they came from, and an optional human-readable
/// notice.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionData {
    pub rows: Vec<Value>,
    pub origin: DataOrigin,
    pub notice: Option<String>,
}

impl SectionData {
    fn demo(rows: &[Value], notice: &str) -> Self {
        counter!("dashboard_demo_sections_total").increment(1);
        Self {
            rows: rows.to_vec(),
            origin: DataOrigin::Demo,
            notice: Some(notice.to_string()),
        }
    }

    fn empty(notice: String) -> Self {
        Self {
            rows: Vec::new(),
            origin: DataOrigin::Empty,
            notice: Some(notice),
        }
    }

    fn live(rows: Vec<Value>) -> Self {
        Self {
            rows,
            origin: DataOrigin::Live,
            notice: None,
        }
    }
}

/// Total over every combination of inputs; never panics. Only a missing
/// key and upstream rate limiting substitute demo data silently — any other
/// failure surfaces verbatim with an empty dataset, so "nothing to report"
/// stays distinguishable from "something is broken".
pub fn decide(
    demo_requested: bool,
    credential: &Credential,
    result: FetchResult,
    demo_rows: &[Value],
) -> SectionData {
    if demo_requested {
        return SectionData::demo(demo_rows, NOTICE_DEMO_MODE);
    }
    if credential.is_absent() {
        return SectionData::demo(demo_rows, NOTICE_NO_KEY);
    }
    match result {
        Ok(Value::Array(rows)) if !rows.is_empty() => SectionData::live(rows),
        // Placeholder bodies (e.g. `{}` on no-data days) count as empty.
        Ok(_) => SectionData::empty(NOTICE_NO_DATA.to_string()),
        Err(FetchError::NoCredential) => SectionData::demo(demo_rows, NOTICE_NO_KEY),
        Err(FetchError::RateLimited) => SectionData::demo(demo_rows, NOTICE_QUOTA),
        Err(err @ (FetchError::Http(_) | FetchError::Transport(_))) => {
            SectionData::empty(format!("API error: {err}"))
        }
    }
}
