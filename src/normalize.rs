// src/normalize.rs
// Schema reconciliation between the two calendar providers, plus the fixed
// business filter (high impact only; USD only where the provider mixes
// currencies) and column projection for display.

use std::fmt;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Which upstream produced a raw record. The providers disagree on field
/// names and casing; the mapping table below reconciles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSchema {
    /// Ultimate Economic Calendar / TradingView feed: lowercase keys,
    /// responses already scoped to the queried countries.
    TradingView,
    /// Forex Factory scraper: TitleCase keys, records carry every currency.
    ForexFactory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl ImpactLevel {
    /// Providers disagree on labels ("High", "HIGH", "HIGH-IMPACT", ...);
    /// match by case-insensitive substring.
    pub fn from_label(label: &str) -> Self {
        let l = label.to_ascii_lowercase();
        if l.contains("high") {
            ImpactLevel::High
        } else if l.contains("medium") {
            ImpactLevel::Medium
        } else if l.contains("low") {
            ImpactLevel::Low
        } else {
            ImpactLevel::Unknown
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImpactLevel::High => "High",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::Low => "Low",
            ImpactLevel::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// One calendar entry in canonical shape. All display fields stay strings;
/// the providers mix "254K", "2.4%" and plain numbers freely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    pub impact: ImpactLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

struct FieldMap {
    canonical: &'static str,
    candidates: &'static [&'static str],
}

/// Canonical column -> source field names to probe, in order. Key matching
/// is case-insensitive, which absorbs the casing drift between providers
/// (`impact` vs `Impact`); extra candidates cover outright renames.
const EVENT_FIELDS: &[FieldMap] = &[
    FieldMap { canonical: "time", candidates: &["time", "date"] },
    FieldMap { canonical: "country", candidates: &["country"] },
    FieldMap { canonical: "title", candidates: &["title", "event", "indicator"] },
    FieldMap { canonical: "actual", candidates: &["actual"] },
    FieldMap { canonical: "previous", candidates: &["previous"] },
    FieldMap { canonical: "forecast", candidates: &["forecast", "estimate"] },
    FieldMap { canonical: "impact", candidates: &["impact"] },
    FieldMap { canonical: "currency", candidates: &["currency"] },
];

const NEWS_TITLE: &[&str] = &["title", "headline"];
const NEWS_LINK: &[&str] = &["link", "url"];
const NEWS_PUBLISHED: &[&str] = &["published", "date", "time"];

/// Display order for calendar tables. Columns with no value anywhere in the
/// response are dropped rather than rendered empty.
pub const EVENT_COLUMNS: &[&str] = &[
    "time", "country", "title", "actual", "previous", "forecast", "impact", "currency",
];
pub const NEWS_COLUMNS: &[&str] = &["title", "link", "published"];

fn probe<'a>(record: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    let obj = record.as_object()?;
    for cand in candidates {
        for (key, value) in obj {
            if key.eq_ignore_ascii_case(cand) && !value.is_null() {
                return Some(value);
            }
        }
    }
    None
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl EventRecord {
    fn from_raw(record: &Value) -> Self {
        let mut rec = EventRecord::default();
        for map in EVENT_FIELDS {
            let Some(v) = probe(record, map.candidates).and_then(|v| text(v)) else {
                continue;
            };
            match map.canonical {
                "time" => rec.time = Some(v),
                "country" => rec.country = Some(v),
                "title" => rec.title = Some(v),
                "actual" => rec.actual = Some(v),
                "previous" => rec.previous = Some(v),
                "forecast" => rec.forecast = Some(v),
                "impact" => rec.impact = ImpactLevel::from_label(&v),
                "currency" => rec.currency = Some(v),
                _ => unreachable!("canonical field not wired: {}", map.canonical),
            }
        }
        rec
    }

    pub fn column(&self, name: &str) -> Option<String> {
        match name {
            "time" => self.time.clone(),
            "country" => self.country.clone(),
            "title" => self.title.clone(),
            "actual" => self.actual.clone(),
            "previous" => self.previous.clone(),
            "forecast" => self.forecast.clone(),
            "impact" => (self.impact != ImpactLevel::Unknown).then(|| self.impact.to_string()),
            "currency" => self.currency.clone(),
            _ => None,
        }
    }
}

impl NewsItem {
    pub fn column(&self, name: &str) -> Option<String> {
        match name {
            "title" => Some(self.title.clone()),
            "link" => self.link.clone(),
            "published" => self.published.clone(),
            _ => None,
        }
    }
}

/// Map raw provider records onto the canonical shape, then apply the fixed
/// business filter: high-impact only and, for the Forex Factory schema,
/// currency exactly "USD" (controlled vocabulary, so no substring match).
/// TradingView responses are already scoped by the countries query.
/// An empty output is a valid "no high-impact events today" outcome.
pub fn normalize_events(raw: &[Value], schema: SourceSchema) -> Vec<EventRecord> {
    raw.iter()
        .map(EventRecord::from_raw)
        .filter(|rec| rec.impact == ImpactLevel::High)
        .filter(|rec| match schema {
            SourceSchema::TradingView => true,
            SourceSchema::ForexFactory => rec.currency.as_deref() == Some("USD"),
        })
        .collect()
}

/// News rows keep whatever the feed provides; a row without a title is
/// useless for display and gets skipped.
pub fn normalize_news(raw: &[Value]) -> Vec<NewsItem> {
    raw.iter()
        .filter_map(|record| {
            let title = probe(record, NEWS_TITLE).and_then(text)?;
            Some(NewsItem {
                title: clean_title(&title),
                link: probe(record, NEWS_LINK).and_then(text),
                published: probe(record, NEWS_PUBLISHED).and_then(text),
            })
        })
        .collect()
}

/// Scraper headlines arrive with HTML entities and ragged whitespace.
fn clean_title(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_ws.replace_all(decoded.as_ref(), " ").trim().to_string()
}

/// Project records onto the fixed column order, keeping only columns that
/// have at least one value in this response.
pub fn project_events(records: &[EventRecord]) -> (Vec<String>, Vec<Value>) {
    project(EVENT_COLUMNS, records, EventRecord::column)
}

pub fn project_news(items: &[NewsItem]) -> (Vec<String>, Vec<Value>) {
    project(NEWS_COLUMNS, items, NewsItem::column)
}

fn project<T>(
    order: &[&str],
    records: &[T],
    field: impl Fn(&T, &str) -> Option<String>,
) -> (Vec<String>, Vec<Value>) {
    let columns: Vec<String> = order
        .iter()
        .filter(|col| records.iter().any(|r| field(r, col).is_some()))
        .map(|col| col.to_string())
        .collect();

    let rows = records
        .iter()
        .map(|r| {
            let mut obj = serde_json::Map::new();
            for col in &columns {
                if let Some(v) = field(r, col) {
                    obj.insert(col.clone(), Value::String(v));
                }
            }
            Value::Object(obj)
        })
        .collect();

    (columns, rows)
}
