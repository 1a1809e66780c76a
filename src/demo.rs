// src/demo.rs
// Built-in sample datasets, one per upstream capability. They match the
// live schemas field-for-field and already satisfy the USD/high-impact
// filter, so the whole pipeline can be exercised (and the UI previewed)
// without spending API quota.

use once_cell::sync::Lazy;
use serde_json::Value;

static TRADINGVIEW_EVENTS: Lazy<Vec<Value>> =
    Lazy::new(|| parse(include_str!("../tests/fixtures/demo_tradingview_events.json")));
static FOREX_FACTORY_EVENTS: Lazy<Vec<Value>> =
    Lazy::new(|| parse(include_str!("../tests/fixtures/demo_forex_factory_events.json")));
static NEWS_ITEMS: Lazy<Vec<Value>> =
    Lazy::new(|| parse(include_str!("../tests/fixtures/demo_news.json")));

fn parse(raw: &str) -> Vec<Value> {
    serde_json::from_str(raw).expect("embedded demo fixture is valid JSON")
}

pub fn tradingview_events() -> &'static [Value] {
    &TRADINGVIEW_EVENTS
}

pub fn forex_factory_events() -> &'static [Value] {
    &FOREX_FACTORY_EVENTS
}

pub fn news_items() -> &'static [Value] {
    &NEWS_ITEMS
}
