// tests/demo_fixtures.rs
//
// The demo datasets stand in for live responses, so they must already
// satisfy the business filter: normalize-then-filter keeps every record.
// Otherwise demo mode would silently render fewer rows than it embeds.

use usd_impact_monitor::demo;
use usd_impact_monitor::normalize::{normalize_events, normalize_news, ImpactLevel, SourceSchema};

#[test]
fn tradingview_fixture_survives_the_filter_unchanged() {
    let raw = demo::tradingview_events();
    assert!(!raw.is_empty());

    let recs = normalize_events(raw, SourceSchema::TradingView);
    assert_eq!(recs.len(), raw.len());
    for rec in &recs {
        assert_eq!(rec.impact, ImpactLevel::High);
        assert_eq!(rec.currency.as_deref(), Some("USD"));
        assert!(rec.title.is_some());
        assert!(rec.time.is_some());
    }
}

#[test]
fn forex_factory_fixture_survives_the_filter_unchanged() {
    let raw = demo::forex_factory_events();
    assert!(!raw.is_empty());

    let recs = normalize_events(raw, SourceSchema::ForexFactory);
    assert_eq!(recs.len(), raw.len());
    for rec in &recs {
        assert_eq!(rec.impact, ImpactLevel::High);
        assert_eq!(rec.currency.as_deref(), Some("USD"));
        assert!(rec.title.is_some());
    }
}

#[test]
fn news_fixture_is_fully_displayable() {
    let raw = demo::news_items();
    assert!(!raw.is_empty());

    let items = normalize_news(raw);
    assert_eq!(items.len(), raw.len());
    for item in &items {
        assert!(!item.title.is_empty());
        assert!(item.link.as_deref().is_some_and(|l| l.starts_with("https://")));
        assert!(item.published.is_some());
    }
}
