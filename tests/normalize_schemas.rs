// tests/normalize_schemas.rs
//
// Schema reconciliation between the two providers and the fixed business
// filter: high impact only (case-insensitive substring), USD exactly for
// the Forex Factory schema.

use serde_json::json;

use usd_impact_monitor::normalize::{
    normalize_events, normalize_news, project_events, project_news, SourceSchema,
};

#[test]
fn forex_factory_eur_record_is_excluded_despite_high_impact() {
    let raw = vec![
        json!({"Currency": "EUR", "Impact": "High", "Event": "Main Refinancing Rate"}),
        json!({"Currency": "USD", "Impact": "High", "Event": "Federal Funds Rate"}),
    ];
    let recs = normalize_events(&raw, SourceSchema::ForexFactory);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].title.as_deref(), Some("Federal Funds Rate"));
}

#[test]
fn currency_match_is_exact_not_substring() {
    // Controlled vocabulary: "USD/JPY"-style values must not slip through.
    let raw = vec![json!({"Currency": "USD/JPY", "Impact": "High", "Event": "x"})];
    assert!(normalize_events(&raw, SourceSchema::ForexFactory).is_empty());
}

#[test]
fn mixed_case_impact_with_suffix_still_matches() {
    let raw = vec![json!({"impact": "HIGH-IMPACT", "title": "Nonfarm Payrolls"})];
    let recs = normalize_events(&raw, SourceSchema::TradingView);
    assert_eq!(recs.len(), 1);
}

#[test]
fn medium_low_and_unlabeled_records_are_filtered_out() {
    let raw = vec![
        json!({"impact": "Medium", "title": "a"}),
        json!({"impact": "low", "title": "b"}),
        json!({"impact": "Holiday", "title": "c"}),
        json!({"title": "no impact field at all"}),
    ];
    assert!(normalize_events(&raw, SourceSchema::TradingView).is_empty());
}

#[test]
fn titlecase_fields_map_onto_canonical_names() {
    let raw = vec![json!({
        "Time": "8:30am",
        "Currency": "USD",
        "Impact": "High",
        "Event": "Core CPI m/m",
        "Actual": "0.3%",
        "Forecast": "0.2%",
        "Previous": "0.3%"
    })];
    let recs = normalize_events(&raw, SourceSchema::ForexFactory);
    assert_eq!(recs.len(), 1);
    let rec = &recs[0];
    assert_eq!(rec.time.as_deref(), Some("8:30am"));
    assert_eq!(rec.title.as_deref(), Some("Core CPI m/m"));
    assert_eq!(rec.actual.as_deref(), Some("0.3%"));
    assert_eq!(rec.forecast.as_deref(), Some("0.2%"));
    assert_eq!(rec.previous.as_deref(), Some("0.3%"));
}

#[test]
fn zero_survivors_is_a_valid_outcome_not_an_error() {
    let raw = vec![json!({"impact": "Low", "title": "quiet day"})];
    let recs = normalize_events(&raw, SourceSchema::TradingView);
    let (columns, rows) = project_events(&recs);
    assert!(columns.is_empty());
    assert!(rows.is_empty());
}

#[test]
fn projection_keeps_display_order_and_drops_empty_columns() {
    let raw = vec![
        json!({"time": "08:30 AM", "title": "CPI YoY", "actual": "2.4%", "impact": "High"}),
        json!({"time": "10:00 AM", "title": "ISM PMI", "impact": "High"}),
    ];
    let recs = normalize_events(&raw, SourceSchema::TradingView);
    let (columns, rows) = project_events(&recs);
    // No record carries country/previous/forecast/currency; those columns
    // vanish instead of rendering empty.
    assert_eq!(columns, vec!["time", "title", "actual", "impact"]);
    assert_eq!(rows[0]["impact"], "High");
    assert!(rows[1].get("actual").is_none());
}

#[test]
fn news_link_candidates_cover_both_providers() {
    let raw = vec![
        json!({"Title": "Fed holds", "Link": "https://example.test/a", "Published": "5 min ago"}),
        json!({"title": "Dollar firms", "url": "https://example.test/b", "published": "1 hour ago"}),
    ];
    let items = normalize_news(&raw);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].link.as_deref(), Some("https://example.test/a"));
    assert_eq!(items[1].link.as_deref(), Some("https://example.test/b"));

    let (columns, _rows) = project_news(&items);
    assert_eq!(columns, vec!["title", "link", "published"]);
}

#[test]
fn news_rows_without_titles_are_skipped_and_entities_decoded() {
    let raw = vec![
        json!({"Link": "https://example.test/untitled"}),
        json!({"Title": "Stocks &amp; bonds   rally", "Link": "https://example.test/c"}),
    ];
    let items = normalize_news(&raw);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Stocks & bonds rally");
}
