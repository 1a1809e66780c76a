// src/fetch/ultimate.rs
// Ultimate Economic Calendar (TradingView feed) on RapidAPI.

use chrono::NaiveDate;

use super::{dispatch, FetchResult};
use crate::credentials::Credential;

const HOST: &str = "ultimate-economic-calendar.p.rapidapi.com";
const EVENTS_URL: &str =
    "https://ultimate-economic-calendar.p.rapidapi.com/economic-events/tradingview";

/// Calendar events for a date window and a set of country codes.
/// `from == to` is the single-day case.
pub(crate) async fn fetch_calendar(
    http: &reqwest::Client,
    credential: &Credential,
    from: NaiveDate,
    to: NaiveDate,
    countries: &[String],
) -> FetchResult {
    let query = [
        ("from", from.format("%Y-%m-%d").to_string()),
        ("to", to.format("%Y-%m-%d").to_string()),
        ("countries", countries.join(",")),
    ];
    dispatch(http, HOST, EVENTS_URL.to_string(), &query, credential).await
}
