// src/fetch/forex_factory.rs
// Forex Factory scraper on RapidAPI. Serves both the day-scoped calendar
// and the news feeds (the feeds take no query, only a path suffix).

use chrono::{Datelike, NaiveDate};

use super::{dispatch, FetchResult, NewsTopic};
use crate::credentials::Credential;

const HOST: &str = "forex-factory-scraper1.p.rapidapi.com";
const BASE_URL: &str = "https://forex-factory-scraper1.p.rapidapi.com/";
const CALENDAR_URL: &str =
    "https://forex-factory-scraper1.p.rapidapi.com/get_real_time_calendar_details";

pub(crate) async fn fetch_calendar(
    http: &reqwest::Client,
    credential: &Credential,
    date: NaiveDate,
    currency: &str,
    timezone: &str,
    time_format: &str,
) -> FetchResult {
    let query = [
        ("calendar", "Forex".to_string()),
        ("year", date.year().to_string()),
        ("month", date.month().to_string()),
        ("day", date.day().to_string()),
        ("currency", currency.to_string()),
        ("event_name", "ALL".to_string()),
        ("timezone", timezone.to_string()),
        ("time_format", time_format.to_string()),
    ];
    dispatch(http, HOST, CALENDAR_URL.to_string(), &query, credential).await
}

pub(crate) async fn fetch_news(
    http: &reqwest::Client,
    credential: &Credential,
    topic: NewsTopic,
) -> FetchResult {
    let url = format!("{BASE_URL}{}", topic.as_path());
    dispatch(http, HOST, url, &[], credential).await
}
