// src/fetch/mod.rs
pub mod forex_factory;
pub mod ultimate;

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credentials::Credential;

/// Everything a fetcher can fail with. All transport and HTTP failures are
/// converted at this boundary; nothing downstream ever sees a raised error.
/// 429 gets its own kind because the fallback policy treats it differently
/// from other HTTP failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("no API key configured")]
    NoCredential,
    #[error("upstream rate limit exceeded")]
    RateLimited,
    #[error("upstream returned HTTP {0}")]
    Http(u16),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Raw upstream body on success. Usually an array of records, but both
/// providers may return a placeholder object on no-data days; callers treat
/// any non-array body as an empty result.
pub type FetchResult = Result<Value, FetchError>;

/// Known feed suffixes on the scraper host. A closed vocabulary, so a
/// request can never steer the path to an arbitrary upstream endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsTopic {
    #[default]
    LatestHottestNews,
    LatestBreakingNews,
    LatestFundamentalAnalysisNews,
}

impl NewsTopic {
    pub fn as_path(&self) -> &'static str {
        match self {
            NewsTopic::LatestHottestNews => "latest_hottest_news",
            NewsTopic::LatestBreakingNews => "latest_breaking_news",
            NewsTopic::LatestFundamentalAnalysisNews => "latest_fundamental_analysis_news",
        }
    }
}

impl FromStr for NewsTopic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "latest_hottest_news" => Ok(NewsTopic::LatestHottestNews),
            "latest_breaking_news" => Ok(NewsTopic::LatestBreakingNews),
            "latest_fundamental_analysis_news" => Ok(NewsTopic::LatestFundamentalAnalysisNews),
            other => Err(format!("unknown news topic '{other}'")),
        }
    }
}

/// The three upstream capabilities behind one seam, so tests can substitute
/// a counting mock and the pipeline never knows which client it holds.
#[async_trait]
pub trait MarketDataApi: Send + Sync {
    async fn tradingview_calendar(
        &self,
        credential: &Credential,
        from: NaiveDate,
        to: NaiveDate,
        countries: &[String],
    ) -> FetchResult;

    async fn forex_factory_calendar(
        &self,
        credential: &Credential,
        date: NaiveDate,
        currency: &str,
    ) -> FetchResult;

    async fn latest_news(&self, credential: &Credential, topic: NewsTopic) -> FetchResult;
}

/// Live RapidAPI client. One shared `reqwest::Client` with a bounded
/// timeout; a timed-out call surfaces as `Transport`, same as any other
/// transport failure.
pub struct RapidApiClient {
    http: reqwest::Client,
    timezone: String,
    time_format: String,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

impl RapidApiClient {
    pub fn new(timezone: impl Into<String>, time_format: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building upstream http client")?;
        Ok(Self {
            http,
            timezone: timezone.into(),
            time_format: time_format.into(),
        })
    }
}

#[async_trait]
impl MarketDataApi for RapidApiClient {
    async fn tradingview_calendar(
        &self,
        credential: &Credential,
        from: NaiveDate,
        to: NaiveDate,
        countries: &[String],
    ) -> FetchResult {
        ultimate::fetch_calendar(&self.http, credential, from, to, countries).await
    }

    async fn forex_factory_calendar(
        &self,
        credential: &Credential,
        date: NaiveDate,
        currency: &str,
    ) -> FetchResult {
        forex_factory::fetch_calendar(
            &self.http,
            credential,
            date,
            currency,
            &self.timezone,
            &self.time_format,
        )
        .await
    }

    async fn latest_news(&self, credential: &Credential, topic: NewsTopic) -> FetchResult {
        forex_factory::fetch_news(&self.http, credential, topic).await
    }
}

/// One GET against a RapidAPI host. Fails fast (no I/O) without a
/// credential; a single attempt, no retries.
pub(crate) async fn dispatch(
    http: &reqwest::Client,
    host: &'static str,
    url: String,
    query: &[(&str, String)],
    credential: &Credential,
) -> FetchResult {
    let key = match credential.secret() {
        Some(k) => k,
        None => return Err(FetchError::NoCredential),
    };

    counter!("dashboard_fetch_total").increment(1);
    let t0 = std::time::Instant::now();

    let mut req = http
        .get(url)
        .header("x-rapidapi-key", key)
        .header("x-rapidapi-host", host);
    if !query.is_empty() {
        req = req.query(query);
    }

    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = ?e, host, "upstream transport error");
            counter!("dashboard_fetch_errors_total").increment(1);
            return Err(FetchError::Transport(e.to_string()));
        }
    };

    let status = resp.status().as_u16();
    if status == 429 {
        tracing::warn!(host, "upstream rate limit hit");
        counter!("dashboard_rate_limited_total").increment(1);
        return Err(FetchError::RateLimited);
    }
    if !(200..300).contains(&status) {
        tracing::warn!(host, status, "upstream http error");
        counter!("dashboard_fetch_errors_total").increment(1);
        return Err(FetchError::Http(status));
    }

    match resp.json::<Value>().await {
        Ok(body) => {
            histogram!("dashboard_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
            Ok(body)
        }
        Err(e) => {
            counter!("dashboard_fetch_errors_total").increment(1);
            Err(FetchError::Transport(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn news_topic_round_trips_through_its_path() {
        for topic in [
            NewsTopic::LatestHottestNews,
            NewsTopic::LatestBreakingNews,
            NewsTopic::LatestFundamentalAnalysisNews,
        ] {
            assert_eq!(topic.as_path().parse::<NewsTopic>(), Ok(topic));
        }
        assert!("latest_gossip".parse::<NewsTopic>().is_err());
    }

    #[tokio::test]
    async fn dispatch_fails_fast_without_credential() {
        let http = reqwest::Client::new();
        // Unroutable host: reaching the network would hang or error as
        // Transport, so NoCredential here proves the early return.
        let out = dispatch(
            &http,
            "example.invalid",
            "https://example.invalid/x".to_string(),
            &[],
            &Credential::Absent,
        )
        .await;
        assert_eq!(out, Err(FetchError::NoCredential));
    }
}
