// tests/cache_ttl.rs
//
// TTL semantics of the response cache:
// - the producer runs exactly once per key within the TTL
// - after expiry the producer runs again
// - error results are cached too, so a rate-limited upstream is not
//   hammered within the window (and the error is sticky until expiry)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;

use usd_impact_monitor::cache::ResponseCache;
use usd_impact_monitor::fetch::FetchError;

const SHORT_TTL: Duration = Duration::from_millis(50);

/// Sleep noticeably longer than TTL to avoid boundary flakes.
/// 5x gives headroom even on slow CI timers.
async fn sleep_over_ttl() {
    sleep(SHORT_TTL * 5).await;
}

#[tokio::test]
async fn producer_runs_once_within_ttl() {
    let cache = ResponseCache::new();
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let out = cache
            .get_or_fetch("tradingview-events|2026-08-06", Duration::from_secs(30), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(json!([{"impact": "High"}])) }
            })
            .await;
        assert_eq!(out, Ok(json!([{"impact": "High"}])));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1, "live hits must not re-fetch");
}

#[tokio::test]
async fn producer_runs_again_after_expiry() {
    let cache = ResponseCache::new();
    let calls = AtomicUsize::new(0);

    let produce = || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(json!([])) }
    };

    let _ = cache.get_or_fetch("k", SHORT_TTL, produce).await;
    let _ = cache.get_or_fetch("k", SHORT_TTL, produce).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    sleep_over_ttl().await;

    let _ = cache.get_or_fetch("k", SHORT_TTL, produce).await;
    assert_eq!(
        calls.load(Ordering::SeqCst),
        2,
        "expired entries must be re-fetched (absolute TTL, no sliding refresh)"
    );
}

#[tokio::test]
async fn distinct_keys_do_not_share_entries() {
    let cache = ResponseCache::new();
    let calls = AtomicUsize::new(0);

    for key in ["forex-factory-calendar|2026-08-06|USD", "forex-factory-news|latest_hottest_news"] {
        let _ = cache
            .get_or_fetch(key, Duration::from_secs(30), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(json!([])) }
            })
            .await;
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn error_results_are_cached_too() {
    let cache = ResponseCache::new();
    let calls = AtomicUsize::new(0);

    let first = cache
        .get_or_fetch("k", SHORT_TTL, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::RateLimited) }
        })
        .await;
    assert_eq!(first, Err(FetchError::RateLimited));

    // Within the TTL the stored error is returned; the fresh producer (which
    // would succeed) must not run.
    let second = cache
        .get_or_fetch("k", SHORT_TTL, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(json!([{"impact": "High"}])) }
        })
        .await;
    assert_eq!(second, Err(FetchError::RateLimited), "errors are sticky within the TTL");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // After expiry the next producer runs and its success replaces the error.
    sleep_over_ttl().await;
    let third = cache
        .get_or_fetch("k", SHORT_TTL, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(json!([{"impact": "High"}])) }
        })
        .await;
    assert_eq!(third, Ok(json!([{"impact": "High"}])));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
