// src/config.rs
// Dashboard configuration. One parameterized pipeline replaces the
// original's per-variant call sites: date handling, country scope, and the
// demo toggle all live here.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::fetch::NewsTopic;

pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMode {
    /// The calendar window is pinned to one day (`to` = `from`).
    #[default]
    Single,
    /// A caller-supplied end date is honored.
    Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub date_mode: DateMode,
    /// Country scope for the TradingView calendar when a request does not
    /// select its own.
    pub countries: Vec<String>,
    /// Serve demo data unless a request explicitly asks otherwise.
    pub demo_default: bool,
    pub news_topic: NewsTopic,
    /// Forwarded verbatim to the Forex Factory scraper.
    pub timezone: String,
    pub time_format: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            date_mode: DateMode::Single,
            countries: vec!["US".to_string()],
            demo_default: false,
            news_topic: NewsTopic::LatestHottestNews,
            timezone: "GMT-05:00 Eastern Time (US & Canada)".to_string(),
            time_format: "12h".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load order:
    /// 1) $DASHBOARD_CONFIG_PATH
    /// 2) config/dashboard.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("DASHBOARD_CONFIG_PATH points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let mut cfg: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("parsing dashboard config from {}", path.display()))?;
        cfg.countries = clean_countries(cfg.countries);
        Ok(cfg)
    }
}

fn clean_countries(items: Vec<String>) -> Vec<String> {
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim().to_ascii_uppercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    if set.is_empty() {
        set.insert("US".to_string());
    }
    set.into_iter().collect()
}
