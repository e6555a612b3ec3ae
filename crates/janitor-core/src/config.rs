use chrono::TimeDelta;
use tokio::sync::Semaphore;

use crate::error::{JanitorError, Result};
use crate::policy::MutationPolicy;

pub const DEFAULT_API_URL: &str = "https://api.trello.com/1";

/// Fourteen days.
pub const DEFAULT_THRESHOLD_HOURS: &str = "336";

// ---------------------------------------------------------------------------
// RawConfig
// ---------------------------------------------------------------------------

/// Settings as read from flags and environment, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub key: Option<String>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub archive_lists: Option<String>,
    pub delete_lists: Option<String>,
    pub reorder_lists: Option<String>,
    pub threshold_hours: Option<String>,
    pub strict_mutations: bool,
    pub max_concurrency: usize,
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// JanitorConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Credentials {
    pub key: String,
    pub token: String,
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct JanitorConfig {
    pub credentials: Credentials,
    pub api_url: String,
    pub archive_lists: Vec<String>,
    pub delete_lists: Vec<String>,
    pub reorder_lists: Vec<String>,
    pub threshold: TimeDelta,
    pub policy: MutationPolicy,
    /// Cap on in-flight card tasks; 0 means unbounded.
    pub max_concurrency: usize,
}

impl JanitorConfig {
    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        let key = required(raw.key, "TRELLO_KEY")?;
        let token = required(raw.token, "TRELLO_TOKEN")?;

        let archive_lists = split_list_ids(raw.archive_lists.as_deref().unwrap_or(""));
        let delete_lists = split_list_ids(raw.delete_lists.as_deref().unwrap_or(""));
        let reorder_lists = split_list_ids(raw.reorder_lists.as_deref().unwrap_or(""));
        if archive_lists.is_empty() && delete_lists.is_empty() && reorder_lists.is_empty() {
            return Err(JanitorError::Config(
                "no lists configured: set TRELLO_ARCHIVE_LIST, TRELLO_DELETE_LIST or TRELLO_REORDER_LIST"
                    .into(),
            ));
        }

        let threshold = parse_threshold_hours(
            raw.threshold_hours
                .as_deref()
                .unwrap_or(DEFAULT_THRESHOLD_HOURS),
        )?;

        if raw.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(JanitorError::Config(format!(
                "max concurrency must be at most {}, got {}",
                Semaphore::MAX_PERMITS,
                raw.max_concurrency
            )));
        }

        let api_url = raw
            .api_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            credentials: Credentials { key, token },
            api_url,
            archive_lists,
            delete_lists,
            reorder_lists,
            threshold,
            policy: MutationPolicy {
                strict: raw.strict_mutations,
                dry_run: raw.dry_run,
            },
            max_concurrency: raw.max_concurrency,
        })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(JanitorError::Config(format!("\"{name}\" is not defined"))),
    }
}

/// Split a comma-separated list of ids, dropping blanks.
pub fn split_list_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a non-negative, possibly fractional, number of hours.
pub fn parse_threshold_hours(raw: &str) -> Result<TimeDelta> {
    let hours: f64 = raw.trim().parse().map_err(|_| {
        JanitorError::Config(format!(
            "can't parse card inactivity threshold (hours): '{raw}'"
        ))
    })?;
    if !hours.is_finite() || hours < 0.0 {
        return Err(JanitorError::Config(format!(
            "card inactivity threshold must be a non-negative number of hours, got '{raw}'"
        )));
    }
    let millis = (hours * 3_600_000.0).round();
    TimeDelta::try_milliseconds(millis as i64).ok_or_else(|| {
        JanitorError::Config(format!("card inactivity threshold is out of range: '{raw}'"))
    })
}
