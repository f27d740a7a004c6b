use crate::error::{Error, Result};
use crate::models::RepoRef;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Repositories known for active, well-reviewed pull requests.
pub const DEFAULT_REPOSITORIES: &[(&str, &str)] = &[
    ("fastapi", "fastapi"),
    ("pallets", "flask"),
    ("django", "django"),
    ("microsoft", "playwright-python"),
    ("tiangolo", "sqlmodel"),
];

pub const CORPUS_FILE: &str = "collected_prs.json";

const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub figures_dir: PathBuf,
    /// `REQUEST_DELAY_MS` as written; only `collect` parses it.
    pub request_delay_ms: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty());

        let api_base_url = env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| "https://api.github.com".to_string());

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let figures_dir = env::var("FIGURES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("figures"));

        let request_delay_ms = env::var("REQUEST_DELAY_MS").ok();

        Self {
            github_token,
            api_base_url,
            data_dir,
            figures_dir,
            request_delay_ms,
        }
    }

    /// Defaults to 200 ms when unset.
    pub fn request_delay(&self) -> Result<Duration> {
        match self.request_delay_ms.as_deref().map(str::trim) {
            None | Some("") => Ok(DEFAULT_REQUEST_DELAY),
            Some(raw) => raw.parse().map(Duration::from_millis).map_err(|_| {
                Error::Config(format!(
                    "REQUEST_DELAY_MS must be a number of milliseconds, got '{}'",
                    raw
                ))
            }),
        }
    }

    pub fn github_token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .ok_or_else(|| Error::Config("GITHUB_TOKEN environment variable not set".to_string()))
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.data_dir.join(CORPUS_FILE)
    }

    pub fn default_repositories() -> Vec<RepoRef> {
        DEFAULT_REPOSITORIES
            .iter()
            .map(|(owner, name)| RepoRef::new(*owner, *name))
            .collect()
    }
}

/// Thresholds applied by the suitability filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub min_loc: u64,
    pub max_loc: u64,
    pub max_age_days: i64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_loc: 10,
            max_loc: 2000,
            max_age_days: 1095,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Accepted pull requests per repository.
    pub max_per_repo: usize,
    /// Pull requests examined per repository before giving up on it.
    pub examine_limit: usize,
    /// Stop visiting further repositories once this many records are collected.
    pub target_total: usize,
    pub inline_comment_limit: u32,
    pub min_review_chars: usize,
    pub request_delay: Duration,
    pub criteria: FilterCriteria,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_per_repo: 10,
            examine_limit: 100,
            target_total: 35,
            inline_comment_limit: 30,
            min_review_chars: 10,
            request_delay: DEFAULT_REQUEST_DELAY,
            criteria: FilterCriteria::default(),
        }
    }
}

impl TryFrom<&Config> for CollectorConfig {
    type Error = Error;

    fn try_from(config: &Config) -> Result<Self> {
        Ok(Self {
            request_delay: config.request_delay()?,
            ..Self::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub corpus_path: PathBuf,
    pub data_dir: PathBuf,
    pub figures_dir: PathBuf,
}

impl From<&Config> for AnalyzerConfig {
    fn from(config: &Config) -> Self {
        Self {
            corpus_path: config.corpus_path(),
            data_dir: config.data_dir.clone(),
            figures_dir: config.figures_dir.clone(),
        }
    }
}
