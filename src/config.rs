use std::{env, fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const LOCAL_DB_DIR: &str = "db";
pub const LOCAL_TRENDING_DB_FILE: &str = "trending.db";

pub const TMDB_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

pub const ENV_TMDB_TOKEN: &str = "TMDB_API_TOKEN";
pub const ENV_TMDB_TOKEN_ALT: &str = "TMDB_API_KEY";
pub const ENV_APPWRITE_KEY: &str = "APPWRITE_API_KEY";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrendingBackendKind {
    #[default]
    Sqlite,
    Appwrite,
}

impl TrendingBackendKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "sqlite" | "local" => Some(Self::Sqlite),
            "appwrite" | "remote" => Some(Self::Appwrite),
            _ => None,
        }
    }
}

/// Fixed knobs for the discover queries and the search ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscoverSettings {
    pub target_language: String,
    pub region: String,
    pub latest_release_from: String,
    pub latest_release_to: String,
    pub latest_min_votes: u32,
    pub search_language: String,
}

impl Default for DiscoverSettings {
    fn default() -> Self {
        Self {
            target_language: "ta".into(),
            region: "IN".into(),
            latest_release_from: "2024-01-01".into(),
            latest_release_to: "2025-06-13".into(),
            latest_min_votes: 10,
            search_language: "en-US".into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppwriteSettings {
    pub endpoint: Option<String>,
    pub project_id: Option<String>,
    pub database_id: Option<String>,
    pub collection_id: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cache_dir: Option<String>,
    pub api_base_url: String,
    pub image_base_url: String,
    pub api_token: Option<String>,
    pub discover: DiscoverSettings,
    pub debounce_ms: u64,
    pub trending_limit: usize,
    pub trending_backend: TrendingBackendKind,
    pub trending_db_path: Option<String>,
    pub appwrite: AppwriteSettings,
    pub discard_stale_responses: bool,
    pub poster_workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            api_base_url: TMDB_API_BASE_URL.into(),
            image_base_url: TMDB_IMAGE_BASE_URL.into(),
            api_token: None,
            discover: DiscoverSettings::default(),
            debounce_ms: 700,
            trending_limit: 5,
            trending_backend: TrendingBackendKind::default(),
            trending_db_path: None,
            appwrite: AppwriteSettings::default(),
            discard_stale_responses: false,
            poster_workers: 8,
        }
    }
}

impl AppConfig {
    pub fn trending_db_path(&self) -> PathBuf {
        self.trending_db_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(local_trending_db_path)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    cache_dir: Option<String>,
    api_base_url: Option<String>,
    image_base_url: Option<String>,
    #[serde(alias = "tmdb_api_key")]
    api_token: Option<String>,
    target_language: Option<String>,
    region: Option<String>,
    latest_release_from: Option<String>,
    latest_release_to: Option<String>,
    latest_min_votes: Option<u32>,
    search_language: Option<String>,
    debounce_ms: Option<u64>,
    trending_limit: Option<usize>,
    trending_backend: Option<String>,
    trending_db_path: Option<String>,
    appwrite_endpoint: Option<String>,
    appwrite_project_id: Option<String>,
    appwrite_database_id: Option<String>,
    appwrite_collection_id: Option<String>,
    discard_stale_responses: Option<bool>,
    poster_workers: Option<usize>,
}

pub fn load_config() -> AppConfig {
    let cfg_path = PathBuf::from("config.json");

    let mut cfg = match fs::read_to_string(&cfg_path) {
        Ok(raw) => match parse_config(&raw) {
            Ok(parsed) => {
                info!("Loaded config from {}", cfg_path.display());
                parsed
            }
            Err(err) => {
                warn!("Failed to parse config.json ({}). Using defaults.", err);
                AppConfig::default()
            }
        },
        Err(_) => {
            info!("No config.json found; using defaults");
            AppConfig::default()
        }
    };

    apply_env_overrides(&mut cfg);
    if cfg.api_token.is_none() {
        warn!("No TMDB token configured; set {ENV_TMDB_TOKEN} or `api_token` in config.json.");
    }
    cfg
}

pub fn parse_config(raw: &str) -> Result<AppConfig, serde_json::Error> {
    let parsed: RawConfig = serde_json::from_str(raw)?;
    let mut cfg = AppConfig::default();

    if parsed.cache_dir.is_some() {
        cfg.cache_dir = parsed.cache_dir;
    }
    if let Some(url) = parsed.api_base_url {
        cfg.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(url) = parsed.image_base_url {
        cfg.image_base_url = url.trim_end_matches('/').to_string();
    }
    if parsed.api_token.is_some() {
        cfg.api_token = parsed.api_token;
    }
    if let Some(lang) = parsed.target_language {
        cfg.discover.target_language = lang;
    }
    if let Some(region) = parsed.region {
        cfg.discover.region = region;
    }
    if let Some(from) = parsed.latest_release_from {
        cfg.discover.latest_release_from = from;
    }
    if let Some(to) = parsed.latest_release_to {
        cfg.discover.latest_release_to = to;
    }
    if let Some(votes) = parsed.latest_min_votes {
        cfg.discover.latest_min_votes = votes;
    }
    if let Some(lang) = parsed.search_language {
        cfg.discover.search_language = lang;
    }
    if let Some(ms) = parsed.debounce_ms {
        cfg.debounce_ms = ms;
    }
    if let Some(n) = parsed.trending_limit {
        cfg.trending_limit = n.clamp(1, 50);
    }
    if let Some(kind) = parsed.trending_backend {
        match TrendingBackendKind::from_str(&kind) {
            Some(k) => cfg.trending_backend = k,
            None => warn!(
                "Unknown trending_backend `{kind}` in config.json; falling back to sqlite."
            ),
        }
    }
    if parsed.trending_db_path.is_some() {
        cfg.trending_db_path = parsed.trending_db_path;
    }
    cfg.appwrite.endpoint = parsed
        .appwrite_endpoint
        .map(|e| e.trim_end_matches('/').to_string());
    cfg.appwrite.project_id = parsed.appwrite_project_id;
    cfg.appwrite.database_id = parsed.appwrite_database_id;
    cfg.appwrite.collection_id = parsed.appwrite_collection_id;
    if let Some(flag) = parsed.discard_stale_responses {
        cfg.discard_stale_responses = flag;
    }
    if let Some(n) = parsed.poster_workers {
        cfg.poster_workers = n.clamp(1, 32);
    }

    Ok(cfg)
}

fn apply_env_overrides(cfg: &mut AppConfig) {
    let token = env::var(ENV_TMDB_TOKEN)
        .or_else(|_| env::var(ENV_TMDB_TOKEN_ALT))
        .ok()
        .filter(|t| !t.trim().is_empty());
    if token.is_some() {
        cfg.api_token = token;
    }
    if let Ok(key) = env::var(ENV_APPWRITE_KEY) {
        if !key.trim().is_empty() {
            cfg.appwrite.api_key = Some(key);
        }
    }
}

/// Resolve a path relative to the working directory.
pub fn resolve_relative_path(rel: &str) -> String {
    env::current_dir()
        .map(|d| d.join(rel))
        .unwrap_or_else(|_| PathBuf::from(rel))
        .to_string_lossy()
        .into_owned()
}

pub fn local_trending_db_path() -> PathBuf {
    PathBuf::from(LOCAL_DB_DIR).join(LOCAL_TRENDING_DB_FILE)
}
