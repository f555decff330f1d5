// src/catalog/client.rs
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::debug;

use super::{CatalogQuery, CatalogResponse, MovieCatalog};
use crate::config::AppConfig;
use crate::error::CatalogError;

/// TMDB v3 over a shared blocking client. Bearer token auth, JSON only.
#[derive(Clone)]
pub struct TmdbCatalog {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl TmdbCatalog {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent("reelfind/catalog")
            .default_headers({
                let mut h = HeaderMap::new();
                h.insert(ACCEPT, HeaderValue::from_static("application/json"));
                h
            })
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(cfg.api_base_url.clone(), cfg.api_token.clone())
    }
}

impl MovieCatalog for TmdbCatalog {
    fn fetch(&self, query: &CatalogQuery) -> Result<CatalogResponse, CatalogError> {
        let token = self.token.as_deref().ok_or(CatalogError::MissingToken)?;
        let url = query.to_url(&self.base_url);
        debug!("GET {}{}", self.base_url, query.path);

        let resp = self.client.get(&url).bearer_auth(token).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status(
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.as_str().to_string()),
            ));
        }

        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}
