// src/catalog/mod.rs
pub mod client;
pub mod query;
pub mod rank;

use serde::Deserialize;

use crate::error::CatalogError;

pub use client::TmdbCatalog;
pub use query::{CatalogQuery, ViewMode};
pub use rank::{compare_for_search, rank_for_search};

/// One movie card worth of catalog data.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub original_language: String,
    pub popularity: f64,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
}

impl MovieSummary {
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| poster_url(image_base, p))
    }
}

/// `{image_base}/w500{path}`; TMDB poster paths carry their leading slash.
pub fn poster_url(image_base: &str, path: &str) -> String {
    format!("{}/w500{}", image_base.trim_end_matches('/'), path)
}

// ---- wire types ----

#[derive(Debug, Default, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub results: Option<Vec<RawMovie>>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default, rename = "Error")]
    pub error: Option<String>,
}

impl CatalogResponse {
    /// The catalog's own "this request failed" flag, independent of HTTP status.
    pub fn is_rejected(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl From<RawMovie> for MovieSummary {
    fn from(raw: RawMovie) -> Self {
        let release_date = raw.release_date.filter(|d| !d.trim().is_empty());
        let release_year = release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse::<i32>().ok());
        Self {
            id: raw.id,
            title: raw.title,
            release_date,
            release_year,
            original_language: raw.original_language,
            popularity: raw.popularity,
            vote_average: raw.vote_average,
            poster_path: raw.poster_path.filter(|p| !p.is_empty()),
        }
    }
}

/// Anything that can answer a catalog query. The real one is [`TmdbCatalog`].
pub trait MovieCatalog {
    fn fetch(&self, query: &CatalogQuery) -> Result<CatalogResponse, CatalogError>;
}

impl<C: MovieCatalog + ?Sized> MovieCatalog for &C {
    fn fetch(&self, query: &CatalogQuery) -> Result<CatalogResponse, CatalogError> {
        (**self).fetch(query)
    }
}
