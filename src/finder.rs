//! Fetch-and-rank: turn a (term, mode) pair into a movie list.
//!
//! Builds the catalog query, fetches it, ranks search results, and hands the
//! top search hit to the trending writer. Nothing here blocks on the trending
//! store; the hit is a channel send that may silently go nowhere.

use std::sync::mpsc::Sender;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, warn};

use crate::catalog::{rank_for_search, CatalogQuery, MovieCatalog, MovieSummary, ViewMode};
use crate::config::DiscoverSettings;
use crate::trending::TrendingHit;

pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch movies. Please try again later.";

/// What a finished fetch does to the visible list.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    /// Replace the list.
    Loaded(Vec<MovieSummary>),
    /// The catalog answered but flagged the request as failed: clear the list.
    Rejected(String),
    /// Network/status/decode failure: keep whatever was shown before.
    Failed(String),
}

impl FetchOutcome {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Loaded(_) => None,
            Self::Rejected(msg) | Self::Failed(msg) => Some(msg),
        }
    }
}

pub struct MovieFinder<C> {
    catalog: C,
    settings: DiscoverSettings,
    hits: Option<Sender<TrendingHit>>,
}

impl<C: MovieCatalog> MovieFinder<C> {
    pub fn new(catalog: C, settings: DiscoverSettings) -> Self {
        Self {
            catalog,
            settings,
            hits: None,
        }
    }

    pub fn with_trending(mut self, hits: Sender<TrendingHit>) -> Self {
        self.hits = Some(hits);
        self
    }

    pub fn fetch_movies(&self, term: &str, mode: ViewMode) -> FetchOutcome {
        self.fetch_movies_on(term, mode, Utc::now().date_naive())
    }

    /// Same as [`fetch_movies`](Self::fetch_movies) with an explicit "today" for the upcoming window.
    pub fn fetch_movies_on(&self, term: &str, mode: ViewMode, today: NaiveDate) -> FetchOutcome {
        let query = CatalogQuery::build(term, mode, &self.settings, today);

        let resp = match self.catalog.fetch(&query) {
            Ok(resp) => resp,
            Err(e) => {
                error!("Error fetching movies: {e}");
                return FetchOutcome::Failed(GENERIC_FETCH_ERROR.into());
            }
        };

        if resp.is_rejected() {
            let msg = resp
                .error
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FETCH_ERROR.into());
            warn!("catalog rejected request: {msg}");
            return FetchOutcome::Rejected(msg);
        }

        let mut movies: Vec<MovieSummary> = resp
            .results
            .unwrap_or_default()
            .into_iter()
            .map(MovieSummary::from)
            .collect();

        if query.is_search() {
            rank_for_search(&mut movies, &self.settings.target_language);
            if let Some(top) = movies.first() {
                self.report_hit(term.trim(), top);
            }
        }

        debug!("fetched {} movies ({:?})", movies.len(), query.kind);
        FetchOutcome::Loaded(movies)
    }

    fn report_hit(&self, term: &str, top: &MovieSummary) {
        let Some(tx) = &self.hits else { return };
        let hit = TrendingHit {
            term: term.to_string(),
            top_movie: top.clone(),
        };
        if tx.send(hit).is_err() {
            debug!("trending writer gone; dropping hit for `{term}`");
        }
    }
}
