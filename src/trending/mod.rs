// src/trending/mod.rs
pub mod appwrite;
pub mod sqlite;
pub mod writer;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::catalog::{poster_url, MovieSummary};
use crate::config::{AppConfig, TrendingBackendKind};
use crate::error::TrendingError;

pub use appwrite::AppwriteTrendingStore;
pub use sqlite::SqliteTrendingStore;
pub use writer::{spawn_trending_reader, spawn_trending_writer, TrendingHit};

/// A search term and how often it has been searched. Rank is the position in
/// a list ordered by `hit_count` descending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrendingEntry {
    pub document_id: String,
    pub search_term: String,
    pub hit_count: i64,
    pub movie_id: u64,
    pub poster_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTrendingEntry {
    pub search_term: String,
    pub movie_id: u64,
    pub poster_url: String,
}

/// The document-store capability: {list, get, create, increment}.
pub trait TrendingStore {
    fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, TrendingError>;
    fn find_by_term(&self, term: &str) -> Result<Option<TrendingEntry>, TrendingError>;
    fn create(&self, entry: NewTrendingEntry) -> Result<TrendingEntry, TrendingError>;
    /// Write `entry.hit_count + 1` back. Last write wins across sessions.
    fn increment(&self, entry: &TrendingEntry) -> Result<(), TrendingError>;
}

impl<S: TrendingStore + ?Sized> TrendingStore for Box<S> {
    fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, TrendingError> {
        (**self).list_top(limit)
    }
    fn find_by_term(&self, term: &str) -> Result<Option<TrendingEntry>, TrendingError> {
        (**self).find_by_term(term)
    }
    fn create(&self, entry: NewTrendingEntry) -> Result<TrendingEntry, TrendingError> {
        (**self).create(entry)
    }
    fn increment(&self, entry: &TrendingEntry) -> Result<(), TrendingError> {
        (**self).increment(entry)
    }
}

pub type BoxedTrendingStore = Box<dyn TrendingStore + Send>;

pub fn open_store(cfg: &AppConfig) -> Result<BoxedTrendingStore, TrendingError> {
    match cfg.trending_backend {
        TrendingBackendKind::Sqlite => {
            let path = cfg.trending_db_path();
            info!("Trending store: sqlite at {}", path.display());
            Ok(Box::new(SqliteTrendingStore::open(&path)?))
        }
        TrendingBackendKind::Appwrite => {
            info!("Trending store: appwrite");
            Ok(Box::new(AppwriteTrendingStore::from_settings(&cfg.appwrite)?))
        }
    }
}

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Trim and collapse internal whitespace so "leo  das" and "leo das" share a document.
pub fn normalize_term(term: &str) -> String {
    WHITESPACE_RUN.replace_all(term.trim(), " ").into_owned()
}

/// Record one search hit for `term`, creating its document on first sight.
pub fn update_search_count<S: TrendingStore + ?Sized>(
    store: &S,
    term: &str,
    top_movie: &MovieSummary,
    image_base: &str,
) -> Result<(), TrendingError> {
    let term = normalize_term(term);
    if term.is_empty() {
        return Ok(());
    }

    match store.find_by_term(&term)? {
        Some(existing) => {
            debug!("trending: `{term}` {} -> {}", existing.hit_count, existing.hit_count + 1);
            store.increment(&existing)
        }
        None => {
            let poster = top_movie
                .poster_path
                .as_deref()
                .map(|p| poster_url(image_base, p))
                .unwrap_or_default();
            let created = store.create(NewTrendingEntry {
                search_term: term,
                movie_id: top_movie.id,
                poster_url: poster,
            })?;
            debug!("trending: created `{}` ({})", created.search_term, created.document_id);
            Ok(())
        }
    }
}

/// Top-N trending entries; any store failure is logged and yields an empty list.
pub fn get_trending_movies<S: TrendingStore + ?Sized>(store: &S, limit: usize) -> Vec<TrendingEntry> {
    match store.list_top(limit) {
        Ok(list) => list,
        Err(e) => {
            warn!("Error fetching trending movies: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory store for workflow tests.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub docs: RefCell<Vec<TrendingEntry>>,
        pub fail: bool,
    }

    impl TrendingStore for MemoryStore {
        fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>, TrendingError> {
            if self.fail {
                return Err(TrendingError::Http("offline".into()));
            }
            let mut v = self.docs.borrow().clone();
            v.sort_by(|a, b| b.hit_count.cmp(&a.hit_count));
            v.truncate(limit);
            Ok(v)
        }
        fn find_by_term(&self, term: &str) -> Result<Option<TrendingEntry>, TrendingError> {
            Ok(self
                .docs
                .borrow()
                .iter()
                .find(|d| d.search_term == term)
                .cloned())
        }
        fn create(&self, entry: NewTrendingEntry) -> Result<TrendingEntry, TrendingError> {
            let doc = TrendingEntry {
                document_id: format!("doc{}", self.docs.borrow().len() + 1),
                search_term: entry.search_term,
                hit_count: 1,
                movie_id: entry.movie_id,
                poster_url: entry.poster_url,
            };
            self.docs.borrow_mut().push(doc.clone());
            Ok(doc)
        }
        fn increment(&self, entry: &TrendingEntry) -> Result<(), TrendingError> {
            let mut docs = self.docs.borrow_mut();
            if let Some(d) = docs.iter_mut().find(|d| d.document_id == entry.document_id) {
                d.hit_count = entry.hit_count + 1;
            }
            Ok(())
        }
    }

    pub(crate) fn movie(id: u64, poster: Option<&str>) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("movie {id}"),
            release_date: None,
            release_year: None,
            original_language: "ta".into(),
            popularity: 1.0,
            vote_average: None,
            poster_path: poster.map(str::to_string),
        }
    }

    #[test]
    fn first_hit_creates_then_increments() {
        let store = MemoryStore::default();
        let base = "https://image.tmdb.org/t/p";

        update_search_count(&store, "Leo", &movie(7, Some("/leo.jpg")), base).unwrap();
        {
            let docs = store.docs.borrow();
            assert_eq!(docs.len(), 1);
            assert_eq!(docs[0].hit_count, 1);
            assert_eq!(docs[0].movie_id, 7);
            assert_eq!(docs[0].poster_url, "https://image.tmdb.org/t/p/w500/leo.jpg");
        }

        update_search_count(&store, " Leo ", &movie(99, None), base).unwrap();
        let docs = store.docs.borrow();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].hit_count, 2);
        // first-sight poster and movie are kept
        assert_eq!(docs[0].movie_id, 7);
    }

    #[test]
    fn blank_terms_are_ignored() {
        let store = MemoryStore::default();
        update_search_count(&store, "   ", &movie(1, None), "x").unwrap();
        assert!(store.docs.borrow().is_empty());
    }

    #[test]
    fn normalizes_whitespace_runs() {
        assert_eq!(normalize_term("  vikram \t  vedha "), "vikram vedha");
    }

    #[test]
    fn read_failure_yields_empty_list() {
        let store = MemoryStore {
            fail: true,
            ..Default::default()
        };
        assert!(get_trending_movies(&store, 5).is_empty());
    }

    #[test]
    fn read_returns_most_searched_first() {
        let store = MemoryStore::default();
        for (term, times) in [("a", 1), ("b", 3), ("c", 2)] {
            for _ in 0..times {
                update_search_count(&store, term, &movie(1, None), "x").unwrap();
            }
        }
        let top: Vec<String> = get_trending_movies(&store, 2)
            .into_iter()
            .map(|e| e.search_term)
            .collect();
        assert_eq!(top, vec!["b", "c"]);
    }
}
