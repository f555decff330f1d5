// src/app/state.rs
use tracing::debug;

use crate::catalog::{MovieSummary, ViewMode};
use crate::finder::FetchOutcome;
use crate::trending::TrendingEntry;

/// Everything the main view renders from. No egui types in here.
#[derive(Debug, Default)]
pub struct ViewState {
    pub search_term: String,
    pub debounced_term: String,
    pub mode: ViewMode,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub movies: Vec<MovieSummary>,
    pub trending: Vec<TrendingEntry>,

    discard_stale: bool,
    last_issued: u64,
    newest_applied: u64,
}

impl ViewState {
    pub fn new(mode: ViewMode, discard_stale: bool) -> Self {
        Self {
            mode,
            discard_stale,
            ..Default::default()
        }
    }

    /// Mark a fetch as started and hand back its request id.
    pub fn begin_fetch(&mut self) -> u64 {
        self.is_loading = true;
        self.error_message = None;
        self.last_issued += 1;
        self.last_issued
    }

    /// Apply a finished fetch. Returns false if it was dropped as stale.
    ///
    /// Without stale-discarding, whatever completes last wins, even if it was
    /// issued first.
    pub fn apply(&mut self, request_id: u64, outcome: FetchOutcome) -> bool {
        if self.discard_stale && request_id < self.newest_applied {
            debug!("dropping stale response #{request_id} (newest #{})", self.newest_applied);
            return false;
        }
        self.newest_applied = self.newest_applied.max(request_id);
        self.is_loading = false;

        match outcome {
            FetchOutcome::Loaded(movies) => self.movies = movies,
            FetchOutcome::Rejected(msg) => {
                self.movies.clear();
                self.error_message = Some(msg);
            }
            FetchOutcome::Failed(msg) => self.error_message = Some(msg),
        }
        true
    }

    /// Latest/Upcoming only apply while no search is active.
    pub fn modes_visible(&self) -> bool {
        self.debounced_term.trim().is_empty()
    }

    #[cfg(test)]
    pub const fn last_issued(&self) -> u64 {
        self.last_issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("m{id}"),
            release_date: None,
            release_year: None,
            original_language: "ta".into(),
            popularity: 1.0,
            vote_average: None,
            poster_path: None,
        }
    }

    #[test]
    fn transport_failure_keeps_previous_movies() {
        let mut s = ViewState::new(ViewMode::Latest, false);
        let id = s.begin_fetch();
        s.apply(id, FetchOutcome::Loaded(vec![movie(1), movie(2)]));

        let id = s.begin_fetch();
        assert!(s.is_loading);
        assert!(s.error_message.is_none());
        s.apply(id, FetchOutcome::Failed("offline".into()));

        assert!(!s.is_loading);
        assert_eq!(s.movies.len(), 2);
        assert_eq!(s.error_message.as_deref(), Some("offline"));
    }

    #[test]
    fn rejection_clears_movies() {
        let mut s = ViewState::new(ViewMode::Latest, false);
        let id = s.begin_fetch();
        s.apply(id, FetchOutcome::Loaded(vec![movie(1)]));
        let id = s.begin_fetch();
        s.apply(id, FetchOutcome::Rejected("nope".into()));
        assert!(s.movies.is_empty());
        assert_eq!(s.error_message.as_deref(), Some("nope"));
    }

    #[test]
    fn last_completion_wins_by_default() {
        let mut s = ViewState::new(ViewMode::Latest, false);
        let first = s.begin_fetch();
        let second = s.begin_fetch();
        assert!(s.apply(second, FetchOutcome::Loaded(vec![movie(2)])));
        assert!(s.apply(first, FetchOutcome::Loaded(vec![movie(1)])));
        assert_eq!(s.movies[0].id, 1);
    }

    #[test]
    fn stale_completion_dropped_when_enabled() {
        let mut s = ViewState::new(ViewMode::Latest, true);
        let first = s.begin_fetch();
        let second = s.begin_fetch();
        assert!(s.apply(second, FetchOutcome::Loaded(vec![movie(2)])));
        assert!(!s.apply(first, FetchOutcome::Loaded(vec![movie(1)])));
        assert_eq!(s.movies[0].id, 2);
        assert_eq!(s.last_issued(), 2);
    }

    #[test]
    fn modes_hidden_while_searching() {
        let mut s = ViewState::new(ViewMode::Upcoming, false);
        assert!(s.modes_visible());
        s.debounced_term = "leo".into();
        assert!(!s.modes_visible());
    }
}
