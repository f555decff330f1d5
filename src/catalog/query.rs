// src/catalog/query.rs
use chrono::{Months, NaiveDate};
use itertools::Itertools;

use crate::config::DiscoverSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Latest,
    Upcoming,
}

impl ViewMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Upcoming => "upcoming",
        }
    }
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "latest" => Some(Self::Latest),
            "upcoming" => Some(Self::Upcoming),
            _ => None,
        }
    }
    pub const fn label(self) -> &'static str {
        match self {
            Self::Latest => "Latest Movies",
            Self::Upcoming => "Upcoming Movies",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind {
    Search,
    Discover,
}

/// A fully built catalog request: endpoint path plus ordered query parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogQuery {
    pub kind: QueryKind,
    pub path: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl CatalogQuery {
    /// Pick the query for a (term, mode) pair. A non-blank term always wins over the mode.
    ///
    /// Blank includes whitespace-only: "   " browses by mode instead of searching.
    pub fn build(term: &str, mode: ViewMode, settings: &DiscoverSettings, today: NaiveDate) -> Self {
        let term = term.trim();
        if !term.is_empty() {
            return Self::search(term, settings);
        }
        match mode {
            ViewMode::Latest => Self::latest(settings),
            ViewMode::Upcoming => Self::upcoming(settings, today),
        }
    }

    pub fn search(term: &str, settings: &DiscoverSettings) -> Self {
        Self {
            kind: QueryKind::Search,
            path: "/search/movie",
            params: vec![
                ("query", term.to_string()),
                ("include_adult", "false".into()),
                ("language", settings.search_language.clone()),
            ],
        }
    }

    pub fn latest(settings: &DiscoverSettings) -> Self {
        Self {
            kind: QueryKind::Discover,
            path: "/discover/movie",
            params: vec![
                ("sort_by", "popularity.desc".into()),
                ("with_original_language", settings.target_language.clone()),
                ("primary_release_date.gte", settings.latest_release_from.clone()),
                ("release_date.lte", settings.latest_release_to.clone()),
                ("vote_count.gte", settings.latest_min_votes.to_string()),
                ("region", settings.region.clone()),
            ],
        }
    }

    pub fn upcoming(settings: &DiscoverSettings, today: NaiveDate) -> Self {
        Self {
            kind: QueryKind::Discover,
            path: "/discover/movie",
            params: vec![
                ("with_original_language", settings.target_language.clone()),
                ("sort_by", "release_date.desc".into()),
                (
                    "primary_release_date.gte",
                    one_month_before(today).format("%Y-%m-%d").to_string(),
                ),
            ],
        }
    }

    pub const fn is_search(&self) -> bool {
        matches!(self.kind, QueryKind::Search)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_url(&self, base: &str) -> String {
        let qs = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .join("&");
        format!("{}{}?{}", base.trim_end_matches('/'), self.path, qs)
    }
}

/// Calendar month back; day clamps to the end of a shorter month (Mar 31 -> Feb 28/29).
pub fn one_month_before(today: NaiveDate) -> NaiveDate {
    today.checked_sub_months(Months::new(1)).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn search_wins_over_mode_and_encodes_term() {
        let s = DiscoverSettings::default();
        let q = CatalogQuery::build("  Jai Bhim & co ", ViewMode::Upcoming, &s, day(2025, 6, 1));
        assert!(q.is_search());
        assert_eq!(q.param("query"), Some("Jai Bhim & co"));
        assert_eq!(
            q.to_url("https://api.themoviedb.org/3"),
            "https://api.themoviedb.org/3/search/movie?query=Jai%20Bhim%20%26%20co&include_adult=false&language=en-US"
        );
    }

    #[test]
    fn blank_term_falls_back_to_mode() {
        let s = DiscoverSettings::default();
        let q = CatalogQuery::build("   ", ViewMode::Latest, &s, day(2025, 6, 1));
        assert_eq!(q, CatalogQuery::latest(&s));
    }

    #[test]
    fn latest_url_matches_fixed_window() {
        let s = DiscoverSettings::default();
        assert_eq!(
            CatalogQuery::latest(&s).to_url("https://api.themoviedb.org/3/"),
            "https://api.themoviedb.org/3/discover/movie?sort_by=popularity.desc&with_original_language=ta&primary_release_date.gte=2024-01-01&release_date.lte=2025-06-13&vote_count.gte=10&region=IN"
        );
    }

    #[test]
    fn latest_and_upcoming_differ_in_sort_and_dates() {
        let s = DiscoverSettings::default();
        let latest = CatalogQuery::build("", ViewMode::Latest, &s, day(2025, 6, 15));
        let upcoming = CatalogQuery::build("", ViewMode::Upcoming, &s, day(2025, 6, 15));

        assert_eq!(latest.path, upcoming.path);
        assert_eq!(
            latest.param("with_original_language"),
            upcoming.param("with_original_language")
        );
        assert_eq!(latest.param("sort_by"), Some("popularity.desc"));
        assert_eq!(upcoming.param("sort_by"), Some("release_date.desc"));
        assert_eq!(latest.param("primary_release_date.gte"), Some("2024-01-01"));
        assert_eq!(upcoming.param("primary_release_date.gte"), Some("2025-05-15"));
        assert_eq!(upcoming.param("release_date.lte"), None);
        assert_eq!(upcoming.param("vote_count.gte"), None);
        assert_eq!(upcoming.param("region"), None);
    }

    #[test]
    fn month_back_clamps_short_months() {
        assert_eq!(one_month_before(day(2025, 3, 31)), day(2025, 2, 28));
        assert_eq!(one_month_before(day(2024, 3, 31)), day(2024, 2, 29));
        assert_eq!(one_month_before(day(2025, 1, 10)), day(2024, 12, 10));
    }

    #[test]
    fn view_mode_round_trips_through_prefs_strings() {
        for mode in [ViewMode::Latest, ViewMode::Upcoming] {
            assert_eq!(ViewMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(ViewMode::from_str("popular"), None);
    }
}
