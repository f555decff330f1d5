// src/catalog/rank.rs
use std::cmp::Ordering;

use super::MovieSummary;

/// Search ordering: target-language titles first, then by popularity (high to low).
///
/// Non-matching languages are kept, only ranked lower. Popularity uses
/// `f64::total_cmp` so the comparator stays a total order even with NaN.
pub fn compare_for_search(a: &MovieSummary, b: &MovieSummary, target_language: &str) -> Ordering {
    let a_match = a.original_language == target_language;
    let b_match = b.original_language == target_language;
    b_match
        .cmp(&a_match)
        .then_with(|| b.popularity.total_cmp(&a.popularity))
}

pub fn rank_for_search(movies: &mut [MovieSummary], target_language: &str) {
    movies.sort_by(|a, b| compare_for_search(a, b, target_language));
}
