// src/trending/writer.rs
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, warn};

use super::{get_trending_movies, open_store, update_search_count, TrendingEntry, TrendingStore};
use crate::catalog::MovieSummary;
use crate::config::AppConfig;

/// One successful search, reported after ranking.
#[derive(Clone, Debug)]
pub struct TrendingHit {
    pub term: String,
    pub top_movie: MovieSummary,
}

/// Drain hits into the store until every sender is gone. Write failures are logged and skipped.
pub fn run_trending_writer<S: TrendingStore + ?Sized>(
    rx: Receiver<TrendingHit>,
    store: &S,
    image_base: &str,
) -> usize {
    let mut written = 0usize;
    for hit in rx {
        match update_search_count(store, &hit.term, &hit.top_movie, image_base) {
            Ok(()) => written += 1,
            Err(e) => warn!("Error updating search count for `{}`: {e}", hit.term),
        }
    }
    written
}

/// Long-lived writer thread owning its own store handle. Nobody joins it.
pub fn spawn_trending_writer(cfg: &AppConfig) -> Sender<TrendingHit> {
    let (tx, rx) = mpsc::channel::<TrendingHit>();
    let cfg = cfg.clone();

    let spawned = std::thread::Builder::new()
        .name("trending-writer".into())
        .spawn(move || match open_store(&cfg) {
            Ok(store) => {
                let n = run_trending_writer(rx, &*store, &cfg.image_base_url);
                debug!("trending writer exiting after {n} writes");
            }
            Err(e) => {
                warn!("Trending store unavailable, search counts will not be recorded: {e}");
                // rx drops here; later sends fail and are ignored by the caller
            }
        });
    if let Err(e) = spawned {
        warn!("failed to spawn trending writer: {e}");
    }

    tx
}

/// One-shot startup read. Sends the list (possibly empty) then exits.
pub fn spawn_trending_reader(cfg: &AppConfig, tx: Sender<Vec<TrendingEntry>>) {
    let cfg = cfg.clone();
    let spawned = std::thread::Builder::new()
        .name("trending-reader".into())
        .spawn(move || {
            let list = match open_store(&cfg) {
                Ok(store) => get_trending_movies(&*store, cfg.trending_limit),
                Err(e) => {
                    warn!("Error fetching trending movies: {e}");
                    Vec::new()
                }
            };
            let _ = tx.send(list);
        });
    if let Err(e) = spawned {
        warn!("failed to spawn trending reader: {e}");
    }
}
