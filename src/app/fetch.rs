// src/app/fetch.rs
use std::sync::mpsc::TryRecvError;
use std::sync::Arc;

use eframe::egui as eg;
use tracing::{debug, info, warn};

use super::types::FetchDone;
use crate::finder::{FetchOutcome, GENERIC_FETCH_ERROR};

impl crate::app::MovieApp {
    /// Fire a fetch for the current (debounced term, mode). Not queued, not cancelled.
    pub(crate) fn start_fetch(&mut self) {
        let request_id = self.state.begin_fetch();
        let term = self.state.debounced_term.clone();
        let mode = self.state.mode;

        let Some(finder) = self.finder.as_ref().map(Arc::clone) else {
            self.state
                .apply(request_id, FetchOutcome::Failed(GENERIC_FETCH_ERROR.into()));
            return;
        };

        debug!("fetch #{request_id}: term={term:?} mode={}", mode.as_str());
        let tx = self.fetch_tx.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("fetch-{request_id}"))
            .spawn(move || {
                let outcome = finder.fetch_movies(&term, mode);
                let _ = tx.send(FetchDone {
                    request_id,
                    outcome,
                });
            });
        if let Err(e) = spawned {
            warn!("failed to spawn fetch thread: {e}");
            self.state
                .apply(request_id, FetchOutcome::Failed(GENERIC_FETCH_ERROR.into()));
        }
    }

    /// Apply every finished fetch in arrival order.
    pub(crate) fn poll_fetches(&mut self, ctx: &eg::Context) {
        let mut applied = false;
        loop {
            match self.fetch_rx.try_recv() {
                Ok(done) => {
                    if self.state.apply(done.request_id, done.outcome) {
                        applied = true;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if applied {
            self.queue_visible_posters();
            ctx.request_repaint();
        }
    }

    pub(crate) fn poll_trending(&mut self, ctx: &eg::Context) {
        let Some(rx) = &self.trending_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(list) => {
                info!("Loaded {} trending searches", list.len());
                self.state.trending = list;
                self.trending_rx = None;
                self.queue_visible_posters();
                ctx.request_repaint();
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.trending_rx = None,
        }
    }
}
