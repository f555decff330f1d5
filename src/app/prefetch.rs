// src/app/prefetch.rs
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui::{self as eg, TextureHandle};
use tracing::{debug, warn};

use super::cache::url_to_cache_key;
use super::types::{count_in_flight, PosterDone, PosterSlot, PosterState, WorkItem};

impl crate::app::MovieApp {
    /// Fixed pool of download workers sharing one HTTP client. Started once.
    pub(crate) fn start_poster_workers(&mut self) {
        if self.work_tx.is_some() {
            return;
        }

        let client = match reqwest::blocking::Client::builder()
            .user_agent("reelfind/posters")
            .timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(16)
            .default_headers({
                use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
                let mut h = HeaderMap::new();
                h.insert(
                    ACCEPT,
                    HeaderValue::from_static("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5"),
                );
                h
            })
            .build()
        {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!("poster client build failed: {e}; posters disabled");
                return;
            }
        };

        let (work_tx, work_rx) = mpsc::channel::<WorkItem>();
        let (done_tx, done_rx) = mpsc::channel::<PosterDone>();
        let work_rx = Arc::new(Mutex::new(work_rx));

        for _ in 0..self.cfg.poster_workers {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = Arc::clone(&client);
            let cache = self.cache.clone();

            std::thread::spawn(move || loop {
                let job = match work_rx.lock() {
                    Ok(rx) => rx.recv(),
                    Err(_) => break,
                };
                let Ok((key, url)) = job else { break };

                let result = cache.download_resized(&client, &url, &key);
                if done_tx.send(PosterDone { key, result }).is_err() {
                    break;
                }
            });
        }

        self.work_tx = Some(work_tx);
        self.done_rx = Some(done_rx);
    }

    /// Make sure a poster is cached or queued; returns its cache key.
    pub(crate) fn request_poster(&mut self, url: &str) -> String {
        let key = url_to_cache_key(url);
        if self.posters.contains_key(&key) {
            return key;
        }

        let path = self.cache.find_by_key(&key);
        let state = if path.is_some() {
            PosterState::Cached
        } else {
            match &self.work_tx {
                Some(tx) if tx.send((key.clone(), url.to_string())).is_ok() => PosterState::Pending,
                _ => PosterState::Failed,
            }
        };
        self.posters.insert(
            key.clone(),
            PosterSlot {
                state,
                path,
                tex: None,
            },
        );
        key
    }

    /// Queue artwork for everything currently on screen.
    pub(crate) fn queue_visible_posters(&mut self) {
        let base = self.cfg.image_base_url.clone();
        let mut urls: Vec<String> = self
            .state
            .movies
            .iter()
            .filter_map(|m| m.poster_url(&base))
            .collect();
        urls.extend(
            self.state
                .trending
                .iter()
                .filter(|t| !t.poster_url.is_empty())
                .map(|t| t.poster_url.clone()),
        );
        for url in urls {
            self.request_poster(&url);
        }
    }

    /// Drain worker completions, bounded per frame.
    pub(crate) fn poll_posters_done(&mut self, ctx: &eg::Context) {
        let mut drained = 0usize;

        while drained < super::MAX_DONE_PER_FRAME {
            let Some(rx) = &self.done_rx else {
                break;
            };

            match rx.try_recv() {
                Ok(msg) => {
                    drained += 1;
                    let Some(slot) = self.posters.get_mut(&msg.key) else {
                        continue;
                    };
                    match msg.result {
                        Ok(path) => {
                            slot.path = Some(path);
                            slot.state = PosterState::Cached; // uploaded lazily during paint
                        }
                        Err(e) => {
                            debug!("poster {} failed: {e}", msg.key);
                            slot.state = PosterState::Failed;
                        }
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if drained > 0 {
            ctx.request_repaint();
        }
    }

    /// Texture for a poster key, uploading from disk if the frame budget allows.
    pub(crate) fn poster_texture(
        &mut self,
        ctx: &eg::Context,
        key: &str,
        uploads_left: &mut usize,
    ) -> Option<TextureHandle> {
        let slot = self.posters.get_mut(key)?;
        if slot.tex.is_none() && slot.state == PosterState::Cached {
            if *uploads_left == 0 {
                // on screen but over this frame's budget
                ctx.request_repaint();
                return None;
            }
            *uploads_left -= 1;
            if let Some(path) = &slot.path {
                match super::gfx::load_poster_texture(ctx, path, key) {
                    Ok(tex) => {
                        slot.tex = Some(tex);
                        slot.state = PosterState::Ready;
                    }
                    Err(e) => {
                        debug!("poster {key} unusable: {e}");
                        slot.state = PosterState::Failed;
                    }
                }
            }
        }
        slot.tex.clone()
    }

    pub(crate) fn posters_in_flight(&self) -> usize {
        count_in_flight(self.posters.values())
    }
}
