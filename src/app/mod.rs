// src/app/mod.rs: debounced search, fetch threads, trending strip and poster cache

// ---- Standard lib imports ----
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ---- Crates ----
use eframe::egui as eg;
use tracing::{error, info};

// ---- Local modules ----
pub mod cache;
pub mod debounce;
pub mod fetch;
pub mod gfx;
pub mod prefetch;
pub mod prefs;
pub mod state;
pub mod types;
pub mod ui;

use crate::catalog::TmdbCatalog;
use crate::config::AppConfig;
use crate::finder::MovieFinder;
use crate::trending::{spawn_trending_reader, spawn_trending_writer, TrendingEntry};
use cache::PosterCache;
use debounce::Debouncer;
use state::ViewState;
use types::{FetchDone, PosterDone, PosterSlot, WorkItem};

// ---- Tunables ----
const MAX_DONE_PER_FRAME: usize = 12;
const MAX_UPLOADS_PER_FRAME: usize = 4;
const IDLE_REPAINT_MS: u64 = 250;
const BUSY_REPAINT_MS: u64 = 50;

pub struct MovieApp {
    cfg: AppConfig,

    // data
    state: ViewState,
    debouncer: Debouncer,

    // fetch plumbing
    finder: Option<Arc<MovieFinder<TmdbCatalog>>>,
    fetch_tx: Sender<FetchDone>,
    fetch_rx: Receiver<FetchDone>,
    trending_rx: Option<Receiver<Vec<TrendingEntry>>>,

    // posters
    cache: PosterCache,
    posters: HashMap<String, PosterSlot>,
    work_tx: Option<Sender<WorkItem>>,
    done_rx: Option<Receiver<PosterDone>>,

    // ui
    poster_width_ui: f32,
    prefs_dirty: bool,
    prefs_last_write: Instant,

    // one-time init guard
    did_init: bool,
}

impl MovieApp {
    pub fn new(cfg: AppConfig) -> Self {
        let cache = PosterCache::from_config(&cfg);
        let prefs = prefs::load_prefs(&cache.root().join("ui_prefs.txt"));

        let hits = spawn_trending_writer(&cfg);
        let finder = match TmdbCatalog::from_config(&cfg) {
            Ok(catalog) => Some(Arc::new(
                MovieFinder::new(catalog, cfg.discover.clone()).with_trending(hits),
            )),
            Err(e) => {
                error!("catalog client unavailable: {e}");
                None
            }
        };

        let (fetch_tx, fetch_rx) = mpsc::channel::<FetchDone>();
        let (trending_tx, trending_rx) = mpsc::channel::<Vec<TrendingEntry>>();
        spawn_trending_reader(&cfg, trending_tx);

        info!("Poster cache at {}", cache.root().display());

        Self {
            state: ViewState::new(prefs.view_mode, cfg.discard_stale_responses),
            debouncer: Debouncer::new(Duration::from_millis(cfg.debounce_ms)),
            finder,
            fetch_tx,
            fetch_rx,
            trending_rx: Some(trending_rx),
            cache,
            posters: HashMap::new(),
            work_tx: None,
            done_rx: None,
            poster_width_ui: prefs.poster_w,
            prefs_dirty: false,
            prefs_last_write: Instant::now(),
            did_init: false,
            cfg,
        }
    }

    /// Raw search box edit: restart the quiet window.
    pub(crate) fn on_search_edited(&mut self) {
        self.debouncer.input(&self.state.search_term, Instant::now());
    }

    /// Promote a settled search term and fetch for it.
    fn drive_debounce(&mut self, ctx: &eg::Context) {
        let now = Instant::now();
        if let Some(term) = self.debouncer.poll(now) {
            self.state.debounced_term = term;
            self.start_fetch();
            ctx.request_repaint();
        } else if let Some(left) = self.debouncer.remaining(now) {
            ctx.request_repaint_after(left);
        }
    }

    pub(crate) fn set_mode(&mut self, mode: crate::catalog::ViewMode) {
        if self.state.mode == mode {
            return;
        }
        self.state.mode = mode;
        self.mark_dirty();
        self.start_fetch();
    }
}

impl eframe::App for MovieApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        // First frame
        if !self.did_init {
            self.did_init = true;
            self.start_poster_workers();
            self.start_fetch();
        }

        self.poll_trending(ctx);
        self.poll_fetches(ctx);
        self.poll_posters_done(ctx);
        self.drive_debounce(ctx);

        eg::CentralPanel::default().show(ctx, |ui| {
            self.ui_render_main(ui, ctx);
        });

        self.maybe_save_prefs();

        let busy = self.state.is_loading || self.posters_in_flight() > 0 || self.prefs_dirty;
        ctx.request_repaint_after(Duration::from_millis(if busy {
            BUSY_REPAINT_MS
        } else {
            IDLE_REPAINT_MS
        }));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.prefs_dirty {
            self.save_prefs();
        }
    }
}
