// src/app/prefs.rs
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::catalog::ViewMode;

pub const POSTER_W_MIN: f32 = 120.0;
pub const POSTER_W_MAX: f32 = 220.0;

#[derive(Clone, Debug, PartialEq)]
pub struct UiPrefs {
    pub view_mode: ViewMode,
    pub poster_w: f32,
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Latest,
            poster_w: 160.0,
        }
    }
}

/// `key=value` lines; unknown keys and bad values are ignored.
pub fn parse_prefs(txt: &str) -> UiPrefs {
    let mut prefs = UiPrefs::default();
    for line in txt.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        match k.trim() {
            "view_mode" => {
                if let Some(mode) = ViewMode::from_str(v.trim()) {
                    prefs.view_mode = mode;
                }
            }
            "poster_w" => {
                if let Ok(n) = v.trim().parse::<f32>() {
                    prefs.poster_w = n.clamp(POSTER_W_MIN, POSTER_W_MAX);
                }
            }
            _ => {}
        }
    }
    prefs
}

pub fn render_prefs(prefs: &UiPrefs) -> String {
    format!(
        "# reelfind ui prefs\n\
         view_mode={}\n\
         poster_w={:.1}\n",
        prefs.view_mode.as_str(),
        prefs.poster_w,
    )
}

impl crate::app::MovieApp {
    pub(crate) fn mark_dirty(&mut self) {
        self.prefs_dirty = true;
    }

    pub(crate) fn maybe_save_prefs(&mut self) {
        // debounce a bit to avoid writing every frame
        if self.prefs_dirty && self.prefs_last_write.elapsed() >= Duration::from_millis(300) {
            self.save_prefs();
            self.prefs_dirty = false;
            self.prefs_last_write = Instant::now();
        }
    }

    pub(crate) fn save_prefs(&self) {
        let prefs = UiPrefs {
            view_mode: self.state.mode,
            poster_w: self.poster_width_ui,
        };
        if let Err(e) = fs::write(self.prefs_path(), render_prefs(&prefs)) {
            warn!("failed to save ui prefs: {e}");
        }
    }

    pub(crate) fn prefs_path(&self) -> PathBuf {
        self.cache.root().join("ui_prefs.txt")
    }
}

pub fn load_prefs(path: &std::path::Path) -> UiPrefs {
    fs::read_to_string(path)
        .map(|txt| parse_prefs(&txt))
        .unwrap_or_default()
}
