// src/app/types.rs
use eframe::egui::TextureHandle;
use std::path::PathBuf;

use crate::finder::FetchOutcome;

// ---- cross-thread messages ----
pub struct FetchDone {
    pub request_id: u64,
    pub outcome: FetchOutcome,
}

/// (cache key, url)
pub type WorkItem = (String, String);

pub struct PosterDone {
    pub key: String,
    pub result: Result<PathBuf, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PosterState {
    Pending, // queued or downloading
    Cached,  // file on disk, texture not uploaded yet
    Ready,   // texture uploaded
    Failed,  // give up for this session
}

impl PosterState {
    /// Only work a worker still owes us. `Cached` waits on a draw, not a download.
    pub fn is_in_flight(self) -> bool {
        self == Self::Pending
    }
}

pub struct PosterSlot {
    pub state: PosterState,
    pub path: Option<PathBuf>,
    pub tex: Option<TextureHandle>, // UI thread only
}

/// Slots still waiting on a download worker.
pub fn count_in_flight<'a>(slots: impl IntoIterator<Item = &'a PosterSlot>) -> usize {
    slots.into_iter().filter(|s| s.state.is_in_flight()).count()
}
