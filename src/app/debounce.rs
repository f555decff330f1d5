// src/app/debounce.rs
use std::time::{Duration, Instant};

/// Holds the latest raw input and releases it once input has been quiet for `window`.
///
/// Driven by the frame loop: `input` on every edit, `poll` every frame.
pub struct Debouncer {
    window: Duration,
    pending: Option<(String, Instant)>,
    current: String,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            current: String::new(),
        }
    }

    pub fn input(&mut self, text: &str, now: Instant) {
        self.pending = Some((text.to_string(), now));
    }

    /// Returns the settled value once per quiet window; unchanged values are swallowed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = matches!(&self.pending, Some((_, at)) if now.duration_since(*at) >= self.window);
        if !ready {
            return None;
        }
        let (text, _) = self.pending.take()?;
        if text == self.current {
            return None;
        }
        self.current = text.clone();
        Some(text)
    }

    /// Time left until the pending value settles, for scheduling a repaint.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.window.saturating_sub(now.duration_since(*at)))
    }
}
