// src/app/gfx.rs
use std::path::Path;

use eframe::egui::{self as eg, ColorImage, TextureHandle};

/// Posters are ~2:3; anything far off is a bad download or a placeholder image.
pub fn is_poster_aspect(w: u32, h: u32) -> bool {
    if h == 0 {
        return false;
    }
    let ar = (w as f32) / (h as f32);
    (0.55..=0.80).contains(&ar)
}

/// Load a cached poster into a GPU texture. (UI thread only)
pub fn load_poster_texture(
    ctx: &eg::Context,
    path: &Path,
    name: &str,
) -> Result<TextureHandle, String> {
    let (w, h, bytes) = crate::app::cache::load_rgba(path)?;
    if !is_poster_aspect(w, h) {
        return Err(format!("non-poster aspect {w}x{h}"));
    }
    let img = ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &bytes);
    Ok(ctx.load_texture(name.to_string(), img, eg::TextureOptions::LINEAR))
}

#[cfg(test)]
mod tests {
    use super::is_poster_aspect;

    #[test]
    fn accepts_two_by_three() {
        assert!(is_poster_aspect(320, 480));
        assert!(is_poster_aspect(500, 750));
    }

    #[test]
    fn rejects_landscape_and_empty() {
        assert!(!is_poster_aspect(1280, 720));
        assert!(!is_poster_aspect(100, 0));
        assert!(!is_poster_aspect(480, 480));
    }
}
