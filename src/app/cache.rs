// src/app/cache.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::config::{resolve_relative_path, AppConfig};

const POSTER_RETENTION_DAYS: u64 = 14;
const POSTER_RETENTION_SECS: u64 = POSTER_RETENTION_DAYS * 24 * 60 * 60;

pub const RESIZE_MAX_W: u32 = 320;
pub const RESIZE_QUALITY: u8 = 75;

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

/// On-disk poster store. Cheap to clone into worker threads.
#[derive(Clone, Debug)]
pub struct PosterCache {
    root: PathBuf,
    posters: PathBuf,
}

impl PosterCache {
    pub fn from_config(cfg: &AppConfig) -> Self {
        let root = cfg
            .cache_dir
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(resolve_relative_path(".reelfind_cache")));
        let cache = Self::open(root);
        match cache.prune_older_than(Duration::from_secs(POSTER_RETENTION_SECS)) {
            Ok(0) => {}
            Ok(n) => info!("poster cache: pruned {n} stale files"),
            Err(err) => warn!("poster cache prune failed: {err}"),
        }
        cache
    }

    pub fn open(root: PathBuf) -> Self {
        let mut posters = root.join("posters");
        if let Err(e) = fs::create_dir_all(&posters) {
            warn!("failed to create poster cache dir {}: {e}", posters.display());
            posters = root.clone();
            let _ = fs::create_dir_all(&posters);
        }
        Self { root, posters }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn poster_path(&self, key: &str) -> PathBuf {
        self.posters.join(format!("{key}.jpg"))
    }

    pub fn find_by_key(&self, key: &str) -> Option<PathBuf> {
        let p = self.poster_path(key);
        p.exists().then_some(p)
    }

    /// Download, shrink to `RESIZE_MAX_W`, store as JPEG. Returns the cached path.
    pub fn download_resized(&self, client: &Client, url: &str, key: &str) -> Result<PathBuf, String> {
        if let Some(hit) = self.find_by_key(key) {
            return Ok(hit);
        }
        let bytes = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(|e| format!("download {url}: {e}"))?;
        self.store_resized(&bytes, key, RESIZE_MAX_W, RESIZE_QUALITY)
    }

    pub fn store_resized(
        &self,
        bytes: &[u8],
        key: &str,
        max_width: u32,
        quality: u8,
    ) -> Result<PathBuf, String> {
        let img = image::load_from_memory(bytes).map_err(|e| format!("decode: {e}"))?;

        let (w, h) = img.dimensions();
        let out: DynamicImage = if w > max_width {
            let new_h = ((h as f32) * (max_width as f32 / w as f32))
                .round()
                .max(1.0) as u32;
            img.resize_exact(max_width, new_h, FilterType::CatmullRom)
        } else {
            img
        };

        // JPEG has no alpha channel
        let rgb = out.to_rgb8();
        let mut jpeg_bytes: Vec<u8> = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, quality)
            .encode_image(&rgb)
            .map_err(|e| format!("jpeg encode: {e}"))?;

        let dest = self.poster_path(key);
        let tmp = dest.with_extension("jpg.part");
        {
            let mut f = fs::File::create(&tmp).map_err(|e| format!("create tmp: {e}"))?;
            f.write_all(&jpeg_bytes).map_err(|e| format!("write: {e}"))?;
        }
        fs::rename(&tmp, &dest).map_err(|e| format!("rename: {e}"))?;
        Ok(dest)
    }

    /// Remove poster files (and leftover `.part` files) last modified before `max_age` ago.
    pub fn prune_older_than(&self, max_age: Duration) -> std::io::Result<usize> {
        let cutoff = SystemTime::now()
            .checked_sub(max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let mut removed = 0usize;
        for entry in fs::read_dir(&self.posters)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_ascii_lowercase());
            if !matches!(ext.as_deref(), Some("jpg" | "part")) {
                continue;
            }
            let modified = entry
                .metadata()?
                .modified()
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if modified < cutoff {
                let _ = fs::remove_file(&path);
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// (width, height, RGBA8 bytes) of a cached poster.
pub fn load_rgba(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    let img = image::ImageReader::open(path)
        .map_err(|e| format!("open image {}: {e}", path.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", path.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", path.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([200, 40, 40, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn cache_key_is_md5_hex() {
        let key = url_to_cache_key("https://image.tmdb.org/t/p/w500/a.jpg");
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, url_to_cache_key("https://image.tmdb.org/t/p/w500/a.jpg"));
        assert_ne!(key, url_to_cache_key("https://image.tmdb.org/t/p/w500/b.jpg"));
    }

    #[test]
    fn wide_posters_are_shrunk_and_found_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PosterCache::open(dir.path().to_path_buf());
        assert!(cache.find_by_key("k1").is_none());

        let path = cache.store_resized(&png_bytes(640, 960), "k1", 320, 75).unwrap();
        assert_eq!(cache.find_by_key("k1"), Some(path.clone()));

        let (w, h, rgba) = load_rgba(&path).unwrap();
        assert_eq!((w, h), (320, 480));
        assert_eq!(rgba.len(), (320 * 480 * 4) as usize);
    }

    #[test]
    fn small_posters_keep_their_size() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PosterCache::open(dir.path().to_path_buf());
        let path = cache.store_resized(&png_bytes(100, 150), "k2", 320, 75).unwrap();
        let (w, h, _) = load_rgba(&path).unwrap();
        assert_eq!((w, h), (100, 150));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PosterCache::open(dir.path().to_path_buf());
        assert!(cache.store_resized(b"not an image", "bad", 320, 75).is_err());
        assert!(cache.find_by_key("bad").is_none());
    }

    #[test]
    fn prune_removes_only_old_posters() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PosterCache::open(dir.path().to_path_buf());
        let old = cache.store_resized(&png_bytes(10, 15), "old", 320, 75).unwrap();
        let fresh = cache.store_resized(&png_bytes(10, 15), "fresh", 320, 75).unwrap();

        let month_ago = SystemTime::now() - Duration::from_secs(30 * 24 * 3600);
        fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(month_ago)
            .unwrap();

        let removed = cache
            .prune_older_than(Duration::from_secs(POSTER_RETENTION_SECS))
            .unwrap();
        assert_eq!(removed, 1);
        assert!(!old.exists());
        assert!(fresh.exists());
    }
}
