//! Bounded on-disk cache of game cover art
//!
//! One `<appid>.jpg` per game, no manifest: file existence and mtime are the
//! whole state. When full, the oldest files by mtime are evicted just enough
//! to make room for the incoming write. Several processes may share the
//! directory; races are tolerated since the cache is advisory.

use anyhow::Result;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use log::{debug, warn};
use reqwest::blocking::Client;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use steam_api::Game;

pub const DEFAULT_MAX_ENTRIES: usize = 200;

const EXTENSION: &str = "jpg";
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Somewhere image bytes come from
pub trait ArtworkSource {
    /// Body of a successful, non-empty response; `None` for anything else
    fn get(&self, url: &str) -> Option<Vec<u8>>;
}

/// Fetches artwork from the Steam CDN
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("steam-tui/", env!("CARGO_PKG_VERSION")))
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl ArtworkSource for HttpSource {
    fn get(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.client.get(url).send() {
            Ok(r) => r,
            Err(e) => {
                debug!("Artwork request failed for {url}: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("Artwork {url} returned {}", response.status());
            return None;
        }
        let bytes = response.bytes().ok()?;
        (!bytes.is_empty()).then(|| bytes.to_vec())
    }
}

pub struct ArtworkCache<S = HttpSource> {
    dir: PathBuf,
    max_entries: usize,
    source: S,
}

impl<S: ArtworkSource> ArtworkCache<S> {
    /// `max_entries` below one is raised to one
    pub fn new(dir: impl Into<PathBuf>, max_entries: usize, source: S) -> Self {
        Self {
            dir: dir.into(),
            max_entries: max_entries.max(1),
            source,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn path_for(&self, appid: u32) -> PathBuf {
        self.dir.join(format!("{appid}.{EXTENSION}"))
    }

    /// Local path of the game's artwork, downloading it on a miss.
    ///
    /// Tries the portrait capsule, then the header image. Any failure yields
    /// `None`; artwork is never essential.
    pub fn fetch(&self, game: &Game) -> Option<PathBuf> {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("Cannot create artwork cache {}: {e}", self.dir.display());
            return None;
        }

        let path = self.path_for(game.appid);
        if path.exists() {
            return Some(path);
        }

        for url in [game.artwork_url(), game.header_url()] {
            let Some(bytes) = self.source.get(&url) else {
                continue;
            };
            match self.store(&path, &bytes) {
                Ok(()) => {
                    debug!("Cached artwork for {} from {url}", game.appid);
                    return Some(path);
                }
                Err(e) => {
                    warn!("Failed to cache artwork for {}: {e}", game.appid);
                    return None;
                }
            }
        }

        debug!("No artwork available for {}", game.appid);
        None
    }

    /// Cached files with their mtimes, oldest first
    pub fn entries(&self) -> io::Result<Vec<(PathBuf, SystemTime)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            // Another process may have evicted it since read_dir
            let Ok(mtime) = entry.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            entries.push((path, mtime));
        }
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(entries)
    }

    fn store(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.evict_for_write()?;
        AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
            .write(|f| {
                f.write_all(bytes)?;
                f.flush()
            })
            .map_err(|err| anyhow::anyhow!("Failed to write {}: {err}", path.display()))?;
        Ok(())
    }

    /// Evict oldest entries until one slot below the cap remains
    fn evict_for_write(&self) -> io::Result<()> {
        let entries = self.entries()?;
        if entries.len() < self.max_entries {
            return Ok(());
        }

        let excess = entries.len() + 1 - self.max_entries;
        for (path, _) in entries.into_iter().take(excess) {
            match fs::remove_file(&path) {
                Ok(()) => debug!("Evicted {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// `<user cache dir>/steam-tui`
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("steam-tui"))
}
