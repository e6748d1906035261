//! Background artwork fetch + render

use super::image::{Artwork, ArtworkRenderer};
use crate::artwork::{ArtworkCache, ArtworkSource};
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use steam_api::Game;

/// Identifies one rendering of one game's artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtworkKey {
    pub appid: u32,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone)]
pub struct ArtworkRequest {
    pub key: ArtworkKey,
    pub game: Game,
}

#[derive(Debug)]
pub struct ArtworkResponse {
    pub key: ArtworkKey,
    /// `None` when nothing could be fetched or rendered
    pub artwork: Option<Artwork>,
}

pub fn spawn_artwork_worker<S>(
    cache: ArtworkCache<S>,
    renderer: Box<dyn ArtworkRenderer>,
    req_rx: Receiver<ArtworkRequest>,
    resp_tx: Sender<ArtworkResponse>,
) -> JoinHandle<()>
where
    S: ArtworkSource + Send + 'static,
{
    thread::spawn(move || {
        while let Ok(mut req) = req_rx.recv() {
            // Coalesce rapid selection changes - keep only the latest request
            while let Ok(next) = req_rx.try_recv() {
                req = next;
            }

            let artwork = cache
                .fetch(&req.game)
                .and_then(|path| renderer.render(&path, req.key.width, req.key.height));

            if resp_tx
                .send(ArtworkResponse {
                    key: req.key,
                    artwork,
                })
                .is_err()
            {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::Text;
    use std::path::Path;
    use std::sync::mpsc;
    use tempfile::TempDir;

    struct StaticSource;

    impl ArtworkSource for StaticSource {
        fn get(&self, url: &str) -> Option<Vec<u8>> {
            // Only the header image exists for appid 2
            if url.contains("/1/") || url.ends_with("/2/header.jpg") {
                Some(b"img".to_vec())
            } else {
                None
            }
        }
    }

    /// Echoes the requested size back as text
    struct SizeRenderer;

    impl ArtworkRenderer for SizeRenderer {
        fn render(&self, _path: &Path, width: usize, height: usize) -> Option<Artwork> {
            Some(Artwork::Text(Text::raw(format!("{width}x{height}"))))
        }
    }

    fn request(appid: u32, width: usize, height: usize) -> ArtworkRequest {
        ArtworkRequest {
            key: ArtworkKey {
                appid,
                width,
                height,
            },
            game: Game::new(appid, format!("Game {appid}"), vec![], 0),
        }
    }

    #[test]
    fn test_worker_fetches_and_renders() {
        let dir = TempDir::new().unwrap();
        let (req_tx, req_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let cache = ArtworkCache::new(dir.path(), 10, StaticSource);
        let handle = spawn_artwork_worker(cache, Box::new(SizeRenderer), req_rx, resp_tx);

        req_tx.send(request(1, 30, 12)).unwrap();
        let resp = resp_rx.recv().unwrap();
        assert_eq!(resp.key.appid, 1);
        match resp.artwork {
            Some(Artwork::Text(text)) => assert_eq!(text, Text::raw("30x12")),
            other => panic!("unexpected artwork {other:?}"),
        }
        assert!(dir.path().join("1.jpg").exists());

        req_tx.send(request(2, 30, 12)).unwrap();
        assert!(resp_rx.recv().unwrap().artwork.is_some());

        req_tx.send(request(3, 30, 12)).unwrap();
        let resp = resp_rx.recv().unwrap();
        assert_eq!(resp.key.appid, 3);
        assert!(resp.artwork.is_none());

        drop(req_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_worker_answers_latest_of_a_burst() {
        let dir = TempDir::new().unwrap();
        let (req_tx, req_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        // Queue the burst before the worker starts so it is drained in one go
        for appid in [3, 2, 1] {
            req_tx.send(request(appid, 10, 4)).unwrap();
        }
        drop(req_tx);

        let cache = ArtworkCache::new(dir.path(), 10, StaticSource);
        spawn_artwork_worker(cache, Box::new(SizeRenderer), req_rx, resp_tx)
            .join()
            .unwrap();

        let responses: Vec<ArtworkResponse> = resp_rx.iter().collect();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].key.appid, 1);
    }
}
