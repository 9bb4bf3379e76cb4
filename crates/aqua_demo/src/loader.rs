//! Asynchronous texture asset loading.
//!
//! Each requested asset is read and decoded on its own thread and delivered
//! back over a channel; the main loop polls once per frame and swaps decoded
//! images into the scene's materials. Until then the materials render with a
//! placeholder, so scene construction never waits on I/O.
//!
//! Lifecycle notifications go to the log sink: "loading started" once when
//! the batch is spawned, "loading progressing" for every completion (the
//! final one included), "loading finished" once when the batch drains, and
//! "loading error" per failure. Failures are non-fatal and never retried; the
//! affected material keeps its placeholder.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

use crate::scene::AssetSlot;

pub struct AssetRequest {
    pub slot: AssetSlot,
    pub path: PathBuf,
}

pub struct DecodedAsset {
    pub slot: AssetSlot,
    pub result: Result<image::DynamicImage, String>,
}

pub struct AssetLoader {
    rx: Receiver<DecodedAsset>,
    outstanding: usize,
    total: usize,
    failures: usize,
}

impl AssetLoader {
    /// Kick off one decode thread per request.
    pub fn spawn(requests: Vec<AssetRequest>) -> Self {
        let (tx, rx) = channel();
        let total = requests.len();
        if total > 0 {
            log::info!("loading started ({total} assets)");
        }

        for request in requests {
            let tx = tx.clone();
            thread::spawn(move || {
                let result = decode_asset(&request.path);
                // The receiver may be gone if the demo exits mid-load.
                let _ = tx.send(DecodedAsset {
                    slot: request.slot,
                    result,
                });
            });
        }

        Self {
            rx,
            outstanding: total,
            total,
            failures: 0,
        }
    }

    /// Drain every decode that has completed since the last poll.
    pub fn poll(&mut self) -> Vec<DecodedAsset> {
        let mut completed = Vec::new();
        while self.outstanding > 0 {
            match self.rx.try_recv() {
                Ok(decoded) => {
                    self.outstanding -= 1;
                    if let Err(err) = &decoded.result {
                        self.failures += 1;
                        log::error!("loading error: {err}");
                    }
                    log::info!(
                        "loading progressing ({}/{})",
                        self.total - self.outstanding,
                        self.total
                    );
                    if self.outstanding == 0 {
                        if self.failures == 0 {
                            log::info!("loading finished");
                        } else {
                            log::info!(
                                "loading finished ({} of {} assets failed)",
                                self.failures,
                                self.total
                            );
                        }
                    }
                    completed.push(decoded);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // All senders dropped without delivering; count the rest
                    // as failed so the loader still terminates.
                    log::error!("loading error: {} decode threads vanished", self.outstanding);
                    self.failures += self.outstanding;
                    self.outstanding = 0;
                }
            }
        }
        completed
    }

    pub fn is_done(&self) -> bool {
        self.outstanding == 0
    }

    pub fn failures(&self) -> usize {
        self.failures
    }
}

fn decode_asset(path: &PathBuf) -> Result<image::DynamicImage, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read texture {}: {e}", path.display()))?;
    image::load_from_memory(&bytes)
        .map_err(|e| format!("Failed to decode texture {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "aqua_loader_test_{}_{}_{}.png",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_test_png(path: &PathBuf) {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([180, 60, 60, 255]));
        img.save(path).expect("write temp png");
    }

    fn drain(loader: &mut AssetLoader) -> Vec<DecodedAsset> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut all = Vec::new();
        while !loader.is_done() {
            assert!(Instant::now() < deadline, "loader did not finish in time");
            all.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        all
    }

    #[test]
    fn loads_a_valid_image() {
        let path = temp_file_path("valid");
        write_test_png(&path);

        let mut loader = AssetLoader::spawn(vec![AssetRequest {
            slot: AssetSlot::Paper,
            path: path.clone(),
        }]);
        let results = drain(&mut loader);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slot, AssetSlot::Paper);
        let img = results[0].result.as_ref().expect("decode should succeed");
        assert_eq!((img.width(), img.height()), (2, 2));
        assert_eq!(loader.failures(), 0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn one_missing_asset_fails_alone() {
        let good_a = temp_file_path("good_a");
        let good_b = temp_file_path("good_b");
        write_test_png(&good_a);
        write_test_png(&good_b);
        let missing = temp_file_path("missing");
        let _ = fs::remove_file(&missing);

        let mut loader = AssetLoader::spawn(vec![
            AssetRequest {
                slot: AssetSlot::Paper,
                path: good_a.clone(),
            },
            AssetRequest {
                slot: AssetSlot::Watercolor,
                path: missing,
            },
            AssetRequest {
                slot: AssetSlot::Alpha,
                path: good_b.clone(),
            },
        ]);
        let results = drain(&mut loader);

        assert_eq!(results.len(), 3);
        assert_eq!(loader.failures(), 1);
        let failed: Vec<_> = results.iter().filter(|r| r.result.is_err()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].slot, AssetSlot::Watercolor);

        let _ = fs::remove_file(good_a);
        let _ = fs::remove_file(good_b);
    }

    #[test]
    fn undecodable_bytes_are_an_error() {
        let path = temp_file_path("garbage");
        fs::write(&path, b"definitely not an image").expect("write temp file");

        let mut loader = AssetLoader::spawn(vec![AssetRequest {
            slot: AssetSlot::Alpha,
            path: path.clone(),
        }]);
        let results = drain(&mut loader);

        assert_eq!(results.len(), 1);
        assert!(results[0].result.is_err());
        assert_eq!(loader.failures(), 1);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_batch_is_done_immediately() {
        let mut loader = AssetLoader::spawn(Vec::new());
        assert!(loader.is_done());
        assert!(loader.poll().is_empty());
        assert_eq!(loader.failures(), 0);
    }
}
