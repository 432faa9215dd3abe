//! Asynchronous skybox loading
//!
//! Decoding an HDR panorama takes long enough that it must not run on the loop
//! thread. Each request is decoded on a short-lived worker thread and the typed
//! result is posted back over a crossbeam channel. The owner drains the channel
//! from its own thread, so results are only ever applied there.
//!
//! Every request carries the generation number of the environment that issued
//! it. The loader does not interpret it; the receiver compares it against the
//! active generation and drops stale results.

use super::EnvironmentError;
use crate::foundation::math::Color;
use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Decoded skybox image, linear RGB floats
#[derive(Debug, Clone, PartialEq)]
pub struct SkyboxTexture {
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Row-major RGB texels
    pub texels: Vec<[f32; 3]>,
}

impl SkyboxTexture {
    /// Single-color texture, handy for tests and placeholders
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let count = width as usize * height as usize;
        Self { width, height, texels: vec![[color.r, color.g, color.b]; count] }
    }
}

/// Where skybox images come from
pub trait SkyboxSource: Send + Sync {
    /// Load and decode the image at `path`
    fn load(&self, path: &Path) -> Result<SkyboxTexture, EnvironmentError>;
}

/// Reads skybox images from disk below a root directory
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    root: PathBuf,
}

impl ImageFileSource {
    /// Resolve requested paths relative to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SkyboxSource for ImageFileSource {
    fn load(&self, path: &Path) -> Result<SkyboxTexture, EnvironmentError> {
        let full_path = self.root.join(path);
        if !full_path.exists() {
            return Err(EnvironmentError::NotFound(full_path));
        }

        log::debug!("Decoding skybox from {:?}", full_path);
        let image = image::open(&full_path)?.into_rgb32f();
        let (width, height) = image.dimensions();
        let texels = image.pixels().map(|pixel| pixel.0).collect();
        log::info!("Loaded skybox {}x{} from {:?}", width, height, full_path);

        Ok(SkyboxTexture { width, height, texels })
    }
}

/// Result of one load request
#[derive(Debug)]
pub enum SkyboxLoad {
    /// Image decoded successfully
    Loaded {
        /// Generation that requested the load
        generation: u64,
        /// Decoded texture
        texture: SkyboxTexture,
    },
    /// Load failed; the requester keeps its fallback
    Failed {
        /// Generation that requested the load
        generation: u64,
        /// What went wrong
        error: EnvironmentError,
    },
}

impl SkyboxLoad {
    /// Generation that requested this load
    pub fn generation(&self) -> u64 {
        match self {
            Self::Loaded { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// Runs skybox loads on worker threads and collects their results
pub struct SkyboxLoader {
    source: Arc<dyn SkyboxSource>,
    sender: Sender<SkyboxLoad>,
    receiver: Receiver<SkyboxLoad>,
    in_flight: usize,
}

impl SkyboxLoader {
    /// Create a loader reading from `source`
    pub fn new(source: Arc<dyn SkyboxSource>) -> Self {
        let (sender, receiver) = unbounded();
        Self { source, sender, receiver, in_flight: 0 }
    }

    /// Start loading `path` on behalf of `generation`
    pub fn request(&mut self, generation: u64, path: PathBuf) {
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();

        let spawned = thread::Builder::new()
            .name(format!("skybox-{}", generation))
            .spawn(move || {
                let result = match source.load(&path) {
                    Ok(texture) => SkyboxLoad::Loaded { generation, texture },
                    Err(error) => SkyboxLoad::Failed { generation, error },
                };
                // Receiver gone means the loader was dropped; nothing to report to
                let _ = sender.send(result);
            });

        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(e) => {
                log::warn!("Could not start skybox worker: {}", e);
                let _ = self.sender.send(SkyboxLoad::Failed {
                    generation,
                    error: EnvironmentError::Worker(e.to_string()),
                });
                self.in_flight += 1;
            }
        }
    }

    /// Collect every result that is ready, without blocking
    pub fn drain(&mut self) -> Vec<SkyboxLoad> {
        let results: Vec<_> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(results.len());
        results
    }

    /// Block until one result arrives or `timeout` passes
    pub fn wait(&mut self, timeout: Duration) -> Option<SkyboxLoad> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(result)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Requests whose result has not been collected yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl std::fmt::Debug for SkyboxLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkyboxLoader").field("in_flight", &self.in_flight).finish()
    }
}
