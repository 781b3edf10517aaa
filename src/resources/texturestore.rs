//! Asynchronous texture store.
//!
//! Textures are requested by asset key and read on a background loader thread
//! so a draw never blocks the tick. The main thread drains finished loads with
//! [`TextureStore::poll`], handing the bytes to an
//! [`ImageUploader`](crate::systems::render::ImageUploader) owned by the
//! rendering backend. Until a texture is loaded, [`TextureStore::get`] returns
//! `None` and sprites skip their draw; they retry on every later frame.
//!
//! The loader thread talks to the store through `crossbeam_channel` and exits
//! when the store is dropped.

use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::systems::render::{ImageId, ImageUploader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    Pending,
    Loaded(ImageId),
    Failed,
}

#[derive(Debug)]
struct LoadRequest {
    key: String,
    source: String,
}

#[derive(Debug)]
struct LoadMessage {
    key: String,
    result: Result<Vec<u8>, String>,
}

struct LoaderBridge {
    tx_req: Option<Sender<LoadRequest>>,
    rx_msg: Receiver<LoadMessage>,
    handle: Option<JoinHandle<()>>,
}

pub struct TextureStore {
    states: FxHashMap<String, TextureState>,
    bridge: Option<LoaderBridge>,
}

impl Default for TextureStore {
    fn default() -> Self {
        Self::offline()
    }
}

impl TextureStore {
    /// A store without a loader: requests stay pending forever.
    pub fn offline() -> Self {
        Self {
            states: FxHashMap::default(),
            bridge: None,
        }
    }

    /// Read texture sources relative to `root` on the filesystem.
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::with_reader(move |source| std::fs::read(root.join(source)))
    }

    /// Spawn the loader thread with a custom byte reader.
    pub fn with_reader<F>(reader: F) -> Self
    where
        F: Fn(&str) -> std::io::Result<Vec<u8>> + Send + 'static,
    {
        let (tx_req, rx_req) = unbounded::<LoadRequest>();
        let (tx_msg, rx_msg) = unbounded::<LoadMessage>();
        let handle = std::thread::spawn(move || loader_thread(rx_req, tx_msg, reader));
        Self {
            states: FxHashMap::default(),
            bridge: Some(LoaderBridge {
                tx_req: Some(tx_req),
                rx_msg,
                handle: Some(handle),
            }),
        }
    }

    /// Queue a load for `key` unless it is already known.
    pub fn request(&mut self, key: &str, source: &str) {
        if self.states.contains_key(key) {
            return;
        }
        self.states.insert(key.to_string(), TextureState::Pending);
        let Some(tx) = self.bridge.as_ref().and_then(|b| b.tx_req.as_ref()) else {
            return;
        };
        debug!("requesting texture '{}' from {}", key, source);
        let sent = tx.send(LoadRequest {
            key: key.to_string(),
            source: source.to_string(),
        });
        if sent.is_err() {
            warn!("texture loader is gone, '{}' will not load", key);
            self.states.insert(key.to_string(), TextureState::Failed);
        }
    }

    pub fn get(&self, key: &str) -> Option<ImageId> {
        match self.states.get(key) {
            Some(TextureState::Loaded(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn state(&self, key: &str) -> Option<TextureState> {
        self.states.get(key).copied()
    }

    pub fn pending(&self) -> usize {
        self.states
            .values()
            .filter(|s| **s == TextureState::Pending)
            .count()
    }

    /// Drain finished loads without blocking. Returns how many were resolved.
    pub fn poll(&mut self, uploader: &mut dyn ImageUploader) -> usize {
        let Some(bridge) = self.bridge.as_ref() else {
            return 0;
        };
        let messages: Vec<LoadMessage> = bridge.rx_msg.try_iter().collect();
        let count = messages.len();
        for message in messages {
            self.resolve(message, uploader);
        }
        count
    }

    /// Block until nothing is pending or `timeout` elapses.
    pub fn wait(&mut self, uploader: &mut dyn ImageUploader, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut count = 0;
        while self.pending() > 0 {
            let Some(bridge) = self.bridge.as_ref() else {
                break;
            };
            let remaining = deadline.saturating_duration_since(Instant::now());
            match bridge.rx_msg.recv_timeout(remaining) {
                Ok(message) => {
                    self.resolve(message, uploader);
                    count += 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        count
    }

    fn resolve(&mut self, message: LoadMessage, uploader: &mut dyn ImageUploader) {
        let state = match message.result {
            Ok(bytes) => match uploader.upload_image(&message.key, &bytes) {
                Ok(id) => {
                    info!("texture '{}' loaded ({} bytes)", message.key, bytes.len());
                    TextureState::Loaded(id)
                }
                Err(e) => {
                    warn!("texture '{}' could not be uploaded: {}", message.key, e);
                    TextureState::Failed
                }
            },
            Err(e) => {
                warn!("texture '{}' could not be read: {}", message.key, e);
                TextureState::Failed
            }
        };
        self.states.insert(message.key, state);
    }
}

impl Drop for TextureStore {
    fn drop(&mut self) {
        if let Some(mut bridge) = self.bridge.take() {
            // Closing the request channel ends the loader loop.
            bridge.tx_req.take();
            if let Some(handle) = bridge.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

fn loader_thread<F>(rx_req: Receiver<LoadRequest>, tx_msg: Sender<LoadMessage>, reader: F)
where
    F: Fn(&str) -> std::io::Result<Vec<u8>>,
{
    for request in rx_req.iter() {
        let result = reader(&request.source).map_err(|e| e.to_string());
        if tx_msg
            .send(LoadMessage {
                key: request.key,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}
