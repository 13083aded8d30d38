use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::{debug, warn};

use crate::AssetError;

/// Outcome of polling a [`LoadHandle`].
#[derive(Debug)]
pub enum LoadStatus<T> {
    /// Still loading.
    Pending,
    /// Loaded successfully.
    Ready(T),
    /// Failed; no retry is attempted.
    Failed(AssetError),
}

/// One-shot receiving side of an asynchronous load.
///
/// A handle yields `Ready` or `Failed` exactly once; callers should drop it
/// after a terminal status.
#[derive(Debug)]
pub struct LoadHandle<T> {
    path: PathBuf,
    receiver: Receiver<Result<T, AssetError>>,
}

/// Sending side of a load, used by loaders that complete on their own schedule.
#[derive(Debug)]
pub struct LoadCompleter<T> {
    sender: Sender<Result<T, AssetError>>,
}

impl<T> LoadCompleter<T> {
    /// Deliver the result. A dropped handle silently discards it.
    pub fn complete(self, result: Result<T, AssetError>) {
        let _ = self.sender.send(result);
    }
}

impl<T> LoadHandle<T> {
    /// Create a handle together with the completer that resolves it.
    pub fn pair(path: impl Into<PathBuf>) -> (LoadCompleter<T>, LoadHandle<T>) {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        (
            LoadCompleter { sender },
            LoadHandle {
                path: path.into(),
                receiver,
            },
        )
    }

    /// A handle that is already resolved with `value`.
    pub fn ready(path: impl Into<PathBuf>, value: T) -> Self {
        let (completer, handle) = Self::pair(path);
        completer.complete(Ok(value));
        handle
    }

    /// Path this load was requested for.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for completion.
    pub fn poll(&self) -> LoadStatus<T> {
        match self.receiver.try_recv() {
            Ok(Ok(value)) => LoadStatus::Ready(value),
            Ok(Err(err)) => LoadStatus::Failed(err),
            Err(TryRecvError::Empty) => LoadStatus::Pending,
            Err(TryRecvError::Disconnected) => {
                LoadStatus::Failed(AssetError::Abandoned(self.path.display().to_string()))
            }
        }
    }

    /// Block until the load finishes.
    pub fn wait(self) -> Result<T, AssetError> {
        self.receiver
            .recv()
            .map_err(|_| AssetError::Abandoned(self.path.display().to_string()))?
    }
}

/// Run `load` for `path` on a background thread.
///
/// If the thread cannot be spawned the handle reports `Abandoned` on its
/// first poll.
pub fn spawn_load<T, F>(path: impl Into<PathBuf>, load: F) -> LoadHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&Path) -> Result<T, AssetError> + Send + 'static,
{
    let path = path.into();
    let (completer, handle) = LoadHandle::pair(path.clone());
    let name = format!("load:{}", path.display());

    let spawned = thread::Builder::new().name(name).spawn(move || {
        debug!(path = %path.display(), "asset load started");
        completer.complete(load(&path));
    });
    if let Err(err) = spawned {
        warn!(%err, path = %handle.path.display(), "failed to spawn loader thread");
    }

    handle
}
