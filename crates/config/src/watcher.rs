use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Watches the config file and sends a notification whenever it is written,
/// created, or replaced.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by renaming a temp file over the original are still seen, and a
/// config created after startup is picked up.
///
/// # Example
/// ```no_run
/// # async fn run() {
/// let (_, mut rx) = anomaly_config::ConfigWatcher::spawn("/home/user/.config/anomaly/anomaly.toml");
/// while rx.recv().await.is_some() {
///     println!("config changed, reloading");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver that fires on every detected change.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Directory to register with the OS watcher for `path`.
fn watch_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// [`watch_root`] if that directory exists, otherwise `None`.
fn existing_watch_root(path: &Path) -> Option<PathBuf> {
    let root = watch_root(path);
    root.is_dir().then_some(root)
}

fn touches(event: &notify::Event, path: &Path) -> bool {
    use notify::EventKind::*;
    matches!(event.kind, Modify(_) | Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == path.file_name())
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    let Some(root) = existing_watch_root(&path) else {
        warn!(
            "Config directory for '{}' does not exist; live reload disabled.",
            path.display()
        );
        return;
    };
    if let Err(e) = watcher.watch(&root, RecursiveMode::NonRecursive) {
        warn!("Failed to watch '{}': {e}; live reload disabled.", root.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) if touches(&e, &path) => {
                // A full channel already has a reload queued.
                if let Err(mpsc::error::TrySendError::Closed(())) = tx.try_send(()) {
                    break; // receiver dropped
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}
