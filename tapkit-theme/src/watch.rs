//! Hot reload of local theme documents.
//!
//! [ThemeWatcher] watches the directories holding the active document (or
//! the light/dark pair) and, when [polled](ThemeWatcher::poll), reloads the
//! documents into the registry if any of them changed. Parent directories are
//! watched rather than the files themselves so editors that replace files on
//! save are still picked up.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{ThemeError, ThemeResult};
use crate::registry::ThemeRegistry;

/// The documents a [ThemeWatcher] keeps in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchTarget {
    /// A single active document.
    Single(PathBuf),
    /// A light/dark pair.
    Pair {
        /// Light document.
        light: PathBuf,
        /// Dark document.
        dark: PathBuf,
    },
}

impl WatchTarget {
    fn paths(&self) -> Vec<&Path> {
        match self {
            WatchTarget::Single(path) => vec![path.as_path()],
            WatchTarget::Pair { light, dark } => vec![light.as_path(), dark.as_path()],
        }
    }
}

/// Reloads theme documents into a registry when they change on disk.
pub struct ThemeWatcher {
    watcher: RecommendedWatcher,
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    registry: ThemeRegistry,
    target: WatchTarget,
    tracked: Vec<PathBuf>,
}

impl ThemeWatcher {
    /// Start watching `target` on behalf of `registry`.
    pub fn new(registry: &ThemeRegistry, target: WatchTarget) -> ThemeResult<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx).map_err(ThemeError::file_watcher)?;

        let tracked: Vec<PathBuf> = target.paths().into_iter().map(normalize).collect();
        let mut directories: Vec<&Path> = tracked.iter().filter_map(|path| path.parent()).collect();
        directories.dedup();

        for directory in directories {
            watcher
                .watch(directory, RecursiveMode::NonRecursive)
                .map_err(ThemeError::file_watcher)?;
            log::debug!("Watching {:?} for theme changes", directory);
        }

        Ok(Self {
            watcher,
            event_rx: rx,
            registry: registry.clone(),
            target,
            tracked,
        })
    }

    /// The watched documents.
    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// Drain pending events and reload if a watched document changed.
    ///
    /// Returns whether a reload happened. Never blocks.
    pub fn poll(&self) -> ThemeResult<bool> {
        let mut changed = false;

        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                Ok(event) => changed |= self.is_relevant(&event),
                Err(e) => log::warn!("Theme watcher error: {}", e),
            }
        }

        if changed {
            self.reload()?;
        }
        Ok(changed)
    }

    /// Reload the watched documents into the registry now.
    ///
    /// A failed reload leaves the registry untouched.
    pub fn reload(&self) -> ThemeResult<()> {
        let loader = self.registry.loader();
        let reload = |path: &Path| loader.load_file(path).map_err(|source| ThemeError::Reload { source });

        match &self.target {
            WatchTarget::Single(path) => self.registry.set_theme(reload(path.as_path())?),
            WatchTarget::Pair { light, dark } => {
                let light = reload(light.as_path())?;
                let dark = reload(dark.as_path())?;
                self.registry.set_light_dark_themes(light, dark);
            },
        }

        log::info!("Reloaded theme from {:?}", self.target.paths());
        Ok(())
    }

    /// Stop watching. Pending events are discarded.
    pub fn stop(mut self) {
        let directories: Vec<PathBuf> = self
            .tracked
            .iter()
            .filter_map(|path| path.parent().map(Path::to_path_buf))
            .collect();
        for directory in directories {
            if let Err(e) = self.watcher.unwatch(&directory) {
                log::warn!("Failed to stop watching {:?}: {}", directory, e);
            }
        }
    }

    fn is_relevant(&self, event: &Event) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        event
            .paths
            .iter()
            .any(|path| self.tracked.iter().any(|tracked| *tracked == normalize(path)))
    }
}

fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    // Removed files cannot be canonicalized; resolve the parent instead.
    match (path.parent().and_then(|parent| parent.canonicalize().ok()), path.file_name()) {
        (Some(parent), Some(name)) => parent.join(name),
        _ => path.to_path_buf(),
    }
}
