//! # Theme Registry
//!
//! The [ThemeRegistry] is the single source of truth for the active theme.
//! It is an explicitly constructed, cheaply clone-able handle; every clone
//! shares the same state.
//!
//! ## State
//!
//! - the active [ThemeDocument]
//! - the theme index used by list selectors
//! - an optional light/dark document pair and the current [Appearance]
//! - the [TransitionConfig] used when bindings re-apply
//! - the [ThemeEnvironment] consulted by the decoders
//!
//! ## Broadcasts
//!
//! Every mutation ends with a synchronous broadcast to all live
//! [ThemeObserver]s. Mutations and their broadcast are serialised by a
//! re-entrant lock: two threads can never interleave, yet an observer may call
//! back into the registry while it is being notified. Observers are held
//! weakly and pruned once dropped.
//!
//! ```rust
//! use tapkit_theme::prelude::*;
//!
//! let registry = ThemeRegistry::new();
//! registry.set_light_dark_themes(
//!     ThemeDocument::new().with("mode", "light"),
//!     ThemeDocument::new().with("mode", "dark"),
//! );
//!
//! registry.notify_appearance_changed(Appearance::Dark);
//! assert_eq!(registry.value("mode").and_then(|v| v.as_str().map(String::from)), Some("dark".into()));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use crate::builtin;
use crate::decode::{self, DecodeContext, ThemeEnvironment};
use crate::document::{DocValue, ThemeDocument};
use crate::error::{DecodeError, LoadError};
use crate::loader::{DocumentLoader, DocumentSource};
use crate::properties::{SelectorKind, ThemeValue};
use crate::transition::TransitionConfig;

/// System appearance mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Appearance {
    /// Light mode.
    #[default]
    Light,
    /// Dark mode.
    Dark,
}

impl Appearance {
    /// The other mode.
    pub fn toggle(self) -> Self {
        match self {
            Appearance::Light => Appearance::Dark,
            Appearance::Dark => Appearance::Light,
        }
    }

    /// Parse `light` / `dark`, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Appearance::Light),
            "dark" => Some(Appearance::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Appearance::Light => f.write_str("light"),
            Appearance::Dark => f.write_str("dark"),
        }
    }
}

/// Receives theme change broadcasts.
pub trait ThemeObserver: Send + Sync {
    /// Called synchronously after every theme change.
    fn theme_changed(&self, registry: &ThemeRegistry);
}

/// Handle returned by [ThemeRegistry::subscribe].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct RegistryState {
    active: Option<Arc<ThemeDocument>>,
    index: usize,
    light: Option<Arc<ThemeDocument>>,
    dark: Option<Arc<ThemeDocument>>,
    appearance: Appearance,
    transition: TransitionConfig,
    environment: Arc<ThemeEnvironment>,
}

impl RegistryState {
    fn variant(&self, appearance: Appearance) -> Option<&Arc<ThemeDocument>> {
        match appearance {
            Appearance::Light => self.light.as_ref(),
            Appearance::Dark => self.dark.as_ref(),
        }
    }
}

struct RegistryInner {
    state: RwLock<RegistryState>,
    observers: Mutex<Vec<(SubscriptionId, Weak<dyn ThemeObserver>)>>,
    mutation: ReentrantMutex<()>,
    next_subscription: AtomicU64,
    broadcasts: AtomicU64,
    loader: DocumentLoader,
}

/// Shared handle to the active theme state.
#[derive(Clone)]
pub struct ThemeRegistry {
    inner: Arc<RegistryInner>,
}

impl ThemeRegistry {
    /// Create an empty registry with the default environment.
    pub fn new() -> Self {
        Self::with_environment(ThemeEnvironment::default())
    }

    /// Create an empty registry with the given environment.
    pub fn with_environment(environment: ThemeEnvironment) -> Self {
        Self::with_loader(environment, DocumentLoader::new())
    }

    /// Create an empty registry that loads documents through `loader`.
    pub fn with_loader(environment: ThemeEnvironment, loader: DocumentLoader) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                state: RwLock::new(RegistryState {
                    active: None,
                    index: 0,
                    light: None,
                    dark: None,
                    appearance: Appearance::default(),
                    transition: TransitionConfig::default(),
                    environment: Arc::new(environment),
                }),
                observers: Mutex::new(Vec::new()),
                mutation: ReentrantMutex::new(()),
                next_subscription: AtomicU64::new(1),
                broadcasts: AtomicU64::new(0),
                loader,
            }),
        }
    }

    /// The loader used by the `*_from` / `*_sources` operations.
    pub fn loader(&self) -> &DocumentLoader {
        &self.inner.loader
    }

    /// Replace the active document and broadcast.
    pub fn set_theme(&self, document: impl Into<Arc<ThemeDocument>>) {
        let document = document.into();
        self.mutate(|state| {
            state.active = Some(document);
            true
        });
    }

    /// Load a document and make it active.
    ///
    /// On failure the active document is left untouched and nothing is broadcast.
    pub fn set_theme_from(&self, source: &DocumentSource) -> Result<(), LoadError> {
        let document = self.inner.loader.load(source)?;
        log::info!("Activated theme from {}", source.describe());
        self.set_theme(document);
        Ok(())
    }

    /// Replace the theme index and broadcast.
    pub fn set_theme_index(&self, index: usize) {
        self.mutate(|state| {
            state.index = index;
            true
        });
    }

    /// Store a light/dark pair, activate the one matching the current appearance and broadcast.
    pub fn set_light_dark_themes(
        &self,
        light: impl Into<Arc<ThemeDocument>>,
        dark: impl Into<Arc<ThemeDocument>>,
    ) {
        let (light, dark) = (light.into(), dark.into());
        self.mutate(|state| {
            state.active = Some(match state.appearance {
                Appearance::Light => Arc::clone(&light),
                Appearance::Dark => Arc::clone(&dark),
            });
            state.light = Some(light);
            state.dark = Some(dark);
            true
        });
    }

    /// Load a light/dark pair.
    ///
    /// If either load fails the failure is logged and the built-in default
    /// pair is used instead.
    pub fn set_light_dark_sources(&self, light: &DocumentSource, dark: &DocumentSource) {
        let loaded = self
            .inner
            .loader
            .load(light)
            .and_then(|light| Ok((light, self.inner.loader.load(dark)?)));

        match loaded {
            Ok((light, dark)) => self.set_light_dark_themes(light, dark),
            Err(e) => {
                log::error!("Failed to load light/dark themes, using the built-in pair: {}", e);
                self.set_light_dark_themes(builtin::default_light(), builtin::default_dark());
            },
        }
    }

    /// Record a system appearance change.
    ///
    /// Does nothing beyond recording the mode when the active document already
    /// is the matching variant (or no variant is stored); otherwise activates
    /// the variant and broadcasts.
    pub fn notify_appearance_changed(&self, appearance: Appearance) {
        self.mutate(|state| {
            state.appearance = appearance;
            let Some(variant) = state.variant(appearance).cloned() else {
                return false;
            };
            let unchanged = state
                .active
                .as_ref()
                .is_some_and(|active| Arc::ptr_eq(active, &variant) || **active == *variant);
            if unchanged {
                return false;
            }
            log::debug!("Switching to the {} theme", appearance);
            state.active = Some(variant);
            true
        });
    }

    /// Flip between light and dark, returning the new appearance.
    pub fn toggle_appearance(&self) -> Appearance {
        let _guard = self.inner.mutation.lock();
        let next = self.appearance().toggle();
        self.notify_appearance_changed(next);
        next
    }

    /// Replace the transition configuration. Does not broadcast.
    pub fn set_transition(&self, transition: TransitionConfig) {
        let _guard = self.inner.mutation.lock();
        self.inner.state.write().transition = transition;
    }

    /// Replace the decoding environment and broadcast.
    pub fn set_environment(&self, environment: ThemeEnvironment) {
        let environment = Arc::new(environment);
        self.mutate(|state| {
            state.environment = environment;
            true
        });
    }

    /// Edit a copy of the decoding environment, install it and broadcast.
    pub fn update_environment(&self, update: impl FnOnce(&mut ThemeEnvironment)) {
        let _guard = self.inner.mutation.lock();
        let mut environment = (*self.environment()).clone();
        update(&mut environment);
        self.set_environment(environment);
    }

    /// Register an observer. It stays registered until unsubscribed or dropped.
    pub fn subscribe(&self, observer: Weak<dyn ThemeObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.inner.observers.lock().push((id, observer));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.inner.observers.lock();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        before != observers.len()
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .lock()
            .iter()
            .filter(|(_, observer)| observer.strong_count() > 0)
            .count()
    }

    /// Pick the element at the current theme index.
    ///
    /// Out of range yields `None` and a warning.
    pub fn element<T: Clone>(&self, values: &[T]) -> Option<T> {
        let index = self.theme_index();
        let element = values.get(index).cloned();
        if element.is_none() {
            log::warn!("Theme index {} is out of range for a list of {}", index, values.len());
        }
        element
    }

    /// The active document.
    pub fn document(&self) -> Option<Arc<ThemeDocument>> {
        self.inner.state.read().active.clone()
    }

    /// The current theme index.
    pub fn theme_index(&self) -> usize {
        self.inner.state.read().index
    }

    /// The current appearance.
    pub fn appearance(&self) -> Appearance {
        self.inner.state.read().appearance
    }

    /// The transition configuration.
    pub fn transition(&self) -> TransitionConfig {
        self.inner.state.read().transition
    }

    /// The decoding environment.
    pub fn environment(&self) -> Arc<ThemeEnvironment> {
        Arc::clone(&self.inner.state.read().environment)
    }

    /// The raw value at `key_path` in the active document.
    pub fn value(&self, key_path: &str) -> Option<DocValue> {
        self.document()?.resolve(key_path).cloned()
    }

    /// Resolve `key_path` in the active document and decode it as `kind`.
    pub fn resolve(&self, kind: SelectorKind, key_path: &str) -> Option<ThemeValue> {
        let (document, environment) = self.snapshot();
        let raw = document.as_deref().and_then(|document| document.resolve(key_path));
        if raw.is_none() {
            log::debug!("No value at '{}'", key_path);
        }
        decode::decode(kind, raw, &DecodeContext::new(document.as_deref(), &environment))
    }

    /// Like [Self::resolve], but reports an absent value as an error.
    pub fn try_resolve(&self, kind: SelectorKind, key_path: &str) -> Result<ThemeValue, DecodeError> {
        self.resolve(kind, key_path)
            .ok_or_else(|| DecodeError::NotFound(key_path.to_string()))
    }

    /// Decode a raw value as `kind` against the active document.
    pub fn decode(&self, kind: SelectorKind, raw: Option<&DocValue>) -> Option<ThemeValue> {
        let (document, environment) = self.snapshot();
        decode::decode(kind, raw, &DecodeContext::new(document.as_deref(), &environment))
    }

    /// Number of broadcasts sent so far.
    pub fn broadcast_count(&self) -> u64 {
        self.inner.broadcasts.load(Ordering::Relaxed)
    }

    fn snapshot(&self) -> (Option<Arc<ThemeDocument>>, Arc<ThemeEnvironment>) {
        let state = self.inner.state.read();
        (state.active.clone(), Arc::clone(&state.environment))
    }

    /// Apply `change` under the mutation lock and broadcast if it returns `true`.
    fn mutate(&self, change: impl FnOnce(&mut RegistryState) -> bool) {
        let _guard = self.inner.mutation.lock();
        let changed = change(&mut self.inner.state.write());
        if changed {
            self.broadcast();
        }
    }

    fn broadcast(&self) {
        let live: Vec<Arc<dyn ThemeObserver>> = {
            let mut observers = self.inner.observers.lock();
            observers.retain(|(_, observer)| observer.strong_count() > 0);
            observers.iter().filter_map(|(_, observer)| observer.upgrade()).collect()
        };

        self.inner.broadcasts.fetch_add(1, Ordering::Relaxed);
        log::debug!("Broadcasting theme change to {} observers", live.len());

        for observer in &live {
            observer.theme_changed(self);
        }
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("ThemeRegistry")
            .field("has_theme", &state.active.is_some())
            .field("index", &state.index)
            .field("appearance", &state.appearance)
            .field("transition", &state.transition)
            .finish_non_exhaustive()
    }
}
