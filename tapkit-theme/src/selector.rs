//! # Selectors
//!
//! A [Selector] is a deferred, typed value. It knows *where* a value comes
//! from (a key path into the active document, a literal list indexed by the
//! registry's theme index, or a fixed value) and *what* it decodes to (its
//! [SelectorKind]). The value itself is computed on demand against a
//! [ThemeRegistry], so the same selector yields new values after every theme
//! change.
//!
//! ```rust
//! use tapkit_theme::prelude::*;
//!
//! let registry = ThemeRegistry::new();
//! registry.set_theme(ThemeDocument::new().with("card", ThemeDocument::new().with("textColor", "#ff0000")));
//!
//! let selector = Selector::color("card.textColor");
//! let color = selector.value(&registry).and_then(|value| value.as_color());
//! assert_eq!(color.map(|c| c.components), Some([1.0, 0.0, 0.0, 1.0]));
//! ```

use indexmap::IndexMap;

use crate::document::DocValue;
use crate::properties::{ControlState, SelectorKind, ThemeValue};
use crate::registry::ThemeRegistry;

/// Where a selector's raw value comes from.
#[derive(Debug, Clone)]
pub enum ValueSource {
    /// A dotted key path into the active document.
    KeyPath(String),
    /// A literal list; the registry's theme index picks the element.
    List(Vec<DocValue>),
    /// A fixed value, returned unchanged.
    Direct(ThemeValue),
}

/// A typed deferred value producer.
#[derive(Debug, Clone)]
pub enum Selector {
    /// A single value.
    Value {
        /// What the value decodes to.
        kind: SelectorKind,
        /// Where the raw value comes from.
        source: ValueSource,
    },
    /// One nested selector per control state.
    States {
        /// What every nested value decodes to.
        kind: SelectorKind,
        /// Nested selectors in insertion order.
        states: IndexMap<ControlState, Selector>,
    },
}

impl Selector {
    /// A selector reading `key_path` as `kind`.
    pub fn key_path(kind: SelectorKind, key_path: impl Into<String>) -> Self {
        Self::Value {
            kind,
            source: ValueSource::KeyPath(key_path.into()),
        }
    }

    /// A selector picking from `values` by theme index.
    pub fn list<I, V>(kind: SelectorKind, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DocValue>,
    {
        Self::Value {
            kind,
            source: ValueSource::List(values.into_iter().map(Into::into).collect()),
        }
    }

    /// A selector that always yields `value`.
    pub fn direct(value: ThemeValue) -> Self {
        Self::Value {
            kind: value.kind(),
            source: ValueSource::Direct(value),
        }
    }

    /// An empty state selector; add states with [Self::insert].
    pub fn states(kind: SelectorKind) -> Self {
        Self::States {
            kind,
            states: IndexMap::new(),
        }
    }

    /// A color at `key_path`.
    pub fn color(key_path: impl Into<String>) -> Self {
        Self::key_path(SelectorKind::Color, key_path)
    }

    /// A layer color at `key_path`.
    pub fn cg_color(key_path: impl Into<String>) -> Self {
        Self::key_path(SelectorKind::CgColor, key_path)
    }

    /// A font at `key_path`.
    pub fn font(key_path: impl Into<String>) -> Self {
        Self::key_path(SelectorKind::Font, key_path)
    }

    /// A float at `key_path`.
    pub fn float(key_path: impl Into<String>) -> Self {
        Self::key_path(SelectorKind::Float, key_path)
    }

    /// An image at `key_path`.
    pub fn image(key_path: impl Into<String>) -> Self {
        Self::key_path(SelectorKind::Image, key_path)
    }

    /// Add or replace the selector for `state`.
    ///
    /// A nested state selector is ignored; on a value selector this is a no-op.
    pub fn insert(&mut self, state: ControlState, selector: Selector) -> &mut Self {
        if selector.is_stateful() {
            log::warn!("Nested state selectors are not supported, ignoring {:?}", state);
            return self;
        }

        match self {
            Selector::States { states, .. } => {
                states.insert(state, selector);
            },
            Selector::Value { .. } => {
                log::warn!("Cannot add state {:?} to a value selector", state);
            },
        }
        self
    }

    /// Builder-style [Self::insert].
    pub fn with_state(mut self, state: ControlState, selector: Selector) -> Self {
        self.insert(state, selector);
        self
    }

    /// The kind of value produced.
    pub fn kind(&self) -> SelectorKind {
        match self {
            Selector::Value { kind, .. } | Selector::States { kind, .. } => *kind,
        }
    }

    /// Whether this is a state selector.
    pub fn is_stateful(&self) -> bool {
        matches!(self, Selector::States { .. })
    }

    /// Compute the value against the registry's current theme.
    ///
    /// For state selectors this is the [ControlState::Normal] value.
    pub fn value(&self, registry: &ThemeRegistry) -> Option<ThemeValue> {
        match self {
            Selector::Value { kind, source } => match source {
                ValueSource::KeyPath(key_path) => registry.resolve(*kind, key_path),
                ValueSource::List(values) => {
                    let element = registry.element(values)?;
                    registry.decode(*kind, Some(&element))
                },
                ValueSource::Direct(value) => Some(value.clone()),
            },
            Selector::States { states, .. } => states
                .get(&ControlState::Normal)
                .and_then(|selector| selector.value(registry)),
        }
    }

    /// Compute every state's value. Value selectors yield a single
    /// [ControlState::Normal] entry.
    pub fn state_values(&self, registry: &ThemeRegistry) -> Vec<(ControlState, Option<ThemeValue>)> {
        match self {
            Selector::Value { .. } => vec![(ControlState::Normal, self.value(registry))],
            Selector::States { states, .. } => states
                .iter()
                .map(|(state, selector)| (*state, selector.value(registry)))
                .collect(),
        }
    }
}
