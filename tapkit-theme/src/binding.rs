//! # Attribute Bindings
//!
//! [ThemeBindings] wraps a UI object together with the selectors bound to its
//! attributes. Binding a selector applies its value straight away; after
//! that, every registry broadcast recomputes all bound selectors and
//! re-applies them inside one [Themeable::transition] envelope.
//!
//! The table subscribes to the registry when its first binding is added and
//! unsubscribes when the last one is removed or the last handle is dropped.
//!
//! Host code may change the theme while the table is busy, from inside
//! [Themeable::apply] or a [ThemeBindings::with_target] closure. The change is
//! recorded and the bindings are re-applied once the table is released.
//!
//! ```rust
//! use tapkit_theme::prelude::*;
//!
//! #[derive(Default)]
//! struct Label {
//!     text_color: Option<Color>,
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum LabelAttribute {
//!     TextColor,
//! }
//!
//! impl Themeable for Label {
//!     type Attribute = LabelAttribute;
//!
//!     fn apply(&mut self, attribute: &LabelAttribute, value: ThemeValue) {
//!         match attribute {
//!             LabelAttribute::TextColor => self.text_color = value.as_color(),
//!         }
//!     }
//! }
//!
//! let registry = ThemeRegistry::new();
//! registry.set_theme(ThemeDocument::new().with("textColor", "#000000"));
//!
//! let label = ThemeBindings::new(&registry, Label::default());
//! label.register_binding(LabelAttribute::TextColor, Selector::color("textColor"));
//!
//! registry.set_theme(ThemeDocument::new().with("textColor", "#ffffff"));
//! assert_eq!(label.with_target(|l| l.text_color.map(|c| c.components)), Some([1.0; 4]));
//! ```

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::properties::{ControlState, ThemeValue};
use crate::registry::{SubscriptionId, ThemeObserver, ThemeRegistry};
use crate::selector::Selector;

/// A UI object whose attributes can be themed.
pub trait Themeable {
    /// Identifies one themable attribute of the object.
    type Attribute: Clone + Eq + Hash + Debug + Send + 'static;

    /// Apply a value to an attribute.
    fn apply(&mut self, attribute: &Self::Attribute, value: ThemeValue);

    /// Apply a value to an attribute for one control state.
    ///
    /// Objects without per-state attributes keep the default, which ignores
    /// everything but [ControlState::Normal].
    fn apply_state(&mut self, attribute: &Self::Attribute, state: ControlState, value: ThemeValue) {
        if state == ControlState::Normal {
            self.apply(attribute, value);
        } else {
            log::debug!("{:?} has no {:?} state, ignoring", attribute, state);
        }
    }

    /// Run `updates` as one batch, animated over `duration` where supported.
    fn transition(&mut self, duration: Duration, updates: impl FnOnce(&mut Self))
    where
        Self: Sized,
    {
        let _ = duration;
        updates(self);
    }
}

struct BindingState<T: Themeable> {
    target: T,
    bindings: IndexMap<T::Attribute, Selector>,
    subscription: Option<SubscriptionId>,
}

/// Follow-up re-applies allowed after one release before giving up.
const MAX_FOLLOW_UPS: usize = 4;

struct BindingsInner<T: Themeable> {
    registry: ThemeRegistry,
    state: Mutex<BindingState<T>>,
    /// A broadcast arrived that has not been re-applied yet.
    pending: AtomicBool,
}

/// A themable target and its attribute bindings.
///
/// Clones share the same target and bindings.
pub struct ThemeBindings<T: Themeable> {
    inner: Arc<BindingsInner<T>>,
}

impl<T> ThemeBindings<T>
where
    T: Themeable + Send + 'static,
{
    /// Wrap `target`, binding it to `registry`.
    pub fn new(registry: &ThemeRegistry, target: T) -> Self {
        Self {
            inner: Arc::new(BindingsInner {
                registry: registry.clone(),
                state: Mutex::new(BindingState {
                    target,
                    bindings: IndexMap::new(),
                    subscription: None,
                }),
                pending: AtomicBool::new(false),
            }),
        }
    }

    /// Store, replace or (with `None`) remove the binding for `attribute`.
    ///
    /// A stored selector is applied immediately.
    pub fn set_binding(&self, attribute: T::Attribute, selector: Option<Selector>) {
        let inner = &self.inner;
        inner.locked(|state| match selector {
            Some(selector) => {
                apply_selector(&mut state.target, &attribute, &selector, &inner.registry);
                state.bindings.insert(attribute, selector);

                if state.subscription.is_none() {
                    let weak: Weak<dyn ThemeObserver> = Arc::downgrade(inner) as Weak<dyn ThemeObserver>;
                    state.subscription = Some(inner.registry.subscribe(weak));
                }
            },
            None => {
                state.bindings.shift_remove(&attribute);

                if state.bindings.is_empty() {
                    if let Some(id) = state.subscription.take() {
                        inner.registry.unsubscribe(id);
                    }
                }
            },
        });
    }

    /// Bind `selector` to `attribute`.
    pub fn register_binding(&self, attribute: T::Attribute, selector: Selector) {
        self.set_binding(attribute, Some(selector));
    }

    /// Remove the binding for `attribute`.
    pub fn remove_binding(&self, attribute: &T::Attribute) {
        self.set_binding(attribute.clone(), None);
    }

    /// The value the binding for `attribute` currently produces.
    pub fn current_value(&self, attribute: &T::Attribute) -> Option<ThemeValue> {
        let selector = self.selector(attribute)?;
        selector.value(&self.inner.registry)
    }

    /// The selector bound to `attribute`.
    pub fn selector(&self, attribute: &T::Attribute) -> Option<Selector> {
        self.inner.state.lock().bindings.get(attribute).cloned()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.inner.state.lock().bindings.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the table is subscribed to the registry.
    pub fn is_subscribed(&self) -> bool {
        self.inner.state.lock().subscription.is_some()
    }

    /// Access the wrapped target.
    ///
    /// Theme changes made by `f` are re-applied after it returns.
    pub fn with_target<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.inner.locked(|state| f(&mut state.target))
    }

    /// Re-apply every binding inside one transition envelope.
    ///
    /// If another thread holds the target, that thread re-applies on release.
    pub fn reapply(&self) {
        self.inner.request_reapply();
    }
}

impl<T: Themeable> Clone for ThemeBindings<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> BindingsInner<T>
where
    T: Themeable + Send + 'static,
{
    /// Run `f` with the state locked, then settle broadcasts that arrived meanwhile.
    fn locked<R>(&self, f: impl FnOnce(&mut BindingState<T>) -> R) -> R {
        let result = f(&mut self.state.lock());
        self.settle();
        result
    }

    fn request_reapply(&self) {
        self.pending.store(true, Ordering::SeqCst);
        self.settle();
    }

    /// Re-apply while broadcasts are pending.
    ///
    /// Never blocks on the state lock: a broadcast raised by the lock holder,
    /// on this thread or another, is left to the holder, which settles after
    /// releasing the lock.
    fn settle(&self) {
        for _ in 0..=MAX_FOLLOW_UPS {
            if !self.pending.load(Ordering::SeqCst) {
                return;
            }
            let Some(mut state) = self.state.try_lock() else {
                return;
            };
            if self.pending.swap(false, Ordering::SeqCst) {
                self.reapply_locked(&mut state);
            }
        }

        if self.pending.swap(false, Ordering::SeqCst) {
            log::warn!(
                "Theme kept changing while re-applying bindings, dropping the change after {} re-applies",
                MAX_FOLLOW_UPS + 1
            );
        }
    }

    fn reapply_locked(&self, state: &mut BindingState<T>) {
        let duration = self.registry.transition().effective_duration();
        let bindings = &state.bindings;
        let registry = &self.registry;

        state.target.transition(duration, |target| {
            for (attribute, selector) in bindings {
                apply_selector(target, attribute, selector, registry);
            }
        });
    }
}

impl<T> ThemeObserver for BindingsInner<T>
where
    T: Themeable + Send + 'static,
{
    fn theme_changed(&self, _registry: &ThemeRegistry) {
        self.request_reapply();
    }
}

impl<T: Themeable> Drop for BindingsInner<T> {
    fn drop(&mut self) {
        if let Some(id) = self.state.get_mut().subscription.take() {
            self.registry.unsubscribe(id);
        }
    }
}

fn apply_selector<T: Themeable>(
    target: &mut T,
    attribute: &T::Attribute,
    selector: &Selector,
    registry: &ThemeRegistry,
) {
    if !selector.is_stateful() {
        match selector.value(registry) {
            Some(value) => target.apply(attribute, value),
            None => log::debug!("No {} value for {:?}, keeping the current one", selector.kind(), attribute),
        }
        return;
    }

    for (state, value) in selector.state_values(registry) {
        match value {
            Some(value) => target.apply_state(attribute, state, value),
            None => log::warn!("No {} value for {:?} in state {:?}", selector.kind(), attribute, state),
        }
    }
}
