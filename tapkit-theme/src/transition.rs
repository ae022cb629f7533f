//! # Theme Transitions
//!
//! Re-application after a theme change happens inside a single transition
//! envelope per bound target (see [crate::binding::Themeable::transition]).
//! This module holds the envelope's configuration and a color interpolation
//! helper for adapters that animate between old and new values.

use std::time::Duration;

use vello::peniko::Color;

/// Configuration for theme transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionConfig {
    /// Whether transitions are enabled.
    pub enabled: bool,
    /// Transition duration in milliseconds.
    pub duration_ms: u64,
}

impl TransitionConfig {
    /// Create a new transition configuration.
    pub fn new(enabled: bool, duration_ms: u64) -> Self {
        Self { enabled, duration_ms }
    }

    /// Transitions switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Get the configured transition duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Duration handed to the transition envelope: zero when disabled.
    pub fn effective_duration(&self) -> Duration {
        if self.enabled {
            self.duration()
        } else {
            Duration::ZERO
        }
    }

    /// Check if transitions are enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 300,
        }
    }
}

/// Linear interpolation between two colors.
///
/// `t` is clamped to `0.0` (start) ..= `1.0` (end).
pub fn lerp_color(start: Color, end: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mut components = [0.0; 4];
    for (i, slot) in components.iter_mut().enumerate() {
        *slot = lerp(start.components[i], end.components[i], t);
    }
    Color::new(components)
}

fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_300ms() {
        let config = TransitionConfig::default();
        assert!(config.is_enabled());
        assert_eq!(config.effective_duration(), Duration::from_millis(300));
        assert_eq!(TransitionConfig::disabled().effective_duration(), Duration::ZERO);
    }

    #[test]
    fn test_lerp_color() {
        let start = Color::new([0.0, 0.0, 0.0, 1.0]);
        let end = Color::new([1.0, 1.0, 1.0, 1.0]);

        let mid = lerp_color(start, end, 0.5);
        assert_eq!(mid.components, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(lerp_color(start, end, 4.0).components, end.components);
    }
}
