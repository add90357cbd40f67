//! Configuration types for Estuary diagram rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out, styled, and animated. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`DiagramConfig`] - Top-level configuration combining layout, style, and
//!   transition settings.
//! - [`LayoutConfig`] - Scale factor, node width, and minimum link width.
//! - [`StyleConfig`] - Subdivision shading contrast and hover dim opacity.
//! - [`TransitionConfig`] - Duration of animated expand/collapse transitions.
//!
//! # Example
//!
//! ```
//! # use estuary::config::DiagramConfig;
//! // Use default configuration
//! let config = DiagramConfig::default();
//! assert_eq!(config.layout().scale(), 1.0);
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Top-level diagram configuration.
///
/// Groups [`LayoutConfig`], [`StyleConfig`], and [`TransitionConfig`] into a
/// single configuration root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagramConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Transition configuration section.
    #[serde(default)]
    transition: TransitionConfig,
}

impl DiagramConfig {
    /// Creates a new [`DiagramConfig`] from its sections.
    pub fn new(layout: LayoutConfig, style: StyleConfig, transition: TransitionConfig) -> Self {
        Self {
            layout,
            style,
            transition,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the transition configuration.
    pub fn transition(&self) -> &TransitionConfig {
        &self.transition
    }
}

fn default_scale() -> f32 {
    1.0
}

fn default_node_width() -> f32 {
    60.0
}

fn default_min_link_width() -> f32 {
    0.1
}

/// Geometry settings for the layout engine.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Multiplier from flow values to vertical pixels.
    #[serde(default = "default_scale")]
    scale: f32,

    /// Fixed width of every node bar.
    #[serde(default = "default_node_width")]
    node_width: f32,

    /// Links thinner than this render at this width so they stay visible.
    #[serde(default = "default_min_link_width")]
    min_link_width: f32,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`] with the given scale, node width, and
    /// minimum link width.
    pub fn new(scale: f32, node_width: f32, min_link_width: f32) -> Self {
        Self {
            scale,
            node_width,
            min_link_width,
        }
    }

    /// Returns the value-to-pixels scale factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Returns a copy with the given scale factor.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Returns the fixed node width.
    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    /// Returns the minimum rendered link width.
    pub fn min_link_width(&self) -> f32 {
        self.min_link_width
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            node_width: default_node_width(),
            min_link_width: default_min_link_width(),
        }
    }
}

fn default_shade_contrast() -> f32 {
    0.3
}

fn default_dim_opacity() -> f32 {
    0.5
}

/// Visual styling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Strength of the alternating brighter/darker subdivision shading.
    #[serde(default = "default_shade_contrast")]
    shade_contrast: f32,

    /// Opacity applied to elements unrelated to the active hover.
    #[serde(default = "default_dim_opacity")]
    dim_opacity: f32,
}

impl StyleConfig {
    /// Creates a new [`StyleConfig`] with the given shading contrast and dim
    /// opacity.
    pub fn new(shade_contrast: f32, dim_opacity: f32) -> Self {
        Self {
            shade_contrast,
            dim_opacity,
        }
    }

    /// Returns the subdivision shading contrast.
    pub fn shade_contrast(&self) -> f32 {
        self.shade_contrast
    }

    /// Returns the hover dim opacity.
    pub fn dim_opacity(&self) -> f32 {
        self.dim_opacity
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            shade_contrast: default_shade_contrast(),
            dim_opacity: default_dim_opacity(),
        }
    }
}

fn default_duration_ms() -> u64 {
    1000
}

/// Animated transition settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionConfig {
    /// Duration of expand/collapse and hover transitions, in milliseconds.
    /// Interaction stays locked for this long after a click.
    #[serde(default = "default_duration_ms")]
    duration_ms: u64,
}

impl TransitionConfig {
    /// Creates a new [`TransitionConfig`] with the given duration.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Returns the transition duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiagramConfig::default();
        assert_eq!(config.layout().scale(), 1.0);
        assert_eq!(config.layout().node_width(), 60.0);
        assert_eq!(config.layout().min_link_width(), 0.1);
        assert_eq!(config.style().shade_contrast(), 0.3);
        assert_eq!(config.style().dim_opacity(), 0.5);
        assert_eq!(config.transition().duration(), Duration::from_millis(1000));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DiagramConfig = serde_json::from_str(
            r#"{"layout": {"scale": 2.5}, "transition": {"duration_ms": 200}}"#,
        )
        .unwrap();

        assert_eq!(config.layout().scale(), 2.5);
        // Unset fields fall back to defaults
        assert_eq!(config.layout().node_width(), 60.0);
        assert_eq!(config.transition().duration(), Duration::from_millis(200));
    }

    #[test]
    fn test_with_scale() {
        let layout = LayoutConfig::default().with_scale(0.5);
        assert_eq!(layout.scale(), 0.5);
        assert_eq!(layout.node_width(), 60.0);
    }
}
