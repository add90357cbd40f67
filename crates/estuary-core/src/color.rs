//! Color handling for Estuary diagrams.
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, providing convenience methods for working with colors
//! in the Estuary project. Subdivision shading relies on [`Color::brighter`]
//! and [`Color::darker`] to derive alternating variants of a node's base
//! color.

use std::str::FromStr;

use color::{ColorSpaceTag, DynamicColor};

/// Channel scale base for brighten/darken steps.
///
/// One step of `darker(1.0)` multiplies each RGB channel by 0.7; `brighter`
/// divides by it. This matches the convention the reference renderers use,
/// so shading contrast values carry over unchanged.
const SHADE_BASE: f32 = 0.7;

/// Wrapper around the `DynamicColor` type from the color crate.
/// This provides convenience methods for working with colors in the Estuary project.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string.
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use estuary_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns a brighter variant of this color.
    ///
    /// Each RGB channel is divided by `0.7^k`. Odd-indexed subdivisions use
    /// one brighter step of the owning node's base color.
    ///
    /// # Examples
    ///
    /// ```
    /// use estuary_core::color::Color;
    ///
    /// let base = Color::new("#804020").unwrap();
    /// let lit = base.brighter(0.3);
    /// assert_ne!(lit, base);
    /// ```
    pub fn brighter(self, k: f32) -> Self {
        self.scale_rgb(SHADE_BASE.powf(-k))
    }

    /// Returns a darker variant of this color.
    ///
    /// Each RGB channel is multiplied by `0.7^k`. Even-indexed subdivisions
    /// (and collapsed links, which have no subdivision index) use one darker
    /// step of the node's base color.
    pub fn darker(self, k: f32) -> Self {
        self.scale_rgb(SHADE_BASE.powf(k))
    }

    /// Creates a new color with the specified alpha (transparency) value.
    ///
    /// # Examples
    ///
    /// ```
    /// use estuary_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let semi_transparent_red = red.with_alpha(0.5);
    /// assert_eq!(semi_transparent_red.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color,
    /// between 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Scale the RGB channels by `factor`, clamping to the displayable range.
    fn scale_rgb(self, factor: f32) -> Self {
        let mut srgb = self.color.convert(ColorSpaceTag::Srgb);
        for channel in srgb.components[..3].iter_mut() {
            *channel = (*channel * factor).clamp(0.0, 1.0);
        }
        Self { color: srgb }
    }
}

impl Default for Color {
    /// Nodes without an explicit color shade from grey.
    fn default() -> Self {
        Self::new("gray").expect("'gray' is a valid CSS color")
    }
}

// For compatibility with the parts of the pipeline that use colors as strings
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
