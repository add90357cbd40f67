//! Geometric primitives for diagram layout and positioning.
//!
//! This module provides the fundamental geometric types used throughout
//! Estuary for node bounding boxes, link endpoints, and group rectangles.
//!
//! # Coordinate System
//!
//! Estuary uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: top-left corner at `(0, 0)`
//! - **X-axis**: increases rightward
//! - **Y-axis**: increases downward
//!
//! Flow direction is left to right; vertical offsets within a node grow
//! downward, matching the subdivision stacking order.

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use estuary_core::geometry::Point;
/// let exit = Point::new(60.0, 25.0);
/// let entry = Point::new(200.0, 40.0);
///
/// // Animation endpoints interpolate linearly
/// let mid = exit.lerp(entry, 0.5);
/// assert_eq!(mid.x(), 130.0);
/// assert_eq!(mid.y(), 32.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Linear interpolation between this point and `other` at parameter `t`.
    ///
    /// `t = 0` yields `self`, `t = 1` yields `other`.
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Represents the dimensions of an element with width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size.
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size.
    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates.
///
/// Node boxes, group rectangles, and the overall diagram extent are all
/// `Bounds`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size.
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds.
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds.
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds.
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds.
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds.
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds.
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point.
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object.
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// Group rectangles are built by folding this over the member nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use estuary_core::geometry::{Bounds, Point, Size};
    /// let coal = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(60.0, 30.0));
    /// let gas = Bounds::new_from_top_left(Point::new(0.0, 50.0), Size::new(60.0, 80.0));
    ///
    /// let sources = coal.merge(&gas);
    /// assert_eq!(sources.min_y(), 0.0);
    /// assert_eq!(sources.max_y(), 130.0);
    /// assert_eq!(sources.width(), 60.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Expands the bounds by adding insets.
    ///
    /// This decreases the minimum coordinates by left/top insets and
    /// increases the maximum coordinates by right/bottom insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }
}

/// Represents spacing around an element (padding, margin, etc.)
/// with potentially different values for each side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side.
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Returns the top inset value.
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value.
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value.
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value.
    pub fn left(self) -> f32 {
        self.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
    }

    #[test]
    fn test_point_add() {
        let p1 = Point::new(1.0, 2.0);
        let p2 = Point::new(3.0, 4.0);
        let result = p1.add_point(p2);
        assert_eq!(result.x(), 4.0);
        assert_eq!(result.y(), 6.0);
    }

    #[test]
    fn test_point_lerp_endpoints() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(30.0, -20.0);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);

        let mid = a.lerp(b, 0.5);
        assert_eq!(mid.x(), 20.0);
        assert_eq!(mid.y(), 0.0);
    }

    #[test]
    fn test_bounds_new_from_top_left() {
        let top_left = Point::new(10.0, 20.0);
        let size = Size::new(30.0, 40.0);
        let bounds = Bounds::new_from_top_left(top_left, size);

        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 40.0);
        assert_eq!(bounds.max_y(), 60.0);
        assert_eq!(bounds.width(), 30.0);
        assert_eq!(bounds.height(), 40.0);
        assert_eq!(bounds.min_point(), top_left);
    }

    #[test]
    fn test_bounds_to_size() {
        let bounds = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(5.0, 7.0));

        let size = bounds.to_size();
        assert_eq!(size.width(), 5.0);
        assert_eq!(size.height(), 7.0);
    }

    #[test]
    fn test_bounds_merge() {
        let b1 = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(4.0, 4.0));
        let b2 = Bounds::new_from_top_left(Point::new(3.0, 0.0), Size::new(5.0, 4.0));

        let merged = b1.merge(&b2);
        assert_eq!(merged.min_x(), 1.0);
        assert_eq!(merged.min_y(), 0.0);
        assert_eq!(merged.max_x(), 8.0);
        assert_eq!(merged.max_y(), 6.0);
    }

    #[test]
    fn test_bounds_translate() {
        let bounds = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(4.0, 4.0));

        let offset = Point::new(3.0, -1.0);
        let translated = bounds.translate(offset);

        assert_eq!(translated.min_x(), 4.0);
        assert_eq!(translated.min_y(), 1.0);
        assert_eq!(translated.max_x(), 8.0);
        assert_eq!(translated.max_y(), 5.0);
    }

    #[test]
    fn test_bounds_add_padding() {
        let bounds = Bounds::new_from_top_left(Point::new(2.0, 3.0), Size::new(4.0, 5.0));

        let padded = bounds.add_padding(Insets::uniform(10.0));

        assert_eq!(padded.min_x(), -8.0);
        assert_eq!(padded.min_y(), -7.0);
        assert_eq!(padded.max_x(), 16.0);
        assert_eq!(padded.max_y(), 18.0);
    }

    #[test]
    fn test_insets_accessors() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.top(), 1.0);
        assert_eq!(insets.right(), 2.0);
        assert_eq!(insets.bottom(), 3.0);
        assert_eq!(insets.left(), 4.0);

        let uniform = Insets::uniform(5.0);
        assert_eq!(uniform.top(), 5.0);
        assert_eq!(uniform.left(), 5.0);
    }
}
