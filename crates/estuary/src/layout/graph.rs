//! Positioned graph types: the output of a layout pass.

use estuary_core::{
    flow::{Link, PortRef},
    geometry::Bounds,
    identifier::Id,
};

/// A point on a link path, with the inner and outer corner radii of the
/// ribbon edge at that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkPoint {
    pub x: f32,
    pub y: f32,
    /// Inner corner radius of the ribbon at this point.
    pub ri: f32,
    /// Outer corner radius of the ribbon at this point.
    pub ro: f32,
}

impl LinkPoint {
    /// Linear interpolation of position and radii.
    pub fn lerp(self, other: LinkPoint, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            ri: mix(self.ri, other.ri),
            ro: mix(self.ro, other.ro),
        }
    }

    /// Caps both radii at `max`.
    pub fn clamp_radii(&mut self, max: f32) {
        if self.ri > max {
            self.ri = max;
        }
        if self.ro > max {
            self.ro = max;
        }
    }
}

/// Interpolatable path geometry of a link: the point sequence and the
/// ribbon thickness `dy`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkGeometry {
    pub points: Vec<LinkPoint>,
    pub dy: f32,
}

impl LinkGeometry {
    /// Caps every point's radii at `max`.
    ///
    /// A nearly horizontal link's arc radius diverges; interpolating from
    /// such a radius to a thin expanded sub-link produces degenerate curve
    /// geometry, so both interpolation endpoints are clamped first.
    pub fn clamp_radii(&mut self, max: f32) {
        for point in &mut self.points {
            point.clamp_radii(max);
        }
    }

    /// Linear interpolation toward `other` at parameter `t`.
    ///
    /// Point sequences are expected to have equal length (the shipped engine
    /// always emits two points); if they differ, the target geometry wins so
    /// animation degrades to a jump rather than panicking.
    pub fn lerp(&self, other: &LinkGeometry, t: f32) -> Self {
        if self.points.len() != other.points.len() {
            return other.clone();
        }
        Self {
            points: self
                .points
                .iter()
                .zip(other.points.iter())
                .map(|(a, b)| a.lerp(*b, t))
                .collect(),
            dy: self.dy + (other.dy - self.dy) * t,
        }
    }
}

/// A port with its resolved vertical placement on the node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedPort {
    pub port: PortRef,
    /// Absolute top of the port.
    pub y: f32,
    /// Port height.
    pub dy: f32,
}

/// A node with its bounding box and the ports the current link set uses,
/// ordered ascending by subdivision index per side.
#[derive(Debug, Clone)]
pub struct PositionedNode {
    pub id: Id,
    pub bounds: Bounds,
    pub ports: Vec<PositionedPort>,
}

/// An aggregate link with its resolved path geometry.
#[derive(Debug, Clone)]
pub struct PositionedLink {
    pub id: Id,
    pub source: Id,
    pub target: Id,
    pub source_port: PortRef,
    pub target_port: PortRef,
    pub value: f32,
    pub geometry: LinkGeometry,
    pub sublinks: Vec<Link>,
    pub style: Option<String>,
}

/// A titled group with its bounding rectangle, recomputed every pass.
#[derive(Debug, Clone)]
pub struct PositionedGroup {
    pub title: String,
    pub nodes: Vec<Id>,
    pub rect: Bounds,
}

/// The output of one layout pass.
#[derive(Debug, Clone, Default)]
pub struct PositionedGraph {
    pub nodes: Vec<PositionedNode>,
    pub links: Vec<PositionedLink>,
    pub groups: Vec<PositionedGroup>,
}

impl PositionedGraph {
    /// Looks up a node by id.
    pub fn node(&self, id: Id) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Looks up a link by aggregate id.
    pub fn link(&self, id: Id) -> Option<&PositionedLink> {
        self.links.iter().find(|link| link.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32, ri: f32, ro: f32) -> LinkPoint {
        LinkPoint { x, y, ri, ro }
    }

    #[test]
    fn test_link_point_lerp() {
        let a = point(0.0, 0.0, 10.0, 20.0);
        let b = point(100.0, 50.0, 30.0, 40.0);

        let mid = a.lerp(b, 0.5);
        assert_eq!(mid.x, 50.0);
        assert_eq!(mid.y, 25.0);
        assert_eq!(mid.ri, 20.0);
        assert_eq!(mid.ro, 30.0);
    }

    #[test]
    fn test_clamp_radii() {
        let mut geometry = LinkGeometry {
            points: vec![point(0.0, 0.0, 5e4, 2.0), point(10.0, 0.0, 1.0, 9e9)],
            dy: 4.0,
        };
        geometry.clamp_radii(1e3);

        assert_eq!(geometry.points[0].ri, 1e3);
        assert_eq!(geometry.points[0].ro, 2.0);
        assert_eq!(geometry.points[1].ri, 1.0);
        assert_eq!(geometry.points[1].ro, 1e3);
    }

    #[test]
    fn test_geometry_lerp_mismatched_lengths_jumps() {
        let a = LinkGeometry {
            points: vec![point(0.0, 0.0, 0.0, 0.0)],
            dy: 1.0,
        };
        let b = LinkGeometry {
            points: vec![point(0.0, 0.0, 0.0, 0.0), point(5.0, 5.0, 0.0, 0.0)],
            dy: 2.0,
        };

        assert_eq!(a.lerp(&b, 0.25), b);
    }
}
