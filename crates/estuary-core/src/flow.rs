//! The flow dataset model.
//!
//! This module contains the caller-owned input types for a diagram:
//! - [`Dataset`] - the root: nodes, raw links, optional groups
//! - [`Node`] / [`Subdivision`] - a flow node and its ordered internal partitions
//! - [`Link`] - a raw flow record between two subdivisions
//! - [`Group`] - a titled set of nodes outlined together
//! - [`PortRef`] / [`Direction`] - typed references to link attachment points
//!
//! The engine never mutates these; all derived state lives in side tables
//! owned by the diagram instance (see the `estuary` crate).

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// A complete flow dataset bound to a diagram.
///
/// Nodes carry fixed positions; links reference nodes and subdivisions by
/// id. Groups are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// A flow node: a vertical bar whose height is its total value at the
/// diagram scale, subdivided into ordered internal partitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Total flow value through the node.
    pub value: f32,
    /// Base CSS color; subdivision shading derives variants from it.
    /// Unset nodes shade from grey.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub style: NodeStyle,
    /// Externally supplied position. Layout never moves nodes.
    pub geometry: NodeGeometry,
    #[serde(default)]
    pub subdivisions: Vec<Subdivision>,
}

/// Visual style flags for a node.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NodeStyle {
    /// Hidden nodes keep their layout slot but render invisible.
    #[serde(default)]
    pub hidden: bool,
}

/// Fixed node position in diagram coordinates (top-left of the node bar).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NodeGeometry {
    pub x: f32,
    pub y: f32,
}

/// A named internal partition of a node's total flow value, shown only when
/// the node is expanded. Sequence order is meaningful: spans stack in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subdivision {
    pub id: Id,
    pub label: String,
    pub value: f32,
    #[serde(default)]
    pub description: String,
}

/// A raw flow record from a source subdivision to a target subdivision.
///
/// Raw links are never rendered directly; they aggregate into one rendered
/// link per expansion-state grouping key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub source: Id,
    pub source_sub: Id,
    pub target: Id,
    pub target_sub: Id,
    pub value: f32,
    #[serde(default)]
    pub style: Option<String>,
}

/// A titled set of nodes outlined together. The bounding rectangle is
/// recomputed from node positions on every layout pass, never stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub title: String,
    pub nodes: Vec<Id>,
}

/// Which side of a node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Flow into the node (left side).
    In,
    /// Flow out of the node (right side).
    Out,
}

impl Direction {
    /// The wire-format prefix for port ids in this direction.
    pub fn prefix(self) -> &'static str {
        match self {
            Direction::In => "in-",
            Direction::Out => "out-",
        }
    }
}

/// A typed reference to a link attachment point on a node.
///
/// An expanded node exposes one port per subdivision and side; a collapsed
/// node exposes a single default port per side (`subdivision: None`). The
/// `Display` form matches the string ids used on the wire: `out-solar`,
/// `in-` (collapsed).
///
/// # Examples
///
/// ```
/// use estuary_core::flow::PortRef;
/// use estuary_core::identifier::Id;
///
/// assert_eq!(PortRef::out(Some(Id::new("solar"))).to_string(), "out-solar");
/// assert_eq!(PortRef::in_(None).to_string(), "in-");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub direction: Direction,
    pub subdivision: Option<Id>,
}

impl PortRef {
    /// An outgoing port, on a subdivision or the collapsed default.
    pub fn out(subdivision: Option<Id>) -> Self {
        Self {
            direction: Direction::Out,
            subdivision,
        }
    }

    /// An incoming port, on a subdivision or the collapsed default.
    pub fn in_(subdivision: Option<Id>) -> Self {
        Self {
            direction: Direction::In,
            subdivision,
        }
    }

    /// True for the single default port a collapsed node exposes per side.
    pub fn is_default(&self) -> bool {
        self.subdivision.is_none()
    }
}

impl Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subdivision {
            Some(sub) => write!(f, "{}{}", self.direction.prefix(), sub),
            None => write!(f, "{}", self.direction.prefix()),
        }
    }
}
