//! Node preparation: the derived-geometry side table.
//!
//! [`NodeCatalog::prepare`] turns the caller's node list and the diagram
//! scale into per-node [`NodeDetail`] records: scaled subdivision spans with
//! cumulative offsets, a uniform port/subdivision lookup, and the precomputed
//! whole-node span used whenever a node renders without its subdivisions.
//!
//! The catalog is owned by the diagram instance and rebuilt on every bind;
//! caller data is read, never annotated.

use std::collections::HashMap;

use log::debug;

use estuary_core::{
    color::Color,
    flow::{Node, PortRef},
    identifier::Id,
};

use crate::error::EstuaryError;

/// A subdivision with its derived geometry: height `dy` at the diagram
/// scale, cumulative top offset `y` within the node, and sequence `index`.
///
/// Spans stack in dataset order with no gaps: each span's `y` is the sum of
/// the `dy` of the spans before it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubdivisionSpan {
    pub id: Id,
    pub label: String,
    pub description: String,
    pub value: f32,
    pub dy: f32,
    pub y: f32,
    pub index: usize,
}

/// Derived per-node state: scaled height, ordered subdivision spans, and
/// the whole-node span standing in when subdivisions are not shown.
#[derive(Debug, Clone)]
pub struct NodeDetail {
    id: Id,
    title: String,
    color: Color,
    hidden: bool,
    /// Node height at the diagram scale.
    dy: f32,
    spans: Vec<SubdivisionSpan>,
    by_sub: HashMap<Id, usize>,
    whole: SubdivisionSpan,
}

impl NodeDetail {
    fn new(node: &Node, scale: f32) -> Result<Self, EstuaryError> {
        let color = match &node.color {
            Some(css) => Color::new(css)
                .map_err(|err| EstuaryError::Config(format!("node `{}`: {err}", node.id)))?,
            None => Color::default(),
        };

        let mut spans = Vec::with_capacity(node.subdivisions.len());
        let mut by_sub = HashMap::with_capacity(node.subdivisions.len());
        let mut y = 0.0;
        for (index, sub) in node.subdivisions.iter().enumerate() {
            let dy = scale * sub.value;
            spans.push(SubdivisionSpan {
                id: sub.id,
                label: sub.label.clone(),
                description: sub.description.clone(),
                value: sub.value,
                dy,
                y,
                index,
            });
            y += dy;
            by_sub.insert(sub.id, index);
        }

        let dy = scale * node.value;
        // The explicit stand-in for "no subdivision": full node height,
        // empty id, first in port order.
        let whole = SubdivisionSpan {
            id: Id::empty(),
            label: String::new(),
            description: String::new(),
            value: node.value,
            dy,
            y: 0.0,
            index: 0,
        };

        Ok(Self {
            id: node.id,
            title: node.title.clone(),
            color,
            hidden: node.style.hidden,
            dy,
            spans,
            by_sub,
            whole,
        })
    }

    /// The node's id.
    pub fn id(&self) -> Id {
        self.id
    }

    /// The node's display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The node's base color (grey when the dataset sets none).
    pub fn color(&self) -> Color {
        self.color
    }

    /// True when the node renders invisible but keeps its layout slot.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Node height at the diagram scale.
    pub fn dy(&self) -> f32 {
        self.dy
    }

    /// Ordered subdivision spans.
    pub fn spans(&self) -> &[SubdivisionSpan] {
        &self.spans
    }

    /// True when the node has at least one subdivision.
    pub fn has_subdivisions(&self) -> bool {
        !self.spans.is_empty()
    }

    /// The whole-node span used when subdivisions are not shown.
    pub fn whole(&self) -> &SubdivisionSpan {
        &self.whole
    }

    /// Looks up a span by subdivision id.
    pub fn span(&self, subdivision: Id) -> Option<&SubdivisionSpan> {
        self.by_sub.get(&subdivision).map(|&idx| &self.spans[idx])
    }

    /// Resolves a port reference to its subdivision span.
    ///
    /// Resolution is uniform across directions: `in-s1` and `out-s1` both
    /// resolve to span `s1`. Default ports and unknown subdivision ids
    /// resolve to `None`, which downstream code treats as "no subdivision"
    /// rather than an error.
    pub fn resolve_port(&self, port: &PortRef) -> Option<&SubdivisionSpan> {
        port.subdivision.and_then(|sub| self.span(sub))
    }

    /// Sort key for port ordering: the subdivision index, or 0 for the
    /// default/collapsed port so it sorts first.
    pub fn port_order(&self, port: &PortRef) -> usize {
        self.resolve_port(port).map(|span| span.index).unwrap_or(0)
    }

    /// Tooltip title for a port: the node title, with the subdivision label
    /// in parentheses when the port resolves to a labeled span.
    pub fn port_title(&self, port: &PortRef) -> String {
        match self.resolve_port(port) {
            Some(span) if !span.label.is_empty() => format!("{} ({})", self.title, span.label),
            _ => self.title.clone(),
        }
    }
}

/// Side table of [`NodeDetail`] records, keyed by node id.
///
/// A pure function of the node list and the scale factor: preparing the
/// same inputs twice yields the same catalog.
#[derive(Debug, Clone, Default)]
pub struct NodeCatalog {
    details: HashMap<Id, NodeDetail>,
}

impl NodeCatalog {
    /// Builds the catalog for `nodes` at `scale`.
    ///
    /// # Errors
    ///
    /// Returns `EstuaryError::Config` for duplicate node ids or unparseable
    /// node colors; both are setup mistakes the host must fix.
    pub fn prepare(nodes: &[Node], scale: f32) -> Result<Self, EstuaryError> {
        let mut details = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let detail = NodeDetail::new(node, scale)?;
            if details.insert(node.id, detail).is_some() {
                return Err(EstuaryError::Config(format!(
                    "duplicate node id `{}`",
                    node.id
                )));
            }
        }
        debug!(nodes = details.len(); "Prepared node catalog");
        Ok(Self { details })
    }

    /// Looks up the detail record for `node`.
    pub fn detail(&self, node: Id) -> Option<&NodeDetail> {
        self.details.get(&node)
    }

    /// True when the catalog contains `node`.
    pub fn contains(&self, node: Id) -> bool {
        self.details.contains_key(&node)
    }

    /// Number of cataloged nodes.
    pub fn len(&self) -> usize {
        self.details.len()
    }

    /// True when no nodes are cataloged.
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}
