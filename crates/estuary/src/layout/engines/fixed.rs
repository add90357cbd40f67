//! The fixed-position Sankey engine.
//!
//! Node positions come from the dataset; this engine never moves a node.
//! Its work is port placement: ordering each node side's links by port,
//! stacking them without gaps, and emitting interpolatable ribbon geometry.

use std::collections::HashMap;

use log::trace;

use estuary_core::{
    flow::{Dataset, Direction, PortRef},
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::{
    aggregate::AggregateLink,
    error::EstuaryError,
    layout::engines::SankeyEngine,
    layout::graph::{
        LinkGeometry, LinkPoint, PositionedGraph, PositionedGroup, PositionedLink, PositionedNode,
        PositionedPort,
    },
    prepare::{NodeCatalog, NodeDetail},
};

/// Constrained Sankey placement with externally supplied node coordinates.
#[derive(Debug, Clone)]
pub struct FixedPositionEngine {
    node_width: f32,
    scale: f32,
    min_link_width: f32,
}

impl FixedPositionEngine {
    pub fn new(node_width: f32, scale: f32, min_link_width: f32) -> Self {
        Self {
            node_width,
            scale,
            min_link_width,
        }
    }

    /// Stack one node side's links: sort by port order, then by the far
    /// node's top edge, then by id for determinism; assign each link its
    /// cumulative offset from its port's top.
    fn place_side(
        &self,
        detail: &NodeDetail,
        indices: &mut [usize],
        links: &[AggregateLink],
        bounds_by_node: &HashMap<Id, Bounds>,
        side: Direction,
        offsets: &mut [f32],
    ) {
        let port_of = |link: &AggregateLink| match side {
            Direction::Out => link.source_port,
            Direction::In => link.target_port,
        };
        let far_top = |link: &AggregateLink| {
            let far = match side {
                Direction::Out => link.target,
                Direction::In => link.source,
            };
            bounds_by_node.get(&far).map(|b| b.min_y()).unwrap_or(0.0)
        };

        indices.sort_by(|&a, &b| {
            let (la, lb) = (&links[a], &links[b]);
            detail
                .port_order(&port_of(la))
                .cmp(&detail.port_order(&port_of(lb)))
                .then_with(|| far_top(la).total_cmp(&far_top(lb)))
                .then_with(|| la.id.to_string().cmp(&lb.id.to_string()))
        });

        // Cursor per port, starting at the port's span offset.
        let mut cursors: HashMap<Option<Id>, f32> = HashMap::new();
        for &idx in indices.iter() {
            let port = port_of(&links[idx]);
            let base = detail.resolve_port(&port).map(|span| span.y).unwrap_or(0.0);
            let cursor = cursors.entry(port.subdivision).or_insert(base);
            offsets[idx] = *cursor;
            *cursor += self.scale * links[idx].value;
        }
    }

    /// The ports a node side actually exposes for the current link set,
    /// with their absolute placement.
    fn collect_ports(
        &self,
        detail: &NodeDetail,
        bounds: Bounds,
        links: &[AggregateLink],
        node: Id,
    ) -> Vec<PositionedPort> {
        let mut seen: Vec<PortRef> = Vec::new();
        for link in links {
            if link.source == node && !seen.contains(&link.source_port) {
                seen.push(link.source_port);
            }
            if link.target == node && !seen.contains(&link.target_port) {
                seen.push(link.target_port);
            }
        }

        let mut ports: Vec<PositionedPort> = seen
            .into_iter()
            .map(|port| {
                let span = detail.resolve_port(&port);
                PositionedPort {
                    port,
                    y: bounds.min_y() + span.map(|s| s.y).unwrap_or(0.0),
                    dy: span.map(|s| s.dy).unwrap_or_else(|| detail.dy()),
                }
            })
            .collect();
        ports.sort_by_key(|p| (p.port.direction == Direction::Out, detail.port_order(&p.port)));
        ports
    }

    /// Ribbon geometry between two port anchors: two points sharing the
    /// radii of the S-curve arcs through them. The radius diverges as the
    /// link approaches horizontal; render sync clamps it before animating.
    fn link_geometry(&self, x0: f32, y0: f32, x1: f32, y1: f32, dy: f32) -> LinkGeometry {
        let dx = x1 - x0;
        let dv = y1 - y0;
        let r = if dv.abs() < f32::EPSILON {
            0.0
        } else {
            (dx * dx + dv * dv) / (4.0 * dv.abs())
        };
        let ri = (r - dy / 2.0).max(0.0);
        let ro = r + dy / 2.0;
        LinkGeometry {
            points: vec![
                LinkPoint { x: x0, y: y0, ri, ro },
                LinkPoint { x: x1, y: y1, ri, ro },
            ],
            dy,
        }
    }
}

impl SankeyEngine for FixedPositionEngine {
    fn calculate(
        &self,
        dataset: &Dataset,
        catalog: &NodeCatalog,
        links: &[AggregateLink],
    ) -> Result<PositionedGraph, EstuaryError> {
        // Node bounds from the fixed positions and scaled heights.
        let mut bounds_by_node: HashMap<Id, Bounds> = HashMap::with_capacity(dataset.nodes.len());
        for node in &dataset.nodes {
            let detail = catalog
                .detail(node.id)
                .ok_or_else(|| EstuaryError::Layout(format!("node `{}` not prepared", node.id)))?;
            let bounds = Bounds::new_from_top_left(
                Point::new(node.geometry.x, node.geometry.y),
                Size::new(self.node_width, detail.dy()),
            );
            bounds_by_node.insert(node.id, bounds);
        }

        for link in links {
            if !bounds_by_node.contains_key(&link.source) {
                return Err(EstuaryError::Layout(format!(
                    "link source `{}` is not a node",
                    link.source
                )));
            }
            if !bounds_by_node.contains_key(&link.target) {
                return Err(EstuaryError::Layout(format!(
                    "link target `{}` is not a node",
                    link.target
                )));
            }
        }

        // Per-side link ordering and stacking offsets.
        let mut out_by_node: HashMap<Id, Vec<usize>> = HashMap::new();
        let mut in_by_node: HashMap<Id, Vec<usize>> = HashMap::new();
        for (idx, link) in links.iter().enumerate() {
            out_by_node.entry(link.source).or_default().push(idx);
            in_by_node.entry(link.target).or_default().push(idx);
        }

        let mut source_offsets = vec![0.0f32; links.len()];
        let mut target_offsets = vec![0.0f32; links.len()];
        for (node, indices) in &mut out_by_node {
            let detail = catalog.detail(*node).expect("endpoints checked above");
            self.place_side(
                detail,
                indices,
                links,
                &bounds_by_node,
                Direction::Out,
                &mut source_offsets,
            );
        }
        for (node, indices) in &mut in_by_node {
            let detail = catalog.detail(*node).expect("endpoints checked above");
            self.place_side(
                detail,
                indices,
                links,
                &bounds_by_node,
                Direction::In,
                &mut target_offsets,
            );
        }

        let nodes: Vec<PositionedNode> = dataset
            .nodes
            .iter()
            .map(|node| {
                let detail = catalog.detail(node.id).expect("prepared above");
                let bounds = bounds_by_node[&node.id];
                PositionedNode {
                    id: node.id,
                    bounds,
                    ports: self.collect_ports(detail, bounds, links, node.id),
                }
            })
            .collect();

        let positioned_links: Vec<PositionedLink> = links
            .iter()
            .enumerate()
            .map(|(idx, link)| {
                let sb = bounds_by_node[&link.source];
                let tb = bounds_by_node[&link.target];
                let dy_raw = self.scale * link.value;
                let y0 = sb.min_y() + source_offsets[idx] + dy_raw / 2.0;
                let y1 = tb.min_y() + target_offsets[idx] + dy_raw / 2.0;
                let geometry = self.link_geometry(
                    sb.max_x(),
                    y0,
                    tb.min_x(),
                    y1,
                    dy_raw.max(self.min_link_width),
                );
                PositionedLink {
                    id: link.id,
                    source: link.source,
                    target: link.target,
                    source_port: link.source_port,
                    target_port: link.target_port,
                    value: link.value,
                    geometry,
                    sublinks: link.sublinks.clone(),
                    style: link.style.clone(),
                }
            })
            .collect();

        // Group rectangles: merged member bounds. Members missing from the
        // dataset were rejected at bind; stragglers are skipped here.
        let groups: Vec<PositionedGroup> = dataset
            .groups
            .iter()
            .map(|group| {
                let mut members = group
                    .nodes
                    .iter()
                    .filter_map(|id| bounds_by_node.get(id).copied());
                let rect = members
                    .next()
                    .map(|first| members.fold(first, |acc, b| acc.merge(&b)))
                    .unwrap_or_default();
                PositionedGroup {
                    title: group.title.clone(),
                    nodes: group.nodes.clone(),
                    rect,
                }
            })
            .collect();

        trace!(
            nodes = nodes.len(),
            links = positioned_links.len(),
            groups = groups.len();
            "Calculated fixed-position layout"
        );

        Ok(PositionedGraph {
            nodes,
            links: positioned_links,
            groups,
        })
    }
}
