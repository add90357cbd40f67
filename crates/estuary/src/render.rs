//! Render sync: diffing positioned graphs into render plans.
//!
//! The engine never touches a scene graph. Each pass, [`RenderSync`] diffs
//! the new [`PositionedGraph`] against the elements it knows to be on
//! screen and emits a [`RenderPlan`]: typed enter/update/exit operations
//! with interpolation endpoints. A host (DOM, canvas, the bundled SVG
//! snapshot exporter) owns element lifetime and timing and applies the plan.
//!
//! Entering links and subdivisions initialize to their own target geometry,
//! so first appearance never animates. Updates carry `from`/`to` geometry
//! with corner radii clamped to [`MAX_LINK_RADIUS`] on both endpoints; a
//! collapsed link's arc radius can be arbitrarily large, and interpolating
//! from it to a thin expanded sub-link would produce degenerate curves.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use log::trace;

use estuary_core::{color::Color, geometry::Bounds, identifier::Id};

use crate::{
    layout::graph::{LinkGeometry, PositionedGraph, PositionedLink},
    prepare::{NodeCatalog, SubdivisionSpan},
    state::{Expansion, ExpansionMap, Hover},
};

/// Upper bound on link corner radii, applied before interpolation.
pub const MAX_LINK_RADIUS: f32 = 1e3;

/// Subdivision labels disappear below this span height.
const MIN_LABEL_HEIGHT: f32 = 10.0;

/// Inputs a sync pass needs beyond the graph itself.
pub struct RenderContext<'a> {
    pub catalog: &'a NodeCatalog,
    pub expansion: &'a ExpansionMap,
    pub hover: Hover,
    /// Suppress subdivision ops for this pass (first phase of an expand).
    pub skip_subdivisions: bool,
    pub duration: Duration,
    pub shade_contrast: f32,
    pub dim_opacity: f32,
}

/// Where a node title sits relative to its bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePlacement {
    /// Above the bar: expanded nodes and bars too short to hold a label.
    Above,
    /// Vertically centered beside the bar.
    Middle,
}

/// Paint state of a link, identical for enters and updates.
#[derive(Debug, Clone)]
pub struct LinkVisual {
    pub id: Id,
    pub source: Id,
    pub target: Id,
    pub fill: Color,
    pub opacity: f32,
    /// Tooltip: `Source (label) → Target (label): value`.
    pub title: String,
    pub style: Option<String>,
}

/// One link operation in a plan.
#[derive(Debug, Clone)]
pub enum LinkOp {
    /// Create the element at `geometry`; no animation.
    Enter {
        visual: LinkVisual,
        geometry: LinkGeometry,
    },
    /// Animate the element from `from` to `to` over the plan duration.
    Update {
        visual: LinkVisual,
        from: LinkGeometry,
        to: LinkGeometry,
    },
    /// Remove the element.
    Exit { id: Id },
}

/// Paint state of a subdivision segment, relative to its node's top edge.
#[derive(Debug, Clone)]
pub struct SubdivisionVisual {
    pub id: Id,
    pub y: f32,
    pub dy: f32,
    pub fill: Color,
    pub opacity: f32,
    pub label: String,
    pub label_visible: bool,
}

/// One subdivision operation within a node.
#[derive(Debug, Clone)]
pub enum SubdivisionOp {
    Enter(SubdivisionVisual),
    Update(SubdivisionVisual),
    Exit { id: Id },
}

/// Paint state of a node bar.
#[derive(Debug, Clone)]
pub struct NodeVisual {
    pub id: Id,
    pub bounds: Bounds,
    pub title: String,
    pub value: f32,
    pub visible: bool,
    /// True while the node shows subdivisions (expanded or transitioning).
    pub expanded: bool,
    pub title_placement: TitlePlacement,
    /// `None` when this pass suppresses subdivision re-render.
    pub subdivisions: Option<Vec<SubdivisionOp>>,
}

/// One node operation in a plan.
#[derive(Debug, Clone)]
pub enum NodeOp {
    Enter(NodeVisual),
    Update(NodeVisual),
    Exit { id: Id },
}

/// A group outline, recomputed (not diffed) every pass.
#[derive(Debug, Clone)]
pub struct GroupOp {
    pub title: String,
    pub rect: Bounds,
    /// Untitled groups stay invisible.
    pub visible: bool,
}

/// The operations for one pass, in application order: link exits first,
/// then links in paint order, then nodes, then groups.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub duration: Duration,
    pub links: Vec<LinkOp>,
    pub nodes: Vec<NodeOp>,
    pub groups: Vec<GroupOp>,
}

/// Alternating subdivision shading: odd indices brighten the base color,
/// even indices (and the indexless collapsed case) darken it.
pub(crate) fn shade(base: Color, index: Option<usize>, contrast: f32) -> Color {
    match index {
        Some(i) if i % 2 == 1 => base.brighter(contrast),
        _ => base.darker(contrast),
    }
}

/// Retained on-screen element state, diffed against each new graph.
#[derive(Debug, Default)]
pub struct RenderSync {
    links: HashMap<Id, LinkGeometry>,
    nodes: HashSet<Id>,
    node_subs: HashMap<Id, HashSet<Id>>,
}

impl RenderSync {
    /// A sync with no on-screen elements (fresh bind).
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `graph` against the retained state and emit the plan.
    pub fn sync(&mut self, graph: &PositionedGraph, ctx: &RenderContext<'_>) -> RenderPlan {
        let links = self.sync_links(graph, ctx);
        let nodes = self.sync_nodes(graph, ctx);
        let groups = graph
            .groups
            .iter()
            .map(|group| GroupOp {
                title: group.title.clone(),
                rect: group.rect,
                visible: !group.title.is_empty(),
            })
            .collect();

        trace!(links = links.len(), nodes = nodes.len(); "Computed render plan");
        RenderPlan {
            duration: ctx.duration,
            links,
            nodes,
            groups,
        }
    }

    fn sync_links(&mut self, graph: &PositionedGraph, ctx: &RenderContext<'_>) -> Vec<LinkOp> {
        let mut ops = Vec::with_capacity(graph.links.len() + 1);

        // Exits first, as removal frees the ids' place in the scene.
        let next_ids: HashSet<Id> = graph.links.iter().map(|link| link.id).collect();
        let mut gone: Vec<Id> = self
            .links
            .keys()
            .copied()
            .filter(|id| !next_ids.contains(id))
            .collect();
        gone.sort_by_key(|id| id.to_string());
        for id in gone {
            self.links.remove(&id);
            ops.push(LinkOp::Exit { id });
        }

        // Paint order: hover-related links last (drawn on top), the rest
        // stable by the source node's vertical offset.
        let mut order: Vec<usize> = (0..graph.links.len()).collect();
        let source_top = |link: &PositionedLink| {
            graph
                .node(link.source)
                .map(|node| node.bounds.min_y())
                .unwrap_or(0.0)
        };
        order.sort_by(|&a, &b| {
            let (la, lb) = (&graph.links[a], &graph.links[b]);
            let related = |l| link_related(ctx.hover, l) as u8;
            related(la)
                .cmp(&related(lb))
                .then_with(|| source_top(la).total_cmp(&source_top(lb)))
        });

        for idx in order {
            let link = &graph.links[idx];
            let mut to = link.geometry.clone();
            to.clamp_radii(MAX_LINK_RADIUS);
            let visual = self.link_visual(link, ctx);

            match self.links.insert(link.id, to.clone()) {
                Some(from) => ops.push(LinkOp::Update { visual, from, to }),
                None => ops.push(LinkOp::Enter {
                    visual,
                    geometry: to,
                }),
            }
        }

        ops
    }

    fn link_visual(&self, link: &PositionedLink, ctx: &RenderContext<'_>) -> LinkVisual {
        let source_detail = ctx.catalog.detail(link.source);
        let fill = match source_detail {
            Some(detail) => shade(
                detail.color(),
                detail.resolve_port(&link.source_port).map(|span| span.index),
                ctx.shade_contrast,
            ),
            None => shade(Color::default(), None, ctx.shade_contrast),
        };

        let opacity = match ctx.hover {
            Hover::None => 1.0,
            _ if link_related(ctx.hover, link) => 1.0,
            _ => ctx.dim_opacity,
        };

        let source_title = source_detail
            .map(|detail| detail.port_title(&link.source_port))
            .unwrap_or_else(|| link.source.to_string());
        let target_title = ctx
            .catalog
            .detail(link.target)
            .map(|detail| detail.port_title(&link.target_port))
            .unwrap_or_else(|| link.target.to_string());
        let title = format!("{source_title} → {target_title}: {:.1}", link.value);

        LinkVisual {
            id: link.id,
            source: link.source,
            target: link.target,
            fill,
            opacity,
            title,
            style: link.style.clone(),
        }
    }

    fn sync_nodes(&mut self, graph: &PositionedGraph, ctx: &RenderContext<'_>) -> Vec<NodeOp> {
        let mut ops = Vec::with_capacity(graph.nodes.len());

        let next_ids: HashSet<Id> = graph.nodes.iter().map(|node| node.id).collect();
        let mut gone: Vec<Id> = self
            .nodes
            .iter()
            .copied()
            .filter(|id| !next_ids.contains(id))
            .collect();
        gone.sort_by_key(|id| id.to_string());
        for id in gone {
            self.nodes.remove(&id);
            self.node_subs.remove(&id);
            ops.push(NodeOp::Exit { id });
        }

        for node in &graph.nodes {
            let Some(detail) = ctx.catalog.detail(node.id) else {
                continue;
            };

            // Subdivisions show while expanded or mid-transition; the
            // whole-node span stands in otherwise.
            let expansion = ctx.expansion.get(node.id);
            let spans: Vec<&SubdivisionSpan> = match expansion {
                Expansion::Expanded | Expansion::Transitioning if detail.has_subdivisions() => {
                    detail.spans().iter().collect()
                }
                Expansion::Expanded | Expansion::Transitioning | Expansion::Collapsed => {
                    vec![detail.whole()]
                }
            };
            let expanded = match expansion {
                Expansion::Expanded | Expansion::Transitioning => true,
                Expansion::Collapsed => false,
            };

            let subdivisions = if ctx.skip_subdivisions {
                None
            } else {
                Some(self.sync_subdivisions(node.id, detail.color(), &spans, ctx))
            };

            let title_placement = if expanded || detail.dy() < MIN_LABEL_HEIGHT {
                TitlePlacement::Above
            } else {
                TitlePlacement::Middle
            };

            let visual = NodeVisual {
                id: node.id,
                bounds: node.bounds,
                title: detail.title().to_string(),
                value: detail.whole().value,
                visible: !detail.hidden(),
                expanded,
                title_placement,
                subdivisions,
            };

            if self.nodes.insert(node.id) {
                ops.push(NodeOp::Enter(visual));
            } else {
                ops.push(NodeOp::Update(visual));
            }
        }

        ops
    }

    fn sync_subdivisions(
        &mut self,
        node: Id,
        base_color: Color,
        spans: &[&SubdivisionSpan],
        ctx: &RenderContext<'_>,
    ) -> Vec<SubdivisionOp> {
        let on_screen = self.node_subs.entry(node).or_default();
        let mut ops = Vec::with_capacity(spans.len() + 1);

        let next_ids: HashSet<Id> = spans.iter().map(|span| span.id).collect();
        let mut gone: Vec<Id> = on_screen
            .iter()
            .copied()
            .filter(|id| !next_ids.contains(id))
            .collect();
        gone.sort_by_key(|id| id.to_string());
        for id in gone {
            on_screen.remove(&id);
            ops.push(SubdivisionOp::Exit { id });
        }

        for span in spans {
            let opacity = match ctx.hover {
                Hover::None => 1.0,
                Hover::Node(id) if id == node => 1.0,
                Hover::Subdivision {
                    node: hover_node,
                    subdivision,
                } if hover_node == node && subdivision == span.id => 1.0,
                Hover::Node(_) | Hover::Subdivision { .. } => ctx.dim_opacity,
            };

            let visual = SubdivisionVisual {
                id: span.id,
                y: span.y,
                dy: span.dy,
                fill: shade(base_color, Some(span.index), ctx.shade_contrast),
                opacity,
                label: span.label.clone(),
                label_visible: span.dy > MIN_LABEL_HEIGHT,
            };

            if on_screen.insert(span.id) {
                ops.push(SubdivisionOp::Enter(visual));
            } else {
                ops.push(SubdivisionOp::Update(visual));
            }
        }

        ops
    }
}

/// Whether the active hover involves this link: its source or target node,
/// or the exact subdivision one of its ports attaches to.
fn link_related(hover: Hover, link: &PositionedLink) -> bool {
    match hover {
        Hover::None => false,
        Hover::Node(id) => link.source == id || link.target == id,
        Hover::Subdivision { node, subdivision } => {
            (link.source == node && link.source_port.subdivision == Some(subdivision))
                || (link.target == node && link.target_port.subdivision == Some(subdivision))
        }
    }
}

#[cfg(test)]
mod tests {
    use estuary_core::flow::PortRef;

    use crate::layout::graph::LinkPoint;

    use super::*;

    fn geometry(y0: f32, ri: f32) -> LinkGeometry {
        LinkGeometry {
            points: vec![
                LinkPoint {
                    x: 60.0,
                    y: y0,
                    ri,
                    ro: ri,
                },
                LinkPoint {
                    x: 200.0,
                    y: y0 + 5.0,
                    ri,
                    ro: ri,
                },
            ],
            dy: 8.0,
        }
    }

    fn positioned_link(id: &str, source: &str, target: &str, y0: f32, ri: f32) -> PositionedLink {
        PositionedLink {
            id: Id::new(id),
            source: Id::new(source),
            target: Id::new(target),
            source_port: PortRef::out(None),
            target_port: PortRef::in_(None),
            value: 8.0,
            geometry: geometry(y0, ri),
            sublinks: vec![],
            style: None,
        }
    }

    fn context<'a>(
        catalog: &'a NodeCatalog,
        expansion: &'a ExpansionMap,
        hover: Hover,
    ) -> RenderContext<'a> {
        RenderContext {
            catalog,
            expansion,
            hover,
            skip_subdivisions: false,
            duration: Duration::from_millis(1000),
            shade_contrast: 0.3,
            dim_opacity: 0.5,
        }
    }

    #[test]
    fn test_enter_then_update_then_exit() {
        let catalog = NodeCatalog::default();
        let expansion = ExpansionMap::new();
        let mut sync = RenderSync::new();

        let mut graph = PositionedGraph::default();
        graph.links.push(positioned_link("l1", "a", "b", 10.0, 1.0));

        let plan = sync.sync(&graph, &context(&catalog, &expansion, Hover::None));
        assert!(matches!(plan.links[0], LinkOp::Enter { .. }));

        // Same link again, moved: update from the previous geometry
        graph.links[0].geometry = geometry(30.0, 1.0);
        let plan = sync.sync(&graph, &context(&catalog, &expansion, Hover::None));
        match &plan.links[0] {
            LinkOp::Update { from, to, .. } => {
                assert_eq!(from.points[0].y, 10.0);
                assert_eq!(to.points[0].y, 30.0);
            }
            other => panic!("expected update, got {other:?}"),
        }

        // Gone: exit
        graph.links.clear();
        let plan = sync.sync(&graph, &context(&catalog, &expansion, Hover::None));
        assert!(matches!(plan.links[0], LinkOp::Exit { .. }));
        assert_eq!(plan.links.len(), 1);
    }

    #[test]
    fn test_radii_clamped_on_both_endpoints() {
        let catalog = NodeCatalog::default();
        let expansion = ExpansionMap::new();
        let mut sync = RenderSync::new();

        let mut graph = PositionedGraph::default();
        graph.links.push(positioned_link("l1", "a", "b", 10.0, 5e6));
        let plan = sync.sync(&graph, &context(&catalog, &expansion, Hover::None));
        match &plan.links[0] {
            LinkOp::Enter { geometry, .. } => assert_eq!(geometry.points[0].ri, MAX_LINK_RADIUS),
            other => panic!("expected enter, got {other:?}"),
        }

        graph.links[0].geometry = geometry(10.0, 2.0);
        let plan = sync.sync(&graph, &context(&catalog, &expansion, Hover::None));
        match &plan.links[0] {
            LinkOp::Update { from, to, .. } => {
                // The retained from-geometry was stored clamped
                assert_eq!(from.points[0].ri, MAX_LINK_RADIUS);
                assert_eq!(to.points[0].ri, 2.0);
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_hovered_links_sort_last_and_others_dim() {
        let catalog = NodeCatalog::default();
        let expansion = ExpansionMap::new();
        let mut sync = RenderSync::new();

        let mut graph = PositionedGraph::default();
        graph.links.push(positioned_link("l1", "a", "b", 10.0, 1.0));
        graph.links.push(positioned_link("l2", "c", "d", 20.0, 1.0));

        let hover = Hover::Node(Id::new("a"));
        let plan = sync.sync(&graph, &context(&catalog, &expansion, hover));

        let ids: Vec<Id> = plan
            .links
            .iter()
            .map(|op| match op {
                LinkOp::Enter { visual, .. } | LinkOp::Update { visual, .. } => visual.id,
                LinkOp::Exit { id } => *id,
            })
            .collect();
        // Hover-related l1 paints last
        assert_eq!(ids, vec![Id::new("l2"), Id::new("l1")]);

        for op in &plan.links {
            if let LinkOp::Enter { visual, .. } = op {
                if visual.id == "l1" {
                    assert_eq!(visual.opacity, 1.0);
                } else {
                    assert_eq!(visual.opacity, 0.5);
                }
            }
        }
    }

    #[test]
    fn test_no_hover_everything_full_opacity() {
        let catalog = NodeCatalog::default();
        let expansion = ExpansionMap::new();
        let mut sync = RenderSync::new();

        let mut graph = PositionedGraph::default();
        graph.links.push(positioned_link("l1", "a", "b", 10.0, 1.0));
        let plan = sync.sync(&graph, &context(&catalog, &expansion, Hover::None));

        match &plan.links[0] {
            LinkOp::Enter { visual, .. } => assert_eq!(visual.opacity, 1.0),
            other => panic!("expected enter, got {other:?}"),
        }
    }
}
