//! Static SVG snapshot of a diagram's current state.
//!
//! This is the bundled reference host for the render-plan seam: it runs a
//! fresh render sync over the positioned graph (so every element arrives as
//! an enter operation) and applies the resulting plan to an in-memory
//! [`svg::Document`]. The scene structure mirrors the interactive hosts the
//! engine targets: a `groups` layer, a `links` layer, and a `nodes` layer
//! with per-node subdivision segments.
//!
//! Snapshots are static: animation endpoints are resolved at their targets
//! and no timing information is emitted.

use svg::node::element::path::Data;
use svg::node::element::{Group, Path, Rectangle, Text as TextElement, Title};
use svg::Document;

use estuary_core::geometry::{Bounds, Insets};

use crate::{
    config::DiagramConfig,
    layout::graph::{LinkGeometry, PositionedGraph},
    prepare::NodeCatalog,
    render::{
        LinkOp, NodeOp, NodeVisual, RenderContext, RenderPlan, RenderSync, SubdivisionOp,
        TitlePlacement,
    },
    state::{ExpansionMap, Hover},
};

/// Margin around the diagram content.
const MARGIN: f32 = 20.0;

/// Visual padding around group outlines.
const GROUP_PADDING: f32 = 10.0;

/// Renders a static snapshot of `graph` under the given interaction state.
pub fn snapshot(
    graph: &PositionedGraph,
    catalog: &NodeCatalog,
    expansion: &ExpansionMap,
    hover: Hover,
    config: &DiagramConfig,
) -> String {
    // A throwaway sync: against an empty scene everything enters, which is
    // exactly a snapshot.
    let mut sync = RenderSync::new();
    let ctx = RenderContext {
        catalog,
        expansion,
        hover,
        skip_subdivisions: false,
        duration: config.transition().duration(),
        shade_contrast: config.style().shade_contrast(),
        dim_opacity: config.style().dim_opacity(),
    };
    let plan = sync.sync(graph, &ctx);

    let extent = content_bounds(graph).add_padding(Insets::uniform(MARGIN));
    let document = Document::new()
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                extent.min_x(),
                extent.min_y(),
                extent.width(),
                extent.height()
            ),
        )
        .set("width", extent.width())
        .set("height", extent.height())
        .add(render_groups(&plan))
        .add(render_links(&plan))
        .add(render_nodes(&plan));

    document.to_string()
}

fn content_bounds(graph: &PositionedGraph) -> Bounds {
    let mut all = graph
        .nodes
        .iter()
        .map(|node| node.bounds)
        .chain(graph.groups.iter().map(|group| group.rect));
    all.next()
        .map(|first| all.fold(first, |acc, b| acc.merge(&b)))
        .unwrap_or_default()
}

fn render_groups(plan: &RenderPlan) -> Group {
    let mut layer = Group::new().set("class", "groups");
    for group in &plan.groups {
        if !group.visible {
            continue;
        }
        let outline = group.rect.add_padding(Insets::uniform(GROUP_PADDING));
        let element = Group::new()
            .set("class", "group")
            .add(
                Rectangle::new()
                    .set("x", outline.min_x())
                    .set("y", outline.min_y())
                    .set("width", outline.width())
                    .set("height", outline.height())
                    .set("fill", "none")
                    .set("stroke", "#bbbbbb"),
            )
            .add(
                TextElement::new(group.title.clone())
                    .set("x", group.rect.min_x())
                    .set("y", group.rect.min_y() - 15.0),
            );
        layer = layer.add(element);
    }
    layer
}

fn render_links(plan: &RenderPlan) -> Group {
    let mut layer = Group::new().set("class", "links");
    for op in &plan.links {
        // A fresh sync only enters; exits and updates cannot occur.
        let (visual, geometry) = match op {
            LinkOp::Enter { visual, geometry } => (visual, geometry),
            LinkOp::Update { visual, to, .. } => (visual, to),
            LinkOp::Exit { .. } => continue,
        };

        let element = Group::new()
            .set("class", "link")
            .set("opacity", visual.opacity)
            .add(
                Path::new()
                    .set("d", ribbon_path(geometry))
                    .set("fill", "none")
                    .set("stroke", &visual.fill)
                    .set("stroke-width", geometry.dy),
            )
            .add(Title::new(visual.title.clone()));
        layer = layer.add(element);
    }
    layer
}

/// Ribbon centerline: a cubic with horizontal tangents at both ports.
fn ribbon_path(geometry: &LinkGeometry) -> Data {
    let mut data = Data::new();
    let Some(first) = geometry.points.first() else {
        return data;
    };
    data = data.move_to((first.x, first.y));
    for pair in geometry.points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let mid = (a.x + b.x) / 2.0;
        data = data.cubic_curve_to((mid, a.y, mid, b.y, b.x, b.y));
    }
    data
}

fn render_nodes(plan: &RenderPlan) -> Group {
    let mut layer = Group::new().set("class", "nodes");
    for op in &plan.nodes {
        let visual = match op {
            NodeOp::Enter(visual) | NodeOp::Update(visual) => visual,
            NodeOp::Exit { .. } => continue,
        };
        if !visual.visible {
            continue;
        }
        layer = layer.add(render_node(visual));
    }
    layer
}

fn render_node(visual: &NodeVisual) -> Group {
    let bounds = visual.bounds;
    let mut element = Group::new().set("class", "node");

    if let Some(subdivisions) = &visual.subdivisions {
        let mut segments = Group::new().set("class", "subdivisions");
        for op in subdivisions {
            let sub = match op {
                SubdivisionOp::Enter(sub) | SubdivisionOp::Update(sub) => sub,
                SubdivisionOp::Exit { .. } => continue,
            };
            // Spread half a pixel each side to avoid hairline gaps
            let mut segment = Group::new()
                .set("class", "sub")
                .set("opacity", sub.opacity)
                .add(
                    Rectangle::new()
                        .set("x", bounds.min_x() - 0.5)
                        .set("y", bounds.min_y() + sub.y)
                        .set("width", bounds.width() + 1.0)
                        .set("height", sub.dy)
                        .set("fill", &sub.fill),
                )
                .add(Title::new(sub.label.clone()));
            if sub.label_visible {
                segment = segment.add(
                    TextElement::new(sub.label.clone())
                        .set("x", bounds.min_x() + 4.0)
                        .set("y", bounds.min_y() + sub.y + sub.dy / 2.0)
                        .set("dy", "0.35em"),
                );
            }
            segments = segments.add(segment);
        }
        element = element.add(segments);
    }

    let title = TextElement::new(format!("{}  {:.1}", visual.title, visual.value))
        .set("class", "node-title");
    let title = match visual.title_placement {
        TitlePlacement::Above => title
            .set("x", bounds.min_x() - 4.0)
            .set("y", bounds.min_y() - 8.0),
        TitlePlacement::Middle => title
            .set("x", bounds.min_x() + 4.0)
            .set("y", bounds.min_y() + bounds.height() / 2.0)
            .set("dy", "0.35em"),
    };

    element.add(title)
}

#[cfg(test)]
mod tests {
    use estuary_core::flow::{Dataset, Link, Node, NodeGeometry, NodeStyle, Subdivision};
    use estuary_core::identifier::Id;

    use crate::{aggregate::aggregate, layout::engines::SankeyEngine, layout::EngineBuilder};

    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            nodes: vec![
                Node {
                    id: Id::new("a"),
                    title: "Sources".to_string(),
                    description: String::new(),
                    value: 8.0,
                    color: Some("#1f77b4".to_string()),
                    style: NodeStyle::default(),
                    geometry: NodeGeometry { x: 0.0, y: 0.0 },
                    subdivisions: vec![
                        Subdivision {
                            id: Id::new("s1"),
                            label: "Coal".to_string(),
                            value: 5.0,
                            description: String::new(),
                        },
                        Subdivision {
                            id: Id::new("s2"),
                            label: "Gas".to_string(),
                            value: 3.0,
                            description: String::new(),
                        },
                    ],
                },
                Node {
                    id: Id::new("b"),
                    title: "Uses".to_string(),
                    description: String::new(),
                    value: 8.0,
                    color: None,
                    style: NodeStyle::default(),
                    geometry: NodeGeometry { x: 200.0, y: 0.0 },
                    subdivisions: vec![],
                },
            ],
            links: vec![Link {
                source: Id::new("a"),
                source_sub: Id::new("s1"),
                target: Id::new("b"),
                target_sub: Id::new("t1"),
                value: 8.0,
                style: None,
            }],
            groups: vec![],
        }
    }

    #[test]
    fn test_snapshot_structure() {
        let data = dataset();
        let config = DiagramConfig::default();
        let catalog = NodeCatalog::prepare(&data.nodes, 1.0).unwrap();
        let expansion = ExpansionMap::new();
        let links = aggregate(&data.links, &expansion);
        let engine = EngineBuilder::new().build();
        let graph = engine.calculate(&data, &catalog, &links).unwrap();

        let rendered = snapshot(&graph, &catalog, &expansion, Hover::None, &config);

        assert!(rendered.contains("<svg"));
        assert!(rendered.contains("class=\"links\""));
        assert!(rendered.contains("class=\"nodes\""));
        assert!(rendered.contains("class=\"groups\""));
        assert!(rendered.contains("Sources"));
        // Tooltip for the collapsed link
        assert!(rendered.contains("Sources → Uses: 8.0"));
    }

    #[test]
    fn test_snapshot_hides_hidden_nodes() {
        let mut data = dataset();
        data.nodes[1].style = NodeStyle { hidden: true };
        let config = DiagramConfig::default();
        let catalog = NodeCatalog::prepare(&data.nodes, 1.0).unwrap();
        let expansion = ExpansionMap::new();
        let links = aggregate(&data.links, &expansion);
        let engine = EngineBuilder::new().build();
        let graph = engine.calculate(&data, &catalog, &links).unwrap();

        let rendered = snapshot(&graph, &catalog, &expansion, Hover::None, &config);
        assert!(!rendered.contains("Uses  8.0"));
    }
}
