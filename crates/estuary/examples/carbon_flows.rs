//! Example: An expandable carbon-flow diagram
//!
//! This example builds a small flow dataset programmatically, expands one
//! node the way a click handler would, and writes SVG snapshots of both
//! states.

use std::time::Duration;

use estuary::{
    config::DiagramConfig,
    flow::{Dataset, Group, Link, Node, NodeGeometry, NodeStyle, Subdivision},
    identifier::Id,
    ExpandableSankey,
};

fn node(
    id: &str,
    title: &str,
    value: f32,
    color: &str,
    x: f32,
    y: f32,
    subs: &[(&str, &str, f32)],
) -> Node {
    Node {
        id: Id::new(id),
        title: title.to_string(),
        description: String::new(),
        value,
        color: Some(color.to_string()),
        style: NodeStyle::default(),
        geometry: NodeGeometry { x, y },
        subdivisions: subs
            .iter()
            .map(|(sub_id, label, sub_value)| Subdivision {
                id: Id::new(sub_id),
                label: label.to_string(),
                value: *sub_value,
                description: String::new(),
            })
            .collect(),
    }
}

fn link(source: &str, source_sub: &str, target: &str, target_sub: &str, value: f32) -> Link {
    Link {
        source: Id::new(source),
        source_sub: Id::new(source_sub),
        target: Id::new(target),
        target_sub: Id::new(target_sub),
        value,
        style: None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building carbon flow dataset...\n");

    let dataset = Dataset {
        nodes: vec![
            node(
                "fuel",
                "Fossil fuel",
                100.0,
                "#8c564b",
                0.0,
                40.0,
                &[
                    ("coal", "Coal", 45.0),
                    ("oil", "Oil", 35.0),
                    ("natgas", "Natural gas", 20.0),
                ],
            ),
            node(
                "industry",
                "Industry",
                60.0,
                "#1f77b4",
                300.0,
                0.0,
                &[("steel", "Steel", 25.0), ("cement", "Cement", 35.0)],
            ),
            node(
                "transport",
                "Transport",
                40.0,
                "#ff7f0e",
                300.0,
                160.0,
                &[("road", "Road", 30.0), ("air", "Air", 10.0)],
            ),
        ],
        links: vec![
            link("fuel", "coal", "industry", "steel", 25.0),
            link("fuel", "coal", "industry", "cement", 20.0),
            link("fuel", "oil", "industry", "cement", 15.0),
            link("fuel", "oil", "transport", "road", 15.0),
            link("fuel", "natgas", "transport", "road", 15.0),
            link("fuel", "oil", "transport", "air", 5.0),
            link("fuel", "natgas", "transport", "air", 5.0),
        ],
        groups: vec![Group {
            title: "Emitters".to_string(),
            nodes: vec![Id::new("industry"), Id::new("transport")],
        }],
    };

    let mut diagram = ExpandableSankey::new(DiagramConfig::default());
    diagram.on_click_node(|node| println!("  clicked: {}", node.title));

    diagram.bind(dataset)?;
    println!(
        "Bound: {} links aggregate while everything is collapsed",
        diagram.graph().links.len()
    );
    std::fs::write("carbon_flows_collapsed.svg", diagram.to_svg())?;

    // Expand the fuel node the way a click handler would, then let the
    // transition window elapse
    println!("\nExpanding the fuel node...");
    let plans = diagram.click_node(Id::new("fuel"))?;
    println!("  {} render plans produced", plans.len());
    diagram.advance(Duration::from_millis(1000))?;

    println!(
        "Expanded: {} links now attach to per-subdivision ports",
        diagram.graph().links.len()
    );
    std::fs::write("carbon_flows_expanded.svg", diagram.to_svg())?;

    println!("\nSnapshots written to carbon_flows_collapsed.svg / carbon_flows_expanded.svg");
    Ok(())
}
