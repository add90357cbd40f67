//! Link aggregation: raw flow records into per-expansion-state links.
//!
//! Every relayout starts here. Raw links sharing a grouping key merge into
//! one [`AggregateLink`]; the key depends on which endpoints are currently
//! expanded, so toggling a node changes the shape of the whole link set and
//! forces a full relayout rather than an incremental patch.

use std::fmt::Write as _;

use indexmap::IndexMap;
use log::trace;

use estuary_core::{
    flow::{Link, PortRef},
    identifier::Id,
};

use crate::state::{Expansion, ExpansionMap};

/// A rendered link: one or more raw flow records merged under the current
/// expansion state.
///
/// The `id` is the aggregation key; it uniquely determines the group, and
/// re-aggregating unchanged inputs reproduces it exactly. `sublinks` keeps
/// the constituent records in input order for tooltips and per-subdivision
/// coloring.
#[derive(Debug, Clone)]
pub struct AggregateLink {
    pub id: Id,
    pub source: Id,
    pub target: Id,
    pub source_port: PortRef,
    pub target_port: PortRef,
    /// Sum of the constituent raw link values.
    pub value: f32,
    pub sublinks: Vec<Link>,
    pub style: Option<String>,
}

/// Whether links touching this endpoint split per subdivision.
///
/// Exhaustive on purpose: `Transitioning` is collapsed-equivalent here, but
/// it is a distinct state elsewhere (rendering still shows subdivisions), so
/// no truthiness shortcut is taken.
fn splits(state: Expansion) -> bool {
    match state {
        Expansion::Expanded => true,
        Expansion::Transitioning | Expansion::Collapsed => false,
    }
}

/// Groups `links` into aggregate links under `expansion`.
///
/// The grouping key concatenates the source id, the source subdivision when
/// the source is expanded, the target id, and the target subdivision when
/// the target is expanded. Groups keep first-seen order; the first member of
/// each group is its representative for endpoints and style.
pub fn aggregate(links: &[Link], expansion: &ExpansionMap) -> Vec<AggregateLink> {
    let mut groups: IndexMap<String, AggregateLink> = IndexMap::new();

    for link in links {
        let split_source = splits(expansion.get(link.source));
        let split_target = splits(expansion.get(link.target));

        let mut key = String::new();
        let _ = write!(key, "{}", link.source);
        if split_source {
            let _ = write!(key, "{}", link.source_sub);
        }
        let _ = write!(key, "{}", link.target);
        if split_target {
            let _ = write!(key, "{}", link.target_sub);
        }

        let id = Id::new(&key);
        groups
            .entry(key)
            .or_insert_with(|| AggregateLink {
                id,
                source: link.source,
                target: link.target,
                source_port: PortRef::out(split_source.then_some(link.source_sub)),
                target_port: PortRef::in_(split_target.then_some(link.target_sub)),
                value: 0.0,
                sublinks: Vec::new(),
                style: link.style.clone(),
            })
            .merge(link);
    }

    let aggregated: Vec<AggregateLink> = groups.into_values().collect();
    trace!(raw = links.len(), aggregated = aggregated.len(); "Aggregated links");
    aggregated
}

impl AggregateLink {
    fn merge(&mut self, link: &Link) {
        self.value += link.value;
        self.sublinks.push(link.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn two_links() -> Vec<Link> {
        vec![
            link("a", "s1", "b", "t1", 5.0),
            link("a", "s2", "b", "t1", 3.0),
        ]
    }

    #[test]
    fn test_collapsed_endpoints_merge() {
        let links = two_links();
        let expansion = ExpansionMap::new();

        let aggregated = aggregate(&links, &expansion);
        assert_eq!(aggregated.len(), 1);

        let merged = &aggregated[0];
        assert_eq!(merged.value, 8.0);
        assert_eq!(merged.source, "a");
        assert_eq!(merged.target, "b");
        assert_eq!(merged.source_port, PortRef::out(None));
        assert_eq!(merged.target_port, PortRef::in_(None));
        assert_eq!(merged.sublinks.len(), 2);
        // Sublinks keep input order
        assert_eq!(merged.sublinks[0].value, 5.0);
        assert_eq!(merged.sublinks[1].value, 3.0);
    }

    #[test]
    fn test_expanded_source_splits() {
        let links = two_links();
        let mut expansion = ExpansionMap::new();
        expansion.set(Id::new("a"), Expansion::Expanded);

        let aggregated = aggregate(&links, &expansion);
        assert_eq!(aggregated.len(), 2);

        assert_eq!(aggregated[0].value, 5.0);
        assert_eq!(aggregated[0].source_port, PortRef::out(Some(Id::new("s1"))));
        assert_eq!(aggregated[0].target_port, PortRef::in_(None));

        assert_eq!(aggregated[1].value, 3.0);
        assert_eq!(aggregated[1].source_port, PortRef::out(Some(Id::new("s2"))));
    }

    #[test]
    fn test_transitioning_is_collapsed_equivalent() {
        let links = two_links();

        let mut transitioning = ExpansionMap::new();
        transitioning.set(Id::new("a"), Expansion::Transitioning);
        let during = aggregate(&links, &transitioning);

        let collapsed = aggregate(&links, &ExpansionMap::new());

        assert_eq!(during.len(), collapsed.len());
        assert_eq!(during[0].id, collapsed[0].id);
        assert_eq!(during[0].value, collapsed[0].value);
        assert_eq!(during[0].source_port, collapsed[0].source_port);
        assert_eq!(during[0].target_port, collapsed[0].target_port);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let links = vec![
            link("a", "s1", "b", "t1", 5.0),
            link("a", "s2", "b", "t1", 3.0),
            link("b", "t1", "c", "u1", 2.0),
            link("a", "s1", "c", "u2", 1.0),
        ];
        let mut expansion = ExpansionMap::new();
        expansion.set(Id::new("a"), Expansion::Expanded);
        expansion.set(Id::new("c"), Expansion::Expanded);

        let first = aggregate(&links, &expansion);
        let second = aggregate(&links, &expansion);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.value, b.value);
            assert_eq!(a.source_port, b.source_port);
            assert_eq!(a.target_port, b.target_port);
        }
    }

    #[test]
    fn test_expand_collapse_round_trip() {
        let links = two_links();
        let a = Id::new("a");

        let before = aggregate(&links, &ExpansionMap::new());

        let mut expansion = ExpansionMap::new();
        expansion.set(a, Expansion::Expanded);
        let expanded = aggregate(&links, &expansion);
        assert_ne!(expanded.len(), before.len());

        expansion.set(a, Expansion::Collapsed);
        let after = aggregate(&links, &expansion);

        assert_eq!(before.len(), after.len());
        for (x, y) in before.iter().zip(after.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.value, y.value);
            assert_eq!(x.source_port, y.source_port);
            assert_eq!(x.target_port, y.target_port);
        }
    }

    #[test]
    fn test_representative_is_first_member() {
        let links = vec![
            Link {
                style: Some("primary".to_string()),
                ..link("a", "s1", "b", "t1", 5.0)
            },
            Link {
                style: Some("secondary".to_string()),
                ..link("a", "s2", "b", "t1", 3.0)
            },
        ];

        let aggregated = aggregate(&links, &ExpansionMap::new());
        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].style.as_deref(), Some("primary"));
    }

    #[test]
    fn test_conservation_per_node() {
        let links = vec![
            link("a", "s1", "b", "t1", 5.0),
            link("a", "s2", "b", "t2", 3.0),
            link("b", "t1", "c", "u1", 4.0),
        ];

        for states in [
            ExpansionMap::new(),
            {
                let mut m = ExpansionMap::new();
                m.set(Id::new("b"), Expansion::Expanded);
                m
            },
        ] {
            let aggregated = aggregate(&links, &states);

            let b = Id::new("b");
            let raw_in: f32 = links
                .iter()
                .filter(|l| l.target == b)
                .map(|l| l.value)
                .sum();
            let agg_in: f32 = aggregated
                .iter()
                .filter(|l| l.target == b)
                .map(|l| l.value)
                .sum();
            assert_eq!(raw_in, agg_in);

            let raw_out: f32 = links
                .iter()
                .filter(|l| l.source == b)
                .map(|l| l.value)
                .sum();
            let agg_out: f32 = aggregated
                .iter()
                .filter(|l| l.source == b)
                .map(|l| l.value)
                .sum();
            assert_eq!(raw_out, agg_out);
        }
    }
}
