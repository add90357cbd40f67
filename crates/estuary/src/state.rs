//! Expansion and interaction state.
//!
//! This module contains the per-node [`Expansion`] state, the [`ExpansionMap`]
//! and [`Hover`] side tables, and the [`TransitionQueue`] of deferred actions
//! that completes two-phase transitions when the host pumps time through the
//! diagram's `advance`.
//!
//! All of this state is owned by the diagram instance and keyed by id; the
//! caller's dataset is never annotated.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::time::Duration;

use estuary_core::identifier::Id;

/// Per-node expansion state.
///
/// `Transitioning` marks a node whose expand or collapse animation is in
/// flight. It is collapsed-equivalent for link aggregation (keys and ports)
/// but still shows subdivisions when rendering, which is what keeps a
/// collapsing node expanded-looking while its links shrink. Consumers match
/// on all three variants rather than coercing to a boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Expansion {
    /// Subdivisions hidden; links merge into one default port per side.
    #[default]
    Collapsed,
    /// An animated transition is in flight.
    Transitioning,
    /// Subdivisions shown; links split per subdivision port.
    Expanded,
}

impl Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Expansion::Collapsed => "collapsed",
            Expansion::Transitioning => "transitioning",
            Expansion::Expanded => "expanded",
        };
        write!(f, "{s}")
    }
}

/// Side table mapping node ids to their expansion state.
///
/// Nodes with no entry are collapsed; this mirrors a fresh diagram where
/// nothing has been clicked yet.
#[derive(Debug, Clone, Default)]
pub struct ExpansionMap {
    states: HashMap<Id, Expansion>,
}

impl ExpansionMap {
    /// Creates an empty map (every node collapsed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state for `node`, `Collapsed` when absent.
    pub fn get(&self, node: Id) -> Expansion {
        self.states.get(&node).copied().unwrap_or_default()
    }

    /// Sets the state for `node`. Setting `Collapsed` removes the entry so
    /// the map only retains nodes that have ever left the default state.
    pub fn set(&mut self, node: Id, state: Expansion) {
        match state {
            Expansion::Collapsed => {
                self.states.remove(&node);
            }
            Expansion::Transitioning | Expansion::Expanded => {
                self.states.insert(node, state);
            }
        }
    }

    /// Drops all entries, returning every node to `Collapsed`.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

/// The active hover target, if any.
///
/// At most one element is hovered at a time. Hovering the whole-node span of
/// a collapsed node hovers the node itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Hover {
    /// Nothing hovered; everything renders at full opacity.
    #[default]
    None,
    /// A node (or its whole-node span) is hovered.
    Node(Id),
    /// A specific subdivision of a node is hovered.
    Subdivision { node: Id, subdivision: Id },
}

impl Hover {
    /// True when any element is hovered.
    pub fn is_active(&self) -> bool {
        !matches!(self, Hover::None)
    }

    /// True when the hover involves `node` (directly or via a subdivision).
    pub fn touches_node(&self, node: Id) -> bool {
        match self {
            Hover::None => false,
            Hover::Node(id) => *id == node,
            Hover::Subdivision { node: id, .. } => *id == node,
        }
    }

    /// True when the hover is exactly the given subdivision of `node`.
    pub fn touches_subdivision(&self, node: Id, subdivision: Id) -> bool {
        matches!(
            self,
            Hover::Subdivision { node: n, subdivision: s } if *n == node && *s == subdivision
        )
    }
}

/// A continuation deferred until a transition window elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Re-enable hover and accept new transitions.
    ReenableHover,
    /// Finish a collapse: commit `Collapsed`, relayout, clear hover,
    /// re-enable hover.
    CommitCollapse { node: Id },
}

#[derive(Debug, Clone)]
struct Pending {
    remaining: Duration,
    action: DeferredAction,
    seq: u64,
}

/// Queue of deferred actions, pumped by the host through `advance`.
///
/// There is no cancellation: once scheduled, an action fires. Due actions
/// fire in their original scheduled order, matching the single-threaded
/// timer semantics the engine is modeled on.
#[derive(Debug, Clone, Default)]
pub struct TransitionQueue {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl TransitionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to fire once `after` has elapsed.
    pub fn schedule(&mut self, after: Duration, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            remaining: after,
            action,
            seq,
        });
    }

    /// Advances time by `elapsed` and returns the actions that came due,
    /// ordered by due time, ties broken by scheduling order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<DeferredAction> {
        for pending in &mut self.pending {
            pending.remaining = pending.remaining.saturating_sub(elapsed);
        }

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|pending| {
            if pending.remaining.is_zero() {
                due.push(pending.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|pending| pending.seq);
        due.into_iter().map(|pending| pending.action).collect()
    }

    /// True when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops all scheduled actions (used when rebinding a dataset).
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_default_is_collapsed() {
        assert_eq!(Expansion::default(), Expansion::Collapsed);

        let map = ExpansionMap::new();
        assert_eq!(map.get(Id::new("anything")), Expansion::Collapsed);
    }

    #[test]
    fn test_expansion_map_set_get() {
        let mut map = ExpansionMap::new();
        let node = Id::new("a");

        map.set(node, Expansion::Transitioning);
        assert_eq!(map.get(node), Expansion::Transitioning);

        map.set(node, Expansion::Expanded);
        assert_eq!(map.get(node), Expansion::Expanded);

        map.set(node, Expansion::Collapsed);
        assert_eq!(map.get(node), Expansion::Collapsed);
    }

    #[test]
    fn test_hover_touches() {
        let a = Id::new("a");
        let b = Id::new("b");
        let s1 = Id::new("s1");

        assert!(!Hover::None.is_active());
        assert!(Hover::Node(a).touches_node(a));
        assert!(!Hover::Node(a).touches_node(b));

        let sub = Hover::Subdivision {
            node: a,
            subdivision: s1,
        };
        assert!(sub.is_active());
        assert!(sub.touches_node(a));
        assert!(sub.touches_subdivision(a, s1));
        assert!(!sub.touches_subdivision(b, s1));
    }

    #[test]
    fn test_queue_fires_in_scheduled_order() {
        let mut queue = TransitionQueue::new();
        let node = Id::new("a");

        queue.schedule(Duration::from_millis(100), DeferredAction::ReenableHover);
        queue.schedule(
            Duration::from_millis(100),
            DeferredAction::CommitCollapse { node },
        );

        // Not yet due
        assert!(queue.advance(Duration::from_millis(50)).is_empty());

        let fired = queue.advance(Duration::from_millis(50));
        assert_eq!(
            fired,
            vec![
                DeferredAction::ReenableHover,
                DeferredAction::CommitCollapse { node },
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_partial_due() {
        let mut queue = TransitionQueue::new();

        queue.schedule(Duration::from_millis(100), DeferredAction::ReenableHover);
        queue.schedule(Duration::from_millis(300), DeferredAction::ReenableHover);

        let fired = queue.advance(Duration::from_millis(150));
        assert_eq!(fired.len(), 1);
        assert!(!queue.is_empty());

        let fired = queue.advance(Duration::from_millis(150));
        assert_eq!(fired.len(), 1);
        assert!(queue.is_empty());
    }
}
