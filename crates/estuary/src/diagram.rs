//! The diagram component: expansion orchestration over a bound dataset.
//!
//! [`ExpandableSankey`] owns every piece of derived state for one diagram
//! instance: the prepared node catalog, the expansion and hover side tables,
//! the render sync's retained scene, and the queue of deferred transition
//! actions. The host forwards clicks and hovers, pumps time through
//! [`ExpandableSankey::advance`], and applies the returned render plans.
//!
//! # Transitions
//!
//! Expanding runs two relayout passes back to back: the first with the node
//! marked `Transitioning` and subdivision rendering suppressed, so the final
//! port geometry is on screen before any subdivision can flash; the second
//! after committing `Expanded`, which splits the links and starts their
//! animation. Collapsing relayouts once under `Transitioning` (links animate
//! toward the merged geometry while the node, kept hovered, stays
//! emphasized) and commits `Collapsed` when the transition window elapses.
//!
//! Interaction is locked for the whole window: hovers are dropped and
//! clicks ignored until the deferred re-enable fires.

use std::time::Duration;

use log::{debug, info};

use estuary_core::{
    flow::{Dataset, Node},
    identifier::Id,
};

use crate::{
    config::DiagramConfig,
    error::EstuaryError,
    export,
    layout::{graph::PositionedGraph, EngineBuilder, LayoutAdapter},
    prepare::NodeCatalog,
    render::{RenderContext, RenderPlan, RenderSync},
    state::{DeferredAction, Expansion, ExpansionMap, Hover, TransitionQueue},
};

/// An interactive expandable Sankey diagram.
///
/// # Examples
///
/// ```no_run
/// use estuary::{config::DiagramConfig, ExpandableSankey};
/// use estuary_core::flow::Dataset;
///
/// let mut diagram = ExpandableSankey::new(DiagramConfig::default());
/// diagram.on_click_node(|node| println!("clicked {}", node.title));
///
/// let dataset = Dataset::default();
/// let initial = diagram.bind(dataset).expect("valid dataset");
/// // ... apply `initial`, forward interactions, pump `advance` ...
/// ```
pub struct ExpandableSankey {
    config: DiagramConfig,
    adapter: LayoutAdapter,
    listeners: Vec<Box<dyn FnMut(&Node)>>,

    dataset: Option<Dataset>,
    catalog: NodeCatalog,
    expansion: ExpansionMap,
    hover: Hover,
    hover_enabled: bool,
    queue: TransitionQueue,
    sync: RenderSync,
    graph: PositionedGraph,
}

impl Default for ExpandableSankey {
    fn default() -> Self {
        Self::new(DiagramConfig::default())
    }
}

impl ExpandableSankey {
    /// Creates a diagram with the given configuration and the bundled
    /// fixed-position engine.
    pub fn new(config: DiagramConfig) -> Self {
        let engine = EngineBuilder::new()
            .with_node_width(config.layout().node_width())
            .with_scale(config.layout().scale())
            .with_min_link_width(config.layout().min_link_width())
            .build();
        Self {
            config,
            adapter: LayoutAdapter::new(engine),
            listeners: Vec::new(),
            dataset: None,
            catalog: NodeCatalog::default(),
            expansion: ExpansionMap::new(),
            hover: Hover::None,
            hover_enabled: true,
            queue: TransitionQueue::new(),
            sync: RenderSync::new(),
            graph: PositionedGraph::default(),
        }
    }

    /// Replaces the layout engine behind the adapter seam.
    pub fn with_engine(mut self, engine: Box<dyn crate::layout::engines::SankeyEngine>) -> Self {
        self.adapter = LayoutAdapter::new(engine);
        self
    }

    /// The diagram configuration.
    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// The configured value-to-pixels scale.
    pub fn scale(&self) -> f32 {
        self.config.layout().scale()
    }

    /// Registers a listener notified with the node's data on every accepted
    /// click.
    pub fn on_click_node(&mut self, listener: impl FnMut(&Node) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// True while hovers and clicks are accepted (no transition in flight).
    pub fn hover_enabled(&self) -> bool {
        self.hover_enabled
    }

    /// The expansion state of `node`.
    pub fn expansion(&self, node: Id) -> Expansion {
        self.expansion.get(node)
    }

    /// The active hover target.
    pub fn hover(&self) -> Hover {
        self.hover
    }

    /// The positioned graph from the latest layout pass.
    pub fn graph(&self) -> &PositionedGraph {
        &self.graph
    }

    /// Binds `dataset`, resetting all derived state, and returns the
    /// initial all-enter render plan. Re-invoking rebinds the component to
    /// a fresh scene.
    ///
    /// # Errors
    ///
    /// Returns `EstuaryError::Config` for duplicate node ids, unparseable
    /// node colors, or links/groups referencing unknown nodes; these are
    /// setup mistakes the host must prevent.
    pub fn bind(&mut self, dataset: Dataset) -> Result<RenderPlan, EstuaryError> {
        info!(
            nodes = dataset.nodes.len(),
            links = dataset.links.len(),
            groups = dataset.groups.len();
            "Binding dataset"
        );
        let catalog = NodeCatalog::prepare(&dataset.nodes, self.scale())?;

        for link in &dataset.links {
            for endpoint in [link.source, link.target] {
                if !catalog.contains(endpoint) {
                    return Err(EstuaryError::Config(format!(
                        "link references unknown node `{endpoint}`"
                    )));
                }
            }
        }
        for group in &dataset.groups {
            for member in &group.nodes {
                if !catalog.contains(*member) {
                    return Err(EstuaryError::Config(format!(
                        "group `{}` references unknown node `{member}`",
                        group.title
                    )));
                }
            }
        }

        self.catalog = catalog;
        self.dataset = Some(dataset);
        self.expansion.clear();
        self.hover = Hover::None;
        self.hover_enabled = true;
        self.queue.clear();
        self.sync = RenderSync::new();

        let plan = self.relayout_and_render(false)?;
        debug!("Initial layout complete");
        Ok(plan)
    }

    /// Handles a click on `node`: toggles its expansion with the two-phase
    /// transition and notifies click listeners. Returns the render plans to
    /// apply now; empty when the interaction lock is held.
    ///
    /// # Errors
    ///
    /// Returns `EstuaryError::UnknownNode` if `node` is not in the bound
    /// dataset, `EstuaryError::Config` if nothing is bound.
    pub fn click_node(&mut self, node: Id) -> Result<Vec<RenderPlan>, EstuaryError> {
        if self.dataset.is_none() {
            return Err(EstuaryError::Config("no dataset bound".to_string()));
        }
        if !self.catalog.contains(node) {
            return Err(EstuaryError::UnknownNode(node));
        }
        if !self.hover_enabled {
            debug!(node:% = node; "Click ignored: transition in flight");
            return Ok(Vec::new());
        }

        let duration = self.config.transition().duration();
        let mut plans = Vec::new();
        match self.expansion.get(node) {
            Expansion::Collapsed => {
                info!(node:% = node; "Expanding node");
                self.hover_enabled = false;
                // Phase one: collapsed-equivalent layout with subdivision
                // rendering suppressed, so port geometry settles first.
                self.expansion.set(node, Expansion::Transitioning);
                plans.push(self.relayout_and_render(true)?);
                // Phase two: commit and let the links animate apart.
                self.expansion.set(node, Expansion::Expanded);
                plans.push(self.relayout_and_render(false)?);
                self.queue.schedule(duration, DeferredAction::ReenableHover);
                self.notify_click(node);
            }
            Expansion::Expanded => {
                info!(node:% = node; "Collapsing node");
                self.hover_enabled = false;
                self.expansion.set(node, Expansion::Transitioning);
                // Keep the node emphasized while it shrinks.
                self.hover = Hover::Node(node);
                plans.push(self.relayout_and_render(false)?);
                self.queue
                    .schedule(duration, DeferredAction::CommitCollapse { node });
                self.notify_click(node);
            }
            Expansion::Transitioning => {
                // Unreachable while the lock holds; dropped if it somehow is.
                debug!(node:% = node; "Click on transitioning node dropped");
            }
        }
        Ok(plans)
    }

    /// Hovers a node (or its whole-node span). Returns the re-render plan,
    /// or `None` while the interaction lock is held or the node is unknown.
    pub fn hover_node(&mut self, node: Id) -> Option<RenderPlan> {
        if !self.hover_enabled || !self.catalog.contains(node) {
            return None;
        }
        self.hover = Hover::Node(node);
        self.refresh()
    }

    /// Hovers a subdivision. Hovering the whole-node span (empty id) or an
    /// unknown subdivision degrades to hovering the node.
    pub fn hover_subdivision(&mut self, node: Id, subdivision: Id) -> Option<RenderPlan> {
        if !self.hover_enabled {
            return None;
        }
        let detail = self.catalog.detail(node)?;
        self.hover = if detail.span(subdivision).is_some() {
            Hover::Subdivision { node, subdivision }
        } else {
            Hover::Node(node)
        };
        self.refresh()
    }

    /// Clears the hover. Returns the re-render plan, or `None` while the
    /// interaction lock is held.
    pub fn clear_hover(&mut self) -> Option<RenderPlan> {
        if !self.hover_enabled {
            return None;
        }
        self.hover = Hover::None;
        self.refresh()
    }

    /// Pumps time forward, firing due deferred actions in scheduled order.
    /// Returns the render plans those actions produced.
    pub fn advance(&mut self, elapsed: Duration) -> Result<Vec<RenderPlan>, EstuaryError> {
        let mut plans = Vec::new();
        for action in self.queue.advance(elapsed) {
            match action {
                DeferredAction::ReenableHover => {
                    debug!("Transition finished; hover re-enabled");
                    self.hover_enabled = true;
                }
                DeferredAction::CommitCollapse { node } => {
                    debug!(node:% = node; "Committing collapse");
                    self.expansion.set(node, Expansion::Collapsed);
                    // Relayout renders with the node still emphasized;
                    // the hover clears without its own pass, as the next
                    // render picks it up.
                    plans.push(self.relayout_and_render(false)?);
                    self.hover = Hover::None;
                    self.hover_enabled = true;
                }
            }
        }
        Ok(plans)
    }

    /// A static SVG snapshot of the current state.
    pub fn to_svg(&self) -> String {
        export::svg::snapshot(
            &self.graph,
            &self.catalog,
            &self.expansion,
            self.hover,
            &self.config,
        )
    }

    /// One full layout pass followed by a sync against the retained scene.
    fn relayout_and_render(&mut self, skip_subdivisions: bool) -> Result<RenderPlan, EstuaryError> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or_else(|| EstuaryError::Config("no dataset bound".to_string()))?;
        let graph = self.adapter.layout(dataset, &self.catalog, &self.expansion)?;

        let ctx = RenderContext {
            catalog: &self.catalog,
            expansion: &self.expansion,
            hover: self.hover,
            skip_subdivisions,
            duration: self.config.transition().duration(),
            shade_contrast: self.config.style().shade_contrast(),
            dim_opacity: self.config.style().dim_opacity(),
        };
        let plan = self.sync.sync(&graph, &ctx);
        self.graph = graph;
        Ok(plan)
    }

    /// Re-render the current graph (hover changes; no relayout).
    fn refresh(&mut self) -> Option<RenderPlan> {
        self.dataset.as_ref()?;
        let ctx = RenderContext {
            catalog: &self.catalog,
            expansion: &self.expansion,
            hover: self.hover,
            skip_subdivisions: false,
            duration: self.config.transition().duration(),
            shade_contrast: self.config.style().shade_contrast(),
            dim_opacity: self.config.style().dim_opacity(),
        };
        Some(self.sync.sync(&self.graph, &ctx))
    }

    fn notify_click(&mut self, id: Id) {
        let Some(dataset) = self.dataset.as_ref() else {
            return;
        };
        let Some(node) = dataset.nodes.iter().find(|node| node.id == id) else {
            return;
        };
        for listener in &mut self.listeners {
            listener(node);
        }
    }
}
