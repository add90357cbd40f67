//! Layout: positioning the aggregate link set onto the fixed node grid.
//!
//! This module wraps the layout engine seam, supplying it with the link
//! source (the aggregator bound to the current expansion state), the
//! prepared node catalog, and the caller's fixed node positions.
//!
//! # Pipeline Position
//!
//! ```text
//! Dataset + ExpansionMap
//!     ↓ aggregate
//! Vec<AggregateLink>
//!     ↓ layout (this module)
//! PositionedGraph
//!     ↓ render sync
//! RenderPlan
//! ```
//!
//! Layout is re-run in full on every state change: aggregation keys and
//! port sets change shape when expansion toggles, so a positioned graph is
//! never patched incrementally.
//!
//! # Submodules
//!
//! - [`engines`] - The [`engines::SankeyEngine`] seam and the shipped
//!   fixed-position engine
//! - [`graph`] - Positioned output types
//!
//! # Re-exports
//!
//! - [`EngineBuilder`] - Builder for creating and configuring layout engines

pub mod engines;
pub mod graph;

pub use engines::EngineBuilder;

use estuary_core::flow::Dataset;
use log::debug;

use self::{engines::SankeyEngine, graph::PositionedGraph};
use crate::{
    aggregate::aggregate, error::EstuaryError, prepare::NodeCatalog, state::ExpansionMap,
};

/// Binds an engine to the aggregation-driven link source.
pub struct LayoutAdapter {
    engine: Box<dyn SankeyEngine>,
}

impl LayoutAdapter {
    /// Wraps `engine`.
    pub fn new(engine: Box<dyn SankeyEngine>) -> Self {
        Self { engine }
    }

    /// Runs one full layout pass for the current expansion state.
    ///
    /// # Errors
    /// Returns `EstuaryError::Layout` if the engine cannot place the graph.
    pub fn layout(
        &self,
        dataset: &Dataset,
        catalog: &NodeCatalog,
        expansion: &ExpansionMap,
    ) -> Result<PositionedGraph, EstuaryError> {
        let links = aggregate(&dataset.links, expansion);
        debug!(aggregated = links.len(); "Running layout pass");
        self.engine.calculate(dataset, catalog, &links)
    }
}
