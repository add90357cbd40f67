//! Layout engine seam.
//!
//! The engine behind a diagram is replaceable: anything that can place the
//! aggregate link set onto the fixed node positions satisfies
//! [`SankeyEngine`]. The crate ships [`FixedPositionEngine`], a constrained
//! Sankey placement (no rank assignment, no node movement) configured
//! through [`EngineBuilder`].

mod fixed;

pub use fixed::FixedPositionEngine;

use estuary_core::flow::Dataset;

use crate::{
    aggregate::AggregateLink, error::EstuaryError, layout::graph::PositionedGraph,
    prepare::NodeCatalog,
};

/// Interface for Sankey layout engines.
///
/// Inputs are the caller's dataset (for the fixed node positions), the
/// prepared catalog (scaled heights, spans, port ordering), and the link set
/// already aggregated for the current expansion state. Engines place; they
/// never aggregate or mutate.
pub trait SankeyEngine {
    /// Calculate a positioned graph.
    ///
    /// # Errors
    /// Returns `EstuaryError::Layout` if the engine cannot place the graph.
    fn calculate(
        &self,
        dataset: &Dataset,
        catalog: &NodeCatalog,
        links: &[AggregateLink],
    ) -> Result<PositionedGraph, EstuaryError>;
}

/// Builder for creating and configuring layout engines.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    node_width: f32,
    scale: f32,
    min_link_width: f32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            node_width: 60.0,
            scale: 1.0,
            min_link_width: 0.1,
        }
    }
}

impl EngineBuilder {
    /// Create a new engine builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fixed width of every node bar.
    pub fn with_node_width(mut self, node_width: f32) -> Self {
        self.node_width = node_width;
        self
    }

    /// Set the value-to-pixels scale factor.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the minimum rendered link thickness.
    pub fn with_min_link_width(mut self, min_link_width: f32) -> Self {
        self.min_link_width = min_link_width;
        self
    }

    /// Build the configured engine.
    pub fn build(self) -> Box<dyn SankeyEngine> {
        Box::new(FixedPositionEngine::new(
            self.node_width,
            self.scale,
            self.min_link_width,
        ))
    }
}
