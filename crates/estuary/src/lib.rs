//! Estuary - An interactive expandable Sankey diagram engine.
//!
//! Estuary turns a flow dataset (nodes with ordered subdivisions, raw links
//! between subdivisions) into positioned, animatable diagram state. Nodes
//! expand to reveal their subdivisions; links aggregate or split to match,
//! and every change is delivered to the host as a typed render plan with
//! interpolation endpoints.
//!
//! # Pipeline
//!
//! ```text
//! Dataset
//!     ↓ prepare (scaled spans, port lookup)
//! NodeCatalog
//!     ↓ aggregate (expansion-state grouping)
//! Vec<AggregateLink>
//!     ↓ layout (fixed positions, port stacking)
//! PositionedGraph
//!     ↓ render sync (diff against the scene)
//! RenderPlan → host scene graph
//! ```
//!
//! The [`ExpandableSankey`] component owns the pipeline and all derived
//! state; hosts forward clicks and hovers, pump time through its `advance`,
//! and apply the returned plans. Drawing itself stays outside the engine;
//! the [`export::svg`] module is the bundled reference host.

pub mod aggregate;
pub mod config;
mod diagram;
mod error;
pub mod export;
pub mod layout;
pub mod prepare;
pub mod render;
pub mod state;

pub use estuary_core::{color, flow, geometry, identifier};

pub use diagram::ExpandableSankey;
pub use error::EstuaryError;
