//! Error types for Estuary operations.
//!
//! This module provides the main error type [`EstuaryError`].
//!
//! The rendering path itself has no recoverable-error taxonomy: missing
//! subdivisions and unresolved ports degrade silently to the whole-node
//! span. Errors here are the setup-time conditions a host must prevent
//! (invalid datasets, bad configuration) plus layout failures.

use thiserror::Error;

use estuary_core::identifier::Id;

/// The main error type for Estuary operations.
#[derive(Debug, Error)]
pub enum EstuaryError {
    /// The dataset or configuration is invalid (duplicate node ids, link
    /// endpoints or group members naming unknown nodes, unparseable colors).
    #[error("configuration error: {0}")]
    Config(String),

    /// An interaction referenced a node id the bound dataset does not contain.
    #[error("unknown node `{0}`")]
    UnknownNode(Id),

    /// The layout engine failed to produce a positioned graph.
    #[error("layout error: {0}")]
    Layout(String),
}
