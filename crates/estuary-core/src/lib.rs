//! Estuary Core Types and Definitions
//!
//! This crate provides the foundational types for the Estuary expandable
//! Sankey diagram engine. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support and shading variants
//!   ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Flow**: The caller-owned dataset model ([`flow`] module)

pub mod color;
pub mod flow;
pub mod geometry;
pub mod identifier;
