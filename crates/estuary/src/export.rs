//! Exporters: reference hosts for the render-plan seam.
//!
//! The engine emits [`crate::render::RenderPlan`]s; something has to apply
//! them. The [`svg`] submodule is the bundled reference host, producing a
//! static snapshot of the diagram's current state.

pub mod svg;
