//! Graph-Sketch: the state machine behind an interactive 3D graph editor.
//!
//! The crate owns everything except rendering: the mutable graph
//! ([`graph::store::GraphStore`]), the mode/selection interaction state
//! ([`editor::session::EditorSession`]), JSON import/export
//! ([`persistence::document`]), and a line-oriented shell that drives it
//! all headless. The renderer is injected behind [`render::Renderer`].

pub mod editor;
pub mod graph;
pub mod jobs;
pub mod persistence;
pub mod render;
pub mod shell;
