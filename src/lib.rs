//! Padlight - button-grid command language for LED strip rigs

pub mod command;
pub mod core;
pub mod grid;
pub mod lighting;
pub mod namespace;
pub mod trigger;
