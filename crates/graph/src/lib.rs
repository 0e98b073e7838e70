//! ScholarNexus Graph Builder
//!
//! Turns a list of papers into a knowledge graph of papers, authors and
//! keywords around a synthetic query node, and seeds initial node
//! positions for rendering.

pub mod builder;
pub mod layout;

pub use builder::{build, BuilderOptions, GraphBuilder};
pub use layout::seed_positions;
