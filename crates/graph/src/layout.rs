//! Initial node placement
//!
//! The query node is pinned at the canvas center. Every other node goes on a
//! ring chosen by its type, at an angle given by its position in the node
//! list, with a small random jitter so the force simulation on the client
//! does not start from a symmetric state.

use rand::Rng;
use scholarnexus_common::models::{GraphData, NodeType};
use std::f64::consts::PI;

const PAPER_RADIUS: f64 = 200.0;
const AUTHOR_RADIUS: f64 = 350.0;
const DEFAULT_RADIUS: f64 = 150.0;

/// Maximum offset applied on each axis
pub const JITTER: f64 = 25.0;

fn ring_radius(node_type: NodeType) -> f64 {
    match node_type {
        NodeType::Paper => PAPER_RADIUS,
        NodeType::Author => AUTHOR_RADIUS,
        _ => DEFAULT_RADIUS,
    }
}

/// Assign `x`/`y` to every node of `graph`
pub fn seed_positions<R: Rng + ?Sized>(
    graph: &mut GraphData,
    width: f64,
    height: f64,
    rng: &mut R,
) {
    let center_x = width / 2.0;
    let center_y = height / 2.0;
    let total = graph.nodes.len().max(1) as f64;

    for (index, node) in graph.nodes.iter_mut().enumerate() {
        if node.data.is_query_root() {
            node.x = Some(center_x);
            node.y = Some(center_y);
            continue;
        }

        let angle = index as f64 / total * 2.0 * PI;
        let radius = ring_radius(node.node_type());
        node.x = Some(center_x + radius * angle.cos() + rng.gen_range(-JITTER..=JITTER));
        node.y = Some(center_y + radius * angle.sin() + rng.gen_range(-JITTER..=JITTER));
    }
}
