use std::collections::HashSet;

use anyhow::{bail, Result};
use rand::Rng;

use super::store::{GraphStore, Link, Node};

/// Palette sampled for generated nodes.
pub const PALETTE: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEEAD", "#D4A5A5", "#9B97B2", "#E8F9FD",
    "#79DAE8", "#0AA1DD",
];

/// Generated links all share one muted color; users recolor per-link later.
pub const GENERATED_LINK_COLOR: &str = "rgba(200, 200, 200, 0.6)";

pub const DEFAULT_MAX_NODES: usize = 30;

/// Build a fresh random graph: `node_count` nodes and roughly 1.5x as many
/// links, no self-loops, no duplicate ordered pair within the batch.
pub fn generate(node_count: usize, max_nodes: usize) -> Result<GraphStore> {
    if node_count == 0 {
        bail!("node count must be at least 1");
    }
    if node_count > max_nodes {
        bail!("node count {} exceeds the maximum of {}", node_count, max_nodes);
    }

    let mut rng = rand::thread_rng();
    let mut store = GraphStore::new();

    for i in 0..node_count {
        let color = PALETTE[rng.gen_range(0..PALETTE.len())];
        store.nodes.push(Node {
            id: format!("node-{i}").into(),
            name: format!("Node {}", i + 1),
            val: rng.gen_range(5.0..15.0),
            color: color.to_string(),
            position: None,
        });
    }

    // Cap at the number of distinct ordered pairs so rejection sampling
    // always terminates; a single node gets no links at all.
    let link_count =
        ((node_count as f64 * 1.5).round() as usize).min(node_count * (node_count - 1));
    let mut used: HashSet<(usize, usize)> = HashSet::with_capacity(link_count);

    for _ in 0..link_count {
        let (source, target) = loop {
            let s = rng.gen_range(0..node_count);
            let t = rng.gen_range(0..node_count);
            if s != t && !used.contains(&(s, t)) {
                break (s, t);
            }
        };
        used.insert((source, target));
        store.links.push(Link {
            id: None,
            source: format!("node-{source}").into(),
            target: format!("node-{target}").into(),
            value: rng.gen_range(1.0..6.0),
            color: GENERATED_LINK_COLOR.to_string(),
            label: None,
        });
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_node_graph_has_no_links() {
        let store = generate(1, DEFAULT_MAX_NODES).unwrap();
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.link_count(), 0);
    }

    #[test]
    fn rejects_zero_and_over_max_counts() {
        assert!(generate(0, DEFAULT_MAX_NODES).is_err());
        assert!(generate(31, DEFAULT_MAX_NODES).is_err());
    }

    #[test]
    fn two_node_graph_saturates_distinct_pairs() {
        // round(1.5 * 2) = 3 requested, but only 2 ordered pairs exist
        let store = generate(2, DEFAULT_MAX_NODES).unwrap();
        assert_eq!(store.link_count(), 2);
    }
}
