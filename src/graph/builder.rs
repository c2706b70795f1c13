use std::collections::HashMap;

use super::registry::CurrencyRegistry;
use super::types::Edge;

/// Packs an ordered vertex pair into the 64-bit edge-index key. Vertex ids
/// stay below 2^32 because the universe is fixed at construction.
fn edge_key(source: u32, destination: u32) -> u64 {
    (source as u64) << 32 | destination as u64
}

/// Adjacency store over the fixed currency universe.
///
/// Each vertex owns a contiguous run of outgoing edges; a side index keyed by
/// the packed ordered pair locates an edge in O(1) for in-place weight
/// updates. Edges appear on first write for their pair and are never removed
/// or reordered, so recorded positions stay valid for the life of the graph.
pub struct ArbitrageGraph {
    registry: CurrencyRegistry,
    adjacency: Vec<Vec<Edge>>,
    edge_index: HashMap<u64, usize>,
}

impl ArbitrageGraph {
    pub fn new(registry: CurrencyRegistry) -> Self {
        let vertex_count = registry.len();
        Self {
            registry,
            adjacency: vec![Vec::new(); vertex_count],
            edge_index: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &CurrencyRegistry {
        &self.registry
    }

    /// Get the number of vertices (currencies) in the graph
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Get the number of edges (conversion directions) seen so far
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Overwrite the weight of `source -> destination`, inserting the edge on
    /// first sight.
    pub fn upsert_edge(&mut self, source: u32, destination: u32, weight: f64) {
        let key = edge_key(source, destination);
        match self.edge_index.get(&key) {
            Some(&index) => {
                self.adjacency[source as usize][index].weight = weight;
            }
            None => {
                let edges = &mut self.adjacency[source as usize];
                edges.push(Edge {
                    to: destination,
                    weight,
                });
                self.edge_index.insert(key, edges.len() - 1);
            }
        }
    }

    /// Outgoing edges of `source`, in insertion order.
    pub fn neighbors(&self, source: u32) -> &[Edge] {
        &self.adjacency[source as usize]
    }

    /// Current weight of `source -> destination`, if that pair has been seen.
    pub fn edge_weight(&self, source: u32, destination: u32) -> Option<f64> {
        let index = *self.edge_index.get(&edge_key(source, destination))?;
        Some(self.adjacency[source as usize][index].weight)
    }
}
