use std::collections::VecDeque;

use crate::error::EngineError;

use super::builder::ArbitrageGraph;

/// Minimum distance improvement that counts as a relaxation.
///
/// Sums of `-ln(price)` weights around a consistent loop land within a few
/// ulps of zero, not at zero; treating that noise as an improvement would
/// spin the queue forever and fabricate a cycle.
pub(crate) const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Bookkeeping for the queue-driven Bellman-Ford variant (SPFA).
///
/// Instead of re-relaxing every edge after each price tick, relaxation
/// resumes from the vertices recent ticks marked dirty. The Bellman-Ford
/// negative-cycle test survives intact: a vertex whose distance improves as
/// many times as there are vertices sits on (or downstream of) a negative
/// cycle.
///
/// State persists for the lifetime of the engine and is not reset after a
/// detection, so a cycle that keeps existing is re-reported on every call.
pub struct SpfaState {
    distance: Vec<f64>,
    predecessor: Vec<Option<u32>>,
    update_counts: Vec<u32>,
    dirty: VecDeque<u32>,
}

impl SpfaState {
    /// Distances start at infinity except vertex 0, the designated source.
    pub fn new(vertex_count: usize) -> Self {
        let mut distance = vec![f64::INFINITY; vertex_count];
        if let Some(source) = distance.first_mut() {
            *source = 0.0;
        }
        Self {
            distance,
            predecessor: vec![None; vertex_count],
            update_counts: vec![0; vertex_count],
            dirty: VecDeque::new(),
        }
    }

    /// Queue a vertex for re-relaxation. Duplicates are allowed; the queue
    /// drains strictly FIFO.
    pub fn mark_dirty(&mut self, vertex: u32) {
        self.dirty.push_back(vertex);
    }

    /// Drain the dirty queue, relaxing the outgoing edges of each vertex.
    ///
    /// Returns the first vertex whose update count reaches the vertex total,
    /// leaving the remaining queue in place for the next call. `None` means
    /// the queue emptied without a detection.
    pub fn relax(&mut self, graph: &ArbitrageGraph) -> Option<u32> {
        let threshold = graph.vertex_count() as u32;
        while let Some(u) = self.dirty.pop_front() {
            for edge in graph.neighbors(u) {
                // Re-read per edge: a self-loop can lower distance[u]
                // mid-scan and later edges must see the fresh value.
                let from = self.distance[u as usize];
                if !from.is_finite() {
                    continue;
                }
                let candidate = from + edge.weight;
                let v = edge.to as usize;
                if candidate < self.distance[v] - IMPROVEMENT_EPSILON {
                    self.distance[v] = candidate;
                    self.predecessor[v] = Some(u);
                    self.update_counts[v] += 1;
                    self.dirty.push_back(edge.to);
                    if self.update_counts[v] >= threshold {
                        tracing::debug!(
                            vertex = edge.to,
                            updates = self.update_counts[v],
                            "update count reached vertex total, negative cycle present"
                        );
                        return Some(edge.to);
                    }
                }
            }
        }
        None
    }

    /// Recover the cycle's vertex sequence from a detection seed.
    ///
    /// The seed may sit downstream of the cycle, so first walk one
    /// predecessor hop per vertex in the graph; that many hops must land
    /// inside the loop. A second walk then closes it. The result starts and
    /// ends with the same vertex.
    pub fn reconstruct_cycle(
        &self,
        seed: u32,
        graph: &ArbitrageGraph,
    ) -> Result<Vec<u32>, EngineError> {
        let vertex_count = graph.vertex_count();

        let mut on_cycle = seed;
        for _ in 0..vertex_count {
            on_cycle = self.step_back(on_cycle)?;
        }

        let mut path = vec![on_cycle];
        let mut current = self.step_back(on_cycle)?;
        while current != on_cycle {
            if path.len() > vertex_count {
                return Err(EngineError::InternalInconsistency(format!(
                    "predecessor walk from vertex {on_cycle} failed to close"
                )));
            }
            path.push(current);
            current = self.step_back(current)?;
        }
        path.push(on_cycle);
        path.reverse();
        Ok(path)
    }

    fn step_back(&self, vertex: u32) -> Result<u32, EngineError> {
        self.predecessor[vertex as usize].ok_or_else(|| {
            EngineError::InternalInconsistency(format!(
                "vertex {vertex} has no predecessor during cycle walk"
            ))
        })
    }
}
