use tracing::{debug, warn};

use crate::error::EngineError;

use super::builder::ArbitrageGraph;
use super::registry::{split_symbol, CurrencyRegistry};
use super::spfa::{SpfaState, IMPROVEMENT_EPSILON};
use super::types::ArbitrageCycle;

/// Incremental negative-cycle detector over live exchange rates.
///
/// One owner thread is expected to interleave `update_price` and
/// `find_arbitrage_cycle`; nothing here is internally synchronised. Both
/// operations are bounded work and never block.
pub struct ArbitrageEngine {
    graph: ArbitrageGraph,
    spfa: SpfaState,
}

impl ArbitrageEngine {
    /// Build the fixed currency universe from a symbol list. Malformed
    /// symbols are skipped, duplicates are tolerated.
    pub fn new<S: AsRef<str>>(symbols: &[S]) -> Self {
        let registry = CurrencyRegistry::from_symbols(symbols);
        let graph = ArbitrageGraph::new(registry);
        let spfa = SpfaState::new(graph.vertex_count());
        Self { graph, spfa }
    }

    pub fn graph(&self) -> &ArbitrageGraph {
        &self.graph
    }

    /// Apply a price tick for `"BASE-QUOTE"`.
    ///
    /// The forward edge gets `-ln(price)`, the reverse edge `+ln(price)`,
    /// and both endpoints are queued for relaxation. A malformed symbol or a
    /// non-positive/non-finite price is the caller's error; a tick for an
    /// unregistered currency is logged and dropped so a stray feed symbol
    /// cannot wedge the engine.
    pub fn update_price(&mut self, symbol: &str, price: f64) -> Result<(), EngineError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(EngineError::InvalidPrice(price));
        }
        let (base, quote) = split_symbol(symbol)?;

        let registry = self.graph.registry();
        let (Some(base_id), Some(quote_id)) = (registry.id_of(base), registry.id_of(quote)) else {
            let missing = if registry.id_of(base).is_none() {
                base
            } else {
                quote
            };
            warn!(symbol, "dropping tick: {}", EngineError::UnknownCurrency(missing.to_string()));
            return Ok(());
        };

        let forward = -price.ln();
        self.apply_quote(base_id, quote_id, forward, -forward);
        Ok(())
    }

    /// Write both directed weights for a pair and mark the endpoints dirty.
    ///
    /// The reverse weight is its own parameter so a best-bid/best-ask feed
    /// can supply it from the other side of the book; `update_price` derives
    /// both from a single last-trade price today.
    fn apply_quote(&mut self, base: u32, quote: u32, forward_weight: f64, reverse_weight: f64) {
        self.graph.upsert_edge(base, quote, forward_weight);
        self.graph.upsert_edge(quote, base, reverse_weight);
        self.spfa.mark_dirty(base);
        self.spfa.mark_dirty(quote);
    }

    /// Relax everything the latest ticks touched and report an arbitrage
    /// cycle if one surfaced.
    ///
    /// Absence of a cycle is the normal result, not an error. A
    /// reconstruction failure is logged and reported as "no cycle"; the
    /// engine stays usable either way.
    pub fn find_arbitrage_cycle(&mut self) -> Option<ArbitrageCycle> {
        let seed = self.spfa.relax(&self.graph)?;
        match self.build_cycle(seed) {
            Ok(Some(cycle)) => {
                debug!(path = %cycle.currency_path(), weight = cycle.total_weight, "arbitrage cycle");
                Some(cycle)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!("cycle reconstruction aborted: {e}");
                None
            }
        }
    }

    fn build_cycle(&self, seed: u32) -> Result<Option<ArbitrageCycle>, EngineError> {
        let ids = self.spfa.reconstruct_cycle(seed, &self.graph)?;

        let mut total_weight = 0.0;
        for pair in ids.windows(2) {
            total_weight += self.graph.edge_weight(pair[0], pair[1]).ok_or_else(|| {
                EngineError::InternalInconsistency(format!(
                    "reconstructed cycle uses missing edge {} -> {}",
                    pair[0], pair[1]
                ))
            })?;
        }

        // The shortest-path tree survives detections, so after later ticks a
        // remembered loop may no longer be profitable at current weights.
        // Anything inside the noise floor is treated the same way.
        if total_weight >= -IMPROVEMENT_EPSILON {
            warn!(total_weight, "discarding stale cycle from previous detection");
            return Ok(None);
        }

        let mut path = Vec::with_capacity(ids.len());
        for &id in &ids {
            let name = self.graph.registry().name_of(id).ok_or_else(|| {
                EngineError::InternalInconsistency(format!("vertex {id} outside registry"))
            })?;
            path.push(name.to_string());
        }

        Ok(Some(ArbitrageCycle {
            path,
            total_weight,
            expected_return: (-total_weight).exp(),
        }))
    }
}
