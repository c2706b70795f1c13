use std::collections::{BTreeSet, HashMap};

use crate::error::EngineError;

/// Fixed bijection between currency names and dense vertex ids.
///
/// Built once from the initial symbol universe; currencies are never added,
/// removed, or renamed afterwards. Ids are assigned in ascending name order,
/// so the same symbol list always yields the same ids.
pub struct CurrencyRegistry {
    currency_to_id: HashMap<String, u32>,
    id_to_currency: Vec<String>,
}

impl CurrencyRegistry {
    /// Collect the unique currencies referenced by `symbols`. Malformed
    /// symbols are skipped with a warning; duplicates collapse.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        let mut unique = BTreeSet::new();
        for symbol in symbols {
            match split_symbol(symbol.as_ref()) {
                Ok((base, quote)) => {
                    unique.insert(base.to_string());
                    unique.insert(quote.to_string());
                }
                Err(e) => {
                    tracing::warn!("skipping symbol at construction: {e}");
                }
            }
        }

        let mut currency_to_id = HashMap::with_capacity(unique.len());
        let mut id_to_currency = Vec::with_capacity(unique.len());
        for (id, name) in unique.into_iter().enumerate() {
            currency_to_id.insert(name.clone(), id as u32);
            id_to_currency.push(name);
        }

        Self {
            currency_to_id,
            id_to_currency,
        }
    }

    /// Get the vertex id for a currency name
    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.currency_to_id.get(name).copied()
    }

    /// Get the currency name for a vertex id
    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.id_to_currency.get(id as usize).map(String::as_str)
    }

    /// Number of registered currencies
    pub fn len(&self) -> usize {
        self.id_to_currency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_currency.is_empty()
    }
}

/// Split `"BASE-QUOTE"` into its two sides.
///
/// The separator must appear exactly once and both sides must be non-empty;
/// anything else is the caller's error.
pub fn split_symbol(symbol: &str) -> Result<(&str, &str), EngineError> {
    let Some((base, quote)) = symbol.split_once('-') else {
        return Err(EngineError::MalformedSymbol(symbol.to_string()));
    };
    if base.is_empty() || quote.is_empty() || quote.contains('-') {
        return Err(EngineError::MalformedSymbol(symbol.to_string()));
    }
    Ok((base, quote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_sorted() {
        let registry = CurrencyRegistry::from_symbols(&["ETH-USD", "BTC-USD", "ETH-BTC"]);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.id_of("BTC"), Some(0));
        assert_eq!(registry.id_of("ETH"), Some(1));
        assert_eq!(registry.id_of("USD"), Some(2));
    }

    #[test]
    fn test_lookup_round_trip() {
        let registry = CurrencyRegistry::from_symbols(&["A-B", "B-C", "A-C"]);

        for id in 0..registry.len() as u32 {
            let name = registry.name_of(id).unwrap();
            assert_eq!(registry.id_of(name), Some(id));
        }
        assert_eq!(registry.id_of("Z"), None);
        assert_eq!(registry.name_of(99), None);
    }

    #[test]
    fn test_malformed_symbols_are_skipped() {
        let registry = CurrencyRegistry::from_symbols(&["ABUSD", "-X", "X-", "A-B-C", "A-B"]);

        assert_eq!(registry.len(), 2);
        assert!(registry.id_of("A").is_some());
        assert!(registry.id_of("B").is_some());
    }

    #[test]
    fn test_duplicates_are_tolerated() {
        let registry = CurrencyRegistry::from_symbols(&["A-B", "A-B", "B-A"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_split_symbol() {
        assert_eq!(split_symbol("BTC-USD").unwrap(), ("BTC", "USD"));
        assert!(matches!(
            split_symbol("BTCUSD"),
            Err(EngineError::MalformedSymbol(_))
        ));
        assert!(matches!(
            split_symbol("A-B-C"),
            Err(EngineError::MalformedSymbol(_))
        ));
    }
}
