//! Deterministic oracle fixtures for unit tests.

use crate::schema::Gene;
use crate::search::oracle::{ContestOracle, ContestOutcome, OracleError, MAX_ROUNDS};

/// Count occurrences of `symbol` in a gene.
pub(crate) fn count_symbol(gene: &Gene, symbol: u8) -> u32 {
    gene.symbols().iter().filter(|&&s| s == symbol).count() as u32
}

/// Pure oracle: every contest runs the full length and each side keeps one
/// survivor per occurrence of the favored symbol, plus one.
pub(crate) struct SymbolCountOracle {
    symbol: u8,
}

impl SymbolCountOracle {
    pub(crate) fn new(symbol: u8) -> Self {
        Self { symbol }
    }
}

impl ContestOracle for SymbolCountOracle {
    fn battle(&self, first: &Gene, second: &Gene) -> Result<ContestOutcome, OracleError> {
        let count_a = 1 + count_symbol(first, self.symbol);
        let count_b = 1 + count_symbol(second, self.symbol);
        ContestOutcome::new(MAX_ROUNDS, count_a, count_b).map_err(OracleError::from)
    }
}

/// Oracle that always fails, for abort-path tests.
pub(crate) struct FailingOracle;

impl ContestOracle for FailingOracle {
    fn battle(&self, _first: &Gene, _second: &Gene) -> Result<ContestOutcome, OracleError> {
        Err("simulator offline".into())
    }
}
