//! The contest oracle boundary.
//!
//! The battle simulator lives outside this crate; the search core only ever
//! sees it through [`ContestOracle`]. Every oracle call is synchronous, and a
//! failure aborts the running search rather than being retried or skipped.

use crate::schema::{ConfigError, Gene};

/// A contest runs for at most this many rounds.
pub const MAX_ROUNDS: u32 = 500;

/// Raw result of one contest between an ordered pair of genes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestOutcome {
    /// Rounds the contest ran, in `1..=MAX_ROUNDS`.
    pub rounds: u32,
    /// Survivors on the first gene's side.
    pub count_a: u32,
    /// Survivors on the second gene's side.
    pub count_b: u32,
}

impl ContestOutcome {
    /// Create an outcome, validating the round count.
    pub fn new(rounds: u32, count_a: u32, count_b: u32) -> Result<Self, SearchError> {
        if !(1..=MAX_ROUNDS).contains(&rounds) {
            return Err(SearchError::RoundsOutOfRange { rounds });
        }
        Ok(Self {
            rounds,
            count_a,
            count_b,
        })
    }

    /// The same outcome seen from the second gene's perspective.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            rounds: self.rounds,
            count_a: self.count_b,
            count_b: self.count_a,
        }
    }
}

/// Error type oracles report; preserved as the source of
/// [`SearchError::Oracle`] so callers see the failure unmodified.
pub type OracleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// External, deterministic pairwise contest simulator.
///
/// `battle` must be a pure function of its two inputs. It is the dominant hot
/// path of every strategy and is treated as expensive: the engines never
/// repeat a call whose result they already hold in the current step.
pub trait ContestOracle: Sync {
    /// Run one contest between an ordered pair of genes.
    fn battle(&self, first: &Gene, second: &Gene) -> Result<ContestOutcome, OracleError>;
}

impl<O: ContestOracle + ?Sized> ContestOracle for &O {
    fn battle(&self, first: &Gene, second: &Gene) -> Result<ContestOutcome, OracleError> {
        (**self).battle(first, second)
    }
}

/// Errors surfaced while running a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The contest oracle failed; the run is aborted.
    #[error("contest oracle failed")]
    Oracle(#[source] OracleError),
    /// Fitness evaluation was asked to average over zero opponents.
    #[error("fitness evaluation requires at least one opponent")]
    EmptyOpponentPool,
    /// An outcome carried a round count outside `1..=MAX_ROUNDS`.
    #[error("contest outcome reported {rounds} rounds, outside 1..=500")]
    RoundsOutOfRange { rounds: u32 },
    /// The strategy configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_round_bounds() {
        assert!(ContestOutcome::new(1, 0, 5).is_ok());
        assert!(ContestOutcome::new(MAX_ROUNDS, 3, 3).is_ok());
        assert!(matches!(
            ContestOutcome::new(0, 1, 1),
            Err(SearchError::RoundsOutOfRange { rounds: 0 })
        ));
        assert!(matches!(
            ContestOutcome::new(501, 1, 1),
            Err(SearchError::RoundsOutOfRange { rounds: 501 })
        ));
    }

    #[test]
    fn test_outcome_flip() {
        let outcome = ContestOutcome::new(120, 7, 2).unwrap();
        let flipped = outcome.flipped();
        assert_eq!(flipped.count_a, 2);
        assert_eq!(flipped.count_b, 7);
        assert_eq!(flipped.rounds, 120);
    }
}
