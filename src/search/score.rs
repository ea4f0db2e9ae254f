//! Bucketed contest scoring and the tie-broken fitness it induces.
//!
//! A raw [`ContestOutcome`] is first mapped onto a discrete score ladder
//! `{0,1,2,3,7,8,9,10,11,12,13,17,18,19,20}` rewarding fast eliminations and
//! lopsided survivor ratios, then nudged by a small survivor-margin term so
//! distinct genes never tie exactly.

use crate::schema::Gene;
use crate::search::oracle::{ContestOracle, ContestOutcome, SearchError, MAX_ROUNDS};

/// Map a raw outcome to the bucketed score pair `(score_a, score_b)`.
///
/// Elimination buckets pay 20/19/18/17 by speed (under 100, 200, 300 rounds,
/// else); a full-length contest pays by survivor ratio (10:1, 3:1, 1.5:1);
/// anything closer is the flat 10/10 tie. Every pair sums to 20.
pub fn bucket_score(rounds: u32, count_a: u32, count_b: u32) -> (u8, u8) {
    if count_b == 0 && count_a > 0 {
        return match rounds {
            0..100 => (20, 0),
            100..200 => (19, 1),
            200..300 => (18, 2),
            _ => (17, 3),
        };
    }
    if count_a == 0 && count_b > 0 {
        return match rounds {
            0..100 => (0, 20),
            100..200 => (1, 19),
            200..300 => (2, 18),
            _ => (3, 17),
        };
    }
    if rounds < MAX_ROUNDS || (count_a == 0 && count_b == 0) {
        // The oracle only ends early on an elimination, so a short contest
        // with both sides alive (or none) should be impossible. Keep the
        // documented flat tie, but flag the contradiction.
        debug_assert!(
            false,
            "contest ended at round {rounds} with survivors {count_a}/{count_b}"
        );
        log::warn!(
            "contest ended at round {rounds} with survivors {count_a}/{count_b}; scoring as a flat tie"
        );
        return (10, 10);
    }

    let ratio = f64::from(count_a) / f64::from(count_b);
    if ratio >= 10.0 {
        (13, 7)
    } else if ratio >= 3.0 {
        (12, 8)
    } else if ratio >= 1.5 {
        (11, 9)
    } else {
        let inverse = f64::from(count_b) / f64::from(count_a);
        if inverse >= 10.0 {
            (7, 13)
        } else if inverse >= 3.0 {
            (8, 12)
        } else if inverse >= 1.5 {
            (9, 11)
        } else {
            (10, 10)
        }
    }
}

/// Converts outcomes into a totally ordered scalar fitness.
#[derive(Debug, Clone, Copy)]
pub struct ScoringPolicy {
    /// Weight of the survivor-margin tie-break term, small enough to never
    /// reorder bucket boundaries.
    epsilon: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self { epsilon: 0.01 }
    }
}

impl ScoringPolicy {
    /// Create a policy with an explicit tie-break weight.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Fitness of a single duel from the first gene's perspective: the bucket
    /// scalar plus `epsilon * (own survivors - opponent survivors)`.
    pub fn duel_fitness(&self, outcome: &ContestOutcome) -> f64 {
        let (own, _) = bucket_score(outcome.rounds, outcome.count_a, outcome.count_b);
        f64::from(own) + self.epsilon * (f64::from(outcome.count_a) - f64::from(outcome.count_b))
    }

    /// Mean duel fitness of `gene` against every opponent in order.
    ///
    /// Oracle failures abort the evaluation and propagate to the caller.
    pub fn evaluate<O: ContestOracle + ?Sized>(
        &self,
        oracle: &O,
        gene: &Gene,
        opponents: &[Gene],
    ) -> Result<f64, SearchError> {
        if opponents.is_empty() {
            return Err(SearchError::EmptyOpponentPool);
        }
        let mut total = 0.0;
        for opponent in opponents {
            let outcome = oracle.battle(gene, opponent).map_err(SearchError::Oracle)?;
            total += self.duel_fitness(&outcome);
        }
        Ok(total / opponents.len() as f64)
    }
}
