//! Search module: scoring and the metaheuristics built on it.
//!
//! Everything here consumes the external battle simulator through the
//! [`oracle::ContestOracle`] trait and draws randomness from one seeded
//! generator per run.
//!
//! # Overview
//!
//! - **Gene operators** (`gene`): random generation, mutation, crossover,
//!   hamming distance
//! - **Scoring** (`score`): bucketed duel scores and tie-broken fitness
//! - **Genetic algorithm** (`evolve`): generational search with elitism and
//!   tournament selection
//! - **Hill climbing** (`climb`): restart steepest ascent and the online
//!   elite-beating climb
//! - **Roster** (`roster`): harvesting, ranking and persisting champions
//! - **Strategy dispatch** (`strategy`): one entry point over all of the above
//!
//! # Example
//!
//! ```rust,no_run
//! use pacgene::schema::{Gene, GeneticAlgorithmConfig, SearchConfig, SearchStrategy};
//! use pacgene::search::oracle::{ContestOracle, ContestOutcome, OracleError};
//! use pacgene::search::strategy;
//!
//! // Bind the external battle simulator behind the oracle trait.
//! struct Simulator;
//!
//! impl ContestOracle for Simulator {
//!     fn battle(&self, a: &Gene, b: &Gene) -> Result<ContestOutcome, OracleError> {
//!         // ...invoke the real simulator here...
//!         ContestOutcome::new(500, 10, 10).map_err(OracleError::from)
//!     }
//! }
//!
//! let config = SearchConfig {
//!     strategy: SearchStrategy::GeneticAlgorithm(GeneticAlgorithmConfig::default()),
//!     random_seed: Some(42),
//! };
//! let summary = strategy::run(&config, &Simulator).unwrap();
//! println!("best gene: {}", summary.best_gene);
//! ```

pub mod climb;
pub mod evolve;
pub mod gene;
pub mod oracle;
pub mod roster;
pub mod score;
pub mod strategy;

#[cfg(test)]
pub(crate) mod testing;

pub use climb::{ClimbProgress, ClimbStop, EliteClimbOutcome, EliteClimber, EliteSet,
    RestartClimber, RestartOutcome};
pub use evolve::{EvolutionEngine, EvolutionHistory, EvolutionOutcome, GenerationRecord,
    StopReason};
pub use gene::{crossover, flip_one, hamming_distance, mutate_exclusive, point_mutate,
    random_gene};
pub use oracle::{ContestOracle, ContestOutcome, OracleError, SearchError, MAX_ROUNDS};
pub use roster::{ChampionRoster, DuelReport, RosterEntry, Standing};
pub use score::{bucket_score, ScoringPolicy};
pub use strategy::{SearchProgress, SearchSummary};
