//! pacgene - Evolutionary search for deterministic pairwise gene contests.
//!
//! This crate searches the space of fixed-length quaternary symbol strings
//! ("genes") for strings that perform well under an external head-to-head
//! battle simulator. The simulator is consumed through the narrow
//! [`search::oracle::ContestOracle`] trait; everything else, from bucketed
//! duel scoring to the search strategies themselves, lives here.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: the validated gene type and strategy configuration
//! - `search`: scoring, gene operators, and the search engines
//!
//! Three strategies share the same scoring and oracle plumbing:
//!
//! - a generational genetic algorithm with elitism and tournament selection
//! - a restart-based steepest-ascent hill climb
//! - an online climb that must out-perform a growing elite set
//!
//! # Example
//!
//! ```rust,no_run
//! use pacgene::{ContestOracle, ContestOutcome, Gene, OracleError};
//! use pacgene::schema::{EliteClimbConfig, SearchConfig, SearchStrategy};
//!
//! struct Simulator;
//!
//! impl ContestOracle for Simulator {
//!     fn battle(&self, a: &Gene, b: &Gene) -> Result<ContestOutcome, OracleError> {
//!         // ...invoke the real battle simulator here...
//!         ContestOutcome::new(500, 10, 10).map_err(OracleError::from)
//!     }
//! }
//!
//! let config = SearchConfig {
//!     strategy: SearchStrategy::HillClimbEliteBeating(EliteClimbConfig {
//!         max_iterations: Some(100_000),
//!         ..Default::default()
//!     }),
//!     random_seed: Some(7),
//! };
//!
//! let summary = pacgene::search::strategy::run(&config, &Simulator).unwrap();
//! println!("champion: {}", summary.best_gene);
//! ```

pub mod schema;
pub mod search;

// Re-export commonly used types
pub use schema::{Gene, GeneError, SearchConfig, SearchStrategy, GENE_LENGTH, SYMBOL_COUNT};
pub use search::oracle::{ContestOracle, ContestOutcome, OracleError, SearchError};
pub use search::score::ScoringPolicy;
