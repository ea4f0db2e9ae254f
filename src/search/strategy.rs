//! One entry point over the three search strategies.

use crate::schema::{Gene, SearchConfig, SearchStrategy};
use crate::search::climb::{ClimbProgress, EliteClimber, RestartClimber};
use crate::search::evolve::{EvolutionEngine, GenerationRecord};
use crate::search::oracle::{ContestOracle, SearchError};

/// Progress event forwarded from whichever strategy is running.
#[derive(Debug, Clone)]
pub enum SearchProgress<'a> {
    /// A genetic-algorithm generation finished.
    Generation(&'a GenerationRecord),
    /// A climber reported a restart or check-interval window.
    Climb(&'a ClimbProgress),
}

/// Strategy-independent summary of a finished run.
#[derive(Debug, Clone)]
pub struct SearchSummary {
    /// Best gene the strategy settled on.
    pub best_gene: Gene,
    /// Fitness of `best_gene`, for the strategies that compute one.
    pub best_fitness: Option<f64>,
    /// Generations, restarts or iterations performed.
    pub iterations: u64,
}

/// Run the configured strategy against `oracle`.
pub fn run<O: ContestOracle + ?Sized>(
    config: &SearchConfig,
    oracle: &O,
) -> Result<SearchSummary, SearchError> {
    run_with_progress(config, oracle, |_| {})
}

/// Run the configured strategy, forwarding progress events to `on_progress`.
pub fn run_with_progress<O, F>(
    config: &SearchConfig,
    oracle: &O,
    mut on_progress: F,
) -> Result<SearchSummary, SearchError>
where
    O: ContestOracle + ?Sized,
    F: FnMut(SearchProgress<'_>),
{
    match &config.strategy {
        SearchStrategy::GeneticAlgorithm(ga) => {
            let mut engine = EvolutionEngine::new(ga.clone(), config.random_seed)?;
            let outcome = engine.run(oracle, |record| {
                on_progress(SearchProgress::Generation(record));
            })?;
            Ok(SearchSummary {
                best_gene: outcome.best_gene,
                best_fitness: Some(outcome.best_fitness),
                iterations: outcome.generations as u64,
            })
        }
        SearchStrategy::HillClimbRestart(restart) => {
            let mut climber = RestartClimber::new(restart.clone(), config.random_seed)?;
            let outcome = climber.run(oracle, |progress| {
                on_progress(SearchProgress::Climb(progress));
            })?;
            Ok(SearchSummary {
                best_gene: outcome.best_gene,
                best_fitness: Some(outcome.best_fitness),
                iterations: outcome.restarts,
            })
        }
        SearchStrategy::HillClimbEliteBeating(climb) => {
            let mut climber = EliteClimber::new(climb.clone(), config.random_seed)?;
            let outcome = climber.run(oracle, |progress| {
                on_progress(SearchProgress::Climb(progress));
            })?;
            Ok(SearchSummary {
                best_gene: outcome.best_gene,
                best_fitness: None,
                iterations: outcome.iterations,
            })
        }
    }
}
