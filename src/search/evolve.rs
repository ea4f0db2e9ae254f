//! Generational genetic algorithm over the gene space.
//!
//! Each generation samples an opponent pool from the current population,
//! scores every individual against it, carries the top ranks over unchanged,
//! and refills the population with mutated crossover offspring of tournament
//! winners.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::schema::{ConfigError, Gene, GeneticAlgorithmConfig, HaltPolicy};
use crate::search::gene::{crossover, hamming_distance, mutate_exclusive, random_gene};
use crate::search::oracle::{ContestOracle, SearchError};
use crate::search::score::ScoringPolicy;

/// Snapshot handed to the progress callback once per generation, after
/// evaluation and the halt check.
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    /// Generation index, starting at 0.
    pub generation: usize,
    /// Population evaluated this generation.
    pub population: Vec<Gene>,
    /// Fitness vector aligned to `population`.
    pub fitness: Vec<f64>,
    /// Best gene of this generation.
    pub best_gene: Gene,
    /// Fitness of `best_gene`.
    pub best_fitness: f64,
    /// Mean population fitness.
    pub mean_fitness: f64,
    /// Population fitness standard deviation.
    pub fitness_std: f64,
    /// Mean pairwise hamming distance across the population.
    pub diversity: f64,
    /// Consecutive generations the best gene has stayed within the stability
    /// distance.
    pub stability: u32,
    /// Running best-ever gene across the run.
    pub best_ever_gene: Gene,
    /// Fitness of `best_ever_gene` at discovery time.
    pub best_ever_fitness: f64,
}

/// Aggregate per-generation history of a run.
#[derive(Debug, Clone, Default)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f64>,
    /// Mean fitness per generation.
    pub mean_fitness: Vec<f64>,
    /// Fitness standard deviation per generation.
    pub fitness_std: Vec<f64>,
    /// Mean pairwise hamming distance per generation.
    pub diversity: Vec<f64>,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The halting predicate fired.
    Converged,
    /// The fixed generation budget ran out.
    BudgetExhausted,
}

/// Final result of a run.
///
/// Both the running best-ever and the final generation's best are returned;
/// repeated runs typically harvest one or the other into a roster.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Best gene seen across the whole run.
    pub best_gene: Gene,
    /// Fitness of `best_gene` at discovery time.
    pub best_fitness: f64,
    /// Best gene of the final generation.
    pub final_best_gene: Gene,
    /// Fitness of `final_best_gene`.
    pub final_best_fitness: f64,
    /// Generations evaluated before stopping.
    pub generations: usize,
    /// Why the run stopped.
    pub stop_reason: StopReason,
    /// Per-generation aggregates.
    pub history: EvolutionHistory,
    /// Final population, untouched after the halting generation.
    pub population: Vec<Gene>,
    /// Fitness vector aligned to `population`.
    pub fitness: Vec<f64>,
}

/// Genetic algorithm engine.
pub struct EvolutionEngine {
    config: GeneticAlgorithmConfig,
    scoring: ScoringPolicy,
    rng: StdRng,
    population: Vec<Gene>,
    generation: usize,
    best_ever: Option<(Gene, f64)>,
    prev_best: Option<Gene>,
    stability: u32,
    history: EvolutionHistory,
}

impl EvolutionEngine {
    /// Create an engine; the configuration is validated up front so degenerate
    /// sampling parameters never reach the generation loop.
    pub fn new(config: GeneticAlgorithmConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            scoring: ScoringPolicy::default(),
            rng: StdRng::seed_from_u64(seed),
            population: Vec::new(),
            generation: 0,
            best_ever: None,
            prev_best: None,
            stability: 0,
            history: EvolutionHistory::default(),
        })
    }

    /// Replace the default scoring policy.
    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    /// Seed the initial population instead of generating it randomly.
    ///
    /// The population size is an invariant of the run, so the roster must
    /// match `population_size` exactly.
    pub fn with_population(mut self, population: Vec<Gene>) -> Result<Self, ConfigError> {
        if population.len() != self.config.population_size {
            return Err(ConfigError::PopulationSizeMismatch {
                expected: self.config.population_size,
                got: population.len(),
            });
        }
        self.population = population;
        Ok(self)
    }

    /// Run to completion, invoking `on_generation` once per generation.
    pub fn run<O, F>(&mut self, oracle: &O, mut on_generation: F) -> Result<EvolutionOutcome, SearchError>
    where
        O: ContestOracle + ?Sized,
        F: FnMut(&GenerationRecord),
    {
        if self.population.is_empty() {
            self.population = (0..self.config.population_size)
                .map(|_| random_gene(&mut self.rng))
                .collect();
        }

        loop {
            let pool = self.opponent_pool();

            // Fitness evaluation is an independent map over oracle calls.
            let scoring = self.scoring;
            let fitness: Vec<f64> = self
                .population
                .par_iter()
                .map(|gene| scoring.evaluate(oracle, gene, &pool))
                .collect::<Result<_, _>>()?;

            let (best_index, best_fitness) = fitness
                .iter()
                .copied()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .unwrap_or((0, f64::NEG_INFINITY));
            let best_gene = self.population[best_index];

            let halted = match self.config.halt {
                HaltPolicy::BestStable { distance, patience } => {
                    match self.prev_best {
                        Some(prev) if hamming_distance(&prev, &best_gene) <= distance => {
                            self.stability += 1;
                        }
                        _ => self.stability = 0,
                    }
                    self.prev_best = Some(best_gene);
                    self.stability >= patience
                }
                HaltPolicy::MaxGenerations { limit } => self.generation >= limit,
            };

            // The best-ever only absorbs generations that keep evolving; a
            // halting generation leaves population, fitness and best-ever as
            // they stand.
            if !halted {
                let improved = self
                    .best_ever
                    .is_none_or(|(_, fitness)| best_fitness > fitness);
                if improved {
                    log::info!(
                        "generation {}: new best {:.4} {}",
                        self.generation,
                        best_fitness,
                        best_gene
                    );
                    self.best_ever = Some((best_gene, best_fitness));
                }
            }

            let record = self.record(&fitness, best_gene, best_fitness);
            self.history.best_fitness.push(record.best_fitness);
            self.history.mean_fitness.push(record.mean_fitness);
            self.history.fitness_std.push(record.fitness_std);
            self.history.diversity.push(record.diversity);
            log::debug!(
                "generation {}: best={:.4} mean={:.4} std={:.4}",
                record.generation,
                record.best_fitness,
                record.mean_fitness,
                record.fitness_std
            );
            on_generation(&record);

            if halted {
                let stop_reason = match self.config.halt {
                    HaltPolicy::BestStable { .. } => StopReason::Converged,
                    HaltPolicy::MaxGenerations { .. } => StopReason::BudgetExhausted,
                };
                let (best_ever_gene, best_ever_fitness) =
                    self.best_ever.unwrap_or((best_gene, best_fitness));
                return Ok(EvolutionOutcome {
                    best_gene: best_ever_gene,
                    best_fitness: best_ever_fitness,
                    final_best_gene: best_gene,
                    final_best_fitness: best_fitness,
                    generations: self.generation,
                    stop_reason,
                    history: self.history.clone(),
                    population: self.population.clone(),
                    fitness,
                });
            }

            self.reproduce(&fitness);
            self.generation += 1;
        }
    }

    /// Sample `initial_k` members of the current population and union the
    /// caller-supplied fixed opponents.
    fn opponent_pool(&mut self) -> Vec<Gene> {
        let mut pool =
            Vec::with_capacity(self.config.initial_k + self.config.fixed_opponents.len());
        for picked in index::sample(&mut self.rng, self.population.len(), self.config.initial_k) {
            pool.push(self.population[picked]);
        }
        pool.extend_from_slice(&self.config.fixed_opponents);
        pool
    }

    /// Elitism plus tournament-selected, crossed-over, mutated offspring.
    fn reproduce(&mut self, fitness: &[f64]) {
        let size = self.population.len();
        let survivor_count = self.config.survivor_count();

        let mut order: Vec<usize> = (0..size).collect();
        order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

        let mut next = Vec::with_capacity(size);
        next.extend(order[..survivor_count].iter().map(|&i| self.population[i]));

        while next.len() < size {
            let first = self.tournament(fitness);
            let second = self.tournament(fitness);
            let mut child = crossover(
                &mut self.rng,
                &self.population[first],
                &self.population[second],
            );
            mutate_exclusive(&mut self.rng, &mut child, self.config.mutation_rate);
            next.push(child);
        }

        self.population = next;
    }

    /// Index of the fittest among `selection_k` distinct sampled individuals.
    fn tournament(&mut self, fitness: &[f64]) -> usize {
        let mut best_index = 0;
        let mut best = f64::NEG_INFINITY;
        for candidate in index::sample(&mut self.rng, fitness.len(), self.config.selection_k) {
            if fitness[candidate] > best {
                best = fitness[candidate];
                best_index = candidate;
            }
        }
        best_index
    }

    fn record(&self, fitness: &[f64], best_gene: Gene, best_fitness: f64) -> GenerationRecord {
        let size = fitness.len() as f64;
        let mean = fitness.iter().sum::<f64>() / size;
        let variance = fitness
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / size;
        let (best_ever_gene, best_ever_fitness) =
            self.best_ever.unwrap_or((best_gene, best_fitness));

        GenerationRecord {
            generation: self.generation,
            population: self.population.clone(),
            fitness: fitness.to_vec(),
            best_gene,
            best_fitness,
            mean_fitness: mean,
            fitness_std: variance.sqrt(),
            diversity: self.diversity(),
            stability: self.stability,
            best_ever_gene,
            best_ever_fitness,
        }
    }

    /// Mean pairwise hamming distance across the population.
    fn diversity(&self) -> f64 {
        let size = self.population.len();
        if size < 2 {
            return 0.0;
        }
        let mut total = 0u64;
        let mut pairs = 0u64;
        for i in 0..size {
            for j in (i + 1)..size {
                total += u64::from(hamming_distance(&self.population[i], &self.population[j]));
                pairs += 1;
            }
        }
        total as f64 / pairs as f64
    }
}
