//! Configuration types for the search strategies.

use serde::{Deserialize, Serialize};

use super::Gene;

/// Top-level configuration: one strategy plus a reproducibility seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Strategy to run.
    pub strategy: SearchStrategy,
    /// Random seed for reproducibility. `None` draws a fresh seed.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl SearchConfig {
    /// Validate the configured strategy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.validate()
    }
}

/// Search strategy selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchStrategy {
    /// Generational genetic algorithm with elitism and tournament selection.
    GeneticAlgorithm(GeneticAlgorithmConfig),
    /// Restart-based steepest-ascent hill climb over single-flip neighbors.
    HillClimbRestart(HillClimbRestartConfig),
    /// Online climb that must beat every member of a growing elite set.
    HillClimbEliteBeating(EliteClimbConfig),
}

impl SearchStrategy {
    /// Validate the selected strategy's parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::GeneticAlgorithm(config) => config.validate(),
            Self::HillClimbRestart(config) => config.validate(),
            Self::HillClimbEliteBeating(config) => config.validate(),
        }
    }
}

/// Genetic Algorithm configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticAlgorithmConfig {
    /// Number of individuals in the population; fixed across generations.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Per-position probability of an exclusive mutation in offspring.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Fraction of the population copied unmodified into the next generation.
    #[serde(default = "default_survival_rate")]
    pub survival_rate: f64,
    /// Tournament size for parent selection.
    #[serde(default = "default_selection_k")]
    pub selection_k: usize,
    /// Number of population members sampled into each generation's opponent pool.
    #[serde(default = "default_initial_k")]
    pub initial_k: usize,
    /// Fixed opponents added to every generation's opponent pool.
    #[serde(default)]
    pub fixed_opponents: Vec<Gene>,
    /// Halting policy.
    #[serde(default)]
    pub halt: HaltPolicy,
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            mutation_rate: default_mutation_rate(),
            survival_rate: default_survival_rate(),
            selection_k: default_selection_k(),
            initial_k: default_initial_k(),
            fixed_opponents: Vec::new(),
            halt: HaltPolicy::default(),
        }
    }
}

fn default_population_size() -> usize {
    500
}
fn default_mutation_rate() -> f64 {
    0.01
}
fn default_survival_rate() -> f64 {
    0.05
}
fn default_selection_k() -> usize {
    5
}
fn default_initial_k() -> usize {
    5
}

impl GeneticAlgorithmConfig {
    /// Number of individuals copied unmodified each generation, at least 1.
    pub fn survivor_count(&self) -> usize {
        ((self.survival_rate * self.population_size as f64).ceil() as usize).max(1)
    }

    /// Validate the configuration.
    ///
    /// Sampling without replacement requires the population to be at least as
    /// large as every sample drawn from it, so an undersized population is a
    /// construction-time error rather than a runtime one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_interval("mutation_rate", self.mutation_rate)?;
        check_unit_interval("survival_rate", self.survival_rate)?;
        if self.selection_k == 0 {
            return Err(ConfigError::ZeroSample {
                name: "selection_k",
            });
        }
        if self.initial_k == 0 && self.fixed_opponents.is_empty() {
            return Err(ConfigError::NoOpponents);
        }
        let required = self
            .selection_k
            .max(self.initial_k)
            .max(self.survivor_count())
            .max(2);
        if self.population_size < required {
            return Err(ConfigError::PopulationTooSmall {
                size: self.population_size,
                required,
            });
        }
        Ok(())
    }
}

/// Halting policy for the genetic algorithm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "policy")]
pub enum HaltPolicy {
    /// Halt once the generation-best gene stops moving: when the hamming
    /// distance between consecutive bests stays within `distance` for
    /// `patience` consecutive generations.
    BestStable {
        #[serde(default = "default_stable_distance")]
        distance: u32,
        #[serde(default = "default_stable_patience")]
        patience: u32,
    },
    /// Halt after a fixed number of generations.
    MaxGenerations { limit: usize },
}

impl Default for HaltPolicy {
    fn default() -> Self {
        Self::BestStable {
            distance: default_stable_distance(),
            patience: default_stable_patience(),
        }
    }
}

fn default_stable_distance() -> u32 {
    2
}
fn default_stable_patience() -> u32 {
    2
}

/// Restart-based steepest-ascent hill climb configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HillClimbRestartConfig {
    /// Number of independent restarts from random genes.
    #[serde(default = "default_restarts")]
    pub restarts: usize,
    /// Maximum climbing steps per restart.
    #[serde(default = "default_climb_steps")]
    pub steps: usize,
    /// Single-flip neighbor candidates drawn per step.
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    /// Fixed opponent set every candidate is evaluated against.
    pub opponents: Vec<Gene>,
}

impl Default for HillClimbRestartConfig {
    fn default() -> Self {
        Self {
            restarts: default_restarts(),
            steps: default_climb_steps(),
            neighbors: default_neighbors(),
            opponents: vec![Gene::ALL_ONES, Gene::ALL_THREES],
        }
    }
}

fn default_restarts() -> usize {
    40
}
fn default_climb_steps() -> usize {
    150
}
fn default_neighbors() -> usize {
    250
}

impl HillClimbRestartConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.restarts == 0 {
            return Err(ConfigError::ZeroSample { name: "restarts" });
        }
        if self.steps == 0 {
            return Err(ConfigError::ZeroSample { name: "steps" });
        }
        if self.neighbors == 0 {
            return Err(ConfigError::ZeroSample { name: "neighbors" });
        }
        if self.opponents.is_empty() {
            return Err(ConfigError::NoOpponents);
        }
        Ok(())
    }
}

/// Online elite-beating climb configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EliteClimbConfig {
    /// Acceptance policy for mutated candidates.
    #[serde(default)]
    pub acceptance: AcceptancePolicy,
    /// Mean of the exponential distribution behind the per-iteration
    /// mutation-site count.
    #[serde(default = "default_step_scale")]
    pub step_scale: f64,
    /// Upper clamp on the mutation-site count.
    #[serde(default = "default_max_step")]
    pub max_step: usize,
    /// Iterations per quiescence check and progress report.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
    /// Probability of halting at a check that saw no success.
    #[serde(default = "default_stop_probability")]
    pub stop_probability: f64,
    /// Optional hard iteration cap; the probabilistic halt alone may never
    /// fire, so unattended runs should set one.
    #[serde(default)]
    pub max_iterations: Option<u64>,
    /// Baseline reference genes seeding the elite set.
    #[serde(default = "default_baseline_anchors")]
    pub baseline_anchors: [Gene; 2],
    /// Starting candidate; defaults to the first baseline anchor.
    #[serde(default)]
    pub initial_gene: Option<Gene>,
}

impl Default for EliteClimbConfig {
    fn default() -> Self {
        Self {
            acceptance: AcceptancePolicy::default(),
            step_scale: default_step_scale(),
            max_step: default_max_step(),
            check_interval: default_check_interval(),
            stop_probability: default_stop_probability(),
            max_iterations: None,
            baseline_anchors: default_baseline_anchors(),
            initial_gene: None,
        }
    }
}

fn default_step_scale() -> f64 {
    4.0
}
fn default_max_step() -> usize {
    30
}
fn default_check_interval() -> u64 {
    100
}
fn default_stop_probability() -> f64 {
    0.025
}
fn default_baseline_anchors() -> [Gene; 2] {
    [Gene::ALL_ONES, Gene::ALL_THREES]
}

impl EliteClimbConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step_scale.is_finite() && self.step_scale > 0.0) {
            return Err(ConfigError::InvalidStepScale {
                value: self.step_scale,
            });
        }
        if self.max_step == 0 {
            return Err(ConfigError::ZeroSample { name: "max_step" });
        }
        if self.check_interval == 0 {
            return Err(ConfigError::ZeroSample {
                name: "check_interval",
            });
        }
        check_unit_interval("stop_probability", self.stop_probability)?;
        if let AcceptancePolicy::Simple { max_elite_size } = self.acceptance {
            if max_elite_size < 2 {
                return Err(ConfigError::EliteCapacityTooSmall {
                    size: max_elite_size,
                });
            }
        }
        Ok(())
    }
}

/// Acceptance policy for the elite-beating climb.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum AcceptancePolicy {
    /// Accept iff the candidate strictly out-survives every elite member;
    /// accepted candidates join the elite set, which is probabilistically
    /// thinned toward `max_elite_size`.
    Simple {
        #[serde(default = "default_max_elite_size")]
        max_elite_size: usize,
    },
    /// Accept on lexicographic improvement of (total opponent survivors,
    /// total rounds, total own survivors) across the fixed anchors; exact
    /// three-way ties are also accepted.
    Lexicographic,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self::Simple {
            max_elite_size: default_max_elite_size(),
        }
    }
}

fn default_max_elite_size() -> usize {
    50
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RateOutOfRange { name, value })
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("population size {size} cannot support sampling {required} distinct individuals")]
    PopulationTooSmall { size: usize, required: usize },
    #[error("seeded population holds {got} genes but the configuration expects {expected}")]
    PopulationSizeMismatch { expected: usize, got: usize },
    #[error("{name} must lie in 0.0..=1.0, got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be non-zero")]
    ZeroSample { name: &'static str },
    #[error("at least one opponent is required for fitness evaluation")]
    NoOpponents,
    #[error("step scale must be positive and finite, got {value}")]
    InvalidStepScale { value: f64 },
    #[error("elite capacity {size} cannot hold the two baseline anchors")]
    EliteCapacityTooSmall { size: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_valid() {
        assert!(GeneticAlgorithmConfig::default().validate().is_ok());
        assert!(HillClimbRestartConfig::default().validate().is_ok());
        assert!(EliteClimbConfig::default().validate().is_ok());
    }

    #[test]
    fn test_survivor_count_clamped_to_one() {
        let config = GeneticAlgorithmConfig {
            population_size: 10,
            survival_rate: 0.0,
            ..Default::default()
        };
        assert_eq!(config.survivor_count(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_survivor_count_rounds_up() {
        let config = GeneticAlgorithmConfig {
            population_size: 30,
            survival_rate: 0.05,
            ..Default::default()
        };
        // 1.5 survivors round up to 2
        assert_eq!(config.survivor_count(), 2);
    }

    #[test]
    fn test_rejects_population_too_small_for_sampling() {
        let config = GeneticAlgorithmConfig {
            population_size: 4,
            selection_k: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PopulationTooSmall { required: 5, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_opponent_sources() {
        let config = GeneticAlgorithmConfig {
            initial_k: 0,
            fixed_opponents: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoOpponents)));

        let climb = HillClimbRestartConfig {
            opponents: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(climb.validate(), Err(ConfigError::NoOpponents)));
    }

    #[test]
    fn test_rejects_bad_rates() {
        let config = GeneticAlgorithmConfig {
            mutation_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RateOutOfRange {
                name: "mutation_rate",
                ..
            })
        ));

        let climb = EliteClimbConfig {
            stop_probability: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            climb.validate(),
            Err(ConfigError::RateOutOfRange {
                name: "stop_probability",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_degenerate_elite_capacity() {
        let config = EliteClimbConfig {
            acceptance: AcceptancePolicy::Simple { max_elite_size: 1 },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EliteCapacityTooSmall { size: 1 })
        ));
    }

    #[test]
    fn test_strategy_json_defaults() {
        let config: SearchConfig = serde_json::from_str(
            r#"{"strategy": {"type": "GeneticAlgorithm", "population_size": 50}}"#,
        )
        .unwrap();
        let SearchStrategy::GeneticAlgorithm(ga) = &config.strategy else {
            panic!("expected genetic algorithm strategy");
        };
        assert_eq!(ga.population_size, 50);
        assert_eq!(ga.selection_k, 5);
        assert!(config.random_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_elite_config_json_round_trip() {
        let config = EliteClimbConfig {
            acceptance: AcceptancePolicy::Lexicographic,
            initial_gene: Some(Gene::ALL_THREES),
            max_iterations: Some(10_000),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EliteClimbConfig = serde_json::from_str(&json).unwrap();
        assert!(matches!(back.acceptance, AcceptancePolicy::Lexicographic));
        assert_eq!(back.initial_gene, Some(Gene::ALL_THREES));
        assert_eq!(back.max_iterations, Some(10_000));
    }
}
