//! Local search: restart-based steepest ascent and the online elite-beating
//! climb.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use rayon::prelude::*;

use crate::schema::{
    AcceptancePolicy, ConfigError, EliteClimbConfig, Gene, HillClimbRestartConfig,
};
use crate::search::gene::{flip_one, point_mutate, random_gene};
use crate::search::oracle::{ContestOracle, SearchError};
use crate::search::score::ScoringPolicy;

/// Periodic progress snapshot from either climber.
#[derive(Debug, Clone)]
pub struct ClimbProgress {
    /// Restart count (policy A) or iteration count (policy B).
    pub iteration: u64,
    /// Accepted moves over attempts in the reporting window.
    pub recent_success_rate: f64,
    /// Best gene known to the climber right now.
    pub best_gene: Gene,
}

/// Why an elite climb stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimbStop {
    /// The probabilistic quiescence halt fired.
    Quiescent,
    /// The configured hard iteration cap was reached.
    IterationCap,
    /// The cancel handle was raised.
    Cancelled,
}

/// Result of a restart climb.
#[derive(Debug, Clone)]
pub struct RestartOutcome {
    /// Best gene across all restarts.
    pub best_gene: Gene,
    /// Fitness of `best_gene` against the fixed opponent set.
    pub best_fitness: f64,
    /// Restarts performed.
    pub restarts: u64,
}

/// Result of an elite climb.
#[derive(Debug, Clone)]
pub struct EliteClimbOutcome {
    /// Final candidate.
    pub best_gene: Gene,
    /// Iterations performed.
    pub iterations: u64,
    /// Elite set at the end of the run.
    pub elite: Vec<Gene>,
    /// Best lexicographic record, when that acceptance policy ran.
    pub record: Option<DuelRecord>,
    /// Why the run stopped.
    pub stop_reason: ClimbStop,
}

/// Accumulated duel totals across the elite set, ordered lexicographically:
/// fewer opponent survivors first, then fewer rounds, then more own survivors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelRecord {
    /// Total survivors on the elite side.
    pub opponent_survivors: u64,
    /// Total rounds across all duels.
    pub rounds: u64,
    /// Total survivors on the candidate side.
    pub own_survivors: u64,
}

impl DuelRecord {
    fn key(&self) -> (u64, u64, std::cmp::Reverse<u64>) {
        (
            self.opponent_survivors,
            self.rounds,
            std::cmp::Reverse(self.own_survivors),
        )
    }
}

/// Policy A: repeated steepest ascent from random starting genes.
///
/// Each restart climbs while some single-flip neighbor strictly improves on
/// the current fitness; the first step with no improvement ends the restart.
/// The best gene seen across restarts is kept, so the tracked fitness never
/// regresses.
pub struct RestartClimber {
    config: HillClimbRestartConfig,
    scoring: ScoringPolicy,
    rng: StdRng,
}

impl RestartClimber {
    /// Create a climber; fails fast on a degenerate configuration.
    pub fn new(config: HillClimbRestartConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            scoring: ScoringPolicy::default(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Replace the default scoring policy.
    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    /// Run all restarts, invoking `on_progress` once per finished restart.
    pub fn run<O, F>(&mut self, oracle: &O, mut on_progress: F) -> Result<RestartOutcome, SearchError>
    where
        O: ContestOracle + ?Sized,
        F: FnMut(&ClimbProgress),
    {
        let opponents = self.config.opponents.clone();
        let mut best: Option<(Gene, f64)> = None;

        for restart in 0..self.config.restarts {
            let mut current = random_gene(&mut self.rng);
            let mut current_fitness = self.scoring.evaluate(oracle, &current, &opponents)?;
            let mut moves = 0u64;
            let mut steps_taken = 0u64;

            for _ in 0..self.config.steps {
                steps_taken += 1;
                let neighbors: Vec<Gene> = (0..self.config.neighbors)
                    .map(|_| flip_one(&mut self.rng, &current))
                    .collect();

                let scoring = self.scoring;
                let fitness: Vec<f64> = neighbors
                    .par_iter()
                    .map(|gene| scoring.evaluate(oracle, gene, &opponents))
                    .collect::<Result<_, _>>()?;

                let (winner, winner_fitness) = fitness
                    .iter()
                    .copied()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| a.total_cmp(b))
                    .unwrap_or((0, f64::NEG_INFINITY));

                // Move only on strict improvement; a local optimum ends the
                // restart early.
                if winner_fitness > current_fitness {
                    current = neighbors[winner];
                    current_fitness = winner_fitness;
                    moves += 1;
                } else {
                    break;
                }
            }

            if best.is_none_or(|(_, fitness)| current_fitness > fitness) {
                log::info!(
                    "restart {restart}: new best {current_fitness:.4} {current}"
                );
                best = Some((current, current_fitness));
            }

            if let Some((best_gene, _)) = best {
                on_progress(&ClimbProgress {
                    iteration: restart as u64 + 1,
                    recent_success_rate: moves as f64 / steps_taken as f64,
                    best_gene,
                });
            }
        }

        // restarts >= 1 is validated, so a best always exists by now.
        let (best_gene, best_fitness) =
            best.ok_or(ConfigError::ZeroSample { name: "restarts" })?;
        Ok(RestartOutcome {
            best_gene,
            best_fitness,
            restarts: self.config.restarts as u64,
        })
    }
}

/// The genes a climbing candidate currently has to beat.
///
/// Seeded with the two baseline anchors and never empty thereafter.
#[derive(Debug, Clone)]
pub struct EliteSet {
    genes: Vec<Gene>,
    capacity: usize,
}

impl EliteSet {
    /// Seed the set with the baseline anchors.
    pub fn seeded(anchors: [Gene; 2], capacity: usize) -> Self {
        Self {
            genes: anchors.to_vec(),
            capacity,
        }
    }

    /// Current members, oldest first.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// The set is seeded at construction and eviction spares the newest
    /// member, so it can never drain.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Append an accepted gene, then with probability `len / capacity` evict
    /// a uniformly random member other than the newest.
    fn admit<R: Rng + ?Sized>(&mut self, rng: &mut R, gene: Gene) {
        self.genes.push(gene);
        let occupancy = (self.genes.len() as f64 / self.capacity as f64).min(1.0);
        if rng.gen_bool(occupancy) {
            let victim = rng.gen_range(0..self.genes.len() - 1);
            self.genes.remove(victim);
        }
    }
}

/// Policy B: open-ended climb accepting only candidates that out-perform the
/// whole elite set.
pub struct EliteClimber {
    config: EliteClimbConfig,
    rng: StdRng,
    cancelled: Arc<AtomicBool>,
}

impl EliteClimber {
    /// Create a climber; fails fast on a degenerate configuration.
    pub fn new(config: EliteClimbConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle for the embedding caller to stop an otherwise unbounded run.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Run until quiescence, the iteration cap, or cancellation, invoking
    /// `on_progress` at every check interval.
    pub fn run<O, F>(
        &mut self,
        oracle: &O,
        mut on_progress: F,
    ) -> Result<EliteClimbOutcome, SearchError>
    where
        O: ContestOracle + ?Sized,
        F: FnMut(&ClimbProgress),
    {
        let step_sizes = Exp::new(1.0 / self.config.step_scale)
            .map_err(|_| ConfigError::InvalidStepScale {
                value: self.config.step_scale,
            })?;

        let anchors = self.config.baseline_anchors;
        let mut current = self.config.initial_gene.unwrap_or(anchors[0]);
        let capacity = match self.config.acceptance {
            AcceptancePolicy::Simple { max_elite_size } => max_elite_size,
            AcceptancePolicy::Lexicographic => anchors.len(),
        };
        let mut elite = EliteSet::seeded(anchors, capacity);
        let mut record: Option<DuelRecord> = None;

        let mut iteration = 0u64;
        let mut wins = 0u64;

        let stop_reason = loop {
            if self.cancelled.load(Ordering::Relaxed) {
                break ClimbStop::Cancelled;
            }
            if let Some(cap) = self.config.max_iterations
                && iteration >= cap
            {
                break ClimbStop::IterationCap;
            }

            iteration += 1;
            if iteration % self.config.check_interval == 0 {
                on_progress(&ClimbProgress {
                    iteration,
                    recent_success_rate: wins as f64 / self.config.check_interval as f64,
                    best_gene: current,
                });
                if wins == 0 && self.rng.gen_bool(self.config.stop_probability) {
                    break ClimbStop::Quiescent;
                }
                wins = 0;
            }

            let sites = self.draw_step(step_sizes);
            let mut candidate = current;
            point_mutate(&mut self.rng, &mut candidate, sites);

            match self.config.acceptance {
                AcceptancePolicy::Simple { .. } => {
                    // The candidate must strictly out-survive every member.
                    let mut beaten = false;
                    for member in elite.genes() {
                        let outcome =
                            oracle.battle(member, &candidate).map_err(SearchError::Oracle)?;
                        if outcome.count_a >= outcome.count_b {
                            beaten = true;
                            break;
                        }
                    }
                    if !beaten {
                        wins += 1;
                        current = candidate;
                        elite.admit(&mut self.rng, candidate);
                    }
                }
                AcceptancePolicy::Lexicographic => {
                    let mut totals = DuelRecord {
                        opponent_survivors: 0,
                        rounds: 0,
                        own_survivors: 0,
                    };
                    let mut beaten = false;
                    for member in elite.genes() {
                        let outcome =
                            oracle.battle(member, &candidate).map_err(SearchError::Oracle)?;
                        if outcome.count_a >= outcome.count_b {
                            beaten = true;
                            break;
                        }
                        totals.opponent_survivors += u64::from(outcome.count_a);
                        totals.rounds += u64::from(outcome.rounds);
                        totals.own_survivors += u64::from(outcome.count_b);
                    }
                    if !beaten {
                        match record {
                            None => {
                                wins += 1;
                                current = candidate;
                                record = Some(totals);
                            }
                            Some(best) if totals.key() < best.key() => {
                                wins += 1;
                                current = candidate;
                                record = Some(totals);
                            }
                            // An exact three-way tie moves the candidate for
                            // extra exploration without counting as a win.
                            Some(best) if totals.key() == best.key() => {
                                current = candidate;
                            }
                            Some(_) => {}
                        }
                    }
                }
            }
        };

        if let Some(best) = record {
            log::debug!(
                "elite climb stopped after {iteration} iterations, record {best:?}"
            );
        }

        Ok(EliteClimbOutcome {
            best_gene: current,
            iterations: iteration,
            elite: elite.genes().to_vec(),
            record,
            stop_reason,
        })
    }

    /// Mutation-site count: 1 + an exponential draw, clamped to
    /// `1..=max_step`.
    fn draw_step(&mut self, step_sizes: Exp<f64>) -> usize {
        let drawn = step_sizes.sample(&mut self.rng);
        (1 + drawn as usize).min(self.config.max_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::testing::{count_symbol, FailingOracle, SymbolCountOracle};

    #[test]
    fn test_restart_climb_improves_symbol_count() {
        let oracle = SymbolCountOracle::new(3);
        let config = HillClimbRestartConfig {
            restarts: 3,
            steps: 60,
            neighbors: 120,
            opponents: vec![Gene::ALL_ONES],
        };
        let mut climber = RestartClimber::new(config, Some(99)).unwrap();
        let outcome = climber.run(&oracle, |_| {}).unwrap();

        // Random starts average 12.5 threes; steepest ascent on the survivor
        // margin climbs far past that before stalling.
        assert!(count_symbol(&outcome.best_gene, 3) > 30);
        assert_eq!(outcome.restarts, 3);
    }

    #[test]
    fn test_restart_climb_reported_best_never_regresses() {
        let oracle = SymbolCountOracle::new(3);
        let config = HillClimbRestartConfig {
            restarts: 5,
            steps: 20,
            neighbors: 40,
            opponents: vec![Gene::ALL_ONES, Gene::ALL_THREES],
        };
        let mut climber = RestartClimber::new(config, Some(4)).unwrap();

        let scoring = ScoringPolicy::default();
        let opponents = [Gene::ALL_ONES, Gene::ALL_THREES];
        let mut last = f64::NEG_INFINITY;
        climber
            .run(&oracle, |progress| {
                let fitness = scoring
                    .evaluate(&oracle, &progress.best_gene, &opponents)
                    .unwrap();
                assert!(fitness >= last);
                last = fitness;
            })
            .unwrap();
    }

    #[test]
    fn test_restart_climb_propagates_oracle_failure() {
        let config = HillClimbRestartConfig {
            restarts: 2,
            steps: 5,
            neighbors: 5,
            opponents: vec![Gene::ALL_ONES],
        };
        let mut climber = RestartClimber::new(config, Some(1)).unwrap();
        assert!(matches!(
            climber.run(&FailingOracle, |_| {}),
            Err(SearchError::Oracle(_))
        ));
    }

    #[test]
    fn test_elite_set_growth_and_eviction_bounds() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut elite = EliteSet::seeded([Gene::ALL_ONES, Gene::ALL_THREES], 5);
        for _ in 0..200 {
            let before = elite.len();
            let newest = random_gene(&mut rng);
            elite.admit(&mut rng, newest);
            // Grows by exactly one, then at most one eviction.
            assert!(elite.len() == before || elite.len() == before + 1);
            assert!(elite.len() <= 5);
            assert!(!elite.is_empty());
            // The newest member always survives its own admission.
            assert_eq!(*elite.genes().last().unwrap(), newest);
        }
    }

    #[test]
    fn test_simple_elite_climb_accepts_dominators() {
        // Symbol 2 counts: both anchors hold zero of them, so any candidate
        // carrying a 2 strictly beats the whole seeded set.
        let oracle = SymbolCountOracle::new(2);
        let config = EliteClimbConfig {
            acceptance: AcceptancePolicy::Simple { max_elite_size: 6 },
            step_scale: 2.0,
            check_interval: 50,
            stop_probability: 0.5,
            max_iterations: Some(3_000),
            ..Default::default()
        };
        let mut climber = EliteClimber::new(config, Some(8)).unwrap();
        let outcome = climber.run(&oracle, |_| {}).unwrap();

        assert!(outcome.elite.len() <= 6);
        assert!(!outcome.elite.is_empty());
        assert!(count_symbol(&outcome.best_gene, 2) > 0);
        // Every elite admission came from an accepted candidate, so the final
        // candidate must out-survive the strongest anchor.
        let duel = oracle.battle(&Gene::ALL_THREES, &outcome.best_gene).unwrap();
        assert!(duel.count_b > duel.count_a);
    }

    #[test]
    fn test_lexicographic_climb_improves_record() {
        let oracle = SymbolCountOracle::new(2);
        let config = EliteClimbConfig {
            acceptance: AcceptancePolicy::Lexicographic,
            step_scale: 3.0,
            check_interval: 50,
            stop_probability: 0.2,
            max_iterations: Some(3_000),
            initial_gene: Some(Gene::ALL_ONES),
            ..Default::default()
        };
        let mut climber = EliteClimber::new(config, Some(15)).unwrap();
        let outcome = climber.run(&oracle, |_| {}).unwrap();

        // The elite set never grows under this policy.
        assert_eq!(outcome.elite.len(), 2);
        let record = outcome.record.expect("some candidate must have been accepted");
        // Both anchors keep exactly one survivor against this oracle.
        assert_eq!(record.opponent_survivors, 2);
        assert!(record.own_survivors >= 2);
        assert!(count_symbol(&outcome.best_gene, 2) > 0);
    }

    #[test]
    fn test_elite_climb_iteration_cap() {
        let oracle = SymbolCountOracle::new(3);
        let config = EliteClimbConfig {
            // Nothing can out-survive the all-threes anchor here, so only the
            // cap or the quiescence coin can end the run.
            stop_probability: 0.0,
            max_iterations: Some(500),
            ..Default::default()
        };
        let mut climber = EliteClimber::new(config, Some(2)).unwrap();
        let outcome = climber.run(&oracle, |_| {}).unwrap();
        assert_eq!(outcome.iterations, 500);
        assert_eq!(outcome.stop_reason, ClimbStop::IterationCap);
    }

    #[test]
    fn test_elite_climb_cancellation() {
        let oracle = SymbolCountOracle::new(3);
        let config = EliteClimbConfig {
            stop_probability: 0.0,
            ..Default::default()
        };
        let mut climber = EliteClimber::new(config, Some(2)).unwrap();
        climber.cancel_handle().store(true, Ordering::Relaxed);
        let outcome = climber.run(&oracle, |_| {}).unwrap();
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.stop_reason, ClimbStop::Cancelled);
    }

    #[test]
    fn test_quiescent_halt_reports_progress() {
        let oracle = SymbolCountOracle::new(3);
        let config = EliteClimbConfig {
            check_interval: 10,
            stop_probability: 1.0,
            ..Default::default()
        };
        let mut climber = EliteClimber::new(config, Some(6)).unwrap();
        let mut reports = 0usize;
        let outcome = climber
            .run(&oracle, |progress| {
                reports += 1;
                assert_eq!(progress.iteration, 10);
                assert_eq!(progress.recent_success_rate, 0.0);
            })
            .unwrap();
        // No candidate beats the all-threes anchor, so the first silent check
        // halts with certainty.
        assert_eq!(reports, 1);
        assert_eq!(outcome.stop_reason, ClimbStop::Quiescent);
        assert_eq!(outcome.iterations, 10);
    }
}
