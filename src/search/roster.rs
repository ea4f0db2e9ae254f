//! Roster of champion genes harvested across search runs.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::Gene;
use crate::search::oracle::{ContestOracle, ContestOutcome, SearchError};
use crate::search::score::bucket_score;

/// A discovered gene with optional provenance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    /// The gene itself.
    pub gene: Gene,
    /// Fitness at discovery time, if the producing strategy reported one.
    #[serde(default)]
    pub fitness: Option<f64>,
    /// Free-form provenance tag, e.g. which run produced the gene.
    #[serde(default)]
    pub label: Option<String>,
}

impl RosterEntry {
    /// Entry with no metadata.
    pub fn bare(gene: Gene) -> Self {
        Self {
            gene,
            fitness: None,
            label: None,
        }
    }
}

/// One row of a round-robin ranking, best first.
#[derive(Debug, Clone)]
pub struct Standing {
    /// The ranked gene.
    pub gene: Gene,
    /// Accumulated bucket score across all pairings.
    pub total_score: u32,
    /// Contests fought.
    pub contests: usize,
}

/// Per-opponent outcome report for a single challenger.
#[derive(Debug, Clone)]
pub struct DuelReport {
    /// The roster opponent.
    pub opponent: Gene,
    /// Outcome with the opponent first and the challenger second.
    pub outcome: ContestOutcome,
}

/// Collection of champion genes, deduplicated by content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChampionRoster {
    entries: Vec<RosterEntry>,
}

impl ChampionRoster {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; returns false if the gene is already present.
    pub fn add(&mut self, entry: RosterEntry) -> bool {
        if self.entries.iter().any(|held| held.gene == entry.gene) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Add a bare gene; returns false if it is already present.
    pub fn add_gene(&mut self, gene: Gene) -> bool {
        self.add(RosterEntry::bare(gene))
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Genes in insertion order.
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.entries.iter().map(|entry| &entry.gene)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pair every gene against every other once, accumulate both sides'
    /// bucket scores, and return the standings best first.
    pub fn round_robin<O: ContestOracle + ?Sized>(
        &self,
        oracle: &O,
    ) -> Result<Vec<Standing>, SearchError> {
        let size = self.entries.len();
        let mut totals = vec![0u32; size];

        for i in 0..size {
            for j in (i + 1)..size {
                let outcome = oracle
                    .battle(&self.entries[i].gene, &self.entries[j].gene)
                    .map_err(SearchError::Oracle)?;
                let (first, second) =
                    bucket_score(outcome.rounds, outcome.count_a, outcome.count_b);
                totals[i] += u32::from(first);
                totals[j] += u32::from(second);
            }
        }

        let mut standings: Vec<Standing> = self
            .entries
            .iter()
            .zip(&totals)
            .map(|(entry, &total_score)| Standing {
                gene: entry.gene,
                total_score,
                contests: size.saturating_sub(1),
            })
            .collect();
        standings.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        Ok(standings)
    }

    /// Battle one challenger against every roster gene in order, opponent
    /// first, and report the raw outcomes.
    pub fn duel_report<O: ContestOracle + ?Sized>(
        &self,
        oracle: &O,
        challenger: &Gene,
    ) -> Result<Vec<DuelReport>, SearchError> {
        self.entries
            .iter()
            .map(|entry| {
                let outcome = oracle
                    .battle(&entry.gene, challenger)
                    .map_err(SearchError::Oracle)?;
                Ok(DuelReport {
                    opponent: entry.gene,
                    outcome,
                })
            })
            .collect()
    }

    /// Write the roster to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Load a roster from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
