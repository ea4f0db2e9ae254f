//! Stochastic gene operators: generation, mutation, crossover, distance.
//!
//! All operators draw from a caller-supplied [`Rng`] so a whole run can be
//! reproduced from one seed.

use rand::seq::index;
use rand::Rng;

use crate::schema::{Gene, GENE_LENGTH, SYMBOL_COUNT};

/// Draw a gene with every position uniform over the alphabet.
pub fn random_gene<R: Rng + ?Sized>(rng: &mut R) -> Gene {
    let mut symbols = [0u8; GENE_LENGTH];
    for slot in &mut symbols {
        *slot = rng.gen_range(0..SYMBOL_COUNT);
    }
    Gene::from_raw(symbols)
}

/// Mutate each position independently with probability `rate`, replacing it
/// with a symbol uniform over the three symbols other than the current one.
/// A mutated position therefore always changes.
///
/// `rate` must lie in `0.0..=1.0`; strategy configs validate this before any
/// search loop runs.
pub fn mutate_exclusive<R: Rng + ?Sized>(rng: &mut R, gene: &mut Gene, rate: f64) {
    for slot in gene.symbols_mut() {
        if rng.gen_bool(rate) {
            *slot = (*slot + rng.gen_range(1..SYMBOL_COUNT)) % SYMBOL_COUNT;
        }
    }
}

/// Reassign `sites` distinct positions, each to an independent uniform symbol
/// from the full alphabet. Unlike [`mutate_exclusive`], a chosen position may
/// keep its original symbol.
pub fn point_mutate<R: Rng + ?Sized>(rng: &mut R, gene: &mut Gene, sites: usize) {
    let sites = sites.min(GENE_LENGTH);
    for position in index::sample(rng, GENE_LENGTH, sites) {
        gene.symbols_mut()[position] = rng.gen_range(0..SYMBOL_COUNT);
    }
}

/// Neighbor move: exactly one uniformly chosen position changed to a
/// different symbol.
pub fn flip_one<R: Rng + ?Sized>(rng: &mut R, gene: &Gene) -> Gene {
    let mut neighbor = *gene;
    let position = rng.gen_range(0..GENE_LENGTH);
    let symbols = neighbor.symbols_mut();
    symbols[position] = (symbols[position] + rng.gen_range(1..SYMBOL_COUNT)) % SYMBOL_COUNT;
    neighbor
}

/// Single-point crossover: a split index uniform in `1..GENE_LENGTH`, child =
/// `first[..split] ++ second[split..]`. One child per ordered pair; swap the
/// arguments for the mirrored child.
pub fn crossover<R: Rng + ?Sized>(rng: &mut R, first: &Gene, second: &Gene) -> Gene {
    let split = rng.gen_range(1..GENE_LENGTH);
    let mut symbols = *first.symbols();
    symbols[split..].copy_from_slice(&second.symbols()[split..]);
    Gene::from_raw(symbols)
}

/// Count of differing positions between two genes.
pub fn hamming_distance(first: &Gene, second: &Gene) -> u32 {
    first
        .symbols()
        .iter()
        .zip(second.symbols())
        .filter(|(a, b)| a != b)
        .count() as u32
}
