use crate::types::{Gene, Thresholds};
use std::collections::BTreeMap;

pub const MIN_GENE_LENGTH: usize = 3;
pub const MAX_GENE_LENGTH: usize = 20;

/// Extract genes with the base START/STOP thresholds (0.95 / 0.05)
pub fn extract_genes(genome: &[f64]) -> Vec<Gene> {
    extract_genes_with(genome, Thresholds::default())
}

/// Extract every gene of a circular genome under the given thresholds.
///
/// Each START codon opens its own search window: the scan walks forward from
/// the codon after it, wrapping past the origin, for at most `len - 1` steps
/// and stops at the first STOP. Codons are never consumed, so one STOP can
/// close several STARTs and genes may nest or overlap.
///
/// Returned genes are ordered by start index with duplicate (start, end)
/// spans removed. Malformed input never errors; it just yields fewer genes.
pub fn extract_genes_with(genome: &[f64], thresholds: Thresholds) -> Vec<Gene> {
    let n = genome.len();
    if n < MIN_GENE_LENGTH + 2 {
        return Vec::new();
    }

    let mut genes: BTreeMap<(usize, usize), Gene> = BTreeMap::new();

    for (start, &codon) in genome.iter().enumerate() {
        if codon <= thresholds.start {
            continue;
        }

        let Some(end) = find_stop(genome, start, thresholds.stop) else {
            continue;
        };

        let length = circular_distance(start, end, n) - 1;
        if !(MIN_GENE_LENGTH..=MAX_GENE_LENGTH).contains(&length) {
            continue;
        }

        genes.entry((start, end)).or_insert_with(|| Gene {
            start,
            end,
            content: circular_slice(genome, start + 1, length),
        });
    }

    genes.into_values().collect()
}

/// Index of the first STOP after `start`, scanning at most `len - 1` codons
fn find_stop(genome: &[f64], start: usize, stop_threshold: f64) -> Option<usize> {
    let n = genome.len();
    (1..n)
        .map(|step| (start + step) % n)
        .find(|&idx| genome[idx] < stop_threshold)
}

/// Forward distance from `from` to `to` on a ring of size `n`
pub fn circular_distance(from: usize, to: usize, n: usize) -> usize {
    (to + n - from % n) % n
}

/// `length` codons starting at `from`, wrapping past the end
pub fn circular_slice(genome: &[f64], from: usize, length: usize) -> Vec<f64> {
    let n = genome.len();
    (0..length).map(|k| genome[(from + k) % n]).collect()
}
