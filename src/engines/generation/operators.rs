use crate::config::MutationConfig;
use crate::engines::expression::codec::circular_slice;
use crate::engines::generation::genome::{Genome, MAX_GENOME_LENGTH, MIN_GENOME_LENGTH};
use rand::Rng;

/// Counts of operator applications in one mutation event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationReport {
    pub point: usize,
    pub inserted: usize,
    pub deleted: usize,
    pub duplicated: usize,
    /// Operator firings dropped because they would leave the length bounds
    pub skipped: usize,
}

/// Applies the four mutation operators to a copy of a parent genome.
///
/// Order is point, insertion, deletion, duplication. Every operator checks
/// the length bounds before acting and is skipped when acting would push the
/// genome outside [50, 200].
#[derive(Debug, Clone)]
pub struct MutationEngine {
    config: MutationConfig,
}

impl MutationEngine {
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    pub fn mutate<R: Rng>(&self, parent: &Genome, rng: &mut R) -> (Genome, MutationReport) {
        let mut codons = parent.codons().to_vec();
        let mut report = MutationReport::default();

        report.point = point_mutation(&mut codons, self.config.point_rate, rng);

        let (inserted, skipped) = insertion(&mut codons, self.config.insertion_rate, rng);
        report.inserted = inserted;
        report.skipped += skipped;

        let (deleted, skipped) = deletion(&mut codons, self.config.deletion_rate, rng);
        report.deleted = deleted;
        report.skipped += skipped;

        if rng.gen::<f64>() < self.config.duplication_rate {
            let segment = rng.gen_range(self.config.min_duplication_len..=self.config.max_duplication_len);
            if duplication(&mut codons, segment, rng) {
                report.duplicated = 1;
            } else {
                report.skipped += 1;
            }
        }

        (Genome::from_trusted(codons), report)
    }
}

impl Default for MutationEngine {
    fn default() -> Self {
        Self::new(MutationConfig::default())
    }
}

/// Point mutation: replace each codon with a fresh uniform value at `rate`
pub fn point_mutation<R: Rng>(codons: &mut [f64], rate: f64, rng: &mut R) -> usize {
    let mut mutated = 0;
    for codon in codons.iter_mut() {
        if rng.gen::<f64>() < rate {
            *codon = rng.gen::<f64>();
            mutated += 1;
        }
    }
    mutated
}

/// Insertion: after each original position, insert one random codon at `rate`.
/// Returns (inserted, skipped at the upper bound).
pub fn insertion<R: Rng>(codons: &mut Vec<f64>, rate: f64, rng: &mut R) -> (usize, usize) {
    let mut out = Vec::with_capacity(codons.len() + 4);
    let (mut inserted, mut skipped) = (0, 0);

    for &codon in codons.iter() {
        out.push(codon);
        if rng.gen::<f64>() < rate {
            if codons.len() + inserted < MAX_GENOME_LENGTH {
                out.push(rng.gen::<f64>());
                inserted += 1;
            } else {
                skipped += 1;
            }
        }
    }

    *codons = out;
    (inserted, skipped)
}

/// Deletion: drop each codon at `rate`. Returns (deleted, skipped at the lower bound).
pub fn deletion<R: Rng>(codons: &mut Vec<f64>, rate: f64, rng: &mut R) -> (usize, usize) {
    let original = codons.len();
    let (mut deleted, mut skipped) = (0, 0);

    codons.retain(|_| {
        if rng.gen::<f64>() < rate {
            if original - deleted > MIN_GENOME_LENGTH {
                deleted += 1;
                return false;
            }
            skipped += 1;
        }
        true
    });

    (deleted, skipped)
}

/// Duplication: copy a circular segment of `segment_len` codons and splice it
/// in at a random point. Returns false (genome untouched) when the result
/// would exceed the upper bound.
pub fn duplication<R: Rng>(codons: &mut Vec<f64>, segment_len: usize, rng: &mut R) -> bool {
    let n = codons.len();
    if n == 0 || n + segment_len > MAX_GENOME_LENGTH {
        return false;
    }

    let from = rng.gen_range(0..n);
    let at = rng.gen_range(0..=n);
    duplicate_segment(codons, from, segment_len, at)
}

/// Copy `segment_len` codons starting at `from`, wrapping past the end, and
/// insert the copy before index `at`.
pub fn duplicate_segment(
    codons: &mut Vec<f64>,
    from: usize,
    segment_len: usize,
    at: usize,
) -> bool {
    let n = codons.len();
    if n == 0 || at > n || n + segment_len > MAX_GENOME_LENGTH {
        return false;
    }
    let segment = circular_slice(codons, from, segment_len);
    codons.splice(at..at, segment);
    true
}

/// Roulette wheel selection: probability proportional to fitness.
/// Returns the chosen index, or None for an empty population.
pub fn roulette_selection<R: Rng>(fitnesses: &[f64], rng: &mut R) -> Option<usize> {
    if fitnesses.is_empty() {
        return None;
    }

    let total_fitness: f64 = fitnesses.iter().map(|f| f.max(0.0)).sum();

    if total_fitness <= 0.0 {
        // All non-positive fitness, pick random
        return Some(rng.gen_range(0..fitnesses.len()));
    }

    let mut spin = rng.gen::<f64>() * total_fitness;

    for (i, fitness) in fitnesses.iter().enumerate() {
        spin -= fitness.max(0.0);
        if spin <= 0.0 && *fitness > 0.0 {
            return Some(i);
        }
    }

    // Fallback: last entry with positive weight
    fitnesses.iter().rposition(|f| *f > 0.0)
}
