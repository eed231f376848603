use super::stats::{GeneLengthStats, GeneStats, PoolStatus};
use crate::config::{PoolConfig, SelectionPolicy};
use crate::engines::expression::extract_genes;
use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::roulette_selection;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenePoolEntry {
    pub genome: Genome,
    pub fitness: f64,
    pub client_id: String,
    pub submitted_at: DateTime<Utc>,
    /// Monotonic insertion order; breaks ties when timestamps collide
    pub sequence: u64,
}

impl GenePoolEntry {
    /// Ranking order: higher fitness first, then newer first, so the last
    /// entry is always the next eviction victim.
    fn rank(a: &Self, b: &Self) -> Ordering {
        b.fitness
            .total_cmp(&a.fitness)
            .then_with(|| b.submitted_at.cmp(&a.submitted_at))
            .then_with(|| b.sequence.cmp(&a.sequence))
    }
}

struct PoolState {
    entries: Vec<GenePoolEntry>,
    next_sequence: u64,
}

/// Bounded, fitness-ranked store of genomes submitted by clients.
///
/// All mutation goes through one write lock, so an insert and the eviction it
/// triggers are a single atomic step and the pool can never hold more than
/// `capacity` entries. Readers take the read lock and see a consistent
/// snapshot.
pub struct GenePool {
    state: RwLock<PoolState>,
    capacity: usize,
    policy: SelectionPolicy,
    gene_stats_sample: usize,
}

impl GenePool {
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            state: RwLock::new(PoolState {
                entries: Vec::new(),
                next_sequence: 0,
            }),
            capacity: config.capacity.max(1),
            policy: config.selection_policy,
            gene_stats_sample: config.gene_stats_sample,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(&PoolConfig {
            capacity,
            ..PoolConfig::default()
        })
    }

    /// Rebuild a pool from persisted entries, keeping the best `capacity`
    pub fn from_entries(config: &PoolConfig, mut entries: Vec<GenePoolEntry>) -> Self {
        let pool = Self::new(config);
        entries.retain(|e| e.fitness.is_finite());
        entries.sort_by(GenePoolEntry::rank);
        entries.truncate(pool.capacity);
        {
            let mut state = pool.write();
            state.next_sequence = entries.iter().map(|e| e.sequence + 1).max().unwrap_or(0);
            state.entries = entries;
        }
        pool
    }

    fn read(&self) -> RwLockReadGuard<'_, PoolState> {
        // every write leaves the entries sorted and bounded, so a poisoned lock is still usable
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PoolState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a genome. If the pool overflows, the lowest-fitness entry is
    /// evicted, ties going to the oldest submission. A non-finite fitness
    /// cannot be ranked and is dropped.
    pub fn insert(&self, genome: Genome, fitness: f64, client_id: impl Into<String>) {
        let client_id = client_id.into();
        if !fitness.is_finite() {
            warn!("dropping genome from {} with non-finite fitness {}", client_id, fitness);
            return;
        }

        let mut state = self.write();

        let entry = GenePoolEntry {
            genome,
            fitness,
            client_id,
            submitted_at: Utc::now(),
            sequence: state.next_sequence,
        };
        state.next_sequence += 1;

        let at = state
            .entries
            .partition_point(|e| GenePoolEntry::rank(e, &entry) == Ordering::Less);
        state.entries.insert(at, entry);

        if state.entries.len() > self.capacity {
            if let Some(evicted) = state.entries.pop() {
                debug!(
                    "evicted genome from {} (fitness {:.3}, seq {})",
                    evicted.client_id, evicted.fitness, evicted.sequence
                );
            }
        }

        assert!(
            state.entries.len() <= self.capacity,
            "gene pool exceeded capacity {}",
            self.capacity
        );
    }

    /// Draw an immigrant genome, biased toward high fitness. Never mutates the pool.
    pub fn select_immigrant<R: Rng>(&self, rng: &mut R) -> Option<Genome> {
        let state = self.read();
        let entries = &state.entries;
        if entries.is_empty() {
            return None;
        }

        let idx = match self.policy {
            SelectionPolicy::TopFitness => {
                let best = entries[0].fitness;
                let ties = entries
                    .iter()
                    .take_while(|e| e.fitness.total_cmp(&best) == Ordering::Equal)
                    .count();
                rng.gen_range(0..ties)
            }
            SelectionPolicy::FitnessWeighted => {
                let fitnesses: Vec<f64> = entries.iter().map(|e| e.fitness).collect();
                roulette_selection(&fitnesses, rng)?
            }
        };

        Some(entries[idx].genome.clone())
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy of the entries in ranking order
    pub fn snapshot(&self) -> Vec<GenePoolEntry> {
        self.read().entries.clone()
    }

    pub fn pool_status(&self) -> PoolStatus {
        PoolStatus::from_entries(&self.read().entries, self.capacity)
    }

    /// Gene-length histogram over the top `gene_stats_sample` genomes
    pub fn gene_stats(&self) -> GeneStats {
        let sample: Vec<GenePoolEntry> = {
            let state = self.read();
            let n = self.gene_stats_sample.min(state.entries.len());
            state.entries[..n].to_vec()
        };
        gene_stats_of(&sample)
    }
}

/// For each gene length, how many genes of that length occur and the mean
/// fitness of the genomes carrying them. Extraction runs in parallel.
pub fn gene_stats_of(entries: &[GenePoolEntry]) -> GeneStats {
    let by_length: BTreeMap<usize, (usize, f64)> = entries
        .par_iter()
        .map(|entry| {
            let mut local: BTreeMap<usize, (usize, f64)> = BTreeMap::new();
            for gene in extract_genes(&entry.genome) {
                let slot = local.entry(gene.len()).or_insert((0, 0.0));
                slot.0 += 1;
                slot.1 += entry.fitness;
            }
            local
        })
        .reduce(BTreeMap::new, |mut acc, local| {
            for (len, (count, total)) in local {
                let slot = acc.entry(len).or_insert((0, 0.0));
                slot.0 += count;
                slot.1 += total;
            }
            acc
        });

    GeneStats {
        genomes_analyzed: entries.len(),
        by_length: by_length
            .into_iter()
            .map(|(len, (count, total))| {
                (
                    len,
                    GeneLengthStats {
                        count,
                        avg_fitness: total / count as f64,
                    },
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::starter_genome;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn genome(fill: f64) -> Genome {
        Genome::new(vec![fill; 60]).unwrap()
    }

    #[test]
    fn test_evicts_lowest_fitness() {
        let pool = GenePool::with_capacity(2);
        pool.insert(genome(0.1), 1.0, "a");
        pool.insert(genome(0.2), 3.0, "b");
        pool.insert(genome(0.3), 2.0, "c");

        let fitnesses: Vec<f64> = pool.snapshot().iter().map(|e| e.fitness).collect();
        assert_eq!(fitnesses, vec![3.0, 2.0]);
    }

    #[test]
    fn test_tie_evicts_oldest() {
        let pool = GenePool::with_capacity(2);
        pool.insert(genome(0.1), 1.0, "old");
        pool.insert(genome(0.2), 1.0, "new");
        pool.insert(genome(0.3), 5.0, "best");

        let clients: Vec<String> = pool.snapshot().into_iter().map(|e| e.client_id).collect();
        assert_eq!(clients, vec!["best".to_string(), "new".to_string()]);
    }

    #[test]
    fn test_low_newcomer_is_evicted_immediately() {
        let pool = GenePool::with_capacity(1);
        pool.insert(genome(0.1), 5.0, "keeper");
        pool.insert(genome(0.2), 1.0, "loser");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.snapshot()[0].client_id, "keeper");
    }

    #[test]
    fn test_top_fitness_selection_breaks_ties_randomly() {
        let pool = GenePool::with_capacity(10);
        pool.insert(genome(0.1), 9.0, "a");
        pool.insert(genome(0.2), 9.0, "b");
        pool.insert(genome(0.3), 1.0, "c");

        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let g = pool.select_immigrant(&mut rng).unwrap();
            assert_ne!(g[0], 0.3);
            seen.insert((g[0] * 10.0).round() as i64);
        }
        assert_eq!(seen.len(), 2);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_non_finite_fitness_is_not_stored() {
        let pool = GenePool::with_capacity(4);
        pool.insert(genome(0.1), 1.0, "ok");
        pool.insert(genome(0.2), f64::NAN, "nan");
        pool.insert(genome(0.3), f64::INFINITY, "inf");
        pool.insert(genome(0.4), f64::NEG_INFINITY, "neg");

        assert_eq!(pool.len(), 1);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..16 {
            assert_eq!(pool.select_immigrant(&mut rng).unwrap()[0], 0.1);
        }
    }

    #[test]
    fn test_restored_non_finite_entries_are_dropped() {
        let source = GenePool::with_capacity(3);
        source.insert(genome(0.1), 2.0, "a");
        source.insert(genome(0.2), 1.0, "b");
        let mut entries = source.snapshot();
        entries[1].fitness = f64::NAN;

        let restored = GenePool::from_entries(&PoolConfig::default(), entries);
        assert_eq!(restored.len(), 1);
        assert!(restored.select_immigrant(&mut StdRng::seed_from_u64(0)).is_some());
    }

    #[test]
    fn test_gene_stats_leave_pool_writable() {
        let pool = GenePool::with_capacity(4);
        pool.insert(starter_genome(), 1.0, "a");
        let stats = pool.gene_stats();
        pool.insert(starter_genome(), 2.0, "b");
        assert_eq!(stats.genomes_analyzed, 1);
        assert_eq!(pool.gene_stats().genomes_analyzed, 2);
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        let pool = GenePool::with_capacity(3);
        assert!(pool.select_immigrant(&mut StdRng::seed_from_u64(0)).is_none());
        assert_eq!(pool.pool_status().total_genomes, 0);
    }

    #[test]
    fn test_gene_stats_over_starter_genomes() {
        let pool = GenePool::with_capacity(10);
        pool.insert(starter_genome(), 2.0, "a");
        pool.insert(starter_genome(), 4.0, "b");

        let stats = pool.gene_stats();
        assert_eq!(stats.genomes_analyzed, 2);
        let three = &stats.by_length[&3];
        assert_eq!(three.count, 2);
        assert!((three.avg_fitness - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_entries_trims_and_continues_sequence() {
        let source = GenePool::with_capacity(5);
        for i in 0..5 {
            source.insert(genome(0.5), i as f64, "x");
        }
        let restored = GenePool::from_entries(&PoolConfig { capacity: 3, ..PoolConfig::default() }, source.snapshot());
        assert_eq!(restored.len(), 3);
        restored.insert(genome(0.5), 10.0, "y");
        let top = &restored.snapshot()[0];
        assert_eq!(top.sequence, 5);
    }
}
