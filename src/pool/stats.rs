use super::gene_pool::GenePoolEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate view of the pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub total_genomes: usize,
    pub capacity: usize,
    pub avg_fitness: f64,
    pub top_fitness: f64,
    pub avg_genome_length: f64,
}

impl PoolStatus {
    /// `entries` must already be in ranking order
    pub fn from_entries(entries: &[GenePoolEntry], capacity: usize) -> Self {
        if entries.is_empty() {
            return Self {
                capacity,
                ..Self::default()
            };
        }

        let n = entries.len() as f64;
        Self {
            total_genomes: entries.len(),
            capacity,
            avg_fitness: entries.iter().map(|e| e.fitness).sum::<f64>() / n,
            top_fitness: entries[0].fitness,
            avg_genome_length: entries.iter().map(|e| e.genome.len() as f64).sum::<f64>() / n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneLengthStats {
    pub count: usize,
    pub avg_fitness: f64,
}

/// Gene-length histogram over the fittest genomes in the pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneStats {
    pub genomes_analyzed: usize,
    pub by_length: BTreeMap<usize, GeneLengthStats>,
}

impl GeneStats {
    pub fn total_genes(&self) -> usize {
        self.by_length.values().map(|s| s.count).sum()
    }

    /// Length carried by the most genes, shortest first on ties
    pub fn most_common_length(&self) -> Option<usize> {
        self.by_length
            .iter()
            .max_by(|a, b| a.1.count.cmp(&b.1.count).then_with(|| b.0.cmp(a.0)))
            .map(|(len, _)| *len)
    }
}
