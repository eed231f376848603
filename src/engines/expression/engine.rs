use super::codec::extract_genes_with;
use super::interpreter::interpret_gene;
use crate::config::ExpressionConfig;
use crate::types::{Gene, PhenotypeVector, Protein, Thresholds};
use std::collections::HashSet;

/// A gene together with the protein it expressed and the pass that found it
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressedGene {
    pub gene: Gene,
    pub protein: Protein,
    pub pass: usize,
}

/// Outcome of expressing one genome
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub phenotype: PhenotypeVector,
    pub genes: Vec<ExpressedGene>,
    /// Thresholds in effect after the last pass
    pub thresholds: Thresholds,
    pub passes: usize,
}

impl Expression {
    /// Number of non-regulatory genes that shaped the phenotype
    pub fn active_gene_count(&self) -> usize {
        self.genes.iter().filter(|g| !g.protein.is_regulatory).count()
    }

    pub fn regulatory_gene_count(&self) -> usize {
        self.genes.iter().filter(|g| g.protein.is_regulatory).count()
    }
}

/// Iterative gene expression with regulatory feedback.
///
/// Pass 0 scans with the base thresholds. Every regulatory protein first seen
/// in a pass moves the START threshold by `-magnitude * start_shift` and the
/// STOP threshold by `+magnitude * stop_shift` for the next pass, which can
/// uncover genes that were silent before. The loop ends when a pass leaves
/// the thresholds where they were, when a re-scan (pass 1 onward) discovers
/// no new non-regulatory gene, or after `max_passes`. Pass 0 is exempt from
/// the second rule: its regulators are what start the cascade.
#[derive(Debug, Clone)]
pub struct ExpressionEngine {
    config: ExpressionConfig,
}

impl ExpressionEngine {
    pub fn new(config: ExpressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExpressionConfig {
        &self.config
    }

    pub fn express(&self, genome: &[f64]) -> Expression {
        let mut thresholds = self.config.base_thresholds;
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut expressed: Vec<ExpressedGene> = Vec::new();
        let mut passes = 0;

        while passes < self.config.max_passes.max(1) {
            let pass = passes;
            passes += 1;

            let mut next = thresholds;
            let mut new_structural = 0;

            for gene in extract_genes_with(genome, thresholds) {
                if !seen.insert(gene.span()) {
                    continue;
                }

                let protein = interpret_gene(&gene);
                if protein.is_regulatory {
                    next = self.shift(next, protein.magnitude);
                } else {
                    new_structural += 1;
                }
                expressed.push(ExpressedGene { gene, protein, pass });
            }

            // unchanged thresholds cannot expose anything new
            if next == thresholds || (pass > 0 && new_structural == 0) {
                break;
            }
            thresholds = next;
        }

        Expression {
            phenotype: aggregate(&expressed),
            genes: expressed,
            thresholds,
            passes,
        }
    }

    fn shift(&self, t: Thresholds, magnitude: f64) -> Thresholds {
        let c = &self.config;
        Thresholds {
            start: (t.start - magnitude * c.start_shift).clamp(c.min_start_threshold, c.max_start_threshold),
            stop: (t.stop + magnitude * c.stop_shift).clamp(c.min_stop_threshold, c.max_stop_threshold),
        }
    }
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new(ExpressionConfig::default())
    }
}

/// Sum non-regulatory magnitudes per trait, then map into the trait ranges
fn aggregate(expressed: &[ExpressedGene]) -> PhenotypeVector {
    let mut sums = [0.0; 4];
    for e in expressed.iter().filter(|e| !e.protein.is_regulatory) {
        sums[e.protein.trait_kind.index()] += e.protein.magnitude;
    }
    PhenotypeVector::from_sums(sums)
}
