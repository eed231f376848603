//! Genome representation for gene expression and evolution
//!
//! A genome is a circular sequence of real-valued codons in [0, 1]. Genes are
//! not stored; they are found by scanning for START (> 0.95) and STOP
//! (< 0.05) codons, so every codon can be junk, part of a gene, or part of
//! several overlapping genes at once.
//!
//! # Why a circular, unstructured sequence?
//!
//! - **Mutation**: point changes, insertions, deletions and duplications are
//!   plain vector edits; no operator can produce an unparsable genome
//! - **Emergence**: a single point mutation can create or destroy a START or
//!   STOP and switch whole regions on or off
//! - **No origin bias**: genes may span the end of the vector
//!
//! Length is kept within [`MIN_GENOME_LENGTH`, `MAX_GENOME_LENGTH`] by every
//! constructor and mutation operator.
//!
//! # Example
//!
//! ```
//! use codonsoup::engines::generation::genome::{starter_genome, Genome};
//!
//! let genome = starter_genome();
//! assert_eq!(genome.len(), 105);
//! assert!(Genome::new(vec![0.5; 10]).is_err());
//! ```

use crate::error::{CodonSoupError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

pub const MIN_GENOME_LENGTH: usize = 50;
pub const MAX_GENOME_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Genome(Vec<f64>);

impl Genome {
    /// Validate length and codon range
    pub fn new(codons: Vec<f64>) -> Result<Self> {
        if !(MIN_GENOME_LENGTH..=MAX_GENOME_LENGTH).contains(&codons.len()) {
            return Err(CodonSoupError::Validation(format!(
                "genome length {} outside [{}, {}]",
                codons.len(),
                MIN_GENOME_LENGTH,
                MAX_GENOME_LENGTH
            )));
        }
        if let Some((i, v)) = codons
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > 1.0)
        {
            return Err(CodonSoupError::Validation(format!(
                "codon {} has value {} outside [0, 1]",
                i, v
            )));
        }
        Ok(Self(codons))
    }

    /// Wrap codons whose invariants the caller already upholds
    pub(crate) fn from_trusted(codons: Vec<f64>) -> Self {
        debug_assert!((MIN_GENOME_LENGTH..=MAX_GENOME_LENGTH).contains(&codons.len()));
        Self(codons)
    }

    pub fn codons(&self) -> &[f64] {
        &self.0
    }

}

impl Deref for Genome {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for Genome {
    type Error = CodonSoupError;

    fn try_from(codons: Vec<f64>) -> Result<Self> {
        Self::new(codons)
    }
}

impl From<Genome> for Vec<f64> {
    fn from(genome: Genome) -> Self {
        genome.0
    }
}

/// Minimal viable genome: neutral junk around one short functional gene
pub fn starter_genome() -> Genome {
    let mut codons = vec![0.5; 60];
    codons.extend([0.96, 0.4, 0.4, 0.4, 0.04]);
    codons.extend(std::iter::repeat(0.5).take(40));
    Genome::from_trusted(codons)
}
