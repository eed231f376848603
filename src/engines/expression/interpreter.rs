use crate::types::{Gene, Protein, Trait};
use sha2::{Digest, Sha256};

/// Fixed-point scale used to canonicalise codons before hashing
pub const HASH_PRECISION: f64 = 1_000_000.0;

pub const REGULATORY_LOW: f64 = 0.1;
pub const REGULATORY_HIGH: f64 = 0.9;

/// Content hash of a codon sequence, reproducible across runs and platforms.
///
/// Each codon is quantised to `round(v * 1e6)` as a little-endian `u32`, the
/// bytes are fed through SHA-256, and the first 8 digest bytes are read as a
/// little-endian `u64`.
pub fn stable_hash(codons: &[f64]) -> u64 {
    let mut hasher = Sha256::new();
    for &codon in codons {
        let quantised = (codon.clamp(0.0, 1.0) * HASH_PRECISION).round() as u32;
        hasher.update(quantised.to_le_bytes());
    }
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

/// Translate a gene into the protein it encodes. Pure in the gene content.
pub fn interpret_gene(gene: &Gene) -> Protein {
    interpret_codons(&gene.content)
}

pub fn interpret_codons(content: &[f64]) -> Protein {
    let trait_kind = Trait::from_hash(stable_hash(content));

    let mean = if content.is_empty() {
        0.5
    } else {
        content.iter().sum::<f64>() / content.len() as f64
    };
    let magnitude = (mean * 2.0 - 1.0).clamp(-1.0, 1.0);

    let is_regulatory = content
        .iter()
        .any(|&v| v < REGULATORY_LOW || v > REGULATORY_HIGH);

    Protein {
        trait_kind,
        magnitude,
        is_regulatory,
    }
}
