pub mod codec;
pub mod interpreter;
pub mod engine;

pub use codec::{extract_genes, extract_genes_with, MAX_GENE_LENGTH, MIN_GENE_LENGTH};
pub use interpreter::{interpret_codons, interpret_gene, stable_hash};
pub use engine::{ExpressedGene, Expression, ExpressionEngine};
