pub mod genome;
pub mod operators;
pub mod evolution_engine;
pub mod progress;

pub use genome::{starter_genome, Genome};
pub use operators::{MutationEngine, MutationReport};
pub use evolution_engine::{EvolutionEngine, GenerationReport, ProgressCallback, RunSummary, SeedSource};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressMessage};
