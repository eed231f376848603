pub mod gene_pool;
pub mod service;
pub mod stats;
pub mod storage;
pub mod validator;

pub use gene_pool::{GenePool, GenePoolEntry};
pub use service::{LocalPoolService, PoolService};
pub use stats::{GeneLengthStats, GeneStats, PoolStatus};
pub use storage::{JsonFileStore, PoolStore};
pub use validator::{GenomePayload, SubmissionValidator, ValidSubmission};
