use super::gene_pool::GenePool;
use super::stats::{GeneStats, PoolStatus};
use super::validator::{GenomePayload, SubmissionValidator};
use crate::engines::generation::genome::Genome;
use crate::error::SyncError;
use log::debug;
use std::sync::Arc;

/// The four operations a client needs from the gene pool.
///
/// Implementations may sit behind any transport. Every failure is a
/// `SyncError`; callers treat all of them as non-fatal.
pub trait PoolService: Send + Sync {
    /// A fit genome to seed the next generation with, or `None` if the pool is empty
    fn fetch_immigrant(&self) -> Result<Option<Genome>, SyncError>;

    fn submit(&self, payload: &GenomePayload) -> Result<(), SyncError>;

    fn gene_stats(&self) -> Result<GeneStats, SyncError>;

    fn pool_status(&self) -> Result<PoolStatus, SyncError>;
}

/// In-process service over a shared `GenePool`
#[derive(Clone)]
pub struct LocalPoolService {
    pool: Arc<GenePool>,
}

impl LocalPoolService {
    pub fn new(pool: Arc<GenePool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<GenePool> {
        &self.pool
    }
}

impl PoolService for LocalPoolService {
    fn fetch_immigrant(&self) -> Result<Option<Genome>, SyncError> {
        Ok(self.pool.select_immigrant(&mut rand::thread_rng()))
    }

    fn submit(&self, payload: &GenomePayload) -> Result<(), SyncError> {
        let submission = SubmissionValidator::validate(payload)?;
        debug!(
            "accepted genome from {} (len {}, fitness {:.3})",
            submission.client_id,
            submission.genome.len(),
            submission.fitness
        );
        self.pool
            .insert(submission.genome, submission.fitness, submission.client_id);
        Ok(())
    }

    fn gene_stats(&self) -> Result<GeneStats, SyncError> {
        Ok(self.pool.gene_stats())
    }

    fn pool_status(&self) -> Result<PoolStatus, SyncError> {
        Ok(self.pool.pool_status())
    }
}
