use crate::config::AppConfig;
use crate::engines::expression::ExpressionEngine;
use crate::engines::generation::{
    genome::{starter_genome, Genome},
    operators::MutationEngine,
};
use crate::error::{Result, SyncError};
use crate::pool::{GenomePayload, PoolService};
use crate::simulation::{World, WorldStats};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Where the founders of a generation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    Immigrant,
    /// Fittest organism of this client's previous generation
    Champion,
    Starter,
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub generation: usize,
    pub source: SeedSource,
    pub stats: WorldStats,
    pub births: usize,
    pub deaths: usize,
    /// Lifetime fitness of the fittest survivor, if any survived
    pub best_fitness: Option<f64>,
    pub submitted: usize,
    pub dropped: usize,
    pub pending_submissions: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub generations: usize,
    pub best_fitness: f64,
    pub best_genome: Option<Genome>,
    pub submitted: usize,
    pub dropped: usize,
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize, source: SeedSource);
    fn on_ticks_progress(&mut self, generation: usize, stats: &WorldStats);
    fn on_generation_complete(&mut self, report: &GenerationReport);
}

/// One client's generation loop.
///
/// Each generation pulls an immigrant from the pool (falling back to the
/// local champion, then the starter genome), grows a fresh world from it for
/// a fixed tick budget and pushes the fittest survivor back. Pool failures
/// never abort the loop: unreachable pools leave submissions queued for the
/// next generation boundary, rejected submissions are dropped.
pub struct EvolutionEngine {
    config: AppConfig,
    client_id: String,
    service: Option<Arc<dyn PoolService>>,
    mutation: MutationEngine,
    expression: ExpressionEngine,
    base_seed: u64,
    rng: StdRng,
    generation: usize,
    champion: Option<(Genome, f64)>,
    pending: VecDeque<GenomePayload>,
}

impl EvolutionEngine {
    pub fn new(config: AppConfig, client_id: impl Into<String>) -> Result<Self> {
        config.validate()?;

        let base_seed = match config.evolution.seed {
            Some(seed) => seed,
            None => rand::thread_rng().gen(),
        };

        Ok(Self {
            mutation: MutationEngine::new(config.mutation.clone()),
            expression: ExpressionEngine::new(config.expression.clone()),
            client_id: client_id.into(),
            service: None,
            rng: StdRng::seed_from_u64(base_seed ^ 0x5eed_5eed),
            base_seed,
            generation: 0,
            champion: None,
            pending: VecDeque::new(),
            config,
        })
    }

    /// Attach a gene pool; without one the engine runs offline
    pub fn with_service(mut self, service: Arc<dyn PoolService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn is_offline(&self) -> bool {
        self.service.is_none()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn champion(&self) -> Option<&(Genome, f64)> {
        self.champion.as_ref()
    }

    pub fn pending_submissions(&self) -> usize {
        self.pending.len()
    }

    /// Run the configured number of generations
    pub fn run<C: ProgressCallback>(&mut self, callback: &mut C) -> RunSummary {
        let mut summary = RunSummary::default();

        let generations = self.config.evolution.generations;
        for g in 0..generations {
            let report = self.run_generation(callback);

            summary.generations += 1;
            summary.submitted += report.submitted;
            summary.dropped += report.dropped;
            if let Some(best) = report.best_fitness {
                if summary.best_genome.is_none() || best > summary.best_fitness {
                    summary.best_fitness = best;
                    summary.best_genome = self.champion.as_ref().map(|(genome, _)| genome.clone());
                }
            }

            if g + 1 < generations {
                self.pause_between_generations();
            }
        }

        summary
    }

    /// Run one generation to completion
    pub fn run_generation<C: ProgressCallback>(&mut self, callback: &mut C) -> GenerationReport {
        let generation = self.generation;
        let (founder, source) = self.choose_founder();
        callback.on_generation_start(generation, source);

        let mut world = World::new(
            self.config.world.clone(),
            self.mutation.clone(),
            self.expression.clone(),
            self.base_seed.wrapping_add(generation as u64),
        );
        world.seed_population(&founder, self.config.evolution.population_size);

        let interval = self.config.evolution.progress_interval;
        let (mut births, mut deaths) = (0, 0);
        for t in 1..=self.config.evolution.ticks_per_generation {
            let tick = world.step();
            births += tick.births;
            deaths += tick.deaths;

            if interval > 0 && t % interval == 0 {
                callback.on_ticks_progress(generation, &world.stats());
            }
            if world.population() == 0 {
                debug!("[{}] population extinct at tick {}", self.client_id, t);
                break;
            }
        }

        let best = world.fittest().map(|o| (o.genome.clone(), o.fitness));
        let best_fitness = best.as_ref().map(|(_, f)| *f);

        if let Some((genome, fitness)) = best {
            if !self.is_offline() {
                self.enqueue(GenomePayload::new(&genome, fitness, self.client_id.clone()));
            }
            self.champion = Some((genome, fitness));
        }
        let (submitted, dropped) = self.flush_pending();

        let report = GenerationReport {
            generation,
            source,
            stats: world.stats(),
            births,
            deaths,
            best_fitness,
            submitted,
            dropped,
            pending_submissions: self.pending.len(),
        };
        callback.on_generation_complete(&report);

        self.generation += 1;
        report
    }

    fn choose_founder(&self) -> (Genome, SeedSource) {
        if let Some(service) = &self.service {
            match service.fetch_immigrant() {
                Ok(Some(genome)) => return (genome, SeedSource::Immigrant),
                Ok(None) => debug!("[{}] gene pool is empty", self.client_id),
                Err(e) => warn!("[{}] could not fetch immigrant: {}", self.client_id, e),
            }
        }

        match &self.champion {
            Some((genome, _)) => (genome.clone(), SeedSource::Champion),
            None => (starter_genome(), SeedSource::Starter),
        }
    }

    fn enqueue(&mut self, payload: GenomePayload) {
        self.pending.push_back(payload);
        while self.pending.len() > self.config.evolution.max_pending_submissions.max(1) {
            if let Some(stale) = self.pending.pop_front() {
                warn!(
                    "[{}] retry queue full, discarding submission with fitness {:.3}",
                    self.client_id, stale.fitness
                );
            }
        }
    }

    /// Submit queued genomes oldest first. Stops at the first unavailable
    /// error and keeps the rest queued.
    fn flush_pending(&mut self) -> (usize, usize) {
        let Some(service) = self.service.clone() else {
            return (0, 0);
        };

        let (mut submitted, mut dropped) = (0, 0);
        while let Some(payload) = self.pending.front() {
            match service.submit(payload) {
                Ok(()) => {
                    submitted += 1;
                    self.pending.pop_front();
                }
                Err(SyncError::Rejected(reason)) => {
                    warn!("[{}] submission rejected: {}", self.client_id, reason);
                    dropped += 1;
                    self.pending.pop_front();
                }
                Err(e @ SyncError::Unavailable(_)) => {
                    warn!(
                        "[{}] {}; {} submission(s) kept for retry",
                        self.client_id,
                        e,
                        self.pending.len()
                    );
                    break;
                }
            }
        }
        (submitted, dropped)
    }

    fn pause_between_generations(&mut self) {
        let (min, max) = (
            self.config.evolution.min_delay_secs,
            self.config.evolution.max_delay_secs,
        );
        if max == 0 {
            return;
        }
        let secs = self.rng.gen_range(min..=max);
        info!("[{}] sleeping {}s before next generation", self.client_id, secs);
        std::thread::sleep(Duration::from_secs(secs));
    }
}
