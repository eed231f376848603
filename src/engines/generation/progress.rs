use super::evolution_engine::{GenerationReport, ProgressCallback, SeedSource};
use crate::simulation::WorldStats;
use log::{debug, info};

/// Reports progress through the `log` facade, tagged with the client id
pub struct LogProgressCallback {
    client_id: String,
}

impl LogProgressCallback {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
        }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize, source: SeedSource) {
        debug!(
            "[{}] generation {} seeded from {:?}",
            self.client_id,
            generation + 1,
            source
        );
    }

    fn on_ticks_progress(&mut self, generation: usize, stats: &WorldStats) {
        debug!(
            "[{}] gen {} tick {}: pop {}, avg fitness {:.3}, avg energy {:.2}",
            self.client_id,
            generation + 1,
            stats.tick,
            stats.population,
            stats.avg_fitness,
            stats.avg_energy
        );
    }

    fn on_generation_complete(&mut self, report: &GenerationReport) {
        info!(
            "[{}] generation {} complete. Best fitness: {:.4}, population: {}, births: {}, deaths: {}, pending submissions: {}",
            self.client_id,
            report.generation + 1,
            report.best_fitness.unwrap_or(0.0),
            report.stats.population,
            report.births,
            report.deaths,
            report.pending_submissions
        );
    }
}

/// Forwards progress over a channel, e.g. to a thread that aggregates many clients
pub struct ChannelProgressCallback {
    client_id: String,
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone)]
pub enum ProgressMessage {
    GenerationStart { client_id: String, generation: usize, source: SeedSource },
    Ticks { client_id: String, generation: usize, stats: WorldStats },
    GenerationComplete { client_id: String, report: GenerationReport },
}

impl ChannelProgressCallback {
    pub fn new(client_id: impl Into<String>, sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self {
            client_id: client_id.into(),
            sender,
        }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize, source: SeedSource) {
        let _ = self.sender.send(ProgressMessage::GenerationStart {
            client_id: self.client_id.clone(),
            generation,
            source,
        });
    }

    fn on_ticks_progress(&mut self, generation: usize, stats: &WorldStats) {
        let _ = self.sender.send(ProgressMessage::Ticks {
            client_id: self.client_id.clone(),
            generation,
            stats: stats.clone(),
        });
    }

    fn on_generation_complete(&mut self, report: &GenerationReport) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            client_id: self.client_id.clone(),
            report: report.clone(),
        });
    }
}
