use super::environment::Environment;
use super::organism::Organism;
use crate::config::WorldConfig;
use crate::engines::expression::ExpressionEngine;
use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::MutationEngine;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Population summary at the current tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldStats {
    pub tick: u64,
    pub population: usize,
    pub avg_fitness: f64,
    pub max_fitness: f64,
    pub avg_energy: f64,
    pub avg_genome_length: f64,
    pub avg_active_genes: f64,
}

/// Events of a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub births: usize,
    pub deaths: usize,
}

/// The petri dish: environment fields plus the organisms living in them.
///
/// Single-threaded and deterministic for a given seed. A tick runs every
/// organism to completion before the next tick starts; dead organisms are
/// compacted out after the full pass and newborns join at the end of it.
pub struct World {
    config: WorldConfig,
    env: Environment,
    organisms: Vec<Organism>,
    tick: u64,
    next_id: u64,
    rng: StdRng,
    mutation: MutationEngine,
    expression: ExpressionEngine,
}

impl World {
    pub fn new(config: WorldConfig, mutation: MutationEngine, expression: ExpressionEngine, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let env = Environment::generate(&config, &mut rng);
        Self {
            config,
            env,
            organisms: Vec::new(),
            tick: 0,
            next_id: 0,
            rng,
            mutation,
            expression,
        }
    }

    /// Place `count` organisms carrying `genome` at random positions
    pub fn seed_population(&mut self, genome: &Genome, count: usize) {
        let size = self.config.size as f64;
        for _ in 0..count {
            let x = self.rng.gen::<f64>() * size;
            let y = self.rng.gen::<f64>() * size;
            self.spawn(genome.clone(), x, y);
        }
    }

    /// Add one organism with the configured starting energy
    pub fn spawn(&mut self, genome: Genome, x: f64, y: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let mut organism = Organism::new(id, genome, x, y, self.config.initial_energy, &self.expression);
        organism.heading = self.rng.gen::<f64>() * std::f64::consts::TAU;
        self.organisms.push(organism);
        id
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) -> TickReport {
        let mut newborns: Vec<Organism> = Vec::new();
        let resident = self.organisms.len();

        for organism in self.organisms.iter_mut() {
            organism.move_step(&self.env.light, &self.config, &mut self.rng);
            organism.metabolize(&mut self.env, &self.config);

            if !organism.is_alive() {
                continue;
            }
            if resident + newborns.len() >= self.config.max_population {
                continue;
            }

            if let Some((child, report)) = organism.reproduce(
                self.next_id,
                &self.config,
                &self.mutation,
                &self.expression,
                &mut self.rng,
            ) {
                self.next_id += 1;
                self.env.deplete(organism.x, organism.y, self.config.reproduction_depletion);
                debug!(
                    "organism {} reproduced -> {} (point {}, ins {}, del {}, dup {}, skipped {})",
                    organism.id, child.id, report.point, report.inserted, report.deleted,
                    report.duplicated, report.skipped
                );
                newborns.push(child);
            }
        }

        let before = self.organisms.len();
        self.organisms.retain(Organism::is_alive);
        let deaths = before - self.organisms.len();

        let births = newborns.len();
        self.organisms.extend(newborns);

        self.env.regenerate(&self.config, &mut self.rng);
        self.tick += 1;

        TickReport { births, deaths }
    }

    /// Run `ticks` steps
    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.step();
        }
    }

    pub fn organisms(&self) -> &[Organism] {
        &self.organisms
    }

    pub fn population(&self) -> usize {
        self.organisms.len()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Organism with the highest lifetime fitness
    pub fn fittest(&self) -> Option<&Organism> {
        self.organisms
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    pub fn stats(&self) -> WorldStats {
        let n = self.organisms.len();
        if n == 0 {
            return WorldStats {
                tick: self.tick,
                ..WorldStats::default()
            };
        }

        let organisms = &self.organisms;
        WorldStats {
            tick: self.tick,
            population: n,
            avg_fitness: mean_of(organisms, |o| o.fitness),
            max_fitness: self.fittest().map(|o| o.fitness).unwrap_or(0.0),
            avg_energy: mean_of(organisms, |o| o.energy),
            avg_genome_length: mean_of(organisms, |o| o.genome.len() as f64),
            avg_active_genes: mean_of(organisms, |o| o.active_gene_count as f64),
        }
    }
}

fn mean_of<F: Fn(&Organism) -> f64>(organisms: &[Organism], f: F) -> f64 {
    organisms.iter().map(f).sum::<f64>() / organisms.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::starter_genome;

    fn world(config: WorldConfig, seed: u64) -> World {
        World::new(config, MutationEngine::default(), ExpressionEngine::default(), seed)
    }

    #[test]
    fn test_seeded_worlds_are_deterministic() {
        let mut a = world(WorldConfig::default(), 42);
        let mut b = world(WorldConfig::default(), 42);
        a.seed_population(&starter_genome(), 30);
        b.seed_population(&starter_genome(), 30);
        a.run(50);
        b.run(50);
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_starving_population_is_removed() {
        let config = WorldConfig {
            basal_cost: 100.0,
            ..WorldConfig::default()
        };
        let mut w = world(config, 1);
        w.seed_population(&starter_genome(), 10);
        let report = w.step();
        assert_eq!(report.deaths, 10);
        assert_eq!(w.population(), 0);
        assert_eq!(w.tick(), 1);
        assert!(w.fittest().is_none());
        assert_eq!(w.stats().population, 0);
    }

    #[test]
    fn test_population_cap_limits_births() {
        let config = WorldConfig {
            initial_energy: 1000.0,
            max_population: 12,
            ..WorldConfig::default()
        };
        let mut w = world(config, 2);
        w.seed_population(&starter_genome(), 10);
        for _ in 0..5 {
            w.step();
            assert!(w.population() <= 12);
        }
        assert_eq!(w.population(), 12);
    }

    #[test]
    fn test_energy_never_negative() {
        let mut w = world(WorldConfig::default(), 3);
        w.seed_population(&starter_genome(), 30);
        for _ in 0..200 {
            w.step();
            assert!(w.organisms().iter().all(|o| o.energy > 0.0));
        }
    }
}
