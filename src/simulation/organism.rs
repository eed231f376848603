use super::environment::{Environment, Field};
use crate::config::WorldConfig;
use crate::engines::expression::{Expression, ExpressionEngine};
use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::{MutationEngine, MutationReport};
use crate::types::{PhenotypeVector, Thresholds};
use rand::Rng;
use std::f64::consts::{PI, TAU};

/// Phototaxis below this magnitude is treated as indifference to light
const PHOTOTAXIS_DEADBAND: f64 = 0.2;

/// A simulated bacterium. Owned by exactly one `World`.
#[derive(Debug, Clone)]
pub struct Organism {
    pub id: u64,
    pub genome: Genome,
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub energy: f64,
    /// Cumulative energy harvested over the organism's lifetime
    pub fitness: f64,
    pub age: u64,
    pub phenotype: PhenotypeVector,
    pub active_gene_count: usize,
    pub expression_thresholds: Thresholds,
}

impl Organism {
    /// Create an organism and express its genome
    pub fn new(id: u64, genome: Genome, x: f64, y: f64, energy: f64, expression: &ExpressionEngine) -> Self {
        let expressed = expression.express(&genome);
        let mut organism = Self {
            id,
            genome,
            x,
            y,
            heading: 0.0,
            energy: energy.max(0.0),
            fitness: 0.0,
            age: 0,
            phenotype: PhenotypeVector::default(),
            active_gene_count: 0,
            expression_thresholds: Thresholds::default(),
        };
        organism.apply_expression(&expressed);
        organism
    }

    pub fn apply_expression(&mut self, expression: &Expression) {
        self.phenotype = expression.phenotype;
        self.active_gene_count = expression.active_gene_count();
        self.expression_thresholds = expression.thresholds;
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// Steer by phototaxis, advance by speed, wrap around the torus.
    ///
    /// The organism samples the light at `sense_distance` in a random direction.
    /// With probability |phototaxis| it takes that direction when the sample is
    /// brighter (phototaxis > 0) or darker (phototaxis < 0) than where it
    /// stands; otherwise it random-walks its heading by up to ±π·turn_rate.
    pub fn move_step<R: Rng>(&mut self, light: &Field, config: &WorldConfig, rng: &mut R) {
        let PhenotypeVector { speed, turn_rate, phototaxis, .. } = self.phenotype;

        let light_here = light.sample(self.x, self.y);
        let direction = rng.gen::<f64>() * TAU;
        let light_ahead = light.sample(
            self.x + direction.cos() * config.sense_distance,
            self.y + direction.sin() * config.sense_distance,
        );

        let attracted = phototaxis > PHOTOTAXIS_DEADBAND && light_ahead > light_here;
        let repelled = phototaxis < -PHOTOTAXIS_DEADBAND && light_ahead < light_here;

        if (attracted || repelled) && rng.gen::<f64>() < phototaxis.abs() {
            self.heading = direction;
        } else {
            self.heading += (rng.gen::<f64>() - 0.5) * 2.0 * PI * turn_rate;
        }
        self.heading = self.heading.rem_euclid(TAU);

        let size = light.size() as f64;
        self.x = wrap(self.x + self.heading.cos() * speed, size);
        self.y = wrap(self.y + self.heading.sin() * speed, size);
    }

    /// Harvest light and nutrients at the current cell and pay upkeep.
    /// Returns the energy harvested; energy never drops below zero.
    pub fn metabolize(&mut self, env: &mut Environment, config: &WorldConfig) -> f64 {
        let light = env.light.sample(self.x, self.y);
        let nutrient = env.nutrients.sample(self.x, self.y);

        let gain = light * self.phenotype.efficiency * nutrient * config.gain_scale;
        let cost = config.basal_cost + self.phenotype.speed * config.movement_cost;

        env.deplete(self.x, self.y, gain * config.harvest_depletion);

        self.energy = (self.energy + gain - cost).max(0.0);
        self.fitness += gain;
        self.age += 1;
        gain
    }

    /// Asexual reproduction once energy exceeds the threshold.
    ///
    /// The parent's energy is split evenly with the child, whose genome is a
    /// mutated copy of the parent's and whose phenotype is expressed afresh.
    pub fn reproduce<R: Rng>(
        &mut self,
        child_id: u64,
        config: &WorldConfig,
        mutation: &MutationEngine,
        expression: &ExpressionEngine,
        rng: &mut R,
    ) -> Option<(Organism, MutationReport)> {
        if self.energy <= config.reproduction_threshold {
            return None;
        }

        let (child_genome, report) = mutation.mutate(&self.genome, rng);

        self.energy /= 2.0;
        let child_energy = self.energy;

        let size = config.size as f64;
        let spread = config.offspring_spread;
        let cx = wrap(self.x + rng.gen_range(-1.0..=1.0) * spread, size);
        let cy = wrap(self.y + rng.gen_range(-1.0..=1.0) * spread, size);

        let mut child = Organism::new(child_id, child_genome, cx, cy, child_energy, expression);
        child.heading = rng.gen::<f64>() * TAU;
        Some((child, report))
    }
}

/// Toroidal wrap into [0, size)
fn wrap(v: f64, size: f64) -> f64 {
    let w = v.rem_euclid(size);
    // rem_euclid rounds tiny negatives up to exactly `size`
    if w >= size {
        0.0
    } else {
        w
    }
}
