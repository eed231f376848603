use crate::config::WorldConfig;
use rand::Rng;

/// Square scalar grid with toroidal indexing
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    size: usize,
    cells: Vec<f64>,
}

impl Field {
    pub fn filled(size: usize, value: f64) -> Self {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell containing the continuous point (x, y), wrapped onto the torus
    pub fn cell_of(&self, x: f64, y: f64) -> (usize, usize) {
        let s = self.size as f64;
        let cx = (x.rem_euclid(s).floor() as usize).min(self.size - 1);
        let cy = (y.rem_euclid(s).floor() as usize).min(self.size - 1);
        (cx, cy)
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[(y % self.size) * self.size + (x % self.size)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let idx = (y % self.size) * self.size + (x % self.size);
        self.cells[idx] = value;
    }

    /// Value at a continuous position
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (cx, cy) = self.cell_of(x, y);
        self.get(cx, cy)
    }

    pub fn map_in_place<F: FnMut(f64) -> f64>(&mut self, mut f: F) {
        for v in self.cells.iter_mut() {
            *v = f(*v);
        }
    }

    /// One toroidal smoothing step: mix each cell with its upper then left neighbour
    fn blur_step(&mut self) {
        let n = self.size;
        let prev = self.cells.clone();
        for y in 0..n {
            let up = (y + n - 1) % n;
            for x in 0..n {
                self.cells[y * n + x] = 0.8 * prev[y * n + x] + 0.2 * prev[up * n + x];
            }
        }
        let prev = self.cells.clone();
        for y in 0..n {
            for x in 0..n {
                let left = (x + n - 1) % n;
                self.cells[y * n + x] = 0.8 * prev[y * n + x] + 0.2 * prev[y * n + left];
            }
        }
    }
}

/// Light and nutrient fields of one world
#[derive(Debug, Clone)]
pub struct Environment {
    pub light: Field,
    pub nutrients: Field,
}

impl Environment {
    /// Vertical light gradient (bright at row 0) and a smoothed random nutrient field
    pub fn generate<R: Rng>(config: &WorldConfig, rng: &mut R) -> Self {
        let n = config.size;

        let mut light = Field::filled(n, 0.0);
        for y in 0..n {
            let depth = y as f64 / n as f64;
            let value = config.light_top + (config.light_bottom - config.light_top) * depth;
            for x in 0..n {
                light.set(x, y, value.clamp(0.0, 1.0));
            }
        }

        let mut nutrients = Field::filled(n, 0.0);
        let spread = 1.0 - config.nutrient_floor;
        nutrients.map_in_place(|_| config.nutrient_floor + rng.gen::<f64>() * spread);
        for _ in 0..config.blur_passes {
            nutrients.blur_step();
        }
        nutrients.map_in_place(|v| v.clamp(0.0, 1.0));

        Self { light, nutrients }
    }

    /// Per-tick regeneration: nutrients creep back, light occasionally flickers
    pub fn regenerate<R: Rng>(&mut self, config: &WorldConfig, rng: &mut R) {
        let regen = config.nutrient_regen;
        self.nutrients.map_in_place(|v| (v + regen).min(1.0));

        if rng.gen::<f64>() < config.flicker_probability {
            let amplitude = config.flicker_amplitude;
            self.light
                .map_in_place(|v| (v + rng.gen_range(-1.0..=1.0) * amplitude).clamp(0.0, 1.0));
        }
    }

    /// Remove `amount` of nutrient at a position, never going below zero
    pub fn deplete(&mut self, x: f64, y: f64, amount: f64) {
        let (cx, cy) = self.nutrients.cell_of(x, y);
        let left = (self.nutrients.get(cx, cy) - amount).max(0.0);
        self.nutrients.set(cx, cy, left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_light_gradient_runs_top_to_bottom() {
        let config = WorldConfig::default();
        let env = Environment::generate(&config, &mut StdRng::seed_from_u64(0));
        assert!((env.light.get(0, 0) - 1.0).abs() < 1e-12);
        assert!(env.light.get(5, 119) < env.light.get(5, 60));
        assert!(env.light.get(5, 119) >= config.light_bottom);
    }

    #[test]
    fn test_nutrients_start_within_bounds() {
        let config = WorldConfig::default();
        let env = Environment::generate(&config, &mut StdRng::seed_from_u64(1));
        for y in 0..config.size {
            for x in 0..config.size {
                let v = env.nutrients.get(x, y);
                assert!((config.nutrient_floor..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_cell_of_wraps_negative_coordinates() {
        let field = Field::filled(120, 0.0);
        assert_eq!(field.cell_of(-0.5, 120.5), (119, 0));
    }

    #[test]
    fn test_deplete_floors_at_zero() {
        let config = WorldConfig::default();
        let mut env = Environment::generate(&config, &mut StdRng::seed_from_u64(2));
        env.deplete(10.0, 10.0, 5.0);
        assert_eq!(env.nutrients.sample(10.0, 10.0), 0.0);
    }
}
