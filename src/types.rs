use serde::{Deserialize, Serialize};

/// Phenotype trait a protein acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trait {
    Speed,      // pixels per tick, [0, 3]
    TurnRate,   // radians per tick, [0, 0.5]
    Phototaxis, // -1 photophobic .. +1 photophilic
    Efficiency, // resource conversion, [0, 1]
}

impl Trait {
    pub const ALL: [Trait; 4] = [Trait::Speed, Trait::TurnRate, Trait::Phototaxis, Trait::Efficiency];

    /// Trait selected by a content hash
    pub fn from_hash(hash: u64) -> Self {
        Self::ALL[(hash % 4) as usize]
    }

    pub fn index(self) -> usize {
        match self {
            Trait::Speed => 0,
            Trait::TurnRate => 1,
            Trait::Phototaxis => 2,
            Trait::Efficiency => 3,
        }
    }

    /// Map a summed magnitude onto this trait's declared range.
    ///
    /// The sum is clamped to [-2, 2] first so that stacking many genes on one
    /// trait saturates instead of overflowing the range.
    pub fn express(self, summed_magnitude: f64) -> f64 {
        let s = summed_magnitude.clamp(-RAW_TRAIT_LIMIT, RAW_TRAIT_LIMIT);
        let unit = (s + RAW_TRAIT_LIMIT) / (2.0 * RAW_TRAIT_LIMIT);
        match self {
            Trait::Speed => unit * MAX_SPEED,
            Trait::TurnRate => unit * MAX_TURN_RATE,
            Trait::Phototaxis => s.tanh(),
            Trait::Efficiency => unit,
        }
    }
}

pub const RAW_TRAIT_LIMIT: f64 = 2.0;
pub const MAX_SPEED: f64 = 3.0;
pub const MAX_TURN_RATE: f64 = 0.5;

/// START/STOP codon thresholds used by one extraction pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub start: f64,
    pub stop: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { start: 0.95, stop: 0.05 }
    }
}

/// A START..STOP span over a circular genome.
///
/// `start` and `end` are the indices of the START and STOP codons; `content`
/// holds the codons strictly between them (wrapping past the origin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub start: usize,
    pub end: usize,
    pub content: Vec<f64>,
}

impl Gene {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

/// Interpreted effect of a gene. Derived on demand, never stored in a genome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Protein {
    pub trait_kind: Trait,
    pub magnitude: f64,
    pub is_regulatory: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeVector {
    pub speed: f64,
    pub turn_rate: f64,
    pub phototaxis: f64,
    pub efficiency: f64,
}

impl PhenotypeVector {
    /// Build from per-trait summed magnitudes, indexed by `Trait::index`
    pub fn from_sums(sums: [f64; 4]) -> Self {
        Self {
            speed: Trait::Speed.express(sums[0]),
            turn_rate: Trait::TurnRate.express(sums[1]),
            phototaxis: Trait::Phototaxis.express(sums[2]),
            efficiency: Trait::Efficiency.express(sums[3]),
        }
    }

    pub fn get(&self, trait_kind: Trait) -> f64 {
        match trait_kind {
            Trait::Speed => self.speed,
            Trait::TurnRate => self.turn_rate,
            Trait::Phototaxis => self.phototaxis,
            Trait::Efficiency => self.efficiency,
        }
    }
}

impl Default for PhenotypeVector {
    /// Phenotype of a genome with no expressed genes
    fn default() -> Self {
        Self::from_sums([0.0; 4])
    }
}
