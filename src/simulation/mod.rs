pub mod environment;
pub mod organism;
pub mod world;

pub use environment::{Environment, Field};
pub use organism::Organism;
pub use world::{TickReport, World, WorldStats};
