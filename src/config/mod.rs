pub mod traits;
pub mod evolution;
pub mod world;
pub mod mutation;
pub mod expression;
pub mod pool;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use evolution::EvolutionConfig;
pub use world::WorldConfig;
pub use mutation::MutationConfig;
pub use expression::ExpressionConfig;
pub use pool::{PoolConfig, SelectionPolicy};
pub use traits::ConfigSection;
