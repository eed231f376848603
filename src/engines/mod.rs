pub mod expression;
pub mod generation;
