pub mod engine;
pub mod parameter;

pub use engine::RiskEngine;
