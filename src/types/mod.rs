pub mod config;
pub mod risk;
