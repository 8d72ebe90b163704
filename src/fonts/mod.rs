pub mod cache;
pub mod generator;
pub mod ranges;
