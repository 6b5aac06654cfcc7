//! Static evaluation
//!
//! All scores are from `Side::First`'s point of view: positive values
//! favour the first player. Each game's [`Rules::evaluate`](crate::rules::Rules::evaluate)
//! sums the per-piece terms defined here.

pub mod heuristic;
pub mod patterns;

pub use patterns::PatternScore;
