//! Search module for the engine opponent
//!
//! Contains:
//! - Generic minimax with alpha-beta pruning
//! - Capture-value move ordering

pub mod alphabeta;
pub mod ordering;

pub use alphabeta::{terminal_score, SearchResult, SearchStats, Searcher, WIN_SCORE};
pub use ordering::order_by_capture;
