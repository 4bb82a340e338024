//! Seeker similarity graph engine
//!
//! Maintains weighted directed edges between seekers with overlapping
//! preferences and serves ranked top-K similarity queries.

pub mod engine;
pub mod models;

pub use engine::SimilarityEngine;
pub use models::{RecomputeOutcome, SimilarSeeker, SimilarityDimension};
