//! Entailment scoring.
//!
//! Wraps the NLI cross-encoder and turns its three logits into a
//! probability distribution with a stable softmax.

pub mod error;
pub mod scorer;
pub mod types;


pub use error::ScoringError;
pub use scorer::{EntailmentScorer, softmax};
pub use types::{EntailmentDistribution, NliLabel};
