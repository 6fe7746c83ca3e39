//! Verdict calibration: lexical override, then verdict selection.

pub mod calibrator;
pub mod lexical;
pub mod override_rule;
pub mod types;


pub use calibrator::VerdictCalibrator;
pub use lexical::{is_literal_match, sequence_ratio};
pub use override_rule::LexicalOverride;
pub use types::{
    INSUFFICIENT_RATIONALE, LexicalSignals, NO_MATCH_RATIONALE, Verdict, VerificationResult,
};
