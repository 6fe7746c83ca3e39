//! Cross-cutting, shared constants.
//!
//! Thresholds used by the verdict calibrator live here so the gateway, the
//! engine and the tests agree on a single policy.

/// Output dimension of the default sentence embedder (MiniLM-L6).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the sentence embedder.
pub const DEFAULT_EMBEDDER_MAX_SEQ_LEN: usize = 256;

/// Max tokens fed to the NLI cross-encoder (premise + hypothesis).
pub const DEFAULT_NLI_MAX_SEQ_LEN: usize = 512;

/// Most recent records considered by one sync call.
pub const DEFAULT_SYNC_WINDOW: usize = 5000;

/// Entries embedded and committed per index upsert.
pub const DEFAULT_SYNC_CHUNK_SIZE: usize = 500;

/// Logical collection name; the physical name carries the identity scheme version.
pub const DEFAULT_COLLECTION_NAME: &str = "news_facts";

/// Fuzzy ratio strictly above which the lexical override fires.
pub const FUZZY_OVERRIDE_THRESHOLD: f64 = 0.75;

/// Entailment floor applied by the lexical override.
pub const OVERRIDE_ENTAILMENT_FLOOR: f64 = 0.98;

/// Contradiction ceiling applied by the lexical override.
pub const OVERRIDE_CONTRADICTION_CEILING: f64 = 0.02;

/// Probability strictly above which a label decides the verdict.
pub const VERDICT_DECISION_THRESHOLD: f64 = 0.5;

/// Evidence placeholder when retrieval finds nothing.
pub const NO_EVIDENCE: &str = "N/A";

/// Prompt returned for empty or whitespace-only claims.
pub const EMPTY_CLAIM_PROMPT: &str = "Please enter a claim.";
