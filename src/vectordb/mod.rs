//! Vector store integration.
//!
//! [`VectorIndex`] is the seam between the semantic index and a concrete
//! store. [`QdrantIndex`] talks to Qdrant; [`MockVectorIndex`] keeps
//! everything in memory for tests.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantIndex, SCROLL_PAGE_SIZE, VectorIndex};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorIndex, cosine_similarity};
pub use model::{EntryMetadata, IndexEntry, IndexPoint, SearchHit};
