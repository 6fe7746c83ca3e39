use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::hashing::ContentAddress;
use crate::vectordb::{
    IndexEntry, IndexPoint, SearchHit, VectorDbError, VectorIndex,
};

/// In-memory [`VectorIndex`] with failure injection for tests.
#[derive(Default)]
pub struct MockVectorIndex {
    collections: RwLock<HashMap<String, MockCollection>>,
    upsert_calls: AtomicUsize,
    failing_upserts: Mutex<HashSet<usize>>,
    unreachable: AtomicBool,
}

#[derive(Default)]
struct MockCollection {
    vector_size: u64,
    points: BTreeMap<ContentAddress, (Vec<f32>, IndexEntry)>,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.points.len())
    }

    /// Stored entry for `id`, if any.
    pub fn entry(&self, collection: &str, id: &ContentAddress) -> Option<IndexEntry> {
        self.collections
            .read()
            .get(collection)?
            .points
            .get(id)
            .map(|(_, entry)| entry.clone())
    }

    /// Makes the upsert call with zero-based index `call` fail.
    pub fn fail_upsert_call(&self, call: usize) {
        self.failing_upserts.lock().insert(call);
    }

    /// Number of upsert calls seen so far.
    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Simulates the backend going away (or coming back).
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), VectorDbError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(VectorDbError::ConnectionFailed {
                url: "mock://".to_string(),
                message: "backend unreachable".to_string(),
            });
        }
        Ok(())
    }
}

impl VectorIndex for MockVectorIndex {
    async fn is_ready(&self) -> bool {
        self.check_reachable().is_ok()
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.check_reachable()?;
        self.collections
            .write()
            .entry(name.to_string())
            .or_insert_with(|| MockCollection {
                vector_size,
                points: BTreeMap::new(),
            });
        Ok(())
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<IndexPoint>,
    ) -> Result<(), VectorDbError> {
        let call = self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;

        if self.failing_upserts.lock().contains(&call) {
            return Err(VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: format!("injected failure on call {}", call),
            });
        }

        let mut collections = self.collections.write();
        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        // Validate the whole batch first so a bad point leaves nothing behind.
        if let Some(bad) = points
            .iter()
            .find(|p| p.vector.len() as u64 != coll.vector_size)
        {
            return Err(VectorDbError::InvalidDimension {
                expected: coll.vector_size as usize,
                actual: bad.vector.len(),
            });
        }

        for point in points {
            coll.points
                .insert(point.entry.id, (point.vector, point.entry));
        }

        Ok(())
    }

    async fn list_ids(&self, collection: &str) -> Result<HashSet<ContentAddress>, VectorDbError> {
        self.check_reachable()?;
        let collections = self.collections.read();
        let coll = collections
            .get(collection)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })?;
        Ok(coll.points.keys().copied().collect())
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        self.check_reachable()?;
        self.point_count(collection)
            .map(|n| n as u64)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        self.check_reachable()?;
        let collections = self.collections.read();
        let coll = collections
            .get(collection)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        let mut hits: Vec<SearchHit> = coll
            .points
            .values()
            .map(|(vector, entry)| SearchHit {
                entry: entry.clone(),
                score: cosine_similarity(&query, vector),
            })
            .collect();

        // Stable sort over BTreeMap order keeps ties deterministic.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit as usize);
        Ok(hits)
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
