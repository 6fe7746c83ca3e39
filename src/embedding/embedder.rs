use std::fmt::Debug;

use super::error::EmbeddingError;

/// Text -> vector capability shared by ingest and query paths.
///
/// The index is only meaningful while the same implementation (and model
/// weights) embed both documents and claims.
pub trait Embedder: Send + Sync + Debug {
    /// Embeds one text into a unit-length vector of [`dimension`](Embedder::dimension) floats.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds many texts. Output order matches input order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn dimension(&self) -> usize;

    /// Short name for logs and readiness checks.
    fn mode(&self) -> &'static str;
}

/// Scales `vector` to unit length in place (zero vectors are left as-is).
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
