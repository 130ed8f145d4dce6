//! Document embedding.

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Turns a token sequence into a fixed-width numeric vector.
///
/// The rest of the system treats the embedding model as a black box behind
/// this trait; swapping in a learned model only has to honor the signature.
pub trait DocumentEmbedder: Send + Sync {
    /// Width of every vector this embedder produces.
    fn dimension(&self) -> usize;

    /// Embeds a token sequence. Deterministic per embedder instance.
    fn infer_vector(&self, tokens: &[String]) -> Vec<f32>;
}

/// Signed feature hashing: each token hashes to a bucket and a sign, and the
/// accumulated vector is L2-normalized.
///
/// Deterministic, training-free, and dimension-stable, which makes vectors
/// comparable across runs as long as the dimension is unchanged.
#[derive(Clone, Debug)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let mut hasher = FxHasher::default();
        hasher.write(token.as_bytes());
        let hash = hasher.finish();
        let index = ((hash >> 1) % self.dimension as u64) as usize;
        let sign = if hash & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl DocumentEmbedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn infer_vector(&self, tokens: &[String]) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokens {
            let (index, sign) = self.bucket(token);
            vector[index] += sign;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}
