//! K-means clustering over document vectors.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::RecError;

/// Fit parameters. The seed makes training reproducible.
#[derive(Clone, Debug)]
pub struct KMeansConfig {
    pub clusters: usize,
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            clusters: 30,
            max_iterations: 100,
            seed: 3,
        }
    }
}

/// A fitted k-means model: just its centroids.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KMeans {
    centroids: Vec<Vec<f32>>,
}

impl KMeans {
    /// Fits with k-means++ seeding followed by Lloyd iterations.
    ///
    /// The effective cluster count is capped at the number of vectors.
    /// Returns the model together with each input vector's label.
    pub fn fit(vectors: &[Vec<f32>], config: &KMeansConfig) -> Result<(Self, Vec<u32>), RecError> {
        if vectors.is_empty() {
            return Err(RecError::Model("cannot fit k-means on zero vectors".into()));
        }
        if config.clusters == 0 {
            return Err(RecError::Model("cluster count must be positive".into()));
        }
        let k = config.clusters.min(vectors.len());
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut centroids = seed_centroids(vectors, k, &mut rng);

        let mut labels = vec![0u32; vectors.len()];
        for _ in 0..config.max_iterations {
            let mut changed = false;
            for (i, vector) in vectors.iter().enumerate() {
                let label = nearest(&centroids, vector) as u32;
                if labels[i] != label {
                    labels[i] = label;
                    changed = true;
                }
            }

            let mut sums = vec![vec![0.0f32; vectors[0].len()]; k];
            let mut counts = vec![0usize; k];
            for (vector, &label) in vectors.iter().zip(&labels) {
                counts[label as usize] += 1;
                for (dim, value) in vector.iter().enumerate() {
                    sums[label as usize][dim] += value;
                }
            }
            for (cluster, sum) in sums.into_iter().enumerate() {
                // Empty clusters keep their previous centroid.
                if counts[cluster] > 0 {
                    centroids[cluster] = sum
                        .into_iter()
                        .map(|value| value / counts[cluster] as f32)
                        .collect();
                }
            }

            if !changed {
                break;
            }
        }

        // Labels must reflect the final centroids even when the loop stopped
        // on the iteration cap.
        for (i, vector) in vectors.iter().enumerate() {
            labels[i] = nearest(&centroids, vector) as u32;
        }

        Ok((Self { centroids }, labels))
    }

    /// Label of the centroid nearest to `vector`.
    pub fn predict(&self, vector: &[f32]) -> u32 {
        nearest(&self.centroids, vector) as u32
    }

    pub fn clusters(&self) -> usize {
        self.centroids.len()
    }

    pub fn centroids(&self) -> &[Vec<f32>] {
        &self.centroids
    }
}

/// k-means++: the first centroid is uniform, each later one is drawn with
/// probability proportional to squared distance from the chosen set.
fn seed_centroids(vectors: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(vectors[rng.random_range(0..vectors.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f32> = vectors
            .iter()
            .map(|vector| {
                centroids
                    .iter()
                    .map(|centroid| squared_distance(vector, centroid))
                    .fold(f32::INFINITY, f32::min)
            })
            .collect();
        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            // All remaining vectors coincide with a centroid; duplicate one.
            centroids.push(vectors[rng.random_range(0..vectors.len())].clone());
            continue;
        }
        let mut target = rng.random::<f32>() * total;
        let mut chosen = vectors.len() - 1;
        for (i, weight) in weights.iter().enumerate() {
            target -= weight;
            if target <= 0.0 {
                chosen = i;
                break;
            }
        }
        centroids.push(vectors[chosen].clone());
    }
    centroids
}

fn nearest(centroids: &[Vec<f32>], vector: &[f32]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(vector, centroid);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

pub(crate) fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
