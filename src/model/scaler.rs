//! Per-dimension min-max scaling of feature vectors.

use serde::{Deserialize, Serialize};

use crate::types::RecError;

/// Rescales each vector dimension into `[0, 1]` using the bounds observed at
/// fit time. Constant dimensions map to 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MinMaxScaler {
    mins: Vec<f32>,
    maxs: Vec<f32>,
}

impl MinMaxScaler {
    /// Learns bounds from a non-empty set of equal-width vectors.
    pub fn fit(vectors: &[Vec<f32>]) -> Result<Self, RecError> {
        let Some(first) = vectors.first() else {
            return Err(RecError::Model("cannot fit a scaler on zero vectors".into()));
        };
        let width = first.len();
        let mut mins = vec![f32::INFINITY; width];
        let mut maxs = vec![f32::NEG_INFINITY; width];
        for vector in vectors {
            if vector.len() != width {
                return Err(RecError::Model(format!(
                    "inconsistent vector widths: {} and {}",
                    width,
                    vector.len()
                )));
            }
            for (dim, &value) in vector.iter().enumerate() {
                mins[dim] = mins[dim].min(value);
                maxs[dim] = maxs[dim].max(value);
            }
        }
        Ok(Self { mins, maxs })
    }

    /// Scales one vector with the fitted bounds. Values outside the observed
    /// range extrapolate beyond `[0, 1]`, matching fit-then-transform
    /// semantics on unseen data.
    pub fn transform(&self, vector: &[f32]) -> Vec<f32> {
        vector
            .iter()
            .enumerate()
            .map(|(dim, &value)| {
                let range = self.maxs[dim] - self.mins[dim];
                if range == 0.0 {
                    0.0
                } else {
                    (value - self.mins[dim]) / range
                }
            })
            .collect()
    }

    /// Fits on `vectors` and returns the scaler plus the scaled set.
    pub fn fit_transform(vectors: &[Vec<f32>]) -> Result<(Self, Vec<Vec<f32>>), RecError> {
        let scaler = Self::fit(vectors)?;
        let scaled = vectors.iter().map(|v| scaler.transform(v)).collect();
        Ok((scaler, scaled))
    }
}
