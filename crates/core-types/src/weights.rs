use crate::table::AssetId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-asset portfolio weights for one period.
///
/// Assets absent from the map carry an implicit weight of zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    weights: BTreeMap<AssetId, f64>,
}

impl WeightVector {
    pub fn new(weights: BTreeMap<AssetId, f64>) -> Self {
        Self { weights }
    }

    /// An explicit all-zero vector over the given assets.
    pub fn zeros(assets: &[AssetId]) -> Self {
        Self {
            weights: assets.iter().map(|a| (a.clone(), 0.0)).collect(),
        }
    }

    /// `1/N` on each of the given assets.
    pub fn equal(assets: &[AssetId]) -> Self {
        if assets.is_empty() {
            return Self::default();
        }
        let w = 1.0 / assets.len() as f64;
        Self {
            weights: assets.iter().map(|a| (a.clone(), w)).collect(),
        }
    }

    /// The weight of `asset`, zero when it is outside the vector.
    pub fn get(&self, asset: &str) -> f64 {
        self.weights.get(asset).copied().unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// True when no asset carries a non-zero weight.
    pub fn is_zero(&self) -> bool {
        self.weights.values().all(|w| *w == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &f64)> {
        self.weights.iter()
    }

    /// Assets with a non-zero weight.
    pub fn support(&self) -> impl Iterator<Item = &AssetId> {
        self.weights.iter().filter(|(_, w)| **w != 0.0).map(|(a, _)| a)
    }

    /// Every weight multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            weights: self.weights.iter().map(|(a, w)| (a.clone(), w * factor)).collect(),
        }
    }
}

impl FromIterator<(AssetId, f64)> for WeightVector {
    fn from_iter<T: IntoIterator<Item = (AssetId, f64)>>(iter: T) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}
