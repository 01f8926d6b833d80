//! Prediction oracle — the diabetes classifier behind the "да" answer.
//!
//! The dialog engine only sees the [`PredictionOracle`] trait. The bundled
//! [`LogisticOracle`] reads a model snapshot (standard scaler plus a logistic
//! regression over glucose, BMI and age) from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::state::SessionRecord;
use crate::error::PredictionError;

/// Number of model inputs: glucose, BMI, age.
pub const FEATURE_COUNT: usize = 3;

const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["glucose", "bmi", "age"];

/// Model inputs in the fixed order the classifier was trained on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PredictionFeatures {
    pub glucose: Option<f64>,
    pub bmi: Option<f64>,
    pub age: Option<f64>,
}

impl PredictionFeatures {
    pub fn from_record(record: &SessionRecord) -> Self {
        Self {
            glucose: record.glucose,
            bmi: record.bmi(),
            age: record.age,
        }
    }

    /// `[glucose, bmi, age]`.
    pub fn to_array(&self) -> [Option<f64>; FEATURE_COUNT] {
        [self.glucose, self.bmi, self.age]
    }

    /// Whether every feature is unset.
    pub fn is_empty(&self) -> bool {
        self.to_array().iter().all(Option::is_none)
    }
}

/// Opaque, deterministic predisposition classifier.
pub trait PredictionOracle: Send + Sync {
    /// Short identifier for logs and the status endpoint.
    fn name(&self) -> &str;

    /// True when the features indicate a predisposition to diabetes.
    fn predict(&self, features: &PredictionFeatures) -> Result<bool, PredictionError>;
}

/// Per-feature standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

fn default_threshold() -> f64 {
    0.5
}

/// Serialized model snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub scaler: StandardScaler,
    pub weights: Vec<f64>,
    pub bias: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl ModelSnapshot {
    fn validate(&self) -> Result<(), PredictionError> {
        let dims = [
            ("scaler.mean", self.scaler.mean.len()),
            ("scaler.scale", self.scaler.scale.len()),
            ("weights", self.weights.len()),
        ];
        for (field, len) in dims {
            if len != FEATURE_COUNT {
                return Err(PredictionError::InvalidModel {
                    reason: format!("{field} has {len} entries, expected {FEATURE_COUNT}"),
                });
            }
        }
        if self.scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(PredictionError::InvalidModel {
                reason: "scaler.scale must be finite and non-zero".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(PredictionError::InvalidModel {
                reason: format!("threshold {} outside [0, 1]", self.threshold),
            });
        }
        Ok(())
    }
}

/// Logistic-regression oracle over standardised features.
///
/// Unset features are imputed with the scaler mean, so they contribute
/// nothing to the decision.
#[derive(Debug, Clone)]
pub struct LogisticOracle {
    snapshot: ModelSnapshot,
}

impl LogisticOracle {
    /// Build from an in-memory snapshot.
    pub fn new(snapshot: ModelSnapshot) -> Result<Self, PredictionError> {
        snapshot.validate()?;
        Ok(Self { snapshot })
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self, PredictionError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a snapshot file.
    pub async fn load(path: &Path) -> Result<Self, PredictionError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PredictionError::ModelLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let oracle = Self::from_json(&raw).map_err(|e| PredictionError::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), threshold = oracle.snapshot.threshold, "Prediction model loaded");
        Ok(oracle)
    }

    /// Probability of predisposition.
    pub fn probability(&self, features: &PredictionFeatures) -> Result<f64, PredictionError> {
        let s = &self.snapshot;
        let mut z = s.bias;
        for (i, value) in features.to_array().into_iter().enumerate() {
            let scaled = match value {
                Some(v) if !v.is_finite() => {
                    return Err(PredictionError::InvalidFeature {
                        name: FEATURE_NAMES[i],
                        value: v,
                    });
                }
                Some(v) => (v - s.scaler.mean[i]) / s.scaler.scale[i],
                None => 0.0,
            };
            z += s.weights[i] * scaled;
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl PredictionOracle for LogisticOracle {
    fn name(&self) -> &str {
        "logistic"
    }

    fn predict(&self, features: &PredictionFeatures) -> Result<bool, PredictionError> {
        let p = self.probability(features)?;
        debug!(?features, probability = p, "Prediction computed");
        Ok(p >= self.snapshot.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ModelSnapshot {
        ModelSnapshot {
            scaler: StandardScaler {
                mean: vec![120.0, 32.0, 33.0],
                scale: vec![32.0, 7.9, 11.8],
            },
            weights: vec![1.1, 0.7, 0.4],
            bias: -0.8,
            threshold: 0.5,
        }
    }

    fn features(glucose: f64, bmi: f64, age: f64) -> PredictionFeatures {
        PredictionFeatures {
            glucose: Some(glucose),
            bmi: Some(bmi),
            age: Some(age),
        }
    }

    #[test]
    fn high_risk_profile_is_predisposed() {
        let oracle = LogisticOracle::new(snapshot()).unwrap();
        assert!(oracle.predict(&features(190.0, 40.0, 55.0)).unwrap());
    }

    #[test]
    fn low_risk_profile_is_not_predisposed() {
        let oracle = LogisticOracle::new(snapshot()).unwrap();
        assert!(!oracle.predict(&features(85.0, 21.0, 24.0)).unwrap());
    }

    #[test]
    fn unset_features_fall_back_to_bias() {
        let oracle = LogisticOracle::new(snapshot()).unwrap();
        let p = oracle.probability(&PredictionFeatures::default()).unwrap();
        let expected = 1.0 / (1.0 + 0.8_f64.exp());
        assert!((p - expected).abs() < 1e-12);
        assert!(!oracle.predict(&PredictionFeatures::default()).unwrap());
    }

    #[test]
    fn threshold_controls_decision() {
        let mut snap = snapshot();
        snap.threshold = 0.0;
        let oracle = LogisticOracle::new(snap).unwrap();
        assert!(oracle.predict(&PredictionFeatures::default()).unwrap());
    }

    #[test]
    fn non_finite_feature_is_rejected() {
        let oracle = LogisticOracle::new(snapshot()).unwrap();
        let err = oracle
            .predict(&PredictionFeatures {
                bmi: Some(f64::INFINITY),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, PredictionError::InvalidFeature { name: "bmi", .. }));
    }

    #[test]
    fn wrong_dimensions_rejected() {
        let mut snap = snapshot();
        snap.weights.pop();
        let err = LogisticOracle::new(snap).unwrap_err();
        assert!(err.to_string().contains("weights"));
    }

    #[test]
    fn zero_scale_rejected() {
        let mut snap = snapshot();
        snap.scaler.scale[1] = 0.0;
        assert!(LogisticOracle::new(snap).is_err());
    }

    #[test]
    fn threshold_defaults_when_absent() {
        let json = r#"{
            "scaler": {"mean": [0, 0, 0], "scale": [1, 1, 1]},
            "weights": [1, 1, 1],
            "bias": 0
        }"#;
        let oracle = LogisticOracle::from_json(json).unwrap();
        assert_eq!(oracle.snapshot.threshold, 0.5);
    }

    #[test]
    fn features_from_record_use_bmi() {
        let mut record = SessionRecord::new("u1");
        record.glucose = Some(140.0);
        record.weight = Some(90.0);
        record.height = Some(1.8);
        record.age = Some(50.0);

        let f = PredictionFeatures::from_record(&record);
        assert_eq!(f.to_array(), [Some(140.0), Some(27.78), Some(50.0)]);
        assert!(!f.is_empty());
        assert!(PredictionFeatures::from_record(&SessionRecord::new("u2")).is_empty());
    }
}
