//! Classifier seam.
//!
//! The pretrained network stays a black box behind [`Classifier`]; the rest
//! of the pipeline only sees per-class probabilities. Production uses the
//! ONNX-backed [`TractClassifier`], tests substitute fixed-output fakes.

mod tract;

pub use tract::TractClassifier;

use crate::loader::DecodedImage;

/// Probability vector aligned positionally to `TumorClass::ALL`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassProbabilities([f32; 4]);

impl ClassProbabilities {
    pub fn new(values: [f32; 4]) -> Self {
        Self(values)
    }

    /// Builds from a raw model output, which must hold exactly one value per
    /// class.
    pub fn from_output(values: &[f32]) -> Result<Self, ClassifierError> {
        match values {
            &[a, b, c, d] => Ok(Self([a, b, c, d])),
            _ => Err(ClassifierError::OutputShape { got: values.len() }),
        }
    }

    pub fn values(&self) -> &[f32; 4] {
        &self.0
    }

    /// Index and value of the largest entry. Ties resolve to the lowest
    /// index, so equal probabilities always name the same class.
    pub fn argmax(&self) -> (usize, f32) {
        let mut best = 0;
        for i in 1..self.0.len() {
            if self.0[i] > self.0[best] {
                best = i;
            }
        }
        (best, self.0[best])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("model error: {0}")]
    Model(String),
    #[error("model returned {got} values, expected one per tumor class")]
    OutputShape { got: usize },
}

/// Black-box mapping from a decoded upload to per-class probabilities.
///
/// Implementations own their preprocessing and are constructed once at
/// startup, then shared read-only across concurrent requests.
pub trait Classifier: Send + Sync {
    fn predict(&self, image: &DecodedImage) -> Result<ClassProbabilities, ClassifierError>;
}
