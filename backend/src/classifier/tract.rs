use std::path::Path;

use image::imageops::{self, FilterType};
use tract_onnx::prelude::*;

use super::{ClassProbabilities, Classifier, ClassifierError};
use crate::loader::DecodedImage;

/// Side length of the model's fixed square input.
const INPUT_SIZE: u32 = 224;
/// Tolerance when deciding whether an output already sums to one.
const UNIT_SUM_TOLERANCE: f32 = 1e-3;

type RunnableModel = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// Runs the pretrained tumor network from an ONNX export.
#[derive(Debug)]
pub struct TractClassifier {
    plan: RunnableModel,
}

impl TractClassifier {
    /// Loads and optimizes an ONNX export. The model must take a single NCHW
    /// `1x3x224x224` float input and emit one value per tumor class.
    pub fn from_path(path: &Path) -> Result<Self, ClassifierError> {
        let plan = load_plan(path).map_err(|e| ClassifierError::Model(e.to_string()))?;
        Ok(Self { plan })
    }
}

fn load_plan(path: &Path) -> TractResult<RunnableModel> {
    let side = INPUT_SIZE as usize;
    tract_onnx::onnx()
        .model_for_path(path)?
        .with_input_fact(0, f32::fact([1, 3, side, side]).into())?
        .into_optimized()?
        .into_runnable()
}

impl Classifier for TractClassifier {
    fn predict(&self, image: &DecodedImage) -> Result<ClassProbabilities, ClassifierError> {
        let input = to_input_tensor(image);
        let outputs = self
            .plan
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| ClassifierError::Model(e.to_string()))?;
        let raw: Vec<f32> = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Model(e.to_string()))?
            .iter()
            .copied()
            .collect();
        ClassProbabilities::from_output(&as_distribution(&raw))
    }
}

/// Preprocesses to the model's input contract: 224x224 RGB, NCHW, float
/// intensities scaled to [0, 1]. Aspect ratio is not preserved.
fn to_input_tensor(image: &DecodedImage) -> Tensor {
    let resized = imageops::resize(
        &image.to_rgb8(),
        INPUT_SIZE,
        INPUT_SIZE,
        FilterType::Triangle,
    );
    let side = INPUT_SIZE as usize;
    tract_ndarray::Array4::from_shape_fn((1, 3, side, side), |(_, c, y, x)| {
        f32::from(resized.get_pixel(x as u32, y as u32)[c]) / 255.0
    })
    .into_tensor()
}

/// Leaves an output that is already a probability distribution alone and
/// softmaxes anything else. Keras-style exports end in a softmax layer,
/// torch-style exports emit raw logits.
fn as_distribution(raw: &[f32]) -> Vec<f32> {
    let sum: f32 = raw.iter().sum();
    let in_unit_range = raw.iter().all(|v| (0.0..=1.0).contains(v));
    if in_unit_range && (sum - 1.0).abs() <= UNIT_SUM_TOLERANCE {
        raw.to_vec()
    } else {
        softmax(raw)
    }
}

fn softmax(raw: &[f32]) -> Vec<f32> {
    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = raw.iter().map(|v| (v - max).exp()).collect();
    let total: f32 = exp.iter().sum();
    exp.into_iter().map(|v| v / total).collect()
}
