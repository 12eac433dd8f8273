use std::path::Path;

use tract_onnx::prelude::*;

use super::{Classifier, ClassifierError};
use crate::preprocess::{INPUT_SHAPE, NormalizedTensor};

/// ONNX export of the trained model, run with tract on the CPU.
pub struct OnnxClassifier {
    model: TypedRunnableModel<TypedModel>,
}

impl OnnxClassifier {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let load_error = |e: TractError| ClassifierError::Load {
            path: path.display().to_string(),
            message: format!("{:#}", e),
        };

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_error)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(INPUT_SHAPE[0], INPUT_SHAPE[1], INPUT_SHAPE[2], INPUT_SHAPE[3]),
                ),
            )
            .map_err(load_error)?
            .into_optimized()
            .map_err(load_error)?
            .into_runnable()
            .map_err(load_error)?;

        log::info!("Loaded ONNX model from {}", path.display());
        Ok(Self { model })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &'static str {
        "onnx"
    }

    fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
        let inference_error = |e: TractError| ClassifierError::Inference(format!("{:#}", e));

        let values = tensor.to_vec();
        let input = Tensor::from_shape::<f32>(tensor.shape(), &values).map_err(inference_error)?;
        let outputs = self.model.run(tvec!(input.into())).map_err(inference_error)?;
        let output = outputs
            .first()
            .ok_or_else(|| ClassifierError::Inference("model produced no outputs".into()))?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(inference_error)?
            .iter()
            .copied()
            .collect();
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_a_load_error() {
        let err = OnnxClassifier::load("does/not/exist.onnx").err().unwrap();
        match err {
            ClassifierError::Load { path, .. } => assert_eq!(path, "does/not/exist.onnx"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
