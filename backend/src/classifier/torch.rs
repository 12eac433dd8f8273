use std::path::Path;
use std::sync::Mutex;

use tch::{CModule, Device, Kind, Tensor};

use super::{Classifier, ClassifierError};
use crate::preprocess::{INPUT_SHAPE, NormalizedTensor};

/// TorchScript export of the trained model.
pub struct TorchClassifier {
    module: Mutex<CModule>,
    device: Device,
}

impl TorchClassifier {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let device = Device::cuda_if_available();
        let module = CModule::load_on_device(path, device).map_err(|e| ClassifierError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        log::info!("Loaded TorchScript model from {} on {:?}", path.display(), device);
        Ok(Self {
            module: Mutex::new(module),
            device,
        })
    }
}

impl Classifier for TorchClassifier {
    fn name(&self) -> &'static str {
        "torch"
    }

    fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
        let values = tensor.to_vec();
        let input = Tensor::from_slice(&values)
            .view(INPUT_SHAPE.map(|d| d as i64))
            .to_device(self.device);

        let module = self
            .module
            .lock()
            .map_err(|_| ClassifierError::Inference("model lock poisoned".into()))?;
        let output = module
            .forward_ts(&[input])
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let output_flat = output.to_kind(Kind::Float).to_device(Device::Cpu).view([-1]);
        let num_elements = output_flat.size()[0] as usize;
        let mut scores = vec![0.0f32; num_elements];
        output_flat.copy_data(&mut scores, num_elements);
        Ok(scores)
    }
}
