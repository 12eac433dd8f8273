mod onnx;
#[cfg(feature = "torch")]
mod torch;

pub use onnx::OnnxClassifier;
#[cfg(feature = "torch")]
pub use torch::TorchClassifier;

use crate::preprocess::NormalizedTensor;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("failed to load model from {path}: {message}")]
    Load { path: String, message: String },
    #[error("model inference failed: {0}")]
    Inference(String),
}

/// A loaded model producing one score per label for a normalized image.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns the same scores for every input and counts calls.
    pub(crate) struct FixedScores {
        scores: Vec<f32>,
        calls: AtomicUsize,
    }

    impl FixedScores {
        pub(crate) fn new(scores: Vec<f32>) -> Self {
            Self {
                scores,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Classifier for FixedScores {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn predict(&self, _tensor: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scores.clone())
        }
    }

    /// Scores each image by its mean red, green and blue intensity.
    pub(crate) struct ChannelMeans;

    impl Classifier for ChannelMeans {
        fn name(&self) -> &'static str {
            "channel-means"
        }

        fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
            let view = tensor.view();
            let mut sums = [0f32; 3];
            for ((_, _, _, c), value) in view.indexed_iter() {
                sums[c] += *value;
            }
            let pixels = (view.len() / 3) as f32;
            Ok(sums.iter().map(|s| s / pixels).collect())
        }
    }

    pub(crate) struct Failing;

    impl Classifier for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn predict(&self, _tensor: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
            Err(ClassifierError::Inference("backend unavailable".into()))
        }
    }
}
