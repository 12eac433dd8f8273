use std::sync::Arc;

use crate::classifier::{Classifier, ClassifierError};
use crate::labels::{LabelError, LabelTable, parse_label};
use crate::preprocess::{ImagePreprocessor, NormalizedTensor, PreprocessError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error("classifier returned no usable scores")]
    NoScores,
    #[error("classifier returned {scores} scores but {labels} labels are configured")]
    OutputMismatch { scores: usize, labels: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub plant: String,
    pub disease: String,
    pub confidence: f32,
}

/// Preprocess, classify and decode the winning label.
#[derive(Clone)]
pub struct InferencePipeline {
    preprocessor: ImagePreprocessor,
    classifier: Arc<dyn Classifier>,
    labels: LabelTable,
}

impl InferencePipeline {
    pub fn new(
        preprocessor: ImagePreprocessor,
        classifier: Arc<dyn Classifier>,
        labels: LabelTable,
    ) -> Self {
        Self {
            preprocessor,
            classifier,
            labels,
        }
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn classify(&self, image: &[u8]) -> Result<Prediction, PipelineError> {
        let tensor = self.preprocessor.preprocess(image)?;
        let scores = self.classifier.predict(&tensor)?;
        self.decode(&scores)
    }

    /// Runs the classifier once on a blank input and checks the output width
    /// matches the label table.
    pub fn verify_output_dim(&self) -> Result<(), PipelineError> {
        let scores = self.classifier.predict(&NormalizedTensor::zeros())?;
        if scores.len() != self.labels.len() {
            return Err(PipelineError::OutputMismatch {
                scores: scores.len(),
                labels: self.labels.len(),
            });
        }
        Ok(())
    }

    fn decode(&self, scores: &[f32]) -> Result<Prediction, PipelineError> {
        if scores.is_empty() {
            return Err(PipelineError::NoScores);
        }
        if scores.len() != self.labels.len() {
            return Err(PipelineError::OutputMismatch {
                scores: scores.len(),
                labels: self.labels.len(),
            });
        }
        let index = argmax(scores).ok_or(PipelineError::NoScores)?;
        let label = self.labels.label_for(index)?;
        let (plant, disease) = parse_label(label)?;
        Ok(Prediction {
            index,
            label: label.to_string(),
            plant,
            disease,
            confidence: scores[index],
        })
    }
}

/// Index of the largest score; ties go to the lowest index and NaN is skipped.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
