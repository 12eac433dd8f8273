/// Labels in the order the classifier was trained on.
pub const DEFAULT_LABELS: [&str; 3] = [
    "Tomato-Bacterial_spot",
    "Potato-Early_blight",
    "Corn-Common_rust",
];

pub const LABEL_SEPARATOR: char = '-';

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("label table is empty")]
    Empty,
    #[error("malformed label {0:?}: expected exactly one '-' between plant and disease")]
    Malformed(String),
    #[error("class index {index} out of range for {len} labels")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered, immutable mapping from classifier output index to label.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn new(labels: Vec<String>) -> Result<Self, LabelError> {
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }
        for label in &labels {
            if label.matches(LABEL_SEPARATOR).count() != 1 {
                return Err(LabelError::Malformed(label.clone()));
            }
            parse_label(label)?;
        }
        Ok(Self { labels })
    }

    pub fn label_for(&self, index: usize) -> Result<&str, LabelError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or(LabelError::IndexOutOfRange {
                index,
                len: self.labels.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Splits `"<Plant>-<Disease>"` on the first separator.
pub fn parse_label(label: &str) -> Result<(String, String), LabelError> {
    match label.split_once(LABEL_SEPARATOR) {
        Some((plant, disease)) if !plant.is_empty() && !disease.is_empty() => {
            Ok((plant.to_string(), disease.to_string()))
        }
        _ => Err(LabelError::Malformed(label.to_string())),
    }
}
