use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use uuid::Uuid;

/// Name of the multipart field carrying the leaf image.
pub const IMAGE_FIELD: &str = "image";

/// Message shown when predict is triggered before an image is chosen.
pub const MISSING_IMAGE_WARNING: &str = "Please upload an image before clicking Predict.";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Upload,
    Detect,
    Results,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AdviceTip {
    pub icon: String,
    /// Tip text; `**` pairs mark bold segments.
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Advice {
    pub heading: String,
    pub tips: Vec<AdviceTip>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictResponse {
    Success {
        request_id: Uuid,
        plant: String,
        disease: String,
        label: String,
        confidence: f32,
        image_hash: String,
        analyzed_at: DateTime<Utc>,
        advice: Advice,
    },
    Warning {
        message: String,
    },
    Error {
        message: String,
    },
}

/// Headline shown above the advice for a successful prediction.
pub fn success_message(plant: &str, disease: &str) -> String {
    format!("This is a **{}** leaf with **{}**.", plant, disease)
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HowToStep {
    pub title: String,
    pub details: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Sidebar {
    pub header: String,
    pub description: String,
    pub info: String,
    pub how_to_title: String,
    pub how_to: Vec<HowToStep>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StepContent {
    pub step: Step,
    pub tab_label: String,
    pub heading: String,
    /// Lottie animation JSON, absent when it could not be fetched.
    pub animation: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PageContent {
    pub title: String,
    pub background_data_uri: String,
    pub logo_data_uri: String,
    pub sidebar: Sidebar,
    pub steps: Vec<StepContent>,
}

impl PageContent {
    pub fn step(&self, step: Step) -> Option<&StepContent> {
        self.steps.iter().find(|s| s.step == step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn predict_response_is_tagged_by_status() {
        let warning = PredictResponse::Warning {
            message: MISSING_IMAGE_WARNING.into(),
        };
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(
            value,
            json!({ "status": "warning", "message": MISSING_IMAGE_WARNING })
        );
    }

    #[test]
    fn success_message_marks_plant_and_disease() {
        assert_eq!(
            success_message("Potato", "Early_blight"),
            "This is a **Potato** leaf with **Early_blight**."
        );
    }

    #[test]
    fn step_display_names() {
        assert_eq!(Step::Upload.to_string(), "Upload");
        assert_eq!(Step::Results.to_string(), "Results");
    }
}
