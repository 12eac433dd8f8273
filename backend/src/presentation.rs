use shared::{Advice, AdviceTip, HowToStep, PageContent, Sidebar, Step, StepContent};
use strum::IntoEnumIterator;

use crate::animation::Animations;
use crate::assets::StaticAssets;

pub const APP_TITLE: &str = "PhytoScan";

/// Treatment tips shown after every prediction, whatever the class.
pub fn management_advice() -> Advice {
    let tip = |icon: &str, text: &str| AdviceTip {
        icon: icon.to_string(),
        text: text.to_string(),
    };
    Advice {
        heading: "Management Tips:".to_string(),
        tips: vec![
            tip("🗑️", "Remove infected leaves immediately (prevents spore cycling)."),
            tip(
                "💧",
                "Spray **Chlorothalonil, Mancozeb, or Copper oxychloride**; these work, home remedies don't.",
            ),
            tip("🌬️", "Improve airflow around plants; dense planting means repeat infection."),
            tip("🚫", "Avoid watering on leaves; overhead irrigation accelerates disease."),
            tip("📅", "Follow a strict **7–10 day fungicide schedule** until spread stops."),
        ],
    }
}

pub fn sidebar() -> Sidebar {
    let how_to = |title: &str, details: &[&str]| HowToStep {
        title: title.to_string(),
        details: details.iter().map(|d| d.to_string()).collect(),
    };
    Sidebar {
        header: "🌿 Navigation".to_string(),
        description: "Use this app to detect plant diseases from leaf images quickly and accurately."
            .to_string(),
        info: "📷 Upload a clear, well-lit leaf image to begin analysis.".to_string(),
        how_to_title: "📝 How to Use".to_string(),
        how_to: vec![
            how_to(
                "Upload Leaf Image",
                &[
                    "Select a single leaf photo with good lighting and no blur.",
                    "Make sure the leaf fills most of the frame.",
                ],
            ),
            how_to(
                "Run Detection",
                &[
                    "Click the detection button after uploading.",
                    "The model will analyze the image and classify the disease.",
                ],
            ),
            how_to(
                "View Results",
                &[
                    "See the predicted disease name.",
                    "Recommended treatment steps will also be displayed.",
                ],
            ),
        ],
    }
}

fn step_content(step: Step, animations: &Animations) -> StepContent {
    let (tab_label, heading, animation) = match step {
        Step::Upload => (
            "📤 Step 1: Upload",
            "Upload a clear image of the leaf",
            &animations.upload,
        ),
        Step::Detect => (
            "🔍 Step 2: Detect",
            "Run the Disease Detection Model",
            &animations.detect,
        ),
        Step::Results => (
            "📊 Step 3: Results",
            "View Prediction and Management Tips",
            &animations.result,
        ),
    };
    StepContent {
        step,
        tab_label: tab_label.to_string(),
        heading: heading.to_string(),
        animation: animation.clone(),
    }
}

/// Everything the page needs to render its three steps.
pub fn build_page(assets: &StaticAssets, animations: &Animations) -> PageContent {
    PageContent {
        title: APP_TITLE.to_string(),
        background_data_uri: assets.background_data_uri.clone(),
        logo_data_uri: assets.logo_data_uri.clone(),
        sidebar: sidebar(),
        steps: Step::iter().map(|step| step_content(step, animations)).collect(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::animation::load_animations;
    use crate::animation::tests::CannedSource;
    use crate::config::AnimationUrls;
    use std::collections::HashMap;

    pub(crate) fn test_assets() -> StaticAssets {
        StaticAssets {
            background_data_uri: "data:image/jpeg;base64,AAAA".into(),
            logo_data_uri: "data:image/png;base64,BBBB".into(),
        }
    }

    #[actix_web::test]
    async fn page_renders_all_steps_when_animations_fail() {
        let source = CannedSource {
            responses: HashMap::new(),
        };
        let animations = load_animations(&source, &AnimationUrls::default()).await;
        let page = build_page(&test_assets(), &animations);

        assert_eq!(page.title, "PhytoScan");
        let steps: Vec<Step> = page.steps.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![Step::Upload, Step::Detect, Step::Results]);
        assert!(page.steps.iter().all(|s| s.animation.is_none()));
        assert_eq!(
            page.step(Step::Detect).unwrap().heading,
            "Run the Disease Detection Model"
        );
    }

    #[test]
    fn advice_is_the_fixed_block() {
        let advice = management_advice();
        assert_eq!(advice.tips.len(), 5);
        assert_eq!(advice.heading, "Management Tips:");
        assert!(advice
            .tips
            .iter()
            .any(|tip| tip.text.contains("**7–10 day fungicide schedule**")));
    }

    #[test]
    fn sidebar_lists_three_how_to_steps() {
        let sidebar = sidebar();
        assert_eq!(sidebar.how_to.len(), 3);
        assert_eq!(sidebar.how_to[1].title, "Run Detection");
    }
}
