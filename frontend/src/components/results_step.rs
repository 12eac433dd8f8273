use super::super::Model;
use super::utils::render_bold;
use shared::{Advice, PredictResponse, success_message};
use yew::prelude::*;

pub fn render_results_step(model: &Model) -> Html {
    if model.loading {
        return html! {
            <div class="loading-results">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                <p>{"Analyzing leaf..."}</p>
            </div>
        };
    }

    match &model.outcome {
        Some(PredictResponse::Success {
            plant,
            disease,
            advice,
            ..
        }) => html! {
            <div class="results-container">
                { render_uploaded_image(model) }
                <div class="success-message">
                    {"✅ "}{ render_bold(&success_message(plant, disease)) }
                </div>
                { render_advice(advice) }
            </div>
        },
        Some(PredictResponse::Warning { message }) => html! {
            <div class="warning-message">{ format!("⚠️ {}", message) }</div>
        },
        Some(PredictResponse::Error { message }) => html! {
            <div class="error-message"><p>{ message }</p></div>
        },
        None => html! {
            <p class="no-results-message">{"Upload a leaf and run detection to see results."}</p>
        },
    }
}

fn render_uploaded_image(model: &Model) -> Html {
    match &model.image {
        Some(image) => html! {
            <figure class="uploaded-image">
                <img src={image.preview_url.to_string()} width="300" alt="Uploaded Leaf Image" />
                <figcaption>{"Uploaded Leaf Image"}</figcaption>
            </figure>
        },
        None => html! {},
    }
}

fn render_advice(advice: &Advice) -> Html {
    html! {
        <div class="advice">
            <h3>{ format!("🌿 {}", advice.heading) }</h3>
            <ul>
                { for advice.tips.iter().map(|tip| html! {
                    <li>{ format!("{} ", tip.icon) }{ render_bold(&tip.text) }</li>
                })}
            </ul>
        </div>
    }
}
