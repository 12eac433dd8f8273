use super::super::{Model, Msg};
use super::utils::debounce;
use yew::prelude::*;

pub fn render_detect_step(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link().clone();

    html! {
        <div class="detect-section">
            <button
                class="analyze-btn"
                disabled={model.loading}
                onclick={debounce(300, move || link.send_message(Msg::Predict))}
            >
                {
                    if model.loading {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
                    } else {
                        html! { {"🔍 Predict Disease"} }
                    }
                }
            </button>
        </div>
    }
}
