use super::super::{Model, Msg};
use shared::Step;
use strum::IntoEnumIterator;
use yew::prelude::*;

pub fn render_tabs(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    html! {
        <nav class="tabs">
            { for Step::iter().map(|step| {
                let label = model
                    .page
                    .as_ref()
                    .and_then(|page| page.step(step))
                    .map(|content| content.tab_label.clone())
                    .unwrap_or_else(|| step.to_string());
                html! {
                    <button
                        class={classes!("tab", (model.active_step == step).then_some("active"))}
                        onclick={link.callback(move |_| Msg::SelectStep(step))}
                    >
                        { label }
                    </button>
                }
            })}
        </nav>
    }
}
