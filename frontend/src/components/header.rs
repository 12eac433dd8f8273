use super::super::Model;
use yew::prelude::*;

/// Logo and title at the top of the glass container.
pub fn render_header(model: &Model) -> Html {
    let Some(page) = &model.page else {
        return html! { <h1 class="centered-title">{"PhytoScan"}</h1> };
    };

    html! {
        <header class="app-header">
            <img src={page.logo_data_uri.clone()} class="logo-top-left" alt="logo" />
            <h1 class="centered-title">{ &page.title }</h1>
        </header>
    }
}
