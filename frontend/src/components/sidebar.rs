use super::super::Model;
use yew::prelude::*;

pub fn render_sidebar(model: &Model) -> Html {
    let Some(page) = &model.page else {
        return html! {};
    };
    let sidebar = &page.sidebar;

    html! {
        <aside class="sidebar">
            <h2>{ &sidebar.header }</h2>
            <p>{ &sidebar.description }</p>
            <div class="sidebar-info">{ &sidebar.info }</div>
            <h3>{ &sidebar.how_to_title }</h3>
            <ol class="how-to">
                { for sidebar.how_to.iter().map(|step| html! {
                    <li>
                        <strong>{ &step.title }</strong>
                        <ul>
                            { for step.details.iter().map(|detail| html! { <li>{ detail }</li> }) }
                        </ul>
                    </li>
                })}
            </ol>
        </aside>
    }
}
