use super::super::Model;
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

pub const ACCEPTED_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Click handler that fires `callback` once clicks stop for `delay_ms`.
pub fn debounce<F>(delay_ms: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let pending = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        if let Some(previous) = pending.borrow_mut().take() {
            previous.cancel();
        }
        let callback = callback.clone();
        *pending.borrow_mut() = Some(Timeout::new(delay_ms, move || callback()));
    })
}

/// First JPEG or PNG in the list; only one leaf is analysed at a time.
pub fn first_leaf_image(file_list: &FileList) -> Option<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .find(|file| ACCEPTED_TYPES.contains(&file.type_().as_str()))
        .map(GlooFile::from)
}

/// Renders `**bold**` segments as `<strong>`.
pub fn render_bold(text: &str) -> Html {
    text.split("**")
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                html! { <strong>{ part.to_string() }</strong> }
            } else {
                html! { { part.to_string() } }
            }
        })
        .collect::<Html>()
}

/// Banner for page-level failures such as the page content not loading.
pub fn render_error_message(model: &Model) -> Html {
    match &model.error {
        Some(message) => html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ message.clone() }</p>
            </div>
        },
        None => html! {},
    }
}
