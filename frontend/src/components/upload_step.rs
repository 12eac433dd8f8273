use super::super::{Model, Msg};
use super::utils::{debounce, first_leaf_image};
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_step(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_leaf_image);
        input.set_value("");

        match file {
            Some(file) => Msg::ImageSelected(file),
            None => Msg::SetError(Some("Please choose a JPG, JPEG or PNG image.".into())),
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(|e: DragEvent| {
        e.prevent_default();
        let file = e
            .data_transfer()
            .and_then(|transfer| transfer.files())
            .as_ref()
            .and_then(first_leaf_image);
        match file {
            Some(file) => Msg::ImageSelected(file),
            None => Msg::SetError(Some("Only JPG, JPEG and PNG images are supported.".into())),
        }
    });

    let trigger_file_input = Callback::from(|_| {
        let input = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("file-input"));
        if let Some(input) = input {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <div class="upload-section">
            <input
                type="file"
                id="file-input"
                accept=".jpg,.jpeg,.png,image/jpeg,image/png"
                style="display: none;"
                onchange={handle_change}
            />
            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Choose a leaf image..."}</p>
                    <p class="file-types">{"Supported formats: JPG, JPEG, PNG"}</p>
                </div>
            </div>
            { render_selected_file(model, ctx) }
            <p class="hint">{"Make sure the image is well-lit and focused."}</p>
        </div>
    }
}

fn render_selected_file(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(image) = &model.image else {
        return html! {};
    };

    html! {
        <div class="selected-file">
            <img src={image.preview_url.to_string()} alt={image.file.name()} />
            <span>{ image.file.name() }</span>
            <button
                class="remove-btn"
                title="Remove this image"
                onclick={ctx.link().callback(|_| Msg::ClearImage)}
            >
                <i class="fa-solid fa-times"></i>
            </button>
        </div>
    }
}
