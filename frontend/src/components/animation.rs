use super::super::Model;
use js_sys::{Function, Object, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use yew::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = lottie, js_name = loadAnimation)]
    fn load_animation(params: &JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Properties, PartialEq)]
pub struct LottieProps {
    pub data: Value,
    #[prop_or(200)]
    pub height: u32,
}

/// Plays Lottie JSON through the page's `lottie` script. Missing script or bad
/// data leaves the container empty.
#[function_component(Lottie)]
pub fn lottie(props: &LottieProps) -> Html {
    let container = use_node_ref();

    {
        let container = container.clone();
        use_effect_with(props.data.clone(), move |data| {
            let animation = container
                .cast::<web_sys::Element>()
                .and_then(|element| start_animation(&element, data));

            move || {
                if let Some(animation) = animation {
                    destroy_animation(&animation);
                }
            }
        });
    }

    html! {
        <div class="lottie" ref={container} style={format!("height: {}px;", props.height)}></div>
    }
}

fn start_animation(container: &web_sys::Element, data: &Value) -> Option<JsValue> {
    let animation_data = js_sys::JSON::parse(&data.to_string()).ok()?;
    let params = Object::new();
    Reflect::set(&params, &"container".into(), container).ok()?;
    Reflect::set(&params, &"renderer".into(), &"svg".into()).ok()?;
    Reflect::set(&params, &"loop".into(), &JsValue::TRUE).ok()?;
    Reflect::set(&params, &"autoplay".into(), &JsValue::TRUE).ok()?;
    Reflect::set(&params, &"animationData".into(), &animation_data).ok()?;

    match load_animation(&params) {
        Ok(animation) => Some(animation),
        Err(e) => {
            log::warn!("Lottie unavailable: {:?}", e);
            None
        }
    }
}

fn destroy_animation(animation: &JsValue) {
    if let Ok(destroy) = Reflect::get(animation, &"destroy".into()) {
        if let Some(destroy) = destroy.dyn_ref::<Function>() {
            let _ = destroy.call0(animation);
        }
    }
}

/// Animation for the active step, or nothing when it was not fetched.
pub fn render_step_animation(model: &Model) -> Html {
    let animation = model
        .page
        .as_ref()
        .and_then(|page| page.step(model.active_step))
        .and_then(|content| content.animation.clone());

    match animation {
        Some(data) => html! { <Lottie key={model.active_step.to_string()} {data} /> },
        None => html! {},
    }
}
