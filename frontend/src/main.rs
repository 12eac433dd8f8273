mod api;
mod components;

use components::animation::render_step_animation;
use components::detect_step::render_detect_step;
use components::header::render_header;
use components::results_step::render_results_step;
use components::sidebar::render_sidebar;
use components::tabs::render_tabs;
use components::upload_step::render_upload_step;
use components::utils::render_error_message;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{MISSING_IMAGE_WARNING, PageContent, PredictResponse, Step};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub struct SelectedImage {
    pub file: GlooFile,
    pub preview_url: ObjectUrl,
}

pub enum Msg {
    PageLoaded(PageContent),
    PageFailed(String),
    SelectStep(Step),

    ImageSelected(GlooFile),
    ClearImage,
    SetDragging(bool),

    Predict,
    PredictFinished(PredictResponse),

    SetError(Option<String>),
}

pub struct Model {
    pub page: Option<PageContent>,
    pub active_step: Step,
    pub image: Option<SelectedImage>,
    pub is_dragging: bool,
    pub loading: bool,
    pub outcome: Option<PredictResponse>,
    pub error: Option<String>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            match api::fetch_page().await {
                Ok(page) => link.send_message(Msg::PageLoaded(page)),
                Err(e) => link.send_message(Msg::PageFailed(e)),
            }
        });

        Self {
            page: None,
            active_step: Step::Upload,
            image: None,
            is_dragging: false,
            loading: false,
            outcome: None,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::PageLoaded(page) => {
                self.page = Some(page);
                true
            }
            Msg::PageFailed(error) => {
                log::error!("Failed to load page content: {}", error);
                self.error = Some(error);
                true
            }
            Msg::SelectStep(step) => {
                self.active_step = step;
                true
            }
            Msg::ImageSelected(file) => self.handle_image_selected(file),
            Msg::ClearImage => {
                self.image = None;
                self.outcome = None;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::Predict => self.handle_predict(ctx),
            Msg::PredictFinished(response) => {
                self.loading = false;
                self.outcome = Some(response);
                self.active_step = Step::Results;
                true
            }
            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let background = self
            .page
            .as_ref()
            .map(|page| format!("background-image: url(\"{}\");", page.background_data_uri))
            .unwrap_or_default();

        html! {
            <div class="app" style={background}>
                { render_sidebar(self) }
                <main class="block-container">
                    { render_header(self) }
                    { render_error_message(self) }
                    { render_tabs(self, ctx) }
                    <section class="tab-panel">
                        <h2 class="step-heading">{ self.step_heading() }</h2>
                        { render_step_animation(self) }
                        {
                            match self.active_step {
                                Step::Upload => render_upload_step(self, ctx),
                                Step::Detect => render_detect_step(self, ctx),
                                Step::Results => render_results_step(self),
                            }
                        }
                    </section>
                </main>
            </div>
        }
    }
}

impl Model {
    fn step_heading(&self) -> String {
        self.page
            .as_ref()
            .and_then(|page| page.step(self.active_step))
            .map(|content| content.heading.clone())
            .unwrap_or_default()
    }

    fn handle_image_selected(&mut self, file: GlooFile) -> bool {
        let preview_url = ObjectUrl::from(file.clone());
        self.image = Some(SelectedImage { file, preview_url });
        self.is_dragging = false;
        self.outcome = None;
        self.error = None;
        true
    }

    fn handle_predict(&mut self, ctx: &Context<Self>) -> bool {
        let Some(image) = &self.image else {
            log::warn!("Predict pressed without an image");
            self.outcome = Some(PredictResponse::Warning {
                message: MISSING_IMAGE_WARNING.to_string(),
            });
            self.active_step = Step::Results;
            return true;
        };

        self.loading = true;
        self.error = None;
        self.outcome = None;

        let file = image.file.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let response = api::send_prediction(&file).await;
            link.send_message(Msg::PredictFinished(response));
        });
        true
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("PhytoScan starting...");
    yew::Renderer::<Model>::new().render();
}
