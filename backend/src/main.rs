mod animation;
mod assets;
mod classifier;
mod config;
mod labels;
mod pipeline;
mod preprocess;
mod presentation;
mod routes;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use animation::{HttpAnimationSource, load_animations};
use assets::StaticAssets;
use classifier::Classifier;
use config::{AppConfig, ModelBackend};
use labels::LabelTable;
use pipeline::InferencePipeline;
use preprocess::ImagePreprocessor;
use routes::{UploadLimits, configure_routes};

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    log::error!("{}: {}", context, e);
    std::io::Error::other(format!("{}: {}", context, e))
}

fn load_classifier(config: &AppConfig) -> Result<Arc<dyn Classifier>, std::io::Error> {
    match config.model_backend {
        ModelBackend::Onnx => classifier::OnnxClassifier::load(&config.model_path)
            .map(|c| Arc::new(c) as Arc<dyn Classifier>)
            .map_err(|e| startup_error("Model loading failed", e)),
        #[cfg(feature = "torch")]
        ModelBackend::Torch => classifier::TorchClassifier::load(&config.model_path)
            .map(|c| Arc::new(c) as Arc<dyn Classifier>)
            .map_err(|e| startup_error("Model loading failed", e)),
        #[cfg(not(feature = "torch"))]
        ModelBackend::Torch => Err(startup_error(
            "Model loading failed",
            "the torch backend requires building with --features torch",
        )),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = std::env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    }

    let config = AppConfig::load().map_err(|e| startup_error("Invalid configuration", e))?;

    let labels = LabelTable::new(config.labels.clone())
        .map_err(|e| startup_error("Invalid label table", e))?;
    log::info!("Label table: {}", labels.iter().collect::<Vec<_>>().join(", "));

    let classifier = load_classifier(&config)?;
    let pipeline = InferencePipeline::new(ImagePreprocessor::new(config.pixel_scale), classifier, labels);
    pipeline
        .verify_output_dim()
        .map_err(|e| startup_error("Model does not match label table", e))?;
    log::info!(
        "Classifier {} ready (pixel scale: {})",
        pipeline.classifier_name(),
        config.pixel_scale
    );

    let assets = StaticAssets::load(&config.background_image, &config.logo_image)
        .map_err(|e| startup_error("Failed to load page assets", e))?;

    let animations = match HttpAnimationSource::new(config.animation_timeout) {
        Ok(source) => load_animations(&source, &config.animations).await,
        Err(e) => {
            log::warn!("Animation client unavailable, continuing without animations: {}", e);
            Default::default()
        }
    };
    let page = presentation::build_page(&assets, &animations);

    let frontend_dir = if config.frontend_dir.is_dir() {
        Some(config.frontend_dir.clone())
    } else {
        log::warn!(
            "Frontend bundle not found at {}; serving the API only",
            config.frontend_dir.display()
        );
        None
    };

    let pipeline = web::Data::new(pipeline);
    let page = web::Data::new(page);
    let limits = web::Data::new(UploadLimits {
        max_upload_bytes: config.max_upload_bytes,
    });

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(pipeline.clone())
            .app_data(page.clone())
            .app_data(limits.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
