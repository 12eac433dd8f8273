use std::path::PathBuf;

use actix_files::Files;
use actix_multipart::{Multipart, MultipartError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};
use serde_json::json;
use sha2::{Digest, Sha256};
use shared::{IMAGE_FIELD, MISSING_IMAGE_WARNING, PageContent, PredictResponse};
use uuid::Uuid;

use crate::pipeline::{InferencePipeline, PipelineError};
use crate::presentation::management_advice;

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_upload_bytes: usize,
}

#[derive(Debug, thiserror::Error)]
enum UploadError {
    #[error("upload exceeds the {0} byte limit")]
    TooLarge(usize),
    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: Option<PathBuf>) {
    cfg.service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/page").route(web::get().to(page)))
        .service(web::resource("/api/predict").route(web::post().to(predict)));

    if let Some(dir) = frontend_dir {
        cfg.service(Files::new("/", dir).index_file("index.html"));
    }
}

async fn health(pipeline: web::Data<InferencePipeline>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "classifier": pipeline.classifier_name(),
        "labels": pipeline.labels().len(),
    }))
}

async fn page(content: web::Data<PageContent>) -> HttpResponse {
    HttpResponse::Ok().json(content.get_ref())
}

async fn predict(
    pipeline: web::Data<InferencePipeline>,
    limits: web::Data<UploadLimits>,
    mut payload: Multipart,
) -> HttpResponse {
    let image = match read_image_field(&mut payload, limits.max_upload_bytes).await {
        Ok(Some(image)) => image,
        Ok(None) => {
            warn!("Predict requested without an image");
            return respond(
                StatusCode::BAD_REQUEST,
                PredictResponse::Warning {
                    message: MISSING_IMAGE_WARNING.to_string(),
                },
            );
        }
        Err(e @ UploadError::TooLarge(_)) => {
            warn!("Rejected upload: {}", e);
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, e.to_string());
        }
        Err(e) => {
            error!("Failed to read upload: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let request_id = Uuid::new_v4();
    let image_hash = hex::encode(Sha256::digest(&image));

    let classify = pipeline.clone();
    let result = match web::block(move || classify.classify(&image)).await {
        Ok(result) => result,
        Err(e) => {
            error!("[{}] Classification task failed: {}", request_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Classification failed.".into());
        }
    };

    match result {
        Ok(prediction) => {
            info!(
                "[{}] image {} classified as {} ({:.4})",
                request_id, image_hash, prediction.label, prediction.confidence
            );
            respond(
                StatusCode::OK,
                PredictResponse::Success {
                    request_id,
                    plant: prediction.plant,
                    disease: prediction.disease,
                    label: prediction.label,
                    confidence: prediction.confidence,
                    image_hash,
                    analyzed_at: chrono::Utc::now(),
                    advice: management_advice(),
                },
            )
        }
        Err(PipelineError::Preprocess(e)) => {
            warn!("[{}] Unreadable image {}: {}", request_id, image_hash, e);
            error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("{}. Please upload a clear JPEG or PNG photo of a leaf.", capitalize(&e.to_string())),
            )
        }
        Err(e) => {
            error!("[{}] Model inference error: {}", request_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The model could not analyse this image.".into(),
            )
        }
    }
}

/// Collects the first non-empty `image` field; other fields are skipped.
/// A request with no multipart body at all counts as having no image.
async fn read_image_field(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<Vec<u8>>, UploadError> {
    let mut seen_field = false;
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(MultipartError::ContentTypeMissing) => return Ok(None),
            Err(MultipartError::Incomplete) if !seen_field => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        seen_field = true;

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let mut image_data = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if image_data.len() + data.len() > max_bytes {
                return Err(UploadError::TooLarge(max_bytes));
            }
            image_data.extend_from_slice(&data);
        }
        if !image_data.is_empty() {
            return Ok(Some(image_data));
        }
    }
    Ok(None)
}

fn respond(status: StatusCode, body: PredictResponse) -> HttpResponse {
    HttpResponse::build(status).json(body)
}

fn error_response(status: StatusCode, message: String) -> HttpResponse {
    respond(status, PredictResponse::Error { message })
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
