use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::{IMAGE_FIELD, PageContent, PredictResponse};

pub async fn fetch_page() -> Result<PageContent, String> {
    let response = Request::get("/api/page")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Server error: {} - {}", status, body));
    }

    response
        .json::<PageContent>()
        .await
        .map_err(|e| format!("Failed to parse page: {}", e))
}

/// Posts the image and always yields a response to render; transport and
/// parse failures become `PredictResponse::Error`.
pub async fn send_prediction(file: &GlooFile) -> PredictResponse {
    let error = |message: String| PredictResponse::Error { message };

    let form_data = match web_sys::FormData::new() {
        Ok(form_data) => form_data,
        Err(_) => return error("Could not prepare the upload.".into()),
    };
    if form_data.append_with_blob(IMAGE_FIELD, file.as_ref()).is_err() {
        return error("Could not attach the image.".into());
    }

    let request = match Request::post("/api/predict").body(form_data) {
        Ok(request) => request,
        Err(e) => return error(format!("Failed to build request: {}", e)),
    };

    match request.send().await {
        // Warnings and errors arrive with non-2xx statuses but the same body shape.
        Ok(response) => match response.json::<PredictResponse>().await {
            Ok(body) => body,
            Err(e) => error(format!(
                "Server error: {} ({})",
                response.status(),
                e
            )),
        },
        Err(e) => error(format!("Network error: {}", e)),
    }
}
