use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read asset {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("unrecognised image asset {0}")]
    UnknownFormat(String),
}

/// Page images embedded as base64 data URIs.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    pub background_data_uri: String,
    pub logo_data_uri: String,
}

impl StaticAssets {
    pub fn load(background: &Path, logo: &Path) -> Result<Self, AssetError> {
        Ok(Self {
            background_data_uri: data_uri_for(background)?,
            logo_data_uri: data_uri_for(logo)?,
        })
    }
}

pub fn data_uri_for(path: &Path) -> Result<String, AssetError> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| AssetError::UnknownFormat(path.display().to_string()))?;
    let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Embedded {} ({} bytes)", path.display(), bytes.len());
    Ok(encode_data_uri(format.to_mime_type(), &bytes))
}

pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
