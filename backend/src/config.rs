use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::labels::DEFAULT_LABELS;
use crate::preprocess::PixelScale;

const DEFAULT_UPLOAD_ANIMATION: &str = "https://assets2.lottiefiles.com/packages/lf20_j1adxtyb.json";
const DEFAULT_DETECT_ANIMATION: &str = "https://assets2.lottiefiles.com/packages/lf20_4kx2q32n.json";
const DEFAULT_RESULT_ANIMATION: &str = "https://assets2.lottiefiles.com/packages/lf20_tutvdkg0.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationUrls {
    pub upload: Url,
    pub detect: Url,
    pub result: Url,
}

impl Default for AnimationUrls {
    fn default() -> Self {
        let parse = |s: &str| Url::parse(s).expect("built-in animation URL is valid");
        Self {
            upload: parse(DEFAULT_UPLOAD_ANIMATION),
            detect: parse(DEFAULT_DETECT_ANIMATION),
            result: parse(DEFAULT_RESULT_ANIMATION),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelBackend {
    #[default]
    Onnx,
    Torch,
}

impl std::str::FromStr for ModelBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onnx" => Ok(ModelBackend::Onnx),
            "torch" => Ok(ModelBackend::Torch),
            other => Err(format!("unknown model backend {:?} (expected \"onnx\" or \"torch\")", other)),
        }
    }
}

/// Optional YAML overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub labels: Option<Vec<String>>,
    pub animations: Option<AnimationUrls>,
}

impl FileConfig {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub model_backend: ModelBackend,
    pub background_image: PathBuf,
    pub logo_image: PathBuf,
    pub frontend_dir: PathBuf,
    pub pixel_scale: PixelScale,
    pub max_upload_bytes: usize,
    pub animation_timeout: Duration,
    pub labels: Vec<String>,
    pub animations: AnimationUrls,
}

impl AppConfig {
    /// Reads `.env`, the process environment and the optional YAML file named
    /// by `PHYTOSCAN_CONFIG`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;

        if let Ok(path) = env::var("PHYTOSCAN_CONFIG") {
            let source = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            config.apply(FileConfig::from_yaml(&source)?);
            log::info!("Applied config overrides from {}", path);
        }

        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let frontend_dir = lookup("FRONTEND_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_frontend_dir);

        Ok(Self {
            bind_host: lookup("BIND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", lookup("PORT"), 8081)?,
            model_path: path_or(lookup("MODEL_PATH"), "plant_disease_model.onnx"),
            model_backend: parse_or("MODEL_BACKEND", lookup("MODEL_BACKEND"), ModelBackend::Onnx)?,
            background_image: path_or(lookup("BACKGROUND_IMAGE"), "assets/img1.jpg"),
            logo_image: path_or(lookup("LOGO_IMAGE"), "assets/img2.png"),
            frontend_dir,
            pixel_scale: parse_or("PIXEL_SCALE", lookup("PIXEL_SCALE"), PixelScale::default())?,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", lookup("MAX_UPLOAD_BYTES"), 10 * 1024 * 1024)?,
            animation_timeout: Duration::from_secs(parse_or(
                "ANIMATION_TIMEOUT_SECS",
                lookup("ANIMATION_TIMEOUT_SECS"),
                10,
            )?),
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
            animations: AnimationUrls::default(),
        })
    }

    pub fn apply(&mut self, file: FileConfig) {
        if let Some(labels) = file.labels {
            self.labels = labels;
        }
        if let Some(animations) = file.animations {
            self.animations = animations;
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn default_frontend_dir() -> PathBuf {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        PathBuf::from(format!("{}/../frontend/dist", manifest_dir))
    } else {
        PathBuf::from("frontend/dist")
    }
}

fn path_or(value: Option<String>, default: &str) -> PathBuf {
    PathBuf::from(value.unwrap_or_else(|| default.to_string()))
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
        assert_eq!(config.model_path, PathBuf::from("plant_disease_model.onnx"));
        assert_eq!(config.model_backend, ModelBackend::Onnx);
        assert_eq!(config.pixel_scale, PixelScale::Raw);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.labels.len(), 3);
        assert_eq!(config.animations, AnimationUrls::default());
    }

    #[test]
    fn environment_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("MODEL_PATH", "/models/leaf.onnx"),
            ("PIXEL_SCALE", "unit"),
            ("MODEL_BACKEND", "Torch"),
            ("ANIMATION_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.model_path, PathBuf::from("/models/leaf.onnx"));
        assert_eq!(config.pixel_scale, PixelScale::Unit);
        assert_eq!(config.model_backend, ModelBackend::Torch);
        assert_eq!(config.animation_timeout, Duration::from_secs(2));
    }

    #[test]
    fn rejects_bad_values() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

        let err = AppConfig::from_lookup(lookup_from(&[("PIXEL_SCALE", "zscore")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PIXEL_SCALE", .. }));
    }

    #[test]
    fn yaml_overrides_labels_and_animations() {
        let file = FileConfig::from_yaml(
            r#"
labels:
  - Apple-Scab
  - Grape-Black_rot
animations:
  upload: https://example.com/upload.json
  detect: https://example.com/detect.json
  result: https://example.com/result.json
"#,
        )
        .unwrap();
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        config.apply(file);
        assert_eq!(config.labels, vec!["Apple-Scab", "Grape-Black_rot"]);
        assert_eq!(config.animations.detect.as_str(), "https://example.com/detect.json");
    }

    #[test]
    fn yaml_rejects_invalid_urls_and_unknown_keys() {
        assert!(FileConfig::from_yaml("animations:\n  upload: nope\n  detect: nope\n  result: nope\n").is_err());
        assert!(FileConfig::from_yaml("lables: []\n").is_err());
    }
}
