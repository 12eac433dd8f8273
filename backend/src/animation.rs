use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::AnimationUrls;

#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Resolves a URL to Lottie animation JSON.
pub trait AnimationSource {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Value, AnimationError>>;
}

#[derive(Clone)]
pub struct HttpAnimationSource {
    client: reqwest::Client,
}

impl HttpAnimationSource {
    pub fn new(timeout: Duration) -> Result<Self, AnimationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl AnimationSource for HttpAnimationSource {
    async fn fetch(&self, url: &Url) -> Result<Value, AnimationError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnimationError::Status(status.as_u16()));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animations {
    pub upload: Option<Value>,
    pub detect: Option<Value>,
    pub result: Option<Value>,
}

/// Fetches one animation; any failure is logged and yields `None`.
pub async fn load_animation<S: AnimationSource>(source: &S, url: &Url) -> Option<Value> {
    match source.fetch(url).await {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Animation {} unavailable: {}", url, e);
            None
        }
    }
}

pub async fn load_animations<S: AnimationSource>(source: &S, urls: &AnimationUrls) -> Animations {
    let (upload, detect, result) = futures::join!(
        load_animation(source, &urls.upload),
        load_animation(source, &urls.detect),
        load_animation(source, &urls.result),
    );
    Animations {
        upload,
        detect,
        result,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves canned JSON for known URLs and a 404 for everything else.
    pub(crate) struct CannedSource {
        pub(crate) responses: HashMap<String, Value>,
    }

    impl AnimationSource for CannedSource {
        async fn fetch(&self, url: &Url) -> Result<Value, AnimationError> {
            self.responses
                .get(url.as_str())
                .cloned()
                .ok_or(AnimationError::Status(404))
        }
    }

    #[actix_web::test]
    async fn failed_fetches_degrade_to_none() {
        let urls = AnimationUrls::default();
        let source = CannedSource {
            responses: HashMap::from([(urls.detect.to_string(), json!({"v": "5.7.4"}))]),
        };

        let animations = load_animations(&source, &urls).await;
        assert_eq!(animations.upload, None);
        assert_eq!(animations.detect, Some(json!({"v": "5.7.4"})));
        assert_eq!(animations.result, None);
    }

    #[actix_web::test]
    async fn unreachable_host_yields_none() {
        let source = HttpAnimationSource::new(Duration::from_millis(500)).unwrap();
        let url = Url::parse("http://127.0.0.1:9/animation.json").unwrap();
        assert_eq!(load_animation(&source, &url).await, None);
    }
}
