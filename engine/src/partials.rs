use crate::common::errors::PartialError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Directory, relative to the page root, that holds the fragments.
pub const PARTIALS_DIR: &str = "partials";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where fragment markup comes from.
#[async_trait]
pub trait PartialSource: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<String, PartialError>;
}

/// Fetches `<base>/partials/<name>.html` over HTTP.
#[derive(Debug)]
pub struct HttpPartialSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpPartialSource {
    pub fn new(base_url: &str) -> Result<Self, PartialError> {
        // `Url::join` drops the last segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| PartialError::InvalidUrl {
            url: normalized.clone(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PartialError::ClientCreation {
                reason: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    pub fn partial_url(&self, name: &str) -> Result<Url, PartialError> {
        let relative = format!("{PARTIALS_DIR}/{}.html", urlencoding::encode(name));
        self.base_url
            .join(&relative)
            .map_err(|e| PartialError::InvalidUrl {
                url: relative,
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl PartialSource for HttpPartialSource {
    async fn fetch(&self, name: &str) -> Result<String, PartialError> {
        let url = self.partial_url(name)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PartialError::RequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PartialError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| PartialError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Reads `<root>/partials/<name>.html` from disk.
pub struct DirectoryPartialSource {
    root: PathBuf,
}

impl DirectoryPartialSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn partial_path(&self, name: &str) -> PathBuf {
        self.root.join(PARTIALS_DIR).join(format!("{name}.html"))
    }
}

#[async_trait]
impl PartialSource for DirectoryPartialSource {
    async fn fetch(&self, name: &str) -> Result<String, PartialError> {
        let path = self.partial_path(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| PartialError::RequestFailed {
                url: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

/// Caching front of a [`PartialSource`].
///
/// A failed fetch yields an empty string so the page renders with a gap
/// instead of failing; failures are not cached, so a later call retries.
#[derive(Clone)]
pub struct PartialsClient {
    source: Arc<dyn PartialSource>,
    cache: Arc<Mutex<HashMap<String, String>>>,
}

impl PartialsClient {
    pub fn new(source: Arc<dyn PartialSource>) -> Self {
        Self {
            source,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// HTTP source for `http(s)://` bases, directory source for anything else.
    pub fn from_base(base: &str) -> Result<Self, PartialError> {
        if base.starts_with("http://") || base.starts_with("https://") {
            Ok(Self::new(Arc::new(HttpPartialSource::new(base)?)))
        } else {
            Ok(Self::new(Arc::new(DirectoryPartialSource::new(base))))
        }
    }

    pub async fn load_partial(&self, name: &str) -> String {
        if let Some(html) = self.cache.lock().await.get(name) {
            return html.clone();
        }

        match self.source.fetch(name).await {
            Ok(html) => {
                self.cache
                    .lock()
                    .await
                    .insert(name.to_string(), html.clone());
                log::debug!("Loaded partial '{name}' ({} bytes)", html.len());
                html
            }
            Err(e) => {
                log::warn!("Partial '{name}' unavailable, substituting empty content: {e}");
                String::new()
            }
        }
    }

    pub async fn is_cached(&self, name: &str) -> bool {
        self.cache.lock().await.contains_key(name)
    }
}
