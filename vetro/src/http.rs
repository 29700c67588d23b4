use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use url::Url;

use vetro_core::{PageSource, QueryParams};
use vetro_types::{Payload, VetroConfig, VetroError};

/// Cap on how much of an error body travels inside an error message.
const ERROR_BODY_LIMIT: usize = 256;

/// The production page source: one shared `reqwest` client with the API key
/// attached to every request and the configured per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpSource {
    /// Build a source from a client configuration.
    ///
    /// # Errors
    /// Returns [`VetroError::Config`] for an unparseable base URL and
    /// [`VetroError::Transport`] when the HTTP client cannot be constructed.
    pub fn new(config: &VetroConfig) -> Result<Self, VetroError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            VetroError::config(format!("invalid base url '{}': {e}", config.base_url))
        })?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VetroError::transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn get_page(&self, path: &str, params: &QueryParams) -> Result<Payload, VetroError> {
        let response = self
            .client
            .get(self.url_for(path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| VetroError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VetroError::transport_status(
                status.as_u16(),
                truncate(&body),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response
            .text()
            .await
            .map_err(|e| VetroError::transport(e.to_string()))?;

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(Payload::Json(value)),
            Err(_) if content_type.contains("text/csv") => Ok(Payload::Text(body)),
            Err(e) => Err(VetroError::decode(format!(
                "body is neither valid JSON nor text/csv: {e}"
            ))),
        }
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < ERROR_BODY_LIMIT)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}…", &body[..cut])
    }
}
