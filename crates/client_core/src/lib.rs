use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::{multipart, Client, Response};
use shared::{
    domain::{PredictionResult, SelectedImage},
    error::PredictError,
    protocol::{ErrorBody, HealthResponse, PredictResponse},
};
use tracing::{info, warn};
use url::Url;

pub mod config;
pub mod preview;

pub use config::{load_settings, ClientSettings};
pub use preview::PreviewSource;

/// The single outbound seam of the client: everything the UI needs from the
/// prediction service.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, image: &SelectedImage) -> Result<PredictionResult, PredictError>;
    async fn load_preview(&self, reference: &str) -> Result<Vec<u8>, PredictError>;
    async fn health(&self) -> Result<String, PredictError>;
}

#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
    api_base: Url,
    endpoint: Url,
    upload_field: String,
}

impl PredictionClient {
    pub fn new(settings: &ClientSettings) -> anyhow::Result<Self> {
        Self::with_http_client(Client::new(), settings)
    }

    pub fn with_http_client(http: Client, settings: &ClientSettings) -> anyhow::Result<Self> {
        Ok(Self {
            http,
            api_base: settings.api_base_url()?,
            endpoint: settings.predict_url()?,
            upload_field: settings.upload_field.clone(),
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Uploads `image` once and decodes the classification. The media type is
    /// expected to have been validated by the caller.
    pub async fn predict(&self, image: &SelectedImage) -> Result<PredictionResult, PredictError> {
        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.filename.clone())
            .mime_str(&image.media_type)
            .map_err(|err| {
                PredictError::validation(format!(
                    "invalid media type '{}': {err}",
                    image.media_type
                ))
            })?;
        let form = multipart::Form::new().part(self.upload_field.clone(), part);

        info!(
            endpoint = %self.endpoint,
            filename = %image.filename,
            size_bytes = image.size_bytes(),
            "predict: uploading image"
        );
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                PredictError::transport(format!("failed to reach prediction service: {err}"))
            })?;

        let status = response.status();
        let status_text = status_text(&response);
        let body = response.bytes().await.map_err(|err| {
            PredictError::transport(format!("failed to read prediction response: {err}"))
        })?;
        if !status.is_success() {
            let err = failed_response_error(status_text.as_deref(), &body);
            warn!(
                status = status.as_u16(),
                message = %err.message,
                "predict: service rejected upload"
            );
            return Err(err);
        }

        let decoded: PredictResponse = serde_json::from_slice(&body)
            .map_err(|err| PredictError::decode(format!("invalid prediction response: {err}")))?;
        info!(
            prediction = %decoded.prediction,
            confidence = decoded.confidence,
            has_preprocessed = decoded.preprocessed_image.is_some(),
            "predict: response decoded"
        );
        Ok(decoded.into())
    }

    pub async fn load_preview(&self, reference: &str) -> Result<Vec<u8>, PredictError> {
        let url = match preview::resolve_preview_reference(&self.api_base, reference)? {
            PreviewSource::Inline(bytes) => return Ok(bytes),
            PreviewSource::Remote(url) => url,
        };

        let response = self.http.get(url.clone()).send().await.map_err(|err| {
            PredictError::transport(format!("failed to fetch preprocessed image: {err}"))
        })?;
        let status = response.status();
        let status_text = status_text(&response);
        let body = response.bytes().await.map_err(|err| {
            PredictError::transport(format!("failed to read preprocessed image: {err}"))
        })?;
        if !status.is_success() {
            return Err(failed_response_error(status_text.as_deref(), &body));
        }
        info!(%url, size_bytes = body.len(), "preview: fetched preprocessed image");
        Ok(body.to_vec())
    }

    pub async fn health(&self) -> Result<String, PredictError> {
        let response = self
            .http
            .get(self.api_base.clone())
            .send()
            .await
            .map_err(|err| {
                PredictError::transport(format!("failed to reach prediction service: {err}"))
            })?;
        let status = response.status();
        let status_text = status_text(&response);
        let body = response.bytes().await.map_err(|err| {
            PredictError::transport(format!("failed to read health response: {err}"))
        })?;
        if !status.is_success() {
            return Err(failed_response_error(status_text.as_deref(), &body));
        }
        let health: HealthResponse = serde_json::from_slice(&body)
            .map_err(|err| PredictError::decode(format!("invalid health response: {err}")))?;
        Ok(health.message)
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(&self, image: &SelectedImage) -> Result<PredictionResult, PredictError> {
        PredictionClient::predict(self, image).await
    }

    async fn load_preview(&self, reference: &str) -> Result<Vec<u8>, PredictError> {
        PredictionClient::load_preview(self, reference).await
    }

    async fn health(&self) -> Result<String, PredictError> {
        PredictionClient::health(self).await
    }
}

/// The reason phrase the server actually sent, else the canonical one.
fn status_text(response: &Response) -> Option<String> {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .or_else(|| response.status().canonical_reason())
        .map(str::to_string)
}

fn failed_response_error(status_text: Option<&str>, body: &[u8]) -> PredictError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail);
    PredictError::from_failed_response(detail.as_deref(), status_text)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
