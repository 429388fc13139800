use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response, Url};
use tracing::debug;

use crate::api::{self, ApiStyle, FileListResponse, FileRecord, FileUpload, UploadReceipt};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// The three calls the registry client makes against the file service
#[async_trait]
pub trait FileBackend: Send + Sync {
    async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError>;
    async fn upload_file(&self, file: &FileUpload) -> Result<UploadReceipt, ApiError>;
    async fn delete_file(&self, filename: &str) -> Result<(), ApiError>;
}

/// File service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
    style: ApiStyle,
}

impl HttpBackend {
    pub fn new(base_url: &str, style: ApiStyle) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
            style,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.backend_url, config.api_style)
    }

    /// `<base>/api/v1/<segments...>`, each segment percent-escaped
    pub fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(api::API_PREFIX).extend(segments);
        }
        url
    }

    /// Fail on non-2xx, carrying `detail.message` from the body when there is one
    async fn check_status(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.bytes().await.unwrap_or_default();
        let message = api::server_message(&body);
        debug!("backend error {}: {:?}", status, message);
        Err(ApiError::Status { status, message })
    }
}

#[async_trait]
impl FileBackend for HttpBackend {
    async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError> {
        let url = self.endpoint_url(&[self.style.list_path()]);
        debug!("GET {}", url);

        let resp = self.client.get(url).send().await?;
        let resp = Self::check_status(resp).await?;
        let body = resp.bytes().await?;
        let list: FileListResponse = serde_json::from_slice(&body)?;
        Ok(list.files)
    }

    async fn upload_file(&self, file: &FileUpload) -> Result<UploadReceipt, ApiError> {
        let url = self.endpoint_url(&[self.style.upload_path()]);
        debug!("POST {} ({}, {} bytes)", url, file.name, file.len());

        let mut part = Part::stream_with_length(Body::from(file.content.clone()), file.len())
            .file_name(file.name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part(api::UPLOAD_FIELD, part);

        let resp = self.client.post(url).multipart(form).send().await?;
        let resp = Self::check_status(resp).await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn delete_file(&self, filename: &str) -> Result<(), ApiError> {
        let url = self.endpoint_url(&[self.style.delete_path(), filename]);
        debug!("DELETE {}", url);

        let resp = self.client.delete(url).send().await?;
        let resp = Self::check_status(resp).await?;
        // Any body is fine here; the backend usually echoes a message
        let body = resp.text().await.unwrap_or_default();
        if !body.is_empty() {
            debug!("delete response: {}", body);
        }
        Ok(())
    }
}
