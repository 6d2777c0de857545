use reqwest::multipart::{Form, Part};

use crate::error::{ApiError, Result};
use crate::http::ApiClient;
use crate::types::{DocumentIngested, UrlRequest};

pub const UPLOAD_PATH: &str = "/api/pdf/upload";
pub const DOWNLOAD_PATH: &str = "/api/pdf/download";

/// PDF ingestion: upload a local file or have the backend fetch a URL.
pub struct PdfApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn pdf(&self) -> PdfApi<'_> {
        PdfApi { client: self }
    }
}

impl PdfApi<'_> {
    /// Multipart upload under the `file` field.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<DocumentIngested> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let form = Form::new().part("file", part);

        self.client
            .post_multipart(UPLOAD_PATH, form)
            .await
            .map(|r| r.data)
    }

    pub async fn download(&self, url: &str) -> Result<DocumentIngested> {
        let body = UrlRequest {
            url: url.to_string(),
        };
        self.client.post(DOWNLOAD_PATH, &body).await.map(|r| r.data)
    }
}
