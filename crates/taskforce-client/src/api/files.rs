//! Files API.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use crate::api::Page;
use crate::client::TaskForceClient;
use crate::error::{Error, Result};
use crate::types::{File, FileListResponse, FileUploadOptions};

/// Files API client.
pub struct FilesApi {
    client: TaskForceClient,
}

impl FilesApi {
    pub(crate) fn new(client: TaskForceClient) -> Self {
        Self { client }
    }

    /// Upload a file.
    pub async fn upload(
        &self,
        filename: &str,
        content: Vec<u8>,
        options: Option<FileUploadOptions>,
    ) -> Result<File> {
        let mut form =
            Form::new().part("file", Part::bytes(content).file_name(filename.to_string()));
        if let Some(options) = options {
            if let Some(purpose) = options.purpose {
                form = form.text("purpose", purpose);
            }
            if let Some(mime_type) = options.mime_type {
                form = form.text("mime_type", mime_type);
            }
        }
        self.client.post_multipart("files", form).await
    }

    /// List uploaded files.
    pub async fn list(&self, page: Page) -> Result<FileListResponse> {
        self.client.get_with_query("files", &page).await
    }

    /// Get metadata for a file.
    pub async fn get(&self, file_id: &str) -> Result<File> {
        self.client.get(&format!("files/{}", file_id)).await
    }

    /// Delete a file by ID.
    pub async fn delete(&self, file_id: &str) -> Result<()> {
        self.client.delete(&format!("files/{}", file_id)).await
    }

    /// Download the content of a file.
    pub async fn download(&self, file_id: &str) -> Result<Bytes> {
        let response = self
            .client
            .get_response(&format!("files/{}/content", file_id))
            .await?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::Api { status });
        }
        Ok(response.bytes().await?)
    }
}
