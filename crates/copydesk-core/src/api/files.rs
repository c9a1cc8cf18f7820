//! Uploaded media endpoints and wire types.

use std::path::Path;

use reqwest::multipart;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::response::Page;
use super::ApiClient;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoredFile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub mime_type: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

impl ApiClient {
    /// `GET /files` — paged listing.
    pub async fn list_files(&self, page: u32, page_size: u32) -> ApiResult<Page<StoredFile>> {
        self.execute(
            self.get("/files")
                .query(&[("page", page), ("page_size", page_size)]),
        )
        .await?
        .into_page(page, page_size)
    }

    /// `POST /files/upload` — multipart upload of a local file.
    pub async fn upload_file(&self, local_path: &Path) -> ApiResult<StoredFile> {
        let bytes = tokio::fs::read(local_path).await.map_err(|err| {
            ApiError::api(format!("Failed to read {}: {err}", local_path.display()))
        })?;
        let file_name = local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        self.execute(self.post("/files/upload").multipart(form))
            .await?
            .into_data()
    }

    /// `DELETE /files/{id}`
    pub async fn delete_file(&self, id: &str) -> ApiResult<()> {
        self.execute::<serde_json::Value>(self.delete(&format!("/files/{id}")))
            .await?
            .into_unit()
    }
}
