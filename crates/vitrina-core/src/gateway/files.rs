use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::ApiClient;
use crate::error::GatewayError;
use crate::model::{FileUpload, UploadedFile};

impl ApiClient {
    /// `POST /files/upload` as multipart, one `files` part per file.
    ///
    /// Returns the server-assigned URLs in upload order, already prefixed
    /// with the base URL when the server answers with relative paths.
    pub async fn upload_files(&self, files: Vec<FileUpload>) -> Result<Vec<String>, GatewayError> {
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)?;
            form = form.part("files", part);
        }

        let uploaded: Vec<UploadedFile> = self
            .send(self.request(Method::POST, "files/upload")?.multipart(form))
            .await?;
        tracing::info!(count, "Files uploaded");

        Ok(uploaded
            .into_iter()
            .map(|file| self.resolve_asset_url(&file.url))
            .collect())
    }
}
