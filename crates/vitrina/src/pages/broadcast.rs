use std::path::{Path, PathBuf};

use anyhow::bail;
use async_trait::async_trait;
use vitrina_core::model::{BroadcastMessage, FileUpload};
use vitrina_core::validation::validate_broadcast;
use vitrina_core::{ApiClient, AuthorizedContext, ProtectedView};

use super::PageResult;
use crate::notify;

/// `/broadcast-message`
pub struct BroadcastPage {
    pub text: String,
    pub attachments: Vec<PathBuf>,
}

#[async_trait]
impl ProtectedView<ApiClient> for BroadcastPage {
    type Output = PageResult;

    async fn mount(self, ctx: AuthorizedContext<ApiClient>) -> PageResult {
        // Text is checked before anything is uploaded.
        if let Err(reason) = validate_broadcast(&BroadcastMessage::new(self.text.as_str(), None)) {
            notify::failure(format!("Check the message: {reason}"));
            bail!(reason);
        }

        let image_url = if self.attachments.is_empty() {
            None
        } else {
            let files = self
                .attachments
                .iter()
                .map(PathBuf::as_path)
                .map(load_attachment)
                .collect::<anyhow::Result<Vec<_>>>()?;
            match ctx.api.upload_files(files).await {
                Ok(urls) => urls.into_iter().next(),
                Err(err) => {
                    notify::failure(notify::describe_gateway_error("upload the attachment", &err));
                    return Err(err.into());
                }
            }
        };

        let message = BroadcastMessage::new(self.text, image_url);
        match ctx.api.create_broadcast_message(&message).await {
            Ok(_) => {
                notify::success("Broadcast message queued");
                Ok(())
            }
            Err(err) => {
                notify::failure(notify::describe_gateway_error("send the broadcast", &err));
                Err(err.into())
            }
        }
    }
}

fn load_attachment(path: &Path) -> anyhow::Result<FileUpload> {
    let bytes = fs_err::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(FileUpload {
        content_type: content_type_for(path).to_string(),
        file_name,
        bytes,
    })
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}
