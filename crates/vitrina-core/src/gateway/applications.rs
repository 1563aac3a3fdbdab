use reqwest::Method;

use super::ApiClient;
use crate::error::GatewayError;
use crate::model::{CatalogEntry, EntryDraft, EntryPatch};
use crate::validation::{validate_draft, validate_patch};

impl ApiClient {
    /// `GET /applications`
    pub async fn list_applications(&self) -> Result<Vec<CatalogEntry>, GatewayError> {
        let entries: Vec<CatalogEntry> = self.send(self.request(Method::GET, "applications")?).await?;
        tracing::debug!(count = entries.len(), "Fetched catalog");
        Ok(entries)
    }

    /// `GET /applications/:id`
    pub async fn get_application(&self, application_id: i64) -> Result<CatalogEntry, GatewayError> {
        self.send(self.request(Method::GET, &format!("applications/{application_id}"))?)
            .await
    }

    /// `POST /applications`
    pub async fn create_application(&self, draft: &EntryDraft) -> Result<CatalogEntry, GatewayError> {
        validate_draft(draft)?;
        let created: CatalogEntry = self
            .send(self.request(Method::POST, "applications")?.json(draft))
            .await?;
        tracing::info!(application_id = created.id, name = %created.name, "Application created");
        Ok(created)
    }

    /// `PATCH /applications/:id` with only the fields present in `patch`.
    pub async fn edit_application(&self, application_id: i64, patch: &EntryPatch) -> Result<CatalogEntry, GatewayError> {
        validate_patch(patch)?;
        let updated: CatalogEntry = self
            .send(
                self.request(Method::PATCH, &format!("applications/{application_id}"))?
                    .json(patch),
            )
            .await?;
        tracing::info!(application_id, "Application updated");
        Ok(updated)
    }

    /// `DELETE /applications/:id`, returning the removed entry.
    pub async fn delete_application(&self, application_id: i64) -> Result<CatalogEntry, GatewayError> {
        let deleted: CatalogEntry = self
            .send(self.request(Method::DELETE, &format!("applications/{application_id}"))?)
            .await?;
        tracing::info!(application_id, "Application deleted");
        Ok(deleted)
    }

    /// `PATCH /applications/:id/make-main`
    ///
    /// The backend moves the featured order number to this entry and takes
    /// it away from whichever entry held it before.
    pub async fn promote_application(&self, application_id: i64) -> Result<CatalogEntry, GatewayError> {
        let promoted: CatalogEntry = self
            .send(self.request(Method::PATCH, &format!("applications/{application_id}/make-main"))?)
            .await?;
        tracing::info!(application_id, "Application promoted to featured");
        Ok(promoted)
    }
}
