//! Create and edit forms
//!
//! The form contents come from a JSON file. They are validated here first so
//! a bad draft is reported as a form error, not a failed request.

use std::path::Path;

use anyhow::{Context as _, bail};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use vitrina_core::validation::{validate_draft, validate_patch};
use vitrina_core::{ApiClient, AuthorizedContext, EntryDraft, EntryPatch, ProtectedView};

use super::PageResult;
use crate::notify;

/// `/app/create`
pub struct CreatePage {
    pub draft: EntryDraft,
}

/// `/app/:id/edit`
pub struct EditPage {
    pub id: i64,
    pub patch: EntryPatch,
}

/// Reads a draft or patch from a JSON file.
pub fn read_form<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs_err::read_to_string(path)?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a valid form", path.display()))
}

#[async_trait]
impl ProtectedView<ApiClient> for CreatePage {
    type Output = PageResult;

    async fn mount(self, ctx: AuthorizedContext<ApiClient>) -> PageResult {
        if let Err(reason) = validate_draft(&self.draft) {
            notify::failure(format!("Check the form: {reason}"));
            bail!(reason);
        }

        match ctx.api.create_application(&self.draft).await {
            Ok(created) => {
                notify::success(format!("Application \"{}\" created with id {}", created.name, created.id));
                Ok(())
            }
            Err(err) => {
                notify::failure(notify::describe_gateway_error("create the application", &err));
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl ProtectedView<ApiClient> for EditPage {
    type Output = PageResult;

    async fn mount(self, ctx: AuthorizedContext<ApiClient>) -> PageResult {
        if self.patch.is_empty() {
            notify::failure("Nothing to change");
            bail!("empty patch");
        }
        if let Err(reason) = validate_patch(&self.patch) {
            notify::failure(format!("Check the form: {reason}"));
            bail!(reason);
        }

        match ctx.api.edit_application(self.id, &self.patch).await {
            Ok(updated) => {
                notify::success(format!("Application \"{}\" updated", updated.name));
                Ok(())
            }
            Err(err) => {
                notify::failure(notify::describe_gateway_error("update the application", &err));
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_camel_case_forms() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name":"Weather","shortDescription":"Forecasts","orderNumber":2}}"#
        )
        .unwrap();

        let patch: EntryPatch = read_form(file.path()).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Weather"));
        assert_eq!(patch.short_description.as_deref(), Some("Forecasts"));
        assert_eq!(patch.order_number, Some(2));
        assert_eq!(patch.url, None);
    }

    #[test]
    fn malformed_form_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_form::<EntryDraft>(file.path()).unwrap_err();
        assert!(err.to_string().contains("is not a valid form"));
    }
}
