//! Wire types shared by the gateway, the session layer and the pages
//!
//! Field names follow the backend's camelCase JSON.

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Order number that marks the featured ("editor's choice") entry
pub const FEATURED_ORDER_NUMBER: i32 = 1;

/// Authenticated user as returned by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,
    pub telegram_id: String,
    #[serde(default)]
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Opaque bearer token issued after a successful login.
///
/// Never shows up in `Debug` output or logs.
pub struct Credential(SecretString);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Credential {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A listed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub screenshots: Vec<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<i32>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntry {
    pub fn is_featured(&self) -> bool {
        self.order_number == Some(FEATURED_ORDER_NUMBER)
    }

    /// Short blurb for list views, falling back to the full description.
    pub fn summary(&self) -> &str {
        if self.short_description.trim().is_empty() {
            &self.description
        } else {
            &self.short_description
        }
    }

    /// The fields a user can edit, as a draft.
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            short_description: self.short_description.clone(),
            icon: self.icon.clone(),
            screenshots: self.screenshots.clone(),
            category: self.category.clone(),
            order_number: self.order_number,
            url: self.url.clone(),
        }
    }
}

/// First entry holding the featured order number.
///
/// The backend keeps at most one; the client does not check that.
pub fn featured_entry(entries: &[CatalogEntry]) -> Option<&CatalogEntry> {
    entries.iter().find(|entry| entry.is_featured())
}

/// Body of `POST /applications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub screenshots: Vec<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<i32>,
    pub url: String,
}

/// Body of `PATCH /applications/:id`; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        *self == EntryPatch::default()
    }
}

/// Body of `POST /broadcast/message`. `imageUrl` is sent as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessage {
    pub text: String,
    pub image_url: Option<String>,
}

impl BroadcastMessage {
    pub fn new(text: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            text: text.into(),
            image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub init_data: &'a str,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"***")
            .field("user", &self.user)
            .finish()
    }
}

/// One element of the upload endpoint's response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub url: String,
}

/// A file to send to the upload endpoint.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
