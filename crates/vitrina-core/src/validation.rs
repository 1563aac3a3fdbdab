//! Client-side form checks
//!
//! Everything here runs before a request is built. A draft that fails
//! validation never reaches the network layer.

use thiserror::Error;
use url::Url;

use crate::model::{BroadcastMessage, EntryDraft, EntryPatch};

/// Minimum length of a broadcast message, in characters
pub const MIN_BROADCAST_TEXT_CHARS: usize = 5;

/// Validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("message must be at least {min} characters long (got {actual})")]
    TextTooShort { min: usize, actual: usize },

    #[error("{field} must not be empty")]
    Required { field: &'static str },

    #[error("{field} is not a valid link: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("order number must be positive (got {0})")]
    InvalidOrderNumber(i32),
}

/// Checks a broadcast message before it is sent.
///
/// Length is counted in characters, not bytes, so Cyrillic text is measured
/// the way the user sees it. Whitespace counts, since the text is sent as
/// typed; text made only of whitespace is refused as empty.
///
/// # Errors
/// Returns the first rule the message breaks.
pub fn validate_broadcast(message: &BroadcastMessage) -> Result<(), ValidationError> {
    let actual = message.text.chars().count();
    if actual < MIN_BROADCAST_TEXT_CHARS {
        return Err(ValidationError::TextTooShort {
            min: MIN_BROADCAST_TEXT_CHARS,
            actual,
        });
    }
    require("text", &message.text)?;
    if let Some(image_url) = &message.image_url {
        validate_link("imageUrl", image_url)?;
    }
    Ok(())
}

pub fn validate_draft(draft: &EntryDraft) -> Result<(), ValidationError> {
    require("name", &draft.name)?;
    require("description", &draft.description)?;
    require("category", &draft.category)?;
    require("url", &draft.url)?;
    validate_link("url", &draft.url)?;
    validate_media(&draft.icon, &draft.screenshots)?;
    validate_order_number(draft.order_number)
}

/// Partial updates only check the fields they carry.
pub fn validate_patch(patch: &EntryPatch) -> Result<(), ValidationError> {
    if let Some(name) = &patch.name {
        require("name", name)?;
    }
    if let Some(description) = &patch.description {
        require("description", description)?;
    }
    if let Some(category) = &patch.category {
        require("category", category)?;
    }
    if let Some(url) = &patch.url {
        require("url", url)?;
        validate_link("url", url)?;
    }
    if let Some(icon) = &patch.icon {
        validate_media(icon, patch.screenshots.as_deref().unwrap_or_default())?;
    } else if let Some(screenshots) = &patch.screenshots {
        validate_media("", screenshots)?;
    }
    validate_order_number(patch.order_number)
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Accepts web links and `tg://` deep links.
fn validate_link(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidUrl {
        field,
        value: value.to_string(),
    };
    let parsed = Url::parse(value.trim()).map_err(|_| invalid())?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        "tg" => Ok(()),
        _ => Err(invalid()),
    }
}

// Icon may be left empty (the storefront shows a placeholder).
fn validate_media(icon: &str, screenshots: &[String]) -> Result<(), ValidationError> {
    if !icon.trim().is_empty() {
        validate_link("icon", icon)?;
    }
    for screenshot in screenshots {
        validate_link("screenshots", screenshot)?;
    }
    Ok(())
}

fn validate_order_number(order_number: Option<i32>) -> Result<(), ValidationError> {
    match order_number {
        Some(n) if n < 1 => Err(ValidationError::InvalidOrderNumber(n)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EntryDraft {
        EntryDraft {
            name: "Weather".to_string(),
            description: "Forecasts in chat".to_string(),
            short_description: "Forecasts".to_string(),
            icon: "https://cdn.example.com/weather.png".to_string(),
            screenshots: vec!["https://cdn.example.com/s1.png".to_string()],
            category: "tools".to_string(),
            order_number: None,
            url: "https://t.me/weather_bot/app".to_string(),
        }
    }

    #[test]
    fn broadcast_text_shorter_than_five_chars_is_rejected() {
        let message = BroadcastMessage::new("hey!", None);
        assert_eq!(
            validate_broadcast(&message),
            Err(ValidationError::TextTooShort { min: 5, actual: 4 })
        );
    }

    #[test]
    fn broadcast_text_of_exactly_five_chars_is_accepted() {
        assert!(validate_broadcast(&BroadcastMessage::new("hello", None)).is_ok());
        // Five Cyrillic letters are ten bytes
        assert!(validate_broadcast(&BroadcastMessage::new("привет", None)).is_ok());
        assert!(validate_broadcast(&BroadcastMessage::new("пять!", None)).is_ok());
    }

    #[test]
    fn broadcast_whitespace_counts_toward_the_length() {
        assert!(validate_broadcast(&BroadcastMessage::new("ab   ", None)).is_ok());
        assert!(validate_broadcast(&BroadcastMessage::new(" a b ", None)).is_ok());
        assert_eq!(
            validate_broadcast(&BroadcastMessage::new("ab  ", None)),
            Err(ValidationError::TextTooShort { min: 5, actual: 4 })
        );
    }

    #[test]
    fn broadcast_of_only_whitespace_is_refused() {
        assert_eq!(
            validate_broadcast(&BroadcastMessage::new("     \n", None)),
            Err(ValidationError::Required { field: "text" })
        );
    }

    #[test]
    fn broadcast_attachment_must_be_a_link() {
        let message = BroadcastMessage::new("Big news today", Some("not a url".to_string()));
        assert!(matches!(
            validate_broadcast(&message),
            Err(ValidationError::InvalidUrl { field: "imageUrl", .. })
        ));
    }

    #[test]
    fn complete_draft_passes() {
        assert_eq!(validate_draft(&draft()), Ok(()));
    }

    #[test]
    fn draft_requires_name_and_launch_url() {
        let mut d = draft();
        d.name = "  ".to_string();
        assert_eq!(validate_draft(&d), Err(ValidationError::Required { field: "name" }));

        let mut d = draft();
        d.url = "javascript:alert(1)".to_string();
        assert!(matches!(validate_draft(&d), Err(ValidationError::InvalidUrl { field: "url", .. })));
    }

    #[test]
    fn draft_allows_missing_icon_but_not_broken_screenshots() {
        let mut d = draft();
        d.icon = String::new();
        assert!(validate_draft(&d).is_ok());

        d.screenshots.push("ftp://files/s2.png".to_string());
        assert!(validate_draft(&d).is_err());
    }

    #[test]
    fn order_number_must_be_positive() {
        let mut d = draft();
        d.order_number = Some(0);
        assert_eq!(validate_draft(&d), Err(ValidationError::InvalidOrderNumber(0)));
    }

    #[test]
    fn empty_patch_is_valid_and_present_fields_are_checked() {
        assert!(validate_patch(&EntryPatch::default()).is_ok());

        let patch = EntryPatch {
            url: Some("tg://resolve?domain=weather_bot".to_string()),
            ..EntryPatch::default()
        };
        assert!(validate_patch(&patch).is_ok());

        let patch = EntryPatch {
            name: Some(String::new()),
            ..EntryPatch::default()
        };
        assert_eq!(validate_patch(&patch), Err(ValidationError::Required { field: "name" }));
    }
}
