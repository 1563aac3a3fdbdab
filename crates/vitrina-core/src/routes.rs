//! Route table of the storefront
//!
//! Every route except [`Route::Unauthorized`] is mounted behind the route
//! guard.

use std::fmt;
use std::str::FromStr;

use crate::error::RouteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: featured entry, catalog, admin toggle
    Home,
    /// `/app/:id`
    Application { id: i64 },
    /// `/app/:id/edit`
    EditApplication { id: i64 },
    /// `/app/create`
    CreateApplication,
    /// `/broadcast-message`
    BroadcastMessage,
    /// `/unauthorized`, where a failed verification lands
    Unauthorized,
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default().trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["unauthorized"] => Ok(Route::Unauthorized),
            ["broadcast-message"] => Ok(Route::BroadcastMessage),
            // Must win over `app/:id`
            ["app", "create"] => Ok(Route::CreateApplication),
            ["app", id] => Ok(Route::Application { id: parse_id(id)? }),
            ["app", id, "edit"] => Ok(Route::EditApplication { id: parse_id(id)? }),
            _ => Err(RouteError::NotFound(path.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Application { id } => format!("/app/{id}"),
            Route::EditApplication { id } => format!("/app/{id}/edit"),
            Route::CreateApplication => "/app/create".to_string(),
            Route::BroadcastMessage => "/broadcast-message".to_string(),
            Route::Unauthorized => "/unauthorized".to_string(),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Unauthorized)
    }

    /// Catalog management pages, offered only in admin mode.
    pub fn requires_admin_mode(&self) -> bool {
        matches!(
            self,
            Route::EditApplication { .. } | Route::CreateApplication | Route::BroadcastMessage
        )
    }

    /// Where the host's back button leads from this page.
    pub fn back(&self) -> Route {
        match self {
            Route::EditApplication { id } => Route::Application { id: *id },
            _ => Route::Home,
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, RouteError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| RouteError::InvalidId(raw.to_string()))
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_page() {
        assert_eq!(Route::parse("/"), Ok(Route::Home));
        assert_eq!(Route::parse(""), Ok(Route::Home));
        assert_eq!(Route::parse("/app/7"), Ok(Route::Application { id: 7 }));
        assert_eq!(Route::parse("app/7/edit/"), Ok(Route::EditApplication { id: 7 }));
        assert_eq!(Route::parse("/broadcast-message"), Ok(Route::BroadcastMessage));
        assert_eq!(Route::parse("/unauthorized?from=/app/3"), Ok(Route::Unauthorized));
    }

    #[test]
    fn create_wins_over_numeric_id() {
        assert_eq!(Route::parse("/app/create"), Ok(Route::CreateApplication));
    }

    #[test]
    fn rejects_unknown_paths_and_bad_ids() {
        assert_eq!(Route::parse("/settings"), Err(RouteError::NotFound("/settings".to_string())));
        assert_eq!(Route::parse("/app/abc"), Err(RouteError::InvalidId("abc".to_string())));
        assert_eq!(Route::parse("/app/0"), Err(RouteError::InvalidId("0".to_string())));
    }

    #[test]
    fn path_round_trips() {
        let routes = [
            Route::Home,
            Route::Application { id: 3 },
            Route::EditApplication { id: 3 },
            Route::CreateApplication,
            Route::BroadcastMessage,
            Route::Unauthorized,
        ];
        for route in routes {
            assert_eq!(route.path().parse::<Route>(), Ok(route));
        }
    }

    #[test]
    fn only_unauthorized_is_public() {
        assert!(Route::Home.is_protected());
        assert!(!Route::Unauthorized.is_protected());
        assert!(Route::BroadcastMessage.requires_admin_mode());
        assert!(!Route::Application { id: 1 }.requires_admin_mode());
        assert_eq!(Route::EditApplication { id: 4 }.back(), Route::Application { id: 4 });
    }
}
