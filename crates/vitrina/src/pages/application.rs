use std::fmt::{self, Write as _};

use async_trait::async_trait;
use vitrina_core::{ApiClient, AuthorizedContext, CatalogEntry, ProtectedView};

use super::{PageResult, require_admin_mode};
use crate::notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Show,
    Open,
    Delete,
    Promote,
}

/// How the host should open an entry's URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Stays inside the chat client
    Telegram(String),
    External(String),
}

impl LaunchTarget {
    pub fn resolve(url: &str) -> Self {
        if url.contains("t.me") {
            LaunchTarget::Telegram(url.to_string())
        } else {
            LaunchTarget::External(url.to_string())
        }
    }
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchTarget::Telegram(url) => write!(f, "Telegram link {url}"),
            LaunchTarget::External(url) => write!(f, "external link {url}"),
        }
    }
}

/// `/app/:id`: one entry plus the actions on it.
pub struct ApplicationPage {
    pub id: i64,
    pub action: EntryAction,
}

#[async_trait]
impl ProtectedView<ApiClient> for ApplicationPage {
    type Output = PageResult;

    async fn mount(self, ctx: AuthorizedContext<ApiClient>) -> PageResult {
        let id = self.id;
        let result = match self.action {
            EntryAction::Show => ctx.api.get_application(id).await.map(|entry| {
                print!("{}", render(&entry, ctx.session.admin_mode()));
            }),
            EntryAction::Open => ctx.api.get_application(id).await.map(|entry| {
                notify::success(format!("Opening {}", LaunchTarget::resolve(&entry.url)));
            }),
            EntryAction::Delete => {
                require_admin_mode(&ctx, "Deleting an application")?;
                ctx.api.delete_application(id).await.map(|entry| {
                    notify::success(format!("Application \"{}\" deleted", entry.name));
                })
            }
            EntryAction::Promote => {
                require_admin_mode(&ctx, "Promoting an application")?;
                ctx.api.promote_application(id).await.map(|entry| {
                    notify::success(format!("\"{}\" is now the featured application", entry.name));
                })
            }
        };

        result.map_err(|err| {
            notify::failure(notify::describe_gateway_error(self.action.verb(), &err));
            err.into()
        })
    }
}

impl EntryAction {
    fn verb(self) -> &'static str {
        match self {
            EntryAction::Show | EntryAction::Open => "load the application",
            EntryAction::Delete => "delete the application",
            EntryAction::Promote => "promote the application",
        }
    }
}

pub fn render(entry: &CatalogEntry, admin_mode: bool) -> String {
    let mut out = String::new();
    let featured = if entry.is_featured() { " ⭐" } else { "" };
    let _ = writeln!(out, "{}{featured}", entry.name);
    let _ = writeln!(out, "Category: {}", entry.category);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", entry.description);
    if !entry.screenshots.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Screenshots:");
        for screenshot in &entry.screenshots {
            let _ = writeln!(out, "  {screenshot}");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Opens as {}", LaunchTarget::resolve(&entry.url));
    if admin_mode {
        let _ = writeln!(
            out,
            "Admin: edit {id}, promote {id}, delete {id}",
            id = entry.id
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fixtures::entry;
    use pretty_assertions::assert_eq;

    #[test]
    fn telegram_urls_stay_in_the_client() {
        assert_eq!(
            LaunchTarget::resolve("https://t.me/weather_bot/app"),
            LaunchTarget::Telegram("https://t.me/weather_bot/app".to_string())
        );
        assert_eq!(
            LaunchTarget::resolve("https://example.com/app"),
            LaunchTarget::External("https://example.com/app".to_string())
        );
    }

    #[test]
    fn details_list_admin_actions_only_in_admin_mode() {
        let mut shown = entry(3, "Weather", Some(1));
        shown.screenshots = vec!["https://cdn.example.com/1.png".to_string()];

        let page = render(&shown, false);
        assert_eq!(
            page,
            "Weather ⭐\nCategory: tools\n\nWeather description\n\n\
             Screenshots:\n  https://cdn.example.com/1.png\n\n\
             Opens as Telegram link https://t.me/x_bot/app\n"
        );
        assert!(render(&shown, true).ends_with("Admin: edit 3, promote 3, delete 3\n"));
    }
}
