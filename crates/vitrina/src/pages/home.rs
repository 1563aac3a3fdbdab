use std::fmt::Write as _;

use anyhow::Context as _;
use async_trait::async_trait;
use vitrina_core::model::featured_entry;
use vitrina_core::{ApiClient, AuthorizedContext, CatalogEntry, ProtectedView, SessionError};

use super::PageResult;
use crate::notify;

/// `/`: featured entry, catalog list and the admin toggle.
pub struct HomePage {
    pub toggle_admin: bool,
}

#[async_trait]
impl ProtectedView<ApiClient> for HomePage {
    type Output = PageResult;

    async fn mount(self, ctx: AuthorizedContext<ApiClient>) -> PageResult {
        if self.toggle_admin {
            match ctx.session.toggle_admin_mode() {
                Ok(on) => notify::success(format!("Admin mode {}", if on { "on" } else { "off" })),
                Err(SessionError::NotAdmin(_)) => {
                    notify::failure("Only administrators can switch admin mode");
                }
                Err(err) => return Err(err).context("failed to switch admin mode"),
            }
        }

        let entries = match ctx.api.list_applications().await {
            Ok(entries) => entries,
            Err(err) => {
                let message = notify::describe_gateway_error("load the catalog", &err);
                notify::failure(&message);
                return Err(err.into());
            }
        };

        print!(
            "{}",
            render(&entries, ctx.identity.is_admin, ctx.session.admin_mode())
        );
        Ok(())
    }
}

pub fn render(entries: &[CatalogEntry], is_admin: bool, admin_mode: bool) -> String {
    let mut out = String::new();

    if let Some(featured) = featured_entry(entries) {
        let _ = writeln!(out, "⭐ {} [{}]", featured.name, featured.category);
        let _ = writeln!(out, "   {}", featured.summary());
        let _ = writeln!(out);
    }

    if entries.is_empty() {
        let _ = writeln!(out, "The catalog is empty.");
    }
    for entry in entries {
        let _ = writeln!(out, "#{:<4} {} [{}]: {}", entry.id, entry.name, entry.category, entry.summary());
    }

    if is_admin {
        let _ = writeln!(out);
        let _ = writeln!(out, "Admin mode: {}", if admin_mode { "on" } else { "off" });
        if admin_mode {
            let _ = writeln!(
                out,
                "Actions: create, edit <id>, promote <id>, delete <id>, broadcast"
            );
        }
    }
    out
}
