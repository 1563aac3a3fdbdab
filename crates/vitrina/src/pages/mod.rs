//! Storefront pages
//!
//! Each page is a [`ProtectedView`] and only runs once the route guard has
//! authorized the session. Pages print their own outcome lines and return
//! an error when the action failed.

pub mod application;
pub mod broadcast;
pub mod editor;
pub mod home;
pub mod unauthorized;

use anyhow::bail;
use async_trait::async_trait;
use vitrina_core::{ApiClient, AuthorizedContext, ProtectedView, Route};

use crate::notify;

pub use application::{ApplicationPage, EntryAction};
pub use broadcast::BroadcastPage;
pub use editor::{CreatePage, EditPage};
pub use home::HomePage;

pub type PageResult = anyhow::Result<()>;

pub enum Page {
    Home(HomePage),
    Application(ApplicationPage),
    Create(CreatePage),
    Edit(EditPage),
    Broadcast(BroadcastPage),
}

impl Page {
    pub fn route(&self) -> Route {
        match self {
            Page::Home(_) => Route::Home,
            Page::Application(page) => Route::Application { id: page.id },
            Page::Create(_) => Route::CreateApplication,
            Page::Edit(page) => Route::EditApplication { id: page.id },
            Page::Broadcast(_) => Route::BroadcastMessage,
        }
    }
}

#[async_trait]
impl ProtectedView<ApiClient> for Page {
    type Output = PageResult;

    async fn mount(self, ctx: AuthorizedContext<ApiClient>) -> PageResult {
        let route = self.route();
        if route.requires_admin_mode() {
            require_admin_mode(&ctx, &route.path())?;
        }
        tracing::debug!(route = %route, user_id = ctx.identity.id, "Page mounted");

        match self {
            Page::Home(page) => page.mount(ctx).await,
            Page::Application(page) => page.mount(ctx).await,
            Page::Create(page) => page.mount(ctx).await,
            Page::Edit(page) => page.mount(ctx).await,
            Page::Broadcast(page) => page.mount(ctx).await,
        }
    }
}

/// Refuses catalog management while admin mode is off.
pub fn require_admin_mode(ctx: &AuthorizedContext<ApiClient>, what: &str) -> PageResult {
    if ctx.session.admin_mode() {
        return Ok(());
    }
    let hint = if ctx.identity.is_admin {
        "turn it on with `vitrina home --toggle-admin`"
    } else {
        "only administrators can use it"
    };
    notify::failure(format!("{what} requires admin mode; {hint}"));
    bail!("admin mode is off")
}
