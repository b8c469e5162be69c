//! Platform host abstraction.
//!
//! The browser capabilities this service depends on (identity, notifications,
//! context menus) are narrow enough to sit behind a single trait, so the menu
//! and upload logic can be exercised against a recording fake in tests.

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::token::AccessToken;

/// Why the install hook fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    /// First install; the one-time feature notification is shown.
    Install,
    /// Update or reload of an existing install.
    Update,
}

/// Contexts a menu entry is visible in. Only images matter here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuContext {
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

/// A click on a registered context-menu entry.
#[derive(Debug, Clone)]
pub struct MenuClick {
    pub menu_item_id: String,
    /// Source URL of the image the user right-clicked.
    pub src_url: String,
}

/// The platform capabilities the service consumes.
#[async_trait]
pub trait Host: Send + Sync {
    /// Obtain a bearer token. Silent acquisition (`interactive == false`)
    /// must not prompt and fails when no cached credential exists;
    /// interactive acquisition may present a consent flow.
    async fn acquire_token(&self, interactive: bool) -> AppResult<AccessToken>;

    /// Tell the identity layer to forget a token so a later acquisition
    /// cannot return it again.
    async fn invalidate_token(&self, token: &AccessToken) -> AppResult<()>;

    /// Show a basic notification.
    async fn notify(&self, title: &str, message: &str) -> AppResult<()>;

    /// Register a context-menu entry.
    async fn register_menu(&self, item: MenuItem) -> AppResult<()>;
}
