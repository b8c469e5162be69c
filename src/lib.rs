//! Save a right-clicked web image to Google Photos.
//!
//! The library implements the whole flow against an abstract [`host::Host`]:
//! a context-menu entry is registered at install time, a click on an image
//! fetches its bytes and runs the two-call upload protocol (raw upload, then
//! mediaItems:batchCreate), and the user is told how it went. A 401 from the
//! photo API invalidates the bearer token and replays the upload exactly once
//! with a fresh interactive token.

pub mod config;
pub mod errors;
pub mod host;
pub mod menu;
pub mod notifier;
pub mod token;
pub mod uploader;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use host::{Host, InstallReason, MenuClick, MenuContext, MenuItem};
pub use menu::MenuController;
pub use notifier::Notifier;
pub use token::{AccessToken, TokenProvider};
pub use uploader::{PhotosClient, UploadOrchestrator, UploadOutcome};
