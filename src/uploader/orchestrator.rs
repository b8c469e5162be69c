use std::sync::Arc;

use crate::errors::AppResult;
use crate::host::Host;
use crate::notifier::Notifier;
use crate::token::{AccessToken, TokenProvider};

use super::photos_client::{MediaItemResult, PhotosClient};

pub const SUCCESS_TITLE: &str = "Success";
pub const SUCCESS_MESSAGE: &str = "Image uploaded to Google Photos.";
pub const FAILURE_TITLE: &str = "Upload Failed";

/// Terminal state of one upload attempt chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded,
    Failed,
}

/// Drives one upload: token, fetch, raw upload, media-item creation.
///
/// Retry policy: a 401 from either authenticated call invalidates the token
/// and replays the whole fetch/upload/create sequence exactly once with an
/// interactively acquired token. Any other failure ends the flow immediately.
/// Both terminal states notify the user; the only error that escapes `run`
/// is a failed silent token acquisition, which the menu boundary handles.
pub struct UploadOrchestrator<H: Host> {
    tokens: Arc<TokenProvider<H>>,
    client: PhotosClient,
    notifier: Notifier<H>,
}

impl<H: Host> UploadOrchestrator<H> {
    pub fn new(tokens: Arc<TokenProvider<H>>, client: PhotosClient, notifier: Notifier<H>) -> Self {
        Self {
            tokens,
            client,
            notifier,
        }
    }

    pub async fn run(&self, src_url: &str) -> AppResult<UploadOutcome> {
        let token = self.tokens.get_token(false).await?;
        log::info!("Starting upload of {}", src_url);

        match self.upload_once(src_url, &token).await {
            Ok(_) => {
                log::info!("Upload of {} succeeded", src_url);
                self.notifier.notify(SUCCESS_TITLE, SUCCESS_MESSAGE).await;
                Ok(UploadOutcome::Succeeded)
            }
            Err(e) if e.is_auth_failure() => {
                log::info!("Photo API returned 401, re-authenticating and replaying once");
                self.tokens.invalidate(token).await;

                match self.replay(src_url).await {
                    Ok(_) => {
                        log::info!("Replay of {} succeeded", src_url);
                        self.notifier.notify(SUCCESS_TITLE, SUCCESS_MESSAGE).await;
                        Ok(UploadOutcome::Succeeded)
                    }
                    Err(replay_err) => {
                        log::error!("Replay of {} failed: {}", src_url, replay_err);
                        self.notifier
                            .notify(FAILURE_TITLE, &replay_err.to_string())
                            .await;
                        Ok(UploadOutcome::Failed)
                    }
                }
            }
            Err(e) => {
                log::error!("Upload of {} failed: {}", src_url, e);
                self.notifier.notify(FAILURE_TITLE, &e.to_string()).await;
                Ok(UploadOutcome::Failed)
            }
        }
    }

    /// The single permitted retry: interactive token, then the same sequence.
    async fn replay(&self, src_url: &str) -> AppResult<MediaItemResult> {
        let token = self.tokens.get_token(true).await?;
        self.upload_once(src_url, &token).await
    }

    async fn upload_once(
        &self,
        src_url: &str,
        token: &AccessToken,
    ) -> AppResult<MediaItemResult> {
        let blob = self.client.fetch_image(src_url).await?;
        let upload_token = self.client.upload_bytes(&blob, token).await?;
        self.client.create_media_item(upload_token, token).await
    }
}
