use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::host::{Host, InstallReason, MenuClick, MenuContext, MenuItem};
use crate::notifier::Notifier;
use crate::token::TokenProvider;
use crate::uploader::{PhotosClient, UploadOrchestrator, UploadOutcome};

pub const MENU_ID: &str = "SavetoGooglePhotos";
pub const MENU_TITLE: &str = "Save to Google Photos";

pub const INSTALL_NOTIFICATION_TITLE: &str = "Save to Google Photos";
pub const INSTALL_NOTIFICATION_BODY: &str = "Use this extension to easily save any image \
     from the web to your Google Photos with a single right click.";

pub const REAUTH_TITLE: &str = "Authentication Done";
pub const REAUTH_MESSAGE: &str = "please try again";

/// Owns the context-menu entry and the boundary between host events and the
/// upload flow. Errors that escape the orchestrator (no usable token) are
/// reduced here to one forced interactive refresh plus a retry notification.
pub struct MenuController<H: Host> {
    host: Arc<H>,
    tokens: Arc<TokenProvider<H>>,
    notifier: Notifier<H>,
    orchestrator: UploadOrchestrator<H>,
}

impl<H: Host> MenuController<H> {
    pub fn new(host: Arc<H>, config: &Config) -> AppResult<Self> {
        let tokens = Arc::new(TokenProvider::new(host.clone()));
        let notifier = Notifier::new(host.clone());
        let client = PhotosClient::new(config)?;
        let orchestrator = UploadOrchestrator::new(tokens.clone(), client, notifier.clone());

        Ok(Self {
            host,
            tokens,
            notifier,
            orchestrator,
        })
    }

    /// Install hook: register the single image-scoped menu entry, and on a
    /// fresh install (never on update/reload) introduce the feature once.
    pub async fn on_installed(&self, reason: InstallReason) -> AppResult<()> {
        self.host
            .register_menu(MenuItem {
                id: MENU_ID.to_string(),
                title: MENU_TITLE.to_string(),
                contexts: vec![MenuContext::Image],
            })
            .await?;
        log::info!("Registered context-menu entry '{}'", MENU_ID);

        if reason == InstallReason::Install {
            self.notifier
                .notify(INSTALL_NOTIFICATION_TITLE, INSTALL_NOTIFICATION_BODY)
                .await;
        }
        Ok(())
    }

    /// Click hook: dispatch the clicked image's URL into the upload flow.
    pub async fn on_menu_click(&self, click: MenuClick) {
        if click.menu_item_id != MENU_ID {
            return;
        }

        match self.orchestrator.run(&click.src_url).await {
            Ok(UploadOutcome::Succeeded) => {}
            Ok(UploadOutcome::Failed) => {
                // Terminal failure already notified by the orchestrator.
                log::error!("Upload of {} ended in failure", click.src_url);
            }
            Err(e) => {
                log::error!("Upload error: {}", e);
                // Force the consent flow now so the user's manual retry can
                // succeed silently, then tell them to retry.
                if let Err(auth_err) = self.tokens.get_token(true).await {
                    log::warn!("Interactive re-authentication failed: {}", auth_err);
                }
                self.notifier.notify(REAUTH_TITLE, REAUTH_MESSAGE).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, AppResult};
    use crate::token::AccessToken;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct MockHost {
        tokens: Mutex<VecDeque<Result<String, String>>>,
        acquire_flags: Mutex<Vec<bool>>,
        notifications: Mutex<Vec<(String, String)>>,
        menus: Mutex<Vec<MenuItem>>,
    }

    impl MockHost {
        fn with_tokens(tokens: Vec<Result<&str, &str>>) -> Arc<Self> {
            Arc::new(Self {
                tokens: Mutex::new(
                    tokens
                        .into_iter()
                        .map(|r| r.map(String::from).map_err(String::from))
                        .collect(),
                ),
                acquire_flags: Mutex::new(Vec::new()),
                notifications: Mutex::new(Vec::new()),
                menus: Mutex::new(Vec::new()),
            })
        }

        fn notifications(&self) -> Vec<(String, String)> {
            self.notifications.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Host for MockHost {
        async fn acquire_token(&self, interactive: bool) -> AppResult<AccessToken> {
            self.acquire_flags.lock().unwrap().push(interactive);
            match self.tokens.lock().unwrap().pop_front() {
                Some(Ok(token)) => Ok(AccessToken::new(token)),
                Some(Err(message)) => Err(AppError::Auth(message)),
                None => Err(AppError::auth("token script exhausted")),
            }
        }

        async fn invalidate_token(&self, _token: &AccessToken) -> AppResult<()> {
            Ok(())
        }

        async fn notify(&self, title: &str, message: &str) -> AppResult<()> {
            self.notifications
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
            Ok(())
        }

        async fn register_menu(&self, item: MenuItem) -> AppResult<()> {
            self.menus.lock().unwrap().push(item);
            Ok(())
        }
    }

    fn controller_for(host: &Arc<MockHost>, base_url: &str) -> MenuController<MockHost> {
        let mut config = Config::default();
        config.api_base_url = base_url.to_string();
        MenuController::new(host.clone(), &config).unwrap()
    }

    #[tokio::test]
    async fn test_install_registers_menu_and_notifies_once() {
        let host = MockHost::with_tokens(vec![]);
        let controller = controller_for(&host, "http://unused.example");

        controller.on_installed(InstallReason::Install).await.unwrap();

        let menus = host.menus.lock().unwrap().clone();
        assert_eq!(menus.len(), 1);
        assert_eq!(menus[0].id, MENU_ID);
        assert_eq!(menus[0].title, MENU_TITLE);
        assert_eq!(menus[0].contexts, vec![MenuContext::Image]);

        assert_eq!(
            host.notifications(),
            vec![(
                INSTALL_NOTIFICATION_TITLE.to_string(),
                INSTALL_NOTIFICATION_BODY.to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_update_registers_menu_without_notification() {
        let host = MockHost::with_tokens(vec![]);
        let controller = controller_for(&host, "http://unused.example");

        controller.on_installed(InstallReason::Update).await.unwrap();

        assert_eq!(host.menus.lock().unwrap().len(), 1);
        assert!(host.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_click_on_foreign_menu_item_is_ignored() {
        let host = MockHost::with_tokens(vec![]);
        let controller = controller_for(&host, "http://unused.example");

        controller
            .on_menu_click(MenuClick {
                menu_item_id: "SomeOtherEntry".to_string(),
                src_url: "http://example.com/img.png".to_string(),
            })
            .await;

        assert!(host.acquire_flags.lock().unwrap().is_empty());
        assert!(host.notifications().is_empty());
    }

    // Scenario B: silent acquisition fails, interactive is attempted once,
    // the retry notification is shown, and no network call is made.
    #[tokio::test]
    async fn test_auth_failure_forces_interactive_refresh_and_notifies() {
        let server = MockServer::start().await;
        let host = MockHost::with_tokens(vec![Err("no session"), Err("user cancelled")]);
        let controller = controller_for(&host, &server.uri());

        controller
            .on_menu_click(MenuClick {
                menu_item_id: MENU_ID.to_string(),
                src_url: format!("{}/img.png", server.uri()),
            })
            .await;

        assert_eq!(host.acquire_flags.lock().unwrap().clone(), vec![false, true]);
        assert_eq!(
            host.notifications(),
            vec![(REAUTH_TITLE.to_string(), REAUTH_MESSAGE.to_string())]
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_click_drives_full_upload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/uploads"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ut1"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/mediaItems:batchCreate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "newMediaItemResults": [{ "mediaItem": { "id": "m1" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let host = MockHost::with_tokens(vec![Ok("t1")]);
        let controller = controller_for(&host, &server.uri());

        controller
            .on_menu_click(MenuClick {
                menu_item_id: MENU_ID.to_string(),
                src_url: format!("{}/img.png", server.uri()),
            })
            .await;

        let notifications = host.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].0, "Success");
    }
}
