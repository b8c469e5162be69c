use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::errors::AppResult;
use crate::host::Host;

/// Opaque bearer token for the photo API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the secret out of logs; only show enough to correlate.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(4).collect();
        write!(f, "AccessToken({}…)", visible)
    }
}

/// Token acquisition with a short-lived process-wide cache.
///
/// Silent requests consult the cache before going to the identity layer;
/// every successful acquisition repopulates it, and `invalidate` clears it
/// and forwards to the host so the platform cache forgets the token too.
/// An invalidated token is therefore never handed out again.
pub struct TokenProvider<H: Host> {
    host: Arc<H>,
    cached: Mutex<Option<AccessToken>>,
}

impl<H: Host> TokenProvider<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            cached: Mutex::new(None),
        }
    }

    pub async fn get_token(&self, interactive: bool) -> AppResult<AccessToken> {
        if !interactive {
            if let Some(token) = self.cached.lock().await.clone() {
                log::debug!("Using cached access token");
                return Ok(token);
            }
        }

        let token = self.host.acquire_token(interactive).await?;
        *self.cached.lock().await = Some(token.clone());
        Ok(token)
    }

    /// Forget `token` locally and in the platform identity layer.
    /// Best-effort on the host side; a failure there is logged, not raised.
    pub async fn invalidate(&self, token: AccessToken) {
        let mut cached = self.cached.lock().await;
        if cached.as_ref() == Some(&token) {
            *cached = None;
        }
        drop(cached);

        if let Err(e) = self.host.invalidate_token(&token).await {
            log::warn!("Failed to invalidate token in identity layer: {}", e);
        }
    }
}
