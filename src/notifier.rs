use std::sync::Arc;

use crate::host::Host;

/// Best-effort desktop notifications. A host that cannot display them must
/// never break an upload flow, so failures degrade to a log line.
pub struct Notifier<H: Host> {
    host: Arc<H>,
}

impl<H: Host> Clone for Notifier<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
        }
    }
}

impl<H: Host> Notifier<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    pub async fn notify(&self, title: &str, message: &str) {
        if let Err(e) = self.host.notify(title, message).await {
            log::warn!(
                "Failed to show notification '{}' (non-critical): {}",
                title,
                e
            );
        }
    }
}
