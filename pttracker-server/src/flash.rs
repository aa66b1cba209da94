//! One-shot messages shown on the next rendered page.

use serde::Serialize;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Holds at most one pending message. Setting replaces whatever was pending;
/// `take` empties the slot.
#[derive(Debug, Default)]
pub struct FlashSlot {
    pending: Mutex<Option<Flash>>,
}

impl FlashSlot {
    pub async fn set(&self, kind: FlashKind, message: impl Into<String>) {
        *self.pending.lock().await = Some(Flash {
            kind,
            message: message.into(),
        });
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.set(FlashKind::Success, message).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.set(FlashKind::Error, message).await;
    }

    pub async fn take(&self) -> Option<Flash> {
        self.pending.lock().await.take()
    }
}
