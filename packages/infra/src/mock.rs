//! # テスト用モック通知
//!
//! サービス層のテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! dlnotify-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dlnotify_domain::{NotificationChannel, NotificationError};

use crate::notification::Notification;

// ===== MockNotification =====

#[derive(Clone)]
pub struct MockNotification {
    channel: NotificationChannel,
    fail:    bool,
    sent:    Arc<Mutex<Vec<String>>>,
}

impl MockNotification {
    /// 常に成功するモック
    pub fn new(channel: NotificationChannel) -> Self {
        Self {
            channel,
            fail: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 常に `SendFailed` を返すモック（何も記録しない）
    pub fn failing(channel: NotificationChannel) -> Self {
        Self {
            fail: true,
            ..Self::new(channel)
        }
    }

    /// 送信されたメッセージ一覧
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notification for MockNotification {
    fn channel(&self) -> NotificationChannel {
        self.channel
    }

    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::SendFailed(format!(
                "mock {} failure",
                self.channel
            )));
        }
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
