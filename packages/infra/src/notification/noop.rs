//! Noop 通知実装
//!
//! 実際には送信せず、ログ出力のみ行う。
//! 通知を無効化したいときやローカル動作確認で使用する。

use async_trait::async_trait;
use dlnotify_domain::{NotificationChannel, NotificationError};

use super::Notification;

/// Noop 通知（ログ出力のみ）
#[derive(Debug, Clone, Default)]
pub struct NoopNotification;

#[async_trait]
impl Notification for NoopNotification {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::Noop
    }

    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        tracing::info!(
            message_len = message.len(),
            "Noop: 通知送信をスキップ"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sendがエラーを返さない() {
        let result = NoopNotification.send("テスト").await;
        assert!(result.is_ok());
    }
}
