//! Slack 通知実装
//!
//! Incoming Webhook に `{"text": message}` を POST する。
//! 200 以外のステータスはエラーとして扱う。

use std::{env, time::Duration};

use async_trait::async_trait;
use dlnotify_domain::{NotificationChannel, NotificationError};
use reqwest::StatusCode;
use serde::Serialize;

use super::Notification;

const SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SlackPayload<'a> {
    text: &'a str,
}

/// Slack 通知
///
/// Webhook URL は送信時に検証する。未設定なら
/// [`NotificationError::MissingConfig`] を返す。
#[derive(Debug, Clone)]
pub struct SlackNotification {
    client:      reqwest::Client,
    webhook_url: String,
}

impl SlackNotification {
    /// 新しい Slack 通知インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `webhook_url`: Slack Incoming Webhook の URL
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client:      reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }

    /// 環境変数 `SLACK_WEBHOOK_URL` から作成
    pub fn from_env() -> Self {
        Self::new(env::var(SLACK_WEBHOOK_URL).unwrap_or_default())
    }
}

#[async_trait]
impl Notification for SlackNotification {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::Slack
    }

    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        if self.webhook_url.is_empty() {
            return Err(NotificationError::MissingConfig(SLACK_WEBHOOK_URL));
        }

        let response = self
            .client
            .post(&self.webhook_url)
            .timeout(REQUEST_TIMEOUT)
            .json(&SlackPayload { text: message })
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            // 本文が読めなければ空文字列
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::WebhookRejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Slack 通知を送信");
        Ok(())
    }
}
