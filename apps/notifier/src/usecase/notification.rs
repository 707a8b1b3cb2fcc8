//! # 通知サービス
//!
//! 設定されたチャネルすべてにメッセージを送信する。
//!
//! ## 設計方針
//!
//! - **`send_message`**: 失敗を呼び出し元に返す。全チャネルを試したうえで最初のエラーを返す
//! - **`notify`**: fire-and-forget。ダウンロードイベントを送信し、失敗してもエラーを返さない。
//!   通知設定で無効な種別は送信しない
//! - **依存性注入**: チャネルは `Arc<dyn Notification>` で受け取る

use std::sync::Arc;

use dlnotify_domain::{
    DownloadEvent,
    NotificationChannel,
    NotificationError,
    NotificationPreferences,
};
use dlnotify_infra::{EmailNotification, NoopNotification, Notification, SlackNotification};
use dlnotify_shared::{event_log::event, log_business_event};

use crate::config::NotifierConfig;

/// 設定からチャネルを構築する
///
/// 構築は失敗しない。設定値の不足は送信時にエラーになる。
pub fn build_channels(config: &NotifierConfig) -> Vec<Arc<dyn Notification>> {
    config
        .backends
        .iter()
        .map(|backend| -> Arc<dyn Notification> {
            match backend {
                NotificationChannel::Email => {
                    Arc::new(EmailNotification::new(config.email.clone()))
                }
                NotificationChannel::Slack => {
                    Arc::new(SlackNotification::new(config.slack_webhook_url.clone()))
                }
                NotificationChannel::Noop => Arc::new(NoopNotification),
            }
        })
        .collect()
}

/// `notify` の送信結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifySummary {
    pub sent:    usize,
    pub failed:  usize,
    /// 通知設定により送信しなかった
    pub skipped: bool,
}

/// 通知サービス
pub struct NotificationService {
    channels:    Vec<Arc<dyn Notification>>,
    preferences: NotificationPreferences,
}

impl NotificationService {
    /// すべてのイベント種別を通知するサービスを作成
    pub fn new(channels: Vec<Arc<dyn Notification>>) -> Self {
        Self {
            channels,
            preferences: NotificationPreferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: NotificationPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn from_config(config: &NotifierConfig) -> Self {
        Self::new(build_channels(config)).with_preferences(config.preferences)
    }

    /// 設定されているチャネル
    pub fn channels(&self) -> Vec<NotificationChannel> {
        self.channels.iter().map(|c| c.channel()).collect()
    }

    /// メッセージを全チャネルに送信する
    ///
    /// チャネルは指定順に 1 つずつ送信する。失敗したチャネルがあっても残りを試し、
    /// 最初のエラーをそのまま返す。
    pub async fn send_message(&self, message: &str) -> Result<(), NotificationError> {
        let mut first_error = None;

        for notification in &self.channels {
            if let Err(e) = notification.send(message).await {
                tracing::error!(
                    channel = %notification.channel(),
                    error = %e,
                    "通知の送信に失敗"
                );
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// ダウンロードイベントを通知する（fire-and-forget）
    ///
    /// いずれのチャネルで失敗してもエラーを返さない（ログ出力のみ）。
    /// 通知設定で無効な種別はどのチャネルにも送らない。
    pub async fn notify(&self, download_event: &DownloadEvent) -> NotifySummary {
        let kind = download_event.event_type();
        let event_type: &str = kind.into();
        if !self.preferences.allows(kind) {
            tracing::debug!(event_type, "通知設定により送信をスキップ");
            return NotifySummary {
                skipped: true,
                ..NotifySummary::default()
            };
        }

        let message = download_event.to_message();
        let mut summary = NotifySummary::default();

        for notification in &self.channels {
            let channel: &str = notification.channel().into();
            match notification.send(&message).await {
                Ok(()) => {
                    log_business_event!(
                        event.category = event::category::NOTIFICATION,
                        event.action = event::action::NOTIFICATION_SENT,
                        event.result = event::result::SUCCESS,
                        notification.channel = channel,
                        notification.event_type = event_type,
                        "通知送信成功"
                    );
                    summary.sent += 1;
                }
                Err(e) => {
                    log_business_event!(
                        event.category = event::category::NOTIFICATION,
                        event.action = event::action::NOTIFICATION_FAILED,
                        event.result = event::result::FAILURE,
                        notification.channel = channel,
                        notification.event_type = event_type,
                        error = %e,
                        "通知送信失敗"
                    );
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}
