//! # 通知送信
//!
//! 通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `Notification` trait で送信経路を抽象化
//! - **3 つの実装**: Email（SMTP + STARTTLS）、Slack（Incoming Webhook）、Noop
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択（notifier 側）
//! - **1 送信 1 接続**: 接続プールを持たず、送信ごとに接続して閉じる

mod email;
mod noop;
mod slack;

use async_trait::async_trait;
use dlnotify_domain::{NotificationChannel, NotificationError};
pub use email::{EmailConfig, EmailNotification};
pub use noop::NoopNotification;
pub use slack::SlackNotification;

/// 通知送信トレイト
///
/// 通知基盤の中核。メッセージを何らかのチャネルで届ける。
///
/// `send` のデフォルト実装は何も送信せず
/// [`NotificationError::Unimplemented`] を返す。
#[async_trait]
pub trait Notification: Send + Sync {
    /// 送信チャネル（ログ出力用）
    fn channel(&self) -> NotificationChannel;

    /// メッセージを送信する
    ///
    /// 送信が完了するまで戻らない。失敗は呼び出し元へそのまま返す（リトライしない）。
    async fn send(&self, _message: &str) -> Result<(), NotificationError> {
        Err(NotificationError::Unimplemented(std::any::type_name::<Self>()))
    }
}
