//! # dlnotify インフラ層
//!
//! 外部システム（SMTP サーバー、Slack）への通知送信を担当する。
//!
//! ## 設計方針
//!
//! このクレートはドメイン層の型（[`NotificationError`] など）を使って
//! [`Notification`] トレイトとその具体実装を提供する。送信手段の詳細を
//! カプセル化し、呼び出し側はトレイトだけに依存する。
//!
//! ## 依存関係
//!
//! ```text
//! notifier → infra → domain
//!     ↘               ↗
//!       shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`notification`] - 通知トレイトと実装（Email / Slack / Noop）
//! - `mock` - テスト用モック（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use dlnotify_infra::notification::{EmailNotification, Notification};
//!
//! async fn example() -> Result<(), dlnotify_domain::NotificationError> {
//!     let notification = EmailNotification::from_env();
//!     notification.send("Download complete").await
//! }
//! ```
//!
//! [`NotificationError`]: dlnotify_domain::NotificationError

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;

pub use notification::{
    EmailConfig,
    EmailNotification,
    NoopNotification,
    Notification,
    SlackNotification,
};
