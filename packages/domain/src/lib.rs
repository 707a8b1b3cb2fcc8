//! # dlnotify ドメイン層
//!
//! ダウンロード通知に関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - 送信手段（SMTP, Webhook）の詳細に依存しない
//! - 送信の抽象（`Notification` トレイト）は infra 層が持ち、
//!   ここではエラー型と通知イベントのみを扱う
//!
//! ## モジュール構成
//!
//! - [`notification`] - 通知エラー、チャネル種別、ダウンロードイベント、通知設定
//! - [`secret`] - ログに出力してはならない設定値

pub mod notification;
pub mod secret;

pub use notification::{
    DownloadEvent,
    DownloadEventType,
    EMAIL_SUBJECT,
    NotificationChannel,
    NotificationError,
    NotificationPreferences,
    format_duration,
};
pub use secret::Secret;
