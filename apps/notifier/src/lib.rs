//! # dlnotify Notifier
//!
//! ダウンロード通知を送信するアプリケーション層。
//! `notify` バイナリと、他のプログラムから使うための [`NotificationService`] を提供する。
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`usecase`] - チャネルを束ねる通知サービス
//! - [`cli`] - `notify` コマンドの引数解析

pub mod cli;
pub mod config;
pub mod usecase;

pub use config::{ConfigError, NotifierConfig};
pub use usecase::{NotificationService, NotifySummary};
