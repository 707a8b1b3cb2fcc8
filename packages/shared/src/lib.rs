//! # dlnotify 共有ユーティリティ
//!
//! ダウンロード通知ワークスペース全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, notifier）から依存される
//! - 通知ロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える（tracing-subscriber は feature で切替）

pub mod event_log;
pub mod observability;

pub use observability::{LogFormat, TracingConfig, root_span};
