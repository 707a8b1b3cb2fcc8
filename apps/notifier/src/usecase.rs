//! # ユースケース層
//!
//! 通知チャネルを束ねて送信するサービスを提供する。

pub mod notification;

pub use notification::{NotificationService, NotifySummary, build_channels};
