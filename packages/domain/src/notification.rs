//! # 通知
//!
//! ダウンロード通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`NotificationChannel`] | 通知チャネル | email / slack / noop |
//! | [`DownloadEvent`] | ダウンロードイベント | 6 種類: 動画完了、キュー完了、キュー失敗、新着検出、容量しきい値、エラー |
//! | [`NotificationPreferences`] | 通知設定 | イベント種別ごとの送信可否 |
//! | [`NotificationError`] | 通知送信エラー | 送信経路共通 |
//!
//! ## 設計方針
//!
//! - **enum による通知イベント**: 各バリアントが件名と本文の組を決める
//! - **本文はプレーンテキストのみ**: HTML やテンプレートエンジンは使わない
//! - **エラーは変換しない**: 送信ライブラリのエラー文言をそのまま保持する

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

/// メール通知の件名（固定）
pub const EMAIL_SUBJECT: &str = "YouTubeDownloader Notification";

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// `send` を実装していない型で送信しようとした
    #[error("send が実装されていません: {0}")]
    Unimplemented(&'static str),

    /// 必須の設定値が未設定または空
    #[error("設定値がありません: {0}")]
    MissingConfig(&'static str),

    /// 設定値が不正
    #[error("設定値が不正: {0}")]
    InvalidConfig(String),

    /// メッセージ構築に失敗
    #[error("メッセージ構築に失敗: {0}")]
    MessageBuild(String),

    /// 送信に失敗（接続、TLS、認証、転送）
    #[error("送信に失敗: {0}")]
    SendFailed(String),

    /// Webhook がエラーステータスを返した
    #[error("Webhook がエラーを返しました（status={status}）: {body}")]
    WebhookRejected { status: u16, body: String },
}

/// 通知チャネル
///
/// `NOTIFICATION_BACKEND` 環境変数の値。snake_case でパースされる。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationChannel {
    /// SMTP（STARTTLS）でメール送信
    Email,
    /// Slack Incoming Webhook
    Slack,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// ダウンロードイベント種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DownloadEventType {
    DownloadComplete,
    QueueCompleted,
    QueueFailed,
    MonitoringUpdate,
    SizeThreshold,
    Error,
}

/// ダウンロードイベント
///
/// 通知のきっかけとなる出来事。[`DownloadEvent::to_message`] で
/// チャネル共通のプレーンテキストに変換される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadEvent {
    /// 動画 1 本のダウンロード完了
    DownloadComplete {
        title:            String,
        file_size_mb:     f64,
        duration_seconds: f64,
    },
    /// キュー完了（失敗を含む場合もある）
    QueueCompleted {
        queue_title: String,
        completed:   u32,
        failed:      u32,
        total:       u32,
        duration:    String,
    },
    /// キュー全体の失敗
    QueueFailed { queue_title: String, error: String },
    /// 監視中のプレイリストで新着動画を検出
    MonitoringUpdate {
        playlist_title: String,
        new_videos:     u32,
    },
    /// 1 日のダウンロード容量がしきい値に到達
    SizeThreshold {
        threshold_mb:  u64,
        total_size_mb: f64,
    },
    /// ダウンロード処理中のエラー
    Error {
        error_type:    String,
        error_message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context:       Option<String>,
    },
}

impl DownloadEvent {
    /// イベント種別を返す
    pub fn event_type(&self) -> DownloadEventType {
        match self {
            Self::DownloadComplete { .. } => DownloadEventType::DownloadComplete,
            Self::QueueCompleted { .. } => DownloadEventType::QueueCompleted,
            Self::QueueFailed { .. } => DownloadEventType::QueueFailed,
            Self::MonitoringUpdate { .. } => DownloadEventType::MonitoringUpdate,
            Self::SizeThreshold { .. } => DownloadEventType::SizeThreshold,
            Self::Error { .. } => DownloadEventType::Error,
        }
    }

    /// 通知のタイトル行
    pub fn title(&self) -> String {
        match self {
            Self::DownloadComplete { title, .. } => format!("Download Complete: {title}"),
            Self::QueueCompleted {
                queue_title,
                failed,
                ..
            } => format!("Queue {}: {queue_title}", queue_status(*failed)),
            Self::QueueFailed { queue_title, .. } => format!("Queue Failed: {queue_title}"),
            Self::MonitoringUpdate { .. } => "New Videos Detected".to_string(),
            Self::SizeThreshold { threshold_mb, .. } => {
                format!("Download Size Alert: {threshold_mb} MB Reached")
            }
            Self::Error { error_type, .. } => format!("Error Alert: {error_type}"),
        }
    }

    /// 通知の本文（改行区切り）
    pub fn body(&self) -> String {
        match self {
            Self::DownloadComplete {
                title,
                file_size_mb,
                duration_seconds,
            } => format!(
                "Downloaded: {title}\n\
                 Size: {file_size_mb:.1} MB\n\
                 Duration: {}",
                format_duration(*duration_seconds)
            ),
            Self::QueueCompleted {
                queue_title,
                completed,
                failed,
                total,
                duration,
            } => format!(
                "Playlist: {queue_title}\n\
                 Status: {}\n\
                 Downloaded: {completed}/{total}\n\
                 Failed: {failed}\n\
                 Duration: {duration}",
                queue_status(*failed)
            ),
            Self::QueueFailed { queue_title, error } => {
                format!("Playlist: {queue_title}\nError: {error}")
            }
            Self::MonitoringUpdate {
                playlist_title,
                new_videos,
            } => format!("Playlist: {playlist_title}\nNew Videos: {new_videos}"),
            Self::SizeThreshold {
                threshold_mb,
                total_size_mb,
            } => format!(
                "Threshold: {threshold_mb} MB\nTotal Downloaded Today: {total_size_mb:.2} MB"
            ),
            Self::Error {
                error_type,
                error_message,
                context,
            } => {
                let mut body = format!("Error: {error_type}\n{error_message}");
                if let Some(context) = context.as_deref().filter(|c| !c.is_empty()) {
                    body.push_str("\nContext: ");
                    body.push_str(context);
                }
                body
            }
        }
    }

    /// チャネルに渡すメッセージ（タイトル + 空行 + 本文）
    pub fn to_message(&self) -> String {
        format!("{}\n\n{}", self.title(), self.body())
    }
}

/// 秒数を `1h 2m 3s` / `2m 3s` / `3s` 形式にする
///
/// 1 秒未満は切り捨てる。負数や NaN は 0 秒として扱う。
pub fn format_duration(seconds: f64) -> String {
    // `as` は飽和変換なので NaN と負数は 0 になる
    let total = seconds as u64;
    let (hours, minutes, secs) = (total / 3600, total % 3600 / 60, total % 60);

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// イベント種別ごとの送信可否
///
/// 新着検出は常に送信する。キュー失敗はエラー扱い。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPreferences {
    pub download_complete: bool,
    pub queue_complete:    bool,
    pub threshold:         bool,
    pub error:             bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            download_complete: true,
            queue_complete:    true,
            threshold:         true,
            error:             true,
        }
    }
}

impl NotificationPreferences {
    /// 指定の種別を通知するか
    pub fn allows(&self, event_type: DownloadEventType) -> bool {
        match event_type {
            DownloadEventType::DownloadComplete => self.download_complete,
            DownloadEventType::QueueCompleted => self.queue_complete,
            DownloadEventType::SizeThreshold => self.threshold,
            DownloadEventType::QueueFailed | DownloadEventType::Error => self.error,
            DownloadEventType::MonitoringUpdate => true,
        }
    }
}

fn queue_status(failed: u32) -> &'static str {
    if failed > 0 {
        "Completed with errors"
    } else {
        "Completed successfully"
    }
}
