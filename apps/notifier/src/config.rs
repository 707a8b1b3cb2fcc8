//! # Notifier 設定
//!
//! 環境変数から通知チャネルの設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `NOTIFICATION_BACKEND` | No | `email` | 送信チャネル（カンマ区切り: `email`, `slack`, `noop`） |
//! | `SMTP_SERVER` | email 時 | - | SMTP サーバーのホスト名 |
//! | `SMTP_PORT` | email 時 | - | SMTP ポート番号 |
//! | `EMAIL_USERNAME` | email 時 | - | 認証ユーザー（From / To アドレス） |
//! | `EMAIL_PASSWORD` | email 時 | - | 認証パスワード |
//! | `SLACK_WEBHOOK_URL` | slack 時 | - | Slack Incoming Webhook URL |
//! | `NOTIFY_ON_DOWNLOAD_COMPLETE` | No | `true` | 動画完了を通知するか |
//! | `NOTIFY_ON_QUEUE_COMPLETE` | No | `true` | キュー完了を通知するか |
//! | `NOTIFY_ON_THRESHOLD` | No | `true` | 容量しきい値を通知するか |
//! | `NOTIFY_ON_ERROR` | No | `true` | キュー失敗とエラーを通知するか |
//!
//! SMTP と Slack の値はここでは検証しない。未設定の場合は送信時にエラーになる。

use std::{env, str::FromStr};

use dlnotify_domain::{NotificationChannel, NotificationPreferences};
use dlnotify_infra::EmailConfig;
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 未知のチャネル名
    #[error("NOTIFICATION_BACKEND に未知のチャネルがあります: {0}")]
    UnknownBackend(String),

    /// チャネルが 1 つも指定されていない
    #[error("NOTIFICATION_BACKEND にチャネルが指定されていません")]
    NoBackend,

    /// 真偽値として解釈できない
    #[error("{var} は true / false で指定してください: {value}")]
    InvalidFlag { var: &'static str, value: String },
}

/// Notifier の設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// 送信チャネル（指定順、重複なし）
    pub backends:          Vec<NotificationChannel>,
    /// SMTP 設定（backend=email の場合に使用）
    pub email:             EmailConfig,
    /// Slack Webhook URL（backend=slack の場合に使用）
    pub slack_webhook_url: String,
    /// イベント種別ごとの送信可否
    pub preferences:       NotificationPreferences,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        let backends = env::var("NOTIFICATION_BACKEND").unwrap_or_else(|_| "email".to_string());

        Ok(Self {
            backends:          parse_backends(&backends)?,
            email:             EmailConfig::from_env(),
            slack_webhook_url: env::var("SLACK_WEBHOOK_URL").unwrap_or_default(),
            preferences:       NotificationPreferences {
                download_complete: flag_from_env("NOTIFY_ON_DOWNLOAD_COMPLETE")?,
                queue_complete:    flag_from_env("NOTIFY_ON_QUEUE_COMPLETE")?,
                threshold:         flag_from_env("NOTIFY_ON_THRESHOLD")?,
                error:             flag_from_env("NOTIFY_ON_ERROR")?,
            },
        })
    }
}

/// 未設定なら `true`
fn flag_from_env(var: &'static str) -> Result<bool, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_flag(var, &value),
        Err(_) => Ok(true),
    }
}

/// 真偽値の環境変数をパースする
///
/// 大文字小文字を区別せず `true`/`1`/`yes`/`on` と `false`/`0`/`no`/`off` を受け付ける。
/// 空文字列は `true` として扱う。
pub fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

/// カンマ区切りのチャネル一覧をパースする
///
/// 前後の空白と空要素は無視する。重複は最初の 1 つだけ残す。
pub fn parse_backends(value: &str) -> Result<Vec<NotificationChannel>, ConfigError> {
    let mut backends = Vec::new();

    for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let channel = NotificationChannel::from_str(name)
            .map_err(|_| ConfigError::UnknownBackend(name.to_string()))?;
        if !backends.contains(&channel) {
            backends.push(channel);
        }
    }

    if backends.is_empty() {
        return Err(ConfigError::NoBackend);
    }
    Ok(backends)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("email", vec![NotificationChannel::Email])]
    #[case("slack", vec![NotificationChannel::Slack])]
    #[case(" email , slack ", vec![NotificationChannel::Email, NotificationChannel::Slack])]
    #[case("slack,email,slack", vec![NotificationChannel::Slack, NotificationChannel::Email])]
    #[case("noop,", vec![NotificationChannel::Noop])]
    fn test_チャネル一覧をパースできる(
        #[case] value: &str,
        #[case] expected: Vec<NotificationChannel>,
    ) {
        assert_eq!(parse_backends(value).unwrap(), expected);
    }

    #[test]
    fn test_未知のチャネルはエラー() {
        assert_eq!(
            parse_backends("email,sms"),
            Err(ConfigError::UnknownBackend("sms".to_string()))
        );
    }

    #[rstest]
    #[case("")]
    #[case(" , ")]
    fn test_空の指定はエラー(#[case] value: &str) {
        assert_eq!(parse_backends(value), Err(ConfigError::NoBackend));
    }

    #[rstest]
    #[case("true", true)]
    #[case("1", true)]
    #[case(" Yes ", true)]
    #[case("ON", true)]
    #[case("", true)]
    #[case("false", false)]
    #[case("0", false)]
    #[case("No", false)]
    #[case("off", false)]
    fn test_真偽値をパースできる(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(parse_flag("NOTIFY_ON_ERROR", value), Ok(expected));
    }

    #[test]
    fn test_真偽値でない値はエラー() {
        assert_eq!(
            parse_flag("NOTIFY_ON_THRESHOLD", "sometimes"),
            Err(ConfigError::InvalidFlag {
                var:   "NOTIFY_ON_THRESHOLD",
                value: "sometimes".to_string(),
            })
        );
    }
}
