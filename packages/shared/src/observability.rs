//! # Observability 基盤
//!
//! トレーシング初期化とログ出力形式の設定を提供する。
//!
//! ログは stderr に出力する（stdout は CLI の出力に使う）。
//! 形式は環境変数 `LOG_FORMAT` で切り替え、サービス名はルートスパン
//! （[`root_span`]）のフィールドとして全ログに付く。

use std::str::FromStr;

/// ログ出力形式
///
/// 環境変数 `LOG_FORMAT` で切り替える。大文字小文字は区別しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（ログ収集基盤向け）
    Json,
    /// 複数行の読みやすい形式
    #[default]
    Pretty,
    /// 1 イベント 1 行の短い形式
    Compact,
}

/// `LOG_FORMAT` の値が不正
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（ルートスパンの `service` フィールド）
    pub service_name:        String,
    /// ログ出力形式
    pub log_format:          LogFormat,
    /// 解釈できなかった `LOG_FORMAT` の値。初期化後に警告として出力する
    pub rejected_log_format: Option<String>,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            rejected_log_format: None,
        }
    }

    /// `LOG_FORMAT` の値から設定を作る
    ///
    /// 未設定なら [`LogFormat::Pretty`]。不正な値も Pretty にして、値を
    /// `rejected_log_format` に残す。
    pub fn from_log_format(service_name: impl Into<String>, log_format: Option<&str>) -> Self {
        let mut config = Self::new(service_name, LogFormat::default());
        if let Some(value) = log_format {
            match value.parse() {
                Ok(format) => config.log_format = format,
                Err(UnknownLogFormat(value)) => config.rejected_log_format = Some(value),
            }
        }
        config
    }

    /// 環境変数 `LOG_FORMAT` から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_log_format(service_name, std::env::var("LOG_FORMAT").ok().as_deref())
    }
}

/// サービス全体を包むスパン
///
/// このスパン内で出力したログには `service` フィールドが付く
/// （JSON では `span.service`）。
pub fn root_span(config: &TracingConfig) -> tracing::Span {
    tracing::info_span!("app", service = %config.service_name)
}

/// トレーシングを初期化する
///
/// `RUST_LOG` 環境変数でログレベルを制御可能。
/// 未設定の場合は `"info,dlnotify=debug"` をデフォルトとする。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,dlnotify=debug".into());

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt_layer
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => fmt_layer.pretty().boxed(),
        LogFormat::Compact => fmt_layer.compact().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    if let Some(value) = &config.rejected_log_format {
        tracing::warn!(log_format = %value, "LOG_FORMAT を解釈できないため pretty で出力");
    }
}
