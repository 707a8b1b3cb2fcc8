//! # notify
//!
//! ダウンロード通知をコマンドラインから送信する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `NOTIFICATION_BACKEND` | No | 送信チャネル（デフォルト: `email`） |
//! | `SMTP_SERVER` / `SMTP_PORT` | email 時 | SMTP サーバー |
//! | `EMAIL_USERNAME` / `EMAIL_PASSWORD` | email 時 | 認証情報（宛先も兼ねる） |
//! | `SLACK_WEBHOOK_URL` | slack 時 | Slack Incoming Webhook |
//! | `NOTIFY_ON_*` | No | イベント種別ごとの送信可否（デフォルト: `true`） |
//! | `LOG_FORMAT` | No | `json` / `pretty` / `compact`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p dlnotify-notifier -- "Download complete"
//! echo "Download complete" | cargo run -p dlnotify-notifier
//! cargo run -p dlnotify-notifier -- --event '{"type":"monitoring_update","playlist_title":"Talks","new_videos":2}'
//! ```

use std::io;

use anyhow::Context as _;
use dlnotify_notifier::{
    NotificationService,
    NotifierConfig,
    cli::{self, Command},
};
use dlnotify_shared::{TracingConfig, observability};
use tracing::Instrument as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("notify");
    observability::init_tracing(&tracing_config);

    run()
        .instrument(observability::root_span(&tracing_config))
        .await
}

async fn run() -> anyhow::Result<()> {
    match cli::parse_args(std::env::args().skip(1))? {
        Command::Help => println!("{}", cli::USAGE),
        Command::Message(message) => build_service()?.send_message(&message).await?,
        Command::Stdin => {
            let input = io::read_to_string(io::stdin()).context("標準入力の読み込みに失敗")?;
            build_service()?
                .send_message(cli::trim_stdin_message(&input))
                .await?;
        }
        Command::Event(event) => {
            let summary = build_service()?.notify(&event).await;
            if summary.skipped {
                tracing::info!(
                    event_type = %event.event_type(),
                    "通知設定で無効なイベントのため送信しませんでした"
                );
            }
            if summary.failed > 0 {
                anyhow::bail!(
                    "{} / {} チャネルで送信に失敗しました",
                    summary.failed,
                    summary.sent + summary.failed
                );
            }
        }
    }

    Ok(())
}

/// 環境変数の設定から通知サービスを構築する
fn build_service() -> anyhow::Result<NotificationService> {
    let config = NotifierConfig::from_env()?;
    tracing::debug!(backends = ?config.backends, "通知チャネルを構築");
    Ok(NotificationService::from_config(&config))
}
