//! SMTP メール通知実装
//!
//! lettre の `AsyncSmtpTransport` で STARTTLS 接続し、認証してから送信する。
//! 宛先は送信元と同じアカウント（自分宛て通知）。
//!
//! 接続プールは使わない。送信ごとに接続を開き、送信後（失敗時も）に
//! トランスポートの破棄で接続が閉じられる。

use std::env;

use async_trait::async_trait;
use dlnotify_domain::{EMAIL_SUBJECT, NotificationChannel, NotificationError, Secret};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};

use super::Notification;

const SMTP_SERVER: &str = "SMTP_SERVER";
const SMTP_PORT: &str = "SMTP_PORT";
const EMAIL_USERNAME: &str = "EMAIL_USERNAME";
const EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";

/// SMTP 接続設定
///
/// 値の検証は送信時に行う。未設定の環境変数は空文字列として保持する。
#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    /// SMTP サーバーのホスト名（例: "smtp.example.com"）
    pub smtp_server: String,
    /// SMTP ポート（例: "587"）。送信時に数値として解釈する
    pub smtp_port:   String,
    /// 認証ユーザー。From / To アドレスとしても使う
    pub username:    String,
    /// 認証パスワード
    pub password:    Secret,
}

impl EmailConfig {
    /// 環境変数から設定を読み込む
    ///
    /// 失敗しない。未設定の値は送信時に [`NotificationError::MissingConfig`] になる。
    pub fn from_env() -> Self {
        fn var(key: &str) -> String {
            env::var(key).unwrap_or_default()
        }

        Self {
            smtp_server: var(SMTP_SERVER),
            smtp_port:   var(SMTP_PORT),
            username:    var(EMAIL_USERNAME),
            password:    Secret::new(var(EMAIL_PASSWORD)),
        }
    }

    /// 4 つの値がすべて揃っていることを確認し、ポート番号を返す
    fn validate(&self) -> Result<u16, NotificationError> {
        if self.smtp_server.is_empty() {
            return Err(NotificationError::MissingConfig(SMTP_SERVER));
        }
        if self.smtp_port.is_empty() {
            return Err(NotificationError::MissingConfig(SMTP_PORT));
        }
        if self.username.is_empty() {
            return Err(NotificationError::MissingConfig(EMAIL_USERNAME));
        }
        if self.password.is_empty() {
            return Err(NotificationError::MissingConfig(EMAIL_PASSWORD));
        }

        self.smtp_port.trim().parse().map_err(|e| {
            NotificationError::InvalidConfig(format!("{SMTP_PORT}={:?}: {e}", self.smtp_port))
        })
    }
}

/// SMTP メール通知
///
/// 構築時に設定を受け取り、以後は変更しない。同じインスタンスで何度でも送信できる。
#[derive(Debug, Clone)]
pub struct EmailNotification {
    config:               EmailConfig,
    accept_invalid_certs: bool,
}

impl EmailNotification {
    /// 新しい SMTP 通知インスタンスを作成
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            accept_invalid_certs: false,
        }
    }

    /// サーバー証明書を検証しない（自己署名証明書のテストサーバー用）
    #[cfg(any(test, feature = "test-utils"))]
    pub fn accepting_invalid_certs(mut self) -> Self {
        self.accept_invalid_certs = true;
        self
    }

    /// 環境変数（`SMTP_SERVER`, `SMTP_PORT`, `EMAIL_USERNAME`, `EMAIL_PASSWORD`）から作成
    pub fn from_env() -> Self {
        Self::new(EmailConfig::from_env())
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// 送信するメールを組み立てる
    ///
    /// multipart/mixed にプレーンテキストのパートを 1 つだけ持つ。
    /// From と To はどちらも `username`、件名は [`EMAIL_SUBJECT`]。
    pub fn compose(&self, message: &str) -> Result<Message, NotificationError> {
        let mailbox: Mailbox = self.config.username.parse().map_err(|e| {
            NotificationError::InvalidConfig(format!(
                "{EMAIL_USERNAME} はメールアドレスである必要があります: {e}"
            ))
        })?;

        Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(EMAIL_SUBJECT)
            .multipart(MultiPart::mixed().singlepart(SinglePart::plain(message.to_string())))
            .map_err(|e| NotificationError::MessageBuild(e.to_string()))
    }

    /// STARTTLS 必須・認証付きのトランスポートを作る
    ///
    /// プールは持たないので、破棄と同時に接続が閉じる。
    fn transport(
        &self,
        port: u16,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotificationError> {
        let tls = TlsParameters::builder(self.config.smtp_server.clone())
            .dangerous_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;
        let credentials = Credentials::new(
            self.config.username.clone(),
            self.config.password.expose().to_string(),
        );

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_server)
                .port(port)
                .tls(Tls::Required(tls))
                .credentials(credentials)
                .build(),
        )
    }
}

#[async_trait]
impl Notification for EmailNotification {
    fn channel(&self) -> NotificationChannel {
        NotificationChannel::Email
    }

    async fn send(&self, message: &str) -> Result<(), NotificationError> {
        let port = self.config.validate()?;
        let email = self.compose(message)?;

        let transport = self.transport(port)?;

        tracing::debug!(
            smtp_server = %self.config.smtp_server,
            smtp_port = port,
            "SMTP 送信を開始"
        );

        transport
            .send(email)
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        tracing::info!(
            smtp_server = %self.config.smtp_server,
            to = %self.config.username,
            "メール通知を送信"
        );

        Ok(())
    }
}
