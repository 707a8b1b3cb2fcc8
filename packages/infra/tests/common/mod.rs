//! 統合テスト共通ヘルパー
//!
//! ローカルで動く最小限の SMTP サーバーを提供する。受信したコマンドを記録し、
//! どこまで手順が進んだか（AUTH, MAIL FROM, DATA）を確認できる。
//!
//! - [`FakeSmtpServer::refusing_starttls`]: STARTTLS を広告するが 454 で拒否する
//! - [`FakeSmtpServer::rejecting_auth`]: 自己署名証明書で STARTTLS に応じ、AUTH を 535 で拒否する

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpListener,
    task::JoinHandle,
};
use tokio_rustls::{
    TlsAcceptor,
    rustls::{
        ServerConfig,
        crypto::ring,
        pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer},
    },
};

type Commands = Arc<Mutex<Vec<String>>>;

/// 1 接続だけ受け付けるテスト用 SMTP サーバー
pub struct FakeSmtpServer {
    pub addr: SocketAddr,
    commands: Commands,
    handle:   JoinHandle<()>,
}

impl FakeSmtpServer {
    /// STARTTLS を拒否するサーバー
    pub async fn refusing_starttls() -> Self {
        Self::spawn(None).await
    }

    /// TLS 接続後の AUTH を拒否するサーバー
    pub async fn rejecting_auth() -> Self {
        Self::spawn(Some(self_signed_acceptor())).await
    }

    async fn spawn(acceptor: Option<TlsAcceptor>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("テスト用 SMTP サーバーの bind に失敗");
        let addr = listener.local_addr().expect("ローカルアドレスの取得に失敗");
        let commands = Commands::default();
        let recorded = Arc::clone(&commands);

        let handle = tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            if stream.write_all(b"220 fake ESMTP ready\r\n").await.is_err() {
                return;
            }

            let Session::StartTls(stream) =
                converse(stream, acceptor.is_some(), false, &recorded).await
            else {
                return;
            };
            let Some(acceptor) = acceptor else {
                return;
            };
            let Ok(tls) = acceptor.accept(stream).await else {
                return;
            };
            converse(tls, false, true, &recorded).await;
        });

        Self {
            addr,
            commands,
            handle,
        }
    }

    /// 接続終了を待ち、受信したコマンドを返す
    pub async fn into_commands(self) -> Vec<String> {
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
        self.commands.lock().unwrap().clone()
    }
}

enum Session<S> {
    StartTls(S),
    Closed,
}

/// コマンドを 1 行ずつ読んで応答する
///
/// STARTTLS に応じた場合は TLS ハンドシェイクのためにストリームを返す。
async fn converse<S>(
    stream: S,
    accept_starttls: bool,
    secured: bool,
    recorded: &Commands,
) -> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        match stream.read_line(&mut line).await {
            Ok(0) | Err(_) => return Session::Closed,
            Ok(_) => {}
        }
        let command = line.trim_end().to_string();
        recorded.lock().unwrap().push(command.clone());

        let verb = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        let reply: &[u8] = match verb.as_str() {
            "EHLO" if secured => b"250-fake\r\n250 AUTH PLAIN LOGIN\r\n",
            "EHLO" => b"250-fake\r\n250-STARTTLS\r\n250 AUTH PLAIN LOGIN\r\n",
            "STARTTLS" if accept_starttls => {
                if respond(&mut stream, b"220 2.0.0 ready to start TLS\r\n").await {
                    // クライアントは 220 を受け取るまで送信しないので読み残しはない
                    return Session::StartTls(stream.into_inner());
                }
                return Session::Closed;
            }
            "STARTTLS" => b"454 4.7.0 TLS not available\r\n",
            "AUTH" => b"535 5.7.8 authentication credentials invalid\r\n",
            "QUIT" => {
                respond(&mut stream, b"221 2.0.0 bye\r\n").await;
                return Session::Closed;
            }
            _ => b"502 5.5.2 command not recognized\r\n",
        };
        if !respond(&mut stream, reply).await {
            return Session::Closed;
        }
    }
}

async fn respond<S>(stream: &mut S, bytes: &[u8]) -> bool
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(bytes).await.is_ok() && stream.flush().await.is_ok()
}

/// localhost 向けの自己署名証明書で TLS を受け付ける
fn self_signed_acceptor() -> TlsAcceptor {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
            .expect("自己署名証明書の生成に失敗");
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .expect("TLS バージョンの設定に失敗")
        .with_no_client_auth()
        .with_single_cert(vec![cert.der().clone()], key)
        .expect("サーバー証明書の設定に失敗");

    TlsAcceptor::from(Arc::new(config))
}

/// 何も待ち受けていないポートを返す
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ポートの確保に失敗");
    listener
        .local_addr()
        .expect("ローカルアドレスの取得に失敗")
        .port()
}
