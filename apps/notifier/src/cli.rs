//! # コマンドライン引数
//!
//! ```text
//! notify [MESSAGE...]      引数を空白で連結して送信（省略時は標準入力）
//! notify --event <JSON>    ダウンロードイベントを通知
//! notify --help
//! ```

use dlnotify_domain::DownloadEvent;
use thiserror::Error;

pub const USAGE: &str = "\
usage: notify [MESSAGE...]
       notify --event <JSON>

MESSAGE を省略すると標準入力を本文として送信する。
JSON 例: {\"type\":\"queue_failed\",\"queue_title\":\"Mix\",\"error\":\"HTTP 429\"}";

/// 実行するコマンド
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// 引数のメッセージを送信
    Message(String),
    /// 標準入力を読んで送信
    Stdin,
    /// ダウンロードイベントを通知
    Event(DownloadEvent),
    /// 使い方を表示
    Help,
}

/// 引数エラー
#[derive(Debug, Error)]
pub enum CliError {
    #[error("--event には JSON を指定してください")]
    MissingEvent,

    #[error("イベント JSON が不正: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("--event <JSON> の後に余分な引数があります: {0}")]
    UnexpectedArgument(String),
}

/// 引数（プログラム名を除く）をパースする
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();

    match args.first().map(String::as_str) {
        None => Ok(Command::Stdin),
        Some("-h" | "--help") => Ok(Command::Help),
        Some("--event") => {
            let json = args.get(1).ok_or(CliError::MissingEvent)?;
            if let Some(extra) = args.get(2) {
                return Err(CliError::UnexpectedArgument(extra.clone()));
            }
            Ok(Command::Event(serde_json::from_str(json)?))
        }
        Some(_) => Ok(Command::Message(args.join(" "))),
    }
}

/// 標準入力から読んだ本文の末尾の改行を 1 つだけ取り除く
pub fn trim_stdin_message(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_引数なしは標準入力() {
        assert_eq!(parse_args(args(&[])).unwrap(), Command::Stdin);
    }

    #[test]
    fn test_引数は空白で連結される() {
        assert_eq!(
            parse_args(args(&["Download", "complete"])).unwrap(),
            Command::Message("Download complete".to_string())
        );
    }

    #[rstest]
    #[case("-h")]
    #[case("--help")]
    fn test_ヘルプ(#[case] flag: &str) {
        assert_eq!(parse_args(args(&[flag])).unwrap(), Command::Help);
    }

    #[test]
    fn test_イベントjsonをパースできる() {
        let command = parse_args(args(&[
            "--event",
            r#"{"type":"queue_failed","queue_title":"Mix","error":"HTTP 429"}"#,
        ]))
        .unwrap();

        assert_eq!(
            command,
            Command::Event(DownloadEvent::QueueFailed {
                queue_title: "Mix".to_string(),
                error:       "HTTP 429".to_string(),
            })
        );
    }

    #[test]
    fn test_イベントjsonがなければエラー() {
        assert!(matches!(
            parse_args(args(&["--event"])),
            Err(CliError::MissingEvent)
        ));
    }

    #[test]
    fn test_イベントjsonの後の引数はエラー() {
        let result = parse_args(args(&[
            "--event",
            r#"{"type":"monitoring_update","playlist_title":"Talks","new_videos":2}"#,
            "extra",
            "words",
        ]));

        match result {
            Err(CliError::UnexpectedArgument(arg)) => assert_eq!(arg, "extra"),
            other => panic!("UnexpectedArgument を期待したが {other:?}"),
        }
    }

    #[test]
    fn test_不正なイベントjsonはエラー() {
        assert!(matches!(
            parse_args(args(&["--event", "{\"type\":\"unknown\"}"])),
            Err(CliError::InvalidEvent(_))
        ));
    }

    #[rstest]
    #[case("hello\n", "hello")]
    #[case("hello\r\n", "hello")]
    #[case("hello\n\n", "hello\n")]
    #[case("line one\nline two", "line one\nline two")]
    #[case("", "")]
    fn test_標準入力の末尾改行を1つ除く(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(trim_stdin_message(input), expected);
    }
}
