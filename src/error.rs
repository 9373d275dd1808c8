use thiserror::Error;

#[derive(Error, Debug)]
pub enum InitProcessError {
    #[error("ロガーのセットアップに失敗しました: {0}")]
    LoggerError(String),

    #[error("環境変数の解析に失敗しました: {0}")]
    EnvVarParseError(String),

    #[error("設定値が不正です: {0}")]
    InvalidConfig(String),

    #[error("端末の入出力に失敗しました: {0}")]
    TerminalError(#[from] std::io::Error),
}
