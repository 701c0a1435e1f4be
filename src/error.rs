//! エラーハンドリング
//!
//! コンビネーションのパースと設定読み込みで使用するエラー型を定義する。
//! 解決処理（resolve）自体は失敗しないため、ここに現れるのは構築時のエラーのみ。

use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug)]
pub enum ChordError {
    /// コンビネーション文字列のパースエラー
    #[error("Key combination parse failed")]
    Parse(#[from] ParseError),

    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),
}

/// コンビネーション文字列のパースエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid key code token: {token:?}")]
    InvalidToken { token: String },

    #[error("Key code out of range: {code}")]
    OutOfRange { code: i64 },
}

/// バインド設定の読み込みエラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid binding {entry:?}: {source}")]
    Parse {
        entry: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Malformed configuration: {message}")]
    Format { message: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Format {
            message: err.to_string(),
        }
    }
}

/// クレート共通の Result 型
pub type Result<T> = std::result::Result<T, ChordError>;
