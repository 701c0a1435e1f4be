//! 同時発火ポリシー

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 複数のバインドが同時に成立したときの扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyMode {
    /// 最も具体的な（キー数が最大の）バインドひとつだけ
    #[default]
    None,
    /// アクションごとにひとつ。異なるアクションは同時に有効になれる
    Unique,
    /// 成立したバインドすべてを個別に扱う
    All,
}

impl ConcurrencyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ConcurrencyMode::None => "none",
            ConcurrencyMode::Unique => "unique",
            ConcurrencyMode::All => "all",
        }
    }
}

impl fmt::Display for ConcurrencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 不明なモード名
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown concurrency mode: {0}")]
pub struct UnknownModeError(pub String);

impl FromStr for ConcurrencyMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ConcurrencyMode::None),
            "unique" => Ok(ConcurrencyMode::Unique),
            "all" => Ok(ConcurrencyMode::All),
            _ => Err(UnknownModeError(s.to_string())),
        }
    }
}
