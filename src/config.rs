//! 解決器の設定
//!
//! 既定バインド集合と同時発火ポリシーを一つの値にまとめ、解決器の構築時に明示的に渡す。
//! グローバルな既定集合は持たない。

use crate::error::ConfigError;
use crate::input::{BindingSet, ConcurrencyMode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 入力コンテキスト一つ分の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig<A> {
    /// 同時発火ポリシー（省略時は `none`）
    #[serde(default)]
    pub mode: ConcurrencyMode,
    /// 宣言順のバインド集合
    pub bindings: BindingSet<A>,
}

impl<A> Default for ResolverConfig<A> {
    fn default() -> Self {
        Self {
            mode: ConcurrencyMode::default(),
            bindings: BindingSet::new(),
        }
    }
}

impl<A> ResolverConfig<A> {
    pub fn new(bindings: BindingSet<A>, mode: ConcurrencyMode) -> Self {
        Self { mode, bindings }
    }

    pub fn with_mode(mut self, mode: ConcurrencyMode) -> Self {
        self.mode = mode;
        self
    }
}

impl<A: PartialEq> ResolverConfig<A> {
    /// ユーザー設定のバインドで既定を上書き
    pub fn with_overrides(mut self, overrides: BindingSet<A>) -> Self {
        self.bindings = self.bindings.with_overrides(overrides);
        self
    }
}

impl<A: DeserializeOwned> ResolverConfig<A> {
    /// JSON 文字列から読み込む
    ///
    /// 不正なコンビネーションが一つでもあれば設定全体を拒否する。
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| {
            log::warn!("rejecting binding configuration: {}", err);
            ConfigError::from(err)
        })
    }

    /// JSON ファイルから読み込む
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_json_str(&text)
    }
}

impl<A: Serialize> ResolverConfig<A> {
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputKey, KeyCombination};

    #[test]
    fn test_mode_defaults_to_none() {
        let config: ResolverConfig<String> =
            ResolverConfig::from_json_str(r#"{ "bindings": [] }"#).unwrap();
        assert_eq!(config.mode, ConcurrencyMode::None);
        assert!(config.bindings.is_empty());
    }

    #[test]
    fn test_parses_bindings_in_order() {
        let config: ResolverConfig<String> = ResolverConfig::from_json_str(
            r#"{
                "mode": "unique",
                "bindings": [
                    { "combination": "3,101", "action": "save" },
                    { "combination": "", "action": "idle" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.mode, ConcurrencyMode::Unique);
        let first = config.bindings.get(0).unwrap();
        assert_eq!(first.combination, KeyCombination::new([InputKey::S, InputKey::LControl]));
        assert_eq!(first.action, "save");
        assert!(config.bindings.get(1).unwrap().combination.is_empty());
    }

    #[test]
    fn test_malformed_combination_rejects_config() {
        let result: Result<ResolverConfig<String>, _> = ResolverConfig::from_json_str(
            r#"{ "bindings": [ { "combination": "3,500", "action": "x" } ] }"#,
        );
        assert!(matches!(result, Err(ConfigError::Format { .. })));
    }
}
