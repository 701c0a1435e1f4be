//! キーバインド
//!
//! キーコンビネーションと論理アクションの対応、およびその宣言順の集合。

use super::combination::KeyCombination;
use super::key::InputKey;
use crate::error::{ConfigError, ParseError};
use serde::{Deserialize, Serialize};

/// コンビネーションとアクションの対応
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyBinding<A> {
    /// 発火条件
    pub combination: KeyCombination,
    /// ホスト定義のアクション
    pub action: A,
}

impl<A> KeyBinding<A> {
    pub fn new(combination: impl Into<KeyCombination>, action: A) -> Self {
        Self {
            combination: combination.into(),
            action,
        }
    }

    /// 正規形文字列からバインドを作成
    pub fn parse(text: &str, action: A) -> Result<Self, ParseError> {
        Ok(Self::new(KeyCombination::parse(text)?, action))
    }
}

/// 宣言順を保持するバインド集合
///
/// 同じアクションへの複数バインド、同一コンビネーションの異なるアクションへのバインドを許す。
/// 宣言順は `None` / `Unique` モードのタイブレークに使われる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingSet<A> {
    bindings: Vec<KeyBinding<A>>,
}

impl<A> Default for BindingSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> BindingSet<A> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// バインドを末尾に追加
    pub fn push(&mut self, binding: KeyBinding<A>) {
        self.bindings.push(binding);
    }

    /// キー列とアクションからバインドを追加（ビルダー形式）
    pub fn bind<I>(mut self, keys: I, action: A) -> Self
    where
        I: IntoIterator<Item = InputKey>,
    {
        self.push(KeyBinding::new(KeyCombination::new(keys), action));
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KeyBinding<A>> {
        self.bindings.get(index)
    }

    pub fn as_slice(&self) -> &[KeyBinding<A>] {
        &self.bindings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyBinding<A>> {
        self.bindings.iter()
    }
}

impl<A: PartialEq> BindingSet<A> {
    /// 指定アクションに対応するバインド
    pub fn for_action<'a>(&'a self, action: &'a A) -> impl Iterator<Item = &'a KeyBinding<A>> + 'a {
        self.bindings.iter().filter(move |binding| &binding.action == action)
    }

    /// 登場順に重複を除いたアクション一覧
    pub fn actions(&self) -> Vec<&A> {
        let mut actions: Vec<&A> = Vec::new();
        for binding in &self.bindings {
            if !actions.contains(&&binding.action) {
                actions.push(&binding.action);
            }
        }
        actions
    }

    /// ユーザー設定で上書きした集合を返す
    ///
    /// 上書き側に現れたアクションは既定バインドがすべて置き換えられる。
    /// それ以外の既定バインドは元の順序のまま先頭に残り、上書き分はその後ろに並ぶ。
    pub fn with_overrides(self, overrides: BindingSet<A>) -> Self {
        let mut bindings: Vec<KeyBinding<A>> = self
            .bindings
            .into_iter()
            .filter(|binding| !overrides.iter().any(|o| o.action == binding.action))
            .collect();
        bindings.extend(overrides.bindings);
        Self { bindings }
    }
}

impl<A: Clone> BindingSet<A> {
    /// 文字列表現の一覧から作成
    ///
    /// 一件でも不正なエントリがあれば集合全体を拒否する。
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, A)>,
    {
        let mut set = Self::new();
        for (text, action) in entries {
            let binding = KeyBinding::parse(text, action).map_err(|source| {
                log::warn!("rejecting binding {:?}: {}", text, source);
                ConfigError::Parse {
                    entry: text.to_string(),
                    source,
                }
            })?;
            set.push(binding);
        }
        Ok(set)
    }
}

impl<A> FromIterator<KeyBinding<A>> for BindingSet<A> {
    fn from_iter<I: IntoIterator<Item = KeyBinding<A>>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl<A> IntoIterator for BindingSet<A> {
    type Item = KeyBinding<A>;
    type IntoIter = std::vec::IntoIter<KeyBinding<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.into_iter()
    }
}

impl<'a, A> IntoIterator for &'a BindingSet<A> {
    type Item = &'a KeyBinding<A>;
    type IntoIter = std::slice::Iter<'a, KeyBinding<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}
