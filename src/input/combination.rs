//! キーコンビネーション
//!
//! 押下順に依存しないキーの組み合わせ。構築時にキーをコード順へ整列して正規化し、
//! 以後は不変値として扱う。

use super::key::{InputKey, MouseButton};
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 正規化済み（コード順に整列済み）のキー組み合わせ
///
/// 重複キーはそのまま保持する。等価性とハッシュは整列後の列に対して要素ごとに判定する。
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyCombination {
    keys: Vec<InputKey>,
}

impl KeyCombination {
    /// 任意の順序のキー列から作成
    pub fn new<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = InputKey>,
    {
        let mut keys: Vec<InputKey> = keys.into_iter().collect();
        keys.sort_unstable();
        Self { keys }
    }

    /// キーを含まない組み合わせ（常に成立する）
    pub fn empty() -> Self {
        Self { keys: Vec::new() }
    }

    /// 単一キーから作成
    pub fn from_key(key: InputKey) -> Self {
        Self { keys: vec![key] }
    }

    /// 現在押下中のキーボードキーとマウスボタンの和集合から作成
    ///
    /// 未知のキーコードは照合に使えないため読み飛ばす。
    pub fn from_pressed<K, M>(keyboard_codes: K, mouse_buttons: M) -> Self
    where
        K: IntoIterator<Item = u16>,
        M: IntoIterator<Item = MouseButton>,
    {
        let keyboard = keyboard_codes.into_iter().filter_map(|code| {
            match InputKey::from_keyboard_code(code) {
                Some(InputKey::Unknown) | None => {
                    log::trace!("ignoring unrecognized keyboard code {}", code);
                    None
                }
                Some(key) => Some(key),
            }
        });
        let mouse = mouse_buttons.into_iter().map(InputKey::from_mouse_button);
        Self::new(keyboard.chain(mouse))
    }

    /// カンマ区切りの数値コード列をパース
    ///
    /// 空文字列（空白のみを含む）は空の組み合わせとして扱う。
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::empty());
        }

        let mut keys = Vec::new();
        for token in text.split(',') {
            let token = token.trim();
            let code: i64 = token.parse().map_err(|_| ParseError::InvalidToken {
                token: token.to_string(),
            })?;
            let key = u16::try_from(code)
                .ok()
                .and_then(InputKey::from_code)
                .ok_or(ParseError::OutOfRange { code })?;
            keys.push(key);
        }
        Ok(Self::new(keys))
    }

    /// 整列済みのキー列
    pub fn keys(&self) -> &[InputKey] {
        &self.keys
    }

    /// 必要キー数（重複を含む）
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// キーを含むか
    pub fn contains(&self, key: InputKey) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    /// `pressed` が自身の全キーを含むか（部分集合判定、重複は無視）
    ///
    /// 対称ではない: `{A}` は `{A, B}` で成立するが、逆は成立しない。
    pub fn is_satisfied_by(&self, pressed: &KeyCombination) -> bool {
        self.keys.iter().all(|key| pressed.contains(*key))
    }

    /// 表示用文字列（`LCtrl+LShift+A` 形式）
    ///
    /// 複数のキーが同じラベルを持ち得るため比較には使わない。空ラベルのキーは省く。
    pub fn to_readable_string(&self) -> String {
        self.keys
            .iter()
            .map(|key| key.label())
            .filter(|label| !label.is_empty())
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// 正規形の文字列表現（カンマ区切りの数値コード）
impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, key) in self.keys.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", key.code())?;
        }
        Ok(())
    }
}

impl FromStr for KeyCombination {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for KeyCombination {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<KeyCombination> for String {
    fn from(combination: KeyCombination) -> Self {
        combination.to_string()
    }
}

impl From<InputKey> for KeyCombination {
    fn from(key: InputKey) -> Self {
        Self::from_key(key)
    }
}

impl From<&[InputKey]> for KeyCombination {
    fn from(keys: &[InputKey]) -> Self {
        Self::new(keys.iter().copied())
    }
}

impl FromIterator<InputKey> for KeyCombination {
    fn from_iter<I: IntoIterator<Item = InputKey>>(iter: I) -> Self {
        Self::new(iter)
    }
}
