//! chordmap - キーコンビネーションによる入力バインド解決
//!
//! 押下中のキー集合からバインドの成立を判定し、同時発火ポリシーに従って
//! アクションの有効化／無効化イベントを発行する。

// コアモジュール
pub mod error;
pub mod logging;
pub mod config;

// ロジック層
pub mod input;

// 公開API
pub use config::ResolverConfig;
pub use error::{ChordError, ConfigError, ParseError, Result};
pub use input::{
    ActionHandler, BindingEvent, BindingResolver, BindingSet, ConcurrencyMode, InputKey,
    KeyBinding, KeyCombination, MouseButton,
};
