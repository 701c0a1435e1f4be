//! 入力処理モジュール
//!
//! キー識別子、キーコンビネーション、バインド、同時発火ポリシー、バインド解決を提供

pub mod key;
pub mod combination;
pub mod binding;
pub mod concurrency;
pub mod resolver;

// 公開API
pub use key::{InputKey, MouseButton};
pub use combination::KeyCombination;
pub use binding::{BindingSet, KeyBinding};
pub use concurrency::ConcurrencyMode;
pub use resolver::{ActionHandler, BindingEvent, BindingResolver};
