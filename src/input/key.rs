//! 入力キー識別子
//!
//! キーボードのキーとマウスボタンを単一の数値空間で表現する。
//! キーボードは `0..FIRST_MOUSE_BUTTON`、マウスボタンはそれ以降のオフセット領域に配置し、
//! 両者のコードが衝突しないようにする。

/// キー定義表からキー列挙と表示ラベル表を生成する
///
/// 各行は `名前 = コード => 表示ラベル`。コードは 0 から連番であること。
macro_rules! input_keys {
    ($($name:ident = $code:literal => $label:literal,)*) => {
        /// 統一キー識別子（キーボードキーとマウスボタン）
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum InputKey {
            $($name = $code,)*
        }

        /// コード順のキー表（インデックス = コード）
        const KEY_TABLE: &[(InputKey, &str)] = &[
            $((InputKey::$name, $label),)*
        ];
    };
}

input_keys! {
    Unknown = 0 => "",
    LShift = 1 => "LShift",
    RShift = 2 => "RShift",
    LControl = 3 => "LCtrl",
    RControl = 4 => "RCtrl",
    LAlt = 5 => "LAlt",
    RAlt = 6 => "RAlt",
    LWin = 7 => "LWin",
    RWin = 8 => "RWin",
    Menu = 9 => "Menu",
    F1 = 10 => "F1",
    F2 = 11 => "F2",
    F3 = 12 => "F3",
    F4 = 13 => "F4",
    F5 = 14 => "F5",
    F6 = 15 => "F6",
    F7 = 16 => "F7",
    F8 = 17 => "F8",
    F9 = 18 => "F9",
    F10 = 19 => "F10",
    F11 = 20 => "F11",
    F12 = 21 => "F12",
    F13 = 22 => "F13",
    F14 = 23 => "F14",
    F15 = 24 => "F15",
    F16 = 25 => "F16",
    F17 = 26 => "F17",
    F18 = 27 => "F18",
    F19 = 28 => "F19",
    F20 = 29 => "F20",
    F21 = 30 => "F21",
    F22 = 31 => "F22",
    F23 = 32 => "F23",
    F24 = 33 => "F24",
    F25 = 34 => "F25",
    F26 = 35 => "F26",
    F27 = 36 => "F27",
    F28 = 37 => "F28",
    F29 = 38 => "F29",
    F30 = 39 => "F30",
    F31 = 40 => "F31",
    F32 = 41 => "F32",
    F33 = 42 => "F33",
    F34 = 43 => "F34",
    F35 = 44 => "F35",
    Up = 45 => "Up",
    Down = 46 => "Down",
    Left = 47 => "Left",
    Right = 48 => "Right",
    Enter = 49 => "Enter",
    Escape = 50 => "Esc",
    Space = 51 => "Space",
    Tab = 52 => "Tab",
    BackSpace = 53 => "Backsp",
    Insert = 54 => "Ins",
    Delete = 55 => "Del",
    PageUp = 56 => "PgUp",
    PageDown = 57 => "PgDn",
    Home = 58 => "Home",
    End = 59 => "End",
    CapsLock = 60 => "Caps",
    ScrollLock = 61 => "Scroll",
    PrintScreen = 62 => "PrtSc",
    Pause = 63 => "Pause",
    NumLock = 64 => "NumLock",
    Clear = 65 => "Clear",
    Sleep = 66 => "Sleep",
    Keypad0 = 67 => "0",
    Keypad1 = 68 => "1",
    Keypad2 = 69 => "2",
    Keypad3 = 70 => "3",
    Keypad4 = 71 => "4",
    Keypad5 = 72 => "5",
    Keypad6 = 73 => "6",
    Keypad7 = 74 => "7",
    Keypad8 = 75 => "8",
    Keypad9 = 76 => "9",
    KeypadDivide = 77 => "/",
    KeypadMultiply = 78 => "*",
    KeypadSubtract = 79 => "-",
    KeypadAdd = 80 => "+",
    KeypadDecimal = 81 => ".",
    KeypadEnter = 82 => "Enter",
    A = 83 => "A",
    B = 84 => "B",
    C = 85 => "C",
    D = 86 => "D",
    E = 87 => "E",
    F = 88 => "F",
    G = 89 => "G",
    H = 90 => "H",
    I = 91 => "I",
    J = 92 => "J",
    K = 93 => "K",
    L = 94 => "L",
    M = 95 => "M",
    N = 96 => "N",
    O = 97 => "O",
    P = 98 => "P",
    Q = 99 => "Q",
    R = 100 => "R",
    S = 101 => "S",
    T = 102 => "T",
    U = 103 => "U",
    V = 104 => "V",
    W = 105 => "W",
    X = 106 => "X",
    Y = 107 => "Y",
    Z = 108 => "Z",
    Number0 = 109 => "0",
    Number1 = 110 => "1",
    Number2 = 111 => "2",
    Number3 = 112 => "3",
    Number4 = 113 => "4",
    Number5 = 114 => "5",
    Number6 = 115 => "6",
    Number7 = 116 => "7",
    Number8 = 117 => "8",
    Number9 = 118 => "9",
    Tilde = 119 => "~",
    Minus = 120 => "-",
    Plus = 121 => "=",
    BracketLeft = 122 => "[",
    BracketRight = 123 => "]",
    Semicolon = 124 => ";",
    Quote = 125 => "'",
    Comma = 126 => ",",
    Period = 127 => ".",
    Slash = 128 => "/",
    BackSlash = 129 => "\\",
    NonUsBackSlash = 130 => "\\",
    MouseLeft = 131 => "LMB",
    MouseMiddle = 132 => "MMB",
    MouseRight = 133 => "RMB",
    MouseButton1 = 134 => "M1",
    MouseButton2 = 135 => "M2",
    MouseButton3 = 136 => "M3",
    MouseButton4 = 137 => "M4",
    MouseButton5 = 138 => "M5",
    MouseButton6 = 139 => "M6",
    MouseButton7 = 140 => "M7",
    MouseButton8 = 141 => "M8",
    MouseButton9 = 142 => "M9",
}

/// マウスボタン（ホスト側の生識別子）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum MouseButton {
    Left = 0,
    Middle = 1,
    Right = 2,
    Button1 = 3,
    Button2 = 4,
    Button3 = 5,
    Button4 = 6,
    Button5 = 7,
    Button6 = 8,
    Button7 = 9,
    Button8 = 10,
    Button9 = 11,
}

impl MouseButton {
    pub const ALL: [MouseButton; 12] = [
        MouseButton::Left,
        MouseButton::Middle,
        MouseButton::Right,
        MouseButton::Button1,
        MouseButton::Button2,
        MouseButton::Button3,
        MouseButton::Button4,
        MouseButton::Button5,
        MouseButton::Button6,
        MouseButton::Button7,
        MouseButton::Button8,
        MouseButton::Button9,
    ];

    /// 生のボタン番号から変換
    pub fn from_index(index: u16) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

impl InputKey {
    /// マウスボタン領域の先頭コード（キーボードコードはこれ未満）
    pub const FIRST_MOUSE_BUTTON: u16 = InputKey::MouseLeft as u16;

    /// 定義済みキーの総数
    pub const COUNT: usize = KEY_TABLE.len();

    /// 数値コード
    pub fn code(self) -> u16 {
        self as u16
    }

    /// 数値コードからキーを取得（範囲外は `None`）
    pub fn from_code(code: u16) -> Option<Self> {
        KEY_TABLE.get(code as usize).map(|(key, _)| *key)
    }

    /// キーボードの生コードをそのまま統一空間へ写す
    ///
    /// マウス領域に入るコードはキーボード由来として扱わない。
    pub fn from_keyboard_code(code: u16) -> Option<Self> {
        if code >= Self::FIRST_MOUSE_BUTTON {
            return None;
        }
        Self::from_code(code)
    }

    /// マウスボタンをオフセット領域へ写す
    pub fn from_mouse_button(button: MouseButton) -> Self {
        Self::from_code(Self::FIRST_MOUSE_BUTTON + button as u16).unwrap_or(InputKey::Unknown)
    }

    /// マウスボタン由来か
    pub fn is_mouse_button(self) -> bool {
        self.code() >= Self::FIRST_MOUSE_BUTTON
    }

    /// 表示用ラベル（`Unknown` は空文字列）
    pub fn label(self) -> &'static str {
        KEY_TABLE
            .get(self.code() as usize)
            .map_or("", |(_, label)| *label)
    }

    /// 全キーをコード順に列挙
    pub fn iter() -> impl Iterator<Item = InputKey> {
        KEY_TABLE.iter().map(|(key, _)| *key)
    }
}

impl From<MouseButton> for InputKey {
    fn from(button: MouseButton) -> Self {
        InputKey::from_mouse_button(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_code() {
        for (index, (key, _)) in KEY_TABLE.iter().enumerate() {
            assert_eq!(key.code() as usize, index, "{:?}", key);
        }
    }

    #[test]
    fn test_keyboard_passthrough() {
        assert_eq!(InputKey::from_keyboard_code(InputKey::A.code()), Some(InputKey::A));
        assert_eq!(InputKey::from_keyboard_code(0), Some(InputKey::Unknown));
        assert_eq!(InputKey::from_keyboard_code(InputKey::FIRST_MOUSE_BUTTON), None);
        assert_eq!(InputKey::from_keyboard_code(u16::MAX), None);
    }

    #[test]
    fn test_mouse_buttons_live_past_keyboard_range() {
        for button in MouseButton::ALL {
            let key = InputKey::from_mouse_button(button);
            assert!(key.is_mouse_button());
            assert_eq!(key.code(), InputKey::FIRST_MOUSE_BUTTON + button as u16);
        }
        assert_eq!(InputKey::from(MouseButton::Left), InputKey::MouseLeft);
        assert_eq!(InputKey::from(MouseButton::Button9), InputKey::MouseButton9);
        assert_eq!(MouseButton::from_index(12), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(InputKey::Unknown.label(), "");
        assert_eq!(InputKey::LShift.label(), "LShift");
        assert_eq!(InputKey::RControl.label(), "RCtrl");
        assert_eq!(InputKey::LAlt.label(), "LAlt");
        assert_eq!(InputKey::LWin.label(), "LWin");
        assert_eq!(InputKey::Keypad5.label(), "5");
        assert_eq!(InputKey::Number5.label(), "5");
        assert_eq!(InputKey::Comma.label(), ",");
        assert_eq!(InputKey::BackSlash.label(), "\\");
    }

    #[test]
    fn test_ordering_follows_code() {
        assert!(InputKey::LShift < InputKey::A);
        assert!(InputKey::Z < InputKey::MouseLeft);
        assert_eq!(InputKey::iter().count(), InputKey::COUNT);
    }
}
