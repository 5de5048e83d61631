//! Virtual keycodes (macOS `kVK_*` values) and their display names.
//!
//! A keycode here is the integer reported by `NSEvent.keyCode` and by
//! CoreGraphics in the `kCGKeyboardEventKeycode` field. It identifies a
//! physical key position and is specific to macOS.

/// macOS hardware virtual keycode (`kVK_*`, `NSEvent.keyCode`).
pub type KeyCode = u16;

// Central table: variant => (keycode, US-layout symbol, readable name).
// A readable name of `None` means the key renders as its symbol.
macro_rules! key_table {
    ( $( $k:ident = $code:literal, $sym:literal, $readable:expr; )* ) => {
        /// Keys on a macOS keyboard, with their hardware keycodes.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        #[repr(u16)]
        #[allow(missing_docs)]
        pub enum Key {
            $( $k = $code, )*
        }

        impl Key {
            /// Every known key, in table order.
            pub const ALL: &'static [Self] = &[ $( Self::$k, )* ];

            /// Look up a key from its keycode.
            pub fn from_code(code: KeyCode) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$k), )*
                    _ => None,
                }
            }

            /// The character this key produces on a US layout without modifiers.
            pub fn symbol(self) -> &'static str {
                match self {
                    $( Self::$k => $sym, )*
                }
            }

            /// Readable name for keys that do not print a character
            /// (e.g. "Space", "Return", "Left Arrow", "F5").
            pub fn readable_name(self) -> Option<&'static str> {
                match self {
                    $( Self::$k => $readable, )*
                }
            }
        }
    };
}

key_table! {
    A = 0x00, "a", None;
    S = 0x01, "s", None;
    D = 0x02, "d", None;
    F = 0x03, "f", None;
    H = 0x04, "h", None;
    G = 0x05, "g", None;
    Z = 0x06, "z", None;
    X = 0x07, "x", None;
    C = 0x08, "c", None;
    V = 0x09, "v", None;
    B = 0x0B, "b", None;
    Q = 0x0C, "q", None;
    W = 0x0D, "w", None;
    E = 0x0E, "e", None;
    R = 0x0F, "r", None;
    Y = 0x10, "y", None;
    T = 0x11, "t", None;
    Digit1 = 0x12, "1", None;
    Digit2 = 0x13, "2", None;
    Digit3 = 0x14, "3", None;
    Digit4 = 0x15, "4", None;
    Digit6 = 0x16, "6", None;
    Digit5 = 0x17, "5", None;
    Equal = 0x18, "=", None;
    Digit9 = 0x19, "9", None;
    Digit7 = 0x1A, "7", None;
    Minus = 0x1B, "-", None;
    Digit8 = 0x1C, "8", None;
    Digit0 = 0x1D, "0", None;
    RightBracket = 0x1E, "]", None;
    O = 0x1F, "o", None;
    U = 0x20, "u", None;
    LeftBracket = 0x21, "[", None;
    I = 0x22, "i", None;
    P = 0x23, "p", None;
    Return = 0x24, "\r", Some("Return");
    L = 0x25, "l", None;
    J = 0x26, "j", None;
    Quote = 0x27, "'", None;
    K = 0x28, "k", None;
    Semicolon = 0x29, ";", None;
    Backslash = 0x2A, "\\", None;
    Comma = 0x2B, ",", None;
    Slash = 0x2C, "/", None;
    N = 0x2D, "n", None;
    M = 0x2E, "m", None;
    Period = 0x2F, ".", None;
    Tab = 0x30, "\t", Some("Tab");
    Space = 0x31, " ", Some("Space");
    Grave = 0x32, "`", None;
    Delete = 0x33, "", Some("Delete");
    Escape = 0x35, "", Some("Escape");
    Command = 0x37, "", Some("Command");
    Shift = 0x38, "", Some("Shift");
    CapsLock = 0x39, "", Some("Caps Lock");
    Option = 0x3A, "", Some("Option");
    Control = 0x3B, "", Some("Control");
    Function = 0x3F, "", Some("Fn");
    KeypadEnter = 0x4C, "", Some("Enter");
    F5 = 0x60, "", Some("F5");
    F6 = 0x61, "", Some("F6");
    F7 = 0x62, "", Some("F7");
    F3 = 0x63, "", Some("F3");
    F8 = 0x64, "", Some("F8");
    F9 = 0x65, "", Some("F9");
    F11 = 0x67, "", Some("F11");
    F10 = 0x6D, "", Some("F10");
    F12 = 0x6F, "", Some("F12");
    Home = 0x73, "", Some("Home");
    PageUp = 0x74, "", Some("Page Up");
    ForwardDelete = 0x75, "", Some("Forward Delete");
    F4 = 0x76, "", Some("F4");
    End = 0x77, "", Some("End");
    F2 = 0x78, "", Some("F2");
    PageDown = 0x79, "", Some("Page Down");
    F1 = 0x7A, "", Some("F1");
    LeftArrow = 0x7B, "", Some("Left Arrow");
    RightArrow = 0x7C, "", Some("Right Arrow");
    DownArrow = 0x7D, "", Some("Down Arrow");
    UpArrow = 0x7E, "", Some("Up Arrow");
}

impl Key {
    /// Returns the keycode (`kVK_*`) for this key.
    pub const fn code(self) -> KeyCode {
        self as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for &k in Key::ALL {
            assert_eq!(Key::from_code(k.code()), Some(k), "roundtrip {k:?}");
        }
        assert_eq!(Key::from_code(0xFFFF), None);
        assert_eq!(Key::from_code(0x0A), None);
    }

    #[test]
    fn well_known_codes() {
        assert_eq!(Key::Space.code(), 49);
        assert_eq!(Key::Return.code(), 36);
        assert_eq!(Key::Escape.code(), 53);
        assert_eq!(Key::F1.code(), 122);
        assert_eq!(Key::F12.code(), 111);
        assert_eq!(Key::LeftArrow.code(), 123);
        assert_eq!(Key::UpArrow.code(), 126);
    }

    #[test]
    fn readable_names() {
        assert_eq!(Key::Space.readable_name(), Some("Space"));
        assert_eq!(Key::DownArrow.readable_name(), Some("Down Arrow"));
        assert_eq!(Key::F7.readable_name(), Some("F7"));
        assert_eq!(Key::K.readable_name(), None);
        assert_eq!(Key::K.symbol(), "k");
    }
}
