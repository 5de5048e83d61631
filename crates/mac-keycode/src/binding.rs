use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Key, KeyCode, Modifiers};

/// A hotkey: modifier mask plus a raw key code.
///
/// Two bindings are equal iff both the mask and the key code match exactly.
/// The serialized form uses the field names of the hotkey file
/// (`modifierMask`, `keyCode`) and also accepts the declaration-file names
/// (`flags`, `key`) on input.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Modifiers that must be held (and no others).
    #[serde(
        rename = "modifierMask",
        alias = "flags",
        serialize_with = "ser_mask",
        deserialize_with = "de_mask"
    )]
    pub modifiers: Modifiers,
    /// macOS virtual key code of the non-modifier key.
    #[serde(rename = "keyCode", alias = "key")]
    pub key_code: KeyCode,
}

fn ser_mask<S: Serializer>(m: &Modifiers, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(m.bits())
}

fn de_mask<'de, D: Deserializer<'de>>(d: D) -> Result<Modifiers, D::Error> {
    let raw = u64::deserialize(d)?;
    Ok(Modifiers::from_cg_flags(raw))
}

impl KeyBinding {
    /// Binding for a known key.
    pub const fn new(modifiers: Modifiers, key: Key) -> Self {
        Self {
            modifiers,
            key_code: key.code(),
        }
    }

    /// Binding from raw OS values; extra flag bits are masked off.
    pub const fn from_raw(flags: u64, key_code: KeyCode) -> Self {
        Self {
            modifiers: Modifiers::from_cg_flags(flags),
            key_code,
        }
    }

    /// True when a key-down with these values would trigger this binding.
    pub fn matches(&self, modifiers: Modifiers, key_code: KeyCode) -> bool {
        self.modifiers == modifiers && self.key_code == key_code
    }

    /// The key, when the code is one we know.
    pub fn key(&self) -> Option<Key> {
        Key::from_code(self.key_code)
    }

    /// Human-readable rendering such as "Option + Shift + Space".
    ///
    /// Modifier names come first (Shift, Control, Option, Command), joined
    /// with " + ". Keys without a printable character use their readable
    /// name. Otherwise `chars` (the characters the OS reported for the event)
    /// is used when present, then the key's US-layout symbol in upper case,
    /// then the raw code.
    pub fn label(&self, chars: Option<&str>) -> String {
        let key = self.key();
        let key_name = match key.and_then(Key::readable_name) {
            Some(name) => name.to_string(),
            None => match chars.filter(|c| is_printable(c)) {
                Some(c) => c.to_string(),
                None => match key {
                    Some(k) if !k.symbol().is_empty() => k.symbol().to_uppercase(),
                    _ => format!("Key {}", self.key_code),
                },
            },
        };
        let mut parts: Vec<&str> = self.modifiers.names();
        parts.push(&key_name);
        parts.join(" + ")
    }
}

fn is_printable(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_control)
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(None))
    }
}
