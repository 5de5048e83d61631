//! Overlays shipped with the app, in registration order.

use std::path::PathBuf;

use mac_keycode::{Key, KeyBinding, Modifiers};

use crate::OverlayDefinition;

/// Selector binding used when the hotkey file has none: Option + Shift + Space.
pub const DEFAULT_SELECTOR_BINDING: KeyBinding =
    KeyBinding::new(Modifiers::OPTION.union(Modifiers::SHIFT), Key::Space);

struct Builtin {
    id: &'static str,
    name: &'static str,
    url: &'static str,
    icon: &'static str,
    hotkey: u64,
    description: &'static str,
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        id: "grok",
        name: "Grok",
        url: "https://grok.com?referrer=macos-multi-overlay",
        icon: "images/grok_logo.png",
        hotkey: 524_288,
        description: "Grok AI assistant by xAI",
    },
    Builtin {
        id: "gemini",
        name: "Gemini",
        url: "https://gemini.google.com",
        icon: "images/gemini_logo.png",
        hotkey: 786_432,
        description: "Gemini AI assistant by Google",
    },
    Builtin {
        id: "claude",
        name: "Claude",
        url: "https://claude.ai",
        icon: "images/claude_logo.png",
        hotkey: 655_360,
        description: "Claude AI assistant by Anthropic",
    },
    Builtin {
        id: "chatgpt",
        name: "ChatGPT",
        url: "https://chat.openai.com",
        icon: "images/chatgpt_logo.png",
        hotkey: 917_504,
        description: "ChatGPT AI assistant by OpenAI",
    },
];

/// The built-in overlays. All use Space with a distinct modifier mask.
pub fn builtin_overlays() -> Vec<OverlayDefinition> {
    BUILTINS
        .iter()
        .map(|b| OverlayDefinition {
            id: b.id.to_string(),
            name: b.name.to_string(),
            url: b.url.to_string(),
            icon_ref: PathBuf::from(b.icon),
            default_hotkey: Some(KeyBinding::from_raw(b.hotkey, Key::Space.code())),
            description: b.description.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid_and_ordered() {
        let all = builtin_overlays();
        let ids: Vec<&str> = all.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["grok", "gemini", "claude", "chatgpt"]);
        for o in &all {
            o.validate().expect("builtin validates");
        }
    }

    #[test]
    fn builtin_masks() {
        let all = builtin_overlays();
        let mods: Vec<Modifiers> = all
            .iter()
            .map(|o| o.default_hotkey.expect("has default").modifiers)
            .collect();
        assert_eq!(
            mods,
            [
                Modifiers::OPTION,
                Modifiers::CONTROL | Modifiers::OPTION,
                Modifiers::SHIFT | Modifiers::OPTION,
                Modifiers::SHIFT | Modifiers::CONTROL | Modifiers::OPTION,
            ]
        );
        assert_eq!(DEFAULT_SELECTOR_BINDING.modifiers.bits(), 655_360);
    }
}
