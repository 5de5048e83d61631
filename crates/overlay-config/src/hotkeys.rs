//! The hotkey table: which binding triggers which action, persisted as JSON.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use mac_keycode::{KeyBinding, KeyCode, Modifiers};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{DEFAULT_SELECTOR_BINDING, Error, OverlayRegistry, Result};

/// Something a hotkey can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionId {
    /// Pop up the overlay selector menu.
    Selector,
    /// Toggle the overlay with this id.
    Overlay(String),
}

impl ActionId {
    /// Shorthand for [`ActionId::Overlay`].
    pub fn overlay(id: impl Into<String>) -> Self {
        Self::Overlay(id.into())
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector => f.write_str("selector"),
            Self::Overlay(id) => f.write_str(id),
        }
    }
}

/// One row of the table.
pub type HotkeyEntry = (ActionId, Option<KeyBinding>);

/// Ordered action → binding table.
///
/// Order is the selector, then overlays in registry order, then ids found in
/// the hotkey file that the registry does not know, in file order. Matching
/// walks this order and returns the first hit. Unknown ids are kept so they
/// are written back, but they never match.
#[derive(Debug, Clone)]
pub struct HotkeyStore {
    entries: Vec<HotkeyEntry>,
    /// Length of the selector-plus-registry prefix of `entries`.
    registered: usize,
    path: Option<PathBuf>,
}

impl HotkeyStore {
    /// A table holding registry defaults, never written to disk.
    pub fn in_memory(registry: &OverlayRegistry) -> Self {
        let mut entries = vec![(ActionId::Selector, Some(DEFAULT_SELECTOR_BINDING))];
        entries.extend(
            registry
                .all()
                .iter()
                .map(|o| (ActionId::Overlay(o.id.clone()), o.default_hotkey)),
        );
        Self {
            registered: entries.len(),
            entries,
            path: None,
        }
    }

    /// Load the table stored at `path`, merged over registry defaults.
    ///
    /// A missing file yields the defaults. A malformed file is logged and
    /// treated as empty; malformed entries are skipped one by one.
    pub fn load(path: impl Into<PathBuf>, registry: &OverlayRegistry) -> Self {
        let path = path.into();
        let mut store = Self::in_memory(registry);
        match fs::read_to_string(&path) {
            Ok(source) => match store.apply_json(&source) {
                Ok(n) => debug!(path = %path.display(), entries = n, "hotkeys_loaded"),
                Err(e) => warn!(error = %e.at(&path).pretty(), "hotkeys_file_ignored"),
            },
            Err(e) => debug!(path = %path.display(), error = %e, "hotkeys_file_missing"),
        }
        store.path = Some(path);
        store
    }

    /// Merge the entries of a hotkey document into the table. Returns the
    /// number of entries applied.
    fn apply_json(&mut self, source: &str) -> Result<usize> {
        let doc: Value = serde_json::from_str(source).map_err(|e| Error::Parse {
            path: None,
            message: e.to_string(),
        })?;
        let Value::Object(doc) = doc else {
            return Err(Error::Parse {
                path: None,
                message: "expected a JSON object at the top level".to_string(),
            });
        };

        let mut applied = 0;
        if let Some(raw) = doc.get("selector").or_else(|| doc.get("unified_menu")) {
            match parse_binding(raw) {
                Some(b) => {
                    self.put(ActionId::Selector, Some(b));
                    applied += 1;
                }
                None => warn!(entry = "selector", "hotkey_entry_malformed"),
            }
        }
        if let Some(Value::Object(overlays)) = doc.get("overlays") {
            for (id, raw) in overlays {
                match parse_binding(raw) {
                    Some(b) => {
                        self.put(ActionId::Overlay(id.clone()), Some(b));
                        applied += 1;
                    }
                    None => warn!(entry = %id, "hotkey_entry_malformed"),
                }
            }
        }
        Ok(applied)
    }

    /// Overwrite or append without persisting.
    fn put(&mut self, action: ActionId, binding: Option<KeyBinding>) {
        match self.entries.iter_mut().find(|(a, _)| *a == action) {
            Some(slot) => slot.1 = binding,
            None => self.entries.push((action, binding)),
        }
    }

    /// The binding for `action`, if any.
    pub fn get(&self, action: &ActionId) -> Option<KeyBinding> {
        self.entries
            .iter()
            .find(|(a, _)| a == action)
            .and_then(|(_, b)| *b)
    }

    /// Bind `action` and persist the table.
    ///
    /// The in-memory binding takes effect even when writing fails.
    pub fn set(&mut self, action: ActionId, binding: KeyBinding) -> Result<()> {
        self.put(action, Some(binding));
        self.save()
    }

    /// Unset `action` without persisting. Returns the binding it had.
    pub fn disable(&mut self, action: &ActionId) -> Option<KeyBinding> {
        let prev = self.get(action);
        if prev.is_some() {
            self.put(action.clone(), None);
        }
        prev
    }

    /// Put a saved binding back without persisting.
    pub fn restore(&mut self, action: ActionId, binding: Option<KeyBinding>) {
        self.put(action, binding);
    }

    /// The first registered action in table order bound to exactly this
    /// key-down.
    pub fn match_action(&self, modifiers: Modifiers, key_code: KeyCode) -> Option<&ActionId> {
        self.entries[..self.registered]
            .iter()
            .find(|(_, b)| b.is_some_and(|b| b.matches(modifiers, key_code)))
            .map(|(a, _)| a)
    }

    /// Snapshot of the table in order.
    pub fn entries(&self) -> &[HotkeyEntry] {
        &self.entries
    }

    /// Where the table is persisted, if anywhere.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Serialize the table to the hotkey file format.
    pub fn to_json(&self) -> Value {
        let mut overlays = Map::new();
        let mut doc = Map::new();
        for (action, binding) in &self.entries {
            let Some(binding) = binding else { continue };
            let value = binding_value(binding);
            match action {
                ActionId::Selector => {
                    doc.insert("selector".to_string(), value);
                }
                ActionId::Overlay(id) => {
                    overlays.insert(id.clone(), value);
                }
            }
        }
        doc.insert("overlays".to_string(), Value::Object(overlays));
        Value::Object(doc)
    }

    /// Write the table to its file. In-memory stores do nothing.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write_err = |message: String| Error::Write {
            path: path.clone(),
            message,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let text = serde_json::to_string_pretty(&self.to_json())
            .map_err(|e| write_err(e.to_string()))?;
        fs::write(path, text).map_err(|e| write_err(e.to_string()))?;
        debug!(path = %path.display(), "hotkeys_saved");
        Ok(())
    }
}

fn parse_binding(raw: &Value) -> Option<KeyBinding> {
    serde_json::from_value(raw.clone()).ok()
}

fn binding_value(binding: &KeyBinding) -> Value {
    serde_json::to_value(binding).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use std::{
        env, process,
        time::{SystemTime, UNIX_EPOCH},
    };

    use mac_keycode::Key;
    use proptest::prelude::*;

    use super::*;
    use crate::OverlayDefinition;

    fn tmp_file(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        env::temp_dir().join(format!(
            "multi-overlay-{name}-{}-{nanos}/hotkeys.json",
            process::id()
        ))
    }

    fn grok() -> ActionId {
        ActionId::overlay("grok")
    }

    fn gemini() -> ActionId {
        ActionId::overlay("gemini")
    }

    #[test]
    fn defaults_follow_registry_order() {
        let store = HotkeyStore::in_memory(&OverlayRegistry::builtin());
        let order: Vec<String> = store.entries().iter().map(|(a, _)| a.to_string()).collect();
        assert_eq!(order, ["selector", "grok", "gemini", "claude", "chatgpt"]);
        assert_eq!(store.get(&ActionId::Selector), Some(DEFAULT_SELECTOR_BINDING));
        assert_eq!(store.path(), None);
    }

    #[test]
    fn match_is_exact() {
        let store = HotkeyStore::in_memory(&OverlayRegistry::builtin());
        assert_eq!(
            store.match_action(Modifiers::OPTION, Key::Space.code()),
            Some(&grok())
        );
        assert_eq!(
            store.match_action(Modifiers::CONTROL | Modifiers::OPTION, 49),
            Some(&gemini())
        );
        assert_eq!(store.match_action(Modifiers::COMMAND, 49), None);
        assert_eq!(store.match_action(Modifiers::OPTION, Key::Return.code()), None);
    }

    #[test]
    fn default_selector_shadows_claude() {
        let store = HotkeyStore::in_memory(&OverlayRegistry::builtin());
        assert_eq!(
            store.match_action(Modifiers::SHIFT | Modifiers::OPTION, 49),
            Some(&ActionId::Selector)
        );
    }

    #[test]
    fn setting_a_to_b_keeps_b_bound() {
        let mut store = HotkeyStore::in_memory(&OverlayRegistry::builtin());
        let b = store.get(&grok()).expect("grok default");
        store.set(gemini(), b).expect("in-memory set");
        assert_eq!(store.get(&grok()), Some(b));
        assert_eq!(store.get(&gemini()), Some(b));
        // grok precedes gemini in registry order.
        assert_eq!(store.match_action(b.modifiers, b.key_code), Some(&grok()));
    }

    #[test]
    fn disable_and_restore_do_not_touch_disk() {
        let path = tmp_file("disable");
        let mut store = HotkeyStore::load(&path, &OverlayRegistry::builtin());
        let prev = store.disable(&grok());
        assert!(prev.is_some());
        assert_eq!(store.get(&grok()), None);
        assert_eq!(store.match_action(Modifiers::OPTION, 49), None);
        store.restore(grok(), prev);
        assert_eq!(store.get(&grok()), prev);
        assert!(!path.exists());
    }

    #[test]
    fn set_persists_and_reloads() {
        let path = tmp_file("persist");
        let reg = OverlayRegistry::builtin();
        let mut store = HotkeyStore::load(&path, &reg);
        let b = KeyBinding::new(Modifiers::COMMAND | Modifiers::SHIFT, Key::K);
        store.set(grok(), b).expect("write");
        store
            .set(ActionId::Selector, KeyBinding::new(Modifiers::CONTROL, Key::Space))
            .expect("write");

        let text = fs::read_to_string(&path).expect("file written");
        assert!(text.contains("\"modifierMask\""));
        assert!(text.contains("\"selector\""));

        let reloaded = HotkeyStore::load(&path, &reg);
        assert_eq!(reloaded.get(&grok()), Some(b));
        assert_eq!(
            reloaded.get(&ActionId::Selector),
            Some(KeyBinding::new(Modifiers::CONTROL, Key::Space))
        );
        assert_eq!(reloaded.get(&gemini()), store.get(&gemini()));
        if let Some(dir) = path.parent() {
            fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn legacy_names_and_malformed_entries() {
        let mut store = HotkeyStore::in_memory(&OverlayRegistry::builtin());
        let n = store
            .apply_json(
                r#"{
                    "unified_menu": {"flags": 1048576, "key": 49},
                    "overlays": {
                        "grok": {"flags": "oops", "key": 49},
                        "gemini": {"flags": 262144, "key": 40},
                        "zeta": {"modifierMask": 524288, "keyCode": 0},
                        "alpha": {"modifierMask": 524288, "keyCode": 1}
                    }
                }"#,
            )
            .expect("document parses");
        assert_eq!(n, 4);
        assert_eq!(
            store.get(&ActionId::Selector),
            Some(KeyBinding::new(Modifiers::COMMAND, Key::Space))
        );
        // Malformed entry falls back to the registry default.
        assert_eq!(
            store.get(&grok()),
            Some(KeyBinding::new(Modifiers::OPTION, Key::Space))
        );
        assert_eq!(
            store.get(&gemini()),
            Some(KeyBinding::new(Modifiers::CONTROL, Key::K))
        );
        // Unknown ids stay, after the registry entries, in file order.
        let tail: Vec<String> = store.entries()[5..].iter().map(|(a, _)| a.to_string()).collect();
        assert_eq!(tail, ["zeta", "alpha"]);
    }

    #[test]
    fn unknown_ids_persist_but_never_match() {
        let mut store = HotkeyStore::in_memory(&OverlayRegistry::builtin());
        store
            .apply_json(r#"{"overlays": {"removed": {"modifierMask": 1048576, "keyCode": 40}}}"#)
            .expect("document parses");
        let removed = ActionId::overlay("removed");
        assert_eq!(
            store.get(&removed),
            Some(KeyBinding::new(Modifiers::COMMAND, Key::K))
        );
        assert_eq!(store.match_action(Modifiers::COMMAND, Key::K.code()), None);
        assert!(store.to_json()["overlays"]["removed"].is_object());

        // Rebinding a registered action onto the same chord still matches it.
        store.put(grok(), Some(KeyBinding::new(Modifiers::COMMAND, Key::K)));
        assert_eq!(store.match_action(Modifiers::COMMAND, Key::K.code()), Some(&grok()));
    }

    #[test]
    fn malformed_file_is_ignored() {
        let path = tmp_file("malformed");
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).expect("dir");
        }
        fs::write(&path, "[1, 2, 3]").expect("write");
        let store = HotkeyStore::load(&path, &OverlayRegistry::builtin());
        assert_eq!(store.get(&ActionId::Selector), Some(DEFAULT_SELECTOR_BINDING));
        assert_eq!(store.entries().len(), 5);
        if let Some(dir) = path.parent() {
            fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn overlay_without_default_is_unset() {
        let mut reg = OverlayRegistry::new();
        reg.register(OverlayDefinition {
            id: "plain".into(),
            name: "Plain".into(),
            url: "https://plain.test".into(),
            icon_ref: PathBuf::from("p.png"),
            default_hotkey: None,
            description: String::new(),
        })
        .expect("valid");
        let store = HotkeyStore::in_memory(&reg);
        assert_eq!(store.get(&ActionId::overlay("plain")), None);
        let json = store.to_json();
        assert!(json["overlays"].as_object().is_some_and(Map::is_empty));
    }

    fn modifiers() -> impl Strategy<Value = Modifiers> {
        (0u64..16).prop_map(|bits| Modifiers::from_cg_flags(bits << 17))
    }

    proptest! {
        #[test]
        fn registered_pair_matches_only_its_action(
            mods in modifiers(),
            key in 0u16..128,
            other_mods in modifiers(),
            other_key in 0u16..128,
        ) {
            let mut reg = OverlayRegistry::new();
            reg.register(OverlayDefinition {
                id: "only".into(),
                name: "Only".into(),
                url: "https://only.test".into(),
                icon_ref: PathBuf::from("o.png"),
                default_hotkey: Some(KeyBinding { modifiers: mods, key_code: key }),
                description: String::new(),
            }).expect("valid");
            let mut store = HotkeyStore::in_memory(&reg);
            store.disable(&ActionId::Selector);

            prop_assert_eq!(store.match_action(mods, key), Some(&ActionId::overlay("only")));
            let expect_hit = other_mods == mods && other_key == key;
            prop_assert_eq!(store.match_action(other_mods, other_key).is_some(), expect_hit);
        }
    }
}
