use std::{env, fs, path::PathBuf, process};

use mac_keycode::{Key, KeyBinding, Modifiers};
use overlay_config::{ActionId, HotkeyStore, OverlayDefinition, OverlayRegistry};
use overlay_engine::{
    Action, Classifier, Decision, Error, Outcome, SessionController,
    test_support::{FakeSurface, SurfaceCall},
};
use proptest::prelude::*;

const GROK_URL: &str = "https://grok.com?referrer=macos-multi-overlay";

fn session(surface: FakeSurface) -> SessionController<FakeSurface> {
    SessionController::new(OverlayRegistry::builtin(), surface, None).expect("builtin session")
}

fn fixture_overlay(id: &str) -> OverlayDefinition {
    OverlayDefinition {
        id: id.into(),
        name: id.to_uppercase(),
        url: format!("https://{id}.test"),
        icon_ref: PathBuf::from(format!("{id}.png")),
        default_hotkey: None,
        description: format!("{id} fixture"),
    }
}

#[test]
fn starts_hidden_on_first_overlay() {
    let s = session(FakeSurface::new());
    assert_eq!(s.current(), Some("grok"));
    assert!(!s.is_visible());
    assert!(s.surface().calls.is_empty());
}

#[test]
fn initial_site_must_exist() {
    let err = SessionController::new(OverlayRegistry::builtin(), FakeSurface::new(), Some("bard"))
        .err()
        .expect("unknown site rejected");
    assert!(matches!(err, Error::UnknownOverlay(ref id) if id == "bard"));

    let s = SessionController::new(OverlayRegistry::builtin(), FakeSurface::new(), Some("claude"))
        .expect("known site");
    assert_eq!(s.current(), Some("claude"));
}

#[test]
fn select_unknown_changes_nothing() {
    let mut s = session(FakeSurface::new());
    let err = s.select_overlay("nope").unwrap_err();
    assert!(matches!(err, Error::UnknownOverlay(_)));
    assert_eq!(s.current(), Some("grok"));
    assert!(s.surface().calls.is_empty());
}

#[test]
fn toggle_shows_then_hides() {
    let mut s = session(FakeSurface::new());
    s.toggle("grok").expect("toggle");
    assert!(s.is_visible());
    assert_eq!(
        s.surface().calls,
        [SurfaceCall::Navigate(GROK_URL.into()), SurfaceCall::Show]
    );

    s.toggle("grok").expect("toggle");
    assert!(!s.is_visible());
    assert_eq!(s.current(), Some("grok"));
    assert_eq!(s.surface().calls.last(), Some(&SurfaceCall::Hide));
}

#[test]
fn toggle_other_overlay_switches() {
    let mut s = session(FakeSurface::new());
    s.toggle("grok").expect("toggle");
    s.toggle("gemini").expect("toggle");
    assert!(s.is_visible());
    assert_eq!(s.current(), Some("gemini"));
    assert_eq!(
        s.surface().navigations(),
        [GROK_URL, "https://gemini.google.com"]
    );
}

#[test]
fn toggle_when_unfocused_reshows() {
    let mut s = session(FakeSurface::new());
    s.toggle("grok").expect("toggle");
    // Another app took focus; the window is still up.
    s.surface_mut().focused = false;
    s.toggle("grok").expect("toggle");
    assert!(s.is_visible());
    assert_eq!(s.surface().navigations().len(), 2);
}

#[test]
fn selector_lists_registry_in_order() {
    let mut reg = OverlayRegistry::builtin();
    reg.register(fixture_overlay("extra")).expect("valid");
    let mut s = SessionController::new(reg, FakeSurface::new(), None).expect("session");
    s.dispatch(&Action::ShowSelector).expect("dispatch");
    assert_eq!(
        s.surface().calls,
        [SurfaceCall::Selector(vec![
            "grok".into(),
            "gemini".into(),
            "claude".into(),
            "chatgpt".into(),
            "extra".into(),
        ])]
    );
    assert!(!s.is_visible());
}

#[test]
fn reload_home_and_clear_data() {
    let mut s = session(FakeSurface::new());
    s.select_overlay("claude").expect("select");
    s.reload_home();
    s.clear_site_data();
    assert_eq!(
        s.surface().calls[2..],
        [
            SurfaceCall::Navigate("https://claude.ai".into()),
            SurfaceCall::ClearSiteData
        ]
    );
}

#[test]
fn key_down_drives_session() {
    let reg = OverlayRegistry::builtin();
    let mut classifier = Classifier::new(HotkeyStore::in_memory(&reg));
    let mut s = SessionController::new(reg, FakeSurface::new(), None).expect("session");

    let out = classifier.on_key_down(
        Modifiers::CONTROL | Modifiers::OPTION,
        Key::Space.code(),
        None,
    );
    assert_eq!(out.decision(), Decision::Consume);
    let Outcome::Action(action) = out else {
        panic!("expected an action, got {out:?}");
    };
    s.dispatch(&action).expect("dispatch");
    assert_eq!(s.current(), Some("gemini"));
    assert!(s.is_visible());
}

#[test]
fn stale_hotkey_entry_passes_through() {
    let dir = env::temp_dir().join(format!("overlay-engine-stale-{}", process::id()));
    fs::create_dir_all(&dir).expect("dir");
    let path = dir.join("hotkeys.json");
    fs::write(
        &path,
        r#"{"overlays": {"removed": {"modifierMask": 1048576, "keyCode": 40}}}"#,
    )
    .expect("write");

    let reg = OverlayRegistry::builtin();
    let mut classifier = Classifier::new(HotkeyStore::load(&path, &reg));
    let out = classifier.on_key_down(Modifiers::COMMAND, Key::K.code(), Some("k"));
    assert_eq!(out, Outcome::Pass);
    assert_eq!(out.decision(), Decision::Pass);
    assert!(
        classifier
            .store()
            .get(&ActionId::overlay("removed"))
            .is_some()
    );
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn rebind_selector_then_use_it() {
    let reg = OverlayRegistry::builtin();
    let mut classifier = Classifier::new(HotkeyStore::in_memory(&reg));
    classifier.begin_capture(ActionId::Selector);
    let out = classifier.on_key_down(Modifiers::COMMAND, Key::Escape.code(), None);
    match out {
        Outcome::Captured { target, label, .. } => {
            assert_eq!(target, ActionId::Selector);
            assert_eq!(label, "Command + Escape");
        }
        other => panic!("expected capture, got {other:?}"),
    }
    // claude's default no longer collides with the selector.
    let out = classifier.on_key_down(Modifiers::SHIFT | Modifiers::OPTION, 49, None);
    assert_eq!(out, Outcome::Action(Action::Toggle("claude".into())));
    let out = classifier.on_key_down(Modifiers::COMMAND, Key::Escape.code(), None);
    assert_eq!(out, Outcome::Action(Action::ShowSelector));
}

fn modifiers() -> impl Strategy<Value = Modifiers> {
    (0u64..16).prop_map(|bits| Modifiers::from_cg_flags(bits << 17))
}

proptest! {
    #[test]
    fn capture_round_trip(
        idx in 0usize..5,
        mods in modifiers(),
        key in 0u16..128,
    ) {
        let reg = OverlayRegistry::builtin();
        let mut classifier = Classifier::new(HotkeyStore::in_memory(&reg));
        let target = classifier.store().entries()[idx].0.clone();
        classifier.begin_capture(target.clone());
        let out = classifier.on_key_down(mods, key, None);
        prop_assert_eq!(out.decision(), Decision::Consume);
        prop_assert!(!classifier.is_capturing());
        prop_assert_eq!(
            classifier.store().get(&target),
            Some(KeyBinding { modifiers: mods, key_code: key })
        );
    }

    #[test]
    fn toggle_without_focus_is_idempotent(idx in 0usize..4, times in 1usize..5) {
        let mut s = session(FakeSurface::never_focused());
        let id = s.registry().all()[idx].id.clone();
        for _ in 0..times {
            s.toggle(&id).expect("toggle");
        }
        prop_assert!(s.is_visible());
        prop_assert_eq!(s.current(), Some(id.as_str()));
    }
}
