use mac_keycode::Modifiers;

/// Keys handled by the overlay window itself while it has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowShortcut {
    /// Hide the overlay.
    Hide,
    /// Quit the app.
    Quit,
    /// A standard text edit on the page.
    Edit(EditAction),
}

/// Text edits the window performs itself, since the app has no Edit menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// `a`
    SelectAll,
    /// `c`
    Copy,
    /// `x`
    Cut,
    /// `v`
    Paste,
}

/// Map an in-window key press to a shortcut.
///
/// Command or Control (without Option) plus `h` hides and plus `q` quits;
/// plus `a`, `c`, `x` or `v` is the matching [`EditAction`]. `key` is the
/// character ignoring modifiers.
pub fn window_shortcut(modifiers: Modifiers, key: &str) -> Option<WindowShortcut> {
    let primary = modifiers.intersects(Modifiers::COMMAND | Modifiers::CONTROL);
    if !primary || modifiers.contains(Modifiers::OPTION) {
        return None;
    }
    let shortcut = match key.to_ascii_lowercase().as_str() {
        "h" => WindowShortcut::Hide,
        "q" => WindowShortcut::Quit,
        "a" => WindowShortcut::Edit(EditAction::SelectAll),
        "c" => WindowShortcut::Edit(EditAction::Copy),
        "x" => WindowShortcut::Edit(EditAction::Cut),
        "v" => WindowShortcut::Edit(EditAction::Paste),
        _ => return None,
    };
    Some(shortcut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_or_control() {
        assert_eq!(
            window_shortcut(Modifiers::COMMAND, "h"),
            Some(WindowShortcut::Hide)
        );
        assert_eq!(
            window_shortcut(Modifiers::CONTROL, "q"),
            Some(WindowShortcut::Quit)
        );
        assert_eq!(
            window_shortcut(Modifiers::COMMAND | Modifiers::SHIFT, "H"),
            Some(WindowShortcut::Hide)
        );
    }

    #[test]
    fn option_or_bare_keys_ignored() {
        assert_eq!(window_shortcut(Modifiers::COMMAND | Modifiers::OPTION, "h"), None);
        assert_eq!(window_shortcut(Modifiers::empty(), "q"), None);
        assert_eq!(window_shortcut(Modifiers::COMMAND, "k"), None);
        assert_eq!(window_shortcut(Modifiers::CONTROL | Modifiers::OPTION, "v"), None);
        assert_eq!(window_shortcut(Modifiers::SHIFT, "a"), None);
    }

    #[test]
    fn edit_keys() {
        assert_eq!(
            window_shortcut(Modifiers::COMMAND, "a"),
            Some(WindowShortcut::Edit(EditAction::SelectAll))
        );
        assert_eq!(
            window_shortcut(Modifiers::COMMAND, "C"),
            Some(WindowShortcut::Edit(EditAction::Copy))
        );
        assert_eq!(
            window_shortcut(Modifiers::CONTROL, "x"),
            Some(WindowShortcut::Edit(EditAction::Cut))
        );
        assert_eq!(
            window_shortcut(Modifiers::COMMAND | Modifiers::SHIFT, "v"),
            Some(WindowShortcut::Edit(EditAction::Paste))
        );
    }
}
