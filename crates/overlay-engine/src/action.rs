use overlay_config::ActionId;

/// A request for the session controller, produced by hotkeys, the tray menu,
/// or the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the overlay, or hide it if it is already up and focused.
    Toggle(String),
    /// Pop up the overlay selector.
    ShowSelector,
}

impl From<&ActionId> for Action {
    fn from(id: &ActionId) -> Self {
        match id {
            ActionId::Selector => Self::ShowSelector,
            ActionId::Overlay(id) => Self::Toggle(id.clone()),
        }
    }
}
