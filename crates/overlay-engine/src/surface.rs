use std::path::PathBuf;

/// One row of the overlay selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorEntry {
    /// Overlay id returned when the row is picked.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon locator.
    pub icon_ref: PathBuf,
}

/// The overlay window and its web view, as seen by the session controller.
pub trait Surface {
    /// Load `url` in the web view.
    fn navigate(&mut self, url: &str);
    /// Order the window front, focus it, and focus the page's prompt.
    fn show(&mut self);
    /// Hide the window and return focus to the previous app.
    fn hide(&mut self);
    /// Whether the window currently has keyboard focus.
    fn is_focused(&self) -> bool;
    /// Pop up the overlay selector. The pick comes back as a separate
    /// selection request.
    fn present_selector(&mut self, entries: &[SelectorEntry]);
    /// Remove cookies, caches and storage for every site.
    fn clear_site_data(&mut self);
}
