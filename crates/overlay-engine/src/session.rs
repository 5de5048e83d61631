//! Which overlay is showing, and whether the window is up.

use overlay_config::{OverlayDefinition, OverlayRegistry};
use tracing::{debug, info};

use crate::{Action, Error, Result, SelectorEntry, Surface};

/// Drives a [`Surface`] in response to [`Action`]s and menu requests.
pub struct SessionController<S: Surface> {
    registry: OverlayRegistry,
    surface: S,
    current: Option<String>,
    window_visible: bool,
}

impl<S: Surface> SessionController<S> {
    /// Start hidden with `initial` (or the first registered overlay) current.
    ///
    /// Nothing is loaded into the surface until the first show or selection.
    pub fn new(registry: OverlayRegistry, surface: S, initial: Option<&str>) -> Result<Self> {
        let current = match initial {
            Some(id) if registry.contains(id) => Some(id.to_string()),
            Some(id) => return Err(Error::UnknownOverlay(id.to_string())),
            None => registry.first().map(|o| o.id.clone()),
        };
        Ok(Self {
            registry,
            surface,
            current,
            window_visible: false,
        })
    }

    /// Make `id` current, load its url, and show the window.
    pub fn select_overlay(&mut self, id: &str) -> Result<()> {
        let url = self
            .registry
            .get(id)
            .map(|o| o.url.clone())
            .ok_or_else(|| Error::UnknownOverlay(id.to_string()))?;
        info!(overlay = id, "overlay_selected");
        self.current = Some(id.to_string());
        self.surface.navigate(&url);
        self.show();
        Ok(())
    }

    /// Hide when `id` is already up and focused; otherwise select it.
    pub fn toggle(&mut self, id: &str) -> Result<()> {
        let is_current = self.current.as_deref() == Some(id);
        if self.window_visible && is_current && self.surface.is_focused() {
            debug!(overlay = id, "overlay_toggle_hide");
            self.hide();
            Ok(())
        } else {
            self.select_overlay(id)
        }
    }

    /// Present every registered overlay for picking.
    pub fn show_selector(&mut self) {
        let entries: Vec<SelectorEntry> = self.registry.all().iter().map(selector_entry).collect();
        debug!(count = entries.len(), "selector_presented");
        self.surface.present_selector(&entries);
    }

    /// Run one action.
    pub fn dispatch(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Toggle(id) => self.toggle(id),
            Action::ShowSelector => {
                self.show_selector();
                Ok(())
            }
        }
    }

    /// Show the window with whatever is loaded.
    pub fn show(&mut self) {
        self.surface.show();
        self.window_visible = true;
    }

    /// Hide the window; the current overlay is kept.
    pub fn hide(&mut self) {
        self.surface.hide();
        self.window_visible = false;
    }

    /// Navigate back to the current overlay's home page.
    pub fn reload_home(&mut self) {
        if let Some(url) = self.current_overlay().map(|o| o.url.clone()) {
            self.surface.navigate(&url);
        }
    }

    /// Wipe web data for all sites.
    pub fn clear_site_data(&mut self) {
        info!("site_data_cleared");
        self.surface.clear_site_data();
    }

    /// Id of the current overlay.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The current overlay's definition.
    pub fn current_overlay(&self) -> Option<&OverlayDefinition> {
        self.current.as_deref().and_then(|id| self.registry.get(id))
    }

    /// Whether we believe the window is on screen.
    pub fn is_visible(&self) -> bool {
        self.window_visible
    }

    /// The overlays this session can switch between.
    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    /// The driven surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the driven surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

fn selector_entry(o: &OverlayDefinition) -> SelectorEntry {
    SelectorEntry {
        id: o.id.clone(),
        name: o.name.clone(),
        icon_ref: o.icon_ref.clone(),
    }
}
