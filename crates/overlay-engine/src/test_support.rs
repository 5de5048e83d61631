//! Test support utilities for overlay-engine unit and integration tests.
//! These helpers are public so the `tests/` suite can use them.

use crate::{SelectorEntry, Surface};

/// A call recorded by [`FakeSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    /// `navigate(url)`
    Navigate(String),
    /// `show()`
    Show,
    /// `hide()`
    Hide,
    /// `present_selector(ids)`
    Selector(Vec<String>),
    /// `clear_site_data()`
    ClearSiteData,
}

/// In-memory [`Surface`] that records calls.
#[derive(Debug, Default)]
pub struct FakeSurface {
    /// Calls in order.
    pub calls: Vec<SurfaceCall>,
    /// Reported by `is_focused`.
    pub focused: bool,
    /// Whether `show` grants focus.
    pub focus_on_show: bool,
}

impl FakeSurface {
    /// A surface that gains focus when shown, like a well-behaved window.
    pub fn new() -> Self {
        Self {
            focus_on_show: true,
            ..Self::default()
        }
    }

    /// A surface that never reports focus.
    pub fn never_focused() -> Self {
        Self::default()
    }

    /// Urls navigated to, in order.
    pub fn navigations(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Navigate(u) => Some(u.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for FakeSurface {
    fn navigate(&mut self, url: &str) {
        self.calls.push(SurfaceCall::Navigate(url.to_string()));
    }

    fn show(&mut self) {
        self.focused = self.focus_on_show;
        self.calls.push(SurfaceCall::Show);
    }

    fn hide(&mut self) {
        self.focused = false;
        self.calls.push(SurfaceCall::Hide);
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn present_selector(&mut self, entries: &[SelectorEntry]) {
        self.calls
            .push(SurfaceCall::Selector(entries.iter().map(|e| e.id.clone()).collect()));
    }

    fn clear_site_data(&mut self) {
        self.calls.push(SurfaceCall::ClearSiteData);
    }
}
