use std::path::{Path, PathBuf};

use overlay_config::OverlayRegistry;
use tracing::{debug, error};
use tray_icon::{
    Icon, TrayIcon, TrayIconBuilder,
    menu::{
        Icon as MenuIcon, IconMenuItem, IsMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem,
        Submenu,
    },
};

use crate::menu::{MenuNode, TrayCommand, icon_roots, resolve_icon, tray_layout};

static TRAY_ICON_PNG: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/tray-icon.png"
));

/// Edge length of overlay icons in menus, in points.
pub const MENU_ICON_SIZE: u32 = 16;

fn tray_icon_image() -> Option<Icon> {
    match image::load_from_memory(TRAY_ICON_PNG) {
        Ok(im) => {
            let rgba = im.to_rgba8();
            let (w, h) = rgba.dimensions();
            Icon::from_rgba(rgba.to_vec(), w, h).ok()
        }
        Err(_) => None,
    }
}

/// Load an overlay icon file, scaled for a menu row.
pub fn menu_icon(path: &Path) -> Option<MenuIcon> {
    match image::open(path) {
        Ok(im) => {
            let rgba = im.thumbnail(MENU_ICON_SIZE, MENU_ICON_SIZE).to_rgba8();
            let (w, h) = rgba.dimensions();
            MenuIcon::from_rgba(rgba.into_raw(), w, h).ok()
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "menu_icon_unreadable");
            None
        }
    }
}

/// A menu item the overlay rows can be rendered as.
pub fn overlay_item(label: &str, icon_ref: &Path, roots: &[PathBuf]) -> Box<dyn IsMenuItem> {
    match resolve_icon(icon_ref, roots).and_then(|p| menu_icon(&p)) {
        Some(icon) => Box::new(IconMenuItem::new(label, true, Some(icon), None)),
        None => Box::new(MenuItem::new(label, true, None)),
    }
}

/// The status-bar item and the command behind each of its menu ids.
pub struct Tray {
    _icon: TrayIcon,
    commands: Vec<(MenuId, TrayCommand)>,
}

impl Tray {
    /// Build the tray for `registry`. `None` when the status item cannot be
    /// created.
    pub fn build(registry: &OverlayRegistry) -> Option<Self> {
        let roots = icon_roots();
        let mut commands = Vec::new();
        let menu = Menu::new();
        for item in render(&tray_layout(registry), &roots, &mut commands) {
            let _ = menu.append(item.as_ref());
        }

        let mut builder = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_menu_on_left_click(true);
        if let Some(icon) = tray_icon_image() {
            builder = builder.with_icon(icon).with_icon_as_template(true);
        }
        match builder.with_tooltip("Multi-Overlay").build() {
            Ok(icon) => Some(Self {
                _icon: icon,
                commands,
            }),
            Err(e) => {
                error!("Failed to create tray icon: {}", e);
                None
            }
        }
    }

    /// The command for a picked menu id, if it is one of ours.
    pub fn command(&self, id: &MenuId) -> Option<&TrayCommand> {
        self.commands
            .iter()
            .find(|(mid, _)| mid == id)
            .map(|(_, cmd)| cmd)
    }
}

fn render(
    nodes: &[MenuNode],
    roots: &[PathBuf],
    commands: &mut Vec<(MenuId, TrayCommand)>,
) -> Vec<Box<dyn IsMenuItem>> {
    nodes
        .iter()
        .map(|node| -> Box<dyn IsMenuItem> {
            match node {
                MenuNode::Item {
                    label,
                    icon,
                    command,
                } => {
                    let item = match icon {
                        Some(icon_ref) => overlay_item(label, icon_ref, roots),
                        None => Box::new(MenuItem::new(label, true, None)),
                    };
                    commands.push((item.id().clone(), command.clone()));
                    item
                }
                MenuNode::Submenu { label, children } => {
                    let sub = Submenu::new(label, true);
                    for child in render(children, roots, commands) {
                        let _ = sub.append(child.as_ref());
                    }
                    Box::new(sub)
                }
                MenuNode::Separator => Box::new(PredefinedMenuItem::separator()),
            }
        })
        .collect()
}
