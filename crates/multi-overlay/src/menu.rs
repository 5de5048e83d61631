//! Tray menu layout, independent of the menu toolkit.

use std::{
    env,
    path::{Path, PathBuf},
};

use overlay_config::OverlayRegistry;

/// What a tray item does when picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayCommand {
    /// Switch to an overlay and show it.
    Launch(String),
    /// Pop up the overlay selector.
    ShowSelector,
    /// Record a new selector hotkey.
    SetSelectorHotkey,
    /// Record a new hotkey for an overlay.
    SetHotkey(String),
    /// Reload the current overlay's home page.
    GoToWebsite,
    /// Clear cookies and caches.
    ClearCache,
    /// Install the login item.
    InstallLoginItem,
    /// Remove the login item.
    UninstallLoginItem,
    /// Quit the app.
    Quit,
}

/// One entry in the tray menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    /// A clickable item.
    Item {
        /// Display text.
        label: String,
        /// Icon locator, for overlay rows.
        icon: Option<PathBuf>,
        /// Action when picked.
        command: TrayCommand,
    },
    /// A nested menu.
    Submenu {
        /// Display text.
        label: String,
        /// Children in order.
        children: Vec<Self>,
    },
    /// A divider line.
    Separator,
}

impl MenuNode {
    fn item(label: &str, command: TrayCommand) -> Self {
        Self::Item {
            label: label.to_string(),
            icon: None,
            command,
        }
    }
}

/// The tray menu for `registry`.
pub fn tray_layout(registry: &OverlayRegistry) -> Vec<MenuNode> {
    let overlay_items = |command: fn(String) -> TrayCommand| {
        registry
            .all()
            .iter()
            .map(|o| MenuNode::Item {
                label: o.name.clone(),
                icon: Some(o.icon_ref.clone()),
                command: command(o.id.clone()),
            })
            .collect::<Vec<_>>()
    };
    vec![
        MenuNode::Submenu {
            label: "Launch Overlay".to_string(),
            children: overlay_items(TrayCommand::Launch),
        },
        MenuNode::item("Show Overlay Selector", TrayCommand::ShowSelector),
        MenuNode::Separator,
        MenuNode::item("Set Overlay Selector Hotkey", TrayCommand::SetSelectorHotkey),
        MenuNode::Submenu {
            label: "Set Hotkey".to_string(),
            children: overlay_items(TrayCommand::SetHotkey),
        },
        MenuNode::Separator,
        MenuNode::item("Go to Website", TrayCommand::GoToWebsite),
        MenuNode::item("Clear Web Cache", TrayCommand::ClearCache),
        MenuNode::Separator,
        MenuNode::item("Install Autolauncher", TrayCommand::InstallLoginItem),
        MenuNode::item("Uninstall Autolauncher", TrayCommand::UninstallLoginItem),
        MenuNode::Separator,
        MenuNode::item("Quit", TrayCommand::Quit),
    ]
}

/// Directories searched for relative icon locators: next to the executable,
/// the bundle's `Resources`, then the working directory.
pub fn icon_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(dir) = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        roots.push(dir.join("../Resources"));
        roots.push(dir);
    }
    if let Ok(cwd) = env::current_dir() {
        roots.push(cwd);
    }
    roots
}

/// Find the icon file for `icon_ref`; `None` when it does not exist.
pub fn resolve_icon(icon_ref: &Path, roots: &[PathBuf]) -> Option<PathBuf> {
    if icon_ref.as_os_str().is_empty() {
        return None;
    }
    if icon_ref.is_absolute() {
        return icon_ref.is_file().then(|| icon_ref.to_path_buf());
    }
    roots
        .iter()
        .map(|r| r.join(icon_ref))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use std::{
        fs, process,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn labels(nodes: &[MenuNode]) -> Vec<&str> {
        nodes
            .iter()
            .filter_map(|n| match n {
                MenuNode::Item { label, .. } | MenuNode::Submenu { label, .. } => {
                    Some(label.as_str())
                }
                MenuNode::Separator => None,
            })
            .collect()
    }

    #[test]
    fn top_level_order() {
        let layout = tray_layout(&OverlayRegistry::builtin());
        assert_eq!(
            labels(&layout),
            vec![
                "Launch Overlay",
                "Show Overlay Selector",
                "Set Overlay Selector Hotkey",
                "Set Hotkey",
                "Go to Website",
                "Clear Web Cache",
                "Install Autolauncher",
                "Uninstall Autolauncher",
                "Quit",
            ]
        );
    }

    #[test]
    fn submenus_list_every_overlay() {
        let reg = OverlayRegistry::builtin();
        let layout = tray_layout(&reg);
        let MenuNode::Submenu { children, .. } = &layout[0] else {
            panic!("first node is the launch submenu");
        };
        assert_eq!(children.len(), reg.len());
        let MenuNode::Item { command, icon, .. } = &children[0] else {
            panic!("overlay row is an item");
        };
        assert_eq!(command, &TrayCommand::Launch("grok".to_string()));
        assert!(icon.is_some());

        let hotkeys = layout.iter().find_map(|n| match n {
            MenuNode::Submenu { label, children } if label == "Set Hotkey" => Some(children),
            _ => None,
        });
        let commands: Vec<_> = hotkeys
            .expect("hotkey submenu")
            .iter()
            .filter_map(|n| match n {
                MenuNode::Item { command, .. } => Some(command.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(commands.len(), reg.len());
        assert!(commands.contains(&TrayCommand::SetHotkey("claude".to_string())));
    }

    #[test]
    fn icons_resolve_against_roots() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let root = env::temp_dir().join(format!("multi-overlay-icons-{}-{nanos}", process::id()));
        fs::create_dir_all(root.join("images")).expect("mkdir");
        fs::write(root.join("images/x_logo.png"), b"png").expect("write");

        let roots = vec![root.join("missing"), root.clone()];
        assert_eq!(
            resolve_icon(Path::new("images/x_logo.png"), &roots),
            Some(root.join("images/x_logo.png"))
        );
        assert_eq!(resolve_icon(Path::new("images/none.png"), &roots), None);
        assert_eq!(resolve_icon(Path::new(""), &roots), None);
        fs::remove_dir_all(&root).ok();
    }
}
