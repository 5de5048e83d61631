//! Overlay definitions and the on-disk declaration format.

use std::path::{Path, PathBuf};

use mac_keycode::KeyBinding;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One web-chat target the overlay window can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayDefinition {
    /// Unique, non-empty key.
    pub id: String,
    /// Display name used in menus.
    pub name: String,
    /// Absolute http(s) address loaded into the web view.
    pub url: String,
    /// Icon locator; relative refs are resolved by the caller.
    #[serde(rename = "iconPath")]
    pub icon_ref: PathBuf,
    /// Binding applied when the hotkey file has none for this overlay.
    pub default_hotkey: Option<KeyBinding>,
    /// Free-form description; empty when absent.
    pub description: String,
}

impl OverlayDefinition {
    /// Check the required fields and the url shape.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.id.trim().is_empty() {
            missing.push("id");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.url.trim().is_empty() {
            missing.push("url");
        }
        if self.icon_ref.as_os_str().is_empty() {
            missing.push("iconPath");
        }
        if !missing.is_empty() {
            return Err(Error::Validation {
                path: None,
                message: format!("missing required fields: {}", missing.join(", ")),
            });
        }
        if !is_web_url(&self.url) {
            return Err(Error::Validation {
                path: None,
                message: format!(
                    "overlay '{}': url must be an absolute http(s) address, got '{}'",
                    self.id, self.url
                ),
            });
        }
        Ok(())
    }
}

/// True for `http://host...` or `https://host...` with a non-empty host.
fn is_web_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !host.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Raw declaration file contents. Every field is optional at this layer so
/// that missing fields surface as validation errors naming the field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct OverlayDecl {
    id: String,
    name: String,
    url: String,
    icon_path: String,
    default_hotkey: Option<KeyBinding>,
    description: Option<String>,
}

impl OverlayDecl {
    /// Convert to a definition, resolving a relative icon path against `base`.
    pub(crate) fn into_definition(self, base: &Path) -> OverlayDefinition {
        let icon = PathBuf::from(&self.icon_path);
        let icon_ref = if self.icon_path.is_empty() || icon.is_absolute() {
            icon
        } else {
            base.join(icon)
        };
        OverlayDefinition {
            id: self.id,
            name: self.name,
            url: self.url,
            icon_ref,
            default_hotkey: self.default_hotkey,
            description: self.description.unwrap_or_default(),
        }
    }
}

/// Parse one declaration document. `base` is the declaration directory.
pub fn parse_declaration(source: &str, base: &Path) -> Result<OverlayDefinition> {
    let decl: OverlayDecl = serde_json::from_str(source).map_err(|e| Error::Parse {
        path: None,
        message: e.to_string(),
    })?;
    let def = decl.into_definition(base);
    def.validate()?;
    Ok(def)
}
