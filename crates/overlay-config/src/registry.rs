//! The ordered set of overlays known to the app.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{Error, OverlayDefinition, Result, builtin::builtin_overlays, overlay};

/// Overlays in discovery order. Ids are unique; the first registration wins.
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    overlays: Vec<OverlayDefinition>,
}

impl OverlayRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding only the built-in overlays.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        for def in builtin_overlays() {
            if let Err(e) = reg.register(def) {
                warn!(error = %e, "builtin_overlay_rejected");
            }
        }
        reg
    }

    /// Built-ins followed by every `*.json` declaration in `dir`.
    pub fn load_all(dir: &Path) -> Self {
        let mut reg = Self::builtin();
        reg.load_dir(dir);
        reg
    }

    /// Register every declaration in `dir`, visited in sorted file-name
    /// order. Bad files are logged and skipped. Returns how many overlays
    /// were added.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let files = match declaration_files(dir) {
            Ok(files) => files,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "overlay_dir_unreadable");
                return 0;
            }
        };
        let mut added = 0;
        for path in files {
            match load_declaration(&path, dir).and_then(|def| self.register(def)) {
                Ok(()) => added += 1,
                Err(e) => warn!(path = %path.display(), error = %e.pretty(), "overlay_decl_skipped"),
            }
        }
        added
    }

    /// Validate and append `def`. Duplicate ids are rejected.
    pub fn register(&mut self, def: OverlayDefinition) -> Result<()> {
        def.validate()?;
        if self.contains(&def.id) {
            return Err(Error::Duplicate { id: def.id });
        }
        debug!(id = %def.id, url = %def.url, "overlay_registered");
        self.overlays.push(def);
        Ok(())
    }

    /// Look up an overlay by id.
    pub fn get(&self, id: &str) -> Option<&OverlayDefinition> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// All overlays in discovery order.
    pub fn all(&self) -> &[OverlayDefinition] {
        &self.overlays
    }

    /// The first registered overlay.
    pub fn first(&self) -> Option<&OverlayDefinition> {
        self.overlays.first()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Ids in discovery order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.overlays.iter().map(|o| o.id.as_str())
    }

    /// Number of overlays.
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}

fn declaration_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let rd = fs::read_dir(dir).map_err(|e| Error::Read {
        path: Some(dir.to_path_buf()),
        message: e.to_string(),
    })?;
    let mut files: Vec<PathBuf> = rd
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn load_declaration(path: &Path, base: &Path) -> Result<OverlayDefinition> {
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    overlay::parse_declaration(&source, base).map_err(|e| e.at(path))
}
