//! Module registry: module name → delivery category.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::RegistryError;

/// How a requested module can be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleCategory {
    /// An existing template covers it
    TemplateReady,
    /// Small custom build
    SimpleCustom,
    /// Parked for future consideration
    Wishlist,
}

impl ModuleCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TemplateReady => "template_ready",
            Self::SimpleCustom => "simple_custom",
            Self::Wishlist => "wishlist",
        }
    }

    /// Whether requests in this category go straight to development
    pub const fn goes_to_development(self) -> bool {
        matches!(self, Self::TemplateReady | Self::SimpleCustom)
    }
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known modules, iterated in name order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleCategory>,
}

impl ModuleRegistry {
    pub fn new(modules: BTreeMap<String, ModuleCategory>) -> Self {
        Self { modules }
    }

    /// Read a `{ "module": "category" }` JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// [`load`](Self::load), falling back to [`Default`] on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(error = %e, "Module registry unavailable, using built-in defaults");
                Self::default()
            }
        }
    }

    pub fn get(&self, module: &str) -> Option<ModuleCategory> {
        self.modules.get(module).copied()
    }

    /// First module whose name occurs in `text`
    pub fn find_in(&self, text: &str) -> Option<(&str, ModuleCategory)> {
        self.modules
            .iter()
            .find(|(name, _)| text.contains(name.as_str()))
            .map(|(name, category)| (name.as_str(), *category))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new(BTreeMap::from([
            ("analytics".to_string(), ModuleCategory::TemplateReady),
            ("simple_info_page".to_string(), ModuleCategory::SimpleCustom),
            ("client_upload_portal".to_string(), ModuleCategory::Wishlist),
        ]))
    }
}
