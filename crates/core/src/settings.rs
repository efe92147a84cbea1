//! Settings repository: the per-context store holding each site's
//! enabled-font list as plain JSON data.

use std::{collections::HashMap, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    catalog::FontRecord,
    config::FONTS_SETTING,
    error::Result,
    io::{load_json_file, write_json_file},
};

/// Key/value settings keyed by (context, setting name).
///
/// Stand-in for the host platform's settings API; handlers receive an
/// implementation explicitly rather than reaching for globals.
pub trait SettingsStore {
    fn get(&self, context: &str, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, context: &str, key: &str, value: Value) -> Result<()>;
}

/// A font an admin has enabled for a context.
///
/// Carries the full catalog fields at the time of enabling so the
/// settings view can render without consulting the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnabledFont {
    pub id: String,
    pub family: String,
    pub category: String,
    pub subsets: Vec<String>,
    pub variants: Vec<String>,
    pub last_modified: String,
    pub version: String,
}

impl From<&FontRecord> for EnabledFont {
    fn from(font: &FontRecord) -> Self {
        Self {
            id: font.id.clone(),
            family: font.family.clone(),
            category: font.category.clone(),
            subsets: font.subsets.clone(),
            variants: font.variants.clone(),
            last_modified: font.last_modified.clone(),
            version: font.version.clone(),
        }
    }
}

/// Read a context's enabled-font list; absent setting means empty.
pub fn enabled_fonts<S: SettingsStore>(store: &S, context: &str) -> Result<Vec<EnabledFont>> {
    match store.get(context, FONTS_SETTING)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}

/// Persist a context's enabled-font list.
pub fn save_enabled_fonts<S: SettingsStore>(
    store: &mut S,
    context: &str,
    fonts: &[EnabledFont],
) -> Result<()> {
    store.set(context, FONTS_SETTING, serde_json::to_value(fonts)?)
}

/// Append a font to the list, unique by id, sorted by family.
pub fn push_unique(mut fonts: Vec<EnabledFont>, font: EnabledFont) -> Vec<EnabledFont> {
    if !fonts.iter().any(|f| f.id == font.id) {
        fonts.push(font);
    }
    fonts.sort_by(|a, b| a.family.cmp(&b.family));
    fonts
}

/// Settings store persisted as one JSON file, context → key → value.
pub struct JsonSettingsStore {
    path: PathBuf,
    data: HashMap<String, HashMap<String, Value>>,
}

impl JsonSettingsStore {
    /// Open the store, reading any existing file. A missing file is an
    /// empty store; an unreadable or invalid file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() { load_json_file(&path)? } else { HashMap::new() };
        Ok(Self { path, data })
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, context: &str, key: &str) -> Result<Option<Value>> {
        Ok(self.data.get(context).and_then(|settings| settings.get(key)).cloned())
    }

    fn set(&mut self, context: &str, key: &str, value: Value) -> Result<()> {
        self.data
            .entry(context.to_string())
            .or_default()
            .insert(key.to_string(), value);
        write_json_file(&self.path, &self.data)
    }
}

/// In-memory settings store for tests.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    data: HashMap<String, HashMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, context: &str, key: &str) -> Result<Option<Value>> {
        Ok(self.data.get(context).and_then(|settings| settings.get(key)).cloned())
    }

    fn set(&mut self, context: &str, key: &str, value: Value) -> Result<()> {
        self.data
            .entry(context.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }
}
