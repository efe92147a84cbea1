//! Font catalog: the data model shared between sync and the runtime
//! handlers, plus the `fonts.json` file that holds it.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    config::EXCLUDED_FAMILIES,
    error::Result,
    io::{load_json_file, write_json_file},
};

/// A variation axis as reported by the fonts API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub tag: String,
    pub start: f64,
    pub end: f64,
}

/// One font in the catalog.
///
/// Field names follow the fonts API JSON, so the same struct decodes
/// API responses and catalog rows. `id` is empty until a sync run
/// derives the family slug from the font's file-hosting URL; it then
/// doubles as the bundle directory name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontRecord {
    #[serde(default)]
    pub id: String,
    pub family: String,
    pub category: String,
    pub subsets: Vec<String>,
    pub variants: Vec<String>,
    /// Last modified date, `YYYY-MM-DD`.
    pub last_modified: String,
    /// Upstream file version, usually in the format `v12`.
    pub version: String,
    /// Variation axes; present only for variable fonts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes: Option<Vec<Axis>>,
    /// URL of a woff2 sample for menu previews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
}

impl FontRecord {
    /// Whether the font is variable (has a non-empty axis list).
    pub fn is_variable(&self) -> bool {
        self.axes.as_ref().is_some_and(|axes| !axes.is_empty())
    }
}

/// Response shape of the webfonts API.
#[derive(Debug, Deserialize)]
pub struct WebfontList {
    pub items: Vec<FontRecord>,
}

/// The full set of available fonts, backed by `fonts.json`.
///
/// Always written wholesale; per-font bundles are rewritten separately
/// and only when a font changed.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub fonts: Vec<FontRecord>,
}

impl Catalog {
    /// Load the catalog file. Missing or invalid files are errors.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self { fonts: load_json_file(path)? })
    }

    /// Load the catalog file, treating a missing file as an empty
    /// catalog. Used by sync so a first run updates every font.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Overwrite the catalog file with the current font list.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_file(path, &self.fonts)
    }

    pub fn get(&self, id: &str) -> Option<&FontRecord> {
        self.fonts.iter().find(|font| font.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn by_family(&self, family: &str) -> Option<&FontRecord> {
        self.fonts.iter().find(|font| font.family == family)
    }
}

/// Whether a font needs its bundle re-fetched: it is new, or its
/// `lastModified` date is strictly later than the stored one.
///
/// Dates that fail to parse as `YYYY-MM-DD` fall back to a string
/// inequality check, so a changed but unparsable value still updates.
pub fn needs_update(old: Option<&FontRecord>, new: &FontRecord) -> bool {
    let Some(old) = old else {
        return true;
    };
    match (parse_date(&old.last_modified), parse_date(&new.last_modified)) {
        (Some(old_date), Some(new_date)) => new_date > old_date,
        _ => old.last_modified != new.last_modified,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Merge the general font list with the WOFF2-capability list.
///
/// Drops excluded families and, for each remaining font, prefers the
/// WOFF2 list's menu sample when one exists.
pub fn merge_capability(base: Vec<FontRecord>, woff2: Vec<FontRecord>) -> Vec<FontRecord> {
    base.into_iter()
        .filter(|font| !EXCLUDED_FAMILIES.contains(&font.family.as_str()))
        .map(|mut font| {
            let sample = woff2
                .iter()
                .find(|w| w.family == font.family)
                .and_then(|w| w.menu.clone());
            if sample.is_some() {
                font.menu = sample;
            }
            font
        })
        .collect()
}
