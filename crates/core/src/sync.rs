//! Catalog sync: refresh the font catalog and per-font download
//! bundles from the Google Fonts API.
//!
//! Runs as a periodic batch job. Fonts are processed sequentially; a
//! font whose update fails is logged and skipped, and the catalog
//! write at the end still happens.

use std::{
    fs::{create_dir_all, remove_dir_all},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow};

use crate::{
    catalog::{Catalog, FontRecord, WebfontList, merge_capability, needs_update},
    config::{API_URL, BROWSER_HEADERS, EMBED_FILE, FONTS_FILE, FONTS_PUBLIC_FILE_DIR, URLS_FILE},
    embed::{Subset, download_url, embed_url, family_slug, localize, split_subsets},
    fetch::Fetch,
    io::write_json_file,
};

/// Settings for one sync run.
pub struct SyncOptions {
    /// Directory holding `fonts.json` and the per-font bundles.
    pub fonts_dir: PathBuf,
    /// Google Fonts API key.
    pub api_key: String,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSummary {
    /// Fonts in the written catalog.
    pub total: usize,
    /// Fonts whose `lastModified` was new or later than stored.
    pub to_update: usize,
    /// Fonts whose bundle was rewritten successfully.
    pub updated: usize,
}

/// One catalog sync run over a [`Fetch`] implementation.
pub struct SyncRunner<'a, F: Fetch> {
    fetch: &'a F,
    fonts_dir: PathBuf,
    api_key: String,
}

impl<'a, F: Fetch> SyncRunner<'a, F> {
    pub fn new(fetch: &'a F, options: SyncOptions) -> Self {
        Self { fetch, fonts_dir: options.fonts_dir, api_key: options.api_key }
    }

    /// Fetch the font lists, rewrite bundles for changed fonts, and
    /// overwrite the catalog file with the full merged list.
    ///
    /// A font whose bundle rewrite fails keeps its previous catalog
    /// entry when one exists and is dropped when it was new, so the
    /// catalog never points at a bundle that was not written.
    pub fn run(&self) -> Result<SyncSummary> {
        let base = self.fetch_font_list("VF")?;
        let woff2 = self.fetch_font_list("WOFF2")?;
        let merged = merge_capability(base, woff2);

        create_dir_all(&self.fonts_dir)
            .with_context(|| format!("Failed to create {}", self.fonts_dir.display()))?;
        let catalog_path = self.fonts_dir.join(FONTS_FILE);
        let old = Catalog::load_or_empty(&catalog_path)?;

        let to_update = merged
            .iter()
            .filter(|font| needs_update(old.by_family(&font.family), font))
            .count();
        println!("Found {to_update} fonts updated since last run.");

        let mut fonts = Vec::with_capacity(merged.len());
        let mut updated = 0;
        for mut font in merged {
            let old_font = old.by_family(&font.family);
            if !needs_update(old_font, &font) {
                // The API response carries no id; keep the slug derived
                // on the run that last wrote this font's bundle.
                if let Some(old_font) = old_font {
                    font.id = old_font.id.clone();
                }
                fonts.push(font);
                continue;
            }
            match self.save_font(&mut font) {
                Ok(()) => {
                    updated += 1;
                    fonts.push(font);
                }
                Err(e) => {
                    log::warn!("skipping {}: {e:#}", font.family);
                    if let Some(old_font) = old_font {
                        fonts.push(old_font.clone());
                    }
                }
            }
        }

        let total = fonts.len();
        Catalog { fonts }
            .save(&catalog_path)
            .with_context(|| format!("Failed to write {}", catalog_path.display()))?;

        println!("{updated}/{to_update} fonts updated successfully.");
        Ok(SyncSummary { total, to_update, updated })
    }

    fn fetch_font_list(&self, capability: &str) -> Result<Vec<FontRecord>> {
        let url = format!("{API_URL}?key={}&capability={capability}", self.api_key);
        let value = self
            .fetch
            .get_json(&url)
            .with_context(|| format!("Failed to fetch font list (capability={capability})"))?;
        let list: WebfontList = serde_json::from_value(value)?;
        Ok(list.items)
    }

    /// Rewrite one font's bundle and set its id to the derived slug.
    fn save_font(&self, font: &mut FontRecord) -> Result<()> {
        println!("Updating {}", font.family);

        let css = self.fetch.get_text(&embed_url(font), BROWSER_HEADERS)?;
        let subsets = split_subsets(&css);
        let first = subsets
            .first()
            .filter(|subset| !subset.font.trim().is_empty())
            .ok_or_else(|| anyhow!("no subsets in embed response for {}", font.family))?;
        let slug = family_slug(&first.font)
            .ok_or_else(|| anyhow!("unable to get slug for {}", font.family))?;

        let dir = self.fonts_dir.join(&slug);
        if dir.exists() {
            remove_dir_all(&dir)?;
        }
        create_dir_all(&dir)?;

        // Point the stored @font-face text at the subtree the runtime
        // download creates under each context's public file area.
        let public_dir = format!("{FONTS_PUBLIC_FILE_DIR}/{slug}");
        let localized: Vec<Subset> = subsets
            .iter()
            .map(|subset| Subset {
                subset: subset.subset.clone(),
                font: localize(&subset.font, &public_dir),
            })
            .collect();
        write_json_file(&dir.join(EMBED_FILE), &localized)?;

        let urls = subsets
            .iter()
            .map(|subset| {
                download_url(&subset.font).ok_or_else(|| {
                    anyhow!(
                        "unable to find download URL for {} in subset {}",
                        font.family,
                        subset.subset
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        write_json_file(&dir.join(URLS_FILE), &urls)?;

        font.id = slug;
        Ok(())
    }
}
