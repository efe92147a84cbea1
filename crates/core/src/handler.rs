//! Admin request flows: enable a font, disable a font, and resolve the
//! enabled list for the settings page.
//!
//! Every add/remove request ends in a redirect back to the settings
//! page. Failures are logged, not surfaced; the one exception is the
//! settings page itself, which shows a technical error when the
//! catalog cannot be loaded.

use std::{path::PathBuf, sync::LazyLock};

use regex::Regex;

use crate::{
    catalog::{Catalog, FontRecord},
    config::{FONTS_FILE, URLS_FILE},
    embed::woff2_filename,
    error::Result,
    fetch::Fetch,
    io::load_json_file,
    settings::{EnabledFont, SettingsStore, enabled_fonts, push_unique, save_enabled_fonts},
    storage::PublicStorage,
};

/// Font ids are restricted alphanumeric tokens; anything else is
/// rejected before it can reach a filesystem path.
static VALID_FONT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

pub fn is_valid_font_id(id: &str) -> bool {
    VALID_FONT_ID.is_match(id)
}

/// How an add/remove request concluded. All variants redirect back to
/// the settings page; the variant records why, for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Redirect {
    /// The operation completed.
    Done,
    /// The font id was not a valid token; nothing was touched.
    InvalidId,
    /// The font id is not in the catalog; nothing was touched.
    UnknownFont,
    /// An I/O or network failure aborted the operation.
    Failed,
}

/// Handler for admin font requests against one deployment's storage.
pub struct FontsHandler<S: SettingsStore, F: Fetch> {
    fonts_dir: PathBuf,
    storage: PublicStorage,
    store: S,
    fetch: F,
}

impl<S: SettingsStore, F: Fetch> FontsHandler<S, F> {
    pub fn new(fonts_dir: impl Into<PathBuf>, storage: PublicStorage, store: S, fetch: F) -> Self {
        Self { fonts_dir: fonts_dir.into(), storage, store, fetch }
    }

    /// Enable a font for a context: download its files into public
    /// storage and append it to the context's enabled list.
    pub fn add(&mut self, font_id: &str, context: &str) -> Redirect {
        if !is_valid_font_id(font_id) {
            log::warn!("rejected font id `{font_id}`");
            return Redirect::InvalidId;
        }

        let catalog = match self.load_catalog() {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("add {font_id}: {e}");
                return Redirect::Failed;
            }
        };
        let Some(details) = catalog.get(font_id) else {
            log::warn!("add {font_id}: not in catalog");
            return Redirect::UnknownFont;
        };

        if let Err(e) = self.download(font_id, context) {
            log::error!("add {font_id}: {e}");
            return Redirect::Failed;
        }

        let result = enabled_fonts(&self.store, context).and_then(|fonts| {
            let fonts = push_unique(fonts, EnabledFont::from(details));
            save_enabled_fonts(&mut self.store, context, &fonts)
        });
        if let Err(e) = result {
            log::error!("add {font_id}: {e}");
            return Redirect::Failed;
        }
        Redirect::Done
    }

    /// Disable a font for a context: drop it from the enabled list and
    /// delete its files from public storage.
    pub fn remove(&mut self, font_id: &str, context: &str) -> Redirect {
        if !is_valid_font_id(font_id) {
            log::warn!("rejected font id `{font_id}`");
            return Redirect::InvalidId;
        }

        let catalog = match self.load_catalog() {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("remove {font_id}: {e}");
                return Redirect::Failed;
            }
        };
        if !catalog.contains(font_id) {
            log::warn!("remove {font_id}: not in catalog");
            return Redirect::UnknownFont;
        }

        let result = enabled_fonts(&self.store, context).and_then(|fonts| {
            let remaining: Vec<EnabledFont> =
                fonts.into_iter().filter(|font| font.id != font_id).collect();
            save_enabled_fonts(&mut self.store, context, &remaining)
        });
        if let Err(e) = result {
            log::error!("remove {font_id}: {e}");
            return Redirect::Failed;
        }

        if let Err(e) = self.storage.remove_font_dir(context, font_id) {
            log::error!("remove {font_id}: {e}");
            return Redirect::Failed;
        }
        Redirect::Done
    }

    /// Resolve a context's enabled list against the catalog for the
    /// settings page. Catalog load failure propagates so the page can
    /// show the technical error.
    pub fn enabled_fonts(&self, context: &str) -> Result<Vec<FontRecord>> {
        let catalog = self.load_catalog()?;
        let enabled = enabled_fonts(&self.store, context)?;
        Ok(catalog
            .fonts
            .iter()
            .filter(|font| enabled.iter().any(|e| e.id == font.id))
            .cloned()
            .collect())
    }

    /// All catalog options, for the settings page pick list.
    pub fn options(&self) -> Result<Vec<FontRecord>> {
        Ok(self.load_catalog()?.fonts)
    }

    fn load_catalog(&self) -> Result<Catalog> {
        Catalog::load(&self.fonts_dir.join(FONTS_FILE))
    }

    /// Download every file in the font's `urls.json` into a freshly
    /// recreated directory under the context's public file area.
    fn download(&self, font_id: &str, context: &str) -> Result<()> {
        let urls: Vec<String> = load_json_file(&self.fonts_dir.join(font_id).join(URLS_FILE))?;

        let dest_dir = self.storage.recreate_font_dir(context, font_id)?;
        for url in &urls {
            let filename = woff2_filename(url)?;
            self.fetch.download(url, &dest_dir.join(filename))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use serde_json::Value;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        config::URLS_FILE,
        error::{Error, Result as CoreResult},
        settings::MemorySettingsStore,
    };

    /// Writes a fixed payload for any URL it is asked to download.
    #[derive(Default)]
    struct FakeDownloader;

    impl Fetch for FakeDownloader {
        fn get_json(&self, url: &str) -> CoreResult<Value> {
            panic!("handlers never fetch JSON, got {url}");
        }

        fn get_text(&self, url: &str, _headers: &[(&str, &str)]) -> CoreResult<String> {
            panic!("handlers never fetch text, got {url}");
        }

        fn download(&self, url: &str, dest: &Path) -> CoreResult<()> {
            if url.contains("missing") {
                return Err(Error::HttpStatus { url: url.to_string(), status: 404 });
            }
            fs::write(dest, b"woff2-bytes")?;
            Ok(())
        }
    }

    struct Fixture {
        fonts_dir: TempDir,
        public_dir: TempDir,
    }

    impl Fixture {
        /// A catalog with one synced font, `roboto`, whose bundle lists
        /// the given URLs.
        fn new(urls: &[&str]) -> Self {
            let fixture =
                Self { fonts_dir: TempDir::new().unwrap(), public_dir: TempDir::new().unwrap() };

            let font = FontRecord {
                id: "roboto".to_string(),
                family: "Roboto".to_string(),
                category: "sans-serif".to_string(),
                subsets: vec!["latin".to_string()],
                variants: vec!["regular".to_string()],
                last_modified: "2024-01-01".to_string(),
                version: "v1".to_string(),
                axes: None,
                menu: None,
            };
            Catalog { fonts: vec![font] }
                .save(&fixture.fonts_dir.path().join(FONTS_FILE))
                .unwrap();

            let bundle_dir = fixture.fonts_dir.path().join("roboto");
            fs::create_dir_all(&bundle_dir).unwrap();
            crate::io::write_json_file(&bundle_dir.join(URLS_FILE), &urls).unwrap();

            fixture
        }

        fn handler(&self) -> FontsHandler<MemorySettingsStore, FakeDownloader> {
            FontsHandler::new(
                self.fonts_dir.path(),
                PublicStorage::new(self.public_dir.path()),
                MemorySettingsStore::new(),
                FakeDownloader,
            )
        }
    }

    const ROBOTO_URL: &str = "https://fonts.gstatic.com/s/roboto/v1/roboto-latin.woff2";

    #[test]
    fn add_downloads_files_and_enables_font() {
        let fixture = Fixture::new(&[ROBOTO_URL]);
        let mut handler = fixture.handler();

        assert_eq!(handler.add("roboto", "site"), Redirect::Done);

        let downloaded = PublicStorage::new(fixture.public_dir.path())
            .font_dir("site", "roboto")
            .join("roboto-latin.woff2");
        assert!(downloaded.exists());

        let enabled = handler.enabled_fonts("site").unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].family, "Roboto");
    }

    #[test]
    fn add_twice_keeps_one_entry() {
        let fixture = Fixture::new(&[ROBOTO_URL]);
        let mut handler = fixture.handler();

        assert_eq!(handler.add("roboto", "site"), Redirect::Done);
        assert_eq!(handler.add("roboto", "site"), Redirect::Done);

        assert_eq!(handler.enabled_fonts("site").unwrap().len(), 1);
    }

    #[test]
    fn invalid_id_touches_nothing() {
        let fixture = Fixture::new(&[ROBOTO_URL]);
        let mut handler = fixture.handler();

        for id in ["../../etc", "robo to", "", "roboto;rm"] {
            assert_eq!(handler.add(id, "site"), Redirect::InvalidId);
            assert_eq!(handler.remove(id, "site"), Redirect::InvalidId);
        }

        assert!(handler.enabled_fonts("site").unwrap().is_empty());
        // No google-fonts subtree was ever created.
        assert!(!fixture.public_dir.path().join("site").exists());
    }

    #[test]
    fn unknown_font_is_rejected() {
        let fixture = Fixture::new(&[ROBOTO_URL]);
        let mut handler = fixture.handler();
        assert_eq!(handler.add("lato", "site"), Redirect::UnknownFont);
        assert_eq!(handler.remove("lato", "site"), Redirect::UnknownFont);
    }

    #[test]
    fn failed_download_leaves_list_unchanged() {
        let fixture = Fixture::new(&[ROBOTO_URL, "https://fonts.gstatic.com/s/roboto/v1/missing.woff2"]);
        let mut handler = fixture.handler();

        assert_eq!(handler.add("roboto", "site"), Redirect::Failed);
        assert!(handler.enabled_fonts("site").unwrap().is_empty());
    }

    #[test]
    fn bad_filename_in_urls_aborts_download() {
        let fixture = Fixture::new(&["https://fonts.gstatic.com/s/roboto/v1/roboto.ttf"]);
        let mut handler = fixture.handler();

        assert_eq!(handler.add("roboto", "site"), Redirect::Failed);
        assert!(handler.enabled_fonts("site").unwrap().is_empty());
    }

    #[test]
    fn remove_disables_font_and_deletes_files() {
        let fixture = Fixture::new(&[ROBOTO_URL]);
        let mut handler = fixture.handler();

        assert_eq!(handler.add("roboto", "site"), Redirect::Done);
        let font_dir = PublicStorage::new(fixture.public_dir.path()).font_dir("site", "roboto");
        assert!(font_dir.exists());

        assert_eq!(handler.remove("roboto", "site"), Redirect::Done);
        assert!(handler.enabled_fonts("site").unwrap().is_empty());
        assert!(!font_dir.exists());
    }

    #[test]
    fn remove_never_enabled_font_is_valid() {
        let fixture = Fixture::new(&[ROBOTO_URL]);
        let mut handler = fixture.handler();
        assert_eq!(handler.remove("roboto", "site"), Redirect::Done);
    }

    #[test]
    fn contexts_are_isolated() {
        let fixture = Fixture::new(&[ROBOTO_URL]);
        let mut handler = fixture.handler();

        assert_eq!(handler.add("roboto", "journal1"), Redirect::Done);
        assert!(handler.enabled_fonts("journal2").unwrap().is_empty());

        assert_eq!(handler.remove("roboto", "journal2"), Redirect::Done);
        assert_eq!(handler.enabled_fonts("journal1").unwrap().len(), 1);
    }

    #[test]
    fn enabled_fonts_errors_without_catalog() {
        let fonts_dir = TempDir::new().unwrap();
        let public_dir = TempDir::new().unwrap();
        let handler = FontsHandler::new(
            fonts_dir.path(),
            PublicStorage::new(public_dir.path()),
            MemorySettingsStore::new(),
            FakeDownloader,
        );
        assert!(matches!(handler.enabled_fonts("site"), Err(Error::LoadFile { .. })));
    }
}
