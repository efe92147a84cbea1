//! Configuration constants for fonthost.

/// Google Fonts developer API endpoint (full font list).
pub const API_URL: &str = "https://www.googleapis.com/webfonts/v1/webfonts";

/// CSS embed endpoint returning `@font-face` declarations.
pub const EMBED_URL: &str = "https://fonts.googleapis.com/css2";

/// Host prefix of font file URLs; the path segment after it is the family slug.
pub const GSTATIC_PREFIX: &str = "https://fonts.gstatic.com/s/";

/// Catalog file name inside the fonts directory.
pub const FONTS_FILE: &str = "fonts.json";

/// Per-font bundle file listing the source URLs to download.
pub const URLS_FILE: &str = "urls.json";

/// Per-font bundle file holding localized `@font-face` declarations per subset.
pub const EMBED_FILE: &str = "embed.json";

/// Subdirectory of a context's public file area that holds downloaded fonts.
pub const FONTS_PUBLIC_FILE_DIR: &str = "google-fonts";

/// Settings key storing a context's enabled-font list.
pub const FONTS_SETTING: &str = "fonts";

/// Context id used when no site context is given.
pub const SITE_CONTEXT: &str = "site";

/// Environment variable holding the Google Fonts API key.
pub const API_KEY_ENV: &str = "GOOGLE_FONTS_API_KEY";

/// Families skipped during catalog sync.
pub const EXCLUDED_FAMILIES: &[&str] = &["Linefont"];

/// Headers mimicking a browser request.
///
/// The embed endpoint only serves woff2 URLs to clients that look like
/// a browser; other user agents get a different CSS format entirely.
pub const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("Accept", "*/*"),
    ("Connection", "keep-alive"),
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 6.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.110 Safari/537.36",
    ),
    ("Accept-Language", "en-US;q=0.5,en;q=0.3"),
    ("Cache-Control", "max-age=0"),
    ("Upgrade-Insecure-Requests", "1"),
];
