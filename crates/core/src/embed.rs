//! Extraction of font data from the CSS embed endpoint.
//!
//! The embed response is plain CSS with one comment-delimited block per
//! subset. Everything here is regex scraping of that text, kept behind
//! a narrow set of functions so the parsing strategy can change without
//! touching the sync orchestration.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Axis, FontRecord},
    config::{EMBED_URL, GSTATIC_PREFIX},
    error::{Error, Result},
};

/// Comment line opening a subset block, e.g. `/* latin-ext */` or `/* [3] */`.
static SUBSET_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/\*\s([a-z0-9\-\[\]]+)").unwrap());

/// Family slug: first path segment after the gstatic host prefix.
static FAMILY_SLUG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){}([^/]*)", regex::escape(GSTATIC_PREFIX))).unwrap()
});

/// Full font file URL inside a `src: url(...)` declaration.
static DOWNLOAD_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){}[^)]*", regex::escape(GSTATIC_PREFIX))).unwrap()
});

/// URL prefix up to and including the version segment, replaced when localizing.
static URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){}[^/]*/[^/]*/", regex::escape(GSTATIC_PREFIX))).unwrap()
});

/// Trailing `/<name>.woff2` segment of a download URL.
static WOFF2_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/[^/]*\.woff2").unwrap());

/// The `@font-face` declarations for one subset of a font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subset {
    pub subset: String,
    pub font: String,
}

/// Build the embed URL requesting every weight and style of a font.
pub fn embed_url(font: &FontRecord) -> String {
    let family = font.family.replace(' ', "+");
    let weights = if font.is_variable() {
        variable_weights_fragment(&font.variants, font.axes.as_deref().unwrap_or(&[]))
    } else {
        static_weights_fragment(font)
    };
    let family_param = if weights.is_empty() {
        family
    } else {
        format!("{family}:{weights}")
    };
    format!("{EMBED_URL}?family={family_param}&display=swap")
}

/// Weight fragment for a static font, listing each variant discretely.
///
/// Variant tokens map to (italic, weight) pairs: `regular` is 400
/// normal, `italic` is 400 italic, `NNNitalic` is NNN italic, and a
/// bare `NNN` is NNN normal.
fn static_weights_fragment(font: &FontRecord) -> String {
    let mut regular = Vec::new();
    let mut italic = Vec::new();
    for variant in &font.variants {
        if variant == "regular" {
            regular.push(400);
        } else if variant == "italic" {
            italic.push(400);
        } else if variant.contains("italic") {
            match leading_number(variant) {
                Some(weight) => italic.push(weight),
                None => log::warn!("unrecognized variant `{variant}` in {}", font.family),
            }
        } else {
            match leading_number(variant) {
                Some(weight) => regular.push(weight),
                None => log::warn!("unrecognized variant `{variant}` in {}", font.family),
            }
        }
    }
    if italic.is_empty() {
        let weights: Vec<String> = regular.iter().map(u32::to_string).collect();
        return format!("wght@{}", weights.join(";"));
    }
    let weights: Vec<String> = regular
        .iter()
        .map(|w| format!("0,{w}"))
        .chain(italic.iter().map(|w| format!("1,{w}")))
        .collect();
    format!("ital,wght@{}", weights.join(";"))
}

/// Weight fragment for a variable font, covering the whole `wght` axis
/// range. Empty when the font has no weight axis (e.g. Ballet), which
/// drops the weight parameter from the URL entirely.
fn variable_weights_fragment(variants: &[String], axes: &[Axis]) -> String {
    let Some(weight) = axes.iter().find(|axis| axis.tag == "wght") else {
        return String::new();
    };
    let range = format!("{}..{}", format_axis_value(weight.start), format_axis_value(weight.end));
    if variants.iter().any(|v| v == "italic") {
        format!("ital,wght@0,{range};1,{range}")
    } else {
        format!("wght@{range}")
    }
}

fn leading_number(variant: &str) -> Option<u32> {
    let digits: String = variant.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn format_axis_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Split an embed response into its subset blocks.
///
/// A boundary is a comment line naming the subset; every non-boundary
/// line up to the next boundary belongs to the current subset.
pub fn split_subsets(css: &str) -> Vec<Subset> {
    let mut subsets = Vec::new();
    let mut current: Option<String> = None;
    let mut lines: Vec<&str> = Vec::new();
    for line in css.lines() {
        if let Some(caps) = SUBSET_BOUNDARY.captures(line) {
            if let Some(subset) = current.take() {
                subsets.push(Subset { subset, font: lines.join("\n") });
            }
            current = Some(caps[1].to_string());
            lines.clear();
        } else {
            lines.push(line);
        }
    }
    if let Some(subset) = current {
        subsets.push(Subset { subset, font: lines.join("\n") });
    }
    subsets
}

/// Extract the family slug from a `@font-face` block's file URL.
/// The slug is stable across versions and doubles as the catalog id.
pub fn family_slug(font_face: &str) -> Option<String> {
    FAMILY_SLUG
        .captures(font_face)
        .map(|caps| caps[1].to_string())
        .filter(|slug| !slug.is_empty())
}

/// Extract the font file download URL from a `@font-face` block.
pub fn download_url(font_face: &str) -> Option<String> {
    DOWNLOAD_URL.find(font_face).map(|m| m.as_str().to_string())
}

/// Rewrite a `@font-face` block's absolute file URL to a local directory.
pub fn localize(font_face: &str, dir: &str) -> String {
    URL_PREFIX.replace(font_face, NoExpand(&format!("{dir}/"))).into_owned()
}

/// Extract the trailing woff2 filename from a download URL.
///
/// Exactly one `/<name>.woff2` segment must match; zero or several
/// mean the URL is not one we know how to store safely.
pub fn woff2_filename(url: &str) -> Result<String> {
    let mut matches = WOFF2_FILENAME.find_iter(url);
    let (Some(first), None) = (matches.next(), matches.next()) else {
        return Err(Error::Filename(url.to_string()));
    };
    Ok(first.as_str().trim_start_matches('/').to_string())
}
