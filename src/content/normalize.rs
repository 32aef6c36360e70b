//! Slug-style normalization for file names and paths coming from the content
//! repository, where files and folders carry ordering prefixes such as
//! `01 - Intro.md` or `02 Basics/`.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^/.]+$").expect("valid regex"));
static NAME_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+\s-\s").expect("valid regex"));
static PATH_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+\s").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").expect("valid regex"));
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{3,}").expect("valid regex"));

/// Strip the extension and any `<digits> - ` ordering prefix.
///
/// `"03 - Intro.md"` becomes `"Intro"`.
pub fn normalize_name(name: &str) -> String {
    let stem = EXTENSION.replace(name, "");
    NAME_PREFIX.replace_all(&stem, "").into_owned()
}

/// Turn a repository path into a hyphenated, accent-free slug.
///
/// `"01 Folder/02 Sub Dir/file.md"` becomes `"Folder-Sub-Dir-file.md"`.
pub fn normalize_path(path: &str) -> String {
    let path = PATH_PREFIX.replace_all(path, "");
    let path = path.replace('/', "-");
    let path = WHITESPACE.replace_all(&path, "-");
    let path = HYPHEN_RUN.replace_all(&path, "-");
    strip_diacritics(&path)
}

fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !('\u{0300}'..='\u{036f}').contains(c)).collect()
}
