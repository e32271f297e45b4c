//! Handle (slug) generation.
//!
//! Two variants exist: [`slugify`] keeps only ASCII word characters after
//! transliterating accented Latin letters, while [`slugify_cjk`] additionally
//! keeps Kana, Hangul and CJK ideographs so that handles built from East
//! Asian product names do not collapse to an empty string.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// 變音符號 → ASCII，以及會被視為分隔符的標點
const TRANSLITERATION: &[(&str, char)] = &[
    ("àáâäæãåāăą", 'a'),
    ("çćčĉċ", 'c'),
    ("đď", 'd'),
    ("èéêëēėęěĕ", 'e'),
    ("ğǵĝġģ", 'g'),
    ("ḧĥħ", 'h'),
    ("îïíīįìĩı", 'i'),
    ("ĵ", 'j'),
    ("ķ", 'k'),
    ("łĺļľ", 'l'),
    ("ḿ", 'm'),
    ("ñńǹňņ", 'n'),
    ("ôöòóœøōõőŏ", 'o'),
    ("ṕ", 'p'),
    ("ŕřŗ", 'r'),
    ("ßśšşșŝ", 's'),
    ("ťțţ", 't'),
    ("ûüùúūǘůűųũŭ", 'u'),
    ("ẃŵ", 'w'),
    ("ẍ", 'x'),
    ("ÿýŷ", 'y'),
    ("žźż", 'z'),
    ("·/_,:;", '-'),
];

static CHAR_MAP: Lazy<HashMap<char, char>> = Lazy::new(|| {
    TRANSLITERATION
        .iter()
        .flat_map(|(from, to)| from.chars().map(move |c| (c, *to)))
        .collect()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static LATIN_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").unwrap());

static CJK_DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[^a-zA-Z0-9_\-\x{3040}-\x{30FF}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}\x{AC00}-\x{D7AF}\x{F900}-\x{FAFF}]",
    )
    .unwrap()
});

static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// Latin-only slug used by the structured-JSON and flexible-CSV modes.
pub fn slugify(text: &str) -> String {
    slugify_with(text, &LATIN_DISALLOWED)
}

/// Slug that keeps CJK code points, used for extracted single records.
pub fn slugify_cjk(text: &str) -> String {
    slugify_with(text, &CJK_DISALLOWED)
}

fn slugify_with(text: &str, disallowed: &Regex) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lowered, "-");
    let transliterated: String = hyphenated
        .chars()
        .map(|c| CHAR_MAP.get(&c).copied().unwrap_or(c))
        .collect();
    let ampersands = transliterated.replace('&', "-and-");
    let stripped = disallowed.replace_all(&ampersands, "");
    let collapsed = HYPHEN_RUN.replace_all(&stripped, "-");

    collapsed.trim_matches('-').to_string()
}
