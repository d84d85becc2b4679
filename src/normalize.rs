// src/normalize.rs
//
// Turns upstream HTML fragments (oEmbed snippets, meta-tag text) into plain
// excerpt text: first meaningful paragraph, tags stripped, entities decoded.

use once_cell::sync::OnceCell;
use regex::{Captures, Regex};

/// The named entities upstream payloads actually use. Anything outside this
/// table passes through verbatim.
const NAMED_ENTITIES: [(&str, &str); 14] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&hellip;", "\u{2026}"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&ldquo;", "\u{201C}"),
    ("&rdquo;", "\u{201D}"),
];

/// Decode HTML character references into literal Unicode text.
///
/// Three passes: the named table above, decimal references (`&#65;`), then
/// hex references (`&#x41;`). A numeric reference that is not a valid
/// Unicode scalar value is left verbatim rather than erroring.
pub fn decode_entities(text: &str) -> String {
    static RE_NAMED: OnceCell<Regex> = OnceCell::new();
    static RE_DEC: OnceCell<Regex> = OnceCell::new();
    static RE_HEX: OnceCell<Regex> = OnceCell::new();

    let re_named = RE_NAMED.get_or_init(|| {
        Regex::new(r"&(?:amp|lt|gt|quot|#39|apos|nbsp|ndash|mdash|hellip|lsquo|rsquo|ldquo|rdquo);")
            .unwrap()
    });
    let mut out = re_named
        .replace_all(text, |c: &Captures| {
            let entity = &c[0];
            NAMED_ENTITIES
                .iter()
                .find(|(name, _)| *name == entity)
                .map(|(_, literal)| (*literal).to_string())
                .unwrap_or_else(|| entity.to_string())
        })
        .into_owned();

    let re_dec = RE_DEC.get_or_init(|| Regex::new(r"&#(\d+);").unwrap());
    out = re_dec
        .replace_all(&out, |c: &Captures| {
            c[1].parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| c[0].to_string())
        })
        .into_owned();

    let re_hex = RE_HEX.get_or_init(|| Regex::new(r"&#x([0-9a-fA-F]+);").unwrap());
    out = re_hex
        .replace_all(&out, |c: &Captures| {
            u32::from_str_radix(&c[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| c[0].to_string())
        })
        .into_owned();

    out
}

/// Extract the first meaningful paragraph of an HTML fragment as plain text.
///
/// `<script>` blocks are dropped before anything else so scripted payloads
/// never leak into stored text. If no `<p>` block exists, the whole
/// remaining markup is used. Empty input comes back unchanged.
pub fn extract_excerpt(html: &str) -> String {
    if html.is_empty() {
        return html.to_string();
    }

    static RE_SCRIPT: OnceCell<Regex> = OnceCell::new();
    static RE_P: OnceCell<Regex> = OnceCell::new();
    static RE_BR: OnceCell<Regex> = OnceCell::new();
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    static RE_SPACE: OnceCell<Regex> = OnceCell::new();
    static RE_NEWLINE: OnceCell<Regex> = OnceCell::new();

    let re_script = RE_SCRIPT.get_or_init(|| Regex::new(r"(?is)<script.*?</script>").unwrap());
    let without_scripts = re_script.replace_all(html, "");

    let re_p = RE_P.get_or_init(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap());
    let inner = re_p
        .captures(&without_scripts)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| without_scripts.to_string());

    let re_br = RE_BR.get_or_init(|| Regex::new(r"(?i)<br\s*/?>\s*").unwrap());
    let text = re_br.replace_all(&inner, "\n");

    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());
    let text = re_tags.replace_all(&text, " ");
    let text = text.replace("&nbsp;", " ");

    // Collapse runs of whitespace to one space, but keep the newlines the
    // <br> pass produced; then squeeze the whitespace hugging each newline.
    let re_space = RE_SPACE.get_or_init(|| Regex::new(r"[^\S\n]+").unwrap());
    let text = re_space.replace_all(&text, " ");
    let re_newline = RE_NEWLINE.get_or_init(|| Regex::new(r"\s*\n\s*").unwrap());
    let text = re_newline.replace_all(&text, "\n");

    decode_entities(text.trim())
}
