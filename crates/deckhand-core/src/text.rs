//! Field text normalization and checksums used for duplicate detection.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

/// Separator between fields in the stored field blob.
pub const FIELD_SEPARATOR: char = '\x1f';

struct Patterns {
    comment: Regex,
    style: Regex,
    script: Regex,
    tag: Regex,
    media: Regex,
    entity: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        comment: Regex::new(r"(?s)<!--.*?-->").expect("Invalid regex"),
        style: Regex::new(r"(?si)<style.*?>.*?</style>").expect("Invalid regex"),
        script: Regex::new(r"(?si)<script.*?>.*?</script>").expect("Invalid regex"),
        tag: Regex::new(r"(?s)<.*?>").expect("Invalid regex"),
        media: Regex::new(r#"(?i)<img[^>]+src=["']?([^"'>]+)["']?[^>]*>"#).expect("Invalid regex"),
        entity: Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").expect("Invalid regex"),
    })
}

/// Remove HTML markup and decode entities, keeping only visible text.
///
/// # Examples
///
/// ```
/// use deckhand_core::text::strip_html;
///
/// assert_eq!(strip_html("<b>bold</b> &amp; <i>plain</i>"), "bold & plain");
/// ```
pub fn strip_html(text: &str) -> String {
    let patterns = patterns();
    let text = patterns.comment.replace_all(text, "");
    let text = patterns.style.replace_all(&text, "");
    let text = patterns.script.replace_all(&text, "");
    let text = patterns.tag.replace_all(&text, "");
    decode_entities(&text)
}

/// Like [`strip_html`], but image references survive as their file names.
pub fn strip_html_media(text: &str) -> String {
    let text = patterns().media.replace_all(text, " ${1} ");
    strip_html(&text)
}

/// Stable checksum of the visible text of a field.
///
/// The first 32 bits of the SHA-256 digest of [`strip_html_media`], read
/// big-endian.
pub fn field_checksum(text: &str) -> u32 {
    let digest = Sha256::digest(strip_html_media(text).as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Join fields into the stored blob form.
pub fn join_fields(fields: &[String]) -> String {
    fields.join(&FIELD_SEPARATOR.to_string())
}

/// Split a stored field blob back into fields.
pub fn split_fields(joined: &str) -> Vec<String> {
    joined.split(FIELD_SEPARATOR).map(str::to_string).collect()
}

/// Decode character references. `&nbsp;` becomes a plain space; unknown
/// names are left as written.
fn decode_entities(text: &str) -> String {
    patterns()
        .entity
        .replace_all(text, |caps: &Captures<'_>| {
            if &caps[1] == "nbsp" {
                " ".to_string()
            } else {
                html_escape::decode_html_entities(&caps[0]).into_owned()
            }
        })
        .into_owned()
}
