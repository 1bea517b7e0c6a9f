//! Charset detection for layout dumps read as raw bytes.
//!
//! A dump is an HTML document, so its encoding comes from a byte order mark
//! or the usual `<meta>` declarations. Anything undeclared is read as UTF-8.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

use crate::error::{Error, Result};

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex")
});

/// `<meta http-equiv="Content-Type" content="...; charset=...">`
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Bytes searched for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Charset label declared in the head of the document, if any.
fn declared_charset(head: &str) -> Option<&str> {
    CHARSET_META_RE
        .captures(head)
        .or_else(|| CONTENT_TYPE_CHARSET_RE.captures(head))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Work out the encoding of a dump.
///
/// A byte order mark wins over any declaration. A declared label that names
/// no known encoding is an error.
pub fn detect_encoding(bytes: &[u8]) -> Result<&'static Encoding> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Ok(encoding);
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);
    match declared_charset(&head) {
        None => Ok(UTF_8),
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| Error::EncodingError(format!("unknown charset label '{label}'"))),
    }
}

/// Decode a dump to UTF-8.
///
/// Malformed sequences become U+FFFD; they are logged, not rejected.
///
/// ```
/// use recordminer::encoding::decode_layout_dump;
///
/// let html = b"<meta charset=\"windows-1252\"><body>Caf\xE9</body>";
/// assert!(decode_layout_dump(html)?.contains("Caf\u{e9}"));
/// # Ok::<(), recordminer::Error>(())
/// ```
pub fn decode_layout_dump(bytes: &[u8]) -> Result<String> {
    let encoding = detect_encoding(bytes)?;
    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = used.name(), "layout dump has malformed byte sequences");
    }
    Ok(decoded.into_owned())
}
