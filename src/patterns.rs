//! Compiled regex patterns shared by the provider and the table renderer.
//!
//! All patterns are compiled once at first use using `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Any single line break variant (`\r\n`, `\n` or `\r`).
///
/// Leaf contents drop them entirely; CSV cells replace each one with a space.
pub static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\n|\r").expect("LINE_BREAK regex"));

/// Functional colour notation (`rgb()`, `rgba()`, `hsl()`, `hsla()`).
///
/// Group 1 is the argument list between the parentheses.
pub static FUNCTIONAL_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:rgb|hsl)a?\s*\((.*)\)\s*$").expect("FUNCTIONAL_COLOR regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_break_matches_all_variants() {
        assert_eq!(LINE_BREAK.replace_all("a\r\nb\nc\rd", " "), "a b c d");
    }

    #[test]
    fn functional_color_captures_arguments() {
        let caps = FUNCTIONAL_COLOR
            .captures("rgba(0, 0, 0, 0)")
            .expect("rgba should match");
        assert_eq!(&caps[1], "0, 0, 0, 0");

        let caps = FUNCTIONAL_COLOR
            .captures("HSL(120 50% 50% / 0.5)")
            .expect("hsl should match");
        assert_eq!(&caps[1], "120 50% 50% / 0.5");

        assert!(FUNCTIONAL_COLOR.captures("#ffffff").is_none());
    }
}
