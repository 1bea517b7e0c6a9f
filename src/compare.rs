//! Attribute-vector comparison of two layout nodes.

use crate::tree::{Node, StyleProperty};

/// Share of compared attributes that must be equal for a partial match.
/// The comparison is strict: exactly this share is not enough.
pub const PARTIAL_MATCH_RATIO: f64 = 0.75;

/// Number of geometry attributes compared in partial mode.
const GEOMETRY_ATTRIBUTES: usize = 4;

/// How strict a comparison is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    /// Geometry and style; more than 75% of them must agree.
    Partial,
    /// Style only; all of it must agree.
    Complete,
}

/// Outcome of [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Similarity {
    /// The nodes look alike.
    Match,
    /// They don't.
    NoMatch,
}

impl Similarity {
    /// True for [`Similarity::Match`].
    #[must_use]
    pub fn is_match(self) -> bool {
        self == Self::Match
    }
}

impl From<bool> for Similarity {
    fn from(matched: bool) -> Self {
        if matched {
            Self::Match
        } else {
            Self::NoMatch
        }
    }
}

/// Compare two nodes.
///
/// Two text nodes always match and an element never matches a text node.
/// String values are compared case-insensitively.
#[must_use]
pub fn compare(a: &Node, b: &Node, mode: CompareMode) -> Similarity {
    match (a.is_element(), b.is_element()) {
        (false, false) => return Similarity::Match,
        (true, false) | (false, true) => return Similarity::NoMatch,
        (true, true) => {}
    }

    let style_equal = StyleProperty::ALL
        .iter()
        .filter(|p| same_value(a.style.get(**p), b.style.get(**p)));

    match mode {
        CompareMode::Complete => {
            Similarity::from(style_equal.count() == StyleProperty::COUNT)
        }
        CompareMode::Partial => {
            let geometry_equal = [
                a.rect.left == b.rect.left,
                a.rect.top == b.rect.top,
                a.rect.right == b.rect.right,
                a.rect.bottom == b.rect.bottom,
            ]
            .into_iter()
            .filter(|eq| *eq)
            .count();
            let matched = geometry_equal + style_equal.count();
            let total = GEOMETRY_ATTRIBUTES + StyleProperty::COUNT;
            Similarity::from(matched as f64 > PARTIAL_MATCH_RATIO * total as f64)
        }
    }
}

fn same_value(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        a.eq_ignore_ascii_case(b)
    } else {
        a.to_uppercase() == b.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Rect, Style};

    fn styled(rect: Rect) -> Node {
        let mut style = Style::new();
        for (i, p) in StyleProperty::ALL.iter().enumerate() {
            style.set(*p, format!("v{i}"));
        }
        Node::element("div", rect).with_style(style)
    }

    #[test]
    fn text_and_element_kinds() {
        let t1 = Node::text("a");
        let t2 = Node::text("b");
        let e = styled(Rect::default());

        assert_eq!(compare(&t1, &t2, CompareMode::Partial), Similarity::Match);
        assert_eq!(compare(&t1, &e, CompareMode::Partial), Similarity::NoMatch);
        assert_eq!(compare(&e, &t1, CompareMode::Complete), Similarity::NoMatch);
    }

    #[test]
    fn complete_ignores_geometry_and_case() {
        let a = styled(Rect::new(0, 0, 10, 10));
        let mut b = styled(Rect::new(50, 50, 90, 90));
        b.style.set(StyleProperty::Color, "V52");

        assert!(compare(&a, &b, CompareMode::Complete).is_match());

        b.style.set(StyleProperty::Color, "red");
        assert!(!compare(&a, &b, CompareMode::Complete).is_match());
    }

    #[test]
    fn partial_threshold_is_strict() {
        // 57 attributes; 43 equal is above 75%, 42 is not.
        let a = styled(Rect::new(0, 0, 10, 10));

        let mut b = styled(Rect::new(0, 0, 10, 10));
        for p in &StyleProperty::ALL[..14] {
            b.style.set(*p, "different");
        }
        assert!(compare(&a, &b, CompareMode::Partial).is_match());

        b.style.set(StyleProperty::ALL[14], "different");
        assert!(!compare(&a, &b, CompareMode::Partial).is_match());
    }

    #[test]
    fn comparison_is_symmetric() {
        let a = styled(Rect::new(0, 0, 10, 10));
        let mut b = styled(Rect::new(0, 5, 10, 15));
        b.style.set(StyleProperty::FontSize, "20px");

        for mode in [CompareMode::Partial, CompareMode::Complete] {
            assert_eq!(compare(&a, &b, mode), compare(&b, &a, mode));
            assert!(compare(&a, &a, mode).is_match());
        }
    }
}
