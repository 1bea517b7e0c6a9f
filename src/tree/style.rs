//! Computed style carried by every layout node.
//!
//! The node comparator looks at a fixed, ordered set of presentation
//! properties: the 52 CSS properties used for visual similarity plus
//! `position`. They are addressed by [`StyleProperty`] rather than by string
//! lookup, so a node can never be missing one of them.

macro_rules! style_properties {
    ($($variant:ident => $css:literal),+ $(,)?) => {
        /// A presentation property compared between layout nodes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StyleProperty {
            $(
                #[doc = concat!("`", $css, "`")]
                $variant,
            )+
        }

        impl StyleProperty {
            /// Every compared property, in comparison order.
            pub const ALL: &'static [StyleProperty] = &[$(StyleProperty::$variant),+];

            /// CSS property name as reported by `getComputedStyle`.
            #[must_use]
            pub const fn css_name(self) -> &'static str {
                match self {
                    $(StyleProperty::$variant => $css,)+
                }
            }
        }
    };
}

style_properties! {
    // Background
    BackgroundColor => "background-color",
    BackgroundImage => "background-image",
    // Border
    BorderBottomColor => "border-bottom-color",
    BorderBottomStyle => "border-bottom-style",
    BorderBottomWidth => "border-bottom-width",
    BorderLeftColor => "border-left-color",
    BorderLeftStyle => "border-left-style",
    BorderLeftWidth => "border-left-width",
    BorderRightColor => "border-right-color",
    BorderRightStyle => "border-right-style",
    BorderRightWidth => "border-right-width",
    BorderTopColor => "border-top-color",
    BorderTopStyle => "border-top-style",
    BorderTopWidth => "border-top-width",
    OutlineColor => "outline-color",
    OutlineStyle => "outline-style",
    OutlineWidth => "outline-width",
    BorderBottomLeftRadius => "border-bottom-left-radius",
    BorderBottomRightRadius => "border-bottom-right-radius",
    BorderTopLeftRadius => "border-top-left-radius",
    BorderTopRightRadius => "border-top-right-radius",
    BoxShadow => "box-shadow",
    // Text - paragraph
    Direction => "direction",
    LetterSpacing => "letter-spacing",
    LineHeight => "line-height",
    TextAlign => "text-align",
    TextDecoration => "text-decoration",
    TextIndent => "text-indent",
    TextTransform => "text-transform",
    VerticalAlign => "vertical-align",
    WhiteSpace => "white-space",
    WordSpacing => "word-spacing",
    TextOverflow => "text-overflow",
    TextShadow => "text-shadow",
    WordBreak => "word-break",
    WordWrap => "word-wrap",
    // Text - column
    ColumnCount => "-moz-column-count",
    ColumnGap => "-moz-column-gap",
    ColumnRuleColor => "-moz-column-rule-color",
    ColumnRuleStyle => "-moz-column-rule-style",
    ColumnRuleWidth => "-moz-column-rule-width",
    ColumnWidth => "-moz-column-width",
    // Text - list
    ListStyleImage => "list-style-image",
    ListStylePosition => "list-style-position",
    ListStyleType => "list-style-type",
    // Text - font
    FontFamily => "font-family",
    FontSize => "font-size",
    FontWeight => "font-weight",
    FontSizeAdjust => "font-size-adjust",
    FontStyle => "font-style",
    FontVariant => "font-variant",
    Color => "color",
    // Positioning
    Position => "position",
}

impl StyleProperty {
    /// Number of compared style properties.
    pub const COUNT: usize = Self::ALL.len();

    /// Attribute name the layout provider uses for this property (`css_<name>`).
    #[must_use]
    pub fn attribute_name(self) -> String {
        format!("css_{}", self.css_name())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Computed values of every [`StyleProperty`] of one node.
///
/// Values are kept exactly as the provider reported them; comparisons are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    values: Vec<String>,
}

impl Style {
    /// Style with every property set to the empty string.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: vec![String::new(); StyleProperty::COUNT],
        }
    }

    /// Value of one property.
    #[must_use]
    pub fn get(&self, property: StyleProperty) -> &str {
        &self.values[property.index()]
    }

    /// Set one property.
    pub fn set(&mut self, property: StyleProperty, value: impl Into<String>) {
        self.values[property.index()] = value.into();
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, property: StyleProperty, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Iterate `(property, value)` pairs in comparison order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, &str)> {
        StyleProperty::ALL
            .iter()
            .map(move |property| (*property, self.get(*property)))
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_three_properties_in_order() {
        assert_eq!(StyleProperty::COUNT, 53);
        assert_eq!(StyleProperty::ALL[0], StyleProperty::BackgroundColor);
        assert_eq!(StyleProperty::ALL[52], StyleProperty::Position);
        assert_eq!(StyleProperty::ColumnGap.css_name(), "-moz-column-gap");
        assert_eq!(StyleProperty::Color.attribute_name(), "css_color");
    }

    #[test]
    fn set_and_get_round_through_index() {
        let style = Style::new()
            .with(StyleProperty::FontSize, "14px")
            .with(StyleProperty::Position, "static");

        assert_eq!(style.get(StyleProperty::FontSize), "14px");
        assert_eq!(style.get(StyleProperty::Position), "static");
        assert_eq!(style.get(StyleProperty::Color), "");
        assert_eq!(style.iter().count(), StyleProperty::COUNT);
    }
}
