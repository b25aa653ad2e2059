//! Rich-text tag vocabulary
//!
//! The Quill editor emits a small HTML subset. Block tags map to paragraph
//! style names, inline tags map to run formatting, and list containers only
//! select the style of the `li` paragraphs inside them.

use phf::phf_map;

/// Paragraph style used for list items inside `ol`
pub const LIST_NUMBER_STYLE: &str = "List Number";
/// Paragraph style used for list items inside `ul` (and stray `li`)
pub const LIST_BULLET_STYLE: &str = "List Bullet";

/// Inline formatting tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineTag {
    Strong,
    Em,
    Underline,
    Anchor,
}

/// List container kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ol" => Some(ListKind::Ordered),
            "ul" => Some(ListKind::Unordered),
            _ => None,
        }
    }

    /// Paragraph style for an item of this list
    pub fn item_style(&self) -> &'static str {
        match self {
            ListKind::Ordered => LIST_NUMBER_STYLE,
            ListKind::Unordered => LIST_BULLET_STYLE,
        }
    }
}

/// Block tag -> paragraph style name (`li` is resolved through [`ListKind`])
pub static BLOCK_STYLES: phf::Map<&'static str, &'static str> = phf_map! {
    "p" => "Normal",
    "h1" => "Heading 1",
    "h2" => "Heading 2",
};

/// Inline tag -> formatting
pub static INLINE_TAGS: phf::Map<&'static str, InlineTag> = phf_map! {
    "strong" => InlineTag::Strong,
    "em" => InlineTag::Em,
    "u" => InlineTag::Underline,
    "a" => InlineTag::Anchor,
};

/// Whether the renderer gives `tag` any effect
pub fn is_supported_tag(tag: &str) -> bool {
    tag == "li"
        || BLOCK_STYLES.contains_key(tag)
        || INLINE_TAGS.contains_key(tag)
        || ListKind::from_tag(tag).is_some()
}

/// Whether the renderer honors `attr` on `tag`
pub fn is_supported_attribute(tag: &str, attr: &str) -> bool {
    tag == "a" && attr == "href"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary() {
        for tag in ["p", "h1", "h2", "li", "ol", "ul", "strong", "em", "u", "a"] {
            assert!(is_supported_tag(tag), "{} should be supported", tag);
        }
        for tag in ["h3", "span", "br", "s", "table"] {
            assert!(!is_supported_tag(tag), "{} should be ignored", tag);
        }
    }

    #[test]
    fn test_list_styles() {
        assert_eq!(ListKind::Ordered.item_style(), "List Number");
        assert_eq!(ListKind::Unordered.item_style(), "List Bullet");
        assert_eq!(ListKind::from_tag("p"), None);
    }

    #[test]
    fn test_attributes() {
        assert!(is_supported_attribute("a", "href"));
        assert!(!is_supported_attribute("a", "target"));
        assert!(!is_supported_attribute("p", "href"));
    }
}
