//! HTML parsing front-end: `tl` output converted to the owned tree.

use super::{AttrList, Document, Element, Node};
use crate::error::Error;

impl Document {
    /// Parse an HTML document or fragment into an owned tree.
    ///
    /// Parsing is lenient; only fundamentally unparsable input produces an
    /// error, which is propagated unmodified from the parser.
    pub fn parse(html: &str) -> Result<Self, Error> {
        let dom = tl::parse(html, tl::ParserOptions::default())?;
        let parser = dom.parser();
        let mut nodes = Vec::new();
        for handle in dom.children() {
            if let Some(node) = convert(*handle, parser) {
                nodes.push(node);
            }
        }
        Ok(Self { nodes })
    }
}

/// Convert one `tl` node (and its subtree) into an owned node.
fn convert(handle: tl::NodeHandle, parser: &tl::Parser) -> Option<Node> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_string();
            let attrs = convert_attrs(tag);

            let mut children = Vec::new();
            for child_handle in tag.children().top().iter() {
                if let Some(child) = convert(*child_handle, parser) {
                    children.push(child);
                }
            }

            Some(Node::Element(Element {
                tag: name,
                attrs,
                children,
            }))
        }
        tl::Node::Raw(bytes) => Some(Node::Text(bytes.as_utf8_str().into_owned())),
        tl::Node::Comment(bytes) => Some(Node::Comment(bytes.as_utf8_str().into_owned())),
    }
}

/// Collect a tag's attributes in source order.
///
/// `tl` keeps attributes in a map with no stable iteration order, so the
/// order is recovered by locating each name inside the tag's raw open-tag
/// bytes before sorting.
fn convert_attrs(tag: &tl::HTMLTag) -> AttrList {
    let raw = tag.raw().as_utf8_str();
    // Limit the scan to the open tag; `raw` spans the whole element.
    let open_tag = match raw.find('>') {
        Some(end) => &raw[..end + 1],
        None => raw.as_ref(),
    };

    let mut entries: Vec<(usize, String, Option<String>)> = Vec::new();
    for (name, value) in tag.attributes().iter() {
        let name = name.as_ref().to_string();
        let value = value.map(|v| v.to_string());
        let at = attr_position(open_tag, &name);
        entries.push((at, name, value));
    }
    entries.sort_by_key(|(at, ..)| *at);

    let mut attrs = AttrList::new();
    for (_, name, value) in entries {
        attrs.push(name, value);
    }
    attrs
}

/// Byte offset of attribute `name` within the raw open-tag text, or
/// `usize::MAX` when it cannot be located (such attributes sort last).
///
/// A match must look like an attribute: preceded by whitespace and
/// followed by `=`, `/`, `>`, whitespace, or the end of the tag. This
/// skips occurrences of the name inside some other attribute's value.
fn attr_position(open_tag: &str, name: &str) -> usize {
    let bytes = open_tag.as_bytes();
    let mut from = 0;
    while let Some(found) = open_tag[from..].find(name) {
        let at = from + found;
        let end = at + name.len();
        let before_ok = at > 0 && bytes[at - 1].is_ascii_whitespace();
        let after_ok = match bytes.get(end) {
            None => true,
            Some(b'=') | Some(b'/') | Some(b'>') => true,
            Some(b) => b.is_ascii_whitespace(),
        };
        if before_ok && after_ok {
            return at;
        }
        from = at + 1;
    }
    usize::MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_element_tree() {
        let document = Document::parse("<div><span>hi</span></div>").unwrap();
        assert_eq!(document.nodes.len(), 1);
        let Node::Element(div) = &document.nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(div.tag, "div");
        let Node::Element(span) = &div.children[0] else {
            panic!("expected element");
        };
        assert_eq!(span.tag, "span");
        let Node::Text(text) = &span.children[0] else {
            panic!("expected text");
        };
        assert_eq!(text, "hi");
    }

    #[test]
    fn test_parse_preserves_attribute_order() {
        let document =
            Document::parse(r#"<div class="hero wide" id="top" data-x="1"></div>"#).unwrap();
        let Node::Element(div) = &document.nodes[0] else {
            panic!("expected element");
        };
        let names: Vec<&str> = div.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["class", "id", "data-x"]);
        assert_eq!(div.attrs.get("class"), Some("hero wide"));
    }

    #[test]
    fn test_parse_keeps_style_content_as_raw_text() {
        let document = Document::parse("<style>.hero { color: red; }</style>").unwrap();
        let Node::Element(style) = &document.nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(style.tag, "style");
        assert_eq!(
            style.text_content().as_deref(),
            Some(".hero { color: red; }")
        );
    }

    #[test]
    fn test_parse_keeps_interstitial_whitespace() {
        let document = Document::parse("<p>a</p>\n  <p>b</p>").unwrap();
        assert!(
            document
                .nodes
                .iter()
                .any(|node| matches!(node, Node::Text(text) if text.contains('\n')))
        );
    }

    #[test]
    fn test_attr_position_skips_name_inside_value() {
        let open_tag = r#"<div class="id wide" id="top">"#;
        let at = attr_position(open_tag, "id");
        // The real `id` attribute, not the "id" token inside the class value.
        assert_eq!(&open_tag[at..at + 3], "id=");
    }

    #[test]
    fn test_attr_position_missing_name_sorts_last() {
        assert_eq!(attr_position("<div>", "id"), usize::MAX);
    }
}
