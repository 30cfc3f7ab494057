//! HTML serialization of the owned tree.

use super::{Document, Element, Node};

/// Void elements (self-closing, no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

impl Document {
    /// Serialize the tree back to HTML text.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.nodes, &mut out);
        out
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(el) => write_element(el, out),
            // Text was never entity-decoded at parse time; emit verbatim.
            Node::Text(text) => out.push_str(text),
            Node::Comment(comment) => {
                if comment.starts_with("<!") {
                    out.push_str(comment);
                } else {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
            }
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for attr in el.attrs.iter() {
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(value) = &attr.value {
            out.push_str("=\"");
            escape_attribute(value, out);
            out.push('"');
        }
    }
    out.push('>');

    if is_void(&el.tag) {
        return;
    }

    write_nodes(&el.children, out);
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

/// Attribute values keep their source bytes except the delimiter: a
/// literal `"` must not terminate the quoted value early.
fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("&quot;");
        } else {
            out.push(ch);
        }
    }
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| tag.eq_ignore_ascii_case(void))
}
