//! Owned, mutable document tree.
//!
//! Parsing is delegated to the `tl` crate; its output is converted into
//! this tree so passes can mutate tags, attributes, and text in place and
//! serialize the result deterministically. Text and comment nodes carry
//! their raw source bytes - entities are never decoded, so what came in
//! goes out.

mod parse;
mod serialize;

/// A parsed document: the ordered list of top-level nodes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
}

/// One node of the tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Raw text, exactly as it appeared in the source.
    Text(String),
    /// A comment (or other `<!...>` construct), delimiters included.
    Comment(String),
}

/// An element: tag name, attributes in source order, children.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attrs: AttrList,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: AttrList::default(),
            children: Vec::new(),
        }
    }

    /// Concatenated text of the element's direct text children, or `None`
    /// when it has none.
    pub fn text_content(&self) -> Option<String> {
        let mut out = String::new();
        let mut found = false;
        for child in &self.children {
            if let Node::Text(text) = child {
                out.push_str(text);
                found = true;
            }
        }
        found.then_some(out)
    }

    /// Replace the element's children with a single text node.
    pub fn set_text_content(&mut self, text: String) {
        self.children = vec![Node::Text(text)];
    }
}

/// A single attribute. `value` is `None` for bare attributes (`disabled`).
#[derive(Debug, Clone)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
}

/// Attribute collection preserving source order.
#[derive(Debug, Clone, Default)]
pub struct AttrList {
    attrs: Vec<Attr>,
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.attrs.push(Attr {
            name: name.into(),
            value,
        });
    }

    /// The value of attribute `name`, if present with a value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .and_then(|attr| attr.value.as_deref())
    }

    /// Set (or add) attribute `name` to `value`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = Some(value),
            None => self.push(name, Some(value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attrs.iter()
    }
}

impl Document {
    /// Visit every element in the tree (pre-order) with mutable access.
    pub fn walk<F: FnMut(&mut Element)>(&mut self, f: &mut F) {
        walk_nodes(&mut self.nodes, f);
    }
}

fn walk_nodes<F: FnMut(&mut Element)>(nodes: &mut [Node], f: &mut F) {
    for node in nodes {
        if let Node::Element(el) = node {
            f(el);
            walk_nodes(&mut el.children, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_list_preserves_push_order() {
        let mut attrs = AttrList::new();
        attrs.push("class", Some("hero".into()));
        attrs.push("id", Some("top".into()));
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["class", "id"]);
    }

    #[test]
    fn test_attr_get_skips_bare_attributes() {
        let mut attrs = AttrList::new();
        attrs.push("disabled", None);
        assert_eq!(attrs.get("disabled"), None);
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_attr_set_updates_in_place() {
        let mut attrs = AttrList::new();
        attrs.push("class", Some("hero".into()));
        attrs.push("id", Some("top".into()));
        attrs.set("class", "a");
        assert_eq!(attrs.get("class"), Some("a"));
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["class", "id"]);
    }

    #[test]
    fn test_walk_visits_elements_pre_order() {
        let mut inner = Element::new("span");
        inner.children.push(Node::Text("hi".into()));
        let mut outer = Element::new("div");
        outer.children.push(Node::Element(inner));
        let mut document = Document {
            nodes: vec![Node::Element(outer), Node::Element(Element::new("p"))],
        };

        let mut seen = Vec::new();
        document.walk(&mut |el| seen.push(el.tag.clone()));
        assert_eq!(seen, ["div", "span", "p"]);
    }

    #[test]
    fn test_text_content_concatenates_direct_text() {
        let mut el = Element::new("style");
        el.children.push(Node::Text(".a {".into()));
        el.children.push(Node::Text(" color: red; }".into()));
        assert_eq!(el.text_content().as_deref(), Some(".a { color: red; }"));

        let empty = Element::new("style");
        assert_eq!(empty.text_content(), None);
    }
}
