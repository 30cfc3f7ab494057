//! The identifier-rewriting engine.
//!
//! [`Mangler::process`] runs two passes over a parsed document, sharing
//! one [`LookupTable`]: first every embedded `<style>` sheet (so
//! identifiers referenced only from selectors, including selectors nested
//! in `@media` / `@supports` groups, are captured), then every element's
//! attributes. Whichever pass sees an identifier first assigns its
//! generated name; every later occurrence of the same name under the same
//! [`IdentKind`] resolves to the same pointer.

mod lookup;
mod names;

pub use lookup::{IdentKind, LookupTable};
pub use names::NameSequence;

use crate::config::{Options, Whitelist};
use crate::css::selector::{Component, ComponentKind, rewrite_selector};
use crate::css::{self, Rule};
use crate::debug;
use crate::dom::{Document, Element};

/// Attributes that hold id references on any element.
const ID_ATTRS: [&str; 2] = ["id", "for"];
/// Attributes that hold id references on `<use>` elements.
const USE_ATTRS: [&str; 2] = ["href", "xlink:href"];

/// Rewrites CSS identifiers in a document to short generated names.
///
/// The mapping lives in a table created fresh for every [`process`] call
/// and discarded afterwards, so each run is independent: the same
/// document and whitelist always produce the same output, and nothing
/// leaks between documents.
///
/// [`process`]: Mangler::process
#[derive(Debug)]
pub struct Mangler {
    whitelist: Whitelist,
    id_names: NameSequence,
    class_names: NameSequence,
}

impl Mangler {
    pub fn new(options: &Options) -> Self {
        Self {
            whitelist: Whitelist::from_entries(&options.whitelist),
            id_names: NameSequence::new(),
            class_names: NameSequence::new(),
        }
    }

    /// Rewrite every identifier in `document`, in place.
    pub fn process(&mut self, document: &mut Document) {
        let mut table = LookupTable::new();
        // Fresh sequences per run: generated names depend only on this
        // document and the whitelist, never on earlier runs.
        self.id_names = NameSequence::new();
        self.class_names = NameSequence::new();

        self.rewrite_styles(document, &mut table);
        self.rewrite_elements(document, &mut table);

        debug!("mangle"; "renamed {} ids, {} classes",
            table.len(IdentKind::Id), table.len(IdentKind::Class));
    }

    // ------------------------------------------------------------------
    // Pointer resolution
    // ------------------------------------------------------------------

    /// The identifier to use for `value`: a prior exact mapping, a
    /// fragment mapping, or a freshly generated name. Never inserts;
    /// recording the mapping is [`create_lookup`]'s job.
    ///
    /// [`create_lookup`]: Mangler::create_lookup
    fn resolve(&mut self, kind: IdentKind, value: &str, table: &LookupTable) -> String {
        if let Some(pointer) = table.exact(kind, value) {
            return pointer.to_string();
        }
        if let Some(pointer) = table.fragment(kind, value) {
            return pointer;
        }
        self.generate(kind)
    }

    /// Resolve `value` and record the mapping. Returns `None` (and
    /// records nothing) for empty or whitelisted values.
    fn create_lookup(
        &mut self,
        kind: IdentKind,
        value: &str,
        table: &mut LookupTable,
    ) -> Option<String> {
        if value.is_empty() || self.whitelist.contains(kind, value) {
            return None;
        }
        let pointer = self.resolve(kind, value, table);
        table.insert(kind, value.to_string(), pointer.clone());
        Some(pointer)
    }

    /// Draw the next candidate that does not collide with a whitelisted
    /// name. The sequence is infinite and the whitelist finite, so the
    /// loop terminates.
    fn generate(&mut self, kind: IdentKind) -> String {
        loop {
            let candidate = match kind {
                IdentKind::Id => self.id_names.next_name(),
                IdentKind::Class => self.class_names.next_name(),
            };
            if !self.whitelist.contains(kind, &candidate) {
                return candidate;
            }
        }
    }

    // ------------------------------------------------------------------
    // Style pass
    // ------------------------------------------------------------------

    /// Parse, rewrite, and re-serialize every `<style>` element.
    fn rewrite_styles(&mut self, document: &mut Document, table: &mut LookupTable) {
        document.walk(&mut |el| {
            if el.tag != "style" {
                return;
            }
            let Some(text) = el.text_content() else {
                return;
            };
            let mut rules = css::parse_stylesheet(&text);
            self.process_rules(&mut rules, table);
            el.set_text_content(css::serialize(&rules));
        });
    }

    /// Rewrite the selectors of `rules`, recursing into conditional
    /// groups to any depth.
    fn process_rules(&mut self, rules: &mut [Rule], table: &mut LookupTable) {
        for rule in rules {
            match rule {
                Rule::Conditional { rules, .. } => self.process_rules(rules, table),
                Rule::Style { selector, .. } => {
                    let rewritten = rewrite_selector(selector.as_str(), &mut |component| {
                        self.component_pointer(component, table)
                    });
                    *selector = rewritten;
                }
                Rule::Other(_) => {}
            }
        }
    }

    /// The pointer for one selector component, if it is one we rewrite.
    fn component_pointer(
        &mut self,
        component: &Component<'_>,
        table: &mut LookupTable,
    ) -> Option<String> {
        match component.kind {
            ComponentKind::Class => self.create_lookup(IdentKind::Class, component.value, table),
            ComponentKind::Id => self.create_lookup(IdentKind::Id, component.value, table),
            ComponentKind::Attribute => match component.attribute {
                Some("class") => self.create_lookup(IdentKind::Class, component.value, table),
                Some("id") | Some("for") => {
                    self.create_lookup(IdentKind::Id, component.value, table)
                }
                _ => None,
            },
        }
    }

    // ------------------------------------------------------------------
    // Markup pass
    // ------------------------------------------------------------------

    /// Rewrite identifier-bearing attributes across the whole tree.
    fn rewrite_elements(&mut self, document: &mut Document, table: &mut LookupTable) {
        document.walk(&mut |el| {
            if el.attrs.is_empty() {
                return;
            }
            self.pointerize_class(el, table);
            for attr in ID_ATTRS {
                self.pointerize_id_like(el, attr, table);
            }
            if el.tag == "use" {
                for attr in USE_ATTRS {
                    self.pointerize_id_like(el, attr, table);
                }
            }
        });
    }

    /// Rewrite a `class` attribute token by token.
    ///
    /// Tokens that resolve (not whitelisted, not empty) are replaced;
    /// the rest are kept. Rejoining with single spaces normalizes any
    /// irregular whitespace, which is an accepted observable effect.
    fn pointerize_class(&mut self, el: &mut Element, table: &mut LookupTable) {
        let Some(classes) = el.attrs.get("class").map(str::to_string) else {
            return;
        };
        if classes.is_empty() {
            return;
        }
        let rewritten = classes
            .split_whitespace()
            .map(|token| {
                self.create_lookup(IdentKind::Class, token, table)
                    .unwrap_or_else(|| token.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ");
        el.attrs.set("class", rewritten);
    }

    /// Rewrite an id-referencing attribute, keeping a leading `#` if the
    /// value carried one (fragment-style references).
    fn pointerize_id_like(&mut self, el: &mut Element, attr: &str, table: &mut LookupTable) {
        let Some(value) = el.attrs.get(attr).map(str::to_string) else {
            return;
        };
        let (leading_hash, name) = match value.strip_prefix('#') {
            Some(rest) => (true, rest),
            None => (false, value.as_str()),
        };
        if let Some(pointer) = self.create_lookup(IdentKind::Id, name, table) {
            let rewritten = if leading_hash {
                format!("#{pointer}")
            } else {
                pointer
            };
            el.attrs.set(attr, rewritten);
        }
    }
}
