//! html-mangler - consistent renaming of CSS identifiers in HTML documents.
//!
//! Rewrites class names, id names, and id cross-references (`for`,
//! `href="#..."`, `xlink:href="#..."`) to short generated tokens, keeping
//! every reference to a given identifier consistent across the markup tree
//! and any embedded `<style>` rules, including rules nested in `@media` /
//! `@supports` groups and attribute-based selectors.
//!
//! ```ignore
//! use html_mangler::{Options, process_html};
//!
//! let html = r#"<style>.hero { color: red; }</style><div class="hero"></div>"#;
//! let out = process_html(html, &Options::default())?;
//! assert_eq!(out, r#"<style>.a { color: red; }</style><div class="a"></div>"#);
//! ```
//!
//! The mapping from original to generated names is private to a single
//! [`Mangler::process`] run; two runs over the same document produce the
//! same output, but no state carries over between runs or documents.

pub mod config;
pub mod css;
pub mod dom;
pub mod error;
pub mod logger;
pub mod mangle;

pub use config::{Options, Whitelist};
pub use error::Error;
pub use mangle::Mangler;

use dom::Document;

/// One-shot convenience: parse `html`, mangle identifiers, serialize back.
///
/// Equivalent to [`Document::parse`] + [`Mangler::process`] +
/// [`Document::to_html`].
pub fn process_html(html: &str, options: &Options) -> Result<String, Error> {
    let mut document = Document::parse(html)?;
    let mut mangler = Mangler::new(options);
    mangler.process(&mut document);
    Ok(document.to_html())
}
