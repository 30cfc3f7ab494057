//! Selector component walking and rewriting.
//!
//! Tokenizes one selector string, surfaces its rewritable components
//! (class names, id names, attribute values) to a callback, and splices
//! the replacements back into the original text. Everything outside a
//! replaced component keeps its source bytes, so a selector with no
//! replacements round-trips unchanged.

use cssparser::{Parser, ParserInput, SourcePosition, Token};

/// Kind of a selector component surfaced to the rewrite callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// `.name`
    Class,
    /// `#name`
    Id,
    /// `[attr=value]` (any match operator, bare or quoted value)
    Attribute,
}

/// A rewritable component found while walking a selector.
#[derive(Debug)]
pub struct Component<'a> {
    pub kind: ComponentKind,
    /// The tested attribute's name, for [`ComponentKind::Attribute`].
    pub attribute: Option<&'a str>,
    /// The class name, id name, or attribute value, unescaped.
    pub value: &'a str,
}

/// Rewrite the components of one selector.
///
/// `replace` is called for every component found, in source order;
/// returning `Some` substitutes the component's value, `None` leaves it
/// untouched. Walks into functional pseudo-classes (`:not(...)`,
/// `:is(...)`) and attribute brackets.
pub fn rewrite_selector<F>(selector: &str, replace: &mut F) -> String
where
    F: FnMut(&Component<'_>) -> Option<String>,
{
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let mut out = String::new();
    let mut emitted = parser.position();
    walk(&mut parser, &mut out, &mut emitted, replace);
    out.push_str(parser.slice_from(emitted));
    out
}

fn walk<'i, F>(
    parser: &mut Parser<'i, '_>,
    out: &mut String,
    emitted: &mut SourcePosition,
    replace: &mut F,
) where
    F: FnMut(&Component<'_>) -> Option<String>,
{
    loop {
        let before = parser.position();
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            // `.name`
            Token::Delim('.') => {
                let name_at = parser.position();
                let next_token = match parser.next_including_whitespace() {
                    Ok(next_token) => next_token.clone(),
                    Err(_) => break,
                };
                match next_token {
                    Token::Ident(name) => {
                        let component = Component {
                            kind: ComponentKind::Class,
                            attribute: None,
                            value: &name,
                        };
                        if let Some(replacement) = replace(&component) {
                            out.push_str(parser.slice(*emitted..name_at));
                            let _ = cssparser::serialize_identifier(&replacement, out);
                            *emitted = parser.position();
                        }
                    }
                    // A block here is malformed, but it must still be
                    // consumed eagerly to keep positions in sync.
                    token if is_block_open(&token) => {
                        let _ = parser.parse_nested_block(
                            |p| -> Result<(), cssparser::ParseError<'i, ()>> {
                                walk(p, out, emitted, replace);
                                Ok(())
                            },
                        );
                    }
                    _ => {}
                }
            }
            // `#name`
            Token::IDHash(name) => {
                let component = Component {
                    kind: ComponentKind::Id,
                    attribute: None,
                    value: &name,
                };
                if let Some(replacement) = replace(&component) {
                    out.push_str(parser.slice(*emitted..before));
                    out.push('#');
                    let _ = cssparser::serialize_identifier(&replacement, out);
                    *emitted = parser.position();
                }
            }
            // `[attr=value]` and friends
            Token::SquareBracketBlock => {
                let _ = parser.parse_nested_block(
                    |p| -> Result<(), cssparser::ParseError<'i, ()>> {
                        rewrite_attribute(p, out, emitted, replace);
                        Ok(())
                    },
                );
            }
            // `:not(...)`, `:is(...)`, `:nth-child(2n of .x)`, ...
            // Curly blocks cannot occur in a well-formed selector but are
            // walked the same way so positions never go stale.
            Token::Function(_) | Token::ParenthesisBlock | Token::CurlyBracketBlock => {
                let _ = parser.parse_nested_block(
                    |p| -> Result<(), cssparser::ParseError<'i, ()>> {
                        walk(p, out, emitted, replace);
                        Ok(())
                    },
                );
            }
            _ => {}
        }
    }
}

/// Tokens that open a nested block; each must be consumed eagerly.
fn is_block_open(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock
    )
}

/// Rewrite the value of one bracketed attribute selector, already entered.
///
/// Shapes handled: `[attr]` (nothing to rewrite), `[attr <op> ident]`,
/// `[attr <op> "string"]`, each with optional trailing case flag.
/// Namespaced or otherwise unexpected contents are left untouched.
fn rewrite_attribute<'i, F>(
    parser: &mut Parser<'i, '_>,
    out: &mut String,
    emitted: &mut SourcePosition,
    replace: &mut F,
) where
    F: FnMut(&Component<'_>) -> Option<String>,
{
    let attribute = match next_significant(parser) {
        Some((_, Token::Ident(name))) => name,
        _ => return drain(parser),
    };

    match next_significant(parser) {
        // `[attr]` - an existence test carries no value.
        None => return,
        Some((_, Token::Delim('=')))
        | Some((_, Token::IncludeMatch))
        | Some((_, Token::DashMatch))
        | Some((_, Token::PrefixMatch))
        | Some((_, Token::SubstringMatch))
        | Some((_, Token::SuffixMatch)) => {}
        Some(_) => return drain(parser),
    }

    let (value_at, value_token) = match next_significant(parser) {
        Some(found) => found,
        None => return,
    };

    match value_token {
        Token::Ident(value) => {
            let component = Component {
                kind: ComponentKind::Attribute,
                attribute: Some(&attribute),
                value: &value,
            };
            if let Some(replacement) = replace(&component) {
                out.push_str(parser.slice(*emitted..value_at));
                let _ = cssparser::serialize_identifier(&replacement, out);
                *emitted = parser.position();
            }
        }
        Token::QuotedString(value) => {
            let component = Component {
                kind: ComponentKind::Attribute,
                attribute: Some(&attribute),
                value: &value,
            };
            if let Some(replacement) = replace(&component) {
                out.push_str(parser.slice(*emitted..value_at));
                let _ = cssparser::serialize_string(&replacement, out);
                *emitted = parser.position();
            }
        }
        _ => {}
    }

    drain(parser)
}

/// Next token that is not whitespace or a comment, with its position.
fn next_significant<'i>(parser: &mut Parser<'i, '_>) -> Option<(SourcePosition, Token<'i>)> {
    loop {
        let at = parser.position();
        match parser.next_including_whitespace_and_comments() {
            Err(_) => return None,
            Ok(Token::WhiteSpace(_)) | Ok(Token::Comment(_)) => {}
            Ok(token) => return Some((at, token.clone())),
        }
    }
}

fn drain(parser: &mut Parser<'_, '_>) {
    while parser.next_including_whitespace_and_comments().is_ok() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rewrite every component to `x`, recording what was visited.
    fn rewrite_all(selector: &str) -> (String, Vec<String>) {
        let mut seen = Vec::new();
        let out = rewrite_selector(selector, &mut |component: &Component<'_>| {
            seen.push(match component.kind {
                ComponentKind::Class => format!(".{}", component.value),
                ComponentKind::Id => format!("#{}", component.value),
                ComponentKind::Attribute => format!(
                    "[{}={}]",
                    component.attribute.unwrap_or(""),
                    component.value
                ),
            });
            Some("x".to_string())
        });
        (out, seen)
    }

    #[test]
    fn test_class_and_id_components_are_rewritten() {
        let (out, seen) = rewrite_all(".hero #top > .wide");
        assert_eq!(out, ".x #x > .x");
        assert_eq!(seen, [".hero", "#top", ".wide"]);
    }

    #[test]
    fn test_untouched_selector_round_trips_byte_for_byte() {
        let selector = "main  > p:hover::before + *|em";
        let out = rewrite_selector(selector, &mut |_| None);
        assert_eq!(out, selector);
    }

    #[test]
    fn test_type_selectors_are_not_components() {
        let (out, seen) = rewrite_all("div > span");
        assert_eq!(out, "div > span");
        assert!(seen.is_empty());
    }

    #[test]
    fn test_attribute_selector_with_bare_value() {
        let (out, seen) = rewrite_all("[for=username]");
        assert_eq!(out, "[for=x]");
        assert_eq!(seen, ["[for=username]"]);
    }

    #[test]
    fn test_attribute_selector_with_quoted_value() {
        let (out, seen) = rewrite_all(r#"input[class~="wide"]"#);
        assert_eq!(out, r#"input[class~="x"]"#);
        assert_eq!(seen, ["[class=wide]"]);
    }

    #[test]
    fn test_attribute_existence_test_has_no_value() {
        let (out, seen) = rewrite_all("[disabled]");
        assert_eq!(out, "[disabled]");
        assert!(seen.is_empty());
    }

    #[test]
    fn test_attribute_case_flag_is_preserved() {
        let (out, _) = rewrite_all(r#"[id="top" i]"#);
        assert_eq!(out, r#"[id="x" i]"#);
    }

    #[test]
    fn test_components_inside_pseudo_classes_are_visited() {
        let (out, seen) = rewrite_all("li:not(.active) a");
        assert_eq!(out, "li:not(.x) a");
        assert_eq!(seen, [".active"]);
    }

    #[test]
    fn test_selective_replacement_keeps_other_components() {
        let out = rewrite_selector(".keep .swap", &mut |component: &Component<'_>| {
            (component.value == "swap").then(|| "x".to_string())
        });
        assert_eq!(out, ".keep .x");
    }

    #[test]
    fn test_escaped_class_name_is_unescaped_for_lookup() {
        let (_, seen) = rewrite_all(r".a\:b");
        assert_eq!(seen, [".a:b"]);
    }

    #[test]
    fn test_replacement_is_serialized_as_identifier() {
        let out = rewrite_selector(".hero", &mut |_| Some("1bad".to_string()));
        // A replacement needing escapes is still emitted as a valid ident.
        assert_eq!(out, r".\31 bad");
    }
}
