//! Lenient style-rule parsing and serialization.
//!
//! Built on the `cssparser` tokenizer. The rewriter only ever needs three
//! shapes: ordinary rules (a selector plus an opaque declaration block),
//! `@media` / `@supports` groups (whose nested rules must be visited), and
//! everything else, carried through verbatim. Declaration blocks are kept
//! as raw text - identifier renaming never looks inside them.
//!
//! Parsing never fails: constructs the scanner does not understand become
//! [`Rule::Other`] values holding their original text.

pub mod selector;

use cssparser::{Parser, ParserInput, SourcePosition, Token};

/// One rule of a parsed stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// An ordinary style rule: `selector { block }`.
    Style { selector: String, block: String },
    /// A conditional group (`@media`, `@supports`) with nested rules.
    Conditional {
        name: String,
        condition: String,
        rules: Vec<Rule>,
    },
    /// Anything else (other at-rules, comments, malformed trailers),
    /// preserved byte-for-byte.
    Other(String),
}

/// Parse style text into a rule list.
pub fn parse_stylesheet(css: &str) -> Vec<Rule> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_rule_list(&mut parser)
}

/// Serialize a rule list back to style text.
///
/// Selectors and declaration blocks keep their original bytes (modulo the
/// rewrites applied to selectors); whitespace *between* rules is
/// normalized to single newlines.
pub fn serialize(rules: &[Rule]) -> String {
    let mut out = String::new();
    for rule in rules {
        if !out.is_empty() {
            out.push('\n');
        }
        write_rule(rule, &mut out);
    }
    out
}

fn write_rule(rule: &Rule, out: &mut String) {
    match rule {
        Rule::Style { selector, block } => {
            out.push_str(selector);
            out.push_str(" {");
            out.push_str(block);
            out.push('}');
        }
        Rule::Conditional {
            name,
            condition,
            rules,
        } => {
            out.push('@');
            out.push_str(name);
            if !condition.is_empty() {
                out.push(' ');
                out.push_str(condition);
            }
            out.push_str(" {\n");
            for nested in rules {
                write_rule(nested, out);
                out.push('\n');
            }
            out.push('}');
        }
        Rule::Other(raw) => out.push_str(raw),
    }
}

type CssError<'i> = cssparser::ParseError<'i, ()>;

fn parse_rule_list(parser: &mut Parser<'_, '_>) -> Vec<Rule> {
    let mut rules = Vec::new();

    loop {
        // Find the start of the next rule. Whitespace between rules is
        // dropped; stray comments become opaque rules so they survive.
        let mut next = None;
        while next.is_none() {
            let at = parser.position();
            match parser.next_including_whitespace_and_comments() {
                Err(_) => return rules,
                Ok(Token::WhiteSpace(_)) => {}
                Ok(Token::Comment(_)) => {
                    rules.push(Rule::Other(parser.slice_from(at).to_string()));
                }
                Ok(token) => next = Some((at, token.clone())),
            }
        }
        let Some((start, token)) = next else {
            return rules;
        };

        match token {
            Token::AtKeyword(name) => {
                let name = name.to_string();
                rules.push(parse_at_rule(parser, start, name));
            }
            first => rules.push(parse_style_rule(parser, start, &first)),
        }
    }
}

/// Tokens that open a nested block. Every such token must be consumed
/// with `parse_nested_block` right away, otherwise the parser skips the
/// block lazily on the next call and recorded positions go stale.
fn is_block_open(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock
    )
}

/// Consume an at-rule whose `@name` token has already been read.
///
/// `@media` and `@supports` become [`Rule::Conditional`] with their nested
/// rules parsed recursively; every other at-rule is carried verbatim.
fn parse_at_rule(parser: &mut Parser<'_, '_>, start: SourcePosition, name: String) -> Rule {
    let prelude_start = parser.position();
    loop {
        let before = parser.position();
        match parser.next_including_whitespace_and_comments() {
            Ok(Token::CurlyBracketBlock) => {
                let lowered = name.to_ascii_lowercase();
                if lowered == "media" || lowered == "supports" {
                    let condition = parser.slice(prelude_start..before).trim().to_string();
                    let rules = parser.parse_nested_block(nested_rules).unwrap_or_default();
                    return Rule::Conditional {
                        name,
                        condition,
                        rules,
                    };
                }
                let _ = parser.parse_nested_block(drain_block);
                return Rule::Other(parser.slice_from(start).to_string());
            }
            Ok(Token::Semicolon) => {
                return Rule::Other(parser.slice_from(start).to_string());
            }
            Ok(token) if is_block_open(token) => {
                let _ = parser.parse_nested_block(drain_block);
            }
            Ok(_) => {}
            Err(_) => return Rule::Other(parser.slice_from(start).to_string()),
        }
    }
}

/// Consume a style rule whose first prelude token has already been read.
fn parse_style_rule(parser: &mut Parser<'_, '_>, start: SourcePosition, first: &Token<'_>) -> Rule {
    if is_block_open(first) {
        let _ = parser.parse_nested_block(drain_block);
    }
    loop {
        let before = parser.position();
        match parser.next_including_whitespace_and_comments() {
            Ok(Token::CurlyBracketBlock) => {
                let selector = parser.slice(start..before).trim_end().to_string();
                let block = match parser.parse_nested_block(block_span) {
                    Ok((from, to)) => parser.slice(from..to).to_string(),
                    Err(_) => String::new(),
                };
                return Rule::Style { selector, block };
            }
            Ok(token) if is_block_open(token) => {
                let _ = parser.parse_nested_block(drain_block);
            }
            Ok(_) => {}
            // EOF before any block: carry the trailer verbatim.
            Err(_) => return Rule::Other(parser.slice_from(start).to_string()),
        }
    }
}

fn nested_rules<'i>(parser: &mut Parser<'i, '_>) -> Result<Vec<Rule>, CssError<'i>> {
    Ok(parse_rule_list(parser))
}

fn drain_block<'i>(parser: &mut Parser<'i, '_>) -> Result<(), CssError<'i>> {
    while parser.next_including_whitespace_and_comments().is_ok() {}
    Ok(())
}

fn block_span<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<(SourcePosition, SourcePosition), CssError<'i>> {
    let from = parser.position();
    while parser.next_including_whitespace_and_comments().is_ok() {}
    Ok((from, parser.position()))
}
