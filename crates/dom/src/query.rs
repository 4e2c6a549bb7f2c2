//! Scoped selector matching.
//!
//! Covers exactly the grammar the selector generator emits: compound
//! steps of an optional tag, `#id`, `.class` repeats and
//! `:nth-child(<k>)` with an exact ordinal, joined by child (`>`) or
//! descendant (whitespace) combinators. Identifiers may carry CSS
//! backslash escapes (hex escapes with an optional trailing whitespace,
//! or literal escapes); they are unescaped before comparison. Anything
//! outside this grammar is `DomError::InvalidSelector`.
//!
//! Matching is scoped: candidates are the elements strictly inside the
//! scope subtree in document order, shadow subtrees are never entered,
//! and ancestor walks for chain matching stop at the scope boundary.

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::types::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CompoundSelector {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) nth_child: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) compound: CompoundSelector,
    /// Relation to the previous (left) part.
    pub(crate) combinator: Option<Combinator>,
}

pub(crate) fn parse_selector(input: &str) -> Result<Vec<SelectorPart>> {
    let mut parser = Parser::new(input);
    parser.skip_whitespace();
    if parser.at_end() {
        return Err(parser.unsupported());
    }

    let mut parts = vec![SelectorPart {
        compound: parser.parse_compound()?,
        combinator: None,
    }];

    loop {
        let had_whitespace = parser.skip_whitespace();
        if parser.at_end() {
            break;
        }
        let combinator = if parser.peek() == Some('>') {
            parser.advance();
            parser.skip_whitespace();
            Combinator::Child
        } else if had_whitespace {
            Combinator::Descendant
        } else {
            return Err(parser.unsupported());
        };
        parts.push(SelectorPart {
            compound: parser.parse_compound()?,
            combinator: Some(combinator),
        });
    }

    Ok(parts)
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn unsupported(&self) -> DomError {
        DomError::InvalidSelector(self.source.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Skip whitespace, reporting whether any was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.advance();
        }
        self.pos > start
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector> {
        let mut compound = CompoundSelector::default();
        let mut matched_any = false;
        loop {
            match self.peek() {
                Some('#') => {
                    self.advance();
                    let ident = self.parse_ident()?;
                    if compound.id.replace(ident).is_some() {
                        return Err(self.unsupported());
                    }
                }
                Some('.') => {
                    self.advance();
                    let ident = self.parse_ident()?;
                    compound.classes.push(ident);
                }
                Some(':') => {
                    self.advance();
                    let ordinal = self.parse_nth_child()?;
                    if compound.nth_child.replace(ordinal).is_some() {
                        return Err(self.unsupported());
                    }
                }
                Some(c) if is_ident_char(c) || c == '\\' => {
                    // Tag must lead the compound
                    if matched_any {
                        return Err(self.unsupported());
                    }
                    compound.tag = Some(self.parse_ident()?);
                }
                _ => break,
            }
            matched_any = true;
        }
        if !matched_any {
            return Err(self.unsupported());
        }
        Ok(compound)
    }

    /// Parse `nth-child(<k>)` after the colon. The only pseudo-class the
    /// generator emits.
    fn parse_nth_child(&mut self) -> Result<usize> {
        for expected in "nth-child(".chars() {
            if self.peek() != Some(expected) {
                return Err(self.unsupported());
            }
            self.advance();
        }
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.advance();
        }
        if self.peek() != Some(')') {
            return Err(self.unsupported());
        }
        self.advance();
        match digits.parse::<usize>() {
            Ok(ordinal) if ordinal >= 1 => Ok(ordinal),
            _ => Err(self.unsupported()),
        }
    }

    fn parse_ident(&mut self) -> Result<String> {
        let mut ident = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    self.advance();
                    ident.push(self.parse_escape()?);
                }
                Some(c) if is_ident_char(c) => {
                    ident.push(c);
                    self.advance();
                }
                _ => break,
            }
        }
        if ident.is_empty() {
            return Err(self.unsupported());
        }
        Ok(ident)
    }

    /// Decode the character after a backslash: up to six hex digits plus
    /// one optional terminating whitespace, or a literal escaped
    /// character.
    fn parse_escape(&mut self) -> Result<char> {
        let Some(first) = self.peek() else {
            return Err(self.unsupported());
        };
        if !first.is_ascii_hexdigit() {
            self.advance();
            return Ok(first);
        }

        let mut value: u32 = 0;
        let mut consumed = 0;
        while consumed < 6 {
            let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) else {
                break;
            };
            value = value * 16 + digit;
            self.advance();
            consumed += 1;
        }
        if matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.advance();
        }
        Ok(char::from_u32(value)
            .filter(|c| *c != '\0')
            .unwrap_or('\u{FFFD}'))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || (c as u32) >= 0x80
}

impl Document {
    /// All elements inside the scope subtree matching `selector`, in
    /// document order. The scope anchor itself is never a candidate.
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let parts = parse_selector(selector)?;
        let scope_node = self.get(scope)?;

        let mut matches = Vec::new();
        let mut stack: Vec<NodeId> = scope_node.children_ids.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.get(id)?;
            if node.is_element() && self.chain_matches(&parts, id) {
                matches.push(id);
            }
            for &child in node.children_ids.iter().rev() {
                stack.push(child);
            }
        }
        Ok(matches)
    }

    /// First match of `selector` inside the scope, in document order.
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(scope, selector)?.into_iter().next())
    }

    /// Match the full combinator chain ending at `node`, right to left.
    fn chain_matches(&self, parts: &[SelectorPart], node: NodeId) -> bool {
        let Some((last, rest)) = parts.split_last() else {
            return false;
        };
        if !self.compound_matches(node, &last.compound) {
            return false;
        }
        match last.combinator {
            None => true,
            Some(Combinator::Child) => match self.parent_element(node) {
                Some(parent) => self.chain_matches(rest, parent),
                None => false,
            },
            Some(Combinator::Descendant) => {
                let mut current = self.parent_element(node);
                while let Some(ancestor) = current {
                    if self.chain_matches(rest, ancestor) {
                        return true;
                    }
                    current = self.parent_element(ancestor);
                }
                false
            }
        }
    }

    fn compound_matches(&self, node: NodeId, compound: &CompoundSelector) -> bool {
        let Ok(n) = self.get(node) else {
            return false;
        };
        if !n.is_element() {
            return false;
        }
        if let Some(tag) = &compound.tag {
            if !n.node_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &compound.id {
            if n.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        for class in &compound.classes {
            if !n.class_list().iter().any(|token| token == class) {
                return false;
            }
        }
        if let Some(ordinal) = compound.nth_child {
            if self.child_ordinal(node) != Some(ordinal) {
                return false;
            }
        }
        true
    }
}
