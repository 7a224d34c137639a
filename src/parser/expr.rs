use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::{Node, ParseError};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A fully parsed boolean expression. Owns the root of the tree; the tree
/// is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr(Node);

impl Expr {
    /// Strips all whitespace, parses the whole string and checks that
    /// nothing is left over.
    pub fn from_string(s: &str) -> Result<Self, ParseError> {
        let stripped = WHITESPACE_RE.replace_all(s, "");
        if stripped.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parsed = Node::munch(&stripped)?;
        if !parsed.rest.is_empty() {
            return Err(ParseError::TrailingInput(parsed.rest.to_string()));
        }

        Ok(Self(parsed.node))
    }

    pub fn root(&self) -> &Node {
        &self.0
    }

    pub fn evaluate(&self) -> bool {
        self.0.evaluate()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
