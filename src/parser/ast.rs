use std::{error::Error, fmt};

use once_cell::sync::Lazy;
use regex::Regex;

static LITERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(u64),
    Not(Box<Node>),
    And { lhs: Box<Node>, rhs: Box<Node> },
    Or { lhs: Box<Node>, rhs: Box<Node> },
}

/// Tag for the two binary variants, so a rotated node can be rebuilt
/// without inspecting its type at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
}

impl BinaryOp {
    pub fn combine(self, lhs: Node, rhs: Node) -> Node {
        match self {
            BinaryOp::And => Node::And {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            BinaryOp::Or => Node::Or {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        }
    }

    /// Strips a leading `AND`/`OR` keyword off the remainder, if present.
    fn munch_keyword(expression: &str) -> Option<(Self, &str)> {
        if let Some(rest) = expression.strip_prefix("AND") {
            Some((BinaryOp::And, rest))
        } else if let Some(rest) = expression.strip_prefix("OR") {
            Some((BinaryOp::Or, rest))
        } else {
            None
        }
    }

    /// AND flattens same-type chains and pulls a nested OR out of its
    /// right child; OR only flattens same-type chains.
    fn rotates_over(self, rhs_op: Self) -> bool {
        match self {
            BinaryOp::And => true,
            BinaryOp::Or => rhs_op == BinaryOp::Or,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    EmptyInput,
    UnexpectedToken(String),
    UnclosedGroup,
    TrailingInput(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => {
                write!(f, "Invalid expression: expected literal or opening parenthesis")
            }
            ParseError::UnexpectedToken(rest) if rest.is_empty() => {
                write!(
                    f,
                    "Invalid expression: expected integer, opening parenthesis or NOT at end of input"
                )
            }
            ParseError::UnexpectedToken(rest) => {
                write!(
                    f,
                    "Invalid expression: expected integer, opening parenthesis or NOT, found {:?}",
                    rest
                )
            }
            ParseError::UnclosedGroup => {
                write!(f, "Invalid expression: missing closing parenthesis")
            }
            ParseError::TrailingInput(rest) => {
                write!(
                    f,
                    "Invalid expression: unexpected characters at end of string: {:?}",
                    rest
                )
            }
        }
    }
}

impl Error for ParseError {}

/// One step of the descent: the node built so far, the unconsumed tail of
/// the input, and whether the node came verbatim from a parenthesized
/// group (grouped results are exempt from rotation).
#[derive(Debug)]
pub(crate) struct Parsed<'a> {
    pub(crate) node: Node,
    pub(crate) rest: &'a str,
    grouped: bool,
}

impl Node {
    /// Recursive descent over the whitespace-stripped remainder: parse one
    /// operand, then chase an optional `AND`/`OR` continuation.
    pub(crate) fn munch(expression: &str) -> Result<Parsed<'_>, ParseError> {
        let operand = Self::munch_operand(expression)?;
        Self::munch_binary(operand)
    }

    fn munch_operand(expression: &str) -> Result<Parsed<'_>, ParseError> {
        if let Some(rest) = expression.strip_prefix('(') {
            return Self::munch_group(rest);
        }

        if let Some(rest) = expression.strip_prefix("NOT") {
            // NOT binds to the single operand that follows, never to a
            // bare binary expression.
            let operand = if let Some(rest) = rest.strip_prefix('(') {
                Self::munch_group(rest)?
            } else {
                Self::munch_literal(rest)?
            };

            return Ok(Parsed {
                node: Node::Not(Box::new(operand.node)),
                rest: operand.rest,
                grouped: false,
            });
        }

        Self::munch_literal(expression)
    }

    fn munch_group(after_paren: &str) -> Result<Parsed<'_>, ParseError> {
        let inner = Self::munch(after_paren)?;
        match inner.rest.strip_prefix(')') {
            Some(rest) => Ok(Parsed {
                node: inner.node,
                rest,
                grouped: true,
            }),
            None => Err(ParseError::UnclosedGroup),
        }
    }

    fn munch_literal(expression: &str) -> Result<Parsed<'_>, ParseError> {
        let matched = LITERAL_RE
            .find(expression)
            .ok_or_else(|| ParseError::UnexpectedToken(expression.to_string()))?;

        // The digit run can only fail to parse by overflowing u64.
        let value: u64 = matched
            .as_str()
            .parse()
            .map_err(|_| ParseError::UnexpectedToken(expression.to_string()))?;

        Ok(Parsed {
            node: Node::Literal(value),
            rest: &expression[matched.end()..],
            grouped: false,
        })
    }

    fn munch_binary(operand: Parsed<'_>) -> Result<Parsed<'_>, ParseError> {
        let (op, after_keyword) = match BinaryOp::munch_keyword(operand.rest) {
            Some(hit) => hit,
            None => return Ok(operand),
        };

        let right = Self::munch(after_keyword)?;
        let node = if right.grouped {
            // An explicitly parenthesized right operand keeps its shape.
            op.combine(operand.node, right.node)
        } else {
            Self::rotate(op, operand.node, right.node)
        };

        Ok(Parsed {
            node,
            rest: right.rest,
            grouped: false,
        })
    }

    /// Single left rotation on a fresh combine. The right side of a binary
    /// parse is itself a full parse, so chains come back right-leaning;
    /// when the rotation predicate holds, `Op(lhs, OpR(rl, rr))` becomes
    /// `OpR(Op(lhs, rl), rr)`. Applied at most once, never recursively.
    fn rotate(op: BinaryOp, lhs: Node, rhs: Node) -> Node {
        match rhs.into_binary() {
            Ok((rhs_op, rl, rr)) if op.rotates_over(rhs_op) => {
                rhs_op.combine(op.combine(lhs, rl), rr)
            }
            Ok((rhs_op, rl, rr)) => op.combine(lhs, rhs_op.combine(rl, rr)),
            Err(rhs) => op.combine(lhs, rhs),
        }
    }

    fn into_binary(self) -> Result<(BinaryOp, Node, Node), Node> {
        match self {
            Node::And { lhs, rhs } => Ok((BinaryOp::And, *lhs, *rhs)),
            Node::Or { lhs, rhs } => Ok((BinaryOp::Or, *lhs, *rhs)),
            other => Err(other),
        }
    }

    /// Truth value of the tree: a literal is true iff nonzero.
    pub fn evaluate(&self) -> bool {
        match self {
            Node::Literal(value) => *value != 0,
            Node::Not(inner) => !inner.evaluate(),
            Node::And { lhs, rhs } => lhs.evaluate() && rhs.evaluate(),
            Node::Or { lhs, rhs } => lhs.evaluate() || rhs.evaluate(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(value) => write!(f, "{}", value),
            Node::Not(inner) => write!(f, "NOT {}", inner),
            Node::And { lhs, rhs } => write!(f, "({} AND {})", lhs, rhs),
            Node::Or { lhs, rhs } => write!(f, "({} OR {})", lhs, rhs),
        }
    }
}

#[cfg(test)]
mod test_ast {
    use super::*;

    fn and(lhs: Node, rhs: Node) -> Node {
        BinaryOp::And.combine(lhs, rhs)
    }

    fn or(lhs: Node, rhs: Node) -> Node {
        BinaryOp::Or.combine(lhs, rhs)
    }

    fn lit(value: u64) -> Node {
        Node::Literal(value)
    }

    #[test]
    fn munch_literal_splits_remainder() {
        let parsed = Node::munch("12AND3").unwrap();
        assert_eq!(parsed.node, and(lit(12), lit(3)));
        assert_eq!(parsed.rest, "");
    }

    #[test]
    fn munch_stops_at_close_paren() {
        let parsed = Node::munch("7)AND2").unwrap();
        assert_eq!(parsed.node, lit(7));
        assert_eq!(parsed.rest, ")AND2");
    }

    #[test]
    fn and_chain_rotates_left() {
        let parsed = Node::munch("1AND2AND3").unwrap();
        assert_eq!(parsed.node, and(and(lit(1), lit(2)), lit(3)));
    }

    #[test]
    fn or_chain_rotates_left() {
        let parsed = Node::munch("1OR2OR3").unwrap();
        assert_eq!(parsed.node, or(or(lit(1), lit(2)), lit(3)));
    }

    #[test]
    fn and_rotates_over_or() {
        // right side of the AND parses to Or(2, 3), which the AND
        // predicate pulls apart: Or(And(1, 2), 3)
        let parsed = Node::munch("1AND2OR3").unwrap();
        assert_eq!(parsed.node, or(and(lit(1), lit(2)), lit(3)));
    }

    #[test]
    fn or_leaves_nested_and_alone() {
        let parsed = Node::munch("1OR2AND3").unwrap();
        assert_eq!(parsed.node, or(lit(1), and(lit(2), lit(3))));
    }

    #[test]
    fn grouped_right_operand_is_never_rotated() {
        let parsed = Node::munch("1AND(2OR3)").unwrap();
        assert_eq!(parsed.node, and(lit(1), or(lit(2), lit(3))));

        let parsed = Node::munch("1OR(2OR3)").unwrap();
        assert_eq!(parsed.node, or(lit(1), or(lit(2), lit(3))));
    }

    #[test]
    fn not_binds_single_operand() {
        let parsed = Node::munch("NOT5AND1").unwrap();
        assert_eq!(parsed.node, and(Node::Not(Box::new(lit(5))), lit(1)));
    }

    #[test]
    fn not_accepts_group() {
        let parsed = Node::munch("NOT(1OR0)").unwrap();
        assert_eq!(parsed.node, Node::Not(Box::new(or(lit(1), lit(0)))));
    }

    #[test]
    fn double_not_is_rejected() {
        assert_eq!(
            Node::munch("NOTNOT5").unwrap_err(),
            ParseError::UnexpectedToken("NOT5".to_string())
        );
    }

    #[test]
    fn missing_close_paren() {
        assert_eq!(Node::munch("(1AND2").unwrap_err(), ParseError::UnclosedGroup);
    }

    #[test]
    fn missing_right_operand() {
        assert_eq!(
            Node::munch("1AND").unwrap_err(),
            ParseError::UnexpectedToken(String::new())
        );
    }

    #[test]
    fn evaluate_literals_and_operators() {
        assert!(!lit(0).evaluate());
        assert!(lit(1).evaluate());
        assert!(Node::Not(Box::new(lit(0))).evaluate());
        assert!(!and(lit(1), lit(0)).evaluate());
        assert!(or(lit(1), lit(0)).evaluate());
        assert!(!or(lit(0), lit(0)).evaluate());
    }

    #[test]
    fn display_round_trips_through_munch() {
        let parsed = Node::munch("NOT(1AND2)OR3").unwrap();
        let rendered = parsed.node.to_string();
        assert_eq!(rendered, "(NOT (1 AND 2) OR 3)");

        let stripped: String = rendered.chars().filter(|c| !c.is_whitespace()).collect();
        let reparsed = Node::munch(&stripped).unwrap();
        assert_eq!(reparsed.node, parsed.node);
    }
}
