pub mod ast;
pub mod expr;

pub use ast::{Node, ParseError};
pub use expr::Expr;
