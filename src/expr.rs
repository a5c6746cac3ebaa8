use crate::token::Token;
use crate::value::object::Object;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Identity for the expressions the resolver cares about. Ids are minted
/// from a process-wide counter while parsing, so they stay unique across
/// REPL lines and the interpreter can keep one resolution table that only
/// ever grows.
pub type ExprId = usize;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

pub fn next_id() -> ExprId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Expr is one of the two node types in the syntax tree. Every variant
/// that names a binding ('Variable', 'Assign', 'This', 'Super') carries an
/// id; the resolver keys its scope-distance table by that id and the
/// interpreter reads the table back when the expression executes.
#[derive(Clone, Debug)]
pub enum Expr {
    Literal {
        value: Object,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    /// Short-circuit 'and' / 'or'. Kept apart from Binary because the right
    /// operand may never be evaluated.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Grouping {
        expression: Box<Expr>,
    },
    Variable {
        id: ExprId,
        name: Token,
    },
    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        /// The closing parenthesis, kept for runtime error locations.
        paren: Token,
        arguments: Vec<Expr>,
    },
    /// Property access: object.name
    Get {
        object: Box<Expr>,
        name: Token,
    },
    /// Property assignment: object.name = value
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },
    This {
        id: ExprId,
        keyword: Token,
    },
    Super {
        id: ExprId,
        keyword: Token,
        method: Token,
    },
}
