//! Expression orders and code fragments
//!
//! Every emitted expression carries the [`Order`] of its outermost operator.
//! Orders are declared from tightest to loosest binding, so `a > b` means
//! `a` binds looser than `b`.

/// Binding strength of an emitted Rust expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Order {
    /// Literals, identifiers, parenthesized and block expressions
    Atomic,
    /// Method calls, macro calls, indexing, field access, `?`
    UnaryPostfix,
    /// `!x`, `-x`, `&x`, `*x`
    UnaryPrefix,
    /// `x as T`
    Cast,
    /// `*` `/` `%`
    Multiplicative,
    /// `+` `-`
    Additive,
    /// `<<` `>>`
    Shift,
    /// `&`
    BitwiseAnd,
    /// `^`
    BitwiseXor,
    /// `|`
    BitwiseOr,
    /// `==` `!=` `<` `>` `<=` `>=`
    Relational,
    /// `&&`
    LogicalAnd,
    /// `||`
    LogicalOr,
    /// `..` `..=`
    Range,
    /// `=` and compound assignment
    Assignment,
    /// Anything goes; never parenthesized by a parent
    None,
}

impl Order {
    /// The next tighter order, used for operands of non-associative
    /// operators so that `a - (b - c)` keeps its parentheses.
    pub fn tighter(self) -> Order {
        use Order::*;
        match self {
            Atomic | UnaryPostfix => Atomic,
            UnaryPrefix => UnaryPostfix,
            Cast => UnaryPrefix,
            Multiplicative => Cast,
            Additive => Multiplicative,
            Shift => Additive,
            BitwiseAnd => Shift,
            BitwiseXor => BitwiseAnd,
            BitwiseOr => BitwiseXor,
            Relational => BitwiseOr,
            LogicalAnd => Relational,
            LogicalOr => LogicalAnd,
            Range => LogicalOr,
            Assignment => Range,
            None => Assignment,
        }
    }

    /// Whether a fragment of this order needs parentheses when placed in a
    /// slot that requires `required`.
    pub fn needs_parens_in(self, required: Order) -> bool {
        self > required
    }
}

/// Emitted expression text together with its order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub code: String,
    pub order: Order,
}

impl Fragment {
    pub fn new(code: impl Into<String>, order: Order) -> Self {
        Self {
            code: code.into(),
            order,
        }
    }

    pub fn atomic(code: impl Into<String>) -> Self {
        Self::new(code, Order::Atomic)
    }

    /// The fragment's text as it must appear inside a slot requiring
    /// `required`.
    pub fn embed(&self, required: Order) -> String {
        if self.order.needs_parens_in(required) {
            format!("({})", self.code)
        } else {
            self.code.clone()
        }
    }
}
