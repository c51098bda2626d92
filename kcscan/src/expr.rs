//! Dependency expression model.
//!
//! Kconfig condition expressions (`depends on`, `if`, default/select guards)
//! are kept as a small recursive tree. The only question the rest of the
//! crate ever asks of an expression is [`Expr::requires`]: whether the
//! expression can only hold when a given symbol is enabled. Full boolean
//! evaluation is deliberately out of scope.

use std::fmt;

/// An identifier naming a configuration option.
///
/// Identity, ordering, and hashing are all by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Binary comparison and logic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    And,
    Or,
    Ge,
    Le,
    Gt,
    Lt,
}

impl CmpOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
            CmpOp::And => "&&",
            CmpOp::Or => "||",
            CmpOp::Ge => ">=",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A string or tristate (`y`/`n`/`m`) literal.
    Literal(String),
    /// A configuration symbol.
    Symbol(Symbol),
    /// Logical negation.
    Not(Box<Expr>),
    /// A binary comparison or conjunction/disjunction.
    Binary {
        lhs: Box<Expr>,
        op: CmpOp,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Whether this expression can only be satisfied with `symbol` enabled.
    ///
    /// For `a && b` either branch needing the symbol is enough; for
    /// `a || b` *both* branches must need it, since either one alone can
    /// satisfy the disjunction. Every other operator answers `false`.
    /// Submenu reconstruction leans on this exact rule.
    pub fn requires(&self, symbol: &Symbol) -> bool {
        match self {
            Expr::Symbol(s) => s == symbol,
            Expr::Binary {
                lhs,
                op: CmpOp::And,
                rhs,
            } => lhs.requires(symbol) || rhs.requires(symbol),
            Expr::Binary {
                lhs,
                op: CmpOp::Or,
                rhs,
            } => lhs.requires(symbol) && rhs.requires(symbol),
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Literals are re-quoted so a formatted directive parses back to
            // the same tree.
            Expr::Literal(value) => write!(f, "\"{}\"", value.replace('"', "\\\"")),
            Expr::Symbol(symbol) => write!(f, "{symbol}"),
            Expr::Not(rhs) => write!(f, "!({rhs})"),
            Expr::Binary { lhs, op, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    fn and(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            lhs: Box::new(lhs),
            op: CmpOp::And,
            rhs: Box::new(rhs),
        }
    }

    fn or(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            lhs: Box::new(lhs),
            op: CmpOp::Or,
            rhs: Box::new(rhs),
        }
    }

    #[test]
    fn requires_on_conjunction_needs_either_branch() {
        let e = and(Expr::Symbol(sym("A")), Expr::Symbol(sym("B")));
        assert!(e.requires(&sym("A")));
        assert!(e.requires(&sym("B")));
        assert!(!e.requires(&sym("C")));
    }

    #[test]
    fn requires_on_disjunction_needs_both_branches() {
        let e = or(Expr::Symbol(sym("A")), Expr::Symbol(sym("B")));
        assert!(!e.requires(&sym("A")));
        assert!(!e.requires(&sym("B")));

        let both = or(Expr::Symbol(sym("A")), Expr::Symbol(sym("A")));
        assert!(both.requires(&sym("A")));
    }

    #[test]
    fn requires_ignores_comparisons_and_literals() {
        let e = Expr::Binary {
            lhs: Box::new(Expr::Symbol(sym("ARCH"))),
            op: CmpOp::Ne,
            rhs: Box::new(Expr::Literal("i386".into())),
        };
        assert!(!e.requires(&sym("ARCH")));
        assert!(!Expr::Literal("y".into()).requires(&sym("ARCH")));
        assert!(!Expr::Not(Box::new(Expr::Symbol(sym("A")))).requires(&sym("A")));
    }

    #[test]
    fn requires_nested_mixed_operators() {
        // A && (B || C) requires A but neither B nor C.
        let e = and(
            Expr::Symbol(sym("A")),
            or(Expr::Symbol(sym("B")), Expr::Symbol(sym("C"))),
        );
        assert!(e.requires(&sym("A")));
        assert!(!e.requires(&sym("B")));
        assert!(!e.requires(&sym("C")));
    }

    #[test]
    fn display_matches_original_shape() {
        let e = and(
            Expr::Symbol(sym("A")),
            Expr::Not(Box::new(Expr::Symbol(sym("B")))),
        );
        assert_eq!(e.to_string(), "(A && !(B))");
    }
}
