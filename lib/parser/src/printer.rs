use std::fmt::{self, Write};

use crate::Expr;

/// Renders expressions in fully parenthesized prefix form, e.g. `(* (- 123) (group 45.67))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        let mut out = String::new();
        // Writing into a String can't fail
        let _ = Self::write(expr, &mut out);
        out
    }

    pub(crate) fn write(expr: &Expr, out: &mut impl Write) -> fmt::Result {
        match expr {
            Expr::Literal(value) => write!(out, "{}", value),
            Expr::Grouping(expression) => Self::parenthesize(out, "group", &[expression.as_ref()]),
            Expr::Unary { operator, right } => Self::parenthesize(out, operator.lexeme(), &[right.as_ref()]),
            Expr::Binary { left, operator, right } => {
                Self::parenthesize(out, operator.lexeme(), &[left.as_ref(), right.as_ref()])
            }
        }
    }

    fn parenthesize(out: &mut impl Write, name: &str, exprs: &[&Expr]) -> fmt::Result {
        write!(out, "({}", name)?;
        for expr in exprs {
            out.write_char(' ')?;
            Self::write(expr, out)?;
        }
        out.write_char(')')
    }
}
