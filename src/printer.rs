use crate::expression::{Expr, ExprKind};
use std::fmt;

/// Prints expression as `name`, `name(left,right)` or a bare slot number.
pub fn render(expr: &Expr) -> String {
    let mut output = String::new();
    print_expr(expr, &mut output);
    output
}

enum Piece<'a> {
    Expr(&'a Expr),
    Text(&'static str),
}

fn print_expr(expr: &Expr, output: &mut String) {
    let mut pending = vec![Piece::Expr(expr)];
    while let Some(piece) = pending.pop() {
        match piece {
            Piece::Text(text) => output.push_str(text),
            Piece::Expr(expr) => match expr.kind() {
                ExprKind::Variable(name) => output.push_str(name.as_str()),
                ExprKind::Application {
                    operator,
                    left,
                    right,
                } => {
                    output.push_str(operator.as_str());
                    output.push('(');
                    pending.push(Piece::Text(")"));
                    pending.push(Piece::Expr(right));
                    pending.push(Piece::Text(","));
                    pending.push(Piece::Expr(left));
                }
                ExprKind::Reference(slot) => output.push_str(&slot.to_string()),
            },
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
