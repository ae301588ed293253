use crate::{
    error::ExprError,
    expression::{Expr, Name},
};

/// Reads `NAME | NAME '(' expr ',' expr ')'`, without whitespace.
pub struct Parser {
    len: usize,
}

impl Parser {
    fn error(&self, source: &[u8], message: &'static str) -> ExprError {
        ExprError::MalformedExpression {
            position: self.len - source.len(),
            message,
        }
    }

    fn parse_name(&self, source: &mut &[u8]) -> Result<Name, ExprError> {
        let end = source
            .iter()
            .position(|b| !b.is_ascii_alphabetic())
            .unwrap_or(source.len());
        if end == 0 {
            return Err(match source.first() {
                None => self.error(source, "Unexpected end of expression."),
                Some(_) => self.error(source, "Expected a name."),
            });
        }
        // Only ASCII letters were consumed, so this is valid UTF-8 and a valid name.
        let name = String::from_utf8_lossy(&source[..end]).into_owned();
        *source = &source[end..];
        Name::new(name)
    }

    fn expect(&self, source: &mut &[u8], ch: u8, message: &'static str) -> Result<(), ExprError> {
        match source.first() {
            Some(&b) if b == ch => {
                *source = &source[1..];
                Ok(())
            }
            None => Err(self.error(source, "Unexpected end of expression.")),
            Some(_) => Err(self.error(source, message)),
        }
    }

    // Applications still waiting for children sit on an explicit stack, so
    // nesting depth is bounded only by memory.
    fn parse_expr(&self, source: &mut &[u8]) -> Result<Expr, ExprError> {
        let mut open: Vec<(Name, Option<Expr>)> = Vec::new();
        loop {
            let name = self.parse_name(source)?;
            if source.first() == Some(&b'(') {
                *source = &source[1..];
                open.push((name, None));
                continue;
            }
            let mut done = Expr::from_variable(name);
            loop {
                match open.pop() {
                    None => return Ok(done),
                    Some((operator, None)) => {
                        self.expect(source, b',', "Expected ','.")?;
                        open.push((operator, Some(done)));
                        break;
                    }
                    Some((operator, Some(left))) => {
                        self.expect(source, b')', "Expected ')'.")?;
                        done = Expr::from_application(operator, left, done);
                    }
                }
            }
        }
    }

    /// Parses a whole expression; trailing input is an error.
    pub fn parse(source: &str) -> Result<Expr, ExprError> {
        let mut b = source.as_bytes();
        let parser = Self { len: b.len() };
        let expr = parser.parse_expr(&mut b)?;
        if !b.is_empty() {
            return Err(parser.error(b, "Unexpected trailing input."));
        }
        Ok(expr)
    }
}
