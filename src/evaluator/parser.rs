//! Expression parser
//!
//! Recursive descent with one method per precedence level, lowest first:
//!
//! ```text
//! or        := and ( ("||" | ou) and )*
//! and       := equality ( ("&&" | et) equality )*
//! equality  := comparison ( ("=" | "!=") comparison )*
//! comparison:= additive ( ("<" | "<=" | ">" | ">=") additive )*
//! additive  := term ( ("+" | "-") term )*
//! term      := unary ( ("*" | "/" | div | mod) unary )*
//! unary     := ("-" | "!" | non) unary | primary
//! primary   := literal | ident | ident "(" args ")" | "(" or ")"
//! ```

use crate::evaluator::ast::{BinOp, Expr, UnaryOp};
use crate::evaluator::lexer::{Lexer, Token};
use crate::evaluator::EvalError;
use crate::variables::value::Value;

/// Parse a complete expression; trailing tokens are an error.
pub fn parse_expression(source: &str) -> Result<Expr, EvalError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        tokens,
        position: 0,
    };

    let expr = parser.parse_or()?;
    match parser.peek() {
        Token::Eof(_) => Ok(expr),
        other => Err(parser.error_at(other, &format!("unexpected {}", other))),
    }
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn parse_or(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_and()?;

        while matches!(self.peek(), Token::OrOr(_)) {
            self.advance();
            let right = self.parse_and()?;
            left = binary(BinOp::Or, left, right);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_equality()?;

        while matches!(self.peek(), Token::AndAnd(_)) {
            self.advance();
            let right = self.parse_equality()?;
            left = binary(BinOp::And, left, right);
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_comparison()?;

        loop {
            let op = match self.peek() {
                Token::Eq(_) => BinOp::Eq,
                Token::NotEq(_) => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.peek() {
                Token::Lt(_) => BinOp::Lt,
                Token::Le(_) => BinOp::Le,
                Token::Gt(_) => BinOp::Gt,
                Token::Ge(_) => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                Token::Div(_) => BinOp::IntDiv,
                Token::Percent(_) => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek() {
            Token::Minus(_) => Some(UnaryOp::Neg),
            Token::Bang(_) => Some(UnaryOp::Not),
            Token::Plus(_) => {
                self.advance();
                return self.parse_unary();
            }
            _ => None,
        };

        match op {
            Some(op) => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            None => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        let token = self.advance();

        match token {
            Token::IntLiteral(n, _) => Ok(Expr::Literal(Value::Int(n))),
            Token::RealLiteral(r, _) => Ok(Expr::Literal(Value::Real(r))),
            Token::StringLiteral(s, _) => Ok(Expr::Literal(Value::Str(s))),
            Token::CharLiteral(c, _) => Ok(Expr::Literal(Value::Char(c))),
            Token::BoolLiteral(b, _) => Ok(Expr::Literal(Value::Bool(b))),
            Token::Ident(name, _) => {
                if matches!(self.peek(), Token::LParen(_)) {
                    self.advance();
                    let args = self.parse_arguments()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Token::LParen(_) => {
                let inner = self.parse_or()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            other => Err(self.error_at(&other, &format!("expected a value, found {}", other))),
        }
    }

    /// Arguments after the opening parenthesis, up to and including `)`
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, EvalError> {
        let mut args = Vec::new();

        if matches!(self.peek(), Token::RParen(_)) {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_or()?);
            if matches!(self.peek(), Token::Comma(_)) {
                self.advance();
                continue;
            }
            self.expect_rparen()?;
            return Ok(args);
        }
    }

    fn expect_rparen(&mut self) -> Result<(), EvalError> {
        match self.peek() {
            Token::RParen(_) => {
                self.advance();
                Ok(())
            }
            other => Err(self.error_at(other, &format!("expected ')', found {}", other))),
        }
    }

    // ===== Helper methods =====

    fn peek(&self) -> &Token {
        // tokenize() always ends the stream with Eof, and advance() never moves past it
        &self.tokens[self.position]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if !matches!(token, Token::Eof(_)) {
            self.position += 1;
        }
        token
    }

    fn error_at(&self, token: &Token, message: &str) -> EvalError {
        EvalError::Syntax {
            message: message.to_string(),
            column: token.column(),
        }
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Expr {
        Expr::Literal(Value::Int(n))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            binary(BinOp::Add, int(1), binary(BinOp::Mul, int(2), int(3)))
        );
    }

    #[test]
    fn logical_words_have_lowest_precedence() {
        let expr = parse_expression("x > 5 ou y = 2").unwrap();
        assert!(matches!(expr, Expr::Binary { op: BinOp::Or, .. }));
    }

    #[test]
    fn function_calls_with_arguments() {
        let expr = parse_expression("enEntier(\"12\") + f()").unwrap();
        match expr {
            Expr::Binary { left, right, .. } => {
                assert!(matches!(*left, Expr::Call { ref args, .. } if args.len() == 1));
                assert!(matches!(*right, Expr::Call { ref args, .. } if args.is_empty()));
            }
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        assert!(matches!(
            parse_expression("1 2"),
            Err(EvalError::Syntax { column: 3, .. })
        ));
        assert!(parse_expression("(1 + 2").is_err());
    }
}
