//! Lexer (tokenizer) for pseudocode expressions
//!
//! Converts the text of a single expression into a flat [`Token`] stream
//! consumed by the parser. Word operators (`div`, `mod`, `et`, `ou`, `non`)
//! and boolean words (`vrai`, `faux`, ...) are recognized case-insensitively.

use crate::evaluator::EvalError;
use crate::variables::value::parse_bool;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries the 1-based column where it starts, so syntax
/// errors can point at the offending spot.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i64, usize),
    RealLiteral(f64, usize),
    StringLiteral(String, usize),
    CharLiteral(char, usize),
    BoolLiteral(bool, usize),

    Ident(String, usize),

    // Arithmetic
    Plus(usize),
    Minus(usize),
    Star(usize),
    Slash(usize),
    Percent(usize), // % or mod
    Div(usize),     // integer division

    // Comparison
    Eq(usize),    // = or ==
    NotEq(usize), // != <> ≠
    Lt(usize),
    Le(usize), // <= ≤
    Gt(usize),
    Ge(usize), // >= ≥

    // Logical
    AndAnd(usize), // && or et
    OrOr(usize),   // || or ou
    Bang(usize),   // ! or non

    LParen(usize),
    RParen(usize),
    Comma(usize),

    Eof(usize),
}

impl Token {
    /// Returns the column where this token appears.
    pub fn column(&self) -> usize {
        match self {
            Token::IntLiteral(_, col)
            | Token::RealLiteral(_, col)
            | Token::StringLiteral(_, col)
            | Token::CharLiteral(_, col)
            | Token::BoolLiteral(_, col)
            | Token::Ident(_, col)
            | Token::Plus(col)
            | Token::Minus(col)
            | Token::Star(col)
            | Token::Slash(col)
            | Token::Percent(col)
            | Token::Div(col)
            | Token::Eq(col)
            | Token::NotEq(col)
            | Token::Lt(col)
            | Token::Le(col)
            | Token::Gt(col)
            | Token::Ge(col)
            | Token::AndAnd(col)
            | Token::OrOr(col)
            | Token::Bang(col)
            | Token::LParen(col)
            | Token::RParen(col)
            | Token::Comma(col)
            | Token::Eof(col) => *col,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "integer {}", n),
            Token::RealLiteral(r, _) => write!(f, "real {}", r),
            Token::StringLiteral(s, _) => write!(f, "string \"{}\"", s),
            Token::CharLiteral(c, _) => write!(f, "character '{}'", c),
            Token::BoolLiteral(b, _) => write!(f, "boolean {}", b),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'mod'"),
            Token::Div(_) => write!(f, "'div'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::AndAnd(_) => write!(f, "'et'"),
            Token::OrOr(_) => write!(f, "'ou'"),
            Token::Bang(_) => write!(f, "'non'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Eof(_) => write!(f, "end of expression"),
        }
    }
}

/// Lexer for a single expression
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, EvalError> {
        let mut tokens = Vec::new();

        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            if self.is_at_end() {
                tokens.push(Token::Eof(self.column()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, EvalError> {
        let col = self.column();
        let ch = self.advance().ok_or_else(|| self.error("unexpected end", col))?;

        match ch {
            '"' => self.string_literal(col),
            '\'' => self.char_literal(col),
            '0'..='9' => self.number_literal(ch, col),
            c if c.is_alphabetic() || c == '_' => Ok(self.word(c, col)),

            '+' => Ok(Token::Plus(col)),
            '-' => Ok(Token::Minus(col)),
            '*' => Ok(Token::Star(col)),
            '/' => Ok(Token::Slash(col)),
            '%' => Ok(Token::Percent(col)),
            '≠' => Ok(Token::NotEq(col)),
            '≤' => Ok(Token::Le(col)),
            '≥' => Ok(Token::Ge(col)),
            '=' => {
                self.match_char('=');
                Ok(Token::Eq(col))
            }
            '!' => {
                if self.match_char('=') {
                    Ok(Token::NotEq(col))
                } else {
                    Ok(Token::Bang(col))
                }
            }
            '<' => {
                if self.match_char('=') {
                    Ok(Token::Le(col))
                } else if self.match_char('>') {
                    Ok(Token::NotEq(col))
                } else {
                    Ok(Token::Lt(col))
                }
            }
            '>' => {
                if self.match_char('=') {
                    Ok(Token::Ge(col))
                } else {
                    Ok(Token::Gt(col))
                }
            }
            '&' if self.match_char('&') => Ok(Token::AndAnd(col)),
            '|' if self.match_char('|') => Ok(Token::OrOr(col)),
            '(' => Ok(Token::LParen(col)),
            ')' => Ok(Token::RParen(col)),
            ',' => Ok(Token::Comma(col)),

            _ => Err(self.error(&format!("unexpected character '{}'", ch), col)),
        }
    }

    fn string_literal(&mut self, col: usize) -> Result<Token, EvalError> {
        let mut string = String::new();

        loop {
            match self.advance() {
                Some('"') => return Ok(Token::StringLiteral(string, col)),
                Some('\\') => string.push(self.escape(col)?),
                Some(c) => string.push(c),
                None => return Err(self.error("unterminated string literal", col)),
            }
        }
    }

    fn char_literal(&mut self, col: usize) -> Result<Token, EvalError> {
        let c = match self.advance() {
            Some('\\') => self.escape(col)?,
            Some('\'') => return Err(self.error("empty character literal", col)),
            Some(c) => c,
            None => return Err(self.error("unterminated character literal", col)),
        };

        if !self.match_char('\'') {
            return Err(self.error("character literal holds more than one character", col));
        }

        Ok(Token::CharLiteral(c, col))
    }

    fn escape(&mut self, col: usize) -> Result<char, EvalError> {
        match self.advance() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('0') => Ok('\0'),
            Some('\\') => Ok('\\'),
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some(other) => Err(self.error(&format!("unknown escape sequence \\{}", other), col)),
            None => Err(self.error("unterminated escape sequence", col)),
        }
    }

    fn number_literal(&mut self, first: char, col: usize) -> Result<Token, EvalError> {
        let mut text = String::from(first);
        let mut is_real = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else if c == '.' && !is_real && self.peek_next().is_some_and(|n| n.is_ascii_digit())
            {
                is_real = true;
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if is_real {
            text.parse::<f64>()
                .map(|r| Token::RealLiteral(r, col))
                .map_err(|_| self.error(&format!("invalid real literal {}", text), col))
        } else {
            text.parse::<i64>()
                .map(|n| Token::IntLiteral(n, col))
                .map_err(|_| self.error(&format!("integer literal {} is too large", text), col))
        }
    }

    fn word(&mut self, first: char, col: usize) -> Token {
        let mut word = String::from(first);
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if let Some(b) = parse_bool(&word) {
            return Token::BoolLiteral(b, col);
        }

        match word.to_lowercase().as_str() {
            "et" => Token::AndAnd(col),
            "ou" => Token::OrOr(col),
            "non" => Token::Bang(col),
            "div" => Token::Div(col),
            "mod" => Token::Percent(col),
            _ => Token::Ident(word, col),
        }
    }

    fn error(&self, message: &str, column: usize) -> EvalError {
        EvalError::Syntax {
            message: message.to_string(),
            column,
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn column(&self) -> usize {
        self.position + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<String> {
        Lexer::new(src)
            .tokenize()
            .expect("tokenize failed")
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn word_operators_are_keywords() {
        assert_eq!(
            kinds("a ET non b"),
            vec!["identifier 'a'", "'et'", "'non'", "identifier 'b'", "end of expression"]
        );
    }

    #[test]
    fn numbers_and_literals() {
        let tokens = Lexer::new("12 3.25 \"x\\ty\" 'c' vrai").tokenize().unwrap();
        assert_eq!(tokens[0], Token::IntLiteral(12, 1));
        assert_eq!(tokens[1], Token::RealLiteral(3.25, 4));
        assert_eq!(tokens[2], Token::StringLiteral("x\ty".into(), 9));
        assert_eq!(tokens[3], Token::CharLiteral('c', 16));
        assert_eq!(tokens[4], Token::BoolLiteral(true, 20));
    }

    #[test]
    fn comparison_spellings() {
        assert_eq!(kinds("<> ≠ != == ="), vec!["'!='", "'!='", "'!='", "'='", "'='", "end of expression"]);
    }

    #[test]
    fn reports_unterminated_string() {
        let err = Lexer::new("\"abc").tokenize().unwrap_err();
        assert!(matches!(err, EvalError::Syntax { column: 1, .. }));
    }
}
