mod expr;
mod printer;

use std::fmt::Display;

use cursor::Line;
use itertools::Itertools;
pub use expr::{Expr, LiteralValue};
pub use printer::AstPrinter;
use scanner::{Token, TokenType};

use TokenType::*;

type Result<'a, T> = std::result::Result<T, ParseError<'a>>;

/// Limit for both parser recursion and the height of the produced tree, so evaluating or
/// printing any parsed expression stays within the stack.
pub const MAX_DEPTH: usize = 256;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("Expect ')' after expression.")]
    ExpectedRightParen,
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expression nested too deeply.")]
    TooDeep,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {}] Error{}: {error}", .token.line(), location(.token))]
pub struct ParseError<'a> {
    pub error: ParseErrorType,
    pub token: Token<'a>,
}

impl<'a> ParseError<'a> {
    pub fn new(error: ParseErrorType, token: Token<'a>) -> Self {
        Self { error, token }
    }
}

fn location(token: &Token) -> String {
    match token.ty() {
        Eof => " at end".to_string(),
        _ => format!(" at '{}'", token.lexeme()),
    }
}

/// All syntax errors reported while parsing one input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Default)]
pub struct ParseErrors<'a>(pub Vec<ParseError<'a>>);

impl Display for ParseErrors<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

/// Parses the first expression of `tokens`, reporting syntax errors to `report`.
pub fn parse<'a>(tokens: Vec<Token<'a>>, report: impl FnMut(&ParseError<'a>)) -> Option<Expr<'a>> {
    Parser::new(tokens).parse(report)
}

#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    /// Open groupings and unary operators around the current position.
    depth: usize,
    /// Height of the tree most recently returned by a grammar rule.
    height: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if tokens.last().map(Token::ty) != Some(Eof) {
            let line = tokens.last().map(Token::line).unwrap_or(Line(1));
            tokens.push(Token::eof(line));
        }
        Self { tokens, current: 0, depth: 0, height: 0 }
    }

    /// Parses one expression starting at the current token.
    ///
    /// On a syntax error, the error is passed to `report`, the parser skips ahead to the next
    /// token that starts a statement (or to the end), and `None` is returned.
    pub fn parse(&mut self, mut report: impl FnMut(&ParseError<'a>)) -> Option<Expr<'a>> {
        // An error unwinds without closing its nestings
        self.depth = 0;
        match self.expression() {
            Ok(expr) => {
                log::debug!("Parsed expression: {}", expr);
                Some(expr)
            }
            Err(e) => {
                log::trace!("Hit error: {:?}, syncing...", e);
                report(&e);
                self.synchronize();
                None
            }
        }
    }

    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.or()
    }

    fn or(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Or], Self::and)
    }

    fn and(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[And], Self::equality)
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[BangEqual, EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Greater, GreaterEqual, Less, LessEqual], Self::term)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Minus, Plus], Self::factor)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        self.binary(&[Slash, Star, Percent], Self::unary)
    }

    /// Folds `operand (operator operand)*` into a left-associated chain of binary nodes.
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<'a, Expr<'a>>,
    ) -> Result<'a, Expr<'a>> {
        let mut expr = operand(self)?;
        let mut height = self.height;

        while operators.contains(&self.peek()) {
            let operator = self.advance();
            let right = operand(self)?;
            height = height.max(self.height) + 1;
            check_depth(height, &operator)?;
            expr = Expr::binary(expr, operator, right);
        }

        self.height = height;
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Bang | Minus | Not = self.peek() {
            let operator = self.advance();
            self.depth += 1;
            check_depth(self.depth, &operator)?;
            let right = self.unary()?;
            self.depth -= 1;
            self.height += 1;
            check_depth(self.height, &operator)?;
            return Ok(Expr::unary(operator, right));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.peek_token().clone();
        let expr = match (token.ty(), token.literal()) {
            (LeftParen, _) => {
                self.advance();
                self.depth += 1;
                check_depth(self.depth, &token)?;
                let expr = self.expression()?;
                self.consume_or_error(RightParen, ParseErrorType::ExpectedRightParen)?;
                self.depth -= 1;
                self.height += 1;
                check_depth(self.height, &token)?;
                return Ok(Expr::grouping(expr));
            }
            (Null, _) => Expr::literal(LiteralValue::Nil),
            (_, Some(value)) => Expr::literal(value),
            _ => return Err(ParseError::new(ParseErrorType::ExpectedExpression, token)),
        };
        self.advance();
        self.height = 0;
        Ok(expr)
    }

    fn synchronize(&mut self) {
        // The offending token can't start anything useful, so always skip it
        self.advance();

        while !self.is_at_end() {
            if self.peek().starts_statement() {
                log::trace!("Synchronized at {:?}", self.peek_token());
                return;
            }
            self.advance();
        }
    }
}

fn check_depth<'a>(depth: usize, token: &Token<'a>) -> Result<'a, ()> {
    if depth > MAX_DEPTH {
        return Err(ParseError::new(ParseErrorType::TooDeep, token.clone()));
    }
    Ok(())
}

// Helpers
impl<'a> Parser<'a> {
    /// Consumes the next token if it has type `ty`, otherwise returns it without consuming.
    fn consume(&mut self, ty: TokenType) -> std::result::Result<Token<'a>, Token<'a>> {
        if self.peek() == ty {
            Ok(self.advance())
        } else {
            Err(self.peek_token().clone())
        }
    }

    fn consume_or_error(&mut self, ty: TokenType, error: ParseErrorType) -> Result<'a, Token<'a>> {
        self.consume(ty).map_err(|token| ParseError::new(error, token))
    }

    fn peek_token(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    fn peek(&self) -> TokenType {
        self.peek_token().ty()
    }

    /// Returns the current token and moves past it, staying on `Eof` once reached.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.peek() == Eof
    }
}
