use std::io::Write;

use cursor::Line;
use parser::{Expr, ParseErrors, Parser};
use scanner::{ScanError, Token, TokenType};

mod value;
pub use value::{Value, ValueKind};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EvalErrorType {
    #[error("Operand of '{operator}' must be a number, got {operand}.")]
    UnaryOperand { operator: String, operand: ValueKind },
    #[error("Unsupported operands for '{operator}': {left} and {right}.")]
    BinaryOperands { operator: String, left: ValueKind, right: ValueKind },
    #[error("Invalid unary operator '{0}'.")]
    InvalidUnaryOperator(String),
    #[error("Invalid binary operator '{0}'.")]
    InvalidBinaryOperator(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] {error}")]
pub struct EvalError {
    pub error: EvalErrorType,
    pub line: Line,
}

impl EvalErrorType {
    fn at(self, token: &Token) -> EvalError {
        EvalError { error: self, line: token.line() }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;

/// Evaluates an expression tree to a value.
///
/// Operator tokens are checked again here, so trees built by hand with an operator that the
/// grammar would never put there produce an error instead of a panic.
pub fn evaluate(expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok((*value).into()),
        Expr::Grouping(expression) => evaluate(expression),
        Expr::Unary { operator, right } => unary(operator, evaluate(right)?),
        Expr::Binary { left, operator, right } => match operator.ty() {
            TokenType::And => {
                let left = evaluate(left)?;
                if left.is_truthy() {
                    evaluate(right)
                } else {
                    Ok(false.into())
                }
            }
            TokenType::Or => {
                let left = evaluate(left)?;
                if left.is_truthy() {
                    Ok(true.into())
                } else {
                    evaluate(right)
                }
            }
            _ => binary(evaluate(left)?, operator, evaluate(right)?),
        },
    }
}

fn unary(operator: &Token, right: Value) -> Result<Value> {
    match (operator.ty(), right) {
        (TokenType::Minus, Value::Number(n)) => Ok((-n).into()),
        // `nil` counts as zero here
        (TokenType::Minus, Value::Nil) => Ok((-0.0).into()),
        (TokenType::Minus, v) => Err(EvalErrorType::UnaryOperand {
            operator: operator.lexeme().to_string(),
            operand: v.kind(),
        }
        .at(operator)),
        (TokenType::Bang | TokenType::Not, v) => Ok((!v.is_truthy()).into()),
        _ => Err(invalid_operator(operator, EvalErrorType::InvalidUnaryOperator)),
    }
}

fn binary(left: Value, operator: &Token, right: Value) -> Result<Value> {
    use TokenType::*;
    use Value::{Nil, Number, Str};

    log::trace!("Evaluating {} {} {}", left, operator, right);

    match (&left, operator.ty(), &right) {
        (Number(l), Plus, Number(r)) => Ok((l + r).into()),
        (Number(l), Minus, Number(r)) => Ok((l - r).into()),
        (Number(l), Star, Number(r)) => Ok((l * r).into()),
        (Number(l), Slash, Number(r)) => Ok((l / r).into()),
        (Number(l), Percent, Number(r)) => Ok((l % r).into()),

        (Str(l), Plus, Str(r)) => Ok(format!("{l}{r}").into()),
        (Str(l), Plus, r) if *r != Nil => Ok(format!("{l}{r}").into()),
        (l, Plus, Str(r)) if *l != Nil => Ok(format!("{l}{r}").into()),

        (Number(l), Greater, Number(r)) => Ok((l > r).into()),
        (Number(l), GreaterEqual, Number(r)) => Ok((l >= r).into()),
        (Number(l), Less, Number(r)) => Ok((l < r).into()),
        (Number(l), LessEqual, Number(r)) => Ok((l <= r).into()),

        (l, EqualEqual, r) => Ok(l.equals(r).into()),
        (l, BangEqual, r) => Ok((!l.equals(r)).into()),

        (l, Plus | Minus | Star | Slash | Percent | Greater | GreaterEqual | Less | LessEqual, r) => {
            Err(EvalErrorType::BinaryOperands {
                operator: operator.lexeme().to_string(),
                left: l.kind(),
                right: r.kind(),
            }
            .at(operator))
        }

        _ => Err(invalid_operator(operator, EvalErrorType::InvalidBinaryOperator)),
    }
}

fn invalid_operator(operator: &Token, error: impl FnOnce(String) -> EvalErrorType) -> EvalError {
    log::error!("Operator {:?} can't appear in this position", operator);
    error(operator.lexeme().to_string()).at(operator)
}

#[derive(thiserror::Error, Debug)]
pub enum InterpretError<'a> {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("{0}")]
    Parse(ParseErrors<'a>),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Scans, parses and evaluates `source`, then writes the resulting value to `output`.
pub fn run_source<'a>(source: &'a str, output: &mut impl Write) -> std::result::Result<Value, InterpretError<'a>> {
    let tokens = scanner::scan(source)?;

    let mut errors = ParseErrors::default();
    let expr = Parser::new(tokens).parse(|e| errors.0.push(e.clone()));
    let expr = match expr {
        Some(expr) if errors.0.is_empty() => expr,
        _ => return Err(InterpretError::Parse(errors)),
    };

    let value = evaluate(&expr)?;
    log::debug!("{} => {:?}", expr, value);
    writeln!(output, "{}", value)?;
    Ok(value)
}
