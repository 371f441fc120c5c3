use std::fmt::{self, Display, Formatter};

use cursor::Line;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData<'a>,
    pub lexeme: &'a str,
    pub line: Line,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData<'a>, lexeme: &'a str, line: Line) -> Token<'a> {
        Self { data, lexeme, line }
    }

    pub fn eof(line: Line) -> Token<'a> {
        Self::new(TokenData::Eof, "", line)
    }

    pub fn ty(&self) -> TokenType {
        self.data.into()
    }

    pub fn lexeme(&self) -> &'a str {
        self.lexeme
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn literal(&self) -> Option<LiteralValue<'a>> {
        match self.data {
            TokenData::Number(n) => Some(LiteralValue::Number(n)),
            TokenData::Str(s) => Some(LiteralValue::Str(s)),
            TokenData::True => Some(LiteralValue::Boolean(true)),
            TokenData::False => Some(LiteralValue::Boolean(false)),
            _ => None,
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

/// Scalar values that can appear literally in source code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

impl Display for LiteralValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Str(s) => write!(f, "{}", s),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(TokenType))]
pub enum TokenData<'a> {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,
    Percent,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    Str(&'a str),
    Number(f64),

    // Keywords.
    Var,
    As,
    Int,
    DoubleKw,
    StringKw,
    FloatKw,
    BoolKw,
    Constructor,
    Const,
    Member,
    If,
    For,
    Then,
    While,
    Else,
    End,
    Module,
    Class,
    Struct,
    Function,
    Select,
    CharKw,
    To,
    Until,
    Default,
    Case,
    Null,
    And,
    Or,
    True,
    False,
    Not,
    Private,
    Public,
    Protected,
    Interface,
    Import,
    Inherits,
    Implements,
    With,
    Base,
    Array,
    This,
    Foreach,
    In,
    Return,
    Do,
    Step,
    Procedure,
    Break,
    Continue,

    Eof,
}

impl TokenData<'_> {
    pub fn keyword(identifier: &str) -> Option<TokenData<'static>> {
        use TokenData::*;
        Some(match identifier {
            "var" => Var,
            "as" => As,
            "int" => Int,
            "double" => DoubleKw,
            "string" => StringKw,
            "float" => FloatKw,
            "bool" => BoolKw,
            "constructor" => Constructor,
            "const" => Const,
            "member" => Member,
            "if" => If,
            "for" => For,
            "then" => Then,
            "while" => While,
            "else" => Else,
            "end" => End,
            "module" => Module,
            "class" => Class,
            "struct" => Struct,
            "function" => Function,
            "select" => Select,
            "char" => CharKw,
            "to" => To,
            "until" => Until,
            "default" => Default,
            "case" => Case,
            "null" => Null,
            "and" => And,
            "or" => Or,
            "true" => True,
            "false" => False,
            "not" => Not,
            "private" => Private,
            "public" => Public,
            "protected" => Protected,
            "interface" => Interface,
            "import" => Import,
            "inherits" => Inherits,
            "implements" => Implements,
            "with" => With,
            "base" => Base,
            "array" => Array,
            "this" => This,
            "foreach" => Foreach,
            "in" => In,
            "return" => Return,
            "do" => Do,
            "step" => Step,
            "procedure" => Procedure,
            "break" => Break,
            "continue" => Continue,
            _ => return None,
        })
    }
}

impl TokenType {
    /// Keywords that can only begin a new construct, used as recovery points after a syntax error.
    pub fn starts_statement(self) -> bool {
        use TokenType::*;
        matches!(
            self,
            Var | Function
                | Procedure
                | Constructor
                | Class
                | Interface
                | Module
                | If
                | For
                | While
                | Select
                | Return
                | End
                | Else
                | Default
        )
    }
}
