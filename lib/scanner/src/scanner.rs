use cursor::{Cursor, Line};

pub mod token;
pub use token::{LiteralValue, Token, TokenData, TokenType};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

impl ScanError {
    pub fn new(error: ScanErrorType, line: Line) -> Self {
        Self { error, line }
    }
}

/// Scans the whole source, stopping at the first error.
pub fn scan(source: &str) -> Result<Vec<Token>, ScanError> {
    TokenStream::new(source).collect()
}

/// Lazily scans tokens from a source string.
///
/// Yields exactly one `Eof` token at the end. After an error has been yielded, the stream is
/// exhausted.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), done: false }
    }

    fn make_token(&self, data: TokenData<'a>, start: &Cursor<'a>) -> Token<'a> {
        Token::new(data, start.slice_until(&self.cursor), self.cursor.line())
    }

    fn either(&mut self, expected: char, matched: TokenData<'a>, otherwise: TokenData<'a>) -> TokenData<'a> {
        if self.cursor.next_if_eq(expected) {
            matched
        } else {
            otherwise
        }
    }

    fn string(&mut self, start: &Cursor<'a>) -> Result<TokenData<'a>, ScanErrorType> {
        loop {
            match self.cursor.next() {
                Some('"') => break,
                Some(_) => (),
                None => return Err(ScanErrorType::UnterminatedString),
            }
        }
        let lexeme = start.slice_until(&self.cursor);
        Ok(TokenData::Str(&lexeme[1..lexeme.len() - 1]))
    }

    fn number(&mut self, start: &Cursor<'a>) -> TokenData<'a> {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        // Only take the '.' if a fraction follows, so `1.` stays a number followed by a dot
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        let lexeme = start.slice_until(&self.cursor);
        TokenData::Number(lexeme.parse().expect("Digits with an optional fraction are a valid f64"))
    }

    fn identifier(&mut self, start: &Cursor<'a>) -> TokenData<'a> {
        self.cursor.advance_while(|c| c.is_alphanumeric() || c == '_');
        TokenData::keyword(start.slice_until(&self.cursor)).unwrap_or(TokenData::Identifier)
    }

    fn scan_token(&mut self) -> Option<Result<Token<'a>, ScanError>> {
        use TokenData::*;

        loop {
            let start = self.cursor.clone();
            let c = match self.cursor.next() {
                Some(c) => c,
                None => {
                    self.done = true;
                    return Some(Ok(Token::eof(self.cursor.line())));
                }
            };

            let data = match c {
                '(' => Ok(LeftParen),
                ')' => Ok(RightParen),
                '{' => Ok(LeftBrace),
                '}' => Ok(RightBrace),
                ',' => Ok(Comma),
                '.' => Ok(Dot),
                '-' => Ok(Minus),
                '+' => Ok(Plus),
                ';' => Ok(Semicolon),
                '*' => Ok(Star),
                '/' => Ok(Slash),
                '%' => Ok(Percent),

                '!' => Ok(self.either('=', BangEqual, Bang)),
                '=' => Ok(self.either('=', EqualEqual, Equal)),
                '<' => Ok(self.either('=', LessEqual, Less)),
                '>' => Ok(self.either('=', GreaterEqual, Greater)),

                '$' => {
                    self.cursor.skip_line();
                    continue;
                }

                '"' => self.string(&start),
                d if d.is_ascii_digit() => Ok(self.number(&start)),
                a if a.is_alphabetic() || a == '_' => Ok(self.identifier(&start)),

                // Newlines are counted by the cursor
                w if w.is_whitespace() => continue,

                c => Err(ScanErrorType::UnexpectedCharacter(c)),
            };

            return Some(match data {
                Ok(data) => {
                    let token = self.make_token(data, &start);
                    log::trace!("Scanned {:?}", token);
                    Ok(token)
                }
                Err(error) => {
                    self.done = true;
                    Err(ScanError::new(error, self.cursor.line()))
                }
            });
        }
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Result<Token<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.scan_token()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use TokenData::*;

    fn token(data: TokenData<'static>, lexeme: &'static str, line: usize) -> Token<'static> {
        Token::new(data, lexeme, Line(line))
    }

    fn eof(line: usize) -> Token<'static> {
        Token::eof(Line(line))
    }

    fn types(source: &str) -> Vec<TokenType> {
        scan(source).unwrap().iter().map(Token::ty).collect()
    }

    #[test]
    fn empty_source() {
        assert_eq!(scan("").unwrap(), vec![eof(1)]);
    }

    #[test]
    fn simple_sum() {
        assert_eq!(
            scan("1 + 2").unwrap(),
            vec![token(Number(1.0), "1", 1), token(Plus, "+", 1), token(Number(2.0), "2", 1), eof(1)]
        );
    }

    #[test]
    fn single_char_tokens() {
        assert_eq!(
            types("(){},.-+;*/%"),
            vec![
                TokenType::LeftParen,
                TokenType::RightParen,
                TokenType::LeftBrace,
                TokenType::RightBrace,
                TokenType::Comma,
                TokenType::Dot,
                TokenType::Minus,
                TokenType::Plus,
                TokenType::Semicolon,
                TokenType::Star,
                TokenType::Slash,
                TokenType::Percent,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn two_char_tokens() {
        assert_eq!(
            scan("! != = == < <= > >=").unwrap(),
            vec![
                token(Bang, "!", 1),
                token(BangEqual, "!=", 1),
                token(Equal, "=", 1),
                token(EqualEqual, "==", 1),
                token(Less, "<", 1),
                token(LessEqual, "<=", 1),
                token(Greater, ">", 1),
                token(GreaterEqual, ">=", 1),
                eof(1),
            ]
        );
        assert_eq!(types("!==="), vec![TokenType::BangEqual, TokenType::EqualEqual, TokenType::Eof]);
    }

    #[test]
    fn string_literals() {
        assert_eq!(
            scan("\"hello world\"").unwrap(),
            vec![token(Str("hello world"), "\"hello world\"", 1), eof(1)]
        );

        assert_eq!(
            scan("\"two\nlines\" 1").unwrap(),
            vec![token(Str("two\nlines"), "\"two\nlines\"", 2), token(Number(1.0), "1", 2), eof(2)]
        );

        assert_eq!(scan("\"\"").unwrap(), vec![token(Str(""), "\"\"", 1), eof(1)]);
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(
            scan("1 + \"hello\nworld").unwrap_err(),
            ScanError::new(ScanErrorType::UnterminatedString, Line(2))
        );
        assert_eq!(
            scan("\"oops").unwrap_err().to_string(),
            "[line 1] Error: Unterminated string."
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            scan("123 45.67").unwrap(),
            vec![token(Number(123.0), "123", 1), token(Number(45.67), "45.67", 1), eof(1)]
        );

        // A dot without a fraction is not part of the number
        assert_eq!(
            scan("1.foo").unwrap(),
            vec![
                token(Number(1.0), "1", 1),
                token(Dot, ".", 1),
                token(Identifier, "foo", 1),
                eof(1)
            ]
        );
        assert_eq!(types("7."), vec![TokenType::Number, TokenType::Dot, TokenType::Eof]);
    }

    #[test]
    fn huge_numbers() {
        let digits = format!("1{}", "0".repeat(400));
        assert_eq!(scan(&digits).unwrap()[0].data, Number(f64::INFINITY));

        let fraction = format!("0.{}1", "0".repeat(400));
        assert_eq!(scan(&fraction).unwrap()[0].data, Number(0.0));
    }

    #[test]
    fn identifiers_and_keywords() {
        assert_eq!(
            scan("foo _bar baz_9 null and or not true false").unwrap(),
            vec![
                token(Identifier, "foo", 1),
                token(Identifier, "_bar", 1),
                token(Identifier, "baz_9", 1),
                token(Null, "null", 1),
                token(And, "and", 1),
                token(Or, "or", 1),
                token(Not, "not", 1),
                token(True, "true", 1),
                token(False, "false", 1),
                eof(1),
            ]
        );
        assert_eq!(
            types("var function procedure end"),
            vec![
                TokenType::Var,
                TokenType::Function,
                TokenType::Procedure,
                TokenType::End,
                TokenType::Eof
            ]
        );
    }

    #[test]
    fn comments() {
        assert_eq!(
            scan("a $ comment + 1\nb").unwrap(),
            vec![token(Identifier, "a", 1), token(Identifier, "b", 2), eof(2)]
        );

        assert_eq!(scan("1 $ trailing").unwrap(), vec![token(Number(1.0), "1", 1), eof(2)]);
    }

    #[test]
    fn lines() {
        assert_eq!(
            scan("1\n\n  2\r\n\t3").unwrap(),
            vec![
                token(Number(1.0), "1", 1),
                token(Number(2.0), "2", 3),
                token(Number(3.0), "3", 4),
                eof(4)
            ]
        );
    }

    #[test]
    fn unexpected_character() {
        let error = scan("1 +\n@").unwrap_err();
        assert_eq!(error, ScanError::new(ScanErrorType::UnexpectedCharacter('@'), Line(2)));
        assert_eq!(error.to_string(), "[line 2] Error: Unexpected character: @");
    }

    #[test]
    fn stream_stops_after_error() {
        let mut stream = TokenStream::new("1 # 2");
        assert_eq!(stream.next(), Some(Ok(token(Number(1.0), "1", 1))));
        assert!(matches!(stream.next(), Some(Err(_))));
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn stream_yields_eof_once() {
        let mut stream = TokenStream::new("x");
        assert_eq!(stream.next(), Some(Ok(token(Identifier, "x", 1))));
        assert_eq!(stream.next(), Some(Ok(eof(1))));
        assert_eq!(stream.next(), None);
    }
}
