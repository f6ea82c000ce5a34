use super::ast::Span;
use super::error::CompileError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Int(i32),

    // Identifiers
    Ident(String),

    // Punctuation
    LParen,
    RParen,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,

    // Special
    Eof,
}

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

pub fn lex(source: &str) -> Result<Vec<SpannedToken>, Vec<CompileError>> {
    let mut lexer = Lexer::new(source);
    lexer.tokenize()
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<SpannedToken>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn tokenize(&mut self) -> Result<Vec<SpannedToken>, Vec<CompileError>> {
        while self.pos < self.bytes.len() {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                break;
            }

            let start = self.pos;
            let ch = self.bytes[self.pos];

            match ch {
                b'(' => { self.pos += 1; self.push(Token::LParen, start, self.pos); }
                b')' => { self.pos += 1; self.push(Token::RParen, start, self.pos); }
                b'+' => { self.pos += 1; self.push(Token::Plus, start, self.pos); }
                b'-' => { self.pos += 1; self.push(Token::Minus, start, self.pos); }
                b'*' => { self.pos += 1; self.push(Token::Star, start, self.pos); }
                b'/' => { self.pos += 1; self.push(Token::Slash, start, self.pos); }
                b'^' => { self.pos += 1; self.push(Token::Caret, start, self.pos); }
                b'0'..=b'9' => {
                    self.lex_number(start);
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                    self.lex_ident(start);
                }
                _ => {
                    // Step over the whole UTF-8 character so spans stay on boundaries
                    let width = self.source[start..].chars().next().map_or(1, char::len_utf8);
                    self.errors.push(CompileError::lexer(
                        format!("Unexpected character: '{}'", &self.source[start..start + width]),
                        Span::new(start, start + width),
                    ));
                    self.pos += width;
                }
            }
        }

        self.tokens.push(SpannedToken {
            token: Token::Eof,
            span: Span::new(self.pos, self.pos),
        });

        if self.errors.is_empty() {
            Ok(std::mem::take(&mut self.tokens))
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }

    fn push(&mut self, token: Token, start: usize, end: usize) {
        self.tokens.push(SpannedToken {
            token,
            span: Span::new(start, end),
        });
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn lex_number(&mut self, start: usize) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        match text.parse::<i32>() {
            Ok(v) => self.push(Token::Int(v), start, self.pos),
            Err(_) => self.errors.push(CompileError::lexer(
                format!("Integer literal out of range: {text}"),
                Span::new(start, self.pos),
            )),
        }
    }

    fn lex_ident(&mut self, start: usize) {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_alphanumeric() || self.bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }
        let word = &self.source[start..self.pos];
        self.push(Token::Ident(word.to_string()), start, self.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(s: &str) -> Vec<Token> {
        lex(s).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn simple_tokens() {
        let tokens = tok("1 + 2");
        assert_eq!(tokens, vec![Token::Int(1), Token::Plus, Token::Int(2), Token::Eof]);
    }

    #[test]
    fn operators() {
        let tokens = tok("+ - * / ^ ( )");
        assert_eq!(tokens, vec![
            Token::Plus, Token::Minus, Token::Star, Token::Slash, Token::Caret,
            Token::LParen, Token::RParen, Token::Eof,
        ]);
    }

    #[test]
    fn variables_are_identifiers() {
        let tokens = tok("x*y-z");
        assert_eq!(tokens, vec![
            Token::Ident("x".into()), Token::Star, Token::Ident("y".into()),
            Token::Minus, Token::Ident("z".into()), Token::Eof,
        ]);
    }

    #[test]
    fn whitespace_is_skipped() {
        let tokens = tok(" \t3\n*\r\n x ");
        assert_eq!(tokens, vec![
            Token::Int(3), Token::Star, Token::Ident("x".into()), Token::Eof,
        ]);
    }

    #[test]
    fn spans_point_at_source() {
        let tokens = lex("12 + x").unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[1].span, Span::new(3, 4));
        assert_eq!(tokens[2].span, Span::new(5, 6));
        assert_eq!(tokens[3].span, Span::new(6, 6));
    }

    #[test]
    fn largest_literal() {
        assert_eq!(tok("2147483647"), vec![Token::Int(i32::MAX), Token::Eof]);
    }

    #[test]
    fn literal_out_of_range() {
        let errors = lex("2147483648").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("out of range"));
    }

    #[test]
    fn unexpected_character() {
        let errors = lex("x % 2").unwrap_err();
        assert_eq!(errors[0].span, Span::new(2, 3));
        assert!(errors[0].message.contains('%'));
    }

    #[test]
    fn unexpected_multibyte_character() {
        let errors = lex("x·y").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, Span::new(1, 3));
    }
}
