use super::ast::{BinOp, Expr, ExprKind, Span, Var};
use super::error::CompileError;
use super::lexer::{SpannedToken, Token};

/// Parse a token stream into a single expression. The whole stream must be
/// consumed; anything left before `Eof` is an error.
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Expr, Vec<CompileError>> {
    let mut parser = Parser::new(tokens);
    parser.parse_input().map_err(|e| vec![e])
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_input(&mut self) -> Result<Expr, CompileError> {
        if self.at_eof() {
            return Err(CompileError::parser("Empty expression", self.span()));
        }
        let expr = self.parse_expr()?;
        if !self.at_eof() {
            return Err(CompileError::parser(
                format!("Unexpected trailing input: {:?}", self.peek()),
                self.span(),
            ));
        }
        Ok(expr)
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&Token::Eof, |t| &t.token)
    }

    fn span(&self) -> Span {
        self.tokens.get(self.pos).map_or(
            Span::new(0, 0),
            |t| t.span,
        )
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<Span, CompileError> {
        if self.peek() == expected {
            let sp = self.span();
            self.advance();
            Ok(sp)
        } else {
            Err(CompileError::parser(
                format!("Expected {expected:?}, got {:?}", self.peek()),
                self.span(),
            ))
        }
    }

    fn binop(op: BinOp, left: Expr, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr {
            kind: ExprKind::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        }
    }

    // ── Expression parsing (precedence climbing) ──────────────────

    fn parse_expr(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Self::binop(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            left = Self::binop(op, left, right);
        }
        Ok(left)
    }

    /// Power operator `^`. Folds left like the other binary levels, so
    /// `a ^ b ^ c` is `(a ^ b) ^ c`. Existing conversions depend on this.
    fn parse_power(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_factor()?;
        while matches!(self.peek(), Token::Caret) {
            self.advance();
            let right = self.parse_factor()?;
            left = Self::binop(BinOp::Pow, left, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, CompileError> {
        let span = self.span();
        match self.peek().clone() {
            Token::Int(v) => {
                self.advance();
                Ok(Expr { kind: ExprKind::IntLit(v), span })
            }
            Token::Ident(name) => match Var::from_name(&name) {
                Some(var) => {
                    self.advance();
                    Ok(Expr { kind: ExprKind::Var(var), span })
                }
                None => Err(CompileError::parser(
                    format!("Unknown variable '{name}', expected x, y or z"),
                    span,
                )),
            },
            Token::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                let end = self.expect(&Token::RParen)?;
                Ok(Expr { kind: expr.kind, span: span.merge(end) })
            }
            Token::Plus => {
                self.advance();
                let operand = self.parse_factor()?;
                Ok(Expr { kind: operand.kind, span: span.merge(operand.span) })
            }
            Token::Minus => {
                self.advance();
                let operand = self.parse_factor()?;
                let merged = span.merge(operand.span);
                Ok(Expr { kind: ExprKind::Neg(Box::new(operand)), span: merged })
            }
            other => Err(CompileError::parser(
                format!("Expected a number, variable or '(', got {other:?}"),
                span,
            )),
        }
    }
}
