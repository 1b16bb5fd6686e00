mod expr;
mod items;

#[cfg(test)]
mod tests;

use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};

use super::ast::*;
use super::lexeme::Lexeme;

/// Parsing stops at the first error; the check only needs a verdict and a location.
pub(super) type PResult<T> = Result<T, Diagnostic>;

pub(crate) struct Parser {
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Spanned<Lexeme>>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn parse_file(mut self) -> Result<File, Vec<Diagnostic>> {
        self.parse_file_inner().map_err(|d| vec![d])
    }

    fn parse_file_inner(&mut self) -> PResult<File> {
        let attrs = self.parse_inner_attributes()?;
        let mut items = Vec::new();
        while !self.at(&Lexeme::Eof) {
            items.push(self.parse_item()?);
        }
        Ok(File { attrs, items })
    }

    fn parse_block(&mut self) -> PResult<Spanned<Block>> {
        let start = self.expect(&Lexeme::LBrace)?;
        let mut stmts = Vec::new();
        let mut tail = None;

        loop {
            if self.at(&Lexeme::RBrace) {
                break;
            }
            if self.at(&Lexeme::Eof) {
                return Err(self
                    .error_here("expected '}', found end of file")
                    .with_note("the block opened here is never closed".to_string())
                    .with_help(format!("block starts at byte {}", start.start)));
            }
            if self.eat(&Lexeme::Semicolon) {
                continue;
            }
            if self.at(&Lexeme::Let) {
                stmts.push(self.parse_let_stmt()?);
                continue;
            }
            if self.is_item_start() {
                let item = self.parse_item()?;
                stmts.push(item.map(Stmt::Item));
                continue;
            }

            let expr = if self.at(&Lexeme::If) || self.at(&Lexeme::LBrace) {
                self.parse_block_like()?
            } else {
                self.parse_expr()?
            };
            if self.eat(&Lexeme::Semicolon) {
                let span = expr.span.merge(self.prev_span());
                stmts.push(Spanned::new(Stmt::Expr { expr, semi: true }, span));
            } else if self.at(&Lexeme::RBrace) {
                tail = Some(Box::new(expr));
                break;
            } else if expr.node.is_block_like() {
                let span = expr.span;
                stmts.push(Spanned::new(Stmt::Expr { expr, semi: false }, span));
            } else {
                return Err(self.error_with_help(
                    &format!("expected ';' or '}}', found {}", self.peek().description()),
                    "statements must be terminated with `;`",
                ));
            }
        }

        self.expect(&Lexeme::RBrace)?;
        let span = start.merge(self.prev_span());
        Ok(Spanned::new(Block { stmts, tail }, span))
    }

    fn parse_let_stmt(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.expect(&Lexeme::Let)?;
        let mutable = self.eat(&Lexeme::Mut);
        let name = if self.at(&Lexeme::Underscore) {
            let span = self.advance().span;
            Spanned::new("_".to_string(), span)
        } else {
            self.expect_ident()?
        };
        let ty = if self.eat(&Lexeme::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if self.eat(&Lexeme::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&Lexeme::Semicolon)?;
        let span = start.merge(self.prev_span());
        Ok(Spanned::new(
            Stmt::Let {
                mutable,
                name,
                ty,
                init,
            },
            span,
        ))
    }

    fn parse_type(&mut self) -> PResult<Spanned<Type>> {
        let start = self.current_span();
        let ty = match self.peek().clone() {
            Lexeme::Amp | Lexeme::AndAnd => {
                // `&&T` is two references
                let double = self.at(&Lexeme::AndAnd);
                self.advance();
                let mutable = self.eat(&Lexeme::Mut);
                let inner = self.parse_type()?.node;
                let single = Type::Ref {
                    mutable,
                    inner: Box::new(inner),
                };
                if double {
                    Type::Ref {
                        mutable: false,
                        inner: Box::new(single),
                    }
                } else {
                    single
                }
            }
            Lexeme::LBracket => {
                self.advance();
                let elem = self.parse_type()?.node;
                let ty = if self.eat(&Lexeme::Semicolon) {
                    let len = self.parse_expr()?;
                    Type::Array {
                        elem: Box::new(elem),
                        len: Box::new(len),
                    }
                } else {
                    Type::Slice(Box::new(elem))
                };
                self.expect(&Lexeme::RBracket)?;
                ty
            }
            Lexeme::LParen => {
                self.advance();
                let mut elems = Vec::new();
                while !self.at(&Lexeme::RParen) {
                    elems.push(self.parse_type()?.node);
                    if !self.eat(&Lexeme::Comma) {
                        break;
                    }
                }
                self.expect(&Lexeme::RParen)?;
                Type::Tuple(elems)
            }
            Lexeme::Underscore => {
                self.advance();
                Type::Infer
            }
            Lexeme::Ident(_) | Lexeme::Crate | Lexeme::SelfValue | Lexeme::Super => {
                let path = self.parse_path()?;
                let mut args = Vec::new();
                if self.eat(&Lexeme::Lt) {
                    loop {
                        args.push(self.parse_type()?.node);
                        if !self.eat(&Lexeme::Comma) || self.at(&Lexeme::Gt) {
                            break;
                        }
                    }
                    self.expect(&Lexeme::Gt)?;
                }
                Type::Path { path, args }
            }
            other => {
                return Err(self.error_here(&format!(
                    "expected type, found {}",
                    other.description()
                )))
            }
        };
        let span = start.merge(self.prev_span());
        Ok(Spanned::new(ty, span))
    }

    /// `a::b::c`, optionally starting with `crate`, `self` or `super`.
    fn parse_path(&mut self) -> PResult<Path> {
        let mut segments = vec![self.path_segment()?];
        while self.at(&Lexeme::PathSep) && self.segment_after_sep() {
            self.advance();
            segments.push(self.path_segment()?);
        }
        Ok(Path(segments))
    }

    fn path_segment(&mut self) -> PResult<String> {
        let text = match self.peek() {
            Lexeme::Ident(name) => name.clone(),
            Lexeme::Crate => "crate".to_string(),
            Lexeme::SelfValue => "self".to_string(),
            Lexeme::Super => "super".to_string(),
            other => {
                return Err(self.error_here(&format!(
                    "expected path segment, found {}",
                    other.description()
                )))
            }
        };
        self.advance();
        Ok(text)
    }

    fn segment_after_sep(&self) -> bool {
        matches!(
            self.peek_nth(1),
            Lexeme::Ident(_) | Lexeme::Crate | Lexeme::SelfValue | Lexeme::Super
        )
    }

    // --- Token helpers ---

    fn peek(&self) -> &Lexeme {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Lexeme {
        let idx = (self.pos + n).min(self.tokens.len().saturating_sub(1));
        &self.tokens[idx].node
    }

    fn current_span(&self) -> Span {
        let idx = self.pos.min(self.tokens.len().saturating_sub(1));
        self.tokens[idx].span
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::dummy()
        }
    }

    fn advance(&mut self) -> &Spanned<Lexeme> {
        let idx = self.pos.min(self.tokens.len().saturating_sub(1));
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn at(&self, token: &Lexeme) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Lexeme) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Lexeme) -> PResult<Span> {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_here(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            )))
        }
    }

    fn expect_ident(&mut self) -> PResult<Spanned<String>> {
        if let Lexeme::Ident(name) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Ok(Spanned::new(name, span))
        } else {
            Err(self.error_here(&format!(
                "expected identifier, found {}",
                self.peek().description()
            )))
        }
    }

    fn error_here(&self, msg: &str) -> Diagnostic {
        Diagnostic::error(msg.to_string(), self.current_span())
    }

    fn error_with_help(&self, msg: &str, help: &str) -> Diagnostic {
        self.error_here(msg).with_help(help.to_string())
    }
}
