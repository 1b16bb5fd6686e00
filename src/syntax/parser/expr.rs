use crate::span::Spanned;

use super::super::ast::*;
use super::super::lexeme::Lexeme;
use super::{PResult, Parser};

impl Parser {
    /// Full expression, including assignment (right-associative, lowest precedence).
    pub(super) fn parse_expr(&mut self) -> PResult<Spanned<Expr>> {
        let place = self.parse_expr_bp(0)?;
        let op = match self.peek() {
            Lexeme::Eq => None,
            Lexeme::PlusEq => Some(BinOp::Add),
            Lexeme::MinusEq => Some(BinOp::Sub),
            Lexeme::StarEq => Some(BinOp::Mul),
            Lexeme::SlashEq => Some(BinOp::Div),
            _ => return Ok(place),
        };
        self.advance();
        let value = self.parse_expr()?;
        let span = place.span.merge(value.span);
        Ok(Spanned::new(
            Expr::Assign {
                op,
                place: Box::new(place),
                value: Box::new(value),
            },
            span,
        ))
    }

    /// A statement that starts with `if` or `{` ends at its closing brace.
    pub(super) fn parse_block_like(&mut self) -> PResult<Spanned<Expr>> {
        if self.at(&Lexeme::If) {
            self.parse_if()
        } else {
            let block = self.parse_block()?;
            Ok(block.map(Expr::Block))
        }
    }

    /// Pratt loop over binary operators and `as` casts.
    fn parse_expr_bp(&mut self, min_bp: u8) -> PResult<Spanned<Expr>> {
        let mut lhs = self.parse_unary()?;
        let mut last_comparison = false;

        loop {
            if self.at(&Lexeme::As) {
                if CAST_BINDING_POWER < min_bp {
                    break;
                }
                self.advance();
                let ty = self.parse_type()?;
                let span = lhs.span.merge(ty.span);
                lhs = Spanned::new(
                    Expr::Cast {
                        expr: Box::new(lhs),
                        ty,
                    },
                    span,
                );
                continue;
            }

            let op = match self.binary_op() {
                Some(op) => op,
                None => break,
            };
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }
            if op.is_comparison() && last_comparison {
                return Err(self.error_with_help(
                    "comparison operators cannot be chained",
                    "use parentheses to group the comparisons",
                ));
            }
            last_comparison = op.is_comparison();
            self.advance();

            let rhs = self.parse_expr_bp(r_bp)?;
            let span = lhs.span.merge(rhs.span);
            lhs = Spanned::new(
                Expr::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        Ok(lhs)
    }

    fn binary_op(&self) -> Option<BinOp> {
        let op = match self.peek() {
            Lexeme::Star => BinOp::Mul,
            Lexeme::Slash => BinOp::Div,
            Lexeme::Percent => BinOp::Rem,
            Lexeme::Plus => BinOp::Add,
            Lexeme::Minus => BinOp::Sub,
            Lexeme::EqEq => BinOp::Eq,
            Lexeme::NotEq => BinOp::Ne,
            Lexeme::Lt => BinOp::Lt,
            Lexeme::Le => BinOp::Le,
            Lexeme::Gt => BinOp::Gt,
            Lexeme::Ge => BinOp::Ge,
            Lexeme::AndAnd => BinOp::And,
            Lexeme::OrOr => BinOp::Or,
            _ => return None,
        };
        Some(op)
    }

    fn parse_unary(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.current_span();
        let op = match self.peek() {
            Lexeme::Minus => UnOp::Neg,
            Lexeme::Bang => UnOp::Not,
            Lexeme::Star => UnOp::Deref,
            Lexeme::Amp => {
                self.advance();
                let mutable = self.eat(&Lexeme::Mut);
                let expr = self.parse_unary()?;
                let span = start.merge(expr.span);
                return Ok(Spanned::new(
                    Expr::Unary {
                        op: UnOp::Ref { mutable },
                        expr: Box::new(expr),
                    },
                    span,
                ));
            }
            _ => return self.parse_postfix(),
        };
        self.advance();
        let expr = self.parse_unary()?;
        let span = start.merge(expr.span);
        Ok(Spanned::new(
            Expr::Unary {
                op,
                expr: Box::new(expr),
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> PResult<Spanned<Expr>> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek() {
                Lexeme::LParen => {
                    let args = self.parse_call_args()?;
                    let span = expr.span.merge(self.prev_span());
                    expr = Spanned::new(
                        Expr::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                Lexeme::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&Lexeme::RBracket)?;
                    let span = expr.span.merge(self.prev_span());
                    expr = Spanned::new(
                        Expr::Index {
                            expr: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                Lexeme::Question => {
                    let span = expr.span.merge(self.advance().span);
                    expr = Spanned::new(Expr::Try(Box::new(expr)), span);
                }
                Lexeme::Dot => {
                    self.advance();
                    let name = self.parse_field_name()?;
                    if self.at(&Lexeme::LParen) {
                        let args = self.parse_call_args()?;
                        let span = expr.span.merge(self.prev_span());
                        expr = Spanned::new(
                            Expr::MethodCall {
                                receiver: Box::new(expr),
                                method: name,
                                args,
                            },
                            span,
                        );
                    } else {
                        let span = expr.span.merge(name.span);
                        expr = Spanned::new(
                            Expr::Field {
                                expr: Box::new(expr),
                                name,
                            },
                            span,
                        );
                    }
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Named field, method, or tuple index (`.0`).
    fn parse_field_name(&mut self) -> PResult<Spanned<String>> {
        if let Lexeme::Integer {
            value,
            suffix: None,
        } = self.peek().clone()
        {
            let span = self.advance().span;
            return Ok(Spanned::new(value.to_string(), span));
        }
        self.expect_ident()
    }

    fn parse_call_args(&mut self) -> PResult<Vec<Spanned<Expr>>> {
        self.expect(&Lexeme::LParen)?;
        let mut args = Vec::new();
        while !self.at(&Lexeme::RParen) {
            args.push(self.parse_expr()?);
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        self.expect(&Lexeme::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.current_span();
        match self.peek().clone() {
            Lexeme::Integer { value, suffix } => {
                self.advance();
                Ok(Spanned::new(
                    Expr::Literal(Literal::Integer { value, suffix }),
                    start,
                ))
            }
            Lexeme::Float { value, suffix } => {
                self.advance();
                Ok(Spanned::new(
                    Expr::Literal(Literal::Float { value, suffix }),
                    start,
                ))
            }
            Lexeme::Str(text) => {
                self.advance();
                Ok(Spanned::new(Expr::Literal(Literal::Str(text)), start))
            }
            Lexeme::True | Lexeme::False => {
                let value = self.at(&Lexeme::True);
                self.advance();
                Ok(Spanned::new(Expr::Literal(Literal::Bool(value)), start))
            }
            Lexeme::Ident(_) | Lexeme::Crate | Lexeme::SelfValue | Lexeme::Super => {
                let path = self.parse_path()?;
                if self.at(&Lexeme::Bang) && matches!(self.peek_nth(1), Lexeme::LParen) {
                    return Err(self.error_with_help(
                        &format!("macro invocation `{}!` is not supported", path.last()),
                        "generated code must not depend on macros",
                    ));
                }
                let span = start.merge(self.prev_span());
                Ok(Spanned::new(Expr::Path(path), span))
            }
            Lexeme::LParen => self.parse_paren_or_tuple(),
            Lexeme::LBracket => self.parse_array(),
            Lexeme::LBrace => {
                let block = self.parse_block()?;
                Ok(block.map(Expr::Block))
            }
            Lexeme::If => self.parse_if(),
            Lexeme::Pipe | Lexeme::OrOr => self.parse_closure(),
            Lexeme::Return => {
                self.advance();
                let value = if matches!(
                    self.peek(),
                    Lexeme::Semicolon
                        | Lexeme::RBrace
                        | Lexeme::RParen
                        | Lexeme::RBracket
                        | Lexeme::Comma
                        | Lexeme::Eof
                ) {
                    None
                } else {
                    Some(Box::new(self.parse_expr()?))
                };
                let span = start.merge(self.prev_span());
                Ok(Spanned::new(Expr::Return(value), span))
            }
            Lexeme::Reserved(word) => Err(self.error_with_help(
                &format!("unsupported keyword `{}`", word),
                "the checked subset covers `fn`, `const`, `let`, `if` and closures",
            )),
            other => Err(self.error_here(&format!(
                "expected expression, found {}",
                other.description()
            ))),
        }
    }

    fn parse_paren_or_tuple(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.expect(&Lexeme::LParen)?;
        if self.eat(&Lexeme::RParen) {
            let span = start.merge(self.prev_span());
            return Ok(Spanned::new(Expr::Tuple(Vec::new()), span));
        }

        let first = self.parse_expr()?;
        if self.eat(&Lexeme::RParen) {
            let span = start.merge(self.prev_span());
            return Ok(Spanned::new(Expr::Paren(Box::new(first)), span));
        }

        if !self.eat(&Lexeme::Comma) {
            return Err(self.error_here(&format!(
                "expected ')', found {}",
                self.peek().description()
            )));
        }
        let mut elems = vec![first];
        while !self.at(&Lexeme::RParen) {
            elems.push(self.parse_expr()?);
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        self.expect(&Lexeme::RParen)?;
        let span = start.merge(self.prev_span());
        Ok(Spanned::new(Expr::Tuple(elems), span))
    }

    /// `[a, b, c]` or `[value; len]`.
    fn parse_array(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.expect(&Lexeme::LBracket)?;
        if self.eat(&Lexeme::RBracket) {
            let span = start.merge(self.prev_span());
            return Ok(Spanned::new(Expr::Array(Vec::new()), span));
        }

        let first = self.parse_expr()?;
        if self.eat(&Lexeme::Semicolon) {
            let len = self.parse_expr()?;
            self.expect(&Lexeme::RBracket)?;
            let span = start.merge(self.prev_span());
            return Ok(Spanned::new(
                Expr::ArrayRepeat {
                    value: Box::new(first),
                    len: Box::new(len),
                },
                span,
            ));
        }

        let mut elems = vec![first];
        while self.eat(&Lexeme::Comma) {
            if self.at(&Lexeme::RBracket) {
                break;
            }
            elems.push(self.parse_expr()?);
        }
        self.expect(&Lexeme::RBracket)?;
        let span = start.merge(self.prev_span());
        Ok(Spanned::new(Expr::Array(elems), span))
    }

    fn parse_if(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.expect(&Lexeme::If)?;
        if self.at(&Lexeme::Let) {
            return Err(self.error_here("`if let` is not supported"));
        }
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;

        let else_branch = if self.eat(&Lexeme::Else) {
            let branch = if self.at(&Lexeme::If) {
                self.parse_if()?
            } else if self.at(&Lexeme::LBrace) {
                self.parse_block()?.map(Expr::Block)
            } else {
                return Err(self.error_here(&format!(
                    "expected '{{' or 'if' after 'else', found {}",
                    self.peek().description()
                )));
            };
            Some(Box::new(branch))
        } else {
            None
        };

        let span = start.merge(self.prev_span());
        Ok(Spanned::new(
            Expr::If {
                cond: Box::new(cond),
                then_block,
                else_branch,
            },
            span,
        ))
    }

    /// `|a, b: T| body` or `|| body`; parameter types are checked and dropped.
    fn parse_closure(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.current_span();
        let mut params = Vec::new();
        if !self.eat(&Lexeme::OrOr) {
            self.expect(&Lexeme::Pipe)?;
            while !self.at(&Lexeme::Pipe) {
                let name = if self.at(&Lexeme::Underscore) {
                    let span = self.advance().span;
                    Spanned::new("_".to_string(), span)
                } else {
                    self.expect_ident()?
                };
                if self.eat(&Lexeme::Colon) {
                    self.parse_type()?;
                }
                params.push(name);
                if !self.eat(&Lexeme::Comma) {
                    break;
                }
            }
            self.expect(&Lexeme::Pipe)?;
        }

        let body = if self.eat(&Lexeme::Arrow) {
            self.parse_type()?;
            if !self.at(&Lexeme::LBrace) {
                return Err(self.error_here("closure with a return type needs a block body"));
            }
            self.parse_block()?.map(Expr::Block)
        } else {
            self.parse_expr()?
        };

        let span = start.merge(body.span);
        Ok(Spanned::new(
            Expr::Closure {
                params,
                body: Box::new(body),
            },
            span,
        ))
    }
}
