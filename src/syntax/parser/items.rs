use crate::span::Spanned;

use super::super::ast::*;
use super::super::lexeme::Lexeme;
use super::{PResult, Parser};

impl Parser {
    pub(super) fn is_item_start(&self) -> bool {
        match self.peek() {
            Lexeme::Fn | Lexeme::Mod | Lexeme::Use | Lexeme::Pub | Lexeme::Hash => true,
            // `const fn` or `const NAME: T = ...;`, never a const block here
            Lexeme::Const => !matches!(self.peek_nth(1), Lexeme::LBrace),
            _ => false,
        }
    }

    pub(super) fn parse_item(&mut self) -> PResult<Spanned<Item>> {
        let start = self.current_span();
        let attrs = self.parse_outer_attributes()?;
        let vis = self.parse_visibility()?;

        let item = match self.peek() {
            Lexeme::Fn => Item::Fn(self.parse_fn(vis, attrs)?),
            Lexeme::Const if matches!(self.peek_nth(1), Lexeme::Fn) => {
                self.advance(); // `const fn` has the same shape as `fn`
                Item::Fn(self.parse_fn(vis, attrs)?)
            }
            Lexeme::Const => Item::Const(self.parse_const(vis, attrs)?),
            Lexeme::Mod => Item::Mod(self.parse_mod(vis, attrs)?),
            Lexeme::Use => {
                self.advance();
                let tree = self.parse_use_tree()?;
                self.expect(&Lexeme::Semicolon)?;
                Item::Use(tree)
            }
            other => {
                return Err(self.error_with_help(
                    &format!("expected item, found {}", other.description()),
                    "only `mod`, `use`, `const` and `fn` items are supported",
                ))
            }
        };

        let span = start.merge(self.prev_span());
        Ok(Spanned::new(item, span))
    }

    fn parse_visibility(&mut self) -> PResult<Visibility> {
        if !self.eat(&Lexeme::Pub) {
            return Ok(Visibility::Private);
        }
        if !self.at(&Lexeme::LParen) {
            return Ok(Visibility::Public);
        }
        self.advance();
        let scope = match self.peek() {
            Lexeme::Crate => "crate".to_string(),
            Lexeme::SelfValue => "self".to_string(),
            Lexeme::Super => "super".to_string(),
            other => {
                return Err(self.error_here(&format!(
                    "expected `crate`, `self` or `super`, found {}",
                    other.description()
                )))
            }
        };
        self.advance();
        self.expect(&Lexeme::RParen)?;
        Ok(Visibility::Restricted(scope))
    }

    fn parse_fn(&mut self, vis: Visibility, attrs: Vec<Spanned<Attribute>>) -> PResult<FnDef> {
        self.expect(&Lexeme::Fn)?;
        let name = self.expect_ident()?;
        self.expect(&Lexeme::LParen)?;
        let mut params = Vec::new();
        while !self.at(&Lexeme::RParen) {
            let mutable = self.eat(&Lexeme::Mut);
            let name = if self.at(&Lexeme::Underscore) {
                let span = self.advance().span;
                Spanned::new("_".to_string(), span)
            } else {
                self.expect_ident()?
            };
            self.expect(&Lexeme::Colon)?;
            let ty = self.parse_type()?;
            params.push(Param { mutable, name, ty });
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        self.expect(&Lexeme::RParen)?;
        let ret = if self.eat(&Lexeme::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(FnDef {
            vis,
            attrs,
            name,
            params,
            ret,
            body,
        })
    }

    fn parse_const(
        &mut self,
        vis: Visibility,
        attrs: Vec<Spanned<Attribute>>,
    ) -> PResult<ConstDef> {
        self.expect(&Lexeme::Const)?;
        let name = self.expect_ident()?;
        self.expect(&Lexeme::Colon)?;
        let ty = self.parse_type()?;
        self.expect(&Lexeme::Eq)?;
        let value = self.parse_expr()?;
        self.expect(&Lexeme::Semicolon)?;
        Ok(ConstDef {
            vis,
            attrs,
            name,
            ty,
            value,
        })
    }

    fn parse_mod(&mut self, vis: Visibility, attrs: Vec<Spanned<Attribute>>) -> PResult<ModDef> {
        self.expect(&Lexeme::Mod)?;
        let name = self.expect_ident()?;
        if self.eat(&Lexeme::Semicolon) {
            return Ok(ModDef {
                vis,
                attrs,
                name,
                items: None,
            });
        }

        self.expect(&Lexeme::LBrace)?;
        let mut attrs = attrs;
        attrs.extend(self.parse_inner_attributes()?);
        let mut items = Vec::new();
        while !self.at(&Lexeme::RBrace) {
            if self.at(&Lexeme::Eof) {
                return Err(self.error_here(&format!(
                    "expected '}}' to close module `{}`, found end of file",
                    name.node
                )));
            }
            items.push(self.parse_item()?);
        }
        self.expect(&Lexeme::RBrace)?;
        Ok(ModDef {
            vis,
            attrs,
            name,
            items: Some(items),
        })
    }

    fn parse_use_tree(&mut self) -> PResult<UseTree> {
        if self.eat(&Lexeme::Star) {
            return Ok(UseTree::Glob);
        }
        if self.eat(&Lexeme::LBrace) {
            let mut trees = Vec::new();
            while !self.at(&Lexeme::RBrace) {
                trees.push(self.parse_use_tree()?);
                if !self.eat(&Lexeme::Comma) {
                    break;
                }
            }
            self.expect(&Lexeme::RBrace)?;
            return Ok(UseTree::Group(trees));
        }

        let segment = self.path_segment()?;
        if self.eat(&Lexeme::PathSep) {
            let rest = self.parse_use_tree()?;
            Ok(UseTree::Path {
                segment,
                rest: Box::new(rest),
            })
        } else {
            Ok(UseTree::Name(segment))
        }
    }

    pub(super) fn parse_inner_attributes(&mut self) -> PResult<Vec<Spanned<Attribute>>> {
        let mut attrs = Vec::new();
        while self.at(&Lexeme::Hash) && matches!(self.peek_nth(1), Lexeme::Bang) {
            attrs.push(self.parse_attribute()?);
        }
        Ok(attrs)
    }

    fn parse_outer_attributes(&mut self) -> PResult<Vec<Spanned<Attribute>>> {
        let mut attrs = Vec::new();
        while self.at(&Lexeme::Hash) {
            if matches!(self.peek_nth(1), Lexeme::Bang) {
                return Err(self.error_with_help(
                    "inner attribute is not permitted here",
                    "inner attributes (`#![...]`) must come before any item",
                ));
            }
            attrs.push(self.parse_attribute()?);
        }
        Ok(attrs)
    }

    /// `#[path(tokens...)]` / `#![path = value]`; the tokens after the path
    /// only need to be balanced.
    fn parse_attribute(&mut self) -> PResult<Spanned<Attribute>> {
        let start = self.expect(&Lexeme::Hash)?;
        let inner = self.eat(&Lexeme::Bang);
        self.expect(&Lexeme::LBracket)?;
        let path = self.parse_path()?;

        let mut depth = 0usize;
        loop {
            match self.peek() {
                Lexeme::Eof => {
                    return Err(self.error_here("unterminated attribute, expected ']'"));
                }
                Lexeme::LParen | Lexeme::LBracket | Lexeme::LBrace => depth += 1,
                Lexeme::RParen | Lexeme::RBrace => {
                    if depth == 0 {
                        return Err(self.error_here(&format!(
                            "unbalanced {} in attribute",
                            self.peek().description()
                        )));
                    }
                    depth -= 1;
                }
                Lexeme::RBracket => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
        self.expect(&Lexeme::RBracket)?;

        let span = start.merge(self.prev_span());
        Ok(Spanned::new(Attribute { inner, path }, span))
    }
}
