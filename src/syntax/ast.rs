//! Syntax tree for the Rust subset produced by the code generator.

use crate::span::Spanned;

#[derive(Clone, Debug)]
pub struct File {
    pub attrs: Vec<Spanned<Attribute>>,
    pub items: Vec<Spanned<Item>>,
}

/// `#[path ...]` or `#![path ...]`; arguments are checked for balance only.
#[derive(Clone, Debug)]
pub struct Attribute {
    pub inner: bool,
    pub path: Path,
}

#[derive(Clone, Debug)]
pub enum Item {
    Mod(ModDef),
    Fn(FnDef),
    Const(ConstDef),
    Use(UseTree),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Public,
    /// `pub(crate)`, `pub(super)`, ...
    Restricted(String),
}

#[derive(Clone, Debug)]
pub struct ModDef {
    pub vis: Visibility,
    pub attrs: Vec<Spanned<Attribute>>,
    pub name: Spanned<String>,
    /// `None` for an out-of-line `mod name;`.
    pub items: Option<Vec<Spanned<Item>>>,
}

#[derive(Clone, Debug)]
pub struct FnDef {
    pub vis: Visibility,
    pub attrs: Vec<Spanned<Attribute>>,
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    pub ret: Option<Spanned<Type>>,
    pub body: Spanned<Block>,
}

#[derive(Clone, Debug)]
pub struct Param {
    pub mutable: bool,
    pub name: Spanned<String>,
    pub ty: Spanned<Type>,
}

#[derive(Clone, Debug)]
pub struct ConstDef {
    pub vis: Visibility,
    pub attrs: Vec<Spanned<Attribute>>,
    pub name: Spanned<String>,
    pub ty: Spanned<Type>,
    pub value: Spanned<Expr>,
}

#[derive(Clone, Debug)]
pub enum UseTree {
    Path { segment: String, rest: Box<UseTree> },
    Name(String),
    Glob,
    Group(Vec<UseTree>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path(pub Vec<String>);

impl Path {
    pub fn as_single(&self) -> Option<&str> {
        match self.0.as_slice() {
            [name] => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }
}

#[derive(Clone, Debug)]
pub enum Type {
    Path { path: Path, args: Vec<Type> },
    Ref { mutable: bool, inner: Box<Type> },
    Slice(Box<Type>),
    Array { elem: Box<Type>, len: Box<Spanned<Expr>> },
    Tuple(Vec<Type>),
    Infer,
}

#[derive(Clone, Debug)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
    pub tail: Option<Box<Spanned<Expr>>>,
}

#[derive(Clone, Debug)]
pub enum Stmt {
    Let {
        mutable: bool,
        name: Spanned<String>,
        ty: Option<Spanned<Type>>,
        init: Option<Spanned<Expr>>,
    },
    /// An expression statement; `semi` is false for block-like expressions.
    Expr { expr: Spanned<Expr>, semi: bool },
    Item(Item),
}

#[derive(Clone, Debug)]
pub enum Expr {
    Literal(Literal),
    Path(Path),
    Unary {
        op: UnOp,
        expr: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    /// `place = value` when `op` is `None`, `place op= value` otherwise.
    Assign {
        op: Option<BinOp>,
        place: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Cast {
        expr: Box<Spanned<Expr>>,
        ty: Spanned<Type>,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    MethodCall {
        receiver: Box<Spanned<Expr>>,
        method: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    Field {
        expr: Box<Spanned<Expr>>,
        name: Spanned<String>,
    },
    Index {
        expr: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Try(Box<Spanned<Expr>>),
    Array(Vec<Spanned<Expr>>),
    ArrayRepeat {
        value: Box<Spanned<Expr>>,
        len: Box<Spanned<Expr>>,
    },
    Tuple(Vec<Spanned<Expr>>),
    Paren(Box<Spanned<Expr>>),
    Block(Block),
    If {
        cond: Box<Spanned<Expr>>,
        then_block: Spanned<Block>,
        /// Either another `If` or a `Block`.
        else_branch: Option<Box<Spanned<Expr>>>,
    },
    Closure {
        params: Vec<Spanned<String>>,
        body: Box<Spanned<Expr>>,
    },
    Return(Option<Box<Spanned<Expr>>>),
}

impl Expr {
    /// Block-like expressions end a statement without a semicolon.
    pub fn is_block_like(&self) -> bool {
        matches!(self, Expr::Block(_) | Expr::If { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer { value: u128, suffix: Option<String> },
    Float { value: f64, suffix: Option<String> },
    Bool(bool),
    Str(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
    Deref,
    Ref { mutable: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    /// (left, right) binding power; higher binds tighter.
    pub fn binding_power(self) -> (u8, u8) {
        match self {
            BinOp::Or => (2, 3),
            BinOp::And => (4, 5),
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => (6, 7),
            BinOp::Add | BinOp::Sub => (8, 9),
            BinOp::Mul | BinOp::Div | BinOp::Rem => (10, 11),
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }
}

/// Binding power of the `as` cast, above every binary operator.
pub const CAST_BINDING_POWER: u8 = 12;
