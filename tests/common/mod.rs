//! Test-only evaluator for generated scoring modules.
//!
//! Parses generated source with the crate's own syntax check and walks the
//! syntax tree directly, so tests exercise the emitted code rather than a
//! second implementation of the routing rules. Arithmetic is done in `f64`;
//! literals with an `f32` suffix are rounded to single precision first.

#![allow(dead_code)]

use std::collections::HashMap;

use boostc::span::Spanned;
use boostc::syntax::ast::*;
use boostc::syntax::parse_source;

#[derive(Clone, Debug)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i128),
    Float(f64),
    Opt(Option<Box<Value>>),
    Array(Vec<Value>),
    Closure {
        params: Vec<String>,
        body: Box<Spanned<Expr>>,
        captured: HashMap<String, Value>,
    },
    Function(String),
}

impl Value {
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Float(v) => *v,
            Value::Int(v) => *v as f64,
            other => panic!("expected a number, found {:?}", other),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            other => panic!("expected a bool, found {:?}", other),
        }
    }

    pub fn as_vec(&self) -> Vec<f64> {
        match self {
            Value::Array(items) => items.iter().map(Value::as_f64).collect(),
            other => panic!("expected an array, found {:?}", other),
        }
    }
}

/// Feature vector for `missing = nan` modules; `None` becomes NaN.
pub fn nan_features(values: &[Option<f64>]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|v| Value::Float(v.unwrap_or(f64::NAN)))
            .collect(),
    )
}

/// Feature vector for `missing = option` modules.
pub fn option_features(values: &[Option<f64>]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|v| Value::Opt(v.map(|x| Box::new(Value::Float(x)))))
            .collect(),
    )
}

enum Flow {
    Return(Value),
}

type Eval = Result<Value, Flow>;

/// The items of the single top-level module in a generated file.
pub struct Module {
    pub name: String,
    fns: HashMap<String, FnDef>,
    consts: HashMap<String, Spanned<Expr>>,
}

impl Module {
    pub fn parse(source: &str) -> Module {
        let file = match parse_source(source) {
            Ok(file) => file,
            Err(diags) => panic!("generated source does not parse: {:?}", diags),
        };
        let module = file
            .items
            .into_iter()
            .find_map(|item| match item.node {
                Item::Mod(m) => Some(m),
                _ => None,
            })
            .expect("generated source has no module");

        let mut fns = HashMap::new();
        let mut consts = HashMap::new();
        for item in module.items.unwrap_or_default() {
            match item.node {
                Item::Fn(f) => {
                    fns.insert(f.name.node.clone(), f);
                }
                Item::Const(c) => {
                    consts.insert(c.name.node.clone(), c.value);
                }
                _ => {}
            }
        }
        Module {
            name: module.name.node,
            fns,
            consts,
        }
    }

    pub fn has_fn(&self, name: &str) -> bool {
        self.fns.contains_key(name)
    }

    pub fn fn_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fns.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn constant(&self, name: &str) -> Value {
        let expr = self
            .consts
            .get(name)
            .unwrap_or_else(|| panic!("no constant `{}`", name));
        match self.eval(expr, &mut Frame::default()) {
            Ok(value) | Err(Flow::Return(value)) => value,
        }
    }

    pub fn call(&self, name: &str, args: Vec<Value>) -> Value {
        let func = self
            .fns
            .get(name)
            .unwrap_or_else(|| panic!("no function `{}`", name));
        assert_eq!(func.params.len(), args.len(), "arity of `{}`", name);
        let mut frame = Frame::default();
        for (param, arg) in func.params.iter().zip(args) {
            frame.define(&param.name.node, arg);
        }
        match self.eval_block(&func.body.node, &mut frame) {
            Ok(value) | Err(Flow::Return(value)) => value,
        }
    }

    fn eval_block(&self, block: &Block, frame: &mut Frame) -> Eval {
        frame.push();
        let result = self.eval_block_inner(block, frame);
        frame.pop();
        result
    }

    fn eval_block_inner(&self, block: &Block, frame: &mut Frame) -> Eval {
        for stmt in &block.stmts {
            match &stmt.node {
                Stmt::Let { name, init, .. } => {
                    let value = match init {
                        Some(expr) => self.eval(expr, frame)?,
                        None => Value::Unit,
                    };
                    frame.define(&name.node, value);
                }
                Stmt::Expr { expr, .. } => {
                    self.eval(expr, frame)?;
                }
                Stmt::Item(_) => {}
            }
        }
        match &block.tail {
            Some(expr) => self.eval(expr, frame),
            None => Ok(Value::Unit),
        }
    }

    fn eval(&self, expr: &Spanned<Expr>, frame: &mut Frame) -> Eval {
        match &expr.node {
            Expr::Literal(lit) => Ok(literal(lit)),
            Expr::Path(path) => Ok(self.path(path, frame)),
            Expr::Paren(inner) => self.eval(inner, frame),
            Expr::Block(block) => self.eval_block(block, frame),
            Expr::Unary { op, expr } => {
                let value = self.eval(expr, frame)?;
                Ok(match (op, value) {
                    (UnOp::Neg, Value::Float(v)) => Value::Float(-v),
                    (UnOp::Neg, Value::Int(v)) => Value::Int(-v),
                    (UnOp::Not, Value::Bool(b)) => Value::Bool(!b),
                    (UnOp::Deref, v) | (UnOp::Ref { .. }, v) => v,
                    (op, v) => panic!("cannot apply {:?} to {:?}", op, v),
                })
            }
            Expr::Binary { op, lhs, rhs } => match op {
                BinOp::And => {
                    if !self.eval(lhs, frame)?.as_bool() {
                        return Ok(Value::Bool(false));
                    }
                    Ok(Value::Bool(self.eval(rhs, frame)?.as_bool()))
                }
                BinOp::Or => {
                    if self.eval(lhs, frame)?.as_bool() {
                        return Ok(Value::Bool(true));
                    }
                    Ok(Value::Bool(self.eval(rhs, frame)?.as_bool()))
                }
                _ => {
                    let l = self.eval(lhs, frame)?;
                    let r = self.eval(rhs, frame)?;
                    Ok(binary(*op, &l, &r))
                }
            },
            Expr::Assign { op, place, value } => {
                let value = self.eval(value, frame)?;
                let (name, index) = match &place.node {
                    Expr::Path(path) => (single_name(path), None),
                    Expr::Index { expr, index } => match &expr.node {
                        Expr::Path(path) => {
                            let i = self.eval(index, frame)?.as_f64() as usize;
                            (single_name(path), Some(i))
                        }
                        other => panic!("unsupported assignment target {:?}", other),
                    },
                    other => panic!("unsupported assignment target {:?}", other),
                };
                let slot = frame.lookup_mut(name);
                let target = match index {
                    None => slot,
                    Some(i) => match slot {
                        Value::Array(items) => &mut items[i],
                        other => panic!("cannot index {:?}", other),
                    },
                };
                *target = match op {
                    None => value,
                    Some(op) => binary(*op, target, &value),
                };
                Ok(Value::Unit)
            }
            Expr::Cast { expr, ty } => {
                let value = self.eval(expr, frame)?;
                let target = match &ty.node {
                    Type::Path { path, .. } => path.last().to_string(),
                    other => panic!("unsupported cast to {:?}", other),
                };
                Ok(match target.as_str() {
                    "f32" => Value::Float(value.as_f64() as f32 as f64),
                    "f64" => Value::Float(value.as_f64()),
                    _ => Value::Int(value.as_f64() as i128),
                })
            }
            Expr::Call { callee, args } => {
                let callee = self.eval(callee, frame)?;
                let args = args
                    .iter()
                    .map(|a| self.eval(a, frame))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.apply(&callee, args))
            }
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.eval(receiver, frame)?;
                let args = args
                    .iter()
                    .map(|a| self.eval(a, frame))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.method(receiver, &method.node, args))
            }
            Expr::Index { expr, index } => {
                let target = self.eval(expr, frame)?;
                let i = self.eval(index, frame)?.as_f64() as usize;
                match target {
                    Value::Array(items) => Ok(items[i].clone()),
                    other => panic!("cannot index {:?}", other),
                }
            }
            Expr::Array(items) => Ok(Value::Array(
                items
                    .iter()
                    .map(|item| self.eval(item, frame))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Expr::ArrayRepeat { value, len } => {
                let value = self.eval(value, frame)?;
                let len = self.eval(len, frame)?.as_f64() as usize;
                Ok(Value::Array(vec![value; len]))
            }
            Expr::Tuple(items) if items.is_empty() => Ok(Value::Unit),
            Expr::If {
                cond,
                then_block,
                else_branch,
            } => {
                if self.eval(cond, frame)?.as_bool() {
                    self.eval_block(&then_block.node, frame)
                } else if let Some(branch) = else_branch {
                    self.eval(branch, frame)
                } else {
                    Ok(Value::Unit)
                }
            }
            Expr::Closure { params, body } => Ok(Value::Closure {
                params: params.iter().map(|p| p.node.clone()).collect(),
                body: body.clone(),
                captured: frame.flatten(),
            }),
            Expr::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr, frame)?,
                    None => Value::Unit,
                };
                Err(Flow::Return(value))
            }
            other => panic!("unsupported expression {:?}", other),
        }
    }

    fn path(&self, path: &Path, frame: &Frame) -> Value {
        let segments: Vec<&str> = path.0.iter().map(String::as_str).collect();
        match segments.as_slice() {
            [name] => {
                if let Some(value) = frame.lookup(name) {
                    value.clone()
                } else if self.consts.contains_key(*name) {
                    self.constant(name)
                } else if self.fns.contains_key(*name) {
                    Value::Function(name.to_string())
                } else {
                    panic!("unresolved name `{}`", name)
                }
            }
            [ty, constant] if *ty == "f32" || *ty == "f64" => match *constant {
                "NAN" => Value::Float(f64::NAN),
                "INFINITY" => Value::Float(f64::INFINITY),
                "NEG_INFINITY" => Value::Float(f64::NEG_INFINITY),
                other => panic!("unsupported constant {}::{}", ty, other),
            },
            _ => panic!("unsupported path {:?}", path),
        }
    }

    fn apply(&self, callee: &Value, args: Vec<Value>) -> Value {
        match callee {
            Value::Function(name) => self.call(name, args),
            Value::Closure {
                params,
                body,
                captured,
            } => {
                let mut frame = Frame::default();
                for (name, value) in captured {
                    frame.define(name, value.clone());
                }
                frame.push();
                for (param, arg) in params.iter().zip(args) {
                    frame.define(param, arg);
                }
                match self.eval(body, &mut frame) {
                    Ok(value) | Err(Flow::Return(value)) => value,
                }
            }
            other => panic!("cannot call {:?}", other),
        }
    }

    fn method(&self, receiver: Value, method: &str, mut args: Vec<Value>) -> Value {
        match (method, receiver) {
            ("get", Value::Array(items)) => {
                let i = args[0].as_f64() as usize;
                Value::Opt(items.get(i).cloned().map(Box::new))
            }
            ("len", Value::Array(items)) => Value::Int(items.len() as i128),
            ("copied" | "cloned", v @ Value::Opt(_)) => v,
            ("flatten", Value::Opt(inner)) => match inner {
                Some(boxed) => match *boxed {
                    v @ Value::Opt(_) => v,
                    other => panic!("flatten on non-nested option {:?}", other),
                },
                None => Value::Opt(None),
            },
            ("filter", Value::Opt(inner)) => match inner {
                Some(v) if self.apply(&args[0], vec![(*v).clone()]).as_bool() => Value::Opt(Some(v)),
                _ => Value::Opt(None),
            },
            ("map", Value::Opt(inner)) => {
                Value::Opt(inner.map(|v| Box::new(self.apply(&args[0], vec![*v]))))
            }
            ("map_or", Value::Opt(inner)) => {
                let f = args.pop().expect("map_or closure");
                let default = args.pop().expect("map_or default");
                match inner {
                    Some(v) => self.apply(&f, vec![*v]),
                    None => default,
                }
            }
            ("unwrap_or", Value::Opt(inner)) => match inner {
                Some(v) => *v,
                None => args.pop().expect("unwrap_or default"),
            },
            ("is_some", Value::Opt(inner)) => Value::Bool(inner.is_some()),
            ("is_none", Value::Opt(inner)) => Value::Bool(inner.is_none()),
            ("is_nan", Value::Float(v)) => Value::Bool(v.is_nan()),
            (method, receiver) => panic!("unsupported method {} on {:?}", method, receiver),
        }
    }
}

fn single_name(path: &Path) -> &str {
    path.as_single()
        .unwrap_or_else(|| panic!("expected a local name, found {:?}", path))
}

fn literal(lit: &Literal) -> Value {
    match lit {
        Literal::Integer { value, .. } => Value::Int(*value as i128),
        Literal::Float { value, suffix } => match suffix.as_deref() {
            Some("f32") => Value::Float(*value as f32 as f64),
            _ => Value::Float(*value),
        },
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Str(s) => panic!("unexpected string literal {:?}", s),
    }
}

fn binary(op: BinOp, l: &Value, r: &Value) -> Value {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => match op {
            BinOp::Add => Value::Int(a + b),
            BinOp::Sub => Value::Int(a - b),
            BinOp::Mul => Value::Int(a * b),
            BinOp::Div => Value::Int(a / b),
            BinOp::Rem => Value::Int(a % b),
            _ => Value::Bool(compare(op, *a as f64, *b as f64)),
        },
        (Value::Bool(a), Value::Bool(b)) => match op {
            BinOp::Eq => Value::Bool(a == b),
            BinOp::Ne => Value::Bool(a != b),
            _ => panic!("unsupported {:?} on bools", op),
        },
        _ => {
            let (a, b) = (l.as_f64(), r.as_f64());
            match op {
                BinOp::Add => Value::Float(a + b),
                BinOp::Sub => Value::Float(a - b),
                BinOp::Mul => Value::Float(a * b),
                BinOp::Div => Value::Float(a / b),
                BinOp::Rem => Value::Float(a % b),
                _ => Value::Bool(compare(op, a, b)),
            }
        }
    }
}

fn compare(op: BinOp, a: f64, b: f64) -> bool {
    match op {
        BinOp::Eq => a == b,
        BinOp::Ne => a != b,
        BinOp::Lt => a < b,
        BinOp::Le => a <= b,
        BinOp::Gt => a > b,
        BinOp::Ge => a >= b,
        other => panic!("{:?} is not a comparison", other),
    }
}

#[derive(Default)]
struct Frame {
    scopes: Vec<HashMap<String, Value>>,
}

impl Frame {
    fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    fn define(&mut self, name: &str, value: Value) {
        if self.scopes.is_empty() {
            self.push();
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn lookup_mut(&mut self, name: &str) -> &mut Value {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
            .unwrap_or_else(|| panic!("assignment to unknown local `{}`", name))
    }

    fn flatten(&self) -> HashMap<String, Value> {
        let mut all = HashMap::new();
        for scope in &self.scopes {
            for (name, value) in scope {
                all.insert(name.clone(), value.clone());
            }
        }
        all
    }
}
