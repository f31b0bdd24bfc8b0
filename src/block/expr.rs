//! Typed expression model for size block formulas and its text renderers.
//!
//! Formulas are built as small trees and only turned into text at the very end,
//! so the set of attributes and parameters a fragment touches can be read off
//! the tree instead of scanning the text.

use std::collections::BTreeSet;

use serde::Serialize;

use super::types::{Attribute, Component, ParamName};

/// Name of the per-invocation shared random scalar.
pub const SHARED_RANDOM: &str = "random";

/// Shading language the fragment is rendered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ShaderTarget {
    /// HLSL-flavoured block source: `lerp`, `RAND` macro.
    #[default]
    Hlsl,
    /// WGSL: `mix`, `rand(&Seed)` helper. Used for validation with naga.
    Wgsl,
}

/// Reference to a block input, optionally swizzled to one lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamRef {
    pub name: ParamName,
    pub lane: Option<Component>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RandomSource {
    /// The scalar materialized once per invocation.
    Shared,
    /// A fresh draw from the seed at the point of use.
    Draw,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Param(ParamRef),
    Attr(Attribute),
    Random(RandomSource),
    Lerp(Box<Expr>, Box<Expr>, Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn param(name: ParamName, lane: Option<Component>) -> Self {
        Expr::Param(ParamRef { name, lane })
    }

    pub fn lerp(a: Expr, b: Expr, t: Expr) -> Self {
        Expr::Lerp(Box::new(a), Box::new(b), Box::new(t))
    }

    pub fn add(a: Expr, b: Expr) -> Self {
        Expr::Add(Box::new(a), Box::new(b))
    }

    pub fn mul(a: Expr, b: Expr) -> Self {
        Expr::Mul(Box::new(a), Box::new(b))
    }

    fn is_binary(&self) -> bool {
        matches!(self, Expr::Add(..) | Expr::Mul(..))
    }

    /// Attributes read by the expression. An inline random draw reads the seed.
    pub fn collect_attributes(&self, out: &mut BTreeSet<Attribute>) {
        match self {
            Expr::Param(_) | Expr::Random(RandomSource::Shared) => {}
            Expr::Attr(a) => {
                out.insert(*a);
            }
            Expr::Random(RandomSource::Draw) => {
                out.insert(Attribute::Seed);
            }
            Expr::Lerp(a, b, t) => {
                a.collect_attributes(out);
                b.collect_attributes(out);
                t.collect_attributes(out);
            }
            Expr::Add(a, b) | Expr::Mul(a, b) => {
                a.collect_attributes(out);
                b.collect_attributes(out);
            }
        }
    }

    pub fn collect_params(&self, out: &mut BTreeSet<ParamRef>) {
        match self {
            Expr::Param(p) => {
                out.insert(*p);
            }
            Expr::Attr(_) | Expr::Random(_) => {}
            Expr::Lerp(a, b, t) => {
                a.collect_params(out);
                b.collect_params(out);
                t.collect_params(out);
            }
            Expr::Add(a, b) | Expr::Mul(a, b) => {
                a.collect_params(out);
                b.collect_params(out);
            }
        }
    }

    pub fn uses_shared_random(&self) -> bool {
        match self {
            Expr::Random(RandomSource::Shared) => true,
            Expr::Param(_) | Expr::Attr(_) | Expr::Random(RandomSource::Draw) => false,
            Expr::Lerp(a, b, t) => {
                a.uses_shared_random() || b.uses_shared_random() || t.uses_shared_random()
            }
            Expr::Add(a, b) | Expr::Mul(a, b) => a.uses_shared_random() || b.uses_shared_random(),
        }
    }

    /// Whether the expression draws a fresh random value from the seed.
    pub fn draws_inline(&self) -> bool {
        match self {
            Expr::Random(RandomSource::Draw) => true,
            Expr::Param(_) | Expr::Attr(_) | Expr::Random(RandomSource::Shared) => false,
            Expr::Lerp(a, b, t) => a.draws_inline() || b.draws_inline() || t.draws_inline(),
            Expr::Add(a, b) | Expr::Mul(a, b) => a.draws_inline() || b.draws_inline(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Materialize the shared random scalar from the seed.
    SharedRandom,
    Assign { target: Attribute, value: Expr },
}

impl Stmt {
    /// Every attribute the statement reads or writes.
    pub fn attributes(&self) -> BTreeSet<Attribute> {
        let mut out = BTreeSet::new();
        match self {
            Stmt::SharedRandom => {
                out.insert(Attribute::Seed);
            }
            Stmt::Assign { target, value } => {
                out.insert(*target);
                value.collect_attributes(&mut out);
            }
        }
        out
    }

    pub fn params(&self) -> BTreeSet<ParamRef> {
        let mut out = BTreeSet::new();
        if let Stmt::Assign { value, .. } = self {
            value.collect_params(&mut out);
        }
        out
    }
}

impl ShaderTarget {
    pub fn render_expr(self, expr: &Expr) -> String {
        match expr {
            Expr::Param(p) => match p.lane {
                Some(lane) => format!("{}{}", p.name, lane.suffix()),
                None => p.name.to_string(),
            },
            Expr::Attr(a) => a.name().to_string(),
            Expr::Random(RandomSource::Shared) => SHARED_RANDOM.to_string(),
            Expr::Random(RandomSource::Draw) => self.random_draw().to_string(),
            Expr::Lerp(a, b, t) => format!(
                "{}({},{},{})",
                self.lerp_fn(),
                self.render_expr(a),
                self.render_expr(b),
                self.render_expr(t)
            ),
            Expr::Add(a, b) => format!("{} + {}", self.render_operand(a), self.render_operand(b)),
            Expr::Mul(a, b) => format!("{} * {}", self.render_operand(a), self.render_operand(b)),
        }
    }

    fn render_operand(self, expr: &Expr) -> String {
        if expr.is_binary() {
            format!("({})", self.render_expr(expr))
        } else {
            self.render_expr(expr)
        }
    }

    pub fn render_stmt(self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::SharedRandom => match self {
                ShaderTarget::Hlsl => format!("float {SHARED_RANDOM} = {};", self.random_draw()),
                ShaderTarget::Wgsl => format!("let {SHARED_RANDOM} = {};", self.random_draw()),
            },
            Stmt::Assign { target, value } => {
                format!("{} = {};", target.name(), self.render_expr(value))
            }
        }
    }

    fn lerp_fn(self) -> &'static str {
        match self {
            ShaderTarget::Hlsl => "lerp",
            ShaderTarget::Wgsl => "mix",
        }
    }

    /// Text of one random draw in [0,1) that advances the seed.
    pub fn random_draw(self) -> &'static str {
        match self {
            ShaderTarget::Hlsl => "RAND",
            ShaderTarget::Wgsl => "rand(&Seed)",
        }
    }
}
