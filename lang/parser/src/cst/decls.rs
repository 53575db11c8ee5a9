use modulo_lang_miette_util::codespan::Span;

use super::exp::{Exp, Ident};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Static,
    Definable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Whnf,
    Snf,
}

/// The property tested by an `assert` or `check` statement.
#[derive(Debug, Clone)]
pub enum Prop {
    Conv { lhs: Exp, rhs: Exp },
    HasType { exp: Exp, typ: Exp },
}

/// One statement of a source module.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `require m.`
    Require { span: Span, module: Ident },
    /// `static x : A.` / `def x : A.`
    Declare { span: Span, kind: DeclKind, name: Ident, typ: Exp },
    /// `rule l --> r.`
    Rule { span: Span, lhs: Exp, rhs: Exp },
    /// `infer t.`
    Infer { span: Span, exp: Exp },
    /// `eval [whnf|snf] [budget] t.`
    Eval { span: Span, strategy: Option<Strategy>, budget: Option<usize>, exp: Exp },
    /// `assert <prop>.` (fatal) / `check <prop>.` (warns on failure)
    Assert { span: Span, prop: Prop, fatal: bool },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Require { span, .. } => *span,
            Stmt::Declare { span, .. } => *span,
            Stmt::Rule { span, .. } => *span,
            Stmt::Infer { span, .. } => *span,
            Stmt::Eval { span, .. } => *span,
            Stmt::Assert { span, .. } => *span,
        }
    }
}
