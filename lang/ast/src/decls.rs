use derivative::Derivative;
use miette::{Diagnostic, SourceSpan};
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_miette_util::ToMiette;

use crate::exp::*;
use crate::ident::*;
use crate::traits::HasSpan;

// Symbols
//
//

/// Whether a symbol can carry rewrite rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// A rigid constructor: fixed type, no rules, matches only itself.
    Static,
    /// A symbol with an ordered, append-only list of rewrite rules.
    Definable,
}

/// A typed constant declared by some module. The type is a closed term
/// whose type is `Type` or `Kind`; the kind never changes after
/// declaration.
#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq)]
pub struct Symbol {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    pub name: IdBind,
    pub module: ModuleName,
    pub typ: Box<Exp>,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn qname(&self) -> QName {
        QName { module: self.module.clone(), name: self.name.id.clone() }
    }
}

impl HasSpan for Symbol {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

// Rules
//
//

/// A rewrite rule `head lhs_args… --> rhs`.
///
/// Invariants, established by the lowering phase and the admissibility
/// check before a rule reaches the signature:
/// - every hole `$k` for `0 ≤ k < arity` occurs at least once in
///   `lhs_args` (holes may repeat; distinct occurrences must match
///   convertible terms),
/// - the holes of `rhs` are a subset of those of the LHS,
/// - each `lhs_args` entry is a pattern in the sense of the matcher.
#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq)]
pub struct Rule {
    #[derivative(PartialEq = "ignore")]
    pub span: Option<Span>,
    /// The definable symbol this rule rewrites.
    pub head: IdBound,
    /// Number of metavariables bound by the rule.
    pub arity: usize,
    pub lhs_args: Vec<Exp>,
    pub rhs: Exp,
}

impl Rule {
    /// Reassemble the full left-hand side as a spine.
    pub fn lhs(&self) -> Exp {
        Exp::app_spine(
            Exp::Sym(Sym { span: None, name: self.head.clone() }),
            self.lhs_args.iter().cloned(),
        )
    }
}

impl HasSpan for Rule {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

// Evaluation configuration
//
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalStrategy {
    #[default]
    Whnf,
    Snf,
}

/// Reduction configuration for the `eval` directive.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalConfig {
    pub strategy: EvalStrategy,
    /// Maximal number of reduction steps; `None` means unbounded.
    pub budget: Option<usize>,
}

// Commands
//
//

/// A directive of a source module, in the order it was written.
#[derive(Debug, Clone)]
pub enum Command {
    /// `require m.`
    Require { span: Option<Span>, module: ModuleName },
    /// `static x : A.` or `def x : A.`
    Declare { span: Option<Span>, name: IdBind, typ: Box<Exp>, kind: SymbolKind },
    /// `rule l --> r.`
    Rule(Rule),
    /// `infer t.`
    Infer { span: Option<Span>, exp: Box<Exp> },
    /// `eval [strategy] [budget] t.`
    Eval { span: Option<Span>, config: EvalConfig, exp: Box<Exp> },
    /// `assert t == u.` / `check t == u.`
    AssertConv { span: Option<Span>, lhs: Box<Exp>, rhs: Box<Exp>, fatal: bool },
    /// `assert t : A.` / `check t : A.`
    AssertType { span: Option<Span>, exp: Box<Exp>, typ: Box<Exp>, fatal: bool },
}

impl HasSpan for Command {
    fn span(&self) -> Option<Span> {
        match self {
            Command::Require { span, .. } => *span,
            Command::Declare { span, .. } => *span,
            Command::Rule(rule) => rule.span,
            Command::Infer { span, .. } => *span,
            Command::Eval { span, .. } => *span,
            Command::AssertConv { span, .. } => *span,
            Command::AssertType { span, .. } => *span,
        }
    }
}

// LookupError
//
//

#[derive(Error, Diagnostic, Debug)]
pub enum LookupError {
    #[error("Undeclared symbol {name}")]
    #[diagnostic(code("S-001"))]
    SymbolNotFound {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Symbol {name} is static and cannot be rewritten")]
    #[diagnostic(code("S-002"))]
    ExpectedDefinable {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Symbol {name} is already declared")]
    #[diagnostic(code("S-003"))]
    AlreadyDeclared {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
}

impl LookupError {
    pub fn symbol_not_found(name: &IdBound) -> Self {
        LookupError::SymbolNotFound { name: name.id.to_string(), span: name.span.to_miette() }
    }

    pub fn expected_definable(name: &IdBound) -> Self {
        LookupError::ExpectedDefinable { name: name.id.to_string(), span: name.span.to_miette() }
    }

    pub fn already_declared(name: &QName, span: &Option<Span>) -> Self {
        LookupError::AlreadyDeclared { name: name.to_string(), span: span.to_miette() }
    }
}
