use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use modulo_lang_ast::*;
use modulo_lang_miette_util::ToMiette;
use modulo_lang_printer::Print;

pub type TcResult<T = ()> = Result<T, TypeError>;

#[derive(Error, Diagnostic, Debug)]
pub enum TypeError {
    #[error("The following terms are not convertible:\n  1: {lhs}\n  2: {rhs}\n")]
    #[diagnostic(code("T-001"))]
    NotConvertible {
        lhs: String,
        rhs: String,
        #[label("Source of (1)")]
        lhs_span: Option<SourceSpan>,
        #[label("Source of (2)")]
        rhs_span: Option<SourceSpan>,
    },
    #[error("Cannot apply a term of type {typ}, which is not a function type")]
    #[diagnostic(code("T-002"))]
    NotAFunction {
        typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Got {got} of type {typ}, which is neither Type nor Kind")]
    #[diagnostic(code("T-003"))]
    NotASort {
        got: String,
        typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Kind does not have a type")]
    #[diagnostic(code("T-004"))]
    KindHasNoType {
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Cannot infer the type of an unannotated abstraction")]
    #[diagnostic(code("T-005"), help("Annotate the bound variable: \\x : T => ..."))]
    CannotInferLambda {
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Expected a term of a product type, got {got}")]
    #[diagnostic(code("T-006"))]
    ExpectedProduct {
        got: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Pattern hole outside of a rewrite rule")]
    #[diagnostic(code("T-007"))]
    HoleOutsideRule {
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Evaluation exceeded the configured step budget")]
    #[diagnostic(code("T-008"))]
    BudgetExhausted {},
    #[error("An unexpected internal error occurred: {message}")]
    #[diagnostic(code("T-XXX"))]
    /// This error should not occur.
    /// Some internal invariant has been violated.
    Impossible {
        message: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup(#[from] LookupError),
}

impl TypeError {
    pub fn not_eq(lhs: &Exp, rhs: &Exp) -> Self {
        Self::NotConvertible {
            lhs: lhs.print_to_string(None),
            rhs: rhs.print_to_string(None),
            lhs_span: lhs.span().to_miette(),
            rhs_span: rhs.span().to_miette(),
        }
    }

    pub fn not_a_function(typ: &Exp, at: &Exp) -> Self {
        Self::NotAFunction { typ: typ.print_to_string(None), span: at.span().to_miette() }
    }

    pub fn not_a_sort(got: &Exp, typ: &Exp) -> Self {
        Self::NotASort {
            got: got.print_to_string(None),
            typ: typ.print_to_string(None),
            span: got.span().to_miette(),
        }
    }

    pub fn expected_product(got: &Exp) -> Self {
        Self::ExpectedProduct { got: got.print_to_string(None), span: got.span().to_miette() }
    }

    pub fn impossible(message: &str) -> Self {
        Self::Impossible { message: message.to_owned(), span: None }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum RuleError {
    #[error("{exp} is not a valid rewrite pattern")]
    #[diagnostic(code("R-001"))]
    PatternShape {
        exp: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("The arguments of a pattern hole must be distinct bound variables")]
    #[diagnostic(code("R-002"))]
    MillerCondition {
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Hole ${hole} does not occur in the left-hand side")]
    #[diagnostic(code("R-003"))]
    MissingHole {
        hole: usize,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("The left-hand side applies {name} to more arguments than its type admits")]
    #[diagnostic(code("R-004"))]
    LhsOverApplied {
        name: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Hole ${hole} is used at incompatible types:\n  1: {expected}\n  2: {found}\n")]
    #[diagnostic(code("R-005"))]
    HoleTypeMismatch {
        hole: usize,
        expected: String,
        found: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("The type of hole ${hole} depends on bound variables which are not arguments of the hole")]
    #[diagnostic(code("R-006"))]
    HoleEscape {
        hole: usize,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Left- and right-hand side have incompatible types:\n  left:  {lhs_typ}\n  right: {rhs_typ}\n")]
    #[diagnostic(code("R-007"))]
    TypesNotConvertible {
        lhs_typ: String,
        rhs_typ: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lookup(#[from] LookupError),
}

impl RuleError {
    pub fn pattern_shape(exp: &Exp) -> Self {
        Self::PatternShape { exp: exp.print_to_string(None), span: exp.span().to_miette() }
    }

    pub fn types_not_convertible(rule: &Rule, lhs_typ: &Exp, rhs_typ: &Exp) -> Self {
        Self::TypesNotConvertible {
            lhs_typ: lhs_typ.print_to_string(None),
            rhs_typ: rhs_typ.print_to_string(None),
            span: rule.span.to_miette(),
        }
    }
}
