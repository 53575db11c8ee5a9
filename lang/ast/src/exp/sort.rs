use std::fmt;

use derivative::Derivative;
use serde_derive::{Deserialize, Serialize};

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_printer::theme::ThemeExt;
use modulo_lang_printer::tokens::{KIND, TYPE};
use modulo_lang_printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::traits::*;
use crate::HashSet;

use super::{Exp, Idx};

/// The two universes of the λΠ-calculus. `Type` classifies ordinary
/// types, `Kind` classifies `Type` and type-level functions. `Kind`
/// itself has no type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Univ {
    Type,
    Kind,
}

impl fmt::Display for Univ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Univ::Type => write!(f, "{TYPE}"),
            Univ::Kind => write!(f, "{KIND}"),
        }
    }
}

#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Sort {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub univ: Univ,
}

impl From<Sort> for Exp {
    fn from(e: Sort) -> Exp {
        Exp::Sort(e)
    }
}

impl HasSpan for Sort {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Sort {
    fn shift_in_range<R: ShiftRange>(&mut self, _range: &R, _by: isize) {}
}

impl Occurs for Sort {
    fn occurs(&self, _idx: usize) -> bool {
        false
    }
}

impl FreeVars for Sort {
    fn free_vars_into(&self, _depth: usize, _acc: &mut HashSet<Idx>) {}
}

impl Substitutable for Sort {
    type Target = Sort;

    fn subst<S: Substitution>(&self, _depth: usize, _by: &S) -> Sort {
        self.clone()
    }
}

impl Print for Sort {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        match self.univ {
            Univ::Type => alloc.typ(TYPE),
            Univ::Kind => alloc.typ(KIND),
        }
    }
}
