use derivative::Derivative;
use serde_derive::{Deserialize, Serialize};

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_printer::theme::ThemeExt;
use modulo_lang_printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::VarBound;
use crate::traits::*;
use crate::HashSet;

use super::{Exp, Idx};

/// A pattern hole: the `idx`-th metavariable of a rewrite rule. Only
/// valid inside the left- and right-hand sides of rules; the matcher
/// binds it, the admissibility check types it. The `name` is the
/// surface spelling (e.g. `$n`) and is a printing hint only.
#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Meta {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub idx: usize,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: Option<VarBound>,
}

impl From<Meta> for Exp {
    fn from(e: Meta) -> Exp {
        Exp::Meta(e)
    }
}

impl HasSpan for Meta {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Meta {
    fn shift_in_range<R: ShiftRange>(&mut self, _range: &R, _by: isize) {}
}

impl Occurs for Meta {
    fn occurs(&self, _idx: usize) -> bool {
        false
    }
}

impl FreeVars for Meta {
    fn free_vars_into(&self, _depth: usize, _acc: &mut HashSet<Idx>) {}
}

impl Substitutable for Meta {
    type Target = Exp;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> Exp {
        match by.get_meta(self.idx) {
            Some(mut exp) => {
                exp.shift(depth as isize);
                exp
            }
            None => Exp::Meta(self.clone()),
        }
    }
}

impl Print for Meta {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        match &self.name {
            Some(name) => alloc.hole(&format!("${name}")),
            None => alloc.hole(&format!("${}", self.idx)),
        }
    }
}
