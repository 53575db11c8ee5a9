use derivative::Derivative;
use serde_derive::{Deserialize, Serialize};

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_printer::theme::ThemeExt;
use modulo_lang_printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::IdBound;
use crate::traits::*;
use crate::HashSet;

use super::{Exp, Idx};

/// A reference to a declared symbol.
#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Sym {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub name: IdBound,
}

impl From<Sym> for Exp {
    fn from(e: Sym) -> Exp {
        Exp::Sym(e)
    }
}

impl HasSpan for Sym {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Sym {
    fn shift_in_range<R: ShiftRange>(&mut self, _range: &R, _by: isize) {}
}

impl Occurs for Sym {
    fn occurs(&self, _idx: usize) -> bool {
        false
    }
}

impl FreeVars for Sym {
    fn free_vars_into(&self, _depth: usize, _acc: &mut HashSet<Idx>) {}
}

impl Substitutable for Sym {
    type Target = Sym;

    fn subst<S: Substitution>(&self, _depth: usize, _by: &S) -> Sym {
        self.clone()
    }
}

impl Print for Sym {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        if cfg.qualified {
            alloc.sym(&self.name.id.to_string())
        } else {
            alloc.sym(&self.name.id.name)
        }
    }
}
