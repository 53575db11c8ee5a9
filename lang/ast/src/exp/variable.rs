use derivative::Derivative;
use pretty::DocAllocator;
use serde_derive::{Deserialize, Serialize};

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::VarBound;
use crate::traits::*;
use crate::HashSet;

use super::{Exp, Idx};

/// A bound variable, in de Bruijn representation. The `name` is a
/// printing hint and carries no meaning; two variables are equal iff
/// their indices are.
#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Variable {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub idx: Idx,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBound,
}

impl From<Variable> for Exp {
    fn from(e: Variable) -> Exp {
        Exp::Variable(e)
    }
}

impl HasSpan for Variable {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Variable {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.idx.shift_in_range(range, by);
    }
}

impl Occurs for Variable {
    fn occurs(&self, idx: usize) -> bool {
        self.idx.0 == idx
    }
}

impl FreeVars for Variable {
    fn free_vars_into(&self, depth: usize, acc: &mut HashSet<Idx>) {
        if self.idx.0 >= depth {
            acc.insert(Idx(self.idx.0 - depth));
        }
    }
}

impl Substitutable for Variable {
    type Target = Exp;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> Exp {
        if self.idx.0 < depth {
            return Exp::Variable(self.clone());
        }
        match by.get_var(self.idx.0 - depth) {
            Some(mut exp) => {
                exp.shift(depth as isize);
                exp
            }
            None => Exp::Variable(self.clone()),
        }
    }
}

impl Print for Variable {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let Variable { idx, name, .. } = self;
        if cfg.de_bruijn {
            alloc.text(format!("{name}@{idx}"))
        } else if name.id.is_empty() {
            alloc.text(format!("@{idx}"))
        } else {
            alloc.text(name.id.as_str())
        }
    }
}
