use derivative::Derivative;
use serde_derive::{Deserialize, Serialize};

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_printer::util::ParensExt;
use modulo_lang_printer::{Alloc, Builder, DocAllocator, Precedence, Print, PrintCfg};

use crate::traits::*;
use crate::HashSet;

use super::{Exp, Idx};

/// A left-leaning application node: `App(App(f, a), b)` is the spine
/// `f a b`. The spine shape is what the reducer and the matcher
/// recover with [Exp::unapp].
#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct App {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub fun: Box<Exp>,
    pub arg: Box<Exp>,
}

impl From<App> for Exp {
    fn from(e: App) -> Exp {
        Exp::App(e)
    }
}

impl HasSpan for App {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for App {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.fun.shift_in_range(range, by);
        self.arg.shift_in_range(range, by);
    }
}

impl Occurs for App {
    fn occurs(&self, idx: usize) -> bool {
        self.fun.occurs(idx) || self.arg.occurs(idx)
    }
}

impl FreeVars for App {
    fn free_vars_into(&self, depth: usize, acc: &mut HashSet<Idx>) {
        self.fun.free_vars_into(depth, acc);
        self.arg.free_vars_into(depth, acc);
    }
}

impl Substitutable for App {
    type Target = App;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> App {
        let App { span, fun, arg } = self;
        App { span: *span, fun: fun.subst(depth, by), arg: arg.subst(depth, by) }
    }
}

impl Print for App {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let App { fun, arg, .. } = self;
        fun.print_prec(cfg, alloc, Precedence::App)
            .append(alloc.line())
            .append(arg.print_prec(cfg, alloc, Precedence::Atom))
            .group()
            .nest(cfg.indent)
            .parens_if(prec > Precedence::App)
    }
}
