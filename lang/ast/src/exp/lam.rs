use derivative::Derivative;
use serde_derive::{Deserialize, Serialize};

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_printer::tokens::{BACKSLASH, COLON, FAT_ARROW};
use modulo_lang_printer::util::ParensExt;
use modulo_lang_printer::{Alloc, Builder, DocAllocator, Precedence, Print, PrintCfg};

use crate::ident::VarBind;
use crate::traits::*;
use crate::HashSet;

use super::{Exp, Idx};

/// A λ-abstraction. The domain annotation may be absent; unannotated
/// abstractions can only be checked against a given product type,
/// never inferred.
#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Lam {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub param: VarBind,
    pub annotation: Option<Box<Exp>>,
    pub body: Box<Exp>,
}

impl Lam {
    /// Substitute `arg` for the bound variable of the body (a β-step).
    pub fn instantiate(&self, arg: &Exp) -> Exp {
        (*self.body).subst(0, &Instantiate(arg.clone()))
    }
}

impl From<Lam> for Exp {
    fn from(e: Lam) -> Exp {
        Exp::Lam(e)
    }
}

impl HasSpan for Lam {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Lam {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.annotation.shift_in_range(range, by);
        self.body.shift_in_range(&range.clone().shift(1), by);
    }
}

impl Occurs for Lam {
    fn occurs(&self, idx: usize) -> bool {
        self.annotation.occurs(idx) || self.body.occurs(idx + 1)
    }
}

impl FreeVars for Lam {
    fn free_vars_into(&self, depth: usize, acc: &mut HashSet<Idx>) {
        self.annotation.free_vars_into(depth, acc);
        self.body.free_vars_into(depth + 1, acc);
    }
}

impl Substitutable for Lam {
    type Target = Lam;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> Lam {
        let Lam { span, param, annotation, body } = self;
        Lam {
            span: *span,
            param: param.clone(),
            annotation: annotation.subst(depth, by),
            body: body.subst(depth + 1, by),
        }
    }
}

impl Print for Lam {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let Lam { param, annotation, body, .. } = self;
        let name = if param.id.is_empty() { "_" } else { param.id.as_str() };
        let annotation = match annotation {
            Some(typ) => alloc
                .space()
                .append(COLON)
                .append(alloc.space())
                .append(typ.print_prec(cfg, alloc, Precedence::App)),
            None => alloc.nil(),
        };
        alloc
            .text(BACKSLASH)
            .append(name.to_owned())
            .append(annotation)
            .append(alloc.space())
            .append(FAT_ARROW)
            .append(alloc.line())
            .append(body.print(cfg, alloc))
            .group()
            .nest(cfg.indent)
            .parens_if(prec > Precedence::Exp)
    }
}
