use derivative::Derivative;
use serde_derive::{Deserialize, Serialize};

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_printer::tokens::{ARROW, COLON};
use modulo_lang_printer::util::ParensExt;
use modulo_lang_printer::{Alloc, Builder, DocAllocator, Precedence, Print, PrintCfg};

use crate::ident::VarBind;
use crate::traits::*;
use crate::HashSet;

use super::{Exp, Idx};

/// A dependent product `(x : A) -> B`. The body scopes one variable.
/// The parameter name is a printing hint only and does not participate
/// in equality, so structural equality on products is α-equivalence.
#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Pi {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub param: VarBind,
    pub domain: Box<Exp>,
    pub body: Box<Exp>,
}

impl Pi {
    /// Substitute `arg` for the bound variable of the body.
    pub fn instantiate(&self, arg: &Exp) -> Exp {
        (*self.body).subst(0, &Instantiate(arg.clone()))
    }
}

impl From<Pi> for Exp {
    fn from(e: Pi) -> Exp {
        Exp::Pi(e)
    }
}

impl HasSpan for Pi {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Pi {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.domain.shift_in_range(range, by);
        self.body.shift_in_range(&range.clone().shift(1), by);
    }
}

impl Occurs for Pi {
    fn occurs(&self, idx: usize) -> bool {
        self.domain.occurs(idx) || self.body.occurs(idx + 1)
    }
}

impl FreeVars for Pi {
    fn free_vars_into(&self, depth: usize, acc: &mut HashSet<Idx>) {
        self.domain.free_vars_into(depth, acc);
        self.body.free_vars_into(depth + 1, acc);
    }
}

impl Substitutable for Pi {
    type Target = Pi;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> Pi {
        let Pi { span, param, domain, body } = self;
        Pi {
            span: *span,
            param: param.clone(),
            domain: domain.subst(depth, by),
            body: body.subst(depth + 1, by),
        }
    }
}

impl Print for Pi {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let Pi { param, domain, body, .. } = self;
        let doc = if body.occurs(0) {
            let name = if param.id.is_empty() { "_" } else { param.id.as_str() };
            alloc
                .text(name.to_owned())
                .append(alloc.space())
                .append(COLON)
                .append(alloc.space())
                .append(domain.print(cfg, alloc))
                .parens_from()
                .append(alloc.space())
                .append(ARROW)
                .append(alloc.line())
                .append(body.print(cfg, alloc))
        } else {
            domain
                .print_prec(cfg, alloc, Precedence::App)
                .append(alloc.space())
                .append(ARROW)
                .append(alloc.line())
                .append(body.print(cfg, alloc))
        };
        doc.group().nest(cfg.indent).parens_if(prec > Precedence::Exp)
    }
}
