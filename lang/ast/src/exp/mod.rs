use std::fmt;

use derivative::Derivative;
use serde_derive::{Deserialize, Serialize};

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::*;
use crate::traits::*;
use crate::HashSet;

mod app;
mod lam;
mod meta;
mod pi;
mod sort;
mod sym;
mod variable;

pub use app::*;
pub use lam::*;
pub use meta::*;
pub use pi::*;
pub use sort::*;
pub use sym::*;
pub use variable::*;

// Idx
//
//

/// A de Bruijn index: the number of binders between a variable
/// occurrence and the binder it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Idx(pub usize);

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Exp
//
//

#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub enum Exp {
    Variable(Variable),
    Sort(Sort),
    Sym(Sym),
    App(App),
    Pi(Pi),
    Lam(Lam),
    Meta(Meta),
}

impl Exp {
    /// Resolve metavariable instantiations before matching on the shape
    /// of a term. There is no proof mode in this implementation, so
    /// there is nothing to resolve; this is the hook where a future
    /// proof mode would substitute solved metavariables.
    pub fn unfold(&self) -> &Exp {
        self
    }

    /// Walk the left spine of an application and return the head
    /// together with the arguments in order.
    pub fn unapp(&self) -> (&Exp, Vec<&Exp>) {
        let mut head = self.unfold();
        let mut args = Vec::new();
        while let Exp::App(App { fun, arg, .. }) = head {
            args.push(&**arg);
            head = fun.unfold();
        }
        args.reverse();
        (head, args)
    }

    // Smart constructors
    //
    // These exist for the benefit of code which builds terms
    // programmatically (the lowering phase and the test suites);
    // they produce spanless nodes.

    pub fn var(idx: usize) -> Exp {
        Exp::Variable(Variable { span: None, idx: Idx(idx), name: VarBound::from_string("") })
    }

    pub fn var_named(name: &str, idx: usize) -> Exp {
        Exp::Variable(Variable { span: None, idx: Idx(idx), name: VarBound::from_string(name) })
    }

    pub fn typ() -> Exp {
        Exp::Sort(Sort { span: None, univ: Univ::Type })
    }

    pub fn kind() -> Exp {
        Exp::Sort(Sort { span: None, univ: Univ::Kind })
    }

    pub fn sym(module: &str, name: &str) -> Exp {
        Exp::Sym(Sym {
            span: None,
            name: IdBound::from_qname(QName {
                module: ModuleName::from_string(module),
                name: name.to_owned(),
            }),
        })
    }

    pub fn app(fun: Exp, arg: Exp) -> Exp {
        Exp::App(App { span: None, fun: Box::new(fun), arg: Box::new(arg) })
    }

    pub fn app_spine(head: Exp, args: impl IntoIterator<Item = Exp>) -> Exp {
        args.into_iter().fold(head, Exp::app)
    }

    pub fn pi(name: &str, domain: Exp, body: Exp) -> Exp {
        Exp::Pi(Pi {
            span: None,
            param: VarBind::from_string(name),
            domain: Box::new(domain),
            body: Box::new(body),
        })
    }

    /// Non-dependent function type. The codomain is given relative to
    /// the surrounding scope and is shifted under the new binder.
    pub fn arrow(domain: Exp, mut codomain: Exp) -> Exp {
        codomain.shift(1);
        Exp::pi("", domain, codomain)
    }

    pub fn lam(name: &str, body: Exp) -> Exp {
        Exp::Lam(Lam {
            span: None,
            param: VarBind::from_string(name),
            annotation: None,
            body: Box::new(body),
        })
    }

    pub fn lam_ann(name: &str, annotation: Exp, body: Exp) -> Exp {
        Exp::Lam(Lam {
            span: None,
            param: VarBind::from_string(name),
            annotation: Some(Box::new(annotation)),
            body: Box::new(body),
        })
    }

    pub fn meta(idx: usize) -> Exp {
        Exp::Meta(Meta { span: None, idx, name: None })
    }
}

impl HasSpan for Exp {
    fn span(&self) -> Option<Span> {
        match self {
            Exp::Variable(e) => e.span(),
            Exp::Sort(e) => e.span(),
            Exp::Sym(e) => e.span(),
            Exp::App(e) => e.span(),
            Exp::Pi(e) => e.span(),
            Exp::Lam(e) => e.span(),
            Exp::Meta(e) => e.span(),
        }
    }
}

impl Shift for Exp {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        match self {
            Exp::Variable(e) => e.shift_in_range(range, by),
            Exp::Sort(e) => e.shift_in_range(range, by),
            Exp::Sym(e) => e.shift_in_range(range, by),
            Exp::App(e) => e.shift_in_range(range, by),
            Exp::Pi(e) => e.shift_in_range(range, by),
            Exp::Lam(e) => e.shift_in_range(range, by),
            Exp::Meta(e) => e.shift_in_range(range, by),
        }
    }
}

impl Occurs for Exp {
    fn occurs(&self, idx: usize) -> bool {
        match self {
            Exp::Variable(e) => e.occurs(idx),
            Exp::Sort(e) => e.occurs(idx),
            Exp::Sym(e) => e.occurs(idx),
            Exp::App(e) => e.occurs(idx),
            Exp::Pi(e) => e.occurs(idx),
            Exp::Lam(e) => e.occurs(idx),
            Exp::Meta(e) => e.occurs(idx),
        }
    }
}

impl FreeVars for Exp {
    fn free_vars_into(&self, depth: usize, acc: &mut HashSet<Idx>) {
        match self {
            Exp::Variable(e) => e.free_vars_into(depth, acc),
            Exp::Sort(e) => e.free_vars_into(depth, acc),
            Exp::Sym(e) => e.free_vars_into(depth, acc),
            Exp::App(e) => e.free_vars_into(depth, acc),
            Exp::Pi(e) => e.free_vars_into(depth, acc),
            Exp::Lam(e) => e.free_vars_into(depth, acc),
            Exp::Meta(e) => e.free_vars_into(depth, acc),
        }
    }
}

impl Substitutable for Exp {
    type Target = Exp;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> Exp {
        match self {
            Exp::Variable(e) => e.subst(depth, by),
            Exp::Sort(e) => e.subst(depth, by).into(),
            Exp::Sym(e) => e.subst(depth, by).into(),
            Exp::App(e) => e.subst(depth, by).into(),
            Exp::Pi(e) => e.subst(depth, by).into(),
            Exp::Lam(e) => e.subst(depth, by).into(),
            Exp::Meta(e) => e.subst(depth, by),
        }
    }
}

impl Print for Exp {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Exp::Variable(e) => e.print_prec(cfg, alloc, prec),
            Exp::Sort(e) => e.print_prec(cfg, alloc, prec),
            Exp::Sym(e) => e.print_prec(cfg, alloc, prec),
            Exp::App(e) => e.print_prec(cfg, alloc, prec),
            Exp::Pi(e) => e.print_prec(cfg, alloc, prec),
            Exp::Lam(e) => e.print_prec(cfg, alloc, prec),
            Exp::Meta(e) => e.print_prec(cfg, alloc, prec),
        }
    }
}
