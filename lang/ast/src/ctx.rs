//! Variable context
//!
//! Tracks locally bound variables during typechecking.

use crate::traits::*;
use crate::{Exp, Idx, VarBind};

#[derive(Debug, Clone)]
pub struct Binder<T> {
    pub name: VarBind,
    pub content: T,
}

impl<T: Shift> Shift for Binder<T> {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.content.shift_in_range(range, by);
    }
}

/// The typing context Γ: an ordered sequence of named types. The last
/// entry is the innermost binder, i.e. the one de Bruijn index `0`
/// refers to.
#[derive(Debug, Clone, Default)]
pub struct TypeCtx {
    pub bound: Vec<Binder<Box<Exp>>>,
}

impl TypeCtx {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Look up the type of a bound variable. The result is expressed at
    /// the current depth of the context, i.e. it is shifted past all
    /// binders introduced after the one the index refers to.
    pub fn lookup(&self, idx: Idx) -> Option<Box<Exp>> {
        let pos = self.bound.len().checked_sub(idx.0 + 1)?;
        let mut typ = self.bound[pos].content.clone();
        typ.shift((idx.0 + 1) as isize);
        Some(typ)
    }

    /// The name hint recorded for a bound variable.
    pub fn name(&self, idx: Idx) -> Option<&VarBind> {
        let pos = self.bound.len().checked_sub(idx.0 + 1)?;
        Some(&self.bound[pos].name)
    }

    /// Run `f` with the binder pushed onto the context.
    pub fn bind<T, F>(&mut self, binder: Binder<Box<Exp>>, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        self.bound.push(binder);
        let res = f(self);
        self.bound.pop().expect("unbalanced context");
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_shifts_past_later_binders() {
        let mut ctx = TypeCtx::empty();
        let binder =
            |name: &str, typ: Exp| Binder { name: VarBind::from_string(name), content: Box::new(typ) };
        // x : Type, y : x |- lookup(1) = Type, lookup(0) = x@1
        ctx.bind(binder("x", Exp::typ()), |ctx| {
            ctx.bind(binder("y", Exp::var(0)), |ctx| {
                assert_eq!(*ctx.lookup(Idx(1)).unwrap(), Exp::typ());
                assert_eq!(*ctx.lookup(Idx(0)).unwrap(), Exp::var(1));
            })
        });
    }
}
