use crate::{HashSet, Idx};

/// Computing the set of free variables of a term.
pub trait FreeVars {
    /// Collect the free variables into `acc`. The indices in `acc` are
    /// relative to the root of the traversal; `depth` counts the
    /// binders crossed so far.
    fn free_vars_into(&self, depth: usize, acc: &mut HashSet<Idx>);

    fn free_vars(&self) -> HashSet<Idx> {
        let mut acc = HashSet::default();
        self.free_vars_into(0, &mut acc);
        acc
    }

    fn is_closed(&self) -> bool {
        self.free_vars().is_empty()
    }
}

impl<T: FreeVars> FreeVars for Box<T> {
    fn free_vars_into(&self, depth: usize, acc: &mut HashSet<Idx>) {
        (**self).free_vars_into(depth, acc)
    }
}

impl<T: FreeVars> FreeVars for Option<T> {
    fn free_vars_into(&self, depth: usize, acc: &mut HashSet<Idx>) {
        if let Some(inner) = self {
            inner.free_vars_into(depth, acc)
        }
    }
}

impl<T: FreeVars> FreeVars for Vec<T> {
    fn free_vars_into(&self, depth: usize, acc: &mut HashSet<Idx>) {
        self.iter().for_each(|x| x.free_vars_into(depth, acc))
    }
}
