use crate::{Exp, Variable, VarBound, Idx};

/// Trait for entities which can be used as a substitution.
///
/// A substitution maps the free variables and the pattern holes of a
/// term to replacement terms. The replacements returned by `get_var`
/// and `get_meta` are expressed at the depth at which the substitution
/// was started; the traversal shifts them under any binders it crosses.
pub trait Substitution: Clone {
    /// The replacement for the free variable with index `idx`, where
    /// `idx` is counted relative to the root of the substituted term.
    /// `None` leaves the variable unchanged.
    fn get_var(&self, idx: usize) -> Option<Exp> {
        let _ = idx;
        None
    }

    /// The replacement for the pattern hole with index `idx`.
    /// `None` leaves the hole unchanged.
    fn get_meta(&self, idx: usize) -> Option<Exp> {
        let _ = idx;
        None
    }
}

/// A trait for all entities to which we can apply a substitution.
///
/// The `depth` parameter counts the binders crossed since the root of
/// the traversal; it starts at `0`.
pub trait Substitutable: Sized {
    type Target;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> Self::Target;
}

impl<T: Substitutable> Substitutable for Box<T> {
    type Target = Box<T::Target>;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> Self::Target {
        Box::new((**self).subst(depth, by))
    }
}

impl<T: Substitutable> Substitutable for Option<T> {
    type Target = Option<T::Target>;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> Self::Target {
        self.as_ref().map(|x| x.subst(depth, by))
    }
}

impl<T: Substitutable> Substitutable for Vec<T> {
    type Target = Vec<T::Target>;

    fn subst<S: Substitution>(&self, depth: usize, by: &S) -> Self::Target {
        self.iter().map(|x| x.subst(depth, by)).collect()
    }
}

// Instantiate
//
//

/// The substitution performed by a β-step: the variable bound by the
/// removed binder is replaced by the given term, and all other free
/// variables are moved down by one.
#[derive(Debug, Clone)]
pub struct Instantiate(pub Exp);

impl Substitution for Instantiate {
    fn get_var(&self, idx: usize) -> Option<Exp> {
        if idx == 0 {
            Some(self.0.clone())
        } else {
            Some(Exp::Variable(Variable {
                span: None,
                idx: Idx(idx - 1),
                name: VarBound::from_string(""),
            }))
        }
    }
}

// MetaSubst
//
//

/// The substitution performed when a rewrite rule fires: every pattern
/// hole is replaced by the term the matcher bound it to. Free variables
/// are left untouched.
#[derive(Debug, Clone)]
pub struct MetaSubst<'a>(pub &'a [Exp]);

impl Substitution for MetaSubst<'_> {
    fn get_meta(&self, idx: usize) -> Option<Exp> {
        self.0.get(idx).cloned()
    }
}
