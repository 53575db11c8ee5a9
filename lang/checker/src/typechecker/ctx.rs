use modulo_lang_ast::ctx::{Binder, TypeCtx};
use modulo_lang_ast::{Exp, HashMap, VarBind};

/// The context of a typechecking run: the locally bound variables, and
/// the types assigned to the pattern holes of the rule currently being
/// checked. Outside the admissibility check `metas` is empty and any
/// hole occurrence is an error.
#[derive(Debug, Clone, Default)]
pub struct Ctx {
    pub vars: TypeCtx,
    pub metas: HashMap<usize, Exp>,
}

impl Ctx {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with pre-assigned hole types, as used when inferring
    /// the right-hand side of a rewrite rule.
    pub fn with_metas(metas: HashMap<usize, Exp>) -> Self {
        Ctx { vars: TypeCtx::empty(), metas }
    }

    /// Run `f` with a variable of the given type bound innermost.
    pub fn bind_var<T, F>(&mut self, name: VarBind, typ: Box<Exp>, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        self.vars.bound.push(Binder { name, content: typ });
        let res = f(self);
        self.vars.bound.pop().expect("unbalanced context");
        res
    }
}
