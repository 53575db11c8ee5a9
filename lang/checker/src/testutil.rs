//! Shared fixtures for the unit tests of this crate.

use modulo_lang_ast::*;

use crate::Signature;

pub const MOD: &str = "test";

pub fn sym(name: &str) -> Exp {
    Exp::sym(MOD, name)
}

pub fn id_bound(name: &str) -> IdBound {
    IdBound::from_qname(QName {
        module: ModuleName::from_string(MOD),
        name: name.to_owned(),
    })
}

pub fn rule(head: &str, arity: usize, lhs_args: Vec<Exp>, rhs: Exp) -> Rule {
    Rule { span: None, head: id_bound(head), arity, lhs_args, rhs }
}

pub fn declare_static(sig: &mut Signature, name: &str, typ: Exp) {
    sig.declare_static(ModuleName::from_string(MOD), IdBind::from_string(name), Box::new(typ))
        .unwrap();
}

pub fn declare_definable(sig: &mut Signature, name: &str, typ: Exp) {
    sig.declare_definable(ModuleName::from_string(MOD), IdBind::from_string(name), Box::new(typ))
        .unwrap();
}

pub fn nat() -> Exp {
    sym("Nat")
}

/// The Peano numeral `succ^n zero`.
pub fn num(n: usize) -> Exp {
    let mut exp = sym("zero");
    for _ in 0..n {
        exp = Exp::app(sym("succ"), exp);
    }
    exp
}

/// A signature with Peano naturals and addition:
///
/// ```text
/// static Nat : Type.
/// static zero : Nat.
/// static succ : Nat -> Nat.
/// def add : Nat -> Nat -> Nat.
/// rule add $n zero --> $n.
/// rule add zero $m --> $m.
/// rule add (succ $n) $m --> succ (add $n $m).
/// ```
pub fn nat_sig() -> Signature {
    let mut sig = Signature::new();
    declare_static(&mut sig, "Nat", Exp::typ());
    declare_static(&mut sig, "zero", nat());
    declare_static(&mut sig, "succ", Exp::arrow(nat(), nat()));
    declare_definable(&mut sig, "add", Exp::arrow(nat(), Exp::arrow(nat(), nat())));
    sig.admit_rule(rule("add", 1, vec![Exp::meta(0), sym("zero")], Exp::meta(0))).unwrap();
    sig.admit_rule(rule("add", 1, vec![sym("zero"), Exp::meta(0)], Exp::meta(0))).unwrap();
    sig.admit_rule(rule(
        "add",
        2,
        vec![Exp::app(sym("succ"), Exp::meta(0)), Exp::meta(1)],
        Exp::app(sym("succ"), Exp::app_spine(sym("add"), [Exp::meta(0), Exp::meta(1)])),
    ))
    .unwrap();
    sig
}
