//! Weak-head normalisation
//!
//! The reducer maintains a stack of arguments while it decomposes the
//! head of the term. β-redexes are contracted as soon as an abstraction
//! meets a non-empty stack, and definable symbols fire the first of
//! their rules that matches the argument stack, in declaration order.

use log::trace;

use modulo_lang_ast::*;
use modulo_lang_printer::Print;

use crate::result::*;
use crate::signature::{Signature, SymbolEntry};

use super::matcher;

/// Step budget for the `eval` directive. A step is a β-contraction or
/// the firing of a rewrite rule. Conversion checking and type checking
/// always reduce with an unlimited budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fuel {
    remaining: Option<usize>,
}

impl Fuel {
    pub fn unlimited() -> Fuel {
        Fuel { remaining: None }
    }

    pub fn limited(steps: usize) -> Fuel {
        Fuel { remaining: Some(steps) }
    }

    fn tick(&mut self) -> TcResult {
        match &mut self.remaining {
            None => Ok(()),
            Some(0) => Err(TypeError::BudgetExhausted {}),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
        }
    }
}

/// Compute the weak-head normal form of a term: a term whose head is a
/// sort, a product, an abstraction with no argument left to consume, a
/// variable, or a symbol to which no rule applies.
pub fn whnf(sig: &Signature, exp: &Exp) -> TcResult<Exp> {
    whnf_with(sig, exp, &mut Fuel::unlimited())
}

pub fn whnf_with(sig: &Signature, exp: &Exp, fuel: &mut Fuel) -> TcResult<Exp> {
    let mut head = exp.unfold().clone();
    // The top of the stack is the next argument of the head.
    let mut stack: Vec<Exp> = Vec::new();

    loop {
        match head {
            Exp::App(App { fun, arg, .. }) => {
                stack.push(*arg);
                head = *fun;
            }
            Exp::Lam(lam) => {
                if stack.is_empty() {
                    head = Exp::Lam(lam);
                    break;
                }
                fuel.tick()?;
                let arg = stack.pop().unwrap();
                head = lam.instantiate(&arg);
            }
            Exp::Sym(sym) => {
                let entry = sig.find(&sym.name)?;
                let fired = if entry.symbol.kind == SymbolKind::Definable {
                    fire_first_rule(sig, entry, &mut stack)?
                } else {
                    None
                };
                match fired {
                    Some(next) => {
                        fuel.tick()?;
                        trace!(
                            "{} ▷ {}",
                            sym.name,
                            next.print_to_string(None)
                        );
                        head = next;
                    }
                    None => {
                        head = Exp::Sym(sym);
                        break;
                    }
                }
            }
            other => {
                head = other;
                break;
            }
        }
    }

    Ok(reassemble(head, stack))
}

/// Try the rules of a definable symbol against the argument stack in
/// declaration order. The first match wins; its right-hand side is
/// spliced in and the matched arguments are consumed. Arguments beyond
/// the pattern arity stay on the stack and are re-applied afterwards.
fn fire_first_rule(
    sig: &Signature,
    entry: &SymbolEntry,
    stack: &mut Vec<Exp>,
) -> TcResult<Option<Exp>> {
    for rule in entry.rules() {
        let arity = rule.lhs_args.len();
        if stack.len() < arity {
            continue;
        }
        let args: Vec<&Exp> = stack.iter().rev().take(arity).collect();
        if let Some(bindings) = matcher::match_args(sig, rule, &args)? {
            stack.truncate(stack.len() - arity);
            return Ok(Some(rule.rhs.subst(0, &MetaSubst(&bindings))));
        }
    }
    Ok(None)
}

fn reassemble(head: Exp, mut stack: Vec<Exp>) -> Exp {
    let mut exp = head;
    while let Some(arg) = stack.pop() {
        exp = Exp::app(exp, arg);
    }
    exp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    #[test]
    fn addition_reduces() {
        let sig = nat_sig();
        let result = whnf(&sig, &Exp::app_spine(sym("add"), [num(2), num(1)])).unwrap();
        // One rule firing exposes the successor; the recursive call
        // stays unreduced under the weak head.
        let (head, args) = result.unapp();
        assert_eq!(head, &sym("succ"));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn partial_application_is_stuck() {
        let sig = nat_sig();
        let exp = Exp::app(sym("add"), num(1));
        assert_eq!(whnf(&sig, &exp).unwrap(), exp);
    }

    #[test]
    fn earlier_rule_wins() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "amb", Exp::arrow(nat(), nat()));
        sig.admit_rule(rule("amb", 1, vec![Exp::meta(0)], sym("zero"))).unwrap();
        sig.admit_rule(rule("amb", 1, vec![Exp::meta(0)], num(1))).unwrap();
        let result = whnf(&sig, &Exp::app(sym("amb"), num(3))).unwrap();
        assert_eq!(result, sym("zero"));
    }

    #[test]
    fn surplus_arguments_are_reapplied() {
        let mut sig = nat_sig();
        declare_definable(
            &mut sig,
            "force",
            Exp::arrow(Exp::arrow(nat(), nat()), Exp::arrow(nat(), nat())),
        );
        sig.admit_rule(rule("force", 1, vec![Exp::meta(0)], Exp::meta(0))).unwrap();
        let exp = Exp::app_spine(sym("force"), [sym("succ"), num(0)]);
        assert_eq!(whnf(&sig, &exp).unwrap(), num(1));
    }

    #[test]
    fn budget_is_respected() {
        let sig = nat_sig();
        let exp = Exp::app_spine(sym("add"), [num(5), num(5)]);
        let mut fuel = Fuel::limited(0);
        let result = whnf_with(&sig, &exp, &mut fuel);
        assert!(matches!(result, Err(TypeError::BudgetExhausted {})));
    }
}
