//! First-order pattern matching with higher-order holes
//!
//! A pattern is a symbol applied to patterns, a bound variable, an
//! abstraction over a pattern, or a hole applied to distinct bound
//! variables (the Miller fragment). Matching walks pattern and subject
//! together; the subject is only reduced where the pattern demands a
//! rigid head, never below a hole.

use modulo_lang_ast::*;

use crate::conversion;
use crate::result::*;
use crate::signature::Signature;

use super::whnf::whnf;

/// Match the left-hand side of `rule` against the first `lhs_args.len()`
/// arguments of a spine. Returns the assignment of the rule's holes on
/// success and `None` on mismatch.
pub fn match_args(sig: &Signature, rule: &Rule, args: &[&Exp]) -> TcResult<Option<Vec<Exp>>> {
    debug_assert_eq!(rule.lhs_args.len(), args.len());
    let mut bindings: Vec<Option<Exp>> = vec![None; rule.arity];
    for (pat, subject) in rule.lhs_args.iter().zip(args) {
        if !match_exp(sig, pat, subject, 0, &mut bindings)? {
            return Ok(None);
        }
    }
    let bound = bindings
        .into_iter()
        .map(|binding| {
            binding.ok_or_else(|| TypeError::impossible("unbound hole after successful match"))
        })
        .collect::<TcResult<Vec<_>>>()?;
    Ok(Some(bound))
}

fn match_exp(
    sig: &Signature,
    pat: &Exp,
    subject: &Exp,
    depth: usize,
    bindings: &mut [Option<Exp>],
) -> TcResult<bool> {
    let (phead, pargs) = pat.unapp();

    // Hole patterns bind the subject without reducing it.
    if let Exp::Meta(meta) = phead {
        let vars = hole_vars(&pargs)?;
        let candidate = match close_over(subject, depth, &vars, &hole_var_names(&pargs)) {
            Some(candidate) => candidate,
            // A locally bound variable which is not an argument of the
            // hole occurs in the subject.
            None => return Ok(false),
        };
        return match &bindings[meta.idx] {
            Some(previous) => {
                // Non-linear occurrence: the two candidates must be
                // convertible. Structural equality is tried first.
                if previous == &candidate {
                    Ok(true)
                } else {
                    conversion::eq_modulo(sig, previous, &candidate)
                }
            }
            None => {
                bindings[meta.idx] = Some(candidate);
                Ok(true)
            }
        };
    }

    // Rigid patterns need the subject's head exposed.
    let subject = whnf(sig, subject)?;
    match phead {
        Exp::Lam(plam) => match &subject {
            Exp::Lam(slam) => match_exp(sig, &plam.body, &slam.body, depth + 1, bindings),
            _ => Ok(false),
        },
        Exp::Variable(pvar) => match &subject {
            Exp::Variable(svar) => Ok(svar.idx == pvar.idx),
            _ => Ok(false),
        },
        Exp::Sym(psym) => {
            let (shead, sargs) = subject.unapp();
            match shead {
                Exp::Sym(ssym) if ssym.name == psym.name && sargs.len() == pargs.len() => {
                    for (p, s) in pargs.iter().copied().zip(sargs) {
                        if !match_exp(sig, p, s, depth, bindings)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
        _ => Ok(false),
    }
}

fn hole_vars(args: &[&Exp]) -> TcResult<Vec<usize>> {
    args.iter()
        .map(|arg| match arg {
            Exp::Variable(v) => Ok(v.idx.0),
            _ => Err(TypeError::impossible("hole applied to a non-variable")),
        })
        .collect()
}

fn hole_var_names(args: &[&Exp]) -> Vec<VarBind> {
    args.iter()
        .map(|arg| match arg {
            Exp::Variable(v) => VarBind::from_string(&v.name.id),
            _ => VarBind::from_string(""),
        })
        .collect()
}

/// Abstract the subject over the hole's argument variables: the result
/// is `λ v1 … λ vj. subject`, expressed in the frame outside the
/// pattern-local binders. Returns `None` if any other locally bound
/// variable occurs in the subject.
fn close_over(subject: &Exp, depth: usize, vars: &[usize], names: &[VarBind]) -> Option<Exp> {
    let mut body = reindex(subject, 0, depth, vars)?;
    for name in names.iter().rev() {
        body = Exp::Lam(Lam {
            span: None,
            param: name.clone(),
            annotation: None,
            body: Box::new(body),
        });
    }
    Some(body)
}

/// Rename the free variables of `exp` for abstraction over `vars`:
///
/// - variables bound inside `exp` itself (index < `local`) are kept,
/// - the listed variables become references to the `vars.len()` binders
///   wrapped around the result, in order,
/// - other variables bound within the pattern (index < `depth`) fail,
/// - variables free in the whole spine move past the local binders.
pub(crate) fn reindex(exp: &Exp, local: usize, depth: usize, vars: &[usize]) -> Option<Exp> {
    match exp.unfold() {
        Exp::Variable(v) => {
            if v.idx.0 < local {
                return Some(exp.clone());
            }
            let offset = v.idx.0 - local;
            let arity = vars.len();
            if offset < depth {
                vars.iter().position(|&u| u == offset).map(|pos| {
                    Exp::Variable(Variable {
                        span: v.span,
                        idx: Idx(local + arity - 1 - pos),
                        name: v.name.clone(),
                    })
                })
            } else {
                Some(Exp::Variable(Variable {
                    span: v.span,
                    idx: Idx(local + arity + (offset - depth)),
                    name: v.name.clone(),
                }))
            }
        }
        Exp::Sort(_) | Exp::Sym(_) | Exp::Meta(_) => Some(exp.clone()),
        Exp::App(App { span, fun, arg }) => Some(Exp::App(App {
            span: *span,
            fun: Box::new(reindex(fun, local, depth, vars)?),
            arg: Box::new(reindex(arg, local, depth, vars)?),
        })),
        Exp::Pi(Pi { span, param, domain, body }) => Some(Exp::Pi(Pi {
            span: *span,
            param: param.clone(),
            domain: Box::new(reindex(domain, local, depth, vars)?),
            body: Box::new(reindex(body, local + 1, depth, vars)?),
        })),
        Exp::Lam(Lam { span, param, annotation, body }) => Some(Exp::Lam(Lam {
            span: *span,
            param: param.clone(),
            annotation: match annotation {
                Some(annotation) => Some(Box::new(reindex(annotation, local, depth, vars)?)),
                None => None,
            },
            body: Box::new(reindex(body, local + 1, depth, vars)?),
        })),
    }
}

#[cfg(test)]
mod tests {
    use crate::conversion::eq_modulo;
    use crate::testutil::*;

    use modulo_lang_ast::*;

    #[test]
    fn identity_pattern_matches_up_to_alpha() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "ident", Exp::arrow(Exp::arrow(nat(), nat()), Exp::arrow(nat(), nat())));
        // rule ident (\x => x) $n --> $n
        sig.admit_rule(rule(
            "ident",
            1,
            vec![Exp::lam("x", Exp::var(0)), Exp::meta(0)],
            Exp::meta(0),
        ))
        .unwrap();
        let exp = Exp::app_spine(sym("ident"), [Exp::lam("y", Exp::var(0)), num(2)]);
        assert!(eq_modulo(&sig, &exp, &num(2)).unwrap());
        // A non-identity function does not match.
        let stuck = Exp::app_spine(
            sym("ident"),
            [Exp::lam("y", Exp::app(sym("succ"), Exp::var(0))), num(2)],
        );
        assert!(!eq_modulo(&sig, &stuck, &num(2)).unwrap());
    }

    #[test]
    fn non_linear_pattern_requires_convertible_arguments() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "diag", Exp::arrow(nat(), Exp::arrow(nat(), nat())));
        // rule diag $n $n --> zero
        sig.admit_rule(rule("diag", 1, vec![Exp::meta(0), Exp::meta(0)], sym("zero"))).unwrap();
        // The repeated positions are not structurally equal but reduce
        // to the same numeral.
        let fires = Exp::app_spine(sym("diag"), [Exp::app_spine(sym("add"), [num(1), num(1)]), num(2)]);
        assert!(eq_modulo(&sig, &fires, &num(0)).unwrap());
        let stuck = Exp::app_spine(sym("diag"), [num(1), num(2)]);
        assert_eq!(
            crate::normalizer::whnf(&sig, &stuck).unwrap(),
            stuck
        );
    }

    #[test]
    fn hole_under_binder_rejects_escaping_variables() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "constantly", Exp::arrow(Exp::arrow(nat(), nat()), nat()));
        // rule constantly (\x => $c) --> $c  -- matches constant functions only
        sig.admit_rule(rule(
            "constantly",
            1,
            vec![Exp::lam("x", Exp::meta(0))],
            Exp::meta(0),
        ))
        .unwrap();
        let fires = Exp::app(sym("constantly"), Exp::lam("x", num(1)));
        assert!(eq_modulo(&sig, &fires, &num(1)).unwrap());
        // The body uses the bound variable, so the hole cannot capture it.
        let stuck = Exp::app(sym("constantly"), Exp::lam("x", Exp::var(0)));
        assert_eq!(crate::normalizer::whnf(&sig, &stuck).unwrap(), stuck);
    }

    #[test]
    fn higher_order_hole_builds_an_abstraction() {
        let mut sig = nat_sig();
        // apply : (Nat -> Nat) -> Nat -> Nat  with  rule apply (\x => $f x) $n --> $f $n
        declare_definable(
            &mut sig,
            "apply",
            Exp::arrow(Exp::arrow(nat(), nat()), Exp::arrow(nat(), nat())),
        );
        sig.admit_rule(rule(
            "apply",
            2,
            vec![
                Exp::lam("x", Exp::app(Exp::meta(0), Exp::var(0))),
                Exp::meta(1),
            ],
            Exp::app(Exp::meta(0), Exp::meta(1)),
        ))
        .unwrap();
        let exp = Exp::app_spine(
            sym("apply"),
            [Exp::lam("x", Exp::app(sym("succ"), Exp::var(0))), num(1)],
        );
        assert!(eq_modulo(&sig, &exp, &num(2)).unwrap());
    }
}
