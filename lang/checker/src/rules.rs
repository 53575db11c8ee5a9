//! Rule admissibility
//!
//! Before a rewrite rule is admitted to a symbol, two things are
//! verified: the left-hand side is a pattern in the fragment the
//! matcher can handle, and rewriting with the rule preserves typing.
//! For the latter, the LHS spine is typed against the head symbol's
//! declared type, assigning each hole a type at its first occurrence;
//! the RHS is then inferred under those assignments, and the two sides'
//! types must be convertible. A rejected rule leaves the signature
//! unchanged.

use modulo_lang_ast::ctx::Binder;
use modulo_lang_ast::*;
use modulo_lang_miette_util::ToMiette;
use modulo_lang_printer::Print;

use crate::conversion::{convert, eq_modulo};
use crate::normalizer::matcher::reindex;
use crate::normalizer::whnf;
use crate::result::*;
use crate::typechecker::{CheckInfer, Ctx};
use crate::Signature;

pub fn check_rule(sig: &Signature, rule: &Rule) -> Result<(), RuleError> {
    let entry = sig.find(&rule.head)?;
    if entry.symbol.kind != SymbolKind::Definable {
        return Err(LookupError::expected_definable(&rule.head).into());
    }

    validate_patterns(rule)?;

    // Type the LHS spine, assigning hole types along the way.
    let mut ctx = Ctx::new();
    let mut holes: Vec<Option<Exp>> = vec![None; rule.arity];
    let mut lhs_typ: Exp = *entry.symbol.typ.clone();
    for arg in &rule.lhs_args {
        let fun_typ = whnf(sig, &lhs_typ).map_err(RuleError::from)?;
        let Exp::Pi(pi) = &fun_typ else {
            return Err(RuleError::LhsOverApplied {
                name: rule.head.id.to_string(),
                span: rule.span.to_miette(),
            });
        };
        check_pattern(sig, &mut ctx, &mut holes, arg, &pi.domain)?;
        lhs_typ = pi.instantiate(arg);
    }

    // Infer the RHS under the solved hole types.
    let mut metas = HashMap::default();
    for (idx, hole) in holes.into_iter().enumerate() {
        if let Some(typ) = hole {
            metas.insert(idx, typ);
        }
    }
    let mut rhs_ctx = Ctx::with_metas(metas);
    let rhs_typ = rule.rhs.infer(sig, &mut rhs_ctx)?;

    if !eq_modulo(sig, &lhs_typ, &rhs_typ)? {
        return Err(RuleError::types_not_convertible(rule, &lhs_typ, &rhs_typ));
    }
    Ok(())
}

// Pattern grammar
//
//

/// Check the syntactic constraints on the LHS: every argument is drawn
/// from the pattern grammar, hole arguments satisfy the Miller
/// condition, every hole below the arity occurs at least once in the
/// LHS, and the RHS only mentions holes bound by the LHS.
fn validate_patterns(rule: &Rule) -> Result<(), RuleError> {
    let mut seen = vec![false; rule.arity];
    for arg in &rule.lhs_args {
        validate_pattern(arg, 0, rule.arity, &mut seen)?;
    }
    if let Some(missing) = seen.iter().position(|s| !s) {
        return Err(RuleError::MissingHole { hole: missing, span: rule.span.to_miette() });
    }
    validate_rhs_holes(&rule.rhs, rule)?;
    Ok(())
}

fn validate_pattern(
    pat: &Exp,
    depth: usize,
    arity: usize,
    seen: &mut [bool],
) -> Result<(), RuleError> {
    let (head, args) = pat.unapp();
    match head {
        Exp::Meta(meta) => {
            if meta.idx >= arity {
                return Err(RuleError::pattern_shape(pat));
            }
            seen[meta.idx] = true;
            let mut vars = Vec::with_capacity(args.len());
            for arg in args {
                let Exp::Variable(v) = arg.unfold() else {
                    return Err(RuleError::MillerCondition { span: arg.span().to_miette() });
                };
                if v.idx.0 >= depth || vars.contains(&v.idx.0) {
                    return Err(RuleError::MillerCondition { span: arg.span().to_miette() });
                }
                vars.push(v.idx.0);
            }
            Ok(())
        }
        Exp::Variable(v) => {
            if !args.is_empty() || v.idx.0 >= depth {
                return Err(RuleError::pattern_shape(pat));
            }
            Ok(())
        }
        Exp::Sym(_) => {
            for arg in args {
                validate_pattern(arg, depth, arity, seen)?;
            }
            Ok(())
        }
        Exp::Lam(lam) => {
            if !args.is_empty() {
                return Err(RuleError::pattern_shape(pat));
            }
            validate_pattern(&lam.body, depth + 1, arity, seen)
        }
        _ => Err(RuleError::pattern_shape(pat)),
    }
}

fn validate_rhs_holes(exp: &Exp, rule: &Rule) -> Result<(), RuleError> {
    match exp.unfold() {
        Exp::Meta(meta) => {
            if meta.idx >= rule.arity {
                return Err(RuleError::MissingHole { hole: meta.idx, span: meta.span.to_miette() });
            }
            Ok(())
        }
        Exp::App(app) => {
            validate_rhs_holes(&app.fun, rule)?;
            validate_rhs_holes(&app.arg, rule)
        }
        Exp::Pi(pi) => {
            validate_rhs_holes(&pi.domain, rule)?;
            validate_rhs_holes(&pi.body, rule)
        }
        Exp::Lam(lam) => {
            if let Some(annotation) = &lam.annotation {
                validate_rhs_holes(annotation, rule)?;
            }
            validate_rhs_holes(&lam.body, rule)
        }
        _ => Ok(()),
    }
}

// LHS typing
//
//

/// Check a pattern argument against the expected type, assigning hole
/// types at their first occurrence. Each hole's type is abstracted over
/// the hole's Miller arguments; if the expected type depends on any
/// other locally bound variable the rule is rejected.
fn check_pattern(
    sig: &Signature,
    ctx: &mut Ctx,
    holes: &mut [Option<Exp>],
    pat: &Exp,
    expected: &Exp,
) -> Result<(), RuleError> {
    let (head, args) = pat.unapp();
    match head {
        Exp::Meta(meta) => {
            let vars: Vec<usize> = args
                .iter()
                .map(|arg| match arg.unfold() {
                    Exp::Variable(v) => Ok(v.idx.0),
                    _ => Err(RuleError::MillerCondition { span: arg.span().to_miette() }),
                })
                .collect::<Result<_, _>>()?;
            let assigned = close_over_pi(ctx, &vars, expected).ok_or(RuleError::HoleEscape {
                hole: meta.idx,
                span: meta.span.to_miette(),
            })?;
            match &holes[meta.idx] {
                Some(previous) => {
                    if eq_modulo(sig, previous, &assigned).map_err(RuleError::from)? {
                        Ok(())
                    } else {
                        Err(RuleError::HoleTypeMismatch {
                            hole: meta.idx,
                            expected: previous.print_to_string(None),
                            found: assigned.print_to_string(None),
                            span: meta.span.to_miette(),
                        })
                    }
                }
                None => {
                    holes[meta.idx] = Some(assigned);
                    Ok(())
                }
            }
        }
        Exp::Lam(lam) => {
            let expected = whnf(sig, expected).map_err(RuleError::from)?;
            let Exp::Pi(pi) = &expected else {
                return Err(TypeError::expected_product(&expected).into());
            };
            if let Some(annotation) = &lam.annotation {
                convert(sig, annotation, &pi.domain)?;
            }
            bind_pattern_var(ctx, &lam.param, pi.domain.clone(), |ctx| {
                check_pattern(sig, ctx, holes, &lam.body, &pi.body)
            })
        }
        Exp::Variable(_) | Exp::Sym(_) => {
            let mut typ = match head {
                Exp::Variable(v) => match ctx.vars.lookup(v.idx) {
                    Some(typ) => *typ,
                    None => return Err(TypeError::impossible("unbound pattern variable").into()),
                },
                Exp::Sym(sym) => *sig.find(&sym.name)?.symbol.typ.clone(),
                _ => unreachable!(),
            };
            for sub in args {
                let fun_typ = whnf(sig, &typ).map_err(RuleError::from)?;
                let Exp::Pi(pi) = &fun_typ else {
                    return Err(TypeError::not_a_function(&fun_typ, sub).into());
                };
                check_pattern(sig, ctx, holes, sub, &pi.domain)?;
                typ = pi.instantiate(sub);
            }
            convert(sig, &typ, expected).map_err(RuleError::from)
        }
        _ => Err(RuleError::pattern_shape(pat)),
    }
}

fn bind_pattern_var<T, F>(ctx: &mut Ctx, name: &VarBind, typ: Box<Exp>, f: F) -> T
where
    F: FnOnce(&mut Ctx) -> T,
{
    ctx.vars.bound.push(Binder { name: name.clone(), content: typ });
    let res = f(ctx);
    ctx.vars.bound.pop().expect("unbalanced context");
    res
}

/// Abstract the expected type of a hole over the hole's argument
/// variables: `Π (v1 : A1) … (vj : Aj). T`, expressed outside the
/// pattern-local binders. Returns `None` if the type depends on a local
/// variable which is not among the arguments.
fn close_over_pi(ctx: &Ctx, vars: &[usize], expected: &Exp) -> Option<Exp> {
    let depth = ctx.vars.len();
    let mut domains = Vec::with_capacity(vars.len());
    for (position, &var) in vars.iter().enumerate() {
        let typ = ctx.vars.lookup(Idx(var))?;
        let name = ctx.vars.name(Idx(var)).cloned().unwrap_or_else(|| VarBind::from_string(""));
        let domain = reindex(&typ, 0, depth, &vars[..position])?;
        domains.push((name, domain));
    }
    let mut body = reindex(expected, 0, depth, vars)?;
    for (name, domain) in domains.into_iter().rev() {
        body = Exp::Pi(Pi { span: None, param: name, domain: Box::new(domain), body: Box::new(body) });
    }
    Some(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    #[test]
    fn admissible_rule_is_appended() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "double", Exp::arrow(nat(), nat()));
        sig.admit_rule(rule(
            "double",
            1,
            vec![Exp::meta(0)],
            Exp::app_spine(sym("add"), [Exp::meta(0), Exp::meta(0)]),
        ))
        .unwrap();
        assert_eq!(sig.rules_of(&id_bound("double")).unwrap().len(), 1);
    }

    #[test]
    fn rejected_rule_leaves_the_symbol_unchanged() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "bogus", Exp::arrow(nat(), nat()));
        // rule bogus $n --> Nat  -- the sides have incompatible types
        let result = sig.admit_rule(rule("bogus", 1, vec![Exp::meta(0)], nat()));
        assert!(matches!(result, Err(RuleError::TypesNotConvertible { .. })));
        assert!(sig.rules_of(&id_bound("bogus")).unwrap().is_empty());
    }

    #[test]
    fn rules_on_static_symbols_are_rejected() {
        let mut sig = nat_sig();
        let result = sig.admit_rule(rule("succ", 1, vec![Exp::meta(0)], Exp::meta(0)));
        assert!(matches!(result, Err(RuleError::Lookup(LookupError::ExpectedDefinable { .. }))));
    }

    #[test]
    fn non_linear_rule_with_incompatible_hole_types_is_rejected() {
        let mut sig = nat_sig();
        declare_static(&mut sig, "Bool", Exp::typ());
        declare_definable(
            &mut sig,
            "mixed",
            Exp::arrow(nat(), Exp::arrow(sym("Bool"), nat())),
        );
        // rule mixed $x $x --> $x  -- $x is used at Nat and at Bool
        let result =
            sig.admit_rule(rule("mixed", 1, vec![Exp::meta(0), Exp::meta(0)], Exp::meta(0)));
        assert!(matches!(result, Err(RuleError::HoleTypeMismatch { .. })));
    }

    #[test]
    fn non_linear_rule_at_equal_types_is_admissible() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "diag", Exp::arrow(nat(), Exp::arrow(nat(), nat())));
        sig.admit_rule(rule("diag", 1, vec![Exp::meta(0), Exp::meta(0)], Exp::meta(0))).unwrap();
    }

    #[test]
    fn unbound_hole_in_lhs_is_rejected() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "weird", Exp::arrow(nat(), nat()));
        // arity 2, but only $0 occurs in the left-hand side
        let result = sig.admit_rule(Rule {
            span: None,
            head: id_bound("weird"),
            arity: 2,
            lhs_args: vec![Exp::meta(0)],
            rhs: Exp::meta(1),
        });
        assert!(matches!(result, Err(RuleError::MissingHole { hole: 1, .. })));
    }

    #[test]
    fn products_are_not_patterns() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "weird", Exp::arrow(Exp::typ(), nat()));
        let result = sig.admit_rule(rule(
            "weird",
            0,
            vec![Exp::arrow(nat(), nat())],
            sym("zero"),
        ));
        assert!(matches!(result, Err(RuleError::PatternShape { .. })));
    }

    #[test]
    fn hole_arguments_must_be_distinct_variables() {
        let mut sig = nat_sig();
        declare_definable(
            &mut sig,
            "proj",
            Exp::arrow(Exp::arrow(nat(), Exp::arrow(nat(), nat())), nat()),
        );
        // rule proj (\x => $f x x) --> zero  -- x is repeated
        let result = sig.admit_rule(rule(
            "proj",
            1,
            vec![Exp::lam("x", Exp::app_spine(Exp::meta(0), [Exp::var(0), Exp::var(0)]))],
            sym("zero"),
        ));
        assert!(matches!(result, Err(RuleError::MillerCondition { .. })));
    }

    #[test]
    fn over_applied_lhs_is_rejected() {
        let mut sig = nat_sig();
        declare_definable(&mut sig, "once", Exp::arrow(nat(), nat()));
        let result = sig.admit_rule(rule(
            "once",
            2,
            vec![Exp::meta(0), Exp::meta(1)],
            Exp::meta(0),
        ));
        assert!(matches!(result, Err(RuleError::LhsOverApplied { .. })));
    }

    #[test]
    fn rewriting_preserves_types() {
        let sig = nat_sig();
        let mut ctx = Ctx::new();
        let redex = Exp::app_spine(sym("add"), [num(2), num(2)]);
        let typ_before = redex.infer(&sig, &mut ctx).unwrap();
        let reduced = crate::normalizer::whnf(&sig, &redex).unwrap();
        let typ_after = reduced.infer(&sig, &mut ctx).unwrap();
        assert!(eq_modulo(&sig, &typ_before, &typ_after).unwrap());
    }
}
