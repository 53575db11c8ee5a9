//! Convertibility modulo αβR
//!
//! Two terms are convertible if they are α-equal, or if their
//! weak-head normal forms are congruent up to convertibility of the
//! subterms. η is admitted in both directions for abstractions.

use modulo_lang_ast::*;

use crate::normalizer::whnf;
use crate::result::*;
use crate::signature::Signature;

/// Decide convertibility and report a [TypeError] on failure.
pub fn convert(sig: &Signature, lhs: &Exp, rhs: &Exp) -> TcResult {
    if eq_modulo(sig, lhs, rhs)? {
        Ok(())
    } else {
        Err(TypeError::not_eq(lhs, rhs))
    }
}

/// The convertibility test. Terminates on all well-typed inputs
/// provided the user's rule system terminates.
pub fn eq_modulo(sig: &Signature, lhs: &Exp, rhs: &Exp) -> TcResult<bool> {
    // α-equivalence is structural equality of the de Bruijn
    // representation.
    if lhs == rhs {
        return Ok(true);
    }
    let lhs = whnf(sig, lhs)?;
    let rhs = whnf(sig, rhs)?;
    eq_whnf(sig, &lhs, &rhs)
}

fn eq_whnf(sig: &Signature, lhs: &Exp, rhs: &Exp) -> TcResult<bool> {
    match (lhs, rhs) {
        (Exp::Pi(pi1), Exp::Pi(pi2)) => Ok(eq_modulo(sig, &pi1.domain, &pi2.domain)?
            && eq_modulo(sig, &pi1.body, &pi2.body)?),
        (Exp::Lam(lam1), Exp::Lam(lam2)) => {
            // Domain annotations are compared only when both are
            // present; an unannotated abstraction is convertible to its
            // annotated spelling.
            if let (Some(ann1), Some(ann2)) = (&lam1.annotation, &lam2.annotation) {
                if !eq_modulo(sig, ann1, ann2)? {
                    return Ok(false);
                }
            }
            eq_modulo(sig, &lam1.body, &lam2.body)
        }
        (Exp::Lam(lam), other) | (other, Exp::Lam(lam)) => eta_expand_eq(sig, lam, other),
        _ => {
            let (head1, args1) = lhs.unapp();
            let (head2, args2) = rhs.unapp();
            if !eq_head(head1, head2) || args1.len() != args2.len() {
                return Ok(false);
            }
            for (arg1, arg2) in args1.into_iter().zip(args2) {
                if !eq_modulo(sig, arg1, arg2)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

/// η: `λx. t ≡ u` iff `t ≡ u x` under the binder.
fn eta_expand_eq(sig: &Signature, lam: &Lam, other: &Exp) -> TcResult<bool> {
    let mut shifted = other.clone();
    shifted.shift(1);
    let expanded = Exp::app(shifted, Exp::var(0));
    eq_modulo(sig, &lam.body, &expanded)
}

fn eq_head(lhs: &Exp, rhs: &Exp) -> bool {
    match (lhs, rhs) {
        (Exp::Sort(s1), Exp::Sort(s2)) => s1.univ == s2.univ,
        (Exp::Variable(v1), Exp::Variable(v2)) => v1.idx == v2.idx,
        (Exp::Sym(s1), Exp::Sym(s2)) => s1.name == s2.name,
        (Exp::Meta(m1), Exp::Meta(m2)) => m1.idx == m2.idx,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    #[test]
    fn nat_addition_convertible() {
        let sig = nat_sig();
        let lhs = Exp::app_spine(sym("add"), [num(2), num(1)]);
        assert!(eq_modulo(&sig, &lhs, &num(3)).unwrap());
    }

    #[test]
    fn eta_in_both_directions() {
        let sig = nat_sig();
        let expanded = Exp::lam("x", Exp::app(sym("succ"), Exp::var(0)));
        assert!(eq_modulo(&sig, &expanded, &sym("succ")).unwrap());
        assert!(eq_modulo(&sig, &sym("succ"), &expanded).unwrap());
    }

    #[test]
    fn annotation_does_not_block_conversion() {
        let sig = nat_sig();
        let annotated = Exp::lam_ann("x", nat(), Exp::var(0));
        assert!(eq_modulo(&sig, &annotated, &Exp::lam("x", Exp::var(0))).unwrap());
    }

    #[test]
    fn conversion_is_an_equivalence() {
        let sig = nat_sig();
        let t1 = Exp::app_spine(sym("add"), [num(1), num(2)]);
        let t2 = num(3);
        let t3 = Exp::app_spine(sym("add"), [num(3), num(0)]);
        // reflexivity
        for t in [&t1, &t2, &t3] {
            assert!(eq_modulo(&sig, t, t).unwrap());
        }
        // symmetry
        assert!(eq_modulo(&sig, &t1, &t2).unwrap());
        assert!(eq_modulo(&sig, &t2, &t1).unwrap());
        // transitivity
        assert!(eq_modulo(&sig, &t1, &t3).unwrap());
    }

    #[test]
    fn distinct_constructors_differ() {
        let sig = nat_sig();
        assert!(!eq_modulo(&sig, &num(0), &num(1)).unwrap());
    }

    #[test]
    fn products_compare_componentwise() {
        let sig = nat_sig();
        let p1 = Exp::pi("x", nat(), nat());
        let p2 = Exp::arrow(nat(), nat());
        assert!(eq_modulo(&sig, &p1, &p2).unwrap());
        let p3 = Exp::arrow(nat(), Exp::typ());
        assert!(!eq_modulo(&sig, &p1, &p3).unwrap());
    }

    #[test]
    fn church_exponentiation_commutes_under_product() {
        // power two (times two three) == power two (times three two),
        // decided purely by αβ-conversion on untyped Church numerals.
        let sig = Signature::new();
        fn church(n: usize) -> Exp {
            let mut body = Exp::var(0);
            for _ in 0..n {
                body = Exp::app(Exp::var(1), body);
            }
            Exp::lam("f", Exp::lam("x", body))
        }
        // times = \m => \n => \f => m (n f)
        let times = Exp::lam(
            "m",
            Exp::lam(
                "n",
                Exp::lam("f", Exp::app(Exp::var(2), Exp::app(Exp::var(1), Exp::var(0)))),
            ),
        );
        // power = \m => \n => n m
        let power = Exp::lam("m", Exp::lam("n", Exp::app(Exp::var(0), Exp::var(1))));
        let lhs = Exp::app_spine(
            power.clone(),
            [church(2), Exp::app_spine(times.clone(), [church(2), church(3)])],
        );
        let rhs =
            Exp::app_spine(power, [church(2), Exp::app_spine(times, [church(3), church(2)])]);
        assert!(eq_modulo(&sig, &lhs, &rhs).unwrap());
    }
}
