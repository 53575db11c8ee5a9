//! Strong normalisation, derived from weak-head normalisation by
//! recursively normalising argument positions and binder bodies.

use modulo_lang_ast::*;

use crate::result::TcResult;
use crate::signature::Signature;

use super::whnf::{whnf_with, Fuel};

pub trait Normalize {
    fn normalize(&self, sig: &Signature) -> TcResult<Exp> {
        self.normalize_with(sig, &mut Fuel::unlimited())
    }

    fn normalize_with(&self, sig: &Signature, fuel: &mut Fuel) -> TcResult<Exp>;
}

impl Normalize for Exp {
    fn normalize_with(&self, sig: &Signature, fuel: &mut Fuel) -> TcResult<Exp> {
        let head = whnf_with(sig, self, fuel)?;
        match head {
            Exp::App(_) => {
                let (head, args) = head.unapp();
                let args = args
                    .into_iter()
                    .map(|arg| arg.normalize_with(sig, fuel))
                    .collect::<TcResult<Vec<_>>>()?;
                Ok(Exp::app_spine(head.clone(), args))
            }
            Exp::Pi(Pi { span, param, domain, body }) => Ok(Exp::Pi(Pi {
                span,
                param,
                domain: Box::new(domain.normalize_with(sig, fuel)?),
                body: Box::new(body.normalize_with(sig, fuel)?),
            })),
            Exp::Lam(Lam { span, param, annotation, body }) => Ok(Exp::Lam(Lam {
                span,
                param,
                annotation: match annotation {
                    Some(annotation) => Some(Box::new(annotation.normalize_with(sig, fuel)?)),
                    None => None,
                },
                body: Box::new(body.normalize_with(sig, fuel)?),
            })),
            leaf => Ok(leaf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    #[test]
    fn addition_normalizes() {
        let sig = nat_sig();
        let exp = Exp::app_spine(sym("add"), [num(2), num(1)]);
        assert_eq!(exp.normalize(&sig).unwrap(), num(3));
    }

    #[test]
    fn beta_normalization_is_idempotent() {
        let sig = nat_sig();
        let exp = Exp::app(Exp::lam("x", Exp::app(sym("succ"), Exp::var(0))), num(1));
        let once = exp.normalize(&sig).unwrap();
        let twice = once.normalize(&sig).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, num(2));
    }

    #[test]
    fn normalizes_under_binders() {
        let sig = nat_sig();
        // \x => (\y => y) x  normalizes to  \x => x
        let exp = Exp::lam("x", Exp::app(Exp::lam("y", Exp::var(0)), Exp::var(0)));
        assert_eq!(exp.normalize(&sig).unwrap(), Exp::lam("x", Exp::var(0)));
    }

    #[test]
    fn normalizes_argument_positions() {
        let sig = nat_sig();
        // succ is static, so the spine is stuck but its argument is not.
        let exp = Exp::app(sym("succ"), Exp::app_spine(sym("add"), [num(1), num(1)]));
        assert_eq!(exp.normalize(&sig).unwrap(), num(3));
    }
}
