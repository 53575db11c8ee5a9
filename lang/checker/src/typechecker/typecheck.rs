//! Bidirectional type checker

use log::trace;

use modulo_lang_ast::*;
use modulo_lang_miette_util::ToMiette;
use modulo_lang_printer::Print;

use crate::conversion::convert;
use crate::normalizer::whnf;
use crate::result::*;
use crate::signature::Signature;

use super::ctx::Ctx;

/// The CheckInfer trait for bidirectional type inference.
/// Expressions which implement this trait provide both a `check`
/// function to typecheck the expression against an expected type and
/// an `infer` function to infer the type of the given expression.
pub trait CheckInfer: Sized {
    /// Checks whether the expression has the given expected type:
    /// ```text
    ///            Σ, Γ ⊢ e ⇐ τ
    /// ```
    /// - Σ: The signature of declared symbols and their rules.
    /// - Γ: The context of locally bound variables.
    fn check(&self, sig: &Signature, ctx: &mut Ctx, expected: &Exp) -> TcResult;

    /// Tries to infer a type for the given expression:
    /// ```text
    ///            Σ, Γ ⊢ e ⇒ τ
    /// ```
    /// - Σ: The signature of declared symbols and their rules.
    /// - Γ: The context of locally bound variables.
    fn infer(&self, sig: &Signature, ctx: &mut Ctx) -> TcResult<Exp>;
}

/// Checking against an expected type defaults to inferring a type and
/// comparing the two up to conversion:
/// ```text
///            Σ, Γ ⊢ e ⇒ τ
///            Σ, Γ ⊢ τ ≃ σ
///           ───────────────
///            Σ, Γ ⊢ e ⇐ σ
/// ```
fn check_by_inference<T: CheckInfer>(
    exp: &T,
    sig: &Signature,
    ctx: &mut Ctx,
    expected: &Exp,
) -> TcResult {
    let inferred = exp.infer(sig, ctx)?;
    convert(sig, &inferred, expected)
}

impl CheckInfer for Exp {
    fn check(&self, sig: &Signature, ctx: &mut Ctx, expected: &Exp) -> TcResult {
        match self {
            Exp::Variable(e) => e.check(sig, ctx, expected),
            Exp::Sort(e) => e.check(sig, ctx, expected),
            Exp::Sym(e) => e.check(sig, ctx, expected),
            Exp::App(e) => e.check(sig, ctx, expected),
            Exp::Pi(e) => e.check(sig, ctx, expected),
            Exp::Lam(e) => e.check(sig, ctx, expected),
            Exp::Meta(e) => e.check(sig, ctx, expected),
        }
    }

    fn infer(&self, sig: &Signature, ctx: &mut Ctx) -> TcResult<Exp> {
        let typ = match self {
            Exp::Variable(e) => e.infer(sig, ctx),
            Exp::Sort(e) => e.infer(sig, ctx),
            Exp::Sym(e) => e.infer(sig, ctx),
            Exp::App(e) => e.infer(sig, ctx),
            Exp::Pi(e) => e.infer(sig, ctx),
            Exp::Lam(e) => e.infer(sig, ctx),
            Exp::Meta(e) => e.infer(sig, ctx),
        }?;
        trace!("{} ⇒ {}", self.print_to_string(None), typ.print_to_string(None));
        Ok(typ)
    }
}

// Variable
//
//

impl CheckInfer for Variable {
    fn check(&self, sig: &Signature, ctx: &mut Ctx, expected: &Exp) -> TcResult {
        check_by_inference(self, sig, ctx, expected)
    }

    /// The *inference* rule for variables is:
    /// ```text
    ///            Γ(x) = τ
    ///           ───────────────
    ///            Σ, Γ ⊢ x ⇒ τ
    /// ```
    fn infer(&self, _sig: &Signature, ctx: &mut Ctx) -> TcResult<Exp> {
        match ctx.vars.lookup(self.idx) {
            Some(typ) => Ok(*typ),
            None => Err(TypeError::Impossible {
                message: format!("Unbound variable @{}", self.idx),
                span: self.span.to_miette(),
            }),
        }
    }
}

// Sort
//
//

impl CheckInfer for Sort {
    fn check(&self, sig: &Signature, ctx: &mut Ctx, expected: &Exp) -> TcResult {
        check_by_inference(self, sig, ctx, expected)
    }

    /// `Type` is the only inferable sort:
    /// ```text
    ///           ──────────────────────
    ///            Σ, Γ ⊢ Type ⇒ Kind
    /// ```
    /// `Kind` itself has no type.
    fn infer(&self, _sig: &Signature, _ctx: &mut Ctx) -> TcResult<Exp> {
        match self.univ {
            Univ::Type => Ok(Exp::kind()),
            Univ::Kind => Err(TypeError::KindHasNoType { span: self.span.to_miette() }),
        }
    }
}

// Sym
//
//

impl CheckInfer for Sym {
    fn check(&self, sig: &Signature, ctx: &mut Ctx, expected: &Exp) -> TcResult {
        check_by_inference(self, sig, ctx, expected)
    }

    /// Symbols carry their declared type:
    /// ```text
    ///            (c : τ) ∈ Σ
    ///           ───────────────
    ///            Σ, Γ ⊢ c ⇒ τ
    /// ```
    /// The declared type is closed, so no shifting is required.
    fn infer(&self, sig: &Signature, _ctx: &mut Ctx) -> TcResult<Exp> {
        let entry = sig.find(&self.name)?;
        Ok(*entry.symbol.typ.clone())
    }
}

// App
//
//

impl CheckInfer for App {
    fn check(&self, sig: &Signature, ctx: &mut Ctx, expected: &Exp) -> TcResult {
        check_by_inference(self, sig, ctx, expected)
    }

    /// The *inference* rule for applications is:
    /// ```text
    ///            Σ, Γ ⊢ f ⇒ (x : A) -> B
    ///            Σ, Γ ⊢ a ⇐ A
    ///           ─────────────────────────
    ///            Σ, Γ ⊢ f a ⇒ B[a/x]
    /// ```
    fn infer(&self, sig: &Signature, ctx: &mut Ctx) -> TcResult<Exp> {
        let fun_typ = self.fun.infer(sig, ctx)?;
        let fun_typ = whnf(sig, &fun_typ)?;
        let Exp::Pi(pi) = &fun_typ else {
            return Err(TypeError::not_a_function(&fun_typ, &self.fun));
        };
        self.arg.check(sig, ctx, &pi.domain)?;
        Ok(pi.instantiate(&self.arg))
    }
}

// Pi
//
//

impl CheckInfer for Pi {
    fn check(&self, sig: &Signature, ctx: &mut Ctx, expected: &Exp) -> TcResult {
        check_by_inference(self, sig, ctx, expected)
    }

    /// The *inference* rule for products is:
    /// ```text
    ///            Σ, Γ ⊢ A ⇐ Type
    ///            Σ, Γ, x:A ⊢ B ⇒ s      s ∈ {Type, Kind}
    ///           ─────────────────────────────────────────
    ///            Σ, Γ ⊢ (x : A) -> B ⇒ s
    /// ```
    fn infer(&self, sig: &Signature, ctx: &mut Ctx) -> TcResult<Exp> {
        self.domain.check(sig, ctx, &Exp::typ())?;
        let sort = ctx.bind_var(self.param.clone(), self.domain.clone(), |ctx| {
            sort_of(sig, ctx, &self.body)
        })?;
        Ok(Exp::Sort(sort))
    }
}

// Lam
//
//

impl CheckInfer for Lam {
    /// Unannotated abstractions are checkable against a product type:
    /// ```text
    ///            Σ, Γ ⊢ τ ▷ (x : A) -> B
    ///            Σ, Γ, x:A ⊢ t ⇐ B
    ///           ─────────────────────────
    ///            Σ, Γ ⊢ λx. t ⇐ τ
    /// ```
    /// An annotation, if present, must be convertible to `A`.
    fn check(&self, sig: &Signature, ctx: &mut Ctx, expected: &Exp) -> TcResult {
        let expected = whnf(sig, expected)?;
        let Exp::Pi(pi) = &expected else {
            return Err(TypeError::expected_product(&expected));
        };
        if let Some(annotation) = &self.annotation {
            convert(sig, annotation, &pi.domain)?;
        }
        ctx.bind_var(self.param.clone(), pi.domain.clone(), |ctx| {
            self.body.check(sig, ctx, &pi.body)
        })
    }

    /// Only annotated abstractions can appear in inference position:
    /// ```text
    ///            Σ, Γ ⊢ A ⇐ Type
    ///            Σ, Γ, x:A ⊢ t ⇒ B
    ///           ──────────────────────────────────
    ///            Σ, Γ ⊢ λx:A. t ⇒ (x : A) -> B
    /// ```
    fn infer(&self, sig: &Signature, ctx: &mut Ctx) -> TcResult<Exp> {
        let Some(annotation) = &self.annotation else {
            return Err(TypeError::CannotInferLambda { span: self.span.to_miette() });
        };
        annotation.check(sig, ctx, &Exp::typ())?;
        let body_typ = ctx.bind_var(self.param.clone(), annotation.clone(), |ctx| {
            self.body.infer(sig, ctx)
        })?;
        Ok(Exp::Pi(Pi {
            span: self.span,
            param: self.param.clone(),
            domain: annotation.clone(),
            body: Box::new(body_typ),
        }))
    }
}

// Meta
//
//

impl CheckInfer for Meta {
    fn check(&self, sig: &Signature, ctx: &mut Ctx, expected: &Exp) -> TcResult {
        check_by_inference(self, sig, ctx, expected)
    }

    /// Pattern holes only typecheck during the admissibility check,
    /// where the LHS typing pass has assigned them a type. The assigned
    /// types are closed, so no shifting is required.
    fn infer(&self, _sig: &Signature, ctx: &mut Ctx) -> TcResult<Exp> {
        match ctx.metas.get(&self.idx) {
            Some(typ) => Ok(typ.clone()),
            None => Err(TypeError::HoleOutsideRule { span: self.span.to_miette() }),
        }
    }
}

// Sorts
//
//

/// Infer the type of `exp` and demand that it is a sort:
/// ```text
///            Σ, Γ ⊢ A ⇒ s      s ∈ {Type, Kind}
///           ────────────────────────────────────
///            Σ, Γ ⊢ A ▷ s
/// ```
pub fn sort_of(sig: &Signature, ctx: &mut Ctx, exp: &Exp) -> TcResult<Sort> {
    let typ = exp.infer(sig, ctx)?;
    let typ = whnf(sig, &typ)?;
    match typ {
        Exp::Sort(sort) => Ok(sort),
        other => Err(TypeError::not_a_sort(exp, &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    fn vec_sig() -> Signature {
        let mut sig = nat_sig();
        declare_static(&mut sig, "Vec", Exp::arrow(nat(), Exp::typ()));
        declare_static(&mut sig, "nil", Exp::app(sym("Vec"), sym("zero")));
        // cons : (n : Nat) -> Nat -> Vec n -> Vec (succ n)
        declare_static(
            &mut sig,
            "cons",
            Exp::pi(
                "n",
                nat(),
                Exp::arrow(
                    nat(),
                    Exp::arrow(
                        Exp::app(sym("Vec"), Exp::var(0)),
                        Exp::app(sym("Vec"), Exp::app(sym("succ"), Exp::var(0))),
                    ),
                ),
            ),
        );
        sig
    }

    #[test]
    fn type_infers_kind() {
        let sig = Signature::new();
        assert_eq!(Exp::typ().infer(&sig, &mut Ctx::new()).unwrap(), Exp::kind());
    }

    #[test]
    fn kind_has_no_type() {
        let sig = Signature::new();
        let result = Exp::kind().infer(&sig, &mut Ctx::new());
        assert!(matches!(result, Err(TypeError::KindHasNoType { .. })));
    }

    #[test]
    fn addition_has_a_type() {
        let sig = nat_sig();
        let exp = Exp::app_spine(sym("add"), [num(1), num(2)]);
        let typ = exp.infer(&sig, &mut Ctx::new()).unwrap();
        assert_eq!(typ, nat());
    }

    #[test]
    fn application_of_non_function_fails() {
        let sig = nat_sig();
        let exp = Exp::app(sym("zero"), sym("zero"));
        let result = exp.infer(&sig, &mut Ctx::new());
        assert!(matches!(result, Err(TypeError::NotAFunction { .. })));
    }

    #[test]
    fn unannotated_lambda_is_not_inferable() {
        let sig = nat_sig();
        let exp = Exp::lam("x", Exp::var(0));
        let result = exp.infer(&sig, &mut Ctx::new());
        assert!(matches!(result, Err(TypeError::CannotInferLambda { .. })));
    }

    #[test]
    fn unannotated_lambda_checks_against_a_product() {
        let sig = nat_sig();
        let exp = Exp::lam("x", Exp::var(0));
        exp.check(&sig, &mut Ctx::new(), &Exp::arrow(nat(), nat())).unwrap();
    }

    #[test]
    fn annotated_lambda_infers_a_product() {
        let sig = nat_sig();
        let exp = Exp::lam_ann("x", nat(), Exp::app(sym("succ"), Exp::var(0)));
        let typ = exp.infer(&sig, &mut Ctx::new()).unwrap();
        assert_eq!(typ, Exp::arrow(nat(), nat()));
    }

    #[test]
    fn dependent_vector_cons() {
        let sig = vec_sig();
        // cons zero (succ zero) nil : Vec (succ zero)
        let exp = Exp::app_spine(sym("cons"), [sym("zero"), num(1), sym("nil")]);
        let expected = Exp::app(sym("Vec"), num(1));
        exp.check(&sig, &mut Ctx::new(), &expected).unwrap();
    }

    #[test]
    fn vector_length_mismatch_fails() {
        let sig = vec_sig();
        let exp = Exp::app_spine(sym("cons"), [sym("zero"), num(1), sym("nil")]);
        let expected = Exp::app(sym("Vec"), num(2));
        let result = exp.check(&sig, &mut Ctx::new(), &expected);
        assert!(matches!(result, Err(TypeError::NotConvertible { .. })));
    }

    #[test]
    fn vector_index_reduces_during_checking() {
        let sig = vec_sig();
        // The expected index is left unreduced; conversion closes the gap.
        let exp = Exp::app_spine(sym("cons"), [sym("zero"), num(1), sym("nil")]);
        let expected =
            Exp::app(sym("Vec"), Exp::app_spine(sym("add"), [num(1), num(0)]));
        exp.check(&sig, &mut Ctx::new(), &expected).unwrap();
    }

    #[test]
    fn product_over_nat_is_a_kind() {
        let sig = nat_sig();
        let exp = Exp::arrow(nat(), Exp::typ());
        assert_eq!(exp.infer(&sig, &mut Ctx::new()).unwrap(), Exp::kind());
    }

    #[test]
    fn sort_of_rejects_terms() {
        let sig = nat_sig();
        let result = sort_of(&sig, &mut Ctx::new(), &sym("zero"));
        assert!(matches!(result, Err(TypeError::NotASort { .. })));
    }

    #[test]
    fn hole_outside_rule_is_rejected() {
        let sig = nat_sig();
        let result = Exp::meta(0).infer(&sig, &mut Ctx::new());
        assert!(matches!(result, Err(TypeError::HoleOutsideRule { .. })));
    }
}
