use modulo_lang_ast as ast;
use modulo_lang_ast::{EvalConfig, EvalStrategy, IdBind, ModuleName, SymbolKind};
use modulo_lang_miette_util::ToMiette;
use modulo_lang_parser::cst;

use crate::result::LoweringError;
use crate::symbol_table::SymbolTable;

use super::{Ctx, HoleTable, Lower};

/// Lower one statement against the current scope. Declarations and
/// requires extend the symbol table, so statements must be lowered in
/// source order.
pub fn lower_stmt(
    stmt: &cst::Stmt,
    table: &mut SymbolTable,
) -> Result<ast::Command, LoweringError> {
    match stmt {
        cst::Stmt::Require { span, module } => {
            let module = ModuleName::from_string(&module.id);
            table.require(module.clone());
            Ok(ast::Command::Require { span: Some(*span), module })
        }
        cst::Stmt::Declare { span, kind, name, typ } => {
            let typ = typ.lower(&mut Ctx::new(table))?;
            let kind = match kind {
                cst::DeclKind::Static => SymbolKind::Static,
                cst::DeclKind::Definable => SymbolKind::Definable,
            };
            table.declare(&name.id);
            Ok(ast::Command::Declare {
                span: Some(*span),
                name: IdBind { span: Some(name.span), id: name.id.clone() },
                typ: Box::new(typ),
                kind,
            })
        }
        cst::Stmt::Rule { span, lhs, rhs } => lower_rule(*span, lhs, rhs, table),
        cst::Stmt::Infer { span, exp } => {
            let exp = exp.lower(&mut Ctx::new(table))?;
            Ok(ast::Command::Infer { span: Some(*span), exp: Box::new(exp) })
        }
        cst::Stmt::Eval { span, strategy, budget, exp } => {
            let exp = exp.lower(&mut Ctx::new(table))?;
            let strategy = match strategy {
                Some(cst::Strategy::Snf) => EvalStrategy::Snf,
                _ => EvalStrategy::Whnf,
            };
            let config = EvalConfig { strategy, budget: *budget };
            Ok(ast::Command::Eval { span: Some(*span), config, exp: Box::new(exp) })
        }
        cst::Stmt::Assert { span, prop, fatal } => match prop {
            cst::Prop::Conv { lhs, rhs } => {
                let lhs = lhs.lower(&mut Ctx::new(table))?;
                let rhs = rhs.lower(&mut Ctx::new(table))?;
                Ok(ast::Command::AssertConv {
                    span: Some(*span),
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    fatal: *fatal,
                })
            }
            cst::Prop::HasType { exp, typ } => {
                let exp = exp.lower(&mut Ctx::new(table))?;
                let typ = typ.lower(&mut Ctx::new(table))?;
                Ok(ast::Command::AssertType {
                    span: Some(*span),
                    exp: Box::new(exp),
                    typ: Box::new(typ),
                    fatal: *fatal,
                })
            }
        },
    }
}

/// Lower a rewrite rule. The left-hand side must be a symbol applied to
/// patterns; its holes are numbered by first occurrence, and the
/// right-hand side may only use holes the left-hand side binds.
fn lower_rule(
    span: modulo_lang_miette_util::codespan::Span,
    lhs: &cst::Exp,
    rhs: &cst::Exp,
    table: &mut SymbolTable,
) -> Result<ast::Command, LoweringError> {
    let (head, args) = cst_spine(lhs);

    // Resolve the head to a symbol reference.
    let head_exp = match head {
        cst::Exp::Name { .. } | cst::Exp::QualifiedName { .. } => {
            head.lower(&mut Ctx::new(table))?
        }
        _ => return Err(LoweringError::RuleHeadNotASymbol { span: head.span().to_miette() }),
    };
    let ast::Exp::Sym(sym) = head_exp else {
        return Err(LoweringError::RuleHeadNotASymbol { span: head.span().to_miette() });
    };

    let mut holes = HoleTable::default();
    let mut lhs_args = Vec::with_capacity(args.len());
    for arg in args {
        let mut ctx = Ctx::with_holes(table, &mut holes);
        lhs_args.push(arg.lower(&mut ctx)?);
    }
    holes.freeze();
    let rhs = {
        let mut ctx = Ctx::with_holes(table, &mut holes);
        rhs.lower(&mut ctx)?
    };

    Ok(ast::Command::Rule(ast::Rule {
        span: Some(span),
        head: sym.name,
        arity: holes.arity(),
        lhs_args,
        rhs,
    }))
}

fn cst_spine(exp: &cst::Exp) -> (&cst::Exp, Vec<&cst::Exp>) {
    let mut head = exp;
    let mut args = Vec::new();
    while let cst::Exp::App { fun, arg, .. } = head {
        args.push(&**arg);
        head = fun;
    }
    args.reverse();
    (head, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modulo_lang_ast::Exp;
    use modulo_lang_parser::parse_module;

    fn lower_all(src: &str) -> Result<Vec<ast::Command>, LoweringError> {
        let stmts = parse_module(src).unwrap();
        let mut table = SymbolTable::new(ModuleName::from_string("test"));
        stmts.iter().map(|stmt| lower_stmt(stmt, &mut table)).collect()
    }

    #[test]
    fn resolves_binders_to_indices() {
        let cmds = lower_all(
            "static Nat : Type.\
             eval (\\f => \\x => f x) .",
        )
        .unwrap();
        let ast::Command::Eval { exp, .. } = &cmds[1] else { panic!("expected eval") };
        let expected = Exp::lam("f", Exp::lam("x", Exp::app(Exp::var(1), Exp::var(0))));
        assert_eq!(**exp, expected);
    }

    #[test]
    fn numbers_holes_by_first_occurrence() {
        let cmds = lower_all(
            "static Nat : Type.\
             static zero : Nat.\
             def add : Nat -> Nat -> Nat.\
             rule add $n $m --> add $m $n.",
        )
        .unwrap();
        let ast::Command::Rule(rule) = &cmds[3] else { panic!("expected rule") };
        assert_eq!(rule.arity, 2);
        assert_eq!(rule.lhs_args, vec![Exp::meta(0), Exp::meta(1)]);
        let expected_rhs =
            Exp::app_spine(Exp::sym("test", "add"), [Exp::meta(1), Exp::meta(0)]);
        assert_eq!(rule.rhs, expected_rhs);
    }

    #[test]
    fn rejects_unbound_rhs_holes() {
        let result = lower_all(
            "static Nat : Type.\
             def f : Nat -> Nat.\
             rule f $x --> $y.",
        );
        assert!(matches!(result, Err(LoweringError::UnboundRhsHole { .. })));
    }

    #[test]
    fn rejects_holes_outside_rules() {
        let result = lower_all("static Nat : Type. infer $x.");
        assert!(matches!(result, Err(LoweringError::HoleOutsideRule { .. })));
    }

    #[test]
    fn rejects_unknown_identifiers() {
        let result = lower_all("infer zero.");
        assert!(matches!(result, Err(LoweringError::UnknownIdentifier { .. })));
    }

    #[test]
    fn rejects_unrequired_modules() {
        let result = lower_all("infer nat.zero.");
        assert!(matches!(result, Err(LoweringError::ModuleNotInScope { .. })));
    }
}
