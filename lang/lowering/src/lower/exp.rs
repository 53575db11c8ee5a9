use modulo_lang_ast as ast;
use modulo_lang_ast::{IdBound, Idx, ModuleName, QName, Shift, VarBind, VarBound};
use modulo_lang_miette_util::ToMiette;
use modulo_lang_parser::cst;

use crate::result::LoweringError;

use super::{Ctx, Lower};

impl Lower for cst::Exp {
    type Target = ast::Exp;

    fn lower(&self, ctx: &mut Ctx) -> Result<Self::Target, LoweringError> {
        match self {
            cst::Exp::Name { span, id } => {
                // Binders shadow symbols, innermost first.
                if let Some(pos) = ctx.binders.iter().rposition(|binder| binder == id) {
                    let idx = ctx.binders.len() - 1 - pos;
                    return Ok(ast::Exp::Variable(ast::Variable {
                        span: Some(*span),
                        idx: Idx(idx),
                        name: VarBound { span: Some(*span), id: id.clone() },
                    }));
                }
                if ctx.symbols.is_declared(id) {
                    return Ok(ast::Exp::Sym(ast::Sym {
                        span: Some(*span),
                        name: IdBound {
                            span: Some(*span),
                            id: QName { module: ctx.symbols.module.clone(), name: id.clone() },
                        },
                    }));
                }
                Err(LoweringError::UnknownIdentifier { name: id.clone(), span: span.to_miette() })
            }
            cst::Exp::QualifiedName { span, module, id } => {
                let module = ModuleName::from_string(module);
                if !ctx.symbols.is_required(&module) {
                    return Err(LoweringError::ModuleNotInScope {
                        module: module.to_string(),
                        span: span.to_miette(),
                    });
                }
                Ok(ast::Exp::Sym(ast::Sym {
                    span: Some(*span),
                    name: IdBound {
                        span: Some(*span),
                        id: QName { module, name: id.clone() },
                    },
                }))
            }
            cst::Exp::Hole { span, id } => match ctx.holes.as_deref_mut() {
                Some(holes) => {
                    let idx = holes.resolve(*span, id)?;
                    Ok(ast::Exp::Meta(ast::Meta {
                        span: Some(*span),
                        idx,
                        name: Some(VarBound { span: Some(*span), id: id.clone() }),
                    }))
                }
                None => Err(LoweringError::HoleOutsideRule {
                    name: id.clone(),
                    span: span.to_miette(),
                }),
            },
            cst::Exp::TypeUniv { span } => {
                Ok(ast::Exp::Sort(ast::Sort { span: Some(*span), univ: ast::Univ::Type }))
            }
            cst::Exp::App { span, fun, arg } => Ok(ast::Exp::App(ast::App {
                span: Some(*span),
                fun: Box::new(fun.lower(ctx)?),
                arg: Box::new(arg.lower(ctx)?),
            })),
            cst::Exp::Lam { span, param, annotation, body } => {
                let annotation = annotation
                    .as_ref()
                    .map(|annotation| annotation.lower(ctx))
                    .transpose()?
                    .map(Box::new);
                let body = ctx.bind(&param.id, |ctx| body.lower(ctx))?;
                Ok(ast::Exp::Lam(ast::Lam {
                    span: Some(*span),
                    param: VarBind { span: Some(param.span), id: param.id.clone() },
                    annotation,
                    body: Box::new(body),
                }))
            }
            cst::Exp::Pi { span, param, domain, body } => {
                let domain = domain.lower(ctx)?;
                let body = ctx.bind(&param.id, |ctx| body.lower(ctx))?;
                Ok(ast::Exp::Pi(ast::Pi {
                    span: Some(*span),
                    param: VarBind { span: Some(param.span), id: param.id.clone() },
                    domain: Box::new(domain),
                    body: Box::new(body),
                }))
            }
            cst::Exp::Arrow { span, domain, codomain } => {
                let domain = domain.lower(ctx)?;
                // The codomain does not mention the bound variable, so
                // it is lowered outside the binder and shifted past it.
                let mut codomain = codomain.lower(ctx)?;
                codomain.shift(1);
                Ok(ast::Exp::Pi(ast::Pi {
                    span: Some(*span),
                    param: VarBind::from_string(""),
                    domain: Box::new(domain),
                    body: Box::new(codomain),
                }))
            }
        }
    }
}
