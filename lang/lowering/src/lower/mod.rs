mod exp;
mod stmt;

pub use stmt::lower_stmt;

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_miette_util::ToMiette;

use crate::result::LoweringError;
use crate::symbol_table::SymbolTable;

/// The pattern holes of the rule currently being lowered. Holes are
/// numbered by first occurrence in the left-hand side; once the table
/// is frozen (for the right-hand side), unknown holes are an error.
#[derive(Debug, Default)]
pub(crate) struct HoleTable {
    names: Vec<String>,
    frozen: bool,
}

impl HoleTable {
    pub(crate) fn resolve(&mut self, span: Span, name: &str) -> Result<usize, LoweringError> {
        if let Some(idx) = self.names.iter().position(|n| n == name) {
            return Ok(idx);
        }
        if self.frozen {
            return Err(LoweringError::UnboundRhsHole {
                name: name.to_owned(),
                span: span.to_miette(),
            });
        }
        self.names.push(name.to_owned());
        Ok(self.names.len() - 1)
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    pub(crate) fn arity(&self) -> usize {
        self.names.len()
    }
}

/// Lowering context: the visible symbols, the stack of binders in
/// scope (innermost last), and the hole table when inside a rule.
pub(crate) struct Ctx<'a> {
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) binders: Vec<String>,
    pub(crate) holes: Option<&'a mut HoleTable>,
}

impl<'a> Ctx<'a> {
    pub(crate) fn new(symbols: &'a SymbolTable) -> Self {
        Ctx { symbols, binders: Vec::new(), holes: None }
    }

    pub(crate) fn with_holes(symbols: &'a SymbolTable, holes: &'a mut HoleTable) -> Self {
        Ctx { symbols, binders: Vec::new(), holes: Some(holes) }
    }

    pub(crate) fn bind<T, F>(&mut self, name: &str, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        self.binders.push(name.to_owned());
        let res = f(self);
        self.binders.pop();
        res
    }
}

pub(crate) trait Lower {
    type Target;

    fn lower(&self, ctx: &mut Ctx) -> Result<Self::Target, LoweringError>;
}
