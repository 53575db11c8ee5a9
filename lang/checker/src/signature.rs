use modulo_lang_ast::*;

use crate::result::RuleError;
use crate::rules;

/// The entry of a single symbol in the signature: its declaration and
/// the rewrite rules attached to it so far. The rule list of a static
/// symbol is always empty.
#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub symbol: Symbol,
    rules: Vec<Rule>,
}

impl SymbolEntry {
    /// The rules attached to this symbol, in the order they were
    /// admitted. This is the order in which the reducer tries them.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// The global symbol table. Symbols are added when a module declares
/// them; their type and kind are fixed at declaration. Rule lists grow
/// monotonically through [Signature::admit_rule], which is gated by the
/// admissibility check.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    symbols: HashMap<QName, SymbolEntry>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &IdBound) -> Result<&SymbolEntry, LookupError> {
        self.symbols.get(&name.id).ok_or_else(|| LookupError::symbol_not_found(name))
    }

    pub fn contains(&self, qname: &QName) -> bool {
        self.symbols.contains_key(qname)
    }

    pub fn rules_of(&self, name: &IdBound) -> Result<&[Rule], LookupError> {
        Ok(self.find(name)?.rules())
    }

    pub fn declare_static(
        &mut self,
        module: ModuleName,
        name: IdBind,
        typ: Box<Exp>,
    ) -> Result<(), LookupError> {
        self.declare(Symbol { span: name.span, name, module, typ, kind: SymbolKind::Static })
    }

    pub fn declare_definable(
        &mut self,
        module: ModuleName,
        name: IdBind,
        typ: Box<Exp>,
    ) -> Result<(), LookupError> {
        self.declare(Symbol { span: name.span, name, module, typ, kind: SymbolKind::Definable })
    }

    pub fn declare(&mut self, symbol: Symbol) -> Result<(), LookupError> {
        let qname = symbol.qname();
        if self.symbols.contains_key(&qname) {
            return Err(LookupError::already_declared(&qname, &symbol.span));
        }
        self.symbols.insert(qname, SymbolEntry { symbol, rules: Vec::new() });
        Ok(())
    }

    /// Admit a rewrite rule: validate the pattern, run the
    /// admissibility check, and only then append the rule to its head
    /// symbol. A rejected rule leaves the signature unchanged.
    pub fn admit_rule(&mut self, rule: Rule) -> Result<(), RuleError> {
        rules::check_rule(self, &rule)?;
        self.attach(rule)?;
        Ok(())
    }

    /// Re-attach a rule that was admitted when its declaring module was
    /// first checked. Used by the object-file loader, which replays
    /// recorded rules without re-running the admissibility check.
    pub fn restore_rule(&mut self, rule: Rule) -> Result<(), LookupError> {
        self.attach(rule)
    }

    fn attach(&mut self, rule: Rule) -> Result<(), LookupError> {
        let entry = self
            .symbols
            .get_mut(&rule.head.id)
            .ok_or_else(|| LookupError::symbol_not_found(&rule.head))?;
        if entry.symbol.kind != SymbolKind::Definable {
            return Err(LookupError::expected_definable(&rule.head));
        }
        entry.rules.push(rule);
        Ok(())
    }

    /// All entries whose symbol is owned by the given module.
    pub fn symbols_of<'a>(&'a self, module: &'a ModuleName) -> impl Iterator<Item = &'a SymbolEntry> + 'a {
        self.symbols.values().filter(move |entry| &entry.symbol.module == module)
    }
}
