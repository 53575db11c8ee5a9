use modulo_lang_ast::{HashSet, ModuleName};

/// Tracks what is in scope while a module is lowered, statement by
/// statement: the names the module has declared so far and the modules
/// brought into scope with `require`. Unqualified names resolve to the
/// current module only; foreign symbols must be written qualified.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    pub module: ModuleName,
    declared: HashSet<String>,
    required: HashSet<ModuleName>,
}

impl SymbolTable {
    pub fn new(module: ModuleName) -> Self {
        SymbolTable { module, declared: HashSet::default(), required: HashSet::default() }
    }

    pub fn declare(&mut self, name: &str) {
        self.declared.insert(name.to_owned());
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    pub fn require(&mut self, module: ModuleName) {
        self.required.insert(module);
    }

    pub fn is_required(&self, module: &ModuleName) -> bool {
        *module == self.module || self.required.contains(module)
    }
}
