use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use modulo_lang_ast::*;
use modulo_lang_checker::normalizer::{whnf_with, Fuel, Normalize};
use modulo_lang_checker::typechecker::{sort_of, CheckInfer, Ctx};
use modulo_lang_checker::{conversion, Signature, TypeError};
use modulo_lang_lowering::{lower_stmt, SymbolTable};
use modulo_lang_parser::parse_module;
use modulo_lang_printer::Print;

use crate::fs::{FileSource, FileSystemSource};
use crate::object::{self, ObjectFile, OBJECT_EXT};
use crate::result::{DriverError, Error};

/// Bookkeeping for one loaded module: its direct dependencies, the
/// symbols it declared, and every rule it declared, including rules on
/// symbols owned by other modules. This is the unit of serialisation;
/// replaying it against the signature restores the module.
#[derive(Debug, Clone, Default)]
pub struct ModuleUnit {
    pub deps: Vec<ModuleName>,
    pub symbols: Vec<Symbol>,
    pub rules: Vec<Rule>,
}

/// A database tracking the set of loaded modules and the global
/// signature they populate. Modules are loaded depth-first in
/// `require` order; a membership test on the loading stack detects
/// import cycles. All mutation of the signature goes through the
/// declaration and rule-admission interface of the checker.
pub struct Database {
    source: Box<dyn FileSource>,
    /// Where object files are written and looked up; `None` for
    /// in-memory sources.
    object_dir: Option<PathBuf>,
    /// Source text of each loaded module, for error rendering.
    files: HashMap<ModuleName, String>,
    units: HashMap<ModuleName, ModuleUnit>,
    loaded: HashSet<ModuleName>,
    loading: Vec<ModuleName>,
    sig: Signature,
}

impl Database {
    /// A database reading `.mlo` files from the given directory.
    pub fn from_path<P: AsRef<Path>>(root: P) -> Self {
        Database {
            source: Box::new(FileSystemSource::new(root.as_ref())),
            object_dir: Some(root.as_ref().to_path_buf()),
            files: HashMap::default(),
            units: HashMap::default(),
            loaded: HashSet::default(),
            loading: Vec::new(),
            sig: Signature::new(),
        }
    }

    /// A database over an arbitrary file source, without object files.
    pub fn from_source<S: FileSource + 'static>(source: S) -> Self {
        Database {
            source: Box::new(source),
            object_dir: None,
            files: HashMap::default(),
            units: HashMap::default(),
            loaded: HashSet::default(),
            loading: Vec::new(),
            sig: Signature::new(),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.sig
    }

    pub fn unit(&self, module: &ModuleName) -> Option<&ModuleUnit> {
        self.units.get(module)
    }

    /// Load a module and everything it requires, executing its
    /// directives in order. Returns the outputs of the module's
    /// `infer` and `eval` directives.
    pub fn load_module(&mut self, module: &ModuleName) -> Result<Vec<String>, Error> {
        if self.loaded.contains(module) {
            return Ok(Vec::new());
        }
        if self.loading.contains(module) {
            let mut cycle: Vec<String> =
                self.loading.iter().map(ModuleName::to_string).collect();
            cycle.push(module.to_string());
            return Err(DriverError::ImportCycle { cycle: cycle.join(" -> ") }.into());
        }
        self.loading.push(module.clone());
        let result = self.process_module(module);
        self.loading.pop();
        if result.is_ok() {
            self.loaded.insert(module.clone());
        }
        result
    }

    fn process_module(&mut self, module: &ModuleName) -> Result<Vec<String>, Error> {
        if !self.source.manages(module) {
            // Fall back to a previously compiled object.
            if self.try_load_object(module)? {
                return Ok(Vec::new());
            }
            return Err(DriverError::ModuleNotFound { module: module.to_string() }.into());
        }

        debug!("Checking module {module}");
        let text = self.source.read_to_string(module)?;
        self.files.insert(module.clone(), text.clone());
        let stmts = parse_module(&text)?;

        let mut table = SymbolTable::new(module.clone());
        let mut unit = ModuleUnit::default();
        let mut outputs = Vec::new();
        for stmt in &stmts {
            let command = lower_stmt(stmt, &mut table)?;
            self.execute(module, &mut unit, &mut outputs, command)?;
        }
        self.units.insert(module.clone(), unit);
        Ok(outputs)
    }

    /// Execute one directive against the signature.
    fn execute(
        &mut self,
        module: &ModuleName,
        unit: &mut ModuleUnit,
        outputs: &mut Vec<String>,
        command: Command,
    ) -> Result<(), Error> {
        match command {
            Command::Require { module: dep, .. } => {
                let dep_outputs = self.load_module(&dep)?;
                for line in dep_outputs {
                    info!("{dep}: {line}");
                }
                unit.deps.push(dep);
            }
            Command::Declare { span, name, typ, kind } => {
                sort_of(&self.sig, &mut Ctx::new(), &typ)?;
                let symbol = Symbol { span, name, module: module.clone(), typ, kind };
                match self.sig.declare(symbol.clone()) {
                    Ok(()) => unit.symbols.push(symbol),
                    // Redefinition is a warning; the original
                    // declaration stays in effect.
                    Err(LookupError::AlreadyDeclared { name, .. }) => {
                        warn!("Ignoring redefinition of symbol {name}");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Command::Rule(rule) => {
                self.sig.admit_rule(rule.clone())?;
                unit.rules.push(rule);
            }
            Command::Infer { exp, .. } => {
                let typ = exp.infer(&self.sig, &mut Ctx::new())?;
                let typ = typ.normalize(&self.sig)?;
                outputs.push(format!(
                    "{} : {}",
                    exp.print_to_string(None),
                    typ.print_to_string(None)
                ));
            }
            Command::Eval { config, exp, .. } => {
                // Infer first so that only well-typed terms are reduced.
                exp.infer(&self.sig, &mut Ctx::new())?;
                let mut fuel = match config.budget {
                    Some(steps) => Fuel::limited(steps),
                    None => Fuel::unlimited(),
                };
                let result = match config.strategy {
                    EvalStrategy::Whnf => whnf_with(&self.sig, &exp, &mut fuel),
                    EvalStrategy::Snf => exp.normalize_with(&self.sig, &mut fuel),
                };
                match result {
                    Ok(value) => outputs.push(format!(
                        "{} ▷ {}",
                        exp.print_to_string(None),
                        value.print_to_string(None)
                    )),
                    // Exceeding the step budget is recoverable for eval.
                    Err(TypeError::BudgetExhausted {}) => {
                        warn!(
                            "Evaluation of {} stopped: step budget exhausted",
                            exp.print_to_string(None)
                        );
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Command::AssertConv { lhs, rhs, fatal, .. } => {
                match conversion::convert(&self.sig, &lhs, &rhs) {
                    Ok(()) => {}
                    Err(err) if !fatal => warn!("Check failed: {err}"),
                    Err(err) => return Err(err.into()),
                }
            }
            Command::AssertType { exp, typ, fatal, .. } => {
                let result = sort_of(&self.sig, &mut Ctx::new(), &typ)
                    .and_then(|_| exp.check(&self.sig, &mut Ctx::new(), &typ));
                match result {
                    Ok(()) => {}
                    Err(err) if !fatal => warn!("Check failed: {err}"),
                    Err(err) => return Err(err.into()),
                }
            }
        }
        Ok(())
    }

    // Object files
    //
    //

    fn object_path(&self, module: &ModuleName) -> Option<PathBuf> {
        self.object_dir.as_ref().map(|dir| dir.join(format!("{module}.{OBJECT_EXT}")))
    }

    /// Persist a checked module. Its dependencies, symbols and rules
    /// are written in de Bruijn form; loading the object replays them.
    pub fn write_object(&self, module: &ModuleName) -> Result<PathBuf, Error> {
        let path = self.object_path(module).ok_or(DriverError::NoObjectDir)?;
        let unit = self
            .units
            .get(module)
            .ok_or_else(|| DriverError::ModuleNotFound { module: module.to_string() })?;
        let object = ObjectFile {
            version: crate::object::OBJECT_VERSION,
            module: module.clone(),
            deps: unit.deps.clone(),
            symbols: unit.symbols.clone(),
            rules: unit.rules.clone(),
        };
        object::write(&path, &object)?;
        debug!("Wrote object file {}", path.display());
        Ok(path)
    }

    /// Load a previously compiled module: load its dependencies, then
    /// re-declare its symbols and re-attach its rules. Admissibility is
    /// not re-checked; the rules were validated when the object was
    /// written.
    fn try_load_object(&mut self, module: &ModuleName) -> Result<bool, Error> {
        let Some(path) = self.object_path(module) else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }
        debug!("Loading module {module} from {}", path.display());
        let object = object::read(&path, module)?;
        for dep in &object.deps {
            self.load_module(dep)?;
        }
        for symbol in &object.symbols {
            self.sig.declare(symbol.clone())?;
        }
        for rule in &object.rules {
            self.sig.restore_rule(rule.clone())?;
        }
        self.units.insert(
            module.clone(),
            ModuleUnit { deps: object.deps, symbols: object.symbols, rules: object.rules },
        );
        Ok(true)
    }

    /// Remove all object files next to the sources.
    pub fn clean(&self) -> Result<(), Error> {
        let Some(dir) = &self.object_dir else {
            return Ok(());
        };
        let suffix = format!(".{OBJECT_EXT}");
        for entry in std::fs::read_dir(dir).map_err(DriverError::Io)? {
            let entry = entry.map_err(DriverError::Io)?;
            let name = entry.file_name();
            if name.to_string_lossy().ends_with(&suffix) {
                std::fs::remove_file(entry.path()).map_err(DriverError::Io)?;
            }
        }
        Ok(())
    }

    // Error rendering
    //
    //

    /// Attach the module's source text to an error so that miette can
    /// render labelled snippets.
    pub fn pretty_error(&self, module: &ModuleName, err: Error) -> miette::Report {
        let report = miette::Report::new(err);
        match self.files.get(module) {
            Some(text) => report
                .with_source_code(miette::NamedSource::new(format!("{module}.mlo"), text.clone())),
            None => report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemorySource;

    const NAT: &str = r#"
        static Nat : Type.
        static zero : Nat.
        static succ : Nat -> Nat.
        def add : Nat -> Nat -> Nat.
        rule add $n zero --> $n.
        rule add zero $m --> $m.
        rule add (succ $n) $m --> succ (add $n $m).
    "#;

    fn load(db: &mut Database, module: &str) -> Result<Vec<String>, Error> {
        db.load_module(&ModuleName::from_string(module))
    }

    #[test]
    fn nat_addition_module_checks() {
        let source = InMemorySource::new().insert(
            "nat",
            &format!(
                "{NAT}
                 assert add (succ (succ zero)) (succ zero) == succ (succ (succ zero)).
                 infer add zero.
                 eval snf (add (succ zero) (succ zero)).",
            ),
        );
        let mut db = Database::from_source(source);
        let outputs = load(&mut db, "nat").unwrap();
        assert_eq!(outputs.len(), 2);
        assert!(outputs[0].ends_with(": Nat -> Nat"));
        assert!(outputs[1].ends_with("▷ succ (succ zero)"));
    }

    #[test]
    fn higher_order_identity_rule() {
        let source = InMemorySource::new().insert(
            "idmod",
            &format!(
                "{NAT}
                 def id : (Nat -> Nat) -> Nat -> Nat.
                 rule id (\\x => x) $n --> $n.
                 assert id (\\y => y) (succ (succ zero)) == succ (succ zero).",
            ),
        );
        let mut db = Database::from_source(source);
        load(&mut db, "idmod").unwrap();
    }

    #[test]
    fn failed_assert_aborts_the_module() {
        let source = InMemorySource::new()
            .insert("bad", &format!("{NAT} assert zero == succ zero."));
        let mut db = Database::from_source(source);
        let result = load(&mut db, "bad");
        assert!(matches!(result, Err(Error::Type(TypeError::NotConvertible { .. }))));
    }

    #[test]
    fn non_asserting_check_only_warns() {
        let source = InMemorySource::new()
            .insert("lax", &format!("{NAT} check zero == succ zero. infer zero."));
        let mut db = Database::from_source(source);
        let outputs = load(&mut db, "lax").unwrap();
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn budget_exhaustion_is_recoverable_for_eval() {
        let source = InMemorySource::new().insert(
            "slow",
            &format!("{NAT} eval snf 1 (add (succ (succ zero)) (succ (succ zero))). infer zero."),
        );
        let mut db = Database::from_source(source);
        let outputs = load(&mut db, "slow").unwrap();
        // The eval produced no output, the module still checked.
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn cross_module_rules_are_visible_to_importers() {
        let source = InMemorySource::new()
            .insert("base", "static T : Type. static t0 : T. def f : T -> T.")
            .insert("ext", "require base. rule base.f $x --> $x.")
            .insert(
                "client",
                "require base. require ext. assert base.f base.t0 == base.t0.",
            );
        let mut db = Database::from_source(source);
        load(&mut db, "client").unwrap();
        // The rule declared by ext is recorded in ext's unit, attached
        // to base's symbol.
        let ext = db.unit(&ModuleName::from_string("ext")).unwrap();
        assert_eq!(ext.rules.len(), 1);
        assert!(ext.symbols.is_empty());
    }

    #[test]
    fn import_cycles_are_detected() {
        let source = InMemorySource::new()
            .insert("a", "require b. static A : Type.")
            .insert("b", "require a. static B : Type.");
        let mut db = Database::from_source(source);
        let result = load(&mut db, "a");
        assert!(matches!(result, Err(Error::Driver(DriverError::ImportCycle { .. }))));
    }

    #[test]
    fn symbol_redefinition_is_a_warning() {
        let source = InMemorySource::new()
            .insert("re", "static Nat : Type. static Nat : Type. infer Nat.");
        let mut db = Database::from_source(source);
        let outputs = load(&mut db, "re").unwrap();
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn objects_roundtrip_and_replay_cross_module_rules() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nat.mlo"), NAT).unwrap();
        std::fs::write(
            dir.path().join("ext.mlo"),
            "require nat. def double : nat.Nat -> nat.Nat.
             rule ext.double $n --> nat.add $n $n.",
        )
        .unwrap();

        // First run: check from source and write objects.
        let mut db = Database::from_path(dir.path());
        load(&mut db, "ext").unwrap();
        db.write_object(&ModuleName::from_string("nat")).unwrap();
        db.write_object(&ModuleName::from_string("ext")).unwrap();

        // Second run: the sources are gone, the objects are used.
        std::fs::remove_file(dir.path().join("nat.mlo")).unwrap();
        std::fs::remove_file(dir.path().join("ext.mlo")).unwrap();
        std::fs::write(
            dir.path().join("client.mlo"),
            "require nat. require ext.
             assert ext.double (nat.succ nat.zero) == nat.succ (nat.succ nat.zero).",
        )
        .unwrap();
        let mut db = Database::from_path(dir.path());
        load(&mut db, "client").unwrap();
    }
}
