use miette::Diagnostic;
use thiserror::Error;

use modulo_lang_ast::LookupError;
use modulo_lang_checker::{RuleError, TypeError};
use modulo_lang_lowering::LoweringError;
use modulo_lang_parser::ParseError;

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(transparent)]
#[error(transparent)]
pub enum Error {
    Parser(#[from] ParseError),
    Lowering(#[from] LoweringError),
    Type(#[from] TypeError),
    Rule(#[from] RuleError),
    Lookup(#[from] LookupError),
    Driver(#[from] DriverError),
}

#[derive(Error, Diagnostic, Debug)]
pub enum DriverError {
    #[error("Module {module} not found")]
    #[diagnostic(
        code("D-001"),
        help("Expected a source file {module}.mlo or a compiled object {module}.mlo.o")
    )]
    ModuleNotFound { module: String },
    #[error("Import cycle detected: {cycle}")]
    #[diagnostic(code("D-002"))]
    ImportCycle { cycle: String },
    #[error("Object file for module {module} has an incompatible format")]
    #[diagnostic(code("D-003"), help("Delete the object file and recompile"))]
    StaleObject { module: String },
    #[error("Failed to decode object file for module {module}: {reason}")]
    #[diagnostic(code("D-004"))]
    ObjectCorrupt { module: String, reason: String },
    #[error("This file source does not support object files")]
    #[diagnostic(code("D-005"))]
    NoObjectDir,
    #[error("IO error: {0}")]
    #[diagnostic(code("D-006"))]
    Io(#[from] std::io::Error),
}
