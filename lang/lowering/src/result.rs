use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum LoweringError {
    #[error("Unknown identifier {name}")]
    #[diagnostic(code("L-001"), help("Symbols from other modules must be written qualified: m.{name}"))]
    UnknownIdentifier {
        name: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Module {module} is not in scope")]
    #[diagnostic(code("L-002"), help("Add `require {module}.` before the first use"))]
    ModuleNotInScope {
        module: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Pattern hole ${name} outside of a rewrite rule")]
    #[diagnostic(code("L-003"))]
    HoleOutsideRule {
        name: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Pattern hole ${name} does not occur in the left-hand side")]
    #[diagnostic(code("L-004"))]
    UnboundRhsHole {
        name: String,
        #[label]
        span: SourceSpan,
    },
    #[error("The left-hand side of a rule must be a symbol applied to patterns")]
    #[diagnostic(code("L-005"))]
    RuleHeadNotASymbol {
        #[label]
        span: SourceSpan,
    },
}
