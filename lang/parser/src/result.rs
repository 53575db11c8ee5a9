use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Unrecognized token")]
    #[diagnostic(code("P-001"))]
    InvalidToken {
        #[label]
        span: SourceSpan,
    },
    #[error("Expected {expected}, found {found}")]
    #[diagnostic(code("P-002"))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Unexpected end of file, expected {expected}")]
    #[diagnostic(code("P-003"))]
    UnexpectedEof {
        expected: String,
        #[label]
        span: SourceSpan,
    },
    #[error("Invalid step budget")]
    #[diagnostic(code("P-004"))]
    InvalidBudget {
        #[label]
        span: SourceSpan,
    },
}
