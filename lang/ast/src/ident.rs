use std::fmt;

use derivative::Derivative;
use serde_derive::{Deserialize, Serialize};

use modulo_lang_miette_util::codespan::Span;

use crate::traits::HasSpan;

// Module names
//
//

/// The name of a module, i.e. the stem of its source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleName(pub String);

impl ModuleName {
    pub fn from_string(name: &str) -> Self {
        ModuleName(name.to_owned())
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A name which is unique across all loaded modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QName {
    pub module: ModuleName,
    pub name: String,
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

// Local variables (binding site)
//
//

#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct VarBind {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub id: String,
}

impl VarBind {
    pub fn from_string(id: &str) -> Self {
        VarBind { span: None, id: id.to_owned() }
    }
}

impl fmt::Display for VarBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for VarBind {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

// Local variables (bound occurrence)
//
//

#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct VarBound {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub id: String,
}

impl VarBound {
    pub fn from_string(id: &str) -> Self {
        VarBound { span: None, id: id.to_owned() }
    }
}

impl fmt::Display for VarBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for VarBound {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl From<VarBind> for VarBound {
    fn from(var: VarBind) -> Self {
        VarBound { span: var.span, id: var.id }
    }
}

// Global identifiers (binding site)
//
//

#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct IdBind {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: String,
}

impl IdBind {
    pub fn from_string(id: &str) -> Self {
        IdBind { span: None, id: id.to_owned() }
    }
}

impl fmt::Display for IdBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for IdBind {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

// Global identifiers (bound occurrence)
//
//

#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Eq, PartialEq, Hash)]
pub struct IdBound {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: QName,
}

impl IdBound {
    pub fn from_qname(id: QName) -> Self {
        IdBound { span: None, id }
    }
}

impl fmt::Display for IdBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for IdBound {
    fn span(&self) -> Option<Span> {
        self.span
    }
}
