pub mod conversion;
pub mod normalizer;
mod result;
pub mod rules;
mod signature;
#[cfg(test)]
pub(crate) mod testutil;
pub mod typechecker;

pub use result::*;
pub use signature::*;
