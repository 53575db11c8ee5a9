pub mod decls;
pub mod exp;

pub use decls::*;
pub use exp::*;
