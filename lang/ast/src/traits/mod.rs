mod free_vars;
mod has_span;
mod occurs;
mod shift;
mod subst;

pub use free_vars::*;
pub use has_span::*;
pub use occurs::*;
pub use shift::*;
pub use subst::*;
