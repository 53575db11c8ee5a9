mod database;
mod fs;
mod object;
mod render_reports;
mod result;

pub use database::{Database, ModuleUnit};
pub use fs::*;
pub use object::OBJECT_EXT;
pub use render_reports::*;
pub use result::*;
