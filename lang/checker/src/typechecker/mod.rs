pub mod ctx;
mod typecheck;

pub use ctx::Ctx;
pub use typecheck::{sort_of, CheckInfer};
