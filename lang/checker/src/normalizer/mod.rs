pub mod matcher;
pub mod normalize;
pub mod whnf;

pub use normalize::Normalize;
pub use whnf::{whnf, whnf_with, Fuel};
