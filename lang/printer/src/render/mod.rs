mod plain;
mod termcolor;

pub use plain::PlainWriter;
pub use termcolor::ColorWriter;
