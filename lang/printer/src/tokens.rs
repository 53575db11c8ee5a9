// Symbols

pub const ARROW: &str = "->";
pub const FAT_ARROW: &str = "=>";
pub const REWRITE: &str = "-->";
pub const EQUIV: &str = "==";
pub const COLON: &str = ":";
pub const DOT: &str = ".";
pub const BACKSLASH: &str = "\\";
pub const DOLLAR: &str = "$";

// Keywords

pub const TYPE: &str = "Type";
pub const KIND: &str = "Kind";
pub const STATIC: &str = "static";
pub const DEF: &str = "def";
pub const RULE: &str = "rule";
pub const REQUIRE: &str = "require";
pub const INFER: &str = "infer";
pub const EVAL: &str = "eval";
pub const ASSERT: &str = "assert";
pub const CHECK: &str = "check";
pub const WHNF: &str = "whnf";
pub const SNF: &str = "snf";
