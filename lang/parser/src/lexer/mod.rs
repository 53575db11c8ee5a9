use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    //
    //
    #[token("require")]
    Require,
    #[token("static")]
    Static,
    #[token("def")]
    Def,
    #[token("rule")]
    Rule,
    #[token("infer")]
    Infer,
    #[token("eval")]
    Eval,
    #[token("assert")]
    Assert,
    #[token("check")]
    Check,
    #[token("whnf")]
    Whnf,
    #[token("snf")]
    Snf,
    #[token("Type")]
    Type,

    // Parens
    //
    //
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // Symbols
    //
    //
    #[token("-->")]
    Rewrite,
    #[token("->")]
    RightArrow,
    #[token("=>")]
    DoubleRightArrow,
    #[token("==")]
    DoubleEq,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("\\")]
    Backslash,

    // Names
    //
    //
    #[regex(r"[a-zA-Zα-ωΑ-Ω_][a-zA-Zα-ωΑ-Ω0-9_]*'*")]
    Name,
    #[regex(r"[a-zA-Zα-ωΑ-Ω_][a-zA-Zα-ωΑ-Ω0-9_]*'*\.[a-zA-Zα-ωΑ-Ω_][a-zA-Zα-ωΑ-Ω0-9_]*'*")]
    QName,
    #[regex(r"\$[a-zA-Zα-ωΑ-Ω_][a-zA-Zα-ωΑ-Ω0-9_]*'*")]
    Hole,

    // Literals
    //
    //
    #[regex(r"0|[1-9][0-9]*")]
    NumLit,

    // Comments and whitespace
    //
    //
    // The first character after `--` must not be `>`, so that the
    // rewrite arrow `-->` still lexes as its own token.
    #[regex(r"--([^>\n\r][^\n\r]*)?")]
    Comment,
    #[regex(r"\s+")]
    Whitespace,
}
