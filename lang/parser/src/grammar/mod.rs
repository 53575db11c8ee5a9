//! A recursive-descent parser for the statement and expression grammar.
//!
//! ```text
//! stmt  := "require" NAME "."
//!        | ("static" | "def") NAME ":" exp "."
//!        | "rule" exp "-->" exp "."
//!        | "infer" exp "."
//!        | "eval" ("whnf" | "snf")? NUM? exp "."
//!        | ("assert" | "check") exp (("==" exp) | (":" exp)) "."
//! exp   := "\" NAME (":" exp)? "=>" exp
//!        | "(" NAME ":" exp ")" "->" exp
//!        | app ("->" exp)?
//! app   := atom+
//! atom  := "Type" | NAME | QNAME | HOLE | "(" exp ")"
//! ```

use logos::Logos;

use modulo_lang_miette_util::codespan::Span;
use modulo_lang_miette_util::ToMiette;

use crate::cst::*;
use crate::lexer::Token;
use crate::result::ParseError;

#[derive(Debug, Clone)]
struct Tok {
    token: Token,
    span: Span,
    text: String,
}

/// Parse the statements of a source module.
pub fn parse_module(src: &str) -> Result<Vec<Stmt>, ParseError> {
    let mut tokens = Vec::new();
    for (result, range) in Token::lexer(src).spanned() {
        let span = Span::from(range.clone());
        match result {
            Ok(Token::Whitespace) | Ok(Token::Comment) => continue,
            Ok(token) => tokens.push(Tok { token, span, text: src[range].to_owned() }),
            Err(()) => return Err(ParseError::InvalidToken { span: span.to_miette() }),
        }
    }
    let eof = Span::from(src.len()..src.len());
    Parser { tokens, pos: 0, eof }.module()
}

struct Parser {
    tokens: Vec<Tok>,
    pos: usize,
    eof: Span,
}

fn unexpected(expected: &str, tok: &Tok) -> ParseError {
    ParseError::UnexpectedToken {
        expected: expected.to_owned(),
        found: format!("`{}`", tok.text),
        span: tok.span.to_miette(),
    }
}

impl Parser {
    fn module(mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while self.peek().is_some() {
            stmts.push(self.stmt()?);
        }
        Ok(stmts)
    }

    // Token helpers
    //
    //

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + n)
    }

    fn at(&self, token: Token) -> bool {
        matches!(self.peek(), Some(tok) if tok.token == token)
    }

    fn next(&mut self, expected: &str) -> Result<Tok, ParseError> {
        match self.tokens.get(self.pos) {
            Some(tok) => {
                self.pos += 1;
                Ok(tok.clone())
            }
            None => Err(ParseError::UnexpectedEof {
                expected: expected.to_owned(),
                span: self.eof.to_miette(),
            }),
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<Tok, ParseError> {
        let tok = self.next(expected)?;
        if tok.token == token { Ok(tok) } else { Err(unexpected(expected, &tok)) }
    }

    fn ident(&mut self) -> Result<Ident, ParseError> {
        let tok = self.expect(Token::Name, "a name")?;
        Ok(Ident { span: tok.span, id: tok.text })
    }

    // Statements
    //
    //

    fn stmt(&mut self) -> Result<Stmt, ParseError> {
        let tok = self.next("a statement")?;
        match tok.token {
            Token::Require => {
                let module = self.ident()?;
                let end = self.expect(Token::Dot, "`.`")?;
                Ok(Stmt::Require { span: tok.span.to(end.span), module })
            }
            Token::Static | Token::Def => {
                let kind = match tok.token {
                    Token::Static => DeclKind::Static,
                    _ => DeclKind::Definable,
                };
                let name = self.ident()?;
                self.expect(Token::Colon, "`:`")?;
                let typ = self.exp()?;
                let end = self.expect(Token::Dot, "`.`")?;
                Ok(Stmt::Declare { span: tok.span.to(end.span), kind, name, typ })
            }
            Token::Rule => {
                let lhs = self.exp()?;
                self.expect(Token::Rewrite, "`-->`")?;
                let rhs = self.exp()?;
                let end = self.expect(Token::Dot, "`.`")?;
                Ok(Stmt::Rule { span: tok.span.to(end.span), lhs, rhs })
            }
            Token::Infer => {
                let exp = self.exp()?;
                let end = self.expect(Token::Dot, "`.`")?;
                Ok(Stmt::Infer { span: tok.span.to(end.span), exp })
            }
            Token::Eval => {
                let strategy = if self.at(Token::Whnf) {
                    self.pos += 1;
                    Some(Strategy::Whnf)
                } else if self.at(Token::Snf) {
                    self.pos += 1;
                    Some(Strategy::Snf)
                } else {
                    None
                };
                let budget = if self.at(Token::NumLit) {
                    let tok = self.next("a step budget")?;
                    let n = tok
                        .text
                        .parse::<usize>()
                        .map_err(|_| ParseError::InvalidBudget { span: tok.span.to_miette() })?;
                    Some(n)
                } else {
                    None
                };
                let exp = self.exp()?;
                let end = self.expect(Token::Dot, "`.`")?;
                Ok(Stmt::Eval { span: tok.span.to(end.span), strategy, budget, exp })
            }
            Token::Assert | Token::Check => {
                let fatal = tok.token == Token::Assert;
                let lhs = self.exp()?;
                let sep = self.next("`==` or `:`")?;
                let prop = match sep.token {
                    Token::DoubleEq => Prop::Conv { lhs, rhs: self.exp()? },
                    Token::Colon => Prop::HasType { exp: lhs, typ: self.exp()? },
                    _ => return Err(unexpected("`==` or `:`", &sep)),
                };
                let end = self.expect(Token::Dot, "`.`")?;
                Ok(Stmt::Assert { span: tok.span.to(end.span), prop, fatal })
            }
            _ => Err(unexpected("a statement", &tok)),
        }
    }

    // Expressions
    //
    //

    fn exp(&mut self) -> Result<Exp, ParseError> {
        if self.at(Token::Backslash) {
            return self.lam();
        }
        self.pi_or_arrow()
    }

    fn lam(&mut self) -> Result<Exp, ParseError> {
        let start = self.expect(Token::Backslash, "`\\`")?;
        let param = self.ident()?;
        let annotation = if self.at(Token::Colon) {
            self.pos += 1;
            Some(Box::new(self.exp()?))
        } else {
            None
        };
        self.expect(Token::DoubleRightArrow, "`=>`")?;
        let body = self.exp()?;
        let span = start.span.to(body.span());
        Ok(Exp::Lam { span, param, annotation, body: Box::new(body) })
    }

    fn pi_or_arrow(&mut self) -> Result<Exp, ParseError> {
        // A dependent binder requires two tokens of lookahead to
        // distinguish `(x : A) -> B` from a parenthesized expression.
        if self.at(Token::LParen)
            && matches!(self.peek_nth(1), Some(tok) if tok.token == Token::Name)
            && matches!(self.peek_nth(2), Some(tok) if tok.token == Token::Colon)
        {
            let start = self.next("`(`")?;
            let param = self.ident()?;
            self.expect(Token::Colon, "`:`")?;
            let domain = self.exp()?;
            self.expect(Token::RParen, "`)`")?;
            self.expect(Token::RightArrow, "`->`")?;
            let body = self.exp()?;
            let span = start.span.to(body.span());
            return Ok(Exp::Pi {
                span,
                param,
                domain: Box::new(domain),
                body: Box::new(body),
            });
        }
        let domain = self.app_exp()?;
        if self.at(Token::RightArrow) {
            self.pos += 1;
            let codomain = self.exp()?;
            let span = domain.span().to(codomain.span());
            Ok(Exp::Arrow { span, domain: Box::new(domain), codomain: Box::new(codomain) })
        } else {
            Ok(domain)
        }
    }

    fn app_exp(&mut self) -> Result<Exp, ParseError> {
        let mut exp = self.atom()?;
        while self.peek_starts_atom() {
            let arg = self.atom()?;
            let span = exp.span().to(arg.span());
            exp = Exp::App { span, fun: Box::new(exp), arg: Box::new(arg) };
        }
        Ok(exp)
    }

    fn peek_starts_atom(&self) -> bool {
        matches!(
            self.peek(),
            Some(tok) if matches!(
                tok.token,
                Token::Name | Token::QName | Token::Hole | Token::Type | Token::LParen
            )
        )
    }

    fn atom(&mut self) -> Result<Exp, ParseError> {
        let tok = self.next("an expression")?;
        match tok.token {
            Token::Name => Ok(Exp::Name { span: tok.span, id: tok.text }),
            Token::QName => {
                let (module, id) = tok
                    .text
                    .split_once('.')
                    .expect("qualified name without a dot");
                Ok(Exp::QualifiedName {
                    span: tok.span,
                    module: module.to_owned(),
                    id: id.to_owned(),
                })
            }
            Token::Hole => Ok(Exp::Hole { span: tok.span, id: tok.text[1..].to_owned() }),
            Token::Type => Ok(Exp::TypeUniv { span: tok.span }),
            Token::LParen => {
                let exp = self.exp()?;
                self.expect(Token::RParen, "`)`")?;
                Ok(exp)
            }
            _ => Err(unexpected("an expression", &tok)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declarations_and_rules() {
        let src = r#"
            -- Peano naturals
            static Nat : Type.
            static zero : Nat.
            static succ : Nat -> Nat.
            def add : Nat -> Nat -> Nat.
            rule add $n zero --> $n.
            rule add (succ $n) $m --> succ (add $n $m).
        "#;
        let stmts = parse_module(src).unwrap();
        assert_eq!(stmts.len(), 6);
        assert!(matches!(&stmts[0], Stmt::Declare { kind: DeclKind::Static, .. }));
        assert!(matches!(&stmts[3], Stmt::Declare { kind: DeclKind::Definable, .. }));
        assert!(matches!(&stmts[4], Stmt::Rule { .. }));
    }

    #[test]
    fn parses_directives() {
        let src = r#"
            require nat.
            infer nat.zero.
            eval snf 100 (nat.add nat.zero nat.zero).
            assert nat.zero : nat.Nat.
            check nat.zero == nat.zero.
        "#;
        let stmts = parse_module(src).unwrap();
        assert_eq!(stmts.len(), 5);
        assert!(matches!(&stmts[1], Stmt::Infer { .. }));
        assert!(matches!(
            &stmts[2],
            Stmt::Eval { strategy: Some(Strategy::Snf), budget: Some(100), .. }
        ));
        assert!(matches!(&stmts[3], Stmt::Assert { prop: Prop::HasType { .. }, fatal: true }));
        assert!(matches!(&stmts[4], Stmt::Assert { prop: Prop::Conv { .. }, fatal: false }));
    }

    #[test]
    fn parses_binders() {
        let src = r#"
            static Vec : Nat -> Type.
            static cons : (n : Nat) -> Nat -> Vec n -> Vec (succ n).
            eval (\x : Nat => x) zero.
        "#;
        let stmts = parse_module(src).unwrap();
        assert_eq!(stmts.len(), 3);
        let Stmt::Declare { typ, .. } = &stmts[1] else { panic!("expected declaration") };
        assert!(matches!(typ, Exp::Pi { .. }));
    }

    #[test]
    fn rejects_unterminated_statement() {
        assert!(matches!(
            parse_module("static Nat : Type"),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!(matches!(parse_module("static Nat ; Type."), Err(ParseError::InvalidToken { .. })));
    }
}
