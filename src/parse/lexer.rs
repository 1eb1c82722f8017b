//! Shared token stream for the TypeScript and Zod source parsers.
//!
//! Both parsers read the same TypeScript surface syntax, so one logos lexer
//! feeds both. Errors are plain strings here; each parser wraps them in its
//! own `ParseError` variant.

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\u{FEFF}]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
pub enum Tok {
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("=>")]
    FatArrow,
    #[token("=")]
    Eq,
    #[token(".")]
    Dot,
    #[token("-")]
    Minus,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Num(f64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unescape(lex.slice()))]
    Str(String),

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| lex.slice().to_string())]
    Ident(String),
}

pub type Spanned = (Tok, Range<usize>);

pub fn lex(src: &str) -> Result<Vec<Spanned>, String> {
    let mut out = Vec::new();
    for (res, span) in Tok::lexer(src).spanned() {
        match res {
            Ok(tok) => out.push((tok, span)),
            Err(()) => {
                let snippet: String = src[span.start..].chars().take(12).collect();
                return Err(format!("unexpected character at offset {}: `{snippet}`", span.start));
            }
        }
    }
    Ok(out)
}

fn unescape(quoted: &str) -> Option<String> {
    let body = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'u' => {
                // \uXXXX only; surrogate pairs are out of scope for type names
                let hex: String = chars.by_ref().take(4).collect();
                let cp = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(cp)?);
            }
            other => out.push(other),
        }
    }
    Some(out)
}

/// Minimal parser cursor over the token stream: peek/bump/expect.
pub struct Cursor {
    toks: Vec<Spanned>,
    pos: usize,
}

impl Cursor {
    pub fn new(toks: Vec<Spanned>) -> Self {
        Self { toks, pos: 0 }
    }

    pub fn at(toks: Vec<Spanned>, pos: usize) -> Self {
        Self { toks, pos }
    }

    pub fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos).map(|(t, _)| t)
    }

    pub fn bump(&mut self) -> Option<Tok> {
        let t = self.toks.get(self.pos).map(|(t, _)| t.clone());
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    pub fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, tok: Tok, what: &str) -> Result<(), String> {
        if self.eat(&tok) {
            Ok(())
        } else {
            Err(format!("expected {what}, found {}", self.describe_here()))
        }
    }

    /// Consume an identifier token and return its text.
    pub fn ident(&mut self) -> Result<String, String> {
        match self.peek() {
            Some(Tok::Ident(_)) => match self.bump() {
                Some(Tok::Ident(s)) => Ok(s),
                _ => unreachable!(),
            },
            _ => Err(format!("expected identifier, found {}", self.describe_here())),
        }
    }

    /// Consume the keyword-spelled identifier `kw` if it is next.
    pub fn eat_kw(&mut self, kw: &str) -> bool {
        if matches!(self.peek(), Some(Tok::Ident(s)) if s == kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn describe_here(&self) -> String {
        match self.toks.get(self.pos) {
            Some((tok, span)) => format!("{tok:?} at offset {}", span.start),
            None => "end of input".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_declaration_tokens() {
        let toks = lex("interface User { id: number; }").unwrap();
        let kinds: Vec<&Tok> = toks.iter().map(|(t, _)| t).collect();
        assert_eq!(kinds[0], &Tok::Ident("interface".into()));
        assert_eq!(kinds[2], &Tok::LBrace);
        assert_eq!(kinds[4], &Tok::Colon);
    }

    #[test]
    fn strings_unescape_and_accept_both_quotes() {
        let toks = lex(r#" "a\"b" 'c\n' "#).unwrap();
        assert_eq!(toks[0].0, Tok::Str("a\"b".into()));
        assert_eq!(toks[1].0, Tok::Str("c\n".into()));
    }

    #[test]
    fn comments_are_skipped() {
        let toks = lex("// line\n/* block ** still */ x").unwrap();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].0, Tok::Ident("x".into()));
    }

    #[test]
    fn bad_input_reports_offset() {
        let err = lex("interface # {}").unwrap_err();
        assert!(err.contains("offset 10"), "{err}");
    }
}
