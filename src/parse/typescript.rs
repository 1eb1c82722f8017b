//! TypeScript source parser: the inverse of the TypeScript emitter.
//!
//! Locates the first top-level `interface`, `type` alias, or `enum`
//! declaration and converts its type node into the IR. Generic TypeScript
//! beyond the emitter's output shape is out of scope.

use crate::ir::{union_of, Field, IndexSignature, Lit, ObjectTy, Prim, TupleSlot, Ty};
use crate::parse::lexer::{lex, Cursor, Tok};
use crate::parse::{ParseError, Parsed};

pub fn parse_typescript(src: &str) -> Result<Parsed, ParseError> {
    let toks = lex(src).map_err(ParseError::UnsupportedDeclaration)?;

    // Find the first declaration keyword at brace depth 0.
    let mut depth = 0i32;
    for (i, (tok, _)) in toks.iter().enumerate() {
        match tok {
            Tok::LBrace | Tok::LBracket | Tok::LParen => depth += 1,
            Tok::RBrace | Tok::RBracket | Tok::RParen => depth -= 1,
            Tok::Ident(kw) if depth == 0 => match kw.as_str() {
                "interface" => {
                    return parse_interface(Cursor::at(toks.clone(), i + 1))
                        .map_err(ParseError::UnsupportedDeclaration)
                }
                "type" => {
                    return parse_type_alias(Cursor::at(toks.clone(), i + 1))
                        .map_err(ParseError::UnsupportedDeclaration)
                }
                "enum" => {
                    return parse_enum_decl(Cursor::at(toks.clone(), i + 1))
                        .map_err(ParseError::UnsupportedDeclaration)
                }
                _ => {}
            },
            _ => {}
        }
    }
    Err(ParseError::UnsupportedDeclaration(
        "no interface, type alias, or enum declaration found".to_string(),
    ))
}

fn parse_interface(mut c: Cursor) -> Result<Parsed, String> {
    let name = c.ident()?;
    let mut bases = Vec::new();
    if c.eat_kw("extends") {
        loop {
            bases.push(Ty::Reference(c.ident()?));
            if !c.eat(&Tok::Comma) {
                break;
            }
        }
    }
    c.expect(Tok::LBrace, "`{`")?;
    let body = parse_object_body(&mut c)?;
    let ast = if bases.is_empty() {
        Ty::Object(body)
    } else {
        bases.push(Ty::Object(body));
        Ty::Intersection(bases)
    };
    Ok(Parsed { ast, name })
}

fn parse_type_alias(mut c: Cursor) -> Result<Parsed, String> {
    let name = c.ident()?;
    c.expect(Tok::Eq, "`=`")?;
    let ast = parse_type(&mut c)?;
    Ok(Parsed { ast, name })
}

/// `enum Name { A = "a", B }` → the string-enum model variant. Members
/// without a string initializer contribute their own name.
fn parse_enum_decl(mut c: Cursor) -> Result<Parsed, String> {
    let name = c.ident()?;
    c.expect(Tok::LBrace, "`{`")?;
    let mut values = Vec::new();
    while !c.eat(&Tok::RBrace) {
        let member = c.ident()?;
        if c.eat(&Tok::Eq) {
            match c.bump() {
                Some(Tok::Str(s)) => values.push(s),
                Some(other) => return Err(format!("unsupported enum initializer {other:?}")),
                None => return Err("unterminated enum declaration".to_string()),
            }
        } else {
            values.push(member);
        }
        c.eat(&Tok::Comma);
    }
    // keep the model canonical: no empty or single-value Enum nodes
    let ast = match values.len() {
        0 => return Err("enum declaration has no members".to_string()),
        1 => Ty::Literal(Lit::Str(values.remove(0))),
        _ => Ty::Enum(values),
    };
    Ok(Parsed { ast, name })
}

// ------------------------------ Type grammar ------------------------------ //

fn parse_type(c: &mut Cursor) -> Result<Ty, String> {
    c.eat(&Tok::Pipe); // tolerate a leading `|`
    let mut members = vec![parse_intersection(c)?];
    while c.eat(&Tok::Pipe) {
        members.push(parse_intersection(c)?);
    }
    if members.len() == 1 {
        return Ok(members.remove(0));
    }

    // The emitter renders `enum` as a string-literal union; fold it back so
    // round-tripping is closed over the model.
    let strings: Vec<String> = members
        .iter()
        .filter_map(|m| match m {
            Ty::Literal(Lit::Str(s)) => Some(s.clone()),
            _ => None,
        })
        .collect();
    if strings.len() == members.len() {
        let mut distinct = Vec::new();
        for s in strings {
            if !distinct.contains(&s) {
                distinct.push(s);
            }
        }
        // `"a" | "a"` deduplicates down to a plain literal
        if distinct.len() == 1 {
            return Ok(Ty::Literal(Lit::Str(distinct.remove(0))));
        }
        return Ok(Ty::Enum(distinct));
    }

    Ok(union_of(members))
}

fn parse_intersection(c: &mut Cursor) -> Result<Ty, String> {
    let mut members = vec![parse_postfix(c)?];
    while c.eat(&Tok::Amp) {
        members.push(parse_postfix(c)?);
    }
    if members.len() == 1 {
        Ok(members.remove(0))
    } else {
        Ok(Ty::Intersection(members))
    }
}

fn parse_postfix(c: &mut Cursor) -> Result<Ty, String> {
    let mut ty = parse_primary(c)?;
    while c.eat(&Tok::LBracket) {
        c.expect(Tok::RBracket, "`]` of array suffix")?;
        ty = Ty::Array(Box::new(ty));
    }
    Ok(ty)
}

fn parse_primary(c: &mut Cursor) -> Result<Ty, String> {
    match c.bump() {
        Some(Tok::LParen) => {
            let ty = parse_type(c)?;
            c.expect(Tok::RParen, "`)`")?;
            Ok(ty)
        }
        Some(Tok::LBrace) => Ok(Ty::Object(parse_object_body(c)?)),
        Some(Tok::LBracket) => parse_tuple(c),
        Some(Tok::Str(s)) => Ok(Ty::Literal(Lit::Str(s))),
        Some(Tok::Num(n)) => Ok(Ty::Literal(Lit::Num(n.into()))),
        Some(Tok::Minus) => match c.bump() {
            Some(Tok::Num(n)) => Ok(Ty::Literal(Lit::Num((-n).into()))),
            _ => Err("expected number after `-`".to_string()),
        },
        Some(Tok::Ident(name)) => parse_named(c, name),
        other => Err(format!("unexpected token in type position: {other:?}")),
    }
}

fn parse_named(c: &mut Cursor, name: String) -> Result<Ty, String> {
    match name.as_str() {
        "string" => Ok(Ty::Primitive(Prim::String)),
        "number" => Ok(Ty::Primitive(Prim::Number)),
        "boolean" => Ok(Ty::Primitive(Prim::Boolean)),
        "null" | "undefined" => Ok(Ty::Primitive(Prim::Null)),
        "unknown" | "any" => Ok(Ty::Primitive(Prim::Unknown)),
        "true" => Ok(Ty::Literal(Lit::Bool(true))),
        "false" => Ok(Ty::Literal(Lit::Bool(false))),
        "Record" => {
            c.expect(Tok::Lt, "`<` after Record")?;
            let key = parse_type(c)?;
            c.expect(Tok::Comma, "`,` between Record arguments")?;
            let value = parse_type(c)?;
            c.expect(Tok::Gt, "`>` closing Record")?;
            Ok(Ty::Record { key: Box::new(key), value: Box::new(value) })
        }
        "Array" => {
            c.expect(Tok::Lt, "`<` after Array")?;
            let item = parse_type(c)?;
            c.expect(Tok::Gt, "`>` closing Array")?;
            Ok(Ty::Array(Box::new(item)))
        }
        // Any other name is an opaque reference; generic arguments are
        // skipped, the reference stays by name.
        _ => {
            if c.eat(&Tok::Lt) {
                let mut depth = 1;
                while depth > 0 {
                    match c.bump() {
                        Some(Tok::Lt) => depth += 1,
                        Some(Tok::Gt) => depth -= 1,
                        Some(_) => {}
                        None => return Err(format!("unterminated generic arguments on {name}")),
                    }
                }
            }
            Ok(Ty::Reference(name))
        }
    }
}

fn parse_tuple(c: &mut Cursor) -> Result<Ty, String> {
    let mut slots = Vec::new();
    while !c.eat(&Tok::RBracket) {
        let ty = parse_type(c)?;
        let optional = c.eat(&Tok::Question);
        slots.push(TupleSlot { ty, optional });
        if !c.eat(&Tok::Comma) {
            c.expect(Tok::RBracket, "`]` closing tuple")?;
            break;
        }
    }
    Ok(Ty::Tuple(slots))
}

/// Members of `{ ... }`: named properties with `?` markers plus at most one
/// index signature. The cursor sits just past the opening brace.
fn parse_object_body(c: &mut Cursor) -> Result<ObjectTy, String> {
    let mut out = ObjectTy::default();
    loop {
        if c.eat(&Tok::RBrace) {
            return Ok(out);
        }
        c.eat_kw("readonly");

        if c.eat(&Tok::LBracket) {
            // [key: string]: T
            let _binder = c.ident()?;
            c.expect(Tok::Colon, "`:` in index signature")?;
            let key = parse_type(c)?;
            c.expect(Tok::RBracket, "`]` of index signature")?;
            c.expect(Tok::Colon, "`:` after index signature")?;
            let value = parse_type(c)?;
            out.index = Some(IndexSignature { key: Box::new(key), value: Box::new(value) });
        } else {
            let name = match c.bump() {
                Some(Tok::Ident(s)) => s,
                Some(Tok::Str(s)) => s,
                other => return Err(format!("expected property name, found {other:?}")),
            };
            let optional = c.eat(&Tok::Question);
            c.expect(Tok::Colon, "`:` after property name")?;
            let ty = parse_type(c)?;
            out.fields.insert(name, Field { ty, optional });
        }

        if !c.eat(&Tok::Semi) {
            c.eat(&Tok::Comma);
        }
    }
}
