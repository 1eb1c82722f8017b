//! Zod source parser: the inverse of the Zod emitter.
//!
//! Accepts a `const Name = z.object({...})`-shaped declaration. Chained
//! calls like `.optional()`, `.strict()`, `.email()` are modifiers of the
//! preceding builder, not nodes of their own.

use crate::ir::{union_of, Field, IndexSignature, Lit, ObjectTy, Prim, TupleSlot, Ty};
use crate::parse::lexer::{lex, Cursor, Tok};
use crate::parse::{ParseError, Parsed};

pub fn parse_zod(src: &str) -> Result<Parsed, ParseError> {
    parse_inner(src).map_err(ParseError::UnsupportedZodShape)
}

fn parse_inner(src: &str) -> Result<Parsed, String> {
    let toks = lex(src)?;

    // Skip imports and other prologue: first `const` at brace depth 0.
    let mut depth = 0i32;
    let mut start = None;
    for (i, (tok, _)) in toks.iter().enumerate() {
        match tok {
            Tok::LBrace | Tok::LBracket | Tok::LParen => depth += 1,
            Tok::RBrace | Tok::RBracket | Tok::RParen => depth -= 1,
            Tok::Ident(kw) if depth == 0 && kw == "const" => {
                start = Some(i + 1);
                break;
            }
            _ => {}
        }
    }
    let Some(start) = start else {
        return Err("no `const` schema declaration found".to_string());
    };

    let mut c = Cursor::at(toks, start);
    let declared = c.ident()?;

    // Skip an optional type annotation (`: z.ZodType<...>`).
    if c.eat(&Tok::Colon) {
        let mut depth = 0i32;
        loop {
            match c.peek() {
                Some(Tok::Eq) if depth == 0 => break,
                Some(Tok::Lt | Tok::LParen | Tok::LBracket | Tok::LBrace) => depth += 1,
                Some(Tok::Gt | Tok::RParen | Tok::RBracket | Tok::RBrace) => depth -= 1,
                Some(_) => {}
                None => return Err("unterminated type annotation".to_string()),
            }
            c.bump();
        }
    }
    c.expect(Tok::Eq, "`=`")?;

    let (ty, mods) = parse_chain(&mut c)?;
    let ty = mods.apply_standalone(ty);

    let name = declared.strip_suffix("Schema").unwrap_or(&declared).to_string();
    if name.is_empty() {
        return Err("schema declaration has no usable name".to_string());
    }
    Ok(Parsed { ast: ty, name })
}

/// Modifier state accumulated along a builder chain.
#[derive(Debug, Default)]
struct Mods {
    optional: bool,
}

impl Mods {
    /// Outside an object field or tuple slot there is no optionality to
    /// attach; `.optional()` degrades to a union with undefined-ish null.
    fn apply_standalone(self, ty: Ty) -> Ty {
        if self.optional {
            union_of(vec![ty, Ty::Primitive(Prim::Null)])
        } else {
            ty
        }
    }
}

fn parse_chain(c: &mut Cursor) -> Result<(Ty, Mods), String> {
    let mut ty = parse_atom(c)?;
    let mut mods = Mods::default();

    while c.eat(&Tok::Dot) {
        let method = c.ident()?;
        match method.as_str() {
            "optional" => {
                empty_call(c, &method)?;
                mods.optional = true;
            }
            "nullable" => {
                empty_call(c, &method)?;
                ty = union_of(vec![ty, Ty::Primitive(Prim::Null)]);
            }
            "array" => {
                empty_call(c, &method)?;
                ty = Ty::Array(Box::new(ty));
            }
            // Object strictness is an emitter option, not a model property.
            "strict" | "passthrough" | "strip" => empty_call(c, &method)?,
            "catchall" => {
                c.expect(Tok::LParen, "`(` after .catchall")?;
                let (value, _) = parse_chain(c)?;
                c.expect(Tok::RParen, "`)` closing .catchall")?;
                match &mut ty {
                    Ty::Object(obj) => {
                        obj.index = Some(IndexSignature {
                            key: Box::new(Ty::Primitive(Prim::String)),
                            value: Box::new(value),
                        });
                    }
                    _ => return Err(".catchall() on a non-object builder".to_string()),
                }
            }
            // Refinements constrain values, not shapes; accept and drop.
            "email" | "url" | "uuid" | "regex" | "min" | "max" | "length" | "int"
            | "positive" | "negative" | "nonnegative" | "nonempty" | "trim" | "finite"
            | "safe" | "describe" | "default" | "catch" | "brand" | "readonly" => {
                skip_call(c, &method)?;
            }
            other => return Err(format!("unsupported Zod modifier `.{other}(...)`")),
        }
    }
    Ok((ty, mods))
}

fn parse_atom(c: &mut Cursor) -> Result<Ty, String> {
    let head = c.ident()?;
    if head != "z" {
        // A bare identifier is a reference to another schema declaration.
        let name = head.strip_suffix("Schema").unwrap_or(&head).to_string();
        return Ok(Ty::Reference(name));
    }
    c.expect(Tok::Dot, "`.` after `z`")?;
    let builder = c.ident()?;
    c.expect(Tok::LParen, "`(` opening builder arguments")?;

    let ty = match builder.as_str() {
        "string" => Ty::Primitive(Prim::String),
        "number" => Ty::Primitive(Prim::Number),
        "boolean" => Ty::Primitive(Prim::Boolean),
        "null" | "undefined" => Ty::Primitive(Prim::Null),
        "unknown" | "any" => Ty::Primitive(Prim::Unknown),
        "literal" => Ty::Literal(parse_literal_value(c)?),
        "array" => {
            let (item, _) = parse_chain(c)?;
            Ty::Array(Box::new(item))
        }
        "tuple" => parse_tuple_args(c)?,
        "record" => {
            let (first, _) = parse_chain(c)?;
            if c.eat(&Tok::Comma) && c.peek() != Some(&Tok::RParen) {
                let (value, _) = parse_chain(c)?;
                Ty::Record { key: Box::new(first), value: Box::new(value) }
            } else {
                // one-argument form: string keys
                Ty::Record {
                    key: Box::new(Ty::Primitive(Prim::String)),
                    value: Box::new(first),
                }
            }
        }
        "object" => parse_object_args(c)?,
        "union" => {
            c.expect(Tok::LBracket, "`[` of z.union")?;
            let mut members = Vec::new();
            while !c.eat(&Tok::RBracket) {
                let (member, mods) = parse_chain(c)?;
                members.push(mods.apply_standalone(member));
                if !c.eat(&Tok::Comma) {
                    c.expect(Tok::RBracket, "`]` closing z.union")?;
                    break;
                }
            }
            union_of(members)
        }
        "enum" => {
            c.expect(Tok::LBracket, "`[` of z.enum")?;
            let mut values = Vec::new();
            while !c.eat(&Tok::RBracket) {
                match c.bump() {
                    Some(Tok::Str(s)) => values.push(s),
                    other => return Err(format!("z.enum expects string literals, found {other:?}")),
                }
                if !c.eat(&Tok::Comma) {
                    c.expect(Tok::RBracket, "`]` closing z.enum")?;
                    break;
                }
            }
            // Zod itself requires a nonempty enum; a single value is just a
            // literal in the model.
            match values.len() {
                0 => return Err("z.enum requires at least one value".to_string()),
                1 => Ty::Literal(Lit::Str(values.remove(0))),
                _ => Ty::Enum(values),
            }
        }
        "intersection" => {
            let (a, _) = parse_chain(c)?;
            c.expect(Tok::Comma, "`,` between z.intersection arguments")?;
            let (b, _) = parse_chain(c)?;
            // flatten nested folds back into one member list
            let mut members = Vec::new();
            for m in [a, b] {
                match m {
                    Ty::Intersection(inner) => members.extend(inner),
                    other => members.push(other),
                }
            }
            Ty::Intersection(members)
        }
        other => return Err(format!("unsupported Zod builder `z.{other}(...)`")),
    };

    c.eat(&Tok::Comma); // tolerate a trailing comma before `)`
    c.expect(Tok::RParen, "`)` closing builder arguments")?;
    Ok(ty)
}

fn parse_literal_value(c: &mut Cursor) -> Result<Lit, String> {
    match c.bump() {
        Some(Tok::Str(s)) => Ok(Lit::Str(s)),
        Some(Tok::Num(n)) => Ok(Lit::Num(n.into())),
        Some(Tok::Minus) => match c.bump() {
            Some(Tok::Num(n)) => Ok(Lit::Num((-n).into())),
            other => Err(format!("expected number after `-`, found {other:?}")),
        },
        Some(Tok::Ident(w)) if w == "true" => Ok(Lit::Bool(true)),
        Some(Tok::Ident(w)) if w == "false" => Ok(Lit::Bool(false)),
        Some(Tok::Ident(w)) if w == "null" => Ok(Lit::Null),
        other => Err(format!("unsupported z.literal value: {other:?}")),
    }
}

fn parse_tuple_args(c: &mut Cursor) -> Result<Ty, String> {
    c.expect(Tok::LBracket, "`[` of z.tuple")?;
    let mut slots = Vec::new();
    while !c.eat(&Tok::RBracket) {
        let (ty, mods) = parse_chain(c)?;
        slots.push(TupleSlot { ty, optional: mods.optional });
        if !c.eat(&Tok::Comma) {
            c.expect(Tok::RBracket, "`]` closing z.tuple")?;
            break;
        }
    }
    Ok(Ty::Tuple(slots))
}

fn parse_object_args(c: &mut Cursor) -> Result<Ty, String> {
    c.expect(Tok::LBrace, "`{` of z.object")?;
    let mut out = ObjectTy::default();
    while !c.eat(&Tok::RBrace) {
        let name = match c.bump() {
            Some(Tok::Ident(s)) => s,
            Some(Tok::Str(s)) => s,
            other => return Err(format!("expected property name, found {other:?}")),
        };
        c.expect(Tok::Colon, "`:` after property name")?;
        let (ty, mods) = parse_chain(c)?;
        out.fields.insert(name, Field { ty, optional: mods.optional });
        if !c.eat(&Tok::Comma) {
            c.expect(Tok::RBrace, "`}` closing z.object")?;
            break;
        }
    }
    Ok(Ty::Object(out))
}

/// `.method()` with no arguments.
fn empty_call(c: &mut Cursor, method: &str) -> Result<(), String> {
    c.expect(Tok::LParen, "`(`")?;
    c.expect(Tok::RParen, &format!("`)` closing .{method}()"))?;
    Ok(())
}

/// `.method(...)` whose arguments we accept but do not model.
fn skip_call(c: &mut Cursor, method: &str) -> Result<(), String> {
    c.expect(Tok::LParen, "`(`")?;
    let mut depth = 1i32;
    loop {
        match c.bump() {
            Some(Tok::LParen) => depth += 1,
            Some(Tok::RParen) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Some(_) => {}
            None => return Err(format!("unterminated arguments of .{method}(...)")),
        }
    }
}
