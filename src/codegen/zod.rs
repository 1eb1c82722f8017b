//! Zod emitter: IR → `z.*` builder chains.

use crate::codegen::{indent, property_key, typescript};
use crate::ir::{Lit, ObjectTy, Prim, Ty};

#[derive(Debug, Clone, Copy, Default)]
pub struct ZodOptions {
    /// Append `.strict()` to every `z.object(...)` call.
    pub strict: bool,
    /// Also emit a companion TypeScript interface and a `parse<Name>` wrapper.
    pub include_interface: bool,
}

pub fn emit(ty: &Ty, name: &str, opts: &ZodOptions) -> String {
    let mut out = String::from("import { z } from \"zod\";\n\n");
    out.push_str(&format!(
        "export const {name}Schema = {};\n",
        render(ty, 0, opts)
    ));
    if opts.include_interface {
        out.push('\n');
        out.push_str(&typescript::emit(ty, name));
        out.push_str(&format!(
            "\nexport function parse{name}(data: unknown): {name} {{\n  return {name}Schema.parse(data);\n}}\n"
        ));
    }
    out
}

fn render(ty: &Ty, depth: usize, opts: &ZodOptions) -> String {
    match ty {
        Ty::Primitive(p) => match p {
            Prim::String => "z.string()".to_string(),
            Prim::Number => "z.number()".to_string(),
            Prim::Boolean => "z.boolean()".to_string(),
            Prim::Null => "z.null()".to_string(),
            Prim::Unknown => "z.unknown()".to_string(),
        },
        Ty::Literal(Lit::Null) => "z.null()".to_string(),
        Ty::Literal(l) => format!("z.literal({})", l.json()),
        Ty::Array(item) => format!("z.array({})", render(item, depth, opts)),
        Ty::Tuple(slots) => {
            let inner = slots
                .iter()
                .map(|s| {
                    let rendered = render(&s.ty, depth, opts);
                    if s.optional {
                        format!("{rendered}.optional()")
                    } else {
                        rendered
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("z.tuple([{inner}])")
        }
        Ty::Record { key, value } => format!(
            "z.record({}, {})",
            render(key, depth, opts),
            render(value, depth, opts)
        ),
        Ty::Intersection(members) => members
            .iter()
            .map(|m| render(m, depth, opts))
            .reduce(|a, b| format!("z.intersection({a}, {b})"))
            .unwrap_or_else(|| "z.unknown()".to_string()),
        Ty::Reference(name) => format!("{name}Schema"),
        Ty::Object(obj) => object_chain(obj, depth, opts),
        Ty::Union(members) => {
            // A union of string literals reads better (and validates the
            // same) as z.enum([...]).
            let strings: Vec<&str> = members
                .iter()
                .filter_map(|m| match m {
                    Ty::Literal(Lit::Str(s)) => Some(s.as_str()),
                    _ => None,
                })
                .collect();
            if strings.len() == members.len() && members.len() > 1 {
                return format!("z.enum([{}])", quote_all(&strings));
            }
            let inner = members
                .iter()
                .map(|m| render(m, depth, opts))
                .collect::<Vec<_>>()
                .join(", ");
            format!("z.union([{inner}])")
        }
        Ty::Enum(values) => {
            let strings: Vec<&str> = values.iter().map(String::as_str).collect();
            format!("z.enum([{}])", quote_all(&strings))
        }
    }
}

fn object_chain(obj: &ObjectTy, depth: usize, opts: &ZodOptions) -> String {
    let mut out = String::new();
    if obj.fields.is_empty() {
        out.push_str("z.object({})");
    } else {
        out.push_str("z.object({\n");
        let pad = indent(depth + 1);
        for (name, field) in &obj.fields {
            let rendered = render(&field.ty, depth + 1, opts);
            let suffix = if field.optional { ".optional()" } else { "" };
            out.push_str(&format!("{pad}{}: {rendered}{suffix},\n", property_key(name)));
        }
        out.push_str(&indent(depth));
        out.push_str("})");
    }
    if let Some(sig) = &obj.index {
        out.push_str(&format!(".catchall({})", render(&sig.value, depth, opts)));
    }
    // .strict() and .catchall() are mutually exclusive in Zod; the index
    // signature wins.
    if opts.strict && obj.index.is_none() {
        out.push_str(".strict()");
    }
    out
}

fn quote_all(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| serde_json::Value::from(*v).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
