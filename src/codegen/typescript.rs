//! TypeScript emitter: IR → `export interface` / `export type` source text.

use crate::codegen::{indent, property_key};
use crate::ir::{ObjectTy, Ty};

/// Emit a top-level declaration. Objects become an `export interface`,
/// everything else an `export type` alias.
pub fn emit(ty: &Ty, name: &str) -> String {
    match ty {
        Ty::Object(obj) => format!("export interface {name} {}\n", object_body(obj, 0)),
        other => format!("export type {name} = {};\n", render(other, 0)),
    }
}

pub(crate) fn render(ty: &Ty, depth: usize) -> String {
    match ty {
        Ty::Primitive(p) => p.keyword().to_string(),
        Ty::Literal(l) => l.json(),
        Ty::Array(item) => {
            let inner = render(item, depth);
            // union-shaped element types need parens: (A | B)[]
            if matches!(**item, Ty::Union(_) | Ty::Intersection(_) | Ty::Enum(_)) {
                format!("({inner})[]")
            } else {
                format!("{inner}[]")
            }
        }
        Ty::Tuple(slots) => {
            let inner = slots
                .iter()
                .map(|s| {
                    let rendered = render(&s.ty, depth);
                    if s.optional {
                        format!("{rendered}?")
                    } else {
                        rendered
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{inner}]")
        }
        Ty::Record { key, value } => {
            format!("Record<{}, {}>", render(key, depth), render(value, depth))
        }
        Ty::Intersection(members) => members
            .iter()
            .map(|m| {
                let rendered = render(m, depth);
                if matches!(m, Ty::Union(_) | Ty::Enum(_)) {
                    format!("({rendered})")
                } else {
                    rendered
                }
            })
            .collect::<Vec<_>>()
            .join(" & "),
        Ty::Reference(name) => name.clone(),
        Ty::Object(obj) => object_body(obj, depth),
        Ty::Union(members) => members
            .iter()
            .map(|m| render(m, depth))
            .collect::<Vec<_>>()
            .join(" | "),
        Ty::Enum(values) => values
            .iter()
            .map(|v| serde_json::Value::from(v.as_str()).to_string())
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

fn object_body(obj: &ObjectTy, depth: usize) -> String {
    if obj.fields.is_empty() && obj.index.is_none() {
        return "{}".to_string();
    }
    let mut out = String::from("{\n");
    let pad = indent(depth + 1);
    for (name, field) in &obj.fields {
        let marker = if field.optional { "?" } else { "" };
        out.push_str(&format!(
            "{pad}{}{marker}: {};\n",
            property_key(name),
            render(&field.ty, depth + 1)
        ));
    }
    if let Some(sig) = &obj.index {
        out.push_str(&format!(
            "{pad}[key: {}]: {};\n",
            render(&sig.key, depth + 1),
            render(&sig.value, depth + 1)
        ));
    }
    out.push_str(&indent(depth));
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{infer_value, merge_samples};
    use crate::ir::{Field, IndexSignature, Lit, Prim, TupleSlot};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn literal_detection_scenario() {
        let samples = vec![json!({"status": "ok"}), json!({"status": "ok"})];
        let ty = merge_samples(&samples);
        assert_eq!(
            emit(&ty, "Data"),
            "export interface Data {\n  status: \"ok\";\n}\n"
        );
    }

    #[test]
    fn optional_and_enum_scenario() {
        let samples = vec![
            json!({"role": "admin"}),
            json!({"role": "user"}),
            json!({"name": "x"}),
        ];
        let ty = merge_samples(&samples);
        assert_eq!(
            emit(&ty, "Data"),
            "export interface Data {\n  role?: \"admin\" | \"user\";\n  name?: string;\n}\n"
        );
    }

    #[test]
    fn nested_objects_indent_by_depth() {
        let ty = infer_value(&json!({"user": {"id": 1}}));
        assert_eq!(
            emit(&ty, "Root"),
            "export interface Root {\n  user: {\n    id: number;\n  };\n}\n"
        );
    }

    #[test]
    fn union_array_elements_are_parenthesized() {
        let ty = Ty::Array(Box::new(Ty::Union(vec![
            Ty::Primitive(Prim::Number),
            Ty::Primitive(Prim::String),
        ])));
        assert_eq!(emit(&ty, "Items"), "export type Items = (number | string)[];\n");
    }

    #[test]
    fn enum_array_elements_are_parenthesized() {
        let ty = infer_value(&json!(["a", "b", "a"]));
        assert_eq!(emit(&ty, "Tags"), "export type Tags = (\"a\" | \"b\")[];\n");
    }

    #[test]
    fn tuples_mark_optional_slots() {
        let ty = Ty::Tuple(vec![
            TupleSlot { ty: Ty::Primitive(Prim::String), optional: false },
            TupleSlot { ty: Ty::Primitive(Prim::Number), optional: true },
        ]);
        assert_eq!(emit(&ty, "Pair"), "export type Pair = [string, number?];\n");
    }

    #[test]
    fn records_references_and_intersections_render_inline() {
        let ty = Ty::Intersection(vec![
            Ty::Reference("Base".into()),
            Ty::Record {
                key: Box::new(Ty::Primitive(Prim::String)),
                value: Box::new(Ty::Primitive(Prim::Number)),
            },
        ]);
        assert_eq!(
            emit(&ty, "Mixed"),
            "export type Mixed = Base & Record<string, number>;\n"
        );
    }

    #[test]
    fn index_signatures_and_quoted_keys() {
        let mut fields = IndexMap::new();
        fields.insert(
            "content-type".to_string(),
            Field { ty: Ty::Primitive(Prim::String), optional: false },
        );
        let ty = Ty::Object(ObjectTy {
            fields,
            index: Some(IndexSignature {
                key: Box::new(Ty::Primitive(Prim::String)),
                value: Box::new(Ty::Primitive(Prim::Unknown)),
            }),
        });
        assert_eq!(
            emit(&ty, "Headers"),
            "export interface Headers {\n  \"content-type\": string;\n  [key: string]: unknown;\n}\n"
        );
    }

    #[test]
    fn non_object_literals_emit_type_aliases() {
        assert_eq!(
            emit(&Ty::Literal(Lit::Num(4.0.into())), "Four"),
            "export type Four = 4;\n"
        );
    }
}
