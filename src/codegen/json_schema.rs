//! JSON Schema (Draft-07) emitter.

use serde_json::{json, Map, Value};

use crate::codegen::lit_to_value;
use crate::ir::{Prim, Ty};

const DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Emit a pretty-printed schema document with the `$schema` + `title`
/// envelope at the top level.
pub fn emit(ty: &Ty, name: &str) -> String {
    let mut doc = Map::new();
    doc.insert("$schema".into(), Value::from(DRAFT));
    doc.insert("title".into(), Value::from(name));
    if let Value::Object(body) = schema_value(ty) {
        for (k, v) in body {
            doc.insert(k, v);
        }
    }
    serde_json::to_string_pretty(&Value::Object(doc)).unwrap_or_default()
}

/// Schema body for one type. `unknown` maps to the empty schema `{}`.
pub fn schema_value(ty: &Ty) -> Value {
    match ty {
        Ty::Primitive(Prim::Unknown) => json!({}),
        Ty::Primitive(p) => json!({ "type": p.keyword() }),
        Ty::Literal(l) => json!({ "const": lit_to_value(l) }),
        Ty::Array(item) => json!({ "type": "array", "items": schema_value(item) }),
        Ty::Tuple(slots) => {
            let required = slots.iter().take_while(|s| !s.optional).count() as u64;
            json!({
                "type": "array",
                "prefixItems": slots.iter().map(|s| schema_value(&s.ty)).collect::<Vec<_>>(),
                "minItems": required,
                "maxItems": slots.len() as u64,
            })
        }
        Ty::Record { value, .. } => {
            json!({ "type": "object", "additionalProperties": schema_value(value) })
        }
        Ty::Intersection(members) => {
            json!({ "allOf": members.iter().map(schema_value).collect::<Vec<_>>() })
        }
        Ty::Reference(name) => json!({ "$ref": format!("#/definitions/{name}") }),
        Ty::Object(obj) => {
            let mut props = Map::new();
            let mut required: Vec<Value> = Vec::new();
            for (k, f) in &obj.fields {
                props.insert(k.clone(), schema_value(&f.ty));
                if !f.optional {
                    required.push(Value::from(k.as_str()));
                }
            }
            let mut o = Map::new();
            o.insert("type".into(), Value::from("object"));
            o.insert("properties".into(), Value::Object(props));
            if !required.is_empty() {
                o.insert("required".into(), Value::Array(required));
            }
            match &obj.index {
                Some(sig) => {
                    o.insert("additionalProperties".into(), schema_value(&sig.value));
                }
                None => {
                    o.insert("additionalProperties".into(), Value::Bool(false));
                }
            }
            Value::Object(o)
        }
        Ty::Union(members) => {
            json!({ "oneOf": members.iter().map(schema_value).collect::<Vec<_>>() })
        }
        Ty::Enum(values) => json!({
            "type": "string",
            "enum": values.iter().map(|v| Value::from(v.as_str())).collect::<Vec<_>>(),
        }),
    }
}
