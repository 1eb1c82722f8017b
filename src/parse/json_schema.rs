//! JSON Schema parser: a structural, non-validating reducer.
//!
//! Keywords are applied in priority order (`$ref`, `const`, `enum`, `allOf`,
//! `oneOf`/`anyOf`, then `type` dispatch). Only malformed JSON is an error;
//! semantically odd schemas degrade to `unknown` so a conversion never dies
//! on somebody else's hand-written schema.

use ordered_float::OrderedFloat;
use serde_json::{Map, Value};

use crate::ir::{union_of, Field, IndexSignature, Lit, ObjectTy, Prim, TupleSlot, Ty};
use crate::parse::{ParseError, Parsed};

pub fn parse_json_schema(src: &str) -> Result<Parsed, ParseError> {
    let doc: Value =
        crate::path_de::from_str_with_path(src).map_err(ParseError::MalformedSchema)?;
    let name = doc
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Root")
        .to_string();
    Ok(Parsed { ast: reduce(&doc), name })
}

/// Reduce one schema node to a type. Never fails; unrecognized shapes widen.
pub fn reduce(schema: &Value) -> Ty {
    let obj = match schema {
        Value::Object(obj) => obj,
        // boolean schemas: `true` accepts anything, `false` accepts nothing;
        // both widen here
        other => {
            tracing::debug!(%other, "non-object schema node widened to unknown");
            return Ty::unknown();
        }
    };

    if let Some(target) = obj.get("$ref").and_then(Value::as_str) {
        let name = target.rsplit('/').next().unwrap_or(target);
        return Ty::Reference(name.to_string());
    }
    if let Some(value) = obj.get("const") {
        return match lit_of(value) {
            Some(lit) => Ty::Literal(lit),
            None => {
                tracing::debug!("non-scalar const widened to unknown");
                Ty::unknown()
            }
        };
    }
    if let Some(values) = obj.get("enum").and_then(Value::as_array) {
        return reduce_enum(values);
    }
    if let Some(members) = obj.get("allOf").and_then(Value::as_array) {
        return Ty::Intersection(members.iter().map(reduce).collect());
    }
    if let Some(members) = obj
        .get("oneOf")
        .or_else(|| obj.get("anyOf"))
        .and_then(Value::as_array)
    {
        return union_of(members.iter().map(reduce).collect());
    }

    match obj.get("type") {
        Some(Value::String(ty)) => reduce_typed(ty, obj),
        // e.g. "type": ["string", "null"]
        Some(Value::Array(types)) => union_of(
            types
                .iter()
                .filter_map(Value::as_str)
                .map(|t| reduce_typed(t, obj))
                .collect(),
        ),
        _ => {
            tracing::debug!("schema node without recognized keywords widened to unknown");
            Ty::unknown()
        }
    }
}

fn reduce_typed(ty: &str, obj: &Map<String, Value>) -> Ty {
    match ty {
        "string" => Ty::Primitive(Prim::String),
        "number" | "integer" => Ty::Primitive(Prim::Number),
        "boolean" => Ty::Primitive(Prim::Boolean),
        "null" => Ty::Primitive(Prim::Null),
        "object" => reduce_object(obj),
        "array" => reduce_array(obj),
        other => {
            tracing::debug!(ty = other, "unrecognized type keyword widened to unknown");
            Ty::unknown()
        }
    }
}

fn reduce_object(obj: &Map<String, Value>) -> Ty {
    let required: Vec<&str> = obj
        .get("required")
        .and_then(Value::as_array)
        .map(|xs| xs.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let additional = obj.get("additionalProperties");
    let index = match additional {
        Some(schema @ Value::Object(_)) => Some(IndexSignature {
            key: Box::new(Ty::Primitive(Prim::String)),
            value: Box::new(reduce(schema)),
        }),
        Some(Value::Bool(true)) => Some(IndexSignature {
            key: Box::new(Ty::Primitive(Prim::String)),
            value: Box::new(Ty::unknown()),
        }),
        _ => None,
    };

    let properties = obj.get("properties").and_then(Value::as_object);
    match properties {
        Some(props) => {
            let mut out = ObjectTy { index, ..ObjectTy::default() };
            for (name, sub) in props {
                out.fields.insert(
                    name.clone(),
                    Field { ty: reduce(sub), optional: !required.contains(&name.as_str()) },
                );
            }
            Ty::Object(out)
        }
        // index-signature-only object → Record
        None => match index {
            Some(sig) => Ty::Record { key: sig.key, value: sig.value },
            None => Ty::Object(ObjectTy::default()),
        },
    }
}

fn reduce_array(obj: &Map<String, Value>) -> Ty {
    let prefix = obj
        .get("prefixItems")
        .and_then(Value::as_array)
        .or_else(|| obj.get("items").and_then(Value::as_array));
    if let Some(items) = prefix {
        // array-form items means a tuple; slots past minItems are optional
        let min = obj
            .get("minItems")
            .and_then(Value::as_u64)
            .unwrap_or(items.len() as u64) as usize;
        let slots = items
            .iter()
            .enumerate()
            .map(|(i, sub)| TupleSlot { ty: reduce(sub), optional: i >= min })
            .collect();
        return Ty::Tuple(slots);
    }
    match obj.get("items") {
        Some(sub) => Ty::Array(Box::new(reduce(sub))),
        None => Ty::Array(Box::new(Ty::unknown())),
    }
}

fn reduce_enum(values: &[Value]) -> Ty {
    if !values.is_empty() && values.iter().all(Value::is_string) {
        let mut strings: Vec<String> = values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        // one allowed value is a literal, not an enum
        if strings.len() == 1 {
            return Ty::Literal(Lit::Str(strings.remove(0)));
        }
        return Ty::Enum(strings);
    }
    // mixed enum: union of scalar literals, anything non-scalar widens
    union_of(
        values
            .iter()
            .map(|v| match lit_of(v) {
                Some(lit) => Ty::Literal(lit),
                None => Ty::unknown(),
            })
            .collect(),
    )
}

fn lit_of(v: &Value) -> Option<Lit> {
    match v {
        Value::Null => Some(Lit::Null),
        Value::Bool(b) => Some(Lit::Bool(*b)),
        Value::Number(n) => n.as_f64().map(|f| Lit::Num(OrderedFloat(f))),
        Value::String(s) => Some(Lit::Str(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}
