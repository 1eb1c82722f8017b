//! Structural inference over raw JSON samples.
//!
//! One value in → its structural type; N values in → the merged type of the
//! shape they all sample, with per-key optionality, literal/enum promotion,
//! and structural-key union deduplication.
//!
//! Design goals:
//! - One slot-resolution routine shared by the multi-document entry point
//!   and the array-of-objects case inside single-document inference.
//! - Deterministic given the sample *set*, except property key order, which
//!   intentionally follows first observation (it shapes generated code).
//! - Never fails on heterogeneous input; it only widens.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde_json::{Map, Value};

use crate::ir::{union_of, Field, Lit, ObjectTy, Prim, Ty};

// ------------------------------- Policy ---------------------------------- //

/// Distinct string values above this widen to plain `string`.
const STRING_ENUM_MAX: usize = 10;

/// Literal promotion needs at least this many identical observations; a key
/// seen once widens to its primitive instead of freezing to one value.
const LITERAL_MIN_OBSERVATIONS: usize = 2;

// ------------------------------- Single ---------------------------------- //

/// Infer the structural type of one JSON value.
pub fn infer_value(v: &Value) -> Ty {
    match v {
        Value::Null => Ty::Primitive(Prim::Null),
        Value::Bool(_) => Ty::Primitive(Prim::Boolean),
        Value::Number(_) => Ty::Primitive(Prim::Number),
        Value::String(_) => Ty::Primitive(Prim::String),
        Value::Array(xs) => infer_array(xs),
        Value::Object(m) => merge_objects(&[m]),
    }
}

fn infer_array(xs: &[Value]) -> Ty {
    if xs.is_empty() {
        return Ty::Array(Box::new(Ty::unknown()));
    }
    let elems: Vec<&Value> = xs.iter().collect();
    Ty::Array(Box::new(resolve_slot(&elems)))
}

// ------------------------------- Merge ----------------------------------- //

/// Merge N independent samples of the same logical shape.
///
/// All-object inputs merge field-wise. Otherwise object samples collapse
/// into one merged branch and the rest are inferred individually; branches
/// are deduplicated by structural key and unioned. Top-level non-object
/// merging performs no literal/enum promotion — that policy belongs to
/// fields and array slots.
pub fn merge_samples(values: &[Value]) -> Ty {
    if values.is_empty() {
        return Ty::Object(ObjectTy::default());
    }
    let objects: Vec<&Map<String, Value>> = values.iter().filter_map(Value::as_object).collect();
    if objects.len() == values.len() {
        return merge_objects(&objects);
    }
    union_of(widen_branches(&values.iter().collect::<Vec<_>>()))
}

/// Field-wise merge: every key enters at the position of the first sample in
/// which it appears; later samples contribute only type and presence.
fn merge_objects(objs: &[&Map<String, Value>]) -> Ty {
    let total = objs.len();
    let mut observed: IndexMap<String, Vec<&Value>> = IndexMap::new();
    for map in objs {
        for (k, v) in map.iter() {
            observed.entry(k.clone()).or_default().push(v);
        }
    }

    let mut fields = IndexMap::with_capacity(observed.len());
    for (key, values) in observed {
        let optional = values.len() < total;
        fields.insert(key, Field { ty: resolve_slot(&values), optional });
    }
    Ty::Object(ObjectTy { fields, index: None })
}

/// Resolve the merged type of one field or array slot from its observed
/// values:
/// - ≥2 observations, all byte-identical scalars → `literal`
/// - all strings, 2..=10 distinct → `enum` in first-seen order
/// - all strings, 11+ distinct → plain `string`
/// - otherwise widen: merge object observations field-wise, infer the rest,
///   deduplicate, union.
fn resolve_slot(values: &[&Value]) -> Ty {
    debug_assert!(!values.is_empty());

    if values.len() >= LITERAL_MIN_OBSERVATIONS {
        if let Some(lit) = scalar_lit(values[0]) {
            if values.iter().all(|v| *v == values[0]) {
                return Ty::Literal(lit);
            }
        }
    }

    if values.iter().all(|v| v.is_string()) {
        let mut distinct: Vec<String> = Vec::new();
        for v in values {
            let s = v.as_str().unwrap_or_default();
            if !distinct.iter().any(|d| d == s) {
                distinct.push(s.to_string());
            }
        }
        return match distinct.len() {
            1 => Ty::Primitive(Prim::String),
            n if n <= STRING_ENUM_MAX => Ty::Enum(distinct),
            _ => {
                tracing::debug!(distinct = distinct.len(), "string slot widened past enum cap");
                Ty::Primitive(Prim::String)
            }
        };
    }

    union_of(widen_branches(values))
}

/// Branch types for a heterogeneous slot, in observation order. All object
/// observations merge into a single branch at the first object's position.
fn widen_branches(values: &[&Value]) -> Vec<Ty> {
    let objects: Vec<&Map<String, Value>> = values.iter().filter_map(|v| v.as_object()).collect();

    let mut branches = Vec::new();
    let mut object_branch_emitted = false;
    for v in values {
        if v.is_object() {
            if !object_branch_emitted {
                branches.push(merge_objects(&objects));
                object_branch_emitted = true;
            }
        } else {
            branches.push(infer_value(v));
        }
    }
    branches
}

fn scalar_lit(v: &Value) -> Option<Lit> {
    match v {
        Value::Null => Some(Lit::Null),
        Value::Bool(b) => Some(Lit::Bool(*b)),
        Value::Number(n) => n.as_f64().map(|f| Lit::Num(OrderedFloat(f))),
        Value::String(s) => Some(Lit::Str(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field<'a>(ty: &'a Ty, name: &str) -> &'a Field {
        match ty {
            Ty::Object(o) => o.fields.get(name).expect("field present"),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn scalars_infer_to_primitives_not_literals() {
        assert_eq!(infer_value(&json!("x")), Ty::Primitive(Prim::String));
        assert_eq!(infer_value(&json!(1)), Ty::Primitive(Prim::Number));
        assert_eq!(infer_value(&json!(true)), Ty::Primitive(Prim::Boolean));
        assert_eq!(infer_value(&json!(null)), Ty::Primitive(Prim::Null));
    }

    #[test]
    fn empty_array_infers_to_array_of_unknown() {
        assert_eq!(
            infer_value(&json!([])),
            Ty::Array(Box::new(Ty::Primitive(Prim::Unknown)))
        );
    }

    #[test]
    fn empty_sample_list_merges_to_empty_object() {
        assert_eq!(merge_samples(&[]), Ty::Object(ObjectTy::default()));
    }

    #[test]
    fn single_sample_object_has_no_optional_fields() {
        let ty = infer_value(&json!({"id": 1, "name": "x"}));
        assert!(!field(&ty, "id").optional);
        assert!(!field(&ty, "name").optional);
        assert_eq!(field(&ty, "name").ty, Ty::Primitive(Prim::String));
    }

    #[test]
    fn optionality_tracks_presence_counts() {
        let samples = vec![json!({"a": 1, "b": 2}), json!({"a": 3})];
        let ty = merge_samples(&samples);
        assert!(!field(&ty, "a").optional);
        assert!(field(&ty, "b").optional);
    }

    #[test]
    fn first_observed_key_order_is_preserved() {
        let samples = vec![json!({"z": 1, "a": 2}), json!({"m": 3, "z": 4})];
        let ty = merge_samples(&samples);
        let Ty::Object(obj) = ty else { panic!("object expected") };
        let keys: Vec<&str> = obj.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn identical_values_promote_to_literal() {
        let samples = vec![json!({"status": "ok"}), json!({"status": "ok"})];
        let ty = merge_samples(&samples);
        assert_eq!(field(&ty, "status").ty, Ty::Literal(Lit::Str("ok".into())));
    }

    #[test]
    fn singleton_observation_widens_to_primitive() {
        // `name` appears once; one observation never freezes to a literal.
        let samples = vec![
            json!({"role": "admin"}),
            json!({"role": "user"}),
            json!({"name": "x"}),
        ];
        let ty = merge_samples(&samples);
        let role = field(&ty, "role");
        assert!(role.optional);
        assert_eq!(role.ty, Ty::Enum(vec!["admin".into(), "user".into()]));
        let name = field(&ty, "name");
        assert!(name.optional);
        assert_eq!(name.ty, Ty::Primitive(Prim::String));
    }

    #[test]
    fn enum_threshold_caps_at_ten_distinct_values() {
        let two: Vec<Value> = (0..2).map(|i| json!({"k": format!("v{i}")})).collect();
        let ten: Vec<Value> = (0..10).map(|i| json!({"k": format!("v{i}")})).collect();
        let eleven: Vec<Value> = (0..11).map(|i| json!({"k": format!("v{i}")})).collect();

        assert!(matches!(&field(&merge_samples(&two), "k").ty, Ty::Enum(vs) if vs.len() == 2));
        assert!(matches!(&field(&merge_samples(&ten), "k").ty, Ty::Enum(vs) if vs.len() == 10));
        assert_eq!(field(&merge_samples(&eleven), "k").ty, Ty::Primitive(Prim::String));
    }

    #[test]
    fn enum_values_keep_first_seen_order() {
        let samples = vec![
            json!({"role": "user"}),
            json!({"role": "admin"}),
            json!({"role": "user"}),
        ];
        let ty = merge_samples(&samples);
        assert_eq!(
            field(&ty, "role").ty,
            Ty::Enum(vec!["user".into(), "admin".into()])
        );
    }

    #[test]
    fn union_members_are_deduplicated() {
        let samples = vec![json!({"a": 1}), json!({"a": "x"}), json!({"a": 1})];
        let ty = merge_samples(&samples);
        assert_eq!(
            field(&ty, "a").ty,
            Ty::Union(vec![Ty::Primitive(Prim::Number), Ty::Primitive(Prim::String)])
        );
    }

    #[test]
    fn array_of_objects_merges_field_wise() {
        let ty = infer_value(&json!([{"id": 1, "tag": "a"}, {"id": 2}]));
        let Ty::Array(item) = ty else { panic!("array expected") };
        let id = field(&item, "id");
        assert!(!id.optional);
        assert_eq!(id.ty, Ty::Primitive(Prim::Number));
        let tag = field(&item, "tag");
        assert!(tag.optional);
        assert_eq!(tag.ty, Ty::Primitive(Prim::String));
    }

    #[test]
    fn object_vs_scalar_field_widens_to_union() {
        let samples = vec![json!({"v": {"x": 1}}), json!({"v": 7})];
        let ty = merge_samples(&samples);
        let Ty::Union(members) = &field(&ty, "v").ty else {
            panic!("union expected")
        };
        assert_eq!(members.len(), 2);
        assert!(members[0].is_object());
        assert_eq!(members[1], Ty::Primitive(Prim::Number));
    }

    #[test]
    fn top_level_scalar_merge_dedups_without_literal_promotion() {
        let same = vec![json!(1), json!(1)];
        assert_eq!(merge_samples(&same), Ty::Primitive(Prim::Number));

        let mixed = vec![json!(1), json!("x"), json!(2)];
        assert_eq!(
            merge_samples(&mixed),
            Ty::Union(vec![Ty::Primitive(Prim::Number), Ty::Primitive(Prim::String)])
        );
    }

    #[test]
    fn merged_type_is_order_independent_up_to_key_order() {
        let a = vec![json!({"a": 1}), json!({"a": "x"})];
        let b = vec![json!({"a": "x"}), json!({"a": 1})];
        let ta = merge_samples(&a);
        let tb = merge_samples(&b);
        // Same member set, opposite first-seen order.
        let Ty::Union(ma) = &field(&ta, "a").ty else { panic!() };
        let Ty::Union(mb) = &field(&tb, "a").ty else { panic!() };
        let mut ka: Vec<String> = ma.iter().map(Ty::structural_key).collect();
        let mut kb: Vec<String> = mb.iter().map(Ty::structural_key).collect();
        ka.sort();
        kb.sort();
        assert_eq!(ka, kb);
    }
}
