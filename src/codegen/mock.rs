//! Mock data generator: walks the IR and produces a synthetic JSON value.
//!
//! Unlike the text emitters this one is intentionally randomized. Both the
//! readability counter and the random source live in the generator context,
//! owned per invocation, so concurrent callers never share state. Seed the
//! generator to make output reproducible.

use serde_json::{Map, Value};

use crate::codegen::lit_to_value;
use crate::ir::{Lit, ObjectTy, Prim, Ty};

/// Probability that an optional object field is left out.
const OPTIONAL_SKIP: f64 = 0.3;

pub struct MockGenerator {
    counter: u64,
    rng: SplitMix64,
}

impl MockGenerator {
    /// Non-deterministic seed (wall clock). Use [`MockGenerator::with_seed`]
    /// for reproducible output.
    pub fn new() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED);
        Self::with_seed(nanos)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { counter: 0, rng: SplitMix64(seed) }
    }

    /// One synthetic value. The counter resets per top-level call so the
    /// first string in every document is suffixed `1`.
    pub fn generate(&mut self, ty: &Ty) -> Value {
        self.counter = 0;
        self.value_of(ty, None)
    }

    /// `count` values from one top-level call; the counter keeps increasing
    /// across elements so rows stay tellable apart.
    pub fn generate_many(&mut self, ty: &Ty, count: usize) -> Value {
        self.counter = 0;
        Value::Array((0..count).map(|_| self.value_of(ty, None)).collect())
    }

    fn value_of(&mut self, ty: &Ty, key_hint: Option<&str>) -> Value {
        match ty {
            Ty::Primitive(Prim::String) => Value::from(self.placeholder_string(key_hint)),
            Ty::Primitive(Prim::Number) => Value::from(self.rng.below(1000) as i64),
            Ty::Primitive(Prim::Boolean) => Value::from(self.rng.chance(0.5)),
            Ty::Primitive(Prim::Null) => Value::Null,
            Ty::Primitive(Prim::Unknown) => Value::Null,
            Ty::Literal(Lit::Null) => Value::Null,
            Ty::Literal(l) => lit_to_value(l),
            Ty::Array(item) => {
                let len = 1 + self.rng.below(3) as usize;
                Value::Array((0..len).map(|_| self.value_of(item, key_hint)).collect())
            }
            Ty::Tuple(slots) => {
                let mut out = Vec::with_capacity(slots.len());
                for slot in slots {
                    // Optional slots form a tail; stop at the first one skipped.
                    if slot.optional && self.rng.chance(OPTIONAL_SKIP) {
                        break;
                    }
                    out.push(self.value_of(&slot.ty, None));
                }
                Value::Array(out)
            }
            Ty::Record { value, .. } => {
                let mut out = Map::new();
                for _ in 0..2 {
                    let key = format!("key{}", self.next());
                    let v = self.value_of(value, None);
                    out.insert(key, v);
                }
                Value::Object(out)
            }
            Ty::Intersection(members) => {
                // Structural AND: merged object when every member yields one.
                let mut merged = Map::new();
                for m in members {
                    match self.value_of(m, key_hint) {
                        Value::Object(o) => merged.extend(o),
                        other => return other,
                    }
                }
                Value::Object(merged)
            }
            // Cannot see other declarations; a stand-in keeps output valid JSON.
            Ty::Reference(_) => {
                let id = self.next();
                Value::Object(Map::from_iter([("id".to_string(), Value::from(id))]))
            }
            Ty::Object(obj) => self.object_of(obj),
            Ty::Union(members) => {
                let pick = self.rng.below(members.len() as u64) as usize;
                self.value_of(&members[pick], key_hint)
            }
            Ty::Enum(values) => {
                let pick = self.rng.below(values.len() as u64) as usize;
                Value::from(values[pick].as_str())
            }
        }
    }

    fn object_of(&mut self, obj: &ObjectTy) -> Value {
        let mut out = Map::new();
        for (name, field) in &obj.fields {
            if field.optional && self.rng.chance(OPTIONAL_SKIP) {
                continue;
            }
            let v = self.value_of(&field.ty, Some(name));
            out.insert(name.clone(), v);
        }
        if let Some(sig) = &obj.index {
            let key = format!("extra{}", self.next());
            let v = self.value_of(&sig.value, None);
            out.insert(key, v);
        }
        Value::Object(out)
    }

    fn placeholder_string(&mut self, key_hint: Option<&str>) -> String {
        let n = self.next();
        match key_hint.map(str::to_ascii_lowercase) {
            Some(h) if h.contains("email") => format!("user{n}@example.com"),
            Some(h) if h.contains("name") => format!("Name {n}"),
            Some(h) => format!("{h}{n}"),
            None => format!("string{n}"),
        }
    }

    fn next(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// SplitMix64. Tiny, seedable, good enough for placeholder data; nothing in
/// this crate needs cryptographic randomness.
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }

    fn chance(&mut self, p: f64) -> bool {
        (self.next_u64() as f64 / u64::MAX as f64) < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::merge_samples;
    use crate::ir::Field;
    use indexmap::IndexMap;
    use serde_json::json;

    #[test]
    fn seeded_generation_is_reproducible() {
        let ty = merge_samples(&[json!({"id": 1, "tag": "a"}), json!({"id": 2})]);
        let a = MockGenerator::with_seed(42).generate(&ty);
        let b = MockGenerator::with_seed(42).generate(&ty);
        assert_eq!(a, b);
    }

    #[test]
    fn counter_resets_per_top_level_call() {
        let ty = Ty::Primitive(Prim::String);
        let mut g = MockGenerator::with_seed(7);
        assert_eq!(g.generate(&ty), json!("string1"));
        assert_eq!(g.generate(&ty), json!("string1"));
    }

    #[test]
    fn literals_and_enums_stay_in_range() {
        let mut g = MockGenerator::with_seed(1);
        assert_eq!(g.generate(&Ty::Literal(Lit::Str("ok".into()))), json!("ok"));
        let e = Ty::Enum(vec!["a".into(), "b".into()]);
        for _ in 0..20 {
            let v = g.generate(&e);
            assert!(v == json!("a") || v == json!("b"));
        }
    }

    #[test]
    fn field_name_hints_shape_placeholders() {
        let mut fields = IndexMap::new();
        fields.insert("email".to_string(), Field { ty: Ty::Primitive(Prim::String), optional: false });
        fields.insert("userName".to_string(), Field { ty: Ty::Primitive(Prim::String), optional: false });
        let ty = Ty::Object(ObjectTy { fields, index: None });
        let v = MockGenerator::with_seed(3).generate(&ty);
        assert_eq!(v["email"], json!("user1@example.com"));
        assert_eq!(v["userName"], json!("Name 2"));
    }

    #[test]
    fn required_fields_always_present_optional_sometimes_absent() {
        let ty = merge_samples(&[json!({"id": 1, "tag": "a"}), json!({"id": 2})]);
        let mut g = MockGenerator::with_seed(11);
        let mut saw_missing_tag = false;
        for _ in 0..50 {
            let v = g.generate(&ty);
            assert!(v.get("id").is_some());
            if v.get("tag").is_none() {
                saw_missing_tag = true;
            }
        }
        assert!(saw_missing_tag);
    }

    #[test]
    fn references_produce_id_stand_ins() {
        let v = MockGenerator::with_seed(5).generate(&Ty::Reference("User".into()));
        assert_eq!(v, json!({"id": 1}));
    }

    #[test]
    fn generate_many_wraps_in_array_with_running_counter() {
        let ty = Ty::Primitive(Prim::String);
        let v = MockGenerator::with_seed(9).generate_many(&ty, 3);
        assert_eq!(v, json!(["string1", "string2", "string3"]));
    }
}
