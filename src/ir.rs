// Strongly-typed IR shared by inference, parsers, and codegen. No serde_json::Value here.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

/// JSON scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prim {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
}

/// A single allowed value. Numbers are kept as `OrderedFloat` so literals
/// stay `Eq`-comparable for structural keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Str(String),
    Num(OrderedFloat<f64>),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    Primitive(Prim),
    Literal(Lit),
    /// Homogeneous (or merged-homogeneous) list.
    Array(Box<Ty>),
    /// Fixed-length heterogeneous list.
    Tuple(Vec<TupleSlot>),
    /// Index-signature-only object (`Record<K, V>`).
    Record { key: Box<Ty>, value: Box<Ty> },
    /// Structural AND of member types.
    Intersection(Vec<Ty>),
    /// Named forward reference to another declaration. Never resolved here;
    /// dangling references are legal at the model level.
    Reference(String),
    Object(ObjectTy),
    /// Structural OR; members are kept deduplicated by structural key.
    Union(Vec<Ty>),
    /// Closed set of string values.
    Enum(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleSlot {
    pub ty: Ty,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: Ty,
    pub optional: bool, // present in fewer than all merged samples
}

/// Named fields in first-observed key order, plus an optional index signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectTy {
    pub fields: IndexMap<String, Field>,
    pub index: Option<IndexSignature>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignature {
    pub key: Box<Ty>,
    pub value: Box<Ty>,
}

impl Ty {
    pub fn unknown() -> Self {
        Ty::Primitive(Prim::Unknown)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Ty::Object(_))
    }

    /// Canonical string encoding used for union deduplication and merge
    /// equality checks. Two types with equal keys are interchangeable.
    ///
    /// Compatibility note: the `object` encoding covers property *names*
    /// only (sorted), not their types. Two objects that share field names
    /// but differ in field types compare equal here and collapse to one
    /// branch during union deduplication. Kept to match the original
    /// generator's output; see DESIGN.md.
    pub fn structural_key(&self) -> String {
        match self {
            Ty::Primitive(p) => format!("primitive:{}", p.keyword()),
            Ty::Literal(l) => format!("literal:{}", l.json()),
            Ty::Array(item) => format!("array:{}", item.structural_key()),
            Ty::Tuple(slots) => {
                let inner = slots
                    .iter()
                    .map(|s| {
                        let mut k = s.ty.structural_key();
                        if s.optional {
                            k.push('?');
                        }
                        k
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                format!("tuple:{inner}")
            }
            Ty::Record { key, value } => {
                format!("record:{},{}", key.structural_key(), value.structural_key())
            }
            Ty::Intersection(members) => {
                let inner = members
                    .iter()
                    .map(Ty::structural_key)
                    .collect::<Vec<_>>()
                    .join("&");
                format!("intersection:{inner}")
            }
            Ty::Reference(name) => format!("reference:{name}"),
            Ty::Object(obj) => {
                let mut names: Vec<&str> = obj.fields.keys().map(String::as_str).collect();
                names.sort_unstable();
                format!("object:{}", names.join(","))
            }
            Ty::Union(members) => {
                let inner = members
                    .iter()
                    .map(Ty::structural_key)
                    .collect::<Vec<_>>()
                    .join("|");
                format!("union:{inner}")
            }
            Ty::Enum(values) => format!("enum:{}", values.join(",")),
        }
    }
}

impl Prim {
    pub fn keyword(&self) -> &'static str {
        match self {
            Prim::String => "string",
            Prim::Number => "number",
            Prim::Boolean => "boolean",
            Prim::Null => "null",
            Prim::Unknown => "unknown",
        }
    }
}

impl Lit {
    /// JSON text of the literal value. Fractionless numbers print in
    /// integer form so codegen stays stable across samples like `4` vs `4.0`.
    pub fn json(&self) -> String {
        match self {
            Lit::Str(s) => serde_json::Value::from(s.as_str()).to_string(),
            Lit::Num(n) => fmt_number(n.0),
            Lit::Bool(b) => b.to_string(),
            Lit::Null => "null".to_string(),
        }
    }
}

/// Prefer emitting integers when exact.
pub fn fmt_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Drop structural duplicates, keeping first-seen order.
pub fn dedup_by_key(members: Vec<Ty>) -> Vec<Ty> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::with_capacity(members.len());
    for m in members {
        let key = m.structural_key();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(m);
        }
    }
    out
}

/// Wrap deduplicated branches: zero → unknown, one → itself, else a union.
pub fn union_of(members: Vec<Ty>) -> Ty {
    let mut members = dedup_by_key(members);
    match members.len() {
        0 => Ty::unknown(),
        1 => members.remove(0),
        _ => Ty::Union(members),
    }
}
