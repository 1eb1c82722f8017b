//! Code generators: one recursive visitor per target over the shared IR.

pub mod json_schema;
pub mod mock;
pub mod typescript;
pub mod zod;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::Lit;

static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex"));

/// Object property key as emitted in TypeScript/Zod source: bare when it is
/// a valid identifier, JSON-quoted otherwise.
pub(crate) fn property_key(name: &str) -> String {
    if IDENT_RE.is_match(name) {
        name.to_string()
    } else {
        serde_json::Value::from(name).to_string()
    }
}

pub(crate) fn indent(depth: usize) -> String {
    " ".repeat(2 * depth)
}

pub(crate) fn lit_to_value(lit: &Lit) -> serde_json::Value {
    match lit {
        Lit::Str(s) => serde_json::Value::from(s.as_str()),
        Lit::Num(n) => {
            let f = n.0;
            if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                serde_json::Value::from(f as i64)
            } else {
                serde_json::Value::from(f)
            }
        }
        Lit::Bool(b) => serde_json::Value::from(*b),
        Lit::Null => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_keys_quote_non_identifiers() {
        assert_eq!(property_key("userId"), "userId");
        assert_eq!(property_key("$ref"), "$ref");
        assert_eq!(property_key("content-type"), "\"content-type\"");
        assert_eq!(property_key("2fa"), "\"2fa\"");
    }
}
