//! typesmith: schema inference and code synthesis for JSON-shaped data.
//!
//! Four components composed around one shared intermediate representation:
//! - [`ir`]: the type model every other component reads and writes
//! - [`inference`]: raw JSON samples → type model
//! - [`parse`]: TypeScript / Zod / JSON Schema source → type model
//! - [`codegen`]: type model → TypeScript / Zod / JSON Schema text or a
//!   synthetic mock value
//!
//! Round-tripping between representations is always "parse with one parser,
//! emit with one generator" through the model; no component knows about any
//! other representation. The whole engine is synchronous and side-effect
//! free; the one randomized piece (mock generation) keeps its counter and
//! RNG in a per-invocation context.

pub mod codegen;
pub mod inference;
pub mod ir;
pub mod parse;
pub mod path_de;

pub use codegen::mock::MockGenerator;
pub use codegen::zod::ZodOptions;
pub use ir::Ty;
pub use parse::{ParseError, Parsed};

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum InferError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

/// Output representation of [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    TypeScript,
    Zod,
    JsonSchema,
    Mock,
}

/// Source representation accepted by [`parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    TypeScript,
    JsonSchema,
    Zod,
}

/// Per-target knobs. `strict`/`include_interface` apply to Zod,
/// `count`/`seed` to mock generation; others ignore them.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub strict: bool,
    pub include_interface: bool,
    pub count: usize,
    pub seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { strict: false, include_interface: false, count: 1, seed: None }
    }
}

/// Infer the type of a single JSON document.
pub fn infer(json: &str) -> Result<Ty, InferError> {
    let value: Value = path_de::from_str_with_path(json).map_err(InferError::InvalidJson)?;
    Ok(inference::infer_value(&value))
}

/// Infer the merged type of several JSON documents sampling one logical
/// shape.
pub fn merge_infer<S: AsRef<str>>(docs: &[S]) -> Result<Ty, InferError> {
    let mut values = Vec::with_capacity(docs.len());
    for doc in docs {
        let value: Value =
            path_de::from_str_with_path(doc.as_ref()).map_err(InferError::InvalidJson)?;
        values.push(value);
    }
    Ok(inference::merge_samples(&values))
}

/// Emit `ast` in the requested representation. Mock output is the generated
/// JSON value pretty-printed; use [`MockGenerator`] directly for the value.
pub fn generate(ast: &Ty, target: Target, name: &str, opts: &GenerateOptions) -> String {
    match target {
        Target::TypeScript => codegen::typescript::emit(ast, name),
        Target::Zod => codegen::zod::emit(
            ast,
            name,
            &ZodOptions { strict: opts.strict, include_interface: opts.include_interface },
        ),
        Target::JsonSchema => codegen::json_schema::emit(ast, name),
        Target::Mock => {
            let mut generator = match opts.seed {
                Some(seed) => MockGenerator::with_seed(seed),
                None => MockGenerator::new(),
            };
            let value = if opts.count > 1 {
                generator.generate_many(ast, opts.count)
            } else {
                generator.generate(ast)
            };
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
    }
}

/// Parse source text in the given representation into `{ ast, name }`.
pub fn parse(source: &str, from: SourceKind) -> Result<Parsed, ParseError> {
    match from {
        SourceKind::TypeScript => parse::typescript::parse_typescript(source),
        SourceKind::JsonSchema => parse::json_schema::parse_json_schema(source),
        SourceKind::Zod => parse::zod::parse_zod(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inference_is_idempotent_through_typescript() {
        let ast = infer(r#"{"id": 1, "tags": ["a", "b", "c"], "meta": {"ok": true}}"#).unwrap();
        let first = generate(&ast, Target::TypeScript, "Data", &GenerateOptions::default());
        let reparsed = parse(&first, SourceKind::TypeScript).unwrap();
        let second = generate(
            &reparsed.ast,
            Target::TypeScript,
            &reparsed.name,
            &GenerateOptions::default(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn round_trip_closure_over_typescript() {
        let docs = [
            r#"{"status": "ok", "role": "admin", "n": 1}"#,
            r#"{"status": "ok", "role": "user"}"#,
            r#"{"status": "ok", "role": "guest", "n": 2}"#,
        ];
        let ast = merge_infer(&docs).unwrap();
        let ts = generate(&ast, Target::TypeScript, "Data", &GenerateOptions::default());
        let back = parse(&ts, SourceKind::TypeScript).unwrap();
        assert_eq!(back.ast.structural_key(), ast.structural_key());
    }

    #[test]
    fn round_trip_closure_over_zod() {
        let docs = [r#"{"id": 1, "tag": "a"}"#, r#"{"id": 2}"#];
        let ast = merge_infer(&docs).unwrap();
        let zod = generate(&ast, Target::Zod, "Data", &GenerateOptions::default());
        let back = parse(&zod, SourceKind::Zod).unwrap();
        assert_eq!(back.ast.structural_key(), ast.structural_key());
        assert_eq!(back.name, "Data");
    }

    #[test]
    fn round_trip_closure_over_json_schema() {
        let docs = [r#"{"id": 1, "role": "admin"}"#, r#"{"id": 2, "role": "user"}"#];
        let ast = merge_infer(&docs).unwrap();
        let schema = generate(&ast, Target::JsonSchema, "Data", &GenerateOptions::default());
        let back = parse(&schema, SourceKind::JsonSchema).unwrap();
        assert_eq!(back.ast.structural_key(), ast.structural_key());
        assert_eq!(back.name, "Data");
    }

    #[test]
    fn typescript_to_zod_and_back() {
        let ts = "export interface User {\n  id: number;\n  name?: string;\n}\n";
        let parsed = parse(ts, SourceKind::TypeScript).unwrap();
        let zod = generate(&parsed.ast, Target::Zod, &parsed.name, &GenerateOptions::default());
        let back = parse(&zod, SourceKind::Zod).unwrap();
        let ts_again =
            generate(&back.ast, Target::TypeScript, &back.name, &GenerateOptions::default());
        assert_eq!(ts, ts_again);
    }

    #[test]
    fn invalid_json_reports_path_context() {
        let err = infer(r#"{"a": [1, }"#).unwrap_err();
        let InferError::InvalidJson(msg) = err;
        assert!(msg.contains("a"), "{msg}");
    }

    #[test]
    fn seeded_mock_generation_is_stable() {
        let ast = infer(r#"{"id": 1, "email": "a@b.c"}"#).unwrap();
        let opts = GenerateOptions { seed: Some(42), ..GenerateOptions::default() };
        assert_eq!(
            generate(&ast, Target::Mock, "Data", &opts),
            generate(&ast, Target::Mock, "Data", &opts)
        );
    }

    #[test]
    fn mock_count_produces_an_array() {
        let ast = infer(r#"{"id": 1}"#).unwrap();
        let opts = GenerateOptions { count: 3, seed: Some(7), ..GenerateOptions::default() };
        let out: serde_json::Value =
            serde_json::from_str(&generate(&ast, Target::Mock, "Data", &opts)).unwrap();
        assert_eq!(out.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn dangling_references_pass_through_every_generator() {
        let parsed = parse("type Wrapper = Inner[];", SourceKind::TypeScript).unwrap();
        let opts = GenerateOptions::default();
        assert_eq!(
            generate(&parsed.ast, Target::TypeScript, "Wrapper", &opts),
            "export type Wrapper = Inner[];\n"
        );
        assert!(generate(&parsed.ast, Target::Zod, "Wrapper", &opts).contains("InnerSchema"));
        assert!(generate(&parsed.ast, Target::JsonSchema, "Wrapper", &opts)
            .contains("#/definitions/Inner"));
        let mock = generate(
            &parsed.ast,
            Target::Mock,
            "Wrapper",
            &GenerateOptions { seed: Some(1), ..opts },
        );
        assert!(mock.contains("\"id\""));
    }
}
