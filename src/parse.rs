//! Source parsers: TypeScript declarations, Zod schema source, and JSON
//! Schema documents back into the shared IR.
//!
//! Coverage is deliberately the round-trippable subset this engine's own
//! emitters produce (single interface/type-alias/enum declarations,
//! `z.object(...)` chains), not the full languages. Every entry point
//! returns a tagged result; nothing panics past its boundary.

pub mod json_schema;
pub mod lexer;
pub mod typescript;
pub mod zod;

use crate::ir::Ty;

/// A parsed top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub ast: Ty,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Input that must be JSON was not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// TypeScript source has no interface, type alias, or enum at top level
    /// (or the first one found uses syntax outside the supported subset).
    #[error("unsupported declaration: {0}")]
    UnsupportedDeclaration(String),

    /// Zod source does not match the recognized `const Name = z.*` subset.
    #[error("unsupported Zod shape: {0}")]
    UnsupportedZodShape(String),

    /// JSON Schema source failed to parse as JSON. Semantically odd but
    /// well-formed schemas degrade to `unknown` instead of erroring.
    #[error("malformed schema: {0}")]
    MalformedSchema(String),
}
