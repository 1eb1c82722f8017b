//! Minimal CLI: infer JSON samples or convert existing declarations.
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use typesmith::{GenerateOptions, SourceKind, Target};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer TypeScript/Zod/JSON Schema types from JSON samples, or convert
/// between those representations
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer a type from one or more JSON documents and emit it
    Infer(InferCmd),
    /// parse an existing declaration and emit it in another representation
    Convert(ConvertCmd),
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// top-level type name (defaults to Root, or for `convert` the parsed
    /// declaration name)
    #[arg(long)]
    name: Option<String>,

    /// output representation
    #[arg(long, short, value_enum, default_value_t = TargetArg::Typescript)]
    target: TargetArg,

    /// append .strict() to every z.object(...) (zod only)
    #[arg(long)]
    strict: bool,

    /// also emit a companion interface and parse wrapper (zod only)
    #[arg(long)]
    include_interface: bool,

    /// number of mock documents to generate (mock only)
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// RNG seed for reproducible mock output (mock only)
    #[arg(long)]
    seed: Option<u64>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InferCmd {
    /// One or more inputs. May be literal paths or quoted glob patterns.
    /// Multiple documents merge into one type with per-key optionality.
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items)
    #[arg(long)]
    json_pointer: Option<String>,

    #[command(flatten)]
    output: OutputSettings,
}

#[derive(Args, Debug)]
struct ConvertCmd {
    /// source file containing the declaration to convert
    #[arg(long, short)]
    input: PathBuf,

    /// source representation
    #[arg(long, value_enum)]
    from: SourceArg,

    #[command(flatten)]
    output: OutputSettings,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum TargetArg {
    Typescript,
    Zod,
    JsonSchema,
    Mock,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SourceArg {
    Typescript,
    Zod,
    JsonSchema,
}

impl From<TargetArg> for Target {
    fn from(t: TargetArg) -> Self {
        match t {
            TargetArg::Typescript => Target::TypeScript,
            TargetArg::Zod => Target::Zod,
            TargetArg::JsonSchema => Target::JsonSchema,
            TargetArg::Mock => Target::Mock,
        }
    }
}

impl From<SourceArg> for SourceKind {
    fn from(s: SourceArg) -> Self {
        match s {
            SourceArg::Typescript => SourceKind::TypeScript,
            SourceArg::Zod => SourceKind::Zod,
            SourceArg::JsonSchema => SourceKind::JsonSchema,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Infer(cmd) => cmd.run(),
            Command::Convert(cmd) => cmd.run(),
        }
    }
}

impl InferCmd {
    fn run(&self) -> Result<()> {
        let paths = resolve_file_path_patterns(&self.input)?;
        let mut docs: Vec<String> = Vec::with_capacity(paths.len());
        for path in &paths {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match &self.json_pointer {
                None => docs.push(source),
                Some(pointer) => {
                    let value: serde_json::Value = serde_json::from_str(&source)
                        .with_context(|| format!("failed to parse {}", path.display()))?;
                    let node = value.pointer(pointer).with_context(|| {
                        format!("JSON pointer {pointer} matched nothing in {}", path.display())
                    })?;
                    docs.push(node.to_string());
                }
            }
        }

        let ast = typesmith::merge_infer(&docs)?;
        self.output.emit(&ast, None)
    }
}

impl ConvertCmd {
    fn run(&self) -> Result<()> {
        let source = std::fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let parsed = typesmith::parse(&source, SourceKind::from(self.from))?;
        self.output.emit(&parsed.ast, Some(&parsed.name))
    }
}

impl OutputSettings {
    fn emit(&self, ast: &typesmith::Ty, fallback_name: Option<&str>) -> Result<()> {
        let name = self.name.as_deref().or(fallback_name).unwrap_or("Root");
        let opts = GenerateOptions {
            strict: self.strict,
            include_interface: self.include_interface,
            count: self.count,
            seed: self.seed,
        };
        let rendered = typesmith::generate(ast, Target::from(self.target), name, &opts);

        match &self.out {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(out, &rendered)
                    .with_context(|| format!("failed to write {}", out.display()))?;
            }
            None => println!("{rendered}"),
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
