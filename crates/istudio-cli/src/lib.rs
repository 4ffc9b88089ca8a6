#![deny(unsafe_code)]
//! # istudio-cli
//!
//! The `istudio` driver binary.
//!
//! Wires the pipeline crates together behind a `clap` interface:
//! lexing, parsing, semantic checking, IR dumps, and code generation,
//! plus the stdio language server.

pub mod error;

use clap::{Parser, Subcommand, ValueEnum};
use istudio_backends::{BackendRegistry, CppBackend, RustBackend, TargetProfile};
use istudio_front::{
    dump_ast_json, dump_ast_text, lex, parse_module, report_unknown_tokens, AstContext,
    AstDumpOptions, LexerConfig,
};
use istudio_ir::{lower_module, print_module, IrModule};
use istudio_lsp::{Server, ServerOptions};
use istudio_opt::{ConstantFoldingPass, PassManager};
use istudio_sem::{analyze_module, Analysis};
use istudio_support::{Diagnostic, DiagnosticReporter};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use error::{CliError, CliResult};

/// IStudio compiler driver.
#[derive(Parser)]
#[command(name = "istudio")]
#[command(about = "IStudio Compiler", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Lex a source file and list its tokens
    Tokens {
        /// Source file to lex
        file: PathBuf,
    },

    /// Parse a source file and dump the AST
    Parse {
        /// Source file to parse
        file: PathBuf,

        /// Dump format
        #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
        format: DumpFormat,

        /// Omit node ids from the dump
        #[arg(long)]
        no_ids: bool,

        /// Omit source spans from the dump
        #[arg(long)]
        no_spans: bool,
    },

    /// Run semantic analysis and report diagnostics
    Check {
        /// Source file to check
        file: PathBuf,

        /// Diagnostic format
        #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
        format: DumpFormat,
    },

    /// Lower a source file and print its IR
    Ir {
        /// Source file to lower
        file: PathBuf,

        /// Skip constant folding
        #[arg(long)]
        no_fold: bool,
    },

    /// Compile a source file for a target language
    Compile {
        /// Source file to compile
        file: PathBuf,

        /// Code generation target
        #[arg(long, value_enum)]
        target: Target,

        /// Directory to write generated files into; stdout when absent
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Serve the language server on stdin/stdout
    Lsp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Cpp,
    Rust,
}

impl Target {
    fn name(self) -> &'static str {
        match self {
            Target::Cpp => "cpp",
            Target::Rust => "rust",
        }
    }
}

/// Executes the parsed command line, writing command output to `out`.
///
/// Returns the process exit code.
pub fn run(cli: Cli, out: &mut impl Write) -> CliResult<i32> {
    match cli.command {
        Commands::Tokens { file } => cmd_tokens(&file, out),
        Commands::Parse {
            file,
            format,
            no_ids,
            no_spans,
        } => cmd_parse(&file, format, no_ids, no_spans, out),
        Commands::Check { file, format } => cmd_check(&file, format, out),
        Commands::Ir { file, no_fold } => cmd_ir(&file, no_fold, out),
        Commands::Compile { file, target, out: out_dir } => {
            cmd_compile(&file, target, out_dir.as_deref(), out)
        }
        Commands::Lsp => cmd_lsp(),
    }
}

fn read_source(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// The module name: the `module` header when present, else the file stem.
fn module_name(ast: &AstContext, root: istudio_front::NodeId, path: &Path) -> String {
    let declared = &ast.node(root).value;
    if !declared.is_empty() {
        return declared.clone();
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "module".to_string())
}

fn cmd_tokens(file: &Path, out: &mut impl Write) -> CliResult<i32> {
    let source = read_source(file)?;
    let stream = lex(&source, LexerConfig::default());
    for token in &stream.tokens {
        writeln!(out, "{} {:?} {}", token.kind, token.lexeme, token.span)?;
    }
    Ok(0)
}

fn cmd_parse(
    file: &Path,
    format: DumpFormat,
    no_ids: bool,
    no_spans: bool,
    out: &mut impl Write,
) -> CliResult<i32> {
    let source = read_source(file)?;
    let stream = lex(&source, LexerConfig::default());
    let mut context = AstContext::new();
    let root = parse_module(&stream, &mut context)?;

    let options = AstDumpOptions {
        include_ids: !no_ids,
        include_spans: !no_spans,
    };
    match format {
        DumpFormat::Text => write!(out, "{}", dump_ast_text(&context, root, &options))?,
        DumpFormat::Json => writeln!(out, "{}", dump_ast_json(&context, root, &options)?)?,
    }
    Ok(0)
}

fn cmd_check(file: &Path, format: DumpFormat, out: &mut impl Write) -> CliResult<i32> {
    let source = read_source(file)?;
    let (_, _, analysis, lex_diagnostics) = analyze_source(&source)?;

    let mut all: Vec<Diagnostic> = lex_diagnostics;
    all.extend(analysis.diagnostics.iter().cloned());

    match format {
        DumpFormat::Text => {
            for diagnostic in &all {
                writeln!(out, "{diagnostic}")?;
            }
        }
        DumpFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&all)?)?,
    }

    if all.iter().any(|d| d.code.is_error()) {
        return Ok(1);
    }
    writeln!(out, "no problems found")?;
    Ok(0)
}

fn cmd_ir(file: &Path, no_fold: bool, out: &mut impl Write) -> CliResult<i32> {
    let source = read_source(file)?;
    let module = build_module(&source, file, !no_fold)?;
    write!(out, "{}", print_module(&module))?;
    Ok(0)
}

fn cmd_compile(
    file: &Path,
    target: Target,
    out_dir: Option<&Path>,
    out: &mut impl Write,
) -> CliResult<i32> {
    let source = read_source(file)?;
    let module = build_module(&source, file, true)?;

    let mut registry = BackendRegistry::new();
    registry.register(Box::new(CppBackend::default()));
    registry.register(Box::new(RustBackend::default()));

    let profile = TargetProfile::new(target.name(), istudio_support::version());
    let files = registry.emit(target.name(), &module, &profile)?;

    match out_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|source| CliError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
            for file in &files {
                let path = dir.join(&file.path);
                fs::write(&path, &file.contents).map_err(|source| CliError::Write {
                    path: path.clone(),
                    source,
                })?;
                writeln!(out, "wrote {}", path.display())?;
            }
        }
        None => {
            for file in &files {
                writeln!(out, "// ==> {}", file.path)?;
                write!(out, "{}", file.contents)?;
            }
        }
    }
    Ok(0)
}

fn cmd_lsp() -> CliResult<i32> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut server = Server::new(ServerOptions::default());
    let code = server.run(&mut stdin.lock(), &mut stdout.lock())?;
    Ok(code)
}

type AnalyzedSource = (AstContext, istudio_front::NodeId, Analysis, Vec<Diagnostic>);

fn analyze_source(source: &str) -> CliResult<AnalyzedSource> {
    let stream = lex(source, LexerConfig::default());
    let mut reporter = DiagnosticReporter::new();
    report_unknown_tokens(&stream, &mut reporter);

    let mut context = AstContext::new();
    let root = parse_module(&stream, &mut context)?;
    let analysis = analyze_module(&context, root)?;
    Ok((context, root, analysis, reporter.into_diagnostics()))
}

/// The full pipeline up to an (optionally folded) IR module.
fn build_module(source: &str, path: &Path, fold: bool) -> CliResult<IrModule> {
    let (context, root, analysis, _) = analyze_source(source)?;
    let name = module_name(&context, root, path);
    let mut module = lower_module(&context, &analysis, name)?;

    if fold {
        let mut passes = PassManager::new();
        passes.add_pass(Box::new(ConstantFoldingPass::default()));
        passes.run(&mut module);
    }
    debug!(module = module.name(), "pipeline finished");
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const MATH_SOURCE: &str = "\
module math_basics;

fn add(a, b) {
    return a + b;
}

fn triple(value) {
    let doubled = add(value, value);
    return doubled + value;
}

let sample = add(1, 2);
";

    fn source_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn run_command(command: Commands) -> (i32, String) {
        let cli = Cli {
            verbose: false,
            command,
        };
        let mut out = Vec::new();
        let code = run(cli, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn tokens_lists_kind_lexeme_and_span() {
        let file = source_file("let x = 42;");
        let (code, output) = run_command(Commands::Tokens {
            file: file.path().to_path_buf(),
        });
        assert_eq!(code, 0);
        assert!(output.contains("Keyword \"let\" [0, 3)"));
        assert!(output.contains("Identifier \"x\" [4, 5)"));
        assert!(output.contains("Number \"42\" [8, 10)"));
    }

    #[test]
    fn parse_dumps_text_by_default() {
        let file = source_file(MATH_SOURCE);
        let (code, output) = run_command(Commands::Parse {
            file: file.path().to_path_buf(),
            format: DumpFormat::Text,
            no_ids: false,
            no_spans: false,
        });
        assert_eq!(code, 0);
        assert!(output.contains("Module#0"));
        assert!(output.contains("Function"));
    }

    #[test]
    fn parse_dumps_json_on_request() {
        let file = source_file(MATH_SOURCE);
        let (code, output) = run_command(Commands::Parse {
            file: file.path().to_path_buf(),
            format: DumpFormat::Json,
            no_ids: true,
            no_spans: true,
        });
        assert_eq!(code, 0);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["kind"], "Module");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn check_passes_clean_sources() {
        let file = source_file(MATH_SOURCE);
        let (code, output) = run_command(Commands::Check {
            file: file.path().to_path_buf(),
            format: DumpFormat::Text,
        });
        assert_eq!(code, 0);
        assert!(output.contains("no problems found"));
    }

    #[test]
    fn check_exits_one_on_diagnostics() {
        let file = source_file("fn f() {\n    return missing;\n}\n");
        let (code, output) = run_command(Commands::Check {
            file: file.path().to_path_buf(),
            format: DumpFormat::Text,
        });
        assert_eq!(code, 1);
        assert!(output.contains("use of undeclared symbol 'missing'"));
    }

    #[test]
    fn ir_folds_constants_by_default() {
        let file = source_file("module demo;\n\nfn two() {\n    return 1 + 1;\n}\n");
        let (code, output) = run_command(Commands::Ir {
            file: file.path().to_path_buf(),
            no_fold: false,
        });
        assert_eq!(code, 0);
        assert!(output.contains("function two {"));
        assert!(output.contains("= const 2;"));
    }

    #[test]
    fn ir_no_fold_keeps_the_add() {
        let file = source_file("module demo;\n\nfn two() {\n    return 1 + 1;\n}\n");
        let (code, output) = run_command(Commands::Ir {
            file: file.path().to_path_buf(),
            no_fold: true,
        });
        assert_eq!(code, 0);
        assert!(output.contains("add"));
    }

    #[test]
    fn compile_to_stdout_separates_files() {
        let file = source_file(MATH_SOURCE);
        let (code, output) = run_command(Commands::Compile {
            file: file.path().to_path_buf(),
            target: Target::Cpp,
            out: None,
        });
        assert_eq!(code, 0);
        assert!(output.contains("// ==> math_basics.hpp"));
        assert!(output.contains("// ==> math_basics.cpp"));
        assert!(output.contains("namespace istudio::generated"));
    }

    #[test]
    fn compile_writes_files_under_out() {
        let file = source_file(MATH_SOURCE);
        let dir = tempfile::tempdir().unwrap();
        let (code, _) = run_command(Commands::Compile {
            file: file.path().to_path_buf(),
            target: Target::Rust,
            out: Some(dir.path().to_path_buf()),
        });
        assert_eq!(code, 0);
        let generated = std::fs::read_to_string(dir.path().join("math_basics.rs")).unwrap();
        // The literal call pins the parameter types to i64; the return
        // type stays unknown without a literal in the body.
        assert!(generated.contains("pub fn add(a: i64, b: i64) {"));
    }

    #[test]
    fn module_name_falls_back_to_the_file_stem() {
        let stream = lex("fn f() { return 1; }", LexerConfig::default());
        let mut context = AstContext::new();
        let root = parse_module(&stream, &mut context).unwrap();
        assert_eq!(
            module_name(&context, root, Path::new("/tmp/demo_module.ist")),
            "demo_module"
        );
    }

    #[test]
    fn missing_files_report_the_path() {
        let error = read_source(Path::new("/nonexistent/input.ist")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/input.ist"));
    }
}
