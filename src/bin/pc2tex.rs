//! pc2tex - pseudocode to LaTeX converter

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use pseudotex::{
    extract_metadata, pseudocode_to_latex_with_report, utils::report::TokenLog, BraceStyle,
    ConversionOutput, ConversionResult, NameRegistry, OutputMode, RenderOptions,
};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
const SOURCE_EXTENSIONS: &[&str] = &["pseudo", "pseudocode"];

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "pc2tex")]
#[command(version)]
#[command(about = "Convert pseudocode to typeset LaTeX", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Document name for diagram markers (defaults to the input file stem)
    #[arg(short, long)]
    name: Option<String>,

    /// Write a JSON token log to this path
    #[arg(long)]
    token_log: Option<String>,

    #[command(flatten)]
    render: RenderArgs,
}

#[cfg(feature = "cli")]
#[derive(Args, Clone)]
struct RenderArgs {
    /// Output flavour
    #[arg(short, long, value_enum, default_value_t = Mode::Math)]
    mode: Mode,

    /// How annotation braces are drawn (defaults to the mode's own style)
    #[arg(short, long, value_enum)]
    braces: Option<Braces>,

    /// Escape character for verbatim output
    #[arg(long, default_value_t = pseudotex::core::options::DEFAULT_ESCAPE_CHAR)]
    escape_char: char,

    /// Columns per indentation level
    #[arg(long, default_value_t = pseudotex::core::options::TAB_SIZE)]
    tab_size: usize,

    /// Fail on input no token rule classifies
    #[arg(long)]
    strict: bool,
}

#[cfg(feature = "cli")]
impl RenderArgs {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            mode: self.mode.into(),
            braces: self.braces.map(Into::into),
            escape_char: self.escape_char,
            tab_size: self.tab_size,
            strict_lexing: self.strict,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert every pseudocode file under the given paths to a sibling .tex file
    Batch {
        /// Files or directories (searched recursively)
        #[arg(required = true)]
        paths: Vec<String>,

        /// Source file extensions to pick up in directories
        #[arg(short, long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,

        /// Also write a sibling .lex token log per file
        #[arg(long)]
        lex: bool,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Print the token stream of a file
    Tokens {
        /// Input file path (reads from stdin if not provided)
        input: Option<String>,

        /// One token per line instead of JSON
        #[arg(long)]
        lines: bool,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// `align*` block with math macros
    Math,
    /// `minted` block with escaped styling
    Verbatim,
}

#[cfg(feature = "cli")]
impl From<Mode> for OutputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Math => OutputMode::Math,
            Mode::Verbatim => OutputMode::Verbatim,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Braces {
    /// Spliced into the rows (math mode only)
    Inline,
    /// TikZ overlay driven by position markers
    Diagram,
}

#[cfg(feature = "cli")]
impl From<Braces> for BraceStyle {
    fn from(braces: Braces) -> Self {
        match braces {
            Braces::Inline => BraceStyle::Inline,
            Braces::Diagram => BraceStyle::Diagram,
        }
    }
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pseudocode")
        .to_string()
}

#[cfg(feature = "cli")]
fn report_warnings(label: &str, output: &ConversionOutput) {
    for warning in &output.warnings {
        eprintln!("⚠ {}: {}", label, warning);
    }
}

#[cfg(feature = "cli")]
fn token_log(name: &str, source: &str) -> ConversionResult<TokenLog> {
    let metadata = extract_metadata(source)?;
    TokenLog::capture(name, &metadata.body)
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(cmd) = cli.command {
        return handle_subcommand(cmd);
    }

    let input = read_input(cli.input_file.as_deref())?;
    let name = cli
        .name
        .clone()
        .or_else(|| cli.input_file.as_deref().map(|p| file_stem(Path::new(p))))
        .unwrap_or_else(|| "pseudocode".to_string());

    if let Some(ref path) = cli.token_log {
        match token_log(&name, &input).and_then(|log| log.to_json()) {
            Ok(json) => fs::write(path, json)?,
            Err(e) => {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
        }
    }

    let output = match pseudocode_to_latex_with_report(&input, &name, &cli.render.options()) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };
    report_warnings(&name, &output);

    match cli.output {
        Some(ref path) => {
            fs::write(path, &output.content)?;
            eprintln!("✓ Output written to: {}", path);
        }
        None => {
            let mut stdout = io::stdout();
            writeln!(stdout, "{}", output.content)?;
        }
    }
    Ok(())
}

/// Collect source files under `path`, descending into directories.
#[cfg(feature = "cli")]
fn discover(path: &Path, extensions: &[String], files: &mut Vec<PathBuf>) -> io::Result<()> {
    if path.is_dir() {
        let mut entries: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        entries.sort();
        for entry in entries {
            if entry.is_dir() {
                discover(&entry, extensions, files)?;
            } else if has_extension(&entry, extensions) {
                files.push(entry);
            }
        }
    } else if path.is_file() {
        files.push(path.to_path_buf());
    } else {
        eprintln!("⚠ {} is not a file or directory", path.display());
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.trim_start_matches('.') == ext))
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands) -> io::Result<()> {
    match cmd {
        Commands::Batch {
            paths,
            extensions,
            lex,
            render,
        } => {
            let extensions = extensions
                .unwrap_or_else(|| SOURCE_EXTENSIONS.iter().map(|e| e.to_string()).collect());
            let options = render.options();

            let mut files = Vec::new();
            for path in &paths {
                discover(Path::new(path), &extensions, &mut files)?;
            }

            let mut registry = NameRegistry::new();
            let mut success_count = 0;
            let mut error_count = 0;

            for file_path in files {
                let output_path = file_path.with_extension("tex");
                let name = file_stem(&file_path);
                if output_path == file_path {
                    eprintln!("✗ {} - would overwrite its own input", file_path.display());
                    error_count += 1;
                    continue;
                }

                let content = match fs::read_to_string(&file_path) {
                    Ok(content) => content,
                    Err(e) => {
                        eprintln!("✗ {} - read error: {}", file_path.display(), e);
                        error_count += 1;
                        continue;
                    }
                };

                // Diagram markers of every file in the batch share one namespace.
                let needs_namespace = options.brace_style() == BraceStyle::Diagram
                    && extract_metadata(&content).is_ok_and(|m| m.has_annotations());
                if needs_namespace {
                    if let Err(e) = registry.claim(&name) {
                        eprintln!("✗ {} - {}", file_path.display(), e);
                        error_count += 1;
                        continue;
                    }
                }

                if lex {
                    let lex_path = file_path.with_extension("lex");
                    match token_log(&name, &content) {
                        Ok(log) => {
                            if let Err(e) = fs::write(&lex_path, log.to_lines()) {
                                eprintln!("✗ {} - write error: {}", lex_path.display(), e);
                            }
                        }
                        Err(e) => eprintln!("✗ {} - {}", lex_path.display(), e),
                    }
                }

                match pseudocode_to_latex_with_report(&content, &name, &options) {
                    Ok(output) => {
                        report_warnings(&file_path.display().to_string(), &output);
                        match fs::write(&output_path, &output.content) {
                            Ok(_) => {
                                eprintln!("✓ {}", output_path.display());
                                success_count += 1;
                            }
                            Err(e) => {
                                eprintln!("✗ {} - write error: {}", output_path.display(), e);
                                error_count += 1;
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("✗ {} - {}", file_path.display(), e);
                        error_count += 1;
                    }
                }
            }

            eprintln!(
                "\nBatch conversion complete: {} succeeded, {} failed",
                success_count, error_count
            );

            if error_count > 0 {
                std::process::exit(1);
            }
        }

        Commands::Tokens { input, lines } => {
            let source = read_input(input.as_deref())?;
            let name = input
                .as_deref()
                .map(|p| file_stem(Path::new(p)))
                .unwrap_or_else(|| "stdin".to_string());
            let log = match token_log(&name, &source) {
                Ok(log) => log,
                Err(e) => {
                    eprintln!("✗ {}", e);
                    std::process::exit(1);
                }
            };
            if lines {
                print!("{}", log.to_lines());
            } else {
                match log.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("✗ {}", e);
                        std::process::exit(1);
                    }
                }
            }
        }

        Commands::Info => {
            println!("pc2tex - pseudocode to LaTeX converter");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Output modes:");
            println!("  math      align* block inside fleqn, symbols as math macros");
            println!("  verbatim  minted block, styling through escape characters");
            println!();
            println!("Annotation braces:");
            println!("  inline    \\left.\\begin{{aligned}} ... \\right\\}} (math only)");
            println!("  diagram   \\tikzmark markers + tikzpicture overlay");
            println!();
            println!("Required packages:");
            println!("  - amsmath, nccmath (fleqn)");
            println!("  - minted (verbatim mode)");
            println!("  - tikz with tikzmark, calligraphy, math libraries (diagrams)");
            println!();
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install pseudotex --features cli");
    eprintln!("  pc2tex [OPTIONS] [INPUT_FILE]");
}
