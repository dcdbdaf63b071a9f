//! rclint — lint `.bazelrc` files against the builtin flag registry.
//!
//! Exit status: 0 clean (warnings allowed), 1 error-severity findings,
//! 2 usage or internal failure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rclint::config::LintConfig;
use rclint::rcfile::RcFile;
use rclint::registry::{builtin_registry, RegistryStore};
use rclint::report;
use rclint::resolve::{tokens_from_args, Diagnostic, ResolutionPass};

#[derive(Debug, Parser)]
#[command(
    name = "rclint",
    version,
    about = "Lint .bazelrc files against the flag registry"
)]
struct Cli {
    /// `.bazelrc` files to lint.
    files: Vec<PathBuf>,

    /// Check individual flag tokens instead of files (repeatable).
    #[arg(long = "flag", value_name = "TOKEN")]
    flags: Vec<String>,

    /// Command scope for `--flag` checks (defaults from config).
    #[arg(long)]
    command: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Explicit config file path.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("rclint: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    if cli.files.is_empty() && cli.flags.is_empty() {
        anyhow::bail!("nothing to do: pass rc files or --flag tokens");
    }

    let registry = RegistryStore::new(builtin_registry())
        .context("builtin flag table failed integrity checks")?;
    let config = match &cli.config {
        Some(path) => LintConfig::load_from(path)?,
        None => LintConfig::load()?,
    };

    let mut clean = true;
    for path in &cli.files {
        let rc = RcFile::parse(path)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let tagged = lint_rc(&registry, &config, &rc);
        tracing::info!(
            path = %path.display(),
            lines = rc.lines.len(),
            findings = tagged.len(),
            "linted rc file"
        );
        for (file, diagnostics) in group_by_file(tagged) {
            emit(cli.format, &file, &diagnostics)?;
            clean &= !report::has_errors(&diagnostics);
        }
    }

    if !cli.flags.is_empty() {
        let command = cli
            .command
            .clone()
            .unwrap_or_else(|| config.defaults.command.clone());
        let mut pass = ResolutionPass::new(&registry, command);
        pass.resolve_tokens(&tokens_from_args(&cli.flags));
        let diagnostics: Vec<Diagnostic> = pass
            .finish()
            .diagnostics
            .into_iter()
            .filter_map(|d| config.adjust(d))
            .collect();
        emit(cli.format, Path::new("<flags>"), &diagnostics)?;
        clean &= !report::has_errors(&diagnostics);
    }
    Ok(clean)
}

/// Lint one parsed rc file. One pass per distinct command, so that
/// `allow_multiple` accumulation and last-wins semantics span the whole
/// file the way they span a real invocation.
fn lint_rc(
    registry: &RegistryStore,
    config: &LintConfig,
    rc: &RcFile,
) -> Vec<(PathBuf, Diagnostic)> {
    let mut passes: Vec<(String, ResolutionPass<'_>)> = Vec::new();
    let mut tagged = Vec::new();

    for line in &rc.lines {
        let idx = match passes.iter().position(|(c, _)| *c == line.command) {
            Some(idx) => idx,
            None => {
                passes.push((
                    line.command.clone(),
                    ResolutionPass::new(registry, line.command.clone()),
                ));
                passes.len() - 1
            }
        };
        let pass = &mut passes[idx].1;
        let before = pass.diagnostics().len();
        pass.resolve_tokens(&line.tokens);
        for diag in &pass.diagnostics()[before..] {
            if let Some(adjusted) = config.adjust(diag.clone()) {
                tagged.push((line.file.clone(), adjusted));
            }
        }
    }
    tagged
}

/// Group tagged diagnostics per originating file (imports may contribute),
/// sorted by position within each file.
fn group_by_file(tagged: Vec<(PathBuf, Diagnostic)>) -> Vec<(PathBuf, Vec<Diagnostic>)> {
    let mut grouped: Vec<(PathBuf, Vec<Diagnostic>)> = Vec::new();
    for (file, diag) in tagged {
        match grouped.iter_mut().find(|(f, _)| *f == file) {
            Some((_, diags)) => diags.push(diag),
            None => grouped.push((file, vec![diag])),
        }
    }
    for (_, diags) in &mut grouped {
        diags.sort_by_key(|d| d.span);
    }
    grouped
}

fn emit(format: Format, path: &Path, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
    match format {
        Format::Text => print!("{}", report::render_text(path, diagnostics)),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report::render_json(path, diagnostics))?
        ),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RCLINT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
