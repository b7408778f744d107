//! Command-line interface: convert HTML (or hast JSON) into an mdast JSON tree.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use html_to_mdast_rs::{
    Context, ConversionError, ConversionOptions, ONE_LINE, WhitespaceMode, convert_html, default_handlers, hast,
    to_mdast_with_options,
};
use log::debug;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("invalid settings file {path}: {source}")]
    SettingsFile { path: String, source: serde_json::Error },

    #[error("invalid hast JSON input: {0}")]
    HastJson(serde_json::Error),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WhitespaceArg {
    /// Minify; whitespace containing line breaks becomes a newline
    Normalized,
    /// Minify; all whitespace runs become one space
    Collapsed,
    /// Keep source whitespace untouched
    Strict,
}

impl From<WhitespaceArg> for WhitespaceMode {
    fn from(arg: WhitespaceArg) -> Self {
        match arg {
            WhitespaceArg::Normalized => Self::Normalized,
            WhitespaceArg::Collapsed => Self::Collapsed,
            WhitespaceArg::Strict => Self::Strict,
        }
    }
}

/// Convert HTML into a Markdown syntax tree (mdast), printed as JSON.
#[derive(Debug, Parser)]
#[command(name = "html-to-mdast", version, about, long_about = None)]
struct Cli {
    /// Input file; reads stdin when omitted or `-`
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Treat the input as a hast JSON tree instead of HTML
    #[arg(long)]
    json_input: bool,

    /// Start with `oneLine: true` in the settings
    #[arg(long)]
    one_line: bool,

    /// Set an initial setting; VALUE is parsed as JSON, falling back to a string
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_setting)]
    set: Vec<(String, Value)>,

    /// JSON object with initial settings
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Whitespace handling before conversion
    #[arg(long, value_enum, default_value_t = WhitespaceArg::Normalized)]
    whitespace: WhitespaceArg,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,

    /// Report elements without a handler on stderr
    #[arg(long)]
    show_unhandled: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    generate_completion: Option<Shell>,

    /// Print a man page and exit
    #[arg(long)]
    generate_man: bool,
}

fn parse_setting(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        }),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| CliError::Read {
                    path: "stdin".to_string(),
                    source,
                })?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, rendered: &str) -> Result<(), CliError> {
    match path {
        Some(path) => fs::write(path, rendered).map_err(|source| CliError::Write {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn build_settings(cli: &Cli) -> Result<Context, CliError> {
    let mut settings = match &cli.settings {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.display().to_string(),
                source,
            })?;
            let value: Value = serde_json::from_str(&raw).map_err(|source| CliError::SettingsFile {
                path: path.display().to_string(),
                source,
            })?;
            Context::from_json(value)?
        }
        None => Context::new(),
    };
    for (key, value) in &cli.set {
        settings = settings.with(key.clone(), value.clone());
    }
    if cli.one_line {
        settings = settings.with(ONE_LINE, true);
    }
    Ok(settings)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if let Some(shell) = cli.generate_completion {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }
    if cli.generate_man {
        clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
        return Ok(());
    }

    let input = read_input(cli.input.as_deref())?;
    let options = ConversionOptions {
        settings: build_settings(cli)?,
        whitespace_mode: cli.whitespace.into(),
    };
    let handlers = default_handlers();

    let conversion = if cli.json_input {
        let mut tree: hast::Node = serde_json::from_str(&input).map_err(CliError::HastJson)?;
        to_mdast_with_options(&mut tree, &handlers, &options)?
    } else {
        convert_html(&input, &handlers, &options)?
    };

    debug!(
        "converted {} top-level nodes, {} unhandled elements",
        conversion.tree.children().len(),
        conversion.unhandled.len()
    );

    if cli.show_unhandled {
        for selector in &conversion.unhandled {
            eprintln!("unhandled: {selector}");
        }
    }

    let mut rendered = if cli.compact {
        serde_json::to_string(&conversion.tree)
    } else {
        serde_json::to_string_pretty(&conversion.tree)
    }
    .map_err(ConversionError::from)?;
    rendered.push('\n');
    write_output(cli.output.as_deref(), &rendered)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setting_json_and_string() {
        assert_eq!(parse_setting("oneLine=true").unwrap(), ("oneLine".to_string(), Value::Bool(true)));
        assert_eq!(
            parse_setting("bullet=*").unwrap(),
            ("bullet".to_string(), Value::String("*".to_string()))
        );
        assert!(parse_setting("novalue").is_err());
        assert!(parse_setting("=1").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_one_line_flag_overrides_set() {
        let cli = Cli::parse_from(["html-to-mdast", "--set", "oneLine=false", "--one-line"]);
        assert!(build_settings(&cli).unwrap().one_line());
    }
}
