//! `xbly`: translate XBLY shorthand files into XML.
//!
//! Usage:
//!   xbly                      - read standard input, write XML to standard output
//!   xbly FILE... [-o OUT]     - translate each file
//!   xbly --tree FILE          - print the syntax tree instead of XML

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use xbly_config::Config;
use xbly_engine::{EmitOptions, EmptyElementStyle, Options, TranslateError};

#[derive(Parser, Debug)]
#[command(name = "xbly", version)]
#[command(about = "Translate XBLY shorthand into XML")]
struct Cli {
    /// Source files; standard input is read when none are given
    inputs: Vec<PathBuf>,

    /// Write the XML to this file instead of standard output (one input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file to use instead of ~/.config/xbly/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write empty elements as `<br />` rather than `<br/>`
    #[arg(long)]
    spaced_empty: bool,

    /// Do not end the output with a newline
    #[arg(long)]
    no_trailing_newline: bool,

    /// Deepest element nesting accepted (at most 1024)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print the syntax tree and parse errors instead of XML
    #[arg(long)]
    tree: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    match run(&cli, stdin.lock(), &mut stdout.lock(), &mut stderr.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("xbly: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    // RUST_LOG is parsed last so it wins over the default level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Merge command-line overrides onto the loaded config.
fn resolve_options(cli: &Cli, config: &Config) -> Options {
    let empty_element_style = if cli.spaced_empty {
        EmptyElementStyle::Spaced
    } else {
        match config.empty_element_style {
            xbly_config::EmptyElementStyle::Compact => EmptyElementStyle::Compact,
            xbly_config::EmptyElementStyle::Spaced => EmptyElementStyle::Spaced,
        }
    };

    let defaults = Options::default();
    Options {
        emit: EmitOptions {
            empty_element_style,
            trailing_newline: config.trailing_newline && !cli.no_trailing_newline,
        },
        max_depth: cli
            .max_depth
            .or(config.max_depth)
            .unwrap_or(defaults.max_depth),
    }
}

/// Translate every input, writing results to `out` (or `-o`) and diagnostics
/// to `err`. Returns `Ok(false)` if any input failed to translate.
fn run(cli: &Cli, stdin: impl Read, out: &mut impl Write, err: &mut impl Write) -> Result<bool> {
    if cli.output.is_some() && cli.inputs.len() > 1 {
        bail!("--output needs exactly one input file, got {}", cli.inputs.len());
    }

    let config = Config::load_or_default(cli.config.as_deref())?;
    let options = resolve_options(cli, &config);
    log::debug!("translating with {options:?}");

    let sources = read_sources(&cli.inputs, stdin)?;
    let mut all_ok = true;

    for (name, source) in &sources {
        let result = if cli.tree {
            xbly_engine::dump_tree(source, options.max_depth)
        } else {
            xbly_engine::translate_with(source, &options)
        };

        match result {
            Ok(xml) => match &cli.output {
                Some(path) => std::fs::write(path, &xml)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => out.write_all(xml.as_bytes())?,
            },
            Err(error) => {
                log::debug!("{name} failed: {error:?}");
                writeln!(err, "{}", diagnostic(name, &error))?;
                all_ok = false;
            }
        }
    }

    out.flush()?;
    Ok(all_ok)
}

/// `(display name, contents)` of each input, or of standard input if none.
fn read_sources(inputs: &[PathBuf], mut stdin: impl Read) -> Result<Vec<(String, String)>> {
    if inputs.is_empty() {
        let mut source = String::new();
        stdin
            .read_to_string(&mut source)
            .context("failed to read standard input")?;
        return Ok(vec![("<stdin>".to_string(), source)]);
    }

    inputs
        .iter()
        .map(|path| {
            let source = read_file(path)?;
            Ok((path.display().to_string(), source))
        })
        .collect()
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// `name:line:column: message` for syntax errors, `name: message` otherwise.
fn diagnostic(name: &str, error: &TranslateError) -> String {
    match error {
        TranslateError::Syntax { .. } => format!("{name}:{error}"),
        TranslateError::EmptyDocument => format!("{name}: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// Parse arguments with a config path that never exists, so the user's
    /// own config file can't leak into tests.
    fn cli(temp_dir: &TempDir, args: &[&str]) -> Cli {
        let config = temp_dir.path().join("no-config.toml");
        let mut argv = vec!["xbly", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn run_with_stdin(cli: &Cli, stdin: &str) -> (bool, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = run(cli, stdin.as_bytes(), &mut out, &mut err).unwrap();
        (
            ok,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "xbly",
            "in.xbly",
            "-o",
            "out.xml",
            "--spaced-empty",
            "--no-trailing-newline",
            "--max-depth",
            "10",
            "--tree",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.inputs, vec![PathBuf::from("in.xbly")]);
        assert_eq!(cli.output, Some(PathBuf::from("out.xml")));
        assert!(cli.spaced_empty && cli.no_trailing_newline && cli.tree && cli.verbose);
        assert_eq!(cli.max_depth, Some(10));
    }

    #[test]
    fn rejects_bad_max_depth() {
        assert!(Cli::try_parse_from(["xbly", "--max-depth", "deep"]).is_err());
    }

    #[test]
    fn cli_flags_override_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            empty_element_style: xbly_config::EmptyElementStyle::Compact,
            trailing_newline: true,
            max_depth: Some(20),
        };

        let options = resolve_options(&cli(&temp_dir, &[]), &config);
        assert_eq!(options.emit.empty_element_style, EmptyElementStyle::Compact);
        assert!(options.emit.trailing_newline);
        assert_eq!(options.max_depth, 20);

        let options = resolve_options(
            &cli(
                &temp_dir,
                &["--spaced-empty", "--no-trailing-newline", "--max-depth", "5"],
            ),
            &config,
        );
        assert_eq!(options.emit.empty_element_style, EmptyElementStyle::Spaced);
        assert!(!options.emit.trailing_newline);
        assert_eq!(options.max_depth, 5);
    }

    #[test]
    fn config_values_apply_without_flags() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            empty_element_style: xbly_config::EmptyElementStyle::Spaced,
            trailing_newline: false,
            max_depth: None,
        };

        let options = resolve_options(&cli(&temp_dir, &[]), &config);

        assert_eq!(options.emit.empty_element_style, EmptyElementStyle::Spaced);
        assert!(!options.emit.trailing_newline);
        assert_eq!(options.max_depth, Options::default().max_depth);
    }

    #[test]
    fn translates_stdin_to_stdout() {
        let temp_dir = TempDir::new().unwrap();
        let (ok, out, err) = run_with_stdin(&cli(&temp_dir, &[]), "(hello)");

        assert!(ok);
        assert_eq!(out, "<?xml version=\"1.0\" ?>\n<hello/>\n");
        assert_eq!(err, "");
    }

    #[test]
    fn syntax_error_goes_to_stderr_only() {
        let temp_dir = TempDir::new().unwrap();
        let (ok, out, err) = run_with_stdin(&cli(&temp_dir, &[]), "(hello");

        assert!(!ok);
        assert_eq!(out, "");
        assert_eq!(
            err,
            "<stdin>:1:7: unexpected end of input: element `hello` is never closed\n"
        );
    }

    #[test]
    fn empty_input_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let (ok, out, err) = run_with_stdin(&cli(&temp_dir, &[]), "  \n");

        assert!(!ok);
        assert_eq!(out, "");
        assert_eq!(err, "<stdin>: document has no root element\n");
    }

    #[test]
    fn translates_files_and_keeps_going_after_a_failure() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.xbly");
        let bad = temp_dir.path().join("bad.xbly");
        std::fs::write(&good, "(a (b))").unwrap();
        std::fs::write(&bad, "(a))").unwrap();

        let cli = cli(
            &temp_dir,
            &[bad.to_str().unwrap(), good.to_str().unwrap()],
        );
        let (ok, out, err) = run_with_stdin(&cli, "");

        assert!(!ok);
        assert_eq!(out, "<?xml version=\"1.0\" ?>\n<a><b/></a>\n");
        assert!(err.starts_with(&format!("{}:1:4: ", bad.display())), "{err}");
    }

    #[test]
    fn writes_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in.xbly");
        let output = temp_dir.path().join("out.xml");
        std::fs::write(&input, "(br)").unwrap();

        let cli = cli(
            &temp_dir,
            &[
                input.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
                "--spaced-empty",
            ],
        );
        let (ok, out, _) = run_with_stdin(&cli, "");

        assert!(ok);
        assert_eq!(out, "");
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "<?xml version=\"1.0\" ?>\n<br />\n"
        );
    }

    #[test]
    fn output_with_several_inputs_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let cli = cli(&temp_dir, &["a.xbly", "b.xbly", "-o", "out.xml"]);

        let error = run(&cli, io::empty(), &mut Vec::new(), &mut Vec::new()).unwrap_err();

        assert!(error.to_string().contains("exactly one input"));
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.xbly");
        let cli = cli(&temp_dir, &[missing.to_str().unwrap()]);

        let error = run(&cli, io::empty(), &mut Vec::new(), &mut Vec::new()).unwrap_err();

        assert!(format!("{error:#}").contains("failed to read"));
    }

    #[test]
    fn config_file_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "empty_element_style = \"spaced\"\ntrailing_newline = false\n",
        )
        .unwrap();
        let cli = Cli::try_parse_from(["xbly", "--config", config_path.to_str().unwrap()]).unwrap();

        let (ok, out, _) = run_with_stdin(&cli, "(hr)");

        assert!(ok);
        assert_eq!(out, "<?xml version=\"1.0\" ?>\n<hr />");
    }

    #[test]
    fn runaway_nesting_is_reported_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let depth = 200_000;
        let source = format!("{}{}", "(a ".repeat(depth), ")".repeat(depth));

        let (ok, out, err) = run_with_stdin(&cli(&temp_dir, &["--max-depth", "1000000"]), &source);

        assert!(!ok);
        assert_eq!(out, "");
        assert!(err.starts_with("<stdin>:1:3073: elements nested deeper than 1024 levels"), "{err}");
    }

    #[test]
    fn byte_order_mark_in_file_is_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("bom.xbly");
        std::fs::write(
            &input,
            "\u{FEFF}<?xml version=\"1.0\" encoding=\"utf-8\"?>\n(basket (item Apple))",
        )
        .unwrap();

        let (ok, out, err) = run_with_stdin(&cli(&temp_dir, &[input.to_str().unwrap()]), "");

        assert!(ok, "{err}");
        assert_eq!(out, "<?xml version=\"1.0\" ?>\n<basket><item>Apple</item></basket>\n");
    }

    #[test]
    fn tree_mode_dumps_syntax() {
        let temp_dir = TempDir::new().unwrap();
        let (ok, out, _) = run_with_stdin(&cli(&temp_dir, &["--tree"]), "(a)");

        assert!(ok);
        assert!(out.starts_with("ROOT@0..3\n  ELEMENT@0..3\n"), "{out}");
    }
}
