//! html-mangler - rename CSS classes and ids consistently across a document.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ColorChoice, Parser};

use html_mangler::{Error, Options, log, process_html};

/// Rename CSS classes and ids in an HTML document to short generated
/// tokens, consistently across markup and embedded styles.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input HTML file (use `-` for stdin)
    #[arg(default_value = "-", value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Rewrite the input file in place
    #[arg(short, long, conflicts_with = "output")]
    in_place: bool,

    /// Identifiers to leave untouched (`#id` or `.class`), comma-separated or repeated
    #[arg(short, long, value_delimiter = ',')]
    whitelist: Vec<String>,

    /// Config file path (TOML with a `whitelist` array)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    html_mangler::logger::set_verbose(cli.verbose);

    let mut options = match &cli.config {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    options.whitelist.extend(cli.whitelist.iter().cloned());
    options.validate()?;

    let html = read_input(&cli.input)?;
    let output = process_html(&html, &options)?;
    write_output(&cli, &output)?;

    Ok(())
}

/// Read the document from a file, or stdin when the input is `-`.
fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .map_err(|err| Error::Io(input.to_path_buf(), err))?;
        return Ok(html);
    }
    Ok(std::fs::read_to_string(input).map_err(|err| Error::Io(input.to_path_buf(), err))?)
}

/// Write the result to the chosen destination (stdout by default).
fn write_output(cli: &Cli, output: &str) -> Result<()> {
    let target = if cli.in_place {
        if cli.input == Path::new("-") {
            anyhow::bail!("--in-place requires a file input, not stdin");
        }
        Some(&cli.input)
    } else {
        cli.output.as_ref()
    };

    match target {
        Some(path) => {
            std::fs::write(path, output).map_err(|err| Error::Io(path.clone(), err))?;
            log!("mangle"; "wrote `{}`", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .map_err(|err| Error::Io(PathBuf::from("<stdout>"), err))?;
        }
    }
    Ok(())
}
