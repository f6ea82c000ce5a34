use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use pixmidi::dsl::bytecode::Bytecode;
use pixmidi::dsl::{compile_source, vm};
use pixmidi::engine::{convert_image, Mode};
use pixmidi::error::AppError;
use pixmidi::input::load_image;
use pixmidi::midi::write_song;
use pixmidi::settings::{self, Settings};

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(name = "pixmidi", about = "Turn an image into a MIDI file", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image into a MIDI file
    Convert {
        /// Input image file
        input: PathBuf,
        /// Output MIDI file
        output: PathBuf,
        /// Expressions over x, y, z (the pixel's R, G, B); one track each
        expressions: Vec<String>,
        /// Number of tracks (fixed-range mode only)
        #[arg(short = 'n', long, default_value = "1")]
        tracks: u32,
        /// Use the fixed breakpoint range on pixel luminance instead of expressions
        #[arg(short = 'R', long)]
        range: bool,
        /// JSON settings file (note table, velocity, track spacing)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Log per-track details to stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Compile an expression, print its bytecode and evaluate it
    Compile {
        #[arg(allow_hyphen_values = true)]
        expression: String,
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        x: i32,
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        y: i32,
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        z: i32,
    },
    /// Write the default settings to a file
    InitSettings { path: PathBuf },
    /// Print the JSON schema of the settings file
    Schema,
}

/// `convert` flags that consume the following argument.
const CONVERT_VALUE_FLAGS: &[&str] = &["-n", "--tracks", "--config"];
/// `convert` flags that stand alone.
const CONVERT_SWITCHES: &[&str] = &["-R", "--range", "-v", "--verbose", "-h", "--help"];

fn is_convert_flag_with_value(arg: &str) -> bool {
    arg.starts_with("--tracks=")
        || arg.starts_with("--config=")
        || arg.strip_prefix("-n").is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Rearrange `convert` arguments so every known flag comes first and every
/// positional follows a `--`. Expressions such as `-x` then reach clap as
/// positionals, while flags may still appear anywhere on the command line.
/// Arguments after a literal `--` are always positional.
fn split_convert_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if !args.get(1).is_some_and(|a| a == "convert") {
        return args;
    }

    let rest = args.split_off(2);
    let mut positionals = Vec::new();
    let mut rest = rest.into_iter();
    while let Some(arg) = rest.next() {
        let Some(text) = arg.to_str() else {
            positionals.push(arg);
            continue;
        };
        if text == "--" {
            positionals.extend(rest.by_ref());
            break;
        }
        if CONVERT_VALUE_FLAGS.contains(&text) {
            args.push(arg);
            if let Some(value) = rest.next() {
                args.push(value);
            }
        } else if CONVERT_SWITCHES.contains(&text) || is_convert_flag_with_value(text) {
            args.push(arg);
        } else {
            positionals.push(arg);
        }
    }
    args.push(OsString::from("--"));
    args.extend(positionals);
    args
}

// ── Commands ─────────────────────────────────────────────────────

fn compile_expression(expression: &str) -> Result<Bytecode, AppError> {
    compile_source(expression).map_err(|errors| AppError::Compile {
        expression: expression.to_string(),
        message: errors
            .iter()
            .map(|e| e.format_with_source(expression))
            .collect::<Vec<_>>()
            .join("; "),
    })
}

/// Compile every expression, whichever mode is chosen, so a malformed one
/// aborts the run even under `--range`.
fn conversion_mode(expressions: &[String], tracks: u32, range: bool) -> Result<Mode, AppError> {
    let code = expressions
        .iter()
        .map(|e| compile_expression(e))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(if range { Mode::Range { tracks } } else { Mode::Expressions(code) })
}

fn run_convert(
    input: &Path,
    output: &Path,
    expressions: &[String],
    tracks: u32,
    range: bool,
    config: Option<&Path>,
    verbose: bool,
) -> Result<(), AppError> {
    let settings = match config {
        Some(path) => settings::load_settings(path)?,
        None => Settings::default(),
    };

    // Compile everything before touching the image.
    let mode = conversion_mode(expressions, tracks, range)?;

    let image = load_image(input)?;
    if verbose {
        eprintln!(
            "[pixmidi] {}: {}x{}, {} mode",
            input.display(),
            image.width(),
            image.height(),
            if range { "fixed-range" } else { "expression" },
        );
    }

    let song = convert_image(&image, &settings, mode, verbose)?;
    write_song(output, &song)?;
    eprintln!(
        "[pixmidi] Wrote {} track(s) to {}",
        song.track_count(),
        output.display()
    );
    Ok(())
}

fn evaluate(expression: &str, x: i32, y: i32, z: i32) -> Result<(Bytecode, i32), AppError> {
    let code = compile_expression(expression)?;
    let value = vm::execute(&code, x, y, z).map_err(|source| AppError::Evaluation {
        expression: expression.to_string(),
        source,
    })?;
    Ok((code, value))
}

fn run_compile(expression: &str, x: i32, y: i32, z: i32) -> Result<(), AppError> {
    let (code, value) = evaluate(expression, x, y, z)?;
    print!("{code}");
    println!("= {value}");
    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            expressions,
            tracks,
            range,
            config,
            verbose,
        } => run_convert(&input, &output, &expressions, tracks, range, config.as_deref(), verbose),
        Commands::Compile { expression, x, y, z } => run_compile(&expression, x, y, z),
        Commands::InitSettings { path } => {
            settings::save_settings(&path, &Settings::default())?;
            eprintln!("[pixmidi] Wrote default settings to {}", path.display());
            Ok(())
        }
        Commands::Schema => {
            println!("{}", settings::settings_schema()?);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse_from(split_convert_args(std::env::args_os()));
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
