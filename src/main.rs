use std::env;
use std::path::PathBuf;
use std::process;

use decipher::{io, Error, Result, Solver, SolverConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

macro_rules! time {
    ($e:expr) => {{
        let mut time = stopwatch::Stopwatch::start_new();
        let result = $e;
        time.stop();
        (time.elapsed(), result)
    }};
}

/// The four positional arguments.
#[derive(Debug, PartialEq)]
struct Args {
    cipher: PathBuf,
    reference: PathBuf,
    key_out: PathBuf,
    text_out: PathBuf,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = impl Into<PathBuf>>) -> Result<Self> {
        let mut args = args.into_iter().map(Into::into);
        match (args.next(), args.next(), args.next(), args.next()) {
            (Some(cipher), Some(reference), Some(key_out), Some(text_out)) => Ok(Args {
                cipher,
                reference,
                key_out,
                text_out,
            }),
            _ => Err(Error::Usage),
        }
    }
}

/// Settings read from the environment.
#[derive(Debug, PartialEq)]
struct Config {
    beam_width: usize,
    verbose: bool,
}

impl Config {
    fn from_env() -> Result<Self> {
        Self::from_vars(
            env::var("DECIPHER_BEAM_WIDTH").ok(),
            env::var("DECIPHER_VERBOSE").ok(),
        )
    }

    fn from_vars(beam_width: Option<String>, verbose: Option<String>) -> Result<Self> {
        let beam_width = match beam_width {
            Some(value) => {
                let parsed = value.trim().parse::<usize>();
                match parsed {
                    Ok(width) if width > 0 => width,
                    _ => return Err(Error::BeamWidth(value)),
                }
            }
            None => SolverConfig::DEFAULT_BEAM_WIDTH,
        };

        let verbose = verbose
            .map(|value| {
                matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
            .unwrap_or(false);

        Ok(Config {
            beam_width,
            verbose,
        })
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse(env::args_os().skip(1))?;
    let config = Config::from_env()?;
    init_tracing(config.verbose);

    let reference = io::read_text(&args.reference)?;
    let cipher = io::read_text(&args.cipher)?;

    let (elapsed, solver) = time!(Solver::from_reference_text(
        &reference,
        SolverConfig::new(config.beam_width)
    ));
    info!(
        ?elapsed,
        words = solver.reference().len(),
        patterns = solver.reference().pattern_count(),
        "indexed reference corpus"
    );

    let (elapsed, solution) = time!(solver.solve(&cipher));
    info!(
        ?elapsed,
        score = solution.score(),
        matched = solution.matched_count(),
        "solved cipher"
    );

    io::write_key(&args.key_out, solution.key())?;
    let decoded = solution.decode(&cipher);
    io::write_text(&args.text_out, &decoded)?;

    if config.verbose {
        println!("\nDECIPHERED TEXT:\n\n{}", decoded);
    }

    Ok(())
}
