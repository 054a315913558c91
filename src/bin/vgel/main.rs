//! `vgel`: virtual gel. Size-select FASTQ reads by sequence length.
//!
//! Usage:
//!   vgel -i reads.fq.gz -o sized.fq.gz -m 50 -M 100 keep
//!   vgel -i reads.fq -m 50 -M 100 discard --save excised.fq
//!   vgel -i reads.fq examine

mod chart;

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use vgel::{
    DEFAULT_QUEUE_CAPACITY, Execution, FastqError, FastqReader, FastqWriter, FilterConfig, Mode,
    Output, Pipeline, PipelineOptions, RunSummary,
};

const CHART_WIDTH: usize = 65;

#[derive(Parser, Debug)]
#[command(name = "vgel", version, about = "Virtual Gel")]
struct Cli {
    /// input FASTQ (default: stdin)
    #[arg(short = 'i', long = "input", global = true)]
    input: Option<PathBuf>,
    /// output FASTQ, gzip if it ends in .gz (default: stdout)
    #[arg(short = 'o', long = "output", global = true)]
    output: Option<PathBuf>,
    /// Minimum fragment length to consider
    #[arg(short = 'm', long = "min", default_value_t = 0, global = true)]
    min: usize,
    /// Maximum fragment length to consider (default: unbounded)
    #[arg(short = 'M', long = "max", global = true)]
    max: Option<usize>,
    /// Run decode, filter and write on separate threads
    #[arg(long = "staged", global = true)]
    staged: bool,
    /// Records buffered between stages with --staged
    #[arg(long = "queue-capacity", default_value_t = DEFAULT_QUEUE_CAPACITY, global = true)]
    queue_capacity: usize,
    /// Print the table of observed read lengths to stderr
    #[arg(long = "hist", global = true)]
    hist: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Extract specific sequences for analysis
    Keep,
    /// Excise and discard specific sequences
    Discard {
        /// Save excised reads as FASTQ
        #[arg(short = 's', long = "save")]
        save: Option<PathBuf>,
    },
    /// Display histogram of fragment lengths
    #[command(visible_aliases = ["ex", "histogram", "hist"])]
    Examine,
}

impl Cmd {
    fn name(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Discard { .. } => "discard",
            Self::Examine => "examine",
        }
    }

    fn mode(&self) -> Mode {
        match self {
            Self::Keep => Mode::Keep,
            Self::Discard { .. } => Mode::Discard,
            Self::Examine => Mode::Inspect,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let name = cli.cmd.name();
    if let Err(err) = run(&cli) {
        // not through the logger: RUST_LOG=off must not hide why we exit 1
        eprintln!("[{name}][fatal] {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), FastqError> {
    let name = cli.cmd.name();

    let save = match &cli.cmd {
        Cmd::Discard { save } => save.as_deref(),
        _ => None,
    };
    check_paths(&[cli.input.as_deref(), cli.output.as_deref(), save])?;

    let max = cli.max.unwrap_or(usize::MAX);
    let config = FilterConfig::new(cli.min, max, cli.cmd.mode());
    match cli.max {
        Some(max) => log::info!("[{name}] will consider sequences in [{}, {max}] nt", cli.min),
        None => log::info!("[{name}] will consider sequences of at least {} nt", cli.min),
    }

    let mut reader = match &cli.input {
        Some(path) => FastqReader::from_path(path)?,
        None => FastqReader::stdin(),
    };
    log::info!("[{name}] reading from {}", reader.source());

    let opts = PipelineOptions {
        execution: if cli.staged {
            Execution::Staged {
                queue_capacity: cli.queue_capacity,
            }
        } else {
            Execution::Direct
        },
        histogram: cli.hist,
        ..PipelineOptions::default()
    };
    let pipeline = Pipeline::new(config, opts);

    let summary = if config.mode == Mode::Inspect {
        let mut sink = FastqWriter::new(io::sink());
        pipeline.run(&mut reader, &mut sink)?
    } else {
        let mut out = FastqWriter::new(Output::create(cli.output.as_deref())?);
        log::info!("[{name}] writing to {}", describe(cli.output.as_deref()));

        let summary = match &cli.cmd {
            Cmd::Discard { save: Some(save) } => {
                let mut excised = FastqWriter::new(Output::create(Some(save.as_path()))?);
                log::info!("[{name}] saving excised reads to {}", save.display());
                let summary = pipeline.run_with_rejects(&mut reader, &mut out, &mut excised)?;
                excised.into_inner()?.finish()?;
                summary
            }
            _ => pipeline.run(&mut reader, &mut out)?,
        };
        out.into_inner()?.finish()?;
        summary
    };

    report(name, cli, &summary)
}

fn report(name: &str, cli: &Cli, summary: &RunSummary) -> Result<(), FastqError> {
    let mut err = io::stderr().lock();
    let snapshot = summary.histogram.snapshot();
    if matches!(cli.cmd, Cmd::Examine) {
        log::info!("[{name}] printing barchart");
        chart::render(&mut err, &snapshot, CHART_WIDTH).map_err(|source| FastqError::Write { source })?;
    } else if cli.hist {
        log::info!("[{name}] printing histogram");
        chart::table(&mut err, &snapshot).map_err(|source| FastqError::Write { source })?;
    }
    Ok(())
}

/// Every file named on the command line must be distinct: a writer on the
/// input truncates it before the first read, and two writers on one file
/// interleave. Unnamed streams (stdin/stdout) are fine.
fn check_paths(named: &[Option<&Path>]) -> Result<(), FastqError> {
    let resolved: Vec<PathBuf> = named.iter().flatten().map(|p| resolve(p)).collect();
    for (i, a) in resolved.iter().enumerate() {
        if let Some(b) = resolved[i + 1..].iter().find(|b| *b == a) {
            return Err(FastqError::SameInputOutput { path: b.clone() });
        }
    }
    Ok(())
}

/// Canonical form of a path that may not exist yet.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(p) = path.canonicalize() {
        return p;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

fn describe(path: Option<&Path>) -> String {
    path.map_or_else(|| "stdout".to_string(), |p| p.display().to_string())
}
