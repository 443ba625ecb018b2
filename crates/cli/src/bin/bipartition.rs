use bipartition::{fiduccia_mattheyses, kernighan_lin, PassHistory, Record};
use clap::Parser;
use common::io::{read_fm_instance, read_kl_instance, write_history, InstanceFileType};
use common::report::{write_summary, Describe};
use serde::Serialize;
use std::error::Error;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::FmtSubscriber;

/// Runs a single Fiduccia-Mattheyses or Kernighan-Lin pass on an instance file.
#[derive(Debug, Parser)]
struct Cli {
    #[arg(short, long, alias = "file_path")]
    file_path: PathBuf,
    #[arg(long, value_enum, default_value_t = InstanceFileType::Fm)]
    input_type: InstanceFileType,
    /// Write the pass history as JSON.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Do not print the summary.
    #[arg(long)]
    quiet: bool,
    #[arg(long)]
    log_level: Option<Level>,
}

fn report<R>(cli: &Cli, history: &PassHistory<R>) -> Result<(), Box<dyn Error>>
where
    R: Record + Describe,
    R::Vertex: Display,
    R::Cut: Display,
    PassHistory<R>: Serialize,
{
    if !cli.quiet {
        let mut out = std::io::stdout().lock();
        write_summary(&mut out, history)?;
        out.flush()?;
    }
    if let Some(output) = &cli.output {
        let mut out = BufWriter::new(File::create(output)?);
        write_history(&mut out, history)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(level) = cli.log_level {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .finish();

        subscriber.init();
    };

    match cli.input_type {
        InstanceFileType::Fm => {
            let instance = read_fm_instance(&cli.file_path)?;
            let history = fiduccia_mattheyses(&instance.hypergraph, instance.partition, instance.constraint)?;
            report(&cli, &history)
        }
        InstanceFileType::Kl => {
            let instance = read_kl_instance(&cli.file_path)?;
            let history = kernighan_lin(&instance.graph, instance.partition)?;
            report(&cli, &history)
        }
    }
}
