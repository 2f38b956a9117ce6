use anyhow::{anyhow, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::thread;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use polygraph::core::PipelineConfig;
use polygraph::engine::{AsyncPipeline, Pipeline};
use polygraph::registry;
use polygraph::transport::{EventSink, JsonLinesSource, SimulatedSensor};

/// Runs the deception-detection pipeline over recorded or simulated sensor
/// batches and prints the resulting events as JSON lines on stdout.
#[derive(Parser, Debug)]
#[command(name = "polygraph", version)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "simulate"])))]
struct Args {
    /// Pipeline configuration (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recording with one `{DatosECG, DatosTemp1, DatosTemp2}` batch per line
    #[arg(long)]
    input: Option<PathBuf>,

    /// Generate synthetic batches instead of reading a recording
    #[arg(long)]
    simulate: bool,

    /// Number of simulated batches
    #[arg(long, default_value_t = 30)]
    batches: u64,

    /// Samples per simulated batch
    #[arg(long, default_value_t = 333)]
    batch_size: usize,

    /// Simulated heart rate
    #[arg(long, default_value_t = 72.0)]
    bpm: f64,

    /// Simulated skin temperature of both probes
    #[arg(long, default_value_t = 33.0)]
    temp: f64,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    let detectors: Vec<String> = registry::available_detectors()
        .into_iter()
        .map(|d| d.id)
        .collect();
    info!(?detectors, selected = %config.detector.kind, "detectors available");

    let sample_rate = config.sample_rate_hz;
    let pipeline = Pipeline::new(config)?;

    let (sink, events) = EventSink::unbounded();
    let printer = thread::spawn(move || {
        for event in events {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!(error = %e, "failed to serialise event"),
            }
        }
    });

    let ingest = AsyncPipeline::start(pipeline, sink);

    if args.simulate {
        let mut source = SimulatedSensor::new(sample_rate, args.batch_size)
            .with_bpm(args.bpm)
            .with_temperatures(args.temp, args.temp)
            .with_max_batches(args.batches);
        ingest.pump(&mut source).await?;
    } else if let Some(path) = &args.input {
        let mut source = JsonLinesSource::open(path).await?;
        ingest.pump(&mut source).await?;
        if source.rejected() > 0 {
            info!(rejected = source.rejected(), "malformed lines skipped");
        }
    }

    let pipeline = ingest.stop().await?;
    printer
        .join()
        .map_err(|_| anyhow!("Event printer panicked"))?;

    eprintln!("{}", pipeline.monitor().generate_report());
    Ok(())
}
