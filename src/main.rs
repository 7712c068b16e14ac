use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use geo_regress::plot::{NullSink, PlotSink, PngFileSink, SvgFileSink};
use geo_regress::{parse_values, PipelineConfig, RegressionPipeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Headerless rectangle spans → efficiency.
    Rect,
    /// Triangle vertex coordinates → power output.
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlotFormat {
    Svg,
    Png,
    None,
}

/// Fit a least-squares model to a geometry dataset and report its quality.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Built-in analysis to run.
    #[arg(value_enum, default_value_t = Preset::Rect)]
    preset: Preset,

    /// JSON pipeline configuration; replaces the preset entirely.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input file, overriding the configured path.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory for rendered figures.
    #[arg(long, default_value = "plots")]
    plots: PathBuf,

    #[arg(long, value_enum, default_value_t = PlotFormat::Svg)]
    format: PlotFormat,

    /// Seed for the train/test shuffle.
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of rows held out for testing.
    #[arg(long)]
    test_size: Option<f64>,

    /// Evaluate the fitted model at these comma-separated feature values.
    /// May be repeated.
    #[arg(long, value_name = "V1,V2,...", allow_hyphen_values = true)]
    predict: Vec<String>,

    /// Factor applied to every --predict value, e.g. 1e-6 for micrometres.
    #[arg(long, default_value_t = 1.0)]
    predict_scale: f64,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => match self.preset {
                Preset::Rect => PipelineConfig::rectangle(),
                Preset::Triangle => PipelineConfig::triangle(),
            },
        };
        if let Some(path) = &self.data {
            config.data.path = path.clone();
        }
        if let Some(seed) = self.seed {
            config.split.seed = seed;
        }
        if let Some(fraction) = self.test_size {
            config.split.test_fraction = fraction;
        }
        Ok(config)
    }

    fn sink(&self, prefix: &str) -> Result<Box<dyn PlotSink>> {
        let sink: Box<dyn PlotSink> = match self.format {
            PlotFormat::Svg => Box::new(SvgFileSink::new(&self.plots, prefix)?),
            PlotFormat::Png => Box::new(PngFileSink::new(&self.plots, prefix)?),
            PlotFormat::None => Box::new(NullSink::default()),
        };
        Ok(sink)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.pipeline_config()?;
    let mut sink = cli
        .sink(&config.name)
        .with_context(|| format!("preparing plot directory {}", cli.plots.display()))?;
    let pipeline = RegressionPipeline::new(config).context("invalid pipeline configuration")?;

    let data_path = pipeline.config().data.path.clone();
    let mut stdout = std::io::stdout().lock();
    let outcome = pipeline
        .run(&mut stdout, sink.as_mut())
        .with_context(|| format!("regression on {} failed", data_path.display()))?;

    for query in &cli.predict {
        let features: Vec<f64> = parse_values(query)?
            .into_iter()
            .map(|v| v * cli.predict_scale)
            .collect();
        let prediction = pipeline
            .predict(&outcome.model, &features)
            .with_context(|| format!("predicting at '{query}'"))?;
        writeln!(stdout, "\n{prediction}")?;
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
