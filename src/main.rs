use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use trellis::config::ChartOptions;
use trellis::data::Dataset;
use trellis::parser::parse_script;
use trellis::render::{JsonSink, PlottersSink};
use trellis::runtime::{self, ChartRequest};
use trellis::{OutputFormat, SortOrder};

#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(about = "Draw a trellis chart of stacked bar columns from CSV data", long_about = None)]
struct Args {
    /// CSV file to read (or a .json array of objects); stdin CSV when omitted
    input: Option<PathBuf>,

    /// Numeric column that sizes and colours the bars
    #[arg(long)]
    numeric: Option<String>,

    /// Categorical column stacked into columns
    #[arg(long)]
    x: Option<String>,

    /// Categorical column laid out as rows
    #[arg(long)]
    y: Option<String>,

    /// Row order: none, alpha, asc or desc
    #[arg(long)]
    order: Option<SortOrder>,

    /// Reconfiguration script, e.g. 'axes(numeric: amount, x: product, y: region) | transpose()'
    #[arg(long)]
    script: Option<String>,

    /// Swap the x and y columns after configuring
    #[arg(long)]
    transpose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// JSON file overriding the chart options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let options = match &args.config {
        Some(path) => ChartOptions::from_json_file(path)?,
        None => ChartOptions::default(),
    };

    let data = read_dataset(args.input.as_ref())?;

    let script = match &args.script {
        Some(text) => match parse_script(text) {
            Ok((_, script)) => Some(script),
            Err(e) => {
                eprintln!("Parse error: {:?}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let request = ChartRequest {
        numeric: args.numeric,
        x: args.x,
        y: args.y,
        order: args.order,
        script,
        transpose: args.transpose,
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match args.format {
        OutputFormat::Json => {
            let sink = JsonSink::new(&mut handle);
            let chart = runtime::run(data, &request, options, sink)
                .context("Failed to render chart")?;
            chart.destroy();
        }
        format => {
            let sink = PlottersSink::new(format, options.font.clone());
            let mut chart = runtime::run(data, &request, options, sink)
                .context("Failed to render chart")?;
            let bytes = chart
                .sink_mut()
                .take_output()
                .context("No frame was rendered")?;
            chart.destroy();
            handle
                .write_all(&bytes)
                .context("Failed to write chart to stdout")?;
        }
    }

    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn read_dataset(input: Option<&PathBuf>) -> Result<Dataset> {
    let mut text = String::new();
    match input {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?
                .read_to_string(&mut text)
                .with_context(|| format!("Failed to read {}", path.display()))?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read CSV from stdin")?;
        }
    }
    let is_json = input.map_or(false, |p| p.extension().map_or(false, |e| e == "json"));
    if is_json {
        let value: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse JSON input")?;
        return Dataset::from_json(&value);
    }
    Dataset::from_csv(text.as_bytes()).context("Failed to parse CSV")
}
