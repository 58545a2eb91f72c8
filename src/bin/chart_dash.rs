//! chart-dash CLI - render one dashboard evaluation from a CSV file.

use std::path::{Path, PathBuf};
use std::process;

use chart_dash::api::{DashboardView, build_scene};
use chart_dash::core::Viewport;
use chart_dash::render::{Renderer, SvgRenderer};
use chart_dash::telemetry::init_default_tracing;
use chart_dash::{ChartKind, ChartResult, DashboardConfig, DashboardSession};
use clap::{Parser, ValueEnum};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Standalone SVG document
    Svg,
    /// Figure model as versioned JSON
    Json,
    /// PNG image (needs the cairo-backend feature)
    Png,
}

#[derive(Parser)]
#[command(name = "chart-dash")]
#[command(about = "Interactive data visualization dashboard over a CSV file", long_about = None)]
struct Args {
    /// CSV file to upload
    #[arg(long)]
    input: PathBuf,

    /// Chart type: radial-bar, radar, nightingale, donut, treemap, sunburst, chord, network
    #[arg(long, default_value = "radial-bar")]
    chart: ChartKind,

    /// Categorical column (defaults to the first column)
    #[arg(long)]
    category: Option<String>,

    /// Numerical column (defaults to the first numeric column)
    #[arg(long)]
    value: Option<String>,

    /// Where to write the chart
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format (detected from the output extension if not specified)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Dashboard config JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Print the data preview and stop
    #[arg(long)]
    preview_only: bool,
}

fn main() {
    let _ = init_default_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> ChartResult<i32> {
    let config = load_config(args)?;
    let mut session = DashboardSession::new(config);
    session.load_csv_path(&args.input)?;
    session.select_chart(args.chart);
    if let Some(category) = &args.category {
        session.select_category(category)?;
    }
    if let Some(value) = &args.value {
        session.select_value(value)?;
    }

    let view = session.evaluate()?;
    print_view(&view);
    if args.preview_only {
        return Ok(0);
    }

    let Some(figure) = &view.figure else {
        // Schema errors are already printed as the view's error banner.
        return Ok(2);
    };
    println!("{}: {} trace(s)", figure.kind, figure.traces.len());

    let Some(output) = &args.output else {
        return Ok(0);
    };
    match args.format.unwrap_or_else(|| format_from_extension(output)) {
        OutputFormat::Json => std::fs::write(output, figure.to_json_pretty()?)?,
        OutputFormat::Svg => {
            let mut renderer = SvgRenderer::default();
            renderer.render(&build_scene(figure, session.config())?)?;
            renderer.write_to(output)?;
        }
        OutputFormat::Png => write_png(&build_scene(figure, session.config())?, output)?,
    }
    info!(path = %output.display(), "wrote chart");
    println!("Wrote {}", output.display());
    Ok(0)
}

fn load_config(args: &Args) -> ChartResult<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_json_path(path)?,
        None => DashboardConfig::default(),
    };
    if args.width.is_some() || args.height.is_some() {
        config.viewport = Viewport::new(
            args.width.unwrap_or(config.viewport.width),
            args.height.unwrap_or(config.viewport.height),
        );
    }
    config.validate()?;
    Ok(config)
}

fn print_view(view: &DashboardView) {
    println!("{}", view.title);
    println!();
    if let Some(preview) = &view.preview {
        print!("{preview}");
        println!();
    }
    if let Some(warning) = view.warning {
        println!("Warning: {warning}");
    }
    if let Some(error) = &view.error {
        eprintln!("Error: {error}");
    }
}

fn format_from_extension(path: &Path) -> OutputFormat {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputFormat::Json,
        Some("png") => OutputFormat::Png,
        _ => OutputFormat::Svg,
    }
}

#[cfg(feature = "cairo-backend")]
fn write_png(frame: &chart_dash::render::RenderFrame, output: &Path) -> ChartResult<()> {
    let (width, height) = frame.viewport.pixel_size()?;
    let mut renderer = chart_dash::render::CairoRenderer::new(width, height)?;
    renderer.render(frame)?;
    renderer.write_png(output)
}

#[cfg(not(feature = "cairo-backend"))]
fn write_png(_frame: &chart_dash::render::RenderFrame, _output: &Path) -> ChartResult<()> {
    Err(chart_dash::ChartError::InvalidData(
        "png output needs the `cairo-backend` feature".to_owned(),
    ))
}
