use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use isoverlay::{
    MercatorViewport, MultiPolygon, MultipolygonData, Point, PolygonOverlay, RenderOptions,
    SvgRenderer, ViewportAdapter,
};

/// Zoom used with --lat/--lon when --zoom is not given
const DEFAULT_ZOOM: f64 = 12.0;

/// Render travel-time bands from a JSON file to SVG
///
/// The input holds an array of polygon groups, each `{"polygons": [...]}`
/// with `travelTime`, `outerBoundary` and optional `innerBoundary` in
/// EPSG:3857 metres.
///
/// Examples:
///   # Fit the view to the data
///   isoverlay bands.json
///
///   # Fixed view over Berlin, shading everything out of reach
///   isoverlay bands.json --lat 52.52 --lon 13.405 -z 11 --inverse -o berlin.svg
///
///   # Use a config file
///   isoverlay bands.json --config my-colors.toml
#[derive(Parser, Debug)]
#[command(name = "isoverlay")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with polygon groups
    input: PathBuf,

    /// Path to config file (optional, auto-searches isoverlay.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output SVG file path (defaults to the input path with an .svg extension)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Latitude of the view center (use with --lon)
    #[arg(long, requires = "lon")]
    lat: Option<f64>,

    /// Longitude of the view center (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Map zoom level (defaults to fitting the data)
    #[arg(short = 'z', long)]
    zoom: Option<f64>,

    /// Element width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Element height in pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Shade everything outside the bands instead of the bands
    #[arg(long)]
    inverse: bool,

    /// Layer opacity between 0 and 1
    #[arg(long)]
    opacity: Option<f64>,

    /// Band outline width in pixels
    #[arg(long)]
    stroke_width: Option<f64>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let start = Instant::now();

    let mut options = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {:?}", config_path);
        }
        RenderOptions::from_path(config_path)?
    } else {
        RenderOptions::load()
    };
    if args.inverse {
        options.inverse = true;
    }
    if let Some(opacity) = args.opacity {
        options.opacity = opacity;
    }
    if let Some(stroke_width) = args.stroke_width {
        options.stroke_width = stroke_width;
    }
    options.validate().context("Invalid render options")?;

    let contents = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;
    let groups: Vec<MultipolygonData> =
        serde_json::from_str(&contents).context("Failed to parse polygon JSON")?;
    let data = MultiPolygon::from_data(&groups).context("Malformed polygon data")?;
    if data.is_empty() {
        bail!("No polygons found in {}", args.input.display());
    }

    let size = Point::new(f64::from(args.width), f64::from(args.height));
    let viewport = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            MercatorViewport::from_lat_lng(lat, lon, args.zoom.unwrap_or(DEFAULT_ZOOM), size)
        }
        _ => {
            let mut viewport =
                MercatorViewport::fit(data.bounds(), size).context("Polygon data has no extent")?;
            if let Some(zoom) = args.zoom {
                viewport.set_zoom(zoom);
            }
            viewport
        }
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("svg"));

    if args.verbose {
        println!("Configuration:");
        println!("  Input: {}", args.input.display());
        println!("  Bands: {:?}", data.travel_times());
        println!("  Size: {}x{}px", args.width, args.height);
        println!("  Zoom: {}", viewport.zoom());
        println!("  Inverse: {}", options.inverse);
        println!("  Opacity: {}", options.opacity);
        println!("  Stroke width: {}", options.stroke_width);
        println!("  Output: {}", output_path.display());
        println!();
    }

    let band_count = data.travel_times().len();
    let mut overlay = PolygonOverlay::new(SvgRenderer::new(), options);
    overlay.set_multipolygon(Rc::new(data));
    overlay.attach(viewport);

    overlay
        .renderer()
        .write(&output_path)
        .context("Failed to render overlay")?;

    println!(
        "Wrote {} bands to {} [{:.1}s]",
        band_count,
        output_path.display(),
        start.elapsed().as_secs_f32()
    );

    Ok(())
}
