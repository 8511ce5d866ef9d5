use clap::Parser;
use serde::Serialize;
use spritescan::io::{load_rgb_image, owned_from_dynamic_image};
use spritescan::{detect, rank, select_closest, viz, Detection, RankConfig, TemplateStore};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Debug tool: match a sprite library against one captured frame, report
/// every detection, and mark up the frame for inspection.
#[derive(Parser, Debug)]
#[command(author, version, about = "Sprite detection debugger")]
struct Cli {
    /// Path to the captured frame (canvas screenshot).
    #[arg(short, long, value_name = "FILE", default_value = "canvas.png")]
    frame: PathBuf,
    /// Directory containing sprite templates.
    #[arg(short, long, value_name = "DIR", default_value = "templates/enemies")]
    templates: PathBuf,
    /// Minimum match confidence in [0, 1].
    #[arg(long, default_value_t = 0.7)]
    threshold: f32,
    /// Overlap fraction above which detections suppress each other.
    #[arg(long, default_value_t = 0.0)]
    overlap: f32,
    /// Suppress overlapping detections across template names too.
    #[arg(long)]
    cross_template: bool,
    /// Write the annotated frame to this path.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Write the detection report as JSON here instead of stdout.
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    name: String,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    confidence: f32,
}

impl From<&Detection> for DetectionRecord {
    fn from(det: &Detection) -> Self {
        Self {
            name: det.name.clone(),
            x: det.x,
            y: det.y,
            width: det.width,
            height: det.height,
            confidence: det.confidence,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    threshold: f32,
    skipped_templates: Vec<String>,
    detections: Vec<DetectionRecord>,
    target: Option<DetectionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("spritescan=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    let store = TemplateStore::load(&cli.templates)?;
    for skipped in store.skipped() {
        eprintln!("warning: skipped {:?}: {}", skipped.path, skipped.reason);
    }
    if store.is_empty() {
        eprintln!("no templates loaded from {:?}", cli.templates);
    }

    let frame_rgb = load_rgb_image(&cli.frame)?;
    let frame_gray = owned_from_dynamic_image(&image::DynamicImage::ImageRgb8(frame_rgb.clone()))?;

    let raw = detect(frame_gray.view(), store.templates(), cli.threshold);
    let ranked = rank(
        &raw,
        &RankConfig {
            overlap: cli.overlap,
            cross_template: cli.cross_template,
        },
    );

    let center = (
        frame_gray.width() as f32 / 2.0,
        frame_gray.height() as f32 / 2.0,
    );
    let target = select_closest(&ranked, center);

    let report = Report {
        threshold: cli.threshold,
        skipped_templates: store
            .skipped()
            .iter()
            .map(|s| s.path.display().to_string())
            .collect(),
        detections: ranked.iter().map(DetectionRecord::from).collect(),
        target: target.map(DetectionRecord::from),
    };
    let json = serde_json::to_string_pretty(&report)?;
    match cli.json {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    if let Some(path) = cli.output {
        let mut annotated = viz::annotate(&frame_rgb, &ranked);
        viz::banner(&mut annotated, &format!("Threshold: {:.2}", cli.threshold));
        annotated.save(&path)?;
        eprintln!("annotated frame written to {path:?}");
    }

    Ok(())
}
