//! glowstick CLI - sample an image onto the wing/tail panels and emit patterns.h

use clap::Parser;
use glowstick::{
    Designer, DesignerConfig, GlowstickError, ImagePlacement, LayoutMode, LedColor, PanelId,
    SamplePolicy,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glowstick", about = "Design LED patterns for wing/tail panels")]
struct Args {
    /// Image to sample onto the selected panels
    image: Option<PathBuf>,
    /// JSON session config (panels, spacing, selection, placement)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the header here instead of printing it (bare `--out` writes patterns.h)
    #[arg(short, long, num_args = 0..=1, default_missing_value = glowstick::export::FILE_NAME)]
    out: Option<PathBuf>,
    /// Image centre, percent of canvas width
    #[arg(long)]
    x: Option<f64>,
    /// Image centre, percent of canvas height
    #[arg(long)]
    y: Option<f64>,
    /// Image width relative to the wing span
    #[arg(short, long)]
    scale: Option<f64>,
    /// Rotation in degrees
    #[arg(short, long, allow_negative_numbers = true)]
    rotation: Option<f64>,
    /// Sampling policy: point or area
    #[arg(short, long)]
    policy: Option<SamplePolicy>,
    /// Panel layout: physical or origins
    #[arg(short, long)]
    layout: Option<LayoutMode>,
    /// Canvas pixels per LED
    #[arg(long)]
    pixel_size: Option<u32>,
    /// Leave a panel out of image sampling (repeatable)
    #[arg(long = "skip")]
    skip: Vec<PanelId>,
    /// Paint a cell after sampling: panel:row:col:color (repeatable)
    #[arg(long = "paint", value_parser = parse_paint)]
    paint: Vec<(PanelId, u32, u32, LedColor)>,
}

fn parse_paint(s: &str) -> Result<(PanelId, u32, u32, LedColor), GlowstickError> {
    let bad = || GlowstickError::Validation(format!("expected panel:row:col:color, got {s}"));
    let mut parts = s.splitn(4, ':');
    let mut next = || parts.next().ok_or_else(bad);
    let panel = next()?.parse()?;
    let row = next()?.parse().map_err(|_| bad())?;
    let col = next()?.parse().map_err(|_| bad())?;
    let color = next()?.parse()?;
    Ok((panel, row, col, color))
}

fn main() -> Result<(), GlowstickError> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DesignerConfig::load(path)?,
        None => DesignerConfig::default(),
    };
    let placement = &mut config.placement;
    *placement = ImagePlacement {
        x: args.x.unwrap_or(placement.x),
        y: args.y.unwrap_or(placement.y),
        scale: args.scale.unwrap_or(placement.scale),
        rotation: args.rotation.unwrap_or(placement.rotation),
    };
    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(pixel_size) = args.pixel_size {
        config.spacing.pixel_size = pixel_size;
    }
    for id in &args.skip {
        config.selection.set(*id, false);
    }

    let mut designer = Designer::new(config)?;
    if let Some(path) = &args.image {
        designer.upload(&std::fs::read(path)?)?;
    }
    for (id, row, col, color) in args.paint {
        designer.paint_cell(id, row, col, color);
    }

    match &args.out {
        Some(path) => designer.export_to(path)?,
        None => print!("{}", designer.render()),
    }
    Ok(())
}
