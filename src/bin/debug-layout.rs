/// Diagnostic tool to inspect the place → compact pipeline on a set of sizes
use std::sync::Arc;

use anyhow::{bail, Context};
use pressure::{Block, Layout, LayoutConfig};

/// Used when no sizes are given on the command line.
const SAMPLE: &[(f64, f64)] = &[
    (120.0, 80.0),
    (60.0, 60.0),
    (200.0, 40.0),
    (40.0, 120.0),
    (80.0, 80.0),
    (30.0, 30.0),
    (150.0, 60.0),
    (20.0, 90.0),
    (90.0, 20.0),
    (50.0, 50.0),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pressure=debug".parse()?),
        )
        .init();

    let (sizes, spacing) = parse_args(std::env::args().skip(1))?;

    println!("=== DIAGNOSTIC: Place → Compact Pipeline ===");
    println!("Children: {} (spacing {:.1})", sizes.len(), spacing);

    let blocks: Vec<Arc<Block>> = sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| Arc::new(Block::new(&format!("#{i}"), w, h)))
        .collect();

    let mut layout = Layout::with_config(LayoutConfig::default().with_spacing(spacing, spacing));
    layout.add_children(blocks.iter().cloned())?;

    let stats = layout.optimize_with_stats()?;

    println!("\n[1] Boxes:");
    for child in layout.children() {
        let element = child.element();
        if let Some(rect) = child.rect() {
            println!(
                "    {:>4} {:.1}x{:.1} at ({:.1}, {:.1})",
                element.label, rect.width, rect.height, rect.x, rect.y
            );
        }
    }

    let initial_area = stats.initial_width * stats.initial_height;
    let final_area = stats.width * stats.height;
    println!("\n[2] Bounding box:");
    println!(
        "    After placement:  {:.1}x{:.1} ({:.0}px²)",
        stats.initial_width, stats.initial_height, initial_area
    );
    println!(
        "    After compaction: {:.1}x{:.1} ({:.0}px²)",
        stats.width, stats.height, final_area
    );
    println!(
        "    Sweeps: {}, slides: {}, peak free rects: {}",
        stats.sweeps, stats.slides, stats.free_rects_peak
    );

    let area_sum: f64 = sizes.iter().map(|(w, h)| w * h).sum();
    println!("\n[3] Coverage:");
    println!("    Total child area: {:.0}px²", area_sum);
    if final_area > 0.0 {
        println!("    Coverage: {:.1}%", area_sum / final_area * 100.0);
    }

    println!("\n[4] Checking for anomalies:");
    let rects: Vec<_> = layout.children().iter().filter_map(|c| c.rect()).collect();
    let mut overlaps = 0;
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            if a.overlaps(b) {
                overlaps += 1;
            }
        }
    }
    let out_of_bounds = rects
        .iter()
        .filter(|r| r.x < 0.0 || r.y < 0.0 || r.right() > stats.width || r.bottom() > stats.height)
        .count();
    println!("    Overlapping pairs: {}", overlaps);
    println!("    Out of bounds:     {}", out_of_bounds);

    if overlaps > 0 || out_of_bounds > 0 {
        bail!("layout has {overlaps} overlaps and {out_of_bounds} boxes out of bounds");
    }

    Ok(())
}

/// `WxH` pairs plus an optional `--spacing N`.
fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<(Vec<(f64, f64)>, f64)> {
    let mut sizes = Vec::new();
    let mut spacing: f64 = 0.0;

    while let Some(arg) = args.next() {
        if arg == "--spacing" {
            let value = args.next().context("--spacing needs a value")?;
            spacing = value
                .parse::<f64>()
                .with_context(|| format!("invalid spacing '{value}'"))?;
            continue;
        }
        let (w, h) = arg
            .split_once(['x', 'X'])
            .with_context(|| format!("expected WxH, got '{arg}'"))?;
        let w: f64 = w.parse().with_context(|| format!("invalid width in '{arg}'"))?;
        let h: f64 = h.parse().with_context(|| format!("invalid height in '{arg}'"))?;
        sizes.push((w, h));
    }

    if sizes.is_empty() {
        sizes.extend_from_slice(SAMPLE);
    }
    Ok((sizes, spacing))
}
