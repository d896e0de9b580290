use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use koi_core::Colour;
use koi_render::{load_sprites, render, RenderOptions};
use koi_shared::PondSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a koi pond to SVG", long_about = None)]
struct Args {
    /// Pond settings JSON. Missing fields take their defaults.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the number of koi
    #[arg(short, long)]
    count: Option<usize>,

    /// Frames to simulate before rendering
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Seed for spawning koi; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding fin-left.png, fin-right.png and tail.png
    #[arg(long)]
    sprite_dir: Option<PathBuf>,

    /// Background colour as #RRGGBB
    #[arg(long, default_value = "#000000")]
    background: String,

    /// Output SVG file
    #[arg(short, long, default_value = "pond.svg")]
    output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut settings = match &args.settings {
        Some(path) => {
            log::info!("Loading settings from {}", path.display());
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            PondSettings::from_json(&json)
                .with_context(|| format!("Invalid settings in {}", path.display()))?
        }
        None => PondSettings::default(),
    };
    if let Some(count) = args.count {
        settings.count = count;
        settings.validate().context("Invalid --count")?;
    }

    let background: Colour = args
        .background
        .parse()
        .context("Background must be a #RRGGBB colour")?;

    let (sprite_dir, sprites) = match &args.sprite_dir {
        Some(dir) => (dir.display().to_string(), load_sprites(dir)),
        None => (String::new(), Default::default()),
    };

    let options = RenderOptions {
        frames: args.frames,
        dt: args.dt,
        width: args.width,
        height: args.height,
        seed: args.seed,
        background,
        sprite_dir,
        sprites,
        ..RenderOptions::default()
    };

    let (surface, report) = render(&settings, &options);
    std::fs::write(&args.output, surface.finish())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Wrote {}", args.output.display());

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to encode report")?
    );
    Ok(())
}
